//! `tomlget` CLI: typed lookups into documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Extract a value as a specific shape (stdin → stdout)
//! echo '{"server":{"ports":[80,443]}}' | tomlget get --path server.ports --as 'array<u16>'
//!
//! # Fixed-size targets reject arrays of the wrong length
//! tomlget get -i config.json --path server.ports --as '[u16; 3]'
//!
//! # List the keys of a table
//! tomlget keys -i config.json --path server
//!
//! # Show the type of a node
//! tomlget type -i config.json --path server.ports
//! ```
//!
//! Documents are read as JSON and bridged into the TOML value model.
//! Set `RUST_LOG=tomlget_core=trace` to log lookups.

use std::io;
use std::sync::Once;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tomlget_core::{find_path, Shape, Table, Value};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "tomlget",
    version,
    about = "Typed lookups into TOML document trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the node at a path as the given shape
    Get {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Dotted key path; quote a segment containing dots, e.g. `hosts."a.example"`
        /// (the document root if omitted)
        #[arg(short, long)]
        path: Option<String>,
        /// Target shape, e.g. `u16`, `array<string>`, `[f64; 3]`, `map<value>`
        #[arg(long = "as", default_value = "value")]
        shape: String,
    },
    /// List the keys of the table at a path
    Keys {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Dotted key path; quote a segment containing dots, e.g. `hosts."a.example"`
        /// (the document root if omitted)
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Print the type of the node at a path
    Type {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Dotted key path; quote a segment containing dots, e.g. `hosts."a.example"`
        /// (the document root if omitted)
        #[arg(short, long)]
        path: Option<String>,
    },
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Get { input, path, shape } => {
            let doc = load_document(input.as_deref())?;
            let shape: Shape = shape.parse().context("Invalid --as shape")?;
            let node = lookup(&doc, path.as_deref())?;
            let json = shape.extract(node).with_context(|| {
                format!("Failed to extract {} as {shape}", describe(path.as_deref()))
            })?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Keys { input, path } => {
            let doc = load_document(input.as_deref())?;
            let table: &Table = find_path(&doc, split_path(path.as_deref())?.as_slice())
                .with_context(|| format!("Failed to list keys of {}", describe(path.as_deref())))?;
            for key in table.keys() {
                println!("{key}");
            }
        }
        Commands::Type { input, path } => {
            let doc = load_document(input.as_deref())?;
            let node = lookup(&doc, path.as_deref())?;
            println!("{}", node.value_type());
        }
    }

    Ok(())
}

/// Split a dotted path into keys. A segment wrapped in double quotes is
/// taken literally, dots included.
fn split_path(path: Option<&str>) -> Result<Vec<String>> {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return Ok(Vec::new());
    };
    let mut keys = Vec::new();
    let mut key = String::new();
    let mut quoted = false;
    for c in path.chars() {
        match c {
            '"' => quoted = !quoted,
            '.' if !quoted => keys.push(std::mem::take(&mut key)),
            _ => key.push(c),
        }
    }
    if quoted {
        bail!("Unterminated quote in path '{path}'");
    }
    keys.push(key);
    Ok(keys)
}

fn describe(path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("'{p}'"),
        _ => "the document root".to_string(),
    }
}

fn lookup<'a>(doc: &'a Value, path: Option<&str>) -> Result<&'a Value> {
    find_path(doc, split_path(path)?.as_slice())
        .with_context(|| format!("Failed to look up {}", describe(path)))
}

fn load_document(path: Option<&str>) -> Result<Value> {
    let text = read_input(path)?;
    debug!(source = path.unwrap_or("<stdin>"), bytes = text.len(), "loaded document");
    let json: serde_json::Value = serde_json::from_str(&text).context("Input is not valid JSON")?;
    Value::try_from(json).context("Input cannot be represented as a TOML document")
}

fn read_input(input: Option<&str>) -> Result<String> {
    let Some(file) = input else {
        return io::read_to_string(io::stdin()).context("Could not read the document from stdin");
    };
    std::fs::read_to_string(file).with_context(|| format!("Could not read document {file}"))
}
