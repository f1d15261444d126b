//! Error types for typed extraction.

use thiserror::Error;

use crate::diagnostic::format_underline;
use crate::value::{Location, ValueType};

/// Errors that can occur while extracting a typed value from a document node.
///
/// Every variant that concerns a specific node carries that node's location
/// (when the document supplied one) and renders it through
/// [`format_underline`].
#[derive(Error, Debug)]
pub enum GetError {
    /// The node holds a different variant than the target type reads from.
    #[error("{}", type_mismatch(.expected, .found, .location))]
    TypeMismatch {
        expected: &'static [ValueType],
        found: ValueType,
        location: Option<Location>,
    },

    /// A fixed-size target (array, pair, tuple) does not match the number of
    /// elements in the source array. Raised before any element is extracted.
    #[error("{}", arity_mismatch(.target, .expected, .found, .location))]
    ArityMismatch {
        target: &'static str,
        expected: usize,
        found: usize,
        location: Option<Location>,
    },

    /// A keyed lookup found no entry. `location` is the table's, `table` is the
    /// caller-supplied display name for bare-table lookups.
    #[error("{}", key_not_found(.key, .table, .location))]
    KeyNotFound {
        key: String,
        table: Option<String>,
        location: Option<Location>,
    },

    /// No conversion exists to the requested target. Static targets are
    /// rejected by the compiler; this is raised for runtime-selected shapes.
    #[error("[error] no conversion to `{target}` is available")]
    UnsupportedConversion { target: String },

    /// The node has the right variant but its value cannot be represented in
    /// the target (integer narrowing, nonexistent local time).
    #[error("{}", out_of_range(.target, .value, .location))]
    OutOfRange {
        target: &'static str,
        value: String,
        location: Option<Location>,
    },

    /// A JSON document contained `null`, which has no document representation.
    #[error("[error] JSON null at `{path}` has no TOML representation")]
    JsonNull { path: String },

    /// Serializing a node to JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GetError {
    /// The location of the node the error is about, if known.
    pub fn location(&self) -> Option<&Location> {
        match self {
            GetError::TypeMismatch { location, .. }
            | GetError::ArityMismatch { location, .. }
            | GetError::KeyNotFound { location, .. }
            | GetError::OutOfRange { location, .. } => location.as_ref(),
            GetError::UnsupportedConversion { .. }
            | GetError::JsonNull { .. }
            | GetError::Json(_) => None,
        }
    }
}

/// Convenience alias used throughout tomlget-core.
pub type Result<T> = std::result::Result<T, GetError>;

fn type_mismatch(expected: &[ValueType], found: &ValueType, location: &Option<Location>) -> String {
    let names: Vec<&str> = expected.iter().map(|t| t.name()).collect();
    let actual = format!("the actual type is {found}");
    match location {
        Some(loc) => format_underline(
            &format!("bad cast to {}", names.join(" or ")),
            Some(loc),
            &actual,
        ),
        // Without an excerpt there is no label line, so the header carries it.
        None => format_underline(
            &format!("bad cast to {} ({actual})", names.join(" or ")),
            None,
            "",
        ),
    }
}

fn arity_mismatch(
    target: &str,
    expected: &usize,
    found: &usize,
    location: &Option<Location>,
) -> String {
    format_underline(
        &format!(
            "specified {target} has {expected} elements, but there are {found} elements in the array"
        ),
        location.as_ref(),
        "here",
    )
}

fn key_not_found(key: &str, table: &Option<String>, location: &Option<Location>) -> String {
    match table {
        Some(name) => format_underline(
            &format!("key \"{key}\" not found in {name}"),
            location.as_ref(),
            "in this table",
        ),
        None => format_underline(
            &format!("key \"{key}\" not found"),
            location.as_ref(),
            "in this table",
        ),
    }
}

fn out_of_range(target: &str, value: &str, location: &Option<Location>) -> String {
    format_underline(
        &format!("{value} cannot be represented as {target}"),
        location.as_ref(),
        "out of range",
    )
}
