//! # tomlget-core
//!
//! Typed extraction of Rust values from TOML document trees.
//!
//! A parsed TOML document is a tree of dynamically tagged [`Value`] nodes.
//! This crate converts those nodes into statically requested Rust types:
//! primitives, strings, durations and timestamps, `Vec`/`[T; N]`, tuples,
//! maps, and user types that opt in. Each target type resolves to exactly one
//! conversion rule at compile time; mismatches are reported as typed errors
//! pointing at the offending node's source location.
//!
//! ## Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//! use tomlget_core::{find, get, GetError, Value};
//!
//! let doc: Value = serde_json::json!({
//!     "title": "example",
//!     "ports": [8000, 8001, 8002],
//!     "owner": {"name": "Tom", "admin": true},
//! })
//! .try_into()
//! .unwrap();
//!
//! let title: &str = find(&doc, "title").unwrap();
//! let ports: [u16; 3] = find(&doc, "ports").unwrap();
//! let owner: HashMap<String, Value> = find(&doc, "owner").unwrap();
//! assert_eq!(title, "example");
//! assert_eq!(ports, [8000, 8001, 8002]);
//! assert_eq!(get::<bool>(&owner["admin"]).unwrap(), true);
//!
//! // Fixed sizes never truncate.
//! assert!(matches!(
//!     find::<[u16; 2]>(&doc, "ports"),
//!     Err(GetError::ArityMismatch { expected: 2, found: 3, .. })
//! ));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: document node, tags, tables and source locations
//! - [`get`]: classifier traits, entry points and leaf rules
//! - [`temporal`]: duration and timestamp rules
//! - [`compound`]: sequences, fixed arrays, tuples and maps
//! - [`custom`]: the `Populate` hook for user types
//! - [`find`]: keyed lookup
//! - [`shape`]: runtime-selected targets
//! - [`json`]: JSON bridge
//! - [`diagnostic`]: location-annotated error text
//! - [`error`]: error types

pub mod compound;
pub mod custom;
pub mod diagnostic;
pub mod error;
pub mod find;
pub mod get;
pub mod json;
pub mod shape;
pub mod temporal;
pub mod value;

pub use custom::Populate;
pub use error::{GetError, Result};
pub use find::{
    find, find_mut, find_node, find_node_mut, find_node_owned, find_owned, find_path,
    UNKNOWN_TABLE,
};
pub use get::{get, get_mut, take, FromValue, FromValueMut, FromValueOwned};
pub use json::to_json;
pub use shape::Shape;
pub use value::{Array, Location, Table, Value, ValueKind, ValueType};
