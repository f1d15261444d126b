//! Keyed lookup: table membership check plus typed extraction.
//!
//! Lookups go through a table node or a bare [`Table`]. A missing key is
//! [`GetError::KeyNotFound`]; a node that is not a table is a type mismatch.
//! The access mode of the source carries through: a shared borrow yields
//! shared results, a mutable borrow yields `&mut`, and an owned node gives up
//! the entry by value.

use tracing::trace;

use crate::error::{GetError, Result};
use crate::get::{expect_table, mismatch, FromValue, FromValueMut, FromValueOwned};
use crate::value::{Location, Table, Value, ValueKind, ValueType};

/// Display name used for bare-table lookups when the caller gives none.
pub const UNKNOWN_TABLE: &str = "unknown table";

fn key_not_found(key: &str, table: Option<&str>, location: Option<&Location>) -> GetError {
    GetError::KeyNotFound {
        key: key.to_string(),
        table: table.map(str::to_string),
        location: location.cloned(),
    }
}

/// Borrow the entry `key` of a table node.
pub fn find_node<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    trace!(key, "find");
    expect_table(value)?
        .get(key)
        .ok_or_else(|| key_not_found(key, None, value.location()))
}

/// Mutably borrow the entry `key` of a table node.
pub fn find_node_mut<'a>(value: &'a mut Value, key: &str) -> Result<&'a mut Value> {
    trace!(key, "find_mut");
    let (kind, location) = value.parts_mut();
    match kind {
        ValueKind::Table(table) => table
            .get_mut(key)
            .ok_or_else(|| key_not_found(key, None, location)),
        other => Err(mismatch(&[ValueType::Table], other.value_type(), location)),
    }
}

/// Move the entry `key` out of an owned table node.
pub fn find_node_owned(value: Value, key: &str) -> Result<Value> {
    trace!(key, "find_owned");
    match value.into_parts() {
        (ValueKind::Table(mut table), location) => table
            .remove(key)
            .ok_or_else(|| key_not_found(key, None, location.as_ref())),
        (other, location) => Err(mismatch(
            &[ValueType::Table],
            other.value_type(),
            location.as_ref(),
        )),
    }
}

/// Look up `key` in a table node and extract it as `T`.
///
/// ```
/// use tomlget_core::{find, GetError, Value};
///
/// let node: Value = serde_json::json!({"a": 1, "b": "x"}).try_into().unwrap();
/// assert_eq!(find::<i32>(&node, "a").unwrap(), 1);
/// assert!(matches!(find::<i32>(&node, "z"), Err(GetError::KeyNotFound { .. })));
/// ```
pub fn find<'a, T: FromValue<'a>>(value: &'a Value, key: &str) -> Result<T> {
    T::from_value(find_node(value, key)?)
}

/// Look up `key` in a table node and extract a mutable reference.
pub fn find_mut<'a, T: FromValueMut<'a>>(value: &'a mut Value, key: &str) -> Result<T> {
    T::from_value_mut(find_node_mut(value, key)?)
}

/// Consume a table node, extracting the entry `key` as `T`.
pub fn find_owned<T: FromValueOwned>(value: Value, key: &str) -> Result<T> {
    T::from_value_owned(find_node_owned(value, key)?)
}

/// Walk nested tables along `keys` and extract the final entry as `T`.
///
/// The error for a missing segment points at the table that lacks it.
///
/// ```
/// use tomlget_core::{find_path, Value};
///
/// let node: Value = serde_json::json!({"server": {"ports": [80, 443]}})
///     .try_into()
///     .unwrap();
/// let ports: Vec<u16> = find_path(&node, &["server", "ports"]).unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub fn find_path<'a, T, K>(value: &'a Value, keys: &[K]) -> Result<T>
where
    T: FromValue<'a>,
    K: AsRef<str>,
{
    let mut node = value;
    for key in keys {
        node = find_node(node, key.as_ref())?;
    }
    T::from_value(node)
}

impl Table {
    /// Look up `key` and extract it as `T`, naming this table
    /// `"unknown table"` in the error.
    pub fn find<'a, T: FromValue<'a>>(&'a self, key: &str) -> Result<T> {
        self.find_named(key, UNKNOWN_TABLE)
    }

    /// Look up `key` and extract it as `T`, naming this table `name` in the
    /// error.
    pub fn find_named<'a, T: FromValue<'a>>(&'a self, key: &str, name: &str) -> Result<T> {
        trace!(key, table = name, "find");
        let entry = self
            .get(key)
            .ok_or_else(|| key_not_found(key, Some(name), None))?;
        T::from_value(entry)
    }

    pub fn find_mut<'a, T: FromValueMut<'a>>(&'a mut self, key: &str) -> Result<T> {
        self.find_mut_named(key, UNKNOWN_TABLE)
    }

    pub fn find_mut_named<'a, T: FromValueMut<'a>>(
        &'a mut self,
        key: &str,
        name: &str,
    ) -> Result<T> {
        trace!(key, table = name, "find_mut");
        let entry = self
            .get_mut(key)
            .ok_or_else(|| key_not_found(key, Some(name), None))?;
        T::from_value_mut(entry)
    }

    pub fn find_owned<T: FromValueOwned>(self, key: &str) -> Result<T> {
        self.find_owned_named(key, UNKNOWN_TABLE)
    }

    pub fn find_owned_named<T: FromValueOwned>(mut self, key: &str, name: &str) -> Result<T> {
        trace!(key, table = name, "find_owned");
        let entry = self
            .remove(key)
            .ok_or_else(|| key_not_found(key, Some(name), None))?;
        T::from_value_owned(entry)
    }
}
