//! Document value model: the tagged tree that extraction reads from.
//!
//! A [`Value`] is one node of a parsed TOML document: exactly one payload
//! ([`ValueKind`]) plus an optional source [`Location`] used to annotate error
//! messages. Arrays and tables own their children.
//!
//! The model is deliberately thin. Parsing, serialization back to TOML text and
//! key-uniqueness diagnostics belong to the surrounding toolchain; this module
//! only provides what typed extraction needs: tag introspection, access to the
//! payload, iteration over arrays and tables, and location metadata.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// An ordered sequence of nodes (`[1, 2, 3]`).
pub type Array = Vec<Value>;

/// Discriminator naming the payload a [`Value`] currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
    Array,
    Table,
}

impl ValueType {
    /// The snake-case name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::LocalDate => "local_date",
            ValueType::LocalTime => "local_time",
            ValueType::LocalDateTime => "local_datetime",
            ValueType::OffsetDateTime => "offset_datetime",
            ValueType::Array => "array",
            ValueType::Table => "table",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    LocalDateTime(NaiveDateTime),
    OffsetDateTime(DateTime<FixedOffset>),
    Array(Array),
    Table(Table),
}

impl ValueKind {
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Integer(_) => ValueType::Integer,
            ValueKind::Float(_) => ValueType::Float,
            ValueKind::String(_) => ValueType::String,
            ValueKind::LocalDate(_) => ValueType::LocalDate,
            ValueKind::LocalTime(_) => ValueType::LocalTime,
            ValueKind::LocalDateTime(_) => ValueType::LocalDateTime,
            ValueKind::OffsetDateTime(_) => ValueType::OffsetDateTime,
            ValueKind::Array(_) => ValueType::Array,
            ValueKind::Table(_) => ValueType::Table,
        }
    }
}

/// Where a node was defined in its source document.
///
/// Lines and columns are 1-based. `width` is the number of characters the
/// node's text spans on `line_text`, used to draw the underline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub source: Arc<str>,
    pub line: usize,
    pub column: usize,
    pub width: usize,
    pub line_text: Arc<str>,
}

impl Location {
    pub fn new(
        source: impl Into<Arc<str>>,
        line: usize,
        column: usize,
        width: usize,
        line_text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            source: source.into(),
            line,
            column,
            width,
            line_text: line_text.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// A single document node.
///
/// Equality compares payloads only; two nodes parsed from different places
/// with the same content are equal.
#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    location: Option<Location>,
}

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Attach the source location this node was parsed from.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn value_type(&self) -> ValueType {
        self.kind.value_type()
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ValueKind {
        &mut self.kind
    }

    /// Split the node into its payload and location.
    pub fn into_parts(self) -> (ValueKind, Option<Location>) {
        (self.kind, self.location)
    }

    /// Borrow the payload mutably alongside the location.
    pub(crate) fn parts_mut(&mut self) -> (&mut ValueKind, Option<&Location>) {
        (&mut self.kind, self.location.as_ref())
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, ValueKind::Table(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ValueKind::Array(_))
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.kind {
            ValueKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match &mut self.kind {
            ValueKind::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match &self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Value::new(kind)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(payload: $ty) -> Self {
                    Value::new(ValueKind::$variant(payload))
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i64 => Integer,
    f64 => Float,
    String => String,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    NaiveDateTime => LocalDateTime,
    DateTime<FixedOffset> => OffsetDateTime,
    Array => Array,
    Table => Table,
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::new(ValueKind::Integer(i64::from(n)))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(ValueKind::String(s.to_string()))
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    /// Collect into an array node.
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Value::new(ValueKind::Array(iter.into_iter().map(Into::into).collect()))
    }
}

/// Key/value entries of a table, kept in insertion order.
///
/// Keys are unique: [`Table::insert`] on an existing key replaces its value in
/// place. Equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: Vec<(String, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let i = self.position(key)?;
        Some(&self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl IntoIterator for Table {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let mut table = Table::new();
        table.insert("a", 1);
        table.insert("b", 2);
        let old = table.insert("a", 3);
        assert_eq!(old, Some(Value::from(1)));
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn equality_ignores_location() {
        let loc = Location::new("a.toml", 1, 5, 2, "a = 42");
        assert_eq!(Value::from(42).with_location(loc), Value::from(42));
    }

    #[test]
    fn value_type_names() {
        assert_eq!(Value::from("x").value_type().to_string(), "string");
        assert_eq!(
            Value::from(Table::new()).value_type().to_string(),
            "table"
        );
    }
}
