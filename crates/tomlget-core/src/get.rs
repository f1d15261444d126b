//! Type classifier and leaf extraction rules.
//!
//! Extraction is driven by three traits, one per access mode on the source
//! node:
//!
//! - [`FromValue<'a>`] reads from `&'a Value`. Targets either copy the payload
//!   out (`i32`, `String`, `Vec<u8>`, ...) or borrow into the tree (`&'a str`,
//!   `&'a Table`, `&'a Value`).
//! - [`FromValueMut<'a>`] hands out `&'a mut` references to payloads.
//! - [`FromValueOwned`] consumes the node and moves strings, arrays and tables
//!   out of it instead of cloning.
//!
//! Each target type has exactly one implementation, so the compiler resolves
//! the rule. In priority order:
//!
//! 1. exact payload types: `bool`, `i64`, `f64`, the four chrono temporal
//!    types, [`Table`], and references to them and to [`Array`];
//! 2. [`Value`] itself (identity);
//! 3. other integers, checked against the target's range;
//! 4. `f32`;
//! 5. text: `String`, `&str`, `Cow<str>`;
//! 6. durations and 7. timestamps (see [`crate::temporal`]);
//! 8–12. containers (see [`crate::compound`]);
//! 13–14. user types (see [`crate::custom`]).
//!
//! A target outside these rules is a compile error.

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{GetError, Result};
use crate::value::{Array, Location, Table, Value, ValueKind, ValueType};

/// Build `Self` from a borrowed document node.
///
/// Implement this directly to make a type extractable through an external
/// conversion, or implement [`crate::Populate`] instead to fill a
/// default-constructed instance. A type cannot do both.
#[diagnostic::on_unimplemented(
    message = "no conversion from a document node to `{Self}`",
    label = "`{Self}` cannot be extracted from a `Value`",
    note = "implement `Populate` (plus `Default`) or `FromValue` for `{Self}`"
)]
pub trait FromValue<'a>: Sized {
    fn from_value(value: &'a Value) -> Result<Self>;
}

/// Build a mutable reference into a document node.
#[diagnostic::on_unimplemented(
    message = "no mutable borrow of a document node as `{Self}`",
    note = "mutable extraction is limited to `&mut` payload types, `&mut String` and `&mut Value`"
)]
pub trait FromValueMut<'a>: Sized {
    fn from_value_mut(value: &'a mut Value) -> Result<Self>;
}

/// Build `Self` by consuming a document node.
#[diagnostic::on_unimplemented(
    message = "no conversion from an owned document node to `{Self}`",
    note = "types implementing `FromValue` directly must also implement `FromValueOwned` to be moved out"
)]
pub trait FromValueOwned: Sized {
    fn from_value_owned(value: Value) -> Result<Self>;
}

/// Extract `T` from a borrowed node.
///
/// ```
/// use tomlget_core::{get, Value};
///
/// let node = Value::from_iter([1, 2, 3]);
/// assert_eq!(get::<Vec<i32>>(&node).unwrap(), vec![1, 2, 3]);
/// assert_eq!(get::<[u8; 3]>(&node).unwrap(), [1, 2, 3]);
/// assert!(get::<[u8; 2]>(&node).is_err());
/// ```
pub fn get<'a, T: FromValue<'a>>(value: &'a Value) -> Result<T> {
    T::from_value(value)
}

/// Extract a mutable reference from a node.
///
/// ```
/// use tomlget_core::{get_mut, Value};
///
/// let mut node = Value::from("draft");
/// get_mut::<&mut String>(&mut node).unwrap().push_str("-2");
/// assert_eq!(node, Value::from("draft-2"));
/// ```
pub fn get_mut<'a, T: FromValueMut<'a>>(value: &'a mut Value) -> Result<T> {
    T::from_value_mut(value)
}

/// Extract `T` by consuming a node.
pub fn take<T: FromValueOwned>(value: Value) -> Result<T> {
    T::from_value_owned(value)
}

pub(crate) fn mismatch(
    expected: &'static [ValueType],
    found: ValueType,
    location: Option<&Location>,
) -> GetError {
    GetError::TypeMismatch {
        expected,
        found,
        location: location.cloned(),
    }
}

pub(crate) fn type_mismatch(expected: &'static [ValueType], value: &Value) -> GetError {
    mismatch(expected, value.value_type(), value.location())
}

pub(crate) fn expect_array(value: &Value) -> Result<&Array> {
    value
        .as_array()
        .ok_or_else(|| type_mismatch(&[ValueType::Array], value))
}

pub(crate) fn expect_table(value: &Value) -> Result<&Table> {
    value
        .as_table()
        .ok_or_else(|| type_mismatch(&[ValueType::Table], value))
}

// ============================================================================
// Rule 1: exact payload types
// ============================================================================

macro_rules! exact_ref {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for &'a $ty {
                fn from_value(value: &'a Value) -> Result<Self> {
                    match value.kind() {
                        ValueKind::$variant(payload) => Ok(payload),
                        _ => Err(type_mismatch(&[ValueType::$variant], value)),
                    }
                }
            }

            impl<'a> FromValueMut<'a> for &'a mut $ty {
                fn from_value_mut(value: &'a mut Value) -> Result<Self> {
                    let (kind, location) = value.parts_mut();
                    match kind {
                        ValueKind::$variant(payload) => Ok(payload),
                        other => Err(mismatch(&[ValueType::$variant], other.value_type(), location)),
                    }
                }
            }
        )*
    };
}

macro_rules! exact_owned {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for $ty {
                fn from_value(value: &'a Value) -> Result<Self> {
                    match value.kind() {
                        ValueKind::$variant(payload) => Ok(payload.clone()),
                        _ => Err(type_mismatch(&[ValueType::$variant], value)),
                    }
                }
            }

            impl FromValueOwned for $ty {
                fn from_value_owned(value: Value) -> Result<Self> {
                    match value.into_parts() {
                        (ValueKind::$variant(payload), _) => Ok(payload),
                        (other, location) => Err(mismatch(
                            &[ValueType::$variant],
                            other.value_type(),
                            location.as_ref(),
                        )),
                    }
                }
            }
        )*
    };
}

exact_ref! {
    bool => Boolean,
    i64 => Integer,
    f64 => Float,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    NaiveDateTime => LocalDateTime,
    DateTime<FixedOffset> => OffsetDateTime,
    Array => Array,
    Table => Table,
}

// `Vec<Value>` is left to the sequence rule, which yields the same result.
exact_owned! {
    bool => Boolean,
    i64 => Integer,
    f64 => Float,
    NaiveDate => LocalDate,
    NaiveTime => LocalTime,
    NaiveDateTime => LocalDateTime,
    DateTime<FixedOffset> => OffsetDateTime,
    Table => Table,
}

// ============================================================================
// Rule 2: identity
// ============================================================================

impl<'a> FromValue<'a> for &'a Value {
    fn from_value(value: &'a Value) -> Result<Self> {
        Ok(value)
    }
}

impl<'a> FromValue<'a> for Value {
    fn from_value(value: &'a Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<'a> FromValueMut<'a> for &'a mut Value {
    fn from_value_mut(value: &'a mut Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValueOwned for Value {
    fn from_value_owned(value: Value) -> Result<Self> {
        Ok(value)
    }
}

// ============================================================================
// Rules 3 and 4: numeric conversions
// ============================================================================

macro_rules! integral {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for $ty {
                fn from_value(value: &'a Value) -> Result<Self> {
                    match value.kind() {
                        ValueKind::Integer(n) => <$ty>::try_from(*n).map_err(|_| GetError::OutOfRange {
                            target: stringify!($ty),
                            value: n.to_string(),
                            location: value.location().cloned(),
                        }),
                        _ => Err(type_mismatch(&[ValueType::Integer], value)),
                    }
                }
            }

            impl FromValueOwned for $ty {
                fn from_value_owned(value: Value) -> Result<Self> {
                    Self::from_value(&value)
                }
            }
        )*
    };
}

integral!(i8, i16, i32, i128, isize, u8, u16, u32, u64, u128, usize);

/// Rounds to the nearest `f32`. A finite value beyond `f32::MAX` is
/// [`GetError::OutOfRange`]; infinities and NaN carry over.
impl<'a> FromValue<'a> for f32 {
    fn from_value(value: &'a Value) -> Result<Self> {
        match value.kind() {
            ValueKind::Float(x) => {
                let narrowed = *x as f32;
                if narrowed.is_infinite() && x.is_finite() {
                    return Err(GetError::OutOfRange {
                        target: "f32",
                        value: x.to_string(),
                        location: value.location().cloned(),
                    });
                }
                Ok(narrowed)
            }
            _ => Err(type_mismatch(&[ValueType::Float], value)),
        }
    }
}

impl FromValueOwned for f32 {
    fn from_value_owned(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

// ============================================================================
// Rule 5: text
// ============================================================================

impl<'a> FromValue<'a> for &'a String {
    fn from_value(value: &'a Value) -> Result<Self> {
        match value.kind() {
            ValueKind::String(s) => Ok(s),
            _ => Err(type_mismatch(&[ValueType::String], value)),
        }
    }
}

impl<'a> FromValue<'a> for &'a str {
    fn from_value(value: &'a Value) -> Result<Self> {
        <&String>::from_value(value).map(String::as_str)
    }
}

impl<'a> FromValue<'a> for Cow<'a, str> {
    fn from_value(value: &'a Value) -> Result<Self> {
        <&str>::from_value(value).map(Cow::Borrowed)
    }
}

impl<'a> FromValue<'a> for String {
    fn from_value(value: &'a Value) -> Result<Self> {
        <&String>::from_value(value).cloned()
    }
}

impl<'a> FromValueMut<'a> for &'a mut String {
    fn from_value_mut(value: &'a mut Value) -> Result<Self> {
        let (kind, location) = value.parts_mut();
        match kind {
            ValueKind::String(s) => Ok(s),
            other => Err(mismatch(&[ValueType::String], other.value_type(), location)),
        }
    }
}

impl FromValueOwned for String {
    fn from_value_owned(value: Value) -> Result<Self> {
        match value.into_parts() {
            (ValueKind::String(s), _) => Ok(s),
            (other, location) => Err(mismatch(
                &[ValueType::String],
                other.value_type(),
                location.as_ref(),
            )),
        }
    }
}
