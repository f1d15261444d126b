//! Container rules: sequences, fixed arrays, tuples and maps.
//!
//! Each container recurses into the classifier for its element or value
//! type. Fixed-size targets check the source length before touching any
//! element and never pad or truncate. A failing element aborts the whole
//! extraction with that element's own error and location.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use tracing::debug;

use crate::error::{GetError, Result};
use crate::get::{expect_array, expect_table, mismatch, FromValue, FromValueOwned};
use crate::value::{Array, Location, Table, Value, ValueKind, ValueType};

fn arity_mismatch(
    target: &'static str,
    expected: usize,
    found: usize,
    location: Option<&Location>,
) -> GetError {
    GetError::ArityMismatch {
        target,
        expected,
        found,
        location: location.cloned(),
    }
}

fn into_array(value: Value) -> Result<(Array, Option<Location>)> {
    match value.into_parts() {
        (ValueKind::Array(items), location) => Ok((items, location)),
        (other, location) => Err(mismatch(
            &[ValueType::Array],
            other.value_type(),
            location.as_ref(),
        )),
    }
}

fn into_table(value: Value) -> Result<Table> {
    match value.into_parts() {
        (ValueKind::Table(table), _) => Ok(table),
        (other, location) => Err(mismatch(
            &[ValueType::Table],
            other.value_type(),
            location.as_ref(),
        )),
    }
}

fn element<'a, T: FromValue<'a>>(index: usize, item: &'a Value) -> Result<T> {
    T::from_value(item).inspect_err(|e| debug!(index, error = %e, "array element rejected"))
}

fn owned_element<T: FromValueOwned>(index: usize, item: Value) -> Result<T> {
    T::from_value_owned(item).inspect_err(|e| debug!(index, error = %e, "array element rejected"))
}

fn entry<'a, K: From<String>, V: FromValue<'a>>(key: &str, item: &'a Value) -> Result<(K, V)> {
    let value = V::from_value(item).inspect_err(|e| debug!(key, error = %e, "table entry rejected"))?;
    Ok((K::from(key.to_string()), value))
}

fn owned_entry<K: From<String>, V: FromValueOwned>(key: String, item: Value) -> Result<(K, V)> {
    let value = V::from_value_owned(item)
        .inspect_err(|e| debug!(key = key.as_str(), error = %e, "table entry rejected"))?;
    Ok((K::from(key), value))
}

// ============================================================================
// Rule 8: resizable sequences
// ============================================================================

impl<'a, T: FromValue<'a>> FromValue<'a> for Vec<T> {
    fn from_value(value: &'a Value) -> Result<Self> {
        let items = expect_array(value)?;
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            out.push(element(i, item)?);
        }
        Ok(out)
    }
}

impl<T: FromValueOwned> FromValueOwned for Vec<T> {
    fn from_value_owned(value: Value) -> Result<Self> {
        let (items, _) = into_array(value)?;
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            out.push(owned_element(i, item)?);
        }
        Ok(out)
    }
}

impl<'a, T: FromValue<'a>> FromValue<'a> for VecDeque<T> {
    fn from_value(value: &'a Value) -> Result<Self> {
        Vec::<T>::from_value(value).map(VecDeque::from)
    }
}

impl<T: FromValueOwned> FromValueOwned for VecDeque<T> {
    fn from_value_owned(value: Value) -> Result<Self> {
        Vec::<T>::from_value_owned(value).map(VecDeque::from)
    }
}

// ============================================================================
// Rule 9: fixed-size sequences
// ============================================================================

impl<'a, T: FromValue<'a>, const N: usize> FromValue<'a> for [T; N] {
    fn from_value(value: &'a Value) -> Result<Self> {
        let items = expect_array(value)?;
        if items.len() != N {
            return Err(arity_mismatch("array", N, items.len(), value.location()));
        }
        let out = Vec::<T>::from_value(value)?;
        out.try_into()
            .map_err(|rest: Vec<T>| arity_mismatch("array", N, rest.len(), value.location()))
    }
}

impl<T: FromValueOwned, const N: usize> FromValueOwned for [T; N] {
    fn from_value_owned(value: Value) -> Result<Self> {
        let (items, location) = into_array(value)?;
        if items.len() != N {
            return Err(arity_mismatch("array", N, items.len(), location.as_ref()));
        }
        let mut out = Vec::with_capacity(N);
        for (i, item) in items.into_iter().enumerate() {
            out.push(owned_element(i, item)?);
        }
        out.try_into()
            .map_err(|rest: Vec<T>| arity_mismatch("array", N, rest.len(), location.as_ref()))
    }
}

// ============================================================================
// Rules 10 and 11: pairs and tuples
// ============================================================================

macro_rules! tuple_impls {
    ($($target:literal $len:literal => ($($T:ident $item:ident),+);)+) => {
        $(
            impl<'a, $($T: FromValue<'a>),+> FromValue<'a> for ($($T,)+) {
                fn from_value(value: &'a Value) -> Result<Self> {
                    let items = expect_array(value)?;
                    let [$($item),+] = <&[Value; $len]>::try_from(items.as_slice())
                        .map_err(|_| arity_mismatch($target, $len, items.len(), value.location()))?;
                    let mut _index = 0;
                    Ok(($(
                        {
                            let extracted = element::<$T>(_index, $item)?;
                            _index += 1;
                            extracted
                        },
                    )+))
                }
            }

            impl<$($T: FromValueOwned),+> FromValueOwned for ($($T,)+) {
                fn from_value_owned(value: Value) -> Result<Self> {
                    let (items, location) = into_array(value)?;
                    let found = items.len();
                    let [$($item),+] = <[Value; $len]>::try_from(items)
                        .map_err(|_| arity_mismatch($target, $len, found, location.as_ref()))?;
                    let mut _index = 0;
                    Ok(($(
                        {
                            let extracted = owned_element::<$T>(_index, $item)?;
                            _index += 1;
                            extracted
                        },
                    )+))
                }
            }
        )+
    };
}

tuple_impls! {
    "tuple" 1 => (A a);
    "pair" 2 => (A a, B b);
    "tuple" 3 => (A a, B b, C c);
    "tuple" 4 => (A a, B b, C c, D d);
    "tuple" 5 => (A a, B b, C c, D d, E e);
    "tuple" 6 => (A a, B b, C c, D d, E e, F f);
    "tuple" 7 => (A a, B b, C c, D d, E e, F f, G g);
    "tuple" 8 => (A a, B b, C c, D d, E e, F f, G g, H h);
    "tuple" 9 => (A a, B b, C c, D d, E e, F f, G g, H h, I i);
    "tuple" 10 => (A a, B b, C c, D d, E e, F f, G g, H h, I i, J j);
    "tuple" 11 => (A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k);
    "tuple" 12 => (A a, B b, C c, D d, E e, F f, G g, H h, I i, J j, K k, L l);
}

// ============================================================================
// Rule 12: maps keyed by text
// ============================================================================

impl<'a, K, V, S> FromValue<'a> for HashMap<K, V, S>
where
    K: From<String> + Eq + Hash,
    V: FromValue<'a>,
    S: BuildHasher + Default,
{
    fn from_value(value: &'a Value) -> Result<Self> {
        expect_table(value)?
            .iter()
            .map(|(key, item)| entry(key, item))
            .collect()
    }
}

impl<K, V, S> FromValueOwned for HashMap<K, V, S>
where
    K: From<String> + Eq + Hash,
    V: FromValueOwned,
    S: BuildHasher + Default,
{
    fn from_value_owned(value: Value) -> Result<Self> {
        into_table(value)?
            .into_iter()
            .map(|(key, item)| owned_entry(key, item))
            .collect()
    }
}

impl<'a, K, V> FromValue<'a> for BTreeMap<K, V>
where
    K: From<String> + Ord,
    V: FromValue<'a>,
{
    fn from_value(value: &'a Value) -> Result<Self> {
        expect_table(value)?
            .iter()
            .map(|(key, item)| entry(key, item))
            .collect()
    }
}

impl<K, V> FromValueOwned for BTreeMap<K, V>
where
    K: From<String> + Ord,
    V: FromValueOwned,
{
    fn from_value_owned(value: Value) -> Result<Self> {
        into_table(value)?
            .into_iter()
            .map(|(key, item)| owned_entry(key, item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get::{get, take};

    fn located_array(items: Vec<Value>) -> Value {
        Value::from(items).with_location(Location::new("t.toml", 4, 7, 9, "a = [1, 2, 3]"))
    }

    #[test]
    fn vec_of_ints() {
        let node = Value::from_iter([1, 2, 3]);
        assert_eq!(get::<Vec<i32>>(&node).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            get::<VecDeque<u8>>(&node).unwrap(),
            VecDeque::from(vec![1, 2, 3])
        );
    }

    #[test]
    fn element_failure_carries_element_location() {
        let bad = Value::from("x").with_location(Location::new("t.toml", 9, 9, 3, "b = \"x\""));
        let node = located_array(vec![Value::from(1), bad]);
        let err = get::<Vec<i64>>(&node).unwrap_err();
        assert_eq!(err.location().map(|l| l.line), Some(9));
    }

    #[test]
    fn fixed_array_requires_exact_length() {
        let node = located_array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(get::<[i32; 3]>(&node).unwrap(), [1, 2, 3]);
        match get::<[i32; 2]>(&node).unwrap_err() {
            GetError::ArityMismatch {
                target,
                expected,
                found,
                location,
            } => {
                assert_eq!(target, "array");
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
                assert_eq!(location.map(|l| l.line), Some(4));
            }
            other => panic!("expected ArityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn arity_is_checked_before_elements() {
        // Elements would fail as integers, but the length is wrong first.
        let node = Value::from_iter(["a", "b", "c"]);
        assert!(matches!(
            get::<(i32, i32)>(&node),
            Err(GetError::ArityMismatch {
                target: "pair",
                expected: 2,
                found: 3,
                ..
            })
        ));
    }

    #[test]
    fn pair_of_mixed_types() {
        let node = Value::from(vec![Value::from(1), Value::from("x")]);
        assert_eq!(
            get::<(i32, String)>(&node).unwrap(),
            (1, "x".to_string())
        );
        let err = get::<(i32, i32)>(&node).unwrap_err();
        assert!(matches!(
            err,
            GetError::TypeMismatch {
                found: ValueType::String,
                ..
            }
        ));
    }

    #[test]
    fn tuple_borrows_positions() {
        let node = Value::from(vec![Value::from("a"), Value::from(true), Value::from(2.5)]);
        let (s, b, x): (&str, bool, f64) = get(&node).unwrap();
        assert_eq!((s, b, x), ("a", true, 2.5));
    }

    #[test]
    fn owned_tuple_moves_elements() {
        let node = Value::from(vec![Value::from("left"), Value::from("right")]);
        let (l, r): (String, String) = take(node).unwrap();
        assert_eq!((l.as_str(), r.as_str()), ("left", "right"));
    }

    #[test]
    fn maps_from_tables() {
        let table: Table = [("a", 1), ("b", 2)].into_iter().collect();
        let node = Value::from(table);
        let hm: HashMap<String, i64> = get(&node).unwrap();
        assert_eq!(hm.len(), 2);
        assert_eq!(hm["b"], 2);
        let bt: BTreeMap<String, u8> = take(node).unwrap();
        assert_eq!(bt.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn map_requires_table() {
        let node = Value::from_iter([1]);
        assert!(matches!(
            get::<HashMap<String, i64>>(&node),
            Err(GetError::TypeMismatch {
                found: ValueType::Array,
                ..
            })
        ));
    }

    #[test]
    fn nested_containers() {
        let inner = Value::from_iter([1, 2]);
        let node = Value::from(vec![inner.clone(), inner]);
        assert_eq!(
            get::<Vec<[u16; 2]>>(&node).unwrap(),
            vec![[1, 2], [1, 2]]
        );
    }
}
