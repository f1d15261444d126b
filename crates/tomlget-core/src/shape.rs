//! Runtime-selected extraction targets.
//!
//! When the target type is only known at runtime (a command-line flag, a
//! schema file) it is described by a [`Shape`] parsed from text, e.g.
//! `array<u16>`, `[f64; 3]`, `tuple<string, i32>` or `map<array<string>>`.
//! [`Shape::extract`] applies the same rules and failures as the static
//! classifier and renders the result as JSON. Unknown type names are
//! [`GetError::UnsupportedConversion`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value as Json};

use crate::error::{GetError, Result};
use crate::get::{get, FromValue};
use crate::json::to_json;
use crate::value::{Array, Table, Value};

/// A target type described at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// The node itself, rendered as JSON.
    Value,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
    Duration,
    Timestamp,
    Array(Box<Shape>),
    Fixed(Box<Shape>, usize),
    Tuple(Vec<Shape>),
    Map(Box<Shape>),
}

fn leaf<'a, T, F>(value: &'a Value, render: F) -> Result<Json>
where
    T: FromValue<'a>,
    F: FnOnce(T) -> Json,
{
    get::<T>(value).map(render)
}

fn arity(target: &'static str, expected: usize, items: &Array, value: &Value) -> Result<()> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(GetError::ArityMismatch {
            target,
            expected,
            found: items.len(),
            location: value.location().cloned(),
        })
    }
}

impl Shape {
    /// Extract `value` as this shape.
    pub fn extract(&self, value: &Value) -> Result<Json> {
        match self {
            Shape::Value => to_json(value),
            Shape::Bool => leaf(value, Json::Bool),
            Shape::I8 => leaf(value, |n: i8| Json::from(n)),
            Shape::I16 => leaf(value, |n: i16| Json::from(n)),
            Shape::I32 => leaf(value, |n: i32| Json::from(n)),
            Shape::I64 => leaf(value, |n: i64| Json::from(n)),
            Shape::U8 => leaf(value, |n: u8| Json::from(n)),
            Shape::U16 => leaf(value, |n: u16| Json::from(n)),
            Shape::U32 => leaf(value, |n: u32| Json::from(n)),
            Shape::U64 => leaf(value, |n: u64| Json::from(n)),
            Shape::F32 => leaf(value, |x: f32| Json::from(x)),
            Shape::F64 => leaf(value, |x: f64| Json::from(x)),
            Shape::String => leaf(value, Json::String),
            Shape::LocalDate => leaf(value, |d: NaiveDate| Json::String(d.to_string())),
            Shape::LocalTime => leaf(value, |t: NaiveTime| Json::String(t.to_string())),
            Shape::LocalDateTime => leaf(value, |dt: NaiveDateTime| {
                Json::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }),
            Shape::OffsetDateTime => leaf(value, |dt: DateTime<FixedOffset>| {
                Json::String(dt.to_rfc3339())
            }),
            Shape::Duration => leaf(value, |d: Duration| Json::from(d.as_secs_f64())),
            Shape::Timestamp => leaf(value, |dt: DateTime<Utc>| Json::String(dt.to_rfc3339())),
            Shape::Array(element) => {
                let items: &Array = get(value)?;
                items
                    .iter()
                    .map(|item| element.extract(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            }
            Shape::Fixed(element, len) => {
                let items: &Array = get(value)?;
                arity("array", *len, items, value)?;
                items
                    .iter()
                    .map(|item| element.extract(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            }
            Shape::Tuple(elements) => {
                let items: &Array = get(value)?;
                let target = if elements.len() == 2 { "pair" } else { "tuple" };
                arity(target, elements.len(), items, value)?;
                elements
                    .iter()
                    .zip(items)
                    .map(|(shape, item)| shape.extract(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            }
            Shape::Map(element) => {
                let table: &Table = get(value)?;
                let mut out = Map::new();
                for (key, item) in table.iter() {
                    out.insert(key.to_string(), element.extract(item)?);
                }
                Ok(Json::Object(out))
            }
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Value => f.write_str("value"),
            Shape::Bool => f.write_str("bool"),
            Shape::I8 => f.write_str("i8"),
            Shape::I16 => f.write_str("i16"),
            Shape::I32 => f.write_str("i32"),
            Shape::I64 => f.write_str("i64"),
            Shape::U8 => f.write_str("u8"),
            Shape::U16 => f.write_str("u16"),
            Shape::U32 => f.write_str("u32"),
            Shape::U64 => f.write_str("u64"),
            Shape::F32 => f.write_str("f32"),
            Shape::F64 => f.write_str("f64"),
            Shape::String => f.write_str("string"),
            Shape::LocalDate => f.write_str("date"),
            Shape::LocalTime => f.write_str("time"),
            Shape::LocalDateTime => f.write_str("datetime"),
            Shape::OffsetDateTime => f.write_str("offset_datetime"),
            Shape::Duration => f.write_str("duration"),
            Shape::Timestamp => f.write_str("timestamp"),
            Shape::Array(element) => write!(f, "array<{element}>"),
            Shape::Fixed(element, len) => write!(f, "[{element}; {len}]"),
            Shape::Tuple(elements) => {
                f.write_str("tuple<")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(">")
            }
            Shape::Map(element) => write!(f, "map<{element}>"),
        }
    }
}

impl FromStr for Shape {
    type Err = GetError;

    fn from_str(s: &str) -> Result<Self> {
        let unsupported = || GetError::UnsupportedConversion {
            target: s.trim().to_string(),
        };
        let mut parser = ShapeParser {
            input: s,
            pos: 0,
            depth: 0,
        };
        let shape = parser.shape().ok_or_else(unsupported)?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(unsupported());
        }
        Ok(shape)
    }
}

/// Deepest nesting a shape may have.
const MAX_SHAPE_DEPTH: usize = 64;

/// Recursive-descent parser over the shape grammar. Returns `None` on any
/// syntax error, unknown name or nesting beyond [`MAX_SHAPE_DEPTH`]; the
/// caller reports the whole input.
struct ShapeParser<'s> {
    input: &'s str,
    pos: usize,
    depth: usize,
}

impl<'s> ShapeParser<'s> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'s str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let input = self.input;
        let start = self.pos;
        self.pos += len;
        Some(&input[start..start + len])
    }

    fn number(&mut self) -> Option<usize> {
        self.ident()?.parse().ok()
    }

    fn shape(&mut self) -> Option<Shape> {
        if self.depth == MAX_SHAPE_DEPTH {
            return None;
        }
        self.depth += 1;
        let shape = self.nested_shape();
        self.depth -= 1;
        shape
    }

    fn nested_shape(&mut self) -> Option<Shape> {
        if self.eat('[') {
            let element = self.shape()?;
            if !self.eat(';') {
                return None;
            }
            let len = self.number()?;
            return self.eat(']').then(|| Shape::Fixed(Box::new(element), len));
        }

        let shape = match self.ident()? {
            "value" => Shape::Value,
            "bool" => Shape::Bool,
            "i8" => Shape::I8,
            "i16" => Shape::I16,
            "i32" => Shape::I32,
            "i64" => Shape::I64,
            "u8" => Shape::U8,
            "u16" => Shape::U16,
            "u32" => Shape::U32,
            "u64" => Shape::U64,
            "f32" => Shape::F32,
            "f64" => Shape::F64,
            "string" => Shape::String,
            "date" => Shape::LocalDate,
            "time" => Shape::LocalTime,
            "datetime" => Shape::LocalDateTime,
            "offset_datetime" => Shape::OffsetDateTime,
            "duration" => Shape::Duration,
            "timestamp" => Shape::Timestamp,
            "array" => Shape::Array(Box::new(self.single_arg()?)),
            "map" => Shape::Map(Box::new(self.single_arg()?)),
            "tuple" => Shape::Tuple(self.args()?),
            _ => return None,
        };
        Some(shape)
    }

    fn single_arg(&mut self) -> Option<Shape> {
        let mut args = self.args()?;
        if args.len() == 1 {
            args.pop()
        } else {
            None
        }
    }

    fn args(&mut self) -> Option<Vec<Shape>> {
        if !self.eat('<') {
            return None;
        }
        let mut args = vec![self.shape()?];
        while self.eat(',') {
            args.push(self.shape()?);
        }
        self.eat('>').then_some(args)
    }
}
