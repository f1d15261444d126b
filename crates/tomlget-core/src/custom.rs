//! User-type customization.
//!
//! A type becomes extractable in one of two ways:
//!
//! 1. **Hook**: implement [`Populate`] (which requires `Default`). Extraction
//!    default-constructs the value and lets the hook fill it in. `FromValue`
//!    and `FromValueOwned` come for free.
//! 2. **External conversion**: implement [`FromValue`] directly, and
//!    [`FromValueOwned`] if the type should also be movable out of a node.
//!
//! Doing both is a compile error (conflicting implementations), so the rule
//! used for a type is never ambiguous:
//!
//! ```compile_fail
//! use tomlget_core::{FromValue, Populate, Result, Value};
//!
//! #[derive(Default)]
//! struct Port(u16);
//!
//! impl Populate for Port {
//!     fn populate(&mut self, value: &Value) -> Result<()> {
//!         self.0 = tomlget_core::get(value)?;
//!         Ok(())
//!     }
//! }
//!
//! impl<'a> FromValue<'a> for Port {
//!     fn from_value(value: &'a Value) -> Result<Self> {
//!         Ok(Port(tomlget_core::get(value)?))
//!     }
//! }
//! ```
//!
//! A type with neither path is rejected where it is requested:
//!
//! ```compile_fail
//! struct Opaque;
//! let node = tomlget_core::Value::from(1);
//! let _ = tomlget_core::get::<Opaque>(&node);
//! ```

use crate::error::Result;
use crate::get::{FromValue, FromValueOwned};
use crate::value::Value;

/// Fill a default-constructed instance from a document node.
///
/// ```
/// use tomlget_core::{find, get, Populate, Result, Value};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Populate for Server {
///     fn populate(&mut self, value: &Value) -> Result<()> {
///         self.host = find(value, "host")?;
///         self.port = find(value, "port")?;
///         Ok(())
///     }
/// }
///
/// let node: Value = serde_json::json!({"host": "localhost", "port": 8080})
///     .try_into()
///     .unwrap();
/// let server: Server = get(&node).unwrap();
/// assert_eq!(server, Server { host: "localhost".into(), port: 8080 });
/// ```
pub trait Populate: Default {
    fn populate(&mut self, value: &Value) -> Result<()>;
}

impl<'a, T: Populate> FromValue<'a> for T {
    fn from_value(value: &'a Value) -> Result<Self> {
        let mut out = T::default();
        out.populate(value)?;
        Ok(out)
    }
}

impl<T: Populate> FromValueOwned for T {
    fn from_value_owned(value: Value) -> Result<Self> {
        T::from_value(&value)
    }
}
