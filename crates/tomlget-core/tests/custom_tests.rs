//! User types opting into extraction from outside the crate, through the
//! `Populate` hook and through a direct `FromValue` implementation.

use serde_json::json;
use tomlget_core::{
    find, get, take, FromValue, FromValueOwned, GetError, Populate, Result, Table, Value,
    ValueType,
};

#[derive(Debug, Default, PartialEq)]
struct Owner {
    name: String,
    admin: bool,
    groups: Vec<String>,
}

impl Populate for Owner {
    fn populate(&mut self, value: &Value) -> Result<()> {
        self.name = find(value, "name")?;
        self.admin = find(value, "admin")?;
        self.groups = find(value, "groups")?;
        Ok(())
    }
}

/// `host:port` pair stored as a two-element array, converted without a
/// default instance.
#[derive(Debug, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
}

impl<'a> FromValue<'a> for Endpoint {
    fn from_value(value: &'a Value) -> Result<Self> {
        let (host, port) = get(value)?;
        Ok(Endpoint { host, port })
    }
}

impl FromValueOwned for Endpoint {
    fn from_value_owned(value: Value) -> Result<Self> {
        let (host, port) = take(value)?;
        Ok(Endpoint { host, port })
    }
}

fn doc(json: serde_json::Value) -> Value {
    Value::try_from(json).expect("test documents contain no nulls")
}

#[test]
fn hook_populates_default_instance() {
    let node = doc(json!({"name": "Tom", "admin": true, "groups": ["ops", "dev"]}));
    let owner: Owner = get(&node).unwrap();
    let expected = Owner {
        name: "Tom".into(),
        admin: true,
        groups: vec!["ops".into(), "dev".into()],
    };
    assert_eq!(owner, expected);
}

#[test]
fn hook_errors_propagate_unchanged() {
    let node = doc(json!({"name": "Tom", "admin": "yes", "groups": []}));
    assert!(matches!(
        get::<Owner>(&node),
        Err(GetError::TypeMismatch {
            found: ValueType::String,
            ..
        })
    ));
    let node = doc(json!({"name": "Tom"}));
    assert!(matches!(
        get::<Owner>(&node),
        Err(GetError::KeyNotFound { ref key, .. }) if key == "admin"
    ));
}

#[test]
fn hook_types_compose_with_containers() {
    let node = doc(json!({
        "owners": {
            "a": {"name": "A", "admin": false, "groups": []},
            "b": {"name": "B", "admin": true, "groups": ["x"]},
        }
    }));
    let owners: std::collections::BTreeMap<String, Owner> = find(&node, "owners").unwrap();
    assert_eq!(owners.len(), 2);
    assert!(owners["b"].admin);

    let owners_node: Value = find(&node, "owners").unwrap();
    let table: Table = take(owners_node).unwrap();
    let moved: Owner = table.find_owned("a").unwrap();
    assert_eq!(moved.name, "A");
}

#[test]
fn external_conversion_is_used() {
    let node = doc(json!({"primary": ["db.local", 5432], "replicas": [["r1", 5433], ["r2", 5434]]}));
    let primary: Endpoint = find(&node, "primary").unwrap();
    assert_eq!(
        primary,
        Endpoint {
            host: "db.local".into(),
            port: 5432
        }
    );
    let replicas: Vec<Endpoint> = find(&node, "replicas").unwrap();
    assert_eq!(replicas[1].port, 5434);
    let owned: [Endpoint; 2] = tomlget_core::find_owned(node, "replicas").unwrap();
    assert_eq!(owned[0].host, "r1");
}

#[test]
fn external_conversion_reports_arity() {
    let node = doc(json!(["db.local", 5432, "extra"]));
    assert!(matches!(
        get::<Endpoint>(&node),
        Err(GetError::ArityMismatch {
            target: "pair",
            expected: 2,
            found: 3,
            ..
        })
    ));
}
