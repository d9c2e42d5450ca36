//! JSON interchange for nodes.
//!
//! | JSON | Node |
//! |------|------|
//! | `null` | `Nil` |
//! | boolean, number, string | the matching atom |
//! | array | array-form list |
//! | `{"symbol": "name"}` | symbol atom |
//!
//! Chains serialize as arrays, dropping any improper tail.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use serde_json::{Map, Value};

use crate::seq::{check_depth, sequence};
use crate::{Atom, Node, ReadError, StructureError};

const SYMBOL_KEY: &str = "symbol";

impl Node {
    /// Converts a JSON value into a node.
    pub fn from_json(value: &Value) -> Result<Node, ReadError> {
        from_json_at(value, 0)
    }

    /// Converts this node into a JSON value.
    pub fn to_json(&self) -> Result<Value, StructureError> {
        to_json_at(self, 0)
    }
}

fn from_json_at(value: &Value, depth: usize) -> Result<Node, ReadError> {
    check_depth(depth).map_err(|err| ReadError::Json(err.to_string()))?;
    match value {
        Value::Null => Ok(Node::Nil),
        Value::Bool(b) => Ok(Node::bool(*b)),
        Value::Number(n) => n
            .as_f64()
            .map(Node::number)
            .ok_or_else(|| ReadError::Json(format!("number out of range: {}", n))),
        Value::String(s) => Ok(Node::string(s.as_str())),
        Value::Array(items) => items
            .iter()
            .map(|item| from_json_at(item, depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::list),
        Value::Object(map) => match map.get(SYMBOL_KEY) {
            Some(Value::String(name)) if map.len() == 1 => Ok(Node::symbol(name.as_str())),
            _ => Err(ReadError::Json(format!(
                "objects must have the form {{\"{}\": name}}",
                SYMBOL_KEY
            ))),
        },
    }
}

fn to_json_at(node: &Node, depth: usize) -> Result<Value, StructureError> {
    check_depth(depth)?;
    match node {
        Node::Atom(Atom::String(s)) => Ok(Value::String(s.clone())),
        Node::Atom(Atom::Symbol(name)) => {
            let mut map = Map::new();
            map.insert(SYMBOL_KEY.to_string(), Value::String(name.clone()));
            Ok(Value::Object(map))
        }
        // NaN and infinities have no JSON form
        Node::Atom(Atom::Number(n)) => Ok(serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        Node::Atom(Atom::Bool(b)) => Ok(Value::Bool(*b)),
        Node::Nil => Ok(Value::Null),
        Node::List(_) | Node::Pair(_) => sequence(node)?
            .iter()
            .map(|item| to_json_at(item, depth + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Node::from_json(&value).map_err(de::Error::custom)
    }
}
