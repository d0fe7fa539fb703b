//! Purpose: Define the in-memory value graph produced by loaders.
//! Exports: `FsdValue`, `OpaqueMap`, `OpaqueList`, `Record`, `is_reserved_name`.
//! Role: Closed tagged union consumed by the encoder; also the tree-document wire model.
//! Invariants: The graph is an owned tree, so it is always acyclic.
//! Invariants: Record attributes iterate in ascending name order.
//! Invariants: Names starting with `__` are reserved and never reach the JSON output.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const RESERVED_PREFIX: &str = "__";

/// Returns true for attribute names that are internal to the producing runtime.
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// A value produced by a loader.
///
/// `List` and `Dict` are the writer's native containers. `OpaqueMap`,
/// `OpaqueList` and `Record` are the loader-side shapes that get dedicated
/// encoding rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FsdValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<FsdValue>),
    Dict(Vec<(FsdValue, FsdValue)>),
    OpaqueMap(OpaqueMap),
    OpaqueList(OpaqueList),
    Record(Record),
}

impl FsdValue {
    /// Builds a graph of native values from a parsed JSON document.
    ///
    /// Object members keep their document order.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FsdValue::Null,
            Value::Bool(val) => FsdValue::Bool(val),
            Value::Number(num) => {
                if let Some(int) = num.as_i64() {
                    FsdValue::Int(int)
                } else if let Some(uint) = num.as_u64() {
                    FsdValue::UInt(uint)
                } else {
                    FsdValue::Float(num.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => FsdValue::Str(text),
            Value::Array(items) => {
                FsdValue::List(items.into_iter().map(FsdValue::from_json).collect())
            }
            Value::Object(map) => FsdValue::Dict(
                map.into_iter()
                    .map(|(key, value)| (FsdValue::Str(key), FsdValue::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Short label used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FsdValue::Null => "null",
            FsdValue::Bool(_) => "bool",
            FsdValue::Int(_) | FsdValue::UInt(_) => "int",
            FsdValue::Float(_) => "float",
            FsdValue::Str(_) => "str",
            FsdValue::Bytes(_) => "bytes",
            FsdValue::List(_) => "list",
            FsdValue::Dict(_) => "dict",
            FsdValue::OpaqueMap(_) => "opaque-map",
            FsdValue::OpaqueList(_) => "opaque-list",
            FsdValue::Record(_) => "record",
        }
    }
}

impl From<bool> for FsdValue {
    fn from(value: bool) -> Self {
        FsdValue::Bool(value)
    }
}

impl From<i64> for FsdValue {
    fn from(value: i64) -> Self {
        FsdValue::Int(value)
    }
}

impl From<u64> for FsdValue {
    fn from(value: u64) -> Self {
        FsdValue::UInt(value)
    }
}

impl From<f64> for FsdValue {
    fn from(value: f64) -> Self {
        FsdValue::Float(value)
    }
}

impl From<&str> for FsdValue {
    fn from(value: &str) -> Self {
        FsdValue::Str(value.to_string())
    }
}

impl From<String> for FsdValue {
    fn from(value: String) -> Self {
        FsdValue::Str(value)
    }
}

impl From<OpaqueMap> for FsdValue {
    fn from(value: OpaqueMap) -> Self {
        FsdValue::OpaqueMap(value)
    }
}

impl From<OpaqueList> for FsdValue {
    fn from(value: OpaqueList) -> Self {
        FsdValue::OpaqueList(value)
    }
}

impl From<Record> for FsdValue {
    fn from(value: Record) -> Self {
        FsdValue::Record(value)
    }
}

/// Key/value container whose keys may be any value.
///
/// Pairs keep insertion order; duplicates are kept as given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueMap {
    entries: Vec<(FsdValue, FsdValue)>,
}

impl OpaqueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<FsdValue>, value: impl Into<FsdValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<FsdValue>, value: impl Into<FsdValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&FsdValue, &FsdValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(FsdValue, FsdValue)> for OpaqueMap {
    fn from_iter<I: IntoIterator<Item = (FsdValue, FsdValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Element container produced by a loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueList {
    items: Vec<FsdValue>,
}

impl OpaqueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: impl Into<FsdValue>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FsdValue> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<FsdValue> for OpaqueList {
    fn from_iter<I: IntoIterator<Item = FsdValue>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Any other object: a type name plus its attributes.
///
/// Reserved (`__`-prefixed) attributes may be stored but are skipped by
/// [`Record::public_attributes`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    type_name: String,
    #[serde(default)]
    attributes: BTreeMap<String, FsdValue>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<FsdValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FsdValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FsdValue> {
        self.attributes.get(name)
    }

    pub fn public_attributes(&self) -> impl Iterator<Item = (&str, &FsdValue)> {
        self.attributes
            .iter()
            .filter(|(name, _)| !is_reserved_name(name))
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn public_len(&self) -> usize {
        self.public_attributes().count()
    }
}
