//! Purpose: Serialize loader value graphs into JSON.
//! Exports: `Encoder`, `encode`, `encode_to_vec`.
//! Role: The single dispatch point from `FsdValue` variants to JSON shapes.
//! Invariants: Encoding is a read-only traversal; the source graph is never mutated.
//! Invariants: Opaque-map keys are the JSON text of their encoding, so `"name"` becomes `"\"name\""`.
//! Invariants: Duplicate opaque-map keys resolve last-write-wins at the first key's position.
//! Invariants: Native dict keys are coerced but never merged.
//! Invariants: Non-finite floats, non-UTF-8 bytes and non-primitive dict keys fail the encode.
use std::borrow::Cow;
use std::collections::HashMap;
use std::io;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use serde_json::ser::Formatter;

use super::error::{Error, ErrorKind};
use super::value::{FsdValue, OpaqueMap, Record};

/// `Serialize` driver over a borrowed value graph.
///
/// Every nested value is wrapped in a fresh `Encoder`, so the same dispatch
/// applies at every depth.
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'a> {
    value: &'a FsdValue,
}

impl<'a> Encoder<'a> {
    pub const fn new(value: &'a FsdValue) -> Self {
        Self { value }
    }
}

impl Serialize for Encoder<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            FsdValue::Null => serializer.serialize_unit(),
            FsdValue::Bool(val) => serializer.serialize_bool(*val),
            FsdValue::Int(val) => serializer.serialize_i64(*val),
            FsdValue::UInt(val) => serializer.serialize_u64(*val),
            FsdValue::Float(val) => {
                if !val.is_finite() {
                    return Err(S::Error::custom(format!(
                        "float {val} is out of range for JSON"
                    )));
                }
                serializer.serialize_f64(*val)
            }
            FsdValue::Str(text) => serializer.serialize_str(text),
            FsdValue::Bytes(bytes) => {
                serializer.serialize_str(bytes_as_str(bytes).map_err(S::Error::custom)?)
            }
            FsdValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Encoder::new(item))?;
                }
                seq.end()
            }
            FsdValue::OpaqueList(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list.iter() {
                    seq.serialize_element(&Encoder::new(item))?;
                }
                seq.end()
            }
            FsdValue::Dict(entries) => {
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    let key = native_key(key).map_err(S::Error::custom)?;
                    state.serialize_entry(key.as_ref(), &Encoder::new(value))?;
                }
                state.end()
            }
            FsdValue::OpaqueMap(map) => {
                let entries = opaque_entries(map).map_err(S::Error::custom)?;
                let mut state = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    state.serialize_entry(key.as_str(), &Encoder::new(value))?;
                }
                state.end()
            }
            FsdValue::Record(record) => serialize_record(serializer, record),
        }
    }
}

/// Single-line JSON with `", "` and `": "` separators.
#[derive(Clone, Copy, Debug, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn to_spaced_vec<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

fn serialize_record<S: Serializer>(serializer: S, record: &Record) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_map(Some(record.public_len()))?;
    for (name, value) in record.public_attributes() {
        state.serialize_entry(name, &Encoder::new(value))?;
    }
    state.end()
}

fn bytes_as_str(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|err| format!("byte string is not valid UTF-8: {err}"))
}

fn opaque_entries(map: &OpaqueMap) -> Result<Vec<(String, &FsdValue)>, String> {
    let mut entries: Vec<(String, &FsdValue)> = Vec::with_capacity(map.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (key, value) in map.iter() {
        let key = opaque_key(key)?;
        if let Some(&idx) = positions.get(&key) {
            entries[idx].1 = value;
            continue;
        }
        positions.insert(key.clone(), entries.len());
        entries.push((key, value));
    }
    Ok(entries)
}

// The key is the encoded JSON text itself, strings included.
fn opaque_key(key: &FsdValue) -> Result<String, String> {
    let bytes = to_spaced_vec(&Encoder::new(key)).map_err(|err| err.to_string())?;
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

fn native_key(key: &FsdValue) -> Result<Cow<'_, str>, String> {
    match key {
        FsdValue::Str(text) => Ok(Cow::Borrowed(text.as_str())),
        FsdValue::Bytes(bytes) => bytes_as_str(bytes).map(Cow::Borrowed),
        FsdValue::Null => Ok(Cow::Borrowed("null")),
        FsdValue::Bool(true) => Ok(Cow::Borrowed("true")),
        FsdValue::Bool(false) => Ok(Cow::Borrowed("false")),
        FsdValue::Int(val) => Ok(Cow::Owned(val.to_string())),
        FsdValue::UInt(val) => Ok(Cow::Owned(val.to_string())),
        FsdValue::Float(val) => serde_json::Number::from_f64(*val)
            .map(|num| Cow::Owned(num.to_string()))
            .ok_or_else(|| format!("float key {val} is out of range for JSON")),
        other => Err(format!(
            "dict keys must be str, int, float, bool or null, not {}",
            other.kind_name()
        )),
    }
}

/// Encodes a value graph into a JSON tree.
///
/// Colliding native dict keys collapse here, since a JSON tree cannot hold
/// duplicate members.
pub fn encode(value: &FsdValue) -> Result<Value, Error> {
    serde_json::to_value(Encoder::new(value)).map_err(|err| {
        Error::new(ErrorKind::Serialize)
            .with_message(format!("failed to encode {} value", value.kind_name()))
            .with_source(err)
    })
}

/// Encodes a value graph straight to JSON text.
///
/// The default form is a single line with `", "` and `": "` separators;
/// `pretty` indents by two spaces instead.
pub fn encode_to_vec(value: &FsdValue, pretty: bool) -> Result<Vec<u8>, Error> {
    let encoder = Encoder::new(value);
    let result = if pretty {
        serde_json::to_vec_pretty(&encoder)
    } else {
        to_spaced_vec(&encoder)
    };
    result.map_err(|err| {
        Error::new(ErrorKind::Serialize)
            .with_message(format!("failed to encode {} value", value.kind_name()))
            .with_source(err)
    })
}
