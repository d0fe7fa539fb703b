//! Purpose: Load plain JSON documents as native values.
//! Exports: `JsonLoader`.
//! Role: Re-emits already-decoded JSON; encoding its output again is a no-op.
//! Invariants: Object members keep document order.
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::core::error::{Error, ErrorKind, io_kind};
use crate::core::value::FsdValue;
use crate::json::parse;

pub struct JsonLoader;

impl super::Loader for JsonLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn summary(&self) -> &str {
        "plain JSON document mapped to native lists and dicts"
    }

    fn load(&self, input: &Path) -> Result<FsdValue, Error> {
        let bytes = fs::read(input).map_err(|err| {
            Error::new(io_kind(&err))
                .with_message("failed to read json document")
                .with_path(input)
                .with_source(err)
        })?;
        let value = parse::from_slice::<Value>(&bytes).map_err(|err| {
            let hint = parse::hint_for_error(&err, "loader.json");
            Error::new(ErrorKind::Loader)
                .with_message("invalid json document")
                .with_hint(hint)
                .with_path(input)
                .with_source(err)
        })?;
        Ok(FsdValue::from_json(value))
    }
}
