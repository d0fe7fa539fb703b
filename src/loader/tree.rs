//! Purpose: Load tree documents, the tagged JSON form of `FsdValue`.
//! Exports: `TreeLoader`, `parse_tree`.
//! Role: Interchange format that external FSD decoders emit for this tool.
//! Invariants: The document must decode as exactly one `FsdValue`.
use std::fs;
use std::path::Path;

use crate::core::error::{Error, ErrorKind, io_kind};
use crate::core::value::FsdValue;
use crate::json::parse;

pub struct TreeLoader;

impl super::Loader for TreeLoader {
    fn name(&self) -> &str {
        "tree"
    }

    fn summary(&self) -> &str {
        "tagged value-tree JSON document (Record/OpaqueMap/OpaqueList/...)"
    }

    fn load(&self, input: &Path) -> Result<FsdValue, Error> {
        let bytes = fs::read(input).map_err(|err| {
            Error::new(io_kind(&err))
                .with_message("failed to read tree document")
                .with_path(input)
                .with_source(err)
        })?;
        parse_tree(&bytes, "loader.tree").map_err(|err| err.with_path(input))
    }
}

pub(crate) fn parse_tree(bytes: &[u8], context: &str) -> Result<FsdValue, Error> {
    parse::from_slice::<FsdValue>(bytes).map_err(|err| {
        let hint = parse::hint_for_error(&err, context);
        Error::new(ErrorKind::Loader)
            .with_message("invalid tree document")
            .with_hint(hint)
            .with_source(err)
    })
}
