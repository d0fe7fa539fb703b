//! Purpose: Define the stable public Rust API boundary for fsdjson.
//! Exports: Value model, encoder, loader registry, shared cache, and `convert`.
//! Role: Public, additive-only surface used by the CLI and integration tests.
//! Invariants: Callers reach core types through this module rather than `core` paths.

mod convert;

pub use crate::core::cache::{SharedCache, is_cache_resource, normalize_resource};
pub use crate::core::encode::{Encoder, encode, encode_to_vec};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::value::{FsdValue, OpaqueList, OpaqueMap, Record, is_reserved_name};
pub use crate::loader::{
    EXEC_PREFIX, ExecLoader, JsonLoader, Loader, LoaderRegistry, ResolvedLoader, TreeLoader,
};
pub use convert::{ConvertOutcome, ConvertRequest, convert, resolve_input};
