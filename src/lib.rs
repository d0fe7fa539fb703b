//! Purpose: Library crate behind the `fsdjson` CLI and tests.
//! Exports: `api` (value model, encoder, loaders, shared cache, conversion).
//! Role: Keeps conversion logic testable without spawning the binary.
//! Invariants: Conversion is single-threaded and synchronous; no global state.
pub mod api;
pub mod core;
pub(crate) mod json;
pub mod loader;
