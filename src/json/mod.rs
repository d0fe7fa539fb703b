//! Purpose: Internal JSON parsing boundary shared by loaders.
//! Exports: `parse` module with decode helpers used by loader internals.
//! Role: Single seam for parser details so loaders avoid ad hoc decode logic.
//! Invariants: Loader document decoding goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
