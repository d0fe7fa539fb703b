// Core modules: value model, encoding, shared cache lookup, and error modeling.
pub mod cache;
pub mod encode;
pub mod error;
pub mod value;
