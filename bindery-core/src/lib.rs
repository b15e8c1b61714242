//! Core output primitives for bindery.
//!
//! This crate provides the emitter boundary every generation step writes
//! through, along with the qualified-name and naming helpers they share.

mod emitter;
mod file;
mod name;
mod utils;

// Output sinks
pub use emitter::{Emitter, FileEmitter, MemoryEmitter, SharedEmitter};
pub use file::WriteResult;
// Names
pub use name::QualifiedName;
// String utilities
pub use utils::{android_id, capitalize, decapitalize, to_camel_case, to_camel_case_as_var};
