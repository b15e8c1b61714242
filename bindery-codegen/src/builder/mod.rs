//! Source building blocks shared by the generation steps.
//!
//! - [`CodeBuilder`] - Fluent API for building indented source
//! - [`java_string`] - String literal escaping

mod code_builder;

pub use code_builder::{CodeBuilder, java_string};
