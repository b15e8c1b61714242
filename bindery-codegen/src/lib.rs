//! Round coordination and code generation for bindery.
//!
//! This crate drives independent generation steps across the rounds of a
//! host compilation and writes their output through a shared emitter.
//!
//! # Module Organization
//!
//! - [`processor`] - The round coordinator, step trait, plugins and reports
//! - [`steps`] - Built-in steps (adapters, layout bindings, `BR`)
//! - [`builder`] - Source building blocks (CodeBuilder, java_string)

pub mod builder;
pub mod processor;
pub mod steps;

pub use processor::{Coordinator, Diagnostic, ProcessReport, Severity, SharedCoordinator, Step};
