//! Host-facing model for bindery.
//!
//! This crate describes what the host compiler hands to the coordinator on
//! every round: the program elements visible to that round, the annotations
//! they carry, and whether the round is the last one.
//!
//! # Architecture
//!
//! ```text
//! host rounds → Session (accumulates) → Round (RoundEnv) → Coordinator → Steps
//! ```
//!
//! The types are host-agnostic: a real compiler binding and the
//! file-driven test host both produce the same [`Round`] values.

mod element;
pub mod markers;
mod round;

pub use element::{Annotation, Element, ElementKind};
pub use round::{Round, RoundEnv, Session};
