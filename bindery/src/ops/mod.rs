//! Core operations.
//!
//! This module contains the business logic for bindery commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod process;
mod rounds;

pub use check::check;
pub use process::process;
pub use rounds::load_rounds;
