// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Build metadata loading for bindery.
//!
//! The build metadata record is the configuration every generation step
//! needs before it can run. It travels through the compilation as the
//! arguments of a marker annotation and may only become visible in a later
//! round, so loading it distinguishes "not yet available" (`Ok(None)`) from
//! "present but malformed" (an [`Error`]).

mod build_info;
mod error;
mod loader;
mod round_file;

pub use build_info::BuildMetadata;
pub use error::{Error, Result};
pub use loader::{BuildInfoLoader, MarkerLoader};
pub use round_file::{RoundFile, parse_file, parse_str, parse_str_with_filename};
