//! Resolve evaluation modules by name and stream dataset columns into them.
//!
//! * [`module`] – module categories, the registry, and descriptor-file loading
//! * [`data`] – dataset rows, split selection, file loaders and lazy column views
//! * [`config`] – run configuration used by the preview binary
//! * [`cli`] – command-line arguments of the binary

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod module;

pub use error::{EvaluateError, Result};
