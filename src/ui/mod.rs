//! ui
//!
//! Output formatting and logging setup.
//!
//! # Modules
//!
//! - [`output`] - Stdout/stderr printing and the `tracing` subscriber

pub mod output;
