//! core
//!
//! Pure domain layer: placeholder expansion, form validation, template
//! rendering and configuration. Nothing here performs network I/O.

pub mod config;
pub mod expand;
pub mod form;
pub mod template;
