//! Diagnostics shared by the parser, the type checker and the CLI.
//!
//! - Error codes for searchability
//! - A message saying what went wrong
//! - A primary span saying where
//! - Rendering against the source as `error[E1001]: …` with a caret snippet

mod diagnostic;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
