//! Dump Error Types
//!
//! Only failures that make a whole dump unusable are errors. Individual
//! malformed records are skipped by the readers and never surface here.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A dump reading error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dump file could not be opened.
    #[display("unable to open dump: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// The dump could not be read to the end (I/O, decompression or UTF-8
    /// failure part-way through).
    #[display("unable to read dump at line {_0}")]
    Read(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A missing dump stays missing, a truncated archive stays truncated.
        false
    }
}
