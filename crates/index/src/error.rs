//! Index Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Failures from the dump readers are raised as children of
//! [`ErrorKind::Input`].

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An input dump could not be opened or read to the end.
    #[display("unable to load {_0} dump")]
    Input(#[error(not(source))] &'static str),
    /// An output could not be written.
    #[display("unable to write: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
    /// An existing index artifact could not be opened or read.
    #[display("unable to read: {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The index could not be converted to or from JSON.
    #[display("index serialization failed")]
    Serialize,
    /// A loaded index violates its own consistency rules.
    #[display("inconsistent index: {_0}")]
    Inconsistent(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Write(_))
    }
}
