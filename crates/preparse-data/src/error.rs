//! Error types for reading preparse data buffers.
//!
//! Recording itself never fails: a scan failure is data, stored through
//! [`crate::Recorder::log_message`]. These errors only come from
//! [`crate::PreparseView`] when a buffer does not match the layout.

use thiserror::Error;

/// A buffer that does not follow the preparse data layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer cells than the preamble needs
    #[error("Buffer too short: {len} cells, preamble needs {needed}")]
    Truncated { len: usize, needed: usize },

    /// Magic number does not identify a preparse buffer
    #[error("Bad magic number: {found:#x}")]
    BadMagic { found: u32 },

    /// Buffer written by an incompatible recorder
    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    /// Function region extends past the end of the buffer
    #[error("Function region of {functions_size} cells exceeds the {available} cells available")]
    FunctionRegionOverflow { functions_size: usize, available: usize },

    /// Error message cells are inconsistent
    #[error("Malformed error message: {0}")]
    MalformedMessage(String),

    /// Function region is not a whole number of entries
    #[error("Function region of {len} cells is not a multiple of the entry size {entry_size}")]
    RaggedFunctionRegion { len: usize, entry_size: usize },

    /// Language mode cell holds an unknown value
    #[error("Unknown language mode {0}")]
    UnknownLanguageMode(u32),

    /// Symbol region ended before the requested number of ids
    #[error("Symbol region ended after {decoded} of {expected} ids")]
    TruncatedSymbols { decoded: usize, expected: usize },
}

/// Result type alias for buffer reads
pub type FormatResult<T> = std::result::Result<T, FormatError>;
