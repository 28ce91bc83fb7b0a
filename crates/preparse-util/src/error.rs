//! Core error types for preparse-util crate
//!
//! Appending to any container in this crate cannot fail; only checked reads
//! report errors.

use thiserror::Error;

/// Error type for index vector operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexVecError {
    /// Index out of bounds
    #[error("Index out of bounds: index {index}, length {length}")]
    OutOfBounds { index: usize, length: usize },
}

/// Error type for literal arena lookups
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArenaError {
    /// The handle names a chunk this arena never allocated
    #[error("Unknown arena chunk {chunk} (arena has {chunk_count} chunks)")]
    UnknownChunk { chunk: u32, chunk_count: usize },

    /// The handle points past the end of its chunk
    #[error("Literal {offset}..{end} exceeds chunk {chunk} of {chunk_len} bytes")]
    OutOfBounds {
        chunk: u32,
        offset: u32,
        end: usize,
        chunk_len: usize,
    },
}

/// Result type alias for index vector operations
pub type IndexVecResult<T> = std::result::Result<T, IndexVecError>;

/// Result type alias for arena operations
pub type ArenaResult<T> = std::result::Result<T, ArenaError>;
