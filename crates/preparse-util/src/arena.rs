//! Literal arena - append-only storage for symbol bytes.
//!
//! The scanner hands the recorder borrowed slices that may point into a
//! transient buffer. The first time a literal is seen its bytes are copied
//! here, and the symbol table keeps a [`LiteralRef`] to the copy.
//!
//! # Memory Layout
//!
//! Bytes live in chunks. A chunk is allocated with a fixed capacity and only
//! filled up to it, so it never reallocates and a stored block never moves.
//! A block never straddles two chunks; a block larger than the chunk size
//! gets a chunk of its own.
//!
//! ```text
//! chunk 0: [f o o b a r . . . . ]   <- full enough, next block opens chunk 1
//! chunk 1: [x . . . . . . . . . ]
//! ```

use crate::error::{ArenaError, ArenaResult};

/// Default chunk capacity in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// Handle to a block stored in a [`LiteralArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LiteralRef {
    chunk: u32,
    offset: u32,
    len: u32,
}

impl LiteralRef {
    /// Length of the referenced block in bytes.
    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Append-only byte arena. Blocks stay put until the arena is dropped.
#[derive(Debug)]
pub struct LiteralArena {
    chunks: Vec<Vec<u8>>,
    chunk_size: usize,
    /// Capacity requested for the last chunk.
    chunk_limit: usize,
    blocks: usize,
    bytes: usize,
}

impl LiteralArena {
    /// Creates an arena using [`DEFAULT_CHUNK_SIZE`].
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Creates an arena whose regular chunks hold `chunk_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "arena chunk size must be non-zero");
        Self {
            chunks: Vec::new(),
            chunk_size,
            chunk_limit: 0,
            blocks: 0,
            bytes: 0,
        }
    }

    /// Copies `block` into the arena and returns a handle to the copy.
    pub fn add_block(&mut self, block: &[u8]) -> LiteralRef {
        assert!(
            block.len() <= u32::MAX as usize,
            "literal of {} bytes exceeds arena limit",
            block.len()
        );
        let len = block.len() as u32;

        let fits = self
            .chunks
            .last()
            .is_some_and(|chunk| chunk.len() + block.len() <= self.chunk_limit);
        if !fits {
            self.chunk_limit = self.chunk_size.max(block.len());
            self.chunks.push(Vec::with_capacity(self.chunk_limit));
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        let offset = chunk.len() as u32;
        // Stays within the requested capacity, so the chunk is not reallocated.
        chunk.extend_from_slice(block);

        self.blocks += 1;
        self.bytes += block.len();

        LiteralRef {
            chunk: chunk_index as u32,
            offset,
            len,
        }
    }

    /// Returns the bytes behind `literal`.
    ///
    /// # Panics
    ///
    /// Panics if `literal` was not produced by this arena.
    #[inline]
    pub fn get(&self, literal: LiteralRef) -> &[u8] {
        let start = literal.offset as usize;
        &self.chunks[literal.chunk as usize][start..start + literal.len()]
    }

    /// Checked variant of [`get`](Self::get).
    pub fn try_get(&self, literal: LiteralRef) -> ArenaResult<&[u8]> {
        let chunk = self
            .chunks
            .get(literal.chunk as usize)
            .ok_or(ArenaError::UnknownChunk {
                chunk: literal.chunk,
                chunk_count: self.chunks.len(),
            })?;
        let start = literal.offset as usize;
        let end = start + literal.len();
        chunk.get(start..end).ok_or(ArenaError::OutOfBounds {
            chunk: literal.chunk,
            offset: literal.offset,
            end,
            chunk_len: chunk.len(),
        })
    }

    /// Number of blocks stored.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks
    }

    /// Total payload bytes stored across all blocks.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for LiteralArena {
    fn default() -> Self {
        Self::new()
    }
}
