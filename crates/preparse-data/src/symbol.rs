//! Content-addressed symbol table.
//!
//! Each distinct literal gets a 1-based [`SymbolId`] in first-occurrence
//! order. Two literals are the same symbol only if both their width flag and
//! their raw bytes match, so a narrow literal and a wide literal with the same
//! byte pattern stay distinct.
//!
//! # Structure
//!
//! ```text
//! heads: hash -> newest SymbolId with that hash
//! slots: SymbolId -> { is_wide, literal, next }   (next = older id, same hash)
//! literals: LiteralArena holding one copy of each distinct literal
//! ```
//!
//! Lookups walk the chain for a hash and compare flag and bytes, so hash
//! collisions never merge distinct symbols.

use std::fmt;
use std::num::NonZeroU32;

use preparse_util::{Idx, IndexVec, LiteralArena, LiteralRef};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Identifier of a distinct symbol. Ids start at 1; 0 is never assigned.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(NonZeroU32);

impl SymbolId {
    /// The first id handed out.
    pub const FIRST: SymbolId = SymbolId(NonZeroU32::MIN);

    /// Wraps a raw 1-based id. Returns `None` for 0.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(SymbolId)
    }

    /// The 1-based id.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The zero-based value written to the symbol region.
    #[inline]
    pub fn wire_value(self) -> u32 {
        self.0.get() - 1
    }
}

impl Idx for SymbolId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx < u32::MAX as usize, "symbol id overflow at slot {}", idx);
        SymbolId(NonZeroU32::MIN.saturating_add(idx as u32))
    }

    fn index(self) -> usize {
        self.wire_value() as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.get())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A literal as seen by the table: width flag plus raw bytes.
///
/// Wide literals are passed as the native-endian bytes of their code units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolKey<'a> {
    pub is_wide: bool,
    pub bytes: &'a [u8],
}

impl<'a> SymbolKey<'a> {
    #[inline]
    pub fn one_byte(bytes: &'a [u8]) -> Self {
        Self {
            is_wide: false,
            bytes,
        }
    }

    #[inline]
    pub fn two_byte(bytes: &'a [u8]) -> Self {
        Self {
            is_wide: true,
            bytes,
        }
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        literal_hash(self.bytes)
    }
}

/// Order-sensitive running hash over raw literal bytes.
pub fn literal_hash(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |hash, &byte| {
        let hash = hash.wrapping_add(u32::from(byte));
        let hash = hash.wrapping_add(hash << 10);
        hash ^ (hash >> 6)
    })
}

/// Appends the native-endian bytes of `units` to `out`.
pub fn widen_into(units: &[u16], out: &mut Vec<u8>) {
    out.reserve(units.len() * 2);
    for unit in units {
        out.extend_from_slice(&unit.to_ne_bytes());
    }
}

#[derive(Clone, Copy, Debug)]
struct SymbolSlot {
    is_wide: bool,
    literal: LiteralRef,
    next: Option<SymbolId>,
}

/// Table statistics, useful when profiling scans.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolTableStats {
    /// Distinct symbols stored.
    pub count: usize,
    /// Bytes held by the literal arena.
    pub literal_bytes: usize,
    /// Lookups that found an existing symbol.
    pub hits: usize,
    /// Lookups that assigned a new id.
    pub misses: usize,
    /// New symbols whose hash was already taken by another symbol.
    pub collisions: usize,
}

/// Maps literal content to stable, first-occurrence-ordered ids.
#[derive(Debug)]
pub struct SymbolTable {
    heads: FxHashMap<u32, SymbolId>,
    slots: IndexVec<SymbolId, SymbolSlot>,
    literals: LiteralArena,
    hits: usize,
    misses: usize,
    collisions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_capacity(0, preparse_util::DEFAULT_CHUNK_SIZE)
    }

    /// Creates a table sized for `symbols` distinct literals, storing literal
    /// bytes in arena chunks of `chunk_size` bytes.
    pub fn with_capacity(symbols: usize, chunk_size: usize) -> Self {
        Self {
            heads: FxHashMap::with_capacity_and_hasher(symbols, Default::default()),
            slots: IndexVec::with_capacity(symbols),
            literals: LiteralArena::with_chunk_size(chunk_size),
            hits: 0,
            misses: 0,
            collisions: 0,
        }
    }

    /// Returns the id of `key`, if it was interned before.
    pub fn lookup(&self, key: SymbolKey<'_>) -> Option<SymbolId> {
        self.find(key, key.hash())
    }

    /// Returns the id of `key`, assigning the next id on first sight.
    ///
    /// A new literal is copied into the arena, so `key.bytes` may be dropped
    /// or reused once this returns.
    pub fn intern(&mut self, key: SymbolKey<'_>) -> SymbolId {
        let hash = key.hash();
        if let Some(id) = self.find(key, hash) {
            self.hits += 1;
            return id;
        }

        self.misses += 1;
        let previous = self.heads.get(&hash).copied();
        if previous.is_some() {
            self.collisions += 1;
        }

        let literal = self.literals.add_block(key.bytes);
        let id = self.slots.push(SymbolSlot {
            is_wide: key.is_wide,
            literal,
            next: previous,
        });
        self.heads.insert(hash, id);
        trace!(id = id.get(), is_wide = key.is_wide, len = key.bytes.len(), "new symbol");
        id
    }

    fn find(&self, key: SymbolKey<'_>, hash: u32) -> Option<SymbolId> {
        let mut cursor = self.heads.get(&hash).copied();
        while let Some(id) = cursor {
            let slot = &self.slots[id];
            if slot.is_wide == key.is_wide && self.literals.get(slot.literal) == key.bytes {
                return Some(id);
            }
            cursor = slot.next;
        }
        None
    }

    /// Returns the stored key for `id`.
    pub fn key(&self, id: SymbolId) -> Option<SymbolKey<'_>> {
        self.slots.get(id).map(|slot| SymbolKey {
            is_wide: slot.is_wide,
            bytes: self.literals.get(slot.literal),
        })
    }

    /// Number of distinct symbols, which is also the highest assigned id.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The id the next new symbol will receive.
    #[inline]
    pub fn next_id(&self) -> SymbolId {
        self.slots.next_index()
    }

    /// The arena backing the stored literals.
    #[inline]
    pub fn literals(&self) -> &LiteralArena {
        &self.literals
    }

    pub fn stats(&self) -> SymbolTableStats {
        SymbolTableStats {
            count: self.slots.len(),
            literal_bytes: self.literals.byte_len(),
            hits: self.hits,
            misses: self.misses,
            collisions: self.collisions,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
