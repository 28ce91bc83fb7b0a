//! IndexVec - a vector addressed by a typed index.
//!
//! The symbol table keeps one key per assigned id. Storing those keys in an
//! [`IndexVec`] keyed by the id type means the id handed out on insertion is
//! the only way to reach the key again, and ids from another index space
//! cannot be used by mistake.
//!
//! # Example
//!
//! ```
//! use preparse_util::index_vec::{Idx, IndexVec};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! struct SlotId(u32);
//!
//! impl Idx for SlotId {
//!     fn from_usize(idx: usize) -> Self { SlotId(idx as u32) }
//!     fn index(self) -> usize { self.0 as usize }
//! }
//!
//! let mut slots: IndexVec<SlotId, &str> = IndexVec::new();
//! let id = slots.push("foo");
//! assert_eq!(slots[id], "foo");
//! ```

use std::marker::PhantomData;
use std::ops::Index;

use crate::error::{IndexVecError, IndexVecResult};

/// Conversion between a typed index and the raw `usize` position.
///
/// Implementations may encode an offset (for example a 1-based id stored at
/// position `id - 1`) as long as `from_usize` and `index` are inverses.
pub trait Idx: Copy + Eq {
    /// Converts a raw position into the index type.
    ///
    /// # Panics
    ///
    /// Implementations may panic if the position does not fit.
    fn from_usize(idx: usize) -> Self;

    /// Returns the raw position of this index.
    fn index(self) -> usize;
}

impl Idx for usize {
    #[inline]
    fn from_usize(idx: usize) -> Self {
        idx
    }

    #[inline]
    fn index(self) -> usize {
        self
    }
}

/// A vector indexed by `I` instead of `usize`.
///
/// Append-only by design: elements are pushed and read, never removed, so an
/// index handed out by [`IndexVec::push`] stays valid for the vector's
/// lifetime.
#[derive(Clone, Debug)]
pub struct IndexVec<I, T> {
    raw: Vec<T>,
    _marker: PhantomData<fn(&I)>,
}

impl<I, T> IndexVec<I, T> {
    /// Creates an empty vector.
    #[inline]
    pub fn new() -> Self {
        Self {
            raw: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for `capacity` elements.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: Vec::with_capacity(capacity),
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if no element has been pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    /// Iterates over elements in index order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.raw.iter()
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    /// Appends `value` and returns the index it was stored at.
    #[inline]
    pub fn push(&mut self, value: T) -> I {
        let index = self.raw.len();
        self.raw.push(value);
        I::from_usize(index)
    }

    /// Returns the index the next [`push`](Self::push) will hand out.
    #[inline]
    pub fn next_index(&self) -> I {
        I::from_usize(self.raw.len())
    }

    #[inline]
    pub fn get(&self, index: I) -> Option<&T> {
        self.raw.get(index.index())
    }

    /// Checked access reporting the offending position on failure.
    pub fn try_get(&self, index: I) -> IndexVecResult<&T> {
        let position = index.index();
        self.raw.get(position).ok_or(IndexVecError::OutOfBounds {
            index: position,
            length: self.raw.len(),
        })
    }

    /// Iterates over `(index, element)` pairs in index order.
    #[inline]
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> {
        self.raw
            .iter()
            .enumerate()
            .map(|(i, v)| (I::from_usize(i), v))
    }
}

impl<I: Idx, T> Index<I> for IndexVec<I, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: I) -> &T {
        &self.raw[index.index()]
    }
}

impl<I, T> Default for IndexVec<I, T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
