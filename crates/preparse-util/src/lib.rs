//! preparse-util - Storage primitives for the preparse data recorder
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! The recorder accumulates three independent streams while a scan runs and
//! linearizes them once at the end. This crate holds the containers those
//! streams live in. None of them know anything about the wire format.
//!
//! - [`AppendBuffer`] - growable append-only cells with bulk copy-out
//! - [`LiteralArena`] - chunked byte storage whose blocks never move
//! - [`IndexVec`] - vector addressed by a typed index
//!
//! All containers are single-owner and append-only. Appends cannot fail;
//! checked reads report [`error::IndexVecError`] or [`error::ArenaError`].

pub mod append_buffer;
pub mod arena;
pub mod error;
pub mod index_vec;

pub use append_buffer::AppendBuffer;
pub use arena::{LiteralArena, LiteralRef, DEFAULT_CHUNK_SIZE};
pub use error::{ArenaError, ArenaResult, IndexVecError, IndexVecResult};
pub use index_vec::{Idx, IndexVec};
