//! preparse-data - Compact record of a single scan
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! A scanner makes one forward pass over a source text and reports what it
//! finds to a [`Recorder`]: function bodies, every occurrence of an
//! identifier or literal, and at most one scan error. When the scan is done,
//! [`Recorder::extract_data`] lays everything out in a single buffer of `u32`
//! cells that a later consumer reads instead of scanning again.
//!
//! ```text
//! scanner --log_*--> Recorder --extract_data--> Vec<u32> --> consumer
//! ```
//!
//! # Modules
//!
//! - [`format`] - wire constants and the six-cell [`Preamble`]
//! - [`varint`] - 7-bit variable-length encoding of symbol ids
//! - [`symbol`] - content-addressed [`SymbolTable`] with first-seen ids
//! - [`recorder`] - the [`Recorder`] and the [`ParserRecorder`] seam
//! - [`view`] - [`PreparseView`], a validating reader used to check output
//! - [`config`] - [`RecorderConfig`] buffer sizing
//!
//! # Example
//!
//! ```
//! use preparse_data::{PreparseView, Recorder};
//!
//! let mut recorder = Recorder::new();
//! recorder.log_one_byte_symbol(0, b"x");
//! recorder.log_message(5, 10, "unexpected token", None, false);
//!
//! let data = recorder.extract_data();
//! let view = PreparseView::new(&data).unwrap();
//! assert!(view.has_error());
//! assert_eq!(view.message().unwrap().unwrap().text, "unexpected token");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod recorder;
pub mod symbol;
pub mod varint;
pub mod view;

pub use config::{ConfigError, RecorderConfig};
pub use error::{FormatError, FormatResult};
pub use format::{LanguageMode, Preamble};
pub use recorder::{ParserRecorder, Recorder};
pub use symbol::{SymbolId, SymbolKey, SymbolTable, SymbolTableStats};
pub use view::{FunctionEntry, PreparseView, RecordedMessage};
