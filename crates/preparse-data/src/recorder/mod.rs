//! The recorder - collects one scan's preparse data and lays it out.
//!
//! # Streams
//!
//! - **Function region** (`u32` cells): one five-cell entry per function the
//!   scanner reports, or, once a scan error is logged, only that error
//!   message. The message replaces everything logged before it.
//! - **Symbol region** (bytes): one varint per symbol occurrence, holding the
//!   zero-based id. Repeated symbols repeat their id; only storage and id
//!   assignment are deduplicated.
//! - **Symbol table**: literal content to id, backed by a literal arena.
//!
//! # Errors
//!
//! The first [`log_message`](Recorder::log_message) wins. Later messages are
//! ignored, and [`extract_data`](Recorder::extract_data) leaves out the symbol
//! region. The header still carries the symbol count reached before the
//! error; readers must not rely on it when the error flag is set.
//!
//! # Example
//!
//! ```
//! use preparse_data::{PreparseView, Recorder};
//!
//! let mut recorder = Recorder::new();
//! recorder.log_one_byte_symbol(0, b"foo");
//! recorder.log_one_byte_symbol(4, b"bar");
//! recorder.log_one_byte_symbol(8, b"foo");
//!
//! let data = recorder.extract_data();
//! let view = PreparseView::new(&data).unwrap();
//! assert_eq!(view.preamble().symbol_count, 2);
//! assert_eq!(view.symbol_ids(3).unwrap(), vec![0, 1, 0]);
//! ```

use preparse_util::AppendBuffer;
use tracing::{debug, trace};

use crate::config::{ConfigError, RecorderConfig};
use crate::format::{
    padded_symbol_len, LanguageMode, Preamble, CELL_SIZE, HEADER_SIZE, NUMBER_TERMINATOR,
};
use crate::symbol::{widen_into, SymbolId, SymbolKey, SymbolTable};
use crate::varint::write_number;

/// The scanner-facing side of a recorder.
///
/// Positions are source offsets supplied by the scanner; they are stored as
/// given and never validated.
pub trait ParserRecorder {
    /// Records a function body spanning `start..end`.
    fn log_function(
        &mut self,
        start: u32,
        end: u32,
        literals: u32,
        properties: u32,
        language_mode: LanguageMode,
    );

    /// Records a scan error. Only the first call has any effect.
    fn log_message(
        &mut self,
        start: u32,
        end: u32,
        message: &str,
        arg: Option<&str>,
        is_reference_error: bool,
    );

    /// Records an occurrence of a one-byte literal.
    fn log_one_byte_symbol(&mut self, position: u32, literal: &[u8]) -> SymbolId;

    /// Records an occurrence of a two-byte literal.
    fn log_two_byte_symbol(&mut self, position: u32, literal: &[u16]) -> SymbolId;

    /// Current size of the function region in cells.
    fn function_position(&self) -> usize;

    /// Current size of the symbol region in bytes.
    fn symbol_position(&self) -> usize;

    /// Number of distinct symbols assigned so far.
    fn symbol_ids(&self) -> u32;

    fn has_error(&self) -> bool;
}

/// Accumulates function entries, an optional error and the symbol stream of a
/// single scan.
///
/// Not meant for sharing: one recorder per scan, fed sequentially.
#[derive(Debug)]
pub struct Recorder {
    has_error: bool,
    function_store: AppendBuffer<u32>,
    symbol_store: AppendBuffer<u8>,
    symbols: SymbolTable,
    /// Reused for the byte view of two-byte literals.
    wide_scratch: Vec<u8>,
}

impl Recorder {
    /// Creates a recorder with default capacities.
    pub fn new() -> Self {
        Self::from_valid_config(&RecorderConfig::default())
    }

    /// Creates a recorder presized by `config`.
    pub fn with_config(config: &RecorderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: &RecorderConfig) -> Self {
        Self {
            has_error: false,
            function_store: AppendBuffer::with_capacity(config.function_capacity),
            symbol_store: AppendBuffer::with_capacity(config.symbol_capacity),
            symbols: SymbolTable::with_capacity(
                config.expected_symbols,
                config.literal_chunk_size,
            ),
            wide_scratch: Vec::new(),
        }
    }

    /// True once a scan error has been recorded. Never resets.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Appends a function entry `[start, end, literals, properties, mode]`.
    ///
    /// Ignored after an error, since the function region then belongs to the
    /// message.
    pub fn log_function(
        &mut self,
        start: u32,
        end: u32,
        literals: u32,
        properties: u32,
        language_mode: LanguageMode,
    ) {
        if self.has_error {
            trace!(start, end, "ignoring function after error");
            return;
        }
        self.function_store.add_block(&[
            start,
            end,
            literals,
            properties,
            language_mode.as_cell(),
        ]);
    }

    /// Records a scan error spanning `start..end`.
    ///
    /// Discards the function region and writes
    /// `[start, end, arg_count, is_reference_error, len, bytes..., (len, bytes...)?]`,
    /// one byte per cell. A no-op if an error was already recorded.
    pub fn log_message(
        &mut self,
        start: u32,
        end: u32,
        message: &str,
        arg: Option<&str>,
        is_reference_error: bool,
    ) {
        if self.has_error {
            trace!(
                start,
                end,
                text = message,
                "ignoring message after first error"
            );
            return;
        }
        self.has_error = true;
        debug!(
            start,
            end,
            text = message,
            ?arg,
            is_reference_error,
            "recording scan error"
        );

        self.function_store.reset();
        self.function_store.add(start);
        self.function_store.add(end);
        self.function_store.add(u32::from(arg.is_some()));
        self.function_store.add(u32::from(is_reference_error));
        self.write_string(message);
        if let Some(arg) = arg {
            self.write_string(arg);
        }
    }

    fn write_string(&mut self, text: &str) {
        let bytes = text.as_bytes();
        assert!(
            bytes.len() <= u32::MAX as usize,
            "message of {} bytes does not fit a length cell",
            bytes.len()
        );
        self.function_store.add(bytes.len() as u32);
        for &byte in bytes {
            self.function_store.add(u32::from(byte));
        }
    }

    /// Records an occurrence of a one-byte literal and returns its id.
    ///
    /// `position` is part of the scanner interface but is not stored.
    pub fn log_one_byte_symbol(&mut self, _position: u32, literal: &[u8]) -> SymbolId {
        self.log_symbol(SymbolKey::one_byte(literal))
    }

    /// Records an occurrence of a two-byte literal and returns its id.
    ///
    /// The code units are compared and stored as their native-endian bytes.
    /// `position` is part of the scanner interface but is not stored.
    pub fn log_two_byte_symbol(&mut self, _position: u32, literal: &[u16]) -> SymbolId {
        let mut scratch = std::mem::take(&mut self.wide_scratch);
        scratch.clear();
        widen_into(literal, &mut scratch);
        let id = self.log_symbol(SymbolKey::two_byte(&scratch));
        self.wide_scratch = scratch;
        id
    }

    fn log_symbol(&mut self, key: SymbolKey<'_>) -> SymbolId {
        let id = self.symbols.intern(key);
        write_number(&mut self.symbol_store, id.wire_value());
        id
    }

    /// Current size of the function region in cells.
    #[inline]
    pub fn function_position(&self) -> usize {
        self.function_store.len()
    }

    /// Current size of the symbol region in bytes, before padding.
    #[inline]
    pub fn symbol_position(&self) -> usize {
        self.symbol_store.len()
    }

    /// Number of distinct symbols assigned so far.
    #[inline]
    pub fn symbol_ids(&self) -> u32 {
        self.symbols.len() as u32
    }

    /// The symbol table, for inspection.
    #[inline]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The header [`extract_data`](Self::extract_data) would write now.
    pub fn preamble(&self) -> Preamble {
        Preamble {
            has_error: self.has_error,
            functions_size: self.function_store.len() as u32,
            symbol_count: self.symbol_ids(),
            ..Preamble::new()
        }
    }

    /// Lays out header, function region and (without an error) the padded
    /// symbol region in one freshly allocated buffer.
    ///
    /// Does not modify the recorder; calling it twice without logging in
    /// between yields identical buffers.
    pub fn extract_data(&self) -> Vec<u32> {
        let function_size = self.function_store.len();
        let symbol_bytes = if self.has_error {
            0
        } else {
            padded_symbol_len(self.symbol_store.len())
        };
        let symbol_start = HEADER_SIZE + function_size;
        let total_size = symbol_start + symbol_bytes / CELL_SIZE;

        let mut data = vec![0u32; total_size];
        data[..HEADER_SIZE].copy_from_slice(&self.preamble().to_cells());
        self.function_store.write_to(&mut data[HEADER_SIZE..symbol_start]);

        if !self.has_error {
            let mut padded = Vec::with_capacity(symbol_bytes);
            padded.extend_from_slice(self.symbol_store.as_slice());
            padded.resize(symbol_bytes, NUMBER_TERMINATOR);
            for (cell, bytes) in data[symbol_start..]
                .iter_mut()
                .zip(padded.chunks_exact(CELL_SIZE))
            {
                *cell = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
        }

        debug!(
            total_size,
            function_size,
            symbol_bytes,
            symbol_count = self.symbol_ids(),
            has_error = self.has_error,
            "extracted preparse data"
        );
        data
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserRecorder for Recorder {
    fn log_function(
        &mut self,
        start: u32,
        end: u32,
        literals: u32,
        properties: u32,
        language_mode: LanguageMode,
    ) {
        Recorder::log_function(self, start, end, literals, properties, language_mode)
    }

    fn log_message(
        &mut self,
        start: u32,
        end: u32,
        message: &str,
        arg: Option<&str>,
        is_reference_error: bool,
    ) {
        Recorder::log_message(self, start, end, message, arg, is_reference_error)
    }

    fn log_one_byte_symbol(&mut self, position: u32, literal: &[u8]) -> SymbolId {
        Recorder::log_one_byte_symbol(self, position, literal)
    }

    fn log_two_byte_symbol(&mut self, position: u32, literal: &[u16]) -> SymbolId {
        Recorder::log_two_byte_symbol(self, position, literal)
    }

    fn function_position(&self) -> usize {
        Recorder::function_position(self)
    }

    fn symbol_position(&self) -> usize {
        Recorder::symbol_position(self)
    }

    fn symbol_ids(&self) -> u32 {
        Recorder::symbol_ids(self)
    }

    fn has_error(&self) -> bool {
        Recorder::has_error(self)
    }
}

#[cfg(test)]
mod tests;
