//! Wire layout of the preparse data buffer.
//!
//! ```text
//! cell 0                6                6 + functions_size
//!      [ preamble (6) ][ function region ][ symbol region (bytes as cells) ]
//! ```
//!
//! Every cell is a host-endian `u32`. The symbol region is absent when the
//! error flag is set.

use static_assertions::const_assert_eq;

/// Width of one output cell in bytes.
pub const CELL_SIZE: usize = std::mem::size_of::<u32>();

/// Identifies a preparse data buffer.
pub const MAGIC_NUMBER: u32 = 0x0BAD_DEAD;

/// Bumped whenever the layout changes; readers reject other versions.
pub const CURRENT_VERSION: u32 = 7;

/// Number of cells in the preamble.
pub const HEADER_SIZE: usize = 6;

/// Filler byte used to pad the symbol region to a cell boundary.
///
/// It carries the continuation bit, so it can never end an encoded number.
pub const NUMBER_TERMINATOR: u8 = 0x80;

// Preamble field offsets.
pub const MAGIC_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 1;
pub const HAS_ERROR_OFFSET: usize = 2;
pub const FUNCTIONS_SIZE_OFFSET: usize = 3;
pub const SYMBOL_COUNT_OFFSET: usize = 4;
pub const SIZE_OFFSET: usize = 5;

// Error message layout within the function region.
pub const MESSAGE_START_POS: usize = 0;
pub const MESSAGE_END_POS: usize = 1;
pub const MESSAGE_ARG_COUNT_POS: usize = 2;
pub const IS_REFERENCE_ERROR_POS: usize = 3;
pub const MESSAGE_TEXT_POS: usize = 4;

// Function entry layout within the function region.
pub const FUNCTION_START_OFFSET: usize = 0;
pub const FUNCTION_END_OFFSET: usize = 1;
pub const FUNCTION_LITERAL_COUNT_OFFSET: usize = 2;
pub const FUNCTION_PROPERTY_COUNT_OFFSET: usize = 3;
pub const FUNCTION_LANGUAGE_MODE_OFFSET: usize = 4;
pub const FUNCTION_ENTRY_SIZE: usize = 5;

const_assert_eq!(HEADER_SIZE, 6);
const_assert_eq!(SIZE_OFFSET + 1, HEADER_SIZE);
const_assert_eq!(MESSAGE_TEXT_POS, 4);
const_assert_eq!(FUNCTION_LANGUAGE_MODE_OFFSET + 1, FUNCTION_ENTRY_SIZE);
const_assert_eq!(CELL_SIZE, 4);

/// Strictness of a recorded function body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum LanguageMode {
    #[default]
    Sloppy = 0,
    Strict = 1,
}

impl LanguageMode {
    #[inline]
    pub fn as_cell(self) -> u32 {
        self as u32
    }

    /// Decodes a mode cell, returning `None` for unknown values.
    pub fn from_cell(cell: u32) -> Option<Self> {
        match cell {
            0 => Some(LanguageMode::Sloppy),
            1 => Some(LanguageMode::Strict),
            _ => None,
        }
    }
}

/// The fixed six-cell header at the start of every buffer.
///
/// `symbol_count` is filled in even when `has_error` is set, although no
/// symbol region follows in that case. Readers must ignore it then.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preamble {
    pub magic: u32,
    pub version: u32,
    pub has_error: bool,
    pub functions_size: u32,
    pub symbol_count: u32,
    /// Reserved; always written as 0.
    pub size: u32,
}

impl Preamble {
    /// A preamble for an empty recording.
    pub const fn new() -> Self {
        Self {
            magic: MAGIC_NUMBER,
            version: CURRENT_VERSION,
            has_error: false,
            functions_size: 0,
            symbol_count: 0,
            size: 0,
        }
    }

    /// Lays the fields out in wire order.
    pub fn to_cells(&self) -> [u32; HEADER_SIZE] {
        let mut cells = [0u32; HEADER_SIZE];
        cells[MAGIC_OFFSET] = self.magic;
        cells[VERSION_OFFSET] = self.version;
        cells[HAS_ERROR_OFFSET] = u32::from(self.has_error);
        cells[FUNCTIONS_SIZE_OFFSET] = self.functions_size;
        cells[SYMBOL_COUNT_OFFSET] = self.symbol_count;
        cells[SIZE_OFFSET] = self.size;
        cells
    }

    /// Reads the fields back without validating them.
    pub fn from_cells(cells: &[u32; HEADER_SIZE]) -> Self {
        Self {
            magic: cells[MAGIC_OFFSET],
            version: cells[VERSION_OFFSET],
            has_error: cells[HAS_ERROR_OFFSET] != 0,
            functions_size: cells[FUNCTIONS_SIZE_OFFSET],
            symbol_count: cells[SYMBOL_COUNT_OFFSET],
            size: cells[SIZE_OFFSET],
        }
    }
}

impl Default for Preamble {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of a symbol byte stream after terminator padding.
///
/// At least one terminator is always appended, so an already aligned stream
/// grows by a full cell.
#[inline]
pub fn padded_symbol_len(len: usize) -> usize {
    len + (CELL_SIZE - len % CELL_SIZE)
}
