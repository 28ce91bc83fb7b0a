//! Read-only view over a produced buffer.
//!
//! The consumer of preparse data lives elsewhere; this view exists so that
//! buffers can be checked against the layout in [`crate::format`], and it
//! applies the same compatibility guards a consumer would: magic, version
//! and region bounds.

use crate::error::{FormatError, FormatResult};
use crate::format::{
    LanguageMode, Preamble, CELL_SIZE, CURRENT_VERSION, FUNCTION_END_OFFSET, FUNCTION_ENTRY_SIZE,
    FUNCTION_LANGUAGE_MODE_OFFSET, FUNCTION_LITERAL_COUNT_OFFSET, FUNCTION_PROPERTY_COUNT_OFFSET,
    FUNCTION_START_OFFSET, HEADER_SIZE, IS_REFERENCE_ERROR_POS, MAGIC_NUMBER,
    MESSAGE_ARG_COUNT_POS, MESSAGE_END_POS, MESSAGE_START_POS, MESSAGE_TEXT_POS,
};
use crate::varint::read_number;

/// A scan error as stored in the function region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedMessage {
    pub start: u32,
    pub end: u32,
    pub text: String,
    pub arg: Option<String>,
    pub is_reference_error: bool,
}

/// One function entry from the function region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionEntry {
    pub start: u32,
    pub end: u32,
    pub literals: u32,
    pub properties: u32,
    pub language_mode: LanguageMode,
}

/// Validated view over a preparse data buffer.
#[derive(Clone, Copy, Debug)]
pub struct PreparseView<'a> {
    data: &'a [u32],
    preamble: Preamble,
}

impl<'a> PreparseView<'a> {
    /// Checks the preamble and region bounds of `data`.
    pub fn new(data: &'a [u32]) -> FormatResult<Self> {
        let header: &[u32; HEADER_SIZE] = data
            .get(..HEADER_SIZE)
            .and_then(|cells| cells.try_into().ok())
            .ok_or(FormatError::Truncated {
                len: data.len(),
                needed: HEADER_SIZE,
            })?;
        let preamble = Preamble::from_cells(header);

        if preamble.magic != MAGIC_NUMBER {
            return Err(FormatError::BadMagic {
                found: preamble.magic,
            });
        }
        if preamble.version != CURRENT_VERSION {
            return Err(FormatError::VersionMismatch {
                found: preamble.version,
                expected: CURRENT_VERSION,
            });
        }

        let functions_size = preamble.functions_size as usize;
        let available = data.len() - HEADER_SIZE;
        if functions_size > available {
            return Err(FormatError::FunctionRegionOverflow {
                functions_size,
                available,
            });
        }

        Ok(Self { data, preamble })
    }

    #[inline]
    pub fn preamble(&self) -> Preamble {
        self.preamble
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.preamble.has_error
    }

    /// The function region cells.
    pub fn function_region(&self) -> &'a [u32] {
        &self.data[HEADER_SIZE..self.symbol_start()]
    }

    /// The symbol region as bytes, padding included. Empty when the error
    /// flag is set.
    pub fn symbol_region(&self) -> Vec<u8> {
        if self.has_error() {
            return Vec::new();
        }
        let cells = &self.data[self.symbol_start()..];
        let mut bytes = Vec::with_capacity(cells.len() * CELL_SIZE);
        for cell in cells {
            bytes.extend_from_slice(&cell.to_ne_bytes());
        }
        bytes
    }

    /// Decodes the first `count` symbol ids (zero-based, as written).
    pub fn symbol_ids(&self, count: usize) -> FormatResult<Vec<u32>> {
        let bytes = self.symbol_region();
        let mut position = 0;
        let mut ids = Vec::with_capacity(count);
        while ids.len() < count {
            match read_number(&bytes, &mut position) {
                Some(id) => ids.push(id),
                None => {
                    return Err(FormatError::TruncatedSymbols {
                        decoded: ids.len(),
                        expected: count,
                    })
                }
            }
        }
        Ok(ids)
    }

    /// Decodes every id in the symbol region, stopping at the padding.
    pub fn all_symbol_ids(&self) -> Vec<u32> {
        let bytes = self.symbol_region();
        let mut position = 0;
        std::iter::from_fn(|| read_number(&bytes, &mut position)).collect()
    }

    /// The recorded error, if the error flag is set.
    pub fn message(&self) -> FormatResult<Option<RecordedMessage>> {
        if !self.has_error() {
            return Ok(None);
        }
        let region = self.function_region();
        if region.len() <= MESSAGE_TEXT_POS {
            return Err(FormatError::MalformedMessage(format!(
                "{} cells cannot hold a message header",
                region.len()
            )));
        }

        let mut cursor = MESSAGE_TEXT_POS;
        let text = read_string(region, &mut cursor)?;
        let arg = match region[MESSAGE_ARG_COUNT_POS] {
            0 => None,
            1 => Some(read_string(region, &mut cursor)?),
            n => {
                return Err(FormatError::MalformedMessage(format!(
                    "argument count {} is not 0 or 1",
                    n
                )))
            }
        };
        if cursor != region.len() {
            return Err(FormatError::MalformedMessage(format!(
                "{} trailing cells after message",
                region.len() - cursor
            )));
        }

        Ok(Some(RecordedMessage {
            start: region[MESSAGE_START_POS],
            end: region[MESSAGE_END_POS],
            text,
            arg,
            is_reference_error: region[IS_REFERENCE_ERROR_POS] != 0,
        }))
    }

    /// The function entries. Empty when the error flag is set.
    pub fn function_entries(&self) -> FormatResult<Vec<FunctionEntry>> {
        if self.has_error() {
            return Ok(Vec::new());
        }
        let region = self.function_region();
        if region.len() % FUNCTION_ENTRY_SIZE != 0 {
            return Err(FormatError::RaggedFunctionRegion {
                len: region.len(),
                entry_size: FUNCTION_ENTRY_SIZE,
            });
        }

        region
            .chunks_exact(FUNCTION_ENTRY_SIZE)
            .map(|entry| {
                let mode = entry[FUNCTION_LANGUAGE_MODE_OFFSET];
                Ok(FunctionEntry {
                    start: entry[FUNCTION_START_OFFSET],
                    end: entry[FUNCTION_END_OFFSET],
                    literals: entry[FUNCTION_LITERAL_COUNT_OFFSET],
                    properties: entry[FUNCTION_PROPERTY_COUNT_OFFSET],
                    language_mode: LanguageMode::from_cell(mode)
                        .ok_or(FormatError::UnknownLanguageMode(mode))?,
                })
            })
            .collect()
    }

    fn symbol_start(&self) -> usize {
        HEADER_SIZE + self.preamble.functions_size as usize
    }
}

fn read_string(region: &[u32], cursor: &mut usize) -> FormatResult<String> {
    let len = *region.get(*cursor).ok_or_else(|| {
        FormatError::MalformedMessage(format!("missing length cell at {}", cursor))
    })? as usize;
    let start = *cursor + 1;
    let cells = region.get(start..start + len).ok_or_else(|| {
        FormatError::MalformedMessage(format!(
            "string of {} cells at {} overruns the region",
            len, start
        ))
    })?;

    let bytes = cells
        .iter()
        .map(|&cell| {
            u8::try_from(cell).map_err(|_| {
                FormatError::MalformedMessage(format!("cell value {} is not a byte", cell))
            })
        })
        .collect::<FormatResult<Vec<u8>>>()?;

    *cursor = start + len;
    String::from_utf8(bytes).map_err(|e| FormatError::MalformedMessage(e.to_string()))
}
