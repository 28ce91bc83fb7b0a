//! Tests for the recorder module.

use super::*;
use crate::format::{CURRENT_VERSION, FUNCTION_ENTRY_SIZE, MAGIC_NUMBER};

fn cells(text: &str) -> Vec<u32> {
    text.bytes().map(u32::from).collect()
}

// ============================================================================
// SYMBOLS
// ============================================================================

#[test]
fn test_new_recorder_is_empty() {
    let recorder = Recorder::new();
    assert!(!recorder.has_error());
    assert_eq!(recorder.function_position(), 0);
    assert_eq!(recorder.symbol_position(), 0);
    assert_eq!(recorder.symbol_ids(), 0);
}

#[test]
fn test_repeated_symbol_reuses_id() {
    let mut recorder = Recorder::new();
    let foo = recorder.log_one_byte_symbol(0, b"foo");
    let bar = recorder.log_one_byte_symbol(4, b"bar");
    let foo_again = recorder.log_one_byte_symbol(8, b"foo");

    assert_eq!(foo.wire_value(), 0);
    assert_eq!(bar.wire_value(), 1);
    assert_eq!(foo_again, foo);
    assert_eq!(recorder.symbol_ids(), 2);
    // Every occurrence is written, one byte each.
    assert_eq!(recorder.symbol_position(), 3);
    assert_eq!(recorder.symbols().literals().block_count(), 2);
}

#[test]
fn test_position_is_not_part_of_identity() {
    let mut recorder = Recorder::new();
    let a = recorder.log_one_byte_symbol(0, b"x");
    let b = recorder.log_one_byte_symbol(1000, b"x");
    assert_eq!(a, b);
}

#[test]
fn test_wide_and_narrow_are_distinct() {
    let mut recorder = Recorder::new();
    let narrow = recorder.log_one_byte_symbol(0, &[0x41, 0x41]);
    let wide = recorder.log_two_byte_symbol(0, &[0x4141]);
    let wide_again = recorder.log_two_byte_symbol(3, &[0x4141]);

    assert_ne!(narrow, wide);
    assert_eq!(wide, wide_again);
    assert_eq!(recorder.symbol_ids(), 2);
}

#[test]
fn test_wide_symbols_of_different_length() {
    let mut recorder = Recorder::new();
    let long = recorder.log_two_byte_symbol(0, &[0x61, 0x62, 0x63]);
    let short = recorder.log_two_byte_symbol(0, &[0x61]);
    assert_ne!(long, short);
    assert_eq!(recorder.log_two_byte_symbol(0, &[0x61, 0x62, 0x63]), long);

    let key = recorder.symbols().key(short).unwrap();
    assert!(key.is_wide);
    assert_eq!(key.bytes, &0x61u16.to_ne_bytes());
}

#[test]
fn test_large_ids_use_multibyte_encoding() {
    let mut recorder = Recorder::new();
    for i in 0..200u32 {
        recorder.log_one_byte_symbol(i, format!("sym{}", i).as_bytes());
    }
    // Ids 0..=127 take one byte, 128..=199 take two.
    assert_eq!(recorder.symbol_position(), 128 + 72 * 2);

    let data = recorder.extract_data();
    let view = crate::PreparseView::new(&data).unwrap();
    let ids = view.symbol_ids(200).unwrap();
    assert_eq!(ids, (0..200).collect::<Vec<_>>());
}

// ============================================================================
// FUNCTIONS
// ============================================================================

#[test]
fn test_log_function_appends_entry() {
    let mut recorder = Recorder::new();
    recorder.log_function(10, 50, 2, 1, LanguageMode::Strict);
    recorder.log_function(60, 90, 0, 0, LanguageMode::Sloppy);

    assert_eq!(recorder.function_position(), 2 * FUNCTION_ENTRY_SIZE);
    let data = recorder.extract_data();
    assert_eq!(&data[6..16], &[10, 50, 2, 1, 1, 60, 90, 0, 0, 0]);
}

#[test]
fn test_message_discards_function_entries() {
    let mut recorder = Recorder::new();
    recorder.log_function(10, 50, 2, 1, LanguageMode::Strict);
    recorder.log_message(3, 4, "bad", None, true);

    let mut expected = vec![3, 4, 0, 1, 3];
    expected.extend(cells("bad"));
    let data = recorder.extract_data();
    assert_eq!(&data[6..], expected.as_slice());
}

#[test]
fn test_log_function_ignored_after_error() {
    let mut recorder = Recorder::new();
    recorder.log_message(0, 1, "e", None, false);
    let before = recorder.function_position();
    recorder.log_function(10, 50, 2, 1, LanguageMode::Strict);
    assert_eq!(recorder.function_position(), before);
}

// ============================================================================
// MESSAGES
// ============================================================================

#[test]
fn test_message_layout_with_arg() {
    let mut recorder = Recorder::new();
    recorder.log_message(7, 9, "undefined %0", Some("foo"), true);

    let mut expected = vec![7, 9, 1, 1, 12];
    expected.extend(cells("undefined %0"));
    expected.push(3);
    expected.extend(cells("foo"));

    let data = recorder.extract_data();
    assert_eq!(data[2], 1);
    assert_eq!(data[3] as usize, expected.len());
    assert_eq!(&data[6..], expected.as_slice());
}

#[test]
fn test_first_message_wins() {
    let mut recorder = Recorder::new();
    recorder.log_message(5, 10, "unexpected token", None, false);
    let first = recorder.extract_data();

    recorder.log_message(1, 2, "something else", Some("arg"), true);
    assert!(recorder.has_error());
    assert_eq!(recorder.extract_data(), first);
}

#[test]
fn test_empty_message() {
    let mut recorder = Recorder::new();
    recorder.log_message(0, 0, "", Some(""), false);
    let data = recorder.extract_data();
    assert_eq!(&data[6..], &[0, 0, 1, 0, 0, 0]);
}

#[test]
fn test_non_ascii_message_stored_as_utf8_bytes() {
    let mut recorder = Recorder::new();
    recorder.log_message(0, 1, "é", None, false);
    let data = recorder.extract_data();
    assert_eq!(&data[6..], &[0, 1, 0, 0, 2, 0xC3, 0xA9]);
}

// ============================================================================
// EXTRACTION
// ============================================================================

#[test]
fn test_extract_empty_recorder() {
    let recorder = Recorder::new();
    let data = recorder.extract_data();

    // Header plus one cell of terminators.
    assert_eq!(data.len(), 7);
    assert_eq!(&data[..6], &[MAGIC_NUMBER, CURRENT_VERSION, 0, 0, 0, 0]);
    assert_eq!(data[6], u32::from_ne_bytes([0x80; 4]));
}

#[test]
fn test_extract_pads_with_terminators() {
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"foo");
    recorder.log_one_byte_symbol(4, b"bar");
    recorder.log_one_byte_symbol(8, b"foo");

    let data = recorder.extract_data();
    assert_eq!(data.len(), 7);
    assert_eq!(data[4], 2);
    assert_eq!(data[6], u32::from_ne_bytes([0, 1, 0, 0x80]));
}

#[test]
fn test_extract_aligned_stream_gets_extra_cell() {
    let mut recorder = Recorder::new();
    for literal in [b"a", b"b", b"c", b"d"] {
        recorder.log_one_byte_symbol(0, literal);
    }
    assert_eq!(recorder.symbol_position(), 4);

    let data = recorder.extract_data();
    assert_eq!(data.len(), 6 + 2);
    assert_eq!(data[6], u32::from_ne_bytes([0, 1, 2, 3]));
    assert_eq!(data[7], u32::from_ne_bytes([0x80; 4]));
}

#[test]
fn test_extract_is_idempotent() {
    let mut recorder = Recorder::new();
    recorder.log_function(0, 10, 1, 1, LanguageMode::Sloppy);
    recorder.log_one_byte_symbol(0, b"a");
    recorder.log_one_byte_symbol(0, b"bc");

    let first = recorder.extract_data();
    let second = recorder.extract_data();
    assert_eq!(first, second);
    assert_eq!(recorder.symbol_position(), 2);
}

#[test]
fn test_extract_then_continue_logging() {
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"a");
    let before = recorder.extract_data();
    recorder.log_one_byte_symbol(0, b"a");
    let after = recorder.extract_data();

    assert_eq!(before[6], u32::from_ne_bytes([0, 0x80, 0x80, 0x80]));
    assert_eq!(after[6], u32::from_ne_bytes([0, 0, 0x80, 0x80]));
}

#[test]
fn test_error_drops_symbol_region_but_keeps_count() {
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"a");
    recorder.log_one_byte_symbol(2, b"b");
    recorder.log_message(5, 10, "unexpected token", None, false);
    // Still accepted, still moot.
    recorder.log_one_byte_symbol(12, b"c");

    let data = recorder.extract_data();
    let function_size = data[3] as usize;
    assert_eq!(data.len(), 6 + function_size);
    assert_eq!(data[4], 3);
}

#[test]
fn test_preamble_matches_extracted_header() {
    let mut recorder = Recorder::new();
    recorder.log_function(1, 2, 3, 4, LanguageMode::Strict);
    recorder.log_one_byte_symbol(0, b"z");

    let data = recorder.extract_data();
    assert_eq!(&data[..6], &recorder.preamble().to_cells());
}

// ============================================================================
// CONFIGURATION AND TRAIT
// ============================================================================

#[test]
fn test_with_config_rejects_invalid() {
    let config = RecorderConfig {
        literal_chunk_size: 0,
        ..Default::default()
    };
    assert!(Recorder::with_config(&config).is_err());
}

#[test]
fn test_small_chunks_do_not_change_output() {
    let config = RecorderConfig {
        literal_chunk_size: 2,
        ..Default::default()
    };
    let mut small = Recorder::with_config(&config).unwrap();
    let mut regular = Recorder::new();
    for literal in ["alpha", "b", "alpha", "gamma", "b"] {
        small.log_one_byte_symbol(0, literal.as_bytes());
        regular.log_one_byte_symbol(0, literal.as_bytes());
    }
    assert_eq!(small.extract_data(), regular.extract_data());
    assert!(small.symbols().literals().chunk_count() > 1);
}

#[test]
fn test_usable_through_trait_object() {
    fn scan(recorder: &mut dyn ParserRecorder) {
        recorder.log_function(0, 20, 0, 0, LanguageMode::Sloppy);
        recorder.log_one_byte_symbol(1, b"let");
        recorder.log_two_byte_symbol(5, &[0x3b1]);
        recorder.log_message(18, 19, "missing }", None, false);
    }

    let mut recorder = Recorder::new();
    scan(&mut recorder);
    assert!(ParserRecorder::has_error(&recorder));
    assert_eq!(ParserRecorder::symbol_ids(&recorder), 2);
    assert_eq!(ParserRecorder::symbol_position(&recorder), 2);
    assert_eq!(
        ParserRecorder::function_position(&recorder),
        5 + "missing }".len()
    );
}
