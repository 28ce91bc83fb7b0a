//! Reader-compatibility tests: buffers produced by the recorder, checked
//! through the validating view.

use std::sync::Once;

use preparse_data::format::{HEADER_SIZE, NUMBER_TERMINATOR};
use preparse_data::{
    FormatError, FunctionEntry, LanguageMode, PreparseView, RecordedMessage, Recorder,
};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// END-TO-END
// ============================================================================

#[test]
fn test_symbols_end_to_end() {
    init_tracing();
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"foo");
    recorder.log_one_byte_symbol(4, b"bar");
    recorder.log_one_byte_symbol(8, b"foo");

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();

    assert!(!view.has_error());
    assert_eq!(view.preamble().symbol_count, 2);
    assert_eq!(view.preamble().size, 0);
    assert!(view.function_region().is_empty());
    assert_eq!(view.symbol_ids(3).unwrap(), vec![0, 1, 0]);
    assert_eq!(view.all_symbol_ids(), vec![0, 1, 0]);
}

#[test]
fn test_error_end_to_end() {
    init_tracing();
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"foo");
    recorder.log_message(5, 10, "unexpected token", None, false);

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();

    let mut expected = vec![5, 10, 0, 0, 16];
    expected.extend("unexpected token".bytes().map(u32::from));
    assert!(view.has_error());
    assert_eq!(view.function_region(), expected.as_slice());
    assert_eq!(data.len(), HEADER_SIZE + view.preamble().functions_size as usize);
    assert!(view.symbol_region().is_empty());

    assert_eq!(
        view.message().unwrap(),
        Some(RecordedMessage {
            start: 5,
            end: 10,
            text: "unexpected token".to_string(),
            arg: None,
            is_reference_error: false,
        })
    );
}

// The symbol count stays populated when the error flag suppresses the
// symbol region. Consumers must ignore it in that case; this pins the
// behavior so it is not changed by accident in either direction.
#[test]
fn test_symbol_count_survives_error() {
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"a");
    recorder.log_one_byte_symbol(1, b"b");
    recorder.log_one_byte_symbol(2, b"a");
    recorder.log_message(3, 4, "oops", None, false);

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();
    assert!(view.has_error());
    assert_eq!(view.preamble().symbol_count, 2);
    assert!(view.all_symbol_ids().is_empty());
    assert_eq!(
        view.symbol_ids(1).unwrap_err(),
        FormatError::TruncatedSymbols {
            decoded: 0,
            expected: 1
        }
    );
}

#[test]
fn test_functions_then_symbols() {
    let mut recorder = Recorder::new();
    recorder.log_function(0, 40, 3, 2, LanguageMode::Sloppy);
    recorder.log_one_byte_symbol(9, b"inner");
    recorder.log_function(50, 80, 0, 0, LanguageMode::Strict);
    recorder.log_one_byte_symbol(60, b"inner");

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();
    assert_eq!(
        view.function_entries().unwrap(),
        vec![
            FunctionEntry {
                start: 0,
                end: 40,
                literals: 3,
                properties: 2,
                language_mode: LanguageMode::Sloppy,
            },
            FunctionEntry {
                start: 50,
                end: 80,
                literals: 0,
                properties: 0,
                language_mode: LanguageMode::Strict,
            },
        ]
    );
    assert_eq!(view.symbol_ids(2).unwrap(), vec![0, 0]);
    assert_eq!(view.message().unwrap(), None);
}

// ============================================================================
// SYMBOL REGION
// ============================================================================

#[test]
fn test_flag_sensitivity() {
    let mut recorder = Recorder::new();
    let narrow = recorder.log_one_byte_symbol(0, &[0x41]);
    let wide = recorder.log_two_byte_symbol(0, &[0x0041]);
    let same_bytes = u16::from_ne_bytes([0x41, 0x41]);
    let narrow_pair = recorder.log_one_byte_symbol(0, &[0x41, 0x41]);
    let wide_pair = recorder.log_two_byte_symbol(0, &[same_bytes]);

    assert_ne!(narrow, wide);
    assert_ne!(narrow_pair, wide_pair);

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();
    assert_eq!(view.preamble().symbol_count, 4);
    assert_eq!(view.symbol_ids(4).unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_ids_monotonic_regardless_of_repeats() {
    let literals = ["a", "b", "a", "c", "b", "d", "a"];
    let mut recorder = Recorder::new();
    for (i, literal) in literals.iter().enumerate() {
        recorder.log_one_byte_symbol(i as u32, literal.as_bytes());
    }

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();
    assert_eq!(view.preamble().symbol_count, 4);
    assert_eq!(view.all_symbol_ids(), vec![0, 1, 0, 2, 1, 3, 0]);
}

#[test]
fn test_padding_bytes_are_terminators() {
    let mut recorder = Recorder::new();
    recorder.log_one_byte_symbol(0, b"only");

    let data = recorder.extract_data();
    let view = PreparseView::new(&data).unwrap();
    let region = view.symbol_region();
    assert_eq!(region.len() % 4, 0);
    assert_eq!(region[0], 0);
    assert!(region[1..].iter().all(|&b| b == NUMBER_TERMINATOR));
}

// ============================================================================
// COMPATIBILITY GUARDS
// ============================================================================

#[test]
fn test_tampered_version_rejected() {
    let mut data = Recorder::new().extract_data();
    data[1] += 1;
    assert!(matches!(
        PreparseView::new(&data),
        Err(FormatError::VersionMismatch { .. })
    ));
}

#[test]
fn test_truncated_function_region_rejected() {
    let mut recorder = Recorder::new();
    recorder.log_message(0, 1, "boom", None, false);
    let data = recorder.extract_data();
    assert!(matches!(
        PreparseView::new(&data[..data.len() - 1]),
        Err(FormatError::FunctionRegionOverflow { .. })
    ));
}
