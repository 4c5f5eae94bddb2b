//! Tests for the symbol region codec.

use std::borrow::Cow;

use super::*;
use crate::error::QvdError;
use crate::values::Symbol;

#[test]
fn decodes_strings_with_nul_terminators() {
    // "Hi" and "" back to back.
    let data = [0x04, 0x48, 0x69, 0x00, 0x04, 0x00];
    let symbols = decode_column(&data, "F", TextEncoding::Utf8).unwrap();
    assert_eq!(
        symbols,
        vec![
            Symbol::Text(Cow::Borrowed("Hi")),
            Symbol::Text(Cow::Borrowed("")),
        ]
    );
}

#[test]
fn decodes_every_variant() {
    let mut data = vec![0x01];
    data.extend_from_slice(&(-7i32).to_le_bytes());
    data.push(0x02);
    data.extend_from_slice(&1.5f64.to_le_bytes());
    data.push(0x05);
    data.extend_from_slice(&42i32.to_le_bytes());
    data.extend_from_slice(b"42\x00");
    data.push(0x06);
    data.extend_from_slice(&2.5f64.to_le_bytes());
    data.extend_from_slice(b"2.5\x00");

    let symbols = decode_column(&data, "F", TextEncoding::Utf8).unwrap();
    assert_eq!(
        symbols,
        vec![
            Symbol::Int(-7),
            Symbol::Double(1.5),
            Symbol::DualInt(42, Cow::Borrowed("42")),
            Symbol::DualDouble(2.5, Cow::Borrowed("2.5")),
        ]
    );
}

#[test]
fn decoded_strings_borrow_from_the_input() {
    let data = [0x04, b'a', b'b', 0x00];
    let symbols = decode_column(&data, "F", TextEncoding::Utf8).unwrap();
    match &symbols[0] {
        Symbol::Text(Cow::Borrowed(s)) => {
            assert!(std::ptr::eq(s.as_bytes().as_ptr(), data[1..].as_ptr()));
        }
        other => panic!("expected borrowed text, got {other:?}"),
    }
}

#[test]
fn unknown_tag_is_rejected_with_the_byte() {
    let data = [0x03, 0x00, 0x00, 0x00, 0x00];
    let err = decode_column(&data, "F", TextEncoding::Utf8).unwrap_err();
    assert!(matches!(
        err,
        QvdError::UnknownSymbolTag { tag: 0x03, ref field } if field == "F"
    ));
}

#[test]
fn truncated_int_payload_is_an_overrun() {
    let data = [0x01, 0x01, 0x02];
    let err = decode_column(&data, "F", TextEncoding::Utf8).unwrap_err();
    assert!(matches!(err, QvdError::SymbolRegionOverrun { .. }));
}

#[test]
fn truncated_double_payload_is_an_overrun() {
    let data = [0x02, 0x00, 0x00, 0x00];
    let err = decode_column(&data, "F", TextEncoding::Utf8).unwrap_err();
    assert!(matches!(err, QvdError::SymbolRegionOverrun { .. }));
}

#[test]
fn unterminated_string_is_an_encoding_error() {
    let data = [0x04, b'h', b'i'];
    let err = decode_column(&data, "F", TextEncoding::Utf8).unwrap_err();
    assert!(matches!(err, QvdError::InvalidSymbolEncoding { .. }));
}

#[test]
fn invalid_utf8_is_an_encoding_error() {
    let data = [0x04, 0xFF, 0xFE, 0x00];
    let err = decode_column(&data, "F", TextEncoding::Utf8).unwrap_err();
    assert!(matches!(err, QvdError::InvalidSymbolEncoding { .. }));
}

#[test]
fn latin1_mode_maps_bytes_to_code_points() {
    // "café" in Latin-1.
    let data = [0x04, 0x63, 0x61, 0x66, 0xE9, 0x00];
    let symbols = decode_column(&data, "F", TextEncoding::Latin1).unwrap();
    assert_eq!(symbols, vec![Symbol::Text(Cow::Borrowed("café"))]);
}

#[test]
fn encode_emits_tag_and_payload_bytes() {
    let mut region = Vec::new();
    let (offset, length) = encode_column(
        &[
            Symbol::DualInt(1, Cow::Borrowed("1")),
            Symbol::Text(Cow::Borrowed("A")),
        ],
        &mut region,
    );
    assert_eq!(offset, 0);
    assert_eq!(length, region.len());
    assert_eq!(
        region,
        vec![0x05, 0x01, 0x00, 0x00, 0x00, b'1', 0x00, 0x04, b'A', 0x00]
    );
}

#[test]
fn encode_tracks_offsets_across_columns() {
    let mut region = Vec::new();
    let (off_a, len_a) = encode_column(&[Symbol::Int(1)], &mut region);
    let (off_b, len_b) = encode_column(&[Symbol::Int(2), Symbol::Int(3)], &mut region);
    assert_eq!((off_a, len_a), (0, 5));
    assert_eq!((off_b, len_b), (5, 10));
    assert_eq!(region.len(), 15);
}

#[test]
fn encode_then_decode_round_trips_all_variants() {
    let symbols = vec![
        Symbol::Int(i32::MIN),
        Symbol::Double(f64::MAX),
        Symbol::Text(Cow::Borrowed("日本語")),
        Symbol::DualInt(i32::MAX, Cow::Borrowed("2147483647")),
        Symbol::DualDouble(-0.5, Cow::Borrowed("-0.5")),
    ];
    let mut region = Vec::new();
    let (offset, length) = encode_column(&symbols, &mut region);
    let decoded = decode_column(&region[offset..offset + length], "F", TextEncoding::Utf8).unwrap();
    assert_eq!(decoded, symbols);
}
