//! # End-to-End Round-Trip Tests
//!
//! Encode a table, decode the bytes, and check that everything survives:
//! values, symbol order, index bytes, and the layout numbers the header
//! declares. These tests pin the observable contract of the codec; if one
//! fails after a change, the change broke the format, not the test.

use std::borrow::Cow;

use eyre::Result;
use qvd::header::{locate_terminator, parse_header, TableLayout, HEADER_TERMINATOR};
use qvd::{QvdTable, Symbol, Value};

fn text(s: &str) -> Value<'_> {
    Value::Text(Cow::Borrowed(s))
}

/// Parses the layout out of an encoded file's header.
fn layout_of(bytes: &[u8]) -> Result<(TableLayout, usize)> {
    let terminator = locate_terminator(bytes)?;
    let xml = std::str::from_utf8(&bytes[..terminator])?;
    let layout = parse_header(xml)?;
    Ok((layout, terminator + HEADER_TERMINATOR.len()))
}

fn assert_tables_equal(a: &QvdTable<'_>, b: &QvdTable<'_>) {
    assert_eq!(a.columns(), b.columns());
    assert_eq!(a.row_count(), b.row_count());
    assert_eq!(a.symbols(), b.symbols());
    for row in 0..a.row_count() {
        for column in 0..a.column_count() {
            assert_eq!(a.index(row, column), b.index(row, column));
        }
    }
}

#[test]
fn two_column_categorical_table() -> Result<()> {
    let table = QvdTable::from_rows(
        "pairs",
        vec!["Key".into(), "Value".into()],
        vec![
            vec![Value::Int(1), text("A")],
            vec![Value::Int(2), text("B")],
            vec![Value::Int(3), text("C")],
            vec![Value::Int(4), text("D")],
            vec![Value::Int(5), text("E")],
        ],
    )?;

    let bytes = qvd::encode(&table)?;
    let decoded = qvd::decode(&bytes)?;
    assert_tables_equal(&table, &decoded);

    let (layout, data_start) = layout_of(&bytes)?;
    let widths: Vec<usize> = layout.fields.iter().map(|f| f.bit_width).collect();
    let counts: Vec<usize> = layout.fields.iter().map(|f| f.symbol_count).collect();
    assert_eq!(counts, vec![5, 5]);
    assert_eq!(widths, vec![3, 3]);
    assert_eq!(layout.record_byte_size, 1);
    assert_eq!(layout.index_region_length, 5);
    assert_eq!(
        bytes.len(),
        data_start + layout.symbol_region_length + layout.index_region_length
    );
    Ok(())
}

#[test]
fn duplicate_heavy_column_packs_one_bit() -> Result<()> {
    let rows = ["x", "x", "y", "x", "y", "y"]
        .iter()
        .map(|s| vec![text(s)])
        .collect();
    let table = QvdTable::from_rows("dup", vec!["F".into()], rows)?;

    let bytes = qvd::encode(&table)?;
    let (layout, data_start) = layout_of(&bytes)?;
    assert_eq!(layout.fields[0].symbol_count, 2);
    assert_eq!(layout.fields[0].bit_width, 1);
    assert_eq!(layout.record_byte_size, 1);

    let index_region = &bytes[data_start + layout.symbol_region_length..];
    assert_eq!(index_region, &[0, 0, 1, 0, 1, 1]);

    let decoded = qvd::decode(&bytes)?;
    let stored: Vec<u32> = (0..6).map(|r| decoded.index(r, 0).unwrap()).collect();
    assert_eq!(stored, vec![0, 0, 1, 0, 1, 1]);
    Ok(())
}

#[test]
fn mixed_numeric_and_text_column() -> Result<()> {
    let table = QvdTable::from_rows(
        "mixed",
        vec!["n".into(), "s".into()],
        vec![
            vec![Value::Int(1), text("a")],
            vec![Value::Double(2.5), text("b")],
            vec![Value::Int(1), text("a")],
        ],
    )?;

    let bytes = qvd::encode(&table)?;
    let decoded = qvd::decode(&bytes)?;

    assert_eq!(
        decoded.column_symbols(0).unwrap(),
        &[
            Symbol::DualInt(1, Cow::Borrowed("1")),
            Symbol::DualDouble(2.5, Cow::Borrowed("2.5")),
        ]
    );

    // Duals materialize as their display string; plain text as itself.
    let rows: Vec<Vec<Value<'_>>> = decoded.rows().collect();
    assert_eq!(
        rows,
        vec![
            vec![text("1"), text("a")],
            vec![text("2.5"), text("b")],
            vec![text("1"), text("a")],
        ]
    );
    Ok(())
}

#[test]
fn empty_table_round_trips() -> Result<()> {
    let table = QvdTable::from_rows("empty", vec!["a".into(), "b".into()], vec![])?;
    let bytes = qvd::encode(&table)?;

    let (layout, _) = layout_of(&bytes)?;
    assert_eq!(layout.row_count, 0);
    assert_eq!(layout.record_byte_size, 0);
    assert_eq!(layout.index_region_length, 0);

    let decoded = qvd::decode(&bytes)?;
    assert_eq!(decoded.columns(), &["a".to_string(), "b".to_string()]);
    assert_eq!(decoded.row_count(), 0);
    assert_eq!(decoded.rows().count(), 0);
    Ok(())
}

#[test]
fn single_value_column_uses_width_zero() -> Result<()> {
    let table = QvdTable::from_rows("one", vec!["F".into()], vec![vec![text("only")]])?;
    let bytes = qvd::encode(&table)?;

    let (layout, _) = layout_of(&bytes)?;
    assert_eq!(layout.fields[0].bit_width, 0);
    assert_eq!(layout.record_byte_size, 1);

    let decoded = qvd::decode(&bytes)?;
    assert_eq!(decoded.get(0, 0), Some(text("only")));
    Ok(())
}

#[test]
fn non_ascii_strings_round_trip() -> Result<()> {
    let table = QvdTable::from_rows(
        "unicode",
        vec!["s".into()],
        vec![vec![text("café")], vec![text("日本語")], vec![text("ÿ")]],
    )?;
    let bytes = qvd::encode(&table)?;
    let decoded = qvd::decode(&bytes)?;
    let rows: Vec<Vec<Value<'_>>> = decoded.rows().collect();
    assert_eq!(
        rows,
        vec![vec![text("café")], vec![text("日本語")], vec![text("ÿ")]]
    );
    Ok(())
}

#[test]
fn max_i32_is_a_dual_int() -> Result<()> {
    let table = QvdTable::from_rows(
        "max",
        vec!["n".into()],
        vec![vec![Value::Int(2147483647)]],
    )?;
    let bytes = qvd::encode(&table)?;
    let decoded = qvd::decode(&bytes)?;
    assert_eq!(
        decoded.column_symbols(0).unwrap(),
        &[Symbol::DualInt(2147483647, Cow::Borrowed("2147483647"))]
    );
    Ok(())
}

#[test]
fn beyond_i32_becomes_a_dual_double() -> Result<()> {
    let table = QvdTable::from_rows(
        "big",
        vec!["n".into()],
        vec![vec![Value::Int(2147483648)]],
    )?;
    let encoded = qvd::encode(&table)?;
    let decoded = qvd::decode(&encoded)?;
    assert_eq!(
        decoded.column_symbols(0).unwrap(),
        &[Symbol::DualDouble(2147483648.0, Cow::Borrowed("2147483648"))]
    );
    Ok(())
}

#[test]
fn re_encode_is_byte_idempotent_outside_volatile_fields() -> Result<()> {
    let table = QvdTable::from_rows(
        "stable",
        vec!["Key".into(), "Value".into()],
        vec![
            vec![Value::Int(10), text("north")],
            vec![Value::Int(20), text("south")],
            vec![Value::Int(10), text("north")],
        ],
    )?;

    let first = qvd::encode(&table)?;
    let second = qvd::encode(&qvd::decode(&first)?)?;

    let (layout_a, start_a) = layout_of(&first)?;
    let (layout_b, start_b) = layout_of(&second)?;
    // Identical layouts, identical binary regions; only CreatorDoc and
    // CreateUtcTime inside the header may differ.
    assert_eq!(layout_a, layout_b);
    assert_eq!(&first[start_a..], &second[start_b..]);
    Ok(())
}

#[test]
fn decode_encode_decode_is_the_identity() -> Result<()> {
    let table = QvdTable::from_rows(
        "orig",
        vec!["n".into(), "s".into()],
        vec![
            vec![Value::Double(0.25), text("")],
            vec![Value::Int(-5), text("x")],
            vec![Value::Double(0.25), text("x")],
        ],
    )?;
    let once_encoded = qvd::encode(&table)?;
    let once = qvd::decode(&once_encoded)?.into_owned();
    let twice_encoded = qvd::encode(&once)?;
    let twice = qvd::decode(&twice_encoded)?;
    assert_tables_equal(&once, &twice);
    Ok(())
}

#[test]
fn file_round_trip_names_the_table_after_the_stem() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("regions.qvd");

    let table = QvdTable::from_rows(
        "ignored",
        vec!["r".into()],
        vec![vec![text("emea")], vec![text("apac")]],
    )?;
    qvd::write_file(&path, &table)?;

    let read_back = qvd::read_file(&path)?;
    assert_eq!(read_back.name(), "regions");
    let rows: Vec<Vec<Value<'_>>> = read_back.rows().collect();
    assert_eq!(rows, vec![vec![text("emea")], vec![text("apac")]]);
    Ok(())
}

#[test]
fn null_cells_are_rejected_on_encode() {
    let err = QvdTable::from_rows("n", vec!["a".into()], vec![vec![Value::Null]]).unwrap_err();
    assert!(matches!(err, qvd::QvdError::WriteUnrepresentable { .. }));
}

#[test]
fn symbol_tables_never_hold_duplicates() -> Result<()> {
    let table = QvdTable::from_rows(
        "dedup",
        vec!["n".into()],
        vec![
            vec![Value::Int(3)],
            vec![Value::Double(3.0)],
            vec![Value::Int(3)],
        ],
    )?;
    let encoded = qvd::encode(&table)?;
    let decoded = qvd::decode(&encoded)?;
    // 3 and 3.0 classify to the same dual and dedup to one symbol.
    let symbols = decoded.column_symbols(0).unwrap();
    assert_eq!(symbols, &[Symbol::DualInt(3, Cow::Borrowed("3"))]);
    for (i, a) in symbols.iter().enumerate() {
        for b in &symbols[i + 1..] {
            assert_ne!(a, b);
        }
    }
    Ok(())
}
