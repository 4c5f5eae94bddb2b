//! # Encode Pipeline
//!
//! Writing is the read pipeline in reverse, leaves first: the symbol
//! region is emitted per column (recording each column's offset and
//! length), the bit layout is planned from the index table and the
//! records packed, and only then is the header built. Its numbers are
//! computed from the two regions, never guessed, so the three sections of
//! the file cannot disagree.
//!
//! The output is always uncompressed and unencrypted, with an unbiased
//! bit layout (`Bias` 0 for every column).

use tracing::debug;

use crate::bitpack;
use crate::error::Result;
use crate::header::{build_header, FieldLayout, TableLayout};
use crate::symbols::encode_column;
use crate::table::QvdTable;

/// Encodes a table into a complete QVD file.
pub fn encode(table: &QvdTable<'_>) -> Result<Vec<u8>> {
    encode_named(table, table.name())
}

/// Encodes with an explicit `TableName`, leaving the table untouched.
/// Used by [`crate::write_file`], where the name comes from the path stem.
pub(crate) fn encode_named(table: &QvdTable<'_>, name: &str) -> Result<Vec<u8>> {
    let mut symbol_region = Vec::new();
    let mut extents = Vec::with_capacity(table.column_count());
    for column_symbols in table.symbols() {
        extents.push(encode_column(column_symbols, &mut symbol_region));
    }

    let bit_layout = bitpack::plan_layout(table.column_count(), table.raw_indices());
    let index_region = bitpack::pack_records(table.raw_indices(), &bit_layout);

    let fields = table
        .columns()
        .iter()
        .enumerate()
        .map(|(c, column)| FieldLayout {
            name: column.clone(),
            symbol_offset: extents[c].0,
            symbol_length: extents[c].1,
            bit_offset: bit_layout.offsets[c],
            bit_width: bit_layout.widths[c],
            bias: 0,
            symbol_count: table.symbols()[c].len(),
        })
        .collect();

    let layout = TableLayout {
        table_name: name.to_string(),
        fields,
        record_byte_size: bit_layout.record_byte_size,
        row_count: table.row_count(),
        symbol_region_length: symbol_region.len(),
        index_region_length: index_region.len(),
    };

    let header = build_header(&layout)?;
    debug!(
        table = %layout.table_name,
        header_bytes = header.len(),
        symbol_bytes = symbol_region.len(),
        index_bytes = index_region.len(),
        "assembled qvd file"
    );

    // Header, the NUL completing the CR LF NUL terminator, then the two
    // binary regions.
    let mut out =
        Vec::with_capacity(header.len() + 1 + symbol_region.len() + index_region.len());
    out.extend_from_slice(&header);
    out.push(0x00);
    out.extend_from_slice(&symbol_region);
    out.extend_from_slice(&index_region);
    Ok(out)
}
