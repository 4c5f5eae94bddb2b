//! # Decode Pipeline
//!
//! Reading a QVD is four steps over one borrowed buffer:
//!
//! 1. Locate the CR LF NUL terminator and parse the XML before it into a
//!    [`TableLayout`](crate::header::TableLayout), then validate it.
//! 2. Slice the symbol region and decode each column's symbol sub-region.
//! 3. Slice the index region and decode the bit-stuffed records.
//! 4. Assemble the [`QvdTable`].
//!
//! The buffer is only read, never copied: string symbols borrow straight
//! out of it. Any error aborts the whole decode; no partial table is ever
//! returned.

use tracing::debug;

use crate::bitpack;
use crate::error::{QvdError, Result};
use crate::header::{locate_terminator, parse_header, HEADER_TERMINATOR};
use crate::symbols::{decode_column, TextEncoding};
use crate::table::QvdTable;

/// Knobs for the decode pipeline.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// How symbol string payloads are interpreted. See
    /// [`TextEncoding::Latin1`] for reading files produced by
    /// per-byte-char tooling.
    pub text_encoding: TextEncoding,
}

/// Decodes a complete QVD file from a byte buffer.
///
/// String symbols borrow from `buf`; use
/// [`QvdTable::into_owned`] to detach the result, or [`crate::read_file`]
/// which does so for you.
pub fn decode(buf: &[u8]) -> Result<QvdTable<'_>> {
    decode_with(buf, &DecodeOptions::default())
}

/// Decodes with explicit [`DecodeOptions`].
pub fn decode_with<'a>(buf: &'a [u8], options: &DecodeOptions) -> Result<QvdTable<'a>> {
    let terminator = locate_terminator(buf)?;
    let xml = std::str::from_utf8(&buf[..terminator])
        .map_err(|e| QvdError::MalformedHeader(format!("header is not valid utf-8: {e}")))?;
    let layout = parse_header(xml)?;
    layout.validate()?;
    debug!(
        table = %layout.table_name,
        fields = layout.fields.len(),
        rows = layout.row_count,
        "parsed header"
    );

    let data_start = terminator + HEADER_TERMINATOR.len();
    let symbol_end = data_start + layout.symbol_region_length;
    if symbol_end > buf.len() {
        return Err(QvdError::MalformedHeader(format!(
            "symbol region of {} bytes extends past the end of the file",
            layout.symbol_region_length
        )));
    }
    let symbol_region = &buf[data_start..symbol_end];

    let mut symbols = Vec::with_capacity(layout.fields.len());
    for field in &layout.fields {
        let sub_region =
            &symbol_region[field.symbol_offset..field.symbol_offset + field.symbol_length];
        let column = decode_column(sub_region, &field.name, options.text_encoding)?;
        if column.len() != field.symbol_count {
            debug!(
                field = %field.name,
                declared = field.symbol_count,
                decoded = column.len(),
                "header symbol count disagrees with the decoded sequence"
            );
        }
        symbols.push(column);
    }

    let index_end = symbol_end + layout.index_region_length;
    if index_end > buf.len() {
        return Err(QvdError::MalformedHeader(format!(
            "index region of {} bytes extends past the end of the file",
            layout.index_region_length
        )));
    }
    // One padding byte may follow the index region; anything more is junk
    // the header does not account for.
    if buf.len() > index_end + 1 {
        return Err(QvdError::MalformedHeader(format!(
            "{} trailing bytes after the declared index region",
            buf.len() - index_end
        )));
    }

    let counts: Vec<usize> = symbols.iter().map(Vec::len).collect();
    let indices = bitpack::decode_indices(&buf[symbol_end..index_end], &layout, &counts)?;

    let columns = layout.fields.iter().map(|f| f.name.clone()).collect();
    Ok(QvdTable::from_parts(
        layout.table_name,
        columns,
        symbols,
        indices,
        layout.row_count,
    ))
}
