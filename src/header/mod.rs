//! # Header and Table Layout
//!
//! Every QVD file opens with an XML document that pins down the byte layout
//! of the two binary regions that follow it:
//!
//! ```text
//! [ XML header ] [ 0x0D 0x0A 0x00 ] [ symbol region ] [ index region ]
//!    variable          3 bytes           S bytes           L bytes
//! ```
//!
//! `S` is `<Offset>` and `L` is `<Length>` in the `QvdTableHeader` root.
//! Each `<QvdFieldHeader>` declares where its column's symbols sit inside
//! the symbol region (`Offset`/`Length`) and which bit slot its index
//! occupies inside each fixed-width record (`BitOffset`/`BitWidth`/`Bias`).
//!
//! [`TableLayout`] is the decoded form of that contract. It is validated
//! once, before any region bytes are touched, so the symbol and index
//! decoders can trust every offset they are handed. On write the layout is
//! computed from the data and serialized back by [`build::build_header`].
//!
//! All numeric values on the wire are decimal text.

pub mod build;
pub mod parse;

pub use build::build_header;
pub use parse::{locate_terminator, parse_header, HEADER_TERMINATOR};

use crate::error::{QvdError, Result};

/// Maximum bit width a field may declare. Symbol indices are 32-bit, so a
/// wider slot cannot reference a valid symbol.
pub const MAX_BIT_WIDTH: usize = 32;

/// Per-column layout metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    /// Byte offset of this column's symbols inside the symbol region.
    pub symbol_offset: usize,
    /// Byte length of this column's symbols.
    pub symbol_length: usize,
    /// Bit position of this column's index slot inside each record.
    pub bit_offset: usize,
    /// Width of the index slot in bits. Zero means every row's raw index
    /// is 0 without reading any record bits.
    pub bit_width: usize,
    /// Signed adjustment added to every extracted raw index.
    pub bias: i32,
    /// Symbol count declared by the header (the decoder trusts the decoded
    /// sequence, not this number).
    pub symbol_count: usize,
}

/// Per-file layout metadata recovered from or produced for the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub table_name: String,
    pub fields: Vec<FieldLayout>,
    /// Bytes per row in the index region.
    pub record_byte_size: usize,
    pub row_count: usize,
    /// Bytes in the symbol region; also the offset from the end of the
    /// header to the start of the index region.
    pub symbol_region_length: usize,
    /// Bytes in the index region.
    pub index_region_length: usize,
}

impl TableLayout {
    /// Checks the internal consistency of the layout contract.
    ///
    /// Field symbol sub-regions must sit inside the symbol region, in field
    /// order and without overlap; every bit slot must fit inside the record
    /// and stay within the 32-bit index space; and the index region must be
    /// an integer number of records (one trailing padding byte tolerated).
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(QvdError::MalformedHeader(
                "header declares no field descriptors".into(),
            ));
        }

        let mut previous_end = 0usize;
        for field in &self.fields {
            let end = field
                .symbol_offset
                .checked_add(field.symbol_length)
                .filter(|&end| end <= self.symbol_region_length)
                .ok_or_else(|| QvdError::SymbolRegionOverrun {
                    field: field.name.clone(),
                    reason: format!(
                        "declared bytes {}..{} exceed symbol region of {} bytes",
                        field.symbol_offset,
                        field.symbol_offset as u128 + field.symbol_length as u128,
                        self.symbol_region_length
                    ),
                })?;
            if field.symbol_offset < previous_end {
                return Err(QvdError::SymbolRegionOverrun {
                    field: field.name.clone(),
                    reason: format!(
                        "symbol bytes at {} overlap the previous field ending at {}",
                        field.symbol_offset, previous_end
                    ),
                });
            }
            previous_end = end;

            let record_bits = self.record_byte_size * 8;
            if field.bit_width > MAX_BIT_WIDTH
                || field
                    .bit_offset
                    .checked_add(field.bit_width)
                    .map_or(true, |end| end > record_bits)
            {
                return Err(QvdError::BitLayoutOverflow {
                    field: field.name.clone(),
                    bit_offset: field.bit_offset,
                    bit_width: field.bit_width,
                    record_bits,
                });
            }
        }

        if self.row_count > 0 && self.record_byte_size == 0 {
            return Err(QvdError::MalformedHeader(format!(
                "record byte size is 0 but header declares {} records",
                self.row_count
            )));
        }

        let expected = self.row_count * self.record_byte_size;
        if self.index_region_length != expected && self.index_region_length != expected + 1 {
            return Err(QvdError::MalformedHeader(format!(
                "index region of {} bytes does not hold {} records of {} bytes",
                self.index_region_length, self.row_count, self.record_byte_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, offset: usize, length: usize, bit_offset: usize, width: usize) -> FieldLayout {
        FieldLayout {
            name: name.into(),
            symbol_offset: offset,
            symbol_length: length,
            bit_offset,
            bit_width: width,
            bias: 0,
            symbol_count: 1,
        }
    }

    fn layout(fields: Vec<FieldLayout>) -> TableLayout {
        TableLayout {
            table_name: "t".into(),
            fields,
            record_byte_size: 1,
            row_count: 2,
            symbol_region_length: 12,
            index_region_length: 2,
        }
    }

    #[test]
    fn accepts_contiguous_fields() {
        let l = layout(vec![field("a", 0, 6, 0, 3), field("b", 6, 6, 3, 3)]);
        assert!(l.validate().is_ok());
    }

    #[test]
    fn rejects_symbol_bytes_past_the_region() {
        let l = layout(vec![field("a", 0, 13, 0, 3)]);
        assert!(matches!(
            l.validate(),
            Err(QvdError::SymbolRegionOverrun { field, .. }) if field == "a"
        ));
    }

    #[test]
    fn rejects_overlapping_fields() {
        let l = layout(vec![field("a", 0, 6, 0, 3), field("b", 5, 6, 3, 3)]);
        assert!(matches!(
            l.validate(),
            Err(QvdError::SymbolRegionOverrun { field, .. }) if field == "b"
        ));
    }

    #[test]
    fn rejects_bit_slot_past_the_record() {
        let l = layout(vec![field("a", 0, 6, 6, 3)]);
        assert!(matches!(
            l.validate(),
            Err(QvdError::BitLayoutOverflow { field, .. }) if field == "a"
        ));
    }

    #[test]
    fn rejects_oversized_bit_width() {
        let mut l = layout(vec![field("a", 0, 6, 0, 33)]);
        l.record_byte_size = 8;
        l.index_region_length = 16;
        assert!(matches!(l.validate(), Err(QvdError::BitLayoutOverflow { .. })));
    }

    #[test]
    fn rejects_zero_record_size_with_rows() {
        let mut l = layout(vec![field("a", 0, 6, 0, 0)]);
        l.record_byte_size = 0;
        l.index_region_length = 0;
        assert!(matches!(l.validate(), Err(QvdError::MalformedHeader(_))));
    }

    #[test]
    fn tolerates_one_trailing_padding_byte() {
        let mut l = layout(vec![field("a", 0, 6, 0, 1)]);
        l.index_region_length = 3;
        assert!(l.validate().is_ok());
        l.index_region_length = 4;
        assert!(l.validate().is_err());
    }

    #[test]
    fn rejects_empty_field_list() {
        let l = layout(vec![]);
        assert!(matches!(l.validate(), Err(QvdError::MalformedHeader(_))));
    }
}
