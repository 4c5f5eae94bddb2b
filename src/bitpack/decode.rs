//! Bit-stuffed record decoding.

use tracing::debug;

use crate::error::{QvdError, Result};
use crate::header::TableLayout;

/// Extracts `bit_width` bits starting at `bit_offset` from the record's
/// little-endian bit view.
///
/// The caller guarantees `1 <= bit_width <= 32` and that the slot lies
/// inside the record (validated once per file from the header).
pub fn extract(record: &[u8], bit_offset: usize, bit_width: usize) -> u32 {
    let first = bit_offset / 8;
    let last = (bit_offset + bit_width - 1) / 8;

    // At most 5 bytes contribute (32 bits shifted by up to 7), so the
    // accumulator never overflows 64 bits.
    let mut acc = 0u64;
    for (i, &byte) in record[first..=last].iter().enumerate() {
        acc |= (byte as u64) << (8 * i);
    }
    ((acc >> (bit_offset % 8)) & ((1u64 << bit_width) - 1)) as u32
}

/// Decodes the whole index region into row-major symbol indices.
///
/// `symbol_counts` are the per-column counts actually decoded from the
/// symbol region; every bias-adjusted index is range-checked against them.
/// `data` must hold exactly `row_count * record_byte_size` bytes, plus at
/// most one trailing padding byte, which is ignored.
pub fn decode_indices(
    data: &[u8],
    layout: &TableLayout,
    symbol_counts: &[usize],
) -> Result<Vec<u32>> {
    let record_size = layout.record_byte_size;
    let needed = layout.row_count * record_size;
    if data.len() < needed {
        return Err(QvdError::MalformedHeader(format!(
            "index region holds {} bytes but {} records of {} bytes are declared",
            data.len(),
            layout.row_count,
            record_size
        )));
    }
    if data.len() > needed + 1 {
        return Err(QvdError::MalformedHeader(format!(
            "index region holds {} bytes but {} records of {} bytes fill at most {}",
            data.len(),
            layout.row_count,
            record_size,
            needed + 1
        )));
    }

    let mut indices = Vec::with_capacity(layout.row_count * layout.fields.len());
    for row in 0..layout.row_count {
        let record = &data[row * record_size..(row + 1) * record_size];
        for (field, &count) in layout.fields.iter().zip(symbol_counts) {
            let raw = if field.bit_width == 0 {
                0
            } else {
                extract(record, field.bit_offset, field.bit_width)
            };
            let index = raw as i64 + field.bias as i64;
            if index < 0 || index >= count as i64 {
                return Err(QvdError::IndexOutOfRange {
                    field: field.name.clone(),
                    row,
                    index,
                    count,
                });
            }
            indices.push(index as u32);
        }
    }

    debug!(
        rows = layout.row_count,
        columns = layout.fields.len(),
        "decoded index table"
    );
    Ok(indices)
}
