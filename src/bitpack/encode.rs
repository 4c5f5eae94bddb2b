//! Bit-stuffed record encoding.

use smallvec::SmallVec;
use tracing::debug;

/// Computed bit layout for one table: per-column slot positions and the
/// uniform record width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitLayout {
    pub widths: SmallVec<[usize; 16]>,
    pub offsets: SmallVec<[usize; 16]>,
    pub record_byte_size: usize,
}

/// Plans the bit layout for row-major `indices` over `column_count`
/// columns.
///
/// A column's width is the bit length of its largest index; a column whose
/// indices are all 0 (single symbol) gets width 0. Slots are assigned in
/// column order from the record's least-significant end, and the record is
/// padded up to a whole byte. When any rows exist the record is at least
/// one byte, so a table of only single-symbol columns still produces
/// non-empty records.
pub fn plan_layout(column_count: usize, indices: &[u32]) -> BitLayout {
    let row_count = if column_count == 0 {
        0
    } else {
        indices.len() / column_count
    };

    let mut widths = SmallVec::with_capacity(column_count);
    for column in 0..column_count {
        let max = (0..row_count)
            .map(|row| indices[row * column_count + column])
            .max()
            .unwrap_or(0);
        widths.push(if max == 0 {
            0
        } else {
            (32 - max.leading_zeros()) as usize
        });
    }

    let mut offsets = SmallVec::with_capacity(column_count);
    let mut total = 0usize;
    for &width in &widths {
        offsets.push(total);
        total += width;
    }

    let record_byte_size = if row_count == 0 {
        0
    } else {
        total.div_ceil(8).max(1)
    };

    BitLayout {
        widths,
        offsets,
        record_byte_size,
    }
}

/// Packs row-major `indices` into fixed-width records.
///
/// Column 0 occupies the least-significant bits of each record; the
/// extractor recovers every index with the planned `(offset, width)`
/// pairs, which is asserted per record in debug builds.
pub fn pack_records(indices: &[u32], layout: &BitLayout) -> Vec<u8> {
    let column_count = layout.widths.len();
    let row_count = if column_count == 0 {
        0
    } else {
        indices.len() / column_count
    };
    let record_size = layout.record_byte_size;

    let mut data = vec![0u8; row_count * record_size];
    for row in 0..row_count {
        let record = &mut data[row * record_size..(row + 1) * record_size];
        for column in 0..column_count {
            let width = layout.widths[column];
            if width == 0 {
                continue;
            }
            stuff(record, layout.offsets[column], indices[row * column_count + column]);
        }

        #[cfg(debug_assertions)]
        for column in 0..column_count {
            if layout.widths[column] > 0 {
                debug_assert_eq!(
                    super::decode::extract(record, layout.offsets[column], layout.widths[column]),
                    indices[row * column_count + column],
                    "packed record must decode to the written index"
                );
            }
        }
    }

    debug!(
        rows = row_count,
        record_byte_size = record_size,
        "packed index table"
    );
    data
}

/// ORs `value` into the record at `bit_offset` of its little-endian bit
/// view. The record is zero-initialized, so plain OR never clobbers a
/// neighboring slot.
fn stuff(record: &mut [u8], bit_offset: usize, value: u32) {
    let mut acc = (value as u64) << (bit_offset % 8);
    let mut byte = bit_offset / 8;
    while acc != 0 {
        record[byte] |= acc as u8;
        acc >>= 8;
        byte += 1;
    }
}
