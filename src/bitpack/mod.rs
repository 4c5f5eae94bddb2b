//! # Index Region Codec
//!
//! Each row of the index region is one fixed-width record of
//! `record_byte_size` bytes. Inside a record every column owns a bit slot
//! at `bit_offset` of `bit_width` bits, holding a raw index into the
//! column's symbol table; a signed per-column `bias` is added after
//! extraction.
//!
//! ## Bit order
//!
//! The format describes records through a double reversal (reverse the
//! bytes, expand MSB-first, reverse the bits), which collapses to a single
//! rule: treat the record as one little-endian integer and take
//! `bit_width` bits starting `bit_offset` from its least-significant end.
//! Both the extractor and the packer work byte-wise on that view, so no
//! bit array is ever materialized.
//!
//! ```text
//! record bytes:   B0       B1        (record_byte_size = 2)
//! bit indices:  7......0 15......8   (bit 0 = LSB of B0)
//! slot (3,5):        [ 7..3 ]        value bits, LSB at bit 3
//! ```
//!
//! A slot of width 0 is legal and yields raw index 0 without reading any
//! record bytes; writers emit it for single-symbol columns.

pub mod decode;
pub mod encode;


pub use decode::{decode_indices, extract};
pub use encode::{pack_records, plan_layout, BitLayout};
