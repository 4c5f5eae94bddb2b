//! # Error Types
//!
//! Every failure the codec can produce is a distinct [`QvdError`] variant, so
//! callers can match on the kind of corruption (or unrepresentable input)
//! without parsing message strings. Decoders never recover: the first error
//! aborts the pipeline and no partially-built table is published.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QvdError>;

/// Errors surfaced by the decode and encode pipelines.
#[derive(Debug, Error)]
pub enum QvdError {
    /// The XML header is missing its terminator, fails to parse, or lacks a
    /// mandatory element.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The symbol byte stream contains a type tag outside {1, 2, 4, 5, 6}.
    #[error("unknown symbol tag 0x{tag:02x} in field \"{field}\"")]
    UnknownSymbolTag { field: String, tag: u8 },

    /// A string payload is not valid UTF-8, or runs past its column
    /// sub-region without a NUL terminator.
    #[error("invalid symbol encoding in field \"{field}\": {reason}")]
    InvalidSymbolEncoding { field: String, reason: String },

    /// A column's declared symbol bytes extend past the symbol region, or a
    /// symbol payload extends past the column's declared length.
    #[error("symbol region overrun in field \"{field}\": {reason}")]
    SymbolRegionOverrun { field: String, reason: String },

    /// A decoded (bias-adjusted) symbol index points outside the column's
    /// symbol sequence.
    #[error(
        "symbol index {index} out of range for field \"{field}\" at row {row} ({count} symbols)"
    )]
    IndexOutOfRange {
        field: String,
        row: usize,
        index: i64,
        count: usize,
    },

    /// A field's bit slot does not fit inside the fixed-width index record.
    #[error(
        "bit layout overflow in field \"{field}\": offset {bit_offset} + width {bit_width} \
         exceeds {record_bits} record bits"
    )]
    BitLayoutOverflow {
        field: String,
        bit_offset: usize,
        bit_width: usize,
        record_bits: usize,
    },

    /// A value handed to the encoder cannot be written to a QVD file.
    #[error("cannot encode value at row {row}, column \"{column}\": {reason}")]
    WriteUnrepresentable {
        row: usize,
        column: String,
        reason: String,
    },

    /// Underlying byte-stream failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
