//! # Symbol Region Codec
//!
//! The symbol region is a concatenation of per-column sub-regions, each a
//! back-to-back stream of tagged symbols (see [`crate::values::symbol`] for
//! the tag table). The decoder consumes exactly the declared byte length of
//! each sub-region; any partial symbol at the end is a format error, so a
//! corrupt length can never silently yield a short table.
//!
//! String payloads are UTF-8 on the wire in both directions. Files written
//! by per-byte-char readers can be decoded with [`TextEncoding::Latin1`],
//! which maps every byte to the code point of the same value and never
//! fails.

pub mod decode;
pub mod encode;

#[cfg(test)]
mod tests;

pub use decode::decode_column;
pub use encode::encode_column;

/// How string payloads are interpreted on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid sequences are rejected.
    #[default]
    Utf8,
    /// Each byte maps to the Unicode code point of the same value.
    /// Never fails, always allocates.
    Latin1,
}
