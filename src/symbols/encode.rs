//! Symbol stream encoding.

use crate::values::Symbol;

/// Appends one column's symbols to the symbol region buffer, returning the
/// column's `(offset, length)` within it.
///
/// Deduplication happens when the table is built; this step emits the
/// symbol sequence exactly as given, so re-encoding a decoded table
/// reproduces its symbol bytes verbatim.
pub fn encode_column(symbols: &[Symbol<'_>], region: &mut Vec<u8>) -> (usize, usize) {
    let offset = region.len();
    for symbol in symbols {
        encode_symbol(symbol, region);
    }
    (offset, region.len() - offset)
}

fn encode_symbol(symbol: &Symbol<'_>, out: &mut Vec<u8>) {
    out.push(symbol.tag());
    match symbol {
        Symbol::Int(i) => out.extend_from_slice(&i.to_le_bytes()),
        Symbol::Double(d) => out.extend_from_slice(&d.to_le_bytes()),
        Symbol::Text(s) => push_text(s, out),
        Symbol::DualInt(i, s) => {
            out.extend_from_slice(&i.to_le_bytes());
            push_text(s, out);
        }
        Symbol::DualDouble(d, s) => {
            out.extend_from_slice(&d.to_le_bytes());
            push_text(s, out);
        }
    }
}

fn push_text(text: &str, out: &mut Vec<u8>) {
    debug_assert!(
        !text.as_bytes().contains(&0),
        "interior NUL must be rejected before encoding"
    );
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}
