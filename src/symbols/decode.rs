//! Symbol stream decoding.

use std::borrow::Cow;

use crate::error::{QvdError, Result};
use crate::values::symbol::{
    Symbol, TAG_DOUBLE, TAG_DUAL_DOUBLE, TAG_DUAL_INT, TAG_INT, TAG_TEXT,
};

use super::TextEncoding;

/// Decodes one column's symbol sub-region.
///
/// `data` must be exactly the column's declared symbol bytes; the decoder
/// consumes all of them and errors if the final symbol is truncated.
pub fn decode_column<'a>(
    data: &'a [u8],
    field: &str,
    encoding: TextEncoding,
) -> Result<Vec<Symbol<'a>>> {
    let mut symbols = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let tag = data[pos];
        pos += 1;
        let symbol = match tag {
            TAG_INT => Symbol::Int(i32::from_le_bytes(read_array(data, &mut pos, field)?)),
            TAG_DOUBLE => Symbol::Double(f64::from_le_bytes(read_array(data, &mut pos, field)?)),
            TAG_TEXT => Symbol::Text(read_text(data, &mut pos, field, encoding)?),
            TAG_DUAL_INT => {
                let number = i32::from_le_bytes(read_array(data, &mut pos, field)?);
                Symbol::DualInt(number, read_text(data, &mut pos, field, encoding)?)
            }
            TAG_DUAL_DOUBLE => {
                let number = f64::from_le_bytes(read_array(data, &mut pos, field)?);
                Symbol::DualDouble(number, read_text(data, &mut pos, field, encoding)?)
            }
            other => {
                return Err(QvdError::UnknownSymbolTag {
                    field: field.to_string(),
                    tag: other,
                });
            }
        };
        symbols.push(symbol);
    }

    Ok(symbols)
}

fn read_array<const N: usize>(data: &[u8], pos: &mut usize, field: &str) -> Result<[u8; N]> {
    let Some(end) = pos.checked_add(N).filter(|&end| end <= data.len()) else {
        return Err(QvdError::SymbolRegionOverrun {
            field: field.to_string(),
            reason: format!(
                "symbol payload needs {N} bytes but {} remain in the sub-region",
                data.len() - *pos
            ),
        });
    };
    let bytes = data[*pos..end].try_into().unwrap(); // INVARIANT: slice is exactly N bytes
    *pos = end;
    Ok(bytes)
}

fn read_text<'a>(
    data: &'a [u8],
    pos: &mut usize,
    field: &str,
    encoding: TextEncoding,
) -> Result<Cow<'a, str>> {
    let rest = &data[*pos..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| QvdError::InvalidSymbolEncoding {
            field: field.to_string(),
            reason: "string payload is unterminated within its sub-region".into(),
        })?;
    let bytes = &rest[..nul];
    *pos += nul + 1;

    match encoding {
        TextEncoding::Utf8 => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Cow::Borrowed(text)),
            Err(e) => Err(QvdError::InvalidSymbolEncoding {
                field: field.to_string(),
                reason: format!("string payload is not valid utf-8: {e}"),
            }),
        },
        TextEncoding::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| b as char).collect())),
    }
}
