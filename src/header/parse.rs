//! # Header Parsing
//!
//! The header is located by scanning for the CR LF NUL terminator, then the
//! XML before it is walked with a `quick-xml` event reader. Only the
//! elements the layout contract needs are extracted; everything else
//! (`NumberFormat`, `Tags`, `Lineage`, producer-specific extras) is
//! ignored, so files from any writer parse as long as the mandatory
//! elements are present.
//!
//! A terminator match at offset 0 counts as found; rejection is left to the
//! XML parser, which will fail on the empty document.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{QvdError, Result};

use super::{FieldLayout, TableLayout};

/// Three-byte sequence that ends the XML header: CR, LF, NUL.
pub const HEADER_TERMINATOR: [u8; 3] = [0x0D, 0x0A, 0x00];

/// Returns the byte offset of the header terminator.
///
/// The symbol region starts three bytes after the returned offset.
pub fn locate_terminator(buf: &[u8]) -> Result<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
        .ok_or_else(|| QvdError::MalformedHeader("missing CR LF NUL header terminator".into()))
}

#[derive(Default)]
struct PendingField {
    name: Option<String>,
    symbol_offset: Option<usize>,
    symbol_length: Option<usize>,
    bit_offset: Option<usize>,
    bit_width: Option<usize>,
    bias: Option<i32>,
    symbol_count: Option<usize>,
}

impl PendingField {
    fn finish(self) -> Result<FieldLayout> {
        Ok(FieldLayout {
            name: required(self.name, "FieldName")?,
            symbol_offset: required(self.symbol_offset, "Offset")?,
            symbol_length: required(self.symbol_length, "Length")?,
            bit_offset: required(self.bit_offset, "BitOffset")?,
            bit_width: required(self.bit_width, "BitWidth")?,
            bias: required(self.bias, "Bias")?,
            symbol_count: required(self.symbol_count, "NoOfSymbols")?,
        })
    }
}

fn required<T>(value: Option<T>, element: &str) -> Result<T> {
    value.ok_or_else(|| QvdError::MalformedHeader(format!("missing mandatory element <{element}>")))
}

fn parse_decimal<T: std::str::FromStr>(element: &str, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| QvdError::MalformedHeader(format!("non-integer value in <{element}>: {text:?}")))
}

/// Decodes the XML header into a [`TableLayout`].
///
/// The input is the document text up to (not including) the terminator.
/// One or more `QvdFieldHeader` elements are collected in document order;
/// a single field needs no special casing because each occurrence simply
/// appends to the list.
pub fn parse_header(xml: &str) -> Result<TableLayout> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<String> = Vec::new();
    let mut pending: Option<PendingField> = None;
    let mut fields: Vec<FieldLayout> = Vec::new();
    let mut table_name: Option<String> = None;
    let mut row_count: Option<usize> = None;
    let mut record_byte_size: Option<usize> = None;
    let mut symbol_region_length: Option<usize> = None;
    let mut index_region_length: Option<usize> = None;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(QvdError::MalformedHeader(format!("xml parse failure: {e}")));
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if name == "QvdFieldHeader" {
                    pending = Some(PendingField::default());
                }
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                if stack.pop().as_deref() == Some("QvdFieldHeader") {
                    if let Some(done) = pending.take() {
                        fields.push(done.finish()?);
                    }
                }
            }
            Ok(Event::Empty(empty)) => {
                // A self-closing tag is an empty Start/End pair: it carries
                // no text, so the only bookkeeping it can trigger is a
                // field descriptor with every mandatory element missing.
                if empty.name().as_ref() == b"QvdFieldHeader" {
                    fields.push(PendingField::default().finish()?);
                }
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|e| {
                    QvdError::MalformedHeader(format!("xml parse failure: {e}"))
                })?;
                let text = text.trim();
                if text.is_empty() || stack.len() < 2 {
                    continue;
                }
                let leaf = stack[stack.len() - 1].as_str();
                let parent = stack[stack.len() - 2].as_str();

                if parent == "QvdFieldHeader" {
                    if let Some(field) = pending.as_mut() {
                        match leaf {
                            "FieldName" => field.name = Some(text.to_string()),
                            "Offset" => field.symbol_offset = Some(parse_decimal(leaf, text)?),
                            "Length" => field.symbol_length = Some(parse_decimal(leaf, text)?),
                            "BitOffset" => field.bit_offset = Some(parse_decimal(leaf, text)?),
                            "BitWidth" => field.bit_width = Some(parse_decimal(leaf, text)?),
                            "Bias" => field.bias = Some(parse_decimal(leaf, text)?),
                            "NoOfSymbols" => field.symbol_count = Some(parse_decimal(leaf, text)?),
                            _ => {}
                        }
                    }
                } else if parent == "QvdTableHeader" {
                    match leaf {
                        "TableName" => table_name = Some(text.to_string()),
                        "NoOfRecords" => row_count = Some(parse_decimal(leaf, text)?),
                        "RecordByteSize" => record_byte_size = Some(parse_decimal(leaf, text)?),
                        "Offset" => symbol_region_length = Some(parse_decimal(leaf, text)?),
                        "Length" => index_region_length = Some(parse_decimal(leaf, text)?),
                        _ => {}
                    }
                }
            }
            Ok(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(QvdError::MalformedHeader(format!(
            "xml parse failure: document ends inside <{open}>"
        )));
    }

    Ok(TableLayout {
        table_name: table_name.unwrap_or_default(),
        fields,
        record_byte_size: required(record_byte_size, "RecordByteSize")?,
        row_count: required(row_count, "NoOfRecords")?,
        symbol_region_length: required(symbol_region_length, "Offset")?,
        index_region_length: required(index_region_length, "Length")?,
    })
}
