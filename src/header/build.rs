//! # Header Construction
//!
//! Serializes a computed [`TableLayout`] back into the XML document a QVD
//! reader expects. The element set and order follow what the original
//! producer emits, with `Compression` and `EncryptionInfo` always empty
//! (compressed and encrypted files are not written).
//!
//! The document is emitted with two-space indentation and CRLF line
//! endings, followed by a final CRLF. The NUL that completes the header
//! terminator is appended by the file assembly step, not here.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{QvdError, Result};

use super::TableLayout;

const QV_BUILD_NO: &str = "50668";

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn open(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(serialize_err)
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(serialize_err)
    }

    /// Writes `<name>value</name>`; an empty value yields a paired empty
    /// element rather than a self-closing one.
    fn leaf(&mut self, name: &str, value: &str) -> Result<()> {
        self.open(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(serialize_err)?;
        self.close(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn serialize_err<E: std::fmt::Display>(e: E) -> QvdError {
    QvdError::MalformedHeader(format!("header serialization failure: {e}"))
}

/// Builds the XML header bytes for a computed layout.
///
/// `CreatorDoc` is a fresh UUID and `CreateUtcTime` the current UTC time;
/// both change between otherwise identical encodes, and are the only
/// volatile bytes a re-encode produces.
pub fn build_header(layout: &TableLayout) -> Result<Vec<u8>> {
    let mut out = XmlOut::new();

    out.open("QvdTableHeader")?;
    out.leaf("QvBuildNo", QV_BUILD_NO)?;
    out.leaf("CreatorDoc", &uuid::Uuid::new_v4().to_string())?;
    out.leaf(
        "CreateUtcTime",
        &chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    )?;
    out.leaf("SourceCreateUtcTime", "")?;
    out.leaf("SourceFileUtcTime", "")?;
    out.leaf("StaleUtcTime", "")?;
    out.leaf("TableName", &layout.table_name)?;
    out.leaf("SourceFileSize", "-1")?;

    out.open("Fields")?;
    for field in &layout.fields {
        out.open("QvdFieldHeader")?;
        out.leaf("FieldName", &field.name)?;
        out.leaf("BitOffset", &field.bit_offset.to_string())?;
        out.leaf("BitWidth", &field.bit_width.to_string())?;
        out.leaf("Bias", &field.bias.to_string())?;
        out.leaf("NoOfSymbols", &field.symbol_count.to_string())?;
        out.leaf("Offset", &field.symbol_offset.to_string())?;
        out.leaf("Length", &field.symbol_length.to_string())?;
        out.leaf("Comment", "")?;
        out.open("NumberFormat")?;
        out.leaf("Type", "UNKNOWN")?;
        out.leaf("nDec", "0")?;
        out.leaf("UseThou", "0")?;
        out.leaf("Fmt", "")?;
        out.leaf("Dec", "")?;
        out.leaf("Thou", "")?;
        out.close("NumberFormat")?;
        out.leaf("Tags", "")?;
        out.close("QvdFieldHeader")?;
    }
    out.close("Fields")?;

    out.leaf("Compression", "")?;
    out.leaf("RecordByteSize", &layout.record_byte_size.to_string())?;
    out.leaf("NoOfRecords", &layout.row_count.to_string())?;
    out.leaf("Offset", &layout.symbol_region_length.to_string())?;
    out.leaf("Length", &layout.index_region_length.to_string())?;
    out.leaf("Comment", "")?;
    out.leaf("EncryptionInfo", "")?;
    out.leaf("TableTags", "")?;
    out.leaf("ProfilingData", "")?;
    out.open("Lineage")?;
    out.open("LineageInfo")?;
    out.leaf("Discriminator", "INLINE;")?;
    out.leaf("Statement", "")?;
    out.close("LineageInfo")?;
    out.close("Lineage")?;
    out.close("QvdTableHeader")?;

    let xml = out.finish();

    // quick-xml separates lines with bare LF; the format wants CRLF and a
    // final CRLF after the document.
    let mut bytes = Vec::with_capacity(xml.len() + xml.len() / 16 + 2);
    for &b in &xml {
        if b == b'\n' {
            bytes.push(b'\r');
        }
        bytes.push(b);
    }
    bytes.extend_from_slice(b"\r\n");
    Ok(bytes)
}
