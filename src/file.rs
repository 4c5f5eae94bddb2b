//! # File Wrappers
//!
//! Thin on-disk entry points around the byte-level pipelines. Reads map
//! the file instead of copying it into a heap buffer; the decoder borrows
//! string data straight out of the map and the table is detached from it
//! before the map is dropped.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{QvdError, Result};
use crate::reader::{decode_with, DecodeOptions};
use crate::table::QvdTable;
use crate::writer::encode_named;

/// Reads and decodes a QVD file.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<QvdTable<'static>> {
    read_file_with(path, &DecodeOptions::default())
}

/// Reads and decodes a QVD file with explicit [`DecodeOptions`].
pub fn read_file_with<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<QvdTable<'static>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(QvdError::MalformedHeader(
            "missing CR LF NUL header terminator".into(),
        ));
    }
    // SAFETY: the map is read-only and private to this call; it outlives
    // every borrow the decoder takes, and the table is converted to owned
    // storage before the map is dropped.
    let map = unsafe { Mmap::map(&file)? };
    let table = decode_with(&map, options)?;
    Ok(table.into_owned())
}

/// Encodes a table and writes it to `path`.
///
/// The file's `TableName` is the path's stem (file name without
/// extension); the table's own name is not modified.
pub fn write_file<P: AsRef<Path>>(path: P, table: &QvdTable<'_>) -> Result<()> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = encode_named(table, &name)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
