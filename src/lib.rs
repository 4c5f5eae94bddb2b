//! # qvd - QlikView Data File Codec
//!
//! `qvd` reads and writes QVD files: the columnar, symbol-deduplicated,
//! bit-packed table format produced by QlikView and Qlik Sense. A file is
//! decoded into an in-memory [`QvdTable`] of typed values and a table is
//! encoded back to a file the same reader (or the original product) can
//! consume round-trip.
//!
//! ## Quick Start
//!
//! ```ignore
//! use qvd::{QvdTable, Value};
//!
//! // Read
//! let table = qvd::read_file("orders.qvd")?;
//! for row in table.rows() {
//!     println!("{row:?}");
//! }
//!
//! // Write
//! let table = QvdTable::from_rows(
//!     "orders",
//!     vec!["Key".into(), "Value".into()],
//!     vec![
//!         vec![Value::Int(1), Value::from("A")],
//!         vec![Value::Int(2), Value::from("B")],
//!     ],
//! )?;
//! qvd::write_file("orders.qvd", &table)?;
//! ```
//!
//! ## File Layout
//!
//! ```text
//! +---------------------+------------------+-----------------+----------------+
//! | XML header          | 0x0D 0x0A 0x00   | symbol region   | index region   |
//! | (variable)          | (terminator)     | (S bytes)       | (L bytes)      |
//! +---------------------+------------------+-----------------+----------------+
//! ```
//!
//! The header pins down everything that follows: per column, where its
//! deduplicated symbol stream sits inside the symbol region and which bit
//! slot its index occupies inside each fixed-width index record. Decoding
//! therefore needs the whole file resident; there is no streaming mode.
//!
//! ## Architecture
//!
//! Two synchronous pipelines share one data model:
//!
//! ```text
//! read:   bytes -> header::parse -> symbols::decode -> bitpack::decode -> QvdTable
//! write:  QvdTable -> symbols::encode -> bitpack::encode -> header::build -> bytes
//! ```
//!
//! On write the layout is computed from the data (leaves first), so the
//! three sections of the file are internally consistent by construction.
//! Decoders borrow read-only slices of the input buffer and publish owned
//! values; no partial table is ever returned on error.
//!
//! ## Module Overview
//!
//! - [`values`]: [`Symbol`] (the five wire shapes) and [`Value`] (cells)
//! - [`header`]: XML header parsing/building and the table layout contract
//! - [`symbols`]: tag-prefixed symbol stream codec
//! - [`bitpack`]: bit-stuffed index record codec
//! - [`table`]: [`QvdTable`] and row materialization
//! - [`reader`] / [`writer`]: the two pipelines
//! - [`file`]: mmap-backed `read_file` / `write_file`
//!
//! ## Errors
//!
//! Every failure mode is a distinct [`QvdError`] variant; see [`error`].
//! Decoders never recover and never warn: a file is either fully decoded
//! or rejected.

pub mod bitpack;
pub mod error;
pub mod file;
pub mod header;
pub mod reader;
pub mod symbols;
pub mod table;
pub mod values;
pub mod writer;

pub use error::{QvdError, Result};
pub use file::{read_file, read_file_with, write_file};
pub use reader::{decode, decode_with, DecodeOptions};
pub use symbols::TextEncoding;
pub use table::QvdTable;
pub use values::{Symbol, Value};
pub use writer::encode;
