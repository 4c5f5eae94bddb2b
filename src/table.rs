//! # In-Memory Table
//!
//! [`QvdTable`] is the value both pipelines share: an ordered list of
//! column names, one symbol sequence per column, and a row-major index
//! table pointing into those sequences. Decoding produces it; encoding
//! consumes it unchanged, which is what makes a decode/encode cycle
//! reproduce the symbol and index bytes verbatim.
//!
//! Tables built from raw rows go through value classification and
//! per-column deduplication here. Row access materializes each cell on
//! demand by following `indices[row][column]` into the symbol table and
//! taking the symbol's primary value; nothing is cached, so a table is a
//! compact columnar structure no matter how wide its materialized rows
//! would be.

use hashbrown::HashMap;

use crate::error::{QvdError, Result};
use crate::values::{Symbol, Value};

/// A decoded or to-be-encoded QVD table.
#[derive(Debug, Clone)]
pub struct QvdTable<'a> {
    name: String,
    columns: Vec<String>,
    symbols: Vec<Vec<Symbol<'a>>>,
    /// Row-major, `row_count * columns.len()` entries.
    indices: Vec<u32>,
    row_count: usize,
}

impl<'a> QvdTable<'a> {
    pub(crate) fn from_parts(
        name: String,
        columns: Vec<String>,
        symbols: Vec<Vec<Symbol<'a>>>,
        indices: Vec<u32>,
        row_count: usize,
    ) -> Self {
        debug_assert_eq!(symbols.len(), columns.len());
        debug_assert_eq!(indices.len(), row_count * columns.len());
        Self {
            name,
            columns,
            symbols,
            indices,
            row_count,
        }
    }

    /// Builds a table from raw rows, classifying every cell into its wire
    /// shape and deduplicating per column in first-occurrence order.
    ///
    /// Every row must have one cell per column. Null cells and text
    /// containing an interior NUL have no QVD representation and are
    /// rejected.
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value<'a>>>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(QvdError::WriteUnrepresentable {
                row: 0,
                column: String::new(),
                reason: "a table needs at least one column".into(),
            });
        }

        let column_count = columns.len();
        let row_count = rows.len();
        let mut symbols: Vec<Vec<Symbol<'a>>> = vec![Vec::new(); column_count];
        let mut lookup: Vec<HashMap<Symbol<'a>, u32>> = vec![HashMap::new(); column_count];
        let mut indices = Vec::with_capacity(row_count * column_count);

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != column_count {
                return Err(QvdError::WriteUnrepresentable {
                    row: row_idx,
                    column: String::new(),
                    reason: format!(
                        "row has {} cells but the table has {} columns",
                        row.len(),
                        column_count
                    ),
                });
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                if let Value::Text(text) = &cell {
                    if text.as_bytes().contains(&0) {
                        return Err(QvdError::WriteUnrepresentable {
                            row: row_idx,
                            column: columns[col_idx].clone(),
                            reason: "text contains an interior NUL byte".into(),
                        });
                    }
                }
                let symbol = Symbol::classify(cell).ok_or_else(|| {
                    QvdError::WriteUnrepresentable {
                        row: row_idx,
                        column: columns[col_idx].clone(),
                        reason: "null cells have no symbol representation".into(),
                    }
                })?;

                // Clone the symbol only on a genuine miss; duplicates are
                // the common case this dedup exists for.
                let index = match lookup[col_idx].get(&symbol) {
                    Some(&index) => index,
                    None => {
                        let index = symbols[col_idx].len() as u32;
                        symbols[col_idx].push(symbol.clone());
                        lookup[col_idx].insert(symbol, index);
                        index
                    }
                };
                indices.push(index);
            }
        }

        Ok(Self {
            name: name.into(),
            columns,
            symbols,
            indices,
            row_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Per-column symbol sequences, in index order.
    pub fn symbols(&self) -> &[Vec<Symbol<'a>>] {
        &self.symbols
    }

    /// One column's symbol sequence.
    pub fn column_symbols(&self, column: usize) -> Option<&[Symbol<'a>]> {
        self.symbols.get(column).map(Vec::as_slice)
    }

    /// The symbol index stored for a cell.
    pub fn index(&self, row: usize, column: usize) -> Option<u32> {
        if row >= self.row_count || column >= self.columns.len() {
            return None;
        }
        Some(self.indices[row * self.columns.len() + column])
    }

    pub(crate) fn raw_indices(&self) -> &[u32] {
        &self.indices
    }

    /// Materializes one cell as its primary value.
    pub fn get(&self, row: usize, column: usize) -> Option<Value<'_>> {
        let index = self.index(row, column)? as usize;
        Some(self.symbols[column][index].primary())
    }

    /// Materializes rows in order; O(columns) per row.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value<'_>>> + '_ {
        (0..self.row_count).map(move |row| {
            (0..self.columns.len())
                .map(|column| {
                    let index = self.indices[row * self.columns.len() + column] as usize;
                    self.symbols[column][index].primary()
                })
                .collect()
        })
    }

    /// Detaches the table from any borrowed file buffer.
    pub fn into_owned(self) -> QvdTable<'static> {
        QvdTable {
            name: self.name,
            columns: self.columns,
            symbols: self
                .symbols
                .into_iter()
                .map(|column| column.into_iter().map(Symbol::into_owned).collect())
                .collect(),
            indices: self.indices,
            row_count: self.row_count,
        }
    }
}
