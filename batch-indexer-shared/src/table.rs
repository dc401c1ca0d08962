//! In-memory tabular artifact.
//!
//! A `Table` is the row/column form that flows between the pipeline
//! stages via persisted storage. Cell values are kept as opaque strings;
//! `None` marks a missing value. Every row carries the sequence number it
//! was assigned at extraction, which survives cleaning and serves as the
//! default document identity at load time.

/// One row of a tabular artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Row-sequence identity assigned by the extractor (0-based read
    /// order). Not a data field: deduplication ignores it.
    pub seq: u64,
    /// Field values in column order. `None` is a missing value.
    pub cells: Vec<Option<String>>,
}

impl TableRow {
    /// Create a row from its sequence number and cells.
    pub fn new(seq: u64, cells: Vec<Option<String>>) -> Self {
        Self { seq, cells }
    }

    /// Whether any cell is missing.
    pub fn has_missing(&self) -> bool {
        self.cells.iter().any(|c| c.is_none())
    }
}

/// A full tabular artifact: column names plus rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Column names, in source order.
    pub columns: Vec<String>,
    /// Rows, in extraction order.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table with the given columns and no rows.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_row_missing_detection() {
        let complete = TableRow::new(0, vec![cell("a"), cell("b")]);
        assert!(!complete.has_missing());

        let gappy = TableRow::new(1, vec![cell("a"), None]);
        assert!(gappy.has_missing());
    }

    #[test]
    fn test_column_index() {
        let table = Table::new(vec!["customer_id".to_string(), "age".to_string()]);
        assert_eq!(table.column_index("age"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_row_count() {
        let mut table = Table::new(vec!["a".to_string()]);
        assert!(table.is_empty());

        table.rows.push(TableRow::new(0, vec![cell("1")]));
        assert_eq!(table.row_count(), 1);
    }
}
