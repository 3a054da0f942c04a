use crate::schema::SchemaError;

/// An in-memory table of untyped text fields.
///
/// Every row has exactly `columns.len()` fields; constructors pad short rows
/// with empty strings so callers never see a ragged table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names. Headerless files get positional names "0", "1", ...
    pub columns: Vec<String>,
    /// Each row, as a Vec of Strings (one per column).
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a headerless table. Width is the longest row; shorter rows are padded.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        RawTable {
            columns: positional_columns(width),
            rows,
        }
    }

    /// Build a table with explicit column names, padding short rows.
    pub fn with_columns(
        columns: Vec<String>,
        mut rows: Vec<Vec<String>>,
    ) -> Result<Self, SchemaError> {
        let width = columns.len();
        for (idx, row) in rows.iter_mut().enumerate() {
            if row.len() > width {
                return Err(SchemaError::RowTooWide {
                    row: idx,
                    fields: row.len(),
                    columns: width,
                });
            }
            row.resize(width, String::new());
        }
        Ok(RawTable { columns, rows })
    }

    /// Same columns, no rows.
    pub fn empty_like(&self) -> Self {
        RawTable {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn positional_columns(width: usize) -> Vec<String> {
    (0..width).map(|i| i.to_string()).collect()
}

#[cfg(test)]
pub(crate) fn rows_from<const N: usize>(rows: &[[&str; N]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}
