// src/schema/types.rs

use thiserror::Error;

/// Structural problems with a table or with the options applied to it.
///
/// These are caller errors: nothing is retried and no output is produced
/// when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The table has no columns, so there is no identifier field.
    #[error("table has no columns; an identifier column is required")]
    NoColumns,

    /// An empty sentinel cannot be told apart from a missing field.
    #[error("sentinel value must not be empty")]
    EmptySentinel,

    /// The identifier width must be at least 1 and fit inside the table.
    #[error("id_columns = {id_columns} is out of range for a table with {columns} column(s)")]
    IdColumns { id_columns: usize, columns: usize },

    /// A row carries more fields than the table has columns.
    #[error("row {row} has {fields} field(s) but the table has {columns} column(s)")]
    RowTooWide {
        row: usize,
        fields: usize,
        columns: usize,
    },

    /// A named column was required but is absent from the header.
    #[error("column `{column}` not found in {table} table")]
    MissingColumn { column: String, table: String },
}

/// Position of `name` in `columns`, or `MissingColumn` tagged with `table`.
pub fn column_index(columns: &[String], name: &str, table: &str) -> Result<usize, SchemaError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
            table: table.to_string(),
        })
}
