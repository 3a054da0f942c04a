use crate::process::raw_table::RawTable;
use crate::schema::SchemaError;

/// Placeholder genotype meaning "no call".
pub const DEFAULT_SENTINEL: &str = "-9";

/// How a row is judged sentinel-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOptions {
    /// Token treated the same as an empty field.
    pub sentinel: String,
    /// Number of leading identifier columns excluded from the check.
    pub id_columns: usize,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        PartitionOptions {
            sentinel: DEFAULT_SENTINEL.to_string(),
            id_columns: 1,
        }
    }
}

/// The two halves of a partitioned table, plus where each row came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Rows with at least one real data value.
    pub kept: RawTable,
    /// Rows whose data fields are all empty or the sentinel.
    pub sentinel: RawTable,
    /// Input row index of each row in `kept`, ascending.
    pub kept_index: Vec<usize>,
    /// Input row index of each row in `sentinel`, ascending.
    pub sentinel_index: Vec<usize>,
}

impl Partition {
    pub fn into_tables(self) -> (RawTable, RawTable) {
        (self.kept, self.sentinel)
    }

    /// Interleave both halves back into input order.
    pub fn reassemble(&self) -> RawTable {
        let mut rows = Vec::with_capacity(self.kept.num_rows() + self.sentinel.num_rows());
        let mut kept = self.kept_index.iter().zip(&self.kept.rows).peekable();
        let mut sentinel = self.sentinel_index.iter().zip(&self.sentinel.rows).peekable();

        loop {
            let next = match (kept.peek(), sentinel.peek()) {
                (Some((k, _)), Some((s, _))) if k < s => kept.next(),
                (_, Some(_)) => sentinel.next(),
                (Some(_), None) => kept.next(),
                (None, None) => break,
            };
            if let Some((_, row)) = next {
                rows.push(row.clone());
            }
        }

        RawTable {
            columns: self.kept.columns.clone(),
            rows,
        }
    }
}

/// True when every field after the first `id_columns` is empty or `sentinel`.
/// A row with no data fields is sentinel-only.
pub fn is_sentinel_only(row: &[String], id_columns: usize, sentinel: &str) -> bool {
    row.iter()
        .skip(id_columns)
        .all(|field| field.is_empty() || field == sentinel)
}

/// Split `table` on a single leading identifier column.
pub fn partition(table: &RawTable, sentinel: &str) -> Result<Partition, SchemaError> {
    partition_with(
        table,
        &PartitionOptions {
            sentinel: sentinel.to_string(),
            ..PartitionOptions::default()
        },
    )
}

/// Split `table` into rows that carry data and rows that are sentinel-only.
///
/// Both halves keep every input column and the input's relative row order.
/// Nothing is produced if the table has no columns, the sentinel is empty,
/// or `id_columns` is zero or wider than the table.
pub fn partition_with(table: &RawTable, opts: &PartitionOptions) -> Result<Partition, SchemaError> {
    if table.num_columns() == 0 {
        return Err(SchemaError::NoColumns);
    }
    if opts.sentinel.is_empty() {
        return Err(SchemaError::EmptySentinel);
    }
    if opts.id_columns == 0 || opts.id_columns > table.num_columns() {
        return Err(SchemaError::IdColumns {
            id_columns: opts.id_columns,
            columns: table.num_columns(),
        });
    }

    let mut kept = table.empty_like();
    let mut sentinel = table.empty_like();
    let mut kept_index = Vec::new();
    let mut sentinel_index = Vec::new();

    for (idx, row) in table.rows.iter().enumerate() {
        if is_sentinel_only(row, opts.id_columns, &opts.sentinel) {
            sentinel.rows.push(row.clone());
            sentinel_index.push(idx);
        } else {
            kept.rows.push(row.clone());
            kept_index.push(idx);
        }
    }

    Ok(Partition {
        kept,
        sentinel,
        kept_index,
        sentinel_index,
    })
}
