// src/compare/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};
use tracing::debug;

use crate::process::RawTable;
use crate::schema::{column_index, SchemaError};

/// Which columns join the two plate tables and which one is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    pub key_column: String,
    pub compare_column: String,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            key_column: "Well".to_string(),
            compare_column: "Sample".to_string(),
        }
    }
}

/// One joined pair of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub key: String,
    pub before: String,
    pub after: String,
    pub matches: bool,
}

/// Result of joining a "before" table with an "after" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Inner join on the key, in "before" order.
    pub rows: Vec<MergedRow>,
    pub before_rows: usize,
    pub after_rows: usize,
    /// Keys present only in "before", first-seen order.
    pub before_only: Vec<String>,
    /// Keys present only in "after", first-seen order.
    pub after_only: Vec<String>,
}

impl Comparison {
    pub fn mismatches(&self) -> impl Iterator<Item = &MergedRow> {
        self.rows.iter().filter(|r| !r.matches)
    }

    /// Differing row counts mean the tables do not cover the same wells.
    pub fn row_counts_match(&self) -> bool {
        self.before_rows == self.after_rows
    }
}

/// Open a comma-separated file whose first line names the columns.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_labelled_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file =
        File::open(&path).with_context(|| format!("Failed to open CSV: {:?}", path.as_ref()))?;
    let table = read_labelled_table(BufReader::new(file))
        .with_context(|| format!("Failed to parse CSV: {:?}", path.as_ref()))?;
    debug!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded labelled table"
    );
    Ok(table)
}

pub fn read_labelled_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::with_columns(columns, rows)?)
}

/// Inner-join `before` and `after` on the key column and compare one field.
///
/// A key repeated on either side yields every pairing, ordered by the
/// "before" row and then the "after" row.
pub fn compare_tables(
    before: &RawTable,
    after: &RawTable,
    opts: &CompareOptions,
) -> Result<Comparison, SchemaError> {
    let b_key = column_index(&before.columns, &opts.key_column, "before")?;
    let b_val = column_index(&before.columns, &opts.compare_column, "before")?;
    let a_key = column_index(&after.columns, &opts.key_column, "after")?;
    let a_val = column_index(&after.columns, &opts.compare_column, "after")?;

    let mut after_by_key: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in &after.rows {
        after_by_key
            .entry(field(row, a_key))
            .or_default()
            .push(field(row, a_val));
    }

    let mut rows = Vec::new();
    let mut before_only = Vec::new();
    let mut before_keys = HashSet::new();
    for row in &before.rows {
        let key = field(row, b_key);
        let before_value = field(row, b_val);
        let first_seen = before_keys.insert(key);
        match after_by_key.get(key) {
            Some(values) => {
                for after_value in values {
                    rows.push(MergedRow {
                        key: key.to_string(),
                        before: before_value.to_string(),
                        after: after_value.to_string(),
                        matches: before_value == *after_value,
                    });
                }
            }
            None if first_seen => before_only.push(key.to_string()),
            None => {}
        }
    }

    let mut after_only = Vec::new();
    let mut after_seen = HashSet::new();
    for row in &after.rows {
        let key = field(row, a_key);
        if !before_keys.contains(key) && after_seen.insert(key) {
            after_only.push(key.to_string());
        }
    }

    Ok(Comparison {
        rows,
        before_rows: before.num_rows(),
        after_rows: after.num_rows(),
        before_only,
        after_only,
    })
}

/// A missing field reads as empty.
fn field(row: &[String], idx: usize) -> &str {
    row.get(idx).map_or("", String::as_str)
}

/// Write the joined rows as CSV with header
/// `<key>,<compare>_before,<compare>_after,Match`.
pub fn write_comparison<W: Write>(
    writer: W,
    rows: &[&MergedRow],
    opts: &CompareOptions,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([
        opts.key_column.clone(),
        format!("{}_before", opts.compare_column),
        format!("{}_after", opts.compare_column),
        "Match".to_string(),
    ])?;
    for row in rows {
        wtr.write_record([
            row.key.as_str(),
            row.before.as_str(),
            row.after.as_str(),
            if row.matches { "true" } else { "false" },
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_comparison<P: AsRef<Path>>(
    path: P,
    rows: &[&MergedRow],
    opts: &CompareOptions,
) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating {:?}", path.as_ref()))?;
    write_comparison(BufWriter::new(file), rows, opts)
        .with_context(|| format!("writing {:?}", path.as_ref()))
}
