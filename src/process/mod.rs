// src/process/mod.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

pub mod partition;
pub mod raw_table;
pub mod split;
pub mod trimming;
pub mod utils;
pub mod write;

pub use partition::{partition, partition_with, Partition, PartitionOptions, DEFAULT_SENTINEL};
pub use raw_table::RawTable;
pub use trimming::{drop_empty_columns, drop_empty_rows, non_empty_columns, select_columns};
pub use write::{write_table, write_table_to, write_tables};

/// Open `path` and parse it as a headerless delimited table.
///
/// - Quoting is off: genotype files never quote and a stray `"` is data.
/// - Ragged lines are padded to the widest line.
/// - Zero-length lines are skipped; a line of bare delimiters becomes an
///   all-empty row.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open table file: {:?}", path.as_ref()))?;
    let table = read_table(BufReader::new(file), delimiter)
        .with_context(|| format!("Failed to parse table file: {:?}", path.as_ref()))?;

    debug!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded table"
    );
    Ok(table)
}

/// Parse a headerless delimited table from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("parse error at record {}", idx))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::from_rows(rows))
}
