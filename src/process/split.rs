// src/process/split.rs
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::config::CleanOptions;
use crate::process::{
    drop_empty_rows, load_table, non_empty_columns, partition_with, select_columns,
    utils::output_paths, write_tables,
};
use crate::schema::SchemaError;

/// What one cleaning run did to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanSummary {
    pub input: PathBuf,
    pub kept_path: PathBuf,
    pub sentinel_path: PathBuf,
    pub rows_read: usize,
    pub columns_read: usize,
    pub empty_columns_dropped: usize,
    pub empty_rows_dropped: usize,
    pub kept_rows: usize,
    pub sentinel_rows: usize,
}

/// Clean one genotype file and split it in two.
///
/// 1) load the headerless table and drop fully blank rows
/// 2) partition on the sentinel, using the file's own column positions so
///    the identifier block is exactly the first `id_columns` columns
/// 3) drop columns that are blank in every row from both halves
/// 4) write `<stem>.drop.<ext>` (rows with data) and `<stem>.sentinel.<ext>`
///
/// Both outputs are written together: nothing is left on disk unless every
/// step succeeds.
#[instrument(level = "info", skip(input, out_dir, opts), fields(input = %input.as_ref().display()))]
pub fn split_str_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out_dir: Q,
    opts: &CleanOptions,
) -> Result<CleanSummary> {
    let start = Instant::now();
    let input = input.as_ref();
    let out_dir = out_dir.as_ref();
    let delimiter = opts.delimiter_byte()?;

    let raw = load_table(input, delimiter)?;
    let cleaned = drop_empty_rows(&raw);
    let part = partition_with(&cleaned, &opts.partition_options())
        .with_context(|| format!("partitioning {:?}", input))?;

    // a file with no values at all has no identifier column either
    let keep = non_empty_columns(&cleaned);
    if keep.is_empty() {
        return Err(SchemaError::NoColumns).with_context(|| format!("partitioning {:?}", input));
    }
    let kept = select_columns(&part.kept, &keep);
    let sentinel = select_columns(&part.sentinel, &keep);

    let (kept_path, sentinel_path) = output_paths(input, out_dir)?;
    fs::create_dir_all(out_dir).with_context(|| format!("creating {:?}", out_dir))?;
    write_tables(
        &[(kept_path.as_path(), &kept), (sentinel_path.as_path(), &sentinel)],
        delimiter,
    )?;

    let summary = CleanSummary {
        input: input.to_path_buf(),
        kept_path,
        sentinel_path,
        rows_read: raw.num_rows(),
        columns_read: raw.num_columns(),
        empty_columns_dropped: raw.num_columns() - keep.len(),
        empty_rows_dropped: raw.num_rows() - cleaned.num_rows(),
        kept_rows: kept.num_rows(),
        sentinel_rows: sentinel.num_rows(),
    };

    if summary.kept_rows == 0 && summary.rows_read > 0 {
        warn!("every row is sentinel-only");
    }
    info!(
        kept = summary.kept_rows,
        sentinel = summary.sentinel_rows,
        empty_columns = summary.empty_columns_dropped,
        empty_rows = summary.empty_rows_dropped,
        elapsed = ?start.elapsed(),
        "split complete"
    );
    Ok(summary)
}

/// Clean several files in parallel.
///
/// Rejected before any work starts:
/// - two inputs whose outputs would land on the same path
/// - an output path that is itself one of the inputs (e.g. a glob that
///   picked up the `.drop`/`.sentinel` files of an earlier run)
pub fn split_str_files<Q: AsRef<Path>>(
    inputs: &[PathBuf],
    out_dir: Q,
    opts: &CleanOptions,
) -> Result<Vec<CleanSummary>> {
    let out_dir = out_dir.as_ref();

    let input_files: HashSet<PathBuf> = inputs.iter().map(|p| file_identity(p)).collect();
    let mut seen = HashSet::new();
    for input in inputs {
        let (kept, sentinel) = output_paths(input, out_dir)?;
        for output in [kept, sentinel] {
            if input_files.contains(&file_identity(&output)) {
                bail!(
                    "output {:?} of {:?} is also an input; move earlier outputs away or use another --out-dir",
                    output,
                    input
                );
            }
            if !seen.insert(output.clone()) {
                bail!("two inputs would both write {:?}", output);
            }
        }
    }

    inputs
        .par_iter()
        .map(|input| split_str_file(input, out_dir, opts))
        .collect()
}

/// Canonical path when the file exists, so `./x.str` and `x.str` compare equal.
fn file_identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{raw_table::rows_from, read_table};
    use std::io::Cursor;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,genoclean::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    // trailing tab columns are always blank, line 4 is all tabs
    const SAMPLE: &str = "ER01\t1\t120\t-9\t\t\n\
                          ER02\t1\t-9\t-9\t\t\n\
                          ER03\t2\t122\t130\t\t\n\
                          \t\t\t\t\t\n\
                          ER04\t2\t\t-9\t\t\n";

    fn read_back(path: &Path) -> Result<Vec<Vec<String>>> {
        let text = fs::read_to_string(path)?;
        Ok(read_table(Cursor::new(text), b'\t')?.rows)
    }

    #[test]
    fn splits_a_str_file_in_two() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("erisor.str");
        fs::write(&input, SAMPLE)?;
        let out_dir = dir.path().join("out");

        let opts = CleanOptions {
            id_columns: 2,
            ..CleanOptions::default()
        };
        let summary = split_str_file(&input, &out_dir, &opts)?;

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.columns_read, 6);
        assert_eq!(summary.empty_columns_dropped, 2);
        assert_eq!(summary.empty_rows_dropped, 1);
        assert_eq!(summary.kept_rows, 2);
        assert_eq!(summary.sentinel_rows, 2);
        assert_eq!(summary.kept_path, out_dir.join("erisor.drop.str"));

        assert_eq!(
            read_back(&summary.kept_path)?,
            rows_from(&[["ER01", "1", "120", "-9"], ["ER03", "2", "122", "130"]])
        );
        assert_eq!(
            read_back(&summary.sentinel_path)?,
            rows_from(&[["ER02", "1", "-9", "-9"], ["ER04", "2", "", "-9"]])
        );
        Ok(())
    }

    #[test]
    fn schema_error_writes_nothing() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("blank.str");
        fs::write(&input, "\t\t\n\t\t\n")?;

        let err = split_str_file(&input, dir.path(), &CleanOptions::default()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::NoColumns)
        );
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn splits_many_files_in_parallel() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let mut inputs = Vec::new();
        for name in ["plate1.str", "plate2.str", "plate3.str"] {
            let path = dir.path().join(name);
            fs::write(&path, "S1\t-9\nS2\t101\n")?;
            inputs.push(path);
        }

        let summaries = split_str_files(&inputs, dir.path().join("out"), &CleanOptions::default())?;

        assert_eq!(summaries.len(), 3);
        for s in &summaries {
            assert_eq!((s.kept_rows, s.sentinel_rows), (1, 1));
            assert!(s.kept_path.is_file() && s.sentinel_path.is_file());
        }
        Ok(())
    }

    #[test]
    fn blank_identifier_column_does_not_shift_genotypes() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("popflag.str");
        // column 1 (popflag) is empty in every row
        fs::write(&input, "S1\t\t120\t-9\nS2\t\t-9\t-9\n")?;

        let opts = CleanOptions {
            id_columns: 2,
            ..CleanOptions::default()
        };
        let summary = split_str_file(&input, dir.path().join("out"), &opts)?;

        assert_eq!((summary.kept_rows, summary.sentinel_rows), (1, 1));
        assert_eq!(summary.empty_columns_dropped, 1);
        assert_eq!(read_back(&summary.kept_path)?, rows_from(&[["S1", "120", "-9"]]));
        assert_eq!(
            read_back(&summary.sentinel_path)?,
            rows_from(&[["S2", "-9", "-9"]])
        );
        Ok(())
    }

    #[test]
    fn failed_sentinel_write_leaves_no_kept_file() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("e.str");
        fs::write(&input, "S1\t120\nS2\t-9\n")?;
        let out_dir = dir.path().join("out");
        fs::create_dir_all(out_dir.join("e.sentinel.str"))?;

        assert!(split_str_file(&input, &out_dir, &CleanOptions::default()).is_err());

        let names: Vec<String> = fs::read_dir(&out_dir)?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec!["e.sentinel.str"]);
        Ok(())
    }

    #[test]
    fn earlier_outputs_matched_as_inputs_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("x.str"), "S1\t120\n")?;
        fs::write(dir.path().join("x.drop.str"), "old\t1\n")?;
        let inputs = vec![dir.path().join("x.str"), dir.path().join("x.drop.str")];

        let err = split_str_files(&inputs, dir.path(), &CleanOptions::default()).unwrap_err();

        assert!(err.to_string().contains("is also an input"));
        assert_eq!(fs::read_to_string(dir.path().join("x.drop.str"))?, "old\t1\n");
        assert!(!dir.path().join("x.sentinel.str").exists());
        Ok(())
    }

    #[test]
    fn output_dir_spelled_differently_is_still_caught() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("x.str"), "S1\t120\n")?;
        fs::write(dir.path().join("x.sentinel.str"), "S2\t-9\n")?;
        let inputs = vec![dir.path().join("x.str"), dir.path().join("x.sentinel.str")];

        let out_dir = dir.path().join(".");
        assert!(split_str_files(&inputs, &out_dir, &CleanOptions::default()).is_err());
        Ok(())
    }

    #[test]
    fn colliding_outputs_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let inputs = vec![
            dir.path().join("a/plate.str"),
            dir.path().join("b/plate.str"),
        ];
        assert!(split_str_files(&inputs, dir.path(), &CleanOptions::default()).is_err());
        Ok(())
    }
}
