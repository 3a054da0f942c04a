use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::Path,
};

use crate::{config::CleanOptions, process::split::CleanSummary};

/// One invocation of the cleaner: when it ran, with what options, and what
/// happened to each file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub processing_start: DateTime<Utc>,
    pub processing_end: DateTime<Utc>,
    pub options: CleanOptions,
    pub files: Vec<CleanSummary>,
}

impl RunRecord {
    pub fn total_kept(&self) -> usize {
        self.files.iter().map(|f| f.kept_rows).sum()
    }

    pub fn total_sentinel(&self) -> usize {
        self.files.iter().map(|f| f.sentinel_rows).sum()
    }
}

/// Write `record` as pretty JSON: to a dotted temp file, then rename over `path`.
pub fn write_run_record<P: AsRef<Path>>(path: P, record: &RunRecord) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .with_context(|| format!("summary path has no file name: {:?}", path))?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let mut tmp =
        fs::File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    serde_json::to_writer_pretty(&mut tmp, record).context("serializing run record")?;
    tmp.write_all(b"\n")?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    Ok(())
}

pub fn read_run_record<P: AsRef<Path>>(path: P) -> Result<RunRecord> {
    let f = fs::File::open(&path).with_context(|| format!("opening {:?}", path.as_ref()))?;
    serde_json::from_reader(f).with_context(|| format!("parsing {:?}", path.as_ref()))
}
