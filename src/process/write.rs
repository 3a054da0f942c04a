use anyhow::{bail, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::warn;

use super::RawTable;

/// Write `table` to `path` in the headerless delimited format it was read in.
///
/// The file is written next to `path` under a dotted temp name and then
/// renamed over it, so a failed run never leaves half a table behind.
pub fn write_table<P: AsRef<Path>>(path: P, table: &RawTable, delimiter: u8) -> Result<()> {
    write_tables(&[(path.as_ref(), table)], delimiter)
}

/// Write several tables as one unit: either every destination is replaced
/// or none is.
///
/// 1) refuse destinations that are directories
/// 2) stage every table to its dotted temp file
/// 3) rename each temp file into place
///
/// On any error the temp files are removed, and destinations already
/// renamed in step 3 are removed again.
pub fn write_tables(outputs: &[(&Path, &RawTable)], delimiter: u8) -> Result<()> {
    for (path, _) in outputs {
        if path.is_dir() {
            bail!("output path {:?} is a directory", path);
        }
    }

    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for (path, table) in outputs {
        match stage_table(path, table, delimiter) {
            Ok(tmp_path) => staged.push((tmp_path, *path)),
            Err(e) => {
                discard(staged.iter().map(|(tmp, _)| tmp.as_path()));
                return Err(e);
            }
        }
    }

    for (i, (tmp_path, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(tmp_path, path) {
            discard(staged[..i].iter().map(|(_, done)| *done));
            discard(staged[i..].iter().map(|(tmp, _)| tmp.as_path()));
            return Err(e).with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path));
        }
    }
    Ok(())
}

/// Write `table` to the dotted temp file beside `path`; the temp file is
/// removed again if writing fails.
fn stage_table(path: &Path, table: &RawTable, delimiter: u8) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .with_context(|| format!("output path has no file name: {:?}", path))?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let written = File::create(&tmp_path)
        .with_context(|| format!("creating {:?}", tmp_path))
        .and_then(|file| {
            write_table_to(BufWriter::new(file), table, delimiter)
                .with_context(|| format!("writing {:?}", tmp_path))
        });
    if let Err(e) = written {
        discard([tmp_path.as_path()]);
        return Err(e);
    }
    Ok(tmp_path)
}

fn discard<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove {:?}: {}", path, e);
            }
        }
    }
}

/// Write rows only (no header line), fields unquoted.
pub fn write_table_to<W: Write>(writer: W, table: &RawTable, delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
