use anyhow::{bail, Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

/// Suffix inserted before the extension of the file holding rows with data.
pub const KEPT_SUFFIX: &str = "drop";
/// Suffix inserted before the extension of the file holding sentinel-only rows.
pub const SENTINEL_SUFFIX: &str = "sentinel";

/// Output locations for one input: `<out_dir>/<stem>.drop.<ext>` and
/// `<out_dir>/<stem>.sentinel.<ext>`. Inputs without an extension get `str`.
pub fn output_paths(input: &Path, out_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let stem = input
        .file_stem()
        .with_context(|| format!("input has no file name: {:?}", input))?
        .to_string_lossy();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "str".to_string());

    Ok((
        out_dir.join(format!("{}.{}.{}", stem, KEPT_SUFFIX, ext)),
        out_dir.join(format!("{}.{}.{}", stem, SENTINEL_SUFFIX, ext)),
    ))
}

/// Expand each argument as a glob pattern; plain paths pass through as-is.
/// Fails if a pattern matches nothing.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let matched: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();
        if matched.is_empty() {
            bail!("No files found matching '{}'", pattern);
        }
        paths.extend(matched);
    }
    Ok(paths)
}

/// Single-byte field delimiter from a configured character.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        bail!("delimiter {:?} is not a single ASCII character", delimiter);
    }
    Ok(delimiter as u8)
}
