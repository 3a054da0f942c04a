use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::process::{utils::delimiter_byte, PartitionOptions, DEFAULT_SENTINEL};

/// Options for cleaning a genotype table. Every field is optional in YAML:
///
/// ```yaml
/// sentinel: "-9"
/// id_columns: 1
/// delimiter: "\t"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanOptions {
    pub sentinel: String,
    pub id_columns: usize,
    pub delimiter: char,
}

impl Default for CleanOptions {
    fn default() -> Self {
        CleanOptions {
            sentinel: DEFAULT_SENTINEL.to_string(),
            id_columns: 1,
            delimiter: '\t',
        }
    }
}

impl CleanOptions {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading options {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing options {:?}", path))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn partition_options(&self) -> PartitionOptions {
        PartitionOptions {
            sentinel: self.sentinel.clone(),
            id_columns: self.id_columns,
        }
    }

    pub fn delimiter_byte(&self) -> Result<u8> {
        delimiter_byte(self.delimiter)
    }
}
