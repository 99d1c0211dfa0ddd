//! Run configuration for the preview binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::{choose_split, DirectorySplits, RowLimit};

fn default_first_key() -> String {
    "predictions".to_string()
}

fn default_second_key() -> String {
    "references".to_string()
}

/// Which data to stream and how to present it.
///
/// ```json
/// {
///   "data_dir": "data",
///   "dataset": "squad",
///   "first_column": "prediction",
///   "second_column": "answer",
///   "n_rows": 10
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Root directory holding `<dataset>[/<subset>]/<split>.<ext>`.
    pub data_dir: PathBuf,
    pub dataset: String,
    #[serde(default)]
    pub subset: Option<String>,
    /// Explicit split; chosen by preference order when absent.
    #[serde(default)]
    pub split: Option<String>,
    pub first_column: String,
    #[serde(default)]
    pub second_column: Option<String>,
    #[serde(default = "default_first_key")]
    pub first_key: String,
    #[serde(default = "default_second_key")]
    pub second_key: String,
    #[serde(default)]
    pub n_rows: RowLimit,
}

impl RunConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading run config {}", path.display()))?;
        serde_json::from_str(&text).context("parsing run config")
    }

    pub fn splits(&self) -> DirectorySplits {
        DirectorySplits::new(&self.data_dir)
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.splits()
            .dataset_dir(&self.dataset, self.subset.as_deref())
    }

    /// The configured split, or the preferred one available on disk.
    pub fn resolve_split(&self) -> Result<String> {
        match &self.split {
            Some(split) => Ok(split.clone()),
            None => Ok(choose_split(
                &self.splits(),
                &self.dataset,
                self.subset.as_deref(),
            )?),
        }
    }
}
