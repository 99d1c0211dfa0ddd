use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::{EvaluateError, Result};

use super::loader::extension_rank;

/// Split names in order of preference: held-out splits first, training last.
pub const PREFERRED_SPLIT_ORDER: [&str; 10] = [
    "test",
    "testing",
    "eval",
    "evaluation",
    "validation",
    "val",
    "valid",
    "dev",
    "train",
    "training",
];

/// Something that knows which splits a dataset has.
pub trait SplitSource {
    fn available_splits(&self, dataset: &str, subset: Option<&str>) -> Result<BTreeSet<String>>;
}

/// Pick the evaluation split of `dataset` according to [`PREFERRED_SPLIT_ORDER`].
pub fn choose_split<S: SplitSource + ?Sized>(
    source: &S,
    dataset: &str,
    subset: Option<&str>,
) -> Result<String> {
    let available = source.available_splits(dataset, subset)?;
    match PREFERRED_SPLIT_ORDER
        .iter()
        .find(|split| available.contains(**split))
    {
        Some(split) => {
            log::debug!("Using split '{split}' of '{dataset}' (available: {available:?})");
            Ok(split.to_string())
        }
        None => Err(EvaluateError::UnsupportedSplit {
            dataset: dataset.to_string(),
            available,
        }),
    }
}

// ---------------------------------------------------------------------------
// DirectorySplits – splits stored as data files on disk
// ---------------------------------------------------------------------------

/// Layout: `<root>/<dataset>[/<subset>]/<split>.<ext>`, one file per split.
#[derive(Debug, Clone)]
pub struct DirectorySplits {
    root: PathBuf,
}

impl DirectorySplits {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the split files of `dataset` / `subset`.
    pub fn dataset_dir(&self, dataset: &str, subset: Option<&str>) -> PathBuf {
        let dir = self.root.join(dataset);
        match subset {
            Some(subset) => dir.join(subset),
            None => dir,
        }
    }
}

impl SplitSource for DirectorySplits {
    fn available_splits(&self, dataset: &str, subset: Option<&str>) -> Result<BTreeSet<String>> {
        let dir = self.dataset_dir(dataset, subset);
        let mut splits = BTreeSet::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || extension_rank(&path).is_none() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                splits.insert(stem.to_string());
            }
        }
        Ok(splits)
    }
}

/// A fixed set of split names, for callers that already know them.
impl SplitSource for BTreeSet<String> {
    fn available_splits(&self, _dataset: &str, _subset: Option<&str>) -> Result<BTreeSet<String>> {
        Ok(self.clone())
    }
}
