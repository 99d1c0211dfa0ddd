//! Error types for module resolution, split selection and column access.

use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, EvaluateError>;

/// Everything that can go wrong while resolving a module or reading a view.
///
/// Messages always carry the offending identifier, since callers have no
/// other diagnostic channel.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// Bare name absent from every searched category
    #[error("Could not find module '{name}' in any module type directory")]
    ModuleNotFound { name: String },

    /// Bare name absent from the one category the caller asked for
    #[error("Could not import module '{name}' from {path}")]
    ImportFailed { name: String, path: String },

    /// The unit was found but does not export the expected class
    #[error("Could not find main class '{class}' in module '{name}'")]
    MissingClass { name: String, class: String },

    /// Category tag outside {metric, comparison, measurement}
    #[error("Unknown module type '{value}' (expected metric, comparison or measurement)")]
    UnknownCategory { value: String },

    /// None of the preferred split names is available
    #[error(
        "No dataset split defined for '{dataset}' (available: {available:?})! \
         Pass an explicit value to the `split` option."
    )]
    UnsupportedSplit {
        dataset: String,
        available: BTreeSet<String>,
    },

    /// View or dataset indexed past its length
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Row has no value for the requested column
    #[error("Row {index} has no column '{column}'")]
    ColumnNotFound { column: String, index: usize },

    /// Data file with an extension no loader handles
    #[error("Unsupported data file: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Failure reported by the dataset backend itself
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvaluateError {
    /// Whether the error came out of module resolution.
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ModuleNotFound { .. }
                | Self::ImportFailed { .. }
                | Self::MissingClass { .. }
                | Self::UnknownCategory { .. }
        )
    }

    /// Whether the error came out of reading a dataset through a view.
    #[must_use]
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. } | Self::ColumnNotFound { .. } | Self::Dataset { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_not_found_names_identifier_once() {
        let err = EvaluateError::ModuleNotFound {
            name: "mauve".into(),
        };
        let msg = err.to_string();
        assert_eq!(msg.matches("mauve").count(), 1);
        assert!(err.is_resolution_error());
        assert!(!err.is_access_error());
    }

    #[test]
    fn test_import_failed_names_path() {
        let err = EvaluateError::ImportFailed {
            name: "bleu".into(),
            path: "comparisons/bleu/bleu".into(),
        };
        assert!(err.to_string().contains("comparisons/bleu/bleu"));
    }

    #[test]
    fn test_unsupported_split_mentions_explicit_split() {
        let err = EvaluateError::UnsupportedSplit {
            dataset: "squad".into(),
            available: ["extra".to_string()].into_iter().collect(),
        };
        let msg = err.to_string();
        assert!(msg.contains("squad"));
        assert!(msg.contains("`split`"));
    }

    #[test]
    fn test_index_out_of_range_is_access_error() {
        let err = EvaluateError::IndexOutOfRange { index: 5, len: 5 };
        assert!(err.is_access_error());
        assert_eq!(err.to_string(), "Index 5 out of range for length 5");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EvaluateError = io.into();
        assert!(matches!(err, EvaluateError::Io(_)));
    }
}
