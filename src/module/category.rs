use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EvaluateError;

/// The kind of evaluation a module performs.
///
/// Variant order is the search priority used when no category is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    #[serde(alias = "metrics")]
    Metric,
    #[serde(alias = "comparisons")]
    Comparison,
    #[serde(alias = "measurements")]
    Measurement,
}

impl ModuleCategory {
    /// Order in which categories are searched for a bare name.
    pub const SEARCH_ORDER: [ModuleCategory; 3] = [
        ModuleCategory::Metric,
        ModuleCategory::Comparison,
        ModuleCategory::Measurement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Comparison => "comparison",
            Self::Measurement => "measurement",
        }
    }

    /// Namespace directory for this category.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Metric => "metrics",
            Self::Comparison => "comparisons",
            Self::Measurement => "measurements",
        }
    }
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleCategory {
    type Err = EvaluateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "metrics" => Ok(Self::Metric),
            "comparison" | "comparisons" => Ok(Self::Comparison),
            "measurement" | "measurements" => Ok(Self::Measurement),
            _ => Err(EvaluateError::UnknownCategory {
                value: s.to_string(),
            }),
        }
    }
}
