//! Loading a module from a descriptor file instead of by registered name.
//!
//! A descriptor is a JSON file whose stem is the module identifier. Its
//! `exports` play the role of the classes a source file would define; each
//! export builds on a registered implementation with its own defaults:
//!
//! ```json
//! {
//!   "exports": {
//!     "Loose_match": {
//!       "base": "exact_match",
//!       "module_type": "comparison",
//!       "config_name": "ignore_case",
//!       "kwargs": { "ignore_case": true }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::registry::{class_name, instantiate, LoadOptions, ModuleRegistry};
use super::{EvaluationModule, ModuleCategory, ModuleConfig};
use crate::error::{EvaluateError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescriptor {
    pub exports: BTreeMap<String, ExportSpec>,
}

/// One exported class of a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSpec {
    /// Registered module the export is built on.
    pub base: String,
    #[serde(default)]
    pub module_type: Option<ModuleCategory>,
    #[serde(default)]
    pub config_name: Option<String>,
    #[serde(default)]
    pub kwargs: Map<String, JsonValue>,
}

impl ModuleDescriptor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ModuleRegistry {
    /// Load the module described by the file at `path`.
    ///
    /// The export named after the capitalized file stem is used. Caller
    /// options win over the export's defaults: `config_name` when set,
    /// `kwargs` key by key. `options.module_type` only applies when the
    /// export does not name a category itself.
    pub fn load_from_file(
        &self,
        path: &Path,
        options: LoadOptions,
    ) -> Result<Box<dyn EvaluationModule>> {
        let identifier = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| EvaluateError::ModuleNotFound {
                name: path.display().to_string(),
            })?;
        let descriptor = ModuleDescriptor::from_path(path)?;

        let class = class_name(identifier);
        let export = descriptor
            .exports
            .get(&class)
            .ok_or_else(|| EvaluateError::MissingClass {
                name: identifier.to_string(),
                class: class.clone(),
            })?;
        log::debug!(
            "Loading {class} from {} (base '{}')",
            path.display(),
            export.base
        );

        let module_type = export.module_type.or(options.module_type);
        let (category, unit) = self.resolve(&export.base, module_type)?;

        let mut kwargs = export.kwargs.clone();
        kwargs.extend(options.kwargs);
        instantiate(
            &export.base,
            unit,
            ModuleConfig {
                category: Some(category),
                config_name: options.config_name.or_else(|| export.config_name.clone()),
                kwargs,
            },
        )
    }
}
