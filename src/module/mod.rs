//! Evaluation modules and the registry that resolves them by name.
//!
//! A module is found in three steps:
//!
//! ```text
//!   "exact_match"
//!        │  search metric → comparison → measurement
//!        ▼
//!   ModuleUnit   (metrics/exact_match/exact_match)
//!        │  export named "Exact_match"
//!        ▼
//!   ModuleFactory(ModuleConfig) → Box<dyn EvaluationModule>
//! ```

pub mod category;
pub mod descriptor;
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::data::Row;
use crate::error::Result;

pub use category::ModuleCategory;
pub use descriptor::{ExportSpec, ModuleDescriptor};
pub use registry::{class_name, LoadOptions, ModuleRegistry, ModuleUnit};

/// Named scores produced by one `compute` call.
pub type Scores = BTreeMap<String, f64>;

/// Constructor registered for a module class.
pub type ModuleFactory = fn(ModuleConfig) -> Result<Box<dyn EvaluationModule>>;

/// What a module instance is built with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleConfig {
    /// Category the module was resolved under.
    pub category: Option<ModuleCategory>,
    /// Named configuration variant, e.g. `"strict"`.
    pub config_name: Option<String>,
    /// Free-form keyword arguments, forwarded verbatim.
    pub kwargs: Map<String, JsonValue>,
}

impl ModuleConfig {
    pub fn kwarg(&self, key: &str) -> Option<&JsonValue> {
        self.kwargs.get(key)
    }
}

/// A metric, comparison or measurement implementation.
///
/// The registry only constructs modules; what `compute` does with the
/// records is up to the implementation.
pub trait EvaluationModule: fmt::Debug + Send {
    /// Class name of the implementation, e.g. `Mauve`.
    fn name(&self) -> &str;

    fn config(&self) -> &ModuleConfig;

    fn category(&self) -> Option<ModuleCategory> {
        self.config().category
    }

    fn config_name(&self) -> Option<&str> {
        self.config().config_name.as_deref()
    }

    /// Score a stream of records, typically the iterator of a
    /// [`ColumnPairView`](crate::data::ColumnPairView).
    fn compute(&self, records: &mut dyn Iterator<Item = Result<Row>>) -> Result<Scores>;
}
