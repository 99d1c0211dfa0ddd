use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use super::{EvaluationModule, ModuleCategory, ModuleConfig, ModuleFactory};
use crate::error::{EvaluateError, Result};

/// Class name expected for a module identifier: first character upper-cased,
/// the rest lower-cased (`mauve` → `Mauve`, `exact_match` → `Exact_match`).
pub fn class_name(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Namespace path of a module unit, `<category>/<name>/<name>`.
pub fn namespace_path(category: ModuleCategory, name: &str) -> String {
    format!("{}/{name}/{name}", category.directory())
}

// ---------------------------------------------------------------------------
// ModuleUnit – one loadable unit and the classes it exports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ModuleUnit {
    description: Option<String>,
    exports: BTreeMap<String, ModuleFactory>,
}

impl ModuleUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit exporting a single class named after `identifier`.
    pub fn single(identifier: &str, factory: ModuleFactory) -> Self {
        Self::new().export(class_name(identifier), factory)
    }

    pub fn export(mut self, class: impl Into<String>, factory: ModuleFactory) -> Self {
        self.exports.insert(class.into(), factory);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn get(&self, class: &str) -> Option<ModuleFactory> {
        self.exports.get(class).copied()
    }

    pub fn exports(&self) -> impl Iterator<Item = &str> {
        self.exports.keys().map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

// ---------------------------------------------------------------------------
// LoadOptions – everything a caller can pass besides the name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_name: Option<String>,
    /// Restrict the search to one category.
    pub module_type: Option<ModuleCategory>,
    pub kwargs: Map<String, JsonValue>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_name(mut self, config_name: impl Into<String>) -> Self {
        self.config_name = Some(config_name.into());
        self
    }

    pub fn with_module_type(mut self, module_type: ModuleCategory) -> Self {
        self.module_type = Some(module_type);
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn with_kwargs(mut self, kwargs: Map<String, JsonValue>) -> Self {
        self.kwargs.extend(kwargs);
        self
    }
}

// ---------------------------------------------------------------------------
// ModuleRegistry – the namespace bare names are resolved in
// ---------------------------------------------------------------------------

/// Map of `(category, name)` to module units.
///
/// Populated once at startup; lookups never mutate it, and nothing a
/// `load` returns is retained.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    units: BTreeMap<(ModuleCategory, String), ModuleUnit>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit under `<category>/<name>/<name>`, returning any unit it replaces.
    pub fn register(
        &mut self,
        category: ModuleCategory,
        name: impl Into<String>,
        unit: ModuleUnit,
    ) -> Option<ModuleUnit> {
        self.units.insert((category, name.into()), unit)
    }

    /// Shorthand for registering a unit that exports one class named after `name`.
    pub fn register_class(
        &mut self,
        category: ModuleCategory,
        name: &str,
        factory: ModuleFactory,
    ) -> Option<ModuleUnit> {
        self.register(category, name, ModuleUnit::single(name, factory))
    }

    /// Namespace lookup of `<category>/<name>/<name>`.
    pub fn locate(&self, category: ModuleCategory, name: &str) -> Option<&ModuleUnit> {
        self.units.get(&(category, name.to_string()))
    }

    /// Registered `(category, name)` pairs in search order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleCategory, &str)> {
        self.units.keys().map(|(c, n)| (*c, n.as_str()))
    }

    /// Description of the first unit the category search finds for `name`.
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.resolve(name, None)
            .ok()
            .and_then(|(_, unit)| unit.description())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Resolve `name` and instantiate its class.
    ///
    /// Without `module_type`, categories are tried as metric → comparison →
    /// measurement and the first hit wins. Every call builds a new instance.
    pub fn load(&self, name: &str, options: LoadOptions) -> Result<Box<dyn EvaluationModule>> {
        let (category, unit) = self.resolve(name, options.module_type)?;
        instantiate(
            name,
            unit,
            ModuleConfig {
                category: Some(category),
                config_name: options.config_name,
                kwargs: options.kwargs,
            },
        )
    }

    pub(crate) fn resolve(
        &self,
        name: &str,
        module_type: Option<ModuleCategory>,
    ) -> Result<(ModuleCategory, &ModuleUnit)> {
        match module_type {
            None => ModuleCategory::SEARCH_ORDER
                .iter()
                .find_map(|&category| {
                    log::debug!("Looking up {}", namespace_path(category, name));
                    self.locate(category, name).map(|unit| (category, unit))
                })
                .ok_or_else(|| EvaluateError::ModuleNotFound {
                    name: name.to_string(),
                }),
            Some(category) => self
                .locate(category, name)
                .map(|unit| (category, unit))
                .ok_or_else(|| EvaluateError::ImportFailed {
                    name: name.to_string(),
                    path: namespace_path(category, name),
                }),
        }
    }
}

/// Find the class named after `identifier` in `unit` and build it.
pub(crate) fn instantiate(
    identifier: &str,
    unit: &ModuleUnit,
    config: ModuleConfig,
) -> Result<Box<dyn EvaluationModule>> {
    let class = class_name(identifier);
    let factory = unit.get(&class).ok_or_else(|| EvaluateError::MissingClass {
        name: identifier.to_string(),
        class: class.clone(),
    })?;
    log::debug!(
        "Instantiating {class} ({:?}, config {:?})",
        config.category,
        config.config_name
    );
    factory(config)
}
