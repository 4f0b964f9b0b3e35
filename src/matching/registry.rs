//! Which dimensions exist, how much they weigh, and the evaluators that implement them.

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::matching::dimension::DimensionEvaluator;
use crate::matching::dimensions::{
    CapacityDimension, ContentTypeDimension, LayoutTypeDimension, TextAmountDimension,
    TextStructureDimension, TitleStructureDimension,
};

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 0.001;

/// Identifier of a scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionId {
    LayoutType,
    ContentType,
    Capacity,
    TitleStructure,
    TextStructure,
    TextAmount,
}

impl DimensionId {
    /// Every dimension in evaluation order.
    pub const ALL: [DimensionId; 6] = [
        DimensionId::LayoutType,
        DimensionId::ContentType,
        DimensionId::Capacity,
        DimensionId::TitleStructure,
        DimensionId::TextStructure,
        DimensionId::TextAmount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LayoutType => "layoutType",
            Self::ContentType => "contentType",
            Self::Capacity => "capacity",
            Self::TitleStructure => "titleStructure",
            Self::TextStructure => "textStructure",
            Self::TextAmount => "textAmount",
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static factory: maps a dimension id to its evaluator.
pub fn build_evaluator(id: DimensionId) -> Box<dyn DimensionEvaluator> {
    match id {
        DimensionId::LayoutType => Box::new(LayoutTypeDimension),
        DimensionId::ContentType => Box::new(ContentTypeDimension),
        DimensionId::Capacity => Box::new(CapacityDimension),
        DimensionId::TitleStructure => Box::new(TitleStructureDimension),
        DimensionId::TextStructure => Box::new(TextStructureDimension),
        DimensionId::TextAmount => Box::new(TextAmountDimension),
    }
}

/// Registration entry of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionConfig {
    pub id: DimensionId,
    pub name: String,
    pub weight: f64,
    pub enabled: bool,
    pub required: bool,
    pub description: String,
}

impl DimensionConfig {
    fn new(id: DimensionId, name: &str, weight: f64, required: bool, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            weight,
            enabled: true,
            required,
            description: description.to_string(),
        }
    }
}

/// Summary numbers of a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    pub enabled: usize,
    pub required: usize,
    pub optional: usize,
    pub total_weight: f64,
}

/// Ordered set of dimension registrations.
///
/// Capacity carries weight 0: it acts as a candidate filter, not a ranking signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRegistry {
    dimensions: IndexMap<DimensionId, DimensionConfig>,
}

impl Default for DimensionRegistry {
    fn default() -> Self {
        let dimensions = [
            DimensionConfig::new(
                DimensionId::LayoutType,
                "Layout type",
                0.10,
                false,
                "Recommended layout against the template's layout annotation",
            ),
            DimensionConfig::new(
                DimensionId::ContentType,
                "Content type",
                0.30,
                false,
                "Pedagogical content type against the template's content annotation",
            ),
            DimensionConfig::new(
                DimensionId::Capacity,
                "Capacity",
                0.0,
                true,
                "Item count against item placeholders; overflow removes the template",
            ),
            DimensionConfig::new(
                DimensionId::TitleStructure,
                "Title structure",
                0.25,
                true,
                "Titled items against itemTitle placeholders",
            ),
            DimensionConfig::new(
                DimensionId::TextStructure,
                "Text structure",
                0.20,
                true,
                "Items with body text against item/content placeholders",
            ),
            DimensionConfig::new(
                DimensionId::TextAmount,
                "Text amount",
                0.15,
                true,
                "Character count against estimated text capacity",
            ),
        ]
        .into_iter()
        .map(|config| (config.id, config))
        .collect();

        Self { dimensions }
    }
}

impl DimensionRegistry {
    pub fn get(&self, id: DimensionId) -> Option<&DimensionConfig> {
        self.dimensions.get(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &DimensionConfig> {
        self.dimensions.values()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &DimensionConfig> {
        self.dimensions.values().filter(|d| d.enabled)
    }

    pub fn required(&self) -> impl Iterator<Item = &DimensionConfig> {
        self.enabled().filter(|d| d.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &DimensionConfig> {
        self.enabled().filter(|d| !d.required)
    }

    /// Weight of an enabled dimension; disabled or unknown dimensions weigh nothing.
    pub fn weight(&self, id: DimensionId) -> f64 {
        self.get(id).filter(|d| d.enabled).map_or(0.0, |d| d.weight)
    }

    /// Sum of the weights of enabled dimensions.
    pub fn total_weight(&self) -> f64 {
        self.enabled().map(|d| d.weight).sum()
    }

    /// Checks that enabled non-capacity weights sum to 1.0.
    pub fn validate_weights(&self) -> Result<()> {
        let total: f64 = self
            .enabled()
            .filter(|d| d.id != DimensionId::Capacity)
            .map(|d| d.weight)
            .sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EngineError::InvalidConfig(format!(
                "dimension weights sum to {total:.3}, expected 1.0"
            )));
        }
        Ok(())
    }

    pub fn set_weight(&mut self, id: DimensionId, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "weight of '{id}' must be a non-negative number, got {weight}"
            )));
        }
        let entry = self.entry_mut(id)?;
        entry.weight = weight;
        Ok(())
    }

    pub fn set_enabled(&mut self, id: DimensionId, enabled: bool) -> Result<()> {
        if id == DimensionId::Capacity && !enabled {
            return Err(EngineError::InvalidConfig(
                "the capacity dimension cannot be disabled".to_string(),
            ));
        }
        let entry = self.entry_mut(id)?;
        entry.enabled = enabled;
        Ok(())
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total: self.dimensions.len(),
            enabled: self.enabled().count(),
            required: self.required().count(),
            optional: self.optional().count(),
            total_weight: self.total_weight(),
        }
    }

    fn entry_mut(&mut self, id: DimensionId) -> Result<&mut DimensionConfig> {
        self.dimensions
            .get_mut(&id)
            .ok_or_else(|| EngineError::InvalidConfig(format!("unknown dimension '{id}'")))
    }
}

/// Load statistics of a factory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryStats {
    pub total: usize,
    pub enabled: usize,
    pub loaded: usize,
    pub failed: Vec<DimensionId>,
}

/// Owns one evaluator per enabled dimension.
///
/// Evaluators are built on first use. Concurrent first calls build them exactly once;
/// afterwards every lookup is a plain read.
pub struct DimensionFactory {
    registry: DimensionRegistry,
    evaluators: OnceLock<IndexMap<DimensionId, Box<dyn DimensionEvaluator>>>,
}

impl Default for DimensionFactory {
    fn default() -> Self {
        Self::new(DimensionRegistry::default())
    }
}

impl DimensionFactory {
    pub fn new(registry: DimensionRegistry) -> Self {
        Self {
            registry,
            evaluators: OnceLock::new(),
        }
    }

    /// The process-wide factory built from the default registry.
    pub fn global() -> Arc<DimensionFactory> {
        static GLOBAL: OnceLock<Arc<DimensionFactory>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(DimensionFactory::default()))
            .clone()
    }

    pub fn registry(&self) -> &DimensionRegistry {
        &self.registry
    }

    /// Builds the evaluators if that has not happened yet. Idempotent.
    pub fn initialize(&self) -> &IndexMap<DimensionId, Box<dyn DimensionEvaluator>> {
        self.evaluators.get_or_init(|| {
            let loaded: IndexMap<_, _> = self
                .registry
                .enabled()
                .map(|config| {
                    debug!("Loaded dimension: {}", config.id);
                    (config.id, build_evaluator(config.id))
                })
                .collect();
            info!("Dimension factory initialized with {} evaluators", loaded.len());
            loaded
        })
    }

    /// Enabled evaluators in registry order.
    pub fn evaluators(&self) -> impl Iterator<Item = &dyn DimensionEvaluator> {
        self.initialize().values().map(|e| e.as_ref())
    }

    pub fn evaluator(&self, id: DimensionId) -> Option<&dyn DimensionEvaluator> {
        self.initialize().get(&id).map(|e| e.as_ref())
    }

    pub fn weight(&self, id: DimensionId) -> f64 {
        self.registry.weight(id)
    }

    pub fn dimension_ids(&self) -> Vec<DimensionId> {
        self.initialize().keys().copied().collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.evaluators.get().is_some()
    }

    pub fn is_loaded(&self, id: DimensionId) -> bool {
        self.evaluators.get().is_some_and(|map| map.contains_key(&id))
    }

    pub fn stats(&self) -> FactoryStats {
        let loaded = self.evaluators.get();
        let failed = self
            .registry
            .enabled()
            .filter(|config| !loaded.is_some_and(|map| map.contains_key(&config.id)))
            .map(|config| config.id)
            .collect();
        FactoryStats {
            total: self.registry.stats().total,
            enabled: self.registry.stats().enabled,
            loaded: loaded.map_or(0, |map| map.len()),
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let registry = DimensionRegistry::default();
        assert!(registry.validate_weights().is_ok());
        assert!((registry.total_weight() - 1.0).abs() < WEIGHT_TOLERANCE);
        assert_eq!(registry.weight(DimensionId::Capacity), 0.0);
    }

    #[test]
    fn test_required_and_optional_partition() {
        let registry = DimensionRegistry::default();
        let optional: Vec<_> = registry.optional().map(|d| d.id).collect();
        assert_eq!(optional, vec![DimensionId::LayoutType, DimensionId::ContentType]);

        let stats = registry.stats();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.required, 4);
        assert_eq!(stats.optional, 2);
    }

    #[test]
    fn test_disabled_dimension_weighs_nothing() {
        let mut registry = DimensionRegistry::default();
        registry.set_enabled(DimensionId::LayoutType, false).unwrap();
        assert_eq!(registry.weight(DimensionId::LayoutType), 0.0);
        assert!(registry.validate_weights().is_err());

        registry.set_weight(DimensionId::TextAmount, 0.25).unwrap();
        assert!(registry.validate_weights().is_ok());
    }

    #[test]
    fn test_capacity_cannot_be_disabled_and_weights_must_be_valid() {
        let mut registry = DimensionRegistry::default();
        assert!(registry.set_enabled(DimensionId::Capacity, false).is_err());
        assert!(registry.set_weight(DimensionId::TextAmount, -0.1).is_err());
        assert!(registry.set_weight(DimensionId::TextAmount, f64::NAN).is_err());
    }

    #[test]
    fn test_factory_builds_evaluators_once_in_registry_order() {
        let factory = DimensionFactory::default();
        assert!(!factory.is_initialized());
        assert_eq!(factory.stats().loaded, 0);

        let first = factory.initialize() as *const _;
        let second = factory.initialize() as *const _;
        assert_eq!(first, second, "initialization must be idempotent");

        assert_eq!(factory.dimension_ids(), DimensionId::ALL.to_vec());
        let stats = factory.stats();
        assert_eq!(stats.loaded, 6);
        assert!(stats.failed.is_empty());
        assert!(factory.is_loaded(DimensionId::TextAmount));
        assert_eq!(factory.evaluator(DimensionId::Capacity).map(|e| e.id()), Some(DimensionId::Capacity));
    }

    #[test]
    fn test_factory_skips_disabled_dimensions() {
        let mut registry = DimensionRegistry::default();
        registry.set_enabled(DimensionId::ContentType, false).unwrap();
        let factory = DimensionFactory::new(registry);

        assert!(factory.evaluator(DimensionId::ContentType).is_none());
        assert_eq!(factory.evaluators().count(), 5);
        assert_eq!(factory.stats().enabled, 5);
    }

    #[test]
    fn test_global_factory_is_shared() {
        let a = DimensionFactory::global();
        let b = DimensionFactory::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_dimension_id_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&DimensionId::TitleStructure).unwrap(), "\"titleStructure\"");
        assert_eq!(DimensionId::TextAmount.to_string(), "textAmount");
    }
}
