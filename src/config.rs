//! Engine configuration.
//!
//! Every field has a default so a partial JSON document (or `{}`) is a valid
//! configuration. The configuration is an explicit value handed to the services
//! that need it; nothing here is global.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::matching::registry::{DimensionId, DimensionRegistry};
use crate::models::SlideType;
use crate::pagination::rules::{PaginationRule, RuleManager};

/// Top-level configuration of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub smart_matching: SmartMatchingConfig,
    pub layout_analysis: LayoutAnalysisConfig,
    pub match_score: MatchScoreConfig,
    pub dimensions: DimensionOverrides,
    pub custom_pagination_rules: Vec<PaginationRule>,
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Builds the dimension registry with the configured overrides applied.
    pub fn dimension_registry(&self) -> Result<DimensionRegistry> {
        let mut registry = DimensionRegistry::default();
        self.dimensions.apply(&mut registry)?;
        Ok(registry)
    }

    /// Builds the pagination rule manager: built-in rules plus custom ones.
    pub fn rule_manager(&self) -> Result<RuleManager> {
        let mut manager = RuleManager::default();
        for rule in &self.custom_pagination_rules {
            manager.add_rule(rule.clone())?;
        }
        Ok(manager)
    }

    /// Checks that weights sum to one, that every pagination rule is usable and
    /// that the layout and match-score parameters are in range.
    pub fn validate(&self) -> Result<()> {
        let registry = self.dimension_registry()?;
        registry.validate_weights()?;
        for rule in &self.custom_pagination_rules {
            rule.validate()?;
        }
        self.layout_analysis.validate()?;
        self.match_score.validate()?;
        Ok(())
    }
}

/// Per-category switches for smart (scored) template matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartMatchingConfig {
    /// Master switch.
    pub enabled: bool,
    pub slide_types: SlideTypeToggles,
    /// Logs per-template score breakdowns at `info` instead of `debug`.
    pub debug: bool,
    pub fallback: FallbackConfig,
}

impl Default for SmartMatchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slide_types: SlideTypeToggles::default(),
            debug: false,
            fallback: FallbackConfig::default(),
        }
    }
}

impl SmartMatchingConfig {
    /// Returns true if smart matching should run for the given category.
    pub fn is_enabled_for(&self, slide_type: SlideType) -> bool {
        self.enabled && self.slide_types.get(slide_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlideTypeToggles {
    pub cover: bool,
    pub contents: bool,
    pub content: bool,
    pub transition: bool,
    pub end: bool,
}

impl Default for SlideTypeToggles {
    fn default() -> Self {
        Self {
            cover: false,
            contents: false,
            content: true,
            transition: false,
            end: false,
        }
    }
}

impl SlideTypeToggles {
    pub fn get(&self, slide_type: SlideType) -> bool {
        match slide_type {
            SlideType::Cover => self.cover,
            SlideType::Contents => self.contents,
            SlideType::Content => self.content,
            SlideType::Transition => self.transition,
            SlideType::End => self.end,
        }
    }

    pub fn set(&mut self, slide_type: SlideType, enabled: bool) {
        let slot = match slide_type {
            SlideType::Cover => &mut self.cover,
            SlideType::Contents => &mut self.contents,
            SlideType::Content => &mut self.content,
            SlideType::Transition => &mut self.transition,
            SlideType::End => &mut self.end,
        };
        *slot = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackConfig {
    /// When false, scoring failures surface as errors from `select_template`.
    pub enabled: bool,
    /// Logs the reason each fallback happened.
    pub log_failure: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_failure: true,
        }
    }
}

/// Thresholds used by the layout analyzer. All distances are canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutAnalysisConfig {
    /// Two placeholders share a row when their tops differ by less than this.
    pub vertical_grouping_threshold: f64,
    pub horizontal_list: HorizontalListConfig,
    pub comparison: ComparisonConfig,
}

impl Default for LayoutAnalysisConfig {
    fn default() -> Self {
        Self {
            vertical_grouping_threshold: 50.0,
            horizontal_list: HorizontalListConfig::default(),
            comparison: ComparisonConfig::default(),
        }
    }
}

impl LayoutAnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.horizontal_list.min_title_count < 1 {
            return Err(EngineError::InvalidConfig(
                "horizontalList.minTitleCount must be at least 1".to_string(),
            ));
        }
        if self.comparison.title_count < 1 {
            return Err(EngineError::InvalidConfig(
                "comparison.titleCount must be at least 1".to_string(),
            ));
        }
        let thresholds = [
            self.vertical_grouping_threshold,
            self.horizontal_list.match_threshold,
            self.comparison.match_threshold,
        ];
        if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(EngineError::InvalidConfig(
                "layout thresholds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HorizontalListConfig {
    pub min_title_count: usize,
    /// Maximum horizontal offset between a list title and its text.
    pub match_threshold: f64,
    /// Minimum width of a caption above the list.
    pub top_text_min_width: f64,
}

impl Default for HorizontalListConfig {
    fn default() -> Self {
        Self {
            min_title_count: 3,
            match_threshold: 150.0,
            top_text_min_width: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonConfig {
    pub title_count: usize,
    pub match_threshold: f64,
    /// Minimum width of the captions above and below the two columns.
    pub wide_text_min_width: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            title_count: 2,
            match_threshold: 100.0,
            wide_text_min_width: 800.0,
        }
    }
}

/// Parameters of the title/text geometric match scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchScoreConfig {
    pub horizontal_threshold: f64,
    pub vertical_max_distance: f64,
    pub center_threshold: f64,
    pub ideal_vertical_gap: f64,
    pub decay_factor: f64,
    pub weights: MatchScoreWeights,
}

impl MatchScoreConfig {
    pub fn validate(&self) -> Result<()> {
        let limits = [
            self.horizontal_threshold,
            self.vertical_max_distance,
            self.center_threshold,
            self.decay_factor,
        ];
        if limits.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(EngineError::InvalidConfig(
                "matchScore thresholds and decayFactor must be positive".to_string(),
            ));
        }
        if !self.ideal_vertical_gap.is_finite() || self.ideal_vertical_gap < 0.0 {
            return Err(EngineError::InvalidConfig(
                "matchScore.idealVerticalGap must not be negative".to_string(),
            ));
        }
        let w = &self.weights;
        if [w.horizontal, w.vertical, w.width, w.center]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(EngineError::InvalidConfig(
                "matchScore weights must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchScoreConfig {
    fn default() -> Self {
        Self {
            horizontal_threshold: 150.0,
            vertical_max_distance: 200.0,
            center_threshold: 100.0,
            ideal_vertical_gap: 70.0,
            decay_factor: 50.0,
            weights: MatchScoreWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchScoreWeights {
    pub horizontal: f64,
    pub vertical: f64,
    pub width: f64,
    pub center: f64,
}

impl Default for MatchScoreWeights {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.2,
            width: 0.5,
            center: 0.8,
        }
    }
}

/// Overrides for one dimension of the built-in registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Per-dimension overrides keyed by dimension id (`capacity`, `contentType`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionOverrides(pub IndexMap<DimensionId, DimensionOverride>);

impl DimensionOverrides {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies the overrides to `registry`.
    pub fn apply(&self, registry: &mut DimensionRegistry) -> Result<()> {
        for (id, over) in &self.0 {
            if let Some(weight) = over.weight {
                registry.set_weight(*id, weight)?;
            }
            if let Some(enabled) = over.enabled {
                registry.set_enabled(*id, enabled)?;
            }
        }
        Ok(())
    }
}
