use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, error, info, log, warn, Level};
use serde::Serialize;

use crate::config::{EngineConfig, SmartMatchingConfig};
use crate::errors::{EngineError, Result};
use crate::matching::dimension::{DimensionOutcome, DimensionScore};
use crate::matching::engine::{PolynomialEngine, TemplateMatchResult};
use crate::matching::fallback::FallbackMatcher;
use crate::matching::registry::{DimensionFactory, DimensionId};
use crate::models::{ContentSlide, SlideType, Template, TextRole};

/// Runtime view of the service, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub initialized: bool,
    pub dimensions_loaded: usize,
    pub dimensions_enabled: usize,
    pub failed_dimensions: Vec<DimensionId>,
}

/// Selects the template that best fits a content slide.
///
/// Scoring runs against the shared [`DimensionFactory`]; whenever scoring is
/// impossible or fails the [`FallbackMatcher`] takes over, so
/// [`find_best_match`](Self::find_best_match) always yields a template.
pub struct TemplateMatchingService {
    factory: Arc<DimensionFactory>,
    engine: PolynomialEngine,
    fallback: FallbackMatcher,
    config: SmartMatchingConfig,
}

impl Default for TemplateMatchingService {
    fn default() -> Self {
        Self::new(DimensionFactory::global(), SmartMatchingConfig::default())
    }
}

impl TemplateMatchingService {
    pub fn new(factory: Arc<DimensionFactory>, config: SmartMatchingConfig) -> Self {
        Self {
            factory,
            engine: PolynomialEngine::new(),
            fallback: FallbackMatcher::default(),
            config,
        }
    }

    /// Service using the switches and dimension overrides of `config`. Without
    /// overrides the process-wide factory is shared.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let factory = if config.dimensions.is_empty() {
            DimensionFactory::global()
        } else {
            Arc::new(DimensionFactory::new(config.dimension_registry()?))
        };
        Ok(Self::new(factory, config.smart_matching.clone()))
    }

    /// Replaces the fallback matcher, e.g. with a deterministic picker.
    pub fn with_fallback(mut self, fallback: FallbackMatcher) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn config(&self) -> &SmartMatchingConfig {
        &self.config
    }

    pub fn factory(&self) -> &DimensionFactory {
        &self.factory
    }

    /// Builds the dimension evaluators ahead of the first match.
    pub fn initialize(&self) {
        self.factory.initialize();
    }

    /// Returns the best-scoring template, or a fallback pick. Never fails.
    pub fn find_best_match<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Cow<'a, Template> {
        match self.try_smart_match(slide, templates) {
            Ok(Some(template)) => Cow::Borrowed(template),
            Ok(None) => self.fallback.find_basic_match(slide, templates),
            Err(e) => {
                error!("Template matching failed, using fallback: {e}");
                self.fallback.find_basic_match(slide, templates)
            }
        }
    }

    /// Scores the candidates. `Ok(None)` means scoring had nothing to work with.
    fn try_smart_match<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Result<Option<&'a Template>> {
        if slide.semantic_features.is_none() {
            if self.config.fallback.log_failure {
                info!(
                    "Using fallback matcher: {}",
                    FallbackMatcher::fallback_reason(slide)
                );
            }
            return Ok(None);
        }

        let candidates = self.filter_candidates(slide, templates);
        if candidates.is_empty() {
            warn!("No template can hold {} items, using fallback", slide.items.len());
            return Ok(None);
        }

        let results = self.evaluate_templates(slide, &candidates)?;
        let Some(best) = self.engine.select_best_match(&results) else {
            warn!("No best match found, using fallback");
            return Ok(None);
        };

        self.log_match_result(best);
        Ok(Some(best.template))
    }

    /// Templates that pass the capacity filter, in input order.
    fn filter_candidates<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Vec<&'a Template> {
        let Some(capacity) = self.factory.evaluator(DimensionId::Capacity) else {
            return templates.iter().collect();
        };
        templates
            .iter()
            .filter(|template| match capacity.evaluate(slide, template) {
                DimensionOutcome::Available(score) => score > 0.0,
                DimensionOutcome::Unavailable => false,
            })
            .collect()
    }

    fn evaluate_templates<'a>(
        &self,
        slide: &ContentSlide,
        candidates: &[&'a Template],
    ) -> Result<Vec<TemplateMatchResult<'a>>> {
        candidates
            .iter()
            .map(|&template| {
                let scores = self
                    .factory
                    .evaluators()
                    .map(|evaluator| {
                        let outcome = evaluator.evaluate(slide, template);
                        DimensionScore::new(evaluator.id(), outcome, self.factory.weight(evaluator.id()))
                    })
                    .collect();
                self.engine.calculate_score(template, scores)
            })
            .collect()
    }

    fn log_match_result(&self, result: &TemplateMatchResult<'_>) {
        let level = if self.config.debug { Level::Info } else { Level::Debug };
        log!(
            level,
            "Best match: template '{}' scored {:.3} over {:?}",
            result.template.id,
            result.total_score,
            result.matched_dimensions
        );
        for ds in &result.dimension_scores {
            log!(
                level,
                "  {}: score={} weight={:.3} available={}",
                ds.dimension_id,
                ds.score.map_or_else(|| "-".to_string(), |s| format!("{s:.3}")),
                ds.weight,
                ds.available
            );
        }
    }

    /// Matches every slide against the same pool.
    pub fn batch_match<'a>(&self, slides: &[ContentSlide], templates: &'a [Template]) -> Vec<Cow<'a, Template>> {
        slides
            .iter()
            .map(|slide| self.find_best_match(slide, templates))
            .collect()
    }

    /// Full per-dimension breakdown for every capacity-compatible template.
    ///
    /// Empty when the slide carries no semantic features.
    pub fn detailed_match<'a>(
        &self,
        slide: &ContentSlide,
        templates: &'a [Template],
    ) -> Result<Vec<TemplateMatchResult<'a>>> {
        if slide.semantic_features.is_none() {
            return Ok(Vec::new());
        }
        let candidates = self.filter_candidates(slide, templates);
        self.evaluate_templates(slide, &candidates)
    }

    /// Selects a template honouring the per-category smart matching switch.
    ///
    /// Disabled categories use the capacity-closest random pick. An empty pool is an
    /// error here because the caller asked for a template of a specific category.
    pub fn select_template<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Result<Cow<'a, Template>> {
        if templates.is_empty() {
            return Err(EngineError::EmptyTemplatePool(slide.slide_type.as_str().to_string()));
        }

        if self.config.is_enabled_for(slide.slide_type) {
            match self.try_smart_match(slide, templates) {
                Ok(Some(template)) => return Ok(Cow::Borrowed(template)),
                Ok(None) => return Ok(self.fallback.find_basic_match(slide, templates)),
                Err(e) if self.config.fallback.enabled => {
                    if self.config.fallback.log_failure {
                        warn!("Smart matching failed, selecting randomly: {e}");
                    }
                }
                Err(e) => return Err(e),
            }
        }

        self.random_select(slide, templates)
    }

    fn random_select<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Result<Cow<'a, Template>> {
        let picked = if slide.slide_type.is_paginated() {
            self.fallback
                .find_closest_capacity_match(templates, slide.items.len(), TextRole::Item)
        } else {
            self.fallback.pick_random(templates)
        };
        debug!(
            "Random selection for {} slide: {:?}",
            slide.slide_type.as_str(),
            picked.map(|t| t.id.as_str())
        );
        picked
            .map(Cow::Borrowed)
            .ok_or_else(|| EngineError::EmptyTemplatePool(slide.slide_type.as_str().to_string()))
    }

    /// Selects a template per slide from the pool of its own category.
    ///
    /// Keys are `"{type}_{index}"`, index being the slide's position in `slides`.
    pub fn batch_select(
        &self,
        slides: &[ContentSlide],
        all_templates: &[Template],
    ) -> Result<IndexMap<String, Template>> {
        let groups = group_by_slide_type(all_templates);
        let mut selected = IndexMap::with_capacity(slides.len());
        for (index, slide) in slides.iter().enumerate() {
            let pool = groups.get(&slide.slide_type).map(Vec::as_slice).unwrap_or_default();
            let template = self.select_template(slide, pool)?;
            selected.insert(format!("{}_{}", slide.slide_type.as_str(), index), template.into_owned());
        }
        Ok(selected)
    }

    pub fn service_status(&self) -> ServiceStatus {
        let stats = self.factory.stats();
        ServiceStatus {
            initialized: self.factory.is_initialized(),
            dimensions_loaded: stats.loaded,
            dimensions_enabled: stats.enabled,
            failed_dimensions: stats.failed,
        }
    }
}

/// Clones templates into per-category pools.
pub fn group_by_slide_type(templates: &[Template]) -> IndexMap<SlideType, Vec<Template>> {
    let mut groups: IndexMap<SlideType, Vec<Template>> = IndexMap::new();
    for template in templates {
        if let Some(slide_type) = template.slide_type {
            groups.entry(slide_type).or_default().push(template.clone());
        }
    }
    groups
}
