use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::matching::registry::DimensionId;
use crate::models::{ContentSlide, Template};

/// The result of evaluating one dimension for one (content, template) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimensionOutcome {
    /// A score in `[0, 1]`.
    Available(f64),
    /// The dimension has nothing to say about this pair and is excluded from scoring.
    Unavailable,
}

impl DimensionOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Available(score) => Some(*score),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// One dimension's contribution to a template match, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub dimension_id: DimensionId,
    /// Absent exactly when `available` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub weight: f64,
    pub available: bool,
}

impl DimensionScore {
    pub fn new(dimension_id: DimensionId, outcome: DimensionOutcome, weight: f64) -> Self {
        Self {
            dimension_id,
            score: outcome.score(),
            weight,
            available: outcome.is_available(),
        }
    }

    pub fn outcome(&self) -> DimensionOutcome {
        match self.score {
            Some(score) if self.available => DimensionOutcome::Available(score),
            _ => DimensionOutcome::Unavailable,
        }
    }
}

/// An independent scoring axis comparing a content slide to a template.
///
/// Implementors provide [`calculate_score`](Self::calculate_score) and optionally
/// [`is_available`](Self::is_available); callers use [`evaluate`](Self::evaluate),
/// which never fails.
pub trait DimensionEvaluator: Send + Sync {
    fn id(&self) -> DimensionId;

    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Required dimensions always produce a score.
    fn required(&self) -> bool;

    /// Returns false when the pair carries no signal for this dimension.
    fn is_available(&self, _slide: &ContentSlide, _template: &Template) -> bool {
        true
    }

    /// Computes the raw score. Values outside `[0, 1]` are clamped by `evaluate`.
    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64>;

    /// Evaluates the pair. Unavailability, errors and non-finite scores all
    /// become [`DimensionOutcome::Unavailable`].
    fn evaluate(&self, slide: &ContentSlide, template: &Template) -> DimensionOutcome {
        if !self.is_available(slide, template) {
            return DimensionOutcome::Unavailable;
        }

        match self.calculate_score(slide, template) {
            Ok(score) if score.is_finite() => DimensionOutcome::Available(score.clamp(0.0, 1.0)),
            Ok(score) => {
                warn!(
                    "[{}] non-finite score {} for template '{}'",
                    self.id(),
                    score,
                    template.id
                );
                DimensionOutcome::Unavailable
            }
            Err(e) => {
                warn!("[{}] evaluation error for template '{}': {}", self.id(), template.id, e);
                DimensionOutcome::Unavailable
            }
        }
    }
}

/// Shared content-side counts.
pub(crate) fn item_count(slide: &ContentSlide) -> usize {
    slide.items.len()
}

/// `min/max` agreement between a content count and a template count.
///
/// Both zero is a vacuous match; a template with nothing to offer scores zero.
pub(crate) fn structure_ratio(content_count: usize, template_count: usize) -> f64 {
    if content_count == 0 && template_count == 0 {
        return 1.0;
    }
    if template_count == 0 {
        return 0.0;
    }
    let min = content_count.min(template_count) as f64;
    let max = content_count.max(template_count) as f64;
    min / max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::models::SlideType;

    struct Fixed(Result<f64>);

    impl DimensionEvaluator for Fixed {
        fn id(&self) -> DimensionId {
            DimensionId::TextAmount
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn required(&self) -> bool {
            true
        }
        fn calculate_score(&self, _: &ContentSlide, _: &Template) -> Result<f64> {
            match &self.0 {
                Ok(v) => Ok(*v),
                Err(_) => Err(EngineError::DimensionFailure {
                    dimension: "fixed".to_string(),
                    reason: "boom".to_string(),
                }),
            }
        }
    }

    fn pair() -> (ContentSlide, Template) {
        (
            ContentSlide::new(SlideType::Content, "t", vec![]),
            Template::new("tpl", SlideType::Content, vec![]),
        )
    }

    #[test]
    fn test_evaluate_clamps_into_unit_interval() {
        let (slide, template) = pair();
        assert_eq!(Fixed(Ok(1.7)).evaluate(&slide, &template), DimensionOutcome::Available(1.0));
        assert_eq!(Fixed(Ok(-0.2)).evaluate(&slide, &template), DimensionOutcome::Available(0.0));
    }

    #[test]
    fn test_evaluate_turns_failures_into_unavailable() {
        let (slide, template) = pair();
        let failing = Fixed(Err(EngineError::InvalidInput(String::new())));
        assert_eq!(failing.evaluate(&slide, &template), DimensionOutcome::Unavailable);
        assert_eq!(Fixed(Ok(f64::NAN)).evaluate(&slide, &template), DimensionOutcome::Unavailable);
    }

    #[test]
    fn test_dimension_score_keeps_availability_consistent() {
        let present = DimensionScore::new(DimensionId::Capacity, DimensionOutcome::Available(0.5), 0.0);
        assert!(present.available && present.score == Some(0.5));

        let absent = DimensionScore::new(DimensionId::ContentType, DimensionOutcome::Unavailable, 0.3);
        assert!(!absent.available && absent.score.is_none());
        assert_eq!(absent.outcome(), DimensionOutcome::Unavailable);
    }

    #[test]
    fn test_structure_ratio_edges() {
        assert_eq!(structure_ratio(0, 0), 1.0);
        assert_eq!(structure_ratio(3, 0), 0.0);
        assert_eq!(structure_ratio(0, 4), 0.0);
        assert_eq!(structure_ratio(2, 4), 0.5);
        assert_eq!(structure_ratio(6, 4), 4.0 / 6.0);
    }
}
