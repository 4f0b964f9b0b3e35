use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::errors::{EngineError, Result};
use crate::matching::dimension::{DimensionOutcome, DimensionScore};
use crate::matching::registry::DimensionId;
use crate::models::Template;

/// Scores of one template against one content slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMatchResult<'a> {
    pub template: &'a Template,
    /// In `[0, 1]` when any dimension was available, otherwise exactly 0.
    pub total_score: f64,
    pub dimension_scores: Vec<DimensionScore>,
    /// Dimensions that took part in the total, in evaluation order.
    pub matched_dimensions: Vec<DimensionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregate view over a batch of match results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsAnalysis {
    pub average_score: f64,
    pub score_distribution: ScoreDistribution,
    pub dimension_usage: IndexMap<DimensionId, usize>,
}

/// Weighted sum of dimension scores with renormalization over available dimensions.
#[derive(Debug, Default, Clone, Copy)]
pub struct PolynomialEngine;

impl PolynomialEngine {
    pub fn new() -> Self {
        Self
    }

    /// Combines dimension scores into a total.
    ///
    /// Only available dimensions count, and their weights are rescaled to sum to one,
    /// so a missing optional dimension does not drag every template down equally.
    pub fn calculate_score<'a>(
        &self,
        template: &'a Template,
        dimension_scores: Vec<DimensionScore>,
    ) -> Result<TemplateMatchResult<'a>> {
        let available: Vec<(DimensionId, f64, f64)> = dimension_scores
            .iter()
            .filter_map(|ds| match ds.outcome() {
                DimensionOutcome::Available(score) => Some((ds.dimension_id, ds.weight, score)),
                DimensionOutcome::Unavailable => None,
            })
            .collect();

        let total_weight: f64 = available.iter().map(|(_, weight, _)| weight).sum();
        if total_weight == 0.0 {
            return Ok(TemplateMatchResult {
                template,
                total_score: 0.0,
                dimension_scores,
                matched_dimensions: Vec::new(),
            });
        }

        let mut total_score = 0.0;
        let mut matched_dimensions = Vec::with_capacity(available.len());
        for (id, weight, score) in available {
            total_score += (weight / total_weight) * score;
            matched_dimensions.push(id);
        }

        if !total_score.is_finite() {
            return Err(EngineError::NonFiniteScore {
                template_id: template.id.clone(),
            });
        }

        debug!("Template '{}' scored {:.4}", template.id, total_score);
        Ok(TemplateMatchResult {
            template,
            total_score,
            dimension_scores,
            matched_dimensions,
        })
    }

    /// Scores every template with the dimension scores produced by `scorer`.
    pub fn calculate_batch_scores<'a, F>(
        &self,
        templates: &'a [Template],
        mut scorer: F,
    ) -> Result<Vec<TemplateMatchResult<'a>>>
    where
        F: FnMut(&Template) -> Vec<DimensionScore>,
    {
        templates
            .iter()
            .map(|template| self.calculate_score(template, scorer(template)))
            .collect()
    }

    /// The highest-scoring result. Ties go to the earliest candidate.
    pub fn select_best_match<'r, 'a>(
        &self,
        results: &'r [TemplateMatchResult<'a>],
    ) -> Option<&'r TemplateMatchResult<'a>> {
        let mut best: Option<&TemplateMatchResult<'a>> = None;
        for result in results {
            match best {
                Some(current) if result.total_score <= current.total_score => {}
                _ => best = Some(result),
            }
        }
        best
    }

    /// The `count` best results, best first. Equal scores keep candidate order.
    pub fn top_matches<'r, 'a>(
        &self,
        results: &'r [TemplateMatchResult<'a>],
        count: usize,
    ) -> Vec<&'r TemplateMatchResult<'a>> {
        let mut sorted: Vec<_> = results.iter().collect();
        sorted.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        sorted.truncate(count);
        sorted
    }

    pub fn analyze_results(&self, results: &[TemplateMatchResult<'_>]) -> ResultsAnalysis {
        if results.is_empty() {
            return ResultsAnalysis::default();
        }

        let total: f64 = results.iter().map(|r| r.total_score).sum();
        let mut analysis = ResultsAnalysis {
            average_score: total / results.len() as f64,
            ..Default::default()
        };

        for result in results {
            if result.total_score >= 0.7 {
                analysis.score_distribution.high += 1;
            } else if result.total_score >= 0.4 {
                analysis.score_distribution.medium += 1;
            } else {
                analysis.score_distribution.low += 1;
            }
            for id in &result.matched_dimensions {
                *analysis.dimension_usage.entry(*id).or_insert(0) += 1;
            }
        }
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlideType;

    fn template(id: &str) -> Template {
        Template::new(id, SlideType::Content, vec![])
    }

    fn score(id: DimensionId, outcome: DimensionOutcome, weight: f64) -> DimensionScore {
        DimensionScore::new(id, outcome, weight)
    }

    #[test]
    fn test_unavailable_dimensions_are_renormalized_away() {
        let tpl = template("a");
        let scores = vec![
            score(DimensionId::ContentType, DimensionOutcome::Unavailable, 0.30),
            score(DimensionId::TitleStructure, DimensionOutcome::Available(1.0), 0.25),
            score(DimensionId::TextStructure, DimensionOutcome::Available(0.5), 0.20),
        ];

        let result = PolynomialEngine.calculate_score(&tpl, scores).unwrap();

        let expected = (0.25 * 1.0 + 0.20 * 0.5) / 0.45;
        assert!((result.total_score - expected).abs() < 1e-12);
        assert_eq!(
            result.matched_dimensions,
            vec![DimensionId::TitleStructure, DimensionId::TextStructure]
        );
        assert_eq!(result.dimension_scores.len(), 3, "every score is reported");
    }

    #[test]
    fn test_all_perfect_scores_total_one() {
        let tpl = template("a");
        let scores = vec![
            score(DimensionId::Capacity, DimensionOutcome::Available(1.0), 0.0),
            score(DimensionId::TitleStructure, DimensionOutcome::Available(1.0), 0.25),
            score(DimensionId::TextAmount, DimensionOutcome::Available(1.0), 0.15),
        ];
        let result = PolynomialEngine.calculate_score(&tpl, scores).unwrap();
        assert!((result.total_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_available_weight_scores_zero() {
        let tpl = template("a");
        let scores = vec![
            score(DimensionId::Capacity, DimensionOutcome::Available(1.0), 0.0),
            score(DimensionId::LayoutType, DimensionOutcome::Unavailable, 0.1),
        ];

        let result = PolynomialEngine.calculate_score(&tpl, scores).unwrap();
        assert_eq!(result.total_score, 0.0);
        assert!(result.matched_dimensions.is_empty());
    }

    #[test]
    fn test_infinite_weight_is_reported() {
        let tpl = template("bad");
        let scores = vec![
            score(DimensionId::TitleStructure, DimensionOutcome::Available(1.0), f64::INFINITY),
            score(DimensionId::TextAmount, DimensionOutcome::Available(1.0), 0.15),
        ];
        let err = PolynomialEngine.calculate_score(&tpl, scores).unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteScore { template_id } if template_id == "bad"));
    }

    #[test]
    fn test_best_match_is_stable_on_ties() {
        let templates = vec![template("first"), template("second"), template("third")];
        let totals = [0.5, 0.8, 0.8];
        let results = PolynomialEngine
            .calculate_batch_scores(&templates, |t| {
                let i = templates.iter().position(|x| x.id == t.id).unwrap();
                vec![score(DimensionId::TextAmount, DimensionOutcome::Available(totals[i]), 1.0)]
            })
            .unwrap();

        let best = PolynomialEngine.select_best_match(&results).unwrap();
        assert_eq!(best.template.id, "second");

        let top: Vec<&str> = PolynomialEngine
            .top_matches(&results, 2)
            .iter()
            .map(|r| r.template.id.as_str())
            .collect();
        assert_eq!(top, vec!["second", "third"]);
        assert!(PolynomialEngine.select_best_match(&[]).is_none());
    }

    #[test]
    fn test_analyze_results_buckets_and_usage() {
        let templates = vec![template("a"), template("b"), template("c")];
        let totals = [0.9, 0.5, 0.1];
        let mut i = 0;
        let results = PolynomialEngine
            .calculate_batch_scores(&templates, |_| {
                let s = totals[i];
                i += 1;
                vec![score(DimensionId::TitleStructure, DimensionOutcome::Available(s), 1.0)]
            })
            .unwrap();

        let analysis = PolynomialEngine.analyze_results(&results);
        assert!((analysis.average_score - 0.5).abs() < 1e-12);
        assert_eq!(
            analysis.score_distribution,
            ScoreDistribution { high: 1, medium: 1, low: 1 }
        );
        assert_eq!(analysis.dimension_usage[&DimensionId::TitleStructure], 3);
    }
}
