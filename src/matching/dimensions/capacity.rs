use crate::errors::Result;
use crate::matching::dimension::{item_count, DimensionEvaluator};
use crate::matching::registry::DimensionId;
use crate::models::{ContentSlide, Template};

/// Scores how well the item count fills the template's item placeholders.
///
/// Overflow scores zero, which the matching service uses as a hard filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityDimension;

impl DimensionEvaluator for CapacityDimension {
    fn id(&self) -> DimensionId {
        DimensionId::Capacity
    }

    fn name(&self) -> &'static str {
        "Capacity"
    }

    fn required(&self) -> bool {
        true
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let items = item_count(slide);
        let capacity = template.item_capacity();
        if items > capacity {
            return Ok(0.0);
        }

        let utilization = items as f64 / capacity as f64;
        let score = if (utilization - 1.0).abs() < 0.01 {
            1.0
        } else if utilization >= 0.8 {
            0.9
        } else if utilization >= 0.6 {
            0.7
        } else if utilization >= 0.4 {
            0.5
        } else {
            0.3
        };
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::dimension::DimensionOutcome;
    use crate::models::{ContentItem, SlideType, TemplateElement, TextRole};

    fn template_with_items(n: usize) -> Template {
        let elements = (0..n)
            .map(|i| TemplateElement::text(format!("i{i}"), TextRole::Item, 100.0 * i as f64, 200.0, 90.0, 80.0))
            .collect();
        Template::new("tpl", SlideType::Content, elements)
    }

    fn slide_with_items(n: usize) -> ContentSlide {
        let items = (0..n).map(|i| ContentItem::new(format!("t{i}"), "x")).collect();
        ContentSlide::new(SlideType::Content, "s", items)
    }

    #[test]
    fn test_overflow_scores_zero() {
        let score = CapacityDimension.evaluate(&slide_with_items(5), &template_with_items(4));
        assert_eq!(score, DimensionOutcome::Available(0.0));
    }

    #[test]
    fn test_exact_fit_scores_one() {
        for n in 1..=6 {
            let score = CapacityDimension.evaluate(&slide_with_items(n), &template_with_items(n));
            assert_eq!(score, DimensionOutcome::Available(1.0), "{n} items in {n} slots");
        }
    }

    #[test]
    fn test_utilization_buckets() {
        let cases = [(9, 10, 0.9), (8, 10, 0.9), (7, 10, 0.7), (6, 10, 0.7), (4, 10, 0.5), (3, 10, 0.3), (0, 10, 0.3)];
        for (items, slots, expected) in cases {
            let score = CapacityDimension.evaluate(&slide_with_items(items), &template_with_items(slots));
            assert_eq!(score, DimensionOutcome::Available(expected), "{items}/{slots}");
        }
    }

    #[test]
    fn test_template_without_item_slots_hosts_one_item() {
        let score = CapacityDimension.evaluate(&slide_with_items(1), &template_with_items(0));
        assert_eq!(score, DimensionOutcome::Available(1.0));
    }
}
