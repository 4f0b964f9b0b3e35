use crate::errors::Result;
use crate::matching::dimension::DimensionEvaluator;
use crate::matching::registry::DimensionId;
use crate::models::{ContentSlide, ElementKind, Template};

const BASE_CAPACITY: f64 = 1000.0;
const DEFAULT_WIDTH: f64 = 100.0;
const DEFAULT_HEIGHT: f64 = 30.0;
const DEFAULT_FONT_SIZE: f64 = 16.0;
const CHAR_ASPECT: f64 = 0.6;

/// Compares the amount of content text with a rough estimate of what the template holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextAmountDimension;

impl TextAmountDimension {
    /// Estimated number of characters the template can hold.
    pub fn template_capacity(template: &Template) -> f64 {
        template
            .elements
            .iter()
            .filter(|el| el.kind == ElementKind::Text)
            .map(|el| {
                let width = non_zero_or(el.width, DEFAULT_WIDTH);
                let height = non_zero_or(el.height, DEFAULT_HEIGHT);
                let font_size = el.font_size.map_or(DEFAULT_FONT_SIZE, |fs| non_zero_or(fs, DEFAULT_FONT_SIZE));
                ((width * height) / (font_size * font_size * CHAR_ASPECT)).floor()
            })
            .fold(BASE_CAPACITY, |acc, chars| acc + chars)
    }
}

fn non_zero_or(value: f64, default: f64) -> f64 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        default
    }
}

impl DimensionEvaluator for TextAmountDimension {
    fn id(&self) -> DimensionId {
        DimensionId::TextAmount
    }

    fn name(&self) -> &'static str {
        "Text amount"
    }

    fn required(&self) -> bool {
        true
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let total_chars: usize = slide.items.iter().map(|item| item.char_count()).sum();
        let ratio = total_chars as f64 / Self::template_capacity(template);

        let score = if (0.7..=1.0).contains(&ratio) {
            1.0
        } else if (0.5..0.7).contains(&ratio) {
            0.8
        } else if (0.3..0.5).contains(&ratio) {
            0.6
        } else {
            0.4
        };
        Ok(score)
    }
}
