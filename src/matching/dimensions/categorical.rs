use crate::errors::{EngineError, Result};
use crate::matching::dimension::DimensionEvaluator;
use crate::matching::registry::DimensionId;
use crate::models::{ContentSlide, ContentType, LayoutType, SemanticTag, Template};

/// Equal tags score 1.0, different tags 0.0. A template without a usable tag is neutral.
fn compare_tags<T: SemanticTag>(content: T, template: Option<T>) -> f64 {
    match template {
        Some(tag) if tag.is_recognized() => {
            if tag == content {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.5,
    }
}

fn content_tag_missing(dimension: DimensionId) -> EngineError {
    EngineError::DimensionFailure {
        dimension: dimension.to_string(),
        reason: "content slide carries no usable tag".to_string(),
    }
}

fn content_type_of(slide: &ContentSlide) -> Option<ContentType> {
    slide
        .semantic_features
        .as_ref()
        .and_then(|f| f.content_type)
        .filter(|tag| tag.is_recognized())
}

fn layout_type_of(slide: &ContentSlide) -> Option<LayoutType> {
    slide
        .semantic_features
        .as_ref()
        .and_then(|f| f.layout_type)
        .filter(|tag| tag.is_recognized())
}

/// Matches the pedagogical content type against the template annotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentTypeDimension;

impl DimensionEvaluator for ContentTypeDimension {
    fn id(&self) -> DimensionId {
        DimensionId::ContentType
    }

    fn name(&self) -> &'static str {
        "Content type"
    }

    fn required(&self) -> bool {
        false
    }

    fn is_available(&self, slide: &ContentSlide, _template: &Template) -> bool {
        content_type_of(slide).is_some()
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let content = content_type_of(slide).ok_or_else(|| content_tag_missing(self.id()))?;
        let annotated = template.annotation.as_ref().and_then(|a| a.content_type);
        Ok(compare_tags(content, annotated))
    }
}

/// Matches the recommended layout against the template annotation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutTypeDimension;

impl DimensionEvaluator for LayoutTypeDimension {
    fn id(&self) -> DimensionId {
        DimensionId::LayoutType
    }

    fn name(&self) -> &'static str {
        "Layout type"
    }

    fn required(&self) -> bool {
        false
    }

    fn is_available(&self, slide: &ContentSlide, _template: &Template) -> bool {
        layout_type_of(slide).is_some()
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let content = layout_type_of(slide).ok_or_else(|| content_tag_missing(self.id()))?;
        let annotated = template.annotation.as_ref().and_then(|a| a.layout_type);
        Ok(compare_tags(content, annotated))
    }
}
