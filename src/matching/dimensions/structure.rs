use crate::errors::Result;
use crate::matching::dimension::{structure_ratio, DimensionEvaluator};
use crate::matching::registry::DimensionId;
use crate::models::{ContentSlide, Template, TextRole};

/// Compares titled items with the template's `itemTitle` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleStructureDimension;

impl DimensionEvaluator for TitleStructureDimension {
    fn id(&self) -> DimensionId {
        DimensionId::TitleStructure
    }

    fn name(&self) -> &'static str {
        "Title structure"
    }

    fn required(&self) -> bool {
        true
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let template_titles = template.count_role(TextRole::ItemTitle);
        Ok(structure_ratio(slide.titled_item_count(), template_titles))
    }
}

/// Compares items carrying body text with the template's `item`/`content` placeholders.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStructureDimension;

impl DimensionEvaluator for TextStructureDimension {
    fn id(&self) -> DimensionId {
        DimensionId::TextStructure
    }

    fn name(&self) -> &'static str {
        "Text structure"
    }

    fn required(&self) -> bool {
        true
    }

    fn calculate_score(&self, slide: &ContentSlide, template: &Template) -> Result<f64> {
        let template_texts =
            template.count_role(TextRole::Item) + template.count_role(TextRole::Content);
        Ok(structure_ratio(slide.text_item_count(), template_texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::dimension::DimensionOutcome;
    use crate::models::{ContentItem, SlideType, TemplateElement};

    fn template(roles: &[TextRole]) -> Template {
        let elements = roles
            .iter()
            .enumerate()
            .map(|(i, role)| TemplateElement::text(format!("e{i}"), *role, 0.0, 60.0 * i as f64, 200.0, 50.0))
            .collect();
        Template::new("tpl", SlideType::Content, elements)
    }

    #[test]
    fn test_title_structure_counts_trimmed_titles() {
        let slide = ContentSlide::new(
            SlideType::Content,
            "s",
            vec![
                ContentItem::new("A", "a"),
                ContentItem::new("   ", "b"),
                ContentItem::new("C", ""),
            ],
        );
        let tpl = template(&[TextRole::ItemTitle, TextRole::ItemTitle, TextRole::ItemTitle, TextRole::ItemTitle]);

        assert_eq!(TitleStructureDimension.evaluate(&slide, &tpl), DimensionOutcome::Available(0.5));
    }

    #[test]
    fn test_title_structure_vacuous_and_impossible() {
        let untitled = ContentSlide::new(SlideType::Content, "s", vec![ContentItem::new("", "body")]);
        let titled = ContentSlide::new(SlideType::Content, "s", vec![ContentItem::new("T", "body")]);
        let no_titles = template(&[TextRole::Item]);

        assert_eq!(TitleStructureDimension.evaluate(&untitled, &no_titles), DimensionOutcome::Available(1.0));
        assert_eq!(TitleStructureDimension.evaluate(&titled, &no_titles), DimensionOutcome::Available(0.0));
    }

    #[test]
    fn test_text_structure_counts_item_and_content_placeholders() {
        let slide = ContentSlide::new(
            SlideType::Content,
            "s",
            vec![ContentItem::new("A", "a"), ContentItem::new("B", "b"), ContentItem::new("C", "c")],
        );
        let tpl = template(&[TextRole::Title, TextRole::Item, TextRole::Content, TextRole::ItemTitle]);

        let outcome = TextStructureDimension.evaluate(&slide, &tpl);
        assert_eq!(outcome, DimensionOutcome::Available(2.0 / 3.0));
    }
}
