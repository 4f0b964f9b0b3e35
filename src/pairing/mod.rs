//! Assigns content items to title/text placeholders.

pub mod comparison;
pub mod generic;
pub mod horizontal_list;
pub mod scorer;

use serde::Serialize;

use crate::config::MatchScoreConfig;
use crate::layout::{LayoutAnalysis, LayoutKind};
use crate::models::{ContentItem, TemplateElement};

pub use comparison::pair_comparison_layout;
pub use generic::pair_generic_layout;
pub use horizontal_list::pair_horizontal_list_layout;
pub use scorer::{calculate_layout_match_score, MatchScorer};

/// One content item bound to the placeholders that will display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairedElement<'t, 'c> {
    /// Title placeholder; absent for untitled items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'t TemplateElement>,
    pub text: &'t TemplateElement,
    pub data_item: &'c ContentItem,
}

impl<'t, 'c> PairedElement<'t, 'c> {
    pub fn titled(title: &'t TemplateElement, text: &'t TemplateElement, data_item: &'c ContentItem) -> Self {
        Self {
            title: Some(title),
            text,
            data_item,
        }
    }

    pub fn untitled(text: &'t TemplateElement, data_item: &'c ContentItem) -> Self {
        Self {
            title: None,
            text,
            data_item,
        }
    }
}

/// Splits items into those with a non-blank title and those without, keeping order.
pub fn split_items(items: &[ContentItem]) -> (Vec<&ContentItem>, Vec<&ContentItem>) {
    items.iter().partition(|item| item.has_title())
}

/// Chooses the pairing strategy that fits a layout analysis.
#[derive(Debug, Clone, Default)]
pub struct PairingEngine {
    scorer: MatchScorer,
}

impl PairingEngine {
    pub fn new(config: MatchScoreConfig) -> Self {
        Self {
            scorer: MatchScorer::new(config),
        }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Pairs `items` with placeholders according to `analysis`.
    ///
    /// `titles` and `texts` are the raw placeholder lists; only the generic
    /// strategy reads them, the structured ones use the analysis slots.
    pub fn build_paired_elements<'t, 'c>(
        &self,
        analysis: &LayoutAnalysis<'t>,
        titles: &[&'t TemplateElement],
        texts: &[&'t TemplateElement],
        items: &'c [ContentItem],
    ) -> Vec<PairedElement<'t, 'c>> {
        let (with_title, without_title) = split_items(items);
        match analysis.layout_type {
            LayoutKind::Comparison => pair_comparison_layout(analysis, &with_title, &without_title),
            LayoutKind::HorizontalList => pair_horizontal_list_layout(analysis, &with_title, &without_title),
            LayoutKind::Generic => pair_generic_layout(titles, texts, &with_title, &without_title, &self.scorer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutAnalyzer;
    use crate::models::{SlideType, Template, TextRole};

    #[test]
    fn test_split_items_keeps_order() {
        let items = vec![
            ContentItem::new("A", "a"),
            ContentItem::new("  ", "blank"),
            ContentItem::new("B", "b"),
            ContentItem::new("", "none"),
        ];
        let (with_title, without_title) = split_items(&items);

        let titled: Vec<&str> = with_title.iter().map(|i| i.text.as_str()).collect();
        let untitled: Vec<&str> = without_title.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(titled, vec!["a", "b"]);
        assert_eq!(untitled, vec!["blank", "none"], "whitespace-only titles count as untitled");
    }

    #[test]
    fn test_engine_dispatches_on_layout_kind() {
        let template = Template::new(
            "cmp",
            SlideType::Content,
            vec![
                TemplateElement::text("lt", TextRole::ItemTitle, 80.0, 150.0, 360.0, 40.0),
                TemplateElement::text("rt", TextRole::ItemTitle, 520.0, 150.0, 360.0, 40.0),
                TemplateElement::text("lx", TextRole::Item, 80.0, 220.0, 360.0, 160.0),
                TemplateElement::text("rx", TextRole::Item, 520.0, 220.0, 360.0, 160.0),
            ],
        );
        let items = vec![ContentItem::new("Left", "l"), ContentItem::new("Right", "r")];
        let titles = template.elements_with_role(TextRole::ItemTitle);
        let texts = template.elements_with_role(TextRole::Item);
        let analysis = LayoutAnalyzer::default().analyze_template_layout(&titles, &texts);

        let pairs = PairingEngine::default().build_paired_elements(&analysis, &titles, &texts, &items);

        assert_eq!(analysis.layout_type, LayoutKind::Comparison);
        let got: Vec<(&str, &str)> = pairs.iter().map(|p| (p.text.id.as_str(), p.data_item.title.as_str())).collect();
        assert_eq!(got, vec![("lx", "Left"), ("rx", "Right")]);
    }

    #[test]
    fn test_engine_uses_scorer_for_generic_layouts() {
        let title = TemplateElement::text("t", TextRole::ItemTitle, 100.0, 100.0, 200.0, 40.0);
        let near = TemplateElement::text("near", TextRole::Item, 100.0, 170.0, 200.0, 100.0);
        let items = vec![ContentItem::new("T", "body")];

        let pairs = PairingEngine::default().build_paired_elements(
            &LayoutAnalysis::generic(),
            &[&title],
            &[&near],
            &items,
        );

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].title.map(|t| t.id.as_str()), Some("t"));
    }
}
