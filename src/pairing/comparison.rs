use log::debug;

use crate::layout::LayoutAnalysis;
use crate::models::{ContentItem, TemplateElement};
use crate::pairing::PairedElement;

/// Pairs a comparison layout in slot order: top caption, left column, right
/// column, bottom caption.
///
/// Captions take untitled items. A column takes the next titled item together
/// with its title placeholder; when titled items run out it takes an untitled
/// item into its text placeholder alone. Each slot is filled at most once.
pub fn pair_comparison_layout<'t, 'c>(
    analysis: &LayoutAnalysis<'t>,
    with_title: &[&'c ContentItem],
    without_title: &[&'c ContentItem],
) -> Vec<PairedElement<'t, 'c>> {
    let mut titled = with_title.iter().copied();
    let mut untitled = without_title.iter().copied();
    let mut paired = Vec::with_capacity(4);

    fill_caption(&analysis.top_texts, &mut untitled, &mut paired);
    fill_column(&analysis.left_titles, &analysis.left_texts, &mut titled, &mut untitled, &mut paired);
    fill_column(&analysis.right_titles, &analysis.right_texts, &mut titled, &mut untitled, &mut paired);
    fill_caption(&analysis.bottom_texts, &mut untitled, &mut paired);

    debug!("Comparison pairing produced {} pairs", paired.len());
    paired
}

fn fill_caption<'t, 'c>(
    texts: &[&'t TemplateElement],
    untitled: &mut impl Iterator<Item = &'c ContentItem>,
    paired: &mut Vec<PairedElement<'t, 'c>>,
) {
    if let Some(&text) = texts.first() {
        if let Some(item) = untitled.next() {
            paired.push(PairedElement::untitled(text, item));
        }
    }
}

fn fill_column<'t, 'c>(
    titles: &[&'t TemplateElement],
    texts: &[&'t TemplateElement],
    titled: &mut impl Iterator<Item = &'c ContentItem>,
    untitled: &mut impl Iterator<Item = &'c ContentItem>,
    paired: &mut Vec<PairedElement<'t, 'c>>,
) {
    let Some(&text) = texts.first() else {
        return;
    };
    if let Some(&title) = titles.first() {
        if let Some(item) = titled.next() {
            paired.push(PairedElement::titled(title, text, item));
            return;
        }
    }
    if let Some(item) = untitled.next() {
        paired.push(PairedElement::untitled(text, item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutAnalyzer;
    use crate::models::TextRole;
    use crate::pairing::split_items;

    struct Fixture {
        elements: Vec<TemplateElement>,
    }

    impl Fixture {
        fn new(with_captions: bool) -> Self {
            let mut elements = vec![
                TemplateElement::text("lt", TextRole::ItemTitle, 80.0, 150.0, 360.0, 40.0),
                TemplateElement::text("rt", TextRole::ItemTitle, 520.0, 150.0, 360.0, 40.0),
                TemplateElement::text("lx", TextRole::Item, 80.0, 220.0, 360.0, 160.0),
                TemplateElement::text("rx", TextRole::Item, 520.0, 220.0, 360.0, 160.0),
            ];
            if with_captions {
                elements.push(TemplateElement::text("top", TextRole::Item, 40.0, 80.0, 880.0, 50.0));
                elements.push(TemplateElement::text("bottom", TextRole::Item, 40.0, 420.0, 880.0, 50.0));
            }
            Self { elements }
        }

        fn analysis(&self) -> LayoutAnalysis<'_> {
            let titles: Vec<&TemplateElement> = self.elements.iter().filter(|e| e.has_role(TextRole::ItemTitle)).collect();
            let texts: Vec<&TemplateElement> = self.elements.iter().filter(|e| e.has_role(TextRole::Item)).collect();
            LayoutAnalyzer::default().analyze_template_layout(&titles, &texts)
        }
    }

    fn slots(pairs: &[PairedElement<'_, '_>]) -> Vec<(Option<String>, String, String)> {
        pairs
            .iter()
            .map(|p| (p.title.map(|t| t.id.clone()), p.text.id.clone(), p.data_item.text.clone()))
            .collect()
    }

    #[test]
    fn test_full_comparison_fills_slots_in_order() {
        let fixture = Fixture::new(true);
        let items = vec![
            ContentItem::new("", "intro"),
            ContentItem::new("Pros", "cheap"),
            ContentItem::new("Cons", "slow"),
            ContentItem::new("", "verdict"),
        ];
        let (with_title, without_title) = split_items(&items);

        let pairs = pair_comparison_layout(&fixture.analysis(), &with_title, &without_title);

        assert_eq!(pairs.len(), 4);
        assert_eq!(
            slots(&pairs),
            vec![
                (None, "top".to_string(), "intro".to_string()),
                (Some("lt".to_string()), "lx".to_string(), "cheap".to_string()),
                (Some("rt".to_string()), "rx".to_string(), "slow".to_string()),
                (None, "bottom".to_string(), "verdict".to_string()),
            ]
        );
    }

    #[test]
    fn test_right_column_takes_untitled_item_when_titles_run_out() {
        let fixture = Fixture::new(false);
        let items = vec![ContentItem::new("Only", "one"), ContentItem::new("", "loose")];
        let (with_title, without_title) = split_items(&items);

        let pairs = pair_comparison_layout(&fixture.analysis(), &with_title, &without_title);

        assert_eq!(
            slots(&pairs),
            vec![
                (Some("lt".to_string()), "lx".to_string(), "one".to_string()),
                (None, "rx".to_string(), "loose".to_string()),
            ]
        );
    }

    #[test]
    fn test_extra_items_are_left_unpaired() {
        let fixture = Fixture::new(false);
        let items = vec![
            ContentItem::new("A", "a"),
            ContentItem::new("B", "b"),
            ContentItem::new("C", "c"),
        ];
        let (with_title, without_title) = split_items(&items);

        let pairs = pair_comparison_layout(&fixture.analysis(), &with_title, &without_title);
        assert_eq!(pairs.len(), 2, "single-instance layout fills each slot once");
    }
}
