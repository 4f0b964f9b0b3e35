use log::debug;

use crate::layout::LayoutAnalysis;
use crate::models::{ContentItem, TemplateElement};
use crate::pairing::PairedElement;

/// Pairs a horizontal list: an optional caption above takes the first untitled
/// item, then columns are filled left to right with titled items in order.
pub fn pair_horizontal_list_layout<'t, 'c>(
    analysis: &LayoutAnalysis<'t>,
    with_title: &[&'c ContentItem],
    without_title: &[&'c ContentItem],
) -> Vec<PairedElement<'t, 'c>> {
    let (Some(list_titles), Some(list_texts)) = (&analysis.list_titles, &analysis.list_texts) else {
        return Vec::new();
    };

    let mut paired = Vec::with_capacity(with_title.len() + 1);
    if let (Some(&caption), Some(&item)) = (analysis.top_texts.first(), without_title.first()) {
        paired.push(PairedElement::untitled(caption, item));
    }

    let titles = sorted_by_left(list_titles);
    let texts = sorted_by_left(list_texts);
    for ((title, text), item) in titles.into_iter().zip(texts).zip(with_title.iter().copied()) {
        paired.push(PairedElement::titled(title, text, item));
    }

    debug!("Horizontal list pairing produced {} pairs", paired.len());
    paired
}

fn sorted_by_left<'t>(elements: &[&'t TemplateElement]) -> Vec<&'t TemplateElement> {
    let mut sorted = elements.to_vec();
    sorted.sort_by(|a, b| a.left.total_cmp(&b.left));
    sorted
}
