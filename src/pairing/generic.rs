use log::debug;

use crate::models::element::sort_by_reading_order;
use crate::models::{ContentItem, TemplateElement};
use crate::pairing::scorer::MatchScorer;
use crate::pairing::PairedElement;

/// Pairs placeholders without any detected structure.
///
/// Titles and texts are taken in reading order. Each titled item claims the title
/// at its index and the unused text scoring best against that title; ties go to
/// the earlier text, and a text is chosen even when every candidate scores zero.
/// The choice is greedy per title, not a global optimum. Untitled items then take
/// the leftover texts in reading order.
pub fn pair_generic_layout<'t, 'c>(
    titles: &[&'t TemplateElement],
    texts: &[&'t TemplateElement],
    with_title: &[&'c ContentItem],
    without_title: &[&'c ContentItem],
    scorer: &MatchScorer,
) -> Vec<PairedElement<'t, 'c>> {
    let mut sorted_titles: Vec<&TemplateElement> = titles.iter().copied().filter(|el| el.is_text_bearing()).collect();
    let mut remaining: Vec<&TemplateElement> = texts.iter().copied().filter(|el| el.is_text_bearing()).collect();
    sort_by_reading_order(&mut sorted_titles);
    sort_by_reading_order(&mut remaining);

    let mut paired = Vec::with_capacity(with_title.len() + without_title.len());

    for (&title, &item) in sorted_titles.iter().zip(with_title) {
        let mut best: Option<(usize, f64)> = None;
        for (index, text) in remaining.iter().enumerate() {
            let score = scorer.score(title, text);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        let Some((index, score)) = best else {
            break;
        };
        let text = remaining.remove(index);
        debug!("Paired title '{}' with text '{}' (score {:.1})", title.id, text.id, score);
        paired.push(PairedElement::titled(title, text, item));
    }

    for (text, &item) in remaining.into_iter().zip(without_title) {
        paired.push(PairedElement::untitled(text, item));
    }
    paired
}
