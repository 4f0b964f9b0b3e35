use log::{info, warn};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};

use crate::errors::Result;
use crate::models::{ContentItem, ContentSlide};
use crate::pagination::rules::{PaginationRule, RuleManager};

/// Counts over a paginated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationStats {
    pub total_slides: usize,
    /// Slides that carry an offset, i.e. that came out of a split.
    pub paginated_slides: usize,
}

/// Splits oversized content slides according to a [`RuleManager`].
#[derive(Debug, Clone, Default)]
pub struct PaginationProcessor {
    rules: RuleManager,
}

impl PaginationProcessor {
    pub fn new(rules: RuleManager) -> Self {
        Self { rules }
    }

    /// Default rules plus `custom`.
    pub fn with_custom_rules(custom: Vec<PaginationRule>) -> Result<Self> {
        Ok(Self::new(RuleManager::new(custom)?))
    }

    pub fn rules(&self) -> &RuleManager {
        &self.rules
    }

    pub fn add_custom_rule(&mut self, rule: PaginationRule) -> Result<()> {
        self.rules.add_rule(rule)
    }

    /// Returns the deck with every paginated slide that matches a rule replaced
    /// by its pages. Each page carries the number of items before it as `offset`.
    /// Slides without an applicable rule pass through unchanged.
    pub fn process_pagination(&self, slides: &[ContentSlide]) -> Vec<ContentSlide> {
        let mut output = Vec::with_capacity(slides.len());

        for slide in slides {
            let rule = slide
                .slide_type
                .is_paginated()
                .then(|| self.rules.find_applicable_rule(slide.slide_type, &slide.items))
                .flatten();
            let Some(rule) = rule else {
                output.push(slide.clone());
                continue;
            };

            let pages = self.rules.apply_rule(&slide.items, rule);
            info!(
                "Rule '{}' split {} slide '{}' ({} items) into {} pages",
                rule.name,
                slide.slide_type.as_str(),
                slide.title,
                slide.items.len(),
                pages.len()
            );

            let mut offset = 0;
            for page in pages {
                output.push(ContentSlide {
                    items: page.to_vec(),
                    offset: Some(offset),
                    ..slide.clone()
                });
                offset += page.len();
            }
        }
        output
    }

    pub fn pagination_stats(&self, slides: &[ContentSlide]) -> PaginationStats {
        pagination_stats(slides)
    }

    pub fn validate_pagination(&self, original: &[ContentSlide], paginated: &[ContentSlide]) -> bool {
        validate_pagination(original, paginated)
    }
}

pub fn pagination_stats(slides: &[ContentSlide]) -> PaginationStats {
    PaginationStats {
        total_slides: slides.len(),
        paginated_slides: slides.iter().filter(|slide| slide.offset.is_some()).count(),
    }
}

fn all_items(slides: &[ContentSlide]) -> impl Iterator<Item = &ContentItem> {
    slides.iter().flat_map(|slide| slide.items.iter())
}

/// True when the items of `paginated`, concatenated in order, equal those of `original`.
pub fn validate_pagination(original: &[ContentSlide], paginated: &[ContentSlide]) -> bool {
    let valid = all_items(original).eq(all_items(paginated));
    if !valid {
        warn!("Pagination lost, duplicated or reordered items");
    }
    valid
}

fn item_lines(slides: &[ContentSlide]) -> String {
    all_items(slides)
        .map(|item| format!("{} | {}\n", item.title, item.text))
        .collect()
}

/// Line diff of the flattened items, one `title | text` line per item.
/// Returns an empty string when pagination conserved every item.
pub fn conservation_report(original: &[ContentSlide], paginated: &[ContentSlide]) -> String {
    let before = item_lines(original);
    let after = item_lines(paginated);
    if before == after {
        return String::new();
    }

    let diff = TextDiff::from_lines(&before, &after);
    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => (),
        }
    }

    format!(
        "Items added: {}\nItems removed: {}\n\n{}",
        added,
        removed,
        diff.unified_diff().header("original", "paginated")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlideType;

    fn items(n: usize) -> Vec<ContentItem> {
        (0..n).map(|i| ContentItem::new(format!("Point {i}"), format!("Detail {i}"))).collect()
    }

    #[test]
    fn test_six_content_items_split_three_and_three() {
        let slides = vec![ContentSlide::new(SlideType::Content, "Agenda", items(6))];

        let paginated = PaginationProcessor::default().process_pagination(&slides);

        assert_eq!(paginated.len(), 2);
        assert_eq!(paginated[0].items.len(), 3);
        assert_eq!(paginated[1].items.len(), 3);
        assert_eq!(paginated[0].offset, Some(0));
        assert_eq!(paginated[1].offset, Some(3), "second page starts after three items");
        assert_eq!(paginated[1].title, "Agenda");
        assert!(validate_pagination(&slides, &paginated));
    }

    #[test]
    fn test_twelve_contents_entries_split() {
        let slides = vec![ContentSlide::new(SlideType::Contents, "", items(12))];
        let paginated = PaginationProcessor::default().process_pagination(&slides);

        assert_eq!(paginated.len(), 2);
        assert!(paginated.iter().all(|s| s.slide_type == SlideType::Contents));
        assert_eq!(paginated[1].offset, Some(10));
    }

    #[test]
    fn test_unmatched_slides_pass_through() {
        let mut cover = ContentSlide::new(SlideType::Cover, "Welcome", Vec::new());
        cover.text = "Subtitle".to_string();
        let short = ContentSlide::new(SlideType::Content, "Short", items(2));
        let big_end = ContentSlide::new(SlideType::End, "Bye", items(9));
        let slides = vec![cover, short, big_end];

        let paginated = PaginationProcessor::default().process_pagination(&slides);

        assert_eq!(paginated, slides);
        assert_eq!(pagination_stats(&paginated).paginated_slides, 0);
    }

    #[test]
    fn test_every_default_rule_conserves_items() {
        let processor = PaginationProcessor::default();
        for slide_type in [SlideType::Content, SlideType::Contents] {
            for n in 0..=30 {
                let slides = vec![ContentSlide::new(slide_type, "deck", items(n))];
                let paginated = processor.process_pagination(&slides);
                assert!(
                    validate_pagination(&slides, &paginated),
                    "{n} {} items:\n{}",
                    slide_type.as_str(),
                    conservation_report(&slides, &paginated)
                );
                assert!(
                    paginated.iter().all(|s| s.items.len() <= 10),
                    "{n} {} items produced an oversized page",
                    slide_type.as_str()
                );
            }
        }
    }

    #[test]
    fn test_stats_count_offset_slides() {
        let mut first = ContentSlide::new(SlideType::Content, "a", items(6));
        first.offset = Some(0);
        let mut second = ContentSlide::new(SlideType::Content, "a", items(3));
        second.offset = Some(3);
        let cover = ContentSlide::new(SlideType::Cover, "c", Vec::new());

        let stats = pagination_stats(&[first, second, cover]);
        assert_eq!(stats, PaginationStats { total_slides: 3, paginated_slides: 2 });
    }

    #[test]
    fn test_lost_items_fail_validation_with_report() {
        let original = vec![ContentSlide::new(SlideType::Content, "a", items(6))];
        let mut truncated = ContentSlide::new(SlideType::Content, "a", items(3));
        truncated.offset = Some(0);
        let paginated = vec![truncated];

        assert!(!validate_pagination(&original, &paginated));
        let report = conservation_report(&original, &paginated);
        assert!(report.contains("Items removed: 3"), "report was:\n{report}");
        assert!(report.contains("-Point 5 | Detail 5"));
        assert!(conservation_report(&original, &original).is_empty());
    }

    #[test]
    fn test_custom_rule_takes_priority() {
        let json = r#"{
            "name": "pairs",
            "condition": {"minItems": 4, "contentType": ["content"]},
            "strategy": {"splitPoints": [2, 4], "maxItemsPerPage": 2},
            "priority": 200
        }"#;
        let rule: PaginationRule = serde_json::from_str(json).unwrap();
        let processor = PaginationProcessor::with_custom_rules(vec![rule]).unwrap();

        let slides = vec![ContentSlide::new(SlideType::Content, "x", items(6))];
        let sizes: Vec<usize> = processor.process_pagination(&slides).iter().map(|s| s.items.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2]);
    }
}
