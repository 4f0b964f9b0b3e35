//! Turns generated slides plus a template library into per-slide fill plans.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::layout::{LayoutAnalyzer, LayoutKind};
use crate::matching::fallback::FallbackMatcher;
use crate::matching::service::{group_by_slide_type, TemplateMatchingService};
use crate::models::element::sort_by_reading_order;
use crate::models::{ContentItem, ContentSlide, SlideType, Template, TemplateElement, TextRole};
use crate::pagination::PaginationProcessor;
use crate::pairing::PairingEngine;
use crate::text_fit::{adapted_font_size, number_label, FontSpec, TextMeasurer};

/// Contents slides with more entries than this order them by their printed numbers.
const NUMBERED_CONTENTS_THRESHOLD: usize = 6;

/// Where the text written into a placeholder comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum TextSource {
    SlideTitle,
    SlideText,
    ItemTitle(usize),
    ItemText(usize),
    NumberLabel,
}

/// Text destined for one placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub element_id: String,
    pub source: TextSource,
    pub text: String,
    /// Lines the text may wrap into.
    pub max_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// How one output slide fills its template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidePlan {
    pub slide_index: usize,
    pub slide_type: SlideType,
    pub template_id: String,
    /// Items preceding this slide before pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutKind>,
    pub assignments: Vec<Assignment>,
    /// Placeholders to delete because no content reaches them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<String>,
}

impl SlidePlan {
    fn new(slide_index: usize, slide: &ContentSlide, template: &Template) -> Self {
        Self {
            slide_index,
            slide_type: slide.slide_type,
            template_id: template.id.clone(),
            offset: slide.offset,
            layout: None,
            assignments: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn assignment_for(&self, element_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.element_id == element_id)
    }
}

/// Pagination, template selection, layout analysis and pairing in one pass.
pub struct SlidePlanner {
    service: TemplateMatchingService,
    pagination: PaginationProcessor,
    analyzer: LayoutAnalyzer,
    pairing: PairingEngine,
    measurer: Option<Arc<dyn TextMeasurer + Send + Sync>>,
}

impl Default for SlidePlanner {
    fn default() -> Self {
        Self {
            service: TemplateMatchingService::default(),
            pagination: PaginationProcessor::default(),
            analyzer: LayoutAnalyzer::default(),
            pairing: PairingEngine::default(),
            measurer: None,
        }
    }
}

impl SlidePlanner {
    /// Builds every stage from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            service: TemplateMatchingService::from_config(config)?,
            pagination: PaginationProcessor::new(config.rule_manager()?),
            analyzer: LayoutAnalyzer::new(config.layout_analysis.clone()),
            pairing: PairingEngine::new(config.match_score.clone()),
            measurer: None,
        })
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackMatcher) -> Self {
        self.service = self.service.with_fallback(fallback);
        self
    }

    pub fn service(&self) -> &TemplateMatchingService {
        &self.service
    }

    /// Paginates `slides` and plans every resulting slide against the templates
    /// of its category. Fails when a category has no templates at all.
    pub fn plan(&self, slides: &[ContentSlide], templates: &[Template]) -> Result<Vec<SlidePlan>> {
        let paginated = self.pagination.process_pagination(slides);
        let pools = group_by_slide_type(templates);
        let mut plans = Vec::with_capacity(paginated.len());
        let mut transition_count = 0;

        for (index, slide) in paginated.iter().enumerate() {
            let pool = pools.get(&slide.slide_type).map(Vec::as_slice).unwrap_or_default();
            let template = self.service.select_template(slide, pool)?;
            let mut plan = SlidePlan::new(index, slide, &template);

            match slide.slide_type {
                SlideType::Cover => self.plan_cover(slide, &template, &mut plan, None),
                SlideType::Transition => {
                    transition_count += 1;
                    self.plan_cover(slide, &template, &mut plan, Some(transition_count));
                }
                SlideType::Contents => self.plan_contents(slide, &template, &mut plan),
                SlideType::Content => self.plan_content(slide, &template, &mut plan),
                SlideType::End => {}
            }

            debug!(
                "Slide {} ({}) -> template '{}' with {} assignments",
                index,
                slide.slide_type.as_str(),
                plan.template_id,
                plan.assignments.len()
            );
            plans.push(plan);
        }

        info!("Planned {} slides from {} input slides", plans.len(), slides.len());
        Ok(plans)
    }

    fn assign(&self, plan: &mut SlidePlan, element: &TemplateElement, source: TextSource, text: &str, max_line: usize, fit_text: &str) {
        let font_size = self.measurer.as_deref().map(|measurer| {
            let font = element_font(element);
            adapted_font_size(measurer, fit_text, &font, element.width, max_line)
        });
        plan.assignments.push(Assignment {
            element_id: element.id.clone(),
            source,
            text: text.to_string(),
            max_line,
            font_size,
        });
    }

    /// Cover and transition slides. `part` is the 1-based transition number.
    fn plan_cover(&self, slide: &ContentSlide, template: &Template, plan: &mut SlidePlan, part: Option<usize>) {
        for element in &template.elements {
            match element.role() {
                Some(TextRole::Title) if !slide.title.is_empty() => {
                    self.assign(plan, element, TextSource::SlideTitle, &slide.title, 1, &slide.title);
                }
                Some(TextRole::Content) if !slide.text.is_empty() => {
                    self.assign(plan, element, TextSource::SlideText, &slide.text, 3, &slide.text);
                }
                Some(TextRole::PartNumber) => {
                    if let Some(part) = part {
                        let label = number_label(part - 1, 0, true);
                        self.assign(plan, element, TextSource::NumberLabel, &label, 1, &label);
                    }
                }
                _ => {}
            }
        }
    }

    fn plan_contents(&self, slide: &ContentSlide, template: &Template, plan: &mut SlidePlan) {
        let numbers = ordered_number_placeholders(template);
        let entries = ordered_contents_entries(template, &numbers);
        let longest = longest(slide.items.iter().map(entry_text));

        let mut removed_groups: HashSet<&str> = HashSet::new();
        for (index, &element) in entries.iter().enumerate() {
            match slide.items.get(index) {
                Some(item) => {
                    let text = entry_text(item);
                    self.assign(plan, element, TextSource::ItemTitle(index), text, 1, longest);
                }
                None => {
                    plan.removed.push(element.id.clone());
                    if let Some(group) = &element.group_id {
                        removed_groups.insert(group.as_str());
                    }
                }
            }
        }

        for element in &template.elements {
            let in_removed_group = element.group_id.as_deref().is_some_and(|g| removed_groups.contains(g));
            if in_removed_group && !plan.removed.contains(&element.id) {
                plan.removed.push(element.id.clone());
            }
        }

        let offset = slide.offset.unwrap_or(0);
        for (index, &element) in numbers.iter().enumerate() {
            if plan.removed.contains(&element.id) {
                continue;
            }
            let label = number_label(index, offset, true);
            self.assign(plan, element, TextSource::NumberLabel, &label, 1, &label);
        }
    }

    fn plan_content(&self, slide: &ContentSlide, template: &Template, plan: &mut SlidePlan) {
        if let [item] = slide.items.as_slice() {
            // A title-only item still fills the body.
            let filled = if item.has_text() {
                Some((TextSource::ItemText(0), item.text.as_str()))
            } else if item.has_title() {
                Some((TextSource::ItemTitle(0), item.title.as_str()))
            } else {
                None
            };
            if let (Some((source, text)), Some(element)) = (filled, single_item_target(template)) {
                self.assign(plan, element, source, text, 6, text);
            }
        } else {
            let titles = template.elements_with_role(TextRole::ItemTitle);
            let texts = template.elements_with_role(TextRole::Item);
            let analysis = self.analyzer.analyze_template_layout(&titles, &texts);
            plan.layout = Some(analysis.layout_type);

            let pairs = self.pairing.build_paired_elements(&analysis, &titles, &texts, &slide.items);
            let longest_title = longest(slide.items.iter().filter(|i| i.has_title()).map(|i| i.title.as_str()));
            let longest_text = longest(slide.items.iter().filter(|i| i.has_text()).map(|i| i.text.as_str()));

            for pair in &pairs {
                let Some(index) = slide.items.iter().position(|i| std::ptr::eq(i, pair.data_item)) else {
                    continue;
                };
                if let Some(title) = pair.title {
                    if pair.data_item.has_title() {
                        self.assign(plan, title, TextSource::ItemTitle(index), &pair.data_item.title, 1, longest_title);
                    }
                }
                if pair.data_item.has_text() {
                    self.assign(plan, pair.text, TextSource::ItemText(index), &pair.data_item.text, 4, longest_text);
                }
            }

            let mut numbers = template.elements_with_role(TextRole::ItemNumber);
            sort_by_reading_order(&mut numbers);
            let offset = slide.offset.unwrap_or(0);
            for (index, element) in numbers.into_iter().enumerate() {
                let label = number_label(index, offset, true);
                self.assign(plan, element, TextSource::NumberLabel, &label, 1, &label);
            }
        }

        if !slide.title.is_empty() {
            if let Some(element) = template.elements.iter().find(|e| e.has_role(TextRole::Title)) {
                self.assign(plan, element, TextSource::SlideTitle, &slide.title, 1, &slide.title);
            }
        }
    }
}

fn element_font(element: &TemplateElement) -> FontSpec {
    let spec = element.rich_text().map(FontSpec::from_html).unwrap_or_default();
    match element.font_size {
        Some(size) => spec.with_size(size),
        None => spec,
    }
}

/// Body placeholder for a lone item, or the first item placeholder in reading order.
fn single_item_target(template: &Template) -> Option<&TemplateElement> {
    if let Some(body) = template.elements.iter().find(|e| e.has_role(TextRole::Content)) {
        return Some(body);
    }
    let mut items = template.elements_with_role(TextRole::Item);
    sort_by_reading_order(&mut items);
    items.into_iter().next()
}

fn longest<'a>(texts: impl Iterator<Item = &'a str>) -> &'a str {
    texts.fold("", |longest, t| if t.chars().count() > longest.chars().count() { t } else { longest })
}

/// Contents entries may come as titles or, from older generators, as bare text.
fn entry_text(item: &ContentItem) -> &str {
    if item.has_title() {
        &item.title
    } else {
        &item.text
    }
}

fn printed_number(element: &TemplateElement) -> Option<i64> {
    let content = element.rich_text()?;
    let mut plain = String::new();
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => plain.push(c),
            _ => {}
        }
    }
    plain.trim().parse().ok()
}

/// `itemNumber` placeholders in reading order, or by their printed number when
/// the template is large and every number is readable.
fn ordered_number_placeholders(template: &Template) -> Vec<&TemplateElement> {
    let mut numbers = template.elements_with_role(TextRole::ItemNumber);
    sort_by_reading_order(&mut numbers);
    if numbers.len() > NUMBERED_CONTENTS_THRESHOLD {
        let printed: Option<Vec<i64>> = numbers.iter().map(|e| printed_number(e)).collect();
        if let Some(printed) = printed {
            let mut keyed: Vec<(i64, &TemplateElement)> = printed.into_iter().zip(numbers).collect();
            keyed.sort_by_key(|&(n, _)| n);
            return keyed.into_iter().map(|(_, e)| e).collect();
        }
    }
    numbers
}

/// `item` placeholders in reading order, or in the order of the numbers sharing
/// their group when the template is large and every entry has one.
fn ordered_contents_entries<'a>(template: &'a Template, numbers: &[&'a TemplateElement]) -> Vec<&'a TemplateElement> {
    let mut entries = template.elements_with_role(TextRole::Item);
    sort_by_reading_order(&mut entries);
    if entries.len() > NUMBERED_CONTENTS_THRESHOLD {
        let rank = |entry: &TemplateElement| {
            let group = entry.group_id.as_deref()?;
            let number = numbers.iter().find(|n| n.group_id.as_deref() == Some(group))?;
            printed_number(number)
        };
        let ranks: Option<Vec<i64>> = entries.iter().map(|&e| rank(e)).collect();
        if let Some(ranks) = ranks {
            let mut keyed: Vec<(i64, &TemplateElement)> = ranks.into_iter().zip(entries).collect();
            keyed.sort_by_key(|&(n, _)| n);
            return keyed.into_iter().map(|(_, e)| e).collect();
        }
    }
    entries
}
