//! Degraded template selection that needs no semantic information.

use std::borrow::Cow;

use log::warn;

use crate::models::{ContentSlide, SlideType, Template, TemplateElement, TextRole};

/// Id of the synthetic template returned when nothing else is available.
pub const DEFAULT_TEMPLATE_ID: &str = "fallback-default";

/// Chooses an index in `0..len`. `len` is never zero.
pub trait Picker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Uniform pick backed by the platform entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => (u64::from_le_bytes(buf) % len as u64) as usize,
            Err(e) => {
                warn!("Entropy source unavailable ({e}), picking the first candidate");
                0
            }
        }
    }
}

/// Always picks the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl Picker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Why a slide could not be smart-matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingSemanticFeatures,
    MissingItems,
    MissingTitle,
}

impl FallbackReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::MissingSemanticFeatures => "semantic features missing",
            Self::MissingItems => "content items missing",
            Self::MissingTitle => "title missing",
        }
    }
}

/// Capacity-filtered random selection.
pub struct FallbackMatcher {
    picker: Box<dyn Picker>,
}

impl Default for FallbackMatcher {
    fn default() -> Self {
        Self::new(Box::new(RandomPicker))
    }
}

impl FallbackMatcher {
    pub fn new(picker: Box<dyn Picker>) -> Self {
        Self { picker }
    }

    fn choose<'a>(&self, candidates: &[&'a Template]) -> Option<&'a Template> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.picker.pick(candidates.len()).min(candidates.len() - 1);
        Some(candidates[index])
    }

    /// Picks a random template whose capacity holds every item. Without one, the
    /// template with the largest capacity wins; an empty pool yields the default template.
    pub fn find_basic_match<'a>(&self, slide: &ContentSlide, templates: &'a [Template]) -> Cow<'a, Template> {
        let item_count = slide.items.len();
        let compatible: Vec<&Template> = templates
            .iter()
            .filter(|t| item_count <= t.item_capacity())
            .collect();

        if let Some(template) = self.choose(&compatible) {
            return Cow::Borrowed(template);
        }

        // First of equal maxima wins.
        let largest = templates.iter().fold(None::<&Template>, |best, t| match best {
            Some(b) if t.item_capacity() <= b.item_capacity() => Some(b),
            _ => Some(t),
        });
        match largest {
            Some(template) => Cow::Borrowed(template),
            None => Cow::Owned(Self::default_template()),
        }
    }

    /// Picks a random template of the given category, else the first template,
    /// else the default template.
    pub fn find_match_by_slide_type<'a>(&self, slide_type: SlideType, templates: &'a [Template]) -> Cow<'a, Template> {
        let of_type: Vec<&Template> = templates
            .iter()
            .filter(|t| t.slide_type == Some(slide_type))
            .collect();

        match self.choose(&of_type).or_else(|| templates.first()) {
            Some(template) => Cow::Borrowed(template),
            None => Cow::Owned(Self::default_template()),
        }
    }

    /// Uniform pick over the whole pool.
    pub fn pick_random<'a>(&self, templates: &'a [Template]) -> Option<&'a Template> {
        let all: Vec<&Template> = templates.iter().collect();
        self.choose(&all)
    }

    /// Random pick among [`usable_templates`].
    pub fn find_closest_capacity_match<'a>(
        &self,
        templates: &'a [Template],
        item_count: usize,
        role: TextRole,
    ) -> Option<&'a Template> {
        self.choose(&usable_templates(templates, item_count, role))
    }

    /// A plain title-and-body template used when no candidate exists at all.
    pub fn default_template() -> Template {
        Template::new(
            DEFAULT_TEMPLATE_ID,
            SlideType::Content,
            vec![
                TemplateElement::text("fallback-default-title", TextRole::Title, 50.0, 50.0, 400.0, 60.0)
                    .with_font_size(32.0),
                TemplateElement::text("fallback-default-content", TextRole::Content, 50.0, 150.0, 400.0, 300.0)
                    .with_font_size(16.0),
            ],
        )
    }

    pub fn fallback_reasons(slide: &ContentSlide) -> Vec<FallbackReason> {
        let mut reasons = Vec::new();
        if slide.semantic_features.is_none() {
            reasons.push(FallbackReason::MissingSemanticFeatures);
        }
        if slide.items.is_empty() {
            reasons.push(FallbackReason::MissingItems);
        }
        if slide.title.is_empty() {
            reasons.push(FallbackReason::MissingTitle);
        }
        reasons
    }

    /// Human readable reasons, joined for logging.
    pub fn fallback_reason(slide: &ContentSlide) -> String {
        let reasons = Self::fallback_reasons(slide);
        if reasons.is_empty() {
            return "unknown reason".to_string();
        }
        reasons.iter().map(|r| r.describe()).collect::<Vec<_>>().join(", ")
    }
}

/// Templates whose count of `role` placeholders is closest to `item_count`.
///
/// A single item prefers plain templates (one `title`, one `content`, no `role`
/// placeholder). Otherwise the smallest count that still holds every item wins,
/// or the largest count when none does. Every template sharing the winning count
/// is returned, in input order.
pub fn usable_templates(templates: &[Template], item_count: usize, role: TextRole) -> Vec<&Template> {
    if item_count == 1 {
        let plain: Vec<&Template> = templates
            .iter()
            .filter(|t| {
                t.count_role(role) == 0
                    && t.count_role(TextRole::Title) == 1
                    && t.count_role(TextRole::Content) == 1
            })
            .collect();
        if !plain.is_empty() {
            return plain;
        }
    }

    let counts: Vec<usize> = templates.iter().map(|t| t.count_role(role)).collect();
    let target = counts
        .iter()
        .copied()
        .filter(|&c| c >= item_count)
        .min()
        .or_else(|| counts.iter().copied().max());

    match target {
        Some(target) => templates
            .iter()
            .zip(&counts)
            .filter(|&(_, &c)| c == target)
            .map(|(t, _)| t)
            .collect(),
        None => Vec::new(),
    }
}
