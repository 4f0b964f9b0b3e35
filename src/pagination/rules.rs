use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::models::{ContentItem, SlideType};

/// Programmatic gate on the items of a slide.
#[derive(Clone)]
pub struct ItemValidator(Arc<dyn Fn(&[ContentItem]) -> bool + Send + Sync>);

impl ItemValidator {
    pub fn new(f: impl Fn(&[ContentItem]) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn check(&self, items: &[ContentItem]) -> bool {
        (self.0)(items)
    }
}

impl PartialEq for ItemValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ItemValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemValidator(..)")
    }
}

/// When a rule applies. Every present field must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Slide categories the rule is limited to.
    #[serde(default, alias = "slideTypes", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Vec<SlideType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<SlideType>,
    #[serde(skip)]
    pub custom_validator: Option<ItemValidator>,
}

impl PaginationCondition {
    pub fn matches(&self, slide_type: SlideType, items: &[ContentItem]) -> bool {
        let count = items.len();
        if self.min_items.is_some_and(|min| count < min) {
            return false;
        }
        if self.max_items.is_some_and(|max| count > max) {
            return false;
        }
        if let Some(types) = &self.content_type {
            if !types.contains(&slide_type) {
                return false;
            }
        }
        if self.template_type.is_some_and(|t| t != slide_type) {
            return false;
        }
        self.custom_validator.as_ref().map_or(true, |v| v.check(items))
    }
}

/// How pages larger than `maxItemsPerPage` are subdivided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceStrategy {
    /// Page sizes differ by at most one.
    Even,
    /// Full pages first, remainder last.
    #[default]
    FrontHeavy,
    /// Remainder first, full pages after.
    BackHeavy,
}

impl BalanceStrategy {
    /// Page sizes for `len` items with at most `max` per page.
    pub fn page_sizes(self, len: usize, max: usize) -> Vec<usize> {
        if len == 0 || max == 0 || len <= max {
            return vec![len];
        }
        let pages = len.div_ceil(max);
        match self {
            BalanceStrategy::Even => {
                let base = len / pages;
                let extra = len % pages;
                (0..pages).map(|i| base + usize::from(i < extra)).collect()
            }
            BalanceStrategy::FrontHeavy => {
                let mut sizes = vec![max; pages - 1];
                sizes.push(len - max * (pages - 1));
                sizes
            }
            BalanceStrategy::BackHeavy => {
                let mut sizes = vec![len - max * (pages - 1)];
                sizes.extend(std::iter::repeat(max).take(pages - 1));
                sizes
            }
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationStrategy {
    /// Item indices at which a new page starts.
    #[serde(default)]
    pub split_points: Vec<usize>,
    pub max_items_per_page: usize,
    #[serde(default)]
    pub balance_strategy: BalanceStrategy,
    #[serde(default = "default_true")]
    pub preserve_structure: bool,
}

impl PaginationStrategy {
    pub fn new(split_points: Vec<usize>, max_items_per_page: usize) -> Self {
        Self {
            split_points,
            max_items_per_page,
            balance_strategy: BalanceStrategy::default(),
            preserve_structure: true,
        }
    }

    /// Cuts `items` into pages. Concatenating the pages always yields `items`.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        let mut points = self.split_points.clone();
        points.sort_unstable();
        points.dedup();

        let mut chunks = Vec::with_capacity(points.len() + 1);
        let mut start = 0;
        for point in points {
            let end = point.min(items.len());
            if end > start {
                chunks.push(&items[start..end]);
                start = end;
            }
        }
        if start < items.len() {
            chunks.push(&items[start..]);
        }

        let mut pages = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let mut rest = chunk;
            for size in self.balance_strategy.page_sizes(chunk.len(), self.max_items_per_page) {
                let (page, tail) = rest.split_at(size);
                pages.push(page);
                rest = tail;
            }
        }
        pages
    }
}

/// A named, prioritized pagination rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRule {
    pub name: String,
    #[serde(default)]
    pub condition: PaginationCondition,
    pub strategy: PaginationStrategy,
    /// Higher priorities are evaluated first.
    #[serde(default)]
    pub priority: i32,
}

impl PaginationRule {
    pub fn new(name: impl Into<String>, condition: PaginationCondition, strategy: PaginationStrategy, priority: i32) -> Self {
        Self {
            name: name.into(),
            condition,
            strategy,
            priority,
        }
    }

    pub fn with_validator(mut self, validator: ItemValidator) -> Self {
        self.condition.custom_validator = Some(validator);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| EngineError::InvalidRule {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("rule name is empty"));
        }
        if self.strategy.max_items_per_page == 0 {
            return Err(invalid("maxItemsPerPage must be at least 1"));
        }
        if let (Some(min), Some(max)) = (self.condition.min_items, self.condition.max_items) {
            if min > max {
                return Err(invalid("minItems exceeds maxItems"));
            }
        }
        Ok(())
    }

    pub fn applies_to(&self, slide_type: SlideType, items: &[ContentItem]) -> bool {
        self.condition.matches(slide_type, items)
    }
}

fn content_rule(name: &str, min: usize, max: Option<usize>, split_points: Vec<usize>) -> PaginationRule {
    let condition = PaginationCondition {
        min_items: Some(min),
        max_items: max,
        content_type: Some(vec![SlideType::Content]),
        ..Default::default()
    };
    PaginationRule::new(name, condition, PaginationStrategy::new(split_points, 4), 100)
}

fn contents_rule(name: &str, min: usize, max: Option<usize>, split_point: usize) -> PaginationRule {
    let condition = PaginationCondition {
        min_items: Some(min),
        max_items: max,
        content_type: Some(vec![SlideType::Contents]),
        ..Default::default()
    };
    PaginationRule::new(name, condition, PaginationStrategy::new(vec![split_point], split_point), 150)
}

/// The built-in rule set.
pub fn default_rules() -> Vec<PaginationRule> {
    vec![
        content_rule("standard-content-5-6-items", 5, Some(6), vec![3]),
        content_rule("standard-content-7-8-items", 7, Some(8), vec![4]),
        content_rule("standard-content-9-10-items", 9, Some(10), vec![3, 6]),
        content_rule("standard-content-over-10-items", 11, None, vec![4, 8]),
        contents_rule("contents-11-items", 11, Some(11), 6),
        contents_rule("contents-over-11-items", 12, None, 10),
    ]
}

/// Ordered rule set; the first applicable rule wins.
#[derive(Debug, Clone)]
pub struct RuleManager {
    rules: Vec<PaginationRule>,
}

impl Default for RuleManager {
    fn default() -> Self {
        Self::from_rules(default_rules())
    }
}

impl RuleManager {
    /// Built-in rules plus `custom`, each custom rule validated.
    pub fn new(custom: Vec<PaginationRule>) -> Result<Self> {
        let mut manager = Self::default();
        for rule in custom {
            manager.add_rule(rule)?;
        }
        Ok(manager)
    }

    /// Exactly `rules`, without the built-in set and without validation.
    pub fn from_rules(mut rules: Vec<PaginationRule>) -> Self {
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: PaginationRule) -> Result<()> {
        rule.validate()?;
        debug!("Adding pagination rule '{}' (priority {})", rule.name, rule.priority);
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(())
    }

    /// Removes every rule named `name`. Returns whether any was removed.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name != name);
        self.rules.len() != before
    }

    /// Rules in evaluation order: priority descending, ties in insertion order.
    pub fn all_rules(&self) -> &[PaginationRule] {
        &self.rules
    }

    pub fn find_rule(&self, name: &str) -> Option<&PaginationRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn find_applicable_rule(&self, slide_type: SlideType, items: &[ContentItem]) -> Option<&PaginationRule> {
        self.rules.iter().find(|rule| rule.applies_to(slide_type, items))
    }

    pub fn apply_rule<'a>(&self, items: &'a [ContentItem], rule: &PaginationRule) -> Vec<&'a [ContentItem]> {
        rule.strategy.split(items)
    }
}
