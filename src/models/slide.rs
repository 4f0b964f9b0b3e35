use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::element::{TemplateElement, TextRole};
use crate::models::semantic::{SemanticFeatures, TemplateAnnotation};

/// Category of a slide in a generated deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideType {
    /// Title page.
    Cover,
    /// Table of contents.
    Contents,
    /// Section divider.
    Transition,
    /// Body slide with a list of items.
    Content,
    /// Closing page.
    End,
}

impl SlideType {
    /// All categories in deck order.
    pub const ALL: [SlideType; 5] = [
        SlideType::Cover,
        SlideType::Contents,
        SlideType::Transition,
        SlideType::Content,
        SlideType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Contents => "contents",
            Self::Transition => "transition",
            Self::Content => "content",
            Self::End => "end",
        }
    }

    /// Returns true for categories whose items may be split across pages.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Content | Self::Contents)
    }
}

/// A prebuilt slide skeleton made of placeholder elements.
///
/// Templates are read-only inputs: the engine selects among them and reorganizes
/// references to their elements, but never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// The template id.
    pub id: String,

    /// The slide category this template was designed for.
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_type: Option<SlideType>,

    /// Placeholder elements in z-order.
    #[serde(default)]
    pub elements: Vec<TemplateElement>,

    /// Optional author annotation used by categorical dimensions.
    #[serde(rename = "slideAnnotation")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TemplateAnnotation>,
}

impl Template {
    /// Creates an unannotated template.
    pub fn new(id: impl Into<String>, slide_type: SlideType, elements: Vec<TemplateElement>) -> Self {
        Self {
            id: id.into(),
            slide_type: Some(slide_type),
            elements,
            annotation: None,
        }
    }

    /// Attaches an annotation.
    pub fn with_annotation(mut self, annotation: TemplateAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Elements tagged with `role`, in template order.
    pub fn elements_with_role(&self, role: TextRole) -> Vec<&TemplateElement> {
        self.elements.iter().filter(|el| el.has_role(role)).collect()
    }

    /// Number of elements tagged with `role`.
    pub fn count_role(&self, role: TextRole) -> usize {
        self.elements.iter().filter(|el| el.has_role(role)).count()
    }

    /// Number of item-bearing placeholders (`item` or `itemTitle`), floored at one.
    ///
    /// The floor means a template without any item placeholder can still host a
    /// single item through its body placeholder.
    pub fn item_capacity(&self) -> usize {
        let count = self
            .elements
            .iter()
            .filter(|el| el.has_role(TextRole::Item) || el.has_role(TextRole::ItemTitle))
            .count();
        count.max(1)
    }
}

/// One title/text pair produced by the content generator.
///
/// Contents slides may list bare strings; those deserialize as titles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ContentItemRepr")]
pub struct ContentItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, JsonValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentItemRepr {
    Entry(String),
    Item {
        #[serde(default)]
        title: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        metadata: IndexMap<String, JsonValue>,
    },
}

impl From<ContentItemRepr> for ContentItem {
    fn from(repr: ContentItemRepr) -> Self {
        match repr {
            ContentItemRepr::Entry(title) => Self::new(title, ""),
            ContentItemRepr::Item { title, text, metadata } => Self { title, text, metadata },
        }
    }
}

impl ContentItem {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            metadata: IndexMap::new(),
        }
    }

    /// Returns true if the item has a non-blank title.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Returns true if the item has non-blank body text.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Character count of title and text together.
    pub fn char_count(&self) -> usize {
        self.title.chars().count() + self.text.chars().count()
    }
}

/// A slide descriptor produced by the content generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSlide {
    /// The slide category.
    #[serde(rename = "type")]
    pub slide_type: SlideType,

    /// Slide title.
    #[serde(default)]
    pub title: String,

    /// Free text for cover and transition slides.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Semantic signals. Absent means scoring has nothing to work with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_features: Option<SemanticFeatures>,

    /// Items to place onto the template. Order is preserved by every operation.
    #[serde(default)]
    pub items: Vec<ContentItem>,

    /// Number of items that preceded this slide before pagination split it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl ContentSlide {
    pub fn new(slide_type: SlideType, title: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            slide_type,
            title: title.into(),
            text: String::new(),
            semantic_features: None,
            items,
            offset: None,
        }
    }

    /// Attaches semantic features.
    pub fn with_features(mut self, features: SemanticFeatures) -> Self {
        self.semantic_features = Some(features);
        self
    }

    /// Number of items with a non-blank title.
    pub fn titled_item_count(&self) -> usize {
        self.items.iter().filter(|item| item.has_title()).count()
    }

    /// Number of items with non-blank body text.
    pub fn text_item_count(&self) -> usize {
        self.items.iter().filter(|item| item.has_text()).count()
    }
}
