//! Plain data consumed and produced by the engine.
//!
//! Everything here is `serde`-friendly so templates and generated content can be
//! loaded straight from the JSON the editor and the content generator exchange.

pub mod element;
pub mod semantic;
pub mod slide;

pub use element::{ElementKind, ImageRole, ShapeText, TemplateElement, TextRole};
pub use semantic::{ContentType, LayoutType, SemanticFeatures, SemanticTag, TemplateAnnotation};
pub use slide::{ContentItem, ContentSlide, SlideType, Template};
