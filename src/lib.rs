pub mod config;
pub mod errors;
pub mod layout;
pub mod matching;
pub mod models;
pub mod pagination;
pub mod pairing;
pub mod planner;
pub mod text_fit;
pub mod wasm;

pub use config::EngineConfig;
pub use errors::{EngineError, Result};
pub use layout::{LayoutAnalysis, LayoutAnalyzer, LayoutKind};
pub use matching::{DimensionFactory, FallbackMatcher, TemplateMatchingService};
pub use models::{ContentItem, ContentSlide, SlideType, Template, TemplateElement};
pub use pagination::{validate_pagination, PaginationProcessor, RuleManager};
pub use pairing::{PairedElement, PairingEngine};
pub use planner::{SlidePlan, SlidePlanner};
