//! Multi-dimensional template scoring and selection.

pub mod dimension;
pub mod dimensions;
pub mod engine;
pub mod fallback;
pub mod registry;
pub mod service;

pub use dimension::{DimensionEvaluator, DimensionOutcome, DimensionScore};
pub use engine::{PolynomialEngine, TemplateMatchResult};
pub use fallback::{FallbackMatcher, Picker, RandomPicker};
pub use registry::{DimensionFactory, DimensionId, DimensionRegistry};
pub use service::TemplateMatchingService;
