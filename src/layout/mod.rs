//! Geometric layout detection for template placeholders.

pub mod analysis;

pub use analysis::{LayoutAnalysis, LayoutAnalyzer, LayoutKind};
