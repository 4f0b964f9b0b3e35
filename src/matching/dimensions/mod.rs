//! The built-in dimension evaluators.

pub mod capacity;
pub mod categorical;
pub mod structure;
pub mod text_amount;

pub use capacity::CapacityDimension;
pub use categorical::{ContentTypeDimension, LayoutTypeDimension};
pub use structure::{TextStructureDimension, TitleStructureDimension};
pub use text_amount::TextAmountDimension;
