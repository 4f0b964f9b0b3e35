//! Rule-driven splitting of oversized slides.

pub mod processor;
pub mod rules;

pub use processor::{conservation_report, pagination_stats, validate_pagination, PaginationProcessor, PaginationStats};
pub use rules::{
    default_rules, BalanceStrategy, ItemValidator, PaginationCondition, PaginationRule, PaginationStrategy, RuleManager,
};
