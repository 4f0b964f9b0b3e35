use thiserror::Error;

/// Represents errors that can occur while configuring or driving the template engine.
///
/// Most of the matching pipeline never surfaces these: dimension failures degrade to an
/// unavailable score and scoring failures degrade to the fallback matcher. They reach the
/// caller only at configuration, rule-authoring and JSON boundaries.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error occurred while deserializing templates, content slides or configuration.
    #[error("Failed to deserialize JSON input: {0}")]
    JsonDeserialization(#[from] serde_json::Error),

    /// An I/O error occurred, usually while reading a configuration or template file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided to an engine function.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The engine configuration is inconsistent (e.g. dimension weights do not sum to 1.0).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A pagination rule cannot be applied safely.
    #[error("Invalid pagination rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    /// A single dimension evaluator could not produce a score.
    #[error("Dimension '{dimension}' failed: {reason}")]
    DimensionFailure { dimension: String, reason: String },

    /// The weighted total for a template was NaN or infinite.
    #[error("Template '{template_id}' produced a non-finite score")]
    NonFiniteScore { template_id: String },

    /// No template of the requested slide category was supplied.
    #[error("No templates available for slide type: {0}")]
    EmptyTemplatePool(String),
}

/// A type alias for `Result<T, EngineError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
