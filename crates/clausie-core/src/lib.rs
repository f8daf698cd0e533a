//! ClausIE Core - Domain models and shared types
//!
//! This crate defines the core abstractions used by the clause extractor:
//! - Annotated token graph produced by a dependency parser
//! - Spans into that graph
//! - Verb lexicon (copular / complex-transitive categories)
//! - Common error types
//! - Configuration management and logging setup

pub mod config;
pub mod graph;
pub mod lexicon;
pub mod span;
pub mod telemetry;

pub use config::{
    ClausieConfig, ConfigError, CoordinationStyle, ExtractionConfig, LoggingConfig,
    RenderConfig,
};
pub use graph::{Dep, Pos, RawToken, Token, TokenGraph};
pub use lexicon::{Lexicon, VerbCategory};
pub use span::Span;
pub use telemetry::init_tracing;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for clause extraction
#[derive(Error, Debug)]
pub enum ClausieError {
    /// The token graph handed over by the parser is malformed
    #[error("Structural inconsistency: {0}")]
    StructuralInconsistency(String),

    /// The parser collaborator failed to produce a graph
    #[error("Parser error: {0}")]
    Parser(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClausieError {
    /// Shorthand for a structural inconsistency
    pub fn structural(message: impl Into<String>) -> Self {
        Self::StructuralInconsistency(message.into())
    }

    /// True if the error points at a malformed input graph
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralInconsistency(_))
    }
}

impl From<serde_json::Error> for ClausieError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClausieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClausieError::structural("head 9 out of range");
        assert_eq!(
            err.to_string(),
            "Structural inconsistency: head 9 out of range"
        );
        assert!(err.is_structural());
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ClausieError = ConfigError::EmptyCategory("ext_copular".to_string()).into();
        assert!(!err.is_structural());
        assert!(err.to_string().contains("ext_copular"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClausieError = json_err.into();
        assert!(matches!(err, ClausieError::Serialization(_)));
    }
}
