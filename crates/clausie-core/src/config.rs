//! ClausIE Configuration Management
//!
//! Handles configuration from environment variables and TOML files with
//! defaults that reproduce the reference ClausIE behaviour.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::lexicon::Lexicon;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClausieConfig {
    /// Clause extraction behaviour
    pub extraction: ExtractionConfig,

    /// Proposition text rendering
    pub rendering: RenderConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ClausieConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    /// Overwrite every field whose environment variable is set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        // Extraction
        if let Some(value) = var("CLAUSIE_CONSERVATIVE") {
            self.extraction.conservative = parse_bool("CLAUSIE_CONSERVATIVE", &value)?;
        }
        if let Some(value) = var("CLAUSIE_FILTER_IGNORED_ADVERBS") {
            self.extraction.filter_ignored_adverbs =
                parse_bool("CLAUSIE_FILTER_IGNORED_ADVERBS", &value)?;
        }
        if let Some(value) = var("CLAUSIE_RESOLVE_RELATIVE_PRONOUNS") {
            self.extraction.resolve_relative_pronouns =
                parse_bool("CLAUSIE_RESOLVE_RELATIVE_PRONOUNS", &value)?;
        }
        if let Some(value) = var("CLAUSIE_COORDINATION") {
            self.extraction.coordination = value.parse()?;
        }
        if let Some(value) = var("CLAUSIE_EXISTENTIAL_FALLBACK") {
            self.extraction.existential_fallback =
                parse_bool("CLAUSIE_EXISTENTIAL_FALLBACK", &value)?;
        }
        if let Some(path) = var("CLAUSIE_LEXICON") {
            self.extraction.lexicon_path = Some(PathBuf::from(path));
        }

        // Rendering
        if let Some(form) = var("CLAUSIE_INFLECT_FORM") {
            let form = form.trim().to_string();
            self.rendering.inflect_form = (!form.is_empty()).then_some(form);
        }
        if let Some(value) = var("CLAUSIE_CAPITALIZE") {
            self.rendering.capitalize = parse_bool("CLAUSIE_CAPITALIZE", &value)?;
        }

        // Logging
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Resolve the configured lexicon, falling back to the built-in one
    pub fn load_lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.extraction.lexicon_path {
            Some(path) => Lexicon::from_file(path),
            None => Ok(Lexicon::default()),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Clause extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Prefer SVA/SVOA over SV/SVO for adverbial clauses of unknown verbs
    pub conservative: bool,

    /// Drop adverbials whose lemma is on the lexicon's ignore list
    pub filter_ignored_adverbs: bool,

    /// Replace a relative pronoun subject or "where" adverbial with the
    /// noun its relative clause modifies
    pub resolve_relative_pronouns: bool,

    /// How coordinated constituents are expanded into propositions
    pub coordination: CoordinationStyle,

    /// Re-parse "There is <text>" when the sentence root is not verbal
    pub existential_fallback: bool,

    /// Lexicon file (TOML); the built-in lexicon is used when absent
    pub lexicon_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            conservative: false,
            filter_ignored_adverbs: false,
            resolve_relative_pronouns: false,
            coordination: CoordinationStyle::FanOut,
            existential_fallback: true,
            lexicon_path: None,
        }
    }
}

/// Coordination expansion strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationStyle {
    /// One alternative per conjunct
    #[default]
    FanOut,
    /// A single span per constituent, conjuncts left out
    Collapsed,
}

impl std::str::FromStr for CoordinationStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "fan_out" | "fanout" => Ok(Self::FanOut),
            "collapsed" => Ok(Self::Collapsed),
            _ => Err(ConfigError::InvalidValue {
                key: "CLAUSIE_COORDINATION".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Proposition rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target grammatical form handed to the inflector (e.g. "VBD")
    pub inflect_form: Option<String>,

    /// Capitalize the first letter and end with a period
    pub capitalize: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Lexicon category is empty: {0}")]
    EmptyCategory(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
