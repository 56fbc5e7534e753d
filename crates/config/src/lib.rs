//! Configuration management for the SmartZap retrieval engine
//!
//! Supports loading configuration from:
//! - YAML/JSON files (knowledge base, synonym map)
//! - YAML settings files plus SMARTZAP__* environment variables
//!
//! Domain data (corpus documents, synonym topics) is deliberately separate
//! from tuning settings: the former is hand-authored content, the latter is
//! deploy-time knobs.

pub mod constants;
pub mod knowledge;
pub mod settings;
pub mod synonyms;

pub use knowledge::{KnowledgeFile, KnowledgeLoader};
pub use settings::{
    load_settings, KnowledgeSettings, RetrievalSettings, RuntimeEnvironment, Settings,
};
pub use synonyms::SynonymsConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Empty configuration: {0}")]
    Empty(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for smartzap_core::Error {
    fn from(err: ConfigError) -> Self {
        smartzap_core::Error::Config(err.to_string())
    }
}
