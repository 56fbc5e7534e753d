//! Main settings module

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::retrieval;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode, relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode, all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Retrieval tuning
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Knowledge base locations
    #[serde(default)]
    pub knowledge: KnowledgeSettings,
}

/// Retrieval tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Number of chunks returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a chunk to qualify
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Character budget for assembled context
    #[serde(default = "default_context_chars")]
    pub max_context_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            max_context_chars: default_context_chars(),
        }
    }
}

/// Where to find knowledge base files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KnowledgeSettings {
    /// Directory scanned for corpus files (YAML/JSON)
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Synonym map file; the builtin map is used when absent
    #[serde(default)]
    pub synonyms_file: Option<PathBuf>,
}

fn default_top_k() -> usize {
    retrieval::DEFAULT_TOP_K
}

fn default_min_similarity() -> f32 {
    retrieval::DEFAULT_MIN_SIMILARITY
}

fn default_context_chars() -> usize {
    retrieval::DEFAULT_CONTEXT_CHARS
}

impl Settings {
    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.top_k".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.retrieval.min_similarity) {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.min_similarity".to_string(),
                message: "must be within [0.0, 1.0]".to_string(),
            });
        }
        if self.retrieval.max_context_chars < 100 {
            return Err(ConfigError::InvalidValue {
                field: "retrieval.max_context_chars".to_string(),
                message: "must be at least 100".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings with the standard precedence:
/// 1. SMARTZAP__* environment variables
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("SMARTZAP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
