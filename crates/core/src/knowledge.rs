//! Knowledge base document model

use serde::{Deserialize, Serialize};

/// A single knowledge base entry
///
/// The corpus is a flat list of these. `source` is a stable snake_case
/// identifier (e.g. `precos_planos`, `professor_credenciais`) that topic
/// rules and the stage gate refer to; `content` is the raw text shown to
/// the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    /// Stable identifier of the source section
    pub source: String,
    /// Raw text content of the entry
    pub content: String,
}

impl KnowledgeDocument {
    /// Create a new document
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// True when source or content is blank after trimming
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty() || self.content.trim().is_empty()
    }
}
