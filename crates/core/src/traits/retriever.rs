//! Retriever trait for knowledge base lookup

use async_trait::async_trait;

use crate::conversation::Turn;
use crate::error::Result;
use crate::knowledge::KnowledgeDocument;
use crate::stage::FunnelStage;

/// A knowledge document paired with its query similarity
#[derive(Debug, Clone)]
pub struct RankedChunk {
    /// The matched document
    pub document: KnowledgeDocument,
    /// Cosine similarity against the query vector, in [0, 1]
    pub similarity: f32,
}

impl RankedChunk {
    pub fn new(document: KnowledgeDocument, similarity: f32) -> Self {
        Self {
            document,
            similarity,
        }
    }
}

/// Options for a retrieval call
///
/// Everything here is optional; the engine falls back to its configured
/// defaults. History and chat id only matter to the stateful social-proof
/// handling and can be left empty otherwise.
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    /// Current funnel stage, `None` when the conversation is stage-less
    pub stage: Option<FunnelStage>,
    /// Maximum number of chunks to return
    pub top_k: Option<usize>,
    /// Minimum similarity for a chunk to qualify
    pub min_similarity: Option<f32>,
    /// Character budget for assembled context
    pub max_context_chars: Option<usize>,
    /// Prior conversation turns, oldest first
    pub history: Vec<Turn>,
    /// Contact identifier, used for preference writes
    pub chat_id: Option<String>,
}

impl RetrieveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: FunnelStage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = Some(min_similarity);
        self
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = Some(max_context_chars);
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }
}

/// Knowledge retrieval seam consumed by the agent layer
///
/// Implementations must treat absence of matches as a normal outcome (empty
/// result, never an error).
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Ranked chunks for a query
    async fn relevant_chunks(
        &self,
        query: &str,
        opts: &RetrieveOptions,
    ) -> Result<Vec<RankedChunk>>;

    /// Ranked chunks assembled into a prompt-ready context block
    async fn relevant_context(&self, query: &str, opts: &RetrieveOptions) -> Result<String>;

    /// Implementation name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let opts = RetrieveOptions::new()
            .with_stage(FunnelStage::PlanOffer)
            .with_top_k(5)
            .with_min_similarity(0.1)
            .with_chat_id("5511999990000");

        assert_eq!(opts.stage, Some(FunnelStage::PlanOffer));
        assert_eq!(opts.top_k, Some(5));
        assert_eq!(opts.min_similarity, Some(0.1));
        assert_eq!(opts.chat_id.as_deref(), Some("5511999990000"));
        assert!(opts.history.is_empty());
    }

    #[test]
    fn test_options_default_is_empty() {
        let opts = RetrieveOptions::default();
        assert!(opts.stage.is_none());
        assert!(opts.top_k.is_none());
        assert!(opts.max_context_chars.is_none());
    }
}
