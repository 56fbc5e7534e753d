//! Lexical retrieval engine for the SmartZap sales agent
//!
//! Keyword bag-of-words retrieval tuned for short Brazilian Portuguese
//! WhatsApp messages:
//! - Diacritic-insensitive normalization with Portuguese plural stemming
//! - Synonym expansion with heavy original-term weighting
//! - Cosine ranking over an immutable vocabulary index
//! - Funnel-stage gating of price documents before ranking
//! - Topic boost cascade encoding the sales playbook
//! - Stateful social-proof handling backed by conversation history
//! - Prompt-ready context assembly under a byte budget
//!
//! The index is rebuilt as a whole and swapped atomically; a running query
//! always sees one consistent vocabulary and document-vector set.

pub mod assembler;
pub mod normalizer;
pub mod retriever;
pub mod stage_gate;
pub mod synonyms;
pub mod topics;
pub mod vectorizer;

pub use assembler::{assemble, effective_budget, CONTEXT_DIVIDER};
pub use normalizer::{stem, strip_diacritics, TextNormalizer};
pub use retriever::{LexicalRetriever, RetrieverConfig, RetrieverStats};
pub use stage_gate::{is_strict_price_source, stage_allows, STRICT_PRICE_SOURCES};
pub use synonyms::{ExpandedQuery, SynonymMap};
pub use topics::{
    apply_rules, is_proof_request, BoostMode, CascadeContext, CascadeOutcome, TopicRule, RULES,
};
pub use vectorizer::{cosine_similarity, Vocabulary};

use thiserror::Error;

/// Retrieval engine errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Knowledge corpus is empty")]
    EmptyCorpus,

    #[error("Invalid knowledge document: {0}")]
    InvalidDocument(String),
}

impl From<RagError> for smartzap_core::Error {
    fn from(err: RagError) -> Self {
        smartzap_core::Error::Retrieval(err.to_string())
    }
}
