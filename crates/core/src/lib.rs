//! Core types and traits for the SmartZap retrieval engine
//!
//! This crate carries the shared model: knowledge documents, funnel stages,
//! conversation turns, the retrieval/preference trait seams, and the
//! workspace error type. It has no retrieval logic of its own.

pub mod conversation;
pub mod error;
pub mod knowledge;
pub mod stage;
pub mod traits;

pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
pub use knowledge::KnowledgeDocument;
pub use stage::FunnelStage;
pub use traits::{NoopPreferenceSink, PreferenceSink, RankedChunk, RetrieveOptions, Retriever};
