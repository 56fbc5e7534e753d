//! Core traits for the retrieval engine
//!
//! Both seams exist so the agent layer can swap implementations and tests
//! can use mocks:
//! - `Retriever`: knowledge base lookup (chunks or assembled context)
//! - `PreferenceSink`: fire-and-forget per-contact preference writes

mod preferences;
mod retriever;

pub use preferences::{NoopPreferenceSink, PreferenceSink};
pub use retriever::{RankedChunk, RetrieveOptions, Retriever};
