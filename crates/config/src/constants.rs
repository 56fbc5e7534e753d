//! Centralized constants for the retrieval engine
//!
//! Single source of truth for tuned values used across the workspace.
//! The retrieval numbers here were calibrated against the production
//! knowledge base; change them together with the corpus, not in isolation.

/// Retrieval defaults
pub mod retrieval {
    /// Minimum cosine similarity for a chunk to qualify
    ///
    /// Deliberately low: bag-of-words vectors over a small vocabulary
    /// produce weak absolute similarities, and the topic rules do the
    /// heavy lifting on precision.
    pub const DEFAULT_MIN_SIMILARITY: f32 = 0.03;

    /// Default number of chunks to return
    pub const DEFAULT_TOP_K: usize = 3;

    /// Default character budget for assembled context
    pub const DEFAULT_CONTEXT_CHARS: usize = 1500;

    /// Weight given to terms the contact actually typed
    pub const ORIGINAL_TERM_WEIGHT: f32 = 10.0;

    /// Weight given to synonym-injected terms
    ///
    /// The 10:1 ratio against `ORIGINAL_TERM_WEIGHT` keeps the contact's
    /// own wording dominant; expansion only bridges vocabulary gaps.
    pub const SYNONYM_TERM_WEIGHT: f32 = 1.0;
}

/// Text normalization defaults
pub mod text {
    /// Tokens shorter than this are dropped during normalization
    pub const MIN_TOKEN_LEN: usize = 3;

    /// Words shorter than this bypass the plural stemmer
    pub const MIN_STEM_LEN: usize = 4;
}
