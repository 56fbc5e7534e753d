//! Synonym expansion for queries
//!
//! Bridges vocabulary gaps between how contacts type and how the knowledge
//! base is written: any query stem found in a topic entry pulls the whole
//! entry into the expanded term set. Expansion terms are weighted far below
//! the contact's own words so they break ties instead of driving them.

use smartzap_config::constants::retrieval;
use smartzap_config::SynonymsConfig;

use crate::normalizer::{stem, strip_diacritics, TextNormalizer};

/// Stemmed synonym topics, ordered by topic key for deterministic iteration
#[derive(Debug, Clone)]
pub struct SynonymMap {
    entries: Vec<(String, Vec<String>)>,
}

/// A query split into its own stems and the synonym-injected ones
#[derive(Debug, Clone)]
pub struct ExpandedQuery {
    /// The query's own stems, deduplicated, order kept
    pub original: Vec<String>,
    /// Synonym-injected stems not already present in `original`
    pub expanded: Vec<String>,
}

impl ExpandedQuery {
    /// Whether expansion added anything
    pub fn was_expanded(&self) -> bool {
        !self.expanded.is_empty()
    }
}

impl SynonymMap {
    /// Build from config, stemming every surface form
    ///
    /// Surface forms are stored in natural spelling in the config; here each
    /// one goes through the same lowering/diacritic/stem path as query and
    /// document tokens, so membership tests compare stem to stem.
    pub fn from_config(config: &SynonymsConfig) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = config
            .topics
            .iter()
            .map(|(topic, terms)| {
                let mut stemmed: Vec<String> = Vec::with_capacity(terms.len());
                for term in terms {
                    let normalized = stem(&strip_diacritics(&term.to_lowercase()));
                    if !normalized.is_empty() && !stemmed.contains(&normalized) {
                        stemmed.push(normalized);
                    }
                }
                (topic.clone(), stemmed)
            })
            .filter(|(_, terms)| !terms.is_empty())
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// The product's builtin map
    pub fn builtin() -> Self {
        Self::from_config(&SynonymsConfig::builtin())
    }

    /// Map with no topics; expansion becomes a no-op
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of topics
    pub fn topic_count(&self) -> usize {
        self.entries.len()
    }

    /// All stemmed surface forms, in deterministic order
    ///
    /// Vocabulary building seeds these so expansion terms always have an
    /// index to land on, even when no document mentions them.
    pub fn all_terms(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().flat_map(|(_, terms)| terms.iter())
    }

    /// Expand query stems
    ///
    /// For each stem, every topic entry listing it contributes its whole
    /// term list. Symmetric by construction: "tubarao" pulls in "preco"
    /// exactly as "preco" pulls in "tubarao".
    pub fn expand(&self, stems: &[String]) -> ExpandedQuery {
        let mut original: Vec<String> = Vec::with_capacity(stems.len());
        for s in stems {
            if !original.contains(s) {
                original.push(s.clone());
            }
        }

        let mut expanded: Vec<String> = Vec::new();
        for query_stem in &original {
            for (_, terms) in &self.entries {
                if terms.iter().any(|t| t == query_stem) {
                    for term in terms {
                        if !original.contains(term) && !expanded.contains(term) {
                            expanded.push(term.clone());
                        }
                    }
                }
            }
        }

        ExpandedQuery { original, expanded }
    }

    /// Weighted term list for vectorization
    ///
    /// Originals carry `ORIGINAL_TERM_WEIGHT`, expansion-only terms
    /// `SYNONYM_TERM_WEIGHT`. The asymmetry keeps raw user wording dominant.
    pub fn weighted_terms(&self, query: &ExpandedQuery) -> Vec<(String, f32)> {
        let mut terms =
            Vec::with_capacity(query.original.len() + query.expanded.len());
        for term in &query.original {
            terms.push((term.clone(), retrieval::ORIGINAL_TERM_WEIGHT));
        }
        for term in &query.expanded {
            terms.push((term.clone(), retrieval::SYNONYM_TERM_WEIGHT));
        }
        terms
    }
}

impl Default for SynonymMap {
    fn default() -> Self {
        Self::builtin()
    }
}
