//! Bag-of-words vocabulary and vector math
//!
//! The vocabulary fixes one dimension per distinct stem; every document and
//! query vector built against it has exactly `len()` entries. Rebuilding the
//! corpus produces a fresh vocabulary, never a mutated one.

use std::collections::HashMap;

/// Term-to-dimension mapping, fixed for the lifetime of an index
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from document stems plus synonym surface forms
    ///
    /// First-seen order, deduplicated. Synonym terms are seeded even when no
    /// document mentions them so expansion always has a dimension to land on.
    pub fn build<'a>(
        document_stems: &'a [Vec<String>],
        synonym_terms: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let mut terms: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for term in document_stems
            .iter()
            .flatten()
            .chain(synonym_terms)
        {
            if !index.contains_key(term) {
                index.insert(term.clone(), terms.len());
                terms.push(term.clone());
            }
        }

        Self { terms, index }
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dimension of a term, if known
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Dense vector from weighted terms; unknown terms are skipped silently
    pub fn vectorize_weighted(&self, terms: &[(String, f32)]) -> Vec<f32> {
        let mut vector = vec![0.0; self.terms.len()];
        for (term, weight) in terms {
            if let Some(i) = self.index_of(term) {
                vector[i] += weight;
            }
        }
        vector
    }

    /// Dense vector counting occurrences, weight 1 each (document side)
    pub fn vectorize_counts(&self, stems: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0; self.terms.len()];
        for term in stems {
            if let Some(i) = self.index_of(term) {
                vector[i] += 1.0;
            }
        }
        vector
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 on dimension mismatch or zero magnitude; callers log the
/// mismatch case, it indicates a stale vector surviving a rebuild.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn test_vocabulary() -> Vocabulary {
        let docs = vec![owned(&["curso", "online", "preco"]), owned(&["curso", "bonus"])];
        let synonyms = owned(&["pix", "preco"]);
        Vocabulary::build(&docs, synonyms.iter())
    }

    #[test]
    fn test_build_dedups_in_first_seen_order() {
        let vocab = test_vocabulary();
        assert_eq!(vocab.len(), 5);
        assert_eq!(vocab.index_of("curso"), Some(0));
        assert_eq!(vocab.index_of("online"), Some(1));
        assert_eq!(vocab.index_of("preco"), Some(2));
        assert_eq!(vocab.index_of("bonus"), Some(3));
        // Synonym-only term seeded after documents
        assert_eq!(vocab.index_of("pix"), Some(4));
    }

    #[test]
    fn test_vectorize_counts_occurrences() {
        let vocab = test_vocabulary();
        let vector = vocab.vectorize_counts(&owned(&["curso", "curso", "bonus"]));
        assert_eq!(vector.len(), vocab.len());
        assert_eq!(vector[0], 2.0);
        assert_eq!(vector[3], 1.0);
        assert_eq!(vector[1], 0.0);
    }

    #[test]
    fn test_vectorize_skips_unknown_terms() {
        let vocab = test_vocabulary();
        let vector =
            vocab.vectorize_weighted(&[("desconhecido".to_string(), 10.0), ("pix".to_string(), 1.0)]);
        assert_eq!(vector.iter().filter(|v| **v != 0.0).count(), 1);
        assert_eq!(vector[4], 1.0);
    }

    #[test]
    fn test_weights_accumulate() {
        let vocab = test_vocabulary();
        let vector = vocab.vectorize_weighted(&[
            ("preco".to_string(), 10.0),
            ("preco".to_string(), 1.0),
        ]);
        assert_eq!(vector[2], 11.0);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = vec![1.0, 2.0, 0.0];
        let b = vec![1.0, 2.0, 0.0];
        let c = vec![0.0, 0.0, 5.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&a, &c), 0.0);
    }

    #[test]
    fn test_cosine_guards() {
        // Dimension mismatch
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        // Zero magnitude
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_scale_invariant() {
        let a = vec![1.0, 3.0, 0.5];
        let b: Vec<f32> = a.iter().map(|v| v * 7.0).collect();
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }
}
