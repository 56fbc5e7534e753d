//! Lexical retriever
//!
//! Bag-of-words cosine ranking over the knowledge corpus, with funnel-stage
//! gating before ranking and the topic boost cascade after it. The index is
//! immutable once built; `reinitialize` builds a fresh one off to the side
//! and swaps it in atomically, so readers never observe a half-built state.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use smartzap_config::constants::retrieval;
use smartzap_config::{RetrievalSettings, SynonymsConfig};
use smartzap_core::{
    KnowledgeDocument, NoopPreferenceSink, PreferenceSink, RankedChunk, Result, RetrieveOptions,
    Retriever, TurnRole,
};

use crate::assembler;
use crate::normalizer::TextNormalizer;
use crate::stage_gate::stage_allows;
use crate::synonyms::SynonymMap;
use crate::topics::{self, CascadeContext, CascadeOutcome};
use crate::vectorizer::{cosine_similarity, Vocabulary};
use crate::RagError;

/// Engine defaults, overridable per call through `RetrieveOptions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Maximum chunks returned
    pub top_k: usize,
    /// Minimum cosine similarity for a chunk to qualify
    pub min_similarity: f32,
    /// Byte budget for assembled context
    pub max_context_chars: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: retrieval::DEFAULT_TOP_K,
            min_similarity: retrieval::DEFAULT_MIN_SIMILARITY,
            max_context_chars: retrieval::DEFAULT_CONTEXT_CHARS,
        }
    }
}

impl RetrieverConfig {
    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self {
            top_k: settings.top_k,
            min_similarity: settings.min_similarity,
            max_context_chars: settings.max_context_chars,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }
}

/// A corpus document with its count vector over the index vocabulary
#[derive(Debug, Clone)]
struct VectorizedDocument {
    document: KnowledgeDocument,
    vector: Vec<f32>,
}

/// One immutable build of the index
///
/// Vocabulary and document vectors always belong to the same build; they are
/// only ever replaced together.
struct IndexState {
    vocabulary: Vocabulary,
    documents: Vec<VectorizedDocument>,
}

/// Index size counters for logging and health endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetrieverStats {
    pub document_count: usize,
    pub vocabulary_size: usize,
}

/// The retrieval engine
pub struct LexicalRetriever {
    config: RetrieverConfig,
    normalizer: TextNormalizer,
    synonyms: SynonymMap,
    state: RwLock<Arc<IndexState>>,
    preferences: Arc<dyn PreferenceSink>,
}

impl std::fmt::Debug for LexicalRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalRetriever")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LexicalRetriever {
    /// Build the engine over `corpus` with the built-in synonym map
    pub fn new(
        corpus: Vec<KnowledgeDocument>,
        config: RetrieverConfig,
    ) -> std::result::Result<Self, RagError> {
        Self::with_synonyms(corpus, config, &SynonymsConfig::builtin())
    }

    /// Build the engine with a caller-provided synonym configuration
    pub fn with_synonyms(
        corpus: Vec<KnowledgeDocument>,
        config: RetrieverConfig,
        synonyms: &SynonymsConfig,
    ) -> std::result::Result<Self, RagError> {
        let normalizer = TextNormalizer::new();
        let synonyms = SynonymMap::from_config(synonyms);
        let state = build_index(&corpus, &normalizer, &synonyms)?;

        info!(
            documents = state.documents.len(),
            vocabulary = state.vocabulary.len(),
            synonym_topics = synonyms.topic_count(),
            "Lexical retriever initialized"
        );

        Ok(Self {
            config,
            normalizer,
            synonyms,
            state: RwLock::new(Arc::new(state)),
            preferences: Arc::new(NoopPreferenceSink),
        })
    }

    /// Attach the sink that records contact preferences
    pub fn with_preference_sink(mut self, sink: Arc<dyn PreferenceSink>) -> Self {
        self.preferences = sink;
        self
    }

    /// Rebuild the index over a new corpus and swap it in
    ///
    /// On error the previous index stays active untouched.
    pub fn reinitialize(
        &self,
        corpus: Vec<KnowledgeDocument>,
    ) -> std::result::Result<(), RagError> {
        let state = build_index(&corpus, &self.normalizer, &self.synonyms)?;
        info!(
            documents = state.documents.len(),
            vocabulary = state.vocabulary.len(),
            "Knowledge index rebuilt"
        );
        *self.state.write() = Arc::new(state);
        Ok(())
    }

    pub fn stats(&self) -> RetrieverStats {
        let state = self.snapshot();
        RetrieverStats {
            document_count: state.documents.len(),
            vocabulary_size: state.vocabulary.len(),
        }
    }

    fn snapshot(&self) -> Arc<IndexState> {
        Arc::clone(&self.state.read())
    }

    /// Gate, rank, and run the topic cascade for one query
    fn search(&self, query: &str, opts: &RetrieveOptions) -> CascadeOutcome {
        let state = self.snapshot();
        let top_k = opts.top_k.unwrap_or(self.config.top_k);
        let min_similarity = opts.min_similarity.unwrap_or(self.config.min_similarity);

        let stems = self.normalizer.normalize(query);
        let loose_query = self.normalizer.normalize_loose(query);

        let expanded = self.synonyms.expand(&stems);
        let weighted = self.synonyms.weighted_terms(&expanded);
        let query_vector = state.vocabulary.vectorize_weighted(&weighted);

        let mut ranked: Vec<RankedChunk> = Vec::with_capacity(state.documents.len());
        for doc in &state.documents {
            if !stage_allows(&doc.document.source, opts.stage) {
                continue;
            }
            if doc.vector.len() != query_vector.len() {
                error!(
                    source = %doc.document.source,
                    "Document vector does not match vocabulary size; skipping"
                );
                continue;
            }
            let similarity = cosine_similarity(&query_vector, &doc.vector);
            ranked.push(RankedChunk::new(doc.document.clone(), similarity));
        }
        // Stable sort: ties keep corpus order
        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });

        let prior_proof_request = opts
            .history
            .iter()
            .filter(|t| t.role == TurnRole::User)
            .any(|t| topics::is_proof_request(&self.normalizer.normalize_loose(&t.content)));

        let ctx = CascadeContext {
            loose_query: &loose_query,
            stage: opts.stage,
            prior_proof_request,
            min_similarity,
            top_k,
        };
        let outcome = topics::apply_rules(ranked, &ctx);

        debug!(
            query_stems = stems.len(),
            expanded_terms = expanded.expanded.len(),
            returned = outcome.chunks.len(),
            short_circuit = ?outcome.short_circuited,
            stage = ?opts.stage,
            "Retrieval ranked"
        );
        outcome
    }

    /// Record the proof-channel preference without blocking the reply
    ///
    /// Best effort: failures are logged and never surface to the caller.
    fn fire_preference_write(&self, chat_id: Option<&str>) {
        let Some(chat_id) = chat_id else {
            debug!("Proof channel preference detected without a chat id; skipping write");
            return;
        };
        let sink = Arc::clone(&self.preferences);
        let chat_id = chat_id.to_string();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = sink.set_prefer_proof_channels(&chat_id, true).await {
                        warn!(chat_id = %chat_id, error = %e, "Failed to record proof channel preference");
                    }
                });
            }
            Err(_) => {
                warn!(chat_id = %chat_id, "No async runtime to record proof channel preference");
            }
        }
    }

    fn resolve(&self, query: &str, opts: &RetrieveOptions) -> CascadeOutcome {
        let outcome = self.search(query, opts);
        if outcome.prefer_proof_channels {
            self.fire_preference_write(opts.chat_id.as_deref());
        }
        outcome
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    async fn relevant_chunks(
        &self,
        query: &str,
        opts: &RetrieveOptions,
    ) -> Result<Vec<RankedChunk>> {
        Ok(self.resolve(query, opts).chunks)
    }

    async fn relevant_context(&self, query: &str, opts: &RetrieveOptions) -> Result<String> {
        let outcome = self.resolve(query, opts);
        let requested = opts
            .max_context_chars
            .unwrap_or(self.config.max_context_chars);
        let budget = assembler::effective_budget(requested, &outcome.matched);
        Ok(assembler::assemble(&outcome.chunks, budget))
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

/// Normalize the corpus, freeze the vocabulary, vectorize every document
fn build_index(
    corpus: &[KnowledgeDocument],
    normalizer: &TextNormalizer,
    synonyms: &SynonymMap,
) -> std::result::Result<IndexState, RagError> {
    if corpus.is_empty() {
        return Err(RagError::EmptyCorpus);
    }

    let mut document_stems = Vec::with_capacity(corpus.len());
    for doc in corpus {
        if doc.is_blank() {
            return Err(RagError::InvalidDocument(format!(
                "document '{}' has no content",
                doc.source
            )));
        }
        document_stems.push(normalizer.normalize(&doc.content));
    }

    let vocabulary = Vocabulary::build(&document_stems, synonyms.all_terms());
    let documents = corpus
        .iter()
        .zip(document_stems.iter())
        .map(|(doc, stems)| VectorizedDocument {
            document: doc.clone(),
            vector: vocabulary.vectorize_counts(stems),
        })
        .collect();

    Ok(IndexState {
        vocabulary,
        documents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartzap_core::FunnelStage;

    fn corpus() -> Vec<KnowledgeDocument> {
        vec![
            KnowledgeDocument::new(
                "precos_planos",
                "O investimento no curso é de R$ 1.997 à vista ou em 12x de R$ 197 \
                 no cartão. Valor promocional de lançamento.",
            ),
            KnowledgeDocument::new(
                "formas_pagamento",
                "Aceitamos pagamento via pix, boleto e cartão de crédito em até 12 parcelas.",
            ),
            KnowledgeDocument::new(
                "professor_credenciais",
                "O professor Rafael é advogado com 15 anos de experiência e mestre \
                 em direito digital.",
            ),
            KnowledgeDocument::new(
                "objecoes_comuns",
                "Quando o aluno acha caro, mostre o retorno do investimento e as \
                 condições de parcelamento.",
            ),
            KnowledgeDocument::new(
                "como_funciona",
                "O curso funciona com aulas gravadas, mentorias ao vivo e suporte \
                 direto com o professor.",
            ),
        ]
    }

    fn engine() -> LexicalRetriever {
        LexicalRetriever::new(corpus(), RetrieverConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let err = LexicalRetriever::new(Vec::new(), RetrieverConfig::default()).unwrap_err();
        assert!(matches!(err, RagError::EmptyCorpus));
    }

    #[test]
    fn test_blank_document_is_rejected() {
        let corpus = vec![KnowledgeDocument::new("vazio", "   ")];
        let err = LexicalRetriever::new(corpus, RetrieverConfig::default()).unwrap_err();
        assert!(matches!(err, RagError::InvalidDocument(_)));
    }

    #[test]
    fn test_stats_reflect_corpus() {
        let stats = engine().stats();
        assert_eq!(stats.document_count, 5);
        assert!(stats.vocabulary_size > 0);
    }

    #[tokio::test]
    async fn test_price_query_ranks_price_document_first() {
        let chunks = engine()
            .relevant_chunks("quanto custa o curso?", &RetrieveOptions::new())
            .await
            .unwrap();

        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].document.source, "precos_planos");
        assert!(chunks[0].similarity > 0.0);
    }

    #[tokio::test]
    async fn test_stage_gate_hides_price_documents() {
        let opts = RetrieveOptions::new().with_stage(FunnelStage::NameCaptureValidation);
        let chunks = engine()
            .relevant_chunks("quanto custa o curso?", &opts)
            .await
            .unwrap();

        assert!(chunks
            .iter()
            .all(|c| !crate::stage_gate::is_strict_price_source(&c.document.source)));
    }

    #[tokio::test]
    async fn test_offer_stage_allows_price_documents() {
        let opts = RetrieveOptions::new().with_stage(FunnelStage::PlanOffer);
        let chunks = engine()
            .relevant_chunks("quanto custa o curso?", &opts)
            .await
            .unwrap();

        assert_eq!(chunks[0].document.source, "precos_planos");
    }

    #[tokio::test]
    async fn test_slang_reaches_price_document_through_synonyms() {
        // "tubarão" never appears in any document; only the synonym map
        // connects it to payment vocabulary.
        let chunks = engine()
            .relevant_chunks("tubarão", &RetrieveOptions::new())
            .await
            .unwrap();

        assert!(!chunks.is_empty());
        assert!(chunks
            .iter()
            .any(|c| crate::stage_gate::is_strict_price_source(&c.document.source)));
    }

    #[tokio::test]
    async fn test_stopword_only_query_returns_nothing() {
        let chunks = engine()
            .relevant_chunks("oi, e a?", &RetrieveOptions::new())
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_override() {
        let opts = RetrieveOptions::new().with_top_k(1);
        let chunks = engine()
            .relevant_chunks("como funciona o pagamento do curso?", &opts)
            .await
            .unwrap();
        assert!(chunks.len() <= 1);
    }

    #[tokio::test]
    async fn test_raising_threshold_never_adds_results() {
        let engine = engine();
        let query = "como funciona o pagamento do curso?";
        // top_k above the corpus size so only the threshold decides
        let opts = |min: f32| {
            RetrieveOptions::new()
                .with_top_k(10)
                .with_min_similarity(min)
        };

        let loose = engine.relevant_chunks(query, &opts(0.0)).await.unwrap();
        let strict = engine.relevant_chunks(query, &opts(0.2)).await.unwrap();

        assert!(strict.len() <= loose.len());
        for chunk in &strict {
            assert!(loose
                .iter()
                .any(|c| c.document.source == chunk.document.source));
        }
    }

    #[tokio::test]
    async fn test_reinitialize_swaps_in_new_corpus() {
        let engine = engine();

        let before = engine
            .relevant_chunks("como faço minha matrícula?", &RetrieveOptions::new())
            .await
            .unwrap();
        assert!(before
            .iter()
            .all(|c| c.document.source != "matricula_acesso"));

        let mut extended = corpus();
        extended.push(KnowledgeDocument::new(
            "matricula_acesso",
            "A matrícula é feita pelo site e o acesso é liberado na hora.",
        ));
        engine.reinitialize(extended).unwrap();

        assert_eq!(engine.stats().document_count, 6);
        let after = engine
            .relevant_chunks("como faço minha matrícula?", &RetrieveOptions::new())
            .await
            .unwrap();
        assert_eq!(after[0].document.source, "matricula_acesso");
    }

    #[tokio::test]
    async fn test_reinitialize_failure_keeps_previous_index() {
        let engine = engine();
        assert!(engine.reinitialize(Vec::new()).is_err());
        assert_eq!(engine.stats().document_count, 5);

        let chunks = engine
            .relevant_chunks("quanto custa o curso?", &RetrieveOptions::new())
            .await
            .unwrap();
        assert!(!chunks.is_empty());
    }

    #[tokio::test]
    async fn test_context_carries_source_labels() {
        let context = engine()
            .relevant_context("quanto custa o curso?", &RetrieveOptions::new())
            .await
            .unwrap();

        assert!(context.starts_with("Source: precos_planos\nContent: "));
    }
}
