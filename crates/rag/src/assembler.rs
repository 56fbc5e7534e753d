//! Context assembly
//!
//! Turns ranked chunks into the prompt context string handed to the LLM:
//! labelled blocks separated by a divider, cut off at a byte budget.

use smartzap_core::RankedChunk;

use crate::topics;

/// Separator between context blocks
pub const CONTEXT_DIVIDER: &str = "\n\n---\n\n";

const ELLIPSIS: &str = "...";

/// Render chunks into the final context string
///
/// Whole blocks are appended while they fit in `max_chars` bytes. The first
/// block that does not fit is truncated at a character boundary and closed
/// with an ellipsis, which may run up to three bytes past the limit. Later
/// chunks are dropped.
pub fn assemble(chunks: &[RankedChunk], max_chars: usize) -> String {
    let mut out = String::new();

    for chunk in chunks {
        let block = format_block(chunk);
        let sep = if out.is_empty() { "" } else { CONTEXT_DIVIDER };

        if out.len() + sep.len() + block.len() <= max_chars {
            out.push_str(sep);
            out.push_str(&block);
            continue;
        }

        let remaining = max_chars.saturating_sub(out.len() + sep.len());
        let truncated = truncate_at_char_boundary(&block, remaining);
        if !truncated.is_empty() {
            out.push_str(sep);
            out.push_str(truncated);
            out.push_str(ELLIPSIS);
        }
        break;
    }

    out
}

/// Budget actually applied for a retrieval: the caller's request, raised to
/// the highest floor among the matched topics
pub fn effective_budget(requested: usize, matched: &[&str]) -> usize {
    match topics::max_context_floor(matched) {
        Some(floor) => requested.max(floor),
        None => requested,
    }
}

fn format_block(chunk: &RankedChunk) -> String {
    format!(
        "Source: {}\nContent: {}",
        chunk.document.source, chunk.document.content
    )
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// character
fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartzap_core::KnowledgeDocument;

    fn chunk(source: &str, content: &str) -> RankedChunk {
        RankedChunk::new(KnowledgeDocument::new(source, content), 0.5)
    }

    #[test]
    fn test_single_block_format() {
        let out = assemble(&[chunk("precos_planos", "Plano anual por 12x de R$ 97.")], 500);
        assert_eq!(
            out,
            "Source: precos_planos\nContent: Plano anual por 12x de R$ 97."
        );
    }

    #[test]
    fn test_blocks_joined_by_divider() {
        let out = assemble(
            &[chunk("a", "primeiro"), chunk("b", "segundo")],
            500,
        );
        assert_eq!(
            out,
            "Source: a\nContent: primeiro\n\n---\n\nSource: b\nContent: segundo"
        );
    }

    #[test]
    fn test_overflowing_block_is_truncated_with_ellipsis() {
        let first = chunk("a", "curto");
        let second = chunk("b", "x".repeat(300).as_str());
        let out = assemble(&[first, second], 80);

        assert!(out.starts_with("Source: a\nContent: curto"));
        assert!(out.ends_with("..."));
        assert!(out.len() <= 80 + ELLIPSIS.len());
    }

    #[test]
    fn test_truncation_respects_multibyte_boundaries() {
        let content = "atuação em ações de família e sucessões".repeat(10);
        for budget in 30..60 {
            let out = assemble(&[chunk("areas_atuacao", &content)], budget);
            assert!(out.ends_with("..."), "budget {budget} lost the ellipsis");
        }
    }

    #[test]
    fn test_chunks_after_truncation_are_dropped() {
        let out = assemble(
            &[
                chunk("a", "y".repeat(200).as_str()),
                chunk("b", "nunca aparece"),
            ],
            60,
        );
        assert!(!out.contains("nunca aparece"));
        assert!(!out.contains("Source: b"));
    }

    #[test]
    fn test_empty_input_yields_empty_context() {
        assert_eq!(assemble(&[], 1500), "");
    }

    #[test]
    fn test_effective_budget_applies_topic_floor() {
        assert_eq!(effective_budget(1500, &["professor"]), 2000);
        assert_eq!(effective_budget(5000, &["professor"]), 5000);
        assert_eq!(effective_budget(1500, &["preco_direto"]), 1500);
        assert_eq!(effective_budget(1500, &[]), 1500);
    }
}
