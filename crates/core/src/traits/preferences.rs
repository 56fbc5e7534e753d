//! Preference sink trait for per-contact conversation preferences

use async_trait::async_trait;
use tracing::trace;

use crate::error::Result;

/// Downstream store for per-contact preferences learned mid-conversation
///
/// The engine only ever writes fire-and-forget: failures are logged by the
/// caller and never propagate into the retrieval result.
#[async_trait]
pub trait PreferenceSink: Send + Sync {
    /// Record that a contact wants social proof via external channels
    /// (Instagram, testimonial pages) instead of more in-chat testimonials
    async fn set_prefer_proof_channels(&self, chat_id: &str, prefer: bool) -> Result<()>;
}

/// Sink that drops every write, for running the engine without a store
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreferenceSink;

#[async_trait]
impl PreferenceSink for NoopPreferenceSink {
    async fn set_prefer_proof_channels(&self, chat_id: &str, prefer: bool) -> Result<()> {
        trace!(chat_id = %chat_id, prefer, "Preference write dropped, no sink configured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink_accepts_writes() {
        let sink = NoopPreferenceSink;
        assert!(sink
            .set_prefer_proof_channels("5511999990000", true)
            .await
            .is_ok());
    }
}
