//! Funnel-stage gating of price content
//!
//! Applied to the candidate set BEFORE ranking and boosting. Whatever the
//! topic rules decide later, a document removed here never comes back; the
//! scripted funnel must not leak price talk while it is still capturing the
//! contact's name or discovering pain points.

use smartzap_core::FunnelStage;

/// Sources that state prices or payment terms outright
pub const STRICT_PRICE_SOURCES: &[&str] = &["precos_planos", "formas_pagamento"];

/// Whether a source is strict-price content
pub fn is_strict_price_source(source: &str) -> bool {
    STRICT_PRICE_SOURCES.contains(&source)
}

/// Whether a document may enter the candidate set at this stage
///
/// `None` means a stage-less conversation; nothing is gated then.
pub fn stage_allows(source: &str, stage: Option<FunnelStage>) -> bool {
    if !is_strict_price_source(source) {
        return true;
    }
    match stage {
        None => true,
        Some(stage) => stage.is_offer_eligible(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_price_sources_always_pass() {
        for stage in [
            None,
            Some(FunnelStage::NameCaptureValidation),
            Some(FunnelStage::PlanOffer),
        ] {
            assert!(stage_allows("professor_credenciais", stage));
            assert!(stage_allows("provas_sociais", stage));
        }
    }

    #[test]
    fn test_price_sources_blocked_early_in_funnel() {
        assert!(!stage_allows("precos_planos", Some(FunnelStage::NameCaptureValidation)));
        assert!(!stage_allows("formas_pagamento", Some(FunnelStage::PainDiscovery)));
        assert!(!stage_allows("precos_planos", Some(FunnelStage::Welcome)));
    }

    #[test]
    fn test_price_sources_pass_in_offer_stages_and_stageless() {
        assert!(stage_allows("precos_planos", None));
        assert!(stage_allows("precos_planos", Some(FunnelStage::PlanOffer)));
        assert!(stage_allows("formas_pagamento", Some(FunnelStage::Checkout)));
        assert!(stage_allows("precos_planos", Some(FunnelStage::PostPurchaseFollowup)));
    }
}
