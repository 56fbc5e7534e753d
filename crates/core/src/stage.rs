//! Sales funnel stages and their retrieval-facing behavior

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Stages of the WhatsApp sales funnel
///
/// The orchestrator drives the conversation through these states and passes
/// the current one alongside every retrieval call. Wire format is the
/// SCREAMING_SNAKE_CASE identifier (`PLAN_OFFER`, `NAME_CAPTURE_VALIDATION`,
/// ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStage {
    /// First contact, scripted opening
    Welcome,
    /// Asking for the contact's name
    NameCapture,
    /// Confirming the captured name
    NameCaptureValidation,
    /// Surfacing the contact's pain points
    PainDiscovery,
    /// Qualifying fit and intent
    Qualification,
    /// Presenting the product
    SolutionPresentation,
    /// Presenting plans and price
    PlanOffer,
    /// Working through objections
    ObjectionHandling,
    /// Asking for the close
    CloseDeal,
    /// Checkout link sent, awaiting payment
    Checkout,
    /// Payment confirmed
    PaymentConfirmation,
    /// Post-purchase onboarding touchpoints
    PostPurchaseFollowup,
}

impl FunnelStage {
    /// Stages where price and payment details may be surfaced
    ///
    /// Outside these (and outside the stage-less case) strict-price
    /// documents are filtered from the candidate set before ranking.
    pub fn is_offer_eligible(&self) -> bool {
        matches!(
            self,
            FunnelStage::PlanOffer
                | FunnelStage::CloseDeal
                | FunnelStage::Checkout
                | FunnelStage::PaymentConfirmation
                | FunnelStage::PostPurchaseFollowup
        )
    }

    /// Stages where the offer is already on the table in detail
    ///
    /// A repeated social-proof request in one of these gets the exclusive
    /// external-channels reply instead of another round of testimonials.
    pub fn is_detailed_offer(&self) -> bool {
        matches!(
            self,
            FunnelStage::PlanOffer
                | FunnelStage::CloseDeal
                | FunnelStage::Checkout
                | FunnelStage::PaymentConfirmation
        )
    }

    /// Wire identifier for this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Welcome => "WELCOME",
            FunnelStage::NameCapture => "NAME_CAPTURE",
            FunnelStage::NameCaptureValidation => "NAME_CAPTURE_VALIDATION",
            FunnelStage::PainDiscovery => "PAIN_DISCOVERY",
            FunnelStage::Qualification => "QUALIFICATION",
            FunnelStage::SolutionPresentation => "SOLUTION_PRESENTATION",
            FunnelStage::PlanOffer => "PLAN_OFFER",
            FunnelStage::ObjectionHandling => "OBJECTION_HANDLING",
            FunnelStage::CloseDeal => "CLOSE_DEAL",
            FunnelStage::Checkout => "CHECKOUT",
            FunnelStage::PaymentConfirmation => "PAYMENT_CONFIRMATION",
            FunnelStage::PostPurchaseFollowup => "POST_PURCHASE_FOLLOWUP",
        }
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FunnelStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WELCOME" => Ok(FunnelStage::Welcome),
            "NAME_CAPTURE" => Ok(FunnelStage::NameCapture),
            "NAME_CAPTURE_VALIDATION" => Ok(FunnelStage::NameCaptureValidation),
            "PAIN_DISCOVERY" => Ok(FunnelStage::PainDiscovery),
            "QUALIFICATION" => Ok(FunnelStage::Qualification),
            "SOLUTION_PRESENTATION" => Ok(FunnelStage::SolutionPresentation),
            "PLAN_OFFER" => Ok(FunnelStage::PlanOffer),
            "OBJECTION_HANDLING" => Ok(FunnelStage::ObjectionHandling),
            "CLOSE_DEAL" => Ok(FunnelStage::CloseDeal),
            "CHECKOUT" => Ok(FunnelStage::Checkout),
            "PAYMENT_CONFIRMATION" => Ok(FunnelStage::PaymentConfirmation),
            "POST_PURCHASE_FOLLOWUP" => Ok(FunnelStage::PostPurchaseFollowup),
            other => Err(Error::Config(format!("unknown funnel stage: {other}"))),
        }
    }
}
