use serde::{Deserialize, Serialize};

use super::error::PurchaseError;
use crate::content::ContentRecord;

/// Observable state of an approve-then-purchase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseState {
    Idle,
    Approving,
    ApprovalConfirming,
    Approved,
    Purchasing,
    PurchaseConfirming,
    Purchased,
    Errored,
}

impl PurchaseState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Purchased | Self::Errored)
    }

    /// Status line shown to the buyer while the sequence runs.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Idle => "Waiting for a selection.",
            Self::Approving => "Approving token transfer...",
            Self::ApprovalConfirming => "Waiting for approval confirmation...",
            Self::Approved => "Approval confirmed. Purchasing access...",
            Self::Purchasing => "Purchasing access...",
            Self::PurchaseConfirming => "Waiting for purchase confirmation...",
            Self::Purchased => "Access purchased!",
            Self::Errored => "Purchase failed.",
        }
    }
}

/// The record a session is buying access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTarget {
    pub content_hash: String,
    pub contract_address: String,
    pub amount: String,
}

impl PurchaseTarget {
    /// `None` when the record has no deployed contract or no price.
    pub fn from_record(record: &ContentRecord) -> Option<Self> {
        record.is_purchasable().then(|| Self {
            content_hash: record.content_hash.clone(),
            contract_address: record.contract_address.trim().to_string(),
            amount: record.amount.trim().to_string(),
        })
    }
}

/// Inputs that drive a [`PurchaseSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseEvent {
    Start,
    ApprovalSubmitted { tx_hash: String },
    ApprovalConfirmed { tx_hash: String },
    PurchaseStarted,
    PurchaseSubmitted { tx_hash: String },
    PurchaseConfirmed { tx_hash: String },
    Failed { message: String },
}

impl PurchaseEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ApprovalSubmitted { .. } => "approval_submitted",
            Self::ApprovalConfirmed { .. } => "approval_confirmed",
            Self::PurchaseStarted => "purchase_started",
            Self::PurchaseSubmitted { .. } => "purchase_submitted",
            Self::PurchaseConfirmed { .. } => "purchase_confirmed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SubmitApproval,
    SubmitPurchase,
}

/// Result of feeding an event to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The session moved; `effect` is emitted only on the entering edge.
    Advanced { effect: Option<Effect> },
    /// The event referred to a transaction this session does not own, or
    /// repeated a confirmation that was already applied.
    Ignored,
}

/// Client-side state for one buyer/record pairing.
///
/// A session is created on selection and thrown away when another record is
/// selected, which also drops every recorded transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseSession {
    pub target: PurchaseTarget,
    pub state: PurchaseState,
    pub approval_tx: Option<String>,
    pub purchase_tx: Option<String>,
    pub error: Option<String>,
}

impl PurchaseSession {
    pub fn new(target: PurchaseTarget) -> Self {
        Self {
            target,
            state: PurchaseState::Idle,
            approval_tx: None,
            purchase_tx: None,
            error: None,
        }
    }

    pub fn apply(&mut self, event: PurchaseEvent) -> Result<Step, PurchaseError> {
        use PurchaseState::*;

        let invalid = |state: PurchaseState, event: &PurchaseEvent| PurchaseError::InvalidTransition {
            state,
            event: event.name(),
        };

        match (&event, self.state) {
            (PurchaseEvent::Start, Idle) => {
                self.state = Approving;
                Ok(Step::Advanced {
                    effect: Some(Effect::SubmitApproval),
                })
            }
            (PurchaseEvent::ApprovalSubmitted { tx_hash }, Approving) => {
                self.approval_tx = Some(tx_hash.clone());
                self.state = ApprovalConfirming;
                Ok(Step::Advanced { effect: None })
            }
            (PurchaseEvent::ApprovalConfirmed { tx_hash }, state) => {
                if self.approval_tx.as_deref() != Some(tx_hash.as_str()) {
                    return Ok(Step::Ignored);
                }
                match state {
                    ApprovalConfirming => {
                        self.state = Approved;
                        let effect = self.purchase_tx.is_none().then_some(Effect::SubmitPurchase);
                        Ok(Step::Advanced { effect })
                    }
                    Approved | Purchasing | PurchaseConfirming | Purchased => Ok(Step::Ignored),
                    _ => Err(invalid(state, &event)),
                }
            }
            (PurchaseEvent::PurchaseStarted, Approved) => {
                self.state = Purchasing;
                Ok(Step::Advanced { effect: None })
            }
            (PurchaseEvent::PurchaseSubmitted { tx_hash }, Purchasing) => {
                self.purchase_tx = Some(tx_hash.clone());
                self.state = PurchaseConfirming;
                Ok(Step::Advanced { effect: None })
            }
            (PurchaseEvent::PurchaseConfirmed { tx_hash }, state) => {
                if self.purchase_tx.as_deref() != Some(tx_hash.as_str()) {
                    return Ok(Step::Ignored);
                }
                match state {
                    PurchaseConfirming => {
                        self.state = Purchased;
                        Ok(Step::Advanced { effect: None })
                    }
                    Purchased => Ok(Step::Ignored),
                    _ => Err(invalid(state, &event)),
                }
            }
            (PurchaseEvent::Failed { message }, state) if !state.is_terminal() => {
                self.error = Some(message.clone());
                self.state = Errored;
                Ok(Step::Advanced { effect: None })
            }
            (_, state) => Err(invalid(state, &event)),
        }
    }
}
