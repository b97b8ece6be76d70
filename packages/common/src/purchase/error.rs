use thiserror::Error;

use super::session::PurchaseState;

/// Failure reported by a [`PurchaseBackend`](super::PurchaseBackend) call.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TxError(pub String);

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("event `{event}` is not valid in state {state:?}")]
    InvalidTransition {
        state: PurchaseState,
        event: &'static str,
    },
    #[error("no record selected")]
    NothingSelected,
    #[error("{stage} failed: {source}")]
    Transaction {
        stage: &'static str,
        #[source]
        source: TxError,
    },
    #[error("timed out after {secs}s waiting for {stage} confirmation")]
    Timeout { stage: &'static str, secs: u64 },
}
