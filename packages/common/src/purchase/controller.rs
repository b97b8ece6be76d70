use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use super::error::{PurchaseError, TxError};
use super::session::{Effect, PurchaseEvent, PurchaseSession, PurchaseTarget, Step};

/// Room for every state of one run before a slow subscriber starts lagging.
const UPDATE_CAPACITY: usize = 32;

/// Wallet-side operations needed to buy access to a record.
#[async_trait]
pub trait PurchaseBackend: Send + Sync {
    /// Whether the wallet already holds access on `contract`.
    async fn has_access(&self, contract: &str) -> Result<bool, TxError>;

    /// Approve `spender` to pull `amount` (decimal, 18 places) of the payment
    /// token. Returns the transaction hash.
    async fn approve(&self, spender: &str, amount: &str) -> Result<String, TxError>;

    /// Call `purchaseAccess()` on the record's contract.
    async fn purchase_access(&self, contract: &str) -> Result<String, TxError>;

    /// Resolve once the transaction is mined successfully.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), TxError>;
}

#[async_trait]
impl<T: PurchaseBackend + ?Sized> PurchaseBackend for Arc<T> {
    async fn has_access(&self, contract: &str) -> Result<bool, TxError> {
        (**self).has_access(contract).await
    }

    async fn approve(&self, spender: &str, amount: &str) -> Result<String, TxError> {
        (**self).approve(spender, amount).await
    }

    async fn purchase_access(&self, contract: &str) -> Result<String, TxError> {
        (**self).purchase_access(contract).await
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), TxError> {
        (**self).wait_for_confirmation(tx_hash).await
    }
}

#[derive(Clone, Copy)]
enum Stage {
    Approval,
    Purchase,
}

impl Stage {
    fn label(self) -> &'static str {
        match self {
            Stage::Approval => "approval",
            Stage::Purchase => "purchase",
        }
    }
}

/// Drives a [`PurchaseSession`] against a [`PurchaseBackend`].
///
/// Every state change is broadcast in order so a UI can follow along.
/// Nothing is retried; a failure leaves the session in `Errored`.
pub struct PurchaseController<B> {
    backend: B,
    confirmation_timeout: Duration,
    session: Option<PurchaseSession>,
    updates: broadcast::Sender<PurchaseSession>,
}

impl<B: PurchaseBackend> PurchaseController<B> {
    pub fn new(backend: B, confirmation_timeout: Duration) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            backend,
            confirmation_timeout,
            session: None,
            updates,
        }
    }

    /// Receive a copy of the session after every change, starting from the
    /// next one.
    pub fn subscribe(&self) -> broadcast::Receiver<PurchaseSession> {
        self.updates.subscribe()
    }

    pub fn session(&self) -> Option<&PurchaseSession> {
        self.session.as_ref()
    }

    /// Start over with a new record. The previous session and its
    /// transaction hashes are discarded.
    pub fn select(&mut self, target: PurchaseTarget) {
        self.session = Some(PurchaseSession::new(target));
        self.publish();
    }

    /// Whether the wallet already owns `target`, in which case paying again
    /// would be wasted.
    pub async fn has_access(&self, target: &PurchaseTarget) -> Result<bool, PurchaseError> {
        self.backend
            .has_access(&target.contract_address)
            .await
            .map_err(|source| PurchaseError::Transaction {
                stage: "access check",
                source,
            })
    }

    /// Select `target` and run the purchase to completion.
    pub async fn purchase(&mut self, target: PurchaseTarget) -> Result<PurchaseSession, PurchaseError> {
        self.select(target);
        self.run().await
    }

    /// Run approve, confirm, purchase and confirm for the selected record.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<PurchaseSession, PurchaseError> {
        let target = self
            .session
            .as_ref()
            .map(|s| s.target.clone())
            .ok_or(PurchaseError::NothingSelected)?;

        let mut pending = self.apply(PurchaseEvent::Start)?;
        while let Some(effect) = pending.take() {
            pending = match effect {
                Effect::SubmitApproval => {
                    let submitted = self
                        .backend
                        .approve(&target.contract_address, &target.amount)
                        .await;
                    let tx_hash = self.submitted(Stage::Approval, submitted)?;
                    self.apply(PurchaseEvent::ApprovalSubmitted {
                        tx_hash: tx_hash.clone(),
                    })?;
                    info!(tx = %tx_hash, contract = %target.contract_address, "Approval submitted");
                    self.confirm(Stage::Approval, &tx_hash).await?
                }
                Effect::SubmitPurchase => {
                    self.apply(PurchaseEvent::PurchaseStarted)?;
                    let submitted = self.backend.purchase_access(&target.contract_address).await;
                    let tx_hash = self.submitted(Stage::Purchase, submitted)?;
                    self.apply(PurchaseEvent::PurchaseSubmitted {
                        tx_hash: tx_hash.clone(),
                    })?;
                    info!(tx = %tx_hash, contract = %target.contract_address, "Purchase submitted");
                    self.confirm(Stage::Purchase, &tx_hash).await?
                }
            };
        }

        self.session.clone().ok_or(PurchaseError::NothingSelected)
    }

    /// Feed one event to the current session.
    ///
    /// Confirmations that arrive late, for a transaction the current
    /// session never submitted, come back as [`Step::Ignored`].
    pub fn handle(&mut self, event: PurchaseEvent) -> Result<Step, PurchaseError> {
        let session = self.session.as_mut().ok_or(PurchaseError::NothingSelected)?;
        let step = session.apply(event)?;
        if matches!(step, Step::Advanced { .. }) {
            self.publish();
        }
        Ok(step)
    }

    fn submitted(&mut self, stage: Stage, result: Result<String, TxError>) -> Result<String, PurchaseError> {
        match result {
            Ok(tx_hash) => Ok(tx_hash),
            Err(source) => Err(self.fail(PurchaseError::Transaction {
                stage: stage.label(),
                source,
            })),
        }
    }

    async fn confirm(&mut self, stage: Stage, tx_hash: &str) -> Result<Option<Effect>, PurchaseError> {
        let waited =
            tokio::time::timeout(self.confirmation_timeout, self.backend.wait_for_confirmation(tx_hash)).await;

        match waited {
            Ok(Ok(())) => {
                let tx_hash = tx_hash.to_string();
                let event = match stage {
                    Stage::Approval => PurchaseEvent::ApprovalConfirmed { tx_hash },
                    Stage::Purchase => PurchaseEvent::PurchaseConfirmed { tx_hash },
                };
                self.apply(event)
            }
            Ok(Err(source)) => Err(self.fail(PurchaseError::Transaction {
                stage: stage.label(),
                source,
            })),
            Err(_) => Err(self.fail(PurchaseError::Timeout {
                stage: stage.label(),
                secs: self.confirmation_timeout.as_secs(),
            })),
        }
    }

    fn apply(&mut self, event: PurchaseEvent) -> Result<Option<Effect>, PurchaseError> {
        Ok(match self.handle(event)? {
            Step::Advanced { effect } => effect,
            Step::Ignored => None,
        })
    }

    fn fail(&mut self, err: PurchaseError) -> PurchaseError {
        warn!(error = %err, "Purchase halted");
        if let Some(session) = self.session.as_mut() {
            let _ = session.apply(PurchaseEvent::Failed {
                message: err.to_string(),
            });
        }
        self.publish();
        err
    }

    fn publish(&self) {
        if let Some(session) = &self.session {
            // No subscribers is fine.
            let _ = self.updates.send(session.clone());
        }
    }
}
