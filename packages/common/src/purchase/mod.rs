//! Buyer-side approve-then-purchase flow.

mod controller;
mod error;
mod session;

pub use controller::{PurchaseBackend, PurchaseController};
pub use error::{PurchaseError, TxError};
pub use session::{Effect, PurchaseEvent, PurchaseSession, PurchaseState, PurchaseTarget, Step};
