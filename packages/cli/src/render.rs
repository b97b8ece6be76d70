use common::ContentRecord;
use common::purchase::{PurchaseSession, PurchaseState};
use console::style;

/// Multi-line summary of a search hit.
pub fn record(record: &ContentRecord) -> String {
    let price = if record.is_purchasable() {
        format!("{} (contract {})", record.amount, record.contract_address)
    } else {
        "not for sale".to_string()
    };
    format!(
        "{}\n  {}\n  tags: {}\n  hash: {}\n  price: {}",
        style(&record.title).bold(),
        record.summary,
        record.tags.join(", "),
        record.content_hash,
        price,
    )
}

/// One progress line for a purchase session.
pub fn progress(session: &PurchaseSession) -> String {
    let line = session.state.describe();
    let tx = match session.state {
        PurchaseState::ApprovalConfirming => session.approval_tx.as_deref(),
        PurchaseState::PurchaseConfirming | PurchaseState::Purchased => {
            session.purchase_tx.as_deref()
        }
        _ => None,
    };
    let line = match tx {
        Some(tx) => format!("{line} (tx {tx})"),
        None => line.to_string(),
    };
    match session.state {
        PurchaseState::Purchased => style(line).green().to_string(),
        PurchaseState::Errored => {
            let reason = session.error.as_deref().unwrap_or("unknown error");
            style(format!("{line} {reason}")).red().to_string()
        }
        _ => style(line).cyan().to_string(),
    }
}
