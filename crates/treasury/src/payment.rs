use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use khata_coa::Chart;
use khata_core::{DomainResult, LedgerId};
use khata_journal::{JournalVoucher, VoucherEntry};
use khata_requests::{PaymentRequest, PaymentRequestStatus};

use crate::posting::{DocumentMutation, Posting};

/// Settle an approved payment request from a bank or cash ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettlement {
    pub request: PaymentRequest,
    pub paying_ledger: LedgerId,
    pub date: NaiveDate,
    pub now: DateTime<Utc>,
}

/// Build the settlement: debit the counterparty's ledger, credit the paying
/// account, and flip the request to `Paid` in the same atomic unit.
///
/// Fails with `MissingLedger` when the counterparty has no linked account
/// and with `Conflict` when the request is not in a payable state.
pub fn build_payment(event: &PaymentSettlement, chart: &Chart) -> DomainResult<Posting> {
    let counterparty_ledger = event.request.counterparty.require_ledger()?;
    chart.active_posting_ledger(counterparty_ledger)?;
    chart.active_posting_ledger(event.paying_ledger)?;

    // Validate the transition up front; the store re-runs it inside the batch.
    event.request.status.transition(PaymentRequestStatus::Paid)?;

    let narration = format!("Settlement of {:?} request", event.request.kind);
    let voucher = JournalVoucher::balanced(
        event.date,
        narration,
        vec![
            VoucherEntry::debit(counterparty_ledger, event.request.amount),
            VoucherEntry::credit(event.paying_ledger, event.request.amount),
        ],
        event.now,
    )?;

    Ok(Posting {
        voucher: Some(voucher),
        mutations: vec![DocumentMutation::PaymentStatus {
            request_id: event.request.id,
            to: PaymentRequestStatus::Paid,
            expected_version: event.request.version,
        }],
        guards: Vec::new(),
    })
}
