use serde::{Deserialize, Serialize};

use khata_core::{ExpectedVersion, LedgerId, RequestId};
use khata_journal::JournalVoucher;
use khata_requests::PaymentRequestStatus;

/// A non-ledger document write that must land in the same atomic unit as the
/// voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentMutation {
    /// Move a payment request to a new status.
    PaymentStatus {
        request_id: RequestId,
        to: PaymentRequestStatus,
        expected_version: u64,
    },
    /// Flag a referral as credited with the computed commission.
    ReferralCredited {
        referral_id: RequestId,
        commission: i64,
        expected_version: u64,
    },
}

/// Optimistic guard on a ledger's posting history.
///
/// `expected` is the number of committed vouchers touching the ledger at the
/// time the builder read its balance; the store rejects the commit if the
/// count has moved, so two transfers racing on one snapshot cannot both pass
/// the insufficient-funds check and land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerGuard {
    pub ledger_id: LedgerId,
    pub expected: ExpectedVersion,
}

/// The atomic unit a builder hands to the store: at most one voucher, the
/// document mutations that travel with it, and any optimistic guards.
/// All-or-nothing on commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub voucher: Option<JournalVoucher>,
    pub mutations: Vec<DocumentMutation>,
    pub guards: Vec<LedgerGuard>,
}

impl Posting {
    pub fn voucher_only(voucher: JournalVoucher) -> Self {
        Self {
            voucher: Some(voucher),
            mutations: Vec::new(),
            guards: Vec::new(),
        }
    }
}
