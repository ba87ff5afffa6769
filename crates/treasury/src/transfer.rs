use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use khata_coa::Chart;
use khata_core::{DomainError, DomainResult, ExpectedVersion, LedgerId};
use khata_journal::{JournalVoucher, VoucherEntry, compute_balance};

use crate::posting::{LedgerGuard, Posting};

/// Cash-to-bank, bank-to-cash, or bank-to-bank movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalTransfer {
    pub from: LedgerId,
    pub to: LedgerId,
    /// Minor units.
    pub amount: i64,
    pub date: NaiveDate,
    pub narration: Option<String>,
    pub now: DateTime<Utc>,
}

/// Build the transfer voucher: debit `to`, credit `from`.
///
/// The insufficient-funds check runs against the projected balance of the
/// snapshot passed in; the returned posting carries a guard on the source
/// ledger so the store rejects a commit if the snapshot went stale.
pub fn build_internal_transfer(
    event: &InternalTransfer,
    chart: &Chart,
    vouchers: &[JournalVoucher],
) -> DomainResult<Posting> {
    if event.amount <= 0 {
        return Err(DomainError::validation("transfer amount must be positive"));
    }
    if event.from == event.to {
        return Err(DomainError::validation(
            "transfer source and destination must differ",
        ));
    }

    let from = chart.active_posting_ledger(event.from)?;
    chart.active_posting_ledger(event.to)?;

    let available = compute_balance(from, vouchers);
    if available < event.amount {
        return Err(DomainError::insufficient_funds(available, event.amount));
    }

    let narration = event
        .narration
        .clone()
        .unwrap_or_else(|| "Internal transfer".to_string());
    let voucher = JournalVoucher::balanced(
        event.date,
        narration,
        vec![
            VoucherEntry::debit(event.to, event.amount),
            VoucherEntry::credit(event.from, event.amount),
        ],
        event.now,
    )?;

    let observed = vouchers.iter().filter(|v| v.touches(event.from)).count() as u64;
    Ok(Posting {
        voucher: Some(voucher),
        mutations: Vec::new(),
        guards: vec![LedgerGuard {
            ledger_id: event.from,
            expected: ExpectedVersion::Exact(observed),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use khata_coa::{LedgerDraft, LedgerType};
    use khata_core::AccountNature;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn fixture() -> (Chart, LedgerId, LedgerId) {
        let mut chart = Chart::new();
        let assets = chart
            .create_group("Assets", AccountNature::Asset, None)
            .unwrap();
        let cash = chart
            .create_ledger(
                LedgerDraft::new("Cash", assets, AccountNature::Asset, LedgerType::Cash, date())
                    .with_opening(1_000_00, None),
            )
            .unwrap();
        let bank = chart
            .create_ledger(LedgerDraft::new(
                "Bank",
                assets,
                AccountNature::Asset,
                LedgerType::Bank,
                date(),
            ))
            .unwrap();
        (chart, cash, bank)
    }

    fn event(from: LedgerId, to: LedgerId, amount: i64) -> InternalTransfer {
        InternalTransfer {
            from,
            to,
            amount,
            date: date(),
            narration: None,
            now: now(),
        }
    }

    #[test]
    fn transfer_debits_destination_and_credits_source() {
        let (chart, cash, bank) = fixture();
        let posting = build_internal_transfer(&event(cash, bank, 400_00), &chart, &[]).unwrap();

        let voucher = posting.voucher.unwrap();
        assert_eq!(voucher.entries()[0], VoucherEntry::debit(bank, 400_00));
        assert_eq!(voucher.entries()[1], VoucherEntry::credit(cash, 400_00));
        assert_eq!(
            posting.guards,
            vec![LedgerGuard {
                ledger_id: cash,
                expected: ExpectedVersion::Exact(0)
            }]
        );
    }

    #[test]
    fn transfer_rejects_same_account_and_non_positive_amounts() {
        let (chart, cash, bank) = fixture();
        assert!(matches!(
            build_internal_transfer(&event(cash, cash, 100), &chart, &[]).unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            build_internal_transfer(&event(cash, bank, 0), &chart, &[]).unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn transfer_rejects_when_projected_balance_is_short() {
        let (chart, cash, bank) = fixture();
        let err = build_internal_transfer(&event(cash, bank, 1_000_01), &chart, &[]).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientFunds {
                available: 1_000_00,
                requested: 1_000_01
            }
        );

        // Exactly the balance passes.
        assert!(build_internal_transfer(&event(cash, bank, 1_000_00), &chart, &[]).is_ok());
    }

    #[test]
    fn guard_counts_vouchers_touching_the_source() {
        let (chart, cash, bank) = fixture();
        let first = build_internal_transfer(&event(cash, bank, 100_00), &chart, &[])
            .unwrap()
            .voucher
            .unwrap();

        let posting =
            build_internal_transfer(&event(cash, bank, 100_00), &chart, &[first]).unwrap();
        assert_eq!(
            posting.guards[0].expected,
            ExpectedVersion::Exact(1)
        );
    }
}
