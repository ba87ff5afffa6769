use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult, Entity, LedgerId, VoucherId};

/// One side of a journal voucher.
///
/// Amounts are non-negative minor units. Usually exactly one of
/// `debit`/`credit` is non-zero; the model allows both, in which case the
/// line contributes its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherEntry {
    pub ledger_id: LedgerId,
    pub debit: i64,
    pub credit: i64,
}

impl VoucherEntry {
    pub fn debit(ledger_id: LedgerId, amount: i64) -> Self {
        Self {
            ledger_id,
            debit: amount,
            credit: 0,
        }
    }

    pub fn credit(ledger_id: LedgerId, amount: i64) -> Self {
        Self {
            ledger_id,
            debit: 0,
            credit: amount,
        }
    }

    /// Debit-positive net contribution of this line.
    pub fn net(&self) -> i64 {
        self.debit - self.credit
    }
}

/// An immutable, dated, balanced transaction record.
///
/// The only way in is [`JournalVoucher::balanced`], which enforces the
/// fundamental invariant: sum of debits equals sum of credits. Corrections
/// are posted as reversing vouchers, never by mutating history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalVoucher {
    id: VoucherId,
    date: NaiveDate,
    narration: String,
    entries: Vec<VoucherEntry>,
    created_at: DateTime<Utc>,
}

impl JournalVoucher {
    /// Validate and construct a voucher.
    ///
    /// Rejects empty entry sets, negative amounts, no-op lines, and any set
    /// whose debit and credit totals differ. Amounts are minor units, so the
    /// equality check is exact integer comparison.
    pub fn balanced(
        date: NaiveDate,
        narration: impl Into<String>,
        entries: Vec<VoucherEntry>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if entries.is_empty() {
            return Err(DomainError::validation("voucher must have entries"));
        }

        let mut debit_total: i128 = 0;
        let mut credit_total: i128 = 0;
        for entry in &entries {
            if entry.debit < 0 || entry.credit < 0 {
                return Err(DomainError::validation("entry amounts must not be negative"));
            }
            if entry.debit == 0 && entry.credit == 0 {
                return Err(DomainError::validation(
                    "entry must debit or credit a non-zero amount",
                ));
            }
            debit_total += entry.debit as i128;
            credit_total += entry.credit as i128;
        }

        if debit_total != credit_total {
            return Err(DomainError::unbalanced(
                clamp_i64(debit_total),
                clamp_i64(credit_total),
            ));
        }

        Ok(Self {
            id: VoucherId::new(),
            date,
            narration: narration.into(),
            entries,
            created_at,
        })
    }

    pub fn id_typed(&self) -> VoucherId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn narration(&self) -> &str {
        &self.narration
    }

    pub fn entries(&self) -> &[VoucherEntry] {
        &self.entries
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn debit_total(&self) -> i64 {
        clamp_i64(self.entries.iter().map(|e| e.debit as i128).sum())
    }

    pub fn credit_total(&self) -> i64 {
        clamp_i64(self.entries.iter().map(|e| e.credit as i128).sum())
    }

    pub fn touches(&self, ledger_id: LedgerId) -> bool {
        self.entries.iter().any(|e| e.ledger_id == ledger_id)
    }

    /// Build the adjusting voucher that cancels this one: every entry with
    /// debit and credit swapped. Always balances, by construction.
    pub fn reversal(
        &self,
        date: NaiveDate,
        narration: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|e| VoucherEntry {
                ledger_id: e.ledger_id,
                debit: e.credit,
                credit: e.debit,
            })
            .collect();
        Self {
            id: VoucherId::new(),
            date,
            narration: narration.into(),
            entries,
            created_at,
        }
    }
}

impl Entity for JournalVoucher {
    type Id = VoucherId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn clamp_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
