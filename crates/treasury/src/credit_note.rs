use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use khata_coa::Chart;
use khata_core::{DomainError, DomainResult, LedgerId};
use khata_journal::{JournalVoucher, VoucherEntry};
use khata_tax::{Discount, TaxBreakup, TaxRate, TaxSplit, pro_rata};

use crate::posting::Posting;

/// The original invoice line a credit note adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineRef {
    pub quantity: i64,
    /// Minor units per unit.
    pub rate: i64,
    pub discount: Discount,
}

impl InvoiceLineRef {
    fn gross(&self) -> DomainResult<i64> {
        self.quantity
            .checked_mul(self.rate)
            .ok_or_else(|| DomainError::validation("line total overflows"))
    }
}

/// Why the note is issued. The three modes are mutually exclusive and each
/// computes its own taxable amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditNoteReason {
    /// Credit the returned quantity's value net of its pro-rata share of the
    /// original line discount.
    GoodsReturn {
        line: InvoiceLineRef,
        return_qty: i64,
    },
    /// Credit the delta between the original and revised line totals.
    RevisedRate {
        line: InvoiceLineRef,
        revised_rate: i64,
    },
    /// Credit the delta between the original and newly-applied overall
    /// discount.
    RevisedDiscount {
        original_total: i64,
        old: Discount,
        new: Discount,
    },
}

impl CreditNoteReason {
    fn taxable(&self) -> DomainResult<i64> {
        match *self {
            CreditNoteReason::GoodsReturn { line, return_qty } => {
                if return_qty <= 0 || return_qty > line.quantity {
                    return Err(DomainError::validation(
                        "return quantity must be within the original line",
                    ));
                }
                let return_value = return_qty
                    .checked_mul(line.rate)
                    .ok_or_else(|| DomainError::validation("return value overflows"))?;
                let discount_total = line.discount.amount_off(line.gross()?);
                let discount_share = pro_rata(discount_total, return_qty, line.quantity)?;
                Ok(return_value - discount_share)
            }
            CreditNoteReason::RevisedRate { line, revised_rate } => {
                if revised_rate < 0 {
                    return Err(DomainError::validation("revised rate must not be negative"));
                }
                let delta_per_unit = line.rate - revised_rate;
                delta_per_unit
                    .checked_mul(line.quantity)
                    .ok_or_else(|| DomainError::validation("rate delta overflows"))
            }
            CreditNoteReason::RevisedDiscount {
                original_total,
                old,
                new,
            } => Ok(new.amount_off(original_total) - old.amount_off(original_total)),
        }
    }
}

/// Ledgers the credit-note voucher posts across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteAccounts {
    /// Customer receivable credited with the grand total.
    pub receivable: LedgerId,
    /// Sales-return (revenue contra) debited with the taxable amount.
    pub sales_return: LedgerId,
    pub igst: LedgerId,
    pub cgst: LedgerId,
    pub sgst: LedgerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNoteRequest {
    pub reason: CreditNoteReason,
    pub rate: TaxRate,
    pub split: TaxSplit,
    pub accounts: CreditNoteAccounts,
    pub narration: String,
    pub date: NaiveDate,
    pub now: DateTime<Utc>,
}

/// The computed note plus its atomic posting.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditNoteOutcome {
    pub breakup: TaxBreakup,
    pub posting: Posting,
}

/// Build a credit note: compute the mode's taxable amount, break out the
/// tax, and post the reversal across receivable, sales-return, and tax
/// ledgers. Rejected with "no adjustment made" when the grand total is not
/// positive.
pub fn build_credit_note(event: &CreditNoteRequest, chart: &Chart) -> DomainResult<CreditNoteOutcome> {
    let taxable = event.reason.taxable()?;
    if taxable <= 0 {
        return Err(DomainError::validation("no adjustment made"));
    }

    let breakup = TaxBreakup::apply(taxable, event.rate, event.split);
    debug_assert!(breakup.total > 0);

    chart.active_posting_ledger(event.accounts.receivable)?;
    chart.active_posting_ledger(event.accounts.sales_return)?;

    let mut entries = vec![VoucherEntry::debit(event.accounts.sales_return, breakup.taxable)];
    for (ledger, amount) in [
        (event.accounts.igst, breakup.igst),
        (event.accounts.cgst, breakup.cgst),
        (event.accounts.sgst, breakup.sgst),
    ] {
        if amount > 0 {
            chart.active_posting_ledger(ledger)?;
            entries.push(VoucherEntry::debit(ledger, amount));
        }
    }
    entries.push(VoucherEntry::credit(event.accounts.receivable, breakup.total));

    let voucher =
        JournalVoucher::balanced(event.date, event.narration.clone(), entries, event.now)?;
    Ok(CreditNoteOutcome {
        breakup,
        posting: Posting::voucher_only(voucher),
    })
}
