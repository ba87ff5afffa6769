//! Debit/credit vocabulary and sign conventions.
//!
//! All amounts in the workspace are **non-negative `i64` minor units**
//! (paise). The side of a balance is carried by [`DrCr`], never by a negative
//! amount. Signed arithmetic (projection folds, deltas) uses the
//! debit-positive convention: debits add, credits subtract.

use serde::{Deserialize, Serialize};

/// Debit/credit indicator attached to opening balances and net positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrCr {
    Dr,
    Cr,
}

impl DrCr {
    /// +1 for debit, -1 for credit (debit-positive convention).
    pub fn sign(self) -> i64 {
        match self {
            DrCr::Dr => 1,
            DrCr::Cr => -1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            DrCr::Dr => DrCr::Cr,
            DrCr::Cr => DrCr::Dr,
        }
    }
}

/// Classification of a ledger/group (determines normal balance side and
/// reporting statement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountNature {
    /// Default side for opening balances and zero-balance display.
    pub fn normal_balance(self) -> DrCr {
        match self {
            AccountNature::Asset | AccountNature::Expense => DrCr::Dr,
            AccountNature::Liability | AccountNature::Equity | AccountNature::Income => DrCr::Cr,
        }
    }

    /// Reporting statement tag: income/expense roll into P&L, the rest into
    /// the balance sheet.
    pub fn statement(self) -> Statement {
        match self {
            AccountNature::Income | AccountNature::Expense => Statement::ProfitAndLoss,
            _ => Statement::BalanceSheet,
        }
    }
}

/// Financial statement a nature reports under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    #[serde(rename = "bs")]
    BalanceSheet,
    #[serde(rename = "pl")]
    ProfitAndLoss,
}

/// Signed amount for a (non-negative amount, side) pair.
pub fn signed_amount(amount: i64, drcr: DrCr) -> i64 {
    amount * drcr.sign()
}
