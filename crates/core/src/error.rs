//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or missing input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A proposed journal voucher does not balance.
    ///
    /// Amounts are minor units (paise).
    #[error("voucher does not balance: debits {debit} != credits {credit}")]
    UnbalancedVoucher { debit: i64, credit: i64 },

    /// A conflicting reference or stale state blocks the operation
    /// (delete guards, illegal status transitions, version mismatches).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A transfer exceeds the projected balance of the source account.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    /// A counterparty has no linked ledger account.
    #[error("no linked ledger account: {0}")]
    MissingLedger(String),

    /// A required system ledger or setting is absent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested document was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unbalanced(debit: i64, credit: i64) -> Self {
        Self::UnbalancedVoucher { debit, credit }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_funds(available: i64, requested: i64) -> Self {
        Self::InsufficientFunds {
            available,
            requested,
        }
    }

    pub fn missing_ledger(msg: impl Into<String>) -> Self {
        Self::MissingLedger(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
