//! Journal vouchers (balanced double-entry records) and the balance
//! projection engine.
//!
//! Pure domain logic only: no IO, no persistence concerns. Vouchers are
//! immutable once constructed; balances are a pure fold over them.

pub mod balances;
pub mod voucher;

pub use balances::{
    BalanceView, TrialBalance, TrialBalanceRow, balance_as_of, compute_balance, compute_balances,
    trial_balance,
};
pub use voucher::{JournalVoucher, VoucherEntry};
