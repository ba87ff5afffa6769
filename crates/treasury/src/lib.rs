//! Transaction builders: translate a business event into one balanced
//! journal voucher plus any accompanying document mutations.
//!
//! Each builder is a pure function over the chart, a voucher snapshot, and
//! the event; the store executes the resulting [`Posting`] atomically.

pub mod credit_note;
pub mod payment;
pub mod posting;
pub mod referral;
pub mod stock;
pub mod transfer;

pub use credit_note::{
    CreditNoteAccounts, CreditNoteOutcome, CreditNoteReason, CreditNoteRequest, InvoiceLineRef,
    build_credit_note,
};
pub use payment::{PaymentSettlement, build_payment};
pub use posting::{DocumentMutation, LedgerGuard, Posting};
pub use referral::{QualifyingOrder, build_referral_commission};
pub use stock::{STOCK_ADJUSTMENT_TAG, StockCount, StockReconciliation, build_stock_adjustment};
pub use transfer::{InternalTransfer, build_internal_transfer};
