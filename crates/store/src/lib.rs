//! In-memory document store and the treasury facade.
//!
//! Intended for tests/dev and as the reference semantics for a real backend:
//! append-only voucher log, atomic multi-document commits, optimistic
//! version checks. Balances are recomputed per read through the pure
//! projection; there is no cache to invalidate.

pub mod collection;
pub mod error;
pub mod journal_log;
pub mod treasury;

pub use collection::Collection;
pub use error::{StoreError, StoreResult};
pub use journal_log::JournalLog;
pub use treasury::Treasury;
