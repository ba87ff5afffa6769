//! Chart of accounts (hierarchical groups + leaf ledgers).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod chart;
pub mod group;
pub mod ledger;

pub use chart::{Chart, NodeRef, TreeNode};
pub use group::CoaGroup;
pub use ledger::{
    BankDetails, CoaLedger, LedgerDraft, LedgerStatus, LedgerType, OpeningBalance, PostingRules,
};
