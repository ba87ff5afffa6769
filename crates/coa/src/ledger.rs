use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use khata_core::{
    AccountNature, DomainError, DomainResult, DrCr, Entity, GroupId, LedgerId, ValueObject,
    signed_amount,
};

/// Functional classification of a leaf account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerType {
    Bank,
    Cash,
    Receivable,
    Payable,
    Stock,
    Tax,
    Other,
}

/// Posting rules for a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRules {
    pub is_posting: bool,
    pub normal_balance: DrCr,
    pub allow_manual_journal: bool,
}

impl PostingRules {
    pub fn for_nature(nature: AccountNature) -> Self {
        Self {
            is_posting: true,
            normal_balance: nature.normal_balance(),
            allow_manual_journal: true,
        }
    }
}

impl ValueObject for PostingRules {}

/// Opening balance as of a cut-over date.
///
/// `amount` is non-negative minor units; the side is carried by `drcr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalance {
    pub amount: i64,
    pub drcr: DrCr,
    pub as_of: NaiveDate,
}

impl OpeningBalance {
    pub fn new(amount: i64, drcr: DrCr, as_of: NaiveDate) -> DomainResult<Self> {
        if amount < 0 {
            return Err(DomainError::validation(
                "opening balance amount must not be negative",
            ));
        }
        Ok(Self {
            amount,
            drcr,
            as_of,
        })
    }

    pub fn zero(nature: AccountNature, as_of: NaiveDate) -> Self {
        Self {
            amount: 0,
            drcr: nature.normal_balance(),
            as_of,
        }
    }

    /// Debit-positive signed amount.
    pub fn signed(&self) -> i64 {
        signed_amount(self.amount, self.drcr)
    }
}

impl ValueObject for OpeningBalance {}

/// Bank-specific sub-record for bank-type ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_holder: String,
    pub bank_name: String,
    pub ifsc: String,
    pub upi_id: Option<String>,
    /// Only the masked form is ever stored.
    pub masked_account_number: String,
}

impl ValueObject for BankDetails {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Active,
    Inactive,
}

/// Leaf account in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoaLedger {
    pub id: LedgerId,
    pub name: String,
    pub group_id: GroupId,
    pub nature: AccountNature,
    pub ledger_type: LedgerType,
    pub posting: PostingRules,
    pub opening: OpeningBalance,
    pub status: LedgerStatus,
    pub bank: Option<BankDetails>,
    /// Free-form labels, e.g. a physical cash-drawer location or the
    /// `stock-adjustment` marker the reconciliation builder looks up.
    pub tags: Vec<String>,
}

impl CoaLedger {
    pub fn is_active(&self) -> bool {
        self.status == LedgerStatus::Active
    }

    /// Active and posting-enabled.
    pub fn can_post(&self) -> bool {
        self.is_active() && self.posting.is_posting
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Entity for CoaLedger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input for `Chart::create_ledger`. The opening side defaults from the
/// nature when not explicit (asset/expense open Dr, the rest Cr).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDraft {
    pub name: String,
    pub group_id: GroupId,
    pub nature: AccountNature,
    pub ledger_type: LedgerType,
    pub opening_amount: i64,
    pub opening_drcr: Option<DrCr>,
    pub opening_as_of: NaiveDate,
    pub bank: Option<BankDetails>,
    pub tags: Vec<String>,
}

impl LedgerDraft {
    pub fn new(
        name: impl Into<String>,
        group_id: GroupId,
        nature: AccountNature,
        ledger_type: LedgerType,
        opening_as_of: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            group_id,
            nature,
            ledger_type,
            opening_amount: 0,
            opening_drcr: None,
            opening_as_of,
            bank: None,
            tags: Vec::new(),
        }
    }

    pub fn with_opening(mut self, amount: i64, drcr: Option<DrCr>) -> Self {
        self.opening_amount = amount;
        self.opening_drcr = drcr;
        self
    }

    pub fn with_bank(mut self, bank: BankDetails) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
