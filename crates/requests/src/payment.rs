use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult, Entity, LedgerId, PartyId, RequestId, Versioned};

use crate::status::{
    PaymentRequestStatus, PurchaseRequestStatus, ReferralStatus, SalesOrderStatus,
};

/// What a payment request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Reimbursement,
    SupplierAdvance,
    SalaryAdvance,
    CustomerRefund,
}

/// Counterparty reference: the party and, when linked, its ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRef {
    pub party_id: PartyId,
    pub ledger_id: Option<LedgerId>,
}

impl PartyRef {
    /// The linked ledger, or `MissingLedger` when the party has none.
    pub fn require_ledger(&self) -> DomainResult<LedgerId> {
        self.ledger_id
            .ok_or_else(|| DomainError::missing_ledger(format!("party {}", self.party_id)))
    }
}

/// A payable request document (reimbursement, advance, refund, GRN
/// settlement). Status changes go through the transition table; the version
/// counts committed mutations for optimistic writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub id: RequestId,
    pub kind: PaymentKind,
    pub counterparty: PartyRef,
    /// Settlement amount in minor units.
    pub amount: i64,
    pub status: PaymentRequestStatus,
    pub version: u64,
}

impl PaymentRequest {
    pub fn new(kind: PaymentKind, counterparty: PartyRef, amount: i64) -> DomainResult<Self> {
        if amount <= 0 {
            return Err(DomainError::validation("request amount must be positive"));
        }
        Ok(Self {
            id: RequestId::new(),
            kind,
            counterparty,
            amount,
            status: PaymentRequestStatus::Pending,
            version: 0,
        })
    }

    pub fn set_status(&mut self, to: PaymentRequestStatus) -> DomainResult<()> {
        self.status = self.status.transition(to)?;
        Ok(())
    }
}

impl Entity for PaymentRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for PaymentRequest {
    fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}

/// A purchase request heading toward PO consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: RequestId,
    pub description: String,
    pub amount: i64,
    pub status: PurchaseRequestStatus,
    pub version: u64,
}

impl PurchaseRequest {
    pub fn new(description: impl Into<String>, amount: i64) -> DomainResult<Self> {
        if amount <= 0 {
            return Err(DomainError::validation("request amount must be positive"));
        }
        Ok(Self {
            id: RequestId::new(),
            description: description.into(),
            amount,
            status: PurchaseRequestStatus::Pending,
            version: 0,
        })
    }

    pub fn set_status(&mut self, to: PurchaseRequestStatus) -> DomainResult<()> {
        self.status = self.status.transition(to)?;
        Ok(())
    }
}

impl Entity for PurchaseRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for PurchaseRequest {
    fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}

/// A sales order, tracked here only for its cancellation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: RequestId,
    pub customer: PartyRef,
    pub total: i64,
    pub status: SalesOrderStatus,
    pub version: u64,
}

impl SalesOrder {
    pub fn new(customer: PartyRef, total: i64) -> DomainResult<Self> {
        if total <= 0 {
            return Err(DomainError::validation("order total must be positive"));
        }
        Ok(Self {
            id: RequestId::new(),
            customer,
            total,
            status: SalesOrderStatus::Ordered,
            version: 0,
        })
    }

    pub fn set_status(&mut self, to: SalesOrderStatus) -> DomainResult<()> {
        self.status = self.status.transition(to)?;
        Ok(())
    }
}

impl Entity for SalesOrder {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for SalesOrder {
    fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}

/// A referral record waiting for the referred customer's qualifying first
/// order. The commission is a flagged value only; no voucher is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    pub id: RequestId,
    pub referrer: PartyId,
    /// Mobile number of the referred customer, the lookup key.
    pub mobile: String,
    /// Commission percentage in basis points.
    pub pct_bp: u32,
    pub status: ReferralStatus,
    pub commission: Option<i64>,
    pub version: u64,
}

impl Referral {
    pub fn new(referrer: PartyId, mobile: impl Into<String>, pct_bp: u32) -> DomainResult<Self> {
        if pct_bp == 0 || pct_bp > 10_000 {
            return Err(DomainError::validation(
                "referral percentage must be within (0, 100]%",
            ));
        }
        Ok(Self {
            id: RequestId::new(),
            referrer,
            mobile: mobile.into(),
            pct_bp,
            status: ReferralStatus::Pending,
            commission: None,
            version: 0,
        })
    }

    pub fn credit(&mut self, commission: i64) -> DomainResult<()> {
        self.status = self.status.transition(ReferralStatus::Credited)?;
        self.commission = Some(commission);
        Ok(())
    }
}

impl Entity for Referral {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Versioned for Referral {
    fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }
}
