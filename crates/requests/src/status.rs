use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult};

macro_rules! impl_transition {
    ($t:ty) => {
        impl $t {
            /// Validate a status change against the transition table.
            pub fn transition(self, to: Self) -> DomainResult<Self> {
                if self.can_transition(to) {
                    Ok(to)
                } else {
                    Err(DomainError::conflict(format!(
                        "illegal status transition {self:?} -> {to:?}"
                    )))
                }
            }
        }
    };
}

/// Lifecycle for payable requests (reimbursements, salary advances, supplier
/// advances/GRN settlements, customer refunds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRequestStatus {
    Pending,
    Approved,
    Paid,
    Rejected,
}

impl PaymentRequestStatus {
    pub fn can_transition(self, to: Self) -> bool {
        use PaymentRequestStatus::*;
        matches!(
            (self, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Paid)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }
}

impl_transition!(PaymentRequestStatus);

/// Lifecycle for purchase requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl PurchaseRequestStatus {
    pub fn can_transition(self, to: Self) -> bool {
        use PurchaseRequestStatus::*;
        matches!((self, to), (Pending, Approved) | (Pending, Rejected))
    }
}

impl_transition!(PurchaseRequestStatus);

/// Lifecycle for sales-order cancellation: a cancellation request can be
/// granted or withdrawn back to `Ordered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrderStatus {
    Ordered,
    CancellationRequested,
    Canceled,
}

impl SalesOrderStatus {
    pub fn can_transition(self, to: Self) -> bool {
        use SalesOrderStatus::*;
        matches!(
            (self, to),
            (Ordered, CancellationRequested)
                | (CancellationRequested, Canceled)
                | (CancellationRequested, Ordered)
        )
    }
}

impl_transition!(SalesOrderStatus);

/// Lifecycle for referral records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Credited,
}

impl ReferralStatus {
    pub fn can_transition(self, to: Self) -> bool {
        matches!((self, to), (Self::Pending, Self::Credited))
    }
}

impl_transition!(ReferralStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_request_cannot_skip_approval() {
        let err = PaymentRequestStatus::Pending
            .transition(PaymentRequestStatus::Paid)
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let approved = PaymentRequestStatus::Pending
            .transition(PaymentRequestStatus::Approved)
            .unwrap();
        assert_eq!(approved.transition(PaymentRequestStatus::Paid).unwrap(), PaymentRequestStatus::Paid);
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for to in [
            PaymentRequestStatus::Pending,
            PaymentRequestStatus::Approved,
            PaymentRequestStatus::Paid,
            PaymentRequestStatus::Rejected,
        ] {
            assert!(PaymentRequestStatus::Paid.transition(to).is_err());
            assert!(PaymentRequestStatus::Rejected.transition(to).is_err());
        }
    }

    #[test]
    fn cancellation_request_can_be_withdrawn() {
        let requested = SalesOrderStatus::Ordered
            .transition(SalesOrderStatus::CancellationRequested)
            .unwrap();
        assert!(requested.transition(SalesOrderStatus::Ordered).is_ok());
        assert!(requested.transition(SalesOrderStatus::Canceled).is_ok());
        assert!(SalesOrderStatus::Canceled.transition(SalesOrderStatus::Ordered).is_err());
    }

    #[test]
    fn purchase_request_has_no_paid_state() {
        assert!(PurchaseRequestStatus::Pending.transition(PurchaseRequestStatus::Approved).is_ok());
        assert!(PurchaseRequestStatus::Approved.transition(PurchaseRequestStatus::Rejected).is_err());
    }
}
