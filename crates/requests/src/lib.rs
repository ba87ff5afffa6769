//! Request documents and their status lifecycles.
//!
//! Every request type carries a tagged-status enum with an explicit
//! transition table, validated at the write boundary. An illegal jump is a
//! `Conflict`, not a greyed-out button.

pub mod payment;
pub mod status;

pub use payment::{PartyRef, PaymentKind, PaymentRequest, PurchaseRequest, Referral, SalesOrder};
pub use status::{
    PaymentRequestStatus, PurchaseRequestStatus, ReferralStatus, SalesOrderStatus,
};
