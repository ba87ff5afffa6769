use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult};
use khata_requests::{Referral, ReferralStatus};
use khata_tax::Discount;

use crate::posting::{DocumentMutation, Posting};

/// A referred customer's qualifying first order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifyingOrder {
    pub mobile: String,
    /// Minor units.
    pub order_total: i64,
}

/// Match a pending referral by mobile and flag the commission on it.
///
/// No voucher is posted; the commission is tracked as a flagged value on
/// the referral record only, so the posting carries just the mutation.
pub fn build_referral_commission(
    order: &QualifyingOrder,
    referrals: &[Referral],
) -> DomainResult<Posting> {
    if order.order_total <= 0 {
        return Err(DomainError::validation("order total must be positive"));
    }

    let referral = referrals
        .iter()
        .find(|r| r.status == ReferralStatus::Pending && r.mobile == order.mobile)
        .ok_or(DomainError::NotFound)?;

    let commission = Discount::Percent(referral.pct_bp).amount_off(order.order_total);
    Ok(Posting {
        voucher: None,
        mutations: vec![DocumentMutation::ReferralCredited {
            referral_id: referral.id,
            commission,
            expected_version: referral.version,
        }],
        guards: Vec::new(),
    })
}
