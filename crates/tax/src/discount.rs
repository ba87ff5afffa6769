use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult};

use crate::mul_bp;

/// A discount: percentage (basis points) or a flat amount in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discount {
    Percent(u32),
    Flat(i64),
}

impl Discount {
    pub fn none() -> Self {
        Discount::Flat(0)
    }

    /// The discount value carved off `amount`. A flat discount is capped at
    /// the amount itself.
    pub fn amount_off(self, amount: i64) -> i64 {
        match self {
            Discount::Percent(bp) => mul_bp(amount, bp),
            Discount::Flat(flat) => flat.min(amount),
        }
    }

    /// `amount` after the discount.
    pub fn apply_to(self, amount: i64) -> i64 {
        amount - self.amount_off(amount)
    }
}

/// `total × part / whole`, rounded half away from zero. Used for the
/// goods-return share of an original line discount.
pub fn pro_rata(total: i64, part: i64, whole: i64) -> DomainResult<i64> {
    if whole <= 0 {
        return Err(DomainError::validation("pro-rata whole must be positive"));
    }
    if part < 0 || part > whole {
        return Err(DomainError::validation(
            "pro-rata part must be within 0..=whole",
        ));
    }
    let num = total as i128 * part as i128;
    let den = whole as i128;
    let half = den / 2;
    let rounded = if num >= 0 {
        (num + half) / den
    } else {
        (num - half) / den
    };
    Ok(rounded as i64)
}
