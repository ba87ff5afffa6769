use serde::{Deserialize, Serialize};

use khata_core::{DomainError, DomainResult, ValueObject};

use crate::mul_bp;

/// Flat tax rate in basis points (18% = 1800 bp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    pub fn from_bp(bp: u32) -> DomainResult<Self> {
        if bp > 10_000 {
            return Err(DomainError::validation("tax rate above 100%"));
        }
        Ok(Self(bp))
    }

    pub fn gst_5() -> Self {
        Self(500)
    }

    pub fn gst_12() -> Self {
        Self(1_200)
    }

    pub fn gst_18() -> Self {
        Self(1_800)
    }

    pub fn gst_28() -> Self {
        Self(2_800)
    }

    pub fn bp(self) -> u32 {
        self.0
    }

    /// CGST/SGST each carry half the rate on intra-state supplies.
    pub fn half_bp(self) -> u32 {
        self.0 / 2
    }
}

/// Where the supply crosses a state border: inter-state supplies charge the
/// full rate as IGST, intra-state supplies split it evenly across CGST and
/// SGST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxSplit {
    InterState,
    IntraState,
}

/// Tax components for one taxable amount.
///
/// Each component is rounded on its own (the intra-state halves are computed
/// from the half rate), so `cgst + sgst` can differ from the inter-state
/// figure by one paise on odd amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakup {
    pub taxable: i64,
    pub igst: i64,
    pub cgst: i64,
    pub sgst: i64,
    pub total: i64,
}

impl TaxBreakup {
    pub fn apply(taxable: i64, rate: TaxRate, split: TaxSplit) -> Self {
        let (igst, cgst, sgst) = match split {
            TaxSplit::InterState => (mul_bp(taxable, rate.bp()), 0, 0),
            TaxSplit::IntraState => {
                let half = mul_bp(taxable, rate.half_bp());
                (0, half, half)
            }
        };
        Self {
            taxable,
            igst,
            cgst,
            sgst,
            total: taxable + igst + cgst + sgst,
        }
    }

    pub fn tax(&self) -> i64 {
        self.igst + self.cgst + self.sgst
    }
}

impl ValueObject for TaxBreakup {}
