//! Shared GST and discount arithmetic.
//!
//! Every flow that charges tax or applies a discount (checkout, sales order,
//! credit note) goes through this one module, so the rounding rule cannot
//! drift between pages. The contract: amounts are i64 minor units, rates are
//! basis points, division rounds half away from zero at the paise.

pub mod discount;
pub mod gst;

pub use discount::{Discount, pro_rata};
pub use gst::{TaxBreakup, TaxRate, TaxSplit};

/// `amount × bp / 10_000`, rounded half away from zero.
///
/// i128 intermediates, so any realistic rupee amount is exact.
pub(crate) fn mul_bp(amount: i64, bp: u32) -> i64 {
    let num = amount as i128 * bp as i128;
    let den = 10_000i128;
    let half = den / 2;
    let rounded = if num >= 0 {
        (num + half) / den
    } else {
        (num - half) / den
    };
    rounded as i64
}
