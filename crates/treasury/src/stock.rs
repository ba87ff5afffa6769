use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use khata_coa::Chart;
use khata_core::{DomainError, DomainResult, LedgerId, ProductId};
use khata_journal::{JournalVoucher, VoucherEntry};

use crate::posting::Posting;

/// Tag marking the designated stock-adjustment ledger in the chart.
pub const STOCK_ADJUSTMENT_TAG: &str = "stock-adjustment";

/// Physical-vs-system count for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCount {
    pub product_id: ProductId,
    pub inventory_ledger_id: LedgerId,
    pub system_qty: i64,
    pub physical_qty: i64,
    /// Minor units per unit of stock.
    pub unit_cost: i64,
}

impl StockCount {
    /// Signed adjustment value: positive when the shelf holds more than the
    /// system thinks.
    fn adjustment_value(&self) -> DomainResult<i64> {
        let diff = self.physical_qty - self.system_qty;
        diff.checked_mul(self.unit_cost)
            .ok_or_else(|| DomainError::validation("stock adjustment value overflows"))
    }
}

/// One reconciliation run over any number of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReconciliation {
    pub counts: Vec<StockCount>,
    pub date: NaiveDate,
    pub now: DateTime<Utc>,
}

/// Build the multi-line adjustment voucher for a reconciliation run: one
/// line per affected inventory ledger (debit on increase, credit on
/// decrease) and one balancing line against the stock-adjustment ledger for
/// the net total.
pub fn build_stock_adjustment(event: &StockReconciliation, chart: &Chart) -> DomainResult<Posting> {
    let adjustment_ledger = chart
        .find_ledger_by_tag(STOCK_ADJUSTMENT_TAG)
        .ok_or_else(|| {
            DomainError::configuration(format!(
                "no ledger tagged '{STOCK_ADJUSTMENT_TAG}' in the chart"
            ))
        })?
        .id;

    let mut entries = Vec::new();
    let mut net: i64 = 0;
    for count in &event.counts {
        if count.unit_cost < 0 {
            return Err(DomainError::validation("unit cost must not be negative"));
        }
        let value = count.adjustment_value()?;
        if value == 0 {
            continue;
        }
        chart.active_posting_ledger(count.inventory_ledger_id)?;
        if value > 0 {
            entries.push(VoucherEntry::debit(count.inventory_ledger_id, value));
        } else {
            entries.push(VoucherEntry::credit(count.inventory_ledger_id, -value));
        }
        net += value;
    }

    if entries.is_empty() {
        return Err(DomainError::validation("no stock differences to adjust"));
    }

    // Balancing line for the net total; omitted when increases and
    // decreases cancel exactly.
    if net > 0 {
        entries.push(VoucherEntry::credit(adjustment_ledger, net));
    } else if net < 0 {
        entries.push(VoucherEntry::debit(adjustment_ledger, -net));
    }

    let voucher = JournalVoucher::balanced(
        event.date,
        "Stock reconciliation adjustment",
        entries,
        event.now,
    )?;
    Ok(Posting::voucher_only(voucher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use khata_coa::{LedgerDraft, LedgerType};
    use khata_core::AccountNature;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 18, 0, 0).unwrap()
    }

    fn fixture() -> (Chart, LedgerId, LedgerId) {
        let mut chart = Chart::new();
        let assets = chart
            .create_group("Assets", AccountNature::Asset, None)
            .unwrap();
        let inventory = chart
            .create_ledger(LedgerDraft::new(
                "Finished Goods",
                assets,
                AccountNature::Asset,
                LedgerType::Stock,
                date(),
            ))
            .unwrap();
        let expenses = chart
            .create_group("Expenses", AccountNature::Expense, None)
            .unwrap();
        let adjustment = chart
            .create_ledger(
                LedgerDraft::new(
                    "Stock Adjustment",
                    expenses,
                    AccountNature::Expense,
                    LedgerType::Other,
                    date(),
                )
                .with_tag(STOCK_ADJUSTMENT_TAG),
            )
            .unwrap();
        (chart, inventory, adjustment)
    }

    fn count(ledger: LedgerId, system: i64, physical: i64, unit_cost: i64) -> StockCount {
        StockCount {
            product_id: ProductId::new(),
            inventory_ledger_id: ledger,
            system_qty: system,
            physical_qty: physical,
            unit_cost,
        }
    }

    #[test]
    fn shortage_credits_inventory_and_debits_adjustment() {
        // Physical 45 vs system 50 at Rs 20/unit: Rs 100 shortage.
        let (chart, inventory, adjustment) = fixture();
        let event = StockReconciliation {
            counts: vec![count(inventory, 50, 45, 20_00)],
            date: date(),
            now: now(),
        };

        let posting = build_stock_adjustment(&event, &chart).unwrap();
        let voucher = posting.voucher.unwrap();
        assert_eq!(
            voucher.entries(),
            &[
                VoucherEntry::credit(inventory, 100_00),
                VoucherEntry::debit(adjustment, 100_00),
            ]
        );
        assert_eq!(voucher.debit_total(), voucher.credit_total());
    }

    #[test]
    fn surplus_debits_inventory() {
        let (chart, inventory, adjustment) = fixture();
        let event = StockReconciliation {
            counts: vec![count(inventory, 10, 12, 50_00)],
            date: date(),
            now: now(),
        };

        let voucher = build_stock_adjustment(&event, &chart).unwrap().voucher.unwrap();
        assert_eq!(
            voucher.entries(),
            &[
                VoucherEntry::debit(inventory, 100_00),
                VoucherEntry::credit(adjustment, 100_00),
            ]
        );
    }

    #[test]
    fn zero_difference_lines_are_dropped() {
        let (chart, inventory, _) = fixture();
        let event = StockReconciliation {
            counts: vec![count(inventory, 50, 50, 20_00)],
            date: date(),
            now: now(),
        };
        let err = build_stock_adjustment(&event, &chart).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn missing_adjustment_ledger_is_a_configuration_error() {
        let mut chart = Chart::new();
        let assets = chart
            .create_group("Assets", AccountNature::Asset, None)
            .unwrap();
        let inventory = chart
            .create_ledger(LedgerDraft::new(
                "Finished Goods",
                assets,
                AccountNature::Asset,
                LedgerType::Stock,
                date(),
            ))
            .unwrap();

        let event = StockReconciliation {
            counts: vec![count(inventory, 50, 45, 20_00)],
            date: date(),
            now: now(),
        };
        let err = build_stock_adjustment(&event, &chart).unwrap_err();
        assert!(matches!(err, DomainError::Configuration(_)));
    }

    #[test]
    fn offsetting_lines_need_no_balancing_entry() {
        let (mut chart, inventory, _) = fixture();
        let assets = chart.ledger(inventory).unwrap().group_id;
        let raw = chart
            .create_ledger(LedgerDraft::new(
                "Raw Material",
                assets,
                AccountNature::Asset,
                LedgerType::Stock,
                date(),
            ))
            .unwrap();

        let event = StockReconciliation {
            counts: vec![count(inventory, 10, 15, 20_00), count(raw, 15, 10, 20_00)],
            date: date(),
            now: now(),
        };
        let voucher = build_stock_adjustment(&event, &chart).unwrap().voucher.unwrap();
        assert_eq!(voucher.entries().len(), 2);
        assert_eq!(voucher.debit_total(), 100_00);
        assert_eq!(voucher.credit_total(), 100_00);
    }
}
