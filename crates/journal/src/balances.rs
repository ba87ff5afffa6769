//! Balance projection: a pure fold of opening balances plus date-ordered
//! journal entries. No hidden cache; recomputing from the same inputs always
//! yields the same map.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use khata_coa::CoaLedger;
use khata_core::{DrCr, LedgerId};

use crate::voucher::JournalVoucher;

/// Current signed balance (debit-positive) for every ledger in `ledgers`.
///
/// Vouchers fold in (date, created_at) order; ties beyond that keep input
/// order, so callers appending in insertion order get a stable chronology.
/// Entries referencing ledgers outside `ledgers` are skipped.
pub fn compute_balances(
    ledgers: &[CoaLedger],
    vouchers: &[JournalVoucher],
) -> BTreeMap<LedgerId, i64> {
    let mut balances: BTreeMap<LedgerId, i64> = ledgers
        .iter()
        .map(|l| (l.id, l.opening.signed()))
        .collect();

    let mut ordered: Vec<&JournalVoucher> = vouchers.iter().collect();
    ordered.sort_by_key(|v| (v.date(), v.created_at()));

    for voucher in ordered {
        for entry in voucher.entries() {
            if let Some(balance) = balances.get_mut(&entry.ledger_id) {
                *balance += entry.net();
            }
        }
    }

    balances
}

/// Signed balance of a single ledger over the full voucher set.
pub fn compute_balance(ledger: &CoaLedger, vouchers: &[JournalVoucher]) -> i64 {
    ledger.opening.signed()
        + vouchers
            .iter()
            .flat_map(|v| v.entries())
            .filter(|e| e.ledger_id == ledger.id)
            .map(|e| e.net())
            .sum::<i64>()
}

/// Signed balance of a ledger considering only vouchers dated on or before
/// `date`, the "closing balance available for the next voucher" figure.
pub fn balance_as_of(ledger: &CoaLedger, vouchers: &[JournalVoucher], date: NaiveDate) -> i64 {
    ledger.opening.signed()
        + vouchers
            .iter()
            .filter(|v| v.date() <= date)
            .flat_map(|v| v.entries())
            .filter(|e| e.ledger_id == ledger.id)
            .map(|e| e.net())
            .sum::<i64>()
}

/// Display form of a signed balance: non-negative amount plus side.
///
/// A zero balance reports on the ledger's normal side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub amount: i64,
    pub drcr: DrCr,
}

impl BalanceView {
    pub fn of(signed: i64, normal_balance: DrCr) -> Self {
        if signed > 0 {
            Self {
                amount: signed,
                drcr: DrCr::Dr,
            }
        } else if signed < 0 {
            Self {
                amount: -signed,
                drcr: DrCr::Cr,
            }
        } else {
            Self {
                amount: 0,
                drcr: normal_balance,
            }
        }
    }
}

/// One trial-balance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub ledger_id: LedgerId,
    pub name: String,
    pub balance: BalanceView,
}

/// All ledger balances side-by-side with their debit/credit column totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: i64,
    pub total_credit: i64,
}

impl TrialBalance {
    /// Debit-positive net across all ledgers. Posting preserves this figure
    /// (every voucher balances), so it always equals the net of the opening
    /// balances alone.
    pub fn net(&self) -> i64 {
        self.total_debit - self.total_credit
    }
}

pub fn trial_balance(ledgers: &[CoaLedger], vouchers: &[JournalVoucher]) -> TrialBalance {
    let balances = compute_balances(ledgers, vouchers);
    let mut rows = Vec::with_capacity(ledgers.len());
    let mut total_debit: i64 = 0;
    let mut total_credit: i64 = 0;

    let mut sorted: Vec<&CoaLedger> = ledgers.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for ledger in sorted {
        let signed = balances.get(&ledger.id).copied().unwrap_or(0);
        let view = BalanceView::of(signed, ledger.posting.normal_balance);
        match view.drcr {
            DrCr::Dr => total_debit += view.amount,
            DrCr::Cr => total_credit += view.amount,
        }
        rows.push(TrialBalanceRow {
            ledger_id: ledger.id,
            name: ledger.name.clone(),
            balance: view,
        });
    }

    TrialBalance {
        rows,
        total_debit,
        total_credit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use khata_coa::{Chart, LedgerDraft, LedgerType};
    use khata_core::AccountNature;
    use proptest::prelude::*;

    use crate::voucher::VoucherEntry;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn time(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, 0, 0).unwrap()
    }

    struct Fixture {
        chart: Chart,
        cash: LedgerId,
        bank: LedgerId,
    }

    fn fixture() -> Fixture {
        let mut chart = Chart::new();
        let assets = chart
            .create_group("Assets", AccountNature::Asset, None)
            .unwrap();
        let cash = chart
            .create_ledger(
                LedgerDraft::new("Cash", assets, AccountNature::Asset, LedgerType::Cash, date(1))
                    .with_opening(1_000_00, None),
            )
            .unwrap();
        let bank = chart
            .create_ledger(
                LedgerDraft::new("Bank", assets, AccountNature::Asset, LedgerType::Bank, date(1))
                    .with_opening(5_000_00, None),
            )
            .unwrap();
        Fixture { chart, cash, bank }
    }

    fn ledgers(f: &Fixture) -> Vec<CoaLedger> {
        f.chart.ledgers().cloned().collect()
    }

    fn transfer(f: &Fixture, d: u32, h: u32, amount: i64) -> JournalVoucher {
        JournalVoucher::balanced(
            date(d),
            "cash to bank",
            vec![
                VoucherEntry::debit(f.bank, amount),
                VoucherEntry::credit(f.cash, amount),
            ],
            time(h),
        )
        .unwrap()
    }

    #[test]
    fn balances_seed_from_openings_and_fold_entries() {
        let f = fixture();
        let vouchers = vec![transfer(&f, 2, 9, 300_00)];
        let balances = compute_balances(&ledgers(&f), &vouchers);

        assert_eq!(balances[&f.cash], 700_00);
        assert_eq!(balances[&f.bank], 5_300_00);
    }

    #[test]
    fn unreferenced_ledger_returns_opening_and_unknown_entries_are_skipped() {
        let f = fixture();
        let stray = JournalVoucher::balanced(
            date(3),
            "touches a deleted ledger",
            vec![
                VoucherEntry::debit(LedgerId::new(), 50),
                VoucherEntry::credit(LedgerId::new(), 50),
            ],
            time(10),
        )
        .unwrap();

        let balances = compute_balances(&ledgers(&f), &[stray]);
        assert_eq!(balances[&f.cash], 1_000_00);
        assert_eq!(balances[&f.bank], 5_000_00);
        assert_eq!(balances.len(), 2);
    }

    #[test]
    fn total_is_insensitive_to_input_order() {
        let f = fixture();
        let a = transfer(&f, 2, 9, 100_00);
        let b = transfer(&f, 2, 8, 200_00);
        let c = transfer(&f, 1, 23, 50_00);

        let fwd = compute_balances(&ledgers(&f), &[a.clone(), b.clone(), c.clone()]);
        let rev = compute_balances(&ledgers(&f), &[c, b, a]);
        assert_eq!(fwd, rev);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let f = fixture();
        let vouchers = vec![transfer(&f, 2, 9, 100_00), transfer(&f, 3, 9, 25_00)];
        let first = compute_balances(&ledgers(&f), &vouchers);
        let second = compute_balances(&ledgers(&f), &vouchers);
        assert_eq!(first, second);
    }

    #[test]
    fn balance_as_of_stops_at_the_date() {
        let f = fixture();
        let vouchers = vec![transfer(&f, 2, 9, 100_00), transfer(&f, 5, 9, 200_00)];
        let cash = f.chart.ledger(f.cash).unwrap();

        assert_eq!(balance_as_of(cash, &vouchers, date(1)), 1_000_00);
        assert_eq!(balance_as_of(cash, &vouchers, date(2)), 900_00);
        assert_eq!(balance_as_of(cash, &vouchers, date(30)), 700_00);
        assert_eq!(compute_balance(cash, &vouchers), 700_00);
    }

    #[test]
    fn reversal_restores_the_prior_balances() {
        let f = fixture();
        let original = transfer(&f, 2, 9, 300_00);
        let reversal = original.reversal(date(3), "reversal: wrong amount", time(10));

        let balances = compute_balances(&ledgers(&f), &[original, reversal]);
        assert_eq!(balances[&f.cash], 1_000_00);
        assert_eq!(balances[&f.bank], 5_000_00);
    }

    #[test]
    fn zero_balance_reports_on_the_normal_side() {
        let view = BalanceView::of(0, DrCr::Cr);
        assert_eq!(view.amount, 0);
        assert_eq!(view.drcr, DrCr::Cr);

        assert_eq!(BalanceView::of(-250, DrCr::Dr), BalanceView { amount: 250, drcr: DrCr::Cr });
        assert_eq!(BalanceView::of(250, DrCr::Cr), BalanceView { amount: 250, drcr: DrCr::Dr });
    }

    #[test]
    fn trial_balance_columns_match_when_openings_net_to_zero() {
        let mut chart = Chart::new();
        let assets = chart
            .create_group("Assets", AccountNature::Asset, None)
            .unwrap();
        let equity = chart
            .create_group("Equity", AccountNature::Equity, None)
            .unwrap();
        let cash = chart
            .create_ledger(
                LedgerDraft::new("Cash", assets, AccountNature::Asset, LedgerType::Cash, date(1))
                    .with_opening(10_000_00, None),
            )
            .unwrap();
        let capital = chart
            .create_ledger(
                LedgerDraft::new("Capital", equity, AccountNature::Equity, LedgerType::Other, date(1))
                    .with_opening(10_000_00, None),
            )
            .unwrap();

        let all: Vec<CoaLedger> = chart.ledgers().cloned().collect();
        let voucher = JournalVoucher::balanced(
            date(2),
            "drawings",
            vec![
                VoucherEntry::debit(capital, 1_000_00),
                VoucherEntry::credit(cash, 1_000_00),
            ],
            time(9),
        )
        .unwrap();

        let tb = trial_balance(&all, &[voucher]);
        assert_eq!(tb.total_debit, tb.total_credit);
        assert_eq!(tb.net(), 0);
        assert_eq!(tb.rows.len(), 2);
    }

    proptest! {
        /// Property: for any voucher set over one ledger, the projected
        /// balance equals opening + the signed sum of that ledger's entries,
        /// regardless of iteration order.
        #[test]
        fn fold_matches_direct_sum(
            amounts in prop::collection::vec((1i64..100_000i64, prop::bool::ANY), 0..20)
        ) {
            let f = fixture();
            let all = ledgers(&f);

            let mut expected: i64 = 1_000_00;
            let mut vouchers = Vec::new();
            for (i, (amount, debit_side)) in amounts.iter().enumerate() {
                let entries = if *debit_side {
                    expected += amount;
                    vec![
                        VoucherEntry::debit(f.cash, *amount),
                        VoucherEntry::credit(f.bank, *amount),
                    ]
                } else {
                    expected -= amount;
                    vec![
                        VoucherEntry::debit(f.bank, *amount),
                        VoucherEntry::credit(f.cash, *amount),
                    ]
                };
                vouchers.push(
                    JournalVoucher::balanced(
                        date(1 + (i as u32 % 28)),
                        "generated",
                        entries,
                        time((i % 24) as u32),
                    )
                    .unwrap(),
                );
            }

            let balances = compute_balances(&all, &vouchers);
            prop_assert_eq!(balances[&f.cash], expected);
        }
    }
}
