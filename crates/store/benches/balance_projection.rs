use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{NaiveDate, TimeZone, Utc};

use khata_coa::{Chart, CoaLedger, LedgerDraft, LedgerType};
use khata_core::AccountNature;
use khata_journal::{JournalVoucher, VoucherEntry, compute_balances};

fn fixture(ledger_count: usize, voucher_count: usize) -> (Vec<CoaLedger>, Vec<JournalVoucher>) {
    let as_of = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let mut chart = Chart::new();
    let assets = chart
        .create_group("Assets", AccountNature::Asset, None)
        .unwrap();

    let ids: Vec<_> = (0..ledger_count)
        .map(|i| {
            chart
                .create_ledger(
                    LedgerDraft::new(
                        format!("Ledger {i}"),
                        assets,
                        AccountNature::Asset,
                        LedgerType::Bank,
                        as_of,
                    )
                    .with_opening(1_000_00, None),
                )
                .unwrap()
        })
        .collect();

    let vouchers: Vec<_> = (0..voucher_count)
        .map(|i| {
            let from = ids[i % ids.len()];
            let to = ids[(i + 1) % ids.len()];
            JournalVoucher::balanced(
                as_of + chrono::Days::new((i % 365) as u64),
                "bench transfer",
                vec![VoucherEntry::debit(to, 10_00), VoucherEntry::credit(from, 10_00)],
                Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, (i % 60) as u32).unwrap(),
            )
            .unwrap()
        })
        .collect();

    (chart.ledgers().cloned().collect(), vouchers)
}

fn bench_compute_balances(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balances");
    for voucher_count in [100usize, 1_000, 10_000] {
        let (ledgers, vouchers) = fixture(50, voucher_count);
        group.throughput(Throughput::Elements(voucher_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(voucher_count),
            &voucher_count,
            |b, _| {
                b.iter(|| {
                    let balances = compute_balances(black_box(&ledgers), black_box(&vouchers));
                    black_box(balances)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compute_balances);
criterion_main!(benches);
