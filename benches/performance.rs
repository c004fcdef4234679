use chrono::{Duration, NaiveDate};
use closing_core::{
    config::Config,
    core::services::{ClosingDraft, ClosingService, DreService, RankingService},
    domain::{ClosingSnapshot, MovementCategory, MovementItem, MovementType, MonthYear, Store},
    utils::persistence::{load_snapshot_from_file, save_snapshot_to_file},
    ComparisonService,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn build_sample_snapshot(closing_count: usize) -> ClosingSnapshot {
    let mut snapshot = ClosingSnapshot::new();
    let sales =
        snapshot.add_movement_type(MovementType::new("Sales", MovementCategory::Revenue));
    let supplies =
        snapshot.add_movement_type(MovementType::new("Supplies", MovementCategory::Expense));
    let withdrawal =
        snapshot.add_movement_type(MovementType::new("Withdrawal", MovementCategory::Other));
    let stores: Vec<_> = (0..25)
        .map(|idx| snapshot.add_store(Store::new(format!("Store {idx}"))))
        .collect();

    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for idx in 0..closing_count {
        let store_id = stores[idx % stores.len()];
        let date = start_date + Duration::days((idx / stores.len() % 365) as i64);
        let movements = vec![
            MovementItem::new(sales, Decimal::new(50_000 + (idx % 977) as i64, 2))
                .with_discount(Decimal::new((idx % 13) as i64 * 100, 2)),
            MovementItem::new(supplies, Decimal::new(12_000 + (idx % 311) as i64, 2)),
            MovementItem::new(withdrawal, Decimal::new(5_000, 2)),
        ];
        let draft = ClosingDraft {
            store_id,
            closing_date: date,
            initial_balance: Decimal::new(20_000, 2),
            final_balance: Decimal::new(55_000, 2),
            movements,
            notes: None,
        };
        let registered = ClosingService::build(draft, &snapshot.movement_types);
        snapshot.add_closing(registered.closing);
    }
    snapshot
}

fn bench_reports(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let config = Config::default();
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let march = MonthYear::new(3, 2024).unwrap();

    c.bench_function("dre_month_10k", |b| {
        b.iter(|| {
            let report = DreService::build_report(&snapshot, start, end, None, &config);
            black_box(report);
        })
    });

    c.bench_function("month_over_month_10k", |b| {
        b.iter(|| {
            let report = ComparisonService::build_month_over_month(&snapshot, march, None, &config);
            black_box(report);
        })
    });

    c.bench_function("store_rankings_10k", |b| {
        b.iter(|| {
            let rankings = RankingService::build_rankings(&snapshot);
            black_box(rankings);
        })
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = build_sample_snapshot(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("snapshot.json");

    save_snapshot_to_file(&snapshot, &file_path).expect("seed");

    c.bench_function("snapshot_load_10k", |b| {
        b.iter(|| {
            let loaded = load_snapshot_from_file(&file_path).expect("load snapshot");
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_reports, bench_snapshot_io);
criterion_main!(benches);
