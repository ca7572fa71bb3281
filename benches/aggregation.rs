use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finance_core::{
    core::services::{SummaryRequest, SummaryService},
    domain::{Entry, EntryKind, EntrySnapshot, NewEntry},
    engine::{aggregate_by_category, aggregate_by_work_period},
    storage::{EntryRepository, JsonEntryStore},
};
use tempfile::tempdir;

const CATEGORIES: [&str; 6] = ["Carne", "Gas", "Luz", "Ventas", "Bonos", "Otros"];

fn build_entries(count: usize) -> Vec<Entry> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let kind = EntryKind::ALL[idx % 3];
            Entry::new(
                kind,
                CATEGORIES[idx % CATEGORIES.len()],
                10.0 + (idx % 250) as f64,
                start + Duration::days((idx % 366) as i64),
            )
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let entries = build_entries(black_box(20_000));
    let anchor = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let snapshot = EntrySnapshot::new(entries.clone());

    c.bench_function("work_periods_20k", |b| {
        b.iter(|| black_box(aggregate_by_work_period(&entries, anchor)))
    });
    c.bench_function("categories_20k", |b| {
        b.iter(|| black_box(aggregate_by_category(&entries, EntryKind::Expense)))
    });
    c.bench_function("month_summary_20k", |b| {
        let request = SummaryRequest::month(anchor);
        b.iter(|| black_box(SummaryService::summarize(&snapshot, &request, anchor)))
    });
}

fn bench_store_load(c: &mut Criterion) {
    let dir = tempdir().expect("tempdir");
    let store = JsonEntryStore::new(dir.path().join("entries.json"));
    let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    for idx in 0..1_000 {
        store
            .create(NewEntry::new(EntryKind::Expense, "Gas", idx as f64, day))
            .expect("seed store");
    }

    c.bench_function("json_list_1k", |b| {
        b.iter(|| black_box(store.list().expect("list")))
    });
}

criterion_group!(benches, bench_engine, bench_store_load);
criterion_main!(benches);
