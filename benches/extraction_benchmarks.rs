//! Performance benchmarks for roster extraction and derivation.
//!
//! Covers the hot paths of a batch run:
//! - Extracting one month-long roster grid
//! - Deduplicating shifts gathered from many documents
//! - Deriving work hours, payroll and sales from a canonical set
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use roster_ingest::config::{ConfigLoader, RosterConfig};
use roster_ingest::extract::{Grid, TableExtractor};
use roster_ingest::models::{DocumentMeta, ShiftRecord};
use roster_ingest::normalize::StoreResolver;
use roster_ingest::pipeline::{CanonicalShiftSet, DerivedDatasets, SeededVariance, StaffDirectory};

const WEEKDAYS: [&str; 7] = ["水", "木", "金", "土", "日", "月", "火"];

fn load_config() -> RosterConfig {
    ConfigLoader::builtin()
        .expect("Failed to load config")
        .into_config()
}

fn meta(config: &RosterConfig, store: &str) -> DocumentMeta {
    DocumentMeta::from_stem(
        &format!("ROSTER_20251001-20251031_{}", store),
        &config.extraction().fallback,
    )
}

/// Creates a 31-day roster with `staff` columns.
fn create_month_grid(staff: usize) -> Grid {
    let mut header = vec!["日付".to_string()];
    header.extend((0..staff).map(|i| {
        if i % 4 == 0 {
            format!("スタッフ{}(社員)", i)
        } else {
            format!("スタッフ{}", i)
        }
    }));

    let mut rows = vec![header];
    for day in 1..=31 {
        let mut row = vec![format!("10/{}({})", day, WEEKDAYS[(day - 1) % 7])];
        row.extend((0..staff).map(|i| match (day + i) % 5 {
            0 => "/".to_string(),
            1 => "渋谷9:00〜13:00".to_string(),
            2 => "9:00〜13:00 18:00〜22:00".to_string(),
            3 => "10:00〜19:00".to_string(),
            _ => String::new(),
        }));
        rows.push(row);
    }
    Grid::new(rows)
}

/// Extracts the same roster under several store names, so later
/// documents duplicate earlier ones.
fn create_batch_records(config: &RosterConfig, documents: usize) -> Vec<ShiftRecord> {
    let extractor = TableExtractor::new(config).expect("Failed to build extractor");
    let grid = create_month_grid(12);
    let stores = ["Atelier", "Stand+Banh+Mi", "Stand+Bo+Bun", "COME"];

    (0..documents)
        .flat_map(|i| extractor.extract_grid(&grid, &meta(config, stores[i % stores.len()])))
        .collect()
}

/// Benchmark: one month-long roster grid.
fn bench_extract_grid(c: &mut Criterion) {
    let config = load_config();
    let extractor = TableExtractor::new(&config).expect("Failed to build extractor");
    let meta = meta(&config, "Stand+Banh+Mi");

    let mut group = c.benchmark_group("extract_grid");
    for staff in [4, 12, 30] {
        let grid = create_month_grid(staff);
        group.throughput(Throughput::Elements((staff * 31) as u64));
        group.bench_with_input(BenchmarkId::new("staff", staff), &grid, |b, grid| {
            b.iter(|| black_box(extractor.extract_grid(black_box(grid), &meta)))
        });
    }
    group.finish();
}

/// Benchmark: deduplicating a batch of documents.
fn bench_dedup(c: &mut Criterion) {
    let config = load_config();
    let resolver = StoreResolver::new(config.stores());

    let mut group = c.benchmark_group("dedup");
    for documents in [1, 10, 50] {
        let records = create_batch_records(&config, documents);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("documents", documents),
            &records,
            |b, records| {
                b.iter(|| black_box(CanonicalShiftSet::build(records.iter().cloned(), &resolver)))
            },
        );
    }
    group.finish();
}

/// Benchmark: synthetic derivation from a canonical set.
fn bench_derive(c: &mut Criterion) {
    let config = load_config();
    let resolver = StoreResolver::new(config.stores());
    let shifts =
        CanonicalShiftSet::build(create_batch_records(&config, 4), &resolver).into_records();

    let mut group = c.benchmark_group("derive");
    group.throughput(Throughput::Elements(shifts.len() as u64));
    group.bench_function("seeded", |b| {
        b.iter(|| {
            let mut variance = SeededVariance::new(7);
            let mut directory = StaffDirectory::empty();
            black_box(DerivedDatasets::derive(
                &shifts,
                &config,
                &mut directory,
                &mut variance,
            ))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_extract_grid, bench_dedup, bench_derive);
criterion_main!(benches);
