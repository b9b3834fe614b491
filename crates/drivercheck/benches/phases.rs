//! Insert and select phase benchmarks against in-memory SQLite.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drivercheck::fixtures::{insert_params, select_params};
use drivercheck::{BenchmarkRunner, Dialect, Driver, Report, SqliteDriver, StatementSet};

fn prepared_driver(rows: usize) -> (SqliteDriver, StatementSet) {
    let statements = StatementSet::for_dialect(Dialect::Sqlite);
    let mut driver = SqliteDriver::in_memory().unwrap();
    BenchmarkRunner::new(0, 0)
        .reset_schema("rusqlite", &mut driver, &statements)
        .unwrap();
    for n in 0..rows {
        driver.execute(&statements.insert, &insert_params(n)).unwrap();
    }
    (driver, statements)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite/insert");
    let (mut driver, statements) = prepared_driver(0);

    group.bench_function("single_row", |b| {
        let mut n = 0;
        b.iter(|| {
            driver.execute(&statements.insert, &insert_params(n)).unwrap();
            n += 1;
        });
    });

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite/select");

    for rows in [10, 100, 1000] {
        let (mut driver, statements) = prepared_driver(rows);
        let params = select_params();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            b.iter(|| {
                let result = driver.query(&statements.select, &params).unwrap();
                black_box(result.len());
            });
        });
    }

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite/run_driver");
    group.sample_size(10);

    let statements = StatementSet::for_dialect(Dialect::Sqlite);
    let mut driver = SqliteDriver::in_memory().unwrap();
    let runner = BenchmarkRunner::new(1000, 100);

    group.bench_function("default_workload", |b| {
        b.iter(|| {
            let mut report = Report::new();
            runner
                .run_driver("rusqlite", &mut driver, &statements, &mut report)
                .unwrap();
            black_box(report.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_select, bench_full_run);
criterion_main!(benches);
