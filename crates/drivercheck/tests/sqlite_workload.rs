//! End-to-end workload tests against SQLite.

use drivercheck::{
    BenchConfig, BenchError, BenchmarkRunner, Dialect, Driver, DriverHandle, DriverRegistry,
    Materialization, Param, Phase, QueryCatalog, Report, SqliteDriver, StatementSet,
};

fn select_all(driver: &mut SqliteDriver) -> Vec<drivercheck::UserRow> {
    let statements = StatementSet::for_dialect(Dialect::Sqlite);
    driver.query(&statements.select, &[Param::Int(0)]).unwrap()
}

fn sqlite_config() -> BenchConfig {
    BenchConfig::default().with_drivers(["rusqlite"])
}

fn sqlite_driver(registry: &mut DriverRegistry) -> &mut SqliteDriver {
    match registry.connection_for("rusqlite").unwrap() {
        DriverHandle::Rusqlite(driver) => driver,
        #[allow(unreachable_patterns)]
        other => panic!("unexpected handle {other:?}"),
    }
}

#[test]
fn test_three_rows_in_id_order() {
    let catalog = QueryCatalog::standard();
    let config = sqlite_config().with_rows(3).with_iterations(2);
    let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
    let mut report = Report::new();

    BenchmarkRunner::from(&config)
        .run(&mut registry, &catalog, &mut report)
        .unwrap();

    let rows = select_all(sqlite_driver(&mut registry));
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let names: Vec<&str> = rows.iter().filter_map(|r| r.name.as_deref()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(names, vec!["name 0", "name 1", "name 2"]);
    assert!(rows.iter().all(|r| r.created_at.is_some()));
}

#[test]
fn test_report_has_insert_and_select() {
    let catalog = QueryCatalog::standard();
    let config = sqlite_config().with_rows(10).with_iterations(4);
    let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
    let mut report = Report::new();

    BenchmarkRunner::from(&config)
        .run(&mut registry, &catalog, &mut report)
        .unwrap();

    let samples = report.samples();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].label(), "rusqlite insert");
    assert_eq!(samples[0].operations, 10);
    assert_eq!(samples[1].label(), "rusqlite select");
    assert_eq!(samples[1].operations, 4);
    assert_eq!(samples[1].materialization, Materialization::Streaming);
}

#[test]
fn test_second_run_resets_table() {
    let catalog = QueryCatalog::standard();
    let config = sqlite_config().with_rows(5).with_iterations(1);
    let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
    let runner = BenchmarkRunner::from(&config);

    runner
        .run(&mut registry, &catalog, &mut Report::new())
        .unwrap();
    runner
        .run(&mut registry, &catalog, &mut Report::new())
        .unwrap();

    let rows = select_all(sqlite_driver(&mut registry));
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].id, 1);
}

#[test]
fn test_update_phase_renames_rows() {
    let catalog = QueryCatalog::standard();
    let config = sqlite_config()
        .with_rows(3)
        .with_iterations(1)
        .with_update(true);
    let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
    let mut report = Report::new();

    BenchmarkRunner::from(&config)
        .run(&mut registry, &catalog, &mut report)
        .unwrap();

    assert_eq!(report.samples()[2].phase, Phase::Update);
    let names: Vec<String> = select_all(sqlite_driver(&mut registry))
        .into_iter()
        .filter_map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["name 0 updated", "name 1 updated", "name 2 updated"]);
}

#[test]
fn test_file_backed_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drivercheck.db");
    let catalog = QueryCatalog::standard();
    let config = sqlite_config()
        .with_sqlite_path(&path)
        .with_rows(20)
        .with_iterations(1);

    for _ in 0..2 {
        let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
        BenchmarkRunner::from(&config)
            .run(&mut registry, &catalog, &mut Report::new())
            .unwrap();
    }

    let mut driver = SqliteDriver::open(&path).unwrap();
    assert_eq!(select_all(&mut driver).len(), 20);
}

#[test]
fn test_unknown_driver_reported_without_connecting() {
    let catalog = QueryCatalog::standard();
    let config = sqlite_config().with_drivers(["oracle"]);

    assert!(matches!(
        catalog.statements_for("oracle"),
        Err(BenchError::UnknownDriver(_))
    ));
    match DriverRegistry::connect(&config, &catalog) {
        Err(BenchError::UnknownDriver(name)) => assert_eq!(name, "oracle"),
        other => panic!("expected UnknownDriver, got {other:?}"),
    }
}

#[test]
fn test_existing_foreign_table_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");
    {
        let mut driver = SqliteDriver::open(&path).unwrap();
        driver
            .execute("create table users(legacy text)", &[])
            .unwrap();
    }

    let catalog = QueryCatalog::standard();
    let config = sqlite_config()
        .with_sqlite_path(&path)
        .with_rows(2)
        .with_iterations(1);
    let mut registry = DriverRegistry::connect(&config, &catalog).unwrap();
    BenchmarkRunner::from(&config)
        .run(&mut registry, &catalog, &mut Report::new())
        .unwrap();

    assert_eq!(select_all(sqlite_driver(&mut registry)).len(), 2);
}

#[test]
fn test_failing_driver_stops_later_drivers() {
    let sqlite = StatementSet::for_dialect(Dialect::Sqlite);
    let broken = StatementSet {
        insert: "insert into nope(name, created_at) values (?, ?)".into(),
        ..sqlite.clone()
    };
    let catalog = QueryCatalog::new()
        .with_statements("good", sqlite.clone())
        .with_statements("bad", broken)
        .with_statements("later", sqlite);

    let mut registry = DriverRegistry::default();
    for name in ["good", "bad", "later"] {
        registry.insert(name, DriverHandle::Rusqlite(SqliteDriver::in_memory().unwrap()));
    }
    let mut report = Report::new();

    let err = BenchmarkRunner::new(3, 2)
        .run(&mut registry, &catalog, &mut report)
        .unwrap_err();

    match err {
        BenchError::Execution { driver, phase, .. } => {
            assert_eq!(driver, "bad");
            assert_eq!(phase, Phase::Insert);
        }
        other => panic!("expected Execution, got {other:?}"),
    }
    let labels: Vec<String> = report.samples().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["good insert", "good select"]);

    // `later` never had its table created.
    let later = match registry.connection_for("later").unwrap() {
        DriverHandle::Rusqlite(driver) => driver,
        #[allow(unreachable_patterns)]
        other => panic!("unexpected handle {other:?}"),
    };
    assert!(later.query("select * from users", &[]).is_err());
}
