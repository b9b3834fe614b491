//! drivercheck binary.

use clap::Parser;
use drivercheck::{
    create_formatter, Args, BenchConfig, BenchError, BenchmarkRunner, DriverRegistry,
    QueryCatalog, Report,
};
use tracing::info;

fn main() {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drivercheck=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let config = BenchConfig::from(&args);

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &BenchConfig) -> Result<(), BenchError> {
    config.validate()?;

    let catalog = QueryCatalog::standard();
    let mut registry = DriverRegistry::connect(config, &catalog)?;
    let runner = BenchmarkRunner::from(config);

    info!(
        drivers = ?config.drivers,
        rows = runner.rows(),
        iterations = runner.iterations(),
        "Starting benchmark"
    );

    let mut report = Report::new();
    let result = runner.run(&mut registry, &catalog, &mut report);

    // Print whatever completed, even when a later driver failed.
    if !report.is_empty() || result.is_ok() {
        println!("{}", create_formatter(config.format).format_report(&report));
    }
    result
}
