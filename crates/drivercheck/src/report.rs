//! Timing report and its output formats.

use clap::ValueEnum;
use comfy_table::{Cell, CellAlignment, Table};

use crate::runner::TimingSample;

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Timing samples in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct Report {
    samples: Vec<TimingSample>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: TimingSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Trait for formatting a report.
pub trait Formatter: Send + Sync {
    fn format_report(&self, report: &Report) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_report(&self, report: &Report) -> String {
        if report.is_empty() {
            return "No results".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec![
            "benchmark",
            "operations",
            "elapsed (s)",
            "ops/sec",
            "materialization",
        ]);

        for sample in report.samples() {
            table.add_row(vec![
                Cell::new(sample.label()),
                Cell::new(sample.operations).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.6}", sample.elapsed.as_secs_f64()))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format_rate(sample.ops_per_sec())).set_alignment(CellAlignment::Right),
                Cell::new(sample.materialization),
            ]);
        }

        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> String {
        let rows: Vec<serde_json::Value> = report
            .samples()
            .iter()
            .map(|sample| {
                serde_json::json!({
                    "driver": sample.driver,
                    "phase": sample.phase.as_str(),
                    "operations": sample.operations,
                    "elapsed_secs": sample.elapsed.as_secs_f64(),
                    "ops_per_sec": sample.ops_per_sec(),
                    "materialization": sample.materialization.to_string(),
                })
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_report(&self, report: &Report) -> String {
        let mut output = String::from("driver,phase,operations,elapsed_secs,ops_per_sec,materialization\n");
        for sample in report.samples() {
            output.push_str(&format!(
                "\"{}\",\"{}\",{},{:.6},{},\"{}\"\n",
                escape_csv(&sample.driver),
                sample.phase,
                sample.operations,
                sample.elapsed.as_secs_f64(),
                sample
                    .ops_per_sec()
                    .map(|rate| format!("{:.1}", rate))
                    .unwrap_or_default(),
                sample.materialization,
            ));
        }
        output
    }
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}", rate),
        None => "-".to_string(),
    }
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}
