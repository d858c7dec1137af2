use enginebench_common::{BucketReport, BucketStats, Report};
use std::fmt::Write;

/// Receives each finished [`Report`] as soon as its concurrency level completes.
pub trait ReportSink {
    fn on_report(&mut self, report: &Report);

    /// Called once after the last level.
    fn on_complete(&mut self) {}
}

/// Prints a fixed-width table per page to stdout.
#[derive(Debug, Default)]
pub struct TableSink;

impl ReportSink for TableSink {
    fn on_report(&mut self, report: &Report) {
        println!("{}", render_table(report));
    }

    fn on_complete(&mut self) {
        println!("Done benchmarking");
    }
}

/// Prints one JSON document per level on its own line.
#[derive(Debug, Default)]
pub struct JsonSink;

impl ReportSink for JsonSink {
    fn on_report(&mut self, report: &Report) {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to serialise report"),
        }
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub reports: Vec<Report>,
    pub completed: bool,
}

impl ReportSink for CollectSink {
    fn on_report(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }

    fn on_complete(&mut self) {
        self.completed = true;
    }
}

const COLUMNS: [(&str, usize); 10] = [
    ("Engine", 15),
    ("Trimmed mean", 14),
    ("Median", 8),
    ("Drift", 7),
    ("Mean", 8),
    ("Top 10%", 9),
    ("Bottom 10%", 12),
    ("Max", 8),
    ("Sample size", 13),
    ("Failures", 10),
];

/// Render a report the way [`TableSink`] prints it.
pub fn render_table(report: &Report) -> String {
    let mut out = String::new();
    writeln!(out, "Statistics for {} simultaneous requests", report.concurrency).ok();
    for totals in &report.totals {
        writeln!(
            out,
            "Processing {} took {} ms ({:.2} ms per request, {} failed)",
            totals.engine,
            totals.elapsed_ms,
            totals.ms_per_task(),
            totals.failures,
        )
        .ok();
    }

    for page in &report.pages {
        writeln!(out).ok();
        writeln!(out, "{}", page.page).ok();
        let header: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();
        writeln!(out, "{}", row(&header)).ok();
        let rule: Vec<String> = COLUMNS.iter().map(|(_, width)| "-".repeat(*width)).collect();
        writeln!(out, "{}", rule.join(" ")).ok();
        for bucket in &page.engines {
            writeln!(out, "{}", row(&cells(bucket))).ok();
        }
    }
    out
}

fn cells(bucket: &BucketReport) -> Vec<String> {
    match &bucket.stats {
        BucketStats::Measured(s) => vec![
            bucket.engine.clone(),
            s.trimmed_mean.to_string(),
            s.median.to_string(),
            s.drift_ratio.map_or_else(|| "n/a".to_string(), |d| format!("{d:.2}")),
            s.mean.to_string(),
            s.top10.to_string(),
            s.bottom10.to_string(),
            s.max.to_string(),
            s.samples.to_string(),
            bucket.failures.to_string(),
        ],
        BucketStats::NoData => {
            let mut cells = vec![bucket.engine.clone(), "no data".to_string()];
            cells.extend(std::iter::repeat(String::new()).take(COLUMNS.len() - 4));
            cells.push("0".to_string());
            cells.push(bucket.failures.to_string());
            cells
        }
    }
}

/// First column left-aligned, the rest right-aligned.
fn row(cells: &[String]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .enumerate()
        .map(|(i, (cell, &(_, width)))| {
            if i == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}
