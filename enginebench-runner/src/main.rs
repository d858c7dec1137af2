use clap::{Parser, ValueEnum};
use enginebench_common::{BenchError, Concurrency, Report, Workload};
use enginebench_runner::{Benchmark, JsonSink, ReportSink, TableSink};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "enginebench", about = "Compare HTTP backends under controlled concurrency")]
struct Args {
    /// Path to a JSON workload file (engines, pages, options)
    #[arg(long)]
    workload: PathBuf,

    /// Comma-separated concurrency levels, run in the order given
    #[arg(long, default_value = "1,2,4,8")]
    levels: String,

    /// Override the workload's iteration count
    #[arg(long)]
    iterations: Option<u32>,

    /// Fail a request that takes longer than this many milliseconds
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Output format for reports
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Exit with status 1 if the fraction of failed tasks exceeds this
    #[arg(long, default_value_t = 0.01)]
    max_failure_rate: f64,
}

/// Forwards reports to the chosen output while tallying task outcomes.
struct CliSink {
    inner: Box<dyn ReportSink>,
    tasks: u64,
    failures: u64,
}

impl ReportSink for CliSink {
    fn on_report(&mut self, report: &Report) {
        self.tasks += report.tasks_total();
        self.failures += report.failures_total();
        self.inner.on_report(report);
    }

    fn on_complete(&mut self) {
        self.inner.on_complete();
    }
}

impl CliSink {
    fn failure_rate(&self) -> f64 {
        if self.tasks == 0 {
            return 0.0;
        }
        self.failures as f64 / self.tasks as f64
    }
}

fn load_workload(args: &Args) -> Result<Workload, BenchError> {
    let mut workload = Workload::from_path(&args.workload)?;
    if let Some(iterations) = args.iterations {
        workload.options.iterations = iterations;
    }
    if let Some(ms) = args.request_timeout_ms {
        workload.options.request_timeout_ms = Some(ms);
    }
    workload.validate()?;
    Ok(workload)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enginebench_runner=info,enginebench_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let workload = load_workload(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });
    let levels = Concurrency::parse_list(&args.levels).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });

    let inner: Box<dyn ReportSink> = match args.format {
        Format::Table => Box::new(TableSink),
        Format::Json => Box::new(JsonSink),
    };
    let mut sink = CliSink { inner, tasks: 0, failures: 0 };

    let mut benchmark = Benchmark::new(workload).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });
    if let Err(e) = benchmark.run_multiple(&levels, &mut sink).await {
        eprintln!("{e}");
        process::exit(3);
    }

    if sink.failure_rate() > args.max_failure_rate {
        eprintln!(
            "Failure rate {:.3}% exceeds threshold {:.3}%",
            sink.failure_rate() * 100.0,
            args.max_failure_rate * 100.0,
        );
        process::exit(1);
    }
}
