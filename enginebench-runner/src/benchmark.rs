use enginebench_client::{timer_for, HttpTransport, Timer, Transport};
use enginebench_common::{Concurrency, Report, Result, Workload};
use std::sync::Arc;
use tracing::{debug, info};

use crate::calibration::Baseline;
use crate::context::RunContext;
use crate::scheduler::Scheduler;
use crate::sink::ReportSink;

/// Runs a workload at one or more concurrency levels.
///
/// Expected response lengths are calibrated on the first run and reused for every
/// later run on the same instance.
pub struct Benchmark {
    workload: Workload,
    transport: Arc<dyn Transport>,
    timer: Arc<dyn Timer>,
    baseline: Option<Baseline>,
}

impl Benchmark {
    /// Benchmark over HTTP, timed by the timer the workload selects.
    pub fn new(workload: Workload) -> Result<Self> {
        Ok(Self::with_transport(workload, Arc::new(HttpTransport::new()?)))
    }

    pub fn with_transport(workload: Workload, transport: Arc<dyn Transport>) -> Self {
        let timer = timer_for(workload.options.timer);
        Self { workload, transport, timer, baseline: None }
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Run every engine once at `concurrency` and reduce the samples to a report.
    pub async fn run_one(&mut self, concurrency: Concurrency) -> Result<Report> {
        self.transport.reserve_capacity(concurrency.get())?;

        let baseline = match self.baseline.take() {
            Some(baseline) => baseline,
            None => Baseline::calibrate(&self.workload, self.transport.as_ref()).await?,
        };
        let baseline = self.baseline.insert(baseline);

        info!(%concurrency, engines = self.workload.engines.len(), "level started");
        let mut ctx = RunContext::new(&self.workload, concurrency);
        let scheduler =
            Scheduler::new(&self.workload, baseline, self.transport.as_ref(), self.timer.as_ref());
        let settle = self.workload.options.settle_delay(concurrency);

        for engine in 0..self.workload.engines.len() {
            scheduler.run_engine(engine, &mut ctx).await;
            if !settle.is_zero() {
                debug!(settle_ms = settle.as_millis() as u64, "letting sockets settle");
                tokio::time::sleep(settle).await;
            }
        }

        let report = ctx.into_report();
        info!(
            %concurrency,
            tasks = report.tasks_total(),
            failures = report.failures_total(),
            "level finished"
        );
        Ok(report)
    }

    /// Run each level in order, one at a time, handing every report to `sink` as it finishes.
    ///
    /// The first fatal error stops the remaining levels and skips [`ReportSink::on_complete`].
    pub async fn run_multiple(
        &mut self,
        levels: &[Concurrency],
        sink: &mut dyn ReportSink,
    ) -> Result<()> {
        if let Some(peak) = levels.iter().max() {
            self.transport.reserve_capacity(peak.get())?;
        }

        for &level in levels {
            let report = self.run_one(level).await?;
            sink.on_report(&report);
        }

        sink.on_complete();
        Ok(())
    }
}
