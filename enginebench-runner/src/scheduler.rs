use enginebench_client::{fetch, Timer, Transport};
use enginebench_common::{BenchError, Result, Workload};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::calibration::Baseline;
use crate::context::RunContext;
use crate::mixture;

/// Drives one engine's task list with a hard cap on outstanding requests.
pub struct Scheduler<'a> {
    workload: &'a Workload,
    baseline: &'a Baseline,
    transport: &'a dyn Transport,
    timer: &'a dyn Timer,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        workload: &'a Workload,
        baseline: &'a Baseline,
        transport: &'a dyn Transport,
        timer: &'a dyn Timer,
    ) -> Self {
        Self { workload, baseline, transport, timer }
    }

    /// Run every task for `engine` at the context's concurrency level.
    ///
    /// At most `concurrency` requests are outstanding at once; a completion admits
    /// the next queued task. Returns once every task has been recorded in `ctx`.
    pub async fn run_engine(&self, engine: usize, ctx: &mut RunContext) {
        let concurrency = ctx.concurrency();
        let limit = concurrency.get();
        let tasks = mixture::expand(&self.workload.pages, self.workload.options.iterations, concurrency);
        let task_count = tasks.len() as u64;
        let name = &self.workload.engines[engine].name;

        info!(engine = %name, %concurrency, tasks = task_count, "engine started");

        let mut queue = tasks.into_iter();
        let mut in_flight = FuturesUnordered::new();
        let run = self.timer.start();

        loop {
            while in_flight.len() < limit {
                let Some(page) = queue.next() else { break };
                in_flight.push(self.run_task(engine, page));
            }

            let Some((page, outcome)) = in_flight.next().await else { break };
            match outcome {
                Ok(elapsed_ms) => ctx.record_success(page, engine, elapsed_ms),
                Err(e) => {
                    warn!(engine = %name, page = %self.workload.pages[page].name, error = %e, "task failed");
                    ctx.record_failure(page, engine);
                }
            }
        }

        let elapsed_ms = run.elapsed_ms();
        ctx.finish_engine(engine, elapsed_ms, task_count);
        info!(engine = %name, %concurrency, elapsed_ms, "engine finished");
    }

    /// Time one request. Returns the page index with the latency, or the reason the task failed.
    async fn run_task(&self, engine: usize, page: usize) -> (usize, Result<u64>) {
        let url = self.workload.engines[engine].url_for(&self.workload.pages[page]);
        let expected = self.baseline.expected(page, engine);

        let stopwatch = self.timer.start();
        let response = fetch(self.transport, &url, self.workload.options.request_timeout()).await;
        let elapsed_ms = stopwatch.elapsed_ms();

        let outcome = response.and_then(|body| {
            if body.len() == expected {
                Ok(elapsed_ms)
            } else {
                Err(BenchError::LengthMismatch { expected, actual: body.len() })
            }
        });
        (page, outcome)
    }
}

