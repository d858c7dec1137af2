use enginebench_common::{
    BucketReport, BucketStats, Concurrency, EngineTotals, PageReport, Report, Workload,
};

use crate::statistics;

#[derive(Debug, Default)]
struct Bucket {
    /// Successful latencies in completion order.
    samples: Vec<u64>,
    failures: u64,
}

/// Sample buckets and engine totals for a single concurrency level.
///
/// Consumed by [`RunContext::into_report`]; a new level always starts from a new context.
#[derive(Debug)]
pub struct RunContext {
    concurrency: Concurrency,
    page_names: Vec<String>,
    engine_names: Vec<String>,
    /// Indexed `[page][engine]`.
    buckets: Vec<Vec<Bucket>>,
    totals: Vec<Option<EngineTotals>>,
}

impl RunContext {
    pub fn new(workload: &Workload, concurrency: Concurrency) -> Self {
        let engines = workload.engines.len();
        Self {
            concurrency,
            page_names: workload.pages.iter().map(|p| p.name.clone()).collect(),
            engine_names: workload.engines.iter().map(|e| e.name.clone()).collect(),
            buckets: workload
                .pages
                .iter()
                .map(|_| (0..engines).map(|_| Bucket::default()).collect())
                .collect(),
            totals: vec![None; engines],
        }
    }

    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    pub fn record_success(&mut self, page: usize, engine: usize, elapsed_ms: u64) {
        self.buckets[page][engine].samples.push(elapsed_ms);
    }

    pub fn record_failure(&mut self, page: usize, engine: usize) {
        self.buckets[page][engine].failures += 1;
    }

    /// Samples recorded so far for one bucket, in completion order.
    pub fn samples(&self, page: usize, engine: usize) -> &[u64] {
        &self.buckets[page][engine].samples
    }

    pub fn failures(&self, page: usize, engine: usize) -> u64 {
        self.buckets[page][engine].failures
    }

    /// Close out an engine once every one of its tasks has been recorded.
    pub fn finish_engine(&mut self, engine: usize, elapsed_ms: u64, tasks: u64) {
        let failures = self.buckets.iter().map(|row| row[engine].failures).sum();
        self.totals[engine] = Some(EngineTotals {
            engine: self.engine_names[engine].clone(),
            elapsed_ms,
            tasks,
            failures,
        });
    }

    pub fn is_finished(&self, engine: usize) -> bool {
        self.totals[engine].is_some()
    }

    /// Reduce every bucket to its statistics. Engines that never finished are left out of the totals.
    pub fn into_report(self) -> Report {
        let engine_names = self.engine_names;
        let pages = self
            .page_names
            .into_iter()
            .zip(self.buckets)
            .map(|(page, row)| PageReport {
                page,
                engines: engine_names
                    .iter()
                    .zip(row)
                    .map(|(engine, bucket)| BucketReport {
                        engine: engine.clone(),
                        stats: match statistics::summarize(&bucket.samples) {
                            Ok(summary) => BucketStats::Measured(summary),
                            Err(_) => BucketStats::NoData,
                        },
                        failures: bucket.failures,
                    })
                    .collect(),
            })
            .collect();

        Report {
            concurrency: self.concurrency,
            pages,
            totals: self.totals.into_iter().flatten().collect(),
        }
    }
}
