use serde::{Deserialize, Serialize};

use crate::Concurrency;

/// Descriptive statistics for one (page, engine) sample bucket. All latencies are milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub trimmed_mean: u64,
    pub median: u64,
    /// Late-run over early-run trimmed mean. `None` when the early slice averaged zero.
    pub drift_ratio: Option<f64>,
    pub mean: u64,
    /// Mean of the fastest 10% of samples.
    pub top10: u64,
    /// Mean of the slowest 10% of samples.
    pub bottom10: u64,
    pub max: u64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BucketStats {
    Measured(Summary),
    /// Every task for this bucket failed.
    NoData,
}

impl BucketStats {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            BucketStats::Measured(s) => Some(s),
            BucketStats::NoData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketReport {
    pub engine: String,
    pub stats: BucketStats,
    pub failures: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub page: String,
    /// One entry per engine, in workload order.
    pub engines: Vec<BucketReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineTotals {
    pub engine: String,
    /// Wall-clock time from the first admission until the last completion.
    pub elapsed_ms: u64,
    pub tasks: u64,
    pub failures: u64,
}

impl EngineTotals {
    pub fn ms_per_task(&self) -> f64 {
        if self.tasks == 0 {
            return 0.0;
        }
        self.elapsed_ms as f64 / self.tasks as f64
    }

    pub fn failure_rate(&self) -> f64 {
        if self.tasks == 0 {
            return 0.0;
        }
        self.failures as f64 / self.tasks as f64
    }
}

/// Finished results for one concurrency level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub concurrency: Concurrency,
    pub pages: Vec<PageReport>,
    pub totals: Vec<EngineTotals>,
}

impl Report {
    pub fn bucket(&self, page: &str, engine: &str) -> Option<&BucketReport> {
        self.pages
            .iter()
            .find(|p| p.page == page)?
            .engines
            .iter()
            .find(|b| b.engine == engine)
    }

    pub fn totals_for(&self, engine: &str) -> Option<&EngineTotals> {
        self.totals.iter().find(|t| t.engine == engine)
    }

    pub fn tasks_total(&self) -> u64 {
        self.totals.iter().map(|t| t.tasks).sum()
    }

    pub fn failures_total(&self) -> u64 {
        self.totals.iter().map(|t| t.failures).sum()
    }
}
