use enginebench_client::{fetch, Transport};
use enginebench_common::{BenchError, Result, Workload};
use tracing::{debug, info};

/// Expected body length of every (page, engine) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    /// Indexed `[page][engine]` in workload order.
    lengths: Vec<Vec<usize>>,
}

impl Baseline {
    /// Fill in every length the workload does not supply by fetching the page once.
    ///
    /// Probes run one at a time under the workload's request timeout. Any transport
    /// failure or expiry is fatal: without a baseline a task's response cannot be judged.
    pub async fn calibrate(workload: &Workload, transport: &dyn Transport) -> Result<Self> {
        let mut lengths = Vec::with_capacity(workload.pages.len());
        let mut probes = 0usize;
        let limit = workload.options.request_timeout();

        for page in &workload.pages {
            let mut row = Vec::with_capacity(workload.engines.len());
            for engine in &workload.engines {
                if let Some(&len) = page.expected_lengths.get(&engine.name) {
                    row.push(len);
                    continue;
                }

                let url = engine.url_for(page);
                let body = fetch(transport, &url, limit).await.map_err(|e| BenchError::Calibration {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
                debug!(page = %page.name, engine = %engine.name, bytes = body.len(), "calibrated");
                probes += 1;
                row.push(body.len());
            }
            lengths.push(row);
        }

        info!(probes, "baseline established");
        Ok(Self { lengths })
    }

    pub fn expected(&self, page: usize, engine: usize) -> usize {
        self.lengths[page][engine]
    }
}
