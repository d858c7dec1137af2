use enginebench_common::{BenchError, Result, Summary};

/// Below this many samples the trimmed mean falls back to the median.
pub const TRIM_MIN_SAMPLES: usize = 4;

/// Upper bound on the early and late slices compared by the drift ratio.
pub const DRIFT_WINDOW: usize = 8;

/// Reduce one bucket of latency samples, given in arrival order.
///
/// Returns [`BenchError::NoData`] for an empty bucket.
pub fn summarize(samples: &[u64]) -> Result<Summary> {
    // Drift depends on arrival order, so it is taken from the caller's slice
    // before anything is sorted.
    let drift_ratio = drift_ratio(samples);
    let sorted = Sorted::new(samples).ok_or(BenchError::NoData)?;

    Ok(Summary {
        trimmed_mean: sorted.trimmed_mean(),
        median: sorted.median(),
        drift_ratio,
        mean: sorted.mean(),
        top10: sorted.fastest_decile(),
        bottom10: sorted.slowest_decile(),
        max: sorted.max(),
        samples: samples.len(),
    })
}

/// Median, with an even count averaged and rounded half-up. `None` for no samples.
pub fn median(samples: &[u64]) -> Option<u64> {
    Sorted::new(samples).map(|s| s.median())
}

/// Arithmetic mean, rounded half-up. `None` for no samples.
pub fn mean(samples: &[u64]) -> Option<u64> {
    (!samples.is_empty()).then(|| mean_of(samples))
}

/// Mean of the middle half; the median below [`TRIM_MIN_SAMPLES`]. `None` for no samples.
pub fn trimmed_mean(samples: &[u64]) -> Option<u64> {
    Sorted::new(samples).map(|s| s.trimmed_mean())
}

/// Late-run trimmed mean over early-run trimmed mean, rounded to hundredths.
///
/// `samples` must be in arrival order. Each side covers `min(n / 2, DRIFT_WINDOW)`
/// samples, at least one. `None` when there are no samples or the early side
/// averages zero.
pub fn drift_ratio(samples: &[u64]) -> Option<f64> {
    let n = samples.len();
    let window = (n / 2).clamp(1, DRIFT_WINDOW);
    let early = Sorted::new(samples.get(..window)?)?.trimmed_mean();
    let late = Sorted::new(samples.get(n.checked_sub(window)?..)?)?.trimmed_mean();
    if early == 0 {
        return None;
    }
    Some((100.0 * late as f64 / early as f64).round() / 100.0)
}

/// Non-empty samples in ascending order. Every order statistic reads from here.
struct Sorted(Vec<u64>);

impl Sorted {
    fn new(samples: &[u64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        Some(Self(sorted))
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn median(&self) -> u64 {
        let n = self.len();
        let mid = n / 2;
        if n % 2 == 0 {
            let pair = self.0[mid - 1] as u128 + self.0[mid] as u128;
            ((pair + 1) / 2) as u64
        } else {
            self.0[mid]
        }
    }

    fn mean(&self) -> u64 {
        mean_of(&self.0)
    }

    fn trimmed_mean(&self) -> u64 {
        let n = self.len();
        if n < TRIM_MIN_SAMPLES {
            return self.median();
        }
        let quartile = n / 4;
        mean_of(&self.0[quartile..n - quartile])
    }

    fn decile(&self) -> usize {
        (self.len() / 10).max(1)
    }

    fn fastest_decile(&self) -> u64 {
        mean_of(&self.0[..self.decile()])
    }

    fn slowest_decile(&self) -> u64 {
        mean_of(&self.0[self.len() - self.decile()..])
    }

    fn max(&self) -> u64 {
        self.0[self.len() - 1]
    }
}

/// Rounded-half-up mean of a non-empty slice.
fn mean_of(samples: &[u64]) -> u64 {
    let n = samples.len() as u128;
    let total: u128 = samples.iter().map(|&s| s as u128).sum();
    ((2 * total + n) / (2 * n)) as u64
}
