use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::{BenchError, Result, DEFAULT_ITERATIONS, WINDOWS_SETTLE_MS_PER_SLOT};

/// One backend under comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: String,
    /// Base URL; page paths are appended verbatim.
    pub url: String,
}

impl Engine {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }

    /// Full URL of `page` on this engine.
    pub fn url_for(&self, page: &Page) -> String {
        format!("{}{}", self.url, page.path)
    }
}

/// One logical request type, issued against every engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    pub path: String,
    /// Copies of this page per iteration of the mixture.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Engine name → expected body length. Missing entries are filled in by calibration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expected_lengths: BTreeMap<String, usize>,
}

fn default_weight() -> u32 {
    1
}

impl Page {
    pub fn new(name: impl Into<String>, path: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            weight,
            expected_lengths: BTreeMap::new(),
        }
    }

    /// Supply the baseline length for `engine` up front instead of calibrating it.
    pub fn with_expected_length(mut self, engine: impl Into<String>, len: usize) -> Self {
        self.expected_lengths.insert(engine.into(), len);
        self
    }
}

/// Which clock measures request latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKind {
    /// Monotonic clock; immune to wall-clock adjustments.
    #[default]
    Monotonic,
    /// System wall clock, millisecond resolution.
    WallClock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub iterations: u32,
    pub timer: TimerKind,
    /// Requests still outstanding after this long count as failed tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    /// Pause after each engine drains, multiplied by the concurrency level.
    pub settle_ms_per_slot: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            timer: TimerKind::default(),
            request_timeout_ms: None,
            settle_ms_per_slot: if cfg!(windows) { WINDOWS_SETTLE_MS_PER_SLOT } else { 0 },
        }
    }
}

impl RunOptions {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn settle_delay(&self, concurrency: Concurrency) -> Duration {
        Duration::from_millis(self.settle_ms_per_slot.saturating_mul(concurrency.get() as u64))
    }
}

/// Maximum number of simultaneously outstanding requests against one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Concurrency(usize);

impl Concurrency {
    pub fn new(level: usize) -> Result<Self> {
        if level == 0 {
            return Err(BenchError::Configuration(
                "concurrency level must be at least 1; 0 passed".to_string(),
            ));
        }
        Ok(Self(level))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Parse a comma-separated list such as `1,2,4,8`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        let levels = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Self>>>()?;
        if levels.is_empty() {
            return Err(BenchError::Configuration("no concurrency levels given".to_string()));
        }
        Ok(levels)
    }
}

impl FromStr for Concurrency {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let level = s.parse::<usize>().map_err(|_| {
            BenchError::Configuration(format!(
                "concurrency level must be a positive integer; {s:?} passed"
            ))
        })?;
        Self::new(level)
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The full benchmark definition. Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub engines: Vec<Engine>,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub options: RunOptions,
}

impl Workload {
    pub fn new(engines: Vec<Engine>, pages: Vec<Page>, options: RunOptions) -> Result<Self> {
        let workload = Self { engines, pages, options };
        workload.validate()?;
        Ok(workload)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let workload: Self = serde_json::from_str(json)
            .map_err(|e| BenchError::Configuration(format!("malformed workload: {e}")))?;
        workload.validate()?;
        Ok(workload)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn engine(&self, name: &str) -> Option<&Engine> {
        self.engines.iter().find(|e| e.name == name)
    }

    pub fn page(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Sum of page weights: tasks per iteration of the mixture.
    pub fn total_weight(&self) -> u64 {
        self.pages.iter().map(|p| p.weight as u64).sum()
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(BenchError::Configuration(msg));

        if self.engines.is_empty() {
            return invalid("workload defines no engines".to_string());
        }
        if self.pages.is_empty() {
            return invalid("workload defines no pages".to_string());
        }
        if self.options.iterations == 0 {
            return invalid("iterations must be at least 1".to_string());
        }

        let mut seen = HashSet::new();
        for engine in &self.engines {
            if engine.name.is_empty() {
                return invalid("engine name must not be empty".to_string());
            }
            if !seen.insert(engine.name.as_str()) {
                return invalid(format!("duplicate engine {:?}", engine.name));
            }
            if !(engine.url.starts_with("http://") || engine.url.starts_with("https://")) {
                return invalid(format!(
                    "engine {:?} has unsupported url {:?}",
                    engine.name, engine.url
                ));
            }
        }

        let mut seen = HashSet::new();
        for page in &self.pages {
            if page.name.is_empty() {
                return invalid("page name must not be empty".to_string());
            }
            if !seen.insert(page.name.as_str()) {
                return invalid(format!("duplicate page {:?}", page.name));
            }
            if page.weight == 0 {
                return invalid(format!("page {:?} must have weight of at least 1", page.name));
            }
            if let Some(unknown) = page.expected_lengths.keys().find(|e| self.engine(e).is_none()) {
                return invalid(format!(
                    "page {:?} has an expected length for unknown engine {:?}",
                    page.name, unknown
                ));
            }
        }

        Ok(())
    }
}
