use enginebench_common::TimerKind;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of latency measurements.
pub trait Timer: Send + Sync {
    fn start(&self) -> Box<dyn Stopwatch>;
}

/// A running measurement started by [`Timer::start`].
pub trait Stopwatch: Send {
    /// Whole milliseconds since the stopwatch was started.
    fn elapsed_ms(&self) -> u64;
}

/// Monotonic timer backed by `tokio::time::Instant`, so paused test runtimes
/// produce exact, repeatable latencies.
pub struct MonotonicTimer;

struct MonotonicStopwatch(tokio::time::Instant);

impl Timer for MonotonicTimer {
    fn start(&self) -> Box<dyn Stopwatch> {
        Box::new(MonotonicStopwatch(tokio::time::Instant::now()))
    }
}

impl Stopwatch for MonotonicStopwatch {
    fn elapsed_ms(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

/// Wall-clock timer backed by `SystemTime`.
pub struct WallClockTimer;

struct WallClockStopwatch(u64);

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl Timer for WallClockTimer {
    fn start(&self) -> Box<dyn Stopwatch> {
        Box::new(WallClockStopwatch(unix_now_ms()))
    }
}

impl Stopwatch for WallClockStopwatch {
    fn elapsed_ms(&self) -> u64 {
        // The wall clock can step backwards.
        unix_now_ms().saturating_sub(self.0)
    }
}

pub fn timer_for(kind: TimerKind) -> Arc<dyn Timer> {
    match kind {
        TimerKind::Monotonic => Arc::new(MonotonicTimer),
        TimerKind::WallClock => Arc::new(WallClockTimer),
    }
}
