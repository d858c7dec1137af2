pub mod benchmark;
pub mod calibration;
pub mod context;
pub mod mixture;
pub mod scheduler;
pub mod sink;
pub mod statistics;

pub use benchmark::Benchmark;
pub use sink::{CollectSink, JsonSink, ReportSink, TableSink};
