//! Output
//!
//! Event log files and batch statistics.

pub mod logger;
pub mod stats;

pub use logger::EventLogger;
pub use stats::{write_stats, BatchStats, StatsCollector};
