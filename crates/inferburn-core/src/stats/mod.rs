//! Statistics engine: sample filtering, summary statistics and
//! sync/async performance metrics.

pub mod outliers;
pub mod performance;
pub mod summary;

pub use outliers::{filter_valid, three_sigma};
pub use performance::{
    average_throughput, batch_throughput, compute_async, compute_sync, latency_per_token,
    log_performance_metrics,
};
pub use summary::{max, mean, median, min, round_to, std_dev};
