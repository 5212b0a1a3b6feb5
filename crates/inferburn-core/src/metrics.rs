use serde::{Deserialize, Serialize};

/// Column order used when a record is flattened for a result table.
pub const METRIC_NAMES: &[&str] = &[
    "iterations_num",
    "execution_time",
    "first_inference_time",
    "latency_avg",
    "latency_median",
    "latency_std",
    "latency_max",
    "latency_min",
    "latency_per_token",
    "num_tokens",
    "min_num_tokens",
    "max_num_tokens",
    "batch_throughput",
    "throughput",
];

/// Performance metrics of one test. Fields that do not apply to the test's
/// mode (or could not be computed) are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub iterations_num: Option<u64>,
    pub execution_time: Option<f64>,
    pub first_inference_time: Option<f64>,
    pub latency_avg: Option<f64>,
    pub latency_median: Option<f64>,
    pub latency_std: Option<f64>,
    pub latency_max: Option<f64>,
    pub latency_min: Option<f64>,
    pub latency_per_token: Option<f64>,
    pub num_tokens: Option<f64>,
    pub min_num_tokens: Option<u64>,
    pub max_num_tokens: Option<u64>,
    pub batch_throughput: Option<f64>,
    pub throughput: Option<f64>,
}

impl MetricsRecord {
    /// Name/value pairs in `METRIC_NAMES` order.
    pub fn values(&self) -> Vec<(&'static str, Option<f64>)> {
        let as_f64 = |v: Option<u64>| v.map(|n| n as f64);
        let values = [
            as_f64(self.iterations_num),
            self.execution_time,
            self.first_inference_time,
            self.latency_avg,
            self.latency_median,
            self.latency_std,
            self.latency_max,
            self.latency_min,
            self.latency_per_token,
            self.num_tokens,
            as_f64(self.min_num_tokens),
            as_f64(self.max_num_tokens),
            self.batch_throughput,
            self.throughput,
        ];
        METRIC_NAMES.iter().copied().zip(values).collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
