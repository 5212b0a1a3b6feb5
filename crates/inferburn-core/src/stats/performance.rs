//! Latency and throughput metrics for sync and async execution.

use tracing::info;

use crate::{ExecutionMode, InferBurnError, MetricsRecord, Result};

use super::outliers::{filter_valid, three_sigma};
use super::summary::{max, mean, median, min, round_to, std_dev};

/// Decimal places for wall-time and throughput fields.
pub const TIME_PRECISION: i32 = 3;
/// Decimal places for latency fields.
pub const LATENCY_PRECISION: i32 = 5;

/// Element-wise `time / tokens`. Both sequences must be the same length and
/// every token count must be positive.
pub fn latency_per_token(times: &[f64], tokens: &[u64]) -> Result<Vec<f64>> {
    if times.len() != tokens.len() {
        return Err(InferBurnError::LengthMismatch {
            times: times.len(),
            tokens: tokens.len(),
        });
    }
    if let Some(index) = tokens.iter().position(|n| *n == 0) {
        return Err(InferBurnError::InvalidTokens { index });
    }
    Ok(times
        .iter()
        .zip(tokens)
        .map(|(t, n)| t / *n as f64)
        .collect())
}

/// Items per second for a single batch. A zero latency yields the `-1.0`
/// sentinel.
pub fn batch_throughput(batch_size: u32, latency: f64) -> f64 {
    if latency == 0.0 {
        return -1.0;
    }
    batch_size as f64 / latency
}

pub fn average_throughput(iterations: u64, batch_size: u32, total_time: f64) -> f64 {
    (iterations * batch_size as u64) as f64 / total_time
}

/// Metrics for a serialized workload where every request was timed.
///
/// `first_inference_time`, `iterations_num` and `execution_time` describe
/// the raw samples. Latency statistics use samples that passed the
/// `min_time` threshold and the three-sigma rule. Per-token latency is
/// filtered on its own, so its sample set may differ from the latency one.
pub fn compute_sync(
    batch_size: u32,
    raw_times: &[f64],
    min_time: f64,
    raw_tokens: Option<&[u64]>,
) -> Result<MetricsRecord> {
    let first_inference_time = raw_times.first().copied();
    let iterations_num = raw_times.len() as u64;
    let execution_time: f64 = raw_times.iter().sum();

    let (valid_times, valid_tokens) = filter_valid(raw_times, raw_tokens, min_time)?;

    let latency_per_token_median = match valid_tokens.as_deref() {
        Some(tokens) if !tokens.is_empty() => {
            let per_token = latency_per_token(&valid_times, tokens)?;
            median(&three_sigma(&per_token))
        }
        _ => None,
    };

    let times = three_sigma(&valid_times);
    let latency_median = median(&times);
    let total: f64 = times.iter().sum();
    let throughput = (!times.is_empty() && total != 0.0)
        .then(|| average_throughput(iterations_num, batch_size, total));

    let token_stats = raw_tokens.filter(|tokens| !tokens.is_empty()).map(|tokens| {
        let counts: Vec<f64> = tokens.iter().map(|n| *n as f64).collect();
        (
            median(&counts),
            tokens.iter().copied().min(),
            tokens.iter().copied().max(),
        )
    });
    let (num_tokens, min_num_tokens, max_num_tokens) = token_stats.unwrap_or((None, None, None));

    let latency = |v: Option<f64>| v.map(|x| round_to(x, LATENCY_PRECISION));
    let timing = |v: Option<f64>| v.map(|x| round_to(x, TIME_PRECISION));

    Ok(MetricsRecord {
        iterations_num: Some(iterations_num),
        execution_time: timing(Some(execution_time)),
        first_inference_time: latency(first_inference_time),
        latency_avg: latency(mean(&times)),
        latency_median: latency(latency_median),
        latency_std: latency(std_dev(&times)),
        latency_max: latency(max(&times)),
        latency_min: latency(min(&times)),
        latency_per_token: latency(latency_per_token_median),
        num_tokens,
        min_num_tokens,
        max_num_tokens,
        batch_throughput: timing(latency_median.map(|l| batch_throughput(batch_size, l))),
        throughput: timing(throughput),
    })
}

/// Metrics for an overlapped workload where only the total elapsed time
/// and the number of completed requests are known.
pub fn compute_async(total_inference_time: f64, batch_size: u32, iteration_count: u64) -> MetricsRecord {
    let average_time =
        (iteration_count != 0).then(|| total_inference_time / iteration_count as f64);
    let throughput = (total_inference_time != 0.0)
        .then(|| average_throughput(iteration_count, batch_size, total_inference_time));

    MetricsRecord {
        execution_time: Some(round_to(total_inference_time, TIME_PRECISION)),
        latency_avg: average_time.map(|t| round_to(t, LATENCY_PRECISION)),
        throughput: throughput.map(|t| round_to(t, TIME_PRECISION)),
        ..Default::default()
    }
}

pub fn log_performance_metrics(mode: ExecutionMode, record: &MetricsRecord) {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.3}"));

    info!("Average time of single pass : {}", fmt(record.latency_avg));
    info!("FPS : {}", fmt(record.throughput));
    if mode == ExecutionMode::Sync {
        info!("Latency : {}", fmt(record.latency_median));
        if record.latency_per_token.is_some() {
            info!("Latency per token : {}", fmt(record.latency_per_token));
        }
    }
}
