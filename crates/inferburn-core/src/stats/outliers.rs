//! Sample filtering applied before any latency statistics are computed.
//!
//! Two passes exist and they are deliberately independent:
//! - `filter_valid` drops samples below a minimum valid duration, keeping
//!   token counts index-aligned with their samples.
//! - `three_sigma` drops samples outside `mean ± 3 * std_dev` (population
//!   standard deviation). It is applied once and never iterated, so for
//!   small sample sizes an extreme value can survive.

use crate::{InferBurnError, Result};

use super::summary::{mean, std_dev};

/// Drop every sample strictly below `min_time`. When token counts are
/// given they are removed together with their sample.
pub fn filter_valid(
    times: &[f64],
    tokens: Option<&[u64]>,
    min_time: f64,
) -> Result<(Vec<f64>, Option<Vec<u64>>)> {
    let Some(tokens) = tokens else {
        let valid = times.iter().copied().filter(|t| *t >= min_time).collect();
        return Ok((valid, None));
    };

    if tokens.len() != times.len() {
        return Err(InferBurnError::LengthMismatch {
            times: times.len(),
            tokens: tokens.len(),
        });
    }

    let (valid_times, valid_tokens): (Vec<f64>, Vec<u64>) = times
        .iter()
        .copied()
        .zip(tokens.iter().copied())
        .filter(|(t, _)| *t >= min_time)
        .unzip();

    Ok((valid_times, Some(valid_tokens)))
}

/// Keep the samples within three population standard deviations of the
/// mean, in their original order.
pub fn three_sigma(samples: &[f64]) -> Vec<f64> {
    let (Some(avg), Some(sigma)) = (mean(samples), std_dev(samples)) else {
        return Vec::new();
    };
    let lower = avg - 3.0 * sigma;
    let upper = avg + 3.0 * sigma;

    samples
        .iter()
        .copied()
        .filter(|s| lower <= *s && *s <= upper)
        .collect()
}
