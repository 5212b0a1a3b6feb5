//! Basic summary statistics over timing samples.
//!
//! Every function returns `None` for an empty input instead of NaN.

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_dev(samples: &[f64]) -> Option<f64> {
    let avg = mean(samples)?;
    let variance = samples.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / samples.len() as f64;
    Some(variance.sqrt())
}

/// Median of the samples; the mean of the two middle values for even `n`.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn min(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::min)
}

pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().reduce(f64::max)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_population_std_dev() {
        // mean 5, squared deviations sum to 32 over 8 samples
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(std_dev(&samples), Some(2.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234567, 3), 1.235);
        assert_eq!(round_to(2.0, 5), 2.0);
        assert_eq!(round_to(-1.0, 3), -1.0);
    }
}
