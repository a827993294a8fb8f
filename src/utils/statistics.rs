//! Descriptive statistics over sample slices
//!
//! Helpers assume finite input. Callers that accept arbitrary signals check
//! finiteness first (see [`count_non_finite`]). Empty input yields `None`
//! wherever the statistic is undefined.

use std::cmp::Ordering;

use crate::config::constants::statistics::{LOWER_QUARTILE_PERCENT, UPPER_QUARTILE_PERCENT};

/// Arithmetic mean
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let n = data.len() as f64;
    let naive = data.iter().sum::<f64>() / n;
    if naive.is_finite() {
        return Some(naive);
    }

    // The running sum overflowed; average on max-abs-scaled samples instead
    let scale = max_abs(data)?;
    Some(scale * (data.iter().map(|&x| x / scale).sum::<f64>() / n))
}

/// Largest absolute sample
pub fn max_abs(data: &[f64]) -> Option<f64> {
    data.iter().map(|x| x.abs()).reduce(f64::max)
}

/// Root mean square, `sqrt(mean(x^2))`.
///
/// Samples are divided by their max-abs value before squaring, so neither
/// huge nor tiny finite inputs overflow or underflow to a degenerate result.
pub fn root_mean_square(data: &[f64]) -> Option<f64> {
    let scale = max_abs(data)?;
    if scale == 0.0 {
        return Some(0.0);
    }
    let scaled_power =
        data.iter().map(|&x| (x / scale).powi(2)).sum::<f64>() / data.len() as f64;
    Some(scale * scaled_power.sqrt())
}

/// Population standard deviation (divides by `n`), computed on deviations
/// scaled by their largest magnitude
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let mean = mean(data)?;
    let deviations: Vec<f64> = data.iter().map(|&x| x - mean).collect();
    root_mean_square(&deviations)
}

/// Smallest and largest sample
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    let first = *data.first()?;
    Some(
        data.iter()
            .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x))),
    )
}

/// Ascending copy of the input
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut values = data.to_vec();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values
}

/// Median; the mean of the two middle samples for even lengths
pub fn median(data: &[f64]) -> Option<f64> {
    median_of_sorted(&sorted(data))
}

fn median_of_sorted(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Percentile (0..=100) of already sorted data, interpolating linearly
/// between the two closest ranks.
pub fn percentile_of_sorted(values: &[f64], percent: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let rank = (percent.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * fraction)
}

/// Percentile (0..=100) with linear interpolation
pub fn percentile(data: &[f64], percent: f64) -> Option<f64> {
    percentile_of_sorted(&sorted(data), percent)
}

/// Unscaled median absolute deviation: `median(|x - median(x)|)`
pub fn median_absolute_deviation(data: &[f64]) -> Option<f64> {
    let center = median(data)?;
    let deviations: Vec<f64> = data.iter().map(|&x| (x - center).abs()).collect();
    median(&deviations)
}

/// Interquartile range `P75 - P25`
pub fn interquartile_range(data: &[f64]) -> Option<f64> {
    let values = sorted(data);
    let p25 = percentile_of_sorted(&values, LOWER_QUARTILE_PERCENT)?;
    let p75 = percentile_of_sorted(&values, UPPER_QUARTILE_PERCENT)?;
    Some(p75 - p25)
}

/// Number of NaN or infinite samples
pub fn count_non_finite(data: &[f64]) -> usize {
    data.iter().filter(|x| !x.is_finite()).count()
}
