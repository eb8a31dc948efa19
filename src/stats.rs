// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Statistical summary of benchmark timing results.
//!
//! Durations arrive grouped into rounds of samples. Every per-round
//! figure is finalized before any cross-round aggregate is computed,
//! and rounds whose deviation stands out are rejected wholesale so a
//! single noisy round cannot distort the final numbers.

/// A round's deviation must stay within this multiple of the mean
/// per-round deviation or the whole round is discarded as an outlier.
pub const OUTLIER_DEVIATION_FACTOR: f64 = 3.0;

/// Summary of one round of timed samples.
#[derive(Debug, Clone, Copy)]
pub struct RoundStats {
    pub mean: f64,
    pub min: u64,
    pub max: u64,
    /// Sample variance (N-1 denominator), since each round samples an
    /// underlying population rather than enumerating it.
    pub variance: f64,
    pub deviation: f64,
    /// max - min within the round.
    pub range: u64,
}

/// Cross-round aggregate over the outlier-filtered rounds.
#[derive(Debug, Clone, Copy)]
pub struct Aggregate {
    pub avg_duration: f64,
    pub avg_min_duration: f64,
    pub avg_variance: f64,
    pub max_deviation_range: u64,
    pub variance_of_variances: f64,
    pub variance_deviation: f64,
}

/// Full result of [`calculate_variance_info`].
#[derive(Debug, Clone)]
pub struct VarianceInfo {
    pub rounds: Vec<RoundStats>,
    /// Variance of per-round minimums, computed before filtering.
    pub variance_of_mins: f64,
    pub num_outliers: usize,
    /// `None` when every round was rejected as an outlier. The empty
    /// result is reported as such, never computed over zero rounds.
    pub aggregate: Option<Aggregate>,
}

/// Arithmetic mean. The sample set must not be empty.
pub fn calculate_mean(values: &[u64]) -> f64 {
    assert!(!values.is_empty());
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

fn calculate_mean_f(values: &[f64]) -> f64 {
    assert!(!values.is_empty());
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance of `values` around `mean`. With `from_partial_samples` the
/// denominator is N-1 (sample variance); otherwise N (population).
/// Single-element and empty inputs have zero variance.
pub fn calculate_variance(values: &[u64], mean: f64, from_partial_samples: bool) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let squared_totals: f64 = values
        .iter()
        .map(|&v| {
            let difference = v as f64 - mean;
            difference * difference
        })
        .sum();
    let denom = if from_partial_samples {
        values.len() - 1
    } else {
        values.len()
    };
    squared_totals / denom as f64
}

fn calculate_variance_f(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let squared_totals: f64 = values
        .iter()
        .map(|&v| {
            let difference = v - mean;
            difference * difference
        })
        .sum();
    squared_totals / values.len() as f64
}

/// Summarize one round of sample durations.
pub fn round_stats(durations: &[u64]) -> RoundStats {
    assert!(!durations.is_empty());
    let mut total: u64 = 0;
    let mut min = u64::MAX;
    let mut max = 0u64;
    for &duration in durations {
        total += duration;
        min = min.min(duration);
        max = max.max(duration);
    }
    let mean = total as f64 / durations.len() as f64;
    let variance = calculate_variance(durations, mean, true);
    RoundStats {
        mean,
        min,
        max,
        variance,
        deviation: variance.sqrt(),
        range: max - min,
    }
}

/// Aggregate the surviving rounds, or report an explicitly empty result
/// when nothing survived the outlier filter.
fn aggregate_rounds(filtered: &[RoundStats]) -> Option<Aggregate> {
    if filtered.is_empty() {
        return None;
    }
    let avg_duration = calculate_mean_f(&filtered.iter().map(|r| r.mean).collect::<Vec<_>>());
    let mins: Vec<u64> = filtered.iter().map(|r| r.min).collect();
    let variances: Vec<f64> = filtered.iter().map(|r| r.variance).collect();
    let avg_variance = calculate_mean_f(&variances);
    let variance_of_variances = calculate_variance_f(&variances, avg_variance);
    Some(Aggregate {
        avg_duration,
        avg_min_duration: calculate_mean(&mins),
        avg_variance,
        max_deviation_range: filtered.iter().map(|r| r.range).max().unwrap_or(0),
        variance_of_variances,
        variance_deviation: variance_of_variances.sqrt(),
    })
}

/// Compute per-round statistics for each round of durations, reject the
/// outlier rounds and aggregate the rest.
pub fn calculate_variance_info(durations: &[Vec<u64>]) -> VarianceInfo {
    assert!(!durations.is_empty());
    let rounds: Vec<RoundStats> = durations.iter().map(|round| round_stats(round)).collect();

    let mins: Vec<u64> = rounds.iter().map(|r| r.min).collect();
    let variance_of_mins = calculate_variance(&mins, calculate_mean(&mins), false);

    let deviation_spread = rounds.iter().map(|r| r.deviation).sum::<f64>() / rounds.len() as f64;
    let limit = OUTLIER_DEVIATION_FACTOR * deviation_spread;
    let filtered: Vec<RoundStats> = rounds
        .iter()
        .copied()
        .filter(|r| r.deviation <= limit)
        .collect();
    let num_outliers = rounds.len() - filtered.len();

    VarianceInfo {
        rounds,
        variance_of_mins,
        num_outliers,
        aggregate: aggregate_rounds(&filtered),
    }
}
