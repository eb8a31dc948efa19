// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Cycle-accurate latency benchmark for the generator family.
//!
//! The benchmarked callable fills a fixed eight-float buffer so every
//! variant is measured over the same amount of produced output. Timing
//! runs synchronously to completion; the results go through the outlier
//! rejecting summary in [`crate::stats`].

use std::hint::black_box;

use crate::stats::{self, VarianceInfo};
use crate::timing;

/// Samples per round.
pub const NUM_SAMPLES: usize = 100;
/// Rounds per result set.
pub const NUM_ROUNDS: usize = 1000;
/// Floats produced per benchmarked call.
pub const NUM_VALUES: usize = 8;

/// Time `NUM_ROUNDS` rounds of `NUM_SAMPLES` calls each and return the
/// per-round duration lists in cycles.
pub fn run_benchmark<F>(mut func: F) -> Vec<Vec<u64>>
where
    F: FnMut(&mut [f64; NUM_VALUES]),
{
    let mut durations: Vec<Vec<u64>> = Vec::with_capacity(NUM_ROUNDS);
    let mut values = [0.0f64; NUM_VALUES];

    timing::warmup();
    // One discarded call so the first timed sample sees warm caches
    // and a trained branch predictor.
    func(&mut values);
    black_box(&values);
    for _ in 0..NUM_ROUNDS {
        let mut round = Vec::with_capacity(NUM_SAMPLES);
        for _ in 0..NUM_SAMPLES {
            let begin = timing::start();
            func(&mut values);
            let end = timing::stop();
            // Keep the outputs observable so the call cannot be elided.
            black_box(&values);
            round.push(end.saturating_sub(begin));
        }
        durations.push(round);
    }
    durations
}

/// Benchmark `func` and reduce the measurements to a summary.
pub fn benchmark_summary<F>(func: F) -> VarianceInfo
where
    F: FnMut(&mut [f64; NUM_VALUES]),
{
    let durations = run_benchmark(func);
    stats::calculate_variance_info(&durations)
}

/// Print the summary block for one benchmarked callable.
pub fn print_summary(name: &str, info: &VarianceInfo) {
    println!("\n\n{}", name);
    println!("{}", "=".repeat(name.len()));
    let aggregate = match info.aggregate {
        Some(aggregate) => aggregate,
        None => {
            println!("All rounds were outliers. Results are empty!");
            return;
        }
    };
    println!("Benchmark Results:");
    println!("==================");
    println!("average duration: {:.2} cycles", aggregate.avg_duration);
    println!(
        "average min duration: {:.2} cycles",
        aggregate.avg_min_duration
    );
    println!();
    println!("Quality of Results:");
    println!("===================");
    println!(
        "number of outlier rounds removed: {} (from {})",
        info.num_outliers,
        info.rounds.len()
    );
    println!(
        "average variance: {:.2} (error: +/-{:.2} cycles)",
        aggregate.avg_variance,
        aggregate.avg_variance.sqrt()
    );
    println!(
        "absolute max deviation: {} cycles",
        aggregate.max_deviation_range
    );
    println!(
        "variance of variances: {:.2} (error: +/-{:.2} cycles)",
        aggregate.variance_of_variances, aggregate.variance_deviation
    );
    println!("variance of min values: {:.2}", info.variance_of_mins);
}
