// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Distribution visualization for generator output.
//!
//! Bulk-generates floats, validates the [0, 1) output contract, bins
//! the values into an ASCII histogram, checks bucket uniformity with a
//! chi-squared test and rasterizes a prefix of the stream as grayscale
//! noise for visual inspection.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::rngs::UnitRng;

/// Floats generated per visualized variant.
pub const NUM_FLOATS: usize = 4_000_000;
/// Histogram bucket count.
pub const VIZ_RESOLUTION: usize = 50;
pub const IMAGE_WIDTH: usize = 640;
pub const IMAGE_HEIGHT: usize = 480;

const MAX_BAR_WIDTH: usize = 80;
// A uniform bucket prints at half the maximum bar width.
const TARGET_OF_MAX: usize = 2;

/// Histogram of a value stream plus its summary figures.
pub struct Distribution {
    pub counts: Vec<usize>,
    pub total: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Fill a buffer with `count` floats from `rng`, batch by batch.
/// `count` must be an exact multiple of the generator's batch size.
pub fn bulk_generate(rng: &mut dyn UnitRng, count: usize) -> Vec<f64> {
    let batch = rng.batch_size();
    assert_eq!(
        count % batch,
        0,
        "count must be an exact multiple of the batch size"
    );
    let mut values = vec![0.0f64; count];
    for chunk in values.chunks_exact_mut(batch) {
        rng.generate(chunk);
    }
    values
}

/// Bin `values` into equal-width unit-range buckets.
///
/// Every value is validated against the half-open output contract. A
/// violation is a defect in the named generator and panics loudly.
pub fn bin_distribution(name: &str, values: &[f64], resolution: usize) -> Distribution {
    let mut counts = vec![0usize; resolution];
    let mut total = 0.0f64;
    let mut min = 2.0f64;
    let mut max = -2.0f64;
    for &value in values {
        assert!(
            (0.0..1.0).contains(&value),
            "{} produced out-of-range value {}",
            name,
            value
        );
        total += value;
        min = min.min(value);
        max = max.max(value);
        counts[(value * resolution as f64) as usize] += 1;
    }
    Distribution {
        counts,
        total: values.len(),
        mean: total / values.len() as f64,
        min,
        max,
    }
}

/// Print the histogram scaled so a uniform bucket maps to a 40-star bar.
pub fn print_histogram(dist: &Distribution) {
    println!(
        "Mean: {:.8} Min: {:.8} Max: {:.8}",
        dist.mean, dist.min, dist.max
    );
    let scale = ((dist.total / dist.counts.len()) * TARGET_OF_MAX) / MAX_BAR_WIDTH;
    for (bucket, &count) in dist.counts.iter().enumerate() {
        println!("{}\t:{}", bucket, "*".repeat(count / scale.max(1)));
    }
    println!();
}

/// Chi-squared uniformity check over the bucket counts.
/// Returns the statistic and its p-value.
pub fn uniformity_check(dist: &Distribution) -> (f64, f64) {
    let expected = dist.total as f64 / dist.counts.len() as f64;
    let mut chi_squared = 0.0f64;
    for &count in &dist.counts {
        chi_squared += (count as f64 - expected).powi(2) / expected;
    }
    let chi_squared_dist = ChiSquared::new((dist.counts.len() - 1) as f64).unwrap();
    let p = 1.0 - chi_squared_dist.cdf(chi_squared);
    (chi_squared, p)
}

/// Reinterpret a float stream prefix as grayscale pixel intensities.
/// The stream must hold at least `width * height` values.
pub fn render_noise_image(values: &[f64], width: usize, height: usize) -> Vec<u8> {
    assert!(values.len() >= width * height);
    values[..width * height]
        .iter()
        .map(|&v| (255.99 * v) as u8)
        .collect()
}
