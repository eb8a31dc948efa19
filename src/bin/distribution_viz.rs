// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Histograms and noise images for every generator variant.

use velorand::rngs::{feistel, lcg, spn, ReferenceRand, UnitRng};
use velorand::simd;
use velorand::utils::write_gray_ppm;
use velorand::viz::{
    bin_distribution, bulk_generate, print_histogram, render_noise_image, uniformity_check,
    IMAGE_HEIGHT, IMAGE_WIDTH, NUM_FLOATS, VIZ_RESOLUTION,
};

fn visualize(name: &str, file_stem: &str, rng: &mut dyn UnitRng) -> std::io::Result<()> {
    println!("\n\n{}", name);
    println!("{}", "=".repeat(name.len()));
    let values = bulk_generate(rng, NUM_FLOATS);
    let dist = bin_distribution(name, &values, VIZ_RESOLUTION);
    print_histogram(&dist);
    let (chi_squared, p) = uniformity_check(&dist);
    println!("Bucket uniformity: chi2: {:.4}  p: {:.6}", chi_squared, p);

    let pixels = render_noise_image(&values, IMAGE_WIDTH, IMAGE_HEIGHT);
    let file_path = format!("{}.ppm", file_stem);
    write_gray_ppm(&file_path, IMAGE_WIDTH, IMAGE_HEIGHT, &pixels)?;
    println!("Wrote noise image: {}", file_path);
    Ok(())
}

fn main() -> std::io::Result<()> {
    if !simd::is_aes_capable() {
        eprintln!("AES instruction set not supported on this CPU. Terminating.");
        std::process::exit(1);
    }

    visualize("AesCounter", "aes_counter", &mut spn::AesCounter::new())?;
    visualize("LaneLcg4", "lane_lcg4", &mut lcg::LaneLcg4::new())?;
    visualize("LaneLcg8", "lane_lcg8", &mut lcg::LaneLcg8::new())?;
    visualize("Tea2", "tea2", &mut feistel::Tea2::new())?;
    visualize("Tea4", "tea4", &mut feistel::Tea4::new())?;
    visualize("ReferenceRand", "reference", &mut ReferenceRand::new())?;
    Ok(())
}
