// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Latency benchmark over the baseline and every generator variant.
//!
//! Each benchmarked call fills the same eight-float buffer, so the
//! narrower variants are called repeatedly to match the output amount.

#[cfg(target_arch = "x86_64")]
fn main() {
    use velorand::bench::{benchmark_summary, print_summary, NUM_ROUNDS, NUM_SAMPLES};
    use velorand::rngs::{feistel, lcg, spn, ReferenceRand, UnitRng};
    use velorand::{simd, timing};

    if !timing::is_cycle_counter_capable() {
        eprintln!("RDTSCP not supported on this CPU. Terminating.");
        std::process::exit(1);
    }
    println!("RDTSCP supported");

    if !simd::is_aes_capable() {
        eprintln!("AES-NI not supported on this CPU. Terminating.");
        std::process::exit(1);
    }
    println!("AES-NI supported");

    println!(
        "Benchmark run at {} ({} rounds of {} samples)",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        NUM_ROUNDS,
        NUM_SAMPLES
    );

    // Baseline with no generator work, to see the measurement floor.
    let info = benchmark_summary(|values| {
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f64;
        }
    });
    print_summary("Baseline", &info);

    let mut aes = spn::AesCounter::new();
    let info = benchmark_summary(|values| aes.generate(values));
    print_summary("AesCounter", &info);

    let mut lcg8 = lcg::LaneLcg8::new();
    let info = benchmark_summary(|values| lcg8.generate(values));
    print_summary("LaneLcg8", &info);

    let mut lcg4 = lcg::LaneLcg4::new();
    let info = benchmark_summary(|values| {
        let (first, second) = values.split_at_mut(4);
        lcg4.generate(first);
        lcg4.generate(second);
    });
    print_summary("LaneLcg4", &info);

    let mut tea2 = feistel::Tea2::new();
    let info = benchmark_summary(|values| {
        for pair in values.chunks_exact_mut(2) {
            tea2.generate(pair);
        }
    });
    print_summary("Tea2", &info);

    let mut tea4 = feistel::Tea4::new();
    let info = benchmark_summary(|values| {
        let (first, second) = values.split_at_mut(4);
        tea4.generate(first);
        tea4.generate(second);
    });
    print_summary("Tea4", &info);

    let mut reference = ReferenceRand::new();
    let info = benchmark_summary(|values| {
        for v in values.iter_mut() {
            *v = reference.next();
        }
    });
    print_summary("ReferenceRand", &info);
}

#[cfg(not(target_arch = "x86_64"))]
fn main() {
    eprintln!("The cycle-accurate benchmark requires an x86_64 CPU.");
    std::process::exit(1);
}
