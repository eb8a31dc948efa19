// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Export AES generator output as newline-delimited decimal floats.

use velorand::rngs::spn;
use velorand::simd;
use velorand::utils::write_csv;
use velorand::viz::bulk_generate;

const NUM_FLOATS: usize = 100_000;
const FILE_PATH: &str = "random_numbers.csv";

fn main() -> std::io::Result<()> {
    if !simd::is_aes_capable() {
        eprintln!("AES instruction set not supported on this CPU. Terminating.");
        std::process::exit(1);
    }

    let mut rng = spn::AesCounter::new();
    let values = bulk_generate(&mut rng, NUM_FLOATS);
    write_csv(FILE_PATH, &values)?;
    println!("Wrote {} values to {}", NUM_FLOATS, FILE_PATH);
    Ok(())
}
