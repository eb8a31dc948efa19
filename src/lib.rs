// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Fast non-cryptographic generators for floats in [0.0, 1.0), with a
//! cycle-accurate latency benchmark and a distribution visualizer.

#[cfg(target_arch = "x86_64")]
pub mod bench;
pub mod conditioning;
pub mod rngs;
pub mod simd;
pub mod stats;
#[cfg(target_arch = "x86_64")]
pub mod timing;
pub mod utils;
pub mod viz;
