// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Serialized access to the cycle counter for benchmarking.
//!
//! Timestamps follow the Intel benchmarking whitepaper: a `cpuid`
//! barrier retires all in-flight instructions before `rdtsc` opens the
//! measured window, and `rdtscp` followed by another `cpuid` closes it
//! so out-of-order execution cannot leak past the timestamp reads.
//! Counts are monotonic within a process run but not comparable across
//! runs or cores without pinning.

use core::arch::x86_64::{__cpuid, __rdtscp, _rdtsc};

/// Check for RDTSCP support via the extended cpuid leaf.
/// Callers must treat `false` as fatal for the benchmark path.
pub fn is_cycle_counter_capable() -> bool {
    unsafe {
        let max_extended = __cpuid(0x8000_0000).eax;
        if max_extended < 0x8000_0001 {
            return false;
        }
        __cpuid(0x8000_0001).edx & (1 << 27) != 0
    }
}

/// Serialize the pipeline, then read the timestamp counter.
#[inline]
pub fn start() -> u64 {
    unsafe {
        let _ = __cpuid(0);
        _rdtsc()
    }
}

/// Read the timestamp counter after the measured code retires, then
/// serialize so nothing later creeps into the window.
#[inline]
pub fn stop() -> u64 {
    unsafe {
        let mut aux: u32 = 0;
        let timestamp = __rdtscp(&mut aux);
        let _ = __cpuid(0);
        timestamp
    }
}

/// Exercise the timestamp and serializing instructions once before the
/// timed loop so cold caches and branch predictors do not skew the
/// first samples. The readings are discarded.
pub fn warmup() {
    let _ = start();
    let _ = stop();
    let _ = start();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_monotonic_within_a_window() {
        if !is_cycle_counter_capable() {
            return;
        }
        warmup();
        let begin = start();
        let mut acc = 0u64;
        for i in 0..1000u64 {
            acc = acc.wrapping_add(i);
        }
        std::hint::black_box(acc);
        let end = stop();
        assert!(end >= begin);
    }
}
