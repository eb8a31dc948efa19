// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Implementation of the unit-float generator family.
//! All variants implement the UnitRng interface, some feature additional
//! accessors like get(index) for raw words.
//!
//! Every variant starts from a fixed constant, so two fresh instances
//! produce identical sequences (no user seeding). Instances are stateful
//! and single-owner: one instance per thread, no internal locking.

use rand::{Rng, SeedableRng};

/// Additive constant with good bit-avalanche under repeated addition,
/// derived from the golden ratio. Doubles as counter increment and
/// Feistel round delta.
pub const GOLDEN_GAMMA: u32 = 0x9E3779B9;

/// Common contract of all generator variants: a fixed-size batch of
/// floats in [0.0, 1.0) per generation step, plus a streaming adapter.
pub trait UnitRng {
    /// Number of floats produced per generation step.
    fn batch_size(&self) -> usize;
    /// Fill `out` with one batch, advancing the state one step.
    /// `out.len()` must equal `batch_size()`.
    fn generate(&mut self, out: &mut [f64]);
    /// Pull a single float, lazily refilling an internal batch.
    /// Exactly one generation step happens per `batch_size()` calls,
    /// so per-call latency is bursty rather than amortized smooth.
    fn next(&mut self) -> f64;
}

pub struct ReferenceRand {
    rng: rand::rngs::StdRng,
}

impl ReferenceRand {
    /// Baseline generator backed by the rand crate's general-purpose
    /// engine, seeded from system entropy. Not part of the optimized
    /// family and therefore not deterministic across instances.
    pub fn new() -> Self {
        ReferenceRand {
            rng: rand::rngs::StdRng::from_os_rng(),
        }
    }
}

impl Default for ReferenceRand {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRng for ReferenceRand {
    fn batch_size(&self) -> usize {
        1
    }

    fn generate(&mut self, out: &mut [f64]) {
        assert_eq!(out.len(), 1);
        out[0] = self.rng.random::<f64>();
    }

    fn next(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Substitution-permutation generator built on a self-keyed AES round.
pub mod spn {
    use super::{UnitRng, GOLDEN_GAMMA};
    use crate::conditioning::split_lane;
    use crate::simd::{self, Lanes};

    pub const NUM_GENERATED: usize = 8;
    /// Epsilon added to the 16-bit split denominator. Kept per variant,
    /// the LCG family uses a different value.
    pub const EPSILON: f64 = 0.01;
    const DENOMINATOR: f64 = 65535.0 + EPSILON;
    /// Initial round key, lane 0 first.
    const INITIAL_KEY: Lanes = [0x7E95761E, 0xAD90777D, 0xC8013EA4, 0xA341316C];

    /// One AES encryption round per step with the register used as both
    /// plaintext and key. The round is valued purely as a fast bit mixer.
    /// Advancing each lane by [`GOLDEN_GAMMA`] afterwards makes the
    /// register a per-lane counter that cannot repeat within 2^32 steps.
    pub struct AesCounter {
        round_key: Lanes,
        buf: [f64; NUM_GENERATED],
        cursor: usize,
    }

    impl AesCounter {
        /// Check [`simd::is_aes_capable`] before constructing and treat
        /// `false` as fatal; there is no software fallback on x86_64.
        pub fn new() -> Self {
            assert!(
                simd::is_aes_capable(),
                "AES instruction set not supported on this CPU"
            );
            AesCounter {
                round_key: INITIAL_KEY,
                buf: [0.0; NUM_GENERATED],
                cursor: NUM_GENERATED,
            }
        }

        /// One mix step: returns the raw cipher lanes and advances the key.
        fn generate_lanes(&mut self) -> Lanes {
            let bits = simd::aes_round(self.round_key, self.round_key);
            self.round_key = simd::add_lanes(self.round_key, [GOLDEN_GAMMA; 4]);
            bits
        }
    }

    impl Default for AesCounter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UnitRng for AesCounter {
        fn batch_size(&self) -> usize {
            NUM_GENERATED
        }

        fn generate(&mut self, out: &mut [f64]) {
            assert_eq!(out.len(), NUM_GENERATED);
            let bits = self.generate_lanes();
            for (i, lane) in bits.iter().enumerate() {
                let (low, high) = split_lane(*lane, DENOMINATOR);
                out[i] = low;
                out[i + 4] = high;
            }
        }

        fn next(&mut self) -> f64 {
            self.cursor += 1;
            if self.cursor >= NUM_GENERATED {
                let mut buf = self.buf;
                self.generate(&mut buf);
                self.buf = buf;
                self.cursor = 0;
            }
            self.buf[self.cursor]
        }
    }
}

/// Four-lane vectorized linear congruential generators.
pub mod lcg {
    use super::UnitRng;
    use crate::conditioning::{scale_signed, split_lane};
    use crate::simd::{self, Lanes};

    /// Epsilon added to the 16-bit split denominator in the 8-wide variant.
    pub const EPSILON: f64 = 1.0;
    const DENOMINATOR: f64 = 65535.0 + EPSILON;
    const INITIAL_SEED: Lanes = [667, 666, 667, 666];
    const MULTIPLIER: Lanes = [214013, 17405, 214013, 69069];
    const ADDER: Lanes = [2531011, 10395331, 13737667, 1];

    /// Two interleaved 32-bit LCG streams across four lanes, one float
    /// per lane via the signed linear rescale. This variant inherits the
    /// rescale's boundary defect at the top of the signed range, see
    /// [`scale_signed`].
    pub struct LaneLcg4 {
        seed: Lanes,
        buf: [f64; 4],
        cursor: usize,
    }

    impl LaneLcg4 {
        pub fn new() -> Self {
            LaneLcg4 {
                seed: INITIAL_SEED,
                buf: [0.0; 4],
                cursor: 4,
            }
        }
    }

    impl Default for LaneLcg4 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UnitRng for LaneLcg4 {
        fn batch_size(&self) -> usize {
            4
        }

        fn generate(&mut self, out: &mut [f64]) {
            assert_eq!(out.len(), 4);
            self.seed = simd::lcg_step(self.seed, MULTIPLIER, ADDER);
            for (o, lane) in out.iter_mut().zip(self.seed.iter()) {
                *o = scale_signed(*lane);
            }
        }

        fn next(&mut self) -> f64 {
            self.cursor += 1;
            if self.cursor >= 4 {
                let mut buf = self.buf;
                self.generate(&mut buf);
                self.buf = buf;
                self.cursor = 0;
            }
            self.buf[self.cursor]
        }
    }

    /// Same lane step as [`LaneLcg4`] but converted through the 16-bit
    /// split, yielding eight floats per step with no boundary defect.
    pub struct LaneLcg8 {
        seed: Lanes,
        buf: [f64; 8],
        cursor: usize,
    }

    impl LaneLcg8 {
        pub fn new() -> Self {
            LaneLcg8 {
                seed: INITIAL_SEED,
                buf: [0.0; 8],
                cursor: 8,
            }
        }
    }

    impl Default for LaneLcg8 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UnitRng for LaneLcg8 {
        fn batch_size(&self) -> usize {
            8
        }

        fn generate(&mut self, out: &mut [f64]) {
            assert_eq!(out.len(), 8);
            self.seed = simd::lcg_step(self.seed, MULTIPLIER, ADDER);
            for (i, lane) in self.seed.iter().enumerate() {
                let (low, high) = split_lane(*lane, DENOMINATOR);
                out[i] = low;
                out[i + 4] = high;
            }
        }

        fn next(&mut self) -> f64 {
            self.cursor += 1;
            if self.cursor >= 8 {
                let mut buf = self.buf;
                self.generate(&mut buf);
                self.buf = buf;
                self.cursor = 0;
            }
            self.buf[self.cursor]
        }
    }
}

/// Feistel block generators after the Tiny Encryption Algorithm.
pub mod feistel {
    use super::{UnitRng, GOLDEN_GAMMA};
    use crate::conditioning::word_to_unit;

    const NUM_ROUNDS: usize = 4;
    /// Round keys, identical to the AES variant's initial register.
    const KEYS: [u32; 4] = [0xA341316C, 0xC8013EA4, 0xAD90777D, 0x7E95761E];

    /// One TEA pair update under the running round sum.
    fn mix_pair(v0: &mut u32, v1: &mut u32, sum: u32) {
        *v0 = v0.wrapping_add(
            (v1.wrapping_shl(4).wrapping_add(KEYS[0]))
                ^ v1.wrapping_add(sum)
                ^ ((*v1 >> 5).wrapping_add(KEYS[1])),
        );
        *v1 = v1.wrapping_add(
            (v0.wrapping_shl(4).wrapping_add(KEYS[2]))
                ^ v0.wrapping_add(sum)
                ^ ((*v0 >> 5).wrapping_add(KEYS[3])),
        );
    }

    /// Run the four-round Feistel schedule over adjacent word pairs.
    fn mix_words(words: &mut [u32]) {
        let mut sum: u32 = 0;
        for _ in 0..NUM_ROUNDS {
            sum = sum.wrapping_add(GOLDEN_GAMMA);
            for pair in words.chunks_exact_mut(2) {
                let (v0, v1) = pair.split_at_mut(1);
                mix_pair(&mut v0[0], &mut v1[0], sum);
            }
        }
    }

    /// Two-word message state, zero initialized. Each `generate` call
    /// mutates the state in place; words are read back via accessors.
    pub struct Tea2 {
        words: [u32; 2],
        buf: [f64; 2],
        cursor: usize,
    }

    impl Tea2 {
        pub fn new() -> Self {
            Tea2 {
                words: [0; 2],
                buf: [0.0; 2],
                cursor: 2,
            }
        }

        /// Raw 32-bit word `index`. Index must be below the word count.
        pub fn get(&self, index: usize) -> u32 {
            assert!(index < self.words.len());
            self.words[index]
        }

        /// Word `index` rescaled to [0.0, 1.0) as `word / 2^32` exactly.
        pub fn get_f(&self, index: usize) -> f64 {
            assert!(index < self.words.len());
            word_to_unit(self.words[index])
        }
    }

    impl Default for Tea2 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UnitRng for Tea2 {
        fn batch_size(&self) -> usize {
            2
        }

        fn generate(&mut self, out: &mut [f64]) {
            assert_eq!(out.len(), 2);
            mix_words(&mut self.words);
            out[0] = word_to_unit(self.words[0]);
            out[1] = word_to_unit(self.words[1]);
        }

        fn next(&mut self) -> f64 {
            self.cursor += 1;
            if self.cursor >= 2 {
                let mut buf = self.buf;
                self.generate(&mut buf);
                self.buf = buf;
                self.cursor = 0;
            }
            self.buf[self.cursor]
        }
    }

    /// Four-word variant: two interleaved pair streams per round, four
    /// outputs per call. Both pairs start from the same all-zero state
    /// and share the round schedule, so their outputs coincide.
    pub struct Tea4 {
        words: [u32; 4],
        buf: [f64; 4],
        cursor: usize,
    }

    impl Tea4 {
        pub fn new() -> Self {
            Tea4 {
                words: [0; 4],
                buf: [0.0; 4],
                cursor: 4,
            }
        }

        /// Raw 32-bit word `index`. Index must be below the word count.
        pub fn get(&self, index: usize) -> u32 {
            assert!(index < self.words.len());
            self.words[index]
        }

        /// Word `index` rescaled to [0.0, 1.0) as `word / 2^32` exactly.
        pub fn get_f(&self, index: usize) -> f64 {
            assert!(index < self.words.len());
            word_to_unit(self.words[index])
        }
    }

    impl Default for Tea4 {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UnitRng for Tea4 {
        fn batch_size(&self) -> usize {
            4
        }

        fn generate(&mut self, out: &mut [f64]) {
            assert_eq!(out.len(), 4);
            mix_words(&mut self.words);
            for (o, word) in out.iter_mut().zip(self.words.iter()) {
                *o = word_to_unit(*word);
            }
        }

        fn next(&mut self) -> f64 {
            self.cursor += 1;
            if self.cursor >= 4 {
                let mut buf = self.buf;
                self.generate(&mut buf);
                self.buf = buf;
                self.cursor = 0;
            }
            self.buf[self.cursor]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::is_aes_capable;

    fn collect(rng: &mut dyn UnitRng, count: usize) -> Vec<f64> {
        let batch = rng.batch_size();
        let mut out = vec![0.0; batch * count];
        for chunk in out.chunks_exact_mut(batch) {
            rng.generate(chunk);
        }
        out
    }

    // Canonical golden vector: four manual TEA rounds with delta
    // 0x9E3779B9 and keys {0xA341316C, 0xC8013EA4, 0xAD90777D,
    // 0x7E95761E} starting from the all-zero state.
    #[test]
    fn tea2_golden_vector() {
        let mut rng = feistel::Tea2::new();
        let mut out = [0.0; 2];
        rng.generate(&mut out);
        assert_eq!(rng.get(0), 0x5DF5F2BF);
        assert_eq!(rng.get(1), 0x54CE08BA);
        assert_eq!(rng.get_f(0), 0.3670341221150011);
        assert_eq!(rng.get_f(1), 0.3312688306905329);
        assert_eq!(out[0], rng.get_f(0));
        // State carries across calls.
        rng.generate(&mut out);
        assert_eq!(rng.get(0), 0xA3A150DD);
        assert_eq!(rng.get(1), 0x259DC3C2);
    }

    #[test]
    fn tea4_mirrors_pair_streams() {
        let mut rng = feistel::Tea4::new();
        let mut out = [0.0; 4];
        rng.generate(&mut out);
        // Both pairs start identical, so the interleaved streams coincide.
        assert_eq!(rng.get(0), 0x5DF5F2BF);
        assert_eq!(rng.get(1), 0x54CE08BA);
        assert_eq!(rng.get(2), rng.get(0));
        assert_eq!(rng.get(3), rng.get(1));
    }

    #[test]
    fn tea_get_f_matches_exact_division() {
        let mut rng = feistel::Tea2::new();
        let mut out = [0.0; 2];
        for _ in 0..1000 {
            rng.generate(&mut out);
            for i in 0..2 {
                assert_eq!(rng.get_f(i), rng.get(i) as f64 / 4294967296.0);
                assert!(rng.get_f(i) < 1.0);
            }
        }
    }

    #[test]
    #[should_panic]
    fn tea_get_out_of_range_panics() {
        let rng = feistel::Tea2::new();
        let _ = rng.get(2);
    }

    #[test]
    fn lcg_golden_state_evolution() {
        let mut rng = lcg::LaneLcg8::new();
        let mut out = [0.0; 8];
        rng.generate(&mut out);
        // State after one step from [667, 666, 667, 666].
        assert_eq!(
            out,
            [
                0.761505126953125,
                0.4959259033203125,
                0.761505126953125,
                0.9036102294921875,
                0.0338134765625,
                0.0051116943359375,
                0.0364227294921875,
                0.0106964111328125,
            ]
        );
    }

    #[test]
    fn lcg4_golden_first_batch() {
        let mut rng = lcg::LaneLcg4::new();
        let mut out = [0.0; 4];
        rng.generate(&mut out);
        assert_eq!(
            out,
            [
                0.5338250962243533,
                0.5051192615670708,
                0.5364343491552558,
                0.5107101991356864,
            ]
        );
    }

    #[test]
    fn aes_golden_first_batch() {
        if !is_aes_capable() {
            return;
        }
        let mut rng = spn::AesCounter::new();
        let mut out = [0.0; 8];
        rng.generate(&mut out);
        assert_eq!(
            out,
            [
                0.482551234828529,
                0.6021361711854473,
                0.03849850637086955,
                0.3478446100794064,
                0.4607613548849691,
                0.4836193661983114,
                0.8105438604495521,
                0.7530936517748299,
            ]
        );
        // Key advance feeds the next batch.
        rng.generate(&mut out);
        assert_eq!(out[0], 0.19810785105548925);
    }

    #[test]
    fn fresh_instances_are_deterministic() {
        if is_aes_capable() {
            let a = collect(&mut spn::AesCounter::new(), 16);
            let b = collect(&mut spn::AesCounter::new(), 16);
            assert_eq!(a, b);
        }
        let a = collect(&mut lcg::LaneLcg4::new(), 16);
        let b = collect(&mut lcg::LaneLcg4::new(), 16);
        assert_eq!(a, b);
        let a = collect(&mut lcg::LaneLcg8::new(), 16);
        let b = collect(&mut lcg::LaneLcg8::new(), 16);
        assert_eq!(a, b);
        let a = collect(&mut feistel::Tea2::new(), 16);
        let b = collect(&mut feistel::Tea2::new(), 16);
        assert_eq!(a, b);
        let a = collect(&mut feistel::Tea4::new(), 16);
        let b = collect(&mut feistel::Tea4::new(), 16);
        assert_eq!(a, b);
    }

    fn assert_streaming_matches_batch(make: impl Fn() -> Box<dyn UnitRng>) {
        let mut batched = make();
        let mut streamed = make();
        let batch = batched.batch_size();
        let mut out = vec![0.0; batch];
        for _ in 0..5 {
            batched.generate(&mut out);
            for &expected in out.iter() {
                assert_eq!(streamed.next(), expected);
            }
        }
    }

    #[test]
    fn streaming_matches_batch_order() {
        if is_aes_capable() {
            assert_streaming_matches_batch(|| Box::new(spn::AesCounter::new()));
        }
        assert_streaming_matches_batch(|| Box::new(lcg::LaneLcg4::new()));
        assert_streaming_matches_batch(|| Box::new(lcg::LaneLcg8::new()));
        assert_streaming_matches_batch(|| Box::new(feistel::Tea2::new()));
        assert_streaming_matches_batch(|| Box::new(feistel::Tea4::new()));
    }

    #[test]
    fn reference_stays_in_unit_range() {
        let mut rng = ReferenceRand::new();
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    #[should_panic]
    fn generate_rejects_wrong_buffer_length() {
        let mut rng = lcg::LaneLcg8::new();
        let mut out = [0.0; 4];
        rng.generate(&mut out);
    }
}
