// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Four-lane 128-bit register model used as generator state.
//!
//! A register is four 32-bit lanes, lane 0 first. On x86_64 the lane
//! operations map onto SSE/AES-NI intrinsics, with lane `i` occupying
//! bytes `4i..4i+4` of the xmm register in little-endian order. On other
//! architectures the same bit-level semantics run as scalar lane math.

/// Four 32-bit lanes, lane 0 first.
pub type Lanes = [u32; 4];

/// Check for AES instruction support.
/// Callers must treat `false` as fatal for the AES generator path,
/// there is no software fallback on x86_64.
pub fn is_aes_capable() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("aes")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        true
    }
}

/// One AES encryption round (SubBytes, ShiftRows, MixColumns, AddRoundKey)
/// over `block` with `key`. Used purely as a bit mixer, not for security.
///
/// On x86_64 this executes `aesenc` and crashes if the AES instruction
/// set is unavailable. Check [`is_aes_capable`] before first use.
pub fn aes_round(block: Lanes, key: Lanes) -> Lanes {
    #[cfg(target_arch = "x86_64")]
    // Constructors of the AES generator assert `is_aes_capable()`.
    unsafe {
        aes_round_ni(block, key)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        soft::aes_round(block, key)
    }
}

/// Wrapping per-lane addition.
pub fn add_lanes(a: Lanes, b: Lanes) -> Lanes {
    [
        a[0].wrapping_add(b[0]),
        a[1].wrapping_add(b[1]),
        a[2].wrapping_add(b[2]),
        a[3].wrapping_add(b[3]),
    ]
}

/// One LCG step across all four lanes: `lane * mul + add` keeping only
/// the low 32 bits of each product (intentional LCG truncation).
///
/// The x86_64 path reproduces the classic even/odd `pmuludq` trick:
/// split the register into even and odd lanes via shuffle, widen-multiply,
/// mask back to alternating lanes and OR the halves together.
pub fn lcg_step(state: Lanes, mul: Lanes, add: Lanes) -> Lanes {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        lcg_step_sse(state, mul, add)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        soft::lcg_step(state, mul, add)
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "aes")]
unsafe fn aes_round_ni(block: Lanes, key: Lanes) -> Lanes {
    use core::arch::x86_64::*;
    let b = _mm_loadu_si128(block.as_ptr() as *const __m128i);
    let k = _mm_loadu_si128(key.as_ptr() as *const __m128i);
    let r = _mm_aesenc_si128(b, k);
    let mut out: Lanes = [0; 4];
    _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, r);
    out
}

#[cfg(target_arch = "x86_64")]
unsafe fn lcg_step_sse(state: Lanes, mul: Lanes, add: Lanes) -> Lanes {
    use core::arch::x86_64::*;
    let seed = _mm_loadu_si128(state.as_ptr() as *const __m128i);
    let multiplier = _mm_loadu_si128(mul.as_ptr() as *const __m128i);
    let adder = _mm_loadu_si128(add.as_ptr() as *const __m128i);
    let mod_mask = _mm_set_epi32(0, -1, 0, -1);

    // Swap even and odd lanes so `pmuludq` sees all four seeds.
    const SWAP_PAIRS: i32 = 0b10_11_00_01;
    let split = _mm_shuffle_epi32::<SWAP_PAIRS>(seed);
    let mult_split = _mm_shuffle_epi32::<SWAP_PAIRS>(multiplier);
    let even = _mm_and_si128(_mm_mul_epu32(seed, multiplier), mod_mask);
    let odd = _mm_and_si128(_mm_mul_epu32(split, mult_split), mod_mask);
    let merged = _mm_or_si128(even, _mm_shuffle_epi32::<SWAP_PAIRS>(odd));
    let next = _mm_add_epi32(merged, adder);

    let mut out: Lanes = [0; 4];
    _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, next);
    out
}

/// Scalar lane simulation, bit-identical to the x86_64 intrinsic path.
#[cfg_attr(target_arch = "x86_64", allow(dead_code))]
mod soft {
    use super::Lanes;

    #[rustfmt::skip]
    const SBOX: [u8; 256] = [
        0x63, 0x7C, 0x77, 0x7B, 0xF2, 0x6B, 0x6F, 0xC5, 0x30, 0x01, 0x67, 0x2B, 0xFE, 0xD7, 0xAB, 0x76,
        0xCA, 0x82, 0xC9, 0x7D, 0xFA, 0x59, 0x47, 0xF0, 0xAD, 0xD4, 0xA2, 0xAF, 0x9C, 0xA4, 0x72, 0xC0,
        0xB7, 0xFD, 0x93, 0x26, 0x36, 0x3F, 0xF7, 0xCC, 0x34, 0xA5, 0xE5, 0xF1, 0x71, 0xD8, 0x31, 0x15,
        0x04, 0xC7, 0x23, 0xC3, 0x18, 0x96, 0x05, 0x9A, 0x07, 0x12, 0x80, 0xE2, 0xEB, 0x27, 0xB2, 0x75,
        0x09, 0x83, 0x2C, 0x1A, 0x1B, 0x6E, 0x5A, 0xA0, 0x52, 0x3B, 0xD6, 0xB3, 0x29, 0xE3, 0x2F, 0x84,
        0x53, 0xD1, 0x00, 0xED, 0x20, 0xFC, 0xB1, 0x5B, 0x6A, 0xCB, 0xBE, 0x39, 0x4A, 0x4C, 0x58, 0xCF,
        0xD0, 0xEF, 0xAA, 0xFB, 0x43, 0x4D, 0x33, 0x85, 0x45, 0xF9, 0x02, 0x7F, 0x50, 0x3C, 0x9F, 0xA8,
        0x51, 0xA3, 0x40, 0x8F, 0x92, 0x9D, 0x38, 0xF5, 0xBC, 0xB6, 0xDA, 0x21, 0x10, 0xFF, 0xF3, 0xD2,
        0xCD, 0x0C, 0x13, 0xEC, 0x5F, 0x97, 0x44, 0x17, 0xC4, 0xA7, 0x7E, 0x3D, 0x64, 0x5D, 0x19, 0x73,
        0x60, 0x81, 0x4F, 0xDC, 0x22, 0x2A, 0x90, 0x88, 0x46, 0xEE, 0xB8, 0x14, 0xDE, 0x5E, 0x0B, 0xDB,
        0xE0, 0x32, 0x3A, 0x0A, 0x49, 0x06, 0x24, 0x5C, 0xC2, 0xD3, 0xAC, 0x62, 0x91, 0x95, 0xE4, 0x79,
        0xE7, 0xC8, 0x37, 0x6D, 0x8D, 0xD5, 0x4E, 0xA9, 0x6C, 0x56, 0xF4, 0xEA, 0x65, 0x7A, 0xAE, 0x08,
        0xBA, 0x78, 0x25, 0x2E, 0x1C, 0xA6, 0xB4, 0xC6, 0xE8, 0xDD, 0x74, 0x1F, 0x4B, 0xBD, 0x8B, 0x8A,
        0x70, 0x3E, 0xB5, 0x66, 0x48, 0x03, 0xF6, 0x0E, 0x61, 0x35, 0x57, 0xB9, 0x86, 0xC1, 0x1D, 0x9E,
        0xE1, 0xF8, 0x98, 0x11, 0x69, 0xD9, 0x8E, 0x94, 0x9B, 0x1E, 0x87, 0xE9, 0xCE, 0x55, 0x28, 0xDF,
        0x8C, 0xA1, 0x89, 0x0D, 0xBF, 0xE6, 0x42, 0x68, 0x41, 0x99, 0x2D, 0x0F, 0xB0, 0x54, 0xBB, 0x16,
    ];

    /// Multiply by 2 in GF(2^8) with the AES reduction polynomial.
    fn xtime(b: u8) -> u8 {
        (b << 1) ^ if b & 0x80 != 0 { 0x1B } else { 0 }
    }

    /// `aesenc` semantics on the little-endian lane layout: the 16 state
    /// bytes form the AES state matrix column-major (`s[r][c] = byte[4c+r]`).
    pub fn aes_round(block: Lanes, key: Lanes) -> Lanes {
        let mut b = [0u8; 16];
        for (i, lane) in block.iter().enumerate() {
            b[4 * i..4 * i + 4].copy_from_slice(&lane.to_le_bytes());
        }
        // SubBytes
        for by in b.iter_mut() {
            *by = SBOX[*by as usize];
        }
        // ShiftRows: row r rotates left by r positions
        let mut sh = [0u8; 16];
        for c in 0..4 {
            for r in 0..4 {
                sh[4 * c + r] = b[4 * ((c + r) % 4) + r];
            }
        }
        // MixColumns
        let mut mixed = [0u8; 16];
        for c in 0..4 {
            let col = &sh[4 * c..4 * c + 4];
            for r in 0..4 {
                mixed[4 * c + r] = xtime(col[r])
                    ^ (xtime(col[(r + 1) % 4]) ^ col[(r + 1) % 4])
                    ^ col[(r + 2) % 4]
                    ^ col[(r + 3) % 4];
            }
        }
        let mut out: Lanes = [0; 4];
        for (i, lane) in out.iter_mut().enumerate() {
            let mut word = [0u8; 4];
            word.copy_from_slice(&mixed[4 * i..4 * i + 4]);
            *lane = u32::from_le_bytes(word) ^ key[i];
        }
        out
    }

    pub fn lcg_step(state: Lanes, mul: Lanes, add: Lanes) -> Lanes {
        let mut out: Lanes = [0; 4];
        for i in 0..4 {
            out[i] = state[i].wrapping_mul(mul[i]).wrapping_add(add[i]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 appendix B: round 1 of encrypting 00112233445566778899aabbccddeeff
    // under key 000102030405060708090a0b0c0d0e0f.
    #[test]
    fn soft_aes_round_matches_fips_197() {
        let start: Lanes = [0x33221100, 0x77665544, 0xBBAA9988, 0xFFEEDDCC];
        let key0: Lanes = [0x03020100, 0x07060504, 0x0B0A0908, 0x0F0E0D0C];
        let mut block: Lanes = [0; 4];
        for i in 0..4 {
            block[i] = start[i] ^ key0[i];
        }
        let rk1: Lanes = [0xFD74AAD6, 0xFA72AFD2, 0xF178A6DA, 0xFE76ABD6];
        let out = soft::aes_round(block, rk1);
        assert_eq!(out, [0xE810D889, 0x68CE5A85, 0xD843182D, 0xE48F12CB]);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn aes_round_intrinsic_matches_soft() {
        if !is_aes_capable() {
            return;
        }
        let block: Lanes = [0x7E95761E, 0xAD90777D, 0xC8013EA4, 0xA341316C];
        let key: Lanes = [0x01234567, 0x89ABCDEF, 0xDEADBEEF, 0xCAFEBABE];
        assert_eq!(aes_round(block, key), soft::aes_round(block, key));
        assert_eq!(aes_round(block, block), soft::aes_round(block, block));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn lcg_step_sse_matches_soft() {
        let state: Lanes = [667, 666, 0xFFFFFFFF, 0x80000001];
        let mul: Lanes = [214013, 17405, 214013, 69069];
        let add: Lanes = [2531011, 10395331, 13737667, 1];
        assert_eq!(lcg_step(state, mul, add), soft::lcg_step(state, mul, add));
    }

    #[test]
    fn add_lanes_wraps_per_lane() {
        let a: Lanes = [u32::MAX, 1, 0x9E3779B9, 0];
        let b: Lanes = [1, 2, 0x9E3779B9, 0];
        assert_eq!(add_lanes(a, b), [0, 3, 0x3C6EF372, 0]);
    }
}
