//! Single AES encryption round used as a block diffuser
//!
//! SubBytes + ShiftRows + MixColumns + AddRoundKey, exactly once, with the
//! fixed key [`AES_KEY`]. This is the AESENC instruction on x86 and
//! AESE(zero)/AESMC/EOR on ARMv8; both are picked at runtime when the CPU
//! has them and must agree with the software round bit-for-bit.

use crate::params::AES_KEY;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
cpufeatures::new!(aes_intrinsics, "aes");

/// Diffuse `block` in place with one AES round keyed by [`AES_KEY`]
#[inline(always)]
pub fn diffuse(block: &mut [u8; 16]) {
    cipher_round(block, &AES_KEY);
}

/// One forward AES round with an arbitrary round key
#[inline(always)]
pub fn cipher_round(block: &mut [u8; 16], round_key: &[u8; 16]) {
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    if aes_intrinsics::get() {
        // SAFETY: the CPU reports AES support
        unsafe { cipher_round_hw(block, round_key) };
        return;
    }

    cipher_round_soft(block, round_key);
}

/// x86_64 AES-NI round
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "aes")]
unsafe fn cipher_round_hw(block: &mut [u8; 16], round_key: &[u8; 16]) {
    use core::arch::x86_64::{__m128i, _mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128};

    unsafe {
        let s = _mm_loadu_si128(block.as_ptr() as *const __m128i);
        let k = _mm_loadu_si128(round_key.as_ptr() as *const __m128i);
        _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, _mm_aesenc_si128(s, k));
    }
}

/// ARMv8 Crypto round
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon,aes")]
unsafe fn cipher_round_hw(block: &mut [u8; 16], round_key: &[u8; 16]) {
    use core::arch::aarch64::{vaeseq_u8, vaesmcq_u8, vdupq_n_u8, veorq_u8, vld1q_u8, vst1q_u8};

    unsafe {
        let s = vld1q_u8(block.as_ptr());
        let k = vld1q_u8(round_key.as_ptr());
        // AESE XORs its key before SubBytes/ShiftRows, so feed it zero and
        // XOR the real key after MixColumns to match AESENC
        let s = veorq_u8(vaesmcq_u8(vaeseq_u8(s, vdupq_n_u8(0))), k);
        vst1q_u8(block.as_mut_ptr(), s);
    }
}

/// Portable round (WASM, targets without AES instructions)
#[inline(always)]
pub(crate) fn cipher_round_soft(block: &mut [u8; 16], round_key: &[u8; 16]) {
    // SubBytes
    for byte in block.iter_mut() {
        *byte = SBOX[*byte as usize];
    }

    // ShiftRows on the column-major 4x4 state: row n rotates left by n
    let t = *block;
    block[1] = t[5];
    block[5] = t[9];
    block[9] = t[13];
    block[13] = t[1];

    block[2] = t[10];
    block[6] = t[14];
    block[10] = t[2];
    block[14] = t[6];

    block[3] = t[15];
    block[7] = t[3];
    block[11] = t[7];
    block[15] = t[11];

    // MixColumns
    for col in block.chunks_exact_mut(4) {
        let (a0, a1, a2, a3) = (col[0], col[1], col[2], col[3]);
        col[0] = gf_mul2(a0) ^ gf_mul3(a1) ^ a2 ^ a3;
        col[1] = a0 ^ gf_mul2(a1) ^ gf_mul3(a2) ^ a3;
        col[2] = a0 ^ a1 ^ gf_mul2(a2) ^ gf_mul3(a3);
        col[3] = gf_mul3(a0) ^ a1 ^ a2 ^ gf_mul2(a3);
    }

    // AddRoundKey
    for (byte, k) in block.iter_mut().zip(round_key) {
        *byte ^= k;
    }
}

/// Multiply by 2 in GF(2^8) with reduction polynomial x^8 + x^4 + x^3 + x + 1
#[inline(always)]
fn gf_mul2(x: u8) -> u8 {
    (x << 1) ^ ((x >> 7) * 0x1b)
}

/// Multiply by 3 in GF(2^8): 3*x = 2*x + x
#[inline(always)]
fn gf_mul3(x: u8) -> u8 {
    gf_mul2(x) ^ x
}

/// AES forward S-box
const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> [[u8; 16]; 5] {
        [
            [0u8; 16],
            [0xFF; 16],
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
            [
                0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE, 0x01, 0x23, 0x45, 0x67, 0x89, 0xAB,
                0xCD, 0xEF,
            ],
            *b"xelishash-pow-v2",
        ]
    }

    /// Catches ARM AESE key-ordering mistakes and S-box/ShiftRows typos alike
    #[test]
    fn test_matches_aes_crate_round() {
        for (i, input) in blocks().into_iter().enumerate() {
            let mut ours = input;
            diffuse(&mut ours);

            let mut soft = input;
            cipher_round_soft(&mut soft, &AES_KEY);

            let mut theirs = ::aes::Block::clone_from_slice(&input);
            ::aes::hazmat::cipher_round(&mut theirs, &::aes::Block::clone_from_slice(&AES_KEY));

            assert_eq!(ours, soft, "dispatch/soft mismatch on case {i}");
            assert_eq!(&soft[..], theirs.as_slice(), "soft/aes crate mismatch on case {i}");
        }
    }

    /// FIPS-197 appendix B, round 1: start of round state -> start of round 2
    #[test]
    fn test_fips197_round_one() {
        let mut state: [u8; 16] = hex::decode("193de3bea0f4e22b9ac68d2ae9f84808")
            .unwrap()
            .try_into()
            .unwrap();
        let round_key: [u8; 16] = hex::decode("a0fafe1788542cb123a339392a6c7605")
            .unwrap()
            .try_into()
            .unwrap();

        cipher_round_soft(&mut state, &round_key);
        assert_eq!(hex::encode(state), "a49c7ff2689f352b6b5bea43026a5049");
    }

    #[test]
    fn test_sbox_fixed_points() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x53], 0xed);
        assert_eq!(SBOX[0xff], 0x16);
    }
}
