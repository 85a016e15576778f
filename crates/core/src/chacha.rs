//! Reduced-round ChaCha keystream generator
//!
//! Only the raw keystream is needed: the scratchpad is filled with it
//! directly, there is never a plaintext to XOR against.

/// "expand 32-byte k" as little-endian words
const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// Bytes produced per block function call
pub const BLOCK_LEN: usize = 64;

#[inline(always)]
fn quarter_round(s: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(16);
    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(12);
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(8);
    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(7);
}

#[inline(always)]
fn load_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Initial state: constants, key, counter word 0, nonce
fn initial_state(key: &[u8; 32], nonce: &[u8; 12]) -> [u32; 16] {
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&CONSTANTS);
    for (word, bytes) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
        *word = load_le(bytes);
    }
    for (word, bytes) in state[13..16].iter_mut().zip(nonce.chunks_exact(4)) {
        *word = load_le(bytes);
    }
    state
}

/// Compute one 64-byte keystream block for `counter`
#[inline(always)]
fn block(state: &[u32; 16], counter: u32, rounds: usize, out: &mut [u8; BLOCK_LEN]) {
    let mut input = *state;
    input[12] = counter;

    let mut working = input;
    // One double round = column pass + diagonal pass
    for _ in 0..rounds / 2 {
        quarter_round(&mut working, 0, 4, 8, 12);
        quarter_round(&mut working, 1, 5, 9, 13);
        quarter_round(&mut working, 2, 6, 10, 14);
        quarter_round(&mut working, 3, 7, 11, 15);

        quarter_round(&mut working, 0, 5, 10, 15);
        quarter_round(&mut working, 1, 6, 11, 12);
        quarter_round(&mut working, 2, 7, 8, 13);
        quarter_round(&mut working, 3, 4, 9, 14);
    }

    for (i, bytes) in out.chunks_exact_mut(4).enumerate() {
        bytes.copy_from_slice(&working[i].wrapping_add(input[i]).to_le_bytes());
    }
}

/// Fill `out` with the ChaCha keystream for `key`/`nonce`, counter
/// starting at 0 and incremented once per 64-byte block.
///
/// A trailing partial block is truncated.
pub fn fill_keystream(key: &[u8; 32], nonce: &[u8; 12], rounds: usize, out: &mut [u8]) {
    let state = initial_state(key, nonce);
    let mut keystream = [0u8; BLOCK_LEN];

    for (counter, dst) in out.chunks_mut(BLOCK_LEN).enumerate() {
        block(&state, counter as u32, rounds, &mut keystream);
        dst.copy_from_slice(&keystream[..dst.len()]);
    }
}
