//! Per-call workspace and scratchpad initialization (stage 1)
//!
//! The scratchpad is kept both as bytes (hashed and filled by the stream
//! cipher) and as two little-endian word arrays (mixed by stage 3). The two
//! views are synchronized explicitly with [`decode_words`] and
//! [`encode_words`]; nothing relies on the host byte order.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec};

use crate::chacha::fill_keystream;
use crate::params::*;

/// All mutable state of one hash computation
///
/// A workspace can be reused for any number of hashes. Every buffer is
/// fully overwritten before it is read on each call, so no data from a
/// previous input can leak into the next digest.
pub struct Workspace {
    /// Zero-padded input message
    pub(crate) input: [u8; INPUT_LENGTH],
    /// Scratchpad bytes (439,296)
    pub(crate) scratch: Box<[u8]>,
    /// First scratchpad half as words
    pub(crate) mem_a: Box<[u64]>,
    /// Second scratchpad half as words
    pub(crate) mem_b: Box<[u64]>,
}

impl Workspace {
    /// Allocate a workspace (~880 KB: the byte scratchpad plus both word halves)
    pub fn new() -> Self {
        Self {
            input: [0u8; INPUT_LENGTH],
            scratch: vec![0u8; SCRATCH_BYTES].into_boxed_slice(),
            mem_a: vec![0u64; BUFFER_SIZE].into_boxed_slice(),
            mem_b: vec![0u64; BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Copy `message` into the input buffer, zero-padding to [`INPUT_LENGTH`]
    ///
    /// The caller has already checked `message.len() <= INPUT_LENGTH`.
    pub(crate) fn load_input(&mut self, message: &[u8]) {
        self.input.fill(0);
        self.input[..message.len()].copy_from_slice(message);
    }

    /// Scratchpad bytes as last written
    pub fn scratchpad(&self) -> &[u8] {
        &self.scratch
    }

    /// Re-split the byte scratchpad into `mem_a` / `mem_b`
    pub(crate) fn decode(&mut self) {
        let (lo, hi) = self.scratch.split_at(BUFFER_SIZE * 8);
        decode_words(lo, &mut self.mem_a);
        decode_words(hi, &mut self.mem_b);
    }

    /// Serialize `mem_a` then `mem_b` back into the byte scratchpad
    pub(crate) fn encode(&mut self) {
        let (lo, hi) = self.scratch.split_at_mut(BUFFER_SIZE * 8);
        encode_words(&self.mem_a, lo);
        encode_words(&self.mem_b, hi);
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Read little-endian `u64` words from `bytes` into `words`
#[inline]
pub fn decode_words(bytes: &[u8], words: &mut [u64]) {
    debug_assert_eq!(bytes.len(), words.len() * 8);
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }
}

/// Write `words` into `bytes` as little-endian `u64`s
#[inline]
pub fn encode_words(words: &[u64], bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), words.len() * 8);
    for (word, chunk) in words.iter().zip(bytes.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

/// Stage 1: derive the scratchpad from the padded input
///
/// ```text
/// key    = input || 0^16                      (4 x 32-byte slices)
/// buf    = BLAKE3(input) || key[0]
/// for chunk in 0..4:
///     buf[32..]  = key[chunk]
///     h          = BLAKE3(buf)
///     nonce      = chunk == 0 ? buf[..12] : last 12 bytes of previous chunk
///     scratch[chunk] = ChaCha8(h, nonce)
///     buf[..32]  = h
/// ```
pub fn stage_1(ws: &mut Workspace) {
    let mut key = [0u8; CHUNK_SIZE * CHUNKS];
    key[..INPUT_LENGTH].copy_from_slice(&ws.input);

    let mut buffer = [0u8; CHUNK_SIZE * 2];
    buffer[..CHUNK_SIZE].copy_from_slice(blake3::hash(&ws.input).as_bytes());

    for (chunk, key_slice) in key.chunks_exact(CHUNK_SIZE).enumerate() {
        buffer[CHUNK_SIZE..].copy_from_slice(key_slice);
        let chunk_key: [u8; 32] = blake3::hash(&buffer).into();

        let offset = chunk * CHUNK_BYTES;
        let mut nonce = [0u8; NONCE_SIZE];
        if chunk == 0 {
            nonce.copy_from_slice(&buffer[..NONCE_SIZE]);
        } else {
            nonce.copy_from_slice(&ws.scratch[offset - NONCE_SIZE..offset]);
        }

        fill_keystream(
            &chunk_key,
            &nonce,
            CHACHA_ROUNDS,
            &mut ws.scratch[offset..offset + CHUNK_BYTES],
        );

        buffer[..CHUNK_SIZE].copy_from_slice(&chunk_key);
    }

    ws.decode();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_round_trip() {
        let mut ws = Workspace::new();
        for (i, byte) in ws.scratch.iter_mut().enumerate() {
            *byte = (i.wrapping_mul(31) ^ (i >> 8)) as u8;
        }
        let original = ws.scratch.clone();

        ws.decode();
        let (a, b) = (ws.mem_a.clone(), ws.mem_b.clone());
        ws.scratch.fill(0);
        ws.encode();
        assert_eq!(ws.scratch, original);

        ws.decode();
        assert_eq!(ws.mem_a, a);
        assert_eq!(ws.mem_b, b);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut bytes = [0u8; 16];
        encode_words(&[0x0807_0605_0403_0201, 0x1], &mut bytes);
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8, 1, 0, 0, 0, 0, 0, 0, 0]);

        let mut words = [0u64; 2];
        decode_words(&bytes, &mut words);
        assert_eq!(words, [0x0807_0605_0403_0201, 0x1]);
    }

    #[test]
    fn test_second_half_maps_to_mem_b() {
        let mut ws = Workspace::new();
        ws.scratch.fill(0);
        ws.scratch[BUFFER_SIZE * 8] = 0xAB;
        ws.scratch[SCRATCH_BYTES - 1] = 0xCD;
        ws.decode();
        assert_eq!(ws.mem_b[0], 0xAB);
        assert_eq!(ws.mem_b[BUFFER_SIZE - 1], 0xCD << 56);
        assert!(ws.mem_a.iter().all(|&w| w == 0));
    }

    #[test]
    fn test_first_chunk_follows_construction() {
        let mut ws = Workspace::new();
        ws.load_input(b"stage one");
        stage_1(&mut ws);

        let digest = blake3::hash(&ws.input);
        let mut buffer = [0u8; 64];
        buffer[..32].copy_from_slice(digest.as_bytes());
        buffer[32..].copy_from_slice(&ws.input[..32]);
        let chunk_key: [u8; 32] = blake3::hash(&buffer).into();
        let nonce: [u8; 12] = digest.as_bytes()[..12].try_into().unwrap();

        let mut expected = [0u8; 256];
        fill_keystream(&chunk_key, &nonce, CHACHA_ROUNDS, &mut expected);
        assert_eq!(&ws.scratch[..256], &expected[..]);
    }

    #[test]
    fn test_chunks_chain_nonces() {
        let mut ws = Workspace::new();
        ws.load_input(&[0x5A; INPUT_LENGTH]);
        stage_1(&mut ws);

        // Rebuild chunk 1 from chunk 0's key and tail
        let mut key = [0u8; CHUNK_SIZE * CHUNKS];
        key[..INPUT_LENGTH].copy_from_slice(&ws.input);
        let mut buffer = [0u8; 64];
        buffer[..32].copy_from_slice(blake3::hash(&ws.input).as_bytes());
        buffer[32..].copy_from_slice(&key[..32]);
        let key0: [u8; 32] = blake3::hash(&buffer).into();
        buffer[..32].copy_from_slice(&key0);
        buffer[32..].copy_from_slice(&key[32..64]);
        let key1: [u8; 32] = blake3::hash(&buffer).into();

        let nonce: [u8; 12] = ws.scratch[CHUNK_BYTES - 12..CHUNK_BYTES].try_into().unwrap();
        let mut expected = [0u8; 128];
        fill_keystream(&key1, &nonce, CHACHA_ROUNDS, &mut expected);
        assert_eq!(&ws.scratch[CHUNK_BYTES..CHUNK_BYTES + 128], &expected[..]);
    }

    #[test]
    fn test_reuse_overwrites_everything() {
        let mut fresh = Workspace::new();
        fresh.load_input(b"short");
        stage_1(&mut fresh);

        let mut reused = Workspace::new();
        reused.load_input(&[0xFF; INPUT_LENGTH]);
        stage_1(&mut reused);
        reused.load_input(b"short");
        stage_1(&mut reused);

        assert_eq!(fresh.scratch, reused.scratch);
        assert_eq!(fresh.mem_a, reused.mem_a);
        assert_eq!(fresh.mem_b, reused.mem_b);
    }
}
