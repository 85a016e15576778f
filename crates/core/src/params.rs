//! XelisHash v2 Algorithm Parameters
//!
//! Every value here is consensus-critical: changing any of them changes
//! the digest of every block.

/// Maximum input length in bytes (shorter inputs are zero-padded)
pub const INPUT_LENGTH: usize = 112;

/// Output digest size (BLAKE3-256)
pub const HASH_SIZE: usize = 32;

/// Scratchpad size in 64-bit words
pub const MEM_WORDS: usize = 429 * 128;

/// Scratchpad size in bytes (439,296)
pub const SCRATCH_BYTES: usize = MEM_WORDS * 8;

/// Words per scratchpad half (`memA` / `memB`)
pub const BUFFER_SIZE: usize = MEM_WORDS / 2;

/// Number of keystream chunks filling the scratchpad
pub const CHUNKS: usize = 4;

/// Key slice consumed per chunk
pub const CHUNK_SIZE: usize = 32;

/// Bytes of scratchpad written per chunk
pub const CHUNK_BYTES: usize = SCRATCH_BYTES / CHUNKS;

/// Stream cipher nonce size
pub const NONCE_SIZE: usize = 12;

/// Reduced ChaCha round count
pub const CHACHA_ROUNDS: usize = 8;

/// Outer iterations of the mixing stage
pub const SCRATCHPAD_ITERS: usize = 3;

/// Fixed round key of the single AES round
pub const AES_KEY: [u8; 16] = *b"xelishash-pow-v2";

/// Algorithm version
pub const VERSION: u8 = 2;

const _: () = assert!(CHUNK_BYTES * CHUNKS == SCRATCH_BYTES);
const _: () = assert!(CHUNK_SIZE * CHUNKS >= INPUT_LENGTH);
