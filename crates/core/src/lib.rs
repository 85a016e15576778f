//! # XelisHash v2 Core Algorithm
//!
//! A memory-hard proof-of-work digest: 112 bytes in, 32 bytes out, bit-exact
//! with the consensus reference.
//!
//! ## Stages
//!
//! 1. **Scratchpad init**: BLAKE3-chained keys drive ChaCha8 to fill a
//!    439,296-byte scratchpad in 4 chunks
//! 2. **Mixing**: 3 x 27,456 pointer-chasing steps over the two scratchpad
//!    halves, one AES round per outer pass and a 16-way operation selector
//!    (including 128-bit multiply/divide/modulo) per step
//! 3. **Finalization**: BLAKE3-256 of the whole mixed scratchpad
//!
//! ## Input Format
//!
//! Inputs of up to [`INPUT_LENGTH`] bytes are zero-padded to exactly that
//! length. Longer inputs are rejected with [`Error::LengthExceeded`].
//!
//! ## Example
//!
//! ```rust
//! use xelishash_core::{XelisHashV2, hash, meets_difficulty};
//!
//! // Single-shot hashing
//! let result = hash(b"input data").unwrap();
//!
//! // Check difficulty (leading zero bits)
//! if meets_difficulty(&result, 16) {
//!     println!("Found hash with 16+ leading zero bits!");
//! }
//!
//! // Reusable hasher (avoids re-allocation)
//! let mut hasher = XelisHashV2::new();
//! let hash1 = hasher.hash(b"first").unwrap();
//! let hash2 = hasher.hash(b"second").unwrap();
//! assert_ne!(hash1, hash2);
//! ```
//!
//! ## no_std Support
//!
//! This crate supports `no_std` environments with the `alloc` crate:
//!
//! ```toml
//! [dependencies]
//! xelishash-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod aes;
mod chacha;
mod error;
mod hasher;
mod mixer;
mod ops;
mod params;
mod scratchpad;
pub mod wide;

#[cfg(feature = "std")]
mod ffi;

pub use error::{Error, Result};
#[cfg(feature = "parallel")]
pub use hasher::hash_batch_parallel;
pub use hasher::{XelisHashV2, hash, hash_batch, hash_range, meets_difficulty};
pub use params::*;
pub use scratchpad::{Workspace, decode_words, encode_words};

#[cfg(test)]
mod tests;
