//! XelisHash Prover Library
//!
//! Tooling around the XelisHash v2 proof-of-work digest: block work
//! templates, multi-threaded nonce search, configuration and logging.
//!
//! # Overview
//!
//! The hash function itself lives in `xelishash-core` and is re-exported
//! here as [`algorithm`]. It needs ~880 KB of working memory per hasher,
//! so every mining thread owns its own [`XelisHashV2`].
//!
//! # Example
//!
//! ```rust
//! use xelishash::algorithm::{hash, meets_difficulty};
//!
//! // 112-byte block work (shorter inputs are zero-padded)
//! let input = [0u8; 112];
//!
//! // Compute hash
//! let result = hash(&input).unwrap();
//!
//! // Check if it meets difficulty requirement
//! if meets_difficulty(&result, 16) {
//!     println!("Valid proof found!");
//! }
//! ```

// Re-export the core algorithm
pub use xelishash_core as algorithm;

pub mod config;
pub mod logging;
pub mod miner;
pub mod work;

// Convenience re-exports
pub use algorithm::{hash, meets_difficulty, XelisHashV2};
pub use config::{ConfigError, LogLevel, ProverConfig};
pub use miner::{FoundProof, Miner, SearchOutcome};
pub use work::{verify, BlockWork, Verification, WorkError};
