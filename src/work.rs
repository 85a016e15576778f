//! Block work templates
//!
//! A block work is the 112-byte miner input: header work hash (32),
//! timestamp (8), nonce (8), extra nonce (32), miner key (32). The nonce
//! is a little-endian u64 at a configurable offset so that other layouts
//! of the same size can be mined too.

use thiserror::Error;

use crate::algorithm::{self, XelisHashV2, HASH_SIZE, INPUT_LENGTH};

/// Size of a block work template
pub const BLOCK_WORK_SIZE: usize = INPUT_LENGTH;

/// Nonce position in the standard layout (after work hash and timestamp)
pub const DEFAULT_NONCE_OFFSET: usize = 40;

/// Width of the nonce field
pub const NONCE_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum WorkError {
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Block work must be {size} bytes, got {0}", size = BLOCK_WORK_SIZE)]
    InvalidLength(usize),

    #[error("Nonce offset {0} does not fit inside the block work")]
    NonceOffset(usize),

    #[error("Expected digest must be {size} bytes, got {0}", size = HASH_SIZE)]
    InvalidDigest(usize),

    #[error("Hashing failed: {0}")]
    Hash(#[from] algorithm::Error),
}

/// A 112-byte block work with a nonce slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWork {
    bytes: [u8; BLOCK_WORK_SIZE],
    nonce_offset: usize,
}

impl BlockWork {
    pub fn new(bytes: [u8; BLOCK_WORK_SIZE], nonce_offset: usize) -> Result<Self, WorkError> {
        if nonce_offset > BLOCK_WORK_SIZE - NONCE_LEN {
            return Err(WorkError::NonceOffset(nonce_offset));
        }
        Ok(Self {
            bytes,
            nonce_offset,
        })
    }

    pub fn from_slice(bytes: &[u8], nonce_offset: usize) -> Result<Self, WorkError> {
        let bytes: [u8; BLOCK_WORK_SIZE] = bytes
            .try_into()
            .map_err(|_| WorkError::InvalidLength(bytes.len()))?;
        Self::new(bytes, nonce_offset)
    }

    /// Parse a hex encoded work (surrounding whitespace ignored)
    pub fn from_hex(s: &str, nonce_offset: usize) -> Result<Self, WorkError> {
        let bytes = hex::decode(s.trim())?;
        Self::from_slice(&bytes, nonce_offset)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_WORK_SIZE] {
        &self.bytes
    }

    pub fn nonce_offset(&self) -> usize {
        self.nonce_offset
    }

    pub fn nonce(&self) -> u64 {
        let mut raw = [0u8; NONCE_LEN];
        raw.copy_from_slice(&self.bytes[self.nonce_offset..self.nonce_offset + NONCE_LEN]);
        u64::from_le_bytes(raw)
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.bytes[self.nonce_offset..self.nonce_offset + NONCE_LEN]
            .copy_from_slice(&nonce.to_le_bytes());
    }

    /// Copy of this work carrying `nonce`
    pub fn with_nonce(&self, nonce: u64) -> Self {
        let mut work = self.clone();
        work.set_nonce(nonce);
        work
    }

    /// Digest of the work with a caller-owned hasher
    pub fn hash(&self, hasher: &mut XelisHashV2) -> Result<[u8; HASH_SIZE], WorkError> {
        Ok(hasher.hash(&self.bytes)?)
    }
}

/// Result of [`verify`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub digest: [u8; HASH_SIZE],
    /// `None` when no expected digest was given
    pub matches_expected: Option<bool>,
    pub meets_difficulty: bool,
}

impl Verification {
    /// Digest matches (when given) and difficulty is met
    pub fn is_valid(&self) -> bool {
        self.meets_difficulty && self.matches_expected.unwrap_or(true)
    }
}

/// Recompute the digest of `input` and check it
pub fn verify(
    input: &[u8],
    expected: Option<&[u8]>,
    difficulty: u32,
) -> Result<Verification, WorkError> {
    let expected: Option<[u8; HASH_SIZE]> = expected
        .map(|e| e.try_into().map_err(|_| WorkError::InvalidDigest(e.len())))
        .transpose()?;

    let digest = algorithm::hash(input)?;
    let verification = Verification {
        digest,
        matches_expected: expected.map(|e| e == digest),
        meets_difficulty: algorithm::meets_difficulty(&digest, difficulty),
    };

    tracing::debug!(
        digest = %hex::encode(digest),
        valid = verification.is_valid(),
        "verified work"
    );
    Ok(verification)
}
