//! XelisHash v2 hasher: stage 1, stage 3, BLAKE3 finalization
//!
//! `hash`, `hash_range` and `hash_batch` validate their arguments up front
//! and return an [`Error`] without computing anything when they are
//! invalid.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::mixer::stage_3;
use crate::params::{HASH_SIZE, INPUT_LENGTH};
use crate::scratchpad::{Workspace, stage_1};

/// XelisHash v2 hasher
///
/// Owns one [`Workspace`] (~880 KB) and reuses it for every call. Keep one
/// per worker thread; a hasher is never shared between concurrent hashes.
pub struct XelisHashV2 {
    workspace: Workspace,
}

impl XelisHashV2 {
    /// Create a new hasher, allocating its workspace
    pub fn new() -> Self {
        Self {
            workspace: Workspace::new(),
        }
    }

    /// Hash up to [`INPUT_LENGTH`] bytes (zero-padded to that length)
    pub fn hash(&mut self, input: &[u8]) -> Result<[u8; HASH_SIZE]> {
        check_length(input.len())?;
        Ok(compute(&mut self.workspace, input))
    }

    /// Hash `data[offset..offset + len]`
    pub fn hash_range(&mut self, data: &[u8], offset: usize, len: usize) -> Result<[u8; HASH_SIZE]> {
        let message = checked_range(data, offset, len)?;
        self.hash(message)
    }

    /// Hash `count` consecutive `item_len`-byte records of `src` into
    /// consecutive 32-byte slots of `dest`, returning the number hashed.
    ///
    /// `item_len == 0` or `count == 0` is a no-op returning 0.
    pub fn hash_batch(
        &mut self,
        src: &[u8],
        item_len: usize,
        count: usize,
        dest: &mut [u8],
    ) -> Result<usize> {
        let Some((src, dest)) = batch_regions(src, item_len, count, dest)? else {
            return Ok(0);
        };

        for (record, out) in src
            .chunks_exact(item_len)
            .zip(dest.chunks_exact_mut(HASH_SIZE))
        {
            out.copy_from_slice(&compute(&mut self.workspace, record));
        }

        Ok(count)
    }
}

impl Default for XelisHashV2 {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage 1 + stage 3 + BLAKE3 over the whole scratchpad
#[inline]
fn compute(ws: &mut Workspace, message: &[u8]) -> [u8; HASH_SIZE] {
    ws.load_input(message);
    stage_1(ws);
    stage_3(ws);
    blake3::hash(ws.scratchpad()).into()
}

#[inline]
fn check_length(len: usize) -> Result<()> {
    if len > INPUT_LENGTH {
        return Err(Error::LengthExceeded { len });
    }
    Ok(())
}

fn checked_range(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => Ok(&data[offset..end]),
        _ => Err(Error::OutOfBounds {
            offset: i64::try_from(offset).unwrap_or(i64::MAX),
            len: i64::try_from(len).unwrap_or(i64::MAX),
            available: data.len(),
        }),
    }
}

/// Validate a batch and return the exact source and destination regions
fn batch_regions<'a, 'b>(
    src: &'a [u8],
    item_len: usize,
    count: usize,
    dest: &'b mut [u8],
) -> Result<Option<(&'a [u8], &'b mut [u8])>> {
    if item_len == 0 || count == 0 {
        return Ok(None);
    }

    let required_in = item_len as u128 * count as u128;
    if (src.len() as u128) < required_in {
        return Err(Error::CapacityError {
            required: required_in,
            available: src.len(),
        });
    }
    let required_out = HASH_SIZE as u128 * count as u128;
    if (dest.len() as u128) < required_out {
        return Err(Error::CapacityError {
            required: required_out,
            available: dest.len(),
        });
    }
    check_length(item_len)?;

    // Both products fit: they are bounded by the slice lengths
    let src = &src[..item_len * count];
    let dest = &mut dest[..HASH_SIZE * count];
    Ok(Some((src, dest)))
}

/// Convenience function for single-shot hashing
///
/// Allocates a fresh workspace. For repeated hashing, keep a
/// [`XelisHashV2`] around instead.
pub fn hash(input: &[u8]) -> Result<[u8; HASH_SIZE]> {
    XelisHashV2::new().hash(input)
}

/// Single-shot hash of `data[offset..offset + len]`
pub fn hash_range(data: &[u8], offset: usize, len: usize) -> Result<[u8; HASH_SIZE]> {
    let message = checked_range(data, offset, len)?;
    hash(message)
}

/// Single-shot batch hashing, see [`XelisHashV2::hash_batch`]
pub fn hash_batch(src: &[u8], item_len: usize, count: usize, dest: &mut [u8]) -> Result<usize> {
    XelisHashV2::new().hash_batch(src, item_len, count, dest)
}

/// Batch hashing across the rayon pool
///
/// Same contract and output as [`hash_batch`]; each rayon worker job gets
/// its own [`Workspace`].
#[cfg(feature = "parallel")]
pub fn hash_batch_parallel(
    src: &[u8],
    item_len: usize,
    count: usize,
    dest: &mut [u8],
) -> Result<usize> {
    let Some((src, dest)) = batch_regions(src, item_len, count, dest)? else {
        return Ok(0);
    };

    src.par_chunks_exact(item_len)
        .zip(dest.par_chunks_exact_mut(HASH_SIZE))
        .for_each_init(Workspace::new, |ws, (record, out)| {
            out.copy_from_slice(&compute(ws, record));
        });

    Ok(count)
}

/// Check if a hash meets the required difficulty
///
/// Difficulty is measured as the number of leading zero bits required.
/// For example, difficulty 16 requires the first 2 bytes to be zero.
///
/// # Example
///
/// ```rust
/// use xelishash_core::meets_difficulty;
///
/// let hash: [u8; 32] = [
///     0x00, 0x00, 0x0F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
///     0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
/// ];
/// assert!(meets_difficulty(&hash, 20));
/// assert!(!meets_difficulty(&hash, 21));
/// ```
#[inline(always)]
pub fn meets_difficulty(hash: &[u8; HASH_SIZE], difficulty: u32) -> bool {
    let mut zero_bits = 0u32;

    for byte in hash.iter() {
        if *byte == 0 {
            zero_bits += 8;
        } else {
            zero_bits += byte.leading_zeros();
            break;
        }
    }

    zero_bits >= difficulty
}
