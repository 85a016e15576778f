//! C FFI bindings for mobile wallets and foreign miners
//!
//! Offsets and lengths are signed, matching JVM/JNI callers; negative
//! values are reported as out-of-bounds. Every function returns a status
//! code: `>= 0` on success, [`Error::code`] otherwise.

use crate::error::Error;
use crate::hasher::XelisHashV2;
use crate::params::HASH_SIZE;
use core::slice;

/// Null pointer passed where a buffer was required
pub const XELIS_ERR_NULL: i32 = -4;

/// Opaque hasher handle for FFI
pub struct XHasher {
    inner: XelisHashV2,
}

/// Create a new hasher instance
/// Returns a pointer to the hasher (caller must free with xelis_free)
#[unsafe(no_mangle)]
pub extern "C" fn xelis_new() -> *mut XHasher {
    let hasher = Box::new(XHasher {
        inner: XelisHashV2::new(),
    });
    Box::into_raw(hasher)
}

/// Free a hasher instance
#[unsafe(no_mangle)]
pub extern "C" fn xelis_free(hasher: *mut XHasher) {
    if !hasher.is_null() {
        unsafe {
            let _ = Box::from_raw(hasher);
        }
    }
}

/// Hash `data[offset..offset + len]` into a 32-byte `output`
/// - hasher: pointer from xelis_new()
/// - data/data_len: the whole source buffer
/// - output: pointer to a 32-byte buffer for the result
///
/// Returns 0 on success.
#[unsafe(no_mangle)]
pub extern "C" fn xelis_hash(
    hasher: *mut XHasher,
    data: *const u8,
    data_len: usize,
    offset: i64,
    len: i64,
    output: *mut u8,
) -> i32 {
    if hasher.is_null() || output.is_null() || (data.is_null() && data_len != 0) {
        return XELIS_ERR_NULL;
    }

    let (Ok(start), Ok(count)) = (usize::try_from(offset), usize::try_from(len)) else {
        return Error::OutOfBounds {
            offset,
            len,
            available: data_len,
        }
        .code();
    };

    unsafe {
        let hasher = &mut *hasher;
        let source = raw_slice(data, data_len);

        match hasher.inner.hash_range(source, start, count) {
            Ok(digest) => {
                slice::from_raw_parts_mut(output, HASH_SIZE).copy_from_slice(&digest);
                0
            }
            Err(e) => e.code(),
        }
    }
}

/// Hash `count` records of `item_len` bytes from `src` into `dest`
///
/// Returns the number of records hashed (0 for a non-positive
/// `item_len`/`count`) or a negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn xelis_hash_batch(
    hasher: *mut XHasher,
    src: *const u8,
    src_len: usize,
    item_len: i32,
    count: i32,
    dest: *mut u8,
    dest_len: usize,
) -> i32 {
    if item_len <= 0 || count <= 0 {
        return 0;
    }
    if hasher.is_null() || (src.is_null() && src_len != 0) || (dest.is_null() && dest_len != 0) {
        return XELIS_ERR_NULL;
    }

    unsafe {
        let hasher = &mut *hasher;
        let source = raw_slice(src, src_len);
        let target: &mut [u8] = if dest.is_null() {
            Default::default()
        } else {
            slice::from_raw_parts_mut(dest, dest_len)
        };

        match hasher
            .inner
            .hash_batch(source, item_len as usize, count as usize, target)
        {
            Ok(n) => n as i32,
            Err(e) => e.code(),
        }
    }
}

/// Benchmark: compute N hashes and return total microseconds
#[unsafe(no_mangle)]
pub extern "C" fn xelis_benchmark(iterations: u32) -> u64 {
    use std::time::Instant;

    let mut hasher = XelisHashV2::new();
    let mut input = [0u8; 112];

    let start = Instant::now();
    for i in 0..iterations {
        input[..4].copy_from_slice(&i.to_le_bytes());
        let _ = hasher.hash(&input);
    }
    let elapsed = start.elapsed();

    elapsed.as_micros() as u64
}

/// Get hash rate (hashes per second) from a benchmark run
#[unsafe(no_mangle)]
pub extern "C" fn xelis_hashrate(iterations: u32, microseconds: u64) -> f64 {
    if microseconds == 0 {
        return 0.0;
    }
    (iterations as f64) / (microseconds as f64 / 1_000_000.0)
}

unsafe fn raw_slice<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr, len) }
    }
}
