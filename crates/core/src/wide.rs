//! 128-bit helpers for the operation selector
//!
//! A `(high, low)` pair always means the unsigned value `high * 2^64 + low`.

/// Build the 128-bit value `high * 2^64 + low`
#[inline(always)]
pub const fn combine(high: u64, low: u64) -> u128 {
    ((high as u128) << 64) | low as u128
}

/// Upper 64 bits of the full product `x * y`
#[inline(always)]
pub const fn mul_hi64(x: u64, y: u64) -> u64 {
    ((x as u128 * y as u128) >> 64) as u64
}

/// Low 64 bits of `combine(high, low) / divisor`
///
/// `divisor` must be non-zero; every caller ORs a constant into it.
#[inline(always)]
pub const fn div128by64(high: u64, low: u64, divisor: u64) -> u64 {
    (combine(high, low) / divisor as u128) as u64
}

/// `combine(high, low) mod divisor`, which always fits in 64 bits
#[inline(always)]
pub const fn mod128by64(high: u64, low: u64, divisor: u64) -> u64 {
    (combine(high, low) % divisor as u128) as u64
}

/// Bits [64, 128) of `left * right`
///
/// Bits above 127 of the true product never reach this window, so the
/// wrapping 128-bit multiply yields the same word as the untruncated one.
#[inline(always)]
pub const fn mul128_hi(left_high: u64, left_low: u64, right_high: u64, right_low: u64) -> u64 {
    (combine(left_high, left_low).wrapping_mul(combine(right_high, right_low)) >> 64) as u64
}
