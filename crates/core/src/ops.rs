//! The 16-way operation selector of the mixing stage

use crate::wide::{combine, div128by64, mod128by64, mul128_hi};

/// Rotate left by `shift mod 64`
#[inline(always)]
pub(crate) fn rotl(value: u64, shift: u64) -> u64 {
    value.rotate_left((shift & 63) as u32)
}

/// Rotate right by `shift mod 64`
#[inline(always)]
pub(crate) fn rotr(value: u64, shift: u64) -> u64 {
    value.rotate_right((shift & 63) as u32)
}

/// Apply operation `op` (low 4 bits used) to the operands `a`, `b`, `c`.
///
/// `r` is the running scratchpad counter (already advanced for this step),
/// `addr` the current address, `iter`/`j` the outer and inner loop indices.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn apply(op: u64, a: u64, b: u64, c: u64, r: u64, addr: u64, iter: u64, j: u64) -> u64 {
    match op & 0xF {
        0 => rotl(c, iter.wrapping_mul(j)) ^ b,
        1 => rotr(c, iter.wrapping_mul(j)) ^ a,
        2 => a ^ b ^ c,
        3 => a.wrapping_add(b).wrapping_mul(c),
        4 => b.wrapping_sub(c).wrapping_mul(a),
        5 => c.wrapping_sub(a).wrapping_add(b),
        6 => a.wrapping_sub(b).wrapping_add(c),
        7 => b.wrapping_mul(c).wrapping_add(a),
        8 => c.wrapping_mul(a).wrapping_add(b),
        9 => a.wrapping_mul(b).wrapping_mul(c),
        10 => mod128by64(a, b, c | 1),
        11 => {
            let threshold = combine(rotl(addr, r), a | 2);
            let mixed = combine(b, c);
            if threshold > mixed {
                c
            } else {
                (mixed % threshold) as u64
            }
        }
        12 => div128by64(c, a, b | 4),
        13 => {
            let t1 = combine(rotl(addr, r), b);
            let t2 = combine(a, c | 8);
            if t1 > t2 { (t1 / t2) as u64 } else { a ^ b }
        }
        14 => mul128_hi(b, a, 0, c),
        _ => mul128_hi(a, c, rotr(addr, r), b),
    }
}
