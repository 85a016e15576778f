//! Stage 3: pointer-chasing memory mix over `memA` / `memB`

use crate::aes::diffuse;
use crate::ops::{apply, rotl, rotr};
use crate::params::{BUFFER_SIZE, MEM_WORDS, SCRATCHPAD_ITERS};
use crate::scratchpad::Workspace;

/// Index into one scratchpad half
#[inline(always)]
fn slot(value: u64) -> usize {
    (value % BUFFER_SIZE as u64) as usize
}

/// Mix the decoded scratchpad in place, then serialize it back to bytes
pub fn stage_3(ws: &mut Workspace) {
    let mem_a = &mut ws.mem_a[..];
    let mem_b = &mut ws.mem_b[..];

    let mut addr = mem_b[BUFFER_SIZE - 1];
    let mut r: usize = 0;

    for iter in 0..SCRATCHPAD_ITERS {
        let av = mem_a[slot(addr)];
        let bv = mem_b[slot(!rotr(addr, r as u64))];

        let mut block = [0u8; 16];
        block[..8].copy_from_slice(&bv.to_le_bytes());
        block[8..].copy_from_slice(&av.to_le_bytes());
        diffuse(&mut block);

        let mut hash1 = [0u8; 8];
        hash1.copy_from_slice(&block[..8]);
        addr = !(u64::from_le_bytes(hash1) ^ av ^ bv);

        for j in 0..BUFFER_SIZE {
            let a = mem_a[slot(addr)];
            let b = mem_b[slot(!rotr(addr, r as u64))];
            let c = if r < BUFFER_SIZE {
                mem_a[r]
            } else {
                mem_b[r - BUFFER_SIZE]
            };
            r = if r < MEM_WORDS - 1 { r + 1 } else { 0 };

            let op = rotl(addr, c);
            let v = apply(op, a, b, c, r as u64, addr, iter as u64, j as u64);
            addr = (addr ^ v).rotate_left(1);

            let target = BUFFER_SIZE - j - 1;
            let t = mem_a[target] ^ addr;
            mem_a[target] = t;
            mem_b[j] ^= rotr(t, addr);
        }
    }

    ws.encode();
}
