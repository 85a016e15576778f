//! Tests for the XelisHash v2 algorithm

use crate::{
    Error, HASH_SIZE, INPUT_LENGTH, XelisHashV2, hash, hash_batch, hash_range, meets_difficulty,
};

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

fn counting_input() -> [u8; INPUT_LENGTH] {
    let mut input = [0u8; INPUT_LENGTH];
    for (i, byte) in input.iter_mut().enumerate() {
        *byte = i as u8;
    }
    input
}

#[test]
fn test_basic_hash() {
    let input = b"test input data";
    let result = hash(input).unwrap();

    // Hash should be 32 bytes
    assert_eq!(result.len(), HASH_SIZE);

    // Hash should be deterministic
    let result2 = hash(input).unwrap();
    assert_eq!(result, result2);
}

#[test]
fn test_different_inputs_produce_different_hashes() {
    let hash1 = hash(b"input 1").unwrap();
    let hash2 = hash(b"input 2").unwrap();

    assert_ne!(hash1, hash2);
}

#[test]
fn test_zero_padding_is_implicit() {
    // Shorter inputs are padded with zeros up to 112 bytes
    let mut padded = [0u8; INPUT_LENGTH];
    padded[..5].copy_from_slice(b"xelis");

    assert_eq!(hash(b"xelis").unwrap(), hash(&padded).unwrap());
    assert_eq!(hash(&[]).unwrap(), hash(&[0u8; INPUT_LENGTH]).unwrap());
}

#[test]
fn test_length_boundary() {
    let exact = vec![0x11u8; INPUT_LENGTH];
    assert!(hash(&exact).is_ok());

    let over = vec![0x11u8; INPUT_LENGTH + 1];
    assert_eq!(hash(&over), Err(Error::LengthExceeded { len: 113 }));

    let mut hasher = XelisHashV2::new();
    assert!(matches!(
        hasher.hash(&over),
        Err(Error::LengthExceeded { .. })
    ));
}

#[test]
fn test_hash_range() {
    let data = [0x42u8; 300];

    assert_eq!(
        hash_range(&data, 100, 50).unwrap(),
        hash(&data[100..150]).unwrap()
    );
    assert_eq!(hash_range(&data, 300, 0).unwrap(), hash(&[]).unwrap());

    assert!(matches!(
        hash_range(&data, 250, 51),
        Err(Error::OutOfBounds { .. })
    ));
    assert!(matches!(
        hash_range(&data, usize::MAX, 2),
        Err(Error::OutOfBounds { .. })
    ));
    // In bounds but too long
    assert!(matches!(
        hash_range(&data, 0, 113),
        Err(Error::LengthExceeded { len: 113 })
    ));
}

#[test]
fn test_avalanche_effect() {
    // Changing one bit should change ~50% of output bits
    let input1 = counting_input();
    let base = hash(&input1).unwrap();

    let mut total = 0u32;
    let trials = [0usize, 37, 111];
    for &pos in &trials {
        let mut input2 = input1;
        input2[pos] ^= 1;
        let flipped = hash(&input2).unwrap();

        let diff_bits: u32 = base
            .iter()
            .zip(flipped.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        total += diff_bits;
    }

    // Expect roughly 128 bits (50% of 256) on average
    let average = total / trials.len() as u32;
    assert!(
        (90..=166).contains(&average),
        "Avalanche effect: {} bits differ on average (expected ~128)",
        average
    );
}

#[test]
fn test_hasher_reusability() {
    let mut hasher = XelisHashV2::new();

    let hash1 = hasher.hash(b"first input").unwrap();
    let hash2 = hasher.hash(&[0xFF; INPUT_LENGTH]).unwrap();

    assert_ne!(hash1, hash2);

    // A long input before must not leak into a short one after
    let hash1_again = hasher.hash(b"first input").unwrap();
    assert_eq!(hash1, hash1_again);
    assert_eq!(hash1, hash(b"first input").unwrap());
}

#[test]
fn test_batch_matches_single() {
    let item_len = INPUT_LENGTH;
    let count = 3;
    let mut src = Vec::with_capacity(item_len * count);
    for i in 0..count {
        src.extend(core::iter::repeat_n(i as u8 + 1, item_len));
    }

    let mut dest = vec![0u8; HASH_SIZE * count];
    assert_eq!(hash_batch(&src, item_len, count, &mut dest), Ok(count));

    for i in 0..count {
        let expected = hash(&src[i * item_len..(i + 1) * item_len]).unwrap();
        assert_eq!(&dest[i * HASH_SIZE..(i + 1) * HASH_SIZE], &expected[..]);
    }
}

#[test]
fn test_batch_leaves_trailing_bytes() {
    let src = [7u8; 64];
    let mut dest = [0xEEu8; 80];

    assert_eq!(hash_batch(&src, 32, 2, &mut dest), Ok(2));
    assert_eq!(&dest[..32], &hash(&src[..32]).unwrap()[..]);
    assert!(dest[64..].iter().all(|&b| b == 0xEE));
}

#[test]
fn test_batch_noop() {
    let src = [1u8; 10];
    let mut dest = [0xAAu8; 64];

    assert_eq!(hash_batch(&src, 0, 5, &mut dest), Ok(0));
    assert_eq!(hash_batch(&src, 5, 0, &mut dest), Ok(0));
    // Even with buffers far too small
    assert_eq!(hash_batch(&[], 0, 1000, &mut []), Ok(0));
    assert!(dest.iter().all(|&b| b == 0xAA));
}

#[test]
fn test_batch_capacity_errors() {
    let src = [0u8; 100];
    let mut dest = [0u8; 64];

    // Source too small: 3 * 40 > 100
    assert_eq!(
        hash_batch(&src, 40, 3, &mut dest),
        Err(Error::CapacityError {
            required: 120,
            available: 100
        })
    );
    // Destination too small: 3 * 32 > 64
    assert_eq!(
        hash_batch(&src, 30, 3, &mut dest),
        Err(Error::CapacityError {
            required: 96,
            available: 64
        })
    );
    // Overflowing sizes are a capacity problem, not a panic
    assert!(matches!(
        hash_batch(&src, usize::MAX, usize::MAX, &mut dest),
        Err(Error::CapacityError { .. })
    ));
    assert!(dest.iter().all(|&b| b == 0));
}

#[test]
fn test_batch_rejects_long_records_before_writing() {
    let src = vec![0u8; 113 * 2];
    let mut dest = [0x55u8; 64];

    assert_eq!(
        hash_batch(&src, 113, 2, &mut dest),
        Err(Error::LengthExceeded { len: 113 })
    );
    assert!(dest.iter().all(|&b| b == 0x55));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_batch_matches_sequential() {
    use crate::hash_batch_parallel;

    let item_len = 76;
    let count = 6;
    let src: Vec<u8> = (0..item_len * count).map(|i| (i * 7) as u8).collect();

    let mut sequential = vec![0u8; HASH_SIZE * count];
    let mut parallel = vec![0u8; HASH_SIZE * count];
    assert_eq!(hash_batch(&src, item_len, count, &mut sequential), Ok(count));
    assert_eq!(
        hash_batch_parallel(&src, item_len, count, &mut parallel),
        Ok(count)
    );
    assert_eq!(sequential, parallel);

    assert_eq!(hash_batch_parallel(&src, 0, count, &mut parallel), Ok(0));
    assert!(matches!(
        hash_batch_parallel(&src, item_len, count + 1, &mut parallel),
        Err(Error::CapacityError { .. })
    ));
}

#[cfg(feature = "std")]
#[test]
fn test_independent_threads_agree() {
    let input = counting_input();
    let expected = hash(&input).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || XelisHashV2::new().hash(&input).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_difficulty_check() {
    // Hash with 8 leading zero bits (starts with 0x00)
    let mut hash_8_zeros = [0xFFu8; 32];
    hash_8_zeros[0] = 0x00;

    assert!(meets_difficulty(&hash_8_zeros, 8));
    assert!(!meets_difficulty(&hash_8_zeros, 9));

    // Hash with 16 leading zero bits (starts with 0x0000)
    let mut hash_16_zeros = [0xFFu8; 32];
    hash_16_zeros[..2].fill(0);

    assert!(meets_difficulty(&hash_16_zeros, 16));
    assert!(!meets_difficulty(&hash_16_zeros, 17));

    // Hash with leading 0x0F (4 zero bits)
    let mut hash_4_zeros = [0xFFu8; 32];
    hash_4_zeros[0] = 0x0F;

    assert!(meets_difficulty(&hash_4_zeros, 4));
    assert!(!meets_difficulty(&hash_4_zeros, 5));

    assert!(meets_difficulty(&[0u8; 32], 256));
    assert!(meets_difficulty(&[0xFFu8; 32], 0));
}

/// Reference vector for input bytes 0..112
#[test]
fn reference_vector() {
    let result = hash(&counting_input()).unwrap();

    #[cfg(feature = "std")]
    println!("\nReference vector (0..112): {}", hex::encode(result));

    assert_eq!(
        hex::encode(result),
        "fe2be82e0ed570125c57d75e7e8424baacb7d3b21cf906df819859e3ee9c81fe"
    );
}

#[test]
#[ignore] // Run with: cargo test timing_breakdown -- --ignored --nocapture
fn timing_breakdown() {
    use crate::mixer::stage_3;
    use crate::scratchpad::{Workspace, stage_1};
    use std::time::Instant;

    let iterations = 10;
    let mut ws = Workspace::new();
    ws.load_input(&counting_input());

    let mut stage1 = core::time::Duration::ZERO;
    let mut stage3 = core::time::Duration::ZERO;
    let mut finalize = core::time::Duration::ZERO;

    for _ in 0..iterations {
        let start = Instant::now();
        stage_1(&mut ws);
        stage1 += start.elapsed();

        let start = Instant::now();
        stage_3(&mut ws);
        stage3 += start.elapsed();

        let start = Instant::now();
        let _ = blake3::hash(ws.scratchpad());
        finalize += start.elapsed();
    }

    let total = stage1 + stage3 + finalize;
    println!("\n=== TIMING BREAKDOWN ===");
    println!("Per hash:   {:?}", total / iterations);
    println!("Hashrate:   {:.1} H/s", iterations as f64 / total.as_secs_f64());
    println!("Stage 1:    {:?}", stage1 / iterations);
    println!("Stage 3:    {:?}", stage3 / iterations);
    println!("Finalize:   {:?}", finalize / iterations);
}
