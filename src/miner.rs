//! Multi-threaded nonce search over a block work

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::algorithm::{meets_difficulty, XelisHashV2, HASH_SIZE};
use crate::work::BlockWork;

/// How often the coordinating thread wakes up to check on workers
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A nonce whose digest meets the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundProof {
    pub nonce: u64,
    pub hash: [u8; HASH_SIZE],
    /// The work with the winning nonce in place
    pub work: BlockWork,
}

/// What a search ended with
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub proof: Option<FoundProof>,
    /// Hashes computed by all threads
    pub hashes: u64,
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }
}

/// CPU miner
///
/// Thread `t` of `N` tries nonces `start + t`, `start + t + N`, ... so no
/// two threads ever hash the same nonce.
#[derive(Debug, Clone)]
pub struct Miner {
    threads: usize,
    difficulty: u32,
    report_interval: Duration,
}

impl Miner {
    pub fn new(threads: usize, difficulty: u32) -> Self {
        Self {
            threads: threads.max(1),
            difficulty,
            report_interval: Duration::from_secs(5),
        }
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Search from `start_nonce` until a digest meets the difficulty
    ///
    /// With `max_hashes` set, exactly the nonces
    /// `start_nonce..start_nonce + max_hashes` are covered at most, and the
    /// search gives up once they are exhausted.
    pub fn search(
        &self,
        work: &BlockWork,
        start_nonce: u64,
        max_hashes: Option<u64>,
    ) -> SearchOutcome {
        let num_threads = self.threads as u64;
        let difficulty = self.difficulty;

        info!(
            threads = self.threads,
            difficulty,
            start_nonce,
            "Starting nonce search"
        );

        // Shared state for threads
        let total_hashes = Arc::new(AtomicU64::new(0));
        let found = Arc::new(Mutex::new(None::<FoundProof>));
        let stop = Arc::new(AtomicBool::new(false));

        let start = Instant::now();
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(self.threads);

        for thread_id in 0..num_threads {
            let mut work = work.clone();
            let total_hashes = Arc::clone(&total_hashes);
            let found = Arc::clone(&found);
            let stop = Arc::clone(&stop);

            let handle = std::thread::spawn(move || {
                let mut hasher = XelisHashV2::new();
                let mut index = thread_id;

                while !stop.load(Ordering::Relaxed) {
                    if max_hashes.is_some_and(|max| index >= max) {
                        break;
                    }

                    let nonce = start_nonce.wrapping_add(index);
                    work.set_nonce(nonce);
                    let result = match work.hash(&mut hasher) {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(error = %e, "Hashing failed, stopping worker");
                            break;
                        }
                    };
                    total_hashes.fetch_add(1, Ordering::Relaxed);

                    if meets_difficulty(&result, difficulty) {
                        let mut guard = found.lock().unwrap_or_else(|e| e.into_inner());
                        if guard.is_none() {
                            *guard = Some(FoundProof {
                                nonce,
                                hash: result,
                                work: work.clone(),
                            });
                            stop.store(true, Ordering::SeqCst);
                        }
                        return;
                    }

                    index = match index.checked_add(num_threads) {
                        Some(next) => next,
                        None => break,
                    };
                }
                debug!(thread_id, "Worker finished");
            });
            handles.push(handle);
        }

        // Monitor progress while threads work
        let mut last_report = Instant::now();
        while !handles.iter().all(JoinHandle::is_finished) {
            std::thread::sleep(POLL_INTERVAL);

            if last_report.elapsed() >= self.report_interval {
                let hashes = total_hashes.load(Ordering::Relaxed);
                let elapsed = start.elapsed().as_secs_f64();
                info!(
                    hashes,
                    hashrate = %format!("{:.2} H/s", hashes as f64 / elapsed),
                    elapsed = %format!("{:.0}s", elapsed),
                    "Mining"
                );
                last_report = Instant::now();
            }
        }

        // Wait for all threads to finish
        for handle in handles {
            if handle.join().is_err() {
                warn!("Mining thread panicked");
            }
        }

        let proof = found.lock().unwrap_or_else(|e| e.into_inner()).take();
        let outcome = SearchOutcome {
            proof,
            hashes: total_hashes.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };

        match &outcome.proof {
            Some(proof) => info!(
                nonce = proof.nonce,
                hash = %hex::encode(proof.hash),
                hashes = outcome.hashes,
                "Found valid proof"
            ),
            None => info!(hashes = outcome.hashes, "Search exhausted without a proof"),
        }

        outcome
    }
}
