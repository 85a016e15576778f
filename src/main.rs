//! XelisHash Prover CLI
//!
//! A command-line tool around the XelisHash v2 proof-of-work digest.
//!
//! # Commands
//!
//! - `hash` - Hash a hex encoded input
//! - `batch` - Hash a file of fixed-size records
//! - `verify` - Check the digest and difficulty of a block work
//! - `mine` - Search a nonce for a block work
//! - `benchmark` - Run performance benchmark
//! - `config` - Print or save the effective configuration

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use xelishash::algorithm::{self, HASH_SIZE};
use xelishash::config::default_config_path;
use xelishash::{logging, verify, BlockWork, LogLevel, Miner, ProverConfig, XelisHashV2};

#[derive(Parser)]
#[command(name = "xelishash")]
#[command(version)]
#[command(about = "XelisHash v2 proof-of-work hasher and CPU miner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash up to 112 bytes of hex input
    Hash {
        /// Hex encoded input
        input: String,

        /// Treat the input as UTF-8 text instead of hex
        #[arg(long)]
        text: bool,
    },

    /// Hash a binary file of fixed-size records, one digest per line
    Batch {
        /// File holding the records back to back
        file: PathBuf,

        /// Size of one record in bytes (at most 112)
        #[arg(long)]
        item_len: usize,

        /// Spread records over all CPU cores
        #[arg(long)]
        parallel: bool,
    },

    /// Check a block work against an expected digest and/or difficulty
    Verify {
        /// Hex encoded work (at most 112 bytes)
        work: String,

        /// Expected hex digest
        #[arg(long)]
        expected: Option<String>,

        /// Required leading zero bits (default: from config)
        #[arg(short, long)]
        difficulty: Option<u32>,
    },

    /// Search a nonce that makes the block work meet the difficulty
    Mine {
        /// Hex encoded 112-byte block work
        work: String,

        /// Number of threads to use (default: from config, 0 = all cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Target difficulty (number of leading zero bits)
        #[arg(short, long)]
        difficulty: Option<u32>,

        /// First nonce to try
        #[arg(long, default_value = "0")]
        start_nonce: u64,

        /// Give up after this many hashes
        #[arg(long)]
        max_hashes: Option<u64>,

        /// Byte offset of the nonce inside the work
        #[arg(long)]
        nonce_offset: Option<usize>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of hashes to compute
        #[arg(short, long, default_value = "20")]
        count: u32,

        /// Also run the parallel batch hasher
        #[arg(long)]
        parallel: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Save it to the config file as well
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ProverConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    logging::init(config.log_level);

    match cli.command {
        Commands::Hash { input, text } => cmd_hash(&input, text),
        Commands::Batch {
            file,
            item_len,
            parallel,
        } => cmd_batch(&file, item_len, parallel),
        Commands::Verify {
            work,
            expected,
            difficulty,
        } => cmd_verify(&work, expected.as_deref(), difficulty.unwrap_or(config.difficulty)),
        Commands::Mine {
            work,
            threads,
            difficulty,
            start_nonce,
            max_hashes,
            nonce_offset,
        } => {
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if let Some(difficulty) = difficulty {
                config.difficulty = difficulty;
            }
            if let Some(offset) = nonce_offset {
                config.nonce_offset = offset;
            }
            config.validate()?;
            cmd_mine(&config, &work, start_nonce, max_hashes)
        }
        Commands::Benchmark { count, parallel } => cmd_benchmark(count, parallel),
        Commands::Config { write } => cmd_config(&config, cli.config.as_deref(), write),
    }
}

fn cmd_hash(input: &str, text: bool) -> anyhow::Result<()> {
    let bytes = if text {
        input.as_bytes().to_vec()
    } else {
        hex::decode(input.trim()).context("Input is not valid hex")?
    };

    let digest = algorithm::hash(&bytes)?;
    println!("{}", hex::encode(digest));

    Ok(())
}

fn cmd_batch(file: &Path, item_len: usize, parallel: bool) -> anyhow::Result<()> {
    if item_len == 0 {
        anyhow::bail!("--item-len must be at least 1");
    }

    let src = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let count = src.len() / item_len;
    let trailing = src.len() % item_len;
    if trailing != 0 {
        warn!(trailing, "Ignoring incomplete trailing record");
    }

    let mut dest = vec![0u8; count * HASH_SIZE];
    let start = Instant::now();
    let hashed = if parallel {
        algorithm::hash_batch_parallel(&src, item_len, count, &mut dest)?
    } else {
        algorithm::hash_batch(&src, item_len, count, &mut dest)?
    };
    info!(
        records = hashed,
        elapsed = %format!("{:.2}s", start.elapsed().as_secs_f64()),
        "Batch complete"
    );

    for digest in dest.chunks_exact(HASH_SIZE) {
        println!("{}", hex::encode(digest));
    }

    Ok(())
}

fn cmd_verify(work: &str, expected: Option<&str>, difficulty: u32) -> anyhow::Result<()> {
    let input = hex::decode(work.trim()).context("Work is not valid hex")?;
    let expected = expected
        .map(|e| hex::decode(e.trim()).context("Expected digest is not valid hex"))
        .transpose()?;

    let result = verify(&input, expected.as_deref(), difficulty)?;

    println!("Hash:       {}", hex::encode(result.digest));
    if let Some(matches) = result.matches_expected {
        println!("Matches:    {}", if matches { "yes" } else { "NO" });
    }
    println!(
        "Difficulty: {} bits {}",
        difficulty,
        if result.meets_difficulty { "met" } else { "NOT met" }
    );

    if !result.is_valid() {
        anyhow::bail!("Verification failed");
    }
    println!("Valid");

    Ok(())
}

fn cmd_mine(
    config: &ProverConfig,
    work: &str,
    start_nonce: u64,
    max_hashes: Option<u64>,
) -> anyhow::Result<()> {
    let work = BlockWork::from_hex(work, config.nonce_offset)?;
    let num_threads = config.thread_count();

    println!("Starting mining...");
    println!("Difficulty: {} bits", config.difficulty);
    println!("Nonce offset: {}", work.nonce_offset());
    println!("Threads: {}", num_threads);

    let miner = Miner::new(num_threads, config.difficulty)
        .with_report_interval(Duration::from_secs(config.report_interval_secs.max(1)));
    let outcome = miner.search(&work, start_nonce, max_hashes);

    let Some(proof) = outcome.proof.as_ref() else {
        anyhow::bail!(
            "No valid nonce found after {} hashes ({:.2} H/s)",
            outcome.hashes,
            outcome.hashrate()
        );
    };

    println!("\nFound valid proof!");
    println!("  Hash:   {}", hex::encode(proof.hash));
    println!("  Nonce:  {}", proof.nonce);
    println!("  Work:   {}", proof.work.to_hex());
    println!(
        "  Hashes: {} ({:.2} H/s)",
        outcome.hashes,
        outcome.hashrate()
    );

    Ok(())
}

fn cmd_benchmark(count: u32, parallel: bool) -> anyhow::Result<()> {
    println!("Running benchmark with {} hashes...", count);

    let mut hasher = XelisHashV2::new();
    let mut input = [0u8; algorithm::INPUT_LENGTH];

    let start = Instant::now();

    for i in 0..count {
        input[..4].copy_from_slice(&i.to_le_bytes());
        hasher.hash(&input)?;
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total hashes: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);

    if parallel {
        let records = count as usize;
        let src: Vec<u8> = (0..records * algorithm::INPUT_LENGTH)
            .map(|i| i as u8)
            .collect();
        let mut dest = vec![0u8; records * HASH_SIZE];

        let start = Instant::now();
        algorithm::hash_batch_parallel(&src, algorithm::INPUT_LENGTH, records, &mut dest)?;
        let elapsed = start.elapsed();

        println!(
            "  Parallel hashrate: {:.2} H/s ({} threads)",
            records as f64 / elapsed.as_secs_f64(),
            num_cpus::get()
        );
    }

    // Memory info
    println!("\nAlgorithm parameters:");
    println!("  Version: {}", algorithm::VERSION);
    println!("  Scratchpad: {} KB", algorithm::SCRATCH_BYTES / 1024);
    println!("  Memory words: {}", algorithm::MEM_WORDS);
    println!("  Mixing steps: {} x {}", algorithm::SCRATCHPAD_ITERS, algorithm::BUFFER_SIZE);
    println!("  ChaCha rounds: {}", algorithm::CHACHA_ROUNDS);

    Ok(())
}

fn cmd_config(config: &ProverConfig, path: Option<&Path>, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_config_path().context("No config directory on this platform")?,
        };
        config.save_to_file(&path)?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}
