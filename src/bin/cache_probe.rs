//! Measure how often a cache sampler reaches its inner sampler
//!
//! Run with: cargo run --bin cache-probe -- --dimensions 3 --int --chunks 4 --passes 3

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use clap::Parser;
use serde::Serialize;

use sampler_cache::noise::PerlinNoise;
use sampler_cache::{CacheConfig, CacheSampler, CacheSamplerTemplate, CoordinateMode, Dimensions, Layout, Sampler};

#[derive(Parser)]
#[command(name = "cache-probe")]
#[command(about = "Sample chunk grids through a cache sampler and report hit rates")]
struct Args {
    /// 2 or 3
    #[arg(long, default_value = "2")]
    dimensions: u8,

    /// Round coordinates to integers before lookup
    #[arg(long)]
    int: bool,

    /// Table size exponent (0-20); dimension default when omitted
    #[arg(long, allow_negative_numbers = true)]
    exp: Option<i32>,

    /// JSON cache template, overrides --dimensions/--int/--exp
    #[arg(long)]
    config: Option<String>,

    #[arg(long, default_value = "794420221")]
    seed: i64,

    /// Chunks per side of the sampled grid
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(i32).range(1..=65536))]
    chunks: i32,

    /// Times each chunk is swept
    #[arg(long, default_value = "3")]
    passes: u32,

    /// Blocks sampled per column in 3-D
    #[arg(long, default_value = "384", value_parser = clap::value_parser!(i32).range(1..=4096))]
    height: i32,

    /// Sample at block centers instead of block corners
    #[arg(long)]
    offset: bool,
}

/// Counts calls that reach the noise function
struct Counting<S> {
    sampler: S,
    calls: AtomicU64,
}

impl<S: Sampler> Sampler for Counting<S> {
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.sampler.sample_2d(seed, x, z)
    }

    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.sampler.sample_3d(seed, x, y, z)
    }
}

#[derive(Serialize)]
struct Report {
    config: CacheConfig,
    layout: Layout,
    bytes_per_thread: usize,
    requests: u64,
    inner_calls: u64,
    hits: u64,
    hit_rate: f64,
    checksum: f64,
    elapsed_ms: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(json) => CacheSamplerTemplate::from_json(json)?.resolve()?,
        None => {
            let mode = if args.int { CoordinateMode::Int } else { CoordinateMode::Float };
            CacheConfig::new(Dimensions::from_count(args.dimensions)?, mode, args.exp)?
        }
    };

    let noise = PerlinNoise::new(args.seed as u32)
        .with_frequency(1.0 / 64.0)
        .with_octaves(4);
    let cache = CacheSampler::new(Counting { sampler: noise, calls: AtomicU64::new(0) }, config);

    eprintln!(
        "Sampling {}x{} chunks, {} passes, {} slots...",
        args.chunks, args.chunks, args.passes, config.slots()
    );

    let offset = if args.offset { 0.5 } else { 0.0 };
    let start = Instant::now();
    let mut requests = 0u64;
    let mut checksum = 0.0;

    for cx in 0..args.chunks {
        for cz in 0..args.chunks {
            for _pass in 0..args.passes {
                for dx in 0..16 {
                    for dz in 0..16 {
                        let x = (cx * 16 + dx) as f64 + offset;
                        let z = (cz * 16 + dz) as f64 + offset;
                        match config.dimensions {
                            Dimensions::Two => {
                                checksum += cache.sample_2d(args.seed, x, z);
                                requests += 1;
                            }
                            Dimensions::Three => {
                                for y in 0..args.height {
                                    checksum += cache.sample_3d(args.seed, x, y as f64 + offset, z);
                                    requests += 1;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    let inner_calls = cache.inner().calls.load(Ordering::Relaxed);
    let hits = requests - inner_calls;
    let report = Report {
        config,
        layout: config.layout(),
        bytes_per_thread: config.table_bytes(),
        requests,
        inner_calls,
        hits,
        hit_rate: if requests == 0 { 0.0 } else { hits as f64 / requests as f64 },
        checksum,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds() {
        assert!(Args::try_parse_from(["cache-probe", "--chunks", "200000000"]).is_err());
        assert!(Args::try_parse_from(["cache-probe", "--chunks", "0"]).is_err());
        assert!(Args::try_parse_from(["cache-probe", "--height", "-1"]).is_err());
        assert!(Args::try_parse_from(["cache-probe", "--height", "5000"]).is_err());

        let args = Args::try_parse_from(["cache-probe", "--chunks", "65536", "--height", "4096"]).unwrap();
        // Largest block coordinate stays well inside i32
        assert!((args.chunks - 1).checked_mul(16).and_then(|v| v.checked_add(15)).is_some());
        assert_eq!(args.height, 4096);
    }

    #[test]
    fn test_negative_exponent_reaches_validation() {
        let args = Args::try_parse_from(["cache-probe", "--exp", "-3"]).unwrap();
        assert_eq!(args.exp, Some(-3));
        assert!(CacheConfig::new(Dimensions::Two, CoordinateMode::Float, args.exp).is_err());
    }
}
