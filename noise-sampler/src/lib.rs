//! Noise sampling capability shared by world generation code
//!
//! Architecture:
//! 1. `sampler` - The `Sampler` trait every noise source implements
//! 2. `perlin` - Seeded gradient noise usable as a concrete `Sampler`
//!
//! Samplers are pure functions of `(seed, coordinates)` and are called
//! concurrently from worker threads, so every implementation is `Send + Sync`.

mod sampler;
mod perlin;

pub use sampler::{Sampler, FnSampler};
pub use perlin::PerlinNoise;
