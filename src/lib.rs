//! Sampler Cache
//!
//! A direct-mapped, per-thread cache placed in front of deterministic noise
//! samplers. Generation passes that revisit the same coordinates within one
//! 16-wide region are served from a fixed-size table instead of re-running
//! the sampler.
//!
//! Architecture:
//! 1. `coords` - Integer-mode rounding and saturation
//! 2. `index` - Region-local bit-packing slot index
//! 3. `table` - Slot keys and the four table layouts
//! 4. `store` - Lazily built thread-local tables
//! 5. `config` - Sizing policy and configuration template
//! 6. `sampler` - `CacheSampler`, the lookup/store protocol

pub mod config;
pub mod coords;
pub mod error;
pub mod index;
pub mod sampler;
pub mod store;
pub mod table;

pub use noise_sampler as noise;

pub use config::{CacheConfig, CacheSamplerTemplate, CoordinateMode, Dimensions, SizeExponent};
pub use error::{ConfigError, Result};
pub use noise_sampler::Sampler;
pub use sampler::CacheSampler;
pub use table::Layout;
