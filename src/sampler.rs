//! Caching wrapper around a `Sampler`
//!
//! Lookup protocol for every call:
//! 1. map coordinates (integer mode rounds and saturates first)
//! 2. all-zero keys go straight to the inner sampler
//! 3. compute the slot index and compare the stored key bit-for-bit
//! 4. hit returns the stored value, miss samples and overwrites the slot

use noise_sampler::Sampler;
use tracing::{debug, warn};

use crate::config::{CacheConfig, CacheSamplerTemplate, CoordinateMode, Dimensions};
use crate::coords::saturate_to_int;
use crate::error::Result;
use crate::store::TableStore;
use crate::table::{Float2DKey, Float3DKey, Int2DKey, Int3DKey, SlotKey};

/// A direct-mapped, thread-local cache in front of a deterministic sampler.
///
/// Exposes the same `Sampler` interface as the sampler it wraps, so it can be
/// used (and nested) anywhere a plain sampler is expected. Each thread that
/// samples through it gets a private table on first use.
///
/// Results are only correct if the inner sampler is a pure function of
/// `(seed, coordinates)`; stale values are returned otherwise.
pub struct CacheSampler<S> {
    sampler: S,
    config: CacheConfig,
    store: TableStore,
}

impl<S: Sampler> CacheSampler<S> {
    pub fn new(sampler: S, config: CacheConfig) -> Self {
        debug!(
            dimensions = config.dimensions.count(),
            mode = ?config.mode,
            exp = config.exponent.get(),
            slots = config.slots(),
            bytes_per_thread = config.table_bytes(),
            "building cache sampler"
        );
        if (config.exponent.get() as u32) < config.dimensions.packing_bits() {
            warn!(
                exp = config.exponent.get(),
                packing_bits = config.dimensions.packing_bits(),
                "cache exponent smaller than region packing, samples within one region may collide"
            );
        }

        Self {
            store: TableStore::new(config.layout(), config.exponent),
            sampler,
            config,
        }
    }

    /// Build from raw options; fails if an explicit exponent is outside `[0, 20]`
    pub fn with_options(
        sampler: S,
        dimensions: Dimensions,
        mode: CoordinateMode,
        exp: Option<i32>,
    ) -> Result<Self> {
        Ok(Self::new(sampler, CacheConfig::new(dimensions, mode, exp)?))
    }

    pub fn from_template(sampler: S, template: &CacheSamplerTemplate) -> Result<Self> {
        Ok(Self::new(sampler, template.resolve()?))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn inner(&self) -> &S {
        &self.sampler
    }

    /// Whether the calling thread has allocated its table yet
    pub fn has_thread_table(&self) -> bool {
        self.store.has_table()
    }

    /// Hit/miss protocol shared by all four layouts.
    ///
    /// The table borrow is released while `compute` runs, so the inner
    /// sampler may itself sample through other caches on this thread.
    #[inline]
    fn lookup<K: SlotKey>(&self, key: K, compute: impl FnOnce() -> f64) -> f64 {
        // Unwritten slots hold the all-zero key
        if key.is_zero() {
            return compute();
        }

        let index = key.slot(self.config.exponent.mask());
        let hit = self.store.with_table(|table| table.keyed::<K>().get(index, &key));
        if let Some(value) = hit {
            return value;
        }

        let value = compute();
        self.store.with_table(|table| table.keyed::<K>().put(index, key, value));
        value
    }
}

impl<S: Sampler> Sampler for CacheSampler<S> {
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        match self.config.mode {
            CoordinateMode::Float => {
                if self.config.dimensions != Dimensions::Two {
                    return self.sampler.sample_2d(seed, x, z);
                }
                self.lookup(Float2DKey { seed, x, z }, || self.sampler.sample_2d(seed, x, z))
            }
            CoordinateMode::Int => {
                let ix = saturate_to_int(x);
                let iz = saturate_to_int(z);
                let sample = || self.sampler.sample_2d(seed, ix as f64, iz as f64);
                if self.config.dimensions != Dimensions::Two {
                    return sample();
                }
                self.lookup(Int2DKey { seed, x: ix, z: iz }, sample)
            }
        }
    }

    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        match self.config.mode {
            CoordinateMode::Float => {
                if self.config.dimensions != Dimensions::Three {
                    return self.sampler.sample_3d(seed, x, y, z);
                }
                self.lookup(Float3DKey { seed, x, y, z }, || self.sampler.sample_3d(seed, x, y, z))
            }
            CoordinateMode::Int => {
                let ix = saturate_to_int(x);
                let iy = saturate_to_int(y);
                let iz = saturate_to_int(z);
                let sample = || self.sampler.sample_3d(seed, ix as f64, iy as f64, iz as f64);
                if self.config.dimensions != Dimensions::Three {
                    return sample();
                }
                self.lookup(Int3DKey { seed, x: ix, y: iy, z: iz }, sample)
            }
        }
    }
}
