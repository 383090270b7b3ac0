//! Sizing policy and cache configuration
//!
//! `CacheSamplerTemplate` is the user-facing form, as it appears in a pack
//! file. `CacheConfig` is the validated form a `CacheSampler` is built from.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::index::{BITS_2D, BITS_3D};
use crate::table::Layout;

/// Largest accepted size exponent (2^20 slots)
pub const MAX_EXPONENT: u8 = 20;
/// Default exponent for 2-D caches (256 slots)
pub const DEFAULT_EXPONENT_2D: u8 = 8;
/// Default exponent for 3-D caches (131072 slots)
pub const DEFAULT_EXPONENT_3D: u8 = 17;

/// Template value meaning "use the dimension default"
const EXPONENT_DEFAULT_SENTINEL: i32 = -1;

/// A table size exponent in `[0, 20]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SizeExponent(u8);

impl SizeExponent {
    pub fn new(exp: i32) -> Result<Self> {
        if (0..=MAX_EXPONENT as i32).contains(&exp) {
            Ok(Self(exp as u8))
        } else {
            Err(ConfigError::ExponentOutOfRange { exp })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of slots, always a power of two
    pub fn slots(self) -> usize {
        1usize << self.0
    }

    pub fn mask(self) -> usize {
        self.slots() - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensions {
    Two,
    Three,
}

impl Dimensions {
    pub fn from_count(dimensions: u8) -> Result<Self> {
        match dimensions {
            2 => Ok(Dimensions::Two),
            3 => Ok(Dimensions::Three),
            _ => Err(ConfigError::UnsupportedDimensions { dimensions }),
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Dimensions::Two => 2,
            Dimensions::Three => 3,
        }
    }

    pub fn default_exponent(self) -> SizeExponent {
        match self {
            Dimensions::Two => SizeExponent(DEFAULT_EXPONENT_2D),
            Dimensions::Three => SizeExponent(DEFAULT_EXPONENT_3D),
        }
    }

    /// Index bits the region-local packing consumes
    pub fn packing_bits(self) -> u32 {
        match self {
            Dimensions::Two => BITS_2D,
            Dimensions::Three => BITS_3D,
        }
    }
}

/// How coordinates become key components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateMode {
    /// Raw `f64` coordinates
    #[default]
    Float,
    /// Rounded half up and saturated to `i32` before lookup and sampling
    Int,
}

/// Resolve an optional user exponent against the dimension default.
///
/// Out-of-range values are an error, never silently defaulted.
pub fn resolve_exponent(dimensions: Dimensions, exp: Option<i32>) -> Result<SizeExponent> {
    match exp {
        None => Ok(dimensions.default_exponent()),
        Some(exp) => SizeExponent::new(exp),
    }
}

/// Validated cache parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    pub dimensions: Dimensions,
    pub mode: CoordinateMode,
    pub exponent: SizeExponent,
}

impl CacheConfig {
    pub fn new(dimensions: Dimensions, mode: CoordinateMode, exp: Option<i32>) -> Result<Self> {
        let exponent = resolve_exponent(dimensions, exp)?;
        Ok(Self { dimensions, mode, exponent })
    }

    /// Dimension default size
    pub fn with_default_size(dimensions: Dimensions, mode: CoordinateMode) -> Self {
        Self {
            dimensions,
            mode,
            exponent: dimensions.default_exponent(),
        }
    }

    pub fn layout(&self) -> Layout {
        match (self.dimensions, self.mode) {
            (Dimensions::Two, CoordinateMode::Float) => Layout::Float2D,
            (Dimensions::Two, CoordinateMode::Int) => Layout::Int2D,
            (Dimensions::Three, CoordinateMode::Float) => Layout::Float3D,
            (Dimensions::Three, CoordinateMode::Int) => Layout::Int3D,
        }
    }

    pub fn slots(&self) -> usize {
        self.exponent.slots()
    }

    /// Memory one thread's table occupies
    pub fn table_bytes(&self) -> usize {
        self.slots() * self.layout().slot_bytes()
    }
}

/// Cache sampler options as written in configuration.
///
/// ```json
/// { "dimensions": 3, "int": true, "exp": 12 }
/// ```
///
/// `exp` may be omitted or `-1` for the dimension default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSamplerTemplate {
    pub dimensions: u8,
    #[serde(rename = "int")]
    pub int_coordinates: bool,
    pub exp: Option<i32>,
}

impl Default for CacheSamplerTemplate {
    fn default() -> Self {
        Self {
            dimensions: 2,
            int_coordinates: false,
            exp: None,
        }
    }
}

impl CacheSamplerTemplate {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and resolve into a `CacheConfig`
    pub fn resolve(&self) -> Result<CacheConfig> {
        let dimensions = Dimensions::from_count(self.dimensions)?;
        let mode = if self.int_coordinates {
            CoordinateMode::Int
        } else {
            CoordinateMode::Float
        };
        let exp = self.exp.filter(|&e| e != EXPONENT_DEFAULT_SENTINEL);
        CacheConfig::new(dimensions, mode, exp)
    }
}
