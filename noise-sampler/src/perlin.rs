//! Seeded gradient noise
//!
//! Permutation and gradient tables are shuffled once at construction by a
//! combined scalar/two-lane xorshift generator. The per-call seed is folded
//! into the lattice hash, so one instance serves every seed.

use crate::sampler::Sampler;

/// Twelve cube-edge directions used for 3-D gradients
const GRADIENTS_3D: [(f64, f64, f64); 12] = [
    (1.0, 1.0, 0.0), (-1.0, 1.0, 0.0), (1.0, -1.0, 0.0), (-1.0, -1.0, 0.0),
    (1.0, 0.0, 1.0), (-1.0, 0.0, 1.0), (1.0, 0.0, -1.0), (-1.0, 0.0, -1.0),
    (0.0, 1.0, 1.0), (0.0, -1.0, 1.0), (0.0, 1.0, -1.0), (0.0, -1.0, -1.0),
];

/// Scalar xorshift combined with two independently shifted lanes
struct Xorshift {
    scalar: u32,
    lanes: [u32; 2],
}

impl Xorshift {
    fn new(seed: u32) -> Self {
        // Tiny seeds produce long runs of zero bits
        let init = seed.max(0x155);
        Self { scalar: init, lanes: [init, init] }
    }

    fn next(&mut self) -> u32 {
        let x = self.scalar;
        let tmp = x ^ (x << 13);
        let scalar = ((x << 12) & 0xFFFF_E000) | ((tmp >> 19) & 0x1FFF);
        self.scalar = scalar;

        let [s0, s1] = self.lanes;
        let lane0 = (((s0 << 3) ^ s0) >> 11) | ((s0 << 17) & 0xFFE0_0000);
        let lane1 = (((s1 << 2) ^ s1) >> 25) | ((s1 << 4) & 0xFFFF_FF80);
        self.lanes = [lane0, lane1];

        lane0 ^ lane1 ^ scalar
    }

    /// Fisher-Yates shuffle
    fn shuffle<T>(&mut self, items: &mut [T; 256]) {
        for i in (1..=255).rev() {
            let j = (self.next() as usize) % (i + 1);
            items.swap(i, j);
        }
    }
}

/// Multi-octave gradient noise with a radial falloff kernel.
///
/// Deterministic for a given construction salt, frequency and octave count.
#[derive(Clone)]
pub struct PerlinNoise {
    perm1: [u8; 256],
    perm2: [u8; 256],
    gradients: [(f64, f64); 256],
    frequency: f64,
    octaves: u32,
    persistence: f64,
}

impl PerlinNoise {
    const GRADIENT_MAGNITUDE: f64 = 4.2;

    pub fn new(salt: u32) -> Self {
        let mut perm1 = [0u8; 256];
        let mut perm2 = [0u8; 256];
        for i in 0..256 {
            perm1[i] = i as u8;
            perm2[i] = i as u8;
        }

        let mut gradients = [(0.0f64, 0.0f64); 256];
        for (i, g) in gradients.iter_mut().enumerate() {
            let angle = (i as f64) * std::f64::consts::TAU / 256.0;
            *g = (angle.cos() * Self::GRADIENT_MAGNITUDE, angle.sin() * Self::GRADIENT_MAGNITUDE);
        }

        // One generator across all shuffles
        let mut rng = Xorshift::new(salt);
        rng.shuffle(&mut perm1);
        rng.shuffle(&mut perm2);
        rng.shuffle(&mut gradients);

        Self {
            perm1,
            perm2,
            gradients,
            frequency: 1.0,
            octaves: 1,
            persistence: 0.5,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Number of octaves, at least one
    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves.max(1);
        self
    }

    pub fn with_persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }

    #[inline]
    fn fold_seed(seed: i64) -> u8 {
        let s = (seed as u64) ^ ((seed as u64) >> 32);
        let s = s ^ (s >> 16);
        (s ^ (s >> 8)) as u8
    }

    #[inline]
    fn hash2(&self, seed_byte: u8, xi: i32, zi: i32) -> usize {
        let a = self.perm2[(xi & 0xFF) as usize] ^ seed_byte;
        (self.perm1[(a ^ (zi & 0xFF) as u8) as usize]) as usize
    }

    #[inline]
    fn hash3(&self, seed_byte: u8, xi: i32, yi: i32, zi: i32) -> usize {
        let a = self.perm2[(xi & 0xFF) as usize] ^ seed_byte;
        let b = self.perm1[(a ^ (yi & 0xFF) as u8) as usize];
        (self.perm2[(b ^ (zi & 0xFF) as u8) as usize]) as usize
    }

    /// Single octave, radial falloff: (1 - min(dist², 1))³
    fn noise2(&self, seed_byte: u8, x: f64, z: f64) -> f64 {
        let x0 = x.floor();
        let z0 = z.floor();
        let fx = x - x0;
        let fz = z - z0;
        let (x0, z0) = (x0 as i32, z0 as i32);

        let mut result = 0.0;
        for dz in 0..2i32 {
            for dx in 0..2i32 {
                let (gx, gz) = self.gradients[self.hash2(seed_byte, x0.wrapping_add(dx), z0.wrapping_add(dz))];
                let ox = fx - dx as f64;
                let oz = fz - dz as f64;
                let w = (1.0 - (ox * ox + oz * oz).min(1.0)).powi(3);
                result += (gx * ox + gz * oz) * w;
            }
        }
        result
    }

    fn noise3(&self, seed_byte: u8, x: f64, y: f64, z: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let z0 = z.floor();
        let (fx, fy, fz) = (x - x0, y - y0, z - z0);
        let (x0, y0, z0) = (x0 as i32, y0 as i32, z0 as i32);

        let mut result = 0.0;
        for dy in 0..2i32 {
            for dz in 0..2i32 {
                for dx in 0..2i32 {
                    let h = self.hash3(seed_byte, x0.wrapping_add(dx), y0.wrapping_add(dy), z0.wrapping_add(dz));
                    let (gx, gy, gz) = GRADIENTS_3D[h % GRADIENTS_3D.len()];
                    let ox = fx - dx as f64;
                    let oy = fy - dy as f64;
                    let oz = fz - dz as f64;
                    let w = (1.0 - (ox * ox + oy * oy + oz * oz).min(1.0)).powi(3);
                    result += (gx * ox + gy * oy + gz * oz) * w * Self::GRADIENT_MAGNITUDE;
                }
            }
        }
        result
    }

    /// Sum octaves, normalized by total amplitude
    fn fractal(&self, mut octave: impl FnMut(f64) -> f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += octave(frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= 2.0;
        }

        total / max_amplitude
    }
}

impl Sampler for PerlinNoise {
    fn sample_2d(&self, seed: i64, x: f64, z: f64) -> f64 {
        let seed_byte = Self::fold_seed(seed);
        self.fractal(|f| self.noise2(seed_byte, x * f, z * f))
    }

    fn sample_3d(&self, seed: i64, x: f64, y: f64, z: f64) -> f64 {
        let seed_byte = Self::fold_seed(seed);
        self.fractal(|f| self.noise3(seed_byte, x * f, y * f, z * f))
    }
}
