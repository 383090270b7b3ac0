//! Slot index functions
//!
//! Both layouts pack the position inside a 16-wide region into the low bits,
//! so every column (2-D) or block up to 512 levels tall (3-D) of one region
//! lands in its own slot once the table has at least `BITS_2D` / `BITS_3D`
//! index bits. Smaller tables are allowed and simply collide more.

/// Index bits consumed by the 2-D region-local packing
pub const BITS_2D: u32 = 8;
/// Index bits consumed by the 3-D region-local packing
pub const BITS_3D: u32 = 17;

/// Bits 0-3: region-local x, bits 4-7: region-local z, bits 8+: region
/// identity mixed with the low half of the seed.
#[inline]
pub fn index_2d(x: i32, z: i32, seed: i64, mask: usize) -> usize {
    let lo = (x & 0xF) | ((z & 0xF) << 4);
    let hi = (x >> 4) ^ (z >> 4) ^ (seed as i32);
    (lo | (hi << 8)) as u32 as usize & mask
}

/// Bits 0-3: region-local x, bits 4-7: region-local z, bits 8-16: y.
/// The seed is not mixed in.
#[inline]
pub fn index_3d(x: i32, y: i32, z: i32, mask: usize) -> usize {
    ((x & 0xF) | ((z & 0xF) << 4) | ((y & 0x1FF) << 8)) as usize & mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    const MASK_2D: usize = (1 << BITS_2D) - 1;
    const MASK_3D: usize = (1 << BITS_3D) - 1;

    #[test]
    fn test_2d_region_distinct() {
        for seed in [0i64, 1, -1, 0x1234_5678_9ABC, i64::MIN] {
            for (rx, rz) in [(0, 0), (3, -7), (-1, -1), (100_000, 42)] {
                let mut seen = AHashSet::new();
                for x in 0..16 {
                    for z in 0..16 {
                        seen.insert(index_2d(rx * 16 + x, rz * 16 + z, seed, MASK_2D));
                    }
                }
                assert_eq!(seen.len(), 256, "collision in region ({}, {}) seed {}", rx, rz, seed);
            }
        }
    }

    #[test]
    fn test_2d_distinct_with_larger_table() {
        let mask = (1 << 20) - 1;
        let mut seen = AHashSet::new();
        for x in 0..16 {
            for z in 0..16 {
                seen.insert(index_2d(x, z, 987654321, mask));
            }
        }
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn test_3d_region_distinct() {
        for (rx, rz, base_y) in [(0, 0, 0), (5, -3, -64), (-2, 9, 256)] {
            let mut seen = AHashSet::with_capacity(16 * 16 * 512);
            for x in 0..16 {
                for z in 0..16 {
                    for y in 0..512 {
                        seen.insert(index_3d(rx * 16 + x, base_y + y, rz * 16 + z, MASK_3D));
                    }
                }
            }
            assert_eq!(seen.len(), 16 * 16 * 512);
        }
    }

    #[test]
    fn test_index_in_range() {
        for exp in 0..=20u32 {
            let mask = (1usize << exp) - 1;
            for &(x, z) in &[(i32::MIN, i32::MAX), (-1, -1), (7, 300), (i32::MAX, 0)] {
                assert!(index_2d(x, z, -42, mask) <= mask);
                assert!(index_3d(x, z, x ^ z, mask) <= mask);
            }
        }
    }

    #[test]
    fn test_zero_exponent_single_slot() {
        assert_eq!(index_2d(123, -456, 789, 0), 0);
        assert_eq!(index_3d(123, -456, 789, 0), 0);
    }

    #[test]
    fn test_2d_seed_mixing() {
        // Same local position, seeds differing in the low word
        assert_ne!(index_2d(5, 5, 1, MASK_2D | 0xFF00), index_2d(5, 5, 2, MASK_2D | 0xFF00));
        // Only the low 32 bits of the seed are mixed
        assert_eq!(index_2d(5, 5, 1, 0xFFFFF), index_2d(5, 5, 1 | (1 << 40), 0xFFFFF));
    }
}
