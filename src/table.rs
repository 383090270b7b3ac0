//! Direct-mapped slot tables
//!
//! A table is `2^exp` slots, each holding one key and one value. A store into
//! an occupied slot overwrites it; there is no probing or chaining. Tables are
//! allocated zeroed, so an unwritten slot looks like the all-zero key, which
//! is why callers bypass the table for that key.

use std::mem;

use serde::Serialize;

use crate::config::SizeExponent;
use crate::coords::truncate_to_int;
use crate::index::{index_2d, index_3d};

/// A cache key: compared bit-for-bit and able to place itself in a table
pub trait SlotKey: Copy + Default + Eq {
    /// Every component is the zero bit pattern
    fn is_zero(&self) -> bool;

    /// Slot index for a table with the given mask
    fn slot(&self, mask: usize) -> usize;

    /// The typed table inside a layout-tagged table, if the layout matches
    fn table(table: &mut Table) -> Option<&mut DirectTable<Self>>;
}

/// 2-D key with raw `f64` coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct Float2DKey {
    pub seed: i64,
    pub x: f64,
    pub z: f64,
}

/// 2-D key with rounded, saturated coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Int2DKey {
    pub seed: i64,
    pub x: i32,
    pub z: i32,
}

/// 3-D key with raw `f64` coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct Float3DKey {
    pub seed: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3-D key with rounded, saturated coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Int3DKey {
    pub seed: i64,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

// Float keys never use epsilon or IEEE equality: 0.0 and -0.0 differ,
// and a NaN matches only the same NaN bits.
impl PartialEq for Float2DKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.x.to_bits() == other.x.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for Float2DKey {}

impl PartialEq for Float3DKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for Float3DKey {}

impl SlotKey for Float2DKey {
    #[inline]
    fn is_zero(&self) -> bool {
        (self.x.to_bits() | self.z.to_bits() | self.seed as u64) == 0
    }

    #[inline]
    fn slot(&self, mask: usize) -> usize {
        index_2d(truncate_to_int(self.x), truncate_to_int(self.z), self.seed, mask)
    }

    fn table(table: &mut Table) -> Option<&mut DirectTable<Self>> {
        match table {
            Table::Float2D(t) => Some(t),
            _ => None,
        }
    }
}

impl SlotKey for Int2DKey {
    #[inline]
    fn is_zero(&self) -> bool {
        self.x == 0 && self.z == 0 && self.seed == 0
    }

    #[inline]
    fn slot(&self, mask: usize) -> usize {
        index_2d(self.x, self.z, self.seed, mask)
    }

    fn table(table: &mut Table) -> Option<&mut DirectTable<Self>> {
        match table {
            Table::Int2D(t) => Some(t),
            _ => None,
        }
    }
}

impl SlotKey for Float3DKey {
    #[inline]
    fn is_zero(&self) -> bool {
        (self.x.to_bits() | self.y.to_bits() | self.z.to_bits() | self.seed as u64) == 0
    }

    #[inline]
    fn slot(&self, mask: usize) -> usize {
        index_3d(truncate_to_int(self.x), truncate_to_int(self.y), truncate_to_int(self.z), mask)
    }

    fn table(table: &mut Table) -> Option<&mut DirectTable<Self>> {
        match table {
            Table::Float3D(t) => Some(t),
            _ => None,
        }
    }
}

impl SlotKey for Int3DKey {
    #[inline]
    fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0 && self.seed == 0
    }

    #[inline]
    fn slot(&self, mask: usize) -> usize {
        index_3d(self.x, self.y, self.z, mask)
    }

    fn table(table: &mut Table) -> Option<&mut DirectTable<Self>> {
        match table {
            Table::Int3D(t) => Some(t),
            _ => None,
        }
    }
}

/// One key and its cached value
#[derive(Debug, Clone, Copy, Default)]
pub struct Slot<K> {
    key: K,
    value: f64,
}

/// Fixed-size, direct-mapped table of slots
pub struct DirectTable<K> {
    slots: Box<[Slot<K>]>,
    mask: usize,
}

impl<K: SlotKey> DirectTable<K> {
    /// Allocate `2^exp` zeroed slots
    pub fn new(exp: SizeExponent) -> Self {
        let size = exp.slots();
        Self {
            slots: vec![Slot::default(); size].into_boxed_slice(),
            mask: size - 1,
        }
    }

    pub fn mask(&self) -> usize {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bytes used by one slot of this key type
    pub const fn slot_bytes() -> usize {
        mem::size_of::<Slot<K>>()
    }

    /// Stored value if the slot at `index` holds exactly `key`
    #[inline]
    pub fn get(&self, index: usize, key: &K) -> Option<f64> {
        let slot = &self.slots[index & self.mask];
        if slot.key == *key {
            Some(slot.value)
        } else {
            None
        }
    }

    /// Overwrite the slot at `index` with a new key and value
    #[inline]
    pub fn put(&mut self, index: usize, key: K, value: f64) {
        self.slots[index & self.mask] = Slot { key, value };
    }
}

/// Which key type a table stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Layout {
    Float2D,
    Int2D,
    Float3D,
    Int3D,
}

impl Layout {
    /// Bytes used by one slot in this layout
    pub fn slot_bytes(self) -> usize {
        match self {
            Layout::Float2D => DirectTable::<Float2DKey>::slot_bytes(),
            Layout::Int2D => DirectTable::<Int2DKey>::slot_bytes(),
            Layout::Float3D => DirectTable::<Float3DKey>::slot_bytes(),
            Layout::Int3D => DirectTable::<Int3DKey>::slot_bytes(),
        }
    }
}

/// A table of one of the four layouts
pub enum Table {
    Float2D(DirectTable<Float2DKey>),
    Int2D(DirectTable<Int2DKey>),
    Float3D(DirectTable<Float3DKey>),
    Int3D(DirectTable<Int3DKey>),
}

impl Table {
    pub fn new(layout: Layout, exp: SizeExponent) -> Self {
        match layout {
            Layout::Float2D => Table::Float2D(DirectTable::new(exp)),
            Layout::Int2D => Table::Int2D(DirectTable::new(exp)),
            Layout::Float3D => Table::Float3D(DirectTable::new(exp)),
            Layout::Int3D => Table::Int3D(DirectTable::new(exp)),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Table::Float2D(_) => Layout::Float2D,
            Table::Int2D(_) => Layout::Int2D,
            Table::Float3D(_) => Layout::Float3D,
            Table::Int3D(_) => Layout::Int3D,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Table::Float2D(t) => t.len(),
            Table::Int2D(t) => t.len(),
            Table::Float3D(t) => t.len(),
            Table::Int3D(t) => t.len(),
        }
    }

    /// The typed table for `K`; a layout that cannot hold `K` is a bug
    pub fn keyed<K: SlotKey>(&mut self) -> &mut DirectTable<K> {
        let layout = self.layout();
        match K::table(self) {
            Some(t) => t,
            None => unreachable!("{:?} table cannot hold this key type", layout),
        }
    }
}
