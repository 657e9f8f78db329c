//! Uniform spatial hash over world coordinates
//!
//! Every item is filed under the cell its position rounds to, plus the
//! neighbouring cells on the side its position leans towards: one, two or
//! four cells in total. Two items whose positions are less than one cell
//! apart along both axes therefore always share at least one cell, which is
//! what makes a lookup of the candidate's own cells sufficient for items no
//! larger than a cell. Larger items are not reliably found this way; callers
//! that know a probe is oversized must fall back to an exhaustive scan.
//!
//! The grid owns the reverse mapping (item key to cell set), so moving an
//! item is an incremental diff of its old and new cell sets.

use crate::foundation::math::{sign, Vec2};
use slotmap::{Key, SecondaryMap};
use std::collections::HashMap;

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl CellKey {
    /// Create a cell key
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The one, two or four cells an item is filed under, in lookup order
///
/// Equality ignores the order: two sets are equal when they hold the same cells.
#[derive(Debug, Clone, Copy)]
pub struct CellSet {
    keys: [CellKey; 4],
    len: u8,
}

impl CellSet {
    fn single(key: CellKey) -> Self {
        Self { keys: [key; 4], len: 1 }
    }

    fn push(&mut self, key: CellKey) {
        // Neighbours collapse onto the primary cell at the edge of the i32 range
        if !self.contains(key) {
            self.keys[usize::from(self.len)] = key;
            self.len += 1;
        }
    }

    /// Cells as a slice
    pub fn as_slice(&self) -> &[CellKey] {
        &self.keys[..usize::from(self.len)]
    }

    /// Iterate over the cells
    pub fn iter(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.as_slice().iter().copied()
    }

    /// Number of cells (1, 2 or 4)
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Always false; a cell set holds at least the primary cell
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `key` is one of the cells
    pub fn contains(&self, key: CellKey) -> bool {
        self.as_slice().contains(&key)
    }

    /// The cell the position rounds to
    pub fn primary(&self) -> CellKey {
        self.keys[0]
    }
}

impl PartialEq for CellSet {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|cell| other.contains(cell))
    }
}

impl Eq for CellSet {}

/// Spatial hash keyed by slotmap keys
#[derive(Debug, Clone)]
pub struct SpatialHash<K: Key> {
    cell_width: f32,
    cell_height: f32,
    cells: HashMap<CellKey, Vec<K>>,
    occupancy: SecondaryMap<K, CellSet>,
}

impl<K: Key> SpatialHash<K> {
    /// Create an empty hash with the given cell size
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
            cells: HashMap::new(),
            occupancy: SecondaryMap::new(),
        }
    }

    /// Cell width in world units
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Cell height in world units
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Cells an item at `position` is filed under
    ///
    /// The primary cell comes first, followed by the horizontal neighbour,
    /// the diagonal neighbour and the vertical neighbour, each present only
    /// when the position is off-center along the relevant axes. Cell
    /// coordinates saturate at the bounds of `i32`.
    pub fn cells_for(&self, position: Vec2) -> CellSet {
        let x = (position.x / self.cell_width).round();
        let y = (position.y / self.cell_height).round();
        let dx = sign(position.x - self.cell_width * x);
        let dy = sign(position.y - self.cell_height * y);
        let (x, y) = (x as i32, y as i32);

        let mut set = CellSet::single(CellKey::new(x, y));
        let (nx, ny) = (x.saturating_add(dx), y.saturating_add(dy));
        if dx != 0 {
            set.push(CellKey::new(nx, y));
            if dy != 0 {
                set.push(CellKey::new(nx, ny));
            }
        }
        if dy != 0 {
            set.push(CellKey::new(x, ny));
        }
        set
    }

    /// File `key` under the cells for `position`
    ///
    /// Inserting a key that is already present moves it instead.
    pub fn insert(&mut self, key: K, position: Vec2) -> CellSet {
        if self.occupancy.contains_key(key) {
            self.update(key, position);
        } else {
            let set = self.cells_for(position);
            for cell in set.iter() {
                self.cells.entry(cell).or_default().push(key);
            }
            self.occupancy.insert(key, set);
        }
        self.occupancy[key]
    }

    /// Remove `key` from every cell it is filed under
    pub fn remove(&mut self, key: K) -> bool {
        let Some(set) = self.occupancy.remove(key) else {
            return false;
        };
        for cell in set.iter() {
            self.detach(cell, key);
        }
        true
    }

    /// Re-file `key` for a new position, touching only the cells that changed
    ///
    /// Returns whether the cell set changed. Unknown keys are ignored.
    pub fn update(&mut self, key: K, position: Vec2) -> bool {
        let Some(&old) = self.occupancy.get(key) else {
            return false;
        };
        let new = self.cells_for(position);
        if old == new {
            return false;
        }
        for cell in old.iter().filter(|cell| !new.contains(*cell)) {
            self.detach(cell, key);
        }
        for cell in new.iter().filter(|cell| !old.contains(*cell)) {
            self.cells.entry(cell).or_default().push(key);
        }
        self.occupancy.insert(key, new);
        true
    }

    fn detach(&mut self, cell: CellKey, key: K) {
        if let Some(bucket) = self.cells.get_mut(&cell) {
            if let Some(index) = bucket.iter().position(|&k| k == key) {
                bucket.remove(index);
            }
            if bucket.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    /// Whether `key` is filed in the hash
    pub fn contains(&self, key: K) -> bool {
        self.occupancy.contains_key(key)
    }

    /// Cells `key` is currently filed under
    pub fn cells_of(&self, key: K) -> Option<&CellSet> {
        self.occupancy.get(key)
    }

    /// Items filed under `cell`, in insertion order
    pub fn bucket(&self, cell: CellKey) -> &[K] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Items filed under any of `cells`, cell by cell
    ///
    /// An item filed under several of the cells is yielded once per cell.
    pub fn candidates<'a>(&'a self, cells: &'a CellSet) -> impl Iterator<Item = K> + 'a {
        cells.iter().flat_map(move |cell| self.bucket(cell).iter().copied())
    }

    /// Number of filed items
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    /// Whether nothing is filed
    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.cells.clear();
        self.occupancy.clear();
    }

    /// Check the forward and reverse mappings against each other
    ///
    /// Every filed item must appear exactly once in each of its cells and in
    /// no other cell.
    pub fn is_consistent(&self) -> bool {
        let forward_ok = self.occupancy.iter().all(|(key, set)| {
            set.iter()
                .all(|cell| self.bucket(cell).iter().filter(|&&k| k == key).count() == 1)
        });
        let reverse_ok = self.cells.iter().all(|(cell, bucket)| {
            !bucket.is_empty()
                && bucket
                    .iter()
                    .all(|&key| self.occupancy.get(key).is_some_and(|set| set.contains(*cell)))
        });
        forward_ok && reverse_ok
    }
}
