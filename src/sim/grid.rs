//! Uniform-grid broad phase
//!
//! Entities are bucketed into every fixed-size cell their AABB spans. The grid
//! is rebuilt from scratch each tick, so it never holds stale membership. Cell
//! lookups are conservative: callers still run the exact AABB test.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::entity::{Entity, EntityId, EntityKind};
use crate::Rect;

/// What the grid stores per entity: enough to filter and test without
/// borrowing the caller's lists across the tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Position in the caller's list for this kind
    pub index: usize,
    pub bounds: Rect,
}

/// Occupancy figures for an adaptive-quality controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GridStats {
    pub occupied_cells: usize,
    /// Total cell memberships (an entity spanning 4 cells counts 4 times)
    pub entries: usize,
    pub max_cell_occupancy: usize,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<GridEntry>>,
    /// Set when entity positions changed since the last rebuild
    stale: bool,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
            stale: false,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Empty all cells. Cells used last rebuild keep their allocation; cells
    /// that stayed empty for a whole tick are dropped.
    pub fn clear(&mut self) {
        self.cells.retain(|_, entries| {
            let used = !entries.is_empty();
            entries.clear();
            used
        });
        self.stale = false;
    }

    /// Mark the grid out of date (entities moved). Queries assert against this.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    #[inline]
    fn cell_coord(&self, v: f32) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    /// Inclusive cell range covered by a rectangle
    fn cell_range(&self, rect: &Rect) -> ((i32, i32), (i32, i32)) {
        let min = rect.min();
        let max = rect.max();
        (
            (self.cell_coord(min.x), self.cell_coord(max.x)),
            (self.cell_coord(min.y), self.cell_coord(max.y)),
        )
    }

    /// Insert an entity into every cell its AABB spans
    pub fn insert(&mut self, entity: &Entity, index: usize) {
        let entry = GridEntry {
            id: entity.id,
            kind: entity.kind,
            index,
            bounds: entity.bounds(),
        };
        let ((x0, x1), (y0, y1)) = self.cell_range(&entry.bounds);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(entry);
            }
        }
    }

    /// Clear and insert every entity of the given lists
    pub fn rebuild(&mut self, lists: &[&[Entity]]) {
        self.clear();
        for list in lists {
            for (index, entity) in list.iter().enumerate() {
                self.insert(entity, index);
            }
        }
    }

    /// Union of all entries in cells covering `rect`, de-duplicated by id
    fn collect(&self, rect: &Rect, exclude: Option<EntityId>) -> Vec<GridEntry> {
        debug_assert!(!self.stale, "spatial grid queried before rebuild");

        let ((x0, x1), (y0, y1)) = self.cell_range(rect);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let Some(entries) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for entry in entries {
                    if Some(entry.id) == exclude {
                        continue;
                    }
                    if seen.insert(entry.id) {
                        out.push(*entry);
                    }
                }
            }
        }
        out
    }

    /// Broad-phase candidates sharing a cell with `entity` (never itself).
    /// May include non-overlapping entries.
    pub fn query_near(&self, entity: &Entity) -> Vec<GridEntry> {
        self.collect(&entity.bounds(), Some(entity.id))
    }

    /// Entries whose AABB truly intersects the rectangle
    pub fn query_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<GridEntry> {
        let rect = Rect::new(x, y, w, h);
        let mut out = self.collect(&rect, None);
        out.retain(|entry| entry.bounds.overlaps(&rect));
        out
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats::default();
        for entries in self.cells.values() {
            if entries.is_empty() {
                continue;
            }
            stats.occupied_cells += 1;
            stats.entries += entries.len();
            stats.max_cell_occupancy = stats.max_cell_occupancy.max(entries.len());
        }
        stats
    }
}
