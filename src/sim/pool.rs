//! Free-list recycling for high-churn entity categories
//!
//! Records move out of the free list on `acquire` and back in on `release`,
//! so a record can never sit in the free list while a caller holds it.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};

/// Retained free-record limits. The pool still grows past these on demand;
/// surplus records are simply dropped on release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolLimits {
    pub max_free_projectiles: usize,
    pub max_free_enemies: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_free_projectiles: 64,
            max_free_enemies: 64,
        }
    }
}

/// Occupancy snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PoolStats {
    /// Free plus in-use records
    pub pool_size: usize,
    pub in_use: usize,
    /// `in_use / pool_size`, 0 when empty
    pub utilization: f32,
}

impl PoolStats {
    fn new(free: usize, in_use: usize) -> Self {
        let pool_size = free + in_use;
        let utilization = if pool_size == 0 {
            0.0
        } else {
            in_use as f32 / pool_size as f32
        };
        Self {
            pool_size,
            in_use,
            utilization,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FreeList {
    free: Vec<Entity>,
    in_use: usize,
    /// Records ever allocated fresh (pool misses)
    allocated: usize,
}

/// Entity pool with one free list per category
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    limits: PoolLimits,
    projectiles: FreeList,
    enemies: FreeList,
    players: FreeList,
}

impl EntityPool {
    pub fn new(limits: PoolLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Pre-allocate free records so the first waves never miss
    pub fn with_prewarm(limits: PoolLimits, projectiles: usize, enemies: usize) -> Self {
        let mut pool = Self::new(limits);
        pool.projectiles.free = (0..projectiles)
            .map(|_| Entity::blank(EntityKind::Projectile))
            .collect();
        pool.enemies.free = (0..enemies)
            .map(|_| Entity::blank(EntityKind::Enemy))
            .collect();
        pool.projectiles.allocated = projectiles;
        pool.enemies.allocated = enemies;
        pool
    }

    fn list(&self, kind: EntityKind) -> &FreeList {
        match kind {
            EntityKind::Projectile => &self.projectiles,
            EntityKind::Enemy => &self.enemies,
            EntityKind::Player => &self.players,
        }
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut FreeList {
        match kind {
            EntityKind::Projectile => &mut self.projectiles,
            EntityKind::Enemy => &mut self.enemies,
            EntityKind::Player => &mut self.players,
        }
    }

    fn soft_cap(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Projectile => self.limits.max_free_projectiles,
            EntityKind::Enemy => self.limits.max_free_enemies,
            EntityKind::Player => 1,
        }
    }

    /// Take a record with category defaults. Never fails: allocates when empty.
    pub fn acquire(&mut self, kind: EntityKind) -> Entity {
        let list = self.list_mut(kind);
        list.in_use += 1;
        let mut entity = match list.free.pop() {
            Some(entity) => entity,
            None => {
                list.allocated += 1;
                Entity::blank(kind)
            }
        };
        entity.active = true;
        entity
    }

    /// Reset the record and return it to its free list
    pub fn release(&mut self, mut entity: Entity) {
        let kind = entity.kind;
        let cap = self.soft_cap(kind);
        let list = self.list_mut(kind);
        debug_assert!(list.in_use > 0, "released more {kind:?} records than acquired");
        list.in_use = list.in_use.saturating_sub(1);

        if list.free.len() >= cap {
            log::debug!("{kind:?} pool above soft cap ({cap}), dropping record");
            return;
        }
        entity.reset();
        list.free.push(entity);
    }

    pub fn stats(&self, kind: EntityKind) -> PoolStats {
        let list = self.list(kind);
        PoolStats::new(list.free.len(), list.in_use)
    }

    /// Combined figures over every category
    pub fn total_stats(&self) -> PoolStats {
        let lists = [&self.projectiles, &self.enemies, &self.players];
        let free = lists.iter().map(|l| l.free.len()).sum();
        let in_use = lists.iter().map(|l| l.in_use).sum();
        PoolStats::new(free, in_use)
    }

    /// Fresh allocations since creation for a category
    pub fn allocations(&self, kind: EntityKind) -> usize {
        self.list(kind).allocated
    }
}
