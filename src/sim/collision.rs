//! Per-tick collision detection
//!
//! Detection never mutates the entity lists. It returns a `CollisionResult`
//! describing removals, spawns and score, which the caller applies exactly
//! once after detection completes.

use std::collections::HashSet;

use serde::Serialize;

use super::entity::{Entity, EntityId, EntityIds, EntityKind, SizeLevel};
use super::grid::{GridEntry, SpatialGrid};
use super::split::split;

/// One projectile striking one enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitEvent {
    pub projectile_id: EntityId,
    pub enemy_id: EntityId,
    pub size_level: SizeLevel,
    pub points: u32,
}

/// Outcome of one tick's collision phase. Consumed once, never retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollisionResult {
    /// Hits in detection order
    pub hits: Vec<HitEvent>,
    pub hit_projectile_ids: HashSet<EntityId>,
    pub hit_enemy_ids: HashSet<EntityId>,
    /// Children from splitting hit enemies
    pub spawned_enemies: Vec<Entity>,
    pub score_delta: u32,
    /// An enemy touched the player
    pub terminal: bool,
    /// Narrow-phase tests performed (broad-phase efficiency metric)
    pub candidate_checks: usize,
}

impl CollisionResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && !self.terminal
    }
}

/// Points for hitting an enemy (0 for enemies missing a size tier)
pub fn score_for(enemy: &Entity) -> u32 {
    enemy.size_level.map(|level| level.points()).unwrap_or(0)
}

/// Candidates of `kind`, sorted back into list order so ties break by
/// iteration order rather than by cell layout.
fn ordered_candidates(candidates: Vec<GridEntry>, kind: EntityKind) -> Vec<GridEntry> {
    let mut out: Vec<_> = candidates.into_iter().filter(|c| c.kind == kind).collect();
    out.sort_by_key(|c| c.index);
    out
}

/// Compute this tick's collisions.
///
/// `grid` must have been rebuilt from exactly these `projectiles` and `enemies`
/// (grid entry indices refer to positions in these slices). `ids` supplies
/// fresh ids for split children.
pub fn detect_collisions(
    projectiles: &[Entity],
    enemies: &[Entity],
    player: &Entity,
    grid: &SpatialGrid,
    ids: &mut EntityIds,
) -> CollisionResult {
    let mut result = CollisionResult::default();

    // Projectile vs enemy: first unmatched overlapping enemy in list order
    for projectile in projectiles {
        if result.hit_projectile_ids.contains(&projectile.id) {
            continue;
        }

        let candidates = ordered_candidates(grid.query_near(projectile), EntityKind::Enemy);
        for candidate in candidates {
            let Some(enemy) = enemies.get(candidate.index) else {
                continue;
            };
            debug_assert_eq!(enemy.id, candidate.id, "grid built from a different enemy list");
            if enemy.id != candidate.id || result.hit_enemy_ids.contains(&enemy.id) {
                continue;
            }

            result.candidate_checks += 1;
            if !projectile.overlaps(enemy) {
                continue;
            }

            let points = score_for(enemy);
            result.hit_projectile_ids.insert(projectile.id);
            result.hit_enemy_ids.insert(enemy.id);
            if let Some(size_level) = enemy.size_level {
                result.hits.push(HitEvent {
                    projectile_id: projectile.id,
                    enemy_id: enemy.id,
                    size_level,
                    points,
                });
            }
            result.score_delta += points;
            result.spawned_enemies.extend(split(enemy, ids));
            break;
        }
    }

    // Enemy vs player: a single contact ends the run
    let candidates = ordered_candidates(grid.query_near(player), EntityKind::Enemy);
    for candidate in candidates {
        let Some(enemy) = enemies.get(candidate.index) else {
            continue;
        };
        result.candidate_checks += 1;
        if enemy.overlaps(player) {
            result.terminal = true;
            break;
        }
    }

    result
}
