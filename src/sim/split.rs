//! Enemy subdivision on hit

use glam::Vec2;

use super::entity::{Entity, EntityIds};
use crate::consts::*;

/// Split a hit enemy into two children one tier smaller.
///
/// Small enemies (and non-enemies) are terminal and yield nothing. Children are
/// 70% of the parent's linear size, sit symmetrically either side of the
/// parent's center and launch with mirrored horizontal velocity plus a shared
/// upward kick.
pub fn split(enemy: &Entity, ids: &mut EntityIds) -> Vec<Entity> {
    let Some(child_level) = enemy.size_level.and_then(|level| level.smaller()) else {
        return Vec::new();
    };

    let child_size = enemy.size * SPLIT_SCALE;
    let center = enemy.center();
    let offset = enemy.size.x / 4.0;
    let speed = SPLIT_HORIZONTAL_SPEED * enemy.enemy_type.physics().speed_scale;

    [-1.0f32, 1.0]
        .into_iter()
        .map(|side| {
            let child_center = Vec2::new(center.x + side * offset, center.y);
            let mut child = Entity::enemy(
                ids.allocate(),
                child_center - child_size / 2.0,
                child_level,
                enemy.enemy_type,
            );
            child.size = child_size;
            child.vel = Vec2::new(side * speed, -SPLIT_UPWARD_SPEED);
            child
        })
        .collect()
}
