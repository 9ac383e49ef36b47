//! Bounce dynamics for enemies
//!
//! Semi-implicit Euler plus boundary reflection. Tuned for perpetual arcade
//! motion: floor bounces never decay below a minimum speed and enemies never
//! stall horizontally.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::consts::*;
use crate::sign_or_positive;

/// Safe-area insets reported by the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeArea {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Play-field dimensions in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    pub safe_area: SafeArea,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            safe_area: SafeArea::default(),
        }
    }
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            safe_area: SafeArea::default(),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.safe_area.left
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.width - self.safe_area.right
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.safe_area.top
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.height - self.safe_area.bottom
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.left() + self.right()) / 2.0
    }

    #[inline]
    pub fn usable_width(&self) -> f32 {
        self.right() - self.left()
    }
}

/// Integrator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceParams {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    pub floor_restitution: f32,
    pub wall_restitution: f32,
    pub ceiling_restitution: f32,
    /// Floor bounces leave with at least this upward speed
    pub min_bounce_velocity: f32,
    pub min_horizontal_velocity: f32,
    /// Per-axis speed cap
    pub max_velocity: f32,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            gravity: 500.0,
            floor_restitution: 0.9,
            wall_restitution: 1.0,
            ceiling_restitution: 0.8,
            min_bounce_velocity: 450.0,
            min_horizontal_velocity: 60.0,
            max_velocity: 800.0,
        }
    }
}

/// Advance one enemy by `dt`. Total over finite inputs.
pub fn step_enemy(enemy: &mut Entity, params: &BounceParams, field: &PlayField, dt: f32) {
    let tuning = enemy.enemy_type.physics();

    // Velocity first, then position with the new velocity
    enemy.vel.y += params.gravity * tuning.gravity_scale * dt;
    enemy.pos += enemy.vel * dt;

    // Floor
    if enemy.pos.y + enemy.size.y > field.bottom() {
        enemy.pos.y = field.bottom() - enemy.size.y;
        enemy.vel.y = -enemy.vel.y.abs() * params.floor_restitution;
        if enemy.vel.y.abs() < params.min_bounce_velocity {
            enemy.vel.y = -params.min_bounce_velocity;
        }
    }

    // Walls
    if enemy.pos.x < field.left() {
        enemy.pos.x = field.left();
        enemy.vel.x = enemy.vel.x.abs() * params.wall_restitution;
    } else if enemy.pos.x + enemy.size.x > field.right() {
        enemy.pos.x = field.right() - enemy.size.x;
        enemy.vel.x = -enemy.vel.x.abs() * params.wall_restitution;
    }

    // Ceiling
    if enemy.pos.y < field.top() {
        enemy.pos.y = field.top();
        enemy.vel.y = enemy.vel.y.abs() * params.ceiling_restitution;
    }

    // Never stall horizontally
    let min_vx = params.min_horizontal_velocity * tuning.speed_scale;
    if enemy.vel.x.abs() < min_vx {
        enemy.vel.x = sign_or_positive(enemy.vel.x) * min_vx;
    }

    let max = params.max_velocity;
    enemy.vel = enemy.vel.clamp(Vec2::splat(-max), Vec2::splat(max));
}

/// Move a projectile along its velocity (no gravity)
pub fn step_projectile(projectile: &mut Entity, dt: f32) {
    projectile.pos += projectile.vel * dt;
}

/// True once the projectile is entirely above the top bound
pub fn projectile_left_field(projectile: &Entity, field: &PlayField) -> bool {
    projectile.pos.y + projectile.size.y < field.top()
}
