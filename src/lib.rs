//! Splitshot - bouncing-enemy arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, pooling, AI)
//! - `settings`: Data-driven tuning, loadable from JSON
//! - `error`: Validation and invariant errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Autopilot decision period (10 Hz, decoupled from the simulation tick)
    pub const AI_DT: f32 = 1.0 / 10.0;

    /// Default play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    /// Ticks between shots (~6 shots per second)
    pub const FIRE_COOLDOWN_TICKS: u32 = 10;
    /// Live projectile cap
    pub const MAX_PROJECTILES: usize = 8;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 14.0;
    pub const PROJECTILE_SPEED: f32 = 600.0;

    /// Largest enemy edge length; smaller tiers shrink by `SPLIT_SCALE`
    pub const ENEMY_BASE_SIZE: f32 = 64.0;
    /// Child linear size as a fraction of the parent
    pub const SPLIT_SCALE: f32 = 0.7;
    /// Horizontal launch speed of split children (opposite signs)
    pub const SPLIT_HORIZONTAL_SPEED: f32 = 150.0;
    /// Upward launch speed shared by both split children
    pub const SPLIT_UPWARD_SPEED: f32 = 300.0;

    /// Broad-phase cell edge (about twice the largest enemy)
    pub const GRID_CELL_SIZE: f32 = 128.0;

    /// Enemies spawned per wave never exceed this
    pub const MAX_WAVE_ENEMIES: u32 = 4;
    /// New waves spawn within this distance below the top bound
    pub const WAVE_SPAWN_BAND: f32 = 120.0;
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Sign with `sign(0) = +1`, so a stalled value always gets a direction
#[inline]
pub fn sign_or_positive(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_sign_or_positive() {
        assert_eq!(sign_or_positive(0.0), 1.0);
        assert_eq!(sign_or_positive(-0.0), 1.0);
        assert_eq!(sign_or_positive(-3.0), -1.0);
        assert_eq!(sign_or_positive(2.0), 1.0);
    }
}
