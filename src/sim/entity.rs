//! Entity record shared by every simulation component
//!
//! Player, enemies and projectiles all use the same flat record so the grid,
//! pool and collision code can treat them uniformly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::Rect;

/// Unique id among currently active entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Monotonic id allocator. Ids are never reused within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to `allocate` will return
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

/// Entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Projectile,
}

impl EntityKind {
    /// Default dimensions for a freshly acquired record
    pub fn default_size(&self) -> Vec2 {
        match self {
            EntityKind::Player => Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            EntityKind::Enemy => Vec2::splat(SizeLevel::Large.base_size()),
            EntityKind::Projectile => Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        }
    }
}

/// Enemy size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SizeLevel {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl SizeLevel {
    /// Points for hitting an enemy of this tier (smaller is harder to hit)
    pub fn points(&self) -> u32 {
        match self {
            SizeLevel::Small => 30,
            SizeLevel::Medium => 20,
            SizeLevel::Large => 10,
        }
    }

    /// Tier of split children, `None` when this tier is terminal
    pub fn smaller(&self) -> Option<SizeLevel> {
        match self {
            SizeLevel::Large => Some(SizeLevel::Medium),
            SizeLevel::Medium => Some(SizeLevel::Small),
            SizeLevel::Small => None,
        }
    }

    /// Edge length of a freshly spawned enemy of this tier
    pub fn base_size(&self) -> f32 {
        match self {
            SizeLevel::Large => ENEMY_BASE_SIZE,
            SizeLevel::Medium => ENEMY_BASE_SIZE * SPLIT_SCALE,
            SizeLevel::Small => ENEMY_BASE_SIZE * SPLIT_SCALE * SPLIT_SCALE,
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for SizeLevel {
    type Error = SimError;

    fn try_from(level: u8) -> SimResult<Self> {
        match level {
            1 => Ok(SizeLevel::Small),
            2 => Ok(SizeLevel::Medium),
            3 => Ok(SizeLevel::Large),
            other => Err(SimError::InvalidSizeLevel(other)),
        }
    }
}

impl From<SizeLevel> for u8 {
    fn from(level: SizeLevel) -> u8 {
        level.as_u8()
    }
}

/// Per-type physics multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTypePhysics {
    /// Multiplier on global gravity
    pub gravity_scale: f32,
    /// Multiplier on the minimum horizontal speed and split launch speed
    pub speed_scale: f32,
}

/// Enemy flavour (cosmetic tag plus tuning lookups)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Basic,
    Fast,
    Strong,
}

impl EnemyType {
    pub fn physics(&self) -> EnemyTypePhysics {
        match self {
            EnemyType::Basic => EnemyTypePhysics {
                gravity_scale: 1.0,
                speed_scale: 1.0,
            },
            EnemyType::Fast => EnemyTypePhysics {
                gravity_scale: 1.0,
                speed_scale: 1.4,
            },
            EnemyType::Strong => EnemyTypePhysics {
                gravity_scale: 1.25,
                speed_scale: 0.8,
            },
        }
    }

    /// How much earlier the autopilot treats this type as a threat
    pub fn threat_scale(&self) -> f32 {
        match self {
            EnemyType::Basic => 1.0,
            EnemyType::Fast => 1.25,
            EnemyType::Strong => 1.1,
        }
    }

    /// Enemy type for a wave (harder mixes later)
    pub fn for_wave(wave: u32, roll: u32) -> Self {
        if wave < 2 {
            return EnemyType::Basic;
        }
        match roll % 10 {
            0..=5 => EnemyType::Basic,
            6..=7 => EnemyType::Fast,
            _ if wave >= 4 => EnemyType::Strong,
            _ => EnemyType::Fast,
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height, both strictly positive
    pub size: Vec2,
    pub vel: Vec2,
    /// Only defined for enemies
    pub size_level: Option<SizeLevel>,
    pub enemy_type: EnemyType,
    /// Cleared when the record sits in a pool free list
    pub active: bool,
}

impl Entity {
    /// A record with category defaults (what the pool hands out)
    pub fn blank(kind: EntityKind) -> Self {
        Self {
            id: EntityId::default(),
            kind,
            pos: Vec2::ZERO,
            size: kind.default_size(),
            vel: Vec2::ZERO,
            size_level: match kind {
                EntityKind::Enemy => Some(SizeLevel::Large),
                _ => None,
            },
            enemy_type: EnemyType::default(),
            active: false,
        }
    }

    pub fn player(id: EntityId, center_x: f32, bottom: f32) -> Self {
        let size = EntityKind::Player.default_size();
        Self {
            id,
            pos: Vec2::new(center_x - size.x / 2.0, bottom - size.y),
            active: true,
            ..Self::blank(EntityKind::Player)
        }
    }

    pub fn enemy(id: EntityId, pos: Vec2, level: SizeLevel, enemy_type: EnemyType) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(level.base_size()),
            size_level: Some(level),
            enemy_type,
            active: true,
            ..Self::blank(EntityKind::Enemy)
        }
    }

    pub fn projectile(id: EntityId, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            active: true,
            ..Self::blank(EntityKind::Projectile)
        }
    }

    /// Reset gameplay-mutable fields to category defaults
    pub fn reset(&mut self) {
        *self = Self::blank(self.kind);
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// AABB overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Check finite coordinates and positive dimensions
    pub fn validate(&self) -> SimResult<()> {
        if !(self.pos.is_finite() && self.size.is_finite() && self.vel.is_finite()) {
            return Err(SimError::NonFiniteEntity { id: self.id });
        }
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(SimError::InvalidDimensions { id: self.id });
        }
        Ok(())
    }
}
