//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (list order, never hash order)
//! - No rendering, audio or platform dependencies
//! - No global state: grid and pools are owned by `GameState`

pub mod ai;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod physics;
pub mod pool;
pub mod split;
pub mod state;
pub mod tick;

pub use ai::{AiAction, AiConfig, AiPreset, AiSnapshot, AutoPilot, Decision, DecisionReason, decide};
pub use collision::{CollisionResult, HitEvent, detect_collisions};
pub use entity::{EnemyType, Entity, EntityId, EntityIds, EntityKind, SizeLevel};
pub use grid::{GridEntry, GridStats, SpatialGrid};
pub use physics::{BounceParams, PlayField, SafeArea, step_enemy};
pub use pool::{EntityPool, PoolLimits, PoolStats};
pub use split::split;
pub use state::{FrameStats, GameEvent, GamePhase, GameState, SimStats};
pub use tick::{TickInput, tick};
