//! Game state and core simulation types
//!
//! `GameState` owns the canonical entity lists plus the grid and pool
//! instances. Nothing here is global: tests, replays and concurrent sessions
//! each construct their own.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ai::{AiSnapshot, EnemyView, ProjectileView};
use super::collision::CollisionResult;
use super::entity::{EnemyType, Entity, EntityId, EntityIds, EntityKind, SizeLevel};
use super::grid::{GridStats, SpatialGrid};
use super::pool::{EntityPool, PoolStats};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// An enemy reached the player
    GameOver,
}

/// Outbound notifications for collaborators outside the core (HUD, effects,
/// achievements). Drained by the caller; the core never calls out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    EnemyHit {
        enemy_id: EntityId,
        projectile_id: EntityId,
        points: u32,
        pos: Vec2,
    },
    EnemySplit {
        parent_id: EntityId,
        children: [EntityId; 2],
    },
    /// Smallest tier removed with no children
    EnemyDestroyed { enemy_id: EntityId, pos: Vec2 },
    PlayerHit { player_id: EntityId },
    WaveStarted { wave: u32, enemies: u32 },
}

/// Per-tick figures for the last completed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameStats {
    pub tick: u64,
    /// Malformed entities dropped this tick
    pub skipped_entities: u32,
    /// Narrow-phase tests this tick
    pub candidate_checks: usize,
}

/// Everything an adaptive-quality controller may read
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimStats {
    pub projectiles: PoolStats,
    pub enemies: PoolStats,
    pub grid: GridStats,
    pub frame: FrameStats,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Current wave (1-based once the first wave spawns)
    pub wave_index: u32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Entity,
    /// Active enemies (list order is the collision tie-break order)
    pub enemies: Vec<Entity>,
    /// Active projectiles (oldest first)
    pub projectiles: Vec<Entity>,
    pub frame: FrameStats,
    /// Ticks until the player may fire again
    fire_cooldown: u32,
    pub(crate) grid: SpatialGrid,
    pub(crate) pool: EntityPool,
    pub(crate) ids: EntityIds,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the first wave already spawned
    pub fn new(settings: Settings) -> Self {
        let mut state = Self::empty(settings);
        state.spawn_wave();
        state
    }

    /// Create a game with a player but no enemies (for scripted scenarios).
    /// The first wave spawns on the first playing tick that finds no enemies.
    pub fn empty(settings: Settings) -> Self {
        let mut ids = EntityIds::new();
        let field = settings.field;
        let mut pool = EntityPool::with_prewarm(
            settings.pool,
            settings.player.max_projectiles,
            (MAX_WAVE_ENEMIES * 4) as usize,
        );
        let mut player = pool.acquire(EntityKind::Player);
        player.clone_from(&Entity::player(ids.allocate(), field.center_x(), field.bottom()));

        Self {
            wave_index: 0,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            frame: FrameStats::default(),
            fire_cooldown: 0,
            grid: SpatialGrid::new(settings.grid_cell_size),
            pool,
            ids,
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
            settings,
        }
    }

    /// Elapsed simulation time in seconds
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Fire from the player's top center. Returns `None` while cooling down,
    /// at the live projectile cap, or when not playing.
    pub fn shoot_projectile(&mut self) -> Option<EntityId> {
        if self.phase != GamePhase::Playing
            || self.fire_cooldown > 0
            || self.projectiles.len() >= self.settings.player.max_projectiles
        {
            return None;
        }

        let mut projectile = self.pool.acquire(EntityKind::Projectile);
        projectile.id = self.ids.allocate();
        let top_center = Vec2::new(self.player.center().x, self.player.pos.y);
        projectile.pos = top_center - Vec2::new(projectile.size.x / 2.0, projectile.size.y);
        projectile.vel = Vec2::new(0.0, -self.settings.projectile_speed);

        let id = projectile.id;
        self.projectiles.push(projectile);
        self.fire_cooldown = self.settings.player.fire_cooldown_ticks;
        Some(id)
    }

    /// Move the player's center to `x`, clamped inside the field
    pub fn update_player_position(&mut self, x: f32) {
        if !x.is_finite() {
            log::warn!("ignoring non-finite player position {x}");
            return;
        }
        let field = self.settings.field;
        let half = self.player.size.x / 2.0;
        let max_center = (field.right() - half).max(field.left() + half);
        let center = x.clamp(field.left() + half, max_center);
        self.player.pos.x = center - half;
        self.grid.invalidate();
    }

    /// Remove an enemy or projectile by id. Unknown ids are a no-op.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if let Some(i) = self.enemies.iter().position(|e| e.id == id) {
            let entity = self.enemies.remove(i);
            self.pool.release(entity);
        } else if let Some(i) = self.projectiles.iter().position(|p| p.id == id) {
            let entity = self.projectiles.remove(i);
            self.pool.release(entity);
        } else {
            log::debug!("despawn of unknown entity {id:?} ignored");
            return false;
        }
        self.grid.invalidate();
        true
    }

    /// Insert an enemy (scripted scenarios, external spawners). The record
    /// is drawn from the pool and gets a fresh id.
    pub fn spawn_enemy(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        level: SizeLevel,
        enemy_type: EnemyType,
    ) -> EntityId {
        let mut enemy = self.pool.acquire(EntityKind::Enemy);
        enemy.clone_from(&Entity::enemy(self.ids.allocate(), pos, level, enemy_type));
        enemy.vel = vel;
        let id = enemy.id;
        self.enemies.push(enemy);
        self.grid.invalidate();
        id
    }

    /// Insert a projectile at an explicit position (scripted scenarios)
    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2) -> EntityId {
        let mut projectile = self.pool.acquire(EntityKind::Projectile);
        projectile.id = self.ids.allocate();
        projectile.pos = pos;
        projectile.vel = vel;
        let id = projectile.id;
        self.projectiles.push(projectile);
        self.grid.invalidate();
        id
    }

    /// Spawn the next wave of large enemies at seeded positions
    pub fn spawn_wave(&mut self) {
        self.wave_index += 1;
        let wave = self.wave_index;
        let count = (1 + wave / 2).min(MAX_WAVE_ENEMIES);
        let field = self.settings.field;
        let size = SizeLevel::Large.base_size();

        for _ in 0..count {
            let max_x = (field.right() - size).max(field.left());
            let x = if max_x > field.left() {
                self.rng.random_range(field.left()..max_x)
            } else {
                field.left()
            };
            let y = field.top() + self.rng.random_range(0.0..WAVE_SPAWN_BAND);
            let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let enemy_type = EnemyType::for_wave(wave, self.rng.random::<u32>());
            let speed = SPLIT_HORIZONTAL_SPEED * enemy_type.physics().speed_scale;
            self.spawn_enemy(
                Vec2::new(x, y),
                Vec2::new(direction * speed, 0.0),
                SizeLevel::Large,
                enemy_type,
            );
        }

        log::info!("Wave {wave}: spawned {count} enemies");
        self.events.push(GameEvent::WaveStarted {
            wave,
            enemies: count,
        });
    }

    /// Apply one tick's collision result: score, removals, pool releases,
    /// spawn insertion, terminal flag. The only place collisions mutate state.
    pub fn apply_collisions(&mut self, result: &CollisionResult) {
        self.score += u64::from(result.score_delta);
        self.frame.candidate_checks = result.candidate_checks;

        for hit in &result.hits {
            let pos = self
                .enemies
                .iter()
                .find(|e| e.id == hit.enemy_id)
                .map(|e| e.center())
                .unwrap_or(Vec2::ZERO);
            self.events.push(GameEvent::EnemyHit {
                enemy_id: hit.enemy_id,
                projectile_id: hit.projectile_id,
                points: hit.points,
                pos,
            });
            if hit.size_level.smaller().is_none() {
                self.events.push(GameEvent::EnemyDestroyed {
                    enemy_id: hit.enemy_id,
                    pos,
                });
            }
        }

        let mut children = result.spawned_enemies.chunks_exact(2);
        for hit in result.hits.iter().filter(|h| h.size_level.smaller().is_some()) {
            if let Some([a, b]) = children.next() {
                self.events.push(GameEvent::EnemySplit {
                    parent_id: hit.enemy_id,
                    children: [a.id, b.id],
                });
            }
        }

        if !result.hit_projectile_ids.is_empty() {
            let (hit, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.projectiles)
                .into_iter()
                .partition(|p| result.hit_projectile_ids.contains(&p.id));
            self.projectiles = kept;
            for projectile in hit {
                self.pool.release(projectile);
            }
        }

        if !result.hit_enemy_ids.is_empty() {
            let (hit, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.enemies)
                .into_iter()
                .partition(|e| result.hit_enemy_ids.contains(&e.id));
            self.enemies = kept;
            for enemy in hit {
                self.pool.release(enemy);
            }
        }

        for child in &result.spawned_enemies {
            let mut enemy = self.pool.acquire(EntityKind::Enemy);
            enemy.clone_from(child);
            self.enemies.push(enemy);
        }

        if result.terminal && self.phase != GamePhase::GameOver {
            log::info!(
                "Player hit at tick {} (wave {}, score {})",
                self.time_ticks,
                self.wave_index,
                self.score
            );
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::PlayerHit {
                player_id: self.player.id,
            });
        }

        self.grid.invalidate();
    }

    /// Drop malformed entities, recording a diagnostic for each
    pub(crate) fn cull_invalid(&mut self) {
        let mut skipped = 0;
        for list in [&mut self.enemies, &mut self.projectiles] {
            let (bad, good): (Vec<_>, Vec<_>) = std::mem::take(list)
                .into_iter()
                .partition(|e| e.validate().is_err());
            *list = good;
            for entity in bad {
                if let Err(err) = entity.validate() {
                    log::warn!("skipping entity: {err}");
                }
                skipped += 1;
                self.pool.release(entity);
            }
        }
        self.frame.skipped_entities = skipped;
    }

    pub(crate) fn tick_fire_cooldown(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }

    /// Complete owned snapshot for the autopilot
    pub fn snapshot(&self) -> AiSnapshot {
        AiSnapshot {
            player_x: self.player.center().x,
            player_half_width: self.player.size.x / 2.0,
            enemies: self.enemies.iter().map(EnemyView::from).collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| {
                    let c = p.center();
                    ProjectileView { x: c.x, y: c.y }
                })
                .collect(),
            field: self.settings.field,
            playing: self.phase == GamePhase::Playing,
            timestamp: self.time_secs(),
        }
    }

    /// Take all pending outbound events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            projectiles: self.pool.stats(EntityKind::Projectile),
            enemies: self.pool.stats(EntityKind::Enemy),
            grid: self.grid.stats(),
            frame: self.frame,
        }
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}
