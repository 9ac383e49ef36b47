//! Fixed timestep simulation tick
//!
//! One serial pass per frame: physics, grid rebuild, collision detection,
//! then a single application of the result.

use super::collision::{CollisionResult, detect_collisions};
use super::physics::{projectile_left_field, step_enemy, step_projectile};
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target player center x (from drag/touch position)
    pub target_x: Option<f32>,
    /// Fire (tap)
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one timestep.
///
/// Returns this tick's collision result after it has been applied, for
/// HUD and cosmetic consumers. `None` when the tick did not run.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<CollisionResult> {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return None;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return None;
    }

    state.time_ticks += 1;
    state.frame.tick = state.time_ticks;
    state.tick_fire_cooldown();

    if let Some(x) = input.target_x {
        state.update_player_position(x);
    }
    if input.shoot {
        state.shoot_projectile();
    }

    state.cull_invalid();

    // Physics
    let params = state.settings.physics;
    let field = state.settings.field;
    for enemy in &mut state.enemies {
        step_enemy(enemy, &params, &field, dt);
    }
    for projectile in &mut state.projectiles {
        step_projectile(projectile, dt);
    }
    if state.projectiles.iter().any(|p| projectile_left_field(p, &field)) {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.projectiles)
            .into_iter()
            .partition(|p| projectile_left_field(p, &field));
        state.projectiles = kept;
        for projectile in gone {
            state.pool.release(projectile);
        }
    }
    state.grid.invalidate();

    // Broad phase
    state
        .grid
        .rebuild(&[state.projectiles.as_slice(), state.enemies.as_slice()]);

    // Narrow phase, then apply once
    let result = detect_collisions(
        &state.projectiles,
        &state.enemies,
        &state.player,
        &state.grid,
        &mut state.ids,
    );
    state.apply_collisions(&result);

    if state.phase == GamePhase::Playing && state.enemies.is_empty() {
        state.spawn_wave();
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::entity::{EnemyType, EntityKind, SizeLevel};
    use glam::Vec2;

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(Settings::default());
        assert!(tick(&mut state, &TickInput::default(), SIM_DT).is_some());
        assert_eq!(state.time_ticks, 1);

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut state, &input, SIM_DT).is_none());
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused ticks do nothing
        let positions: Vec<_> = state.enemies.iter().map(|e| e.pos).collect();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(positions, state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>());

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_projectiles_leave_field_and_return_to_pool() {
        let mut state = GameState::new(Settings::default());
        tick(
            &mut state,
            &TickInput {
                target_x: Some(20.0),
                shoot: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.projectiles.len(), 1);

        // Long enough to cross the whole field
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(state.projectiles.is_empty() || state.phase != GamePhase::Playing);
        if state.projectiles.is_empty() {
            assert_eq!(state.pool().stats(EntityKind::Projectile).in_use, 0);
        }
    }

    #[test]
    fn test_hit_splits_and_scores() {
        let mut state = GameState::empty(Settings::default());
        state.spawn_enemy(
            Vec2::new(380.0, 100.0),
            Vec2::new(60.0, 0.0),
            SizeLevel::Large,
            EnemyType::Basic,
        );
        state.spawn_projectile(Vec2::new(400.0, 120.0), Vec2::ZERO);

        let result = tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(result.score_delta, 10);
        assert_eq!(state.score, 10);
        assert_eq!(state.enemies.len(), 2);
        assert!(state.enemies.iter().all(|e| e.size_level == Some(SizeLevel::Medium)));
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_clearing_enemies_starts_next_wave() {
        let mut state = GameState::empty(Settings::default());
        state.spawn_enemy(
            Vec2::new(380.0, 100.0),
            Vec2::new(60.0, 0.0),
            SizeLevel::Small,
            EnemyType::Basic,
        );
        state.spawn_projectile(Vec2::new(390.0, 105.0), Vec2::ZERO);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave_index, 1);
        assert!(!state.enemies.is_empty());
        assert!(state.enemies.iter().all(|e| e.size_level == Some(SizeLevel::Large)));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Settings::default());
        let mut state2 = GameState::new(Settings::default());

        let inputs = [
            TickInput {
                target_x: Some(300.0),
                ..Default::default()
            },
            TickInput {
                shoot: true,
                ..Default::default()
            },
            TickInput {
                target_x: Some(500.0),
                shoot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.projectiles, state2.projectiles);
    }
}
