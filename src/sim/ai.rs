//! Deterministic autopilot policy
//!
//! `decide` maps a snapshot plus a config to exactly one action. It holds no
//! state and uses no randomness, so identical inputs always give identical
//! outputs and scripted playthroughs replay exactly.
//!
//! Priority order (first match wins): shoot, dodge, center, idle.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::entity::{EnemyType, Entity};
use super::physics::PlayField;
use crate::consts::AI_DT;

/// Diagnostic log target for decisions
pub const LOG_TARGET: &str = "splitshot::ai";

/// Maximum decisions kept by `AutoPilot`
pub const DECISION_HISTORY: usize = 256;

/// The six tunables. Presets only differ in these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Fire when an enemy is within this horizontal distance
    pub shoot_threshold: f32,
    /// A projectile this close to the target's x blocks the lane
    pub lane_width: f32,
    /// Dodge enemies within this horizontal distance
    pub avoid_threshold: f32,
    pub dodge_speed: f32,
    /// Dead-zone half-width as a fraction of half the screen
    pub center_bias: f32,
    pub center_speed: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiPreset::default().config()
    }
}

/// Named parameter bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AiPreset {
    Aggressive,
    #[default]
    Defensive,
    Stationary,
    Chaotic,
}

impl AiPreset {
    pub const ALL: [AiPreset; 4] = [
        AiPreset::Aggressive,
        AiPreset::Defensive,
        AiPreset::Stationary,
        AiPreset::Chaotic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiPreset::Aggressive => "aggressive",
            AiPreset::Defensive => "defensive",
            AiPreset::Stationary => "stationary",
            AiPreset::Chaotic => "chaotic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aggressive" => Some(AiPreset::Aggressive),
            "defensive" => Some(AiPreset::Defensive),
            "stationary" => Some(AiPreset::Stationary),
            "chaotic" => Some(AiPreset::Chaotic),
            _ => None,
        }
    }

    pub fn config(&self) -> AiConfig {
        match self {
            AiPreset::Aggressive => AiConfig {
                shoot_threshold: 120.0,
                lane_width: 12.0,
                avoid_threshold: 40.0,
                dodge_speed: 60.0,
                center_bias: 0.5,
                center_speed: 30.0,
            },
            AiPreset::Defensive => AiConfig {
                shoot_threshold: 60.0,
                lane_width: 24.0,
                avoid_threshold: 110.0,
                dodge_speed: 90.0,
                center_bias: 0.3,
                center_speed: 40.0,
            },
            // Never moves: dodge disabled, dead zone covers the whole field
            AiPreset::Stationary => AiConfig {
                shoot_threshold: 80.0,
                lane_width: 16.0,
                avoid_threshold: 0.0,
                dodge_speed: 0.0,
                center_bias: 1.0,
                center_speed: 0.0,
            },
            AiPreset::Chaotic => AiConfig {
                shoot_threshold: 200.0,
                lane_width: 4.0,
                avoid_threshold: 150.0,
                dodge_speed: 160.0,
                center_bias: 0.1,
                center_speed: 120.0,
            },
        }
    }
}

/// Enemy as seen by the policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Horizontal center
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub enemy_type: EnemyType,
}

impl From<&Entity> for EnemyView {
    fn from(e: &Entity) -> Self {
        let center = e.center();
        Self {
            x: center.x,
            y: center.y,
            width: e.size.x,
            height: e.size.y,
            vx: e.vel.x,
            vy: e.vel.y,
            enemy_type: e.enemy_type,
        }
    }
}

/// Live projectile as seen by the policy (centers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
}

/// Everything the policy reads. Owned, so it can be published after a tick
/// and read later without tearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSnapshot {
    /// Player horizontal center
    pub player_x: f32,
    /// Half the player width (keeps moves inside the field)
    pub player_half_width: f32,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub field: PlayField,
    pub playing: bool,
    /// Simulation time in seconds when the snapshot was taken
    pub timestamp: f32,
}

impl AiSnapshot {
    pub fn min_x(&self) -> f32 {
        self.field.left() + self.player_half_width
    }

    pub fn max_x(&self) -> f32 {
        (self.field.right() - self.player_half_width).max(self.min_x())
    }
}

/// Policy output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiAction {
    Shoot,
    /// Move the player center to this x
    Move(f32),
    Idle,
}

/// Why an action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionReason {
    Paused,
    TargetInRange,
    ThreatNearby,
    OffCenter,
    NothingToDo,
}

/// One diagnostic event: decision, reason, timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: AiAction,
    pub reason: DecisionReason,
    pub timestamp: f32,
}

/// Nearest enemy within `range(enemy)` of the player, by horizontal distance.
/// Ties keep the earlier enemy.
fn nearest_within<F>(snapshot: &AiSnapshot, range: F) -> Option<&EnemyView>
where
    F: Fn(&EnemyView) -> f32,
{
    snapshot
        .enemies
        .iter()
        .filter(|e| (e.x - snapshot.player_x).abs() <= range(e))
        .fold(None, |best: Option<&EnemyView>, e| match best {
            Some(b) if (b.x - snapshot.player_x).abs() <= (e.x - snapshot.player_x).abs() => {
                Some(b)
            }
            _ => Some(e),
        })
}

fn lane_clear(snapshot: &AiSnapshot, target_x: f32, lane_width: f32) -> bool {
    !snapshot
        .projectiles
        .iter()
        .any(|p| (p.x - target_x).abs() <= lane_width)
}

/// Pick one action for this snapshot
pub fn decide(snapshot: &AiSnapshot, config: &AiConfig) -> Decision {
    let (action, reason) = choose(snapshot, config);
    log::debug!(
        target: LOG_TARGET,
        "t={:.2} action={:?} reason={:?} player_x={:.1} enemies={}",
        snapshot.timestamp,
        action,
        reason,
        snapshot.player_x,
        snapshot.enemies.len()
    );
    Decision {
        action,
        reason,
        timestamp: snapshot.timestamp,
    }
}

fn choose(snapshot: &AiSnapshot, config: &AiConfig) -> (AiAction, DecisionReason) {
    if !snapshot.playing {
        return (AiAction::Idle, DecisionReason::Paused);
    }

    // 1. Shoot
    if let Some(target) = nearest_within(snapshot, |_| config.shoot_threshold) {
        if lane_clear(snapshot, target.x, config.lane_width) {
            return (AiAction::Shoot, DecisionReason::TargetInRange);
        }
    }

    // 2. Dodge
    let avoid_range = |e: &EnemyView| config.avoid_threshold * e.enemy_type.threat_scale();
    if let Some(threat) = nearest_within(snapshot, avoid_range) {
        let direction = -crate::sign_or_positive(threat.x - snapshot.player_x);
        let x = (snapshot.player_x + direction * config.dodge_speed)
            .clamp(snapshot.min_x(), snapshot.max_x());
        return (AiAction::Move(x), DecisionReason::ThreatNearby);
    }

    // 3. Center
    let center = snapshot.field.center_x();
    let dead_zone = config.center_bias * snapshot.field.usable_width() / 2.0;
    let offset = snapshot.player_x - center;
    if offset.abs() > dead_zone {
        let x = (snapshot.player_x - crate::sign_or_positive(offset) * config.center_speed)
            .clamp(snapshot.min_x(), snapshot.max_x());
        return (AiAction::Move(x), DecisionReason::OffCenter);
    }

    // 4. Idle
    (AiAction::Idle, DecisionReason::NothingToDo)
}

/// Runs `decide` on its own slower timer and keeps the decision history.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    pub config: AiConfig,
    accumulator: f32,
    period: f32,
    history: VecDeque<Decision>,
}

impl AutoPilot {
    pub fn new(config: AiConfig) -> Self {
        Self::with_period(config, AI_DT)
    }

    pub fn with_period(config: AiConfig, period: f32) -> Self {
        debug_assert!(period > 0.0, "autopilot period must be positive");
        Self {
            config,
            accumulator: 0.0,
            period,
            history: VecDeque::with_capacity(DECISION_HISTORY),
        }
    }

    /// Advance the timer by `dt`. Returns a decision when one is due.
    ///
    /// The snapshot closure is only called when a decision is due, so the
    /// caller publishes a complete post-tick snapshot at that point.
    pub fn update<F>(&mut self, dt: f32, snapshot: F) -> Option<Decision>
    where
        F: FnOnce() -> AiSnapshot,
    {
        self.accumulator += dt;
        if self.accumulator < self.period {
            return None;
        }
        // Skip missed periods rather than bursting
        self.accumulator %= self.period;

        let decision = decide(&snapshot(), &self.config);
        if self.history.len() >= DECISION_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(decision);
        Some(decision)
    }

    /// Recent decisions, oldest first
    pub fn history(&self) -> &VecDeque<Decision> {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_at(x: f32) -> EnemyView {
        EnemyView {
            x,
            y: 200.0,
            width: 40.0,
            height: 40.0,
            vx: 60.0,
            vy: 0.0,
            enemy_type: EnemyType::Basic,
        }
    }

    fn snapshot(
        player_x: f32,
        enemies: Vec<EnemyView>,
        projectiles: Vec<ProjectileView>,
    ) -> AiSnapshot {
        AiSnapshot {
            player_x,
            player_half_width: 20.0,
            enemies,
            projectiles,
            field: PlayField::new(800.0, 600.0),
            playing: true,
            timestamp: 1.5,
        }
    }

    #[test]
    fn test_shoot_when_enemy_in_range_and_lane_clear() {
        let config = AiPreset::Defensive.config();
        let snap = snapshot(400.0, vec![enemy_at(430.0)], vec![]);
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Shoot);
        assert_eq!(decision.reason, DecisionReason::TargetInRange);
        assert_eq!(decision.timestamp, 1.5);
    }

    #[test]
    fn test_blocked_lane_falls_through_to_dodge() {
        let config = AiPreset::Defensive.config();
        let snap = snapshot(
            400.0,
            vec![enemy_at(430.0)],
            vec![ProjectileView { x: 425.0, y: 300.0 }],
        );
        let decision = decide(&snap, &config);
        // Threat is to the right, so move left by dodge_speed
        assert_eq!(decision.action, AiAction::Move(400.0 - config.dodge_speed));
        assert_eq!(decision.reason, DecisionReason::ThreatNearby);
    }

    #[test]
    fn test_dodge_clamped_to_bounds() {
        let config = AiPreset::Chaotic.config();
        // Out of shoot range would need > 200; place threat within avoid but blocked lane
        let snap = snapshot(
            30.0,
            vec![enemy_at(10.0)],
            vec![ProjectileView { x: 10.0, y: 100.0 }],
        );
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Move(30.0 + config.dodge_speed));

        let snap = snapshot(
            790.0,
            vec![enemy_at(700.0)],
            vec![ProjectileView { x: 700.0, y: 100.0 }],
        );
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Move(780.0));
    }

    #[test]
    fn test_center_when_idle_and_off_center() {
        let config = AiPreset::Defensive.config();
        let snap = snapshot(100.0, vec![], vec![]);
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Move(100.0 + config.center_speed));
        assert_eq!(decision.reason, DecisionReason::OffCenter);

        let snap = snapshot(700.0, vec![], vec![]);
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Move(700.0 - config.center_speed));
    }

    #[test]
    fn test_idle_inside_dead_zone() {
        let config = AiPreset::Defensive.config();
        let snap = snapshot(410.0, vec![], vec![]);
        let decision = decide(&snap, &config);
        assert_eq!(decision.action, AiAction::Idle);
        assert_eq!(decision.reason, DecisionReason::NothingToDo);
    }

    #[test]
    fn test_paused_snapshot_is_idle() {
        let mut snap = snapshot(400.0, vec![enemy_at(400.0)], vec![]);
        snap.playing = false;
        let decision = decide(&snap, &AiPreset::Aggressive.config());
        assert_eq!(decision.action, AiAction::Idle);
        assert_eq!(decision.reason, DecisionReason::Paused);
    }

    #[test]
    fn test_stationary_never_moves() {
        let config = AiPreset::Stationary.config();
        for x in [30.0, 200.0, 400.0, 770.0] {
            let snap = snapshot(x, vec![enemy_at(x + 200.0)], vec![]);
            assert!(!matches!(decide(&snap, &config).action, AiAction::Move(_)));
        }
    }

    #[test]
    fn test_fast_enemy_threat_reaches_further() {
        let config = AiPreset::Defensive.config();
        let mut fast = enemy_at(400.0 + config.avoid_threshold + 10.0);
        let basic = fast;
        fast.enemy_type = EnemyType::Fast;

        let snap = snapshot(400.0, vec![basic], vec![]);
        assert_ne!(decide(&snap, &config).reason, DecisionReason::ThreatNearby);

        let snap = snapshot(400.0, vec![fast], vec![]);
        assert_eq!(decide(&snap, &config).reason, DecisionReason::ThreatNearby);
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in AiPreset::ALL {
            assert_eq!(AiPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(AiPreset::from_str("AGGRESSIVE"), Some(AiPreset::Aggressive));
        assert_eq!(AiPreset::from_str("sleepy"), None);
    }

    #[test]
    fn test_autopilot_runs_at_its_own_rate() {
        let mut pilot = AutoPilot::with_period(AiPreset::Defensive.config(), 0.1);
        let mut decisions = 0;
        for _ in 0..60 {
            if pilot.update(1.0 / 60.0, || snapshot(400.0, vec![], vec![])).is_some() {
                decisions += 1;
            }
        }
        // One second at 10 Hz (float accumulation may land on 9 or 10)
        assert!((9..=10).contains(&decisions));
        assert_eq!(pilot.history().len(), decisions);
    }

    #[test]
    fn test_history_keeps_most_recent_decisions() {
        let mut pilot = AutoPilot::with_period(AiPreset::Defensive.config(), 0.5);
        for i in 0..DECISION_HISTORY + 10 {
            let mut snap = snapshot(400.0, vec![], vec![]);
            snap.timestamp = i as f32;
            assert!(pilot.update(1.0, || snap).is_some());
        }
        assert_eq!(pilot.history().len(), DECISION_HISTORY);
        assert_eq!(pilot.history().front().map(|d| d.timestamp), Some(10.0));
        assert_eq!(
            pilot.history().back().map(|d| d.timestamp),
            Some((DECISION_HISTORY + 9) as f32)
        );

        pilot.clear_history();
        assert!(pilot.history().is_empty());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "autopilot period must be positive")]
    fn test_zero_period_is_rejected() {
        let _ = AutoPilot::with_period(AiPreset::Defensive.config(), 0.0);
    }
}
