//! Splitshot headless runner
//!
//! Plays the simulation with the autopilot at a fixed 60 Hz step and prints
//! a JSON summary. Usage: `splitshot [preset] [seconds] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let preset_arg = args.next().unwrap_or_else(|| "defensive".to_string());
    let Some(preset) = splitshot::sim::AiPreset::from_str(&preset_arg) else {
        log::error!("Unknown preset '{}'", preset_arg);
        eprintln!("usage: splitshot [aggressive|defensive|stationary|chaotic] [seconds] [seed]");
        std::process::exit(2);
    };
    let seconds = args.next().and_then(|s| s.parse::<f32>().ok()).unwrap_or(30.0);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    match runner::run(preset, seconds, seed) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        },
        Err(e) => {
            log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; embedders drive `tick` themselves
}

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use serde::Serialize;

    use splitshot::consts::SIM_DT;
    use splitshot::sim::{
        AiAction, AiPreset, AutoPilot, GameEvent, GamePhase, GameState, SimStats, TickInput, tick,
    };
    use splitshot::{Settings, SimResult};

    #[derive(Debug, Serialize)]
    pub struct Summary {
        pub preset: &'static str,
        pub seed: u64,
        pub ticks: u64,
        pub seconds: f32,
        pub score: u64,
        pub waves_cleared: u32,
        pub enemies_split: usize,
        pub enemies_destroyed: usize,
        pub game_over: bool,
        pub decisions: usize,
        pub stats: SimStats,
    }

    pub fn run(preset: AiPreset, seconds: f32, seed: Option<u64>) -> SimResult<Summary> {
        let mut settings = Settings::from_preset(preset);
        if let Some(seed) = seed {
            settings.seed = seed;
        }
        settings.validate()?;

        log::info!(
            "Splitshot starting: preset={} seed={} duration={}s",
            preset.as_str(),
            settings.seed,
            seconds
        );

        let mut pilot = AutoPilot::new(settings.ai_config());
        let seed = settings.seed;
        let mut state = GameState::new(settings);
        let mut input = TickInput::default();

        let max_ticks = (seconds.max(0.0) / SIM_DT).round() as u64;
        let mut enemies_split = 0;
        let mut enemies_destroyed = 0;

        for _ in 0..max_ticks {
            tick(&mut state, &input, SIM_DT);
            input = TickInput::default();

            for event in state.drain_events() {
                match event {
                    GameEvent::EnemySplit { .. } => enemies_split += 1,
                    GameEvent::EnemyDestroyed { .. } => enemies_destroyed += 1,
                    GameEvent::WaveStarted { wave, enemies } => {
                        log::debug!("Wave {} started with {} enemies", wave, enemies);
                    }
                    GameEvent::PlayerHit { .. } => log::info!("Player hit"),
                    GameEvent::EnemyHit { .. } => {}
                }
            }

            if state.phase == GamePhase::GameOver {
                break;
            }

            if let Some(decision) = pilot.update(SIM_DT, || state.snapshot()) {
                match decision.action {
                    AiAction::Shoot => input.shoot = true,
                    AiAction::Move(x) => input.target_x = Some(x),
                    AiAction::Idle => {}
                }
            }
        }

        log::info!(
            "Finished after {} ticks: score={} wave={} phase={:?}",
            state.time_ticks,
            state.score,
            state.wave_index,
            state.phase
        );

        Ok(Summary {
            preset: preset.as_str(),
            seed,
            ticks: state.time_ticks,
            seconds: state.time_secs(),
            score: state.score,
            waves_cleared: state.wave_index.saturating_sub(1),
            enemies_split,
            enemies_destroyed,
            game_over: state.phase == GamePhase::GameOver,
            decisions: pilot.history().len(),
            stats: state.stats(),
        })
    }
}
