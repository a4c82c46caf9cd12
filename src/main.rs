//! Rift Breaker headless runner
//!
//! Stands in for the presentation layer: samples input, drives one tick per
//! frame and reports the run. Usage: `rift-breaker [settings.json]`

use anyhow::Context;

use rift_breaker::Settings;
use rift_breaker::sim::{GameState, ModeTag, Snapshot, TickInput, tick};

/// Game instance holding all runner state
struct Game {
    state: GameState,
    settings: Settings,
    input: TickInput,
    last_mode: ModeTag,
    runs: u32,
}

impl Game {
    fn new(seed: u64, settings: Settings) -> Self {
        let state = GameState::new(seed);
        let last_mode = state.mode.tag();
        Self {
            state,
            input: TickInput {
                idle_mode: settings.autopilot,
                ..Default::default()
            },
            settings,
            last_mode,
            runs: 0,
        }
    }

    /// Run until the tick budget is spent or the game ends
    fn run(&mut self) -> Snapshot {
        // Press start on the title screen
        self.input.confirm = true;
        let mut snapshot = Snapshot::capture(&self.state, None);

        for _ in 0..self.settings.max_ticks {
            snapshot = tick(&mut self.state, &self.input);

            // Clear one-shot inputs after processing
            self.input.confirm = false;
            self.input.click = None;

            if snapshot.mode != self.last_mode {
                self.on_mode_change(&snapshot);
                self.last_mode = snapshot.mode;
            }

            if snapshot.mode == ModeTag::GameOver {
                if !self.settings.restart_on_game_over {
                    break;
                }
                self.input.confirm = true;
            }

            let every = self.settings.report_every;
            if every > 0 && snapshot.tick % every == 0 {
                log::info!(
                    "tick {}: level {} lives {} score {} combo {} balls {} bricks {}",
                    snapshot.tick,
                    snapshot.level,
                    snapshot.lives,
                    snapshot.score,
                    snapshot.combo,
                    snapshot.balls.len(),
                    snapshot.bricks.len()
                );
            }
        }

        snapshot
    }

    fn on_mode_change(&mut self, snapshot: &Snapshot) {
        match snapshot.mode {
            ModeTag::Playing if self.last_mode != ModeTag::Upgrade => {
                self.runs += 1;
                log::info!("Run {} started", self.runs);
            }
            ModeTag::Upgrade => {
                let names: Vec<&str> = snapshot.choices.iter().map(|c| c.name.as_str()).collect();
                log::info!("Choosing an upgrade from {:?}", names);
            }
            ModeTag::GameOver => {
                log::info!(
                    "Run {} over: score {}, level {}, bricks {}",
                    self.runs,
                    snapshot.score,
                    snapshot.level,
                    snapshot.bricks_destroyed
                );
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seed = settings.resolve_seed();
    log::info!("Rift Breaker headless run, seed {}", seed);

    let snapshot_path = settings.snapshot_path.clone();
    let mut game = Game::new(seed, settings);
    let snapshot = game.run();

    log::info!(
        "Finished at tick {}: {:?}, level {}, score {}, upgrades {:?}",
        snapshot.tick,
        snapshot.mode,
        snapshot.level,
        snapshot.score,
        snapshot.upgrades_owned
    );

    if let Some(path) = snapshot_path {
        let json = serde_json::to_string_pretty(&snapshot).context("serializing final snapshot")?;
        std::fs::write(&path, json).with_context(|| format!("writing snapshot to {}", path))?;
        log::info!("Snapshot written to {}", path);
    }

    Ok(())
}
