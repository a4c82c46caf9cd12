//! Per-frame state machine
//!
//! One `tick` per rendered frame. Discrete input (confirm, click) is handled
//! first, then the current mode's update runs.

use glam::Vec2;

use super::physics::{
    hit_score, integrate, resolve_bricks, resolve_paddle, resolve_walls, split_ball,
};
use super::snapshot::Snapshot;
use super::state::{Ball, GameState, Mode, ModeTag, TextStyle};
use super::upgrade::{UpgradeKind, card_at, choice_card_rects, sample_choices};
use crate::consts::*;

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left key held
    pub move_left: bool,
    /// Right key held
    pub move_right: bool,
    /// Pointer position in field coordinates (hover)
    pub pointer: Option<Vec2>,
    /// Pointer click this tick
    pub click: Option<Vec2>,
    /// Start/restart key pressed this tick
    pub confirm: bool,
    /// Idle/demo mode - paddle and upgrade picks are automatic
    pub idle_mode: bool,
}

impl TickInput {
    /// Horizontal steering in -1..=1
    pub fn steering(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game by one frame and return what to draw
pub fn tick(state: &mut GameState, input: &TickInput) -> Snapshot {
    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    if input.confirm {
        handle_confirm(state);
    }
    if let Some(point) = input.click {
        handle_pointer_click(state, point);
    }

    state.time_ticks += 1;

    match state.mode.tag() {
        ModeTag::Playing => update_playing(state, &input),
        // Upgrade keeps everything frozen on screen
        ModeTag::GameOver => update_floating_texts(state),
        ModeTag::Title | ModeTag::Upgrade => {}
    }

    Snapshot::capture(state, input.pointer)
}

/// Start or restart a run. Only meaningful on the title and game-over screens.
///
/// Returns true if a new run started.
pub fn handle_confirm(state: &mut GameState) -> bool {
    if !matches!(state.mode, Mode::Title | Mode::GameOver) {
        return false;
    }
    state.reset_run();
    true
}

/// Pick the upgrade card under `point`. Ignored outside Upgrade mode.
///
/// Returns the chosen upgrade, or None if the click missed every card.
pub fn handle_pointer_click(state: &mut GameState, point: Vec2) -> Option<UpgradeKind> {
    let kind = match &state.mode {
        Mode::Upgrade { choices } => {
            let index = card_at(point, choices.len())?;
            choices[index]
        }
        _ => return None,
    };
    choose_upgrade(state, kind);
    Some(kind)
}

/// Apply an offered upgrade and move on to the next level
fn choose_upgrade(state: &mut GameState, kind: UpgradeKind) {
    kind.apply(state);
    advance_level(state);
}

fn advance_level(state: &mut GameState) {
    state.level += 1;
    state.load_level();
    state.serve();
    state.mode = Mode::Playing;
}

/// Switch to the upgrade screen with a fresh choice set
///
/// With every upgrade owned there is nothing to pick, so the level advances
/// immediately instead.
fn enter_upgrade(state: &mut GameState) {
    let choices = sample_choices(&state.upgrades_owned, &mut state.rng);
    if choices.is_empty() {
        log::info!("Level {} cleared, all upgrades owned; advancing", state.level);
        let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        state.spawn_text("Fully upgraded!", center, TextStyle::Info);
        advance_level(state);
        return;
    }

    log::info!(
        "Level {} cleared, offering {:?}",
        state.level,
        choices.iter().map(|c| c.id()).collect::<Vec<_>>()
    );
    state.mode = Mode::Upgrade { choices };
}

/// Active gameplay frame
fn update_playing(state: &mut GameState, input: &TickInput) {
    state.paddle.steer(input.steering(), &state.modifiers);

    update_balls(state);
    resolve_lost_balls(state);

    if state.mode.is_playing() {
        update_bricks(state);
    }

    update_floating_texts(state);
}

/// Move balls, bounce off walls and paddle
fn update_balls(state: &mut GameState) {
    let mut texts = Vec::new();

    for ball in state.balls.iter_mut() {
        integrate(ball);
        resolve_walls(ball);

        if let Some(bounce) = resolve_paddle(ball, &state.paddle, &state.modifiers, &mut state.rng) {
            state.combo += 1;
            texts.push((format!("Combo {}", state.combo), ball.pos, TextStyle::Combo));
            if bounce.slowed {
                texts.push(("Slowed".to_string(), ball.pos, TextStyle::Slow));
            }
        }
    }

    for (text, pos, style) in texts {
        state.spawn_text(text, pos, style);
    }
}

/// Drop balls that fell out the bottom; shields, lives and game over
fn resolve_lost_balls(state: &mut GameState) {
    let balls = std::mem::take(&mut state.balls);
    let mut survivors = Vec::with_capacity(balls.len());
    let mut lost_any = false;

    for ball in balls {
        if !ball.is_lost() {
            survivors.push(ball);
            continue;
        }
        lost_any = true;

        if state.modifiers.shield_charges > 0 {
            state.modifiers.shield_charges -= 1;
            log::debug!("Shield absorbed a lost ball ({} left)", state.modifiers.shield_charges);
            let pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - 60.0);
            state.spawn_text("Shield!", pos, TextStyle::Shield);
            state.serve();
            return;
        }
    }

    if !lost_any || !survivors.is_empty() {
        state.balls = survivors;
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.combo = 0;
    if state.lives == 0 {
        log::info!("Game over: score {} at level {}", state.score, state.level);
        state.mode = Mode::GameOver;
    } else {
        log::info!("Life lost, {} remaining", state.lives);
        state.serve();
    }
}

/// Brick contacts, scoring, splits and the level-clear check
fn update_bricks(state: &mut GameState) {
    let mut texts = Vec::new();
    let mut spawned: Vec<Ball> = Vec::new();

    for ball in state.balls.iter_mut() {
        let Some(hit) = resolve_bricks(ball, &mut state.bricks, &state.modifiers, &mut state.rng) else {
            continue;
        };

        state.score += hit_score(state.combo);
        let label = if hit.critical {
            format!("CRIT -{}", hit.damage)
        } else {
            format!("-{}", hit.damage)
        };
        texts.push((label, hit.center, TextStyle::Damage));

        if hit.destroyed {
            state.bricks_destroyed += 1;
        }
        // The final brick is covered by the level-clear split below
        if hit.row_cleared && !state.bricks.is_empty() {
            if let Some(pair) = split_ball(hit.center, &state.modifiers, &mut state.rng) {
                log::debug!("Row {} cleared, ball split", hit.row);
                texts.push(("Split!".to_string(), hit.center, TextStyle::Split));
                spawned.extend(pair);
            }
        }
    }

    state.balls.extend(spawned);
    for (text, pos, style) in texts {
        state.spawn_text(text, pos, style);
    }

    if state.bricks.is_empty() && state.mode.is_playing() {
        let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        if let Some(pair) = split_ball(center, &state.modifiers, &mut state.rng) {
            state.balls.extend(pair);
            state.spawn_text("Split!", center, TextStyle::Split);
        }
        enter_upgrade(state);
    }
}

fn update_floating_texts(state: &mut GameState) {
    state.floating_texts.retain_mut(|text| text.advance());
}

/// Fill in input for demo play: track the ball and take the first card
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();

    match &state.mode {
        Mode::Upgrade { choices } => {
            input.click = choice_card_rects(choices.len()).first().map(|rect| rect.center());
        }
        Mode::Playing => {
            let Some(target_x) = predict_intercept(state) else {
                return input;
            };
            // Wander off-center a little so bounces aren't all vertical
            let wobble = (state.time_ticks as f32 * 0.05).sin() * state.modifiers.paddle_width * 0.3;
            let delta = target_x + wobble - state.paddle.x;
            let dead_zone = state.modifiers.paddle_speed / 2.0;
            input.move_left = delta < -dead_zone;
            input.move_right = delta > dead_zone;
        }
        Mode::Title | Mode::GameOver => {}
    }

    input
}

/// Where the most urgent ball will cross the paddle line
fn predict_intercept(state: &GameState) -> Option<f32> {
    let paddle_line = state.paddle.y;
    let ball = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| state.balls.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)))?;

    if ball.vel.y <= 0.0 {
        return Some(ball.pos.x);
    }

    let ticks = ((paddle_line - ball.pos.y) / ball.vel.y).max(0.0);
    let raw = ball.pos.x + ball.vel.x * ticks;

    // Fold the straight-line guess back inside the side walls
    let min = ball.radius;
    let span = FIELD_WIDTH - 2.0 * ball.radius;
    let period = 2.0 * span;
    let folded = (raw - min).rem_euclid(period);
    let x = if folded > span { period - folded } else { folded };
    Some(min + x)
}
