//! Game state and core simulation types
//!
//! `GameState` is the single owner of everything a run mutates. It is only
//! changed from `tick` and the input handlers, never through globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};
use super::level::generate_level;
use super::physics::serve_ball;
use super::upgrade::UpgradeKind;
use crate::consts::*;

/// Mode tag without payload (HUD/snapshot use)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTag {
    Title,
    Playing,
    Upgrade,
    GameOver,
}

/// Current mode of the state machine
///
/// Upgrade choices only exist while choosing, so they live in the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Waiting for the start key
    Title,
    /// Active gameplay
    Playing,
    /// Level cleared, waiting for a card click (entities frozen)
    Upgrade { choices: Vec<UpgradeKind> },
    /// Run ended, waiting for the restart key
    GameOver,
}

impl Mode {
    pub fn tag(&self) -> ModeTag {
        match self {
            Mode::Title => ModeTag::Title,
            Mode::Playing => ModeTag::Playing,
            Mode::Upgrade { .. } => ModeTag::Upgrade,
            Mode::GameOver => ModeTag::GameOver,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Mode::Playing)
    }

    /// Offered upgrades (empty outside Upgrade mode)
    pub fn choices(&self) -> &[UpgradeKind] {
        match self {
            Mode::Upgrade { choices } => choices,
            _ => &[],
        }
    }
}

/// Run-wide tunables that only upgrades change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per tick
    pub paddle_speed: f32,
    /// Base ball speed (pixels per tick)
    pub ball_speed: f32,
    /// Base damage of newly served or split balls
    pub ball_damage: u32,
    /// Chance (0-1) a clear spawns two extra balls
    pub multi_ball_chance: f32,
    /// Chance (0-1) a brick hit deals bonus damage
    pub crit_chance: f32,
    /// Chance (0-1) a paddle bounce slows the ball
    pub slow_field_chance: f32,
    /// Ball losses that can still be absorbed
    pub shield_charges: u32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            paddle_width: BASE_PADDLE_WIDTH,
            paddle_height: BASE_PADDLE_HEIGHT,
            paddle_speed: BASE_PADDLE_SPEED,
            ball_speed: BASE_BALL_SPEED,
            ball_damage: BASE_BALL_DAMAGE,
            multi_ball_chance: 0.0,
            crit_chance: 0.0,
            slow_field_chance: 0.0,
            shield_charges: 0,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, damage: u32) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            damage,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Top of the ball is below the playfield
    pub fn is_lost(&self) -> bool {
        self.pos.y - self.radius > FIELD_HEIGHT
    }
}

/// Display bucket for a brick, derived from its hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Green,
    Cyan,
    Orange,
    Red,
}

impl BrickColor {
    pub fn for_hp(hp: i32) -> Self {
        match hp {
            hp if hp >= 4 => BrickColor::Red,
            3 => BrickColor::Orange,
            2 => BrickColor::Cyan,
            _ => BrickColor::Green,
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            BrickColor::Red => [255, 104, 104],
            BrickColor::Orange => [255, 187, 92],
            BrickColor::Cyan => [79, 215, 255],
            BrickColor::Green => [146, 255, 129],
        }
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub hp: i32,
    /// Grid row (row-clear tracking)
    pub row: usize,
    pub color: BrickColor,
}

impl Brick {
    pub fn new(rect: Rect, hp: i32, row: usize) -> Self {
        Self {
            rect,
            hp,
            row,
            color: BrickColor::for_hp(hp),
        }
    }

    /// Subtract damage; returns true once the brick is destroyed
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        self.hp -= damage as i32;
        if self.hp <= 0 {
            return true;
        }
        self.color = BrickColor::for_hp(self.hp);
        false
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Horizontal center
    pub x: f32,
    /// Vertical center (fixed)
    pub y: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            y: FIELD_HEIGHT - PADDLE_BOTTOM_OFFSET,
        }
    }
}

impl Paddle {
    pub fn rect(&self, modifiers: &Modifiers) -> Rect {
        Rect::from_center(
            Vec2::new(self.x, self.y),
            modifiers.paddle_width,
            modifiers.paddle_height,
        )
    }

    /// Move by `direction * speed` (direction in -1..=1), then clamp
    pub fn steer(&mut self, direction: f32, modifiers: &Modifiers) {
        self.x += direction * modifiers.paddle_speed;
        self.clamp(modifiers.paddle_width);
    }

    /// Keep the paddle fully inside the playfield
    pub fn clamp(&mut self, width: f32) {
        let half = width / 2.0;
        self.x = self.x.clamp(half, (FIELD_WIDTH - half).max(half));
    }
}

/// Palette for floating feedback text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextStyle {
    Combo,
    Damage,
    Split,
    Slow,
    Shield,
    Info,
}

impl TextStyle {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            TextStyle::Combo => [255, 220, 120],
            TextStyle::Damage => [255, 140, 140],
            TextStyle::Split => [120, 200, 255],
            TextStyle::Slow => [200, 120, 255],
            TextStyle::Shield => [120, 255, 200],
            TextStyle::Info => [255, 255, 255],
        }
    }
}

/// Transient feedback text (cosmetic only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    /// Remaining ticks
    pub life: u32,
    pub style: TextStyle,
}

impl FloatingText {
    /// Drift upward and age one tick; returns false once expired
    pub fn advance(&mut self) -> bool {
        self.pos.y -= FLOATING_TEXT_RISE;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// 0-1 fade derived from remaining life
    pub fn opacity(&self) -> f32 {
        (self.life as f32 / FLOATING_TEXT_LIFE as f32).clamp(0.0, 1.0)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG started from
    pub seed: u64,
    /// Shared random source for every random draw in the simulation
    pub rng: Pcg32,
    pub mode: Mode,
    /// Current level (starts at 1)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    /// Paddle bounces since the last lost life
    pub combo: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub bricks_destroyed: u64,
    pub modifiers: Modifiers,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub floating_texts: Vec<FloatingText>,
    /// Owned upgrades in acquisition order (unique)
    pub upgrades_owned: Vec<UpgradeKind>,
}

impl GameState {
    /// Create a state on the title screen
    pub fn new(seed: u64) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(seed: u64, rng: Pcg32) -> Self {
        Self {
            seed,
            rng,
            mode: Mode::Title,
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            combo: 0,
            time_ticks: 0,
            bricks_destroyed: 0,
            modifiers: Modifiers::default(),
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: Vec::new(),
            floating_texts: Vec::new(),
            upgrades_owned: Vec::new(),
        }
    }

    /// Start a fresh run: baseline stats, level 1, one serve ball
    ///
    /// The RNG stream and tick counter carry over.
    pub fn reset_run(&mut self) {
        let rng = self.rng.clone();
        let time_ticks = self.time_ticks;
        *self = Self::with_rng(self.seed, rng);
        self.time_ticks = time_ticks;
        self.load_level();
        self.serve();
        self.mode = Mode::Playing;
        log::info!("Run started (seed {})", self.seed);
    }

    /// Replace the brick set with a fresh layout for the current level
    pub fn load_level(&mut self) {
        self.bricks = generate_level(self.level, &mut self.rng);
        log::info!("Level {}: {} bricks", self.level, self.bricks.len());
    }

    /// Replace all balls with a single freshly served ball
    pub fn serve(&mut self) {
        let ball = serve_ball(&self.modifiers, &mut self.rng);
        self.balls = vec![ball];
    }

    pub fn owns(&self, kind: UpgradeKind) -> bool {
        self.upgrades_owned.contains(&kind)
    }

    pub fn spawn_text(&mut self, text: impl Into<String>, pos: Vec2, style: TextStyle) {
        self.floating_texts.push(FloatingText {
            text: text.into(),
            pos,
            life: FLOATING_TEXT_LIFE,
            style,
        });
    }
}

/// True with probability `chance` (0 never fires, 1 always does)
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    rng.random::<f32>() < chance
}
