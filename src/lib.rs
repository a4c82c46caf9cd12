//! Rift Breaker - A roguelike brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, upgrades, game state)
//! - `settings`: Headless runner configuration

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 540.0;

    /// Assumed frame cadence; velocities are in pixels per tick
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Paddle defaults
    pub const BASE_PADDLE_WIDTH: f32 = 120.0;
    pub const BASE_PADDLE_HEIGHT: f32 = 16.0;
    pub const BASE_PADDLE_SPEED: f32 = 9.0;
    /// Paddle center sits this far above the bottom edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 48.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BASE_BALL_SPEED: f32 = 6.0;
    pub const BASE_BALL_DAMAGE: u32 = 1;
    /// Serve position sits this far above the bottom edge
    pub const SERVE_BOTTOM_OFFSET: f32 = 72.0;
    /// Serve angle range (degrees, always launched upward)
    pub const SERVE_ANGLE_MIN: f32 = 35.0;
    pub const SERVE_ANGLE_MAX: f32 = 145.0;

    /// Run defaults
    pub const STARTING_LIVES: u32 = 3;

    /// Brick grid
    pub const BRICK_COLUMNS: usize = 13;
    pub const BRICK_MIN_ROWS: usize = 6;
    pub const BRICK_MAX_ROWS: usize = 10;
    pub const BRICK_PADDING: f32 = 12.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_TOP: f32 = 80.0;
    /// Rows below this index are always fully populated
    pub const GUARANTEED_ROWS: usize = 2;
    pub const BRICK_SKIP_CHANCE: f32 = 0.18;
    pub const BRICK_BONUS_HP_CHANCE: f32 = 0.35;

    /// Scoring
    pub const BRICK_HIT_SCORE: u64 = 50;
    pub const COMBO_HIT_BONUS: u64 = 5;
    pub const CRIT_BONUS_DAMAGE: u32 = 2;

    /// Slow field velocity damping factor
    pub const SLOW_FIELD_FACTOR: f32 = 0.85;

    /// Floating text lifetime (ticks) and rise per tick
    pub const FLOATING_TEXT_LIFE: u32 = 120;
    pub const FLOATING_TEXT_RISE: f32 = 0.4;

    /// Upgrade card layout
    pub const CARD_WIDTH: f32 = 220.0;
    pub const CARD_HEIGHT: f32 = 180.0;
    pub const CARD_GUTTER: f32 = 32.0;
    pub const MAX_UPGRADE_CHOICES: usize = 3;
}

/// Unit vector for an angle in degrees (screen space, +y points down)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Linearly remap `value` from `[in_min, in_max]` onto `[out_min, out_max]`
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}
