//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, velocities in pixels per tick
//! - Seeded RNG only, passed explicitly to every random draw
//! - Stable iteration order (storage order)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod level;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use geometry::{Circle, Face, Penetration, Rect, overlaps, penetration_depths};
pub use level::generate_level;
pub use physics::{BrickHit, PaddleBounce, resolve_bricks, resolve_paddle, resolve_walls, split_ball};
pub use snapshot::Snapshot;
pub use state::{
    Ball, Brick, BrickColor, FloatingText, GameState, Mode, ModeTag, Modifiers, Paddle, TextStyle,
};
pub use tick::{TickInput, handle_confirm, handle_pointer_click, tick};
pub use upgrade::{CATALOG, UpgradeKind, sample_choices};
