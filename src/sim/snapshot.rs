//! Renderable view of the game state
//!
//! The adapter draws a `Snapshot` with no game logic of its own: shapes,
//! colors and strings only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{GameState, ModeTag};
use super::upgrade::choice_card_rects;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub rect: Rect,
    pub hp: i32,
    pub rgb: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextView {
    pub text: String,
    pub pos: Vec2,
    /// 0-1 fade
    pub opacity: f32,
    pub rgb: [u8; 3],
}

/// An upgrade card on the choice screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rect: Rect,
    /// Pointer is over this card
    pub hovered: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub mode: ModeTag,
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub combo: u32,
    pub shield_charges: u32,
    pub bricks_destroyed: u64,
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    pub bricks: Vec<BrickView>,
    pub texts: Vec<TextView>,
    /// Owned upgrade names in acquisition order
    pub upgrades_owned: Vec<String>,
    /// Offered cards (Upgrade mode only)
    pub choices: Vec<CardView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, pointer: Option<Vec2>) -> Self {
        let offered = state.mode.choices();
        let choices = offered
            .iter()
            .zip(choice_card_rects(offered.len()))
            .map(|(kind, rect)| CardView {
                id: kind.id().to_string(),
                name: kind.name().to_string(),
                description: kind.description().to_string(),
                rect,
                hovered: pointer.is_some_and(|p| rect.contains(p)),
            })
            .collect();

        Self {
            tick: state.time_ticks,
            mode: state.mode.tag(),
            level: state.level,
            lives: state.lives,
            score: state.score,
            combo: state.combo,
            shield_charges: state.modifiers.shield_charges,
            bricks_destroyed: state.bricks_destroyed,
            paddle: state.paddle.rect(&state.modifiers),
            balls: state
                .balls
                .iter()
                .map(|b| BallView {
                    pos: b.pos,
                    radius: b.radius,
                })
                .collect(),
            bricks: state
                .bricks
                .iter()
                .map(|b| BrickView {
                    rect: b.rect,
                    hp: b.hp,
                    rgb: b.color.rgb(),
                })
                .collect(),
            texts: state
                .floating_texts
                .iter()
                .map(|t| TextView {
                    text: t.text.clone(),
                    pos: t.pos,
                    opacity: t.opacity(),
                    rgb: t.style.rgb(),
                })
                .collect(),
            upgrades_owned: state
                .upgrades_owned
                .iter()
                .map(|u| u.name().to_string())
                .collect(),
            choices,
        }
    }
}
