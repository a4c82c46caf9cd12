//! Upgrade catalog, choice sampling and effects
//!
//! Upgrades are plain enum variants; `apply` dispatches on the variant so
//! effects stay inspectable in tests.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{GameState, TextStyle};
use crate::consts::*;

/// Every upgrade a run can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    WiderPaddle,
    FasterPaddle,
    BallSpeed,
    Crit,
    MultiBall,
    SlowField,
    Shield,
    Combo,
}

/// Fixed catalog, in display order
pub const CATALOG: [UpgradeKind; 8] = [
    UpgradeKind::WiderPaddle,
    UpgradeKind::FasterPaddle,
    UpgradeKind::BallSpeed,
    UpgradeKind::Crit,
    UpgradeKind::MultiBall,
    UpgradeKind::SlowField,
    UpgradeKind::Shield,
    UpgradeKind::Combo,
];

impl UpgradeKind {
    pub fn id(self) -> &'static str {
        match self {
            UpgradeKind::WiderPaddle => "wider_paddle",
            UpgradeKind::FasterPaddle => "faster_paddle",
            UpgradeKind::BallSpeed => "ball_speed",
            UpgradeKind::Crit => "crit",
            UpgradeKind::MultiBall => "multiball",
            UpgradeKind::SlowField => "slow_field",
            UpgradeKind::Shield => "shield",
            UpgradeKind::Combo => "combo",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::WiderPaddle => "Flowing Guard",
            UpgradeKind::FasterPaddle => "Phantom Grip",
            UpgradeKind::BallSpeed => "Blazing Orb",
            UpgradeKind::Crit => "Critical Core",
            UpgradeKind::MultiBall => "Fission Rite",
            UpgradeKind::SlowField => "Time Bubble",
            UpgradeKind::Shield => "Psi Shell",
            UpgradeKind::Combo => "Combo Resonance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UpgradeKind::WiderPaddle => "Paddle width +30%",
            UpgradeKind::FasterPaddle => "Paddle speed +25%",
            UpgradeKind::BallSpeed => "Ball speed +15% and damage +1",
            UpgradeKind::Crit => "+10% crit chance, crits deal 2 extra damage",
            UpgradeKind::MultiBall => "+30% chance to split into extra balls on a clear",
            UpgradeKind::SlowField => "A slowing field hangs over the paddle",
            UpgradeKind::Shield => "Gain 2 bottom shields that catch a lost ball",
            UpgradeKind::Combo => "Double the current combo",
        }
    }

    /// Apply this upgrade's effect and record it as owned
    ///
    /// Returns false (and changes nothing) if it is already owned.
    pub fn apply(self, state: &mut GameState) -> bool {
        if state.owns(self) {
            log::warn!("Upgrade {} already owned, ignoring", self.id());
            return false;
        }

        let m = &mut state.modifiers;
        match self {
            UpgradeKind::WiderPaddle => {
                m.paddle_width *= 1.3;
                state.paddle.clamp(m.paddle_width);
            }
            UpgradeKind::FasterPaddle => m.paddle_speed *= 1.25,
            UpgradeKind::BallSpeed => {
                m.ball_speed *= 1.15;
                m.ball_damage += 1;
                let target = m.ball_speed + 1.0;
                for ball in &mut state.balls {
                    ball.damage += 1;
                    // Keep direction; a stalled ball is sent straight up
                    let dir = ball.vel.try_normalize().unwrap_or(Vec2::NEG_Y);
                    ball.vel = dir * target;
                }
            }
            UpgradeKind::Crit => m.crit_chance += 0.1,
            UpgradeKind::MultiBall => m.multi_ball_chance = (m.multi_ball_chance + 0.3).min(0.8),
            UpgradeKind::SlowField => m.slow_field_chance = (m.slow_field_chance + 0.4).min(1.0),
            UpgradeKind::Shield => m.shield_charges += 2,
            UpgradeKind::Combo => state.combo *= 2,
        }

        state.upgrades_owned.push(self);
        let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        state.spawn_text(format!("Acquired {}", self.name()), center, TextStyle::Info);
        log::info!("Upgrade acquired: {}", self.id());
        true
    }
}

/// Pick up to three unowned upgrades in random order
pub fn sample_choices<R: Rng + ?Sized>(owned: &[UpgradeKind], rng: &mut R) -> Vec<UpgradeKind> {
    let mut available: Vec<UpgradeKind> = CATALOG
        .iter()
        .copied()
        .filter(|kind| !owned.contains(kind))
        .collect();
    available.shuffle(rng);
    available.truncate(MAX_UPGRADE_CHOICES);
    available
}

/// Card rectangles for `count` choices, centered as a row on the field
pub fn choice_card_rects(count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let total = count as f32 * CARD_WIDTH + (count - 1) as f32 * CARD_GUTTER;
    let start_x = (FIELD_WIDTH - total) / 2.0;
    let y = FIELD_HEIGHT / 2.0 - CARD_HEIGHT / 2.0;
    (0..count)
        .map(|i| Rect::new(start_x + i as f32 * (CARD_WIDTH + CARD_GUTTER), y, CARD_WIDTH, CARD_HEIGHT))
        .collect()
}

/// Index of the card under a point, if any
pub fn card_at(point: Vec2, count: usize) -> Option<usize> {
    choice_card_rects(count)
        .iter()
        .position(|rect| rect.contains(point))
}
