//! Ball motion and collision response
//!
//! Velocities are pixels per tick; there is no dt scaling. Every function
//! that needs randomness takes the generator explicitly.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Face, overlaps, penetration_depths};
use super::state::{Ball, Brick, Modifiers, Paddle, roll};
use crate::consts::*;
use crate::{direction_from_degrees, map_range};

/// Paddle bounce sweeps from up-left through straight up to up-right
const PADDLE_BOUNCE_LEFT_DEG: f32 = 210.0;
const PADDLE_BOUNCE_RIGHT_DEG: f32 = 330.0;

/// Split-ball launch cones (degrees)
const SPLIT_LEFT_DEG: (f32, f32) = (210.0, 240.0);
const SPLIT_RIGHT_DEG: (f32, f32) = (300.0, 330.0);

/// Below this speed a velocity has no usable direction
const MIN_DIRECTION_SPEED: f32 = 1e-4;

/// A fresh ball at the serve point, launched upward at a random angle
pub fn serve_ball<R: Rng + ?Sized>(modifiers: &Modifiers, rng: &mut R) -> Ball {
    let angle = rng.random_range(SERVE_ANGLE_MIN..=SERVE_ANGLE_MAX);
    serve_ball_at_angle(modifiers, angle)
}

/// Serve at a fixed angle in degrees (35-145 keeps it upward)
pub fn serve_ball_at_angle(modifiers: &Modifiers, angle_deg: f32) -> Ball {
    let dir = direction_from_degrees(angle_deg);
    let speed = modifiers.ball_speed;
    let vel = Vec2::new(dir.x * speed, -(dir.y * speed).abs());
    let pos = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - SERVE_BOTTOM_OFFSET);
    Ball::new(pos, vel, modifiers.ball_damage)
}

/// Roll the split effect; on success returns two balls diverging from `origin`
pub fn split_ball<R: Rng + ?Sized>(origin: Vec2, modifiers: &Modifiers, rng: &mut R) -> Option<[Ball; 2]> {
    if !roll(rng, modifiers.multi_ball_chance) {
        return None;
    }
    let left = rng.random_range(SPLIT_LEFT_DEG.0..=SPLIT_LEFT_DEG.1);
    let right = rng.random_range(SPLIT_RIGHT_DEG.0..=SPLIT_RIGHT_DEG.1);
    let speed = modifiers.ball_speed;
    Some([left, right].map(|angle| {
        Ball::new(origin, direction_from_degrees(angle) * speed, modifiers.ball_damage)
    }))
}

/// Advance position by one tick of velocity
#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.pos += ball.vel;
}

/// Bounce off the side and top walls. The bottom edge is open.
///
/// Returns true if a wall was touched.
pub fn resolve_walls(ball: &mut Ball) -> bool {
    let r = ball.radius;
    let mut hit = false;

    if ball.pos.x - r <= 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = r;
        hit = true;
    } else if ball.pos.x + r >= FIELD_WIDTH {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = FIELD_WIDTH - r;
        hit = true;
    }

    if ball.pos.y - r <= 0.0 {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = r;
        hit = true;
    }

    hit
}

/// Outcome of a paddle contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleBounce {
    /// The slow field dampened the ball
    pub slowed: bool,
}

/// Redirect a descending ball that touches the paddle
///
/// The exit angle follows where the ball struck: center goes straight up,
/// edges go out at 30 degrees above horizontal. Speed never drops below the
/// base ball speed before the slow-field roll.
pub fn resolve_paddle<R: Rng + ?Sized>(
    ball: &mut Ball,
    paddle: &Paddle,
    modifiers: &Modifiers,
    rng: &mut R,
) -> Option<PaddleBounce> {
    if ball.vel.y <= 0.0 || !overlaps(&ball.circle(), &paddle.rect(modifiers)) {
        return None;
    }

    let half = modifiers.paddle_width / 2.0;
    let offset = ((ball.pos.x - paddle.x) / half).clamp(-1.0, 1.0);
    let angle = map_range(offset, -1.0, 1.0, PADDLE_BOUNCE_LEFT_DEG, PADDLE_BOUNCE_RIGHT_DEG);

    let current = ball.speed();
    let speed = if current > MIN_DIRECTION_SPEED {
        current.max(modifiers.ball_speed)
    } else {
        modifiers.ball_speed
    };
    ball.vel = direction_from_degrees(angle) * speed;

    // Sit the ball on top of the paddle so it can't re-trigger
    ball.pos.y = ball.pos.y.min(paddle.y - modifiers.paddle_height / 2.0 - ball.radius);

    let slowed = roll(rng, modifiers.slow_field_chance);
    if slowed {
        ball.vel *= SLOW_FIELD_FACTOR;
    }

    Some(PaddleBounce { slowed })
}

/// One resolved ball/brick contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickHit {
    /// Damage dealt (base + 1 + crit bonus)
    pub damage: u32,
    pub critical: bool,
    pub destroyed: bool,
    /// Brick center at impact
    pub center: Vec2,
    pub row: usize,
    /// No bricks remain in the destroyed brick's row
    pub row_cleared: bool,
}

/// Damage a ball deals to a brick
pub fn hit_damage(ball_damage: u32, critical: bool) -> u32 {
    ball_damage + 1 + if critical { CRIT_BONUS_DAMAGE } else { 0 }
}

/// Score for a brick hit at the given combo
pub fn hit_score(combo: u32) -> u64 {
    BRICK_HIT_SCORE + COMBO_HIT_BONUS * combo as u64
}

/// Resolve at most one brick contact for a ball
///
/// The first overlapping brick in storage order wins. The ball bounces off
/// the face with the shallowest penetration and is pushed clear of it; the
/// brick takes damage and is removed at zero hit points.
pub fn resolve_bricks<R: Rng + ?Sized>(
    ball: &mut Ball,
    bricks: &mut Vec<Brick>,
    modifiers: &Modifiers,
    rng: &mut R,
) -> Option<BrickHit> {
    let circle = ball.circle();
    let index = bricks.iter().position(|b| overlaps(&circle, &b.rect))?;

    let depths = penetration_depths(&circle, &bricks[index].rect);
    let face = depths.shallowest_face();
    match face {
        Face::Left => ball.vel.x = -ball.vel.x.abs(),
        Face::Right => ball.vel.x = ball.vel.x.abs(),
        Face::Top => ball.vel.y = -ball.vel.y.abs(),
        Face::Bottom => ball.vel.y = ball.vel.y.abs(),
    }
    ball.pos += face.normal() * depths.min_depth();

    let critical = roll(rng, modifiers.crit_chance);
    let damage = hit_damage(ball.damage, critical);

    let brick = &mut bricks[index];
    let center = brick.rect.center();
    let row = brick.row;
    let destroyed = brick.apply_damage(damage);
    let mut row_cleared = false;
    if destroyed {
        bricks.remove(index);
        row_cleared = !bricks.iter().any(|b| b.row == row);
    }

    Some(BrickHit {
        damage,
        critical,
        destroyed,
        center,
        row,
        row_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(77)
    }

    fn paddle_contact_ball(paddle: &Paddle, dx: f32, vel: Vec2) -> Ball {
        Ball::new(Vec2::new(paddle.x + dx, paddle.y - 12.0), vel, 1)
    }

    #[test]
    fn test_serve_is_upward_from_serve_point() {
        let modifiers = Modifiers::default();
        let mut rng = rng();
        for _ in 0..100 {
            let ball = serve_ball(&modifiers, &mut rng);
            assert!(ball.vel.y < 0.0);
            assert!((ball.speed() - modifiers.ball_speed).abs() < 1e-4);
            assert_eq!(ball.pos, Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - SERVE_BOTTOM_OFFSET));
        }
    }

    #[test]
    fn test_walls_reflect_and_clamp() {
        let mut ball = Ball::new(Vec2::new(-3.0, 200.0), Vec2::new(-5.0, 2.0), 1);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.pos.x, ball.radius);
        assert!(ball.vel.x > 0.0);

        let mut ball = Ball::new(Vec2::new(955.0, 200.0), Vec2::new(5.0, 2.0), 1);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.pos.x, FIELD_WIDTH - ball.radius);
        assert!(ball.vel.x < 0.0);

        let mut ball = Ball::new(Vec2::new(400.0, 4.0), Vec2::new(1.0, -5.0), 1);
        assert!(resolve_walls(&mut ball));
        assert_eq!(ball.pos.y, ball.radius);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_bottom_is_not_a_wall() {
        let mut ball = Ball::new(Vec2::new(400.0, 560.0), Vec2::new(0.0, 5.0), 1);
        assert!(!resolve_walls(&mut ball));
        assert!(ball.is_lost());
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let modifiers = Modifiers::default();
        let paddle = Paddle::default();
        let mut ball = paddle_contact_ball(&paddle, 0.0, Vec2::new(2.0, 5.0));
        let bounce = resolve_paddle(&mut ball, &paddle, &modifiers, &mut rng());
        assert_eq!(bounce, Some(PaddleBounce { slowed: false }));
        assert!(ball.vel.x.abs() < 1e-4);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_edge_hits_go_sideways() {
        let modifiers = Modifiers::default();
        let paddle = Paddle::default();
        let mut left = paddle_contact_ball(&paddle, -60.0, Vec2::new(0.0, 6.0));
        let mut right = paddle_contact_ball(&paddle, 60.0, Vec2::new(0.0, 6.0));
        resolve_paddle(&mut left, &paddle, &modifiers, &mut rng());
        resolve_paddle(&mut right, &paddle, &modifiers, &mut rng());
        assert!(left.vel.x < 0.0 && left.vel.y < 0.0);
        assert!(right.vel.x > 0.0 && right.vel.y < 0.0);
        // 30 degrees above horizontal
        assert!((left.vel.y / left.speed() + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_ignores_rising_ball() {
        let modifiers = Modifiers::default();
        let paddle = Paddle::default();
        let mut ball = paddle_contact_ball(&paddle, 0.0, Vec2::new(0.0, -6.0));
        assert!(resolve_paddle(&mut ball, &paddle, &modifiers, &mut rng()).is_none());
        assert_eq!(ball.vel, Vec2::new(0.0, -6.0));
    }

    #[test]
    fn test_paddle_bounce_recovers_stalled_speed() {
        let modifiers = Modifiers::default();
        let paddle = Paddle::default();
        let mut ball = paddle_contact_ball(&paddle, 10.0, Vec2::new(0.0, 1e-7));
        resolve_paddle(&mut ball, &paddle, &modifiers, &mut rng());
        assert!((ball.speed() - modifiers.ball_speed).abs() < 1e-4);
    }

    #[test]
    fn test_slow_field_dampens() {
        let modifiers = Modifiers {
            slow_field_chance: 1.0,
            ..Modifiers::default()
        };
        let paddle = Paddle::default();
        let mut ball = paddle_contact_ball(&paddle, 0.0, Vec2::new(0.0, 6.0));
        let bounce = resolve_paddle(&mut ball, &paddle, &modifiers, &mut rng());
        assert_eq!(bounce, Some(PaddleBounce { slowed: true }));
        assert!((ball.speed() - 6.0 * SLOW_FIELD_FACTOR).abs() < 1e-4);
    }

    #[test]
    fn test_brick_hit_without_crit() {
        let modifiers = Modifiers::default();
        let mut bricks = vec![Brick::new(Rect::new(100.0, 100.0, 60.0, 24.0), 3, 0)];
        let mut ball = Ball::new(Vec2::new(130.0, 132.0), Vec2::new(1.0, -5.0), 1);

        let hit = resolve_bricks(&mut ball, &mut bricks, &modifiers, &mut rng()).unwrap();
        assert_eq!(hit.damage, 2);
        assert!(!hit.critical);
        assert!(!hit.destroyed);
        assert_eq!(bricks[0].hp, 1);
        // Came from below: bounced back down and pushed clear
        assert!(ball.vel.y > 0.0);
        assert!(ball.pos.y - ball.radius >= 124.0 - 1e-4);
    }

    #[test]
    fn test_crit_adds_bonus_and_destroys() {
        let modifiers = Modifiers {
            crit_chance: 1.0,
            ..Modifiers::default()
        };
        let mut bricks = vec![
            Brick::new(Rect::new(100.0, 100.0, 60.0, 24.0), 4, 0),
            Brick::new(Rect::new(172.0, 100.0, 60.0, 24.0), 1, 0),
        ];
        let mut ball = Ball::new(Vec2::new(130.0, 95.0), Vec2::new(0.0, 5.0), 1);

        let hit = resolve_bricks(&mut ball, &mut bricks, &modifiers, &mut rng()).unwrap();
        assert!(hit.critical);
        assert_eq!(hit.damage, 4);
        assert!(hit.destroyed);
        assert!(!hit.row_cleared);
        assert_eq!(bricks.len(), 1);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_only_first_overlapping_brick_is_hit() {
        let modifiers = Modifiers::default();
        let mut bricks = vec![
            Brick::new(Rect::new(100.0, 100.0, 60.0, 24.0), 5, 0),
            Brick::new(Rect::new(100.0, 120.0, 60.0, 24.0), 5, 1),
        ];
        let mut ball = Ball::new(Vec2::new(130.0, 122.0), Vec2::new(0.0, -5.0), 1);
        resolve_bricks(&mut ball, &mut bricks, &modifiers, &mut rng()).unwrap();
        assert_eq!(bricks[0].hp, 3);
        assert_eq!(bricks[1].hp, 5);
    }

    #[test]
    fn test_last_brick_in_row_reports_row_clear() {
        let modifiers = Modifiers::default();
        let mut bricks = vec![
            Brick::new(Rect::new(100.0, 100.0, 60.0, 24.0), 1, 0),
            Brick::new(Rect::new(100.0, 200.0, 60.0, 24.0), 1, 1),
        ];
        let mut ball = Ball::new(Vec2::new(130.0, 95.0), Vec2::new(0.0, 5.0), 1);
        let hit = resolve_bricks(&mut ball, &mut bricks, &modifiers, &mut rng()).unwrap();
        assert!(hit.destroyed && hit.row_cleared);
        assert_eq!(hit.row, 0);
    }

    #[test]
    fn test_split_respects_chance() {
        let mut rng = rng();
        let never = Modifiers::default();
        assert!(split_ball(Vec2::new(480.0, 270.0), &never, &mut rng).is_none());

        let always = Modifiers {
            multi_ball_chance: 1.0,
            ..Modifiers::default()
        };
        let [a, b] = split_ball(Vec2::new(480.0, 270.0), &always, &mut rng).unwrap();
        assert!(a.vel.x < 0.0 && a.vel.y < 0.0);
        assert!(b.vel.x > 0.0 && b.vel.y < 0.0);
        assert_eq!(a.damage, always.ball_damage);
    }

    #[test]
    fn test_hit_score() {
        assert_eq!(hit_score(0), 50);
        assert_eq!(hit_score(4), 70);
    }

    proptest! {
        #[test]
        fn prop_paddle_bounce_keeps_base_speed(
            dx in -70.0f32..70.0,
            vx in -12.0f32..12.0,
            vy in 0.01f32..12.0,
            seed in any::<u64>(),
        ) {
            let modifiers = Modifiers::default();
            let paddle = Paddle::default();
            let mut ball = paddle_contact_ball(&paddle, dx, Vec2::new(vx, vy));
            let mut rng = Pcg32::seed_from_u64(seed);
            if resolve_paddle(&mut ball, &paddle, &modifiers, &mut rng).is_some() {
                prop_assert!(ball.speed() >= modifiers.ball_speed - 1e-4);
                prop_assert!(ball.vel.y < 0.0);
            }
        }
    }
}
