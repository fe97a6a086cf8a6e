//! Kinematics and platform collision resolution
//!
//! Order per tick: gravity, horizontal move + left clamp, vertical move,
//! per-platform vertical resolution, then the settle pass for grounded
//! bodies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scenery::Platform;
use crate::consts::{GRAVITY, SETTLE_TOLERANCE};

/// A box that moves under gravity and lands on platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
    pub on_ground: bool,
}

impl Body {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            on_ground: false,
        }
    }
}

/// Advance a body one tick against static platforms.
///
/// `foot_offset` is how far below a platform's top the body's bottom rests.
pub fn step_body(body: &mut Body, platforms: &[Platform], foot_offset: f32) {
    body.vel.y += GRAVITY;

    body.rect.pos.x += body.vel.x;
    if body.rect.left() < 0.0 {
        body.rect.set_left(0.0);
    }

    let prev_top = body.rect.top();
    body.rect.pos.y += body.vel.y;
    resolve_vertical(body, prev_top, platforms, foot_offset);

    if body.on_ground {
        settle_on_platforms(&mut body.rect, platforms, foot_offset);
    }
}

/// Push the body out of any platform it overlaps on the y axis.
///
/// Only the first contact zeroes velocity; later overlaps in the same pass
/// see `vel.y == 0` and are left alone. Upward contacts only count when the
/// body started the tick below the platform (`prev_top` at or under its
/// bottom); a grounded rider sinks `foot_offset` into its tile and must be
/// able to jump out of it.
pub fn resolve_vertical(body: &mut Body, prev_top: f32, platforms: &[Platform], foot_offset: f32) {
    body.on_ground = false;
    for platform in platforms {
        if !body.rect.intersects(&platform.rect) {
            continue;
        }
        if body.vel.y > 0.0 {
            body.rect.set_bottom(platform.rect.top() + foot_offset);
            body.vel.y = 0.0;
            body.on_ground = true;
        } else if body.vel.y < 0.0 && prev_top >= platform.rect.bottom() {
            body.rect.set_top(platform.rect.bottom());
            body.vel.y = 0.0;
        }
    }
}

/// Snap onto the highest nearby tile so seams between tiles don't cause
/// one-tick drops. Returns true if the rect moved onto a tile.
pub fn settle_on_platforms(rect: &mut Rect, platforms: &[Platform], foot_offset: f32) -> bool {
    let foot_line = rect.bottom() - foot_offset;
    let highest = platforms
        .iter()
        .filter(|p| rect.overlaps_x(&p.rect))
        .filter(|p| (foot_line - p.rect.top()).abs() <= SETTLE_TOLERANCE)
        .map(|p| p.rect.top())
        .fold(None, |best: Option<f32>, top| {
            Some(best.map_or(top, |b| b.min(top)))
        });

    match highest {
        Some(top) => {
            rect.set_bottom(top + foot_offset);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tile(x: f32, y: f32) -> Platform {
        Platform::new(x, y, 120.0, 50.0)
    }

    #[test]
    fn test_falling_body_lands_with_foot_offset() {
        let platforms = [tile(0.0, 500.0)];
        let mut body = Body::new(Rect::new(10.0, 405.0, 80.0, 120.0));
        body.vel.y = 4.0;

        step_body(&mut body, &platforms, 30.0);

        assert!(body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.rect.bottom(), 530.0);
    }

    #[test]
    fn test_rising_body_hits_underside() {
        let platforms = [tile(0.0, 100.0)];
        let mut body = Body::new(Rect::new(10.0, 155.0, 40.0, 40.0));
        body.vel.y = -10.0;

        step_body(&mut body, &platforms, 0.0);

        assert!(!body.on_ground);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.rect.top(), 150.0);
    }

    #[test]
    fn test_jump_out_of_own_tile() {
        let platforms = [tile(0.0, 500.0)];
        let mut body = Body::new(Rect::new(10.0, 410.0, 80.0, 120.0));
        body.vel.y = -10.0;

        step_body(&mut body, &platforms, 30.0);

        assert!(!body.on_ground);
        assert_eq!(body.vel.y, -9.5);
        assert_eq!(body.rect.bottom(), 520.5);
    }

    #[test]
    fn test_left_boundary_clamp() {
        let mut body = Body::new(Rect::new(2.0, 0.0, 10.0, 10.0));
        body.vel.x = -5.0;

        step_body(&mut body, &[], 0.0);

        assert_eq!(body.rect.left(), 0.0);
        assert!(!body.on_ground);
        assert_eq!(body.vel.y, GRAVITY);
    }

    #[test]
    fn test_settle_prefers_highest_nearby_tile() {
        let platforms = [tile(0.0, 500.0), tile(60.0, 490.0), tile(400.0, 300.0)];
        let mut rect = Rect::new(50.0, 410.0, 80.0, 120.0);

        assert!(settle_on_platforms(&mut rect, &platforms, 30.0));
        assert_eq!(rect.bottom(), 520.0);
    }

    #[test]
    fn test_settle_ignores_far_tiles() {
        let platforms = [tile(0.0, 450.0)];
        let mut rect = Rect::new(10.0, 410.0, 80.0, 120.0);

        assert!(!settle_on_platforms(&mut rect, &platforms, 30.0));
        assert_eq!(rect.bottom(), 530.0);
    }

    #[test]
    fn test_seam_between_tiles_does_not_drop() {
        let platforms = [tile(0.0, 500.0), tile(120.0, 500.0)];
        let mut body = Body::new(Rect::new(80.0, 410.0, 80.0, 120.0));
        body.vel.x = 5.0;

        for _ in 0..30 {
            step_body(&mut body, &platforms, 30.0);
            assert!(body.on_ground);
            assert_eq!(body.rect.bottom(), 530.0);
        }
    }

    proptest! {
        #[test]
        fn downward_contact_always_snaps(
            x in 0.0f32..100.0,
            start_gap in 0.1f32..9.0,
            vy in 0.0f32..9.0,
            foot in 0.0f32..40.0,
        ) {
            let platforms = [tile(0.0, 500.0)];
            // Bottom sits `start_gap` above the landing line, so this tick lands
            let bottom = 500.0 + foot - start_gap;
            let mut body = Body::new(Rect::new(x, bottom - 120.0, 80.0, 120.0));
            body.vel.y = vy;
            prop_assume!(vy + GRAVITY > start_gap - foot);

            step_body(&mut body, &platforms, foot);

            prop_assert!(body.on_ground);
            prop_assert_eq!(body.vel.y, 0.0);
            prop_assert!((body.rect.bottom() - (500.0 + foot)).abs() < 1e-3);
        }
    }
}
