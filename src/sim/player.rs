//! The cyclist
//!
//! Normal state: held keys drive horizontal speed, gravity and platform
//! collision run every tick. Dizzy state: everything freezes except the dizzy
//! animation, which ends the state after `DIZZY_LOOPS` full loops.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Animation, FrameStep};
use super::collision::{Body, step_body};
use super::entity::{Entity, UpdateContext};
use super::rect::Rect;
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::renderer::Renderer;

/// Result of the player touching a stunning obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Crouched underneath, nothing happens
    Ducked,
    /// First hit: player goes dizzy
    Stunned,
    /// Any later hit ends the run
    KnockedOut,
}

/// Dizzy sub-state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dizzy {
    pub active: bool,
    /// Completed loops of the dizzy animation this episode
    pub loops: u32,
    /// Stunning hits taken this level (0 or 1 while the run is alive)
    pub hits: u32,
    pub anim: Animation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub crouch: bool,
    pub anim: Animation,
    pub dizzy: Dizzy,
}

impl Player {
    pub fn new(x: f32, y: f32, frames: &SpriteFrames) -> Self {
        Self {
            body: Body::new(Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT)),
            crouch: false,
            anim: Animation::new(frames.get(SpriteId::Player), PLAYER_ANIM_SPEED),
            dizzy: Dizzy {
                active: false,
                loops: 0,
                hits: 0,
                anim: Animation::new(frames.get(SpriteId::PlayerDizzy), DIZZY_ANIM_SPEED),
            },
        }
    }

    /// Distance between a tile's top and the rider's bottom edge
    #[inline]
    pub fn foot_offset() -> f32 {
        PLAYER_FOOT_OFFSET + PLAYER_WHEEL_ADJUSTMENT
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.rect.pos
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.body.on_ground
    }

    #[inline]
    pub fn is_dizzy(&self) -> bool {
        self.dizzy.active
    }

    /// Place the rider standing on a surface at `top`
    pub fn stand_on(&mut self, top: f32) {
        self.body.rect.set_bottom(top + Self::foot_offset());
    }

    /// Set horizontal velocity from held keys; ignored while dizzy
    pub fn steer(&mut self, speed_x: f32) {
        if !self.dizzy.active {
            self.body.vel.x = speed_x;
        }
    }

    /// Start a jump. Only works from the ground, so no double jumps.
    pub fn jump(&mut self) -> bool {
        if !self.body.on_ground || self.dizzy.active {
            return false;
        }
        self.body.vel.y = JUMP_VELOCITY;
        self.body.on_ground = false;
        true
    }

    pub fn set_crouch(&mut self, crouch: bool) {
        self.crouch = crouch;
    }

    /// React to a flying or dropped obstacle
    pub fn take_hit(&mut self) -> HitOutcome {
        if self.crouch {
            return HitOutcome::Ducked;
        }
        if self.dizzy.hits == 0 {
            self.dizzy.active = true;
            self.dizzy.loops = 0;
            self.dizzy.anim.reset();
            self.dizzy.hits += 1;
            self.body.vel.x = 0.0;
            HitOutcome::Stunned
        } else {
            HitOutcome::KnockedOut
        }
    }

    fn update_dizzy(&mut self) {
        if self.dizzy.anim.advance() == FrameStep::Wrapped {
            self.dizzy.loops += 1;
            if self.dizzy.loops >= DIZZY_LOOPS {
                self.dizzy.active = false;
                log::debug!("Player recovered from dizzy");
            }
        }
    }

    /// Crouch shrinks the box on the ground; standing restores it. The bottom
    /// edge stays put either way. Airborne boxes keep their height.
    fn apply_stance(&mut self) {
        if !self.body.on_ground {
            return;
        }
        let height = if self.crouch {
            PLAYER_CROUCH_HEIGHT
        } else {
            PLAYER_HEIGHT
        };
        self.body.rect.set_height_keep_bottom(height);
    }

    /// Dizzy overlay position: same size as the rider, lifted a little
    pub fn dizzy_overlay_rect(&self) -> Rect {
        let rect = self.body.rect;
        Rect::new(
            rect.left() + (rect.width() - PLAYER_WIDTH) / 2.0,
            rect.top() - 10.0,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }

    pub fn draw_dizzy_overlay(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        if !self.dizzy.active {
            return;
        }
        renderer.draw_sprite(
            SpriteId::PlayerDizzy,
            self.dizzy.anim.frame(),
            self.dizzy_overlay_rect().to_screen(camera),
            255,
        );
    }
}

impl Entity for Player {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.dizzy.active {
            self.update_dizzy();
            return;
        }

        // Pedalling animation only runs while riding forward
        if ctx.controls.right {
            self.anim.advance();
        }

        step_body(&mut self.body, ctx.platforms, Self::foot_offset());
        self.apply_stance();
    }

    fn bounds(&self) -> Rect {
        self.body.rect
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::Player,
            self.anim.frame(),
            self.body.rect.to_screen(camera),
            255,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Controls;
    use crate::sim::scenery::Platform;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run_tick(player: &mut Player, platforms: &[Platform], controls: Controls) {
        let frames = SpriteFrames::full();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut spawned = Vec::new();
        let mut ctx = UpdateContext {
            platforms,
            player_pos: player.pos(),
            camera_x: 0.0,
            view_height: SCREEN_HEIGHT,
            controls,
            frames: &frames,
            rng: &mut rng,
            spawned: &mut spawned,
        };
        player.steer(controls.horizontal_speed(PLAYER_SPEED));
        player.update(&mut ctx);
    }

    fn ground() -> Vec<Platform> {
        (0..5)
            .map(|i| Platform::new(i as f32 * TILE_WIDTH, TERRAIN_Y, TILE_WIDTH, TILE_HEIGHT))
            .collect()
    }

    fn grounded_player() -> Player {
        let mut player = Player::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y, &SpriteFrames::full());
        player.stand_on(TERRAIN_Y);
        player
    }

    #[test]
    fn test_jump_only_from_ground() {
        let platforms = ground();
        let mut player = grounded_player();
        assert!(!player.jump(), "not grounded before the first tick");

        run_tick(&mut player, &platforms, Controls::default());
        assert!(player.on_ground());
        assert!(player.jump());
        assert_eq!(player.body.vel.y, JUMP_VELOCITY);
        assert!(!player.jump(), "no double jump");

        // Rises, then lands again
        let start_bottom = player.rect().bottom();
        run_tick(&mut player, &platforms, Controls::default());
        assert!(player.rect().bottom() < start_bottom);
        for _ in 0..60 {
            run_tick(&mut player, &platforms, Controls::default());
        }
        assert!(player.on_ground());
        assert_eq!(player.rect().bottom(), TERRAIN_Y + Player::foot_offset());
    }

    #[test]
    fn test_crouch_keeps_bottom() {
        let platforms = ground();
        let mut player = grounded_player();
        run_tick(&mut player, &platforms, Controls::default());
        let bottom = player.rect().bottom();

        player.set_crouch(true);
        run_tick(&mut player, &platforms, Controls::default());
        assert_eq!(player.rect().height(), PLAYER_CROUCH_HEIGHT);
        assert_eq!(player.rect().bottom(), bottom);

        player.set_crouch(false);
        run_tick(&mut player, &platforms, Controls::default());
        assert_eq!(player.rect().height(), PLAYER_HEIGHT);
        assert_eq!(player.rect().bottom(), bottom);
    }

    #[test]
    fn test_ride_animation_only_when_moving_right() {
        let platforms = ground();
        let mut player = grounded_player();
        for _ in 0..20 {
            run_tick(&mut player, &platforms, Controls::default());
        }
        assert_eq!(player.anim.frame(), 0);

        let right = Controls {
            left: false,
            right: true,
        };
        for _ in 0..20 {
            run_tick(&mut player, &platforms, right);
        }
        assert!(player.anim.frame() > 0);
    }

    #[test]
    fn test_dizzy_lasts_two_loops_and_freezes() {
        let platforms = ground();
        let mut player = grounded_player();
        run_tick(&mut player, &platforms, Controls::default());

        assert_eq!(player.take_hit(), HitOutcome::Stunned);
        assert!(player.is_dizzy());
        let frozen_at = player.pos();

        let right = Controls {
            left: false,
            right: true,
        };
        let dizzy_frames = SpriteFrames::full().get(SpriteId::PlayerDizzy);
        let mut frame_changes = 0;
        let mut last_frame = player.dizzy.anim.frame();
        let mut ticks = 0;
        while player.is_dizzy() {
            run_tick(&mut player, &platforms, right);
            assert!(ticks < 1000, "dizzy never ended");
            ticks += 1;
            if player.dizzy.anim.frame() != last_frame {
                frame_changes += 1;
                last_frame = player.dizzy.anim.frame();
            }
            if player.is_dizzy() {
                assert_eq!(player.pos(), frozen_at);
            }
        }
        assert_eq!(frame_changes, dizzy_frames * DIZZY_LOOPS as usize);
        assert_eq!(player.dizzy.loops, DIZZY_LOOPS);
    }

    #[test]
    fn test_second_hit_knocks_out() {
        let mut player = grounded_player();
        assert_eq!(player.take_hit(), HitOutcome::Stunned);
        assert_eq!(player.take_hit(), HitOutcome::KnockedOut);
        assert_eq!(player.dizzy.hits, 1);
    }

    #[test]
    fn test_crouch_ducks_hits() {
        let mut player = grounded_player();
        player.set_crouch(true);
        assert_eq!(player.take_hit(), HitOutcome::Ducked);
        assert!(!player.is_dizzy());
        assert_eq!(player.dizzy.hits, 0);
    }
}
