//! Ground chaser
//!
//! Walks toward the player once within `ENEMY_ACTIVATION_RADIUS`, falls in
//! flat steps rather than integrating gravity, and hops now and then.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::Animation;
use super::entity::{Entity, UpdateContext};
use super::rect::Rect;
use super::scenery::Platform;
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::renderer::Renderer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub speed: f32,
    /// Ticks until the next hop attempt
    pub jump_timer: i32,
    pub on_ground: bool,
    pub anim: Animation,
}

impl Enemy {
    pub fn new<R: Rng>(x: f32, y: f32, frames: &SpriteFrames, rng: &mut R) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            speed: ENEMY_SPEED,
            jump_timer: Self::roll_jump_timer(rng),
            on_ground: false,
            anim: Animation::new(frames.get(SpriteId::Enemy), ENEMY_ANIM_SPEED),
        }
    }

    fn roll_jump_timer<R: Rng>(rng: &mut R) -> i32 {
        rng.random_range(ENEMY_JUMP_MIN_TICKS..=ENEMY_JUMP_MAX_TICKS)
    }

    fn chase(&mut self, player_x: f32) {
        let dx = player_x - self.rect.left();
        if dx.abs() < ENEMY_ACTIVATION_RADIUS {
            self.rect.pos.x += if dx > 0.0 { self.speed } else { -self.speed };
        }
    }

    /// Step down, land on the first tile whose upper half we reached
    fn fall(&mut self, platforms: &[Platform]) {
        self.rect.pos.y += ENEMY_FALL_STEP;
        self.on_ground = false;
        for platform in platforms {
            if !self.rect.intersects(&platform.rect) {
                continue;
            }
            if self.rect.bottom() > platform.rect.top()
                && self.rect.center().y < platform.rect.center().y
            {
                self.rect.set_bottom(platform.rect.top() + ENEMY_FOOT_OFFSET);
                self.on_ground = true;
            }
        }
        if !self.on_ground {
            self.rect.pos.y += ENEMY_FALL_STEP;
        }
    }

    fn hop<R: Rng>(&mut self, rng: &mut R) {
        self.jump_timer -= 1;
        if self.jump_timer <= 0 && self.on_ground {
            self.rect.pos.y -= ENEMY_HOP;
            self.jump_timer = Self::roll_jump_timer(rng);
        }
    }
}

impl Entity for Enemy {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.anim.advance();
        self.chase(ctx.player_pos.x);
        self.fall(ctx.platforms);
        self.hop(ctx.rng);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::Enemy,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}
