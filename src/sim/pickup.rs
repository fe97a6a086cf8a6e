//! Coins and the sparkle particles they leave behind

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::Animation;
use super::entity::{Entity, UpdateContext};
use super::rect::Rect;
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::renderer::Renderer;

/// A spinning coin worth `COIN_SCORE`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    pub anim: Animation,
    alive: bool,
}

impl Collectible {
    pub fn new(center: Vec2, frames: &SpriteFrames) -> Self {
        Self {
            rect: Rect::centered(center, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
            anim: Animation::new(frames.get(SpriteId::Coin), COLLECTIBLE_ANIM_SPEED),
            alive: true,
        }
    }

    /// Remove the coin and burst particles from its center into `sink`
    pub fn collect<R: Rng>(&mut self, rng: &mut R, sink: &mut impl Extend<Particle>) {
        if !self.alive {
            return;
        }
        let center = self.rect.center();
        sink.extend((0..PARTICLES_PER_COIN).map(|_| Particle::burst(center, rng)));
        self.alive = false;
    }
}

impl Entity for Collectible {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.anim.advance();
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::Coin,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}

/// Decorative star that drifts and fades out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub rect: Rect,
    pub vel: Vec2,
    pub lifetime: u32,
    pub alpha: u8,
}

impl Particle {
    /// Particle at `center` with a random velocity in [-2, 2] per axis
    pub fn burst<R: Rng>(center: Vec2, rng: &mut R) -> Self {
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
            rng.random_range(-PARTICLE_MAX_SPEED..=PARTICLE_MAX_SPEED),
        );
        Self {
            rect: Rect::centered(center, PARTICLE_SIZE, PARTICLE_SIZE),
            vel,
            lifetime: PARTICLE_LIFETIME,
            alpha: 255,
        }
    }

    fn step(&mut self) {
        self.rect.pos += self.vel;
        self.lifetime = self.lifetime.saturating_sub(1);
        if self.lifetime > 0 {
            self.alpha = self.alpha.saturating_sub(PARTICLE_FADE_PER_TICK);
        }
    }
}

impl Entity for Particle {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.step();
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(SpriteId::Particle, 0, self.rect.to_screen(camera), self.alpha);
    }
}
