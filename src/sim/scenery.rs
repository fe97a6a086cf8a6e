//! Terrain tiles, the finish line, and impact fire

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::Animation;
use super::entity::{Entity, UpdateContext};
use super::rect::Rect;
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::renderer::Renderer;

/// One walkable tile; its box never changes after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }
}

impl Entity for Platform {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(SpriteId::Platform, 0, self.rect.to_screen(camera), 255);
    }
}

/// Touching it while playing wins the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishLine {
    pub rect: Rect,
}

impl FinishLine {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, FINISH_WIDTH, FINISH_HEIGHT),
        }
    }
}

impl Entity for FinishLine {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(SpriteId::FinishLine, 0, self.rect.to_screen(camera), 255);
    }
}

/// Short-lived flame at an impact point. Decorative only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireEffect {
    pub rect: Rect,
    pub anim: Animation,
    pub lifetime: u32,
}

impl FireEffect {
    pub fn new(center: Vec2, frames: &SpriteFrames) -> Self {
        Self {
            rect: Rect::centered(center, FIRE_SIZE, FIRE_SIZE),
            anim: Animation::new(frames.get(SpriteId::Fire), FIRE_ANIM_SPEED),
            lifetime: FIRE_LIFETIME,
        }
    }
}

impl Entity for FireEffect {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.anim.advance();
        self.lifetime = self.lifetime.saturating_sub(1);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::Fire,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}
