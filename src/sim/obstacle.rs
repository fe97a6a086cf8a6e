//! Obstacle variants
//!
//! Flying and dropped obstacles stun the rider (first hit) or knock them out
//! (any later hit). Touching a static or high-flying obstacle ends the run.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::Animation;
use super::entity::{Entity, UpdateContext};
use super::rect::Rect;
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::renderer::Renderer;

/// Immovable block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticObstacle {
    pub rect: Rect,
    alive: bool,
}

impl StaticObstacle {
    pub fn new(rect: Rect) -> Self {
        Self { rect, alive: true }
    }
}

impl Entity for StaticObstacle {
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(SpriteId::StaticObstacle, 0, self.rect.to_screen(camera), 255);
    }
}

/// Flies left at constant speed until it leaves the view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyingObstacle {
    pub rect: Rect,
    pub speed: f32,
    pub anim: Animation,
    alive: bool,
}

impl FlyingObstacle {
    pub fn new(x: f32, y: f32, frames: &SpriteFrames) -> Self {
        Self {
            rect: Rect::new(x, y, FLYING_WIDTH, FLYING_HEIGHT),
            speed: FLYING_SPEED,
            anim: Animation::new(frames.get(SpriteId::FlyingObstacle), FLYING_ANIM_SPEED),
            alive: true,
        }
    }
}

impl Entity for FlyingObstacle {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.anim.advance();
        self.rect.pos.x -= self.speed;
        if self.rect.right() < ctx.camera_x {
            self.alive = false;
        }
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::FlyingObstacle,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}

/// Hovers ahead of the player, sometimes wobbles, and drops debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighFlyingObstacle {
    pub rect: Rect,
    /// Hover point before oscillation is applied
    pub base_x: f32,
    pub oscillating: bool,
    pub osc_phase: f32,
    pub osc_ticks: u32,
    pub drop_timer: u32,
    pub drop_interval: u32,
    pub anim: Animation,
    alive: bool,
}

impl HighFlyingObstacle {
    pub fn new<R: Rng>(x: f32, y: f32, frames: &SpriteFrames, rng: &mut R) -> Self {
        Self {
            rect: Rect::new(x, y, FLYING_WIDTH, FLYING_HEIGHT),
            base_x: x,
            oscillating: false,
            osc_phase: 0.0,
            osc_ticks: 0,
            drop_timer: 0,
            drop_interval: Self::roll_drop_interval(rng),
            anim: Animation::new(
                frames.get(SpriteId::HighFlyingObstacle),
                HIGH_FLYING_ANIM_SPEED,
            ),
            alive: true,
        }
    }

    fn roll_drop_interval<R: Rng>(rng: &mut R) -> u32 {
        rng.random_range(HIGH_FLYING_DROP_MIN_TICKS..=HIGH_FLYING_DROP_MAX_TICKS)
    }

    /// Track the player, occasionally entering a sinusoidal wobble
    pub fn hover<R: Rng>(&mut self, player_x: f32, rng: &mut R) {
        let target_x = player_x + HIGH_FLYING_HOVER_OFFSET;
        self.base_x = target_x;
        if !self.oscillating {
            self.rect.set_left(target_x);
        }
        self.rect.set_top(HIGH_FLYING_HOVER_Y);

        if rng.random_bool(HIGH_FLYING_OSC_CHANCE) {
            self.oscillating = true;
            self.osc_ticks = 0;
            self.osc_phase = 0.0;
        }

        if self.oscillating {
            self.osc_ticks += 1;
            self.osc_phase += HIGH_FLYING_OSC_SPEED;
            self.rect
                .set_left(self.base_x + HIGH_FLYING_OSC_AMPLITUDE * self.osc_phase.sin());
            if self.osc_ticks >= HIGH_FLYING_OSC_TICKS {
                self.oscillating = false;
            }
        }
    }

    /// Count toward the next drop; returns the debris released this tick
    pub fn release_drops<R: Rng>(&mut self, frames: &SpriteFrames, rng: &mut R) -> Vec<DroppedObstacle> {
        self.drop_timer += 1;
        if self.drop_timer < self.drop_interval {
            return Vec::new();
        }
        self.drop_timer = 0;
        self.drop_interval = Self::roll_drop_interval(rng);

        let count = rng.random_range(1..=HIGH_FLYING_MAX_DROPS);
        let half = (self.rect.width() / 2.0) as i32;
        let center_x = self.rect.center().x;
        let bottom = self.rect.bottom();
        (0..count)
            .map(|_| {
                let offset = rng.random_range(-half..=half) as f32;
                DroppedObstacle::new(Vec2::new(center_x + offset, bottom), frames, rng)
            })
            .collect()
    }
}

impl Entity for HighFlyingObstacle {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.hover(ctx.player_pos.x, ctx.rng);
        self.anim.advance();
        let drops = self.release_drops(ctx.frames, ctx.rng);
        if !drops.is_empty() {
            log::debug!("High flyer released {} drops", drops.len());
        }
        ctx.spawned.extend(drops.into_iter().map(Obstacle::Dropped));
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::HighFlyingObstacle,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}

/// Falls with a fixed sideways drift until it passes the bottom of the view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedObstacle {
    pub rect: Rect,
    pub fall_speed: f32,
    pub drift: f32,
    pub anim: Animation,
    alive: bool,
}

impl DroppedObstacle {
    pub fn new<R: Rng>(center: Vec2, frames: &SpriteFrames, rng: &mut R) -> Self {
        Self {
            rect: Rect::centered(center, DROPPED_SIZE, DROPPED_SIZE),
            fall_speed: DROPPED_FALL_SPEED,
            drift: rng.random_range(-DROPPED_MAX_DRIFT..=DROPPED_MAX_DRIFT),
            anim: Animation::new(frames.get(SpriteId::DroppedObstacle), DROPPED_ANIM_SPEED),
            alive: true,
        }
    }
}

impl Entity for DroppedObstacle {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.anim.advance();
        self.rect.pos.x += self.drift;
        self.rect.pos.y += self.fall_speed;
        if self.rect.top() > ctx.view_height {
            self.alive = false;
        }
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        renderer.draw_sprite(
            SpriteId::DroppedObstacle,
            self.anim.frame(),
            self.rect.to_screen(camera),
            255,
        );
    }
}

/// Tagged obstacle kinds sharing one collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Obstacle {
    Static(StaticObstacle),
    Flying(FlyingObstacle),
    HighFlying(HighFlyingObstacle),
    Dropped(DroppedObstacle),
}

impl Obstacle {
    /// Flying and dropped obstacles stun instead of ending the run outright
    pub fn stuns(&self) -> bool {
        matches!(self, Obstacle::Flying(_) | Obstacle::Dropped(_))
    }

    pub fn kill(&mut self) {
        match self {
            Obstacle::Static(o) => o.alive = false,
            Obstacle::Flying(o) => o.alive = false,
            Obstacle::HighFlying(o) => o.alive = false,
            Obstacle::Dropped(o) => o.alive = false,
        }
    }

    fn as_entity(&self) -> &dyn Entity {
        match self {
            Obstacle::Static(o) => o,
            Obstacle::Flying(o) => o,
            Obstacle::HighFlying(o) => o,
            Obstacle::Dropped(o) => o,
        }
    }

    fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            Obstacle::Static(o) => o,
            Obstacle::Flying(o) => o,
            Obstacle::HighFlying(o) => o,
            Obstacle::Dropped(o) => o,
        }
    }
}

impl Entity for Obstacle {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.as_entity_mut().update(ctx);
    }

    fn bounds(&self) -> Rect {
        self.as_entity().bounds()
    }

    fn is_alive(&self) -> bool {
        self.as_entity().is_alive()
    }

    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2) {
        self.as_entity().draw(renderer, camera);
    }
}
