//! Common entity interface
//!
//! Every kind owns its bounding box, frame state and behaviour. Anything an
//! entity needs from the world arrives through `UpdateContext`; anything it
//! creates goes out through the context's buffers.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::obstacle::Obstacle;
use super::rect::Rect;
use super::scenery::Platform;
use crate::assets::SpriteFrames;
use crate::input::Controls;
use crate::renderer::Renderer;

/// World view handed to entities during their update
pub struct UpdateContext<'a> {
    pub platforms: &'a [Platform],
    /// Player's top-left corner this tick
    pub player_pos: Vec2,
    /// Left edge of the visible world
    pub camera_x: f32,
    /// Bottom of the visible world
    pub view_height: f32,
    pub controls: Controls,
    pub frames: &'a SpriteFrames,
    pub rng: &'a mut Pcg32,
    /// Obstacles created this tick; drained into the level afterwards
    pub spawned: &'a mut Vec<Obstacle>,
}

pub trait Entity {
    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    fn bounds(&self) -> Rect;

    /// False once the entity has been removed; never becomes true again
    fn is_alive(&self) -> bool {
        true
    }

    /// Draw at `bounds() - camera`
    fn draw(&self, renderer: &mut dyn Renderer, camera: Vec2);
}

/// Update every entity, then drop the dead ones
pub fn update_all<E: Entity>(entities: &mut Vec<E>, ctx: &mut UpdateContext<'_>) {
    for entity in entities.iter_mut() {
        entity.update(ctx);
    }
    entities.retain(|e| e.is_alive());
}

pub fn draw_all<E: Entity>(entities: &[E], renderer: &mut dyn Renderer, camera: Vec2) {
    for entity in entities {
        entity.draw(renderer, camera);
    }
}
