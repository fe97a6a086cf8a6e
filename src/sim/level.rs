//! Level state and the per-tick update
//!
//! A `Level` owns every entity collection plus camera, score and timers.
//! `tick` advances one fixed step and reports what happened through
//! `LevelEvent`s and the returned `Outcome`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enemy::Enemy;
use super::entity::{Entity, UpdateContext, draw_all, update_all};
use super::obstacle::{FlyingObstacle, HighFlyingObstacle, Obstacle};
use super::pickup::{Collectible, Particle};
use super::player::{HitOutcome, Player};
use super::rect::Rect;
use super::scenery::{FinishLine, FireEffect, Platform};
use crate::assets::{SpriteFrames, SpriteId};
use crate::consts::*;
use crate::input::Controls;
use crate::renderer::Renderer;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Defeat,
    /// Reached the finish line; whole seconds since the level started
    Victory { elapsed_secs: u64 },
}

/// Side effects of a tick that the screen layer turns into sound and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelEvent {
    CoinCollected,
    /// First stunning hit; fire spawns at `at`
    Stunned { at: Vec2 },
    /// Any hit that plays the collision cue, including the fatal one
    Collision,
}

/// Per-level knobs taken from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelOptions {
    pub max_particles: usize,
    pub screen_shake: bool,
}

impl Default for LevelOptions {
    fn default() -> Self {
        Self {
            max_particles: 300,
            screen_shake: true,
        }
    }
}

pub struct Level {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub particles: Vec<Particle>,
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub fire_effects: Vec<FireEffect>,
    pub finish_line: Option<FinishLine>,
    pub score: i64,
    /// Left edge of the view in world units
    pub camera_x: f32,
    pub shake_ticks: u32,
    pub shake_offset: Vec2,
    pub started_ms: u64,
    pub last_flying_spawn_ms: u64,
    pub ticks: u64,
    rng: Pcg32,
    frames: SpriteFrames,
    options: LevelOptions,
}

/// Score change from horizontal speed. Truncates toward zero, so the
/// regular riding speed of +-5 contributes nothing.
#[inline]
pub fn speed_score(speed_x: f32) -> i64 {
    (speed_x * SCORE_SPEED_FACTOR) as i64
}

impl Level {
    /// A level with just the player at the spawn point
    pub fn empty(seed: u64, frames: SpriteFrames, options: LevelOptions, now_ms: u64) -> Self {
        Self {
            player: Player::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y, &frames),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            particles: Vec::new(),
            obstacles: Vec::new(),
            enemies: Vec::new(),
            fire_effects: Vec::new(),
            finish_line: None,
            score: 0,
            camera_x: 0.0,
            shake_ticks: 0,
            shake_offset: Vec2::ZERO,
            started_ms: now_ms,
            last_flying_spawn_ms: now_ms,
            ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            frames,
            options,
        }
    }

    /// Build the single level: a flat tiled run with coins, one chaser
    /// behind the start, one high flyer, and the finish at the far end
    pub fn generate(seed: u64, frames: SpriteFrames, options: LevelOptions, now_ms: u64) -> Self {
        let mut level = Self::empty(seed, frames, options, now_ms);

        let mut x = 0.0;
        while x < LEVEL_LENGTH {
            level
                .platforms
                .push(Platform::new(x, TERRAIN_Y, TILE_WIDTH, TILE_HEIGHT));
            if level.rng.random_bool(COLLECTIBLE_CHANCE) {
                let center = Vec2::new(x + TILE_WIDTH / 2.0, TERRAIN_Y - COLLECTIBLE_LIFT);
                level.collectibles.push(Collectible::new(center, &level.frames));
            }
            x += TILE_WIDTH;
        }

        level.finish_line = Some(FinishLine::new(LEVEL_LENGTH, FINISH_Y));

        if let Some(first) = level.platforms.first() {
            let top = first.rect.top();
            level.player.stand_on(top);
        }

        let enemy = Enemy::new(ENEMY_SPAWN_X, ENEMY_SPAWN_Y, &level.frames, &mut level.rng);
        level.enemies.push(enemy);

        let flyer = HighFlyingObstacle::new(
            level.player.pos().x + HIGH_FLYING_HOVER_OFFSET,
            HIGH_FLYING_HOVER_Y,
            &level.frames,
            &mut level.rng,
        );
        level.obstacles.push(Obstacle::HighFlying(flyer));

        log::info!(
            "Level generated: {} tiles, {} coins",
            level.platforms.len(),
            level.collectibles.len()
        );
        level
    }

    pub fn jump(&mut self) -> bool {
        let jumped = self.player.jump();
        if jumped {
            log::debug!("Jump at x={:.0}", self.player.pos().x);
        }
        jumped
    }

    pub fn set_crouch(&mut self, crouch: bool) {
        self.player.set_crouch(crouch);
    }

    /// Whole seconds since the level started
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms) / 1000
    }

    /// Offset applied to everything drawn in world space
    fn view_offset(&self) -> Vec2 {
        Vec2::new(self.camera_x, 0.0) - self.shake_offset
    }

    /// Advance one tick
    pub fn tick(&mut self, controls: Controls, now_ms: u64, events: &mut Vec<LevelEvent>) -> Outcome {
        self.ticks += 1;
        self.player.steer(controls.horizontal_speed(PLAYER_SPEED));

        let mut spawned = Vec::new();
        {
            let mut ctx = UpdateContext {
                platforms: &self.platforms,
                player_pos: self.player.pos(),
                camera_x: self.camera_x,
                view_height: SCREEN_HEIGHT,
                controls,
                frames: &self.frames,
                rng: &mut self.rng,
                spawned: &mut spawned,
            };

            self.player.update(&mut ctx);
            ctx.player_pos = self.player.pos();

            update_all(&mut self.fire_effects, &mut ctx);
            update_all(&mut self.collectibles, &mut ctx);
            update_all(&mut self.particles, &mut ctx);
            update_all(&mut self.enemies, &mut ctx);

            self.camera_x = (self.player.pos().x - SCREEN_WIDTH / 2.0).max(0.0);
            ctx.camera_x = self.camera_x;

            let player_x = self.player.pos().x;
            if now_ms.saturating_sub(self.last_flying_spawn_ms) > FLYING_SPAWN_INTERVAL_MS
                && player_x < FLYING_SPAWN_CUTOFF_X
            {
                self.obstacles.push(Obstacle::Flying(FlyingObstacle::new(
                    player_x + FLYING_SPAWN_AHEAD,
                    FLYING_Y,
                    &self.frames,
                )));
                self.last_flying_spawn_ms = now_ms;
                log::debug!("Flying obstacle spawned ahead of x={player_x:.0}");
            }

            update_all(&mut self.obstacles, &mut ctx);
        }
        self.obstacles.append(&mut spawned);

        if self.resolve_obstacle_hits(events) || self.hits_enemy() {
            events.push(LevelEvent::Collision);
            return Outcome::Defeat;
        }

        self.collect_coins(events);
        self.score += speed_score(self.player.body.vel.x);
        self.step_shake();

        let player_rect = self.player.rect();
        if self
            .finish_line
            .as_ref()
            .is_some_and(|f| player_rect.intersects(&f.rect))
        {
            return Outcome::Victory {
                elapsed_secs: self.elapsed_secs(now_ms),
            };
        }
        Outcome::Running
    }

    /// Returns true if an obstacle ended the run
    fn resolve_obstacle_hits(&mut self, events: &mut Vec<LevelEvent>) -> bool {
        let player_rect = self.player.rect();
        for obstacle in self.obstacles.iter_mut() {
            let bounds = obstacle.bounds();
            if !obstacle.is_alive() || !player_rect.intersects(&bounds) {
                continue;
            }
            if !obstacle.stuns() {
                log::debug!("Player hit a solid obstacle");
                return true;
            }
            match self.player.take_hit() {
                HitOutcome::Ducked => {}
                HitOutcome::Stunned => {
                    obstacle.kill();
                    let at = impact_point(&player_rect, &bounds);
                    self.fire_effects.push(FireEffect::new(at, &self.frames));
                    self.shake_ticks = SHAKE_TICKS;
                    events.push(LevelEvent::Collision);
                    events.push(LevelEvent::Stunned { at });
                    log::debug!("Player stunned at ({:.0}, {:.0})", at.x, at.y);
                }
                HitOutcome::KnockedOut => {
                    obstacle.kill();
                    log::debug!("Player knocked out while already hit once");
                    return true;
                }
            }
        }
        self.obstacles.retain(|o| o.is_alive());
        false
    }

    fn hits_enemy(&self) -> bool {
        let player_rect = self.player.rect();
        self.enemies.iter().any(|e| player_rect.intersects(&e.rect))
    }

    fn collect_coins(&mut self, events: &mut Vec<LevelEvent>) {
        let player_rect = self.player.rect();
        for coin in self.collectibles.iter_mut() {
            if coin.is_alive() && player_rect.intersects(&coin.rect) {
                coin.collect(&mut self.rng, &mut self.particles);
                self.score += COIN_SCORE;
                events.push(LevelEvent::CoinCollected);
            }
        }
        self.collectibles.retain(|c| c.is_alive());

        let cap = self.options.max_particles;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    fn step_shake(&mut self) {
        if self.shake_ticks == 0 {
            self.shake_offset = Vec2::ZERO;
            return;
        }
        self.shake_ticks -= 1;
        self.shake_offset = if self.options.screen_shake {
            Vec2::new(
                self.rng.random_range(-SHAKE_INTENSITY..=SHAKE_INTENSITY) as f32,
                self.rng.random_range(-SHAKE_INTENSITY..=SHAKE_INTENSITY) as f32,
            )
        } else {
            Vec2::ZERO
        };
    }

    /// Draw the world back to front. HUD is left to the caller.
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let camera = self.view_offset();
        renderer.draw_sprite(
            SpriteId::Background,
            0,
            Rect::new(self.shake_offset.x, self.shake_offset.y, SCREEN_WIDTH, SCREEN_HEIGHT),
            255,
        );
        draw_all(&self.platforms, renderer, camera);
        draw_all(&self.collectibles, renderer, camera);
        draw_all(&self.particles, renderer, camera);
        draw_all(&self.obstacles, renderer, camera);
        draw_all(&self.enemies, renderer, camera);
        draw_all(&self.fire_effects, renderer, camera);
        self.player.draw(renderer, camera);
        if let Some(finish) = &self.finish_line {
            finish.draw(renderer, camera);
        }
        self.player.draw_dizzy_overlay(renderer, camera);
    }
}

/// Centre of the overlap between two boxes
fn impact_point(a: &Rect, b: &Rect) -> Vec2 {
    let left = a.left().max(b.left());
    let right = a.right().min(b.right());
    let top = a.top().max(b.top());
    let bottom = a.bottom().min(b.bottom());
    Vec2::new((left + right) / 2.0, (top + bottom) / 2.0)
}
