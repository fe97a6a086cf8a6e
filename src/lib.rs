//! Bicycle Adventure - a side-scrolling cycling platformer
//!
//! Core modules:
//! - `sim`: Level simulation (kinematics, entities, collisions, scoring)
//! - `game`: Screen state machine and per-tick dispatch
//! - `audio`: Sound bank, audio device seam, and music crossfade
//! - `assets`: Sprite frame catalog with placeholder fallback
//! - `renderer`: Drawing seam, screen views, terminal backend
//! - `platform`: Clock, input source, frame limiter, and the main loop

pub mod assets;
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{AppContext, Game, Screen};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical view size (world units == pixels of the sprite art)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Target loop rate
    pub const FPS: u32 = 60;

    /// Gravity added to vertical velocity every tick
    pub const GRAVITY: f32 = 0.5;
    /// Upward velocity set by a jump
    pub const JUMP_VELOCITY: f32 = -10.0;
    /// Horizontal speed while a direction key is held
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;
    pub const PLAYER_CROUCH_HEIGHT: f32 = 80.0;
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 300.0;
    /// The rider's feet sit below the tile surface by foot + wheel
    pub const PLAYER_FOOT_OFFSET: f32 = 25.0;
    pub const PLAYER_WHEEL_ADJUSTMENT: f32 = 5.0;
    /// Max gap between foot line and a tile top for the settle pass
    pub const SETTLE_TOLERANCE: f32 = 15.0;
    pub const PLAYER_ANIM_SPEED: f32 = 0.15;
    pub const DIZZY_ANIM_SPEED: f32 = 0.2;
    /// Dizzy ends after this many full animation loops
    pub const DIZZY_LOOPS: u32 = 2;

    /// Enemy box and behaviour
    pub const ENEMY_WIDTH: f32 = 50.0;
    pub const ENEMY_HEIGHT: f32 = 70.0;
    pub const ENEMY_SPAWN_X: f32 = -50.0;
    pub const ENEMY_SPAWN_Y: f32 = 300.0;
    pub const ENEMY_SPEED: f32 = 3.0;
    pub const ENEMY_FALL_STEP: f32 = 5.0;
    pub const ENEMY_FOOT_OFFSET: f32 = 5.0;
    pub const ENEMY_HOP: f32 = 10.0;
    pub const ENEMY_ACTIVATION_RADIUS: f32 = 300.0;
    pub const ENEMY_JUMP_MIN_TICKS: i32 = 60;
    pub const ENEMY_JUMP_MAX_TICKS: i32 = 120;
    pub const ENEMY_ANIM_SPEED: f32 = 0.15;

    /// Flying obstacles
    pub const FLYING_SPAWN_INTERVAL_MS: u64 = 3000;
    pub const FLYING_SPAWN_CUTOFF_X: f32 = 4000.0;
    pub const FLYING_SPAWN_AHEAD: f32 = 900.0;
    pub const FLYING_Y: f32 = 400.0;
    pub const FLYING_WIDTH: f32 = 80.0;
    pub const FLYING_HEIGHT: f32 = 40.0;
    pub const FLYING_SPEED: f32 = 3.0;
    pub const FLYING_ANIM_SPEED: f32 = 0.5;

    /// High-flying dropper
    pub const HIGH_FLYING_HOVER_OFFSET: f32 = 150.0;
    pub const HIGH_FLYING_HOVER_Y: f32 = 80.0;
    pub const HIGH_FLYING_OSC_CHANCE: f64 = 0.01;
    pub const HIGH_FLYING_OSC_AMPLITUDE: f32 = 20.0;
    pub const HIGH_FLYING_OSC_SPEED: f32 = 0.15;
    pub const HIGH_FLYING_OSC_TICKS: u32 = 60;
    pub const HIGH_FLYING_DROP_MIN_TICKS: u32 = 90;
    pub const HIGH_FLYING_DROP_MAX_TICKS: u32 = 180;
    pub const HIGH_FLYING_MAX_DROPS: u32 = 3;
    pub const HIGH_FLYING_ANIM_SPEED: f32 = 0.3;

    /// Dropped obstacles
    pub const DROPPED_SIZE: f32 = 30.0;
    pub const DROPPED_FALL_SPEED: f32 = 6.0;
    pub const DROPPED_MAX_DRIFT: f32 = 3.0;
    pub const DROPPED_ANIM_SPEED: f32 = 0.25;

    /// Terrain
    pub const TERRAIN_Y: f32 = 500.0;
    pub const TILE_WIDTH: f32 = 120.0;
    pub const TILE_HEIGHT: f32 = 50.0;
    pub const LEVEL_LENGTH: f32 = 5000.0;

    /// Coins
    pub const COLLECTIBLE_CHANCE: f64 = 0.2;
    pub const COLLECTIBLE_SIZE: f32 = 30.0;
    pub const COLLECTIBLE_LIFT: f32 = 40.0;
    pub const COLLECTIBLE_ANIM_SPEED: f32 = 0.2;
    pub const COIN_SCORE: i64 = 100;
    pub const PARTICLES_PER_COIN: usize = 10;

    /// Coin sparkle particles
    pub const PARTICLE_SIZE: f32 = 10.0;
    pub const PARTICLE_MAX_SPEED: f32 = 2.0;
    pub const PARTICLE_LIFETIME: u32 = 30;
    pub const PARTICLE_FADE_PER_TICK: u8 = 8;

    /// Finish line
    pub const FINISH_Y: f32 = 100.0;
    pub const FINISH_WIDTH: f32 = 20.0;
    pub const FINISH_HEIGHT: f32 = 500.0;

    /// Impact fire
    pub const FIRE_SIZE: f32 = 30.0;
    pub const FIRE_LIFETIME: u32 = 20;
    pub const FIRE_ANIM_SPEED: f32 = 0.2;

    /// Screen shake after a stun
    pub const SHAKE_TICKS: u32 = 20;
    pub const SHAKE_INTENSITY: i32 = 10;

    /// Score added per tick per unit of horizontal speed
    pub const SCORE_SPEED_FACTOR: f32 = 0.1;

    /// Music crossfade duration
    pub const MUSIC_FADE_MS: u64 = 3000;
    /// Overlay steps of the level-entry fade (alpha 255 down to 0)
    pub const SCREEN_FADE_STEPS: u16 = 256;
}
