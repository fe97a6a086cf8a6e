//! Simulation module
//!
//! All gameplay logic lives here:
//! - One fixed step per call to `Level::tick`
//! - Randomness only through the level's own RNG
//! - No terminal, audio or clock dependencies

pub mod anim;
pub mod collision;
pub mod enemy;
pub mod entity;
pub mod level;
pub mod obstacle;
pub mod pickup;
pub mod player;
pub mod rect;
pub mod scenery;

pub use anim::{Animation, FrameStep};
pub use collision::{Body, settle_on_platforms, step_body};
pub use enemy::Enemy;
pub use entity::{Entity, UpdateContext};
pub use level::{Level, LevelEvent, LevelOptions, Outcome, speed_score};
pub use obstacle::{DroppedObstacle, FlyingObstacle, HighFlyingObstacle, Obstacle, StaticObstacle};
pub use pickup::{Collectible, Particle};
pub use player::{HitOutcome, Player};
pub use rect::Rect;
pub use scenery::{FinishLine, FireEffect, Platform};
