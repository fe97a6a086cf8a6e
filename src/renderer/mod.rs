//! Rendering seam
//!
//! The simulation and screens only ever talk to `Renderer`; a backend turns
//! the calls into pixels (or terminal cells). Draw calls arrive back to front
//! and each frame ends with `present`.

pub mod terminal;
pub mod views;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::SpriteId;
use crate::error::GameError;
use crate::sim::Rect;

pub use terminal::TerminalRenderer;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);
    pub const BROWN: Rgb = Rgb::new(139, 69, 19);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale toward black; `keep` of 255 leaves the color untouched
    pub fn darken(self, keep: u8) -> Self {
        let scale = |c: u8| ((c as u16 * keep as u16) / 255) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Font sizes used by the HUD and screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

/// Which point of the text `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Left,
    Center,
    Right,
}

/// Output device for one frame at a time
pub trait Renderer {
    /// Clear to black
    fn begin_frame(&mut self);

    /// Draw frame `frame` of `sprite` into `rect` (screen space)
    fn draw_sprite(&mut self, sprite: SpriteId, frame: usize, rect: Rect, alpha: u8);

    fn draw_text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: TextAnchor, color: Rgb);

    /// Full-screen black layer at `alpha` over everything drawn so far
    fn draw_overlay(&mut self, alpha: u8);

    fn present(&mut self) -> Result<(), GameError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken() {
        assert_eq!(Rgb::WHITE.darken(255), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.darken(0), Rgb::BLACK);
        assert_eq!(Rgb::new(200, 100, 50).darken(127), Rgb::new(99, 49, 24));
    }
}
