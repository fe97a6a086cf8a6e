//! Sprite frame catalog
//!
//! Frames are loaded once at startup from `<root>/<stem>_<index>.<ext>`.
//! Anything missing or undecodable is replaced by a solid placeholder frame,
//! so every sprite always has at least one frame.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::renderer::Rgb;

/// Every drawable sprite sheet the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    Background,
    Player,
    PlayerDizzy,
    Enemy,
    Coin,
    Particle,
    Platform,
    StaticObstacle,
    FlyingObstacle,
    HighFlyingObstacle,
    DroppedObstacle,
    FinishLine,
    Fire,
}

impl SpriteId {
    pub const COUNT: usize = 13;

    pub const ALL: [SpriteId; Self::COUNT] = [
        SpriteId::Background,
        SpriteId::Player,
        SpriteId::PlayerDizzy,
        SpriteId::Enemy,
        SpriteId::Coin,
        SpriteId::Particle,
        SpriteId::Platform,
        SpriteId::StaticObstacle,
        SpriteId::FlyingObstacle,
        SpriteId::HighFlyingObstacle,
        SpriteId::DroppedObstacle,
        SpriteId::FinishLine,
        SpriteId::Fire,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Path stem relative to the asset root
    pub fn stem(self) -> &'static str {
        match self {
            SpriteId::Background => "background/woods",
            SpriteId::Player => "player/ride",
            SpriteId::PlayerDizzy => "player/dizzy",
            SpriteId::Enemy => "enemy/walk",
            SpriteId::Coin => "coin/spin",
            SpriteId::Particle => "fx/sparkle",
            SpriteId::Platform => "terrain/tile",
            SpriteId::StaticObstacle => "obstacles/crate",
            SpriteId::FlyingObstacle => "obstacles/flyer",
            SpriteId::HighFlyingObstacle => "obstacles/dropper",
            SpriteId::DroppedObstacle => "obstacles/drop",
            SpriteId::FinishLine => "terrain/finish",
            SpriteId::Fire => "fx/fire",
        }
    }

    /// Number of frames the full art set ships with
    pub fn expected_frames(self) -> usize {
        match self {
            SpriteId::Player => 7,
            SpriteId::PlayerDizzy => 9,
            SpriteId::Enemy => 3,
            SpriteId::Coin => 7,
            SpriteId::FlyingObstacle => 4,
            SpriteId::HighFlyingObstacle => 24,
            SpriteId::DroppedObstacle => 8,
            SpriteId::Fire => 16,
            SpriteId::Background
            | SpriteId::Particle
            | SpriteId::Platform
            | SpriteId::StaticObstacle
            | SpriteId::FinishLine => 1,
        }
    }

    /// Solid color used when no art could be loaded
    pub fn placeholder_color(self) -> Rgb {
        match self {
            SpriteId::Background => Rgb::BLACK,
            SpriteId::Player => Rgb::WHITE,
            SpriteId::PlayerDizzy => Rgb::YELLOW,
            SpriteId::Enemy => Rgb::RED,
            SpriteId::Coin => Rgb::YELLOW,
            SpriteId::Particle => Rgb::WHITE,
            SpriteId::Platform => Rgb::GRAY,
            SpriteId::StaticObstacle => Rgb::BROWN,
            SpriteId::FlyingObstacle => Rgb::new(150, 80, 200),
            SpriteId::HighFlyingObstacle => Rgb::new(90, 110, 200),
            SpriteId::DroppedObstacle => Rgb::new(128, 64, 0),
            SpriteId::FinishLine => Rgb::GREEN,
            SpriteId::Fire => Rgb::RED,
        }
    }
}

/// One decoded frame, reduced to what the renderers need
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Average color of the opaque pixels
    pub color: Rgb,
    pub placeholder: bool,
}

impl Frame {
    pub fn placeholder(color: Rgb) -> Self {
        Self {
            width: 1,
            height: 1,
            color,
            placeholder: true,
        }
    }
}

/// Ordered frames of one sprite sheet (never empty)
#[derive(Debug, Clone)]
pub struct FrameSet {
    frames: Vec<Frame>,
}

impl FrameSet {
    pub fn placeholder(id: SpriteId) -> Self {
        Self {
            frames: vec![Frame::placeholder(id.placeholder_color())],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame by index, wrapping out-of-range indices
    pub fn get(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    pub fn is_placeholder(&self) -> bool {
        self.frames.iter().all(|f| f.placeholder)
    }
}

/// Frame counts per sprite, copied into the simulation so entities never
/// hold asset references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrames([usize; SpriteId::COUNT]);

impl SpriteFrames {
    /// One frame per sprite (what a fully placeholder catalog reports)
    pub fn single() -> Self {
        Self([1; SpriteId::COUNT])
    }

    /// The counts of the complete art set
    pub fn full() -> Self {
        let mut counts = [1; SpriteId::COUNT];
        for id in SpriteId::ALL {
            counts[id.index()] = id.expected_frames();
        }
        Self(counts)
    }

    #[inline]
    pub fn get(&self, id: SpriteId) -> usize {
        self.0[id.index()]
    }
}

impl Default for SpriteFrames {
    fn default() -> Self {
        Self::single()
    }
}

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "gif"];

/// Loaded sprite sheets, indexed by `SpriteId`
#[derive(Debug, Clone)]
pub struct Assets {
    sets: Vec<FrameSet>,
    missing_frames: usize,
}

impl Assets {
    /// Catalog made only of placeholders
    pub fn placeholders() -> Self {
        Self {
            sets: SpriteId::ALL.iter().map(|&id| FrameSet::placeholder(id)).collect(),
            missing_frames: SpriteId::ALL.iter().map(|id| id.expected_frames()).sum(),
        }
    }

    /// Load every sprite sheet under `root`. Never fails.
    pub fn load(root: &Path) -> Self {
        let mut missing_frames = 0;
        let sets = SpriteId::ALL
            .iter()
            .map(|&id| {
                let (set, missing) = load_sheet(root, id);
                missing_frames += missing;
                set
            })
            .collect();

        log::info!(
            "Asset catalog ready from {} ({} frames missing)",
            root.display(),
            missing_frames
        );
        Self {
            sets,
            missing_frames,
        }
    }

    pub fn frames(&self, id: SpriteId) -> &FrameSet {
        &self.sets[id.index()]
    }

    pub fn frame_table(&self) -> SpriteFrames {
        let mut counts = [1; SpriteId::COUNT];
        for id in SpriteId::ALL {
            counts[id.index()] = self.frames(id).len();
        }
        SpriteFrames(counts)
    }

    pub fn missing_frames(&self) -> usize {
        self.missing_frames
    }
}

/// Candidate files for frame `index` of `id`
fn frame_candidates(root: &Path, id: SpriteId, index: usize) -> Vec<PathBuf> {
    FRAME_EXTENSIONS
        .iter()
        .map(|ext| root.join(format!("{}_{}.{}", id.stem(), index, ext)))
        .collect()
}

fn load_sheet(root: &Path, id: SpriteId) -> (FrameSet, usize) {
    let mut frames = Vec::with_capacity(id.expected_frames());
    let mut missing = 0;

    for index in 0..id.expected_frames() {
        let Some(path) = frame_candidates(root, id, index)
            .into_iter()
            .find(|p| p.exists())
        else {
            log::debug!("No file for {:?} frame {}", id, index);
            missing += 1;
            continue;
        };
        match load_frame(&path) {
            Ok(frame) => frames.push(frame),
            Err(err) => {
                log::warn!("{err}");
                missing += 1;
            }
        }
    }

    if frames.is_empty() {
        log::warn!(
            "No frames for {:?} under {}, using placeholder",
            id,
            root.join(id.stem()).display()
        );
        return (FrameSet::placeholder(id), missing);
    }
    if missing > 0 {
        log::warn!("{:?}: {} of {} frames missing", id, missing, id.expected_frames());
    }
    (FrameSet { frames }, missing)
}

/// Decode one image and reduce it to size + average opaque color
pub fn load_frame(path: &Path) -> Result<Frame, GameError> {
    let image = image::open(path)
        .map_err(|e| GameError::asset(path, e))?
        .to_rgba8();

    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for pixel in image.pixels() {
        let [pr, pg, pb, pa] = pixel.0;
        if pa == 0 {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        n += 1;
    }
    if n == 0 {
        return Err(GameError::asset(path, "image is fully transparent"));
    }

    Ok(Frame {
        width: image.width(),
        height: image.height(),
        color: Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8),
        placeholder: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_yields_placeholders() {
        let assets = Assets::load(Path::new("/definitely/not/here"));
        for id in SpriteId::ALL {
            let set = assets.frames(id);
            assert_eq!(set.len(), 1);
            assert!(set.is_placeholder());
            assert_eq!(set.get(0).color, id.placeholder_color());
        }
        assert_eq!(assets.frame_table(), SpriteFrames::single());
    }

    #[test]
    fn test_sprite_index_matches_all_order() {
        for (i, id) in SpriteId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_frame_set_wraps_index() {
        let set = FrameSet::placeholder(SpriteId::Coin);
        assert_eq!(set.get(5).color, Rgb::YELLOW);
    }

    #[test]
    fn test_loads_real_frame() {
        let dir = std::env::temp_dir().join(format!("bicycle-assets-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("coin")).unwrap();
        let mut img = image::RgbaImage::new(4, 2);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([200, 100, 0, 255]);
        }
        img.save(dir.join("coin/spin_0.png")).unwrap();

        let assets = Assets::load(&dir);
        let coin = assets.frames(SpriteId::Coin);
        assert_eq!(coin.len(), 1);
        assert!(!coin.is_placeholder());
        assert_eq!(coin.get(0).color, Rgb::new(200, 100, 0));
        assert_eq!(coin.get(0).width, 4);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_table_counts() {
        let full = SpriteFrames::full();
        assert_eq!(full.get(SpriteId::PlayerDizzy), 9);
        assert_eq!(full.get(SpriteId::HighFlyingObstacle), 24);
        assert_eq!(full.get(SpriteId::Platform), 1);
    }
}
