//! Game settings and preferences
//!
//! Stored as JSON next to the working directory. A missing or unreadable
//! file falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 50,
            QualityPreset::Medium => 150,
            QualityPreset::High => 300,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Coin sparkle particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Runtime ===
    /// Root of the image and sound tree
    pub asset_dir: PathBuf,
    pub target_fps: u32,
    /// Steps of the 256-step level-entry fade advanced per frame
    pub fade_steps_per_tick: u16,
    /// Where `env_logger` writes; the terminal is busy drawing the game
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            reduced_motion: false,

            asset_dir: PathBuf::from("assets"),
            target_fps: crate::consts::FPS,
            fade_steps_per_tick: 4,
            log_file: PathBuf::from("bicycle_adventure.log"),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "bicycle_settings.json";
    /// Environment variable that overrides the settings path
    pub const PATH_ENV: &'static str = "BICYCLE_SETTINGS";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Fade steps per frame, never zero so the fade always finishes
    pub fn fade_steps(&self) -> u16 {
        self.fade_steps_per_tick.max(1)
    }

    /// Frame period for the limiter
    pub fn frame_time_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }

    /// Settings path: `BICYCLE_SETTINGS` if set, else the default file name
    pub fn default_path() -> PathBuf {
        std::env::var_os(Self::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME))
    }

    /// Load from the default path
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, GameError> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| GameError::asset(path.display().to_string(), e.to_string()))
    }

    /// Save to the default path
    pub fn save(&self) -> Result<(), GameError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GameError::asset(path.display().to_string(), e.to_string()))?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
