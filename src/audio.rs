//! Audio: sound bank, output device seam, and the music crossfade
//!
//! Sound files are located once at startup. A cue whose file is missing is
//! simply skipped. Actual output goes through an `AudioDevice`; the bundled
//! `NullAudioDevice` only logs.

use std::path::{Path, PathBuf};

use crate::GameError;
use crate::consts::MUSIC_FADE_MS;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player hit an obstacle or enemy
    Collision,
    /// Reached the finish line
    Win,
    /// Run ended in defeat
    Lose,
    /// Coin picked up
    Coin,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Collision,
        SoundEffect::Win,
        SoundEffect::Lose,
        SoundEffect::Coin,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Collision => "collision.wav",
            SoundEffect::Win => "win.wav",
            SoundEffect::Lose => "lose.wav",
            SoundEffect::Coin => "coin.wav",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Level,
}

impl MusicTrack {
    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Level => "level_music.wav",
        }
    }
}

/// A located sound file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundHandle {
    pub path: PathBuf,
}

/// Fixed table of sound slots, filled once
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    effects: [Option<SoundHandle>; 4],
    level_music: Option<SoundHandle>,
}

impl SoundBank {
    /// A bank with every slot empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look for every known file under `dir`. Missing files leave their slot
    /// empty and are logged once here.
    pub fn discover(dir: &Path) -> Self {
        let mut bank = Self::empty();
        for effect in SoundEffect::ALL {
            bank.effects[effect.index()] = locate(dir, effect.file_name());
        }
        bank.level_music = locate(dir, MusicTrack::Level.file_name());
        log::info!(
            "Sound bank: {}/{} effects, music {}",
            bank.effects.iter().filter(|e| e.is_some()).count(),
            SoundEffect::ALL.len(),
            if bank.level_music.is_some() { "found" } else { "missing" }
        );
        bank
    }

    pub fn set_effect(&mut self, effect: SoundEffect, handle: Option<SoundHandle>) {
        self.effects[effect.index()] = handle;
    }

    pub fn set_music(&mut self, track: MusicTrack, handle: Option<SoundHandle>) {
        match track {
            MusicTrack::Level => self.level_music = handle,
        }
    }

    pub fn effect(&self, effect: SoundEffect) -> Option<&SoundHandle> {
        self.effects[effect.index()].as_ref()
    }

    pub fn music(&self, track: MusicTrack) -> Option<&SoundHandle> {
        match track {
            MusicTrack::Level => self.level_music.as_ref(),
        }
    }
}

fn locate(dir: &Path, file_name: &str) -> Option<SoundHandle> {
    let path = dir.join(file_name);
    if path.is_file() {
        Some(SoundHandle { path })
    } else {
        let err = GameError::asset(path.display().to_string(), "file not found");
        log::warn!("{err}");
        None
    }
}

/// Output backend
pub trait AudioDevice {
    fn load_music(&mut self, track: &SoundHandle) -> Result<(), GameError>;
    /// Start the loaded track; `looping` repeats it forever
    fn play_music(&mut self, looping: bool);
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: f32);
    fn play_effect(&mut self, effect: &SoundHandle, volume: f32);
}

/// Device that produces no sound
#[derive(Debug, Default)]
pub struct NullAudioDevice {
    loaded: Option<PathBuf>,
}

impl AudioDevice for NullAudioDevice {
    fn load_music(&mut self, track: &SoundHandle) -> Result<(), GameError> {
        self.loaded = Some(track.path.clone());
        Ok(())
    }

    fn play_music(&mut self, looping: bool) {
        log::debug!("music start {:?} (looping: {looping})", self.loaded);
    }

    fn stop_music(&mut self) {
        log::debug!("music stop");
    }

    fn set_music_volume(&mut self, _volume: f32) {}

    fn play_effect(&mut self, effect: &SoundHandle, volume: f32) {
        log::debug!("effect {} at {volume:.2}", effect.path.display());
    }
}

/// Crossfade state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    Idle,
    FadingIn,
    FadingOut,
}

/// What one fade update asks of the music output
#[derive(Debug, PartialEq)]
pub enum FadeStep<C> {
    Idle,
    /// Mid-fade volume in [0, 1]
    Volume(f32),
    /// Fade-in reached full volume
    FadedIn,
    /// Fade-out finished: stop the music and run the continuation, if any
    FadedOut(Option<C>),
}

/// Linear music volume ramp over a fixed duration.
///
/// Fading out carries a continuation that is handed back exactly once when
/// the ramp reaches zero. Starting either direction cancels the other.
#[derive(Debug)]
pub struct FadeController<C> {
    mode: FadeMode,
    started_ms: u64,
    duration_ms: u64,
    continuation: Option<C>,
}

impl<C> Default for FadeController<C> {
    fn default() -> Self {
        Self::new(MUSIC_FADE_MS)
    }
}

impl<C> FadeController<C> {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            mode: FadeMode::Idle,
            started_ms: 0,
            duration_ms: duration_ms.max(1),
            continuation: None,
        }
    }

    pub fn mode(&self) -> FadeMode {
        self.mode
    }

    pub fn fade_in(&mut self, now_ms: u64) {
        log::info!("Fade-in started");
        self.mode = FadeMode::FadingIn;
        self.started_ms = now_ms;
        self.continuation = None;
    }

    pub fn fade_out(&mut self, now_ms: u64, continuation: Option<C>) {
        log::info!("Fade-out started");
        self.mode = FadeMode::FadingOut;
        self.started_ms = now_ms;
        self.continuation = continuation;
    }

    pub fn update(&mut self, now_ms: u64) -> FadeStep<C> {
        let elapsed = now_ms.saturating_sub(self.started_ms);
        let progress = elapsed as f32 / self.duration_ms as f32;
        match self.mode {
            FadeMode::Idle => FadeStep::Idle,
            FadeMode::FadingIn if elapsed < self.duration_ms => FadeStep::Volume(progress),
            FadeMode::FadingIn => {
                self.mode = FadeMode::Idle;
                log::info!("Fade-in complete");
                FadeStep::FadedIn
            }
            FadeMode::FadingOut if elapsed < self.duration_ms => {
                FadeStep::Volume((1.0 - progress).max(0.0))
            }
            FadeMode::FadingOut => {
                self.mode = FadeMode::Idle;
                log::info!("Fade-out complete");
                FadeStep::FadedOut(self.continuation.take())
            }
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    device: Box<dyn AudioDevice>,
    bank: SoundBank,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(device: Box<dyn AudioDevice>, bank: SoundBank) -> Self {
        Self {
            device,
            bank,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_playing: false,
        }
    }

    /// Silent device, empty bank
    pub fn silent() -> Self {
        Self::new(Box::new(NullAudioDevice::default()), SoundBank::empty())
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn effect_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Map a fade level in [0, 1] onto the configured music volume
    fn music_level(&self, fade: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            fade.clamp(0.0, 1.0) * self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect; a cue with no file is skipped
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effect_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(handle) = self.bank.effect(effect) {
            self.device.play_effect(handle, vol);
        }
    }

    /// Load and start a track at zero volume, ready for a fade-in.
    /// Returns false if the track is unavailable.
    pub fn start_music(&mut self, track: MusicTrack) -> bool {
        let Some(handle) = self.bank.music(track) else {
            return false;
        };
        if let Err(e) = self.device.load_music(handle) {
            log::error!("Failed to load music: {e}");
            self.music_playing = false;
            return false;
        }
        let silent = self.music_level(0.0);
        self.device.set_music_volume(silent);
        self.device.play_music(true);
        self.music_playing = true;
        true
    }

    /// Apply one fade step to the music output, returning any continuation
    pub fn apply_fade<C>(&mut self, step: FadeStep<C>) -> Option<C> {
        match step {
            FadeStep::Idle => None,
            FadeStep::Volume(v) => {
                let level = self.music_level(v);
                self.device.set_music_volume(level);
                None
            }
            FadeStep::FadedIn => {
                let level = self.music_level(1.0);
                self.device.set_music_volume(level);
                None
            }
            FadeStep::FadedOut(continuation) => {
                self.device.stop_music();
                self.music_playing = false;
                let level = self.music_level(1.0);
                self.device.set_music_volume(level);
                continuation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load,
        Play,
        Stop,
        Volume(f32),
        Effect(PathBuf),
    }

    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl AudioDevice for Recorder {
        fn load_music(&mut self, _track: &SoundHandle) -> Result<(), GameError> {
            self.0.borrow_mut().push(Call::Load);
            Ok(())
        }
        fn play_music(&mut self, _looping: bool) {
            self.0.borrow_mut().push(Call::Play);
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Call::Stop);
        }
        fn set_music_volume(&mut self, volume: f32) {
            self.0.borrow_mut().push(Call::Volume(volume));
        }
        fn play_effect(&mut self, effect: &SoundHandle, _volume: f32) {
            self.0.borrow_mut().push(Call::Effect(effect.path.clone()));
        }
    }

    fn handle(name: &str) -> Option<SoundHandle> {
        Some(SoundHandle {
            path: PathBuf::from(name),
        })
    }

    #[test]
    fn test_fade_in_ramps_then_idles() {
        let mut fade: FadeController<()> = FadeController::new(3000);
        fade.fade_in(1000);
        assert_eq!(fade.update(1000), FadeStep::Volume(0.0));
        assert_eq!(fade.update(2500), FadeStep::Volume(0.5));
        assert_eq!(fade.update(4000), FadeStep::FadedIn);
        assert_eq!(fade.mode(), FadeMode::Idle);
        assert_eq!(fade.update(5000), FadeStep::Idle);
    }

    #[test]
    fn test_fade_in_then_fade_out_fires_continuation_once() {
        let mut fade = FadeController::new(3000);
        fade.fade_in(0);
        fade.fade_out(10, Some("start"));
        assert_eq!(fade.mode(), FadeMode::FadingOut);

        assert_eq!(fade.update(1510), FadeStep::Volume(0.5));
        assert_eq!(fade.update(3009), FadeStep::Volume(1.0 - 2999.0 / 3000.0));
        assert_eq!(fade.update(3010), FadeStep::FadedOut(Some("start")));
        assert_eq!(fade.update(3011), FadeStep::Idle);
        assert_eq!(fade.update(9000), FadeStep::Idle);
    }

    #[test]
    fn test_fade_in_cancels_pending_continuation() {
        let mut fade = FadeController::new(100);
        fade.fade_out(0, Some(1));
        fade.fade_in(50);
        assert_eq!(fade.mode(), FadeMode::FadingIn);
        assert_eq!(fade.update(150), FadeStep::FadedIn);
        fade.fade_out(200, None);
        assert_eq!(fade.update(300), FadeStep::FadedOut(None));
    }

    #[test]
    fn test_missing_cue_is_skipped() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut bank = SoundBank::empty();
        bank.set_effect(SoundEffect::Coin, handle("coin.wav"));
        let mut audio = AudioManager::new(Box::new(Recorder(calls.clone())), bank);

        audio.play(SoundEffect::Lose);
        audio.play(SoundEffect::Coin);
        assert_eq!(*calls.borrow(), vec![Call::Effect(PathBuf::from("coin.wav"))]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut bank = SoundBank::empty();
        bank.set_effect(SoundEffect::Coin, handle("coin.wav"));
        let mut audio = AudioManager::new(Box::new(Recorder(calls.clone())), bank);
        audio.set_muted(true);
        audio.play(SoundEffect::Coin);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_music_lifecycle() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut bank = SoundBank::empty();
        bank.set_music(MusicTrack::Level, handle("level_music.wav"));
        let mut audio = AudioManager::new(Box::new(Recorder(calls.clone())), bank);
        audio.set_master_volume(1.0);
        audio.set_music_volume(1.0);

        assert!(audio.start_music(MusicTrack::Level));
        assert!(audio.music_playing());
        assert_eq!(audio.apply_fade(FadeStep::<()>::FadedOut(None)), None);
        assert!(!audio.music_playing());
        assert_eq!(
            *calls.borrow(),
            vec![Call::Load, Call::Volume(0.0), Call::Play, Call::Stop, Call::Volume(1.0)]
        );
    }

    #[test]
    fn test_no_music_file_means_no_music() {
        let mut audio = AudioManager::silent();
        assert!(!audio.start_music(MusicTrack::Level));
        assert!(!audio.music_playing());
    }

    #[test]
    fn test_discover_finds_present_files() {
        let dir = std::env::temp_dir().join(format!("bicycle_sounds_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("coin.wav"), b"RIFF").unwrap();

        let bank = SoundBank::discover(&dir);
        let _ = std::fs::remove_dir_all(&dir);

        assert!(bank.effect(SoundEffect::Coin).is_some());
        assert!(bank.effect(SoundEffect::Win).is_none());
        assert!(bank.music(MusicTrack::Level).is_none());
    }
}
