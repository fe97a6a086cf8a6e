//! Screen state machine
//!
//! `Game` owns the app context and the current level. The driver feeds it
//! input events, calls `update` once per frame, then `render`.

use crate::assets::Assets;
use crate::audio::{AudioManager, FadeController, MusicTrack, SoundEffect};
use crate::consts::SCREEN_FADE_STEPS;
use crate::error::GameError;
use crate::highscores::HighScores;
use crate::input::{InputEvent, Key, KeyState};
use crate::renderer::{Renderer, views};
use crate::settings::Settings;
use crate::sim::{Level, LevelEvent, LevelOptions, Outcome};

/// Which screen receives input and draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Playing,
    GameOver,
    Win,
}

/// Long-lived services, built once in `main`
pub struct AppContext {
    pub settings: Settings,
    pub assets: Assets,
    pub audio: AudioManager,
}

impl AppContext {
    /// Bundle the services and push audio preferences into the manager
    pub fn new(settings: Settings, assets: Assets, mut audio: AudioManager) -> Self {
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        Self {
            settings,
            assets,
            audio,
        }
    }

    fn level_options(&self) -> LevelOptions {
        LevelOptions {
            max_particles: self.settings.max_particles(),
            screen_shake: self.settings.effective_screen_shake(),
        }
    }
}

/// Work deferred until a music fade-out completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterFade {
    StartLevel,
}

/// Black overlay lifting off a freshly started level, one step per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenFade {
    step: u16,
}

impl ScreenFade {
    pub fn new() -> Self {
        Self::default()
    }

    /// 255 at the first step, 0 at the last
    pub fn alpha(&self) -> u8 {
        let remaining = (SCREEN_FADE_STEPS - 1).saturating_sub(self.step);
        remaining.min(255) as u8
    }

    pub fn advance(&mut self, steps: u16) {
        self.step = self.step.saturating_add(steps).min(SCREEN_FADE_STEPS);
    }

    pub fn is_done(&self) -> bool {
        self.step >= SCREEN_FADE_STEPS
    }
}

pub struct Game {
    ctx: AppContext,
    screen: Screen,
    level: Option<Level>,
    fade: FadeController<AfterFade>,
    screen_fade: Option<ScreenFade>,
    /// A start was requested and waits on the music fade-out
    pending_start: bool,
    high_score: i64,
    high_scores: HighScores,
    /// Whole seconds of the last winning run
    win_secs: u64,
    running: bool,
    /// Fixed level seed for tests; gameplay is unseeded otherwise
    seed: Option<u64>,
    events: Vec<LevelEvent>,
}

impl Game {
    pub fn new(ctx: AppContext) -> Self {
        log::info!("Game initialized");
        Self {
            ctx,
            screen: Screen::MainMenu,
            level: None,
            fade: FadeController::default(),
            screen_fade: None,
            pending_start: false,
            high_score: 0,
            high_scores: HighScores::new(),
            win_secs: 0,
            running: true,
            seed: None,
            events: Vec::new(),
        }
    }

    /// Generate every level from `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Best score seen in this process, including the run in progress
    pub fn high_score(&self) -> i64 {
        self.high_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    pub fn screen_fade(&self) -> Option<ScreenFade> {
        self.screen_fade
    }

    pub fn is_start_pending(&self) -> bool {
        self.pending_start
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Route one input event to the active screen
    pub fn handle_event(&mut self, event: &InputEvent, now_ms: u64) {
        match *event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => {
                log::info!("Quit requested");
                self.running = false;
            }
            InputEvent::KeyDown(key) => match self.screen {
                Screen::MainMenu if key.is_confirm() => self.request_start(now_ms),
                Screen::Playing => self.playing_key_down(key),
                Screen::GameOver | Screen::Win if key.is_confirm() => self.reset(),
                _ => {}
            },
            InputEvent::KeyUp(Key::Down) if self.screen == Screen::Playing => {
                if let Some(level) = self.level.as_mut() {
                    level.set_crouch(false);
                }
            }
            InputEvent::KeyUp(_) => {}
        }
    }

    fn playing_key_down(&mut self, key: Key) {
        if self.screen_fade.is_some() {
            return;
        }
        let Some(level) = self.level.as_mut() else {
            return;
        };
        match key {
            Key::Space => {
                level.jump();
            }
            Key::Down => level.set_crouch(true),
            _ => {}
        }
    }

    fn request_start(&mut self, now_ms: u64) {
        if self.pending_start {
            return;
        }
        if self.ctx.audio.music_playing() {
            self.pending_start = true;
            self.fade.fade_out(now_ms, Some(AfterFade::StartLevel));
        } else {
            self.start_level(now_ms);
        }
    }

    fn start_level(&mut self, now_ms: u64) {
        self.pending_start = false;
        let seed = self.seed.unwrap_or_else(rand::random);
        let frames = self.ctx.assets.frame_table();
        self.level = Some(Level::generate(seed, frames, self.ctx.level_options(), now_ms));
        self.screen = Screen::Playing;
        self.screen_fade = Some(ScreenFade::new());
        if self.ctx.audio.start_music(MusicTrack::Level) {
            self.fade.fade_in(now_ms);
        }
        log::info!("Starting level");
    }

    /// Back to a fresh main menu; high score and leaderboard survive
    fn reset(&mut self) {
        self.screen = Screen::MainMenu;
        self.level = None;
        self.screen_fade = None;
        self.pending_start = false;
        self.win_secs = 0;
        log::info!("Returned to main menu");
    }

    /// Advance music fade, entry fade, and the level by one frame
    pub fn update(&mut self, keys: &KeyState, now_ms: u64) {
        let step = self.fade.update(now_ms);
        if let Some(AfterFade::StartLevel) = self.ctx.audio.apply_fade(step) {
            self.start_level(now_ms);
        }

        if self.screen != Screen::Playing {
            return;
        }

        if let Some(fade) = self.screen_fade.as_mut() {
            fade.advance(self.ctx.settings.fade_steps());
            if fade.is_done() {
                self.screen_fade = None;
            }
            return;
        }

        let Some(level) = self.level.as_mut() else {
            return;
        };
        self.events.clear();
        let outcome = level.tick(keys.controls(), now_ms, &mut self.events);
        let score = level.score;
        let elapsed = level.elapsed_secs(now_ms);
        self.high_score = self.high_score.max(score);

        for event in std::mem::take(&mut self.events) {
            match event {
                LevelEvent::CoinCollected => self.ctx.audio.play(SoundEffect::Coin),
                LevelEvent::Collision => self.ctx.audio.play(SoundEffect::Collision),
                LevelEvent::Stunned { .. } => {}
            }
        }

        match outcome {
            Outcome::Running => {}
            Outcome::Defeat => {
                log::info!("Game over: score {score} after {elapsed}s");
                self.finish_run(Screen::GameOver, SoundEffect::Lose, now_ms);
                self.high_scores.add_score(score, elapsed, false);
            }
            Outcome::Victory { elapsed_secs } => {
                log::info!("Level complete: score {score} in {elapsed_secs}s");
                self.win_secs = elapsed_secs;
                self.finish_run(Screen::Win, SoundEffect::Win, now_ms);
                self.high_scores.add_score(score, elapsed_secs, true);
            }
        }
    }

    fn finish_run(&mut self, screen: Screen, cue: SoundEffect, now_ms: u64) {
        self.screen = screen;
        if self.ctx.audio.music_playing() {
            self.fade.fade_out(now_ms, None);
        }
        self.ctx.audio.play(cue);
    }

    /// Draw the active screen and present it
    pub fn render(&self, renderer: &mut dyn Renderer, now_ms: u64) -> Result<(), GameError> {
        renderer.begin_frame();
        let score = self.level.as_ref().map_or(0, |l| l.score);
        match self.screen {
            Screen::MainMenu => views::draw_menu(renderer, &self.high_scores, self.high_score),
            Screen::Playing => {
                if let Some(level) = &self.level {
                    level.draw(renderer);
                    views::draw_hud(
                        renderer,
                        level.elapsed_secs(now_ms),
                        level.score,
                        self.high_score,
                        level.shake_offset,
                    );
                }
                if let Some(fade) = &self.screen_fade {
                    renderer.draw_overlay(fade.alpha());
                }
            }
            Screen::GameOver => views::draw_game_over(renderer, score, self.high_score),
            Screen::Win => views::draw_win(renderer, self.win_secs, score, self.high_score),
        }
        renderer.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let ctx = AppContext::new(Settings::default(), Assets::placeholders(), AudioManager::silent());
        Game::new(ctx).with_seed(42)
    }

    fn press(game: &mut Game, key: Key, now: u64) {
        game.handle_event(&InputEvent::KeyDown(key), now);
        game.handle_event(&InputEvent::KeyUp(key), now);
    }

    fn finish_entry_fade(game: &mut Game, keys: &KeyState, now: u64) {
        while game.screen_fade().is_some() {
            game.update(keys, now);
        }
    }

    #[test]
    fn test_screen_fade_runs_full_range() {
        let mut fade = ScreenFade::new();
        assert_eq!(fade.alpha(), 255);
        fade.advance(255);
        assert_eq!(fade.alpha(), 0);
        assert!(!fade.is_done());
        fade.advance(1);
        assert!(fade.is_done());
    }

    #[test]
    fn test_confirm_starts_level_without_music() {
        let mut game = game();
        assert_eq!(game.screen(), Screen::MainMenu);
        press(&mut game, Key::Enter, 0);
        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.level().is_some());
        assert_eq!(game.screen_fade().map(|f| f.alpha()), Some(255));
    }

    #[test]
    fn test_entry_fade_freezes_level() {
        let mut game = game();
        press(&mut game, Key::Space, 0);
        let keys = KeyState::default();

        game.update(&keys, 16);
        let ticks = game.level().map(|l| l.ticks);
        assert_eq!(ticks, Some(0));
        assert_eq!(game.screen_fade().map(|f| f.alpha()), Some(255 - 4));

        finish_entry_fade(&mut game, &keys, 16);
        game.update(&keys, 32);
        assert_eq!(game.level().map(|l| l.ticks), Some(1));
    }

    #[test]
    fn test_escape_quits_from_any_screen() {
        let mut game = game();
        game.handle_event(&InputEvent::KeyDown(Key::Escape), 0);
        assert!(!game.is_running());

        let mut game = self::game();
        press(&mut game, Key::Enter, 0);
        game.handle_event(&InputEvent::Quit, 0);
        assert!(!game.is_running());
    }

    #[test]
    fn test_defeat_then_restart_keeps_high_score() {
        let mut game = game();
        press(&mut game, Key::Enter, 0);
        let keys = KeyState::default();
        finish_entry_fade(&mut game, &keys, 0);

        let level = game.level_mut().expect("level");
        level.score = 700;
        // Park the chaser on the rider
        let rect = level.player.rect();
        level.enemies[0].rect.pos = rect.pos;
        game.update(&keys, 100);

        assert_eq!(game.screen(), Screen::GameOver);
        assert_eq!(game.high_score(), 700);
        assert_eq!(game.high_scores().top_score(), Some(700));

        press(&mut game, Key::Space, 200);
        assert_eq!(game.screen(), Screen::MainMenu);
        assert!(game.level().is_none());
        assert_eq!(game.high_score(), 700);

        press(&mut game, Key::Space, 300);
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.level().map(|l| l.score), Some(0));
        assert_eq!(game.high_score(), 700);
    }

    #[test]
    fn test_menu_ignores_gameplay_keys() {
        let mut game = game();
        press(&mut game, Key::Down, 0);
        press(&mut game, Key::Left, 0);
        assert_eq!(game.screen(), Screen::MainMenu);
        assert!(game.is_running());
    }
}
