//! Screen layouts: menu, HUD, game over, win
//!
//! Positions are in view units (800x600). Backends scale as needed.

use glam::Vec2;

use super::{Renderer, Rgb, TextAnchor, TextSize};
use crate::consts::{SCREEN_WIDTH, TILE_WIDTH};
use crate::highscores::{HighScores, format_time};

const CENTER_X: f32 = SCREEN_WIDTH / 2.0;
const HUD_MARGIN: f32 = 20.0;
const CONTROLS_HINT: &str = "← → to move, SPACE to jump, ↓ to crouch";

fn centered(r: &mut dyn Renderer, text: &str, y: f32, size: TextSize, color: Rgb) {
    r.draw_text(text, Vec2::new(CENTER_X, y), size, TextAnchor::Center, color);
}

pub fn draw_menu(r: &mut dyn Renderer, scores: &HighScores, high_score: i64) {
    centered(r, "Bicycle Adventure", 150.0, TextSize::Large, Rgb::WHITE);
    centered(r, "Press SPACE or ENTER to start", 300.0, TextSize::Medium, Rgb::WHITE);
    centered(
        r,
        "Escape the Forest! Reach the Finish Line!",
        400.0,
        TextSize::Small,
        Rgb::WHITE,
    );

    if scores.is_empty() {
        return;
    }
    centered(
        r,
        &format!("High Score: {high_score}"),
        440.0,
        TextSize::Small,
        Rgb::YELLOW,
    );
    for (i, entry) in scores.entries.iter().enumerate() {
        let line = format!(
            "{:>2}. {:>6}  {}  {}",
            i + 1,
            entry.score,
            format_time(entry.elapsed_secs),
            if entry.won { "finished" } else { "crashed" }
        );
        // Two columns of five keep the table inside the view
        let column = (i / 5) as f32;
        let row = (i % 5) as f32;
        let x = CENTER_X + (column - 0.5) * 3.0 * TILE_WIDTH;
        r.draw_text(
            &line,
            Vec2::new(x, 470.0 + row * 24.0),
            TextSize::Small,
            TextAnchor::Center,
            Rgb::GRAY,
        );
    }
}

/// Time, score, best score and the controls hint; jitters with the shake
pub fn draw_hud(r: &mut dyn Renderer, elapsed_secs: u64, score: i64, high_score: i64, shake: Vec2) {
    let left = |y: f32| Vec2::new(HUD_MARGIN, y) + shake;
    r.draw_text(
        &format!("Time: {elapsed_secs}s"),
        left(20.0),
        TextSize::Small,
        TextAnchor::Left,
        Rgb::WHITE,
    );
    r.draw_text(
        &format!("Score: {score}"),
        left(50.0),
        TextSize::Small,
        TextAnchor::Left,
        Rgb::WHITE,
    );
    r.draw_text(
        &format!("High Score: {high_score}"),
        left(80.0),
        TextSize::Small,
        TextAnchor::Left,
        Rgb::WHITE,
    );
    r.draw_text(
        CONTROLS_HINT,
        Vec2::new(SCREEN_WIDTH - HUD_MARGIN, 20.0) + shake,
        TextSize::Small,
        TextAnchor::Right,
        Rgb::WHITE,
    );
}

pub fn draw_game_over(r: &mut dyn Renderer, score: i64, high_score: i64) {
    centered(r, "Game Over!", 200.0, TextSize::Large, Rgb::RED);
    centered(r, &format!("Score: {score}"), 280.0, TextSize::Medium, Rgb::WHITE);
    centered(
        r,
        &format!("High Score: {high_score}"),
        320.0,
        TextSize::Medium,
        Rgb::WHITE,
    );
    centered(
        r,
        "Press SPACE or ENTER to play again",
        360.0,
        TextSize::Medium,
        Rgb::WHITE,
    );
}

pub fn draw_win(r: &mut dyn Renderer, elapsed_secs: u64, score: i64, high_score: i64) {
    centered(r, "You Win!", 200.0, TextSize::Large, Rgb::GREEN);
    centered(
        r,
        &format!("Time: {}", format_time(elapsed_secs)),
        240.0,
        TextSize::Medium,
        Rgb::WHITE,
    );
    centered(r, &format!("Score: {score}"), 280.0, TextSize::Medium, Rgb::WHITE);
    centered(
        r,
        &format!("High Score: {high_score}"),
        320.0,
        TextSize::Medium,
        Rgb::WHITE,
    );
    centered(
        r,
        "Press SPACE or ENTER to try again",
        360.0,
        TextSize::Medium,
        Rgb::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameError;
    use crate::assets::SpriteId;
    use crate::sim::Rect;

    #[derive(Default)]
    struct TextLog(Vec<(String, Vec2, TextAnchor)>);

    impl Renderer for TextLog {
        fn begin_frame(&mut self) {}
        fn draw_sprite(&mut self, _: SpriteId, _: usize, _: Rect, _: u8) {}
        fn draw_text(&mut self, text: &str, pos: Vec2, _: TextSize, anchor: TextAnchor, _: Rgb) {
            self.0.push((text.to_string(), pos, anchor));
        }
        fn draw_overlay(&mut self, _: u8) {}
        fn present(&mut self) -> Result<(), GameError> {
            Ok(())
        }
    }

    impl TextLog {
        fn has(&self, text: &str) -> bool {
            self.0.iter().any(|(t, _, _)| t == text)
        }
    }

    #[test]
    fn test_win_screen_formats_time() {
        let mut log = TextLog::default();
        draw_win(&mut log, 125, 900, 1200);
        assert!(log.has("You Win!"));
        assert!(log.has("Time: 02:05"));
        assert!(log.has("Score: 900"));
        assert!(log.has("High Score: 1200"));
    }

    #[test]
    fn test_hud_follows_shake() {
        let mut log = TextLog::default();
        draw_hud(&mut log, 7, 300, 500, Vec2::new(3.0, -2.0));
        let time = log.0.iter().find(|(t, _, _)| t == "Time: 7s");
        assert_eq!(time.map(|(_, p, _)| *p), Some(Vec2::new(23.0, 18.0)));
        let hint = log.0.iter().find(|(t, _, _)| t == CONTROLS_HINT);
        assert_eq!(hint.map(|(_, _, a)| *a), Some(TextAnchor::Right));
    }

    #[test]
    fn test_menu_lists_leaderboard() {
        let mut scores = HighScores::new();
        scores.add_score(400, 65, true);
        let mut log = TextLog::default();
        draw_menu(&mut log, &scores, 400);
        assert!(log.has("High Score: 400"));
        assert!(log.0.iter().any(|(t, _, _)| t.contains("01:05") && t.contains("finished")));
    }
}
