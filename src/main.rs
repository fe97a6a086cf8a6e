//! Bicycle Adventure entry point
//!
//! Loads settings and assets, takes over the terminal, and runs the game loop.

use std::io::{self, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;

use bicycle_adventure::assets::Assets;
use bicycle_adventure::audio::{AudioManager, NullAudioDevice, SoundBank};
use bicycle_adventure::platform::terminal::{TerminalInput, TerminalSession};
use bicycle_adventure::platform::{FrameLimiter, SystemClock, run_loop};
use bicycle_adventure::renderer::TerminalRenderer;
use bicycle_adventure::{AppContext, Game, Settings};

/// The terminal is busy drawing the game, so logs go to a file
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let settings = Settings::load();
    if let Err(e) = init_logging(&settings.log_file) {
        eprintln!("Logging disabled: {e:#}");
    }
    log::info!("Bicycle Adventure starting...");
    log::info!(
        "Quality {}, {} fps, assets in {}",
        settings.quality.as_str(),
        settings.target_fps,
        settings.asset_dir.display()
    );

    let assets = Assets::load(&settings.asset_dir.join("images"));
    let bank = SoundBank::discover(&settings.asset_dir.join("sounds"));
    let audio = AudioManager::new(Box::new(NullAudioDevice::default()), bank);

    let session = TerminalSession::start().context("initializing terminal")?;
    let mut renderer = TerminalRenderer::new(BufWriter::new(io::stdout()), &assets);
    let mut input = TerminalInput::new(session.reports_releases());
    let clock = SystemClock::new();
    let mut pacer = FrameLimiter::new(settings.target_fps);

    let mut game = Game::new(AppContext::new(settings, assets, audio));
    run_loop(&mut game, &mut renderer, &mut input, &clock, &mut pacer)
        .context("running game loop")?;

    log::info!("Final high score: {}", game.high_score());
    drop(renderer);
    drop(session);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {e:#}");
            eprintln!("bicycle-adventure: {e:#}");
            ExitCode::FAILURE
        }
    }
}
