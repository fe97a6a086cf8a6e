//! Platform abstraction layer
//!
//! Handles the pieces of the outer loop that touch the machine:
//! - Time (monotonic milliseconds)
//! - Input events
//! - Frame pacing
//!
//! `run_loop` ties them to a `Game` and a `Renderer`.

pub mod terminal;

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::error::GameError;
use crate::game::Game;
use crate::input::{InputEvent, KeyState};
use crate::renderer::Renderer;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Source of input events, drained once per frame
pub trait InputSource {
    fn poll(&mut self, now_ms: u64) -> Result<Vec<InputEvent>, GameError>;
}

/// Called once at the end of every frame
pub trait Pacer {
    fn end_frame(&mut self);
}

/// Sleeps out the rest of each frame period
#[derive(Debug)]
pub struct FrameLimiter {
    period: Duration,
    frame_start: Instant,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self::with_period(Duration::from_millis(1000 / u64::from(fps.max(1))))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            frame_start: Instant::now(),
        }
    }
}

impl Pacer for FrameLimiter {
    fn end_frame(&mut self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.period {
            std::thread::sleep(self.period - elapsed);
        }
        self.frame_start = Instant::now();
    }
}

/// Drive `game` until it stops running.
///
/// Per frame: drain input, update (music fade first, then the active
/// screen), render, then wait for the frame boundary.
pub fn run_loop(
    game: &mut Game,
    renderer: &mut dyn Renderer,
    input: &mut dyn InputSource,
    clock: &dyn Clock,
    pacer: &mut dyn Pacer,
) -> Result<(), GameError> {
    let mut keys = KeyState::default();
    log::info!("Entering main loop");

    while game.is_running() {
        let now = clock.now_ms();
        for event in input.poll(now)? {
            keys.apply(&event);
            game.handle_event(&event, now);
        }
        if !game.is_running() {
            break;
        }

        game.update(&keys, now);
        game.render(renderer, now)?;
        pacer.end_frame();
    }

    log::info!("Main loop exited");
    Ok(())
}
