//! Tick-driven sprite-sheet animation
//!
//! A fractional accumulator gains `speed` every tick; when it reaches 1 the
//! frame advances (mod frame count) and the accumulator resets to 0.

use serde::{Deserialize, Serialize};

/// What a single `advance` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStep {
    /// Accumulator grew, frame unchanged
    Held,
    /// Frame moved forward
    Advanced,
    /// Frame moved forward and wrapped back to 0
    Wrapped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    frame: usize,
    frame_count: usize,
    timer: f32,
    speed: f32,
}

impl Animation {
    /// `frame_count` is clamped to at least one frame
    pub fn new(frame_count: usize, speed: f32) -> Self {
        Self {
            frame: 0,
            frame_count: frame_count.max(1),
            timer: 0.0,
            speed,
        }
    }

    pub fn advance(&mut self) -> FrameStep {
        self.timer += self.speed;
        if self.timer < 1.0 {
            return FrameStep::Held;
        }
        self.timer = 0.0;
        self.frame = (self.frame + 1) % self.frame_count;
        if self.frame == 0 {
            FrameStep::Wrapped
        } else {
            FrameStep::Advanced
        }
    }

    /// Back to frame 0 with an empty accumulator
    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer = 0.0;
    }

    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_advances_after_accumulating_one() {
        let mut anim = Animation::new(4, 0.5);
        assert_eq!(anim.advance(), FrameStep::Held);
        assert_eq!(anim.frame(), 0);
        assert_eq!(anim.advance(), FrameStep::Advanced);
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn test_wraps_modulo_frame_count() {
        let mut anim = Animation::new(3, 1.0);
        assert_eq!(anim.advance(), FrameStep::Advanced);
        assert_eq!(anim.advance(), FrameStep::Advanced);
        assert_eq!(anim.advance(), FrameStep::Wrapped);
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_single_frame_wraps_every_step() {
        let mut anim = Animation::new(0, 1.0);
        assert_eq!(anim.frame_count(), 1);
        assert_eq!(anim.advance(), FrameStep::Wrapped);
        assert_eq!(anim.frame(), 0);
    }

    proptest! {
        #[test]
        fn frame_stays_in_range_and_only_decreases_on_wrap(
            frames in 1usize..32,
            speed in 0.01f32..2.0,
            ticks in 1usize..500,
        ) {
            let mut anim = Animation::new(frames, speed);
            let mut last = anim.frame();
            for _ in 0..ticks {
                let step = anim.advance();
                let now = anim.frame();
                prop_assert!(now < frames);
                match step {
                    FrameStep::Held => prop_assert_eq!(now, last),
                    FrameStep::Advanced => prop_assert_eq!(now, last + 1),
                    FrameStep::Wrapped => prop_assert_eq!(now, 0),
                }
                last = now;
            }
        }
    }
}
