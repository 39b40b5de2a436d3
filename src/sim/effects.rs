//! Effects attached to balls and blocks
//!
//! The physics engine calls the hooks on every effect a ball carries without
//! knowing what the effect is. Hooks run after the engine has resolved the
//! hit, so an effect sees (and may adjust) the outgoing speed and angle.

use std::fmt;

use super::state::{BallStats, Block, EntityId, Paddle};

/// A modifier riding on a ball. Every hook defaults to doing nothing.
pub trait BallEffect: fmt::Debug {
    /// Effects with the same name do not stack
    fn name(&self) -> &'static str;

    /// Called once when the effect is attached
    fn on_apply(&mut self, _stats: &mut BallStats) {}

    /// The same effect was picked up again while active
    fn refresh(&mut self) {}

    fn on_hit_wall(&mut self, _stats: &mut BallStats) {}

    fn on_hit_paddle(&mut self, _stats: &mut BallStats, _paddle: &Paddle) {}

    fn on_hit_ball(&mut self, _stats: &mut BallStats, _other: EntityId) {}

    fn on_hit_block(&mut self, _stats: &mut BallStats, _block: &Block) {}

    /// Advance by one tick; return false once the effect has run its course
    fn update(&mut self, _stats: &mut BallStats, _dt_ms: f32) -> bool {
        true
    }

    /// Called once when the effect expires or its ball is destroyed
    fn on_remove(&mut self, _stats: &mut BallStats) {}
}

/// Millisecond countdown shared by the timed effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub duration_ms: f32,
    pub remaining_ms: f32,
}

impl Countdown {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
        }
    }

    pub fn restart(&mut self) {
        self.remaining_ms = self.duration_ms;
    }

    /// Returns true while time is left
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.remaining_ms -= dt_ms;
        self.remaining_ms > 0.0
    }
}

/// Twice the speed (and speed cap) for a while
#[derive(Debug, Clone)]
pub struct DoubleSpeed {
    timer: Countdown,
}

impl DoubleSpeed {
    pub const NAME: &'static str = "double_speed";

    pub fn new(duration_ms: f32) -> Self {
        Self {
            timer: Countdown::new(duration_ms),
        }
    }
}

impl BallEffect for DoubleSpeed {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_apply(&mut self, stats: &mut BallStats) {
        stats.speed *= 2.0;
        stats.max_speed *= 2.0;
    }

    fn refresh(&mut self) {
        self.timer.restart();
    }

    fn update(&mut self, _stats: &mut BallStats, dt_ms: f32) -> bool {
        self.timer.tick(dt_ms)
    }

    fn on_remove(&mut self, stats: &mut BallStats) {
        stats.speed /= 2.0;
        stats.max_speed /= 2.0;
    }
}

/// Burning ball: blocks take multiplied damage for a while
#[derive(Debug, Clone)]
pub struct Fire {
    timer: Countdown,
    factor: f32,
}

impl Fire {
    pub const NAME: &'static str = "fire";

    /// Panics unless `factor` is positive; removal divides by it.
    pub fn new(duration_ms: f32, factor: f32) -> Self {
        assert!(factor > 0.0, "fire damage factor must be positive, got {factor}");
        Self {
            timer: Countdown::new(duration_ms),
            factor,
        }
    }
}

impl BallEffect for Fire {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_apply(&mut self, stats: &mut BallStats) {
        stats.damage *= self.factor;
    }

    fn refresh(&mut self) {
        self.timer.restart();
    }

    fn update(&mut self, _stats: &mut BallStats, dt_ms: f32) -> bool {
        self.timer.tick(dt_ms)
    }

    fn on_remove(&mut self, stats: &mut BallStats) {
        stats.damage /= self.factor;
    }
}

/// Bigger or smaller ball for a while. The engine resizes the ball's box
/// around its center whenever `scale` changes.
#[derive(Debug, Clone)]
pub struct Resize {
    name: &'static str,
    timer: Countdown,
    factor: f32,
}

impl Resize {
    pub const ENLARGER: &'static str = "enlarger";
    pub const REDUCER: &'static str = "reducer";

    pub fn enlarger(duration_ms: f32, factor: f32) -> Self {
        Self::new(Self::ENLARGER, duration_ms, factor)
    }

    pub fn reducer(duration_ms: f32, factor: f32) -> Self {
        Self::new(Self::REDUCER, duration_ms, factor)
    }

    /// Panics unless `factor` is positive; removal divides by it.
    fn new(name: &'static str, duration_ms: f32, factor: f32) -> Self {
        assert!(factor > 0.0, "{name} size factor must be positive, got {factor}");
        Self {
            name,
            timer: Countdown::new(duration_ms),
            factor,
        }
    }
}

impl BallEffect for Resize {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_apply(&mut self, stats: &mut BallStats) {
        stats.scale *= self.factor;
    }

    fn refresh(&mut self) {
        self.timer.restart();
    }

    fn update(&mut self, _stats: &mut BallStats, dt_ms: f32) -> bool {
        self.timer.tick(dt_ms)
    }

    fn on_remove(&mut self, stats: &mut BallStats) {
        stats.scale /= self.factor;
    }
}

/// White flash over a block that was just hit, fading to transparent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    /// 255 = opaque white
    pub alpha: f32,
    pub fade_step: f32,
}

impl Flash {
    pub fn new(fade_step: f32) -> Self {
        Self {
            alpha: 255.0,
            fade_step,
        }
    }

    /// Fade one tick; returns false once fully transparent
    pub fn update(&mut self) -> bool {
        self.alpha = (self.alpha - self.fade_step).max(0.0);
        self.alpha > 0.0
    }
}
