pub mod burst;
pub mod fill;
pub mod flow;
pub mod scroll;
pub mod speckle;
pub mod wipe;

use std::time::Duration;

use rand::RngCore;

use crate::frame::grid::Frame;
use crate::GlowError;

/// One frame and how long to hold it before the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    pub frame: Frame,
    pub delay: Duration,
}

impl Tick {
    pub fn new(frame: Frame, delay: Duration) -> Self {
        Self { frame, delay }
    }

    /// A tick with nothing to wait for afterwards.
    pub fn once(frame: Frame) -> Self {
        Self { frame, delay: Duration::ZERO }
    }
}

/// A running effect. Its fields are the state carried between ticks.
pub trait Effect {
    fn name(&self) -> &'static str;

    /// Produce the next tick, or `None` once the effect has finished.
    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick>;
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick> {
        (**self).next_tick(rng)
    }
}

/// Fixed-rate run length for looping effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub seconds: u32,
    pub ticks_per_second: u32,
}

impl Timing {
    pub fn new(seconds: u32, ticks_per_second: u32) -> Result<Self, GlowError> {
        let timing = Self { seconds, ticks_per_second };
        timing.validate()?;
        Ok(timing)
    }

    pub fn validate(&self) -> Result<(), GlowError> {
        if self.seconds == 0 {
            return Err(GlowError::invalid("duration must be at least one second"));
        }
        if self.ticks_per_second == 0 {
            return Err(GlowError::invalid("ticks per second must be positive"));
        }
        Ok(())
    }

    pub fn tick_count(&self) -> u64 {
        u64::from(self.seconds) * u64::from(self.ticks_per_second)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }
}

/// Whether a static effect is written once or refreshed for a while.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Burst(Timing),
}

impl Repeat {
    pub(crate) fn validate(&self) -> Result<(), GlowError> {
        match self {
            Repeat::Once => Ok(()),
            Repeat::Burst(timing) => timing.validate(),
        }
    }

    fn tick_count(&self) -> u64 {
        match self {
            Repeat::Once => 1,
            Repeat::Burst(timing) => timing.tick_count(),
        }
    }

    fn interval(&self) -> Duration {
        match self {
            Repeat::Once => Duration::ZERO,
            Repeat::Burst(timing) => timing.interval(),
        }
    }
}

/// Counts ticks down for effects that run a fixed number of frames.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickBudget {
    remaining: u64,
    interval: Duration,
}

impl TickBudget {
    pub(crate) fn new(repeat: Repeat) -> Self {
        Self { remaining: repeat.tick_count(), interval: repeat.interval() }
    }

    /// Take one tick, returning its delay if any are left.
    pub(crate) fn take(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.interval)
    }
}
