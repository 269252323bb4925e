use rand::{Rng, RngCore};

use super::{Effect, Repeat, Tick, TickBudget, Timing};
use crate::frame::color::Rgb;
use crate::frame::grid::{Frame, PIXEL_COUNT};
use crate::GlowError;

/// Copies of the palette per pixel in a [`ColorPool`].
const POOL_COPIES: usize = PIXEL_COUNT * 16;

/// Base colors for speckle noise, drawn without replacement.
///
/// Each frame takes `PIXEL_COUNT` entries from the palette repeated
/// `POOL_COPIES` times, so a frame's color counts are hypergeometric rather
/// than independent coin flips. The texture depends on this.
#[derive(Clone, Debug)]
pub struct ColorPool {
    palette: Vec<Rgb>,
    copies: usize,
}

impl ColorPool {
    pub fn new(palette: Vec<Rgb>) -> Result<Self, GlowError> {
        if palette.is_empty() {
            return Err(GlowError::invalid("color pool needs at least one color"));
        }
        Ok(Self { palette, copies: POOL_COPIES })
    }

    pub fn len(&self) -> usize {
        self.palette.len() * self.copies
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    /// Draw `count` base colors in random order.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Rgb> {
        let count = count.min(self.len());
        rand::seq::index::sample(rng, self.len(), count)
            .into_iter()
            .map(|slot| self.palette[slot % self.palette.len()])
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeckleOptions {
    /// Width of the per-channel perturbation range.
    pub variety: u16,
    pub repeat: Repeat,
}

impl Default for SpeckleOptions {
    fn default() -> Self {
        Self { variety: 64, repeat: Repeat::Burst(Timing { seconds: 10, ticks_per_second: 10 }) }
    }
}

/// Per-pixel perturbed noise over one or two base colors.
#[derive(Clone, Debug)]
pub struct SpeckleNoise {
    pool: ColorPool,
    variety: u16,
    budget: TickBudget,
}

pub fn two_color_noise(
    first: Rgb,
    second: Rgb,
    options: SpeckleOptions,
) -> Result<SpeckleNoise, GlowError> {
    SpeckleNoise::new(ColorPool::new(vec![first, second])?, options)
}

pub fn monochrome_noise(color: Rgb, options: SpeckleOptions) -> Result<SpeckleNoise, GlowError> {
    SpeckleNoise::new(ColorPool::new(vec![color])?, options)
}

impl SpeckleNoise {
    pub fn new(pool: ColorPool, options: SpeckleOptions) -> Result<Self, GlowError> {
        options.repeat.validate()?;
        Ok(Self { pool, variety: options.variety, budget: TickBudget::new(options.repeat) })
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Frame {
        let bases = self.pool.draw(rng, PIXEL_COUNT);
        let mut frame = Frame::default();
        for (pixel, base) in frame.pixels_mut().iter_mut().zip(bases) {
            *pixel = base.perturbed(rng, self.variety);
        }
        frame
    }
}

impl Effect for SpeckleNoise {
    fn name(&self) -> &'static str {
        "speckle"
    }

    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick> {
        let delay = self.budget.take()?;
        Some(Tick::new(self.render(rng), delay))
    }
}
