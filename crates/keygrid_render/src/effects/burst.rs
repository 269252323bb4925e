use rand::{Rng, RngCore};

use super::{Effect, Repeat, Tick, TickBudget, Timing};
use crate::frame::color::Rgb;
use crate::frame::grid::Frame;
use crate::GlowError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurstOptions {
    pub timing: Timing,
    /// Restrict every channel to `0` or `255`.
    pub high_contrast: bool,
    /// Extra "off" candidates competing with the random color for each pixel.
    pub sparseness: u32,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            timing: Timing { seconds: 10, ticks_per_second: 10 },
            high_contrast: false,
            sparseness: 0,
        }
    }
}

/// Random colors scattered over the grid, thinned out by `sparseness`.
#[derive(Clone, Debug)]
pub struct RandomBurst {
    high_contrast: bool,
    sparseness: u32,
    budget: TickBudget,
}

pub fn random_burst(options: BurstOptions) -> Result<RandomBurst, GlowError> {
    RandomBurst::new(options)
}

impl RandomBurst {
    pub fn new(options: BurstOptions) -> Result<Self, GlowError> {
        options.timing.validate()?;
        Ok(Self {
            high_contrast: options.high_contrast,
            sparseness: options.sparseness,
            budget: TickBudget::new(Repeat::Burst(options.timing)),
        })
    }

    fn random_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        let mut channel = || {
            if self.high_contrast {
                if rng.gen::<bool>() {
                    255
                } else {
                    0
                }
            } else {
                rng.gen::<u8>()
            }
        };
        Rgb::new(channel(), channel(), channel())
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Frame {
        let mut frame = Frame::default();
        for pixel in frame.pixels_mut() {
            // Candidate 0 is the color, the rest are off.
            let color = self.random_color(rng);
            if rng.gen_range(0..=self.sparseness) == 0 {
                *pixel = color;
            }
        }
        frame
    }
}

impl Effect for RandomBurst {
    fn name(&self) -> &'static str {
        "burst"
    }

    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick> {
        let delay = self.budget.take()?;
        Some(Tick::new(self.render(rng), delay))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::frame::grid::PIXEL_COUNT;

    #[test]
    fn high_contrast_uses_extreme_channels_only() {
        let mut rng = StdRng::seed_from_u64(17);
        let burst = random_burst(BurstOptions { high_contrast: true, ..Default::default() })
            .unwrap();
        for pixel in burst.render(&mut rng).pixels() {
            assert!(pixel.channels().iter().all(|&c| c == 0 || c == 255));
        }
    }

    #[test]
    fn sparseness_darkens_the_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let dense = random_burst(BurstOptions::default()).unwrap();
        let sparse = random_burst(BurstOptions { sparseness: 9, ..Default::default() }).unwrap();

        let lit = |frame: Frame| frame.pixels().iter().filter(|&&p| p != Rgb::OFF).count();
        let dense_lit: usize = (0..10).map(|_| lit(dense.render(&mut rng))).sum();
        let sparse_lit: usize = (0..10).map(|_| lit(sparse.render(&mut rng))).sum();
        assert!(dense_lit > PIXEL_COUNT * 9);
        assert!(sparse_lit < PIXEL_COUNT * 3, "{sparse_lit}");
    }

    #[test]
    fn runs_seconds_times_rate_ticks() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut burst = random_burst(BurstOptions {
            timing: Timing::new(3, 2).unwrap(),
            ..Default::default()
        })
        .unwrap();
        let mut ticks = 0;
        while burst.next_tick(&mut rng).is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 6);
    }
}
