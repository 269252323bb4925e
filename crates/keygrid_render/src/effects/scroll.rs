use std::time::Duration;

use rand::{Rng, RngCore};

use super::{Effect, Tick};
use crate::frame::color::Rgb;
use crate::frame::grid::Frame;
use crate::text::glyphs::GlyphSource;
use crate::text::layout::{layout_message, Layout};
use crate::GlowError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollOptions {
    pub text: Rgb,
    pub background: Rgb,
    /// Perturb the background every tick.
    pub twinkle: bool,
    pub variety: u16,
    /// Columns scrolled per second.
    pub speed: u32,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self { text: Rgb::RED, background: Rgb::GREEN, twinkle: true, variety: 128, speed: 10 }
    }
}

/// A message scrolled right to left across the grid, one column per tick.
#[derive(Clone, Debug)]
pub struct ScrollingText {
    layout: Layout,
    options: ScrollOptions,
    tick: usize,
}

pub fn scrolling_text(
    message: &str,
    glyphs: &dyn GlyphSource,
    options: ScrollOptions,
) -> Result<ScrollingText, GlowError> {
    ScrollingText::new(layout_message(message, glyphs)?, options)
}

impl ScrollingText {
    pub fn new(layout: Layout, options: ScrollOptions) -> Result<Self, GlowError> {
        if options.speed == 0 {
            return Err(GlowError::invalid("scroll speed must be positive"));
        }
        Ok(Self { layout, options, tick: 0 })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R, tick: usize) -> Frame {
        let ScrollOptions { text, background, twinkle, variety, .. } = self.options;

        let mut frame = Frame::filled(background);
        if twinkle {
            for pixel in frame.pixels_mut() {
                *pixel = background.perturbed(rng, variety);
            }
        }
        for (row, col) in self.layout.visible_at(tick) {
            frame.set(row, col, text);
        }
        frame
    }
}

impl Effect for ScrollingText {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick> {
        if self.tick >= self.layout.scroll_width() {
            return None;
        }
        let frame = self.render(rng, self.tick);
        self.tick += 1;
        Some(Tick::new(frame, Duration::from_secs(1) / self.options.speed))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::frame::grid::{COLS, ROWS};
    use crate::text::glyphs::GlyphMap;

    fn flat() -> ScrollOptions {
        ScrollOptions { twinkle: false, ..Default::default() }
    }

    #[test]
    fn single_pixel_reaches_the_left_edge_at_tick_fifteen() {
        let mut font = GlyphMap::default();
        font.insert('A', vec![(0, 0)]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut effect = scrolling_text("A", &font, flat()).unwrap();

        let frames: Vec<Frame> =
            std::iter::from_fn(|| effect.next_tick(&mut rng)).map(|tick| tick.frame).collect();
        assert_eq!(frames.len(), effect.layout().scroll_width());

        assert_eq!(frames[15].get(0, 0), Rgb::RED);
        assert_eq!(frames[14].get(0, 1), Rgb::RED);
        assert_eq!(frames[14].get(0, 0), Rgb::GREEN);
        assert!(frames[16..].iter().all(|frame| *frame == Frame::filled(Rgb::GREEN)));
    }

    #[test]
    fn delay_follows_speed() {
        let mut rng = StdRng::seed_from_u64(0);
        let options = ScrollOptions { speed: 8, ..flat() };
        let mut effect = scrolling_text("hi", &GlyphMap::builtin(), options).unwrap();
        assert_eq!(effect.next_tick(&mut rng).unwrap().delay, Duration::from_millis(125));
    }

    #[test]
    fn twinkle_perturbs_only_the_background() {
        let mut rng = StdRng::seed_from_u64(31);
        let options = ScrollOptions {
            background: Rgb::OFF,
            text: Rgb::WHITE,
            variety: 32,
            ..Default::default()
        };
        let effect = scrolling_text("HELLO", &GlyphMap::builtin(), options).unwrap();
        let frame = effect.render(&mut rng, COLS + 2);
        let lit: Vec<_> = effect.layout().visible_at(COLS + 2).collect();
        assert!(!lit.is_empty());
        for row in 0..ROWS {
            for col in 0..COLS {
                let pixel = frame.get(row, col);
                if lit.contains(&(row, col)) {
                    assert_eq!(pixel, Rgb::WHITE);
                } else {
                    assert!(pixel.channels().iter().all(|&c| c < 16));
                }
            }
        }
    }

    #[test]
    fn zero_speed_is_invalid() {
        let options = ScrollOptions { speed: 0, ..flat() };
        assert!(matches!(
            scrolling_text("A", &GlyphMap::builtin(), options),
            Err(GlowError::InvalidParameter(_))
        ));
    }
}
