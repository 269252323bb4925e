use std::time::Duration;

use rand::{Rng, RngCore};

use super::{Effect, Tick};
use crate::frame::color::{random_variant, Rgb};
use crate::frame::grid::{checked_index, Frame, COLS, ROWS};
use crate::GlowError;

/// First column position of the shaped wipe; the front enters from off-grid.
const LEAD_IN: i32 = -3;
/// Variety of the twinkling background.
const TWINKLE_VARIETY: u16 = 100;
/// Variety of front pixels in the shaped wipe, which keeps them pure.
const FRONT_VARIETY: u16 = 1;

/// Extra cells ahead of the front, as column offsets per row.
type EdgeShape = [&'static [i32]; ROWS];

const NO_EDGE: EdgeShape = [&[], &[], &[], &[], &[], &[]];
const EDGE_LEAD_IN: EdgeShape = [&[3], &[3], &[], &[], &[3], &[3]];
const EDGE_BODY: EdgeShape = [&[1, 2, 3], &[3], &[1, 2], &[2], &[2, 3], &[3]];
const EDGE_LEAD_OUT: EdgeShape = [&[1, 2], &[], &[1, 2], &[2], &[2], &[]];
const EDGE_TAIL: EdgeShape = [&[1], &[], &[1], &[], &[], &[]];

/// Cosmetic shaping of the front, keyed by column position.
fn edge_shape(position: i32) -> &'static EdgeShape {
    match position {
        -3..=-1 => &EDGE_LEAD_IN,
        0..=12 => &EDGE_BODY,
        13 => &EDGE_LEAD_OUT,
        14 => &EDGE_TAIL,
        _ => &NO_EDGE,
    }
}

/// Linear indices covered by the front at `position`.
///
/// The base front is column `position` on every row. Unless `line` is set,
/// it is widened by [`edge_shape`]. Cells off the grid are dropped.
pub fn wipe_front(position: i32, line: bool) -> Vec<usize> {
    let mut front: Vec<usize> =
        (0..ROWS as i32).filter_map(|row| checked_index(row, position)).collect();
    if !line {
        for (row, offsets) in edge_shape(position).iter().enumerate() {
            front.extend(
                offsets.iter().filter_map(|offset| checked_index(row as i32, position + offset)),
            );
        }
    }
    front
}

/// Hold time after drawing `position`: slow at the middle, fast at the edges.
pub fn ease_delay(position: i32) -> Duration {
    let distance = f64::from((6 - position).abs() + 1);
    Duration::from_secs_f64((0.3 / distance).ln_1p())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WipeOptions {
    /// Full passes across the grid.
    pub count: u32,
    pub color: Rgb,
    pub background: Rgb,
    pub twinkle: bool,
    /// Plain single-column sweep without edge shaping or variety.
    pub line: bool,
}

impl Default for WipeOptions {
    fn default() -> Self {
        Self { count: 5, color: Rgb::RED, background: Rgb::GREEN, twinkle: true, line: false }
    }
}

/// A front of `color` swept across the columns over a background.
#[derive(Clone, Debug)]
pub struct DirectionalWipe {
    options: WipeOptions,
    pass: u32,
    position: i32,
}

pub fn wipe(options: WipeOptions) -> Result<DirectionalWipe, GlowError> {
    DirectionalWipe::new(options)
}

impl DirectionalWipe {
    pub fn new(options: WipeOptions) -> Result<Self, GlowError> {
        if options.count == 0 {
            return Err(GlowError::invalid("wipe needs at least one pass"));
        }
        let mut wipe = Self { options, pass: 0, position: 0 };
        wipe.position = wipe.start();
        Ok(wipe)
    }

    fn start(&self) -> i32 {
        if self.options.line {
            0
        } else {
            LEAD_IN
        }
    }

    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R, position: i32) -> Frame {
        let WipeOptions { color, background, twinkle, line, .. } = self.options;

        let mut frame = Frame::filled(background);
        if twinkle {
            let dominant = background.dominant_channel();
            for pixel in frame.pixels_mut() {
                *pixel = random_variant(rng, dominant, TWINKLE_VARIETY);
            }
        }

        let dominant = color.dominant_channel();
        for index in wipe_front(position, line) {
            frame[index] = if line { color } else { random_variant(rng, dominant, FRONT_VARIETY) };
        }
        frame
    }
}

impl Effect for DirectionalWipe {
    fn name(&self) -> &'static str {
        "wipe"
    }

    fn next_tick(&mut self, rng: &mut dyn RngCore) -> Option<Tick> {
        if self.pass >= self.options.count {
            return None;
        }

        let position = self.position;
        let frame = self.render(rng, position);

        self.position += 1;
        if self.position >= COLS as i32 {
            self.position = self.start();
            self.pass += 1;
        }

        Some(Tick::new(frame, ease_delay(position)))
    }
}
