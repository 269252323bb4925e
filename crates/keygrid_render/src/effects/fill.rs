use rand::RngCore;

use super::{Effect, Tick};
use crate::device::DeviceSink;
use crate::frame::color::Rgb;
use crate::frame::grid::Frame;
use crate::GlowError;

pub fn solid_fill(color: Rgb) -> Frame {
    Frame::filled(color)
}

/// Fill the grid with `color` and write it with a single frame write.
pub fn solid_color<S: DeviceSink + ?Sized>(sink: &mut S, color: Rgb) -> Result<Frame, GlowError> {
    let frame = solid_fill(color);
    sink.write_frame(&frame)?;
    Ok(frame)
}

/// Single-tick effect form of [`solid_fill`].
#[derive(Clone, Debug)]
pub struct SolidFill {
    color: Rgb,
    done: bool,
}

impl SolidFill {
    pub fn new(color: Rgb) -> Self {
        Self { color, done: false }
    }
}

impl Effect for SolidFill {
    fn name(&self) -> &'static str {
        "solid"
    }

    fn next_tick(&mut self, _rng: &mut dyn RngCore) -> Option<Tick> {
        if self.done {
            return None;
        }
        self.done = true;
        Some(Tick::once(solid_fill(self.color)))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::device::recording::RecordingSink;
    use crate::frame::grid::{FRAME_BYTES, PIXEL_COUNT};

    #[test]
    fn every_pixel_matches_the_fill() {
        let color = Rgb::new(9, 80, 201);
        let frame = solid_fill(color);
        assert_eq!(frame.pixels().len(), PIXEL_COUNT);
        assert!(frame.pixels().iter().all(|&pixel| pixel == color));
    }

    #[test]
    fn solid_color_writes_exactly_one_frame() {
        let mut sink = RecordingSink::new();
        solid_color(&mut sink, Rgb::RED).unwrap();

        assert_eq!(sink.frames().len(), 1);
        let expected: Vec<u8> = [255, 0, 0].repeat(PIXEL_COUNT);
        assert_eq!(sink.frames()[0].len(), FRAME_BYTES);
        assert_eq!(sink.frames()[0], expected);
    }

    #[test]
    fn effect_form_ends_after_one_tick() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut effect = SolidFill::new(Rgb::GREEN);
        let tick = effect.next_tick(&mut rng).unwrap();
        assert!(tick.delay.is_zero());
        assert!(effect.next_tick(&mut rng).is_none());
    }
}
