use std::ops::{Index, IndexMut};

use super::color::Rgb;

pub const ROWS: usize = 6;
pub const COLS: usize = 16;
pub const PIXEL_COUNT: usize = ROWS * COLS;
/// Bytes in one serialized frame, three channels per pixel.
pub const FRAME_BYTES: usize = PIXEL_COUNT * 3;

/// Row-major position of `(row, col)` in a [`Frame`].
///
/// Panics when the position lies outside the grid.
pub fn index(row: usize, col: usize) -> usize {
    assert!(row < ROWS && col < COLS, "grid position ({row}, {col}) out of range");
    row * COLS + col
}

/// Like [`index`], but for signed coordinates that may fall off the grid.
pub fn checked_index(row: i32, col: i32) -> Option<usize> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    (row < ROWS && col < COLS).then(|| index(row, col))
}

/// One full-grid snapshot in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pixels: [Rgb; PIXEL_COUNT],
}

impl Frame {
    pub fn filled(color: Rgb) -> Self {
        Self { pixels: [color; PIXEL_COUNT] }
    }

    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let mut frame = Self::default();
        for row in 0..ROWS {
            for col in 0..COLS {
                frame.pixels[index(row, col)] = f(row, col);
            }
        }
        frame
    }

    pub fn get(&self, row: usize, col: usize) -> Rgb {
        self.pixels[index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, color: Rgb) {
        self.pixels[index(row, col)] = color;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Raw `r, g, b` bytes for every pixel in grid order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FRAME_BYTES);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.channels());
        }
        bytes
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::filled(Rgb::OFF)
    }
}

impl Index<usize> for Frame {
    type Output = Rgb;

    fn index(&self, index: usize) -> &Rgb {
        &self.pixels[index]
    }
}

impl IndexMut<usize> for Frame {
    fn index_mut(&mut self, index: usize) -> &mut Rgb {
        &mut self.pixels[index]
    }
}
