use super::glyphs::GlyphSource;
use crate::frame::grid::{COLS, ROWS};
use crate::GlowError;

/// Cursor advance for whitespace.
pub const SPACE_ADVANCE: i32 = 3;
/// Blank columns scrolled after the message has left the grid.
pub const SCROLL_MARGIN: i32 = 5;

/// Cursor advance after an alphanumeric character.
pub fn advance_width(ch: char) -> i32 {
    match ch.to_ascii_uppercase() {
        '1' | 'I' => 4,
        'M' | 'N' | 'Q' | 'T' | 'V' | 'W' | 'X' => 6,
        _ => 5,
    }
}

/// A message laid out on one long horizontal strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    coords: Vec<(i32, i32)>,
    max_x: i32,
}

impl Layout {
    /// Absolute `(x, y)` of every lit pixel in message order.
    pub fn coords(&self) -> &[(i32, i32)] {
        &self.coords
    }

    /// Ticks needed for the message to scroll fully in and out.
    pub fn scroll_width(&self) -> usize {
        (self.max_x + 1 + COLS as i32 + SCROLL_MARGIN) as usize
    }

    /// Grid cells `(row, col)` lit at scroll tick `tick`.
    ///
    /// A coordinate is visible while `tick - COLS < x <= tick`, landing on
    /// column `COLS - 1 - tick + x`.
    pub fn visible_at(&self, tick: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let tick = tick as i32;
        let cols = COLS as i32;
        self.coords.iter().filter_map(move |&(x, y)| {
            if !(tick - cols < x && x <= tick) {
                return None;
            }
            let col = cols - 1 - tick + x;
            Some((y as usize, col as usize))
        })
    }
}

/// Place `message` glyph by glyph, advancing a cursor from column 0.
pub fn layout_message(message: &str, glyphs: &dyn GlyphSource) -> Result<Layout, GlowError> {
    let mut coords = Vec::new();
    let mut cursor = 0;

    for ch in message.chars() {
        if ch.is_whitespace() {
            cursor += SPACE_ADVANCE;
            continue;
        }
        if !ch.is_alphanumeric() {
            return Err(GlowError::UnknownGlyph(ch));
        }

        let offsets = glyphs.glyph(ch).ok_or(GlowError::UnknownGlyph(ch))?;
        for &(x, y) in offsets {
            if !(0..ROWS as i32).contains(&y) || x < 0 {
                return Err(GlowError::invalid(format!(
                    "glyph {ch:?} offset ({x}, {y}) does not fit the grid"
                )));
            }
            coords.push((x + cursor, y));
        }
        cursor += advance_width(ch);
    }

    let Some(max_x) = coords.iter().map(|&(x, _)| x).max() else {
        return Err(GlowError::invalid("message has nothing to draw"));
    };
    Ok(Layout { coords, max_x })
}
