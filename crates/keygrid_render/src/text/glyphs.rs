use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use crate::GlowError;

/// Pixel offsets, relative to the glyph origin, that are lit for a character.
pub trait GlyphSource {
    /// Offsets for `ch`, looked up case-insensitively.
    fn glyph(&self, ch: char) -> Option<&[(i32, i32)]>;
}

/// Five-row font, one string per row, `#` lit.
const BUILTIN_FONT: &[(char, [&str; 5])] = &[
    ('A', [".##.", "#..#", "####", "#..#", "#..#"]),
    ('B', ["###.", "#..#", "###.", "#..#", "###."]),
    ('C', [".###", "#...", "#...", "#...", ".###"]),
    ('D', ["###.", "#..#", "#..#", "#..#", "###."]),
    ('E', ["####", "#...", "###.", "#...", "####"]),
    ('F', ["####", "#...", "###.", "#...", "#..."]),
    ('G', [".###", "#...", "#.##", "#..#", ".###"]),
    ('H', ["#..#", "#..#", "####", "#..#", "#..#"]),
    ('I', ["###", ".#.", ".#.", ".#.", "###"]),
    ('J', ["...#", "...#", "...#", "#..#", ".##."]),
    ('K', ["#..#", "#.#.", "##..", "#.#.", "#..#"]),
    ('L', ["#...", "#...", "#...", "#...", "####"]),
    ('M', ["#...#", "##.##", "#.#.#", "#...#", "#...#"]),
    ('N', ["#...#", "##..#", "#.#.#", "#..##", "#...#"]),
    ('O', [".##.", "#..#", "#..#", "#..#", ".##."]),
    ('P', ["###.", "#..#", "###.", "#...", "#..."]),
    ('Q', [".###.", "#...#", "#.#.#", "#..#.", ".##.#"]),
    ('R', ["###.", "#..#", "###.", "#.#.", "#..#"]),
    ('S', [".###", "#...", ".##.", "...#", "###."]),
    ('T', ["#####", "..#..", "..#..", "..#..", "..#.."]),
    ('U', ["#..#", "#..#", "#..#", "#..#", ".##."]),
    ('V', ["#...#", "#...#", "#...#", ".#.#.", "..#.."]),
    ('W', ["#...#", "#...#", "#.#.#", "##.##", "#...#"]),
    ('X', ["#...#", ".#.#.", "..#..", ".#.#.", "#...#"]),
    ('Y', ["#..#", "#..#", ".###", "...#", "###."]),
    ('Z', ["####", "...#", ".##.", "#...", "####"]),
    ('0', [".##.", "#.##", "#..#", "##.#", ".##."]),
    ('1', [".#.", "##.", ".#.", ".#.", "###"]),
    ('2', ["###.", "...#", ".##.", "#...", "####"]),
    ('3', ["###.", "...#", ".##.", "...#", "###."]),
    ('4', ["#..#", "#..#", "####", "...#", "...#"]),
    ('5', ["####", "#...", "###.", "...#", "###."]),
    ('6', [".##.", "#...", "###.", "#..#", ".##."]),
    ('7', ["####", "...#", "..#.", ".#..", ".#.."]),
    ('8', [".##.", "#..#", ".##.", "#..#", ".##."]),
    ('9', [".##.", "#..#", ".###", "...#", ".##."]),
];

/// Read-only table from uppercase characters to glyph offsets.
#[derive(Clone, Debug, Default)]
pub struct GlyphMap {
    glyphs: HashMap<char, Vec<(i32, i32)>>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct GlyphTable(HashMap<String, Vec<(i32, i32)>>);

impl GlyphMap {
    /// The bundled alphanumeric font.
    pub fn builtin() -> Self {
        let glyphs = BUILTIN_FONT.iter().map(|&(ch, rows)| (ch, rasterize(&rows))).collect();
        Self { glyphs }
    }

    /// Parse a `{"A": [[x, y], ...]}` table. Keys must be single characters.
    pub fn from_json<R: Read>(reader: R) -> Result<Self, GlowError> {
        let GlyphTable(table) = serde_json::from_reader(reader)?;
        let mut glyphs = HashMap::with_capacity(table.len());
        for (key, offsets) in table {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(GlowError::invalid(format!("glyph key {key:?} is not one character")));
            };
            glyphs.insert(normalize(ch), offsets);
        }
        Ok(Self { glyphs })
    }

    pub fn insert(&mut self, ch: char, offsets: Vec<(i32, i32)>) {
        self.glyphs.insert(normalize(ch), offsets);
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphSource for GlyphMap {
    fn glyph(&self, ch: char) -> Option<&[(i32, i32)]> {
        self.glyphs.get(&normalize(ch)).map(Vec::as_slice)
    }
}

fn normalize(ch: char) -> char {
    ch.to_ascii_uppercase()
}

fn rasterize(rows: &[&str]) -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, cell) in row.chars().enumerate() {
            if cell == '#' {
                offsets.push((x as i32, y as i32));
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::layout::advance_width;

    #[test]
    fn builtin_covers_letters_and_digits() {
        let font = GlyphMap::builtin();
        for ch in ('A'..='Z').chain('0'..='9') {
            assert!(font.glyph(ch).is_some_and(|offsets| !offsets.is_empty()), "{ch}");
        }
        assert_eq!(font.glyph('q'), font.glyph('Q'));
        assert!(font.glyph('!').is_none());
    }

    // Each glyph leaves exactly one blank column before the next cursor stop.
    #[test]
    fn builtin_widths_match_the_advance_table() {
        let font = GlyphMap::builtin();
        for ch in ('A'..='Z').chain('0'..='9') {
            let widest = font.glyph(ch).unwrap().iter().map(|&(x, _)| x).max().unwrap();
            assert_eq!(widest + 2, advance_width(ch), "{ch}");
        }
    }

    #[test]
    fn json_keys_are_uppercased() {
        let json = r#"{"a": [[0, 0], [1, 2]], "7": [[2, 4]]}"#;
        let map = GlyphMap::from_json(json.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.glyph('A'), Some(&[(0, 0), (1, 2)][..]));
        assert_eq!(map.glyph('7'), Some(&[(2, 4)][..]));
    }

    #[test]
    fn json_rejects_multi_character_keys() {
        let json = r#"{"AB": [[0, 0]]}"#;
        assert!(matches!(
            GlyphMap::from_json(json.as_bytes()),
            Err(GlowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(GlyphMap::from_json("{".as_bytes()), Err(GlowError::GlyphTable(_))));
    }
}
