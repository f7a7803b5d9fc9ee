/// Score tracker and HUD text.
///
/// The HUD is a coin icon followed by `x{count}` drawn with the bitmap
/// `font:numbers` sheet. Score is display-only; nothing in the rules reads it.

/// Glyph order in the `font:numbers` sheet.
pub const FONT_GLYPHS: &str = "0123456789X ";
pub const FONT_COLUMNS: usize = 6;

/// Top-left of the HUD group in world pixels.
pub const HUD_OFFSET: (f32, f32) = (10.0, 10.0);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ScoreState {
    coins: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self) {
        self.coins += 1;
    }

    pub fn count(&self) -> u32 {
        self.coins
    }

    /// HUD label, e.g. `x0`, `x12`.
    pub fn text(&self) -> String {
        format!("x{}", self.coins)
    }
}

/// Cell (column, row) of `c` in the numbers sheet. Lower-case `x` shares
/// the `X` glyph; characters outside the sheet have no glyph.
pub fn glyph_frame(c: char) -> Option<(usize, usize)> {
    let c = if c == 'x' { 'X' } else { c };
    FONT_GLYPHS
        .chars()
        .position(|g| g == c)
        .map(|i| (i % FONT_COLUMNS, i / FONT_COLUMNS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_tracks_count() {
        let mut s = ScoreState::new();
        assert_eq!(s.text(), "x0");
        for _ in 0..12 {
            s.collect();
        }
        assert_eq!(s.count(), 12);
        assert_eq!(s.text(), "x12");
    }

    #[test]
    fn glyph_cells() {
        assert_eq!(glyph_frame('0'), Some((0, 0)));
        assert_eq!(glyph_frame('5'), Some((5, 0)));
        assert_eq!(glyph_frame('6'), Some((0, 1)));
        assert_eq!(glyph_frame('x'), Some((4, 1)));
        assert_eq!(glyph_frame('X'), glyph_frame('x'));
        assert_eq!(glyph_frame(' '), Some((5, 1)));
        assert_eq!(glyph_frame('?'), None);
    }

    #[test]
    fn every_hud_character_has_a_glyph() {
        let mut s = ScoreState::new();
        for _ in 0..1234 {
            s.collect();
        }
        assert!(s.text().chars().all(|c| glyph_frame(c).is_some()));
    }
}
