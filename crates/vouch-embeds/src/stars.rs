//! Star rating glyphs.

use vouch_common::{MAX_STARS, MIN_STARS};

/// Glyph for an earned star.
pub const FILLED_STAR: char = '⭐';

/// Glyph for a missing star.
pub const EMPTY_STAR: char = '☆';

/// Renders `stars` as a fixed-width row: filled glyphs then empty glyphs,
/// always `MAX_STARS` in total. Out-of-range input is clamped.
#[must_use]
pub fn render_stars(stars: u8) -> String {
    let filled = usize::from(stars.clamp(MIN_STARS, MAX_STARS));
    let empty = usize::from(MAX_STARS) - filled;

    let mut row = String::with_capacity(usize::from(MAX_STARS) * FILLED_STAR.len_utf8());
    row.extend(std::iter::repeat(FILLED_STAR).take(filled));
    row.extend(std::iter::repeat(EMPTY_STAR).take(empty));
    row
}
