//! Label width estimation and ellipsis truncation for feature descriptions.

/// Per-glyph advance widths for the label font, indexed by code point.
/// Code points outside the table fall back to [`FALLBACK_GLYPH_WIDTH`].
#[rustfmt::skip]
const GLYPH_WIDTHS: [u8; 256] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 3, 5, 7, 6, 9, 8, 3, 3, 3, 6, 6, 3, 4, 3, 4,
    6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 3, 3, 6, 6, 6, 5,
    9, 7, 7, 7, 8, 6, 6, 8, 8, 3, 3, 7, 6, 10, 8, 8,
    7, 8, 7, 6, 6, 8, 6, 10, 6, 6, 6, 4, 4, 4, 6, 5,
    6, 6, 7, 5, 7, 6, 4, 6, 7, 3, 3, 6, 3, 10, 7, 7,
    7, 7, 5, 5, 4, 7, 6, 8, 6, 6, 5, 4, 6, 4, 6, 0,
    0, 0, 0, 0, 0, 10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    3, 3, 6, 6, 6, 6, 6, 6, 6, 9, 4, 5, 6, 0, 9, 5,
    5, 6, 4, 4, 6, 7, 7, 3, 3, 4, 4, 5, 8, 8, 8, 5,
    7, 7, 7, 7, 7, 7, 9, 7, 6, 6, 6, 6, 3, 3, 3, 3,
    8, 8, 8, 8, 8, 8, 8, 6, 8, 8, 8, 8, 8, 6, 7, 7,
    6, 6, 6, 6, 6, 6, 9, 5, 6, 6, 6, 6, 3, 3, 3, 3,
    6, 7, 7, 7, 7, 7, 7, 6, 7, 7, 7, 7, 7, 6, 7, 6,
];

const FALLBACK_GLYPH_WIDTH: f32 = 5.0;

const ELLIPSIS: char = '…';

/// Estimated pixel width of `text` when drawn as a feature label.
pub fn estimate_width(text: &str) -> f32 {
    text.chars()
        .map(|c| match GLYPH_WIDTHS.get(c as usize) {
            Some(&w) => w as f32,
            None => FALLBACK_GLYPH_WIDTH,
        })
        .sum()
}

/// Truncates `description` to the longest prefix whose estimated width plus
/// a three-character ellipsis allowance still fits `fit_width`, appending an
/// ellipsis. `estimated_width` is the precomputed [`estimate_width`] of the
/// full description. Descriptions that fit (with the allowance) come back
/// unchanged.
pub fn truncate_to_fit(description: &str, estimated_width: f32, fit_width: f32) -> String {
    let char_count = description.chars().count();
    if char_count == 0 {
        return String::new();
    }
    let px_per_letter = estimated_width / char_count as f32;
    if px_per_letter <= 0.0 {
        return description.to_string();
    }
    let mut chars_to_display = 1usize;
    while px_per_letter * ((chars_to_display + 3) as f32) < fit_width {
        chars_to_display += 1;
    }
    if chars_to_display + 3 >= char_count {
        return description.to_string();
    }
    let mut out: String = description.chars().take(chars_to_display).collect();
    out.push(ELLIPSIS);
    out
}
