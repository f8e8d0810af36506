//! Font metrics used for text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
///
/// Implementors provide the advance widths and line height values the text
/// breaker needs. The host renderer can plug in real glyph metrics; the
/// engine falls back to [`ApproximateFontMetrics`].
pub trait FontMetrics {
    /// Measure the total advance width of a text string at the given font size.
    ///
    /// This should sum the advance width of each glyph in the string,
    /// matching the cursor advancement used during text rendering.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Calculate the line height for a given font size.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f32) -> f32;
}

/// Approximate font metrics using fixed ratios.
///
/// Without font data, the average advance of Latin glyphs in a proportional
/// font is taken as `char_width_ratio` × font size (0.6 suits Helvetica/Arial
/// body text). Wide East Asian glyphs advance a full em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateFontMetrics {
    char_width_ratio: f32,
    line_height_ratio: f32,
}

impl ApproximateFontMetrics {
    /// Metrics with the given advance and line-height ratios.
    #[must_use]
    pub const fn new(char_width_ratio: f32, line_height_ratio: f32) -> Self {
        Self {
            char_width_ratio,
            line_height_ratio,
        }
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::new(0.6, 1.2)
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|c| {
                if is_wide(c) {
                    font_size
                } else {
                    font_size * self.char_width_ratio
                }
            })
            .sum()
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }
}

/// CJK ideographs, kana, hangul and fullwidth forms.
#[must_use]
pub fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x2FFFD
            | 0x30000..=0x3FFFD
    )
}
