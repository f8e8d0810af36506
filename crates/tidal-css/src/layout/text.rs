//! Line breaking and text measurement.
//!
//! [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! The breaker runs in three stages:
//! 1. [`apply_text_transform`] then [`process_white_space`],
//! 2. [`find_break_opportunities`] assigns every candidate position a type
//!    and a penalty,
//! 3. [`TextBreaker::layout`] builds lines greedily, backing up to the
//!    cheapest opportunity that still fits when a line overflows.

use tidal_common::warning::warn_once;

use crate::style::{OverflowWrap, ResolvedStyle, TextTransform, WhiteSpace, WordBreak};

use super::metrics::{FontMetrics, is_wide};

/// Penalty of a free break (spaces, required breaks).
pub const PENALTY_FREE: f32 = 0.0;
/// Penalty after a hyphen inside a word.
pub const PENALTY_HYPHEN: f32 = 100.0;
/// Penalty between CJK characters.
pub const PENALTY_CJK: f32 = 500.0;
/// Penalty between any two letters under `word-break: break-all`.
pub const PENALTY_BREAK_ALL: f32 = 1000.0;
/// Penalty after a closing bracket followed by more text.
pub const PENALTY_CLOSING_BRACKET: f32 = 3000.0;
/// Penalty of an emergency break inside a word (`overflow-wrap`).
pub const PENALTY_FORCED: f32 = 5000.0;
/// Penalty of a forbidden position.
pub const PENALTY_FORBIDDEN: f32 = f32::INFINITY;

const EPSILON: f32 = 0.01;

/// [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakType {
    /// Forced break (newline, form feed). Always taken.
    Required,
    /// "Soft wrap opportunity" at a space, tab or hyphen.
    Optional,
    /// Emergency break inside a word.
    WordBreak,
    /// Break between two characters (CJK, `break-all`).
    CharBreak,
    /// Breaking here is forbidden.
    NoBreak,
}

/// A position where a line may end: the line keeps `text[..offset]` and the
/// next line starts at `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakOpportunity {
    /// Byte offset into the processed text.
    pub offset: usize,
    /// Kind of break.
    pub kind: BreakType,
    /// Cost of breaking here; `0` is free, infinity is forbidden.
    pub penalty: f32,
}

impl BreakOpportunity {
    const fn new(offset: usize, kind: BreakType, penalty: f32) -> Self {
        Self {
            offset,
            kind,
            penalty,
        }
    }

    /// Whether a line may end here.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.kind != BreakType::NoBreak && self.penalty.is_finite()
    }
}

/// A run of non-space characters on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWord {
    /// The word itself.
    pub text: String,
    /// Byte offset of the first character in the processed text.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Measured advance.
    pub width: f32,
    /// Horizontal position within the line.
    pub x: f32,
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Line text with trailing white space trimmed.
    pub text: String,
    /// Byte offset where the line starts.
    pub start: usize,
    /// Byte offset where the next line starts (trailing white space included).
    pub end: usize,
    /// Measured width of `text`.
    pub width: f32,
    /// Line height.
    pub height: f32,
    /// Horizontal offset from `text-align`.
    pub x: f32,
    /// Top of the line relative to the first line.
    pub y: f32,
    /// Words in order.
    pub words: Vec<TextWord>,
}

/// Result of breaking a text into lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    /// Text after transform and white-space processing; line and word
    /// offsets index into it.
    pub text: String,
    /// Lines in order.
    pub lines: Vec<TextLine>,
    /// Widest line.
    pub width: f32,
    /// Sum of line heights.
    pub height: f32,
    /// Whether some line is wider than the maximum width.
    pub overflows: bool,
}

/// Cache key of a node's text measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextCacheKey {
    text: String,
    font_size_bits: u32,
    font_family: String,
    font_weight: u16,
    max_width_bits: u32,
}

impl TextCacheKey {
    /// Key for laying out `text` in `style` at `max_width`.
    #[must_use]
    pub fn new(text: &str, style: &ResolvedStyle, max_width: f32) -> Self {
        Self {
            text: text.to_string(),
            font_size_bits: style.font_size.to_bits(),
            font_family: style.font_family.clone(),
            font_weight: style.font_weight,
            max_width_bits: max_width.to_bits(),
        }
    }
}

/// [§ 2.1 Case Transforms: the text-transform property](https://www.w3.org/TR/css-text-3/#text-transform-property)
#[must_use]
pub fn apply_text_transform(text: &str, transform: TextTransform) -> String {
    match transform {
        TextTransform::None => text.to_string(),
        TextTransform::Uppercase => text.to_uppercase(),
        TextTransform::Lowercase => text.to_lowercase(),
        // "Puts the first typographic letter unit of each word, if lowercase,
        // in titlecase; other characters are unaffected."
        TextTransform::Capitalize => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if at_word_start && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(c);
                }
                at_word_start = c.is_whitespace();
            }
            out
        }
    }
}

/// [§ 4 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
///
/// `normal`/`nowrap` collapse every white-space run (segment breaks
/// included) to one space and trim both ends; `pre-line` collapses spaces
/// and tabs but keeps segment breaks; `pre`/`pre-wrap` keep everything.
/// Non-breaking spaces are never collapsed.
#[must_use]
pub fn process_white_space(text: &str, white_space: WhiteSpace) -> String {
    let text = text.replace("\r\n", "\n");
    match white_space {
        WhiteSpace::Normal | WhiteSpace::Nowrap => {
            text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
        }
        WhiteSpace::PreLine => text
            .split('\n')
            .map(|segment| segment.split_ascii_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n"),
        WhiteSpace::Pre | WhiteSpace::PreWrap => text,
    }
}

fn is_required_break(c: char) -> bool {
    matches!(c, '\n' | '\x0c')
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{3000}')
}

/// Characters a line must not start with.
fn is_sentence_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '。' | '、' | '！' | '？')
}

fn is_opening_bracket(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '「' | '『' | '（')
}

fn is_closing_bracket(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '」' | '』' | '）')
}

/// [§ 5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
///
/// Every candidate break position of `text`, sorted by offset, one entry
/// per offset. When several rules apply to the same offset a required break
/// wins, then a prohibition, then the lowest penalty.
///
/// The end of the text is not listed; it always ends the last line.
#[must_use]
pub fn find_break_opportunities(text: &str, style: &ResolvedStyle) -> Vec<BreakOpportunity> {
    let break_all = style.word_break == WordBreak::BreakAll;
    let keep_all = style.word_break == WordBreak::KeepAll;
    let forced = style.overflow_wrap != OverflowWrap::Normal
        || style.word_break == WordBreak::BreakWord;

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut found = Vec::new();

    for (i, &(offset, c)) in chars.iter().enumerate() {
        let after = offset + c.len_utf8();
        if is_required_break(c) {
            found.push(BreakOpportunity::new(after, BreakType::Required, PENALTY_FREE));
            continue;
        }
        let Some(&(_, next)) = chars.get(i + 1) else {
            continue;
        };
        if is_space(c) {
            found.push(BreakOpportunity::new(after, BreakType::Optional, PENALTY_FREE));
            continue;
        }
        if next.is_whitespace() {
            continue;
        }

        // Between two non-space characters.
        let prev = i.checked_sub(1).map(|p| chars[p].1);
        if c == '-' && prev.is_some_and(char::is_alphanumeric) && next.is_alphanumeric() {
            found.push(BreakOpportunity::new(after, BreakType::Optional, PENALTY_HYPHEN));
        }
        if !keep_all && (is_wide(c) || is_wide(next)) {
            found.push(BreakOpportunity::new(after, BreakType::CharBreak, PENALTY_CJK));
        }
        if is_closing_bracket(c) {
            found.push(BreakOpportunity::new(
                after,
                BreakType::Optional,
                PENALTY_CLOSING_BRACKET,
            ));
        }
        if break_all {
            found.push(BreakOpportunity::new(after, BreakType::CharBreak, PENALTY_BREAK_ALL));
        }
        if forced {
            found.push(BreakOpportunity::new(after, BreakType::WordBreak, PENALTY_FORCED));
        }
    }

    // Prohibitions: no line may start with sentence punctuation or end with
    // an opening bracket.
    let prohibited: Vec<BreakOpportunity> = found
        .iter()
        .filter(|o| o.kind != BreakType::Required)
        .filter(|o| {
            let next = text[o.offset..].chars().next();
            let prev = text[..o.offset].chars().next_back();
            next.is_some_and(is_sentence_punctuation) || prev.is_some_and(is_opening_bracket)
        })
        .map(|o| BreakOpportunity::new(o.offset, BreakType::NoBreak, PENALTY_FORBIDDEN))
        .collect();
    found.extend(prohibited);

    found.sort_by_key(|o| o.offset);
    merge_same_offset(found)
}

fn merge_same_offset(sorted: Vec<BreakOpportunity>) -> Vec<BreakOpportunity> {
    let mut merged: Vec<BreakOpportunity> = Vec::with_capacity(sorted.len());
    for opportunity in sorted {
        let Some(last) = merged.last_mut().filter(|l| l.offset == opportunity.offset) else {
            merged.push(opportunity);
            continue;
        };
        let rank = |o: &BreakOpportunity| match o.kind {
            BreakType::Required => 0,
            BreakType::NoBreak => 1,
            _ => 2,
        };
        if rank(&opportunity) < rank(last)
            || (rank(&opportunity) == rank(last) && opportunity.penalty < last.penalty)
        {
            *last = opportunity;
        }
    }
    merged
}

/// Breaks text into lines using a [`FontMetrics`] implementation.
pub struct TextBreaker<'m> {
    metrics: &'m dyn FontMetrics,
}

impl<'m> TextBreaker<'m> {
    /// A breaker measuring with `metrics`.
    #[must_use]
    pub fn new(metrics: &'m dyn FontMetrics) -> Self {
        Self { metrics }
    }

    /// Advance width of `text` in `style`, letter and word spacing included.
    #[must_use]
    pub fn measure(&self, text: &str, style: &ResolvedStyle) -> f32 {
        let glyphs = self.metrics.text_width(text, style.font_size);
        if style.letter_spacing == 0.0 && style.word_spacing == 0.0 {
            return glyphs;
        }
        let (chars, spaces) = text.chars().fold((0_usize, 0_usize), |(n, s), c| {
            (n + 1, s + usize::from(c == ' '))
        });
        glyphs + style.letter_spacing * chars as f32 + style.word_spacing * spaces as f32
    }

    /// Lay out `text` within `max_width` (use `f32::INFINITY` for no limit).
    ///
    /// A token wider than `max_width` with no opportunity inside it gets a
    /// line of its own and sets [`TextLayout::overflows`].
    #[must_use]
    pub fn layout(&self, text: &str, max_width: f32, style: &ResolvedStyle) -> TextLayout {
        let transformed = apply_text_transform(text, style.text_transform);
        let processed = process_white_space(&transformed, style.white_space);
        if processed.is_empty() {
            return TextLayout::default();
        }

        let opportunities = find_break_opportunities(&processed, style);
        let allow_wrap = style.white_space.allows_wrap() && max_width.is_finite();
        let line_height = if style.line_height > 0.0 {
            style.line_height
        } else {
            self.metrics.line_height(style.font_size)
        };

        let mut lines = Vec::new();
        let mut start = 0;
        while start < processed.len() {
            let end = self.next_line_end(&processed, start, &opportunities, max_width, allow_wrap, style);
            lines.push(self.make_line(&processed, start, end, lines.len(), line_height, style));
            start = end;
        }

        let width = lines.iter().map(|l| l.width).fold(0.0_f32, f32::max);
        let overflows = max_width.is_finite() && width > max_width + EPSILON;
        if overflows && allow_wrap {
            warn_once("text", "unbreakable text wider than its line");
        }
        if max_width.is_finite() {
            let factor = style.text_align.offset_factor();
            for line in &mut lines {
                line.x = (max_width - line.width).max(0.0) * factor;
            }
        }

        TextLayout {
            height: line_height * lines.len() as f32,
            text: processed,
            lines,
            width,
            overflows,
        }
    }

    /// Greedy line construction with back-scan.
    ///
    /// Walk the opportunities after `start` in order. While the candidate
    /// line fits, remember the cheapest allowed opportunity (the latest one
    /// on ties). The first required break or the end of the text that still
    /// fits ends the line. At the first candidate that does not fit, break
    /// at the remembered opportunity; if nothing fit, break at this one and
    /// let the line overflow.
    fn next_line_end(
        &self,
        text: &str,
        start: usize,
        opportunities: &[BreakOpportunity],
        max_width: f32,
        allow_wrap: bool,
        style: &ResolvedStyle,
    ) -> usize {
        let end_of_text = BreakOpportunity::new(text.len(), BreakType::Required, PENALTY_FREE);
        let candidates = opportunities
            .iter()
            .copied()
            .filter(|o| o.offset > start && o.offset < text.len())
            .chain(std::iter::once(end_of_text));

        let mut best: Option<BreakOpportunity> = None;
        for candidate in candidates {
            if !candidate.is_allowed() {
                continue;
            }
            let width = self.measure(text[start..candidate.offset].trim_end(), style);
            let fits = !allow_wrap || width <= max_width + EPSILON;
            if fits {
                if candidate.kind == BreakType::Required {
                    return candidate.offset;
                }
                if best.is_none_or(|b| candidate.penalty <= b.penalty) {
                    best = Some(candidate);
                }
                continue;
            }
            return best.map_or(candidate.offset, |b| b.offset);
        }
        text.len()
    }

    fn make_line(
        &self,
        text: &str,
        start: usize,
        end: usize,
        index: usize,
        line_height: f32,
        style: &ResolvedStyle,
    ) -> TextLine {
        let line_text = text[start..end].trim_end();
        let mut words = Vec::new();
        let mut word_start: Option<usize> = None;
        let bounds = line_text
            .char_indices()
            .map(|(i, c)| (i, Some(c)))
            .chain(std::iter::once((line_text.len(), None)));
        for (i, c) in bounds {
            let is_word_char = c.is_some_and(|c| !is_space(c));
            match (word_start, is_word_char) {
                (None, true) => word_start = Some(i),
                (Some(ws), false) => {
                    let word = &line_text[ws..i];
                    words.push(TextWord {
                        text: word.to_string(),
                        start: start + ws,
                        end: start + i,
                        width: self.measure(word, style),
                        x: self.measure(&line_text[..ws], style),
                    });
                    word_start = None;
                }
                _ => {}
            }
        }

        TextLine {
            text: line_text.to_string(),
            start,
            end,
            width: self.measure(line_text, style),
            height: line_height,
            x: 0.0,
            y: line_height * index as f32,
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::ApproximateFontMetrics;

    fn style() -> ResolvedStyle {
        ResolvedStyle {
            font_size: 10.0,
            line_height: 12.0,
            ..ResolvedStyle::default()
        }
    }

    #[test]
    fn test_space_is_free_optional_break() {
        let ops = find_break_opportunities("ab cd", &style());
        assert_eq!(
            ops,
            vec![BreakOpportunity::new(3, BreakType::Optional, PENALTY_FREE)]
        );
    }

    #[test]
    fn test_no_break_before_sentence_punctuation() {
        let ops = find_break_opportunities("ab .", &style());
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind, BreakType::NoBreak);
        assert!(!ops[0].is_allowed());
    }

    #[test]
    fn test_no_break_after_opening_bracket() {
        let ops = find_break_opportunities("( x", &style());
        assert_eq!(ops[0].offset, 2);
        assert_eq!(ops[0].kind, BreakType::NoBreak);
    }

    #[test]
    fn test_required_break_wins_merge() {
        let merged = merge_same_offset(vec![
            BreakOpportunity::new(4, BreakType::Optional, 0.0),
            BreakOpportunity::new(4, BreakType::NoBreak, PENALTY_FORBIDDEN),
            BreakOpportunity::new(4, BreakType::Required, 0.0),
        ]);
        assert_eq!(merged, vec![BreakOpportunity::new(4, BreakType::Required, 0.0)]);
    }

    #[test]
    fn test_hyphen_and_cjk_penalties() {
        let ops = find_break_opportunities("well-known", &style());
        assert_eq!(ops, vec![BreakOpportunity::new(5, BreakType::Optional, PENALTY_HYPHEN)]);

        let ops = find_break_opportunities("日本", &style());
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].penalty, PENALTY_CJK);
    }

    #[test]
    fn test_back_scan_prefers_cheaper_fitting_break() {
        // "aa bb-cc": a space at 3 (free) and a hyphen at 6 (100). Width 6ch
        // fits "aa bb-" but the scan keeps the cheaper space break.
        let metrics = ApproximateFontMetrics::default();
        let breaker = TextBreaker::new(&metrics);
        let layout = breaker.layout("aa bb-cc", 6.0 * 6.0, &style());
        assert_eq!(layout.lines[0].text, "aa");
        assert_eq!(layout.lines[1].text, "bb-cc");
    }

    #[test]
    fn test_trailing_space_trimmed_but_offsets_kept() {
        let metrics = ApproximateFontMetrics::default();
        let breaker = TextBreaker::new(&metrics);
        let layout = breaker.layout("aaa bbb", 24.0, &style());
        assert_eq!(layout.lines[0].text, "aaa");
        assert_eq!(layout.lines[0].end, 4);
        assert_eq!(layout.lines[1].start, 4);
    }
}
