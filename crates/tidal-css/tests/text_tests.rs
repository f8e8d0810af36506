//! Integration tests for line breaking.
//!
//! [CSS Text Level 3](https://www.w3.org/TR/css-text-3/)

use tidal_css::ResolvedStyle;
use tidal_css::layout::text::{apply_text_transform, process_white_space};
use tidal_css::layout::{ApproximateFontMetrics, TextBreaker, TextLayout};
use tidal_css::style::{OverflowWrap, TextAlign, TextTransform, WhiteSpace, WordBreak};

/// 10px font: every narrow glyph is 6px wide, every line 12px tall.
fn style() -> ResolvedStyle {
    ResolvedStyle {
        font_size: 10.0,
        line_height: 12.0,
        ..ResolvedStyle::default()
    }
}

fn layout(text: &str, max_width: f32, style: &ResolvedStyle) -> TextLayout {
    let metrics = ApproximateFontMetrics::default();
    TextBreaker::new(&metrics).layout(text, max_width, style)
}

fn line_texts(layout: &TextLayout) -> Vec<&str> {
    layout.lines.iter().map(|l| l.text.as_str()).collect()
}

#[test]
fn test_unbreakable_token_is_one_line() {
    let result = layout("Supercalifragilistic", 30.0, &style());
    assert_eq!(line_texts(&result), vec!["Supercalifragilistic"]);
    assert!(result.overflows);
}

#[test]
fn test_words_wrap_greedily() {
    let result = layout("aaa bbb ccc", 42.0, &style());
    assert_eq!(line_texts(&result), vec!["aaa bbb", "ccc"]);
    assert!(!result.overflows);
    assert!((result.height - 24.0).abs() < 1e-3);
    assert!((result.lines[1].y - 12.0).abs() < 1e-3);
    assert!((result.width - 42.0).abs() < 1e-3);
}

#[test]
fn test_long_word_gets_own_line() {
    let result = layout("a verylongword b", 30.0, &style());
    assert_eq!(line_texts(&result), vec!["a", "verylongword", "b"]);
    assert!(result.overflows);
}

#[test]
fn test_nowrap_keeps_one_line() {
    let nowrap = ResolvedStyle {
        white_space: WhiteSpace::Nowrap,
        ..style()
    };
    let result = layout("aaa   bbb ccc", 20.0, &nowrap);
    assert_eq!(line_texts(&result), vec!["aaa bbb ccc"]);
}

#[test]
fn test_required_breaks_in_pre_line() {
    let pre_line = ResolvedStyle {
        white_space: WhiteSpace::PreLine,
        ..style()
    };
    let result = layout("a   b\nc", 1000.0, &pre_line);
    assert_eq!(line_texts(&result), vec!["a b", "c"]);
}

#[test]
fn test_break_all_splits_words() {
    let break_all = ResolvedStyle {
        word_break: WordBreak::BreakAll,
        ..style()
    };
    let result = layout("abcdefgh", 24.5, &break_all);
    assert_eq!(line_texts(&result), vec!["abcd", "efgh"]);
    assert!(!result.overflows);
}

#[test]
fn test_overflow_wrap_breaks_only_when_needed() {
    let anywhere = ResolvedStyle {
        overflow_wrap: OverflowWrap::BreakWord,
        ..style()
    };
    let result = layout("ab cdefghij", 36.5, &anywhere);
    // The free space break is taken before any forced break.
    assert_eq!(result.lines[0].text, "ab");
    assert!(result.lines.iter().all(|l| l.width <= 36.5));
}

#[test]
fn test_text_align_offsets_lines() {
    let centered = ResolvedStyle {
        text_align: TextAlign::Center,
        ..style()
    };
    let result = layout("ab", 100.0, &centered);
    assert!((result.lines[0].x - 44.0).abs() < 1e-3);

    let unbounded = layout("ab", f32::INFINITY, &centered);
    assert_eq!(unbounded.lines[0].x, 0.0);
}

#[test]
fn test_words_carry_positions() {
    let result = layout("aaa bb", 1000.0, &style());
    let words = &result.lines[0].words;
    assert_eq!(words.len(), 2);
    assert_eq!(words[1].text, "bb");
    assert_eq!((words[1].start, words[1].end), (4, 6));
    assert!((words[1].x - 24.0).abs() < 1e-3);
    assert!((words[1].width - 12.0).abs() < 1e-3);
}

#[test]
fn test_empty_text_has_no_lines() {
    let result = layout("   ", 100.0, &style());
    assert!(result.lines.is_empty());
    assert_eq!(result.height, 0.0);
}

#[test]
fn test_transform_then_whitespace() {
    let upper = ResolvedStyle {
        text_transform: TextTransform::Uppercase,
        ..style()
    };
    let result = layout("  hello   world ", 1000.0, &upper);
    assert_eq!(result.text, "HELLO WORLD");
    assert_eq!(
        apply_text_transform("hello big world", TextTransform::Capitalize),
        "Hello Big World"
    );
}

#[test]
fn test_white_space_modes() {
    assert_eq!(process_white_space("  a \n\t b  ", WhiteSpace::Normal), "a b");
    assert_eq!(process_white_space(" a  b \n c", WhiteSpace::PreLine), "a b\nc");
    assert_eq!(process_white_space(" a  b ", WhiteSpace::Pre), " a  b ");
    assert_eq!(
        process_white_space("a\u{a0}\u{a0}b", WhiteSpace::Normal),
        "a\u{a0}\u{a0}b"
    );
}

#[test]
fn test_spacing_is_measured() {
    let metrics = ApproximateFontMetrics::default();
    let breaker = TextBreaker::new(&metrics);
    let spaced = ResolvedStyle {
        letter_spacing: 1.0,
        word_spacing: 4.0,
        ..style()
    };
    // 3 glyphs of 6px, 3 letter gaps of 1px, one word space of 4px.
    assert!((breaker.measure("a b", &spaced) - 25.0).abs() < 1e-3);
}
