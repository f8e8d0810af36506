//! Integration tests for the style cascade.
//!
//! [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/)

use std::sync::Arc;

use tidal_css::layout::AutoOr;
use tidal_css::style::{
    AuthoredStyle, Display, FontStyle, LengthInput, Position, ResolutionContext, ResolvedStyle,
    Rgba, Visibility, WhiteSpace,
};
use tidal_css::{EngineConfig, LayoutError, StyleCascade};

fn cascade() -> StyleCascade {
    StyleCascade::new(Arc::new(EngineConfig::default().default_style(1.0)))
}

fn ctx() -> ResolutionContext {
    ResolutionContext {
        viewport_width: 1000.0,
        viewport_height: 800.0,
        container_width: 500.0,
        container_height: 400.0,
        ..ResolutionContext::default()
    }
}

fn len(src: &str) -> Option<LengthInput> {
    Some(LengthInput::from(src))
}

fn compute(tag: &str, authored: &AuthoredStyle, parent: Option<&ResolvedStyle>) -> ResolvedStyle {
    cascade().compute(tag, authored, parent, &ctx()).unwrap()
}

#[test]
fn test_defaults_without_parent() {
    let style = compute("div", &AuthoredStyle::default(), None);
    assert_eq!(style.font_size, 16.0);
    assert_eq!(style.display, Display::Block);
    assert_eq!(style.width, AutoOr::Auto);
    assert_eq!(style.color, Rgba::BLACK);
}

#[test]
fn test_default_display_per_tag() {
    let none = AuthoredStyle::default();
    assert_eq!(compute("p", &none, None).display, Display::Block);
    assert_eq!(compute("span", &none, None).display, Display::Inline);
    assert_eq!(compute("script", &none, None).display, Display::None);
    assert_eq!(compute("made-up", &none, None).display, Display::Inline);
}

#[test]
fn test_inherited_properties_flow_down() {
    let parent = compute(
        "div",
        &AuthoredStyle {
            color: Some("red".to_string()),
            font_size: len("20px"),
            white_space: Some(WhiteSpace::Nowrap),
            visibility: Some(Visibility::Hidden),
            width: len("300px"),
            position: Some(Position::Relative),
            ..AuthoredStyle::default()
        },
        None,
    );
    let child = compute("div", &AuthoredStyle::default(), Some(&parent));
    assert_eq!(child.color, parent.color);
    assert_eq!(child.font_size, 20.0);
    assert_eq!(child.white_space, WhiteSpace::Nowrap);
    assert_eq!(child.visibility, Visibility::Hidden);
    // Non-inherited properties start from their initial values.
    assert_eq!(child.width, AutoOr::Auto);
    assert_eq!(child.position, Position::Static);
}

#[test]
fn test_em_uses_own_font_size() {
    let style = compute(
        "div",
        &AuthoredStyle {
            font_size: len("2em"),
            padding: len("1em"),
            ..AuthoredStyle::default()
        },
        None,
    );
    assert_eq!(style.font_size, 32.0);
    assert_eq!(style.padding.left, 32.0);
}

#[test]
fn test_heading_scales_font_and_margins() {
    let h1 = compute("h1", &AuthoredStyle::default(), None);
    assert_eq!(h1.font_size, 32.0);
    assert_eq!(h1.font_weight, 700);
    assert!((h1.margin.top.to_px_or(0.0) - 32.0 * 0.67).abs() < 1e-3);
    assert_eq!(h1.margin.left, AutoOr::Length(0.0));
}

#[test]
fn test_tag_adjustments_respect_author() {
    let authored = AuthoredStyle {
        font_weight: Some(300),
        margin_top: len("4px"),
        ..AuthoredStyle::default()
    };
    let h2 = compute("h2", &authored, None);
    assert_eq!(h2.font_weight, 300);
    assert_eq!(h2.margin.top, AutoOr::Length(4.0));

    let em = compute("em", &AuthoredStyle::default(), None);
    assert_eq!(em.font_style, FontStyle::Italic);

    let pre = compute("pre", &AuthoredStyle::default(), None);
    assert_eq!(pre.white_space, WhiteSpace::Pre);
    assert_eq!(pre.font_family, "monospace");
    assert!(pre.padding.top > 0.0);
}

#[test]
fn test_text_nodes_inherit_and_are_inline() {
    let parent = compute(
        "div",
        &AuthoredStyle {
            font_size: len("24px"),
            ..AuthoredStyle::default()
        },
        None,
    );
    let text = compute(tidal_dom::TEXT_TAG, &AuthoredStyle::default(), Some(&parent));
    assert_eq!(text.display, Display::Inline);
    assert_eq!(text.font_size, 24.0);
}

#[test]
fn test_line_height_number_is_multiplier() {
    let parent = compute(
        "div",
        &AuthoredStyle {
            font_size: len("10px"),
            line_height: Some(LengthInput::Number(2.0)),
            ..AuthoredStyle::default()
        },
        None,
    );
    assert_eq!(parent.line_height, 20.0);
    // The multiplier, not the used value, is inherited.
    let child = compute(
        "div",
        &AuthoredStyle {
            font_size: len("30px"),
            ..AuthoredStyle::default()
        },
        Some(&parent),
    );
    assert_eq!(child.line_height, 60.0);
}

#[test]
fn test_negative_spacing_is_clamped() {
    let style = compute(
        "div",
        &AuthoredStyle {
            margin: len("-10px"),
            padding: len("-4px"),
            ..AuthoredStyle::default()
        },
        None,
    );
    assert_eq!(style.margin.top, AutoOr::Length(0.0));
    assert_eq!(style.padding.top, 0.0);
}

#[test]
fn test_auto_margins_survive() {
    let style = compute(
        "div",
        &AuthoredStyle {
            margin_left: len("auto"),
            margin_right: len("auto"),
            ..AuthoredStyle::default()
        },
        None,
    );
    assert!(style.margin.left.is_auto());
    assert!(style.margin.right.is_auto());
}

#[test]
fn test_percent_against_container() {
    let style = compute(
        "div",
        &AuthoredStyle {
            width: len("50%"),
            height: len("25%"),
            ..AuthoredStyle::default()
        },
        None,
    );
    assert_eq!(style.width, AutoOr::Length(250.0));
    assert_eq!(style.height, AutoOr::Length(100.0));
}

#[test]
fn test_bad_values_fail_fast() {
    let mut cascade = cascade();
    let bad_unit = AuthoredStyle {
        width: len("3parsecs"),
        ..AuthoredStyle::default()
    };
    assert!(matches!(
        cascade.compute("div", &bad_unit, None, &ctx()),
        Err(LayoutError::UnsupportedUnit { .. })
    ));
    let bad_color = AuthoredStyle {
        color: Some("not-a-color".to_string()),
        ..AuthoredStyle::default()
    };
    assert!(matches!(
        cascade.compute("div", &bad_color, None, &ctx()),
        Err(LayoutError::InvalidColor(_))
    ));
}

#[test]
fn test_merge_overrides_set_fields_only() {
    let mut base = AuthoredStyle {
        width: len("10px"),
        height: len("20px"),
        ..AuthoredStyle::default()
    };
    base.merge(&AuthoredStyle {
        width: len("30px"),
        ..AuthoredStyle::default()
    });
    assert_eq!(base.width, len("30px"));
    assert_eq!(base.height, len("20px"));
}

#[test]
fn test_authored_style_from_json() {
    let style: AuthoredStyle = serde_json::from_str(
        r#"{ "display": "flex", "justify-content": "space-between", "width": 300, "margin-top": "1em" }"#,
    )
    .unwrap();
    assert_eq!(style.display, Some(Display::Flex));
    assert_eq!(style.width, Some(LengthInput::Number(300.0)));
    assert_eq!(style.margin_top, len("1em"));
}
