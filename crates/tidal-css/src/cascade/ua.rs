//! Tag-level defaults.
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents
//! elements of HTML documents in ways consistent with general user
//! expectations."
//!
//! UA defaults have the lowest priority: they only fill properties the
//! author left unset.

use crate::layout::values::AutoOr;
use crate::style::{AuthoredStyle, Display, FontStyle, ResolvedStyle, Rgba, Side, WhiteSpace};

/// Monospace family used by `code` and `pre`.
const MONOSPACE: &str = "monospace";

/// Background of `code` and `pre` blocks.
const CODE_BACKGROUND: Rgba = Rgba::new(0.94, 0.94, 0.94, 1.0);

/// [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings)
///
/// `(font-size in em, vertical margin in em of the resulting size)` for
/// `h1`..`h6`.
const HEADINGS: [(f32, f32); 6] = [
    (2.0, 0.67),
    (1.5, 0.83),
    (1.17, 1.0),
    (1.0, 1.33),
    (0.83, 1.67),
    (0.67, 2.33),
];

/// `Some(1..=6)` for `h1`..`h6`.
#[must_use]
pub fn heading_level(tag: &str) -> Option<usize> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<usize>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

/// [§ 15.3 Suggested default style sheet](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
///
/// Default `display` of an element. Unknown tags are inline, as in CSS.
#[must_use]
pub fn default_display_for_tag(tag: &str) -> Display {
    // [§ 15.3.1 Hidden elements]
    // "The following elements must have their display set to none:"
    const HIDDEN: &[&str] = &[
        "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
        "param", "rp", "script", "style", "template", "title",
    ];
    // [§ 15.3.3 Flow content]
    const BLOCK: &[&str] = &[
        "address", "article", "aside", "blockquote", "body", "center", "dd", "details",
        "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
        "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend",
        "li", "main", "menu", "nav", "ol", "p", "pre", "search", "section", "summary", "ul",
        "xmp",
    ];

    if HIDDEN.contains(&tag) {
        Display::None
    } else if BLOCK.contains(&tag) {
        Display::Block
    } else {
        Display::Inline
    }
}

/// Heading font size, relative to the inherited size.
///
/// Runs before authored properties: the heading size is the em basis of
/// the element's own authored lengths.
pub fn apply_tag_font_size(tag: &str, authored: &AuthoredStyle, style: &mut ResolvedStyle) {
    if let Some(level) = heading_level(tag)
        && authored.font_size.is_none()
    {
        style.font_size *= HEADINGS[level - 1].0;
        style.sync_line_height();
    }
}

/// Apply the remaining tag adjustments after authored properties.
pub fn apply_tag_adjustments(tag: &str, authored: &AuthoredStyle, style: &mut ResolvedStyle) {
    if authored.display.is_none() {
        style.display = default_display_for_tag(tag);
    }

    if let Some(level) = heading_level(tag) {
        let margin_em = HEADINGS[level - 1].1;
        if authored.font_weight.is_none() {
            style.font_weight = 700;
        }
        let margin = AutoOr::Length(style.font_size * margin_em);
        if authored.margin_side(Side::Top).is_none() {
            style.margin.top = margin;
        }
        if authored.margin_side(Side::Bottom).is_none() {
            style.margin.bottom = margin;
        }
        return;
    }

    match tag {
        "em" | "i" | "cite" | "var" if authored.font_style.is_none() => {
            style.font_style = FontStyle::Italic;
        }
        "strong" | "b" if authored.font_weight.is_none() => {
            style.font_weight = 700;
        }
        "code" | "kbd" | "samp" => {
            set_monospace(authored, style);
            let inset = style.font_size * 0.25;
            if authored.padding_side(Side::Left).is_none() {
                style.padding.left = inset;
            }
            if authored.padding_side(Side::Right).is_none() {
                style.padding.right = inset;
            }
        }
        "pre" => {
            set_monospace(authored, style);
            if authored.white_space.is_none() {
                style.white_space = WhiteSpace::Pre;
            }
            let inset = style.font_size * 0.5;
            for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
                if authored.padding_side(side).is_none() {
                    match side {
                        Side::Top => style.padding.top = inset,
                        Side::Right => style.padding.right = inset,
                        Side::Bottom => style.padding.bottom = inset,
                        Side::Left => style.padding.left = inset,
                    }
                }
            }
        }
        _ => {}
    }
}

fn set_monospace(authored: &AuthoredStyle, style: &mut ResolvedStyle) {
    if authored.font_family.is_none() {
        style.font_family = MONOSPACE.to_string();
    }
    if authored.background_color.is_none() {
        style.background_color = CODE_BACKGROUND;
    }
}
