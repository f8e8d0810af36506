//! Integration tests for box-model geometry.
//!
//! [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)

use quickcheck_macros::quickcheck;
use tidal_css::layout::{AutoOr, BoxModel, EdgeSizes, Rect, Size};
use tidal_css::style::BoxSizing;

fn edges(top: i16, right: i16, bottom: i16, left: i16) -> EdgeSizes {
    EdgeSizes {
        top: f32::from(top),
        right: f32::from(right),
        bottom: f32::from(bottom),
        left: f32::from(left),
    }
}

#[quickcheck]
fn test_boxes_nest(
    content: (i16, i16, u16, u16),
    padding: (i16, i16, i16, i16),
    border: (i16, i16, i16, i16),
    margin: (i16, i16, i16, i16),
) -> bool {
    let (x, y, w, h) = content;
    let dims = BoxModel::compute(
        Rect::new(f32::from(x), f32::from(y), f32::from(w), f32::from(h)),
        edges(padding.0, padding.1, padding.2, padding.3),
        edges(border.0, border.1, border.2, border.3),
        edges(margin.0, margin.1, margin.2, margin.3),
    );
    let content = dims.content_box();
    let padding = dims.padding_box();
    let border = dims.border_box();
    let margin = dims.margin_box();
    padding.contains_rect(&content) && border.contains_rect(&padding) && margin.contains_rect(&border)
}

#[quickcheck]
fn test_from_border_box_nests(w: u16, h: u16, padding: (i16, i16, i16, i16)) -> bool {
    let border_box = Rect::new(0.0, 0.0, f32::from(w), f32::from(h));
    let dims = BoxModel::from_border_box(
        border_box,
        edges(padding.0, padding.1, padding.2, padding.3),
        EdgeSizes::uniform(1.0),
        EdgeSizes::default(),
    );
    dims.content_box().width >= 0.0 && dims.content_box().height >= 0.0
}

#[test]
fn test_outer_boxes_expand_by_spacing() {
    let dims = BoxModel::compute(
        Rect::new(20.0, 20.0, 100.0, 50.0),
        EdgeSizes::uniform(5.0),
        EdgeSizes::uniform(2.0),
        EdgeSizes::uniform(10.0),
    );
    assert_eq!(dims.padding_box(), Rect::new(15.0, 15.0, 110.0, 60.0));
    assert_eq!(dims.border_box(), Rect::new(13.0, 13.0, 114.0, 64.0));
    assert_eq!(dims.margin_box(), Rect::new(3.0, 3.0, 134.0, 84.0));
}

#[test]
fn test_available_content_size_floors_at_zero() {
    let size = BoxModel::available_content_size(
        Size::new(30.0, 30.0),
        &EdgeSizes::uniform(10.0),
        &EdgeSizes::uniform(5.0),
        &EdgeSizes::uniform(5.0),
    );
    assert_eq!(size, Size::new(0.0, 0.0));
}

#[test]
fn test_intrinsic_size_box_sizing() {
    let padding = EdgeSizes::uniform(10.0);
    let border = EdgeSizes::uniform(1.0);
    let specified = Size::new(100.0, 50.0);
    assert_eq!(
        BoxModel::intrinsic_size(specified, &padding, &border, BoxSizing::ContentBox),
        Size::new(122.0, 72.0)
    );
    assert_eq!(
        BoxModel::intrinsic_size(specified, &padding, &border, BoxSizing::BorderBox),
        Size::new(100.0, 50.0)
    );
    // A border box can never be smaller than its padding and border.
    assert_eq!(
        BoxModel::intrinsic_size(Size::new(4.0, 4.0), &padding, &border, BoxSizing::BorderBox),
        Size::new(22.0, 22.0)
    );
}

#[test]
fn test_auto_margins() {
    assert_eq!(
        BoxModel::resolve_auto_margins(500.0, 300.0, AutoOr::Auto, AutoOr::Auto),
        (100.0, 100.0)
    );
    assert_eq!(
        BoxModel::resolve_auto_margins(500.0, 300.0, AutoOr::Auto, AutoOr::Length(50.0)),
        (150.0, 50.0)
    );
    assert_eq!(
        BoxModel::resolve_auto_margins(500.0, 300.0, AutoOr::Length(20.0), AutoOr::Auto),
        (20.0, 180.0)
    );
    assert_eq!(
        BoxModel::resolve_auto_margins(200.0, 300.0, AutoOr::Auto, AutoOr::Auto),
        (0.0, 0.0)
    );
}

#[test]
fn test_margin_collapsing() {
    assert_eq!(BoxModel::collapse_sibling_margins(20.0, 10.0), 20.0);
    assert_eq!(BoxModel::collapse_parent_child(10.0, 30.0, false, false), 30.0);
    assert_eq!(BoxModel::collapse_parent_child(10.0, 30.0, true, false), 40.0);
    assert_eq!(BoxModel::collapse_parent_child(10.0, 30.0, false, true), 40.0);
}
