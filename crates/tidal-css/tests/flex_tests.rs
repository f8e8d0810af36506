//! Integration tests for flex layout.
//!
//! [CSS Flexible Box Layout Level 1](https://www.w3.org/TR/css-flexbox-1/)

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use serde_json::{Value, json};
use tidal_css::layout::Rect;
use tidal_css::{AuthoredStyle, LayoutEngine, NodeId, Viewport};

fn style(value: Value) -> AuthoredStyle {
    serde_json::from_value(value).unwrap()
}

fn element(engine: &mut LayoutEngine, tag: &str, value: Value) -> NodeId {
    let node = engine.create_element(tag);
    engine.replace_style(node, style(value)).unwrap();
    node
}

/// A flex container at the root with one child per entry of `items`.
fn flex(container: Value, items: &[Value]) -> (LayoutEngine, NodeId, Vec<NodeId>) {
    let mut engine = LayoutEngine::new(Viewport::new(800.0, 600.0));
    let root = element(&mut engine, "div", container);
    engine.set_root(root).unwrap();
    let children = items
        .iter()
        .map(|item| {
            let child = element(&mut engine, "div", item.clone());
            engine.append_child(root, child).unwrap();
            child
        })
        .collect();
    let _ = engine.force_layout().unwrap();
    (engine, root, children)
}

fn bounds(engine: &LayoutEngine, node: NodeId) -> Rect {
    engine.node_layout(node).unwrap().bounds
}

fn xs(engine: &LayoutEngine, nodes: &[NodeId]) -> Vec<f32> {
    nodes.iter().map(|&n| bounds(engine, n).x).collect()
}

fn ys(engine: &LayoutEngine, nodes: &[NodeId]) -> Vec<f32> {
    nodes.iter().map(|&n| bounds(engine, n).y).collect()
}

fn item(width: f32) -> Value {
    json!({ "width": width, "height": 20 })
}

#[test]
fn test_space_between() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "justify-content": "space-between" }),
        &[item(50.0), item(50.0), item(50.0)],
    );
    assert_eq!(xs(&engine, &children), vec![0.0, 125.0, 250.0]);
    assert_eq!(bounds(&engine, children[2]).right(), 300.0);
}

#[test]
fn test_justify_center_and_end() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "justify-content": "center" }),
        &[item(50.0), item(50.0)],
    );
    assert_eq!(xs(&engine, &children), vec![100.0, 150.0]);

    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "justify-content": "flex-end" }),
        &[item(50.0), item(50.0)],
    );
    assert_eq!(xs(&engine, &children), vec![200.0, 250.0]);
}

#[test]
fn test_gap_between_items() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "gap": 10 }),
        &[item(50.0), item(50.0), item(50.0)],
    );
    assert_eq!(xs(&engine, &children), vec![0.0, 60.0, 120.0]);
}

#[test]
fn test_row_reverse_mirrors() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "flex-direction": "row-reverse" }),
        &[item(50.0), item(50.0), item(50.0)],
    );
    assert_eq!(xs(&engine, &children), vec![250.0, 200.0, 150.0]);
}

#[test]
fn test_grow_shares_free_space() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 400 }),
        &[
            json!({ "width": 50, "flex-grow": 1 }),
            json!({ "width": 50, "flex-grow": 2 }),
        ],
    );
    assert!((bounds(&engine, children[0]).width - 150.0).abs() < 0.01);
    assert!((bounds(&engine, children[1]).width - 250.0).abs() < 0.01);
}

#[test]
fn test_stretch_and_center_on_cross_axis() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "height": 100 }),
        &[json!({ "width": 50 })],
    );
    assert_eq!(bounds(&engine, children[0]).height, 100.0);

    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "height": 100, "align-items": "center" }),
        &[item(50.0)],
    );
    assert_eq!(bounds(&engine, children[0]).y, 40.0);
}

#[test]
fn test_wrap_starts_new_line() {
    let (engine, root, children) = flex(
        json!({ "display": "flex", "width": 250, "flex-wrap": "wrap" }),
        &[item(100.0), item(100.0), item(100.0)],
    );
    let third = bounds(&engine, children[2]);
    assert_eq!((third.x, third.y), (0.0, 20.0));
    assert_eq!(bounds(&engine, root).height, 40.0);
}

#[test]
fn test_column_stacks_and_stretches() {
    let (engine, root, children) = flex(
        json!({ "display": "flex", "flex-direction": "column", "width": 200 }),
        &[json!({ "height": 30 }), json!({ "height": 30 })],
    );
    let second = bounds(&engine, children[1]);
    assert_eq!((second.x, second.y, second.width), (0.0, 30.0, 200.0));
    assert_eq!(bounds(&engine, root).height, 60.0);
}

#[test]
fn test_absolute_children_do_not_flex() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "justify-content": "space-between" }),
        &[
            item(50.0),
            json!({ "width": 10, "height": 10, "position": "absolute", "right": 0, "top": 0 }),
            item(50.0),
        ],
    );
    assert_eq!(bounds(&engine, children[0]).x, 0.0);
    assert_eq!(bounds(&engine, children[2]).x, 250.0);
    assert_eq!(bounds(&engine, children[1]).x, 290.0);
}

/// Three 100px items in a 200x100 wrapping container: two lines of 20px.
fn two_lines(align_content: &str) -> (LayoutEngine, Vec<NodeId>) {
    let (engine, _, children) = flex(
        json!({
            "display": "flex",
            "width": 200,
            "height": 100,
            "flex-wrap": "wrap",
            "align-content": align_content,
        }),
        &[item(100.0), item(100.0), item(100.0)],
    );
    (engine, children)
}

#[test]
fn test_align_content_packs_lines() {
    let cases = [
        ("flex-start", [0.0, 20.0]),
        ("flex-end", [60.0, 80.0]),
        ("center", [30.0, 50.0]),
        ("space-between", [0.0, 80.0]),
        ("space-around", [15.0, 65.0]),
        ("space-evenly", [20.0, 60.0]),
    ];
    for (value, [first, second]) in cases {
        let (engine, children) = two_lines(value);
        assert_eq!(ys(&engine, &children), vec![first, first, second], "{value}");
    }
}

#[test]
fn test_align_content_stretch_grows_lines() {
    let (engine, _, children) = flex(
        json!({
            "display": "flex",
            "width": 200,
            "height": 100,
            "flex-wrap": "wrap",
            "align-content": "stretch",
        }),
        &[json!({ "width": 100 }), json!({ "width": 100 }), json!({ "width": 100 })],
    );
    assert_eq!(ys(&engine, &children), vec![0.0, 0.0, 50.0]);
    for &child in &children {
        assert_eq!(bounds(&engine, child).height, 50.0);
    }
}

#[test]
fn test_align_content_ignored_without_wrap() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 200, "height": 100, "align-content": "center" }),
        &[item(50.0), item(50.0)],
    );
    assert_eq!(ys(&engine, &children), vec![0.0, 0.0]);
}

#[test]
fn test_wrap_reverse_flips_lines() {
    let (engine, _, children) = flex(
        json!({
            "display": "flex",
            "width": 200,
            "height": 100,
            "flex-wrap": "wrap-reverse",
            "align-content": "flex-start",
        }),
        &[item(100.0), item(100.0), item(100.0)],
    );
    assert_eq!(ys(&engine, &children), vec![80.0, 80.0, 60.0]);
    assert_eq!(xs(&engine, &children), vec![0.0, 100.0, 0.0]);
}

#[test]
fn test_column_reverse_mirrors() {
    let (engine, _, children) = flex(
        json!({
            "display": "flex",
            "flex-direction": "column-reverse",
            "width": 200,
            "height": 100,
        }),
        &[json!({ "height": 20 }), json!({ "height": 20 })],
    );
    assert_eq!(ys(&engine, &children), vec![80.0, 60.0]);
    for &child in &children {
        let b = bounds(&engine, child);
        assert_eq!((b.x, b.width), (0.0, 200.0));
    }
}

#[test]
fn test_align_self_overrides_align_items() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300, "height": 100, "align-items": "flex-start" }),
        &[
            json!({ "width": 50, "height": 20 }),
            json!({ "width": 50, "height": 20, "align-self": "flex-end" }),
            json!({ "width": 50, "height": 20, "align-self": "center" }),
            json!({ "width": 50, "align-self": "stretch" }),
            json!({ "width": 50, "height": 20, "align-self": "baseline" }),
        ],
    );
    assert_eq!(ys(&engine, &children), vec![0.0, 80.0, 40.0, 0.0, 0.0]);
    assert_eq!(bounds(&engine, children[0]).height, 20.0);
    assert_eq!(bounds(&engine, children[3]).height, 100.0);
}

#[test]
fn test_flex_basis_beats_width() {
    let (engine, _, children) = flex(
        json!({ "display": "flex", "width": 300 }),
        &[
            json!({ "width": 50, "flex-basis": 100, "height": 20 }),
            json!({ "width": 50, "flex-grow": 1, "height": 20 }),
        ],
    );
    let widths: Vec<f32> = children.iter().map(|&c| bounds(&engine, c).width).collect();
    assert_eq!(widths, vec![100.0, 200.0]);
    assert_eq!(xs(&engine, &children), vec![0.0, 100.0]);
}

#[quickcheck]
fn test_grow_conserves_container_size(items: Vec<(u8, u8)>) -> TestResult {
    let items: Vec<(u8, u8)> = items.into_iter().take(6).collect();
    if items.is_empty() {
        return TestResult::discard();
    }
    let total: f32 = items.iter().map(|&(w, _)| f32::from(w)).sum();
    let container = total + 100.0;
    let values: Vec<Value> = items
        .iter()
        .map(|&(w, g)| json!({ "width": w, "flex-grow": g % 4 + 1 }))
        .collect();
    let (engine, _, children) = flex(json!({ "display": "flex", "width": container }), &values);
    let used: f32 = children.iter().map(|&c| bounds(&engine, c).width).sum();
    TestResult::from_bool((used - container).abs() < 0.05)
}

#[quickcheck]
fn test_shrink_never_negative(items: Vec<u8>) -> TestResult {
    let items: Vec<u8> = items.into_iter().take(6).collect();
    let total: f32 = items.iter().map(|&w| f32::from(w)).sum();
    if total == 0.0 {
        return TestResult::discard();
    }
    let values: Vec<Value> = items.iter().map(|&w| json!({ "width": w })).collect();
    let (engine, _, children) = flex(json!({ "display": "flex", "width": total / 2.0 }), &values);
    TestResult::from_bool(children.iter().all(|&c| bounds(&engine, c).width >= 0.0))
}
