//! Integration tests for the layout engine: passes, scheduling, positioning
//! and the paint list.

use serde_json::{Value, json};
use tidal_css::layout::{AlgorithmKind, Rect};
use tidal_css::{AuthoredStyle, LayoutEngine, LayoutError, NodeId, Viewport};

fn style(value: Value) -> AuthoredStyle {
    serde_json::from_value(value).unwrap()
}

fn engine() -> LayoutEngine {
    LayoutEngine::new(Viewport::new(800.0, 600.0))
}

fn element(engine: &mut LayoutEngine, parent: Option<NodeId>, value: Value) -> NodeId {
    let node = engine.create_element("div");
    engine.replace_style(node, style(value)).unwrap();
    if let Some(parent) = parent {
        engine.append_child(parent, node).unwrap();
    }
    node
}

fn with_root(value: Value) -> (LayoutEngine, NodeId) {
    let mut engine = engine();
    let root = element(&mut engine, None, value);
    engine.set_root(root).unwrap();
    (engine, root)
}

fn bounds(engine: &LayoutEngine, node: NodeId) -> Rect {
    engine.node_layout(node).unwrap().bounds
}

#[test]
fn test_sibling_margins_collapse() {
    let (mut engine, root) = with_root(json!({}));
    let a = element(&mut engine, Some(root), json!({ "height": 50, "margin-bottom": 20 }));
    let b = element(&mut engine, Some(root), json!({ "height": 50, "margin-top": 10 }));
    let _ = engine.force_layout().unwrap();

    let gap = bounds(&engine, b).y - bounds(&engine, a).bottom();
    assert_eq!(gap, 20.0);
    assert_eq!(bounds(&engine, root).height, 120.0);
}

#[test]
fn test_first_child_margin_moves_parent() {
    let (mut engine, root) = with_root(json!({}));
    let parent = element(&mut engine, Some(root), json!({ "margin-top": 10 }));
    let child = element(&mut engine, Some(parent), json!({ "height": 20, "margin-top": 30 }));
    let _ = engine.force_layout().unwrap();

    assert_eq!(bounds(&engine, parent), Rect::new(0.0, 30.0, 800.0, 20.0));
    assert_eq!(bounds(&engine, child).y, 30.0);
    assert_eq!(bounds(&engine, root).height, 50.0);
}

#[test]
fn test_last_child_margin_leaves_parent() {
    let (mut engine, root) = with_root(json!({}));
    let parent = element(&mut engine, Some(root), json!({ "margin-bottom": 5 }));
    let _ = element(&mut engine, Some(parent), json!({ "height": 20, "margin-bottom": 25 }));
    let next = element(&mut engine, Some(root), json!({ "height": 10, "margin-top": 10 }));
    let _ = engine.force_layout().unwrap();

    assert_eq!(bounds(&engine, parent).height, 20.0);
    assert_eq!(bounds(&engine, next).y, 45.0);
}

#[test]
fn test_padding_keeps_child_margin_inside() {
    let (mut engine, root) = with_root(json!({}));
    let parent = element(&mut engine, Some(root), json!({ "margin-top": 10, "padding-top": 1 }));
    let child = element(&mut engine, Some(parent), json!({ "height": 20, "margin-top": 30 }));
    let _ = engine.force_layout().unwrap();

    assert_eq!(bounds(&engine, parent).y, 10.0);
    assert_eq!(bounds(&engine, parent).height, 51.0);
    assert_eq!(bounds(&engine, child).y, 41.0);
}

#[test]
fn test_blocks_fill_container_width() {
    let (mut engine, root) = with_root(json!({ "padding": 10 }));
    let child = element(&mut engine, Some(root), json!({ "height": 10, "margin-left": 5 }));
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, root).width, 800.0);
    assert_eq!(bounds(&engine, child), Rect::new(15.0, 10.0, 775.0, 10.0));
}

#[test]
fn test_auto_margins_center() {
    let (mut engine, root) = with_root(json!({}));
    let child = element(
        &mut engine,
        Some(root),
        json!({ "width": 200, "height": 10, "margin-left": "auto", "margin-right": "auto" }),
    );
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, child).x, 300.0);
}

#[test]
fn test_relative_units_in_layout() {
    let (mut engine, root) = with_root(json!({}));
    let half = element(&mut engine, Some(root), json!({ "width": "50%", "height": 10 }));
    let vw = element(&mut engine, Some(root), json!({ "width": "25vw", "height": "2em" }));
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, half).width, 400.0);
    assert_eq!(bounds(&engine, vw).width, 200.0);
    assert_eq!(bounds(&engine, vw).height, 32.0);
}

#[test]
fn test_pixel_ratio_scales_absolute_lengths() {
    let mut engine = LayoutEngine::new(Viewport::new(800.0, 600.0).with_device_pixel_ratio(2.0));
    let root = element(&mut engine, None, json!({}));
    let child = element(&mut engine, Some(root), json!({ "width": "16px", "height": 10 }));
    engine.set_root(root).unwrap();
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, child).width, 32.0);
    assert_eq!(engine.resolved_style(root).unwrap().font_size, 32.0);
}

#[test]
fn test_layout_is_idempotent() {
    let (mut engine, root) = with_root(json!({ "padding": 8 }));
    let row = element(&mut engine, Some(root), json!({ "display": "flex", "gap": 4 }));
    for _ in 0..3 {
        let _ = element(&mut engine, Some(row), json!({ "width": 30, "height": 30, "flex-grow": 1 }));
    }
    let text = engine.create_text("some words that will wrap inside the box");
    engine.append_child(root, text).unwrap();

    let first = engine.force_layout().unwrap().cloned();
    let first_paint = engine.paint_list().to_vec();
    let second = engine.force_layout().unwrap().cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(first_paint, engine.paint_list());
}

#[test]
fn test_paint_order_is_stable_by_z() {
    let (mut engine, root) = with_root(json!({}));
    let a = element(&mut engine, Some(root), json!({ "height": 10, "z-index": 1 }));
    let b = element(&mut engine, Some(root), json!({ "height": 10 }));
    let c = element(&mut engine, Some(root), json!({ "height": 10, "z-index": 1 }));
    let d = element(&mut engine, Some(root), json!({ "height": 10 }));
    let _ = engine.force_layout().unwrap();

    let order: Vec<NodeId> = engine.paint_list().iter().map(|e| e.node).collect();
    assert_eq!(order, vec![root, b, d, a, c]);
    assert_eq!(engine.node_layout(a).unwrap().paint_order, Some(3));
}

#[test]
fn test_hit_test_uses_paint_order() {
    let (mut engine, root) = with_root(json!({ "width": 100, "height": 100 }));
    let outside = element(
        &mut engine,
        Some(root),
        json!({ "position": "absolute", "left": 200, "top": 0, "width": 50, "height": 50 }),
    );
    let _ = engine.force_layout().unwrap();
    assert_eq!(engine.hit_test(10.0, 10.0), Some(root));
    assert_eq!(engine.hit_test(210.0, 10.0), Some(outside));
    assert_eq!(engine.hit_test(500.0, 500.0), None);
}

#[test]
fn test_hidden_and_none_boxes() {
    let (mut engine, root) = with_root(json!({}));
    let hidden = element(&mut engine, Some(root), json!({ "height": 10, "visibility": "hidden" }));
    let none = element(&mut engine, Some(root), json!({ "height": 10, "display": "none" }));
    let after = element(&mut engine, Some(root), json!({ "height": 10 }));
    let _ = engine.force_layout().unwrap();

    // Hidden boxes take space but are not painted.
    assert_eq!(bounds(&engine, after).y, 10.0);
    assert!(engine.node_layout(hidden).is_some());
    assert!(engine.paint_list().iter().all(|e| e.node != hidden));
    assert!(engine.node_layout(none).is_none());
}

#[test]
fn test_positioned_boxes() {
    let (mut engine, root) = with_root(json!({ "height": 200 }));
    let relative = element(
        &mut engine,
        Some(root),
        json!({ "height": 10, "position": "relative", "left": 10, "top": 5 }),
    );
    let fixed = element(
        &mut engine,
        Some(root),
        json!({ "position": "fixed", "right": 0, "bottom": 0, "width": 10, "height": 10 }),
    );
    let stretched = element(
        &mut engine,
        Some(root),
        json!({ "position": "absolute", "left": 100, "right": 100, "top": 20, "height": 5 }),
    );
    let _ = engine.force_layout().unwrap();

    assert_eq!(bounds(&engine, relative), Rect::new(10.0, 5.0, 800.0, 10.0));
    assert_eq!(bounds(&engine, fixed), Rect::new(790.0, 590.0, 10.0, 10.0));
    assert_eq!(bounds(&engine, stretched), Rect::new(100.0, 20.0, 600.0, 5.0));
}

#[test]
fn test_text_wraps_inside_block() {
    let (mut engine, root) = with_root(json!({ "width": 60 }));
    engine.set_text(root, "aaa bbb ccc").unwrap();
    let _ = engine.force_layout().unwrap();

    // 16px text: 9.6px glyphs, 19.2px lines.
    let measured = engine.measure_text(root, 60.0).unwrap();
    assert_eq!(measured.lines.len(), 3);
    assert!((bounds(&engine, root).height - 57.6).abs() < 0.01);
    assert!(engine.node_layout(root).unwrap().text_origin.is_some());
}

#[test]
fn test_inline_children_share_a_line() {
    let (mut engine, root) = with_root(json!({}));
    let first = engine.create_element("span");
    let second = engine.create_element("span");
    for (span, text) in [(first, "ab"), (second, "cd")] {
        let run = engine.create_text(text);
        engine.append_child(span, run).unwrap();
        engine.append_child(root, span).unwrap();
    }
    let _ = engine.force_layout().unwrap();
    let (a, b) = (bounds(&engine, first), bounds(&engine, second));
    assert_eq!(a.y, b.y);
    assert!(b.x >= a.right());
}

#[test]
fn test_invalidations_coalesce_into_one_pass() {
    let (mut engine, root) = with_root(json!({}));
    assert!(engine.is_scheduled());
    engine.set_style(root, &style(json!({ "height": 10 }))).unwrap();
    engine.set_style(root, &style(json!({ "height": 20 }))).unwrap();
    let _ = element(&mut engine, Some(root), json!({}));

    assert!(engine.tick(0.0).unwrap());
    assert_eq!(engine.stats().passes, 1);
    assert!(!engine.tick(16.0).unwrap());
    assert_eq!(engine.stats().passes, 1);
    assert_eq!(bounds(&engine, root).height, 20.0);
}

#[test]
fn test_cancel_and_force() {
    let (mut engine, root) = with_root(json!({}));
    engine.cancel();
    assert!(!engine.tick(0.0).unwrap());
    assert!(engine.layout_result().is_none());

    engine.set_style(root, &style(json!({ "height": 10 }))).unwrap();
    assert!(engine.is_scheduled());
    let result = engine.force_layout().unwrap().cloned().unwrap();
    assert!(!engine.is_scheduled());
    assert_eq!(result.node, root);
    assert_eq!(engine.stats().passes, 1);
}

#[test]
fn test_mutations_relayout() {
    let (mut engine, root) = with_root(json!({}));
    let a = element(&mut engine, Some(root), json!({ "height": 10 }));
    let _ = engine.force_layout().unwrap();

    let b = element(&mut engine, None, json!({ "height": 30 }));
    engine.insert_before(root, b, Some(a)).unwrap();
    assert!(engine.is_scheduled());
    let _ = engine.tick(0.0).unwrap();
    assert_eq!(bounds(&engine, a).y, 30.0);

    engine.remove_child(root, b).unwrap();
    let _ = engine.tick(16.0).unwrap();
    assert_eq!(bounds(&engine, a).y, 0.0);
    assert!(engine.node_layout(b).is_none());

    let result = engine.layout_result().unwrap();
    assert_eq!(result.children.len(), 1);
    assert_eq!(result.children[0].node, a);
}

#[test]
fn test_dispose_node_releases_subtree() {
    let (mut engine, root) = with_root(json!({}));
    let a = element(&mut engine, Some(root), json!({ "height": 10 }));
    let inner = element(&mut engine, Some(a), json!({ "height": 10 }));
    let _ = engine.force_layout().unwrap();

    engine.dispose_node(a).unwrap();
    let _ = engine.force_layout().unwrap();
    assert!(engine.node_layout(inner).is_none());
    assert_eq!(engine.measure_text(inner, 10.0).unwrap_err(), LayoutError::UnknownNode(inner));
    assert_eq!(bounds(&engine, root).height, 0.0);
}

#[test]
fn test_node_churn_reuses_slots() {
    let (mut engine, root) = with_root(json!({}));
    let _ = engine.force_layout().unwrap();

    for _ in 0..20 {
        let node = element(&mut engine, Some(root), json!({ "height": 40, "width": 100 }));
        let _ = engine.force_layout().unwrap();
        engine.dispose_node(node).unwrap();
    }
    assert_eq!(engine.tree().capacity(), 2);

    // A recycled id starts from a blank style.
    let fresh = engine.create_element("div");
    assert_eq!(engine.authored_style(fresh), Some(&AuthoredStyle::default()));
    engine.append_child(root, fresh).unwrap();
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, fresh).height, 0.0);
    assert_eq!(bounds(&engine, root).height, 0.0);
}

#[test]
fn test_unresolved_node_cannot_be_measured() {
    let mut engine = engine();
    let node = engine.create_text("hello");
    assert_eq!(
        engine.measure_text(node, 100.0).unwrap_err(),
        LayoutError::StyleNotResolved(node)
    );
}

#[test]
fn test_set_viewport_relayouts() {
    let (mut engine, root) = with_root(json!({}));
    let _ = engine.force_layout().unwrap();
    assert_eq!(bounds(&engine, root).width, 800.0);

    engine.set_viewport(Viewport::new(400.0, 300.0));
    assert!(engine.is_scheduled());
    let _ = engine.tick(100.0).unwrap();
    assert_eq!(bounds(&engine, root).width, 400.0);
}

#[test]
fn test_missing_algorithm_is_an_error() {
    let (mut engine, _) = with_root(json!({ "display": "flex" }));
    let removed = engine.unregister_algorithm(AlgorithmKind::Flex);
    assert!(removed.is_some());
    assert_eq!(
        engine.force_layout().unwrap_err(),
        LayoutError::UnknownAlgorithm("flex".to_string())
    );
    assert!(engine.algorithms().lookup("grid").is_err());
    assert!(!engine.is_scheduled());
}

#[test]
fn test_dispose_releases_everything() {
    let (mut engine, _) = with_root(json!({}));
    let _ = engine.force_layout().unwrap();
    assert!(!engine.paint_list().is_empty());

    engine.schedule();
    engine.dispose();
    assert!(!engine.is_scheduled());
    assert!(engine.paint_list().is_empty());
    assert!(engine.layout_result().is_none());
    assert!(engine.algorithms().is_empty());
}

#[test]
fn test_stats_count_nodes() {
    let (mut engine, root) = with_root(json!({}));
    let _ = element(&mut engine, Some(root), json!({ "height": 1 }));
    let _ = element(&mut engine, Some(root), json!({ "height": 1 }));
    let _ = engine.force_layout().unwrap();
    let stats = engine.stats();
    assert_eq!(stats.styled_nodes, 3);
    assert_eq!(stats.laid_out_nodes, 3);
    assert_eq!(stats.paint_entries, 3);

    // Nothing dirty: styles are reused.
    let _ = engine.force_layout().unwrap();
    assert_eq!(engine.stats().styled_nodes, 0);
    assert_eq!(engine.stats().passes, 2);
}
