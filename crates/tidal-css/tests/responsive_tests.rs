//! Integration tests for breakpoints, media queries and fluid values.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;
use tidal_css::responsive::{ListenerFailure, fluid_value};
use tidal_css::style::LengthInput;
use tidal_css::{
    AuthoredStyle, Breakpoint, EngineConfig, LayoutEngine, LayoutError, ListenerError,
    MediaCondition, NodeId, Orientation, ResponsiveEvaluator, Viewport,
};

fn evaluator(width: f32) -> ResponsiveEvaluator {
    ResponsiveEvaluator::new(&EngineConfig::default(), Viewport::new(width, 600.0))
}

fn patch(width: f32) -> AuthoredStyle {
    serde_json::from_value(json!({ "width": width })).unwrap()
}

#[test]
fn test_default_breakpoints() {
    let tablet = evaluator(800.0);
    assert!(tablet.matches_breakpoint("tablet").unwrap());
    assert!(!tablet.matches_breakpoint("mobile").unwrap());
    // Bounds are inclusive.
    assert!(evaluator(767.0).matches_breakpoint("mobile").unwrap());
    assert!(evaluator(1440.0).matches_breakpoint("wide").unwrap());
    assert_eq!(
        tablet.matches_breakpoint("phablet").unwrap_err(),
        LayoutError::UnknownBreakpoint("phablet".to_string())
    );
}

#[test]
fn test_breakpoint_predicates() {
    let portrait = Breakpoint {
        orientation: Some(Orientation::Portrait),
        min_pixel_ratio: Some(2.0),
        ..Breakpoint::default()
    };
    let tall = Viewport::new(400.0, 800.0);
    assert!(!portrait.matches(&tall));
    assert!(portrait.matches(&tall.with_device_pixel_ratio(2.0)));
    assert!(Breakpoint::default().matches(&Viewport::new(1.0, 1.0)));
}

#[test]
fn test_lookup_errors() {
    let mut responsive = evaluator(800.0);
    assert_eq!(
        responsive
            .add_media_query("q", MediaCondition::breakpoint("nope"), patch(1.0), NodeId(0))
            .unwrap_err(),
        LayoutError::UnknownBreakpoint("nope".to_string())
    );
    assert_eq!(
        responsive.is_active("q").unwrap_err(),
        LayoutError::UnknownMediaQuery("q".to_string())
    );
    assert!(responsive.remove_media_query("q").is_err());
    assert!(responsive.remove_breakpoint("nope").is_err());
}

#[test]
fn test_query_activation_follows_viewport() {
    let mut responsive = evaluator(500.0);
    let target = NodeId(3);
    assert!(
        responsive
            .add_media_query("small", MediaCondition::breakpoint("mobile"), patch(10.0), target)
            .unwrap()
    );
    assert_eq!(responsive.active_patches(target).count(), 1);

    let changed = responsive.update_viewport(Viewport::new(1000.0, 600.0), 0.0);
    assert_eq!(changed, vec![target]);
    assert!(!responsive.is_active("small").unwrap());
    assert_eq!(responsive.active_patches(target).count(), 0);

    let custom = responsive
        .add_media_query(
            "landscape",
            MediaCondition::custom(|v| v.width > v.height),
            patch(20.0),
            target,
        )
        .unwrap();
    assert!(custom);
}

#[test]
fn test_viewport_updates_are_throttled() {
    let mut responsive = evaluator(500.0);
    let _ = responsive.update_viewport(Viewport::new(600.0, 600.0), 0.0);
    let _ = responsive.update_viewport(Viewport::new(700.0, 600.0), 5.0);
    let _ = responsive.update_viewport(Viewport::new(900.0, 600.0), 8.0);
    assert!(responsive.has_pending());
    assert_eq!(responsive.viewport().width, 600.0);

    let _ = responsive.flush(10.0);
    assert_eq!(responsive.viewport().width, 600.0);

    let _ = responsive.flush(16.0);
    assert!(!responsive.has_pending());
    assert_eq!(responsive.viewport().width, 900.0);
}

#[test]
fn test_failing_listener_does_not_stop_others() {
    let mut responsive = evaluator(500.0);
    let _ = responsive
        .add_media_query("small", MediaCondition::breakpoint("mobile"), patch(1.0), NodeId(1))
        .unwrap();
    let calls = Rc::new(Cell::new(0));
    let failing = responsive.add_listener(|_| Err(ListenerError::new("boom")));
    let counter = Rc::clone(&calls);
    let _ = responsive.add_listener(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    let _ = responsive.update_viewport(Viewport::new(1000.0, 600.0), 0.0);
    assert_eq!(calls.get(), 1);
    assert_eq!(
        responsive.take_failures(),
        vec![ListenerFailure {
            listener: failing,
            error: ListenerError::new("boom"),
        }]
    );
    assert!(responsive.take_failures().is_empty());

    // No activation change, no notification.
    let _ = responsive.update_viewport(Viewport::new(1010.0, 600.0), 100.0);
    assert_eq!(calls.get(), 1);

    assert!(responsive.remove_listener(failing));
    assert!(!responsive.remove_listener(failing));
}

#[test]
fn test_fluid_and_adaptive_values() {
    let responsive = evaluator(800.0);
    assert!((responsive.fluid_font_size(16.0, 24.0, 400.0, 1200.0) - 20.0).abs() < 1e-4);
    assert_eq!(fluid_value(100.0, 16.0, 24.0, 400.0, 1200.0), 16.0);
    assert_eq!(fluid_value(2000.0, 16.0, 24.0, 400.0, 1200.0), 24.0);

    assert!((evaluator(500.0).adaptive_spacing(10.0) - 8.0).abs() < 1e-4);
    assert_eq!(evaluator(800.0).adaptive_spacing(10.0), 10.0);
    assert!((evaluator(1500.0).adaptive_spacing(10.0) - 12.0).abs() < 1e-4);
}

#[test]
fn test_engine_applies_active_patches() {
    let mut engine = LayoutEngine::new(Viewport::new(500.0, 600.0));
    let root = engine.create_element("div");
    let card = engine.create_element("div");
    engine.append_child(root, card).unwrap();
    engine.set_root(root).unwrap();
    engine
        .replace_style(card, serde_json::from_value(json!({ "width": 300, "height": 10 })).unwrap())
        .unwrap();
    let active = engine
        .add_media_query("narrow", MediaCondition::breakpoint("mobile"), patch(100.0), card)
        .unwrap();
    assert!(active);

    let _ = engine.tick(0.0).unwrap();
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 100.0);
    // The authored style itself is untouched.
    assert_eq!(engine.authored_style(card).unwrap().width, Some(LengthInput::Number(300.0)));

    engine.set_viewport(Viewport::new(1000.0, 600.0));
    let _ = engine.tick(0.0).unwrap();
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 300.0);

    // A second resize inside the throttle window waits for a later frame.
    engine.set_viewport(Viewport::new(500.0, 600.0));
    let _ = engine.tick(0.0).unwrap();
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 300.0);
    assert!(engine.tick(20.0).unwrap());
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 100.0);

    engine.remove_media_query("narrow").unwrap();
    let _ = engine.tick(40.0).unwrap();
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 300.0);
}

#[test]
fn test_forced_layout_applies_parked_viewport() {
    let mut engine = LayoutEngine::new(Viewport::new(500.0, 600.0));
    let root = engine.create_element("div");
    let card = engine.create_element("div");
    engine.append_child(root, card).unwrap();
    engine.set_root(root).unwrap();
    engine
        .replace_style(card, serde_json::from_value(json!({ "width": 300, "height": 10 })).unwrap())
        .unwrap();
    let _ = engine
        .add_media_query("narrow", MediaCondition::breakpoint("mobile"), patch(100.0), card)
        .unwrap();

    engine.set_viewport(Viewport::new(1000.0, 600.0));
    let _ = engine.force_layout().unwrap();
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 300.0);

    // Still inside the throttle window: parked, but a forced pass applies it.
    engine.set_viewport(Viewport::new(400.0, 600.0));
    let _ = engine.force_layout().unwrap();
    assert!(engine.responsive().is_active("narrow").unwrap());
    assert!(!engine.responsive().has_pending());
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 100.0);

    engine.set_viewport(Viewport::new(1200.0, 600.0));
    let _ = engine.force_layout().unwrap();
    assert!(!engine.responsive().is_active("narrow").unwrap());
    assert_eq!(engine.node_layout(card).unwrap().bounds.width, 300.0);
}
