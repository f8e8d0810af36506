//! Integration tests for unit resolution.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)

use quickcheck_macros::quickcheck;
use tidal_css::LayoutError;
use tidal_css::layout::AutoOr;
use tidal_css::style::{AutoLength, LengthInput, LengthUnit, PropertyKind, ResolutionContext, UnitResolver};

fn ctx() -> ResolutionContext {
    ResolutionContext {
        device_pixel_ratio: 1.0,
        font_size: 20.0,
        root_font_size: 10.0,
        line_height: 30.0,
        viewport_width: 1000.0,
        viewport_height: 500.0,
        container_width: 400.0,
        container_height: 200.0,
    }
}

fn px(src: &str, property: PropertyKind, ctx: &ResolutionContext) -> f32 {
    UnitResolver::new()
        .resolve_px(&LengthInput::from(src), property, ctx)
        .unwrap()
}

#[test]
fn test_px_scales_with_pixel_ratio() {
    let mut c = ctx();
    assert_eq!(px("16px", PropertyKind::Width, &c), 16.0);
    c.device_pixel_ratio = 2.0;
    assert_eq!(px("16px", PropertyKind::Width, &c), 32.0);
    assert_eq!(px("16", PropertyKind::Width, &c), 32.0);
}

#[quickcheck]
fn test_px_round_trip(value: u16, ratio: u8) -> bool {
    let mut c = ctx();
    c.device_pixel_ratio = f32::from(ratio % 4 + 1);
    let resolved = px(&format!("{value}px"), PropertyKind::Width, &c);
    (resolved - f32::from(value) * c.device_pixel_ratio).abs() < 1e-3
}

#[test]
fn test_percent_is_property_aware() {
    let c = ctx();
    assert_eq!(px("100%", PropertyKind::Width, &c), 400.0);
    assert_eq!(px("50%", PropertyKind::Height, &c), 100.0);
    assert_eq!(px("50%", PropertyKind::Margin, &c), 200.0);
    assert_eq!(px("150%", PropertyKind::Font, &c), 30.0);
}

#[test]
fn test_font_relative_units() {
    let c = ctx();
    assert_eq!(px("2em", PropertyKind::Width, &c), 40.0);
    assert_eq!(px("2rem", PropertyKind::Width, &c), 20.0);
    assert_eq!(px("1ex", PropertyKind::Width, &c), 10.0);
    assert_eq!(px("2lh", PropertyKind::Width, &c), 60.0);
}

#[test]
fn test_viewport_units_ignore_container() {
    let mut c = ctx();
    assert_eq!(px("50vw", PropertyKind::Width, &c), 500.0);
    c.container_width = 17.0;
    c.device_pixel_ratio = 3.0;
    assert_eq!(px("50vw", PropertyKind::Width, &c), 500.0);
    assert_eq!(px("10vmin", PropertyKind::Width, &c), 50.0);
    assert_eq!(px("10vmax", PropertyKind::Width, &c), 100.0);
}

#[test]
fn test_absolute_units() {
    let c = ctx();
    assert!((px("1in", PropertyKind::Width, &c) - 96.0).abs() < 1e-3);
    assert!((px("2.54cm", PropertyKind::Width, &c) - 96.0).abs() < 1e-3);
    assert!((px("72pt", PropertyKind::Width, &c) - 96.0).abs() < 1e-3);
    assert!((px("6pc", PropertyKind::Width, &c) - 96.0).abs() < 1e-3);
}

#[test]
fn test_auto_depends_on_property() {
    let c = ctx();
    let mut resolver = UnitResolver::new();
    let auto = LengthInput::from("auto");
    assert_eq!(
        resolver.resolve(&auto, PropertyKind::Width, &c).unwrap(),
        AutoOr::Length(400.0)
    );
    assert_eq!(
        resolver.resolve(&auto, PropertyKind::Height, &c).unwrap(),
        AutoOr::Auto
    );
    assert_eq!(
        resolver.resolve(&auto, PropertyKind::Margin, &c).unwrap(),
        AutoOr::Length(0.0)
    );
}

#[test]
fn test_unsupported_unit_is_an_error() {
    let err = UnitResolver::new()
        .parse("12furlongs")
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::UnsupportedUnit {
            input: "12furlongs".to_string(),
            unit: "furlongs".to_string(),
        }
    );
}

#[test]
fn test_invalid_number_is_an_error() {
    let err = UnitResolver::new().parse("px").unwrap_err();
    assert!(matches!(err, LayoutError::InvalidLength { .. }));
}

#[test]
fn test_parse_is_cached_by_source() {
    let mut resolver = UnitResolver::new();
    let first = resolver.parse("1.5em").unwrap();
    let second = resolver.parse("1.5em").unwrap();
    assert_eq!(first, second);
    assert_eq!(resolver.cache_len(), 1);
    assert!(matches!(
        first,
        AutoLength::Length(length) if length.unit == LengthUnit::Em
    ));
    resolver.clear_cache();
    assert_eq!(resolver.cache_len(), 0);
}

#[test]
fn test_property_classification() {
    assert_eq!(PropertyKind::from_property("min-height"), PropertyKind::Height);
    assert_eq!(PropertyKind::from_property("margin-left"), PropertyKind::Margin);
    assert_eq!(PropertyKind::from_property("font-size"), PropertyKind::Font);
    assert_eq!(PropertyKind::from_property("made-up"), PropertyKind::Width);
}
