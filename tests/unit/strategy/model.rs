use super::*;

fn ov(id: &str, x: f64, y: f64, s: f64) -> LayerOverride {
    LayerOverride {
        layer_id: id.to_string(),
        x_offset: x,
        y_offset: y,
        individual_scale: s,
    }
}

#[test]
fn anchor_parses_case_insensitively_with_center_fallback() {
    assert_eq!(VerticalAnchor::parse_lenient("top"), VerticalAnchor::Top);
    assert_eq!(VerticalAnchor::parse_lenient("BOTTOM"), VerticalAnchor::Bottom);
    assert_eq!(VerticalAnchor::parse_lenient("Stretch"), VerticalAnchor::Stretch);
    assert_eq!(VerticalAnchor::parse_lenient("CENTER"), VerticalAnchor::Center);
    assert_eq!(VerticalAnchor::parse_lenient("middle"), VerticalAnchor::Center);
}

#[test]
fn strategy_json_uses_defaults() {
    let s: LayoutStrategy = serde_json::from_str(
        r#"{ "suggested_scale": 0.5, "anchor": "bottom", "overrides": [ { "layer_id": "a" } ] }"#,
    )
    .unwrap();
    assert_eq!(s.anchor, VerticalAnchor::Bottom);
    assert_eq!(s.overrides[0].individual_scale, 1.0);
    assert_eq!(s.overrides[0].x_offset, 0.0);
    s.validate().unwrap();

    let out = serde_json::to_value(&s).unwrap();
    assert_eq!(out["anchor"], "BOTTOM");
}

#[test]
fn validate_rejects_degenerate_scales() {
    assert!(LayoutStrategy::new(0.0, VerticalAnchor::Top).validate().is_err());
    assert!(LayoutStrategy::new(f64::INFINITY, VerticalAnchor::Top).validate().is_err());
    let mut s = LayoutStrategy::new(1.0, VerticalAnchor::Top);
    s.overrides.push(ov("a", f64::NAN, 0.0, 1.0));
    assert!(s.validate().is_err());
}

#[test]
fn first_override_wins_and_duplicates_are_reported() {
    let mut s = LayoutStrategy::new(1.0, VerticalAnchor::Center);
    s.overrides = vec![ov("a", 1.0, 1.0, 1.0), ov("b", 2.0, 2.0, 1.0), ov("a", 9.0, 9.0, 3.0)];
    let idx = OverrideIndex::build(Some(&s));
    assert_eq!(idx.get("a").unwrap().x_offset, 1.0);
    assert_eq!(idx.get("b").unwrap().x_offset, 2.0);
    assert!(idx.get("c").is_none());
    assert_eq!(idx.duplicates(), &["a"]);
}

#[test]
fn empty_index_without_strategy() {
    let idx = OverrideIndex::build(None);
    assert!(idx.is_empty());
    assert!(idx.duplicates().is_empty());
}

#[test]
fn repeated_duplicates_are_listed_once() {
    let mut s = LayoutStrategy::new(1.0, VerticalAnchor::Center);
    s.overrides = vec![
        ov("a", 1.0, 1.0, 1.0),
        ov("a", 2.0, 2.0, 1.0),
        ov("b", 3.0, 3.0, 1.0),
        ov("a", 4.0, 4.0, 1.0),
        ov("b", 5.0, 5.0, 1.0),
    ];
    let idx = OverrideIndex::build(Some(&s));
    assert_eq!(idx.duplicates(), &["a", "b"]);
    assert_eq!(idx.get("a").unwrap().x_offset, 1.0);
}

#[test]
fn non_string_anchor_values_fall_back_to_center() {
    for anchor in ["null", "3", "true", "{}", "[\"TOP\"]"] {
        let json = format!(r#"{{ "suggested_scale": 1.0, "anchor": {anchor} }}"#);
        let s: LayoutStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(s.anchor, VerticalAnchor::Center, "anchor {anchor}");
    }
}

#[test]
fn override_index_validates_effective_overrides() {
    let mut s = LayoutStrategy::new(1.0, VerticalAnchor::Center);
    s.overrides.push(ov("a", 0.0, 0.0, -2.0));
    assert!(OverrideIndex::build(Some(&s)).validate().is_err());
    assert!(s.overrides[0].validate().is_err());

    s.overrides[0].individual_scale = 2.0;
    assert!(OverrideIndex::build(Some(&s)).validate().is_ok());
}
