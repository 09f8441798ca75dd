use super::*;

#[test]
fn bounds_new_rejects_negative_extents() {
    assert!(Bounds::new(0.0, 0.0, 10.0, 5.0).is_ok());
    assert!(Bounds::new(0.0, 0.0, 0.0, 0.0).is_ok());
    assert!(matches!(
        Bounds::new(0.0, 0.0, -1.0, 5.0),
        Err(SlotfitError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Bounds::new(f64::NAN, 0.0, 1.0, 1.0),
        Err(SlotfitError::InvalidGeometry(_))
    ));
}

#[test]
fn non_degenerate_requires_positive_extents() {
    let zero_w = Bounds {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 10.0,
    };
    assert!(zero_w.validate().is_ok());
    assert!(zero_w.validate_non_degenerate().is_err());
}

#[test]
fn kurbo_conversion_preserves_geometry() {
    let b = Bounds::new(10.0, 20.0, 30.0, 40.0).unwrap();
    let r: Rect = b.into();
    assert_eq!(r, Rect::new(10.0, 20.0, 40.0, 60.0));
    assert_eq!(Bounds::from(r), b);

    let flipped = Rect::new(40.0, 60.0, 10.0, 20.0);
    assert_eq!(Bounds::from_rect(flipped), b);
}

#[test]
fn canvas_bounds_start_at_origin() {
    let c = Canvas {
        width: 1080,
        height: 1920,
    };
    assert_eq!(c.bounds(), Bounds::new(0.0, 0.0, 1080.0, 1920.0).unwrap());
}
