use super::*;
use crate::foundation::core::Bounds;
use crate::scene::element::Element;
use crate::strategy::model::{LayoutStrategy, VerticalAnchor};

fn source() -> SourceContext {
    let bounds = Bounds {
        x: 0.0,
        y: 0.0,
        w: 100.0,
        h: 100.0,
    };
    SourceContext {
        document: "d".to_string(),
        container: "c".to_string(),
        root_id: "c".to_string(),
        bounds,
        elements: vec![Element::leaf("a", bounds)],
        strategy: None,
    }
}

fn slot() -> TargetSlot {
    TargetSlot {
        id: "s".to_string(),
        name: "main".to_string(),
        original_name: String::new(),
        bounds: Bounds {
            x: 0.0,
            y: 0.0,
            w: 50.0,
            h: 50.0,
        },
    }
}

#[test]
fn unchanged_inputs_reuse_the_payload() {
    let mut cache = PayloadCache::new();
    let settings = RemapSettings::default();
    let a = cache.get_or_compute("i0", &source(), &slot(), &settings).unwrap();
    let b = cache.get_or_compute("i0", &source(), &slot(), &settings).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
}

#[test]
fn changed_inputs_supersede_the_payload() {
    let mut cache = PayloadCache::new();
    let settings = RemapSettings::default();
    let a = cache.get_or_compute("i0", &source(), &slot(), &settings).unwrap();

    let mut src = source();
    src.strategy = Some(LayoutStrategy::new(0.1, VerticalAnchor::Top));
    let b = cache.get_or_compute("i0", &src, &slot(), &settings).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(b.base_scale, 0.1);

    let mut moved = slot();
    moved.bounds.x = 1.0;
    let c = cache.get_or_compute("i0", &src, &moved, &settings).unwrap();
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().misses, 3);
}

#[test]
fn fingerprints_are_stable_and_input_sensitive() {
    let settings = RemapSettings::default();
    let f0 = fingerprint_inputs(&source(), &slot(), &settings);
    assert_eq!(f0, fingerprint_inputs(&source(), &slot(), &settings));

    let mut src = source();
    src.elements[0].visible = false;
    assert_ne!(f0, fingerprint_inputs(&src, &slot(), &settings));

    let wider = RemapSettings {
        bleed_fraction: 0.1,
    };
    assert_ne!(f0, fingerprint_inputs(&source(), &slot(), &wider));
}

#[test]
fn retain_and_invalidate_drop_entries() {
    let mut cache = PayloadCache::new();
    let settings = RemapSettings::default();
    for id in ["a", "b", "c"] {
        cache.get_or_compute(id, &source(), &slot(), &settings).unwrap();
    }
    cache.retain_instances(["a", "c"]);
    assert_eq!(cache.len(), 2);
    cache.invalidate("a");
    assert_eq!(cache.len(), 1);
    assert!(!cache.is_empty());
}
