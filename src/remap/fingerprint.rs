use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::Bounds;
use crate::remap::payload::SourceContext;
use crate::remap::transform::RemapSettings;
use crate::scene::element::{Element, ElementKind};
use crate::scene::template::TargetSlot;
use crate::strategy::model::{LayoutStrategy, VerticalAnchor};

const XXH3_SEED: u64 = 0x51a7_f17e_0d0c_a11b;

/// Stable fingerprint of everything a payload depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint the inputs of [`crate::compute_payload`].
///
/// Equal fingerprints mean the previous payload can be reused unchanged.
pub fn fingerprint_inputs(
    source: &SourceContext,
    slot: &TargetSlot,
    settings: &RemapSettings,
) -> InputFingerprint {
    let mut h = StableHasher::new();
    h.write_str(&source.document);
    h.write_str(&source.container);
    h.write_str(&source.root_id);
    h.write_bounds(&source.bounds);
    write_elements(&mut h, &source.elements);
    match &source.strategy {
        None => h.write_u8(0),
        Some(s) => {
            h.write_u8(1);
            write_strategy(&mut h, s);
        }
    }
    h.write_str(&slot.id);
    h.write_str(&slot.name);
    h.write_bounds(&slot.bounds);
    h.write_f64(settings.bleed_fraction);
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_bounds(&mut self, b: &Bounds) {
        self.write_f64(b.x);
        self.write_f64(b.y);
        self.write_f64(b.w);
        self.write_f64(b.h);
    }

    fn finish(self) -> InputFingerprint {
        let v = self.inner.digest128();
        InputFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_elements(h: &mut StableHasher, elements: &[Element]) {
    h.write_u64(elements.len() as u64);
    for el in elements {
        h.write_str(&el.id);
        h.write_u8(match el.kind {
            ElementKind::Leaf => 0,
            ElementKind::Group => 1,
        });
        h.write_bool(el.visible);
        h.write_f64(el.opacity);
        h.write_bounds(&el.bounds);
        write_elements(h, &el.children);
    }
}

fn write_strategy(h: &mut StableHasher, s: &LayoutStrategy) {
    h.write_f64(s.suggested_scale);
    h.write_u8(match s.anchor {
        VerticalAnchor::Top => 0,
        VerticalAnchor::Center => 1,
        VerticalAnchor::Bottom => 2,
        VerticalAnchor::Stretch => 3,
    });
    h.write_u64(s.overrides.len() as u64);
    for o in &s.overrides {
        h.write_str(&o.layer_id);
        h.write_f64(o.x_offset);
        h.write_f64(o.y_offset);
        h.write_f64(o.individual_scale);
    }
}
