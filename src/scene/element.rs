use std::collections::HashSet;

use crate::foundation::core::Bounds;
use crate::foundation::error::{SlotfitError, SlotfitResult};

/// Whether an element holds children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Terminal element (pixels, text, shape).
    Leaf,
    /// Grouping element with ordered children.
    Group,
}

/// Lightweight source element extracted from a document.
///
/// Carries only what the remap math needs; heavy content stays in the
/// original [`crate::Layer`] and is rejoined by `id` during reconstruction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Element {
    /// Stable identifier, unique within its document.
    pub id: String,
    /// Leaf or group.
    pub kind: ElementKind,
    /// Visibility flag.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Bounding rect in source document space.
    pub bounds: Bounds,
    /// Ordered children (groups only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

impl Element {
    /// Visible, opaque leaf.
    pub fn leaf(id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Leaf,
            visible: true,
            opacity: 1.0,
            bounds,
            children: Vec::new(),
        }
    }

    /// Visible, opaque group.
    pub fn group(id: impl Into<String>, bounds: Bounds, children: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            kind: ElementKind::Group,
            visible: true,
            opacity: 1.0,
            bounds,
            children,
        }
    }

    /// Return `true` for group elements.
    pub fn is_group(&self) -> bool {
        self.kind == ElementKind::Group
    }

    /// Validate a forest: unique ids, sane opacity, valid bounds, leaves without children.
    pub fn validate_forest(elements: &[Element]) -> SlotfitResult<()> {
        let mut seen = HashSet::<&str>::new();
        let mut stack: Vec<&Element> = elements.iter().rev().collect();
        while let Some(el) = stack.pop() {
            if el.id.trim().is_empty() {
                return Err(SlotfitError::validation("element id must be non-empty"));
            }
            if !seen.insert(el.id.as_str()) {
                return Err(SlotfitError::validation(format!(
                    "duplicate element id '{}'",
                    el.id
                )));
            }
            if !el.opacity.is_finite() || !(0.0..=1.0).contains(&el.opacity) {
                return Err(SlotfitError::validation(format!(
                    "element '{}' opacity must be within [0, 1]",
                    el.id
                )));
            }
            el.bounds.validate()?;
            if el.kind == ElementKind::Leaf && !el.children.is_empty() {
                return Err(SlotfitError::validation(format!(
                    "leaf element '{}' must not have children",
                    el.id
                )));
            }
            stack.extend(el.children.iter().rev());
        }
        Ok(())
    }
}

/// Scale and offset actually applied to one element.
///
/// Offsets are the final top-left position, not a delta.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppliedTransform {
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Final left edge.
    pub offset_x: f64,
    /// Final top edge.
    pub offset_y: f64,
}

/// An [`Element`] placed into target space.
///
/// Same id, kind and child order as its source element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformedElement {
    /// Source element id.
    pub id: String,
    /// Source element kind.
    pub kind: ElementKind,
    /// Source visibility.
    pub visible: bool,
    /// Source opacity in `[0, 1]`.
    pub opacity: f64,
    /// Resolved rect in target space.
    pub bounds: Bounds,
    /// Transform that produced `bounds`.
    pub applied: AppliedTransform,
    /// Transformed children in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TransformedElement>,
}

impl TransformedElement {
    /// Return `true` for group elements.
    pub fn is_group(&self) -> bool {
        self.kind == ElementKind::Group
    }

    /// Depth-first search for `id` in a transformed forest.
    pub fn find<'a>(elements: &'a [TransformedElement], id: &str) -> Option<&'a TransformedElement> {
        for el in elements {
            if el.id == id {
                return Some(el);
            }
            if let Some(found) = Self::find(&el.children, id) {
                return Some(found);
            }
        }
        None
    }

    /// Total number of elements in a transformed forest.
    pub fn count(elements: &[TransformedElement]) -> usize {
        elements
            .iter()
            .map(|el| 1 + Self::count(&el.children))
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/element.rs"]
mod tests;
