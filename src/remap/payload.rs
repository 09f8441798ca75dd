use crate::foundation::core::{Bounds, Size, Vec2};
use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::remap::resolve::resolve_transform;
use crate::remap::transform::{RemapSettings, TreeTransform};
use crate::scene::document::{Document, extract_elements};
use crate::scene::element::{Element, TransformedElement};
use crate::scene::template::TargetSlot;
use crate::strategy::model::{LayoutStrategy, OverrideIndex};

/// Everything one remap reads from its source side.
///
/// The optional strategy travels with the source instead of living in shared state, so
/// a payload is a pure function of this value, the target slot and the settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SourceContext {
    /// Source document id.
    pub document: String,
    /// Declared source container name.
    pub container: String,
    /// Id of the container layer the elements were taken from.
    pub root_id: String,
    /// Source rect.
    pub bounds: Bounds,
    /// Lightweight element forest.
    pub elements: Vec<Element>,
    /// Optional placement override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<LayoutStrategy>,
}

impl SourceContext {
    /// Extract the source context for `container` from a loaded document.
    pub fn from_document(
        doc: &Document,
        container: &str,
        strategy: Option<LayoutStrategy>,
    ) -> SlotfitResult<Self> {
        let found = doc
            .find_container(container)
            .ok_or_else(|| SlotfitError::missing_source(&doc.id, container))?;
        Ok(Self {
            document: doc.id.clone(),
            container: container.to_string(),
            root_id: found.id.to_string(),
            bounds: found.bounds,
            elements: extract_elements(found.children),
            strategy,
        })
    }
}

/// Source and target sizes of a remap, for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PayloadMetrics {
    /// Source rect size.
    pub source_size: Size,
    /// Target rect size.
    pub target_size: Size,
}

/// Result of one remap: the transformed tree and its declared destination.
///
/// Payloads are immutable; any input change produces a new one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Payload {
    /// Source document id.
    pub source_document: String,
    /// Source element-tree root id.
    pub source_root_id: String,
    /// Declared source container name.
    pub source_container: String,
    /// Declared destination slot name.
    pub target_container: String,
    /// Transformed element forest.
    pub elements: Vec<TransformedElement>,
    /// Base scale used for the whole tree.
    pub base_scale: f64,
    /// Size diagnostics.
    pub metrics: PayloadMetrics,
    /// Element ids that had more than one override (first one applied).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_overrides: Vec<String>,
}

/// Run resolver then tree transformer for one source/slot pair.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(document = %source.document, container = %source.container, slot = %slot.name)
)]
pub fn compute_payload(
    source: &SourceContext,
    slot: &TargetSlot,
    settings: &RemapSettings,
) -> SlotfitResult<Payload> {
    let strategy = source.strategy.as_ref();
    let params = resolve_transform(&source.bounds, &slot.bounds, strategy)?;

    Element::validate_forest(&source.elements)?;
    let overrides = OverrideIndex::build(strategy);
    let tree = TreeTransform::new(source.bounds, slot.bounds, params, &overrides, settings)?;
    let elements = tree.apply(&source.elements, Vec2::ZERO);

    tracing::debug!(
        scale = params.scale,
        elements = TransformedElement::count(&elements),
        "payload computed"
    );

    Ok(Payload {
        source_document: source.document.clone(),
        source_root_id: source.root_id.clone(),
        source_container: source.container.clone(),
        target_container: slot.name.clone(),
        elements,
        base_scale: params.scale,
        metrics: PayloadMetrics {
            source_size: source.bounds.size(),
            target_size: slot.bounds.size(),
        },
        duplicate_overrides: overrides
            .duplicates()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/remap/payload.rs"]
mod tests;
