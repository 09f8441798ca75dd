use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::foundation::math::opacity_to_u8;
use crate::remap::payload::Payload;
use crate::scene::document::{Document, DocumentIndex, DocumentStore, Layer};
use crate::scene::element::TransformedElement;
use crate::scene::template::{TargetSlot, Template};

/// Prefix of the synthetic group id wrapping each filled slot.
pub const SLOT_GROUP_ID_PREFIX: &str = "slot:";

/// Rebuild heavy layers for a transformed forest.
///
/// Each layer is a shallow copy of its original (looked up by id) with bounds,
/// visibility, opacity and children replaced. Groups always come out expanded.
/// An id missing from `index` fails the whole call.
pub fn reconstruct(
    transformed: &[TransformedElement],
    index: &DocumentIndex<'_>,
) -> SlotfitResult<Vec<Layer>> {
    transformed
        .iter()
        .map(|t| {
            let original = index.require(&t.id)?;
            let mut layer = original.shallow_clone();
            layer.bounds = t.bounds;
            layer.hidden = !t.visible;
            layer.opacity = opacity_to_u8(t.opacity);
            if t.is_group() {
                layer.expanded = true;
                layer.children = reconstruct(&t.children, index)?;
            }
            Ok(layer)
        })
        .collect()
}

/// A payload paired with the slot it fills.
#[derive(Clone, Copy, Debug)]
pub struct SlotFill<'a> {
    /// Destination slot.
    pub slot: &'a TargetSlot,
    /// Payload wired into it.
    pub payload: &'a Payload,
}

/// Build the output document for `template`.
///
/// Every filled slot becomes one expanded group named after the slot's original name,
/// placed at the slot bounds, holding the reconstructed payload. Groups follow template
/// slot order regardless of the order of `fills`. Any failure aborts the whole build.
#[tracing::instrument(level = "debug", skip_all, fields(template = %template.name, fills = fills.len()))]
pub fn build_output(
    template: &Template,
    fills: &[SlotFill<'_>],
    documents: &DocumentStore,
) -> SlotfitResult<Document> {
    let mut indexes = HashMap::<&str, DocumentIndex<'_>>::new();
    let mut children = Vec::with_capacity(fills.len());

    for slot in &template.slots {
        let Some(fill) = fills.iter().find(|f| f.slot.name == slot.name) else {
            continue;
        };
        let payload = fill.payload;
        let doc = documents
            .get(&payload.source_document)
            .ok_or_else(|| SlotfitError::missing_document(&payload.source_document))?;
        if doc.find_container(&payload.source_container).is_none() {
            return Err(SlotfitError::missing_source(
                &payload.source_document,
                &payload.source_container,
            ));
        }

        let index = match indexes.entry(doc.id.as_str()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(DocumentIndex::build(doc)?),
        };
        let content = reconstruct(&payload.elements, index)?;

        children.push(Layer::synthetic_group(
            format!("{SLOT_GROUP_ID_PREFIX}{}", slot.id),
            slot.display_name(),
            slot.bounds,
            content,
        ));
    }

    tracing::debug!(groups = children.len(), "output document built");

    Ok(Document {
        id: template.name.clone(),
        canvas: template.canvas,
        children,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/reconstruct/hierarchy.rs"]
mod tests;
