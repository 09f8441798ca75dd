use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Bounds, Canvas};
use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::foundation::math::{OPACITY_MAX, opacity_to_unit};
use crate::scene::element::{Element, ElementKind};

/// Container name that selects the whole document canvas as the source.
pub const CANVAS_CONTAINER: &str = "@canvas";

/// Heavy layer as stored in a document.
///
/// Everything the remap engine does not understand (styling, text/image data, effects)
/// rides along in `content` and `blend_mode` and is copied verbatim on reconstruction.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    /// Stable identifier, unique within the document.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Leaf or group.
    pub kind: ElementKind,
    /// Layer rect in document space.
    pub bounds: Bounds,
    /// Hidden flag (inverse of element visibility).
    #[serde(default)]
    pub hidden: bool,
    /// Opacity in `0..=255`.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Blend mode key, opaque to the engine.
    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,
    /// Group expansion state in the editor.
    #[serde(default)]
    pub expanded: bool,
    /// Opaque layer payload (text, image reference, styling...).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub content: serde_json::Value,
    /// Ordered children (groups only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Layer>,
}

fn default_opacity() -> u8 {
    OPACITY_MAX
}

fn default_blend_mode() -> String {
    "normal".to_string()
}

impl Layer {
    /// Copy every property except `children`.
    pub fn shallow_clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            bounds: self.bounds,
            hidden: self.hidden,
            opacity: self.opacity,
            blend_mode: self.blend_mode.clone(),
            expanded: self.expanded,
            content: self.content.clone(),
            children: Vec::new(),
        }
    }

    /// Synthetic expanded group wrapping `children`.
    pub fn synthetic_group(
        id: impl Into<String>,
        name: impl Into<String>,
        bounds: Bounds,
        children: Vec<Layer>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: ElementKind::Group,
            bounds,
            hidden: false,
            opacity: OPACITY_MAX,
            blend_mode: default_blend_mode(),
            expanded: true,
            content: serde_json::Value::Null,
            children,
        }
    }
}

/// A loaded document: canvas plus top-level layers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Document identifier referenced by wiring.
    pub id: String,
    /// Canvas dimensions.
    pub canvas: Canvas,
    /// Top-level layers, bottom-most first.
    #[serde(default)]
    pub children: Vec<Layer>,
}

/// Source container located inside a [`Document`].
#[derive(Clone, Copy, Debug)]
pub struct ContainerRef<'a> {
    /// Container layer id (the document id for [`CANVAS_CONTAINER`]).
    pub id: &'a str,
    /// Container rect, the source rect of a remap.
    pub bounds: Bounds,
    /// Layers to remap.
    pub children: &'a [Layer],
}

impl Document {
    /// Parse a document from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlotfitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SlotfitError::serde(format!("parse document JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlotfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlotfitError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate layer invariants. Duplicate ids are reported by [`DocumentIndex::build`].
    pub fn validate(&self) -> SlotfitResult<()> {
        if self.id.trim().is_empty() {
            return Err(SlotfitError::validation("document id must be non-empty"));
        }
        let mut stack: Vec<&Layer> = self.children.iter().collect();
        while let Some(layer) = stack.pop() {
            if layer.id.trim().is_empty() {
                return Err(SlotfitError::validation(format!(
                    "document '{}': layer id must be non-empty",
                    self.id
                )));
            }
            layer.bounds.validate()?;
            if layer.kind == ElementKind::Leaf && !layer.children.is_empty() {
                return Err(SlotfitError::validation(format!(
                    "document '{}': leaf layer '{}' must not have children",
                    self.id, layer.id
                )));
            }
            stack.extend(layer.children.iter());
        }
        DocumentIndex::build(self).map(|_| ())
    }

    /// Locate a source container: a group layer by name (depth-first, first match),
    /// or the whole canvas for an empty name or [`CANVAS_CONTAINER`].
    pub fn find_container(&self, name: &str) -> Option<ContainerRef<'_>> {
        if name.is_empty() || name == CANVAS_CONTAINER {
            return Some(ContainerRef {
                id: &self.id,
                bounds: self.canvas.bounds(),
                children: &self.children,
            });
        }
        find_group(&self.children, name).map(|layer| ContainerRef {
            id: &layer.id,
            bounds: layer.bounds,
            children: &layer.children,
        })
    }
}

fn find_group<'a>(layers: &'a [Layer], name: &str) -> Option<&'a Layer> {
    for layer in layers {
        if layer.kind == ElementKind::Group && layer.name == name {
            return Some(layer);
        }
        if let Some(found) = find_group(&layer.children, name) {
            return Some(found);
        }
    }
    None
}

/// Extract the lightweight element tree from heavy layers.
pub fn extract_elements(layers: &[Layer]) -> Vec<Element> {
    layers
        .iter()
        .map(|layer| Element {
            id: layer.id.clone(),
            kind: layer.kind,
            visible: !layer.hidden,
            opacity: opacity_to_unit(layer.opacity),
            bounds: layer.bounds,
            children: if layer.kind == ElementKind::Group {
                extract_elements(&layer.children)
            } else {
                Vec::new()
            },
        })
        .collect()
}

/// Identifier to layer index over one document, built once per load.
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    document: &'a str,
    by_id: HashMap<&'a str, &'a Layer>,
}

impl<'a> DocumentIndex<'a> {
    /// Index every layer of `doc`. Duplicate ids are rejected.
    pub fn build(doc: &'a Document) -> SlotfitResult<Self> {
        let mut by_id = HashMap::<&'a str, &'a Layer>::new();
        let mut stack: Vec<&'a Layer> = doc.children.iter().collect();
        while let Some(layer) = stack.pop() {
            if by_id.insert(layer.id.as_str(), layer).is_some() {
                return Err(SlotfitError::validation(format!(
                    "document '{}': duplicate layer id '{}'",
                    doc.id, layer.id
                )));
            }
            stack.extend(layer.children.iter());
        }
        Ok(Self {
            document: &doc.id,
            by_id,
        })
    }

    /// Id of the indexed document.
    pub fn document_id(&self) -> &'a str {
        self.document
    }

    /// Look up a layer by id.
    pub fn get(&self, id: &str) -> Option<&'a Layer> {
        self.by_id.get(id).copied()
    }

    /// Look up a layer by id, failing with [`SlotfitError::MissingOriginalContent`].
    pub fn require(&self, id: &str) -> SlotfitResult<&'a Layer> {
        self.get(id)
            .ok_or_else(|| SlotfitError::missing_content(self.document, id))
    }

    /// Number of indexed layers.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Return `true` for a document without layers.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Validated documents keyed by id.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    docs: BTreeMap<String, Document>,
}

impl DocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a document. Ids must be unique.
    pub fn insert(&mut self, doc: Document) -> SlotfitResult<()> {
        doc.validate()?;
        if self.docs.contains_key(&doc.id) {
            return Err(SlotfitError::validation(format!(
                "duplicate document '{}'",
                doc.id
            )));
        }
        self.docs.insert(doc.id.clone(), doc);
        Ok(())
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    /// Documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
