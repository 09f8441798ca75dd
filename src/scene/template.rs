use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Bounds, Canvas};
use crate::foundation::error::{SlotfitError, SlotfitResult};

/// A named destination region of a [`Template`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetSlot {
    /// Opaque slot identifier.
    pub id: String,
    /// Semantic name; unique within its template and used for destination checks.
    pub name: String,
    /// Human-authored name, used for the synthetic output group.
    #[serde(default)]
    pub original_name: String,
    /// Slot rect in template canvas space.
    pub bounds: Bounds,
}

impl TargetSlot {
    /// Name used for the output group (`original_name`, falling back to `name`).
    pub fn display_name(&self) -> &str {
        if self.original_name.trim().is_empty() {
            &self.name
        } else {
            &self.original_name
        }
    }
}

/// Ordered set of target slots on a canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Template name, used as the registry key.
    pub name: String,
    /// Overall canvas size.
    pub canvas: Canvas,
    /// Slots in authoring order; this order drives output ordering.
    pub slots: Vec<TargetSlot>,
}

impl Template {
    /// Parse a template from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlotfitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SlotfitError::serde(format!("parse template JSON: {e}")))
    }

    /// Parse a template from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlotfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlotfitError::validation(format!("open template JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate slot invariants: unique non-empty names and ids, valid bounds.
    pub fn validate(&self) -> SlotfitResult<()> {
        if self.name.trim().is_empty() {
            return Err(SlotfitError::validation("template name must be non-empty"));
        }
        let mut names = HashSet::<&str>::new();
        let mut ids = HashSet::<&str>::new();
        for slot in &self.slots {
            if slot.name.trim().is_empty() {
                return Err(SlotfitError::validation(format!(
                    "template '{}': slot name must be non-empty",
                    self.name
                )));
            }
            if !names.insert(slot.name.as_str()) {
                return Err(SlotfitError::validation(format!(
                    "template '{}': duplicate slot name '{}'",
                    self.name, slot.name
                )));
            }
            if !ids.insert(slot.id.as_str()) {
                return Err(SlotfitError::validation(format!(
                    "template '{}': duplicate slot id '{}'",
                    self.name, slot.id
                )));
            }
            slot.bounds.validate()?;
        }
        Ok(())
    }

    /// Look up a slot by its semantic name.
    pub fn slot_by_name(&self, name: &str) -> Option<&TargetSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Position of the slot named `name`.
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }
}

/// Validated templates keyed by name.
#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a template. Names must be unique.
    pub fn insert(&mut self, template: Template) -> SlotfitResult<()> {
        template.validate()?;
        if self.templates.contains_key(&template.name) {
            return Err(SlotfitError::validation(format!(
                "duplicate template '{}'",
                template.name
            )));
        }
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Return `true` when no template is registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/template.rs"]
mod tests;
