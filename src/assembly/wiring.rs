use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::strategy::model::LayoutStrategy;

/// Where a remap instance reads its elements from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceRef {
    /// Source document id.
    pub document: String,
    /// Container group name, or empty / `@canvas` for the whole document.
    #[serde(default)]
    pub container: String,
}

/// One remap node: a source tree placed into the slot `target` resolves to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemapInstance {
    /// Instance id, unique within the wiring.
    pub id: String,
    /// Source side.
    pub source: SourceRef,
    /// Opaque target handle, resolved against the template's slots.
    pub target: String,
    /// Optional externally produced strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<LayoutStrategy>,
}

/// Connection from a remap instance's payload to an export slot.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotWire {
    /// Remap instance id.
    pub instance: String,
    /// Opaque slot handle, resolved against the template's slots.
    pub slot: String,
}

/// Graph topology of one assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Wiring {
    /// Name of the template being filled.
    pub template: String,
    /// Remap instances.
    #[serde(default)]
    pub instances: Vec<RemapInstance>,
    /// Payload to slot connections.
    #[serde(default)]
    pub wires: Vec<SlotWire>,
}

impl Wiring {
    /// Parse wiring from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlotfitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SlotfitError::serde(format!("parse wiring JSON: {e}")))
    }

    /// Parse wiring from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlotfitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlotfitError::validation(format!("open wiring JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate instance ids and wire references.
    pub fn validate(&self) -> SlotfitResult<()> {
        let mut ids = HashSet::<&str>::new();
        for inst in &self.instances {
            if inst.id.trim().is_empty() {
                return Err(SlotfitError::validation("remap instance id must be non-empty"));
            }
            if !ids.insert(inst.id.as_str()) {
                return Err(SlotfitError::validation(format!(
                    "duplicate remap instance '{}'",
                    inst.id
                )));
            }
        }
        for wire in &self.wires {
            if !ids.contains(wire.instance.as_str()) {
                return Err(SlotfitError::validation(format!(
                    "wire references unknown remap instance '{}'",
                    wire.instance
                )));
            }
        }
        Ok(())
    }

    /// Look up an instance by id.
    pub fn instance(&self, id: &str) -> Option<&RemapInstance> {
        self.instances.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/wiring.rs"]
mod tests;
