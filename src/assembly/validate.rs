use std::collections::HashSet;

use crate::foundation::error::{SlotfitError, SlotfitResult};
use crate::remap::payload::Payload;
use crate::scene::template::Template;

/// Category of an assembly violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Payload is connected to a slot other than the one it declares.
    DestinationMismatch,
    /// A second correctly matched payload for an already filled slot.
    DuplicateFill,
    /// A wire's slot handle does not resolve to any template slot.
    UnresolvedSlot,
}

/// One blocking problem found while validating an assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    /// Category.
    pub kind: ViolationKind,
    /// Slot (or unresolved slot handle) the wire is connected to.
    pub slot: String,
    /// Destination the payload declares, when a payload is involved.
    pub declared: Option<String>,
    /// Remap instance feeding the wire.
    pub instance: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Wire whose slot handle did not resolve.
    pub fn unresolved(instance: &str, handle: &str) -> Self {
        Self {
            kind: ViolationKind::UnresolvedSlot,
            slot: handle.to_string(),
            declared: None,
            instance: instance.to_string(),
            message: format!(
                "instance '{instance}' is wired to '{handle}', which matches no template slot"
            ),
        }
    }
}

/// A payload as connected to a concrete slot.
#[derive(Clone, Copy, Debug)]
pub struct WiredPayload<'a> {
    /// Remap instance id.
    pub instance: &'a str,
    /// Name of the slot the wire ends at.
    pub slot: &'a str,
    /// The connected payload.
    pub payload: &'a Payload,
}

/// Readiness of an assembly for export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssemblyReport {
    /// Resolved template name, if any.
    pub template: Option<String>,
    /// Slots in the template.
    pub total_slots: usize,
    /// Slots with exactly one correctly matched payload.
    pub filled_slots: usize,
    /// Names of filled slots, in template order.
    pub filled: Vec<String>,
    /// Names of unfilled slots, in template order.
    pub unfilled: Vec<String>,
    /// Blocking violations.
    pub violations: Vec<Violation>,
}

impl AssemblyReport {
    /// `true` iff a template resolved, it has slots, all are filled and nothing is violated.
    pub fn is_fully_assembled(&self) -> bool {
        self.template.is_some()
            && self.total_slots > 0
            && self.filled_slots == self.total_slots
            && self.violations.is_empty()
    }

    /// Turn a non-ready report into the matching error.
    pub fn ensure_ready(&self) -> SlotfitResult<()> {
        if self.template.is_none() {
            return Err(SlotfitError::validation("no template resolved for assembly"));
        }
        if let Some(v) = self.violations.first() {
            return Err(match (v.kind, &v.declared) {
                (ViolationKind::DestinationMismatch, Some(declared)) => {
                    SlotfitError::DestinationMismatch {
                        slot: v.slot.clone(),
                        declared: declared.clone(),
                    }
                }
                _ => SlotfitError::validation(v.message.clone()),
            });
        }
        if self.total_slots == 0 || self.filled_slots != self.total_slots {
            return Err(SlotfitError::IncompleteAssembly {
                filled: self.filled_slots,
                total: self.total_slots,
            });
        }
        Ok(())
    }
}

/// Cross-check every wired payload's declared destination against its slot.
///
/// A mismatched wire counts as unfilled, never as filled-but-wrong.
#[tracing::instrument(level = "debug", skip_all, fields(wires = wired.len()))]
pub fn validate_assembly(template: Option<&Template>, wired: &[WiredPayload<'_>]) -> AssemblyReport {
    let mut violations = Vec::new();
    let mut filled_names = HashSet::<&str>::new();

    for w in wired {
        let declared = w.payload.target_container.as_str();
        if template.is_some_and(|t| t.slot_by_name(w.slot).is_none()) {
            violations.push(Violation::unresolved(w.instance, w.slot));
            continue;
        }
        if declared != w.slot {
            violations.push(Violation {
                kind: ViolationKind::DestinationMismatch,
                slot: w.slot.to_string(),
                declared: Some(declared.to_string()),
                instance: w.instance.to_string(),
                message: format!(
                    "slot '{}' is wired to instance '{}' whose payload targets '{}'",
                    w.slot, w.instance, declared
                ),
            });
            continue;
        }
        if !filled_names.insert(w.slot) {
            violations.push(Violation {
                kind: ViolationKind::DuplicateFill,
                slot: w.slot.to_string(),
                declared: Some(declared.to_string()),
                instance: w.instance.to_string(),
                message: format!(
                    "slot '{}' already has a payload; instance '{}' is a second one",
                    w.slot, w.instance
                ),
            });
        }
    }

    let (filled, unfilled): (Vec<String>, Vec<String>) = match template {
        Some(t) => t
            .slots
            .iter()
            .map(|s| s.name.clone())
            .partition(|name| filled_names.contains(name.as_str())),
        None => (Vec::new(), Vec::new()),
    };

    for v in &violations {
        tracing::warn!(kind = ?v.kind, slot = %v.slot, "{}", v.message);
    }

    AssemblyReport {
        template: template.map(|t| t.name.clone()),
        total_slots: template.map_or(0, |t| t.slots.len()),
        filled_slots: filled.len(),
        filled,
        unfilled,
        violations,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/validate.rs"]
mod tests;
