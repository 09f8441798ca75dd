use super::*;
use crate::foundation::core::{Bounds, Canvas, Size};
use crate::remap::payload::PayloadMetrics;
use crate::scene::template::TargetSlot;

fn template(n: usize) -> Template {
    Template {
        name: "grid".to_string(),
        canvas: Canvas {
            width: 100,
            height: 100,
        },
        slots: (0..n)
            .map(|i| TargetSlot {
                id: format!("s{i}"),
                name: format!("cell{i}"),
                original_name: String::new(),
                bounds: Bounds::default(),
            })
            .collect(),
    }
}

fn payload(target: &str) -> Payload {
    Payload {
        source_document: "d".to_string(),
        source_root_id: "r".to_string(),
        source_container: "c".to_string(),
        target_container: target.to_string(),
        elements: Vec::new(),
        base_scale: 1.0,
        metrics: PayloadMetrics {
            source_size: Size::ZERO,
            target_size: Size::ZERO,
        },
        duplicate_overrides: Vec::new(),
    }
}

#[test]
fn one_mismatched_wire_blocks_export() {
    let n = 4;
    let t = template(n);
    let payloads: Vec<Payload> = (0..n)
        .map(|i| {
            if i == 2 {
                payload("cell0")
            } else {
                payload(&format!("cell{i}"))
            }
        })
        .collect();
    let names: Vec<String> = (0..n).map(|i| format!("cell{i}")).collect();
    let instances: Vec<String> = (0..n).map(|i| format!("r{i}")).collect();
    let wired: Vec<WiredPayload<'_>> = (0..n)
        .map(|i| WiredPayload {
            instance: &instances[i],
            slot: &names[i],
            payload: &payloads[i],
        })
        .collect();

    let report = validate_assembly(Some(&t), &wired);
    assert_eq!(report.filled_slots, n - 1);
    assert_eq!(report.violations.len(), 1);
    assert!(!report.is_fully_assembled());

    let v = &report.violations[0];
    assert_eq!(v.kind, ViolationKind::DestinationMismatch);
    assert_eq!(v.slot, "cell2");
    assert_eq!(v.declared.as_deref(), Some("cell0"));
    assert_eq!(v.instance, "r2");
    assert!(v.message.contains("cell2"));
    assert_eq!(report.unfilled, vec!["cell2".to_string()]);

    assert!(matches!(
        report.ensure_ready(),
        Err(SlotfitError::DestinationMismatch { ref slot, ref declared })
            if slot == "cell2" && declared == "cell0"
    ));
}

#[test]
fn fully_matched_assembly_is_ready() {
    let t = template(2);
    let p0 = payload("cell0");
    let p1 = payload("cell1");
    let wired = [
        WiredPayload {
            instance: "a",
            slot: "cell1",
            payload: &p1,
        },
        WiredPayload {
            instance: "b",
            slot: "cell0",
            payload: &p0,
        },
    ];
    let report = validate_assembly(Some(&t), &wired);
    assert!(report.is_fully_assembled());
    assert_eq!(report.filled, vec!["cell0".to_string(), "cell1".to_string()]);
    report.ensure_ready().unwrap();
}

#[test]
fn missing_wires_are_incomplete_not_violations() {
    let t = template(3);
    let p0 = payload("cell0");
    let wired = [WiredPayload {
        instance: "a",
        slot: "cell0",
        payload: &p0,
    }];
    let report = validate_assembly(Some(&t), &wired);
    assert!(report.violations.is_empty());
    assert_eq!(report.filled_slots, 1);
    assert!(!report.is_fully_assembled());
    assert!(matches!(
        report.ensure_ready(),
        Err(SlotfitError::IncompleteAssembly {
            filled: 1,
            total: 3
        })
    ));
}

#[test]
fn second_payload_for_a_slot_is_a_violation() {
    let t = template(1);
    let p0 = payload("cell0");
    let p1 = payload("cell0");
    let wired = [
        WiredPayload {
            instance: "a",
            slot: "cell0",
            payload: &p0,
        },
        WiredPayload {
            instance: "b",
            slot: "cell0",
            payload: &p1,
        },
    ];
    let report = validate_assembly(Some(&t), &wired);
    assert_eq!(report.filled_slots, 1);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::DuplicateFill);
    assert!(!report.is_fully_assembled());
}

#[test]
fn wire_to_unknown_slot_is_unresolved() {
    let t = template(1);
    let p0 = payload("ghost");
    let wired = [WiredPayload {
        instance: "a",
        slot: "ghost",
        payload: &p0,
    }];
    let report = validate_assembly(Some(&t), &wired);
    assert_eq!(report.violations[0].kind, ViolationKind::UnresolvedSlot);
    assert_eq!(report.filled_slots, 0);
}

#[test]
fn empty_or_missing_template_is_never_ready() {
    let empty = template(0);
    let report = validate_assembly(Some(&empty), &[]);
    assert!(!report.is_fully_assembled());
    assert!(matches!(
        report.ensure_ready(),
        Err(SlotfitError::IncompleteAssembly { filled: 0, total: 0 })
    ));

    let report = validate_assembly(None, &[]);
    assert!(report.template.is_none());
    assert!(!report.is_fully_assembled());
    assert!(matches!(report.ensure_ready(), Err(SlotfitError::Validation(_))));
}
