use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlotfitError::geometry("x")
            .to_string()
            .contains("invalid geometry:")
    );
    assert!(
        SlotfitError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlotfitError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn structured_variants_carry_context() {
    let err = SlotfitError::missing_content("doc-a", "layer-7");
    let msg = err.to_string();
    assert!(msg.contains("layer-7"));
    assert!(msg.contains("doc-a"));

    let err = SlotfitError::DestinationMismatch {
        slot: "Hero".to_string(),
        declared: "Footer".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("'Hero'"));
    assert!(msg.contains("'Footer'"));

    let err = SlotfitError::IncompleteAssembly {
        filled: 2,
        total: 3,
    };
    assert!(err.to_string().contains("2 of 3"));
}

#[test]
fn missing_document_does_not_blame_a_container() {
    let msg = SlotfitError::missing_document("flyer").to_string();
    assert!(msg.contains("'flyer'"));
    assert!(msg.contains("not loaded"));
    assert!(!msg.contains("container"));

    let msg = SlotfitError::missing_source("flyer", "Main").to_string();
    assert!(msg.contains("container 'Main'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlotfitError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
