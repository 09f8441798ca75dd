use super::*;

const JSON: &str = r##"{
    "template": "story",
    "instances": [
        { "id": "r0", "source": { "document": "poster", "container": "Artboard" }, "target": "hero" },
        {
            "id": "r1",
            "source": { "document": "poster" },
            "target": "#1",
            "strategy": { "suggested_scale": 0.5, "anchor": "TOP" }
        }
    ],
    "wires": [ { "instance": "r0", "slot": "hero" }, { "instance": "r1", "slot": "footer" } ]
}"##;

#[test]
fn wiring_json_parses_and_validates() {
    let w = Wiring::from_reader(JSON.as_bytes()).unwrap();
    w.validate().unwrap();
    assert_eq!(w.template, "story");
    assert_eq!(w.instances[1].source.container, "");
    assert!(w.instances[0].strategy.is_none());
    assert_eq!(w.instances[1].strategy.as_ref().unwrap().suggested_scale, 0.5);
    assert_eq!(w.instance("r1").unwrap().target, "#1");
    assert!(w.instance("r9").is_none());
}

#[test]
fn duplicate_instances_are_rejected() {
    let mut w = Wiring::from_reader(JSON.as_bytes()).unwrap();
    w.instances[1].id = "r0".to_string();
    assert!(w.validate().is_err());
}

#[test]
fn wires_must_reference_known_instances() {
    let mut w = Wiring::from_reader(JSON.as_bytes()).unwrap();
    w.wires.push(SlotWire {
        instance: "ghost".to_string(),
        slot: "hero".to_string(),
    });
    let err = w.validate().unwrap_err();
    assert!(err.to_string().contains("'ghost'"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        Wiring::from_reader("{".as_bytes()),
        Err(SlotfitError::Serde(_))
    ));
}
