use super::*;

fn b(x: f64, y: f64, w: f64, h: f64) -> Bounds {
    Bounds { x, y, w, h }
}

fn layer(id: &str, kind: ElementKind, bounds: Bounds, children: Vec<Layer>) -> Layer {
    Layer {
        id: id.to_string(),
        name: id.to_string(),
        kind,
        bounds,
        hidden: false,
        opacity: 255,
        blend_mode: "normal".to_string(),
        expanded: false,
        content: serde_json::Value::Null,
        children,
    }
}

fn doc() -> Document {
    Document {
        id: "poster".to_string(),
        canvas: Canvas {
            width: 200,
            height: 400,
        },
        children: vec![
            layer("bg", ElementKind::Leaf, b(0.0, 0.0, 200.0, 400.0), vec![]),
            layer(
                "card",
                ElementKind::Group,
                b(20.0, 40.0, 160.0, 200.0),
                vec![
                    layer("photo", ElementKind::Leaf, b(20.0, 40.0, 160.0, 120.0), vec![]),
                    layer("caption", ElementKind::Leaf, b(20.0, 170.0, 160.0, 30.0), vec![]),
                ],
            ),
        ],
    }
}

#[test]
fn index_resolves_nested_layers() {
    let d = doc();
    let idx = DocumentIndex::build(&d).unwrap();
    assert_eq!(idx.len(), 4);
    assert_eq!(idx.get("caption").unwrap().bounds.y, 170.0);
    assert_eq!(idx.document_id(), "poster");
    let err = idx.require("ghost").unwrap_err();
    assert!(matches!(
        err,
        SlotfitError::MissingOriginalContent { ref id, .. } if id == "ghost"
    ));
}

#[test]
fn index_rejects_duplicate_ids() {
    let mut d = doc();
    d.children[1].children[1].id = "photo".to_string();
    assert!(DocumentIndex::build(&d).is_err());
    assert!(d.validate().is_err());
}

#[test]
fn find_container_by_group_name_or_canvas() {
    let d = doc();
    let card = d.find_container("card").unwrap();
    assert_eq!(card.id, "card");
    assert_eq!(card.bounds, b(20.0, 40.0, 160.0, 200.0));
    assert_eq!(card.children.len(), 2);

    let whole = d.find_container(CANVAS_CONTAINER).unwrap();
    assert_eq!(whole.id, "poster");
    assert_eq!(whole.bounds, b(0.0, 0.0, 200.0, 400.0));
    assert_eq!(whole.children.len(), 2);

    assert!(d.find_container("photo").is_none());
    assert!(d.find_container("nope").is_none());
}

#[test]
fn extract_elements_maps_polarity_and_opacity() {
    let mut d = doc();
    d.children[1].children[0].hidden = true;
    d.children[1].children[0].opacity = 51;
    let elements = extract_elements(&d.children);
    assert_eq!(elements.len(), 2);
    let photo = &elements[1].children[0];
    assert_eq!(photo.id, "photo");
    assert!(!photo.visible);
    assert!((photo.opacity - 0.2).abs() < 1e-12);
    assert!(elements[1].is_group());
    Element::validate_forest(&elements).unwrap();
}

#[test]
fn shallow_clone_drops_children_only() {
    let d = doc();
    let mut card = d.children[1].clone();
    card.content = serde_json::json!({ "style": "shadow" });
    let copy = card.shallow_clone();
    assert!(copy.children.is_empty());
    assert_eq!(copy.content, card.content);
    assert_eq!(copy.bounds, card.bounds);
}

#[test]
fn store_rejects_duplicate_documents() {
    let mut store = DocumentStore::new();
    store.insert(doc()).unwrap();
    assert!(store.insert(doc()).is_err());
    assert!(store.get("poster").is_some());
    assert_eq!(store.iter().count(), 1);
}

#[test]
fn document_json_applies_layer_defaults() {
    let json = r#"{
        "id": "d",
        "canvas": { "width": 10, "height": 10 },
        "children": [ { "id": "a", "kind": "leaf", "bounds": { "x": 0, "y": 0, "w": 1, "h": 1 } } ]
    }"#;
    let d = Document::from_reader(json.as_bytes()).unwrap();
    d.validate().unwrap();
    assert_eq!(d.children[0].opacity, 255);
    assert_eq!(d.children[0].blend_mode, "normal");
    assert!(!d.children[0].hidden);
}
