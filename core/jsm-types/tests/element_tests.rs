use jsm_types::{ElemId, Element, Field, FieldType, Instance, ObjectType};
use pretty_assertions::assert_eq;
use serde_json::json;

fn queue_type() -> ObjectType {
    ObjectType::new("jira", "Queue")
        .with_field("name", FieldType::String)
        .with_field("id", FieldType::String)
}

// ── ObjectType ───────────────────────────────────────────────────

#[test]
fn object_type_builder() {
    let t = queue_type();
    assert_eq!(t.type_name(), "Queue");
    assert_eq!(t.fields.len(), 2);
    assert_eq!(t.fields["name"], FieldType::String);
}

#[test]
fn field_type_helpers() {
    assert_eq!(FieldType::list(FieldType::Number), FieldType::List(Box::new(FieldType::Number)));
    assert!(FieldType::map(FieldType::Unknown).is_container());
    assert!(!FieldType::Boolean.is_container());
}

#[test]
fn field_type_serde_shape() {
    let json = serde_json::to_value(FieldType::list(FieldType::String)).unwrap();
    assert_eq!(json, json!({"kind": "list", "of": {"kind": "string"}}));
}

// ── Instance ─────────────────────────────────────────────────────

#[test]
fn instance_id_derived_from_type() {
    let inst = Instance::from_json("q1", queue_type(), json!({"name": "All open"}));
    assert_eq!(inst.elem_id(), &ElemId::instance("jira", "Queue", "q1"));
    assert_eq!(inst.type_name(), "Queue");
    assert_eq!(inst.get("name"), Some(&json!("All open")));
}

#[test]
fn instance_from_non_object_is_empty() {
    let inst = Instance::from_json("q1", queue_type(), json!([1, 2, 3]));
    assert!(inst.value().is_empty());
}

#[test]
fn instance_get_is_top_level_only() {
    let inst = Instance::from_json("q1", queue_type(), json!({"columns": {"first": "summary"}}));
    assert_eq!(inst.get("columns"), Some(&json!({"first": "summary"})));
    assert_eq!(inst.get("first"), None);
}

#[test]
fn set_and_remove_value() {
    let mut inst = Instance::from_json("q1", queue_type(), json!({}));
    inst.set_value("id", json!("12"));
    assert_eq!(inst.get("id"), Some(&json!("12")));
    assert_eq!(inst.remove_value("id"), Some(json!("12")));
    assert_eq!(inst.get("id"), None);
}

#[test]
fn retyping_keeps_identity() {
    let inst = Instance::from_json("q1", queue_type(), json!({"name": "x"}));
    let id = inst.elem_id().clone();
    let value = inst.value().clone();

    let retyped = inst.into_retyped(ObjectType::new("jira", "QueueDeploy"), value);
    assert_eq!(retyped.elem_id(), &id);
    assert_eq!(retyped.type_name(), "Queue");
    assert_eq!(retyped.ref_type().type_name(), "QueueDeploy");
}

// ── Element ──────────────────────────────────────────────────────

#[test]
fn element_ids_per_variant() {
    let inst = Instance::from_json("q1", queue_type(), json!({}));
    assert_eq!(Element::from(inst).elem_id().to_string(), "jira.Queue.instance.q1");

    assert_eq!(Element::from(queue_type()).elem_id().to_string(), "jira.Queue");

    let field = Field {
        parent: ElemId::new_type("jira", "Queue"),
        name: "jql".into(),
        field_type: FieldType::String,
    };
    let element = Element::from(field);
    assert_eq!(element.elem_id().to_string(), "jira.Queue.field.jql");
    assert_eq!(element.type_name(), "Queue");
    assert!(!element.is_instance());
    assert!(element.as_instance().is_none());
}

#[test]
fn instance_serde_roundtrip() {
    let inst = Instance::from_json("q1", queue_type(), json!({"name": "All", "id": 4}));
    let json = serde_json::to_string(&Element::from(inst.clone())).unwrap();
    let back: Element = serde_json::from_str(&json).unwrap();
    assert_eq!(back.as_instance(), Some(&inst));
}
