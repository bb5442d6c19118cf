//! End-to-end scenarios across the whole surface.

use serde_json::json;
use sluice::{defer, schema, types, HashSchema, Kind, Type, Value};
use std::sync::OnceLock;
use tests::val;

#[test]
fn schema_with_defaults_and_coercion() {
    tests::init_tracing();
    let user = schema! {
        "title" => types::string().default("Mr"),
        "name" => types::string(),
        "age?" => types::lax::integer(),
        "friend" => schema! { "name" => types::string() },
    };
    let outcome = user.resolve(val(json!({
        "name": "Ismael",
        "age": "42",
        "friend": {"name": "Joe"},
    })));
    assert!(outcome.is_valid(), "got {outcome:?}");
    assert_eq!(
        outcome.value(),
        &val(json!({
            "title": "Mr",
            "name": "Ismael",
            "age": 42,
            "friend": {"name": "Joe"},
        }))
    );
}

#[test]
fn array_with_alternative_transforms() {
    let element = types::integer()
        | types::string().transform(Kind::Integer, |v| {
            Value::Int(v.as_str().and_then(|s| s.parse().ok()).unwrap_or_default())
        });
    let numbers = types::array(element);
    let outcome = numbers.resolve(val(json!([1, 2, "3"])));
    assert!(outcome.is_valid());
    assert_eq!(outcome.value(), &val(json!([1, 2, 3])));
}

#[test]
fn tagged_hash_dispatch_and_miss() {
    let tagged = HashSchema::any()
        .tagged_by(
            "kind",
            vec![
                schema! { "kind" => "t1", "name" => types::string() },
                schema! { "kind" => "t2", "name" => types::string() },
            ],
        )
        .unwrap();

    let hit = tagged.resolve(val(json!({"kind": "t1", "name": "x"})));
    assert!(hit.is_valid());

    let miss = tagged.resolve(val(json!({"kind": "t3", "name": "x"})));
    assert_eq!(
        miss.errors().unwrap().to_string(),
        "expected :kind to be one of t1, t2"
    );
}

#[test]
fn tuple_of_status_flag_and_message() {
    let row = types::tuple([
        types::any().value("ok") | types::any().value("error"),
        types::boolean(),
        types::string(),
    ]);

    assert!(row.resolve(val(json!(["ok", true, "Hi"]))).is_valid());

    let outcome = row.resolve(val(json!(["ok", "nope", "Hi"])));
    let errors = serde_json::to_value(outcome.errors().unwrap()).unwrap();
    assert_eq!(errors, json!({"1": "Must be a Boolean"}));
}

fn linked_list() -> Type {
    static LIST: OnceLock<Type> = OnceLock::new();
    LIST.get_or_init(|| {
        schema! {
            "value" => types::any(),
            "next" => defer(linked_list) | types::null(),
        }
        .to_type()
    })
    .clone()
}

#[test]
fn recursive_hash_round_trips() {
    let input = val(json!({
        "value": 1,
        "next": {"value": 2, "next": {"value": 3, "next": null}},
    }));
    let outcome = linked_list().resolve(input.clone());
    assert!(outcome.is_valid());
    assert_eq!(outcome.value(), &input);

    let bad = linked_list().resolve(val(json!({"value": 1, "next": {"value": 2}})));
    assert!(bad.is_halt());
}

#[test]
fn union_metadata_merges() {
    let ty = types::string() | types::integer().meta([("foo", "bar")]);
    let meta = ty.metadata();
    assert_eq!(
        meta.get("type"),
        Some(&Value::from(vec!["String", "Integer"]))
    );
    assert_eq!(meta.get("foo"), Some(&Value::from("bar")));
}

#[test]
fn parse_surfaces_structured_errors() {
    let user = schema! { "name" => types::string() };
    let err = user.parse(val(json!({"name": 5}))).unwrap_err();
    let payload = serde_json::to_value(&err.errors).unwrap();
    assert_eq!(payload, json!({"name": "Must be a String"}));
}

#[test]
fn pipelines_compose_with_schemas() {
    let audited = sluice::Pipeline::build(|p| {
        p.around(|step, outcome| {
            tracing::trace!("step starting");
            step.call(outcome)
        });
        p.step(schema! { "name" => types::lax::string() }.to_type());
    });
    let outcome = audited.resolve(val(json!({"name": 42})));
    assert_eq!(outcome.value(), &val(json!({"name": "42"})));
}
