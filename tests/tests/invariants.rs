//! Algebraic properties of the step combinators.

use proptest::prelude::*;
use serde_json::json;
use sluice::{schema, types, HashSchema, Kind, Type, Value};
use tests::val;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn arbitrary_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar(),
        proptest::collection::vec(scalar(), 0..4).prop_map(Value::Array),
    ]
}

fn plus(n: i64) -> Type {
    types::any().transform(Kind::Integer, move |v| {
        Value::Int(v.as_int().unwrap_or_default().wrapping_add(n))
    })
}

proptest! {
    #[test]
    fn any_is_the_identity(v in arbitrary_value()) {
        let outcome = types::any().resolve(v.clone());
        prop_assert!(outcome.is_valid());
        prop_assert_eq!(outcome.value(), &v);
    }

    #[test]
    fn sequencing_is_associative_on_the_valid_path(v in any::<i64>()) {
        let (a, b, c) = (plus(1), plus(10), plus(100));
        let left = ((a.clone() >> b.clone()) >> c.clone()).resolve(v);
        let right = (a >> (b >> c)).resolve(v);
        prop_assert_eq!(left, right);
    }

    #[test]
    fn union_is_left_biased(v in arbitrary_value()) {
        let a = types::integer();
        let b = types::any();
        let direct = a.clone().resolve(v.clone());
        if direct.is_valid() {
            prop_assert_eq!((a | b).resolve(v), direct);
        }
    }

    #[test]
    fn halts_are_sticky_in_sequences(v in "[a-z]{1,8}") {
        let a = types::integer();
        let direct = a.clone().resolve(v.as_str());
        let chained = (a >> types::any()).resolve(v.as_str());
        prop_assert!(chained.is_halt());
        prop_assert_eq!(chained.errors(), direct.errors());
    }

    #[test]
    fn defaults_only_fill_undefined(v in arbitrary_value()) {
        let plain = types::any();
        let defaulted = plain.clone().default("d");
        prop_assert_eq!(defaulted.resolve(v.clone()), plain.resolve(v));
    }
}

#[test]
fn defaults_fill_undefined() {
    let defaulted = types::string().default("d");
    let outcome = defaulted.resolve(Value::Undefined);
    assert!(outcome.is_valid());
    assert_eq!(outcome.value(), &Value::from("d"));
}

#[test]
fn presence_halts_exactly_on_blanks() {
    let blanks = [
        Value::Undefined,
        Value::Null,
        val(json!("")),
        val(json!([])),
        val(json!({})),
    ];
    for blank in blanks {
        assert!(types::present().resolve(blank).is_halt());
    }
    for present in [val(json!("x")), val(json!(0)), val(json!([0])), val(json!(false))] {
        assert!(types::present().resolve(present.clone()).is_valid(), "{present}");
    }
}

#[test]
fn hash_schemas_project_declared_keys() {
    let user = schema! { "name" => types::string() };
    let outcome = user.resolve(val(json!({"name": "a", "x": 1, "y": 2})));
    assert_eq!(outcome.value(), &val(json!({"name": "a"})));
}

#[test]
fn merged_schemas_union_keys_and_prefer_the_right() {
    let s1 = schema! { "a" => types::string(), "b" => types::string() };
    let s2 = schema! { "b" => types::integer(), "c" => types::integer() };
    let merged = s1 + s2;
    let keys: Vec<String> = merged.keys().iter().map(|k| k.name.clone()).collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert!(merged
        .resolve(val(json!({"a": "x", "b": 1, "c": 2})))
        .is_valid());
    assert!(merged
        .resolve(val(json!({"a": "x", "b": "not an int", "c": 2})))
        .is_halt());
}

#[test]
fn intersected_schemas_keep_common_keys_with_right_types() {
    let s1 = schema! { "a" => types::string(), "b" => types::string() };
    let s2 = schema! { "b" => types::integer(), "c" => types::integer() };
    let both = s1 & s2;
    let keys: Vec<String> = both.keys().iter().map(|k| k.name.clone()).collect();
    assert_eq!(keys, ["b"]);
    assert_eq!(
        both.resolve(val(json!({"a": "x", "b": 3}))).value(),
        &val(json!({"b": 3}))
    );
}

#[test]
fn tagged_hashes_route_to_the_declared_variant() {
    let tagged = HashSchema::any()
        .tagged_by(
            "kind",
            vec![
                schema! { "kind" => "a", "n" => types::integer() },
                schema! { "kind" => "b", "s" => types::string() },
            ],
        )
        .unwrap();
    assert!(tagged.resolve(val(json!({"kind": "a", "n": 1}))).is_valid());
    assert!(tagged.resolve(val(json!({"kind": "b", "s": "x"}))).is_valid());
    // routed to the "a" variant, which rejects a string n
    assert!(tagged.resolve(val(json!({"kind": "a", "n": "x"}))).is_halt());
}

#[test]
fn primitive_json_schemas() {
    use sluice::JsonSchemaVisitor;
    let visit = |ty: &Type| JsonSchemaVisitor.visit_node(&ty.ast());
    assert_eq!(visit(&types::string()), json!({"type": "string"}));
    assert_eq!(visit(&types::integer()), json!({"type": "integer"}));
    assert_eq!(visit(&types::decimal()), json!({"type": "number"}));
    assert_eq!(visit(&types::boolean()), json!({"type": "boolean"}));
}
