use json_codable::batch::{self, BatchSettings, InputKind};
use json_codable::naming::ObjectNameStrategy;
use json_codable::{
    BaseType, EmitOptions, Error, FieldType, SchemaOptions, TypeDef, ValueOptions, emit,
    infer_from_schema, infer_from_value,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

fn swift(doc: &Value, options: &EmitOptions) -> String {
    let model = infer_from_value(doc, ValueOptions::default()).unwrap();
    emit(&model.into(), options).unwrap()
}

#[test]
fn sample_document_end_to_end() {
    let doc: Value = serde_json::from_str(
        r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "display_name": "Ada",
            "score": 9.5,
            "is_admin": false,
            "last_login": null,
            "roles": [{ "role_id": 1 }]
        }"#,
    )
    .unwrap();
    let options = EmitOptions { root_name: "Account".into(), ..EmitOptions::default() };
    assert_eq!(swift(&doc, &options), concat!(
        "internal struct Account: Codable {\n",
        "  internal let id: UUID\n",
        "  internal let displayName: String\n",
        "  internal let score: Double\n",
        "  internal let isAdmin: Bool\n",
        "  internal let lastLogin: NSNull\n",
        "  internal let roles: [Roles]\n",
        "  internal struct Roles: Codable {\n",
        "    internal let roleId: Int\n",
        "    private enum CodingKeys: String, CodingKey {\n",
        "      case roleId = \"role_id\"\n",
        "    }\n",
        "  }\n",
        "  private enum CodingKeys: String, CodingKey {\n",
        "    case id\n",
        "    case displayName = \"display_name\"\n",
        "    case score\n",
        "    case isAdmin = \"is_admin\"\n",
        "    case lastLogin = \"last_login\"\n",
        "    case roles\n",
        "  }\n",
        "}\n",
    ));
}

#[test]
fn schema_document_end_to_end() {
    let schema = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "age": { "type": "integer", "minimum": 0 },
            "status": { "type": "string", "enum": ["active", "on_hold"] },
            "tags": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["age", "tags"]
    });
    let model = infer_from_schema(&schema, SchemaOptions::default()).unwrap();
    let options = EmitOptions {
        root_name: "Member".into(),
        sorted_fields: true,
        ..EmitOptions::default()
    };
    assert_eq!(emit(&model, &options).unwrap(), concat!(
        "internal struct Member: Codable {\n",
        "  internal let age: UInt\n",
        "  internal let status: Status?\n",
        "  internal enum Status: String, Codable {\n",
        "    case active\n",
        "    case onHold = \"on_hold\"\n",
        "  }\n",
        "  internal let tags: [String]\n",
        "}\n",
    ));
}

#[test]
fn unsigned_preference_is_a_toggle() {
    let schema = json!({
        "type": "object",
        "properties": { "age": { "type": "integer", "minimum": 0 } },
        "required": ["age"]
    });
    let field_type = |prefer_unsigned_integer| {
        let model = infer_from_schema(&schema, SchemaOptions { prefer_unsigned_integer }).unwrap();
        let TypeDef::Struct(root) = model else { panic!("expected a struct") };
        root.field("age").unwrap().ty.clone()
    };
    assert_eq!(field_type(true), FieldType::new(BaseType::ForcedName("UInt".into())));
    assert_eq!(field_type(false), FieldType::new(BaseType::Integer));
}

#[test]
fn empty_top_level_array_is_an_error() {
    assert_eq!(infer_from_value(&json!([]), ValueOptions::default()), Err(Error::EmptyArray));
}

#[test]
fn sibling_types_with_the_same_name_are_refused() {
    let doc = json!({ "data": { "a": 1 }, "dAta": { "b": 2 } });
    let model = infer_from_value(&doc, ValueOptions::default()).unwrap();
    let options = EmitOptions {
        object_name_strategy: ObjectNameStrategy::Uppercase,
        ..EmitOptions::default()
    };
    assert_eq!(
        emit(&model.into(), &options),
        Err(Error::DuplicateNestedTypeName { parent: "Model".into(), name: "DATA".into() })
    );
}

#[test]
fn case_variants_of_a_key_stay_distinct_fields() {
    let text = swift(&json!({ "id": 1, "Id": "x" }), &EmitOptions::default());
    assert!(text.contains("internal let id: Int\n"), "{text}");
    assert!(text.contains("internal let Id: String\n"), "{text}");
}

#[test]
fn batch_reports_each_input() {
    let dir = tempfile::tempdir().unwrap();
    let ok = dir.path().join("ok.json");
    let bad = dir.path().join("scalar.json");
    std::fs::write(&ok, r#"[{"n": 1}]"#).unwrap();
    std::fs::write(&bad, "42").unwrap();

    let settings = BatchSettings { kind: InputKind::Json, ..BatchSettings::default() };
    let report = batch::run(&[ok, bad.clone()], &settings);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures, vec![(
        bad.as_path(),
        &Error::UnsupportedRootType { found: "number".into() },
    )]);
    assert!(dir.path().join("ok.swift").is_file());
}

// ------------------------------ Properties -------------------------------- //

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f + 0.5)),
        "[a-z ]{0,12}".prop_map(Value::from),
    ]
}

fn expected_base(value: &Value) -> BaseType {
    match value {
        Value::Null => BaseType::Null,
        Value::Bool(_) => BaseType::Boolean,
        Value::Number(n) if n.is_f64() => BaseType::Double,
        Value::Number(_) => BaseType::Integer,
        Value::String(_) => BaseType::String,
        other => panic!("not a scalar: {other}"),
    }
}

fn object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]{0,8}", scalar()), 0..10)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn one_field_per_unique_key(map in object()) {
        let model = infer_from_value(&Value::Object(map.clone()), ValueOptions::default()).unwrap();
        prop_assert_eq!(model.fields.len(), map.len());
        let keys: Vec<&String> = model.fields.iter().map(|f| &f.original_key).collect();
        prop_assert_eq!(keys, map.keys().collect::<Vec<_>>());
    }

    #[test]
    fn arrays_follow_their_first_element(items in prop::collection::vec(scalar(), 1..6)) {
        let doc = json!({ "items": items });
        let model = infer_from_value(&doc, ValueOptions::default()).unwrap();
        let ty = &model.field("items").unwrap().ty;
        prop_assert!(ty.is_array);
        prop_assert_eq!(&ty.base, &expected_base(&items[0]));
    }

    #[test]
    fn emission_is_idempotent(map in object(), sorted in any::<bool>(), mutable in any::<bool>()) {
        let model: TypeDef = infer_from_value(&Value::Object(map), ValueOptions::default()).unwrap().into();
        let options = EmitOptions { sorted_fields: sorted, mutable, ..EmitOptions::default() };
        let first = emit(&model, &options).unwrap();
        let second = emit(&model, &options).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.matches('{').count(), first.matches('}').count());
    }
}
