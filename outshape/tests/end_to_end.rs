//! End-to-end flows: descriptor -> schema -> wire shape, and noisy
//! completion -> typed value.

use outshape::prelude::*;
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Person {
    name: String,
    age: Option<u32>,
}

fn person_descriptor() -> TypeDescriptor {
    TypeDescriptor::Object(
        ObjectDescriptor::new("Person")
            .with_field(
                FieldDescriptor::new("name", TypeDescriptor::string())
                    .with_description("Person's name"),
            )
            .optional_field("age", TypeDescriptor::integer()),
    )
}

#[test]
fn derived_schema_matches_wire_shape() {
    let schema = derive(&person_descriptor()).unwrap();
    assert_eq!(
        serde_json::to_string(&schema).unwrap(),
        r#"{"type":"object","properties":{"name":{"type":"string","description":"Person's name"},"age":{"type":"integer"}},"required":["name"]}"#
    );
}

#[test]
fn strict_schema_matches_wire_shape() {
    let schema = to_strict(derive(&person_descriptor()).unwrap());
    assert_eq!(
        serde_json::to_string(&schema).unwrap(),
        r#"{"type":"object","properties":{"name":{"type":"string","description":"Person's name"},"age":{"anyOf":[{"type":"integer"},{"type":"null"}]}},"required":["name","age"],"additionalProperties":false}"#
    );
}

#[test]
fn recursive_schema_closes_over_defs() {
    let registry = DescriptorRegistry::new().with(
        ObjectDescriptor::new("Category")
            .field("name", TypeDescriptor::string())
            .optional_field(
                "subcategories",
                TypeDescriptor::array(TypeDescriptor::named("Category")),
            ),
    );
    let schema = SchemaCompiler::new(&registry)
        .derive_named("Category")
        .unwrap();
    let json = serde_json::to_string(&schema).unwrap();

    assert!(json.contains(r##""items":{"$ref":"#/$defs/Category"}"##));
    assert!(json.contains(r#""$defs":{"Category":{"type":"object""#));

    // Strict transform keeps the reference intact and closes the definition.
    let strict_json = serde_json::to_string(&to_strict(schema)).unwrap();
    assert!(strict_json.contains(r##"{"$ref":"#/$defs/Category"}"##));
    assert!(strict_json.contains(r#""additionalProperties":false"#));
}

#[test]
fn completion_round_trip() {
    let completion = r#"Sure thing! Here is the person you asked for:

```json
{"name":"Jerry","age":20}
```

Let me know if you need anything else."#;

    let result = extract_and_parse::<Person>(completion).unwrap();
    assert_eq!(
        result.value,
        Person {
            name: "Jerry".into(),
            age: Some(20),
        }
    );
    assert_eq!(result.raw_json, r#"{"name":"Jerry","age":20}"#);
}

#[test]
fn cache_shares_derived_schema() {
    let registry = DescriptorRegistry::new().with(
        ObjectDescriptor::new("Person")
            .field("name", TypeDescriptor::string())
            .optional_field("age", TypeDescriptor::integer()),
    );
    let compiler = SchemaCompiler::new(&registry);
    let cache = SchemaCache::new();

    let a = cache.derive_named(&compiler, "Person").unwrap();
    let b = cache.derive_named(&compiler, "Person").unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn failed_recovery_is_a_signal_not_an_error() {
    assert!(extract_and_parse::<Person>("I could not produce JSON, sorry.").is_none());
}
