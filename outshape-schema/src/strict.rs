//! Strict-mode schema rewriting.
//!
//! Provider-side strict validators (for example OpenAI structured
//! outputs) require every property to be required and undeclared
//! properties to be forbidden. Optional semantics are recovered by
//! turning each previously-optional property into a nullable union.
//!
//! The transform is pure, total over any schema value, and idempotent.

use indexmap::IndexMap;

use crate::node::{ObjectSchema, SchemaNode};

/// Rewrite `schema` into its strict-mode form.
///
/// For every object node, bottom-up:
/// - `additionalProperties` is set to `false`;
/// - every property becomes required, in property declaration order;
/// - properties that were optional are wrapped as `anyOf: [schema, null]`
///   unless they already are nullable unions.
///
/// References are left untouched; their definitions are transformed once
/// where they live in the `$defs` table. Applying the transform twice
/// yields the same schema as applying it once.
///
/// # Example
///
/// ```rust
/// use outshape_schema::{to_strict, ObjectSchema, SchemaNode};
///
/// let schema = SchemaNode::Object(
///     ObjectSchema::new()
///         .with_property("name", SchemaNode::string(), true)
///         .with_property("age", SchemaNode::integer(), false),
/// );
///
/// let strict = to_strict(schema);
/// let object = strict.as_object().unwrap();
/// assert_eq!(object.required, ["name", "age"]);
/// assert_eq!(object.additional_properties, Some(false));
/// ```
#[must_use]
pub fn to_strict(schema: SchemaNode) -> SchemaNode {
    match schema {
        SchemaNode::Object(object) => SchemaNode::Object(strict_object(object)),
        SchemaNode::Array { description, items } => SchemaNode::Array {
            description,
            items: Box::new(to_strict(*items)),
        },
        SchemaNode::AnyOf {
            description,
            variants,
        } => SchemaNode::AnyOf {
            description,
            variants: variants.into_iter().map(to_strict).collect(),
        },
        // Leaves and references pass through unchanged.
        other => other,
    }
}

fn strict_object(object: ObjectSchema) -> ObjectSchema {
    let previously_required = object.required;

    let mut properties = IndexMap::with_capacity(object.properties.len());
    let mut required = Vec::with_capacity(object.properties.len());
    for (name, schema) in object.properties {
        let schema = to_strict(schema);
        let schema = if previously_required.iter().any(|r| r == &name)
            || schema.is_nullable_union()
        {
            schema
        } else {
            SchemaNode::nullable(schema)
        };
        required.push(name.clone());
        properties.insert(name, schema);
    }

    let definitions = object
        .definitions
        .into_iter()
        .map(|(name, schema)| (name, to_strict(schema)))
        .collect();

    ObjectSchema {
        description: object.description,
        properties,
        required,
        additional_properties: Some(false),
        definitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> SchemaNode {
        SchemaNode::Object(
            ObjectSchema::new()
                .with_property("name", SchemaNode::string(), true)
                .with_property("age", SchemaNode::integer(), false)
                .with_property(
                    "address",
                    SchemaNode::Object(
                        ObjectSchema::new()
                            .with_property("street", SchemaNode::string(), false),
                    ),
                    true,
                ),
        )
    }

    fn assert_strict(node: &SchemaNode) {
        match node {
            SchemaNode::Object(object) => {
                assert_eq!(object.additional_properties, Some(false));
                let names: Vec<&String> = object.properties.keys().collect();
                assert_eq!(object.required.iter().collect::<Vec<_>>(), names);
                object.properties.values().for_each(assert_strict);
                object.definitions.values().for_each(assert_strict);
            }
            SchemaNode::Array { items, .. } => assert_strict(items),
            SchemaNode::AnyOf { variants, .. } => variants.iter().for_each(assert_strict),
            _ => {}
        }
    }

    #[test]
    fn test_all_properties_become_required_in_declaration_order() {
        let strict = to_strict(sample());
        let object = strict.as_object().unwrap();
        assert_eq!(object.required, ["name", "age", "address"]);
    }

    #[test]
    fn test_optional_properties_become_nullable_unions() {
        let strict = to_strict(sample());
        let object = strict.as_object().unwrap();
        assert!(object.get_property("age").unwrap().is_nullable_union());
        // Previously-required properties are structurally unchanged.
        assert_eq!(object.get_property("name").unwrap(), &SchemaNode::string());
    }

    #[test]
    fn test_nested_objects_are_transformed() {
        let strict = to_strict(sample());
        let address = strict
            .as_object()
            .unwrap()
            .get_property("address")
            .unwrap()
            .as_object()
            .unwrap();
        assert_eq!(address.additional_properties, Some(false));
        assert!(address.get_property("street").unwrap().is_nullable_union());
    }

    #[test]
    fn test_totality_over_whole_tree() {
        assert_strict(&to_strict(sample()));
    }

    #[test]
    fn test_idempotence() {
        let once = to_strict(sample());
        let twice = to_strict(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_already_nullable_optional_is_not_double_wrapped() {
        let schema = SchemaNode::Object(
            ObjectSchema::new().with_property(
                "maybe",
                SchemaNode::nullable(SchemaNode::string()),
                false,
            ),
        );
        let strict = to_strict(schema);
        let object = strict.as_object().unwrap();
        assert_eq!(
            object.get_property("maybe").unwrap(),
            &SchemaNode::nullable(SchemaNode::string())
        );
    }

    #[test]
    fn test_references_left_untouched_and_definitions_transformed_once() {
        let schema = SchemaNode::Object(
            ObjectSchema::new()
                .with_property("next", SchemaNode::reference("Node"), false)
                .with_definition(
                    "Node",
                    SchemaNode::Object(
                        ObjectSchema::new().with_property("value", SchemaNode::integer(), false),
                    ),
                ),
        );
        let strict = to_strict(schema);
        let object = strict.as_object().unwrap();

        // The reference site is a nullable union around an untouched $ref.
        let next = object.get_property("next").unwrap();
        let SchemaNode::AnyOf { variants, .. } = next else {
            panic!("expected nullable union, got {next:?}");
        };
        assert_eq!(variants[0], SchemaNode::reference("Node"));

        let def = object.definitions.get("Node").unwrap().as_object().unwrap();
        assert_eq!(def.additional_properties, Some(false));
        assert_eq!(def.required, ["value"]);
    }

    #[test]
    fn test_leaves_pass_through() {
        assert_eq!(to_strict(SchemaNode::string()), SchemaNode::string());
        assert_eq!(to_strict(SchemaNode::null()), SchemaNode::null());
        assert_eq!(
            to_strict(SchemaNode::reference("X")),
            SchemaNode::reference("X")
        );
    }
}
