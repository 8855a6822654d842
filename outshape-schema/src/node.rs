//! In-memory JSON Schema fragments.
//!
//! This module provides `SchemaNode`, the tagged-union representation of
//! one JSON Schema fragment, and `ObjectSchema` for object-shaped nodes.
//! Nodes are plain immutable values; all behavior beyond equality and
//! serialization lives in the compiler and transformer modules.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Prefix used when serializing a [`SchemaNode::Reference`] as `$ref`.
pub const DEFS_REF_PREFIX: &str = "#/$defs/";

/// One JSON Schema fragment.
///
/// Property and definition order is preserved end to end: language models
/// attend to field order, so the serialized output must match declaration
/// order exactly.
///
/// # Example
///
/// ```rust
/// use outshape_schema::{ObjectSchema, SchemaNode};
///
/// let schema = SchemaNode::Object(
///     ObjectSchema::new()
///         .with_property("name", SchemaNode::string(), true)
///         .with_property("age", SchemaNode::integer(), false),
/// );
///
/// let json = serde_json::to_string(&schema).unwrap();
/// assert!(json.starts_with(r#"{"type":"object""#));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `{"type": "string"}`
    String {
        /// Optional human-readable description.
        description: Option<String>,
    },
    /// `{"type": "number"}`
    Number {
        /// Optional human-readable description.
        description: Option<String>,
    },
    /// `{"type": "integer"}`
    Integer {
        /// Optional human-readable description.
        description: Option<String>,
    },
    /// `{"type": "boolean"}`
    Boolean {
        /// Optional human-readable description.
        description: Option<String>,
    },
    /// `{"type": "null"}`
    Null,
    /// `{"type": "string", "enum": [...]}`
    Enum {
        /// Optional human-readable description.
        description: Option<String>,
        /// Allowed values, in declaration order.
        values: Vec<String>,
    },
    /// `{"type": "array", "items": ...}`
    Array {
        /// Optional human-readable description.
        description: Option<String>,
        /// Schema of the array elements.
        items: Box<SchemaNode>,
    },
    /// `{"type": "object", ...}`
    Object(ObjectSchema),
    /// `{"$ref": "#/$defs/<name>"}` — an index into the definitions table.
    Reference {
        /// Definition name this reference points at.
        name: String,
    },
    /// `{"anyOf": [...]}`
    AnyOf {
        /// Optional human-readable description.
        description: Option<String>,
        /// Member schemas, in declaration order.
        variants: Vec<SchemaNode>,
    },
}

impl SchemaNode {
    /// A plain string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::String { description: None }
    }

    /// A number (float) schema.
    #[must_use]
    pub fn number() -> Self {
        Self::Number { description: None }
    }

    /// An integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer { description: None }
    }

    /// A boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean { description: None }
    }

    /// The null schema.
    #[must_use]
    pub fn null() -> Self {
        Self::Null
    }

    /// A string-backed enum schema.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            description: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// An array schema wrapping `items`.
    #[must_use]
    pub fn array(items: SchemaNode) -> Self {
        Self::Array {
            description: None,
            items: Box::new(items),
        }
    }

    /// A reference to a named entry in the definitions table.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference { name: name.into() }
    }

    /// An `anyOf` union over the given variants.
    #[must_use]
    pub fn any_of(variants: Vec<SchemaNode>) -> Self {
        Self::AnyOf {
            description: None,
            variants,
        }
    }

    /// A two-member nullable union: `anyOf: [inner, null]`.
    #[must_use]
    pub fn nullable(inner: SchemaNode) -> Self {
        Self::any_of(vec![inner, Self::Null])
    }

    /// Attach a description, replacing any existing one.
    ///
    /// `Null` and `Reference` nodes carry no description and are returned
    /// unchanged.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.set_description(Some(desc.into()));
        self
    }

    pub(crate) fn set_description(&mut self, desc: Option<String>) {
        match self {
            Self::String { description }
            | Self::Number { description }
            | Self::Integer { description }
            | Self::Boolean { description }
            | Self::Enum { description, .. }
            | Self::Array { description, .. }
            | Self::AnyOf { description, .. } => {
                if desc.is_some() {
                    *description = desc;
                }
            }
            Self::Object(object) => {
                if desc.is_some() {
                    object.description = desc;
                }
            }
            Self::Null | Self::Reference { .. } => {}
        }
    }

    /// The node's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::String { description }
            | Self::Number { description }
            | Self::Integer { description }
            | Self::Boolean { description }
            | Self::Enum { description, .. }
            | Self::Array { description, .. }
            | Self::AnyOf { description, .. } => description.as_deref(),
            Self::Object(object) => object.description.as_deref(),
            Self::Null | Self::Reference { .. } => None,
        }
    }

    /// Whether this node is a `$ref` into the definitions table.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }

    /// Whether this node is a nullable union (`anyOf` containing `null`).
    #[must_use]
    pub fn is_nullable_union(&self) -> bool {
        match self {
            Self::AnyOf { variants, .. } => variants.iter().any(|v| matches!(v, Self::Null)),
            _ => false,
        }
    }

    /// Borrow the object schema if this node is object-shaped.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Count `$ref` nodes in this schema tree, definitions included.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        match self {
            Self::Reference { .. } => 1,
            Self::Array { items, .. } => items.reference_count(),
            Self::AnyOf { variants, .. } => variants.iter().map(Self::reference_count).sum(),
            Self::Object(object) => {
                object.properties.values().map(Self::reference_count).sum::<usize>()
                    + object.definitions.values().map(Self::reference_count).sum::<usize>()
            }
            _ => 0,
        }
    }

    /// Convert to a `serde_json::Value`.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// An object-shaped schema node.
///
/// `properties` and `definitions` keep insertion order; `required` lists
/// property names in the order they were declared required.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Property schemas, keyed by property name, in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of required properties.
    pub required: Vec<String>,
    /// Whether undeclared properties are permitted.
    pub additional_properties: Option<bool>,
    /// Definitions table, serialized as `$defs` when non-empty.
    ///
    /// Populated only on the root schema of a derivation, and only for
    /// types that participate in a cycle.
    pub definitions: IndexMap<String, SchemaNode>,
}

impl ObjectSchema {
    /// Create an empty object schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: SchemaNode, required: bool) -> Self {
        self.add_property(name, schema, required);
        self
    }

    /// Add a property without consuming self.
    pub fn add_property(&mut self, name: &str, schema: SchemaNode, required: bool) {
        self.properties.insert(name.to_string(), schema);
        if required && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }

    /// Set whether additional properties are allowed.
    #[must_use]
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Add a named definition.
    #[must_use]
    pub fn with_definition(mut self, name: &str, schema: SchemaNode) -> Self {
        self.definitions.insert(name.to_string(), schema);
        self
    }

    /// Check if a property is required.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Get a property schema by name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.get(name)
    }

    /// Number of declared properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(object: ObjectSchema) -> Self {
        Self::Object(object)
    }
}

// Serialization is hand-written: the wire shape must emit `type`,
// `description`, `properties`, `required`, `items`, `additionalProperties`
// and `$defs`/`$ref` in that key order, and serde_json's default map type
// sorts keys alphabetically.
impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String { description } => leaf(serializer, "string", description),
            Self::Number { description } => leaf(serializer, "number", description),
            Self::Integer { description } => leaf(serializer, "integer", description),
            Self::Boolean { description } => leaf(serializer, "boolean", description),
            Self::Null => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", "null")?;
                map.end()
            }
            Self::Enum {
                description,
                values,
            } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "string")?;
                if let Some(desc) = description {
                    map.serialize_entry("description", desc)?;
                }
                map.serialize_entry("enum", values)?;
                map.end()
            }
            Self::Array { description, items } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "array")?;
                if let Some(desc) = description {
                    map.serialize_entry("description", desc)?;
                }
                map.serialize_entry("items", items.as_ref())?;
                map.end()
            }
            Self::Object(object) => object.serialize(serializer),
            Self::Reference { name } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$ref", &format!("{DEFS_REF_PREFIX}{name}"))?;
                map.end()
            }
            Self::AnyOf {
                description,
                variants,
            } => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(desc) = description {
                    map.serialize_entry("description", desc)?;
                }
                map.serialize_entry("anyOf", variants)?;
                map.end()
            }
        }
    }
}

impl Serialize for ObjectSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "object")?;
        if let Some(desc) = &self.description {
            map.serialize_entry("description", desc)?;
        }
        map.serialize_entry("properties", &self.properties)?;
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        if let Some(allowed) = self.additional_properties {
            map.serialize_entry("additionalProperties", &allowed)?;
        }
        if !self.definitions.is_empty() {
            map.serialize_entry("$defs", &self.definitions)?;
        }
        map.end()
    }
}

fn leaf<S: Serializer>(
    serializer: S,
    type_name: &str,
    description: &Option<String>,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("type", type_name)?;
    if let Some(desc) = description {
        map.serialize_entry("description", desc)?;
    }
    map.end()
}
