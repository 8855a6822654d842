//! Schema derivation: compile a [`TypeDescriptor`] graph into a
//! [`SchemaNode`] tree.
//!
//! Derivation is a recursive descent guarded by a stack of type
//! identities currently being derived. Revisiting an identity on that
//! stack is a cycle: the descendant gets a `$ref` and the completed
//! object is registered in the definitions table, attached to the root
//! as `$defs`. Acyclic graphs are always inlined and never produce
//! references.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::descriptor::{
    DescriptorRegistry, EnumDescriptor, ObjectDescriptor, PrimitiveKind, TypeDescriptor,
};
use crate::error::{SchemaError, SchemaResult};
use crate::node::{ObjectSchema, SchemaNode};

/// Derive a schema from a descriptor with no registered named types.
///
/// Descriptor graphs using [`TypeDescriptor::Named`] need a registry;
/// use [`SchemaCompiler`] for those.
///
/// # Example
///
/// ```rust
/// use outshape_schema::{derive, ObjectDescriptor, TypeDescriptor};
///
/// let schema = derive(&TypeDescriptor::Object(
///     ObjectDescriptor::new("Person")
///         .field("name", TypeDescriptor::string())
///         .field("age", TypeDescriptor::integer()),
/// ))
/// .unwrap();
///
/// assert_eq!(schema.reference_count(), 0);
/// ```
pub fn derive(root: &TypeDescriptor) -> SchemaResult<SchemaNode> {
    let registry = DescriptorRegistry::default();
    SchemaCompiler::new(&registry).derive(root)
}

/// Compiles type descriptors into JSON Schema trees.
///
/// Holds a borrowed registry used to resolve [`TypeDescriptor::Named`]
/// references. All derivation state is call-scoped; a compiler is safe
/// to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'r> {
    registry: &'r DescriptorRegistry,
}

impl<'r> SchemaCompiler<'r> {
    /// Create a compiler over the given registry.
    #[must_use]
    pub fn new(registry: &'r DescriptorRegistry) -> Self {
        Self { registry }
    }

    /// Derive the schema for `root`.
    ///
    /// Fails fast on unresolved named descriptors, empty type names,
    /// definition-name collisions, and recursive graphs whose root
    /// cannot anchor `$defs`. No partial schema is returned on error.
    pub fn derive(&self, root: &TypeDescriptor) -> SchemaResult<SchemaNode> {
        let mut walker = Walker::new(self.registry);
        let mut node = walker.walk(root, None)?;

        if !walker.definitions.is_empty() {
            match &mut node {
                SchemaNode::Object(object) => {
                    tracing::debug!(
                        definitions = walker.definitions.len(),
                        "attaching $defs to root schema"
                    );
                    object.definitions = walker.definitions;
                }
                _ => return Err(SchemaError::RecursiveRootUnsupported),
            }
        }

        Ok(node)
    }

    /// Derive the schema for a registered type by identity.
    pub fn derive_named(&self, type_name: &str) -> SchemaResult<SchemaNode> {
        self.derive(&TypeDescriptor::Named(type_name.to_string()))
    }
}

/// Call-scoped derivation state. Created fresh per `derive` call and
/// discarded afterwards; nothing is cached across calls.
struct Walker<'r> {
    registry: &'r DescriptorRegistry,
    /// Identities currently on the derivation stack.
    visiting: Vec<String>,
    /// Identities that a descendant revisited (cycle participants that
    /// need a definitions entry).
    referenced: Vec<String>,
    /// Completed definitions, keyed by generated name.
    definitions: IndexMap<String, SchemaNode>,
    /// Generated name -> identity, for collision detection.
    names: HashMap<String, String>,
}

impl<'r> Walker<'r> {
    fn new(registry: &'r DescriptorRegistry) -> Self {
        Self {
            registry,
            visiting: Vec::new(),
            referenced: Vec::new(),
            definitions: IndexMap::new(),
            names: HashMap::new(),
        }
    }

    fn walk(
        &mut self,
        ty: &TypeDescriptor,
        field_description: Option<&str>,
    ) -> SchemaResult<SchemaNode> {
        let desc = field_description.map(str::to_owned);
        match ty {
            TypeDescriptor::Primitive(kind) => Ok(match kind {
                PrimitiveKind::Integer => SchemaNode::Integer { description: desc },
                PrimitiveKind::Number => SchemaNode::Number { description: desc },
                PrimitiveKind::Boolean => SchemaNode::Boolean { description: desc },
                PrimitiveKind::Null => SchemaNode::Null,
            }),
            TypeDescriptor::StringLike(kind) => Ok(SchemaNode::String {
                // Explicit field metadata wins over the well-known default.
                description: desc.or_else(|| kind.default_description().map(str::to_owned)),
            }),
            TypeDescriptor::Enum(EnumDescriptor {
                values,
                description,
                ..
            }) => Ok(SchemaNode::Enum {
                description: desc.or_else(|| description.clone()),
                values: values.clone(),
            }),
            TypeDescriptor::Array(element) => Ok(SchemaNode::Array {
                description: desc,
                items: Box::new(self.walk(element, None)?),
            }),
            TypeDescriptor::Map(value) => {
                // The node model has no schema-valued additionalProperties;
                // maps become open objects. The value descriptor is still
                // walked so invalid nested descriptors fail fast.
                let _ = self.walk(value, None)?;
                Ok(SchemaNode::Object(ObjectSchema {
                    description: desc,
                    additional_properties: Some(true),
                    ..ObjectSchema::default()
                }))
            }
            TypeDescriptor::Nullable(inner) => Ok(SchemaNode::AnyOf {
                description: desc,
                variants: vec![self.walk(inner, None)?, SchemaNode::Null],
            }),
            TypeDescriptor::Object(object) => self.walk_object(object, field_description),
            TypeDescriptor::Named(name) => {
                let object = self
                    .registry
                    .get(name)
                    .ok_or_else(|| SchemaError::unknown_type(name.clone()))?
                    .clone();
                self.walk_object(&object, field_description)
            }
        }
    }

    fn walk_object(
        &mut self,
        object: &ObjectDescriptor,
        field_description: Option<&str>,
    ) -> SchemaResult<SchemaNode> {
        if object.type_name.is_empty() {
            return Err(SchemaError::MissingTypeName);
        }

        if self.visiting.iter().any(|id| id == &object.type_name) {
            let name = self.definition_name(&object.type_name)?;
            if !self.referenced.contains(&object.type_name) {
                self.referenced.push(object.type_name.clone());
            }
            tracing::debug!(
                type_name = %object.type_name,
                reference = %name,
                "cycle detected, emitting $ref"
            );
            return Ok(SchemaNode::Reference { name });
        }

        self.visiting.push(object.type_name.clone());
        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for field in &object.fields {
            if field.required {
                required.push(field.name.clone());
            }
            let node = self.walk(&field.ty, field.description.as_deref());
            match node {
                Ok(node) => {
                    properties.insert(field.name.clone(), node);
                }
                Err(err) => {
                    self.visiting.pop();
                    return Err(err);
                }
            }
        }
        self.visiting.pop();

        let node = SchemaNode::Object(ObjectSchema {
            description: field_description
                .map(str::to_owned)
                .or_else(|| object.description.clone()),
            properties,
            required,
            additional_properties: None,
            definitions: IndexMap::new(),
        });

        if self.referenced.contains(&object.type_name) {
            let name = self.definition_name(&object.type_name)?;
            tracing::debug!(
                type_name = %object.type_name,
                definition = %name,
                "registering recursive definition"
            );
            self.definitions.insert(name, node.clone());
        }

        Ok(node)
    }

    /// Deterministic definition name for a type identity: every
    /// non-alphanumeric character maps to `_`. Distinct identities that
    /// sanitize to the same name are a configuration error and fail
    /// loudly instead of being silently merged.
    fn definition_name(&mut self, identity: &str) -> SchemaResult<String> {
        let name: String = identity
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();

        match self.names.get(&name) {
            Some(existing) if existing != identity => Err(SchemaError::name_collision(
                name.clone(),
                existing.clone(),
                identity,
            )),
            Some(_) => Ok(name),
            None => {
                self.names.insert(name.clone(), identity.to_string());
                Ok(name)
            }
        }
    }
}
