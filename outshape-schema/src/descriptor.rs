//! Type descriptors: the explicit, read-only shape description the
//! compiler consumes.
//!
//! The original runtime-reflection layer is replaced by a construction
//! API the domain-type author calls once: build an [`ObjectDescriptor`]
//! per type, register recursive types in a [`DescriptorRegistry`], and
//! point at them with [`TypeDescriptor::Named`].
//!
//! # Example
//!
//! ```rust
//! use outshape_schema::{ObjectDescriptor, TypeDescriptor};
//!
//! let person = ObjectDescriptor::new("Person")
//!     .with_description("A person")
//!     .field("name", TypeDescriptor::string())
//!     .field("age", TypeDescriptor::integer())
//!     .optional_field("nickname", TypeDescriptor::string());
//!
//! assert_eq!(person.fields.len(), 3);
//! ```

use indexmap::IndexMap;

/// Default description attached to UUID-shaped strings when the field
/// carries no explicit description.
pub const DEFAULT_UUID_DESCRIPTION: &str = "String in a UUID format";

/// Non-string JSON leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Number,
    /// Booleans.
    Boolean,
    /// The null type.
    Null,
}

/// String-valued leaf kinds.
///
/// Well-known kinds carry a default description, used when the field
/// declares none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// An unconstrained string.
    Plain,
    /// A string holding a UUID.
    Uuid,
}

impl StringKind {
    /// Default description for well-known string identities.
    #[must_use]
    pub fn default_description(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Uuid => Some(DEFAULT_UUID_DESCRIPTION),
        }
    }
}

/// Read-only description of a domain type's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Integer, number, boolean or null.
    Primitive(PrimitiveKind),
    /// A string-valued type.
    StringLike(StringKind),
    /// A closed set of string values.
    Enum(EnumDescriptor),
    /// A homogeneous sequence.
    Array(Box<TypeDescriptor>),
    /// A named structure with ordered fields.
    Object(ObjectDescriptor),
    /// A string-keyed map with homogeneous values.
    Map(Box<TypeDescriptor>),
    /// A value that may also be null.
    Nullable(Box<TypeDescriptor>),
    /// A reference to an [`ObjectDescriptor`] registered under this name
    /// in a [`DescriptorRegistry`]. This is how self-referential type
    /// graphs are expressed.
    Named(String),
}

impl TypeDescriptor {
    /// A plain string.
    #[must_use]
    pub fn string() -> Self {
        Self::StringLike(StringKind::Plain)
    }

    /// A UUID-shaped string.
    #[must_use]
    pub fn uuid() -> Self {
        Self::StringLike(StringKind::Uuid)
    }

    /// An integer.
    #[must_use]
    pub fn integer() -> Self {
        Self::Primitive(PrimitiveKind::Integer)
    }

    /// A floating-point number.
    #[must_use]
    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    /// A boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    /// The null type.
    #[must_use]
    pub fn null() -> Self {
        Self::Primitive(PrimitiveKind::Null)
    }

    /// An array of `element`.
    #[must_use]
    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// A string-keyed map with `value`-typed entries.
    #[must_use]
    pub fn map_of(value: TypeDescriptor) -> Self {
        Self::Map(Box::new(value))
    }

    /// A nullable wrapper around `inner`.
    #[must_use]
    pub fn nullable(inner: TypeDescriptor) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// A by-name reference to a registered object descriptor.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// An enum over the given string values.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(EnumDescriptor::new(name, values))
    }
}

/// Descriptor for a closed set of string values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Stable identity of the enum type.
    pub type_name: String,
    /// Allowed values, in declaration order.
    pub values: Vec<String>,
    /// Type-level description.
    pub description: Option<String>,
}

impl EnumDescriptor {
    /// Create an enum descriptor.
    #[must_use]
    pub fn new<I, S>(type_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            type_name: type_name.into(),
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Set the type-level description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// One field of an [`ObjectDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Property name as it appears in JSON.
    pub name: String,
    /// Shape of the field's value.
    pub ty: TypeDescriptor,
    /// Whether the field is required.
    pub required: bool,
    /// Field-level description; overrides any type-level default.
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Create a required field with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
        }
    }

    /// Mark the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the field description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Descriptor for a named structure with ordered fields.
///
/// `type_name` is the stable identity used for cycle detection and
/// definition naming; use something collision-free such as a
/// fully-qualified path. Two structurally equal but distinct types must
/// carry distinct names.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDescriptor {
    /// Stable type identity.
    pub type_name: String,
    /// Type-level description.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl ObjectDescriptor {
    /// Create an object descriptor with no fields.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the type-level description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Append a required field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty));
        self
    }

    /// Append an optional field.
    #[must_use]
    pub fn optional_field(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty).optional());
        self
    }

    /// Append a field built elsewhere.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// Ordered registry of object descriptors, keyed by type identity.
///
/// Recursive type graphs register each participating object once and
/// refer to it through [`TypeDescriptor::Named`]; the registry is the
/// arena those names index into.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    objects: IndexMap<String, ObjectDescriptor>,
}

impl DescriptorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its own `type_name`.
    ///
    /// Returns the previously registered descriptor for that name, if any.
    pub fn register(&mut self, descriptor: ObjectDescriptor) -> Option<ObjectDescriptor> {
        self.objects.insert(descriptor.type_name.clone(), descriptor)
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, descriptor: ObjectDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Look up a descriptor by type identity.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&ObjectDescriptor> {
        self.objects.get(type_name)
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectDescriptor)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }
}
