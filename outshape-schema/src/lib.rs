//! # outshape-schema
//!
//! JSON Schema compilation from explicit type descriptors.
//!
//! This crate turns a read-only description of a domain type's shape
//! (a [`TypeDescriptor`] graph, possibly self-referential) into a JSON
//! Schema tree ([`SchemaNode`]) suitable for structured-output requests
//! to language models.
//!
//! ## Core Concepts
//!
//! - **[`TypeDescriptor`]**: the shape of a domain type, built once via
//!   an explicit construction API (no runtime reflection)
//! - **[`DescriptorRegistry`]**: arena of named object descriptors;
//!   [`TypeDescriptor::Named`] entries index into it, which is how
//!   recursive type graphs are expressed
//! - **[`SchemaNode`]**: the compiled JSON Schema fragment, with property
//!   order preserved end to end
//! - **[`SchemaCompiler`]** / [`derive`]: the derivation engine, with
//!   cycle breaking via `$defs`/`$ref`
//! - **[`to_strict`]**: rewrite for strict structured-output validators
//!   (all properties required, `additionalProperties: false`, optionals
//!   as nullable unions)
//! - **[`SchemaCache`]**: optional read-through memoization across calls
//!
//! ## Example
//!
//! ```rust
//! use outshape_schema::{derive, to_strict, ObjectDescriptor, TypeDescriptor};
//!
//! let descriptor = TypeDescriptor::Object(
//!     ObjectDescriptor::new("Person")
//!         .with_description("A person")
//!         .field("name", TypeDescriptor::string())
//!         .optional_field("age", TypeDescriptor::integer()),
//! );
//!
//! let schema = derive(&descriptor).unwrap();
//! let strict = to_strict(schema);
//! assert_eq!(strict.as_object().unwrap().required, ["name", "age"]);
//! ```
//!
//! ## Recursive types
//!
//! ```rust
//! use outshape_schema::{DescriptorRegistry, ObjectDescriptor, SchemaCompiler, TypeDescriptor};
//!
//! let registry = DescriptorRegistry::new().with(
//!     ObjectDescriptor::new("Category")
//!         .field("name", TypeDescriptor::string())
//!         .optional_field(
//!             "subcategories",
//!             TypeDescriptor::array(TypeDescriptor::named("Category")),
//!         ),
//! );
//!
//! let schema = SchemaCompiler::new(&registry).derive_named("Category").unwrap();
//! let json = serde_json::to_string(&schema).unwrap();
//! assert!(json.contains("$defs"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod derive;
pub mod descriptor;
pub mod error;
pub mod node;
pub mod strict;

// Re-exports
pub use cache::SchemaCache;
pub use derive::{derive, SchemaCompiler};
pub use descriptor::{
    DescriptorRegistry, EnumDescriptor, FieldDescriptor, ObjectDescriptor, PrimitiveKind,
    StringKind, TypeDescriptor, DEFAULT_UUID_DESCRIPTION,
};
pub use error::{SchemaError, SchemaResult};
pub use node::{ObjectSchema, SchemaNode, DEFS_REF_PREFIX};
pub use strict::to_strict;
