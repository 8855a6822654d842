//! # outshape
//!
//! JSON Schema compilation and structured-output recovery for LLM
//! applications.
//!
//! Two halves, usable independently:
//!
//! - **Schema compilation** ([`outshape_schema`]): describe a domain
//!   type once with an explicit descriptor API, derive a JSON Schema
//!   with cycle breaking via `$defs`/`$ref`, and optionally rewrite it
//!   for strict structured-output validators.
//! - **Output recovery** ([`outshape_extract`]): pull a well-formed JSON
//!   payload out of a noisy completion and decode it into a target type.
//!
//! ## Example
//!
//! ```rust
//! use outshape::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! // Ask the model for this shape...
//! let descriptor = TypeDescriptor::Object(
//!     ObjectDescriptor::new("Person")
//!         .field("name", TypeDescriptor::string())
//!         .field("age", TypeDescriptor::integer()),
//! );
//! let schema = to_strict(derive(&descriptor).unwrap());
//! let request_schema = serde_json::to_string(&schema).unwrap();
//! assert!(request_schema.contains(r#""additionalProperties":false"#));
//!
//! // ...and recover the answer from whatever came back.
//! let completion = r#"Of course! {"name":"Tom","age":18}"#;
//! let person = extract_and_parse::<Person>(completion).unwrap();
//! assert_eq!(person.value.name, "Tom");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub use outshape_extract;
pub use outshape_schema;

// Re-exports
pub use outshape_extract::{
    extract_and_parse, extract_and_parse_with, extract_json_value, find_json_span,
    ExtractionResult,
};
pub use outshape_schema::{
    derive, to_strict, DescriptorRegistry, EnumDescriptor, FieldDescriptor, ObjectDescriptor,
    ObjectSchema, PrimitiveKind, SchemaCache, SchemaCompiler, SchemaError, SchemaNode,
    SchemaResult, StringKind, TypeDescriptor,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        derive, extract_and_parse, extract_and_parse_with, extract_json_value, find_json_span,
        to_strict, DescriptorRegistry, EnumDescriptor, ExtractionResult, FieldDescriptor,
        ObjectDescriptor, ObjectSchema, SchemaCache, SchemaCompiler, SchemaError, SchemaNode,
        SchemaResult, TypeDescriptor,
    };
}
