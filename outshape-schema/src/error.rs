//! Error types for schema derivation.

use thiserror::Error;

/// Error during schema derivation.
///
/// Derivation fails fast: no partial schema is ever returned. These are
/// programming or configuration errors in the descriptor layer, not
/// runtime conditions to absorb.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A `Named` descriptor points at nothing in the registry.
    #[error("unknown type descriptor: '{0}' is not registered")]
    UnknownType(String),

    /// An object descriptor carries an empty type name.
    #[error("object descriptor has an empty type name")]
    MissingTypeName,

    /// Two distinct type identities generated the same definition name.
    #[error("definition name collision: '{name}' generated for both '{first}' and '{second}'")]
    DefinitionNameCollision {
        /// The generated definition name.
        name: String,
        /// Identity that claimed the name first.
        first: String,
        /// Identity that collided with it.
        second: String,
    },

    /// The root schema is not an object but the derivation produced
    /// definitions; only object roots can anchor `$defs`.
    #[error("recursive type graph requires an object root to hold $defs")]
    RecursiveRootUnsupported,
}

impl SchemaError {
    /// Create an unknown-type error.
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType(name.into())
    }

    /// Create a definition-name collision error.
    pub fn name_collision(
        name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DefinitionNameCollision {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Result type for schema derivation.
pub type SchemaResult<T> = Result<T, SchemaError>;
