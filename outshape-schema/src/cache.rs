//! Read-through memoization of derived schemas.
//!
//! Derivation is pure, so repeated `derive` calls for the same registered
//! type always produce the same tree. Callers that build schemas per
//! request can share a `SchemaCache` to pay the derivation cost once per
//! type identity. Entirely optional; the compiler itself caches nothing.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::derive::SchemaCompiler;
use crate::error::SchemaResult;
use crate::node::SchemaNode;

/// Concurrent read-through cache of derived schemas, keyed by type
/// identity.
///
/// Readers take a shared lock; a miss derives outside the lock and then
/// double-checks under the write lock, so an in-progress derivation never
/// mutates a published entry.
///
/// # Example
///
/// ```rust
/// use outshape_schema::{
///     DescriptorRegistry, ObjectDescriptor, SchemaCache, SchemaCompiler, TypeDescriptor,
/// };
///
/// let registry = DescriptorRegistry::new()
///     .with(ObjectDescriptor::new("Person").field("name", TypeDescriptor::string()));
/// let compiler = SchemaCompiler::new(&registry);
/// let cache = SchemaCache::new();
///
/// let first = cache.derive_named(&compiler, "Person").unwrap();
/// let second = cache.derive_named(&compiler, "Person").unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<String, Arc<SchemaNode>>>,
}

impl SchemaCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the schema for a registered type, serving repeats from the
    /// cache.
    ///
    /// Errors are not cached; a failing descriptor fails on every call.
    pub fn derive_named(
        &self,
        compiler: &SchemaCompiler<'_>,
        type_name: &str,
    ) -> SchemaResult<Arc<SchemaNode>> {
        if let Some(schema) = self.entries.read().get(type_name) {
            tracing::trace!(type_name = %type_name, "schema cache hit");
            return Ok(Arc::clone(schema));
        }

        let schema = Arc::new(compiler.derive_named(type_name)?);

        let mut entries = self.entries.write();
        // A racing caller may have derived the same type; keep the
        // published entry so all readers share one snapshot.
        let entry = entries
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::clone(&schema));
        Ok(Arc::clone(entry))
    }

    /// Number of cached schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all cached schemas.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorRegistry, ObjectDescriptor, TypeDescriptor};

    fn registry() -> DescriptorRegistry {
        DescriptorRegistry::new().with(
            ObjectDescriptor::new("Person")
                .field("name", TypeDescriptor::string())
                .field("age", TypeDescriptor::integer()),
        )
    }

    #[test]
    fn test_repeat_derivations_share_one_snapshot() {
        let registry = registry();
        let compiler = SchemaCompiler::new(&registry);
        let cache = SchemaCache::new();

        let first = cache.derive_named(&compiler, "Person").unwrap();
        let second = cache.derive_named(&compiler, "Person").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let registry = registry();
        let compiler = SchemaCompiler::new(&registry);
        let cache = SchemaCache::new();

        assert!(cache.derive_named(&compiler, "Ghost").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = registry();
        let compiler = SchemaCompiler::new(&registry);
        let cache = SchemaCache::new();

        cache.derive_named(&compiler, "Person").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
