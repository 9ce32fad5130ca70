//! Name-to-collection registry.
//!
//! A [`CollectionRegistry`] is created once at startup, filled with
//! [`register`](CollectionRegistry::register), and then shared read-only with
//! the loader and validation code. It is `Send + Sync`; validating documents
//! from many threads needs no locking.
//!
//! ```
//! use content_schema_core::CollectionRegistry;
//!
//! let registry = CollectionRegistry::builtin().unwrap();
//! let names: Vec<&str> = registry.names().collect();
//! assert_eq!(names, vec!["landing", "posts", "services", "servicesIndex"]);
//! assert!(registry.get("posts").is_some());
//! assert!(registry.get("authors").is_none());
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::validate::validate_document;
use crate::{
    Collection, ErrorKind, ErrorList, SchemaError, ValidatedDocument, ValidationError,
    ValidationOptions, collections,
};

/// Registered collections in registration order with O(1) lookup by name.
#[derive(Debug, Default)]
pub struct CollectionRegistry {
    collections: Vec<Collection>,
    index: HashMap<String, usize>,
}

impl CollectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in site collections.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if a built-in definition is inconsistent.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for collection in collections::builtin()? {
            registry.register(collection)?;
        }
        Ok(registry)
    }

    /// Adds a collection.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateCollection`] if the name is taken.
    pub fn register(&mut self, collection: Collection) -> Result<(), SchemaError> {
        let name = collection.name().to_string();
        if self.index.contains_key(&name) {
            return Err(SchemaError::DuplicateCollection(name));
        }
        debug!(
            collection = %name,
            source = %collection.source(),
            kind = %collection.kind(),
            "registered collection"
        );
        self.index.insert(name, self.collections.len());
        self.collections.push(collection);
        Ok(())
    }

    /// Looks up a collection by name.
    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.index.get(name).map(|&i| &self.collections[i])
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All collections in registration order.
    pub fn all(&self) -> &[Collection] {
        &self.collections
    }

    /// Collection names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(Collection::name)
    }

    /// Collections whose source pattern matches `relative_path`.
    pub fn matching<'a>(&'a self, relative_path: &'a str) -> impl Iterator<Item = &'a Collection> {
        self.collections
            .iter()
            .filter(move |c| c.matches(relative_path))
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Validates `raw` against the named collection with default options.
    ///
    /// # Errors
    ///
    /// See [`validate_with`](Self::validate_with).
    pub fn validate(&self, collection: &str, raw: &Value) -> Result<ValidatedDocument, ErrorList> {
        self.validate_with(collection, raw, &ValidationOptions::default())
    }

    /// Validates `raw` against the named collection.
    ///
    /// # Errors
    ///
    /// Returns a single [`ErrorKind::UnknownCollection`] if the name is not
    /// registered, otherwise every diagnostic found in the document.
    pub fn validate_with(
        &self,
        collection: &str,
        raw: &Value,
        options: &ValidationOptions,
    ) -> Result<ValidatedDocument, ErrorList> {
        let Some(target) = self.get(collection) else {
            return Err(ErrorList::from(vec![ValidationError::new(
                "",
                ErrorKind::UnknownCollection {
                    name: collection.to_string(),
                },
            )]));
        };
        validate_document(target, raw, options)
    }
}
