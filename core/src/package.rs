use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    Collection, CollectionKind, CollectionRegistry, Enumeration, ObjectSchema, SchemaNode,
    fragments,
};

/// Serializable description of a registry, for authoring tools.
///
/// A package carries every registered collection with its full schema tree
/// (defaults and editor hints included), the reusable fragments, and the
/// enumeration catalog.
///
/// # Examples
///
/// ```
/// use content_schema_core::*;
///
/// let registry = CollectionRegistry::builtin().unwrap();
/// let package = SchemaPackage::from_registry("1.0.0", &registry);
///
/// assert_eq!(package.collection_count(), 4);
/// assert_eq!(package.version, "1.0.0");
/// assert!(package.fragments.contains_key("pricingPlan"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    pub schema_version: String,
    /// Package version (semver string).
    pub version: String,
    /// Registered collections in registration order.
    pub collections: Vec<CollectionDescriptor>,
    /// Reusable fragments keyed by export name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fragments: BTreeMap<String, ObjectSchema>,
    /// Built-in enumerations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerations: Vec<Enumeration>,
}

impl SchemaPackage {
    /// Creates an empty package.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schema_version: crate::SCHEMA_CONTRACT_VERSION.to_string(),
            version: version.into(),
            collections: Vec::new(),
            fragments: BTreeMap::new(),
            enumerations: Vec::new(),
        }
    }

    /// Describes every collection in `registry` plus the fragment and
    /// enumeration catalogs.
    pub fn from_registry(version: impl Into<String>, registry: &CollectionRegistry) -> Self {
        let mut package = Self::new(version);
        package.collections = registry.all().iter().map(CollectionDescriptor::from).collect();
        package.fragments = fragments::FRAGMENT_NAMES
            .iter()
            .filter_map(|name| fragments::fragment(name).map(|f| (name.to_string(), f)))
            .collect();
        package.enumerations = crate::catalog();
        package
    }

    /// Returns the number of collections in this package.
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Looks up a collection descriptor by name.
    pub fn find_collection(&self, name: &str) -> Option<&CollectionDescriptor> {
        self.collections.iter().find(|c| c.name == name)
    }
}

/// Exported view of one [`Collection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    pub source: SourceDescriptor,
    pub schema: ObjectSchema,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, SchemaNode>,
}

/// Include and exclude globs of a collection source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub include: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl From<&Collection> for CollectionDescriptor {
    fn from(collection: &Collection) -> Self {
        Self {
            name: collection.name().to_string(),
            kind: collection.kind(),
            source: SourceDescriptor {
                include: collection.source().include().to_string(),
                exclude: collection.source().excludes().to_vec(),
            },
            schema: collection.schema().clone(),
            definitions: collection.definitions().clone(),
        }
    }
}
