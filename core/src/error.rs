//! Schema construction errors.
//!
//! These indicate a defect in schema definitions, not in content, and are
//! meant to abort initialization. Content problems are reported separately as
//! [`ValidationError`](crate::ValidationError)s.

use thiserror::Error;

/// Errors raised while building enumerations, schemas, or collections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two collections share a name within one registry.
    #[error("duplicate collection: {0}")]
    DuplicateCollection(String),

    /// A field name appears twice in one object (including merges).
    #[error("field '{field}' is defined more than once in {context}")]
    FieldCollision { field: String, context: String },

    /// A pick/omit operation named a field the object does not have.
    #[error("field '{field}' does not exist in {context}")]
    NoSuchField { field: String, context: String },

    /// A named reference has no matching definition.
    #[error("unresolved schema reference '{0}'")]
    UnresolvedReference(String),

    /// A definition reaches itself without passing through an array.
    #[error("definition '{0}' refers to itself without an array boundary")]
    UnboundedRecursion(String),

    /// An enumeration was declared with no members.
    #[error("enumeration '{0}' has no members")]
    EmptyEnumeration(String),

    /// An enumeration lists the same member twice.
    #[error("enumeration '{name}' lists '{member}' more than once")]
    DuplicateEnumMember { name: String, member: String },

    /// Tagged-union cases do not line up one-to-one with the tag set.
    #[error("tagged union on '{tag}' is inconsistent: {detail}")]
    VariantMismatch { tag: String, detail: String },

    /// A declared default does not satisfy its own node.
    #[error("default for '{path}' is invalid: {detail}")]
    InvalidDefault { path: String, detail: String },

    /// A source glob failed to compile.
    #[error("invalid source pattern '{pattern}': {reason}")]
    InvalidSourcePattern { pattern: String, reason: String },
}
