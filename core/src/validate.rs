//! Document validation and default injection.
//!
//! [`validate_document`] walks a collection schema and a raw front-matter
//! mapping side by side. It records every problem it finds rather than
//! stopping at the first one, fills in declared defaults for absent optional
//! fields, and applies the configured [`UnknownFieldPolicy`] to keys the
//! schema does not model.
//!
//! # Examples
//!
//! ```
//! use content_schema_core::*;
//! use serde_json::json;
//!
//! let registry = CollectionRegistry::builtin().unwrap();
//!
//! let raw = json!({
//!     "title": "Home",
//!     "description": "Welcome",
//!     "hero": {"heading": "Hi", "cta": [{"text": "Learn more", "url": "/about"}]},
//! });
//! let doc = registry.validate("landing", &raw).unwrap();
//! assert_eq!(doc.get("hero").unwrap()["cta"][0]["external"], json!(false));
//!
//! let errors = registry.validate("landing", &json!({"title": ""})).unwrap_err();
//! let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
//! assert_eq!(paths, vec!["title", "description", "hero"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Collection, Field, NodeKind, ObjectSchema, SchemaNode, TaggedUnion};

/// What happens to input keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Copy them into the validated document unchanged.
    #[default]
    Preserve,
    /// Drop them silently.
    Strip,
    /// Report each one as [`ErrorKind::UnknownField`].
    Reject,
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserve => write!(f, "preserve"),
            Self::Strip => write!(f, "strip"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Options controlling a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Policy for undeclared keys.
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,
}

/// Category of a content validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// No collection is registered under the requested name.
    #[error("collection '{name}' is not registered")]
    UnknownCollection { name: String },
    /// A required field is absent.
    #[error("required field is missing")]
    MissingField,
    /// The value has the wrong structural type.
    #[error("expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
    /// The value is not a member of the field's enumeration.
    #[error("'{actual}' is not one of: {}", .allowed.join(", "))]
    InvalidEnumValue { allowed: Vec<String>, actual: String },
    /// A non-empty string is blank, or a non-empty list has no elements.
    #[error("value must not be empty")]
    EmptyField,
    /// A section carries a payload that belongs to a different component.
    #[error("field is not allowed when {tag} is '{value}'")]
    ForbiddenField { tag: String, value: String },
    /// The key is not declared and the policy is [`UnknownFieldPolicy::Reject`].
    #[error("field is not declared by the schema")]
    UnknownField,
}

/// One diagnostic: where, what, and a human-readable detail.
///
/// `path` uses dots for object nesting and brackets for list indices
/// (`sections[1].pricing[0].cta.url`). The document root is the empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field path inside the document.
    pub path: String,
    /// Error category and its data.
    #[serde(flatten)]
    pub kind: ErrorKind,
    /// Rendered message for `kind`.
    pub detail: String,
}

impl ValidationError {
    /// Creates an error and renders its detail message.
    pub fn new(path: impl Into<String>, kind: ErrorKind) -> Self {
        let detail = kind.to_string();
        Self {
            path: path.into(),
            kind,
            detail,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<document>: {}", self.detail)
        } else {
            write!(f, "{}: {}", self.path, self.detail)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Ordered list of diagnostics returned by a failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{} validation error(s)", .0.len())]
pub struct ErrorList(Vec<ValidationError>);

impl ErrorList {
    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Diagnostics as a slice.
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    /// Unwraps the inner vector.
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ErrorList {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ErrorList {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A document that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedDocument {
    collection: String,
    fields: Map<String, Value>,
}

impl ValidatedDocument {
    /// Name of the collection the document was validated against.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Validated fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Looks up a top-level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the fields as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Unwraps the field map.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Deserializes into a typed view such as [`LandingPage`](crate::LandingPage).
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if `T` does not fit the document.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields))
    }
}

/// Validates `raw` against `collection`.
///
/// # Errors
///
/// Returns every diagnostic found, in schema order. A non-object `raw`
/// yields a single root-level [`ErrorKind::TypeMismatch`].
pub fn validate_document(
    collection: &Collection,
    raw: &Value,
    options: &ValidationOptions,
) -> Result<ValidatedDocument, ErrorList> {
    let Some(map) = raw.as_object() else {
        return Err(ErrorList(vec![ValidationError::new(
            "",
            ErrorKind::TypeMismatch {
                expected: "object".to_string(),
                actual: json_type(raw).to_string(),
            },
        )]));
    };

    let mut walker = Walker::new(collection.definitions(), options);
    let fields = walker.object(collection.schema(), map, "");
    if walker.errors.is_empty() {
        Ok(ValidatedDocument {
            collection: collection.name().to_string(),
            fields,
        })
    } else {
        Err(ErrorList(walker.errors))
    }
}

/// Checks a single value against `node`, ignoring `required`/`default`.
pub(crate) fn check_value(
    node: &SchemaNode,
    value: &Value,
    definitions: &BTreeMap<String, SchemaNode>,
) -> Vec<ValidationError> {
    let options = ValidationOptions::default();
    let mut walker = Walker::new(definitions, &options);
    walker.node(node, value, "");
    walker.errors
}

/// Name of the JSON type of `value`, as used in diagnostics.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct Walker<'a> {
    definitions: &'a BTreeMap<String, SchemaNode>,
    options: &'a ValidationOptions,
    errors: Vec<ValidationError>,
}

impl<'a> Walker<'a> {
    fn new(definitions: &'a BTreeMap<String, SchemaNode>, options: &'a ValidationOptions) -> Self {
        Self {
            definitions,
            options,
            errors: Vec::new(),
        }
    }

    fn report(&mut self, path: String, kind: ErrorKind) {
        self.errors.push(ValidationError::new(path, kind));
    }

    fn mismatch(&mut self, path: &str, expected: &str, value: &Value) {
        self.report(
            path.to_string(),
            ErrorKind::TypeMismatch {
                expected: expected.to_string(),
                actual: json_type(value).to_string(),
            },
        );
    }

    fn node(&mut self, node: &SchemaNode, value: &Value, path: &str) -> Value {
        match (&node.kind, value) {
            (NodeKind::String { non_empty }, Value::String(s)) => {
                if *non_empty && s.trim().is_empty() {
                    self.report(path.to_string(), ErrorKind::EmptyField);
                }
                value.clone()
            }
            (NodeKind::Boolean, Value::Bool(_)) | (NodeKind::Number, Value::Number(_)) => {
                value.clone()
            }
            (NodeKind::Enum(values), Value::String(s)) => {
                if !values.is_member(s) {
                    self.report(
                        path.to_string(),
                        ErrorKind::InvalidEnumValue {
                            allowed: values.members().to_vec(),
                            actual: s.clone(),
                        },
                    );
                }
                value.clone()
            }
            (NodeKind::Object(schema), Value::Object(map)) => {
                Value::Object(self.object(schema, map, path))
            }
            (NodeKind::Array { items, non_empty }, Value::Array(elements)) => {
                if *non_empty && elements.is_empty() {
                    self.report(path.to_string(), ErrorKind::EmptyField);
                }
                let validated = elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| self.node(items, element, &format!("{path}[{i}]")))
                    .collect();
                Value::Array(validated)
            }
            (NodeKind::OneOf(union), Value::Object(map)) => {
                Value::Object(self.union(union, map, path))
            }
            (NodeKind::Any, _) => value.clone(),
            (NodeKind::Ref { target }, _) => {
                let definitions = self.definitions;
                match definitions.get(target) {
                    Some(definition) => self.node(definition, value, path),
                    None => {
                        tracing::warn!(reference = %target, path, "unresolved reference passed through");
                        value.clone()
                    }
                }
            }
            (kind, _) => {
                self.mismatch(path, kind.expected(), value);
                value.clone()
            }
        }
    }

    fn object(&mut self, schema: &ObjectSchema, map: &Map<String, Value>, path: &str) -> Map<String, Value> {
        let mut out = Map::new();
        self.fields(&schema.fields, map, path, &mut out);
        self.unknown(map, path, &mut out, |name| schema.contains(name));
        out
    }

    fn fields(
        &mut self,
        fields: &[Field],
        map: &Map<String, Value>,
        path: &str,
        out: &mut Map<String, Value>,
    ) {
        for field in fields {
            let child = join(path, &field.name);
            match (map.get(&field.name), &field.node.default) {
                (Some(value), _) => {
                    let validated = self.node(&field.node, value, &child);
                    out.insert(field.name.clone(), validated);
                }
                (None, Some(default)) => {
                    out.insert(field.name.clone(), default.clone());
                }
                (None, None) if field.node.required => {
                    self.report(child, ErrorKind::MissingField);
                }
                (None, None) => {}
            }
        }
    }

    fn union(&mut self, union: &TaggedUnion, map: &Map<String, Value>, path: &str) -> Map<String, Value> {
        let mut out = Map::new();
        self.fields(&union.common.fields, map, path, &mut out);

        let tag_path = join(path, &union.tag);
        let selected = match map.get(&union.tag) {
            None => {
                self.report(tag_path, ErrorKind::MissingField);
                None
            }
            Some(Value::String(tag)) if union.tags.is_member(tag) => {
                out.insert(union.tag.clone(), Value::String(tag.clone()));
                union.variant_for(tag)
            }
            Some(Value::String(tag)) => {
                self.report(
                    tag_path,
                    ErrorKind::InvalidEnumValue {
                        allowed: union.tags.members().to_vec(),
                        actual: tag.clone(),
                    },
                );
                None
            }
            Some(other) => {
                self.mismatch(&tag_path, "string", other);
                None
            }
        };

        if let Some(variant) = selected {
            self.fields(std::slice::from_ref(&variant.payload), map, path, &mut out);
            for other in union.variants.iter().filter(|v| v.tag != variant.tag) {
                if map.contains_key(&other.payload.name) {
                    self.report(
                        join(path, &other.payload.name),
                        ErrorKind::ForbiddenField {
                            tag: union.tag.clone(),
                            value: variant.tag.clone(),
                        },
                    );
                }
            }
        }

        self.unknown(map, path, &mut out, |name| union.knows_field(name));
        out
    }

    fn unknown(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        out: &mut Map<String, Value>,
        is_known: impl Fn(&str) -> bool,
    ) {
        for (name, value) in map {
            if is_known(name) {
                continue;
            }
            match self.options.unknown_fields {
                UnknownFieldPolicy::Preserve => {
                    out.insert(name.clone(), value.clone());
                }
                UnknownFieldPolicy::Strip => {}
                UnknownFieldPolicy::Reject => {
                    self.report(join(path, name), ErrorKind::UnknownField);
                }
            }
        }
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
