//! Structural composition of object schemas.
//!
//! Schemas are composed by value: every operation here returns a new
//! [`ObjectSchema`] and leaves its inputs untouched, so a fragment embedded in
//! one collection can never be changed through another.
//!
//! # Example
//!
//! ```
//! use content_schema_core::*;
//!
//! let base = ObjectSchema::new()
//!     .field("title", SchemaNode::non_empty_string())
//!     .field("description", SchemaNode::non_empty_string());
//! let extension = ObjectSchema::new().field("slug", SchemaNode::non_empty_string());
//!
//! let merged = base.extend(&extension).unwrap();
//! assert_eq!(merged.field_names(), vec!["title", "description", "slug"]);
//!
//! // Shadowing a base field is rejected.
//! let clash = ObjectSchema::new().field("title", SchemaNode::string());
//! assert!(base.extend(&clash).is_err());
//! ```

use std::collections::HashSet;

use crate::{ObjectSchema, SchemaError};

impl ObjectSchema {
    /// Returns `self` followed by the fields of `extension`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::FieldCollision`] if `extension` redeclares a
    /// field that `self` already has.
    pub fn extend(&self, extension: &ObjectSchema) -> Result<ObjectSchema, SchemaError> {
        merge_fields(self, extension)
    }

    /// Returns a schema keeping only `names`, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoSuchField`] if a name is not declared.
    pub fn pick(&self, names: &[&str]) -> Result<ObjectSchema, SchemaError> {
        let mut picked = ObjectSchema::new();
        for name in names {
            let field = self.get(name).ok_or_else(|| SchemaError::NoSuchField {
                field: (*name).to_string(),
                context: "pick".to_string(),
            })?;
            picked.fields.push(field.clone());
        }
        Ok(picked)
    }

    /// Returns a schema without `names`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NoSuchField`] if a name is not declared.
    pub fn omit(&self, names: &[&str]) -> Result<ObjectSchema, SchemaError> {
        if let Some(missing) = names.iter().find(|name| !self.contains(name)) {
            return Err(SchemaError::NoSuchField {
                field: (*missing).to_string(),
                context: "omit".to_string(),
            });
        }
        let fields = self
            .fields
            .iter()
            .filter(|f| !names.contains(&f.name.as_str()))
            .cloned()
            .collect();
        Ok(ObjectSchema { fields })
    }

    /// Returns a copy where every top-level field is optional.
    ///
    /// Declared defaults are kept.
    pub fn partial(&self) -> ObjectSchema {
        let fields = self
            .fields
            .iter()
            .cloned()
            .map(|mut f| {
                f.node.required = false;
                f
            })
            .collect();
        ObjectSchema { fields }
    }
}

/// Concatenates the fields of `base` and `extension`.
///
/// # Errors
///
/// Returns [`SchemaError::FieldCollision`] on the first name declared by
/// both sides.
pub fn merge_fields(
    base: &ObjectSchema,
    extension: &ObjectSchema,
) -> Result<ObjectSchema, SchemaError> {
    let mut seen: HashSet<&str> = base.fields.iter().map(|f| f.name.as_str()).collect();
    let mut merged = base.clone();

    for field in &extension.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::FieldCollision {
                field: field.name.clone(),
                context: "extension".to_string(),
            });
        }
        merged.fields.push(field.clone());
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::SchemaNode;

    fn base() -> ObjectSchema {
        ObjectSchema::new()
            .field("title", SchemaNode::non_empty_string())
            .field("description", SchemaNode::non_empty_string())
    }

    #[test]
    fn test_extend_appends_in_order() {
        let extension = ObjectSchema::new()
            .field("id", SchemaNode::string().optional())
            .field("slug", SchemaNode::string());
        let merged = base().extend(&extension).unwrap();
        assert_eq!(
            merged.field_names(),
            vec!["title", "description", "id", "slug"]
        );
    }

    #[test]
    fn test_extend_rejects_collision() {
        let extension = ObjectSchema::new().field("description", SchemaNode::string());
        let err = base().extend(&extension).unwrap_err();
        assert_eq!(
            err,
            SchemaError::FieldCollision {
                field: "description".to_string(),
                context: "extension".to_string(),
            }
        );
    }

    #[test]
    fn test_extend_leaves_inputs_untouched() {
        let original = base();
        let extension = ObjectSchema::new().field("slug", SchemaNode::string());
        let mut merged = original.extend(&extension).unwrap();
        merged.fields[0].node.required = false;
        assert!(original.fields[0].node.required);
    }

    #[test]
    fn test_pick_and_partial() {
        let hero = ObjectSchema::new()
            .field("heading", SchemaNode::non_empty_string())
            .field("subheading", SchemaNode::string().optional())
            .field("image", SchemaNode::string().optional());

        let picked = hero.pick(&["image", "heading"]).unwrap();
        assert_eq!(picked.field_names(), vec!["image", "heading"]);

        let relaxed = picked.partial();
        assert!(relaxed.fields.iter().all(|f| !f.node.required));
        assert!(hero.get("heading").unwrap().node.required);
    }

    #[test]
    fn test_pick_unknown_field_fails() {
        assert!(matches!(
            base().pick(&["nope"]),
            Err(SchemaError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_omit_keeps_defaults() {
        let schema = base().field("draft", SchemaNode::boolean().with_default(json!(false)));
        let omitted = schema.omit(&["title"]).unwrap();
        assert_eq!(omitted.field_names(), vec!["description", "draft"]);
        assert_eq!(omitted.get("draft").unwrap().node.default, Some(json!(false)));
    }
}
