//! Schema node definitions for content modeling.
//!
//! A schema is a tree of [`SchemaNode`]s. Object nodes hold an ordered list of
//! [`Field`]s, arrays wrap a single item node, and tagged unions
//! ([`TaggedUnion`]) select one payload field based on a discriminator value.
//! Named references ([`NodeKind::Ref`]) point at collection-level definitions
//! and are the only way to express recursive shapes.
//!
//! All types serialize with [`serde`] so that registered collections can be
//! exported for authoring tools (see [`SchemaPackage`](crate::SchemaPackage)).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Enumeration;

/// Version of the schema export contract (semver).
pub const SCHEMA_CONTRACT_VERSION: &str = "1.0.0";

/// Opaque presentation metadata attached to a schema node.
///
/// Hints tell an authoring UI how to render a field (for example an icon
/// picker or a media library). Validation never reads them.
///
/// # Examples
///
/// ```
/// use content_schema_core::EditorHints;
///
/// let hints = EditorHints::new().with("input", "media");
/// assert_eq!(hints.get("input"), Some("media"));
/// assert!(EditorHints::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorHints(BTreeMap<String, String>);

impl EditorHints {
    /// Creates an empty hint map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hint, replacing any previous value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the hint stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if no hints are attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Semantic type of a schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// UTF-8 string. With `non_empty`, the trimmed value must not be empty.
    String {
        #[serde(default, skip_serializing_if = "is_false")]
        non_empty: bool,
    },
    /// `true` / `false`.
    Boolean,
    /// Any JSON number.
    Number,
    /// String restricted to the members of an enumeration.
    Enum(Enumeration),
    /// Nested object with its own fields.
    Object(ObjectSchema),
    /// Homogeneous list. With `non_empty`, at least one element is required.
    Array {
        items: Box<SchemaNode>,
        #[serde(default, skip_serializing_if = "is_false")]
        non_empty: bool,
    },
    /// Object discriminated by a tag field.
    OneOf(TaggedUnion),
    /// Any value, passed through unchecked.
    Any,
    /// Reference to a named collection definition.
    Ref { target: String },
}

impl NodeKind {
    /// Structural type name used in type-mismatch diagnostics.
    pub fn expected(&self) -> &'static str {
        match self {
            NodeKind::String { .. } | NodeKind::Enum(_) => "string",
            NodeKind::Boolean => "boolean",
            NodeKind::Number => "number",
            NodeKind::Object(_) | NodeKind::OneOf(_) => "object",
            NodeKind::Array { .. } => "array",
            NodeKind::Any => "any",
            NodeKind::Ref { .. } => "reference",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One node of a content schema.
///
/// Nodes are required by default. Use [`optional`](SchemaNode::optional) or
/// [`with_default`](SchemaNode::with_default) to relax that, and
/// [`non_empty`](SchemaNode::non_empty) to forbid blank strings and empty
/// lists.
///
/// # Examples
///
/// ```
/// use content_schema_core::SchemaNode;
/// use serde_json::json;
///
/// let billing = SchemaNode::string().with_default(json!("monthly"));
/// assert!(!billing.required);
/// assert_eq!(billing.default, Some(json!("monthly")));
///
/// let icon = SchemaNode::string().optional().editor_input("icon");
/// assert_eq!(icon.hints.get("input"), Some("icon"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Semantic type.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Whether the field must be supplied when no default exists.
    pub required: bool,
    /// Value injected when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Authoring UI metadata.
    #[serde(default, skip_serializing_if = "EditorHints::is_empty")]
    pub hints: EditorHints,
}

impl SchemaNode {
    /// Creates a required node of the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            hints: EditorHints::default(),
        }
    }

    /// Creates a required string node.
    pub fn string() -> Self {
        Self::new(NodeKind::String { non_empty: false })
    }

    /// Creates a required string node whose trimmed value must not be empty.
    pub fn non_empty_string() -> Self {
        Self::new(NodeKind::String { non_empty: true })
    }

    /// Creates a required boolean node.
    pub fn boolean() -> Self {
        Self::new(NodeKind::Boolean)
    }

    /// Creates a required number node.
    pub fn number() -> Self {
        Self::new(NodeKind::Number)
    }

    /// Creates a required enumeration node.
    pub fn enumeration(values: Enumeration) -> Self {
        Self::new(NodeKind::Enum(values))
    }

    /// Creates a required object node.
    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(NodeKind::Object(schema))
    }

    /// Creates a required list node of `items`.
    pub fn array(items: SchemaNode) -> Self {
        Self::new(NodeKind::Array {
            items: Box::new(items),
            non_empty: false,
        })
    }

    /// Creates a required tagged-union node.
    pub fn one_of(union: TaggedUnion) -> Self {
        Self::new(NodeKind::OneOf(union))
    }

    /// Creates a node that accepts any value.
    pub fn any() -> Self {
        Self::new(NodeKind::Any)
    }

    /// Creates a reference to a named collection definition.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Ref {
            target: name.into(),
        })
    }

    /// Marks the node as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the node as optional and injects `value` when absent.
    pub fn with_default(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    /// Requires non-blank strings or non-empty lists.
    ///
    /// Has no effect on other kinds.
    pub fn non_empty(mut self) -> Self {
        match &mut self.kind {
            NodeKind::String { non_empty } | NodeKind::Array { non_empty, .. } => {
                *non_empty = true
            }
            _ => {}
        }
        self
    }

    /// Attaches an editor hint.
    pub fn with_hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hints = self.hints.with(key, value);
        self
    }

    /// Shorthand for the `input` editor hint (`"icon"`, `"media"`, ...).
    pub fn editor_input(self, input: &str) -> Self {
        self.with_hint("input", input)
    }
}

/// A named field inside an object schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Key in the source mapping.
    pub name: String,
    /// Field definition.
    #[serde(flatten)]
    pub node: SchemaNode,
}

impl Field {
    /// Creates a field.
    pub fn new(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}

/// Ordered set of fields describing an object.
///
/// Field order is preserved and determines the order in which diagnostics
/// are reported. Name collisions are rejected when a collection is built
/// (see [`Collection`](crate::Collection)) and by
/// [`extend`](ObjectSchema::extend).
///
/// # Examples
///
/// ```
/// use content_schema_core::{ObjectSchema, SchemaNode};
///
/// let faq = ObjectSchema::new()
///     .field("question", SchemaNode::non_empty_string())
///     .field("answer", SchemaNode::non_empty_string());
/// assert_eq!(faq.field_names(), vec!["question", "answer"]);
/// assert!(faq.get("answer").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl ObjectSchema {
    /// Creates an object schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.fields.push(Field::new(name, node));
        self
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if a field named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Wraps the schema in a required object node.
    pub fn into_node(self) -> SchemaNode {
        SchemaNode::object(self)
    }
}

/// One case of a [`TaggedUnion`]: the tag value and its payload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Discriminator value selecting this case.
    pub tag: String,
    /// The only payload field allowed for this case.
    pub payload: Field,
}

/// Object discriminated by a tag field.
///
/// Every object carries the `tag` field (drawn from `tags`) and the `common`
/// fields. The tag selects exactly one [`Variant`]; that variant's payload is
/// validated while payload fields of every other variant are forbidden.
///
/// # Examples
///
/// ```
/// use content_schema_core::{Enumeration, ObjectSchema, SchemaNode, TaggedUnion};
///
/// let kinds = Enumeration::new("shape", ["circle", "square"]).unwrap();
/// let union = TaggedUnion::new("kind", kinds)
///     .common(ObjectSchema::new().field("label", SchemaNode::string().optional()))
///     .variant("circle", "radius", SchemaNode::number())
///     .variant("square", "side", SchemaNode::number());
///
/// assert_eq!(union.variant_for("square").unwrap().payload.name, "side");
/// assert!(union.is_payload_field("radius"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedUnion {
    /// Name of the discriminator field.
    pub tag: String,
    /// Allowed discriminator values.
    pub tags: Enumeration,
    /// Fields shared by every case.
    pub common: ObjectSchema,
    /// One entry per discriminator value.
    pub variants: Vec<Variant>,
}

impl TaggedUnion {
    /// Creates a union discriminated by `tag` with no cases yet.
    pub fn new(tag: impl Into<String>, tags: Enumeration) -> Self {
        Self {
            tag: tag.into(),
            tags,
            common: ObjectSchema::default(),
            variants: Vec::new(),
        }
    }

    /// Sets the fields shared by every case.
    pub fn common(mut self, common: ObjectSchema) -> Self {
        self.common = common;
        self
    }

    /// Adds a case carrying `payload` under `field`.
    pub fn variant(
        mut self,
        tag: impl Into<String>,
        field: impl Into<String>,
        payload: SchemaNode,
    ) -> Self {
        self.variants.push(Variant {
            tag: tag.into(),
            payload: Field::new(field, payload),
        });
        self
    }

    /// Returns the case selected by `tag`.
    pub fn variant_for(&self, tag: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.tag == tag)
    }

    /// Returns `true` if `name` is the payload field of any case.
    pub fn is_payload_field(&self, name: &str) -> bool {
        self.variants.iter().any(|v| v.payload.name == name)
    }

    /// Returns `true` if `name` is a field this union knows about.
    pub fn knows_field(&self, name: &str) -> bool {
        name == self.tag || self.common.contains(name) || self.is_payload_field(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nodes_are_required_by_default() {
        assert!(SchemaNode::string().required);
        assert!(SchemaNode::array(SchemaNode::string()).required);
        assert!(!SchemaNode::boolean().with_default(json!(false)).required);
    }

    #[test]
    fn test_non_empty_applies_to_strings_and_arrays_only() {
        let s = SchemaNode::string().non_empty();
        assert_eq!(s.kind, NodeKind::String { non_empty: true });

        let list = SchemaNode::array(SchemaNode::string()).non_empty();
        assert!(matches!(list.kind, NodeKind::Array { non_empty: true, .. }));

        let b = SchemaNode::boolean().non_empty();
        assert_eq!(b.kind, NodeKind::Boolean);
    }

    #[test]
    fn test_node_serializes_with_type_tag_and_hints() {
        let node = SchemaNode::string().optional().editor_input("media");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            json!({"type": "string", "required": false, "hints": {"input": "media"}})
        );
    }

    #[test]
    fn test_field_roundtrips_through_json() {
        let field = Field::new(
            "tags",
            SchemaNode::array(SchemaNode::non_empty_string()).optional(),
        );
        let json = serde_json::to_string(&field).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_union_knows_tag_common_and_payload_fields() {
        let tags = Enumeration::new("component", ["a", "b"]).unwrap();
        let union = TaggedUnion::new("component", tags)
            .common(ObjectSchema::new().field("id", SchemaNode::string().optional()))
            .variant("a", "alpha", SchemaNode::string())
            .variant("b", "beta", SchemaNode::string());

        assert!(union.knows_field("component"));
        assert!(union.knows_field("id"));
        assert!(union.knows_field("beta"));
        assert!(!union.knows_field("gamma"));
        assert!(union.variant_for("c").is_none());
    }
}
