//! Collection definitions and the built-in site collections.
//!
//! A [`Collection`] binds a name and a [`SourcePattern`] to a root
//! [`ObjectSchema`]. Collections are created through [`Collection::define`],
//! whose [`build`](CollectionBuilder::build) step rejects schema defects
//! before any content is seen:
//!
//! - duplicate field names inside one object,
//! - tagged unions whose cases do not match their tag set one-to-one,
//! - references to missing definitions,
//! - definitions that reach themselves without crossing an array,
//! - defaults that do not satisfy their own node.
//!
//! The four site collections are available from [`builtin`].

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::fragments;
use crate::validate::check_value;
use crate::{
    ColorPalette, NodeKind, ObjectSchema, SchemaError, SchemaNode, SectionComponent,
    ServiceCategory, TaggedUnion,
};

/// Landing page collection name.
pub const LANDING: &str = "landing";
/// Blog post collection name.
pub const POSTS: &str = "posts";
/// Service page collection name.
pub const SERVICES: &str = "services";
/// Services overview collection name.
pub const SERVICES_INDEX: &str = "servicesIndex";

/// How documents of a collection are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Markdown file with a front-matter header and a body.
    #[default]
    Page,
    /// Whole-file YAML or JSON data.
    Data,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Glob selecting the documents of a collection, with optional exclusions.
///
/// Patterns are matched against `/`-separated paths relative to the content
/// root. `*` does not cross directory boundaries; use `**` for that.
///
/// # Examples
///
/// ```
/// use content_schema_core::SourcePattern;
///
/// let services = SourcePattern::new("services/*.md")
///     .unwrap()
///     .with_exclude("services/index.md")
///     .unwrap();
/// assert!(services.matches("services/web.md"));
/// assert!(!services.matches("services/index.md"));
/// assert!(!services.matches("services/archive/old.md"));
/// ```
#[derive(Debug, Clone)]
pub struct SourcePattern {
    include: String,
    exclude: Vec<String>,
    include_matcher: GlobMatcher,
    exclude_set: GlobSet,
}

impl SourcePattern {
    /// Compiles an include pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSourcePattern`] if the glob is malformed.
    pub fn new(include: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            include: include.to_string(),
            exclude: Vec::new(),
            include_matcher: compile_glob(include)?.compile_matcher(),
            exclude_set: GlobSet::empty(),
        })
    }

    /// Adds an exclusion pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSourcePattern`] if the glob is malformed.
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self, SchemaError> {
        self.exclude.push(pattern.to_string());
        let mut builder = GlobSetBuilder::new();
        for exclude in &self.exclude {
            builder.add(compile_glob(exclude)?);
        }
        self.exclude_set = builder
            .build()
            .map_err(|err| SchemaError::InvalidSourcePattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })?;
        Ok(self)
    }

    /// Include pattern as written.
    pub fn include(&self) -> &str {
        &self.include
    }

    /// Exclusion patterns as written.
    pub fn excludes(&self) -> &[String] {
        &self.exclude
    }

    /// Returns `true` if `relative_path` is included and not excluded.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.include_matcher.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}

impl fmt::Display for SourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.include)?;
        for exclude in &self.exclude {
            write!(f, " !{exclude}")?;
        }
        Ok(())
    }
}

fn compile_glob(pattern: &str) -> Result<Glob, SchemaError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|err| SchemaError::InvalidSourcePattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })
}

/// An immutable, validated collection definition.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    kind: CollectionKind,
    source: SourcePattern,
    schema: ObjectSchema,
    definitions: BTreeMap<String, SchemaNode>,
}

impl Collection {
    /// Starts defining a collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use content_schema_core::*;
    ///
    /// // A menu whose items may hold sub-menus.
    /// let item = ObjectSchema::new()
    ///     .field("label", SchemaNode::non_empty_string())
    ///     .field("children", SchemaNode::array(SchemaNode::reference("item")).optional());
    /// let schema = ObjectSchema::new()
    ///     .field("items", SchemaNode::array(SchemaNode::reference("item")));
    ///
    /// let menu = Collection::define("menu", SourcePattern::new("menu.yml").unwrap(), schema)
    ///     .kind(CollectionKind::Data)
    ///     .definition("item", item.into_node())
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(menu.name(), "menu");
    ///
    /// // Without the array, the self-reference is rejected.
    /// let looped = ObjectSchema::new()
    ///     .field("next", SchemaNode::reference("item").optional());
    /// let err = Collection::define("chain", SourcePattern::new("*.yml").unwrap(), ObjectSchema::new())
    ///     .definition("item", looped.into_node())
    ///     .build()
    ///     .unwrap_err();
    /// assert_eq!(err, SchemaError::UnboundedRecursion("item".into()));
    /// ```
    pub fn define(
        name: impl Into<String>,
        source: SourcePattern,
        schema: ObjectSchema,
    ) -> CollectionBuilder {
        CollectionBuilder {
            name: name.into(),
            kind: CollectionKind::default(),
            source,
            schema,
            definitions: BTreeMap::new(),
        }
    }

    /// Unique collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage kind.
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Source pattern.
    pub fn source(&self) -> &SourcePattern {
        &self.source
    }

    /// Root object schema.
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Named definitions available to references.
    pub fn definitions(&self) -> &BTreeMap<String, SchemaNode> {
        &self.definitions
    }

    /// Returns `true` if the document at `relative_path` belongs here.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.source.matches(relative_path)
    }
}

/// Builder returned by [`Collection::define`].
#[derive(Debug, Clone)]
pub struct CollectionBuilder {
    name: String,
    kind: CollectionKind,
    source: SourcePattern,
    schema: ObjectSchema,
    definitions: BTreeMap<String, SchemaNode>,
}

impl CollectionBuilder {
    /// Sets the storage kind (defaults to [`CollectionKind::Page`]).
    pub fn kind(mut self, kind: CollectionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a named definition for [`SchemaNode::reference`].
    pub fn definition(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.definitions.insert(name.into(), node);
        self
    }

    /// Checks the schema graph and freezes the collection.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found in the root schema, then in
    /// each definition.
    pub fn build(self) -> Result<Collection, SchemaError> {
        let checker = SchemaChecker {
            definitions: &self.definitions,
        };
        checker.object(&self.schema, "", &mut Vec::new(), 0)?;
        for (name, node) in &self.definitions {
            checker.node(node, name, &mut vec![(name.clone(), 0)], 0)?;
        }

        Ok(Collection {
            name: self.name,
            kind: self.kind,
            source: self.source,
            schema: self.schema,
            definitions: self.definitions,
        })
    }
}

/// Walks a schema graph; `depth` counts arrays crossed since the root.
struct SchemaChecker<'a> {
    definitions: &'a BTreeMap<String, SchemaNode>,
}

impl SchemaChecker<'_> {
    fn node(
        &self,
        node: &SchemaNode,
        path: &str,
        stack: &mut Vec<(String, usize)>,
        depth: usize,
    ) -> Result<(), SchemaError> {
        match &node.kind {
            NodeKind::Object(schema) => self.object(schema, path, stack, depth)?,
            NodeKind::Array { items, .. } => {
                self.node(items, &format!("{path}[]"), stack, depth + 1)?
            }
            NodeKind::OneOf(union) => self.union(union, path, stack, depth)?,
            NodeKind::Ref { target } => self.reference(target, path, stack, depth)?,
            NodeKind::String { .. }
            | NodeKind::Boolean
            | NodeKind::Number
            | NodeKind::Enum(_)
            | NodeKind::Any => {}
        }

        if let Some(default) = &node.default {
            if let Some(first) = check_value(node, default, self.definitions).first() {
                return Err(SchemaError::InvalidDefault {
                    path: path.to_string(),
                    detail: first.detail.clone(),
                });
            }
        }
        Ok(())
    }

    fn object(
        &self,
        schema: &ObjectSchema,
        path: &str,
        stack: &mut Vec<(String, usize)>,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &schema.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::FieldCollision {
                    field: field.name.clone(),
                    context: context_label(path),
                });
            }
            self.node(&field.node, &join(path, &field.name), stack, depth)?;
        }
        Ok(())
    }

    fn union(
        &self,
        union: &TaggedUnion,
        path: &str,
        stack: &mut Vec<(String, usize)>,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let mismatch = |detail: String| SchemaError::VariantMismatch {
            tag: union.tag.clone(),
            detail,
        };

        let mut covered = HashSet::new();
        for variant in &union.variants {
            if !union.tags.is_member(&variant.tag) {
                return Err(mismatch(format!(
                    "case '{}' is not in {}",
                    variant.tag,
                    union.tags.name()
                )));
            }
            if !covered.insert(variant.tag.as_str()) {
                return Err(mismatch(format!("case '{}' is declared twice", variant.tag)));
            }
        }
        if let Some(missing) = union
            .tags
            .members()
            .iter()
            .find(|m| !covered.contains(m.as_str()))
        {
            return Err(mismatch(format!("no case for '{missing}'")));
        }

        let mut names: HashSet<&str> = HashSet::from([union.tag.as_str()]);
        let payloads = union.variants.iter().map(|v| &v.payload);
        for field in union.common.fields.iter().chain(payloads) {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::FieldCollision {
                    field: field.name.clone(),
                    context: context_label(path),
                });
            }
        }

        self.object(&union.common, path, stack, depth)?;
        for variant in &union.variants {
            let payload = &variant.payload;
            self.node(&payload.node, &join(path, &payload.name), stack, depth)?;
        }
        Ok(())
    }

    fn reference(
        &self,
        target: &str,
        path: &str,
        stack: &mut Vec<(String, usize)>,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let definition = self
            .definitions
            .get(target)
            .ok_or_else(|| SchemaError::UnresolvedReference(target.to_string()))?;

        if let Some((_, entered)) = stack.iter().find(|(name, _)| name == target) {
            return if depth > *entered {
                Ok(())
            } else {
                Err(SchemaError::UnboundedRecursion(target.to_string()))
            };
        }

        stack.push((target.to_string(), depth));
        let result = self.node(definition, path, stack, depth);
        stack.pop();
        result
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn context_label(path: &str) -> String {
    if path.is_empty() {
        "root object".to_string()
    } else {
        format!("'{path}'")
    }
}

/// Fields shared by pages and landing sections.
pub fn base() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", SchemaNode::non_empty_string())
        .field("description", SchemaNode::non_empty_string())
}

fn list_of(fragment: ObjectSchema) -> SchemaNode {
    SchemaNode::array(fragment.into_node())
}

/// Landing-page section: `base` plus `id`, discriminated by `component`.
///
/// # Errors
///
/// Propagates [`SchemaError::FieldCollision`] from the base extension.
pub fn section() -> Result<SchemaNode, SchemaError> {
    let common = base().extend(&ObjectSchema::new().field("id", SchemaNode::string().optional()))?;

    let payload = |component: SectionComponent, fragment: ObjectSchema| {
        (component.as_str(), list_of(fragment).non_empty())
    };
    let cases = [
        payload(SectionComponent::Features, fragments::feature()),
        payload(SectionComponent::Testimonials, fragments::testimonial()),
        payload(SectionComponent::Pricing, fragments::pricing_plan()),
        payload(SectionComponent::Faq, fragments::faq_item()),
        payload(SectionComponent::Cta, fragments::link()),
    ];

    let mut union = TaggedUnion::new("component", SectionComponent::enumeration()).common(common);
    for (tag, node) in cases {
        // Each case stores its payload under a field named after the tag.
        union = union.variant(tag, tag, node);
    }
    Ok(SchemaNode::one_of(union))
}

/// `landing`: the home page (`index.md`).
///
/// # Errors
///
/// Returns a [`SchemaError`] if the definition is inconsistent.
pub fn landing() -> Result<Collection, SchemaError> {
    let schema = base().extend(
        &ObjectSchema::new()
            .field("hero", fragments::hero().into_node())
            .field("sections", SchemaNode::array(section()?).optional()),
    )?;
    Collection::define(LANDING, SourcePattern::new("index.md")?, schema)
        .kind(CollectionKind::Page)
        .build()
}

/// `posts`: blog articles (`blog/*.md`).
///
/// # Errors
///
/// Returns a [`SchemaError`] if the definition is inconsistent.
pub fn posts() -> Result<Collection, SchemaError> {
    let author = ObjectSchema::new()
        .field("name", SchemaNode::non_empty_string())
        .field(
            "avatar",
            SchemaNode::string().optional().editor_input("media"),
        )
        .field("bio", SchemaNode::string().optional());
    let category = ObjectSchema::new()
        .field("name", SchemaNode::non_empty_string())
        .field("slug", SchemaNode::non_empty_string())
        .field(
            "color",
            SchemaNode::enumeration(ColorPalette::enumeration())
                .with_default(ColorPalette::Primary.as_str().into()),
        );
    let image = ObjectSchema::new()
        .field(
            "src",
            SchemaNode::non_empty_string().editor_input("media"),
        )
        .field("alt", SchemaNode::non_empty_string());

    let schema = ObjectSchema::new()
        .field("title", SchemaNode::non_empty_string())
        .field("excerpt", SchemaNode::non_empty_string())
        .field("date", SchemaNode::non_empty_string())
        .field("author", author.into_node())
        .field("category", category.into_node())
        .field("tags", SchemaNode::array(SchemaNode::string()).optional())
        .field("image", image.into_node().optional())
        .field("featured", SchemaNode::boolean().with_default(false.into()))
        .field("draft", SchemaNode::boolean().with_default(false.into()));

    Collection::define(POSTS, SourcePattern::new("blog/*.md")?, schema)
        .kind(CollectionKind::Page)
        .build()
}

/// `services`: one page per service (`services/*.md`, except the index).
///
/// # Errors
///
/// Returns a [`SchemaError`] if the definition is inconsistent.
pub fn services() -> Result<Collection, SchemaError> {
    let hero = ObjectSchema::new()
        .field("image", SchemaNode::string().optional().editor_input("media"))
        .field("heading", SchemaNode::string().optional())
        .field("subheading", SchemaNode::string().optional());

    let schema = base().extend(
        &ObjectSchema::new()
            .field("slug", SchemaNode::non_empty_string())
            .field(
                "category",
                SchemaNode::enumeration(ServiceCategory::enumeration()),
            )
            .field("tagline", SchemaNode::string().optional())
            .field("icon", SchemaNode::string().optional().editor_input("icon"))
            .field("hero", hero.into_node().optional())
            .field("features", list_of(fragments::feature()).optional())
            .field("pricing", list_of(fragments::pricing_plan()).optional())
            .field("testimonials", list_of(fragments::testimonial()).optional())
            .field("faq", list_of(fragments::faq_item()).optional())
            .field("cta", list_of(fragments::link()).optional()),
    )?;

    let source = SourcePattern::new("services/*.md")?.with_exclude("services/index.md")?;
    Collection::define(SERVICES, source, schema)
        .kind(CollectionKind::Page)
        .build()
}

/// `servicesIndex`: the services overview (`services/index.md`).
///
/// # Errors
///
/// Returns a [`SchemaError`] if the definition is inconsistent.
pub fn services_index() -> Result<Collection, SchemaError> {
    let summary = ObjectSchema::new()
        .field("title", SchemaNode::non_empty_string())
        .field("description", SchemaNode::non_empty_string())
        .field("icon", SchemaNode::string().optional().editor_input("icon"))
        .field(
            "category",
            SchemaNode::enumeration(ServiceCategory::enumeration()),
        )
        .field("url", SchemaNode::non_empty_string());

    let schema = base().extend(
        &ObjectSchema::new()
            .field(
                "hero",
                fragments::hero().pick(&["heading", "subheading"])?.into_node(),
            )
            .field("intro", SchemaNode::string().optional())
            .field("services", list_of(summary))
            .field("cta", list_of(fragments::link()).optional()),
    )?;

    Collection::define(SERVICES_INDEX, SourcePattern::new("services/index.md")?, schema)
        .kind(CollectionKind::Page)
        .build()
}

/// Builds the four site collections in registration order.
///
/// # Errors
///
/// Returns the first [`SchemaError`] encountered.
pub fn builtin() -> Result<Vec<Collection>, SchemaError> {
    Ok(vec![landing()?, posts()?, services()?, services_index()?])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Enumeration;

    fn any_source() -> SourcePattern {
        SourcePattern::new("**/*.md").unwrap()
    }

    #[test]
    fn test_builtin_collections_build() {
        let names: Vec<String> = builtin()
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec![LANDING, POSTS, SERVICES, SERVICES_INDEX]);
    }

    #[test]
    fn test_builtin_sources() {
        let landing = landing().unwrap();
        assert!(landing.matches("index.md"));
        assert!(!landing.matches("blog/index.md"));

        let posts = posts().unwrap();
        assert!(posts.matches("blog/hello-world.md"));
        assert!(!posts.matches("blog/drafts/wip.md"));

        let services = services().unwrap();
        let index = services_index().unwrap();
        assert!(services.matches("services/web.md"));
        assert!(!services.matches("services/index.md"));
        assert!(index.matches("services/index.md"));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let err = SourcePattern::new("blog/[.md").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSourcePattern { .. }));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let schema = ObjectSchema::new()
            .field("title", SchemaNode::string())
            .field("title", SchemaNode::string());
        let err = Collection::define("dup", any_source(), schema)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::FieldCollision {
                field: "title".into(),
                context: "root object".into(),
            }
        );
    }

    #[test]
    fn test_unresolved_reference_is_rejected() {
        let schema = ObjectSchema::new().field("x", SchemaNode::reference("missing"));
        let err = Collection::define("refs", any_source(), schema)
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::UnresolvedReference("missing".into()));
    }

    #[test]
    fn test_mutual_recursion_without_array_is_rejected() {
        let a = ObjectSchema::new().field("b", SchemaNode::reference("b").optional());
        let b = ObjectSchema::new().field("a", SchemaNode::reference("a").optional());
        let schema = ObjectSchema::new().field("root", SchemaNode::reference("a"));
        let err = Collection::define("cycle", any_source(), schema)
            .definition("a", a.into_node())
            .definition("b", b.into_node())
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::UnboundedRecursion("a".into()));
    }

    #[test]
    fn test_recursion_through_array_is_accepted() {
        let node = ObjectSchema::new()
            .field("name", SchemaNode::string())
            .field(
                "children",
                SchemaNode::array(SchemaNode::reference("node")).optional(),
            );
        let schema = ObjectSchema::new().field("tree", SchemaNode::reference("node"));
        let collection = Collection::define("tree", any_source(), schema)
            .definition("node", node.into_node())
            .build();
        assert!(collection.is_ok());
    }

    #[test]
    fn test_union_missing_case_is_rejected() {
        let tags = Enumeration::new("kind", ["a", "b"]).unwrap();
        let union = TaggedUnion::new("kind", tags).variant("a", "a", SchemaNode::string());
        let schema = ObjectSchema::new().field("item", SchemaNode::one_of(union));
        let err = Collection::define("u", any_source(), schema)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::VariantMismatch {
                tag: "kind".into(),
                detail: "no case for 'b'".into(),
            }
        );
    }

    #[test]
    fn test_union_payload_colliding_with_common_field_is_rejected() {
        let tags = Enumeration::new("kind", ["a"]).unwrap();
        let union = TaggedUnion::new("kind", tags)
            .common(ObjectSchema::new().field("a", SchemaNode::string()))
            .variant("a", "a", SchemaNode::string());
        let schema = ObjectSchema::new().field("item", SchemaNode::one_of(union));
        let err = Collection::define("u", any_source(), schema)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::FieldCollision { .. }));
    }

    #[test]
    fn test_invalid_default_is_rejected() {
        let schema = ObjectSchema::new().field(
            "color",
            SchemaNode::enumeration(ColorPalette::enumeration()).with_default(json!("mauve")),
        );
        let err = Collection::define("colors", any_source(), schema)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { ref path, .. } if path == "color"));
    }

    #[test]
    fn test_source_pattern_display_lists_exclusions() {
        let source = services().unwrap().source().to_string();
        assert_eq!(source, "services/*.md !services/index.md");
    }
}
