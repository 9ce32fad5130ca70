//! Typed content schemas and front-matter validation.
//!
//! This crate models the structured header of site content documents and
//! checks raw documents against it:
//!
//! - [`SchemaNode`], [`ObjectSchema`], [`TaggedUnion`] — the schema tree,
//!   with required/optional fields, defaults, and editor hints.
//! - [`Enumeration`] and the typed enums ([`ButtonSize`], [`ColorPalette`],
//!   ...) — closed string sets.
//! - [`fragments`] — reusable shapes (link, feature, pricing plan, ...).
//! - [`Collection`] — a named schema bound to a [`SourcePattern`]; the four
//!   site collections live in [`collections`].
//! - [`CollectionRegistry`] — name lookup and the validation entry point.
//! - [`SchemaPackage`] — a serializable export for authoring tools.
//!
//! Validation ([`CollectionRegistry::validate`]) reports every problem in a
//! document at once as an [`ErrorList`], or returns a [`ValidatedDocument`]
//! with declared defaults filled in. Schema defects are caught earlier, when
//! a collection is built, as [`SchemaError`]s.
//!
//! # Example
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
//!     "hero": {"heading": "Hi"},
//!     "sections": [{
//!         "title": "Plans",
//!         "description": "Pick one",
//!         "component": "pricing",
//!         "pricing": [{"title": "Pro", "price": "$9", "features": ["A"]}],
//!         "faq": [{"question": "Q", "answer": "A"}],
//!     }],
//! });
//!
//! let errors = registry.validate("landing", &raw).unwrap_err();
//! let found: Vec<String> = errors.iter().map(|e| e.path.clone()).collect();
//! assert_eq!(found, vec!["sections[0].pricing[0].cta", "sections[0].faq"]);
//! ```

pub mod collections;
mod content;
mod enums;
mod error;
pub mod fragments;
mod merge;
mod package;
mod registry;
mod types;
mod validate;

pub use collections::{Collection, CollectionBuilder, CollectionKind, SourcePattern};
pub use content::{
    Author, FaqItem, Feature, Hero, LandingPage, Link, Post, PostCategory, PostImage,
    PricingPlan, Section, SectionBody, ServiceHero, ServicePage, ServiceSummary, ServicesIndex,
    ServicesIndexHero, Testimonial, TestimonialAuthor,
};
pub use enums::{
    ButtonSize, ButtonVariant, ColorPalette, Enumeration, LinkTarget, NotAMember,
    SectionComponent, ServiceCategory, catalog,
};
pub use error::SchemaError;
pub use merge::merge_fields;
pub use package::{CollectionDescriptor, SchemaPackage, SourceDescriptor};
pub use registry::CollectionRegistry;
pub use types::{
    EditorHints, Field, NodeKind, ObjectSchema, SCHEMA_CONTRACT_VERSION, SchemaNode,
    TaggedUnion, Variant,
};
pub use validate::{
    ErrorKind, ErrorList, UnknownFieldPolicy, ValidatedDocument, ValidationError,
    ValidationOptions, json_type, validate_document,
};
