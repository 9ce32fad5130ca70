//! Content directory loading and validation.
//!
//! This crate connects the schemas of `content-schema-core` to files on
//! disk: it discovers documents below a content directory, extracts their
//! front matter, and validates each one against every collection whose
//! source pattern claims it.
//!
//! # Quick start
//!
//! ```no_run
//! use content_schema_core::CollectionRegistry;
//! use content_schema_loader::{ContentLoader, LoaderConfig, ValidationReport};
//!
//! let registry = CollectionRegistry::builtin().unwrap();
//! let config = LoaderConfig::load(".content-schema.yml").unwrap_or_default();
//! let loader = ContentLoader::new(&registry, config).unwrap();
//!
//! let outcome = loader.load().unwrap();
//! let report = ValidationReport::from_outcome(&loader.config().content_dir, &outcome);
//! println!("{} of {} documents valid", report.summary.valid, report.summary.total);
//! ```

mod config;
mod error;
mod frontmatter;
mod loader;
mod output;
mod report;

pub use config::{DEFAULT_CONFIG_FILE, LoaderConfig};
pub use error::{LoaderError, Result};
pub use frontmatter::{
    DocumentFormat, FrontMatterError, ParsedDocument, parse_document, split_front_matter,
};
pub use loader::{
    ContentLoader, DocumentFailure, FailureReason, LoadOutcome, LoadedDocument, checksum,
};
pub use output::{OutputFormat, format_check, format_package, format_report};
pub use report::{DocumentReport, DocumentStatus, ReportSummary, ValidationReport};
