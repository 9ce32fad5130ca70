//! Loader configuration.
//!
//! Controls where content lives, which collections are checked, which files
//! are skipped, and how undeclared front-matter keys are treated. Every key
//! has a default, so an empty file is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! content_dir: content
//! collections:
//!   - posts
//!   - services
//! exclude:
//!   - "drafts/**"
//! unknown_fields: reject
//! jobs: 4
//! extensions: [md, yml, yaml, json]
//! ```

use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use content_schema_core::{UnknownFieldPolicy, ValidationOptions};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name looked up by the CLI when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".content-schema.yml";

/// Top-level loader configuration.
///
/// # Examples
///
/// ```
/// use content_schema_loader::LoaderConfig;
///
/// let config: LoaderConfig = serde_yaml::from_str("collections: [posts]").unwrap();
/// assert!(config.is_collection_enabled("posts"));
/// assert!(!config.is_collection_enabled("landing"));
/// assert_eq!(config.content_dir.to_str(), Some("content"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Configuration format version.
    pub version: String,
    /// Root of the content tree; source patterns are relative to it.
    pub content_dir: PathBuf,
    /// Collections to check (empty = every registered collection).
    pub collections: Vec<String>,
    /// Globs of relative paths to skip entirely.
    pub exclude: Vec<String>,
    /// Policy for front-matter keys the schema does not declare.
    pub unknown_fields: UnknownFieldPolicy,
    /// Number of parallel validation jobs (`None` = adaptive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// File extensions treated as content, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            content_dir: PathBuf::from("content"),
            collections: Vec::new(),
            exclude: Vec::new(),
            unknown_fields: UnknownFieldPolicy::default(),
            jobs: None,
            extensions: ["md", "yml", "yaml", "json"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl LoaderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut text = String::new();
        BufReader::new(std::fs::File::open(path)?).read_to_string(&mut text)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> = serde_yaml::from_str(&text)?;
        Ok(config.unwrap_or_default())
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::LoaderError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `collection` should be checked.
    ///
    /// An empty allowlist enables every collection.
    pub fn is_collection_enabled(&self, collection: &str) -> bool {
        self.collections.is_empty() || self.collections.iter().any(|c| c == collection)
    }

    /// Returns `true` if `extension` (without dot) is a content extension.
    pub fn is_content_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Compiles the exclusion globs. As in collection source patterns, `*`
    /// stays within one directory and `**` crosses directories.
    ///
    /// # Errors
    ///
    /// Returns [`GlobError`](crate::LoaderError::GlobError) if a pattern is
    /// malformed.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
        }
        Ok(builder.build()?)
    }

    /// Validation options derived from this configuration.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            unknown_fields: self.unknown_fields,
        }
    }
}
