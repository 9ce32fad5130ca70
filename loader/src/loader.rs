//! Content directory discovery and parallel validation.
//!
//! [`ContentLoader`] walks the content directory, routes each file to the
//! collections whose source pattern matches it, and validates the parsed
//! front matter on a rayon pool. Every document yields exactly one entry per
//! matching collection, either a [`LoadedDocument`] or a
//! [`DocumentFailure`]; files no enabled collection claims are listed in
//! [`LoadOutcome::unmatched`].
//!
//! ```no_run
//! use content_schema_core::CollectionRegistry;
//! use content_schema_loader::{ContentLoader, LoaderConfig};
//!
//! let registry = CollectionRegistry::builtin().unwrap();
//! let loader = ContentLoader::new(&registry, LoaderConfig::default()).unwrap();
//! let outcome = loader.load().unwrap();
//! for failure in &outcome.failures {
//!     eprintln!("{}: {}", failure.path, failure.reason);
//! }
//! ```

use std::fmt;
use std::path::Path;

use content_schema_core::{Collection, CollectionRegistry, ErrorList, ValidatedDocument};
use globset::GlobSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::frontmatter::{DocumentFormat, parse_document};

/// A document that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedDocument {
    /// `/`-separated path relative to the content directory.
    pub path: String,
    /// SHA-256 of the file bytes, lowercase hex.
    pub checksum: String,
    /// Markdown body, if the file has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Validated front matter with defaults applied.
    pub document: ValidatedDocument,
}

impl LoadedDocument {
    /// Name of the collection the document belongs to.
    pub fn collection(&self) -> &str {
        self.document.collection()
    }
}

/// Why a document was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The file could not be read.
    Unreadable { message: String },
    /// The front matter could not be parsed.
    Unparsable { message: String },
    /// The front matter does not satisfy the collection schema.
    Invalid { errors: ErrorList },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { message } => write!(f, "unreadable: {message}"),
            Self::Unparsable { message } => write!(f, "unparsable: {message}"),
            Self::Invalid { errors } => write!(f, "{errors}"),
        }
    }
}

/// A document that was not loaded, with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub path: String,
    pub collection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub reason: FailureReason,
}

/// Result of loading a content directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    /// Valid documents sorted by path, then collection.
    pub documents: Vec<LoadedDocument>,
    /// Failed documents sorted by path, then collection.
    pub failures: Vec<DocumentFailure>,
    /// Content files no enabled collection claims, sorted.
    pub unmatched: Vec<String>,
}

impl LoadOutcome {
    /// Returns `true` if no document failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Valid documents of one collection.
    pub fn documents_in<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a LoadedDocument> {
        self.documents
            .iter()
            .filter(move |d| d.collection() == collection)
    }
}

/// Loads and validates the documents of a content directory.
#[derive(Debug)]
pub struct ContentLoader<'a> {
    registry: &'a CollectionRegistry,
    config: LoaderConfig,
    excluded: GlobSet,
}

impl<'a> ContentLoader<'a> {
    /// Creates a loader over `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnknownCollection`] if the configuration names
    /// a collection the registry does not have, or
    /// [`LoaderError::GlobError`] for a malformed exclusion.
    pub fn new(registry: &'a CollectionRegistry, config: LoaderConfig) -> Result<Self> {
        if let Some(unknown) = config.collections.iter().find(|c| !registry.contains(c)) {
            return Err(LoaderError::UnknownCollection(unknown.clone()));
        }
        let excluded = config.exclude_set()?;
        Ok(Self {
            registry,
            config,
            excluded,
        })
    }

    /// The configuration in effect.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Lists content files below the content directory as sorted relative
    /// paths, honoring extensions and exclusions.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingContentDir`] if the directory does not
    /// exist, or [`LoaderError::IoError`] if walking it fails.
    pub fn discover(&self) -> Result<Vec<String>> {
        let root = &self.config.content_dir;
        if !root.is_dir() {
            return Err(LoaderError::MissingContentDir(root.clone()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = relative_path(root, entry.path()) else {
                continue;
            };
            let recognized = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| self.config.is_content_extension(e));
            if !recognized {
                continue;
            }
            if self.excluded.is_match(&relative) {
                debug!(path = %relative, "excluded by configuration");
                continue;
            }
            paths.push(relative);
        }

        paths.sort();
        debug!(count = paths.len(), root = %root.display(), "discovered content files");
        Ok(paths)
    }

    /// Enabled collections whose source pattern matches `relative_path`.
    pub fn collections_for<'p>(
        &'p self,
        relative_path: &'p str,
    ) -> impl Iterator<Item = &'p Collection> + 'p {
        self.registry
            .matching(relative_path)
            .filter(move |c| self.config.is_collection_enabled(c.name()))
    }

    /// Discovers and validates every content file.
    ///
    /// # Errors
    ///
    /// Fails only if discovery fails or the worker pool cannot start;
    /// per-document problems are reported in the outcome.
    pub fn load(&self) -> Result<LoadOutcome> {
        let paths = self.discover()?;

        let jobs = self
            .config
            .jobs
            .filter(|jobs| *jobs > 0)
            .unwrap_or_else(|| default_parallel_jobs(paths.len()));
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        debug!(jobs, files = paths.len(), "validating content");

        let entries: Vec<FileEntry> =
            pool.install(|| paths.par_iter().map(|path| self.load_path(path)).collect());

        let mut outcome = LoadOutcome::default();
        for entry in entries {
            match entry {
                FileEntry::Unmatched(path) => outcome.unmatched.push(path),
                FileEntry::Checked(results) => {
                    for result in results {
                        match result {
                            Ok(document) => outcome.documents.push(document),
                            Err(failure) => outcome.failures.push(failure),
                        }
                    }
                }
            }
        }

        // par_iter preserves order, but sort anyway for overlapping sources.
        outcome
            .documents
            .sort_by(|a, b| (&a.path, a.collection()).cmp(&(&b.path, b.collection())));
        outcome
            .failures
            .sort_by(|a, b| (&a.path, &a.collection).cmp(&(&b.path, &b.collection)));

        info!(
            valid = outcome.documents.len(),
            invalid = outcome.failures.len(),
            unmatched = outcome.unmatched.len(),
            "content load finished"
        );
        Ok(outcome)
    }

    /// Validates one file against a named collection, regardless of the
    /// collection's source pattern.
    ///
    /// `file` is read as given; `display_path` is the path recorded in the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnknownCollection`] if `collection` is not
    /// registered. Read, parse, and validation problems are returned as the
    /// inner [`DocumentFailure`].
    pub fn check_file(
        &self,
        collection: &str,
        file: &Path,
        display_path: &str,
    ) -> Result<std::result::Result<LoadedDocument, DocumentFailure>> {
        let target = self
            .registry
            .get(collection)
            .ok_or_else(|| LoaderError::UnknownCollection(collection.to_string()))?;
        let source = read_source(file, display_path);
        Ok(self.validate_source(target, &source))
    }

    fn load_path(&self, relative: &str) -> FileEntry {
        let targets: Vec<&Collection> = self.collections_for(relative).collect();
        if targets.is_empty() {
            debug!(path = %relative, "no collection claims file");
            return FileEntry::Unmatched(relative.to_string());
        }

        let file = self.config.content_dir.join(relative);
        let source = read_source(&file, relative);
        let results = targets
            .into_iter()
            .map(|collection| self.validate_source(collection, &source))
            .collect();
        FileEntry::Checked(results)
    }

    fn validate_source(
        &self,
        collection: &Collection,
        source: &Source,
    ) -> std::result::Result<LoadedDocument, DocumentFailure> {
        let failure = |checksum: Option<String>, reason: FailureReason| {
            info!(path = %source.path, collection = collection.name(), %reason, "document rejected");
            DocumentFailure {
                path: source.path.clone(),
                collection: collection.name().to_string(),
                checksum,
                reason,
            }
        };

        let (text, checksum) = match &source.content {
            Ok(content) => content,
            Err(message) => {
                warn!(path = %source.path, error = %message, "cannot read document");
                return Err(failure(
                    None,
                    FailureReason::Unreadable {
                        message: message.clone(),
                    },
                ));
            }
        };

        let parsed = match parse_document(text, source.format) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(failure(
                    Some(checksum.clone()),
                    FailureReason::Unparsable {
                        message: err.to_string(),
                    },
                ));
            }
        };

        let options = self.config.validation_options();
        match self
            .registry
            .validate_with(collection.name(), &parsed.front_matter, &options)
        {
            Ok(document) => {
                debug!(path = %source.path, collection = collection.name(), "document valid");
                Ok(LoadedDocument {
                    path: source.path.clone(),
                    checksum: checksum.clone(),
                    body: parsed.body,
                    document,
                })
            }
            Err(errors) => Err(failure(Some(checksum.clone()), FailureReason::Invalid { errors })),
        }
    }
}

enum FileEntry {
    Unmatched(String),
    Checked(Vec<std::result::Result<LoadedDocument, DocumentFailure>>),
}

/// File contents read once and shared by every matching collection.
struct Source {
    path: String,
    format: DocumentFormat,
    content: std::result::Result<(String, String), String>,
}

fn read_source(file: &Path, display_path: &str) -> Source {
    let format = file
        .extension()
        .and_then(|e| e.to_str())
        .and_then(DocumentFormat::from_extension)
        .unwrap_or(DocumentFormat::Markdown);
    let content = std::fs::read(file)
        .map_err(|err| err.to_string())
        .and_then(|bytes| {
            let checksum = checksum(&bytes);
            String::from_utf8(bytes)
                .map(|text| (text, checksum))
                .map_err(|err| err.to_string())
        });
    Source {
        path: display_path.to_string(),
        format,
        content,
    }
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.iter().map(|part| part.to_str()).collect();
    Some(parts?.join("/"))
}

fn default_parallel_jobs(file_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.min(16).max(1).min(file_count.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_hex_sha256() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("content");
        let file = root.join("blog").join("post.md");
        assert_eq!(relative_path(root, &file).as_deref(), Some("blog/post.md"));
        assert_eq!(relative_path(root, Path::new("elsewhere/x.md")), None);
    }

    #[test]
    fn test_default_parallel_jobs_is_non_zero_and_bounded_by_workload() {
        assert_eq!(default_parallel_jobs(0), 1);
        assert_eq!(default_parallel_jobs(1), 1);
        assert!(default_parallel_jobs(10_000) <= 16);
    }

    #[test]
    fn test_unknown_collection_in_config_is_rejected() {
        let registry = CollectionRegistry::builtin().unwrap();
        let config = LoaderConfig {
            collections: vec!["authors".into()],
            ..LoaderConfig::default()
        };
        assert!(matches!(
            ContentLoader::new(&registry, config),
            Err(LoaderError::UnknownCollection(name)) if name == "authors"
        ));
    }

    #[test]
    fn test_failure_reason_serializes_with_kind() {
        let reason = FailureReason::Unparsable {
            message: "bad".into(),
        };
        let value = serde_json::to_value(&reason).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "unparsable", "message": "bad"}));
    }
}
