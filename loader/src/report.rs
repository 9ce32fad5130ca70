//! Structured validation reporting.

use std::path::Path;

use chrono::Utc;
use content_schema_core::{SCHEMA_CONTRACT_VERSION, ValidationError};
use serde::{Deserialize, Serialize};

use crate::loader::{FailureReason, LoadOutcome};

/// Outcome of one document in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Valid,
    Invalid,
    Unparsable,
    Unreadable,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
            Self::Unparsable => write!(f, "unparsable"),
            Self::Unreadable => write!(f, "unreadable"),
        }
    }
}

/// Per-document entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub path: String,
    pub collection: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Validation diagnostics, for [`DocumentStatus::Invalid`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    /// Read or parse error, for the other failure statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Document counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Documents checked against a collection (valid + invalid).
    pub total: usize,
    pub valid: usize,
    /// Invalid, unparsable, or unreadable documents.
    pub invalid: usize,
    /// Content files no collection claims.
    pub unmatched: usize,
}

/// Report bundle for one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema_version: String,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub content_dir: String,
    pub summary: ReportSummary,
    pub documents: Vec<DocumentReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

impl ValidationReport {
    /// Builds a report stamped with the current time.
    pub fn from_outcome(content_dir: &Path, outcome: &LoadOutcome) -> Self {
        let valid = outcome.documents.iter().map(|doc| DocumentReport {
            path: doc.path.clone(),
            collection: doc.collection().to_string(),
            status: DocumentStatus::Valid,
            checksum: Some(doc.checksum.clone()),
            errors: Vec::new(),
            message: None,
        });
        let failed = outcome.failures.iter().map(|failure| {
            let (status, errors, message) = match &failure.reason {
                FailureReason::Invalid { errors } => {
                    (DocumentStatus::Invalid, errors.as_slice().to_vec(), None)
                }
                FailureReason::Unparsable { message } => {
                    (DocumentStatus::Unparsable, Vec::new(), Some(message.clone()))
                }
                FailureReason::Unreadable { message } => {
                    (DocumentStatus::Unreadable, Vec::new(), Some(message.clone()))
                }
            };
            DocumentReport {
                path: failure.path.clone(),
                collection: failure.collection.clone(),
                status,
                checksum: failure.checksum.clone(),
                errors,
                message,
            }
        });

        let mut documents: Vec<DocumentReport> = valid.chain(failed).collect();
        documents.sort_by(|a, b| (&a.path, &a.collection).cmp(&(&b.path, &b.collection)));

        let summary = ReportSummary {
            total: documents.len(),
            valid: outcome.documents.len(),
            invalid: outcome.failures.len(),
            unmatched: outcome.unmatched.len(),
        };

        Self {
            schema_version: SCHEMA_CONTRACT_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            content_dir: content_dir.display().to_string(),
            summary,
            documents,
            unmatched: outcome.unmatched.clone(),
        }
    }

    /// Returns `true` if every checked document is valid.
    pub fn is_success(&self) -> bool {
        self.summary.invalid == 0
    }

    /// Entries that are not valid.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents
            .iter()
            .filter(|d| d.status != DocumentStatus::Valid)
    }
}

#[cfg(test)]
mod tests {
    use content_schema_core::{ErrorKind, ErrorList};

    use super::*;
    use crate::loader::DocumentFailure;

    #[test]
    fn test_status_display_matches_serde() {
        let statuses = [
            (DocumentStatus::Valid, "valid"),
            (DocumentStatus::Invalid, "invalid"),
            (DocumentStatus::Unparsable, "unparsable"),
            (DocumentStatus::Unreadable, "unreadable"),
        ];
        for (status, expected) in statuses {
            assert_eq!(status.to_string(), expected);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{expected}\""));
        }
    }

    #[test]
    fn test_report_from_failures() {
        let outcome = LoadOutcome {
            documents: Vec::new(),
            failures: vec![
                DocumentFailure {
                    path: "services/web.md".into(),
                    collection: "services".into(),
                    checksum: Some("abc".into()),
                    reason: FailureReason::Invalid {
                        errors: ErrorList::from(vec![ValidationError::new(
                            "slug",
                            ErrorKind::MissingField,
                        )]),
                    },
                },
                DocumentFailure {
                    path: "blog/broken.md".into(),
                    collection: "posts".into(),
                    checksum: None,
                    reason: FailureReason::Unparsable {
                        message: "front matter is not terminated".into(),
                    },
                },
            ],
            unmatched: vec!["notes.md".into()],
        };

        let report = ValidationReport::from_outcome(Path::new("content"), &outcome);
        assert!(!report.is_success());
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 2,
                valid: 0,
                invalid: 2,
                unmatched: 1,
            }
        );
        assert_eq!(report.documents[0].path, "blog/broken.md");
        assert_eq!(report.documents[0].status, DocumentStatus::Unparsable);
        assert_eq!(report.documents[1].errors[0].path, "slug");
        assert_eq!(report.failures().count(), 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }
}
