//! Output formatting for reports, check results, and schema packages.

use content_schema_core::{NodeKind, ObjectSchema, SchemaNode, SchemaPackage};

use crate::loader::{DocumentFailure, FailureReason, LoadedDocument};
use crate::report::{DocumentStatus, ValidationReport};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn to_yaml<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
}

/// Formats a validation report.
pub fn format_report(report: &ValidationReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Yaml => to_yaml(report),
        OutputFormat::Text => Ok(report_to_text(report)),
    }
}

/// Formats the result of checking a single file.
///
/// JSON and YAML print the validated document, or the failure record.
pub fn format_check(
    result: &Result<LoadedDocument, DocumentFailure>,
    format: OutputFormat,
) -> Result<String, String> {
    match (result, format) {
        (Ok(loaded), OutputFormat::Json) => to_json(&loaded.document.to_value()),
        (Ok(loaded), OutputFormat::Yaml) => to_yaml(&loaded.document.to_value()),
        (Err(failure), OutputFormat::Json) => to_json(failure),
        (Err(failure), OutputFormat::Yaml) => to_yaml(failure),
        (Ok(loaded), OutputFormat::Text) => Ok(format!(
            "ok    {} ({})\n",
            loaded.path,
            loaded.collection()
        )),
        (Err(failure), OutputFormat::Text) => Ok(failure_to_text(failure)),
    }
}

/// Formats a schema package.
pub fn format_package(package: &SchemaPackage, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(package),
        OutputFormat::Yaml => to_yaml(package),
        OutputFormat::Text => Ok(package_to_text(package)),
    }
}

fn report_to_text(report: &ValidationReport) -> String {
    let mut out = String::new();

    for doc in &report.documents {
        let label = match doc.status {
            DocumentStatus::Valid => "ok  ",
            _ => "FAIL",
        };
        out.push_str(&format!("{label}  {} ({})\n", doc.path, doc.collection));
        for error in &doc.errors {
            out.push_str(&format!("      - {error}\n"));
        }
        if let Some(message) = &doc.message {
            out.push_str(&format!("      - {}: {message}\n", doc.status));
        }
    }
    for path in &report.unmatched {
        out.push_str(&format!("skip  {path} (no collection)\n"));
    }

    let summary = &report.summary;
    out.push_str(&format!(
        "\n{} documents: {} valid, {} invalid, {} unmatched\n",
        summary.total, summary.valid, summary.invalid, summary.unmatched
    ));
    out
}

fn failure_to_text(failure: &DocumentFailure) -> String {
    let mut out = format!("FAIL  {} ({})\n", failure.path, failure.collection);
    match &failure.reason {
        FailureReason::Invalid { errors } => {
            for error in errors {
                out.push_str(&format!("      - {error}\n"));
            }
        }
        other => out.push_str(&format!("      - {other}\n")),
    }
    out
}

fn package_to_text(package: &SchemaPackage) -> String {
    let mut out = String::new();
    for collection in &package.collections {
        out.push_str(&format!(
            "{} ({}) {}",
            collection.name, collection.kind, collection.source.include
        ));
        for exclude in &collection.source.exclude {
            out.push_str(&format!(" !{exclude}"));
        }
        out.push('\n');
        object_to_text(&collection.schema, 1, &mut out);
        for (name, node) in &collection.definitions {
            out.push_str(&format!("  #{name}: {}\n", describe(node)));
            nested_to_text(node, 2, &mut out);
        }
        out.push('\n');
    }
    out
}

fn object_to_text(schema: &ObjectSchema, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for field in &schema.fields {
        out.push_str(&format!("{indent}{}: {}\n", field.name, describe(&field.node)));
        nested_to_text(&field.node, depth + 1, out);
    }
}

fn nested_to_text(node: &SchemaNode, depth: usize, out: &mut String) {
    match &node.kind {
        NodeKind::Object(schema) => object_to_text(schema, depth, out),
        NodeKind::Array { items, .. } => nested_to_text(items, depth, out),
        NodeKind::OneOf(union) => {
            object_to_text(&union.common, depth, out);
            let indent = "  ".repeat(depth);
            for variant in &union.variants {
                out.push_str(&format!(
                    "{indent}[{}={}] {}: {}\n",
                    union.tag,
                    variant.tag,
                    variant.payload.name,
                    describe(&variant.payload.node)
                ));
                nested_to_text(&variant.payload.node, depth + 1, out);
            }
        }
        _ => {}
    }
}

/// One-line summary such as `string, required, non-empty`.
fn describe(node: &SchemaNode) -> String {
    let mut parts = vec![type_label(&node.kind)];
    if node.required {
        parts.push("required".to_string());
    }
    match &node.kind {
        NodeKind::String { non_empty: true } | NodeKind::Array { non_empty: true, .. } => {
            parts.push("non-empty".to_string())
        }
        _ => {}
    }
    if let Some(default) = &node.default {
        parts.push(format!("default {default}"));
    }
    for (key, value) in node.hints.iter() {
        parts.push(format!("{key}={value}"));
    }
    parts.join(", ")
}

fn type_label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Enum(values) => format!("{} ({})", values.name(), values.members().join("|")),
        NodeKind::Array { items, .. } => format!("list of {}", type_label(&items.kind)),
        NodeKind::OneOf(union) => format!("one of {}", union.tags.members().join("|")),
        NodeKind::Ref { target } => format!("#{target}"),
        other => other.expected().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use content_schema_core::{CollectionRegistry, ErrorKind, ErrorList, ValidationError};

    use super::*;
    use crate::loader::LoadOutcome;

    fn failing_outcome() -> LoadOutcome {
        LoadOutcome {
            documents: Vec::new(),
            failures: vec![DocumentFailure {
                path: "blog/a.md".into(),
                collection: "posts".into(),
                checksum: None,
                reason: FailureReason::Invalid {
                    errors: ErrorList::from(vec![ValidationError::new(
                        "author.name",
                        ErrorKind::MissingField,
                    )]),
                },
            }],
            unmatched: vec!["README.md".into()],
        }
    }

    #[test]
    fn test_text_report_lists_errors_and_summary() {
        let report = ValidationReport::from_outcome(Path::new("content"), &failing_outcome());
        let text = format_report(&report, OutputFormat::Text).unwrap();
        assert!(text.contains("FAIL  blog/a.md (posts)"));
        assert!(text.contains("- author.name: required field is missing"));
        assert!(text.contains("skip  README.md (no collection)"));
        assert!(text.contains("1 documents: 0 valid, 1 invalid, 1 unmatched"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let report = ValidationReport::from_outcome(Path::new("content"), &failing_outcome());
        let json = format_report(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["invalid"], 1);
        assert_eq!(value["documents"][0]["errors"][0]["kind"], "missing_field");
    }

    #[test]
    fn test_package_text_shows_unions_and_hints() {
        let registry = CollectionRegistry::builtin().unwrap();
        let package = SchemaPackage::from_registry("0.1.0", &registry);
        let text = format_package(&package, OutputFormat::Text).unwrap();
        assert!(text.contains("services (page) services/*.md !services/index.md"));
        assert!(text.contains("[component=pricing] pricing: list of object, required, non-empty"));
        assert!(text.contains("image: string, input=media"));
        assert!(text.contains("external: boolean, default false"));
    }
}
