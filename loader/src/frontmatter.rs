//! Front-matter extraction.
//!
//! Markdown documents start with a YAML header between two `---` lines; the
//! rest of the file is the body. YAML and JSON documents are data files whose
//! whole content is the mapping. In every case the mapping comes back as a
//! [`serde_json::Value`], the representation the validator works on.
//!
//! ```
//! use content_schema_loader::{DocumentFormat, parse_document};
//!
//! let text = "---\ntitle: Hello\ntags: [a, b]\n---\n# Heading\n";
//! let parsed = parse_document(text, DocumentFormat::Markdown).unwrap();
//! assert_eq!(parsed.front_matter["title"], "Hello");
//! assert_eq!(parsed.body.as_deref(), Some("# Heading\n"));
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// How a file's content is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML header plus markdown body.
    Markdown,
    /// Whole-file YAML.
    Yaml,
    /// Whole-file JSON.
    Json,
}

impl DocumentFormat {
    /// Picks the format for a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Why a document's front matter could not be read.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    /// An opening `---` line has no closing partner.
    #[error("front matter is not terminated by a closing '---' line")]
    Unterminated,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Front matter and optional body of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Raw mapping, not yet validated.
    pub front_matter: Value,
    /// Markdown body; `None` for data files.
    pub body: Option<String>,
}

/// Parses `text` according to `format`.
///
/// An absent or empty header yields an empty mapping. A header that is not
/// a mapping is returned as-is and left for validation to reject.
///
/// # Errors
///
/// Returns [`FrontMatterError`] if the header is unterminated or does not
/// parse.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<ParsedDocument, FrontMatterError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match format {
        DocumentFormat::Markdown => {
            let (header, body) = split_front_matter(text)?;
            let front_matter = match header {
                Some(yaml) => parse_yaml(yaml)?,
                None => empty_mapping(),
            };
            Ok(ParsedDocument {
                front_matter,
                body: Some(body.to_string()),
            })
        }
        DocumentFormat::Yaml => Ok(ParsedDocument {
            front_matter: parse_yaml(text)?,
            body: None,
        }),
        DocumentFormat::Json => Ok(ParsedDocument {
            front_matter: serde_json::from_str(text)?,
            body: None,
        }),
    }
}

/// Splits a markdown document into its YAML header and body.
///
/// Returns `None` for the header when the document does not open with a
/// `---` line.
///
/// # Errors
///
/// Returns [`FrontMatterError::Unterminated`] if the header never closes.
pub fn split_front_matter(text: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let Some(rest) = strip_delimiter(text) else {
        return Ok((None, text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_delimiter(line) {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(FrontMatterError::Unterminated)
}

fn strip_delimiter(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(end) => (&text[..=end], &text[end + 1..]),
        None => (text, ""),
    };
    is_delimiter(first).then_some(rest)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn parse_yaml(yaml: &str) -> Result<Value, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(empty_mapping());
    }
    // A header holding only comments parses as null.
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(empty_mapping()),
        value => Ok(value),
    }
}

fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_markdown_without_header_has_empty_mapping() {
        let parsed = parse_document("# Just text\n", DocumentFormat::Markdown).unwrap();
        assert_eq!(parsed.front_matter, json!({}));
        assert_eq!(parsed.body.as_deref(), Some("# Just text\n"));
    }

    #[test]
    fn test_empty_header_is_empty_mapping() {
        let parsed = parse_document("---\n---\nBody", DocumentFormat::Markdown).unwrap();
        assert_eq!(parsed.front_matter, json!({}));
        assert_eq!(parsed.body.as_deref(), Some("Body"));
    }

    #[test]
    fn test_comment_only_header_is_empty_mapping() {
        let parsed = parse_document("---\n# nothing yet\n---\n", DocumentFormat::Markdown).unwrap();
        assert_eq!(parsed.front_matter, json!({}));
    }

    #[test]
    fn test_nested_yaml_becomes_json() {
        let text = "---\nhero:\n  heading: Hi\n  cta:\n    - text: Go\n      url: /go\n      external: true\n---\n";
        let parsed = parse_document(text, DocumentFormat::Markdown).unwrap();
        assert_eq!(
            parsed.front_matter,
            json!({"hero": {"heading": "Hi", "cta": [{"text": "Go", "url": "/go", "external": true}]}})
        );
        assert_eq!(parsed.body.as_deref(), Some(""));
    }

    #[test]
    fn test_crlf_delimiters() {
        let parsed =
            parse_document("---\r\ntitle: Hi\r\n---\r\nBody\r\n", DocumentFormat::Markdown).unwrap();
        assert_eq!(parsed.front_matter, json!({"title": "Hi"}));
        assert_eq!(parsed.body.as_deref(), Some("Body\r\n"));
    }

    #[test]
    fn test_unterminated_header() {
        let err = parse_document("---\ntitle: Hi\n", DocumentFormat::Markdown).unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_invalid_yaml_header() {
        let err = parse_document("---\ntitle: [unclosed\n---\n", DocumentFormat::Markdown).unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_data_files() {
        let yaml = parse_document("items:\n  - a\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(yaml.front_matter, json!({"items": ["a"]}));
        assert!(yaml.body.is_none());

        let json_doc = parse_document(r#"{"items": [1]}"#, DocumentFormat::Json).unwrap();
        assert_eq!(json_doc.front_matter, json!({"items": [1]}));

        assert!(matches!(
            parse_document("{", DocumentFormat::Json),
            Err(FrontMatterError::Json(_))
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("MD"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension("yaml"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_extension("txt"), None);
    }
}
