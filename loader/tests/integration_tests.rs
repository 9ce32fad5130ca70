use std::fs;
use std::path::Path;

use content_schema_core::{CollectionRegistry, ErrorKind, UnknownFieldPolicy};
use content_schema_loader::{
    ContentLoader, DocumentStatus, FailureReason, LoaderConfig, LoaderError, ValidationReport,
};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn config_for(dir: &TempDir) -> LoaderConfig {
    LoaderConfig {
        content_dir: dir.path().to_path_buf(),
        jobs: Some(2),
        ..LoaderConfig::default()
    }
}

const LANDING: &str = r#"---
title: Home
description: Welcome to the site
hero:
  heading: Build faster
  cta:
    - text: Get started
      url: /start
sections:
  - title: Plans
    description: Pick one
    component: pricing
    pricing:
      - title: Pro
        price: "$9"
        features: [Everything]
        cta:
          text: Buy
          url: /buy
---
# Welcome
"#;

const POST: &str = r#"---
title: Hello world
excerpt: First post
date: "2024-05-01"
author:
  name: Sam
category:
  name: News
  slug: news
tags: [intro]
---
Body text.
"#;

const SERVICE: &str = r#"---
title: Web development
description: Sites that load fast
slug: web
category: Web
---
"#;

const SERVICES_INDEX: &str = r#"---
title: Services
description: What we do
hero:
  heading: Our services
services:
  - title: Web development
    description: Sites that load fast
    category: Web
    url: /services/web
---
"#;

fn seed_valid_site(root: &Path) {
    write(root, "index.md", LANDING);
    write(root, "blog/hello-world.md", POST);
    write(root, "services/web.md", SERVICE);
    write(root, "services/index.md", SERVICES_INDEX);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_valid_site_loads_every_collection() {
    let dir = TempDir::new().unwrap();
    seed_valid_site(dir.path());

    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();
    let outcome = loader.load().unwrap();

    assert!(outcome.is_success(), "unexpected failures: {:?}", outcome.failures);
    let routed: Vec<(&str, &str)> = outcome
        .documents
        .iter()
        .map(|d| (d.path.as_str(), d.collection()))
        .collect();
    assert_eq!(
        routed,
        vec![
            ("blog/hello-world.md", "posts"),
            ("index.md", "landing"),
            ("services/index.md", "servicesIndex"),
            ("services/web.md", "services"),
        ]
    );

    let landing = outcome.documents_in("landing").next().unwrap();
    let plan = &landing.document.get("sections").unwrap()[0]["pricing"][0];
    assert_eq!(plan["billing"], "monthly");
    assert_eq!(plan["cta"]["external"], false);
    assert_eq!(landing.body.as_deref(), Some("# Welcome\n"));
    assert_eq!(landing.checksum.len(), 64);
}

#[test]
fn test_invalid_documents_are_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    seed_valid_site(dir.path());
    write(
        dir.path(),
        "services/seo.md",
        "---\ntitle: SEO\ndescription: Rank higher\nslug: seo\ncategory: Seo\n---\n",
    );
    write(dir.path(), "blog/broken.md", "---\ntitle: Unclosed\n");

    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();
    let outcome = loader.load().unwrap();

    assert_eq!(outcome.documents.len(), 4);
    assert_eq!(outcome.failures.len(), 2);

    let broken = &outcome.failures[0];
    assert_eq!(broken.path, "blog/broken.md");
    assert!(matches!(broken.reason, FailureReason::Unparsable { .. }));

    let seo = &outcome.failures[1];
    assert_eq!(seo.collection, "services");
    match &seo.reason {
        FailureReason::Invalid { errors } => {
            assert_eq!(errors.len(), 1);
            let error = errors.iter().next().unwrap();
            assert_eq!(error.path, "category");
            assert!(matches!(error.kind, ErrorKind::InvalidEnumValue { .. }));
        }
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn test_unclaimed_files_are_unmatched() {
    let dir = TempDir::new().unwrap();
    seed_valid_site(dir.path());
    write(dir.path(), "blog/drafts/wip.md", POST);
    write(dir.path(), "notes.md", "# scratch\n");
    write(dir.path(), "images/logo.png", "not content");

    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();
    let outcome = loader.load().unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.unmatched, vec!["blog/drafts/wip.md", "notes.md"]);
}

#[test]
fn test_collection_allowlist_and_exclusions() {
    let dir = TempDir::new().unwrap();
    seed_valid_site(dir.path());
    write(dir.path(), "blog/old.md", "---\ntitle: Old\n---\n");

    let registry = CollectionRegistry::builtin().unwrap();
    let config = LoaderConfig {
        collections: vec!["posts".into()],
        exclude: vec!["blog/old.md".into()],
        ..config_for(&dir)
    };
    let loader = ContentLoader::new(&registry, config).unwrap();
    let outcome = loader.load().unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.documents.len(), 1);
    assert_eq!(outcome.documents[0].collection(), "posts");
    // Files of disabled collections are not claimed.
    assert!(outcome.unmatched.contains(&"index.md".to_string()));
}

#[test]
fn test_reject_policy_flags_unknown_front_matter() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "blog/hello-world.md",
        &POST.replacen("tags: [intro]", "tags: [intro]\nlayout: wide", 1),
    );

    let registry = CollectionRegistry::builtin().unwrap();
    let config = LoaderConfig {
        unknown_fields: UnknownFieldPolicy::Reject,
        ..config_for(&dir)
    };
    let outcome = ContentLoader::new(&registry, config).unwrap().load().unwrap();

    let FailureReason::Invalid { errors } = &outcome.failures[0].reason else {
        panic!("expected validation failure");
    };
    let error = errors.iter().next().unwrap();
    assert_eq!(error.path, "layout");
    assert_eq!(error.kind, ErrorKind::UnknownField);
}

#[test]
fn test_missing_content_dir() {
    let dir = TempDir::new().unwrap();
    let registry = CollectionRegistry::builtin().unwrap();
    let config = LoaderConfig {
        content_dir: dir.path().join("nope"),
        ..LoaderConfig::default()
    };
    let loader = ContentLoader::new(&registry, config).unwrap();
    assert!(matches!(loader.load(), Err(LoaderError::MissingContentDir(_))));
}

// ---------------------------------------------------------------------------
// Single-file checks
// ---------------------------------------------------------------------------

#[test]
fn test_check_file_ignores_source_pattern() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "elsewhere/post.md", POST);

    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();
    let file = dir.path().join("elsewhere/post.md");

    let loaded = loader.check_file("posts", &file, "elsewhere/post.md").unwrap().unwrap();
    assert_eq!(loaded.document.get("draft"), Some(&serde_json::json!(false)));

    let failure = loader
        .check_file("services", &file, "elsewhere/post.md")
        .unwrap()
        .unwrap_err();
    assert!(matches!(failure.reason, FailureReason::Invalid { .. }));

    assert!(matches!(
        loader.check_file("authors", &file, "x"),
        Err(LoaderError::UnknownCollection(_))
    ));
}

#[test]
fn test_check_file_reports_unreadable() {
    let dir = TempDir::new().unwrap();
    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();

    let failure = loader
        .check_file("posts", &dir.path().join("missing.md"), "missing.md")
        .unwrap()
        .unwrap_err();
    assert!(matches!(failure.reason, FailureReason::Unreadable { .. }));
    assert!(failure.checksum.is_none());
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[test]
fn test_report_summarizes_outcome() {
    let dir = TempDir::new().unwrap();
    seed_valid_site(dir.path());
    write(dir.path(), "services/mobile.md", "---\ntitle: Mobile\n---\n");
    write(dir.path(), "notes.md", "scratch");

    let registry = CollectionRegistry::builtin().unwrap();
    let loader = ContentLoader::new(&registry, config_for(&dir)).unwrap();
    let outcome = loader.load().unwrap();
    let report = ValidationReport::from_outcome(dir.path(), &outcome);

    assert!(!report.is_success());
    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.valid, 4);
    assert_eq!(report.summary.invalid, 1);
    assert_eq!(report.summary.unmatched, 1);

    let mobile = report.failures().next().unwrap();
    assert_eq!(mobile.path, "services/mobile.md");
    assert_eq!(mobile.status, DocumentStatus::Invalid);
    let paths: Vec<&str> = mobile.errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["description", "slug", "category"]);
}
