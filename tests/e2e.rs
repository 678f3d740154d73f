//! End-to-end integration tests for pandoc-pipe.
//!
//! These tests run a real pandoc binary. They skip (rather than fail) when
//! no pandoc is on PATH so the suite stays green on machines without it.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use pandoc_pipe::{metadata, OptionValue, Pandoc, PandocError};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Skip this test unless a working pandoc is on PATH.
macro_rules! skip_unless_pandoc {
    () => {
        match std::process::Command::new("pandoc").arg("--version").output() {
            Ok(out) if out.status.success() => {}
            _ => {
                println!("SKIP — no working pandoc on PATH");
                return;
            }
        }
    };
}

async fn md_to_html() -> Pandoc {
    let mut converter = Pandoc::new().await.expect("pandoc should be discoverable");
    converter
        .from("markdown")
        .unwrap()
        .to("html")
        .unwrap();
    converter
}

// ── Conversion tests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn hello_world_markdown_to_html() {
    skip_unless_pandoc!();

    let converter = md_to_html().await;
    let html = converter.convert("Hello *world*").await.unwrap();
    assert_eq!(html, "<p>Hello <em>world</em></p>\n");
}

#[tokio::test]
async fn nil_option_is_dropped_entirely() {
    skip_unless_pandoc!();

    let mut converter = md_to_html().await;
    converter.set("filter", OptionValue::Nil).unwrap();

    let html = converter.convert("Hello *world*").await.unwrap();
    assert_eq!(html, "<p>Hello <em>world</em></p>\n");
}

#[tokio::test]
async fn unsupported_option_fails_before_any_spawn() {
    skip_unless_pandoc!();

    let mut converter = Pandoc::new().await.unwrap();
    let err = converter.set("definitely_not_an_option", "x").unwrap_err();
    assert!(matches!(
        err,
        PandocError::UnsupportedOption { ref option } if option == "definitely_not_an_option"
    ));
    // The rejected entry left no trace in the argument vector.
    assert!(converter.args().is_empty());
}

#[tokio::test]
async fn output_file_with_spaces_receives_the_content() {
    skip_unless_pandoc!();

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("strong hi.html");

    let mut converter = md_to_html().await;
    converter.output(out_path.to_str().unwrap()).unwrap();

    let returned = converter.convert("**hi**").await.unwrap();
    assert_eq!(returned, "", "configured output destination must silence the returned text");

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written.trim(), "<p><strong>hi</strong></p>");
}

#[tokio::test]
async fn convert_file_reads_the_document_from_disk() {
    skip_unless_pandoc!();

    let dir = tempfile::tempdir().unwrap();
    let doc_path = dir.path().join("hello.md");
    std::fs::write(&doc_path, "Hello *world*\n").unwrap();

    let converter = md_to_html().await;
    let html = converter.convert_file(&doc_path).await.unwrap();
    assert_eq!(html, "<p>Hello <em>world</em></p>\n");
}

#[tokio::test]
async fn convert_file_reports_missing_documents() {
    skip_unless_pandoc!();

    let converter = md_to_html().await;
    let err = converter
        .convert_file("no/such/document.md")
        .await
        .unwrap_err();
    assert!(matches!(err, PandocError::DocumentRead { .. }));
}

#[tokio::test]
async fn large_document_conversion_does_not_hang() {
    skip_unless_pandoc!();

    // Tens of thousands of paragraphs: the HTML output is far larger than
    // any OS pipe buffer, so this completes only if input feeding and
    // output draining progress concurrently.
    let document = "lorem ipsum dolor sit amet\n\n".repeat(30_000);
    let converter = md_to_html().await;
    let html = converter.convert(&document).await.unwrap();
    assert!(html.len() > 30_000 * 30);
    assert!(html.contains("<p>lorem ipsum dolor sit amet</p>"));
}

// ── Failure reporting ────────────────────────────────────────────────────────

#[cfg(unix)]
#[tokio::test]
async fn crashing_filter_yields_conversion_error_with_diagnostics() {
    skip_unless_pandoc!();

    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let filter_path = dir.path().join("crashing_filter.sh");
    std::fs::write(&filter_path, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(&filter_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut converter = Pandoc::new().await.unwrap();
    converter
        .from("markdown")
        .unwrap()
        .to("markdown")
        .unwrap()
        .filter(filter_path.to_str().unwrap())
        .unwrap();

    let err = converter.convert("This is *a* string").await.unwrap_err();
    match err {
        PandocError::Conversion { status, stderr } => {
            assert!(!status.success());
            assert!(!stderr.is_empty(), "diagnostic text must be carried");
        }
        other => panic!("expected Conversion, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_bibliography_yields_conversion_error() {
    skip_unless_pandoc!();

    let mut converter = Pandoc::new().await.unwrap();
    converter
        .from("markdown")
        .unwrap()
        .to("markdown")
        .unwrap()
        .citeproc()
        .unwrap()
        .bibliography("some_non_existing_file.bib")
        .unwrap();

    let err = converter.convert("This is *a* string").await.unwrap_err();
    assert!(matches!(err, PandocError::Conversion { .. }));
}

// ── Introspection ────────────────────────────────────────────────────────────

#[tokio::test]
async fn info_reports_version_and_data_dir() {
    skip_unless_pandoc!();

    let info = Pandoc::info().await.unwrap();
    assert!(
        info.version.len() >= 2,
        "version should have at least major.minor: {:?}",
        info.version
    );
    assert_ne!(info.data_dir, PathBuf::new());
}

#[tokio::test]
async fn help_option_returns_usage_text() {
    skip_unless_pandoc!();

    let mut converter = Pandoc::new().await.unwrap();
    converter.help().unwrap();

    let usage = converter.convert("").await.unwrap();
    assert!(usage.contains("--to"), "help text should list options");
}

// ── Metadata-driven configuration (the do-pandoc flow) ───────────────────────

#[tokio::test]
async fn document_metadata_configures_its_own_conversion() {
    skip_unless_pandoc!();

    let document = "\
---
title: Self-describing
pandoc:
  from: markdown
  to: html
---

Hello *world*
";

    let yaml = metadata::extract_metadata(document);
    let meta: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
    let options = meta["pandoc"].as_object().unwrap();

    let mut converter = Pandoc::new().await.unwrap();
    for (name, value) in options {
        let value = OptionValue::from_json(name, value).unwrap();
        converter.set(name, value).unwrap();
    }
    assert!(!converter.writes_to_file());

    let html = converter.convert(document).await.unwrap();
    assert!(html.contains("<em>world</em>"));
}
