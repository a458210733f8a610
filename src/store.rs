//! Content store loading and manifest generation.
//!
//! Stage 1 of the notefolio build pipeline. Loads the declarative content
//! store (`content.toml`), validates it, and produces a structured manifest
//! that the generate stage consumes.
//!
//! ## Content Directory Structure
//!
//! ```text
//! content/                          # Content root
//! ├── config.toml                   # Site configuration (optional)
//! ├── content.toml                  # The content store (categories + records)
//! ├── about.md                      # About page (optional)
//! └── assets/                       # Note files, copied verbatim to dist/
//!     └── physics/
//!         └── classical-mechanics.html
//! ```
//!
//! ## Content Store Format
//!
//! The store is a hand-maintained, read-only mapping from category keys to
//! record lists. Updates happen by editing the file and rebuilding — nothing
//! is inserted, mutated, or deleted at build time.
//!
//! ```toml
//! [[category]]
//! key = "physics"
//! name = "Physics"
//! description = "Mechanics, fields, and friends"
//! icon = "∿"
//!
//! [[category.record]]
//! key = "classical-mechanics"
//! title = "Classical Mechanics"
//! path = "physics/classical-mechanics.html"
//! tags = ["mechanics"]
//! date = "2026-01-10"
//! featured = true
//!
//! # Nested topic groupings
//! [[category.topic]]
//! name = "Quantum"
//!
//! [[category.topic.record]]
//! key = "spin"
//! title = "Spin and Statistics"
//! path = "physics/spin.html"
//! ```
//!
//! ## Validation
//!
//! The loader enforces exactly one rule: record keys must be unique within
//! their category. Everything else is permissive by design — a record with
//! missing fields loads with empty defaults and renders as visibly
//! incomplete output rather than failing the build. Record paths are *not*
//! checked here; the `check` command reports broken ones as warnings.

use crate::config::{self, SiteConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("content.toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate record key '{0}' in category '{1}'")]
    DuplicateKey(String, String),
}

/// Manifest output from the scan stage.
///
/// Serialized to `manifest.json` between stages — human-readable, inspectable.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub store: ContentStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutPage>,
    pub config: SiteConfig,
}

/// The static content store: an ordered sequence of categories.
///
/// Read-only after loading. Category order is presentation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStore {
    #[serde(rename = "category")]
    pub categories: Vec<Category>,
}

impl ContentStore {
    /// Look up a category by key. A missing key is not an error — it simply
    /// yields an empty render downstream.
    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// A content category: a named, ordered group of records, optionally with
/// nested topic groupings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    /// Unique key; doubles as the category page URL slug (`{key}.html`).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Short description shown on the category page and home card.
    pub description: String,
    /// Decorative glyph shown next to the name (e.g. `"∿"`).
    pub icon: String,
    #[serde(rename = "record")]
    pub records: Vec<ContentRecord>,
    #[serde(rename = "topic")]
    pub topics: Vec<Topic>,
}

/// A nested topic grouping inside a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    pub name: String,
    #[serde(rename = "record")]
    pub records: Vec<ContentRecord>,
}

/// One linkable item: a note, project, or update entry.
///
/// All fields default so that a record with missing fields loads and renders
/// as empty strings instead of failing deserialization. `path` is a relative
/// URL resolved against the published site's file tree — it is never
/// validated at render time (a broken link is a content bug, not an error).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRecord {
    /// Unique within the owning category.
    pub key: String,
    /// Display title, also the link text.
    pub title: String,
    /// Relative URL of the note asset.
    pub path: String,
    /// Ordered tag list.
    pub tags: Vec<String>,
    /// Display-formatted date string; rendered verbatim.
    pub date: String,
    /// Featured records also appear in the home page featured section.
    pub featured: bool,
}

/// The about page, parsed from `about.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutPage {
    /// Title from the first `# heading`, or "About" as fallback.
    pub title: String,
    /// Raw markdown body.
    pub body: String,
}

/// Name of the assets directory inside the content root.
pub const ASSETS_DIR: &str = "assets";

/// Scan the content root into a manifest: content store + about page + config.
pub fn scan(root: &Path) -> Result<Manifest, StoreError> {
    let store = load_store(root)?;
    let about = load_about(root)?;
    let config = config::load_config(root)?;

    Ok(Manifest {
        store,
        about,
        config,
    })
}

/// Load and validate `content.toml`. A missing file yields an empty store —
/// empty content is zero records, not an error.
pub fn load_store(root: &Path) -> Result<ContentStore, StoreError> {
    let store_path = root.join("content.toml");
    if !store_path.exists() {
        return Ok(ContentStore::default());
    }
    let content = fs::read_to_string(&store_path)?;
    let store: ContentStore = toml::from_str(&content)?;
    validate_store(&store)?;
    Ok(store)
}

/// Enforce record-key uniqueness within each category (direct records and
/// topic records share one namespace). Records with empty keys are malformed
/// rather than duplicated and are left to render as-is.
fn validate_store(store: &ContentStore) -> Result<(), StoreError> {
    for category in &store.categories {
        let mut seen: HashSet<&str> = HashSet::new();
        let direct = category.records.iter();
        let nested = category.topics.iter().flat_map(|t| t.records.iter());
        for record in direct.chain(nested) {
            if record.key.is_empty() {
                continue;
            }
            if !seen.insert(&record.key) {
                return Err(StoreError::DuplicateKey(
                    record.key.clone(),
                    category.key.clone(),
                ));
            }
        }
    }
    Ok(())
}

/// Parse the optional `about.md` in the content root.
fn load_about(root: &Path) -> Result<Option<AboutPage>, StoreError> {
    let about_path = root.join("about.md");
    if !about_path.exists() {
        return Ok(None);
    }
    let body = fs::read_to_string(&about_path)?;
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| "About".to_string());
    Ok(Some(AboutPage { title, body }))
}

// =============================================================================
// Path checking (the `check` command)
// =============================================================================

/// A record whose path resolves to no file under `content/assets/`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenPath {
    pub category: String,
    pub record_key: String,
    pub path: String,
}

/// Walk the assets tree and report record paths with no matching asset.
///
/// Advisory only: generate never performs this check, and a broken path is
/// a warning, not a failure. External URLs (anything with a scheme) are
/// skipped.
pub fn check_paths(store: &ContentStore, root: &Path) -> Result<Vec<BrokenPath>, StoreError> {
    let assets_root = root.join(ASSETS_DIR);
    let mut existing: HashSet<String> = HashSet::new();

    if assets_root.is_dir() {
        for entry in WalkDir::new(&assets_root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() {
                if let Ok(rel) = entry.path().strip_prefix(&assets_root) {
                    existing.insert(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
    }

    let mut broken = Vec::new();
    for category in &store.categories {
        let direct = category.records.iter();
        let nested = category.topics.iter().flat_map(|t| t.records.iter());
        for record in direct.chain(nested) {
            if record.path.is_empty() || record.path.contains("://") {
                continue;
            }
            let rel = record.path.trim_start_matches('/');
            if !existing.contains(rel) {
                log::warn!(
                    "record '{}' in category '{}' points to missing asset: {}",
                    record.key,
                    category.key,
                    record.path
                );
                broken.push(BrokenPath {
                    category: category.key.clone(),
                    record_key: record.key.clone(),
                    path: record.path.clone(),
                });
            }
        }
    }
    Ok(broken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STORE_TOML: &str = r#"
[[category]]
key = "physics"
name = "Physics"
description = "Mechanics and friends"
icon = "∿"

[[category.record]]
key = "classical-mechanics"
title = "Classical Mechanics"
path = "physics/classical-mechanics.html"
tags = ["mechanics"]
date = "2026-01-10"
featured = true

[[category.record]]
key = "thermo"
title = "Thermodynamics"
path = "physics/thermo.html"

[[category.topic]]
name = "Quantum"

[[category.topic.record]]
key = "spin"
title = "Spin and Statistics"
path = "physics/spin.html"

[[category]]
key = "projects"
name = "Projects"
"#;

    fn write_content(tmp: &TempDir, toml: &str) {
        fs::write(tmp.path().join("content.toml"), toml).unwrap();
    }

    #[test]
    fn scan_loads_categories_in_order() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        let keys: Vec<&str> = manifest
            .store
            .categories
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(keys, vec!["physics", "projects"]);
    }

    #[test]
    fn records_preserve_declaration_order() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        let physics = manifest.store.get("physics").unwrap();
        let titles: Vec<&str> = physics.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Classical Mechanics", "Thermodynamics"]);
    }

    #[test]
    fn topics_nest_under_category() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        let physics = manifest.store.get("physics").unwrap();
        assert_eq!(physics.topics.len(), 1);
        assert_eq!(physics.topics[0].name, "Quantum");
        assert_eq!(physics.topics[0].records[0].key, "spin");
    }

    #[test]
    fn record_fields_parse() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        let record = &manifest.store.get("physics").unwrap().records[0];
        assert_eq!(record.key, "classical-mechanics");
        assert_eq!(record.path, "physics/classical-mechanics.html");
        assert_eq!(record.tags, vec!["mechanics"]);
        assert_eq!(record.date, "2026-01-10");
        assert!(record.featured);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "misc"

[[category.record]]
key = "stub"
"#,
        );

        let manifest = scan(tmp.path()).unwrap();
        let misc = manifest.store.get("misc").unwrap();
        // Malformed records load with empty defaults — never a parse failure
        assert!(misc.name.is_empty());
        let record = &misc.records[0];
        assert!(record.title.is_empty());
        assert!(record.path.is_empty());
        assert!(record.tags.is_empty());
        assert!(!record.featured);
    }

    #[test]
    fn missing_store_file_yields_empty_store() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.store.is_empty());
    }

    #[test]
    fn missing_key_lookup_yields_none() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.store.get("no-such-category").is_none());
    }

    #[test]
    fn duplicate_record_key_is_error() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "physics"

[[category.record]]
key = "same"
title = "First"

[[category.record]]
key = "same"
title = "Second"
"#,
        );

        let result = scan(tmp.path());
        assert!(matches!(result, Err(StoreError::DuplicateKey(_, _))));
    }

    #[test]
    fn duplicate_key_across_topic_is_error() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "physics"

[[category.record]]
key = "same"

[[category.topic]]
name = "Quantum"

[[category.topic.record]]
key = "same"
"#,
        );

        let result = scan(tmp.path());
        assert!(matches!(result, Err(StoreError::DuplicateKey(_, _))));
    }

    #[test]
    fn same_key_in_different_categories_is_fine() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "a"
[[category.record]]
key = "intro"

[[category]]
key = "b"
[[category.record]]
key = "intro"
"#,
        );

        assert!(scan(tmp.path()).is_ok());
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, "[[category]\nkey=");
        assert!(matches!(scan(tmp.path()), Err(StoreError::Toml(_))));
    }

    // =========================================================================
    // About page tests
    // =========================================================================

    #[test]
    fn about_page_parsed_when_present() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);
        fs::write(
            tmp.path().join("about.md"),
            "# About These Notes\n\nHand-written, occasionally correct.",
        )
        .unwrap();

        let manifest = scan(tmp.path()).unwrap();
        let about = manifest.about.unwrap();
        assert_eq!(about.title, "About These Notes");
        assert!(about.body.contains("occasionally correct"));
    }

    #[test]
    fn about_title_falls_back_without_heading() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("about.md"), "No heading here.").unwrap();

        let manifest = scan(tmp.path()).unwrap();
        assert_eq!(manifest.about.unwrap().title, "About");
    }

    #[test]
    fn no_about_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let manifest = scan(tmp.path()).unwrap();
        assert!(manifest.about.is_none());
    }

    // =========================================================================
    // Manifest round-trip
    // =========================================================================

    #[test]
    fn manifest_survives_json_round_trip() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);

        let manifest = scan(tmp.path()).unwrap();
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();

        assert_eq!(back.store.categories.len(), 2);
        assert_eq!(
            back.store.get("physics").unwrap().records[0].title,
            "Classical Mechanics"
        );
    }

    // =========================================================================
    // check_paths tests
    // =========================================================================

    #[test]
    fn check_reports_missing_assets() {
        let tmp = TempDir::new().unwrap();
        write_content(&tmp, STORE_TOML);
        // Only one of the three record paths exists on disk
        let physics_dir = tmp.path().join("assets/physics");
        fs::create_dir_all(&physics_dir).unwrap();
        fs::write(physics_dir.join("classical-mechanics.html"), "<html>").unwrap();

        let store = load_store(tmp.path()).unwrap();
        let broken = check_paths(&store, tmp.path()).unwrap();

        let paths: Vec<&str> = broken.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["physics/thermo.html", "physics/spin.html"]);
    }

    #[test]
    fn check_skips_external_urls_and_empty_paths() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "links"

[[category.record]]
key = "github"
path = "https://github.com/example"

[[category.record]]
key = "empty"
"#,
        );

        let store = load_store(tmp.path()).unwrap();
        let broken = check_paths(&store, tmp.path()).unwrap();
        assert!(broken.is_empty());
    }

    #[test]
    fn check_passes_when_all_assets_exist() {
        let tmp = TempDir::new().unwrap();
        write_content(
            &tmp,
            r#"
[[category]]
key = "misc"

[[category.record]]
key = "one"
path = "one.html"
"#,
        );
        fs::create_dir_all(tmp.path().join("assets")).unwrap();
        fs::write(tmp.path().join("assets/one.html"), "<html>").unwrap();

        let store = load_store(tmp.path()).unwrap();
        assert!(check_paths(&store, tmp.path()).unwrap().is_empty());
    }
}
