//! HTML site generation.
//!
//! Stage 2 of the notefolio build pipeline. Takes the scan manifest and
//! generates the final static HTML site.
//!
//! ## Generated Pages
//!
//! - **Home page** (`/index.html`): shell sections — featured grid, category
//!   grid, site stats — in layout order
//! - **Category pages** (`/{key}.html`): record listing per category,
//!   rendered in parallel
//! - **About page** (`/about.html`): optional markdown content
//!
//! All pages are written at the output root so that record paths, which are
//! relative URLs against the published file tree, resolve the same way from
//! every page.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Home page
//! ├── physics.html               # Category pages
//! ├── projects.html
//! ├── about.html                 # About page (if about.md exists)
//! └── physics/                   # Copied verbatim from content/assets/
//!     └── classical-mechanics.html
//! ```
//!
//! ## CSS
//!
//! The base stylesheet is embedded at compile time; color and theme CSS
//! custom properties generated from config are prepended, so the whole
//! stylesheet is inlined into every page — no extra requests.

use crate::config;
use crate::render::{self, RenderReport, Shell, SiteContext};
use crate::store::Manifest;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// What a generate run produced: written page paths plus render warnings.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Page paths relative to the output directory, in write order.
    pub pages: Vec<String>,
    /// Merged container render report across all pages.
    pub render: RenderReport,
}

/// Generate the site from a manifest file.
pub fn generate(
    manifest_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_from_manifest(&manifest, source_dir, output_dir)
}

/// Generate the site from an in-memory manifest.
pub fn generate_from_manifest(
    manifest: &Manifest,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    // Assemble the inline stylesheet: config-driven custom properties first,
    // then the embedded base styles.
    let color_css = config::generate_color_css(&manifest.config.colors);
    let theme_css = config::generate_theme_css(&manifest.config.theme);
    let css = format!("{}\n\n{}\n\n{}", color_css, theme_css, CSS_STATIC);

    // The context is built exactly once and passed by reference everywhere.
    let ctx = SiteContext {
        config: &manifest.config,
        store: &manifest.store,
        css: &css,
    };

    fs::create_dir_all(output_dir)?;

    // Copy note assets verbatim to the output root
    let assets_dir = source_dir.join(crate::store::ASSETS_DIR);
    if assets_dir.is_dir() {
        copy_dir_recursive(&assets_dir, output_dir)?;
    }

    let mut report = GenerateReport::default();
    let about_title = manifest.about.as_ref().map(|a| a.title.as_str());

    // Home page
    let home_shell = Shell::new(&manifest.config.layout.home);
    let (home, home_report) = render::render_home_page(&ctx, &home_shell, about_title);
    fs::write(output_dir.join("index.html"), home.into_string())?;
    log::debug!("wrote index.html");
    report.pages.push("index.html".to_string());
    report.render.merge(home_report);

    // Category pages, rendered in parallel. Output paths depend only on the
    // category key, so writes never collide (keys are unique by construction).
    let category_shell = Shell::new(&manifest.config.layout.category);
    let results: Vec<Result<(String, RenderReport), GenerateError>> = manifest
        .store
        .categories
        .par_iter()
        .filter(|category| {
            if category.key.is_empty() {
                log::warn!("category '{}' has no key; skipping page", category.name);
                return false;
            }
            true
        })
        .map(|category| {
            let (page, page_report) =
                render::render_category_page(&ctx, &category_shell, category, about_title);
            let filename = format!("{}.html", category.key);
            fs::write(output_dir.join(&filename), page.into_string())?;
            log::debug!("wrote {}", filename);
            Ok((filename, page_report))
        })
        .collect();

    for result in results {
        let (filename, page_report) = result?;
        report.pages.push(filename);
        report.render.merge(page_report);
    }

    // About page
    if let Some(about) = &manifest.about {
        let about_html = render::render_about_page(&ctx, about);
        fs::write(output_dir.join("about.html"), about_html.into_string())?;
        log::debug!("wrote about.html");
        report.pages.push("about.html".to_string());
    }

    Ok(report)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::store::{Category, ContentRecord, ContentStore};
    use tempfile::TempDir;

    fn test_manifest() -> Manifest {
        Manifest {
            store: ContentStore {
                categories: vec![
                    Category {
                        key: "physics".to_string(),
                        name: "Physics".to_string(),
                        records: vec![ContentRecord {
                            key: "classical-mechanics".to_string(),
                            title: "Classical Mechanics".to_string(),
                            path: "physics/classical-mechanics.html".to_string(),
                            tags: vec!["mechanics".to_string()],
                            featured: true,
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                    Category {
                        key: "projects".to_string(),
                        name: "Projects".to_string(),
                        ..Default::default()
                    },
                ],
            },
            about: None,
            config: SiteConfig::default(),
        }
    }

    #[test]
    fn generates_home_and_category_pages() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let report = generate_from_manifest(&test_manifest(), &source, &output).unwrap();

        assert!(output.join("index.html").exists());
        assert!(output.join("physics.html").exists());
        assert!(output.join("projects.html").exists());
        assert_eq!(report.pages.len(), 3);
        assert!(report.render.skipped.is_empty());
    }

    #[test]
    fn category_page_contains_record_link() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        generate_from_manifest(&test_manifest(), &source, &output).unwrap();

        let html = fs::read_to_string(output.join("physics.html")).unwrap();
        assert!(html.contains(r#"href="physics/classical-mechanics.html""#));
        assert!(html.contains("Classical Mechanics"));
    }

    #[test]
    fn home_page_inlines_config_css() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let mut manifest = test_manifest();
        manifest.config.colors.light.background = "#abcdef".to_string();
        generate_from_manifest(&manifest, &source, &output).unwrap();

        let html = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(html.contains("--color-bg: #abcdef"));
        assert!(html.contains("--content-width"));
    }

    #[test]
    fn assets_copied_to_output_root() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(source.join("assets/physics")).unwrap();
        fs::write(
            source.join("assets/physics/classical-mechanics.html"),
            "<html></html>",
        )
        .unwrap();

        generate_from_manifest(&test_manifest(), &source, &output).unwrap();

        assert!(output.join("physics/classical-mechanics.html").exists());
    }

    #[test]
    fn about_page_written_when_present() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let mut manifest = test_manifest();
        manifest.about = Some(crate::store::AboutPage {
            title: "About These Notes".to_string(),
            body: "# About These Notes\n\nHello.".to_string(),
        });
        let report = generate_from_manifest(&manifest, &source, &output).unwrap();

        assert!(output.join("about.html").exists());
        assert!(report.pages.contains(&"about.html".to_string()));
        // Nav on every page links to the about page
        let home = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(home.contains("/about.html"));
    }

    #[test]
    fn empty_category_key_skips_page() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let mut manifest = test_manifest();
        manifest.store.categories.push(Category {
            name: "No Key".to_string(),
            ..Default::default()
        });
        let report = generate_from_manifest(&manifest, &source, &output).unwrap();

        // Two keyed categories + home, the keyless one produces no page
        assert_eq!(report.pages.len(), 3);
        assert!(!output.join(".html").exists());
    }

    #[test]
    fn layout_without_stats_skips_section_per_page() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let mut manifest = test_manifest();
        manifest.config.layout.home =
            vec!["featured-grid".to_string(), "category-grid".to_string()];
        let report = generate_from_manifest(&manifest, &source, &output).unwrap();

        assert_eq!(report.render.skipped, vec!["site-stats"]);
        let html = fs::read_to_string(output.join("index.html")).unwrap();
        assert!(!html.contains("site-stats"));
    }

    #[test]
    fn regeneration_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let manifest = test_manifest();
        generate_from_manifest(&manifest, &source, &output).unwrap();
        let first = fs::read_to_string(output.join("index.html")).unwrap();
        generate_from_manifest(&manifest, &source, &output).unwrap();
        let second = fs::read_to_string(output.join("index.html")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn generate_reads_manifest_from_disk() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("content");
        let output = tmp.path().join("dist");
        fs::create_dir_all(&source).unwrap();

        let manifest_path = tmp.path().join("manifest.json");
        let json = serde_json::to_string_pretty(&test_manifest()).unwrap();
        fs::write(&manifest_path, json).unwrap();

        let report = generate(&manifest_path, &source, &output).unwrap();
        assert!(output.join("index.html").exists());
        assert_eq!(report.pages.len(), 3);
    }
}
