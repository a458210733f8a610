//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric, not file-centric: the primary display for
//! every entity (category, record, page) is its semantic identity — a
//! positional index plus title — with paths shown as secondary context.
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Scan
//!
//! ```text
//! Categories
//! 001 Physics (4 notes)
//!     001 Classical Mechanics
//!         Source: physics/classical-mechanics.html
//!     Quantum
//!         001 Spin and Statistics
//!             Source: physics/spin.html
//!
//! Pages
//! 001 About These Notes
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 001 Physics → physics.html
//! About → about.html
//!
//! Generated 3 pages
//! ```

use crate::generate::GenerateReport;
use crate::stats;
use crate::store::{BrokenPath, Category, ContentStore, Manifest};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional count.
///
/// ```text
/// 001 Physics (4 notes)
/// 001 Classical Mechanics
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    let shown = if title.is_empty() { "(untitled)" } else { title };
    match count {
        Some(n) => format!(
            "{} {} ({})",
            format_index(index),
            shown,
            stats::note_count_label(n)
        ),
        None => format!("{} {}", format_index(index), shown),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

fn format_records(
    records: &[crate::store::ContentRecord],
    depth: usize,
    lines: &mut Vec<String>,
) {
    for (i, record) in records.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(depth),
            entity_header(i + 1, &record.title, None)
        ));
        if !record.path.is_empty() {
            lines.push(format!("{}Source: {}", indent(depth + 1), record.path));
        }
    }
}

fn format_category(category: &Category, index: usize, lines: &mut Vec<String>) {
    let count = stats::category_record_count(category);
    lines.push(entity_header(index, &category.name, Some(count)));
    if !category.description.is_empty() {
        lines.push(format!(
            "{}{}",
            indent(1),
            truncate_desc(&category.description, 60)
        ));
    }
    format_records(&category.records, 1, lines);
    for topic in &category.topics {
        lines.push(format!("{}{}", indent(1), topic.name));
        format_records(&topic.records, 2, lines);
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered content inventory.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Categories".to_string());
    if manifest.store.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, category) in manifest.store.categories.iter().enumerate() {
        format_category(category, i + 1, &mut lines);
    }

    if let Some(about) = &manifest.about {
        lines.push(String::new());
        lines.push("Pages".to_string());
        lines.push(entity_header(1, &about.title, None));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total: {} in {} categories",
        stats::note_count_label(stats::record_count(&manifest.store)),
        manifest.store.categories.len()
    ));

    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output: pages written plus skipped containers.
pub fn format_generate_output(manifest: &Manifest, report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for page in &report.pages {
        if page == "index.html" {
            lines.push(format!("Home → {}", page));
        } else if page == "about.html" {
            let title = manifest
                .about
                .as_ref()
                .map(|a| a.title.as_str())
                .unwrap_or("About");
            lines.push(format!("{} → {}", title, page));
        } else {
            let key = page.trim_end_matches(".html");
            let title = manifest
                .store
                .get(key)
                .map(|c| c.name.as_str())
                .unwrap_or(key);
            lines.push(format!("{} → {}", title, page));
        }
    }

    for class in &report.render.skipped {
        lines.push(format!("Skipped container: {}", class));
    }

    lines.push(String::new());
    lines.push(format!("Generated {} pages", report.pages.len()));

    lines
}

pub fn print_generate_output(manifest: &Manifest, report: &GenerateReport) {
    for line in format_generate_output(manifest, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format check output: broken record paths, or a clean bill.
pub fn format_check_output(broken: &[BrokenPath]) -> Vec<String> {
    if broken.is_empty() {
        return vec!["All record paths resolve to assets".to_string()];
    }
    let mut lines = vec![format!("{} broken record paths", broken.len())];
    for b in broken {
        lines.push(format!(
            "{}{} / {} → {}",
            indent(1),
            b.category,
            b.record_key,
            b.path
        ));
    }
    lines
}

pub fn print_check_output(broken: &[BrokenPath]) {
    for line in format_check_output(broken) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats output
// ============================================================================

/// Format the stats summary: per-category counts plus the store total.
pub fn format_stats_output(store: &ContentStore) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, category) in store.categories.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &category.name,
            Some(stats::category_record_count(category)),
        ));
    }
    lines.push(format!(
        "Total: {} in {} categories",
        stats::note_count_label(stats::record_count(store)),
        store.categories.len()
    ));
    lines
}

pub fn print_stats_output(store: &ContentStore) {
    for line in format_stats_output(store) {
        println!("{}", line);
    }
}
