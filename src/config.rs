//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by the user config file in the
//! content root. Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only override the light mode background
//! [colors.light]
//! background = "#fafafa"
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Notes"           # Site title (header, <title>)
//! author = ""               # Author name (footer)
//! footer = ""               # Extra footer text
//!
//! [layout]
//! home = ["featured-grid", "category-grid", "site-stats"]
//! category = ["record-list"]
//!
//! [theme]
//! content_width = "72rem"   # Max content width
//! grid_gap = "1rem"         # Gap between cards in grids
//! grid_padding = "2rem"     # Padding around grid containers
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"    # Nav, dates, tags
//! border = "#e0e0e0"
//! link = "#333333"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! link_hover = "#ffffff"
//!
//! [scripts]
//! external = []             # External script URLs loaded with readiness signaling
//! timeout_ms = 8000         # Per-script load timeout
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Layout Sections
//!
//! `[layout]` lists the container class names each page shell provides, in
//! presentation order. Renderers target containers by class name; a fragment
//! whose container is missing from the shell is skipped with a warning, never
//! an error. See [`crate::render::Shell`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: title, author, footer text.
    pub site: SiteMeta,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Theme/layout spacing settings.
    pub theme: ThemeConfig,
    /// Container class names each page shell provides.
    pub layout: LayoutConfig,
    /// External script loading settings.
    pub scripts: ScriptsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scripts.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "scripts.timeout_ms must be non-zero".into(),
            ));
        }
        if self.layout.home.is_empty() {
            return Err(ConfigError::Validation(
                "layout.home must list at least one container".into(),
            ));
        }
        if self.layout.category.is_empty() {
            return Err(ConfigError::Validation(
                "layout.category must list at least one container".into(),
            ));
        }
        if self.colors.light.background.is_empty() || self.colors.dark.background.is_empty() {
            return Err(ConfigError::Validation(
                "colors.*.background must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity shown in the header and footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Site title, used in the header and `<title>` elements.
    pub title: String,
    /// Author name, shown in the footer when non-empty.
    pub author: String,
    /// Extra footer text, shown when non-empty.
    pub footer: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Notes".to_string(),
            author: String::new(),
            footer: String::new(),
        }
    }
}

/// Container class names provided by each page shell, in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Home page containers.
    pub home: Vec<String>,
    /// Category page containers.
    pub category: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            home: vec![
                "featured-grid".to_string(),
                "category-grid".to_string(),
                "site-stats".to_string(),
            ],
            category: vec!["record-list".to_string()],
        }
    }
}

/// External script loading settings.
///
/// Scripts are injected with one-shot `load`/`error` handlers and a bounded
/// timeout — no readiness polling. An empty list emits no script tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// External script URLs (e.g. a math renderer) to load on every page.
    pub external: Vec<String>,
    /// Per-script load timeout in milliseconds. After this the script is
    /// reported failed via a `notefolio:failed` event.
    pub timeout_ms: u64,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            external: Vec::new(),
            timeout_ms: 8000,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page-rendering workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Theme/layout spacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Maximum content width (CSS value).
    pub content_width: String,
    /// Gap between cards in category and featured grids (CSS value).
    pub grid_gap: String,
    /// Padding around grid containers (CSS value).
    pub grid_padding: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            content_width: "72rem".to_string(),
            grid_gap: "1rem".to_string(),
            grid_padding: "2rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (nav, dates, tags).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Notefolio Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root next to content.toml. Only the keys
# you want to override need to be present. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Site title, shown in the header and in <title> elements.
title = "Notes"

# Author name, shown in the footer when non-empty.
author = ""

# Extra footer text, shown when non-empty.
footer = ""

# ---------------------------------------------------------------------------
# Page shells
# ---------------------------------------------------------------------------
[layout]
# Container class names each page provides, in presentation order.
# Renderers target containers by class name; removing one here skips
# that section with a warning at build time.
home = ["featured-grid", "category-grid", "site-stats"]
category = ["record-list"]

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
# Maximum content width (CSS value).
content_width = "72rem"

# Gap between cards in category and featured grids (CSS value).
grid_gap = "1rem"

# Padding around grid containers (CSS value).
grid_padding = "2rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Nav, dates, tags
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# External scripts
# ---------------------------------------------------------------------------
[scripts]
# External script URLs (e.g. a math renderer) loaded on every page with
# one-shot readiness signaling. Empty list = no script tags at all.
external = []

# Per-script load timeout in milliseconds. Scripts that neither load nor
# error within this window are reported failed.
timeout_ms = 8000

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --content-width: {content_width};
    --grid-gap: {grid_gap};
    --grid-padding: {grid_padding};
}}"#,
        content_width = theme.content_width,
        grid_gap = theme.grid_gap,
        grid_padding = theme.grid_padding,
    )
}
