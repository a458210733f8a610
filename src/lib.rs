//! # Notefolio
//!
//! A minimal static site generator for personal note collections. A single
//! `content.toml` is the data source: categories group note records,
//! optionally nested under topics, and a markdown file becomes the about page.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Notefolio processes content through two independent stages, with a JSON
//! manifest between them:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (TOML content → structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: the manifest is human-readable JSON you can inspect.
//! - **Incremental builds**: regenerate HTML without re-scanning content.
//! - **Testability**: generation is a pure function from manifest to pages,
//!   so unit tests can exercise rendering logic without a content directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Stage 1 — loads and validates `content.toml`, produces the manifest |
//! | [`generate`] | Stage 2 — renders the final HTML site from the manifest using Maud |
//! | [`render`] | Page and fragment rendering: records, categories, grids, stats |
//! | [`stats`] | Record counting and featured-record selection over the content store |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting — tree-based display of pipeline results |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Layout Shells
//!
//! Each page kind declares the ordered list of section containers it hosts in
//! `[layout]` config (its *shell*). The renderer produces a fragment per
//! section and mounts it only if the shell names that section's container;
//! a container the shell omits is skipped with a single warning rather than
//! an error, so a site can drop whole sections (say, the stats line) by
//! editing config alone. See [`render::render_sections`].
//!
//! ## Flat Output Layout
//!
//! Every page is written at the output root (`index.html`, `{category}.html`,
//! `about.html`) and assets are copied beside them. Record paths are relative,
//! so writing all pages at the same depth means a path like
//! `physics/classical-mechanics.html` resolves identically from the home page
//! and from every category page.
//!
//! # The "Forever Stack"
//!
//! Notefolio is designed to be usable decades from now with minimal fuss. The
//! output is plain HTML, established CSS, and ~50 lines of vanilla JavaScript
//! for optional external scripts. The binary has zero runtime dependencies.
//! The generated site can be dropped on any file server — no Node, no PHP,
//! no database. If a browser can render HTML, it can display your notes.

pub mod config;
pub mod generate;
pub mod output;
pub mod render;
pub mod stats;
pub mod store;
