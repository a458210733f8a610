//! HTML fragment and page rendering.
//!
//! All markup is produced with [maud](https://maud.lambda.xyz/): templates are
//! type-safe Rust expressions and every interpolated content field is escaped
//! by construction, so author data can never inject markup. The only
//! `PreEscaped` uses are the embedded CSS/JS assets and the about page's
//! markdown-rendered body.
//!
//! ## Container Contract
//!
//! Pages are assembled from a [`Shell`]: the ordered list of container class
//! names the page provides (from `[layout]` config). Every fragment kind
//! targets one container class. Rendering walks the shell in order; a
//! container with no matching fragment, or a fragment whose container is
//! absent from the shell, is skipped with a single warning-level log entry
//! and recorded in the [`RenderReport`] — never an error. The worst case is
//! a visually incomplete page.
//!
//! Fragment renderers are pure: the same input produces byte-identical
//! output, and re-rendering replaces prior output rather than accumulating.
//!
//! ## Context
//!
//! A [`SiteContext`] is constructed once per build and threaded by reference
//! through every renderer — there is no module-global state.

use crate::config::SiteConfig;
use crate::stats;
use crate::store::{AboutPage, Category, ContentRecord, ContentStore, Topic};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const LOADER_JS: &str = include_str!("../static/loader.js");

/// Everything renderers need, built once per build and passed by reference.
pub struct SiteContext<'a> {
    pub config: &'a SiteConfig,
    pub store: &'a ContentStore,
    pub css: &'a str,
}

/// The ordered set of container class names a page provides.
#[derive(Debug, Clone)]
pub struct Shell {
    containers: Vec<String>,
}

impl Shell {
    pub fn new(containers: &[String]) -> Self {
        Self {
            containers: containers.to_vec(),
        }
    }

    pub fn has(&self, class: &str) -> bool {
        self.containers.iter().any(|c| c == class)
    }

    pub fn containers(&self) -> impl Iterator<Item = &str> {
        self.containers.iter().map(String::as_str)
    }
}

/// Outcome of assembling a page: which containers rendered, which were skipped.
///
/// Every entry in `skipped` corresponds to exactly one warning log entry.
#[derive(Debug, Default, Clone)]
pub struct RenderReport {
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
}

impl RenderReport {
    pub fn merge(&mut self, other: RenderReport) {
        self.rendered.extend(other.rendered);
        self.skipped.extend(other.skipped);
    }
}

/// Container classes the home page shell may provide.
pub const HOME_SECTIONS: &[&str] = &["featured-grid", "category-grid", "site-stats"];

/// Container classes the category page shell may provide.
pub const CATEGORY_SECTIONS: &[&str] = &["record-list"];

/// Walk the shell in order, rendering each container's fragment inside a
/// `div` carrying the container class. Containers nobody can fill and
/// fragments whose container is absent are skipped with one warning each.
fn render_sections(
    shell: &Shell,
    known: &[&str],
    mut fragment_for: impl FnMut(&str) -> Option<Markup>,
    report: &mut RenderReport,
) -> Markup {
    let mut sections: Vec<Markup> = Vec::new();
    for class in shell.containers() {
        match fragment_for(class) {
            Some(fragment) => {
                report.rendered.push(class.to_string());
                sections.push(html! { div class=(class) { (fragment) } });
            }
            None => {
                log::warn!("no renderer for container '{}'; skipping", class);
                report.skipped.push(class.to_string());
            }
        }
    }
    for class in known {
        if !shell.has(class) {
            log::warn!("container '{}' absent from shell; skipping render", class);
            report.skipped.push((*class).to_string());
        }
    }
    html! {
        @for section in &sections { (section) }
    }
}

// ============================================================================
// Fragment Renderers
// ============================================================================

/// Renders one record as a list item: link, date, featured marker, tags.
///
/// The record's `path` is emitted verbatim as the href — paths are relative
/// URLs against the published file tree and are never validated here.
pub fn render_record(record: &ContentRecord) -> Markup {
    html! {
        li.record {
            a.record-link href=(record.path) { (record.title) }
            @if !record.date.is_empty() {
                span.record-date { (record.date) }
            }
            @if record.featured {
                span.record-featured { "★" }
            }
            @if !record.tags.is_empty() {
                ul.record-tags {
                    @for tag in &record.tags {
                        li.tag { (tag) }
                    }
                }
            }
        }
    }
}

fn render_topic(topic: &Topic) -> Markup {
    html! {
        section.topic {
            h2.topic-name { (topic.name) }
            ul.records {
                @for record in &topic.records {
                    (render_record(record))
                }
            }
        }
    }
}

/// Renders a full category fragment: header, direct records, nested topics.
///
/// A category with zero records produces an empty record list — no item
/// nodes, no error.
pub fn render_category(category: &Category) -> Markup {
    html! {
        section.category {
            header.category-header {
                @if !category.icon.is_empty() {
                    span.category-icon aria-hidden="true" { (category.icon) }
                }
                h1 { (category.name) }
                @if !category.description.is_empty() {
                    p.category-description { (category.description) }
                }
            }
            ul.records {
                @for record in &category.records {
                    (render_record(record))
                }
            }
            @for topic in &category.topics {
                (render_topic(topic))
            }
        }
    }
}

/// Renders the category identified by `key`, or an empty fragment when the
/// store has no such category. A missing key is an empty render, not an error.
pub fn render_category_by_key(ctx: &SiteContext, key: &str) -> Markup {
    match ctx.store.get(key) {
        Some(category) => render_category(category),
        None => html! {},
    }
}

/// Renders the home page category grid: one card per category.
fn render_category_grid(ctx: &SiteContext) -> Markup {
    html! {
        @for category in &ctx.store.categories {
            a.category-card href={ (category.key) ".html" } {
                @if !category.icon.is_empty() {
                    span.category-icon aria-hidden="true" { (category.icon) }
                }
                span.category-name { (category.name) }
                @if !category.description.is_empty() {
                    span.category-blurb { (category.description) }
                }
                span.category-count { (stats::note_count_label(stats::category_record_count(category))) }
            }
        }
    }
}

/// Renders the featured records strip in store order.
fn render_featured(ctx: &SiteContext) -> Markup {
    html! {
        @for record in stats::featured(ctx.store) {
            a.featured-card href=(record.path) {
                span.featured-title { (record.title) }
                @if !record.date.is_empty() {
                    span.record-date { (record.date) }
                }
            }
        }
    }
}

/// Renders the site stats line: total notes across categories.
fn render_stats(ctx: &SiteContext) -> Markup {
    let notes = stats::record_count(ctx.store);
    let categories = ctx.store.categories.len();
    html! {
        p.stats-line {
            (stats::note_count_label(notes))
            " across "
            (categories)
            @if categories == 1 { " category" } @else { " categories" }
        }
    }
}

// ============================================================================
// Navigation and Document Skeleton
// ============================================================================

/// Renders the site navigation: category links plus the about page.
pub fn render_nav(ctx: &SiteContext, current_key: &str, about_title: Option<&str>) -> Markup {
    html! {
        ul {
            @for category in &ctx.store.categories {
                @let is_current = category.key == current_key;
                li class=[is_current.then_some("current")] {
                    a href={ "/" (category.key) ".html" } { (category.name) }
                }
            }
            @if let Some(title) = about_title {
                @let is_current = current_key == "about";
                li class=[is_current.then_some("current")] {
                    a href="/about.html" { (title) }
                }
            }
        }
    }
}

/// Renders the site header: breadcrumb plus navigation.
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

fn site_footer(ctx: &SiteContext) -> Markup {
    let meta = &ctx.config.site;
    html! {
        @if !meta.author.is_empty() || !meta.footer.is_empty() {
            footer.site-footer {
                @if !meta.author.is_empty() {
                    span.footer-author { (meta.author) }
                }
                @if !meta.footer.is_empty() {
                    span.footer-text { (meta.footer) }
                }
            }
        }
    }
}

/// Emits the external-script loader when `[scripts]` lists any URLs.
///
/// Script URLs and the timeout ride on data attributes; the embedded loader
/// injects each script with one-shot load/error handlers and a bounded
/// timeout. No polling.
fn external_scripts(config: &SiteConfig) -> Markup {
    if config.scripts.external.is_empty() {
        return html! {};
    }
    let urls = config.scripts.external.join(" ");
    html! {
        div.script-loader data-scripts=(urls) data-timeout=(config.scripts.timeout_ms) {}
        script { (PreEscaped(LOADER_JS)) }
    }
}

/// Renders the base HTML document structure.
pub fn base_document(ctx: &SiteContext, title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(ctx.css)) }
            }
            body {
                (content)
                (site_footer(ctx))
                (external_scripts(ctx.config))
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page from its shell sections.
pub fn render_home_page(
    ctx: &SiteContext,
    shell: &Shell,
    about_title: Option<&str>,
) -> (Markup, RenderReport) {
    let mut report = RenderReport::default();
    let nav = render_nav(ctx, "", about_title);

    let breadcrumb = html! {
        a href="/" { (ctx.config.site.title) }
    };

    let sections = render_sections(
        shell,
        HOME_SECTIONS,
        |class| match class {
            "featured-grid" => Some(render_featured(ctx)),
            "category-grid" => Some(render_category_grid(ctx)),
            "site-stats" => Some(render_stats(ctx)),
            _ => None,
        },
        &mut report,
    );

    let content = html! {
        (site_header(breadcrumb, nav))
        main.index-page {
            (sections)
        }
    };

    (base_document(ctx, &ctx.config.site.title, content), report)
}

/// Renders one category page from its shell sections.
pub fn render_category_page(
    ctx: &SiteContext,
    shell: &Shell,
    category: &Category,
    about_title: Option<&str>,
) -> (Markup, RenderReport) {
    let mut report = RenderReport::default();
    let nav = render_nav(ctx, &category.key, about_title);

    let breadcrumb = html! {
        a href="/" { (ctx.config.site.title) }
        " › "
        (category.name)
    };

    let sections = render_sections(
        shell,
        CATEGORY_SECTIONS,
        |class| match class {
            "record-list" => Some(render_category(category)),
            _ => None,
        },
        &mut report,
    );

    let content = html! {
        (site_header(breadcrumb, nav))
        main.category-page {
            (sections)
        }
    };

    (base_document(ctx, &category.name, content), report)
}

/// Renders the about page from markdown content.
pub fn render_about_page(ctx: &SiteContext, about: &AboutPage) -> Markup {
    let nav = render_nav(ctx, "about", Some(&about.title));

    // Convert markdown to HTML. The body is author-controlled static data.
    let parser = Parser::new(&about.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let breadcrumb = html! {
        a href="/" { (ctx.config.site.title) }
        " › "
        (about.title)
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.about-page {
            article.about-content {
                (PreEscaped(body_html))
            }
        }
    };

    base_document(ctx, &about.title, content)
}

// ============================================================================
// Tests
// ============================================================================
