//! HTML page rendering and static site output.
//!
//! Every page is produced by the same renderers whether it is served live by
//! [`crate::server`] or written to disk by [`build`].
//!
//! ## Pages
//!
//! - **Home states** (`/`, `/experience`, `/projects`, `/projects/<project>`,
//!   `/fieldnotes`, `/fieldnotes/<slug>`, `/inspirations`, `/content`): sidebar
//!   plus the panel for one [`NavigationState`]
//! - **Writings** (`/writings/<slug>`): a standalone article
//! - **Files** (`/files`): upload controls and a file browser, served pages
//!   only since it drives the upload API
//! - **Not found**: anything else, with status 404
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                  # About
//! ├── experience/index.html
//! ├── projects/index.html
//! ├── projects/tensorforest/index.html
//! ├── fieldnotes/<slug>/index.html
//! ├── writings/<slug>/index.html
//! ├── 404.html
//! └── ...                         # public/ copied as-is
//! ```
//!
//! ## CSS and JavaScript
//!
//! Embedded at compile time:
//! - `static/style.css`: layout, with theme colors prepended from config
//! - `static/theme.js`: theme toggle, persisted in the `theme` cookie
//! - `static/palette.js`: command palette, served pages only (it talks to the
//!   palette API)
//! - `static/files.js`: upload controls and file browser on `/files`

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::commands::Palette;
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{ContentItem, ContentSource, ContentType, FsSource, Library};
use crate::navigation::{NavigationState, ProjectDetail, Section};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot copy public files: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const THEME_JS: &str = include_str!("../static/theme.js");
const PALETTE_JS: &str = include_str!("../static/palette.js");
const FILES_JS: &str = include_str!("../static/files.js");

/// Site path of the upload and file browser page.
pub const FILES_PATH: &str = "/files";

/// How many fieldnotes the sidebar lists under an active fieldnotes section.
pub const SIDEBAR_FIELDNOTES: usize = 3;

/// Everything a page render needs from the content root, loaded once per page.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    pub about: Option<ContentItem>,
    pub experience: Option<ContentItem>,
    pub philosophy: Option<ContentItem>,
    pub content_worth_consuming: Option<ContentItem>,
    pub fieldnotes: Vec<ContentItem>,
    pub writings: Vec<ContentItem>,
    pub projects: Vec<(ProjectDetail, Option<ContentItem>)>,
}

impl SiteData {
    pub fn load<S: ContentSource>(library: &Library<S>) -> Self {
        Self {
            about: library.about(),
            experience: library.experience(),
            philosophy: library.philosophy(),
            content_worth_consuming: library.content_worth_consuming(),
            fieldnotes: library.list_items(ContentType::Fieldnotes),
            writings: library.list_items(ContentType::Writings),
            projects: ProjectDetail::ALL
                .into_iter()
                .map(|p| (p, library.resolve(ContentType::Projects, p.slug())))
                .collect(),
        }
    }

    fn project(&self, detail: ProjectDetail) -> Option<&ContentItem> {
        self.projects
            .iter()
            .find(|(p, _)| *p == detail)
            .and_then(|(_, item)| item.as_ref())
    }
}

/// Per-request rendering choices.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Theme name, already checked against the configured order.
    pub theme: &'a str,
    /// Include the command palette (needs the live server's API).
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: u16,
    pub html: String,
}

/// Render the page at a site path, or the not-found page.
pub fn render_path<S: ContentSource>(
    config: &SiteConfig,
    library: &Library<S>,
    path: &str,
    opts: RenderOptions<'_>,
) -> RenderedPage {
    let data = SiteData::load(library);
    let trimmed = path.trim_matches('/');

    if opts.interactive && trimmed == FILES_PATH.trim_matches('/') {
        return ok(render_files(config, &data, opts));
    }

    if let Some(slug) = trimmed.strip_prefix("writings/") {
        return match library.resolve(ContentType::Writings, slug) {
            Some(item) => ok(render_writing(config, &data, &item, opts)),
            None => not_found(config, &data, opts),
        };
    }

    let Some(state) = NavigationState::from_path(path) else {
        return not_found(config, &data, opts);
    };
    let fieldnote = match state.fieldnote_slug() {
        Some(slug) => match data
            .fieldnotes
            .iter()
            .find(|n| n.slug == slug)
            .cloned()
            .or_else(|| library.resolve(ContentType::Fieldnotes, slug))
        {
            Some(item) => Some(item),
            None => return not_found(config, &data, opts),
        },
        None => None,
    };
    ok(render_home(config, &data, &state, fieldnote.as_ref(), opts))
}

fn ok(markup: Markup) -> RenderedPage {
    RenderedPage {
        status: 200,
        html: markup.into_string(),
    }
}

fn not_found(config: &SiteConfig, data: &SiteData, opts: RenderOptions<'_>) -> RenderedPage {
    RenderedPage {
        status: 404,
        html: render_not_found(config, data, opts).into_string(),
    }
}

/// Summary of a static build.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    /// Site paths written, in write order.
    pub pages: Vec<String>,
    /// Files copied from `public/`.
    pub assets: usize,
}

/// Every site path that renders successfully for the loaded content.
pub fn site_paths(data: &SiteData) -> Vec<String> {
    let mut paths: Vec<String> = Section::ALL
        .into_iter()
        .map(|section| NavigationState::for_section(section).to_path())
        .collect();
    for detail in ProjectDetail::ALL {
        let mut state = NavigationState::new();
        state.select_project_detail(detail);
        paths.push(state.to_path());
    }
    for note in &data.fieldnotes {
        let mut state = NavigationState::new();
        state.select_fieldnote(note.slug.as_str());
        paths.push(state.to_path());
    }
    for writing in &data.writings {
        paths.push(format!("/writings/{}", writing.slug));
    }
    paths
}

/// Load config and content from a content root, then [`build`] the site.
pub fn build_site(
    root: &Path,
    public_dir: &Path,
    output_dir: &Path,
) -> Result<BuildSummary, GenerateError> {
    let config = config::load_config(root)?;
    let library = Library::new(FsSource::new(root));
    build(&config, &library, public_dir, output_dir)
}

/// Write every page to `output_dir` and copy `public_dir` next to them.
pub fn build<S: ContentSource>(
    config: &SiteConfig,
    library: &Library<S>,
    public_dir: &Path,
    output_dir: &Path,
) -> Result<BuildSummary, GenerateError> {
    let data = SiteData::load(library);
    let opts = RenderOptions {
        theme: config.themes.default_theme(),
        interactive: false,
    };
    fs::create_dir_all(output_dir)?;

    let mut summary = BuildSummary {
        output_dir: output_dir.to_path_buf(),
        ..Default::default()
    };

    for path in site_paths(&data) {
        let page = render_path(config, library, &path, opts);
        if page.status != 200 {
            tracing::warn!("skipping {}: renders as {}", path, page.status);
            continue;
        }
        let file = output_dir.join(path.trim_matches('/')).join("index.html");
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, page.html)?;
        summary.pages.push(path);
    }
    fs::write(
        output_dir.join("404.html"),
        render_not_found(config, &data, opts).into_string(),
    )?;

    if public_dir.is_dir() {
        for entry in WalkDir::new(public_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(public_dir)
                .unwrap_or(entry.path());
            let dest = output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            summary.assets += 1;
        }
    }

    tracing::info!(
        pages = summary.pages.len(),
        assets = summary.assets,
        "site written to {}",
        output_dir.display()
    );
    Ok(summary)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Convert markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

fn page_title(config: &SiteConfig, title: &str) -> String {
    format!("{} - {}", title, config.site.owner)
}

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, title: &str, opts: RenderOptions<'_>, content: Markup) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_theme_css(&config.themes),
        CSS_STATIC
    );
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(opts.theme) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                button id="theme-toggle" type="button" data-themes=(config.themes.order.join(" ")) {
                    span.sr-only { "Toggle theme" }
                }
                (content)
                script { (PreEscaped(THEME_JS)) }
                @if opts.interactive {
                    script { (PreEscaped(PALETTE_JS)) }
                }
            }
        }
    }
}

fn footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p {
                "email me at "
                a.link-blue href={ "mailto:" (config.site.email) } { (config.site.email) }
            }
        }
    }
}

/// Sidebar: every section, plus sub-items under the active one.
fn sidebar(state: &NavigationState, data: &SiteData) -> Markup {
    html! {
        nav.sidebar {
            @for section in Section::ALL {
                div.sidebar-group {
                    a.sidebar-link.active[state.is_highlighted(section)]
                        href=(NavigationState::for_section(section).to_path()) { (section.label()) }

                    @if section == Section::Projects && state.active_section() == Section::Projects {
                        ul.sidebar-sub {
                            @for detail in ProjectDetail::ALL {
                                li {
                                    a.active[state.project_detail() == Some(detail)]
                                        href={ "/projects/" (detail.slug()) } { (detail.label()) }
                                }
                            }
                        }
                    }
                    @if section == Section::Fieldnotes
                        && state.active_section() == Section::Fieldnotes
                        && !data.fieldnotes.is_empty() {
                        ul.sidebar-sub {
                            @for note in data.fieldnotes.iter().take(SIDEBAR_FIELDNOTES) {
                                li {
                                    a.active[state.fieldnote_slug() == Some(note.slug.as_str())]
                                        href={ "/fieldnotes/" (note.slug) } { (note.title) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn article(item: &ContentItem) -> Markup {
    html! {
        article.content-item {
            @if let Some(banner) = &item.banner {
                img.banner src=(banner) alt=(item.title);
            }
            h1 { (item.title) }
            p.meta {
                time datetime=(item.date) { (item.date) }
                @for tag in &item.tags {
                    span.tag { (tag) }
                }
            }
            div.prose {
                (PreEscaped(markdown_to_html(&item.content)))
            }
        }
    }
}

fn about_header(config: &SiteConfig) -> Markup {
    html! {
        header.about-header {
            p.owner { (config.site.owner) }
            @if !config.site.tagline.trim().is_empty() {
                p.tagline.muted { (config.site.tagline) }
            }
        }
    }
}

fn missing(title: &str, message: &str) -> Markup {
    html! {
        div.missing {
            h2 { (title) }
            p.muted { (message) }
        }
    }
}

fn item_list(items: &[ContentItem], base: &str) -> Markup {
    html! {
        ul.item-list {
            @for item in items {
                li {
                    a href={ (base) "/" (item.slug) } { (item.title) }
                    " "
                    time.muted datetime=(item.date) { (item.date) }
                    @if !item.summary.is_empty() {
                        p.muted { (item.summary) }
                    }
                }
            }
        }
    }
}

/// A `- [title](url) – *kind*` line from the content-worth-consuming page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub url: String,
    pub kind: String,
    pub class: &'static str,
}

/// Link color class for a recommendation kind.
pub fn recommendation_class(kind: &str) -> &'static str {
    let kind = kind.to_lowercase();
    if kind.contains("show") {
        "link-purple"
    } else if kind.contains("book") {
        "link-green"
    } else if kind.contains("video") || kind.contains("youtube") {
        "link-orange"
    } else if kind.contains("movie") || kind.contains("film") {
        "link-pink"
    } else if kind.contains("blog") {
        "link-teal"
    } else {
        "link-blue"
    }
}

/// Parse every recommendation line; other lines are skipped.
pub fn parse_recommendations(markdown: &str) -> Vec<Recommendation> {
    markdown.lines().filter_map(parse_recommendation).collect()
}

fn parse_recommendation(line: &str) -> Option<Recommendation> {
    let rest = line.trim_start().strip_prefix('-')?.trim_start();
    let rest = rest.strip_prefix('[')?;
    let (title, rest) = rest.split_once("](")?;
    let (url, rest) = rest.split_once(')')?;
    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix('–')
        .or_else(|| rest.strip_prefix('-'))?
        .trim_start();
    let (kind, _) = rest.strip_prefix('*')?.split_once('*')?;
    Some(Recommendation {
        title: title.to_string(),
        url: url.to_string(),
        kind: kind.trim().to_string(),
        class: recommendation_class(kind),
    })
}

fn recommendations(item: &ContentItem) -> Markup {
    let list = parse_recommendations(&item.content);
    if list.is_empty() {
        return article(item);
    }
    html! {
        h2 { "content worth consuming imo:" }
        ul.recommendations {
            @for rec in &list {
                li {
                    a class=(rec.class) href=(rec.url) target="_blank" rel="noopener noreferrer" {
                        (rec.title)
                    }
                    " – "
                    em { (rec.kind) }
                }
            }
        }
    }
}

fn projects_overview(config: &SiteConfig, data: &SiteData) -> Markup {
    html! {
        h2 { "projects" }
        ul.project-list {
            @for (detail, item) in &data.projects {
                li {
                    a href={ "/projects/" (detail.slug()) } {
                        (item.as_ref().map(|i| i.title.as_str()).unwrap_or(detail.title()))
                    }
                    @if let Some(item) = item.as_ref().filter(|i| !i.summary.is_empty()) {
                        p.muted { (item.summary) }
                    }
                }
            }
            @for project in &config.external_projects {
                li {
                    a href=(project.url) target="_blank" rel="noopener noreferrer" { (project.title) }
                    " ↗"
                }
            }
        }
    }
}

/// The main panel for a navigation state.
fn panel(
    config: &SiteConfig,
    data: &SiteData,
    state: &NavigationState,
    fieldnote: Option<&ContentItem>,
) -> Markup {
    match state {
        NavigationState::About => html! {
            (about_header(config))
            @match &data.about {
                Some(item) => { (article(item)) }
                None => { (missing("About", "About content not found. Create an about.md file in the content directory.")) }
            }
        },
        NavigationState::Experience => match &data.experience {
            Some(item) => article(item),
            None => missing(
                "Experience",
                "Experience content not found. Create an experience.md file in the content directory.",
            ),
        },
        NavigationState::Projects(None) => projects_overview(config, data),
        NavigationState::Projects(Some(detail)) => html! {
            a.back href="/projects" { "← back to projects" }
            @match data.project(*detail) {
                Some(item) => { (article(item)) }
                None => { (missing(detail.title(), "Project details coming soon.")) }
            }
        },
        NavigationState::Fieldnotes(None) => html! {
            h2 { "fieldnotes" }
            @if data.fieldnotes.is_empty() {
                p.muted { "No fieldnotes yet." }
            } @else {
                (item_list(&data.fieldnotes, "/fieldnotes"))
            }
            @if !data.writings.is_empty() {
                h2 { "writings" }
                (item_list(&data.writings, "/writings"))
            }
        },
        NavigationState::Fieldnotes(Some(_)) => html! {
            a.back href="/fieldnotes" { "← back to fieldnotes" }
            @if let Some(item) = fieldnote {
                (article(item))
            }
        },
        NavigationState::Inspirations => match &data.philosophy {
            Some(item) => article(item),
            None => missing(
                "My Philosophy",
                "Philosophy content not found. Create a philosophy.md file in the content directory.",
            ),
        },
        NavigationState::Content => match &data.content_worth_consuming {
            Some(item) => recommendations(item),
            None => missing(
                "Content Worth Consuming",
                "Content not found. Create a content-worth-consuming.md file in the content directory.",
            ),
        },
    }
}

/// Command palette overlay, hidden until toggled.
fn palette_overlay(config: &SiteConfig, data: &SiteData) -> Markup {
    let palette = Palette::new(config, &data.fieldnotes);
    let mut groups: Vec<(&str, Vec<&crate::commands::PaletteItem>)> = Vec::new();
    for item in palette.items() {
        match groups.last_mut() {
            Some((title, items)) if *title == item.group.title() => items.push(item),
            _ => groups.push((item.group.title(), vec![item])),
        }
    }
    html! {
        div.palette id="palette" hidden role="dialog" aria-label="Command palette" {
            input id="palette-input" type="text" placeholder="Type a command or search..." autocomplete="off";
            div id="palette-results" {
                @for (title, items) in &groups {
                    section.palette-group {
                        h3 { (title) }
                        ul {
                            @for item in items {
                                li.palette-item data-id=(item.id) tabindex="-1" {
                                    span.label { (item.label) }
                                    @if let Some(hint) = &item.hint {
                                        span.hint { (hint) }
                                    }
                                    @if let Some(key) = item.shortcut {
                                        kbd { (key.to_ascii_uppercase()) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            p.muted id="palette-empty" hidden { "No results found." }
        }
        p.keyboard-hint.muted { "press " kbd { "⌘K" } " for commands" }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page for one navigation state.
pub fn render_home(
    config: &SiteConfig,
    data: &SiteData,
    state: &NavigationState,
    fieldnote: Option<&ContentItem>,
    opts: RenderOptions<'_>,
) -> Markup {
    let title = match (state.project_detail(), fieldnote) {
        (Some(detail), _) => data
            .project(detail)
            .map(|i| i.title.clone())
            .unwrap_or_else(|| detail.title().to_string()),
        (None, Some(item)) => item.title.clone(),
        (None, None) => state.active_section().title().to_string(),
    };
    let content = html! {
        div.layout {
            (sidebar(state, data))
            main.panel data-section=(state.active_section().slug()) {
                (panel(config, data, state, fieldnote))
                (footer(config))
            }
        }
        @if opts.interactive {
            (palette_overlay(config, data))
        }
    };
    base_document(config, &page_title(config, &title), opts, content)
}

/// Renders a standalone writing.
pub fn render_writing(
    config: &SiteConfig,
    data: &SiteData,
    item: &ContentItem,
    opts: RenderOptions<'_>,
) -> Markup {
    let content = html! {
        div.layout {
            (sidebar(&NavigationState::Fieldnotes(None), data))
            main.panel {
                a.back href="/fieldnotes" { "← back to fieldnotes" }
                (article(item))
                (footer(config))
            }
        }
        @if opts.interactive {
            (palette_overlay(config, data))
        }
    };
    base_document(config, &page_title(config, &item.title), opts, content)
}

/// Upload controls and a file browser, driven by the upload API.
///
/// Each control holds at most one upload in flight and reports its own
/// pending, uploaded or failed state.
pub fn render_files(config: &SiteConfig, data: &SiteData, opts: RenderOptions<'_>) -> Markup {
    let limits = &config.uploads;
    let content = html! {
        main.panel.files-page {
            a.back href="/" { "← back to home" }
            h1 { "Files" }

            section.upload-control data-kind="image" {
                h2 { "Image upload" }
                p.muted { "Images up to " (format_mb(limits.max_server_upload_bytes)) ", stored through this server." }
                input type="file" accept="image/*";
                p.upload-status.muted role="status" {}
            }

            section.upload-control data-kind="file" {
                h2 { "Large files" }
                p.muted {
                    "Up to " (format_mb(limits.max_client_upload_bytes)) ": "
                    (limits.allowed_content_types.join(", "))
                }
                input type="file" accept=(limits.allowed_content_types.join(","));
                p.upload-status.muted role="status" {}
            }

            section.file-browser id="file-browser" {
                h2 { "Stored files" }
                button.refresh type="button" { "refresh" }
                p.file-browser-status.muted role="status" {}
                ul.file-list {}
            }
            (footer(config))
        }
        @if opts.interactive {
            (palette_overlay(config, data))
            script { (PreEscaped(FILES_JS)) }
        }
    };
    base_document(config, &page_title(config, "Files"), opts, content)
}

fn format_mb(bytes: u64) -> String {
    format!("{}MB", bytes / (1024 * 1024))
}

pub fn render_not_found(config: &SiteConfig, data: &SiteData, opts: RenderOptions<'_>) -> Markup {
    let content = html! {
        div.layout {
            (sidebar(&NavigationState::new(), data))
            main.panel.not-found {
                h1 { "Not Found" }
                p.muted { "Nothing lives at this address." }
                a href="/" { "← home" }
                (footer(config))
            }
        }
    };
    base_document(config, &page_title(config, "Not Found"), opts, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemorySource;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn opts() -> RenderOptions<'static> {
        RenderOptions {
            theme: "light",
            interactive: false,
        }
    }

    fn library() -> Library<MemorySource> {
        Library::new(sample_source())
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype_and_theme() {
        let config = SiteConfig::default();
        let doc = base_document(&config, "Test", RenderOptions { theme: "dark", interactive: false }, html! { p { "x" } })
            .into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"data-theme="dark""#));
        assert!(doc.contains(r#"data-themes="light dark matcha""#));
        assert!(!doc.contains(r#"id="palette-input""#));
        assert!(!doc.contains("/api/palette/key"));
    }

    #[test]
    fn about_header_shows_tagline_when_set() {
        let mut config = SiteConfig::default();
        let html = about_header(&config).into_string();
        assert!(html.contains("shayaan azeem"));
        assert!(!html.contains("tagline"));

        config.site.tagline = "building things".to_string();
        let page = render_path(&config, &library(), "/", opts());
        assert!(page.html.contains(r#"<p class="tagline muted">building things</p>"#));
    }

    #[test]
    fn markdown_renders() {
        let html = markdown_to_html("# Hi\n\n*there*");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<em>there</em>"));
    }

    #[test]
    fn footer_has_mailto() {
        let html = footer(&SiteConfig::default()).into_string();
        assert!(html.contains("mailto:shayaan.azeem@uwaterloo.ca"));
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    #[test]
    fn parse_recommendation_line() {
        let recs = parse_recommendations(
            "# Title\n- [the bear](https://example.com/bear) – *tv show*\nsome prose\n",
        );
        assert_eq!(
            recs,
            vec![Recommendation {
                title: "the bear".to_string(),
                url: "https://example.com/bear".to_string(),
                kind: "tv show".to_string(),
                class: "link-purple",
            }]
        );
    }

    #[test]
    fn parse_recommendation_accepts_hyphen() {
        let recs = parse_recommendations("- [x](https://x.dev) - *blog*");
        assert_eq!(recs[0].class, "link-teal");
    }

    #[test]
    fn recommendation_classes() {
        assert_eq!(recommendation_class("Book"), "link-green");
        assert_eq!(recommendation_class("youtube"), "link-orange");
        assert_eq!(recommendation_class("film"), "link-pink");
        assert_eq!(recommendation_class("short essay"), "link-blue");
        assert_eq!(recommendation_class("podcast"), "link-blue");
    }

    // =========================================================================
    // Sidebar
    // =========================================================================

    #[test]
    fn sidebar_lists_three_recent_fieldnotes_when_active() {
        let data = SiteData {
            fieldnotes: fieldnotes(5),
            ..Default::default()
        };
        let html = sidebar(&NavigationState::Fieldnotes(None), &data).into_string();
        assert!(html.contains("/fieldnotes/note-2"));
        assert!(!html.contains("/fieldnotes/note-3"));

        let html = sidebar(&NavigationState::About, &data).into_string();
        assert!(!html.contains("/fieldnotes/note-0"));
    }

    #[test]
    fn sidebar_shows_project_sub_items_only_under_projects() {
        let data = SiteData::default();
        let html = sidebar(&NavigationState::Projects(None), &data).into_string();
        assert!(html.contains("/projects/tensorforest"));
        let html = sidebar(&NavigationState::Experience, &data).into_string();
        assert!(!html.contains("/projects/tensorforest"));
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn render_path_home_states() {
        let config = SiteConfig::default();
        let lib = library();
        let page = render_path(&config, &lib, "/", opts());
        assert_eq!(page.status, 200);
        assert!(page.html.contains("<title>About - shayaan azeem</title>"));

        let page = render_path(&config, &lib, "/content", opts());
        assert!(page.html.contains(r#"class="link-green""#));
    }

    #[test]
    fn render_path_fieldnote_detail() {
        let config = SiteConfig::default();
        let page = render_path(&config, &library(), "/fieldnotes/first-light", opts());
        assert_eq!(page.status, 200);
        assert!(page.html.contains("<title>First Light - shayaan azeem</title>"));
        assert!(page.html.contains("back to fieldnotes"));
    }

    #[test]
    fn render_path_draft_fieldnote_resolves_directly() {
        let config = SiteConfig::default();
        let page = render_path(&config, &library(), "/fieldnotes/work-in-progress", opts());
        assert_eq!(page.status, 200);
    }

    #[test]
    fn render_path_unknown_is_404() {
        let config = SiteConfig::default();
        let lib = library();
        assert_eq!(render_path(&config, &lib, "/fieldnotes/missing", opts()).status, 404);
        assert_eq!(render_path(&config, &lib, "/writings/missing", opts()).status, 404);
        assert_eq!(render_path(&config, &lib, "/nowhere", opts()).status, 404);
    }

    #[test]
    fn render_path_writing() {
        let config = SiteConfig::default();
        let page = render_path(&config, &library(), "/writings/on-tools", opts());
        assert_eq!(page.status, 200);
        assert!(page.html.contains("On Tools"));
    }

    #[test]
    fn project_detail_falls_back_without_file() {
        let config = SiteConfig::default();
        let lib = Library::new(MemorySource::new());
        let page = render_path(&config, &lib, "/projects/apocalypse-hacks", opts());
        assert_eq!(page.status, 200);
        assert!(page.html.contains("Project details coming soon."));
    }

    #[test]
    fn missing_single_pages_degrade() {
        let config = SiteConfig::default();
        let lib = Library::new(MemorySource::new());
        let page = render_path(&config, &lib, "/inspirations", opts());
        assert_eq!(page.status, 200);
        assert!(page.html.contains("Philosophy content not found."));
    }

    #[test]
    fn interactive_pages_carry_palette() {
        let config = SiteConfig::default();
        let page = render_path(
            &config,
            &library(),
            "/",
            RenderOptions {
                theme: "light",
                interactive: true,
            },
        );
        assert!(page.html.contains(r#"id="palette""#));
        assert!(page.html.contains(r#"data-id="section:projects""#));
        assert!(page.html.contains(r#"tabindex="-1""#));
        assert!(page.html.contains("ArrowDown"));
        assert!(page.html.contains("Recent Fieldnotes"));
    }

    #[test]
    fn files_page_only_when_interactive() {
        let config = SiteConfig::default();
        let live = render_path(&config, &library(), "/files", RenderOptions { theme: "light", interactive: true });
        assert_eq!(live.status, 200);
        assert!(live.html.contains(r#"data-kind="image""#));
        assert!(live.html.contains(r#"data-kind="file""#));
        assert!(live.html.contains(r#"id="file-browser""#));
        assert!(live.html.contains("Images up to 10MB"));
        assert!(live.html.contains("/api/upload/blob"));

        let built = render_path(&config, &library(), "/files", opts());
        assert_eq!(built.status, 404);
    }

    #[test]
    fn site_paths_cover_every_state() {
        let data = SiteData::load(&library());
        let paths = site_paths(&data);
        assert!(paths.contains(&"/".to_string()));
        assert!(paths.contains(&"/projects/tensorforest".to_string()));
        assert!(paths.contains(&"/fieldnotes/first-light".to_string()));
        assert!(paths.contains(&"/writings/on-tools".to_string()));
        assert!(!paths.contains(&"/fieldnotes/work-in-progress".to_string()));
    }

    // =========================================================================
    // build
    // =========================================================================

    #[test]
    fn build_writes_pages_and_assets() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let public = tmp.path().join("public");
        fs::create_dir_all(public.join("fieldnotes")).unwrap();
        fs::write(public.join("fieldnotes/cover.png"), b"png").unwrap();

        let config = SiteConfig::default();
        let lib = Library::new(FsSource::new(tmp.path()));
        let summary = build(&config, &lib, &public, out.path()).unwrap();

        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("projects/tensorforest/index.html").exists());
        assert!(out.path().join("404.html").exists());
        assert!(out.path().join("fieldnotes/cover.png").exists());
        assert_eq!(summary.assets, 1);
        assert_eq!(summary.pages.len(), site_paths(&SiteData::load(&lib)).len());

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(!index.contains(r#"id="palette-input""#));
    }

    #[test]
    fn build_stays_inside_output_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("site/dist");
        let lib = Library::new(MemorySource::new().with(
            "fieldnotes/evil.md",
            "---\ntitle: Evil\nslug: ../../escaped\ndate: 2024-01-01\n---\nx\n",
        ));
        let summary = build(&SiteConfig::default(), &lib, Path::new("/nonexistent/public"), &out).unwrap();

        assert!(summary.pages.contains(&"/fieldnotes/evil".to_string()));
        assert!(summary.pages.iter().all(|p| !p.contains("..")));
        assert!(out.join("fieldnotes/evil/index.html").exists());
        assert!(!tmp.path().join("site/escaped").exists());
        assert!(!tmp.path().join("escaped").exists());
    }

    #[test]
    fn build_site_rejects_invalid_config() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("config.toml"), "[themes]\norder = []\n").unwrap();
        let out = TempDir::new().unwrap();
        let result = build_site(tmp.path(), &tmp.path().join("public"), out.path());
        assert!(matches!(result, Err(GenerateError::Config(_))));
    }

    #[test]
    fn build_without_public_dir() {
        let out = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let summary = build(&config, &library(), Path::new("/nonexistent/public"), out.path()).unwrap();
        assert_eq!(summary.assets, 0);
        assert!(out.path().join("index.html").exists());
    }
}
