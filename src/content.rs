//! Content repository reader and resolver.
//!
//! Reads markdown/MDX documents from a content root, splits their YAML front
//! matter from the body, and produces [`ContentItem`]s.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                          # Content root
//! ├── about.md                      # Single-file pages (.md tried before .mdx)
//! ├── experience.md
//! ├── philosophy.mdx
//! ├── content-worth-consuming.md
//! ├── fieldnotes/                   # One directory per content type
//! │   ├── first-light.md
//! │   └── other.mdx                 # front matter `slug: custom` → /fieldnotes/custom
//! ├── writings/
//! └── projects/
//!     ├── tensorforest.md
//!     └── apocalypse-hacks.md
//! ```
//!
//! ## Front Matter
//!
//! Every field is optional:
//!
//! ```yaml
//! ---
//! title: First Light
//! date: 2024-03-02
//! summary: Notes from the first week.
//! banner: cover.png        # bare filename → /fieldnotes/cover.png
//! tags: [notes, hardware]
//! draft: false
//! slug: first-light
//! ---
//! ```
//!
//! Missing fields take defaults: title falls back to the slug, date to today,
//! tags to an empty list, draft to false. Front matter that does not parse is
//! treated as absent.
//!
//! ## Failure Model
//!
//! Nothing here returns an error to the caller. A missing directory lists as
//! empty, an unreadable file is skipped with a warning, and a failed lookup is
//! `None`. Rendering always completes, at worst with a section missing.
//!
//! ## Storage Seam
//!
//! All reads go through [`ContentSource`]. [`FsSource`] reads a directory on
//! disk; [`MemorySource`] holds files in a map so navigation and palette logic
//! can be exercised without touching the filesystem.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::naming::{CONTENT_EXTENSIONS, content_stem, is_safe_slug, normalize_banner};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// A directory of content documents with per-item detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Fieldnotes,
    Writings,
    Projects,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [
        ContentType::Fieldnotes,
        ContentType::Writings,
        ContentType::Projects,
    ];

    /// Directory under the content root.
    pub fn dir(self) -> &'static str {
        match self {
            ContentType::Fieldnotes => "fieldnotes",
            ContentType::Writings => "writings",
            ContentType::Projects => "projects",
        }
    }

    /// Site path bare banner filenames are served from.
    pub fn public_dir(self) -> &'static str {
        self.dir()
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentType::Fieldnotes => "Fieldnotes",
            ContentType::Writings => "Writings",
            ContentType::Projects => "Projects",
        }
    }
}

/// A page backed by one fixed file in the content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinglePage {
    About,
    Experience,
    Philosophy,
    ContentWorthConsuming,
}

impl SinglePage {
    pub const ALL: [SinglePage; 4] = [
        SinglePage::About,
        SinglePage::Experience,
        SinglePage::Philosophy,
        SinglePage::ContentWorthConsuming,
    ];

    /// Filename stem, also used as the item's slug.
    pub fn stem(self) -> &'static str {
        match self {
            SinglePage::About => "about",
            SinglePage::Experience => "experience",
            SinglePage::Philosophy => "philosophy",
            SinglePage::ContentWorthConsuming => "content-worth-consuming",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            SinglePage::About => "About",
            SinglePage::Experience => "Experience",
            SinglePage::Philosophy => "My Philosophy",
            SinglePage::ContentWorthConsuming => "Content Worth Consuming",
        }
    }
}

/// A parsed content document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub slug: String,
    pub title: String,
    /// ISO date (`YYYY-MM-DD`), or whatever the front matter said.
    pub date: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub tags: Vec<String>,
    pub draft: bool,
    /// Raw markdown body, front matter removed.
    pub content: String,
}

impl ContentItem {
    /// The item's date as a calendar date, when it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    summary: Option<String>,
    banner: Option<String>,
    tags: Option<Vec<String>>,
    draft: Option<bool>,
    slug: Option<String>,
}

// ============================================================================
// Content sources
// ============================================================================

/// Read-only access to the files under a content root.
///
/// Paths are `/`-separated and relative to the root.
pub trait ContentSource: Send + Sync {
    /// File names directly inside `dir`. A missing directory is `ErrorKind::NotFound`.
    fn list(&self, dir: &str) -> io::Result<Vec<String>>;

    /// Contents of the file at `path`.
    fn read(&self, path: &str) -> io::Result<String>;
}

/// Content read from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl ContentSource for FsSource {
    fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(self.root.join(dir))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(path))
    }
}

/// Content held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl ContentSource for MemorySource {
    fn list(&self, dir: &str) -> io::Result<Vec<String>> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let names: Vec<String> = self
            .files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, dir.to_string()));
        }
        Ok(names)
    }

    fn read(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

// ============================================================================
// Reader and resolver
// ============================================================================

/// Reader and resolver over a [`ContentSource`].
///
/// Items are rebuilt from the source on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct Library<S> {
    source: S,
}

impl<S: ContentSource> Library<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All published items of a type, newest first.
    ///
    /// Drafts are excluded. Items whose dates do not parse sort after every
    /// dated item; ties keep filename order.
    pub fn list_items(&self, kind: ContentType) -> Vec<ContentItem> {
        let files = self.content_files(kind);

        let mut items: Vec<ContentItem> = Vec::with_capacity(files.len());
        let mut by_slug: HashMap<String, usize> = HashMap::new();
        for (file_name, stem) in &files {
            let item = match self.read_item(kind, file_name, stem) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", file_name, e);
                    continue;
                }
            };
            match by_slug.get(&item.slug) {
                // Same precedence as `resolve`: a filename match beats a
                // front-matter slug declared elsewhere.
                Some(&idx) if stem == &item.slug => {
                    tracing::warn!(
                        "{}/{} shadows an earlier item with slug '{}'",
                        kind.dir(),
                        file_name,
                        item.slug
                    );
                    items[idx] = item;
                }
                Some(_) => {
                    tracing::warn!(
                        "{}/{} duplicates slug '{}', ignored",
                        kind.dir(),
                        file_name,
                        item.slug
                    );
                }
                None => {
                    by_slug.insert(item.slug.clone(), items.len());
                    items.push(item);
                }
            }
        }

        items.retain(|item| !item.draft);
        items.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        items
    }

    /// The first `limit` items of [`Library::list_items`].
    pub fn recent(&self, kind: ContentType, limit: usize) -> Vec<ContentItem> {
        let mut items = self.list_items(kind);
        items.truncate(limit);
        items
    }

    /// Find one item by slug.
    ///
    /// Filenames are matched first, then front-matter `slug` fields. Drafts
    /// resolve; only listings hide them.
    pub fn resolve(&self, kind: ContentType, slug: &str) -> Option<ContentItem> {
        if !is_safe_slug(slug) {
            return None;
        }
        let files = self.content_files(kind);

        if let Some((file_name, stem)) = files.iter().find(|(_, stem)| stem == slug) {
            return match self.read_item(kind, file_name, stem) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("cannot resolve {}/{}: {}", kind.dir(), slug, e);
                    None
                }
            };
        }

        files
            .iter()
            .filter_map(|(file_name, stem)| self.read_item(kind, file_name, stem).ok())
            .find(|item| item.slug == slug)
    }

    /// Load a single-file page, trying `.md` before `.mdx`.
    pub fn page(&self, page: SinglePage) -> Option<ContentItem> {
        for ext in CONTENT_EXTENSIONS {
            let path = format!("{}.{}", page.stem(), ext);
            match self.source.read(&path) {
                Ok(text) => {
                    let (front, body) = parse_document(&path, &text);
                    return Some(ContentItem {
                        slug: page.stem().to_string(),
                        title: front
                            .title
                            .unwrap_or_else(|| page.default_title().to_string()),
                        date: front.date.unwrap_or_else(today),
                        summary: front.summary.unwrap_or_default(),
                        banner: front.banner,
                        tags: front.tags.unwrap_or_default(),
                        draft: front.draft.unwrap_or(false),
                        content: body.to_string(),
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("cannot read {}: {}", path, e);
                    return None;
                }
            }
        }
        None
    }

    pub fn about(&self) -> Option<ContentItem> {
        self.page(SinglePage::About)
    }

    pub fn experience(&self) -> Option<ContentItem> {
        self.page(SinglePage::Experience)
    }

    pub fn philosophy(&self) -> Option<ContentItem> {
        self.page(SinglePage::Philosophy)
    }

    pub fn content_worth_consuming(&self) -> Option<ContentItem> {
        self.page(SinglePage::ContentWorthConsuming)
    }

    /// Content files of a type as `(file name, stem)`, in filename order.
    fn content_files(&self, kind: ContentType) -> Vec<(String, String)> {
        let names = match self.source.list(kind.dir()) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("cannot list {}: {}", kind.dir(), e);
                return Vec::new();
            }
        };
        let mut files: Vec<(String, String)> = names
            .into_iter()
            .filter_map(|name| {
                let stem = content_stem(&name)?.to_string();
                Some((name, stem))
            })
            .collect();
        files.sort();
        files
    }

    fn read_item(
        &self,
        kind: ContentType,
        file_name: &str,
        stem: &str,
    ) -> Result<ContentItem, ContentError> {
        let path = format!("{}/{}", kind.dir(), file_name);
        let text = self
            .source
            .read(&path)
            .map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
        let (front, body) = parse_document(&path, &text);

        let slug = match front.slug.filter(|s| !s.trim().is_empty()) {
            Some(declared) if is_safe_slug(&declared) => declared,
            Some(declared) => {
                tracing::warn!("ignoring unsafe slug {:?} in {}", declared, path);
                stem.to_string()
            }
            None => stem.to_string(),
        };
        Ok(ContentItem {
            title: front.title.unwrap_or_else(|| slug.clone()),
            date: front.date.unwrap_or_else(today),
            summary: front.summary.unwrap_or_default(),
            banner: front
                .banner
                .filter(|b| !b.is_empty())
                .map(|b| normalize_banner(&b, kind.public_dir())),
            tags: front.tags.unwrap_or_default(),
            draft: front.draft.unwrap_or(false),
            content: body.to_string(),
            slug,
        })
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================

/// Split a document into its front matter block and body.
///
/// Front matter is a leading `---` line, YAML, and a closing `---` (or `...`)
/// line. Without a closing delimiter the whole text is body.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parse front matter leniently: anything malformed yields defaults.
fn parse_document<'a>(path: &str, text: &'a str) -> (FrontMatter, &'a str) {
    let (yaml, body) = split_front_matter(text);
    let front = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => {
            serde_yaml::from_str::<FrontMatter>(yaml).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed front matter in {}: {}", path, e);
                FrontMatter::default()
            })
        }
        _ => FrontMatter::default(),
    };
    (front, body)
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a date-prefixed string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
