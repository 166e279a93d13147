//! # Folio
//!
//! A markdown-driven personal site. The content directory is the data source:
//! single pages, fieldnotes, writings and project details are markdown or MDX
//! files with YAML front matter, and the site renders one page per navigation
//! state.
//!
//! # Architecture
//!
//! ```text
//! content/  →  Library (reader + resolver)  →  SiteData
//!                                                 │
//!              NavigationState  ──────────────→  generate  →  HTML
//!                    ▲                            │
//!              Palette (keys, search)             ├─ build: dist/
//!                                                 └─ server: live pages + JSON API
//!                                                          │
//!                                                   UploadGateway → blob provider
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Front matter parsing, listing and slug resolution behind a read-only [`content::ContentSource`] |
//! | [`navigation`] | Sections, project sub-views and the page's navigation state |
//! | [`commands`] | Command palette: key chords, fuzzy search, command effects |
//! | [`uploads`] | Upload validation, client tokens and the [`uploads::BlobStore`] seam |
//! | [`generate`] | Maud page renderers and the static build |
//! | [`server`] | Axum router serving pages, public files and the JSON API |
//! | [`config`] | `config.toml` loading, validation, merging and theme CSS |
//! | [`naming`] | Content file extensions, slug safety, banner paths |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## State in the URL
//!
//! Every [`navigation::NavigationState`] has exactly one path and every path
//! parses back into at most one state. A page load owns its state; there is no
//! process-wide singleton, and the static build and the live server render the
//! same pages.
//!
//! ## Enums Over Lookup Tables
//!
//! Sections, projects, palette groups and effects are enums with exhaustive
//! matches, so a new section cannot ship without a title, a description and a
//! shortcut.
//!
//! ## Degrade, Don't Fail
//!
//! Content problems never fail a page. A missing file is `None`, a missing
//! directory is an empty list, and a file with broken front matter falls back
//! to defaults with a warning. Storage failures are logged and answered with a
//! short message per request, or per file in a batch.
//!
//! ## Uploads Are Unauthenticated
//!
//! The upload, delete and list operations do not authenticate the caller.
//! Deploy the server behind something that does.

pub mod commands;
pub mod config;
pub mod content;
pub mod generate;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod server;
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_helpers;
