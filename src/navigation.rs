//! Home page navigation state.
//!
//! The home page shows one section at a time, optionally with a sub-view:
//!
//! ```text
//! About
//! Experience
//! Projects ── TensorForest | ApocalypseHacks
//! Fieldnotes ── <slug>
//! Inspirations
//! Content
//! ```
//!
//! [`NavigationState`] carries the sub-view inside its variant, so a project
//! detail and a fieldnote detail can never be active together. Each page
//! owns its own state value; nothing here is shared between visitors.
//!
//! Every state has a canonical path ([`NavigationState::to_path`]) so the
//! server and the static build can render each state as its own URL.

use serde::{Deserialize, Serialize};

use crate::naming::is_safe_slug;

/// A top-level home page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    About,
    Experience,
    Projects,
    Fieldnotes,
    Inspirations,
    Content,
}

impl Section {
    /// Sidebar order.
    pub const ALL: [Section; 6] = [
        Section::About,
        Section::Experience,
        Section::Projects,
        Section::Fieldnotes,
        Section::Inspirations,
        Section::Content,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Fieldnotes => "fieldnotes",
            Section::Inspirations => "inspirations",
            Section::Content => "content",
        }
    }

    /// Lowercase sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Fieldnotes => "fieldnotes",
            Section::Inspirations => "my philosophy",
            Section::Content => "content worth consuming",
        }
    }

    /// Title used in the palette and in page titles.
    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Fieldnotes => "Fieldnotes",
            Section::Inspirations => "My Philosophy",
            Section::Content => "Content Worth Consuming",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Section::About => "Who I am and what I'm working on",
            Section::Experience => "Roles, teams and things shipped",
            Section::Projects => "Things I've built",
            Section::Fieldnotes => "Notes from the field",
            Section::Inspirations => "How I think about work and life",
            Section::Content => "Books, shows and videos worth your time",
        }
    }

    /// Letter of the section's `Alt+<key>` chord.
    pub fn shortcut(self) -> char {
        match self {
            Section::About => 'a',
            Section::Experience => 'e',
            Section::Projects => 'p',
            Section::Fieldnotes => 'f',
            Section::Inspirations => 'm',
            Section::Content => 'c',
        }
    }

    pub fn from_slug(slug: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// A project with a built-in detail sub-view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectDetail {
    #[serde(rename = "tensorforest")]
    TensorForest,
    #[serde(rename = "apocalypse-hacks")]
    ApocalypseHacks,
}

impl ProjectDetail {
    pub const ALL: [ProjectDetail; 2] = [ProjectDetail::TensorForest, ProjectDetail::ApocalypseHacks];

    /// URL segment, also the stem of the project's file under `projects/`.
    pub fn slug(self) -> &'static str {
        match self {
            ProjectDetail::TensorForest => "tensorforest",
            ProjectDetail::ApocalypseHacks => "apocalypse-hacks",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProjectDetail::TensorForest => "TensorForest",
            ProjectDetail::ApocalypseHacks => "Apocalypse Hacks",
        }
    }

    /// Lowercase sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            ProjectDetail::TensorForest => "tensorforest",
            ProjectDetail::ApocalypseHacks => "apocalypse hacks",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            ProjectDetail::TensorForest => 't',
            ProjectDetail::ApocalypseHacks => 'h',
        }
    }

    pub fn from_slug(slug: &str) -> Option<ProjectDetail> {
        ProjectDetail::ALL.into_iter().find(|p| p.slug() == slug)
    }
}

/// The active section plus its optional sub-view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    About,
    Experience,
    Projects(Option<ProjectDetail>),
    Fieldnotes(Option<String>),
    Inspirations,
    Content,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state `select_section(section)` leads to from anywhere.
    pub fn for_section(section: Section) -> Self {
        let mut state = Self::new();
        state.select_section(section);
        state
    }

    pub fn active_section(&self) -> Section {
        match self {
            NavigationState::About => Section::About,
            NavigationState::Experience => Section::Experience,
            NavigationState::Projects(_) => Section::Projects,
            NavigationState::Fieldnotes(_) => Section::Fieldnotes,
            NavigationState::Inspirations => Section::Inspirations,
            NavigationState::Content => Section::Content,
        }
    }

    pub fn project_detail(&self) -> Option<ProjectDetail> {
        match self {
            NavigationState::Projects(detail) => *detail,
            _ => None,
        }
    }

    pub fn fieldnote_slug(&self) -> Option<&str> {
        match self {
            NavigationState::Fieldnotes(slug) => slug.as_deref(),
            _ => None,
        }
    }

    /// Whether `section`'s sidebar entry is emphasized: it is active and no
    /// sub-view of it is open.
    pub fn is_highlighted(&self, section: Section) -> bool {
        self.active_section() == section
            && self.project_detail().is_none()
            && self.fieldnote_slug().is_none()
    }

    /// Show a section with no sub-view open.
    pub fn select_section(&mut self, section: Section) {
        *self = match section {
            Section::About => NavigationState::About,
            Section::Experience => NavigationState::Experience,
            Section::Projects => NavigationState::Projects(None),
            Section::Fieldnotes => NavigationState::Fieldnotes(None),
            Section::Inspirations => NavigationState::Inspirations,
            Section::Content => NavigationState::Content,
        };
    }

    pub fn select_project_detail(&mut self, detail: ProjectDetail) {
        *self = NavigationState::Projects(Some(detail));
    }

    pub fn select_fieldnote(&mut self, slug: impl Into<String>) {
        *self = NavigationState::Fieldnotes(Some(slug.into()));
    }

    /// Canonical site path of this state.
    pub fn to_path(&self) -> String {
        match self {
            NavigationState::About => "/".to_string(),
            NavigationState::Projects(Some(detail)) => format!("/projects/{}", detail.slug()),
            NavigationState::Fieldnotes(Some(slug)) => format!("/fieldnotes/{slug}"),
            other => format!("/{}", other.active_section().slug()),
        }
    }

    /// Parse a site path back into a state. Unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<NavigationState> {
        let trimmed = path.trim_matches('/');
        let mut parts = trimmed.splitn(2, '/');
        let head = parts.next().unwrap_or("");
        let tail = parts.next();

        if head.is_empty() {
            return Some(NavigationState::About);
        }
        let section = Section::from_slug(head)?;
        let mut state = NavigationState::new();
        match (section, tail) {
            (section, None) => state.select_section(section),
            (Section::Projects, Some(slug)) => {
                state.select_project_detail(ProjectDetail::from_slug(slug)?)
            }
            (Section::Fieldnotes, Some(slug)) if is_safe_slug(slug) => {
                state.select_fieldnote(slug)
            }
            _ => return None,
        }
        Some(state)
    }
}
