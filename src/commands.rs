//! Command palette and keyboard shortcut dispatcher.
//!
//! Maps key events and free-text queries to [`Command`]s, and commands to the
//! [`Effect`] the browser should carry out.
//!
//! ## Key Surface
//!
//! | Keys | Where | Action |
//! |------|-------|--------|
//! | `Ctrl+K` / `Meta+K` | anywhere, text entry included | toggle the palette |
//! | `Alt+<letter>` | outside text entry | run the bound command |
//! | `<letter>` | palette open, outside text entry | same as `Alt+<letter>` |
//! | `1`–`3` | palette open, outside text entry | open the n-th recent fieldnote |
//! | `Escape` | palette open, text entry included | close the palette |
//!
//! The palette opens with focus in its search field, so bare letters and
//! digits apply once focus moves down into the result list. `Escape` is the
//! one key besides the toggle chord honored inside text entry: it only ever
//! closes the palette, never navigates.
//!
//! Built-in letters: sections `A E P F M C`, projects `T H`, theme `D`,
//! GitHub `G`, Twitter `X`, LinkedIn `L`, email `I`. External projects may
//! claim any other letter in `config.toml`.
//!
//! Anything unbound is [`KeyOutcome::Ignored`]. Running a command always
//! closes the palette.

use serde::{Deserialize, Serialize};

use crate::config::{SiteConfig, ThemesConfig};
use crate::content::ContentItem;
use crate::naming::is_safe_slug;
use crate::navigation::{NavigationState, ProjectDetail, Section};

/// Letter of the palette toggle chord.
pub const TOGGLE_KEY: char = 'k';

/// Chord letters taken by built-in commands, plus the toggle.
pub const RESERVED_KEYS: &[char] = &[
    'a', 'e', 'p', 'f', 'm', 'c', 't', 'h', 'd', 'g', 'x', 'l', 'i', 'k',
];

const THEME_KEY: char = 'd';
const GITHUB_KEY: char = 'g';
const TWITTER_KEY: char = 'x';
const LINKEDIN_KEY: char = 'l';
const EMAIL_KEY: char = 'i';

/// How many recent fieldnotes the palette lists.
pub const PALETTE_FIELDNOTES: usize = 5;

/// How many fieldnotes the digit keys reach.
const DIGIT_FIELDNOTES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    fn none(&self) -> bool {
        !self.ctrl && !self.meta && !self.alt
    }
}

/// A key press as reported by the browser.
///
/// `key` is the produced character (`"k"`, `"1"`) or a named key (`"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// The key as a single lowercase character, if it is one.
    fn char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(c.to_ascii_lowercase())
    }
}

/// Where keyboard focus sits when the key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    Document,
    /// An input, textarea or contenteditable element.
    TextEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldnoteTarget {
    /// Index into the palette's recent fieldnotes.
    Position(usize),
    Slug(String),
}

/// Something the palette can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Navigate { section: Section },
    SelectProject { project: ProjectDetail },
    SelectFieldnote { target: FieldnoteTarget },
    OpenExternal { url: String },
    ToggleTheme,
    SendEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Navigate,
    Projects,
    RecentFieldnotes,
    Connect,
    Settings,
}

impl Group {
    pub fn title(self) -> &'static str {
        match self {
            Group::Navigate => "Navigate",
            Group::Projects => "Projects",
            Group::RecentFieldnotes => "Recent Fieldnotes",
            Group::Connect => "Connect",
            Group::Settings => "Settings",
        }
    }
}

/// One selectable palette row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteItem {
    pub id: String,
    pub group: Group,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<char>,
    pub command: Command,
}

/// Result of feeding a key event to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    TogglePalette,
    Run(Command),
    Ignored,
}

/// What the browser should do after a key or a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Navigate { href: String },
    Open { url: String },
    Mailto { href: String },
    Theme { name: String },
    Toggle,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    #[serde(flatten)]
    pub effect: Effect,
    pub close_palette: bool,
}

impl Dispatch {
    fn idle() -> Self {
        Self {
            effect: Effect::None,
            close_palette: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub items: Vec<PaletteItem>,
    /// Set when nothing matched.
    pub empty: bool,
    /// The command an exact fieldnote title match resolves to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<Command>,
}

/// Fieldnote reference held by the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NoteRef {
    slug: String,
    title: String,
    date: String,
}

/// The palette for one page: items, chord bindings and the theme cycle.
#[derive(Debug, Clone)]
pub struct Palette {
    items: Vec<PaletteItem>,
    bindings: Vec<(char, Command)>,
    fieldnotes: Vec<NoteRef>,
    email: String,
    themes: ThemesConfig,
}

impl Palette {
    /// Build the palette from config and the published fieldnotes, newest first.
    ///
    /// The first [`PALETTE_FIELDNOTES`] notes are listed; all of them are
    /// reachable through an exact title search.
    pub fn new(config: &SiteConfig, fieldnotes: &[ContentItem]) -> Self {
        let fieldnotes: Vec<NoteRef> = fieldnotes
            .iter()
            .map(|item| NoteRef {
                slug: item.slug.clone(),
                title: item.title.clone(),
                date: item.date.clone(),
            })
            .collect();

        let mut items = Vec::new();
        let mut bindings = Vec::new();

        for section in Section::ALL {
            let command = Command::Navigate { section };
            bindings.push((section.shortcut(), command.clone()));
            items.push(PaletteItem {
                id: format!("section:{}", section.slug()),
                group: Group::Navigate,
                label: section.title().to_string(),
                hint: Some(section.description().to_string()),
                shortcut: Some(section.shortcut()),
                command,
            });
        }

        for project in ProjectDetail::ALL {
            let command = Command::SelectProject { project };
            bindings.push((project.shortcut(), command.clone()));
            items.push(PaletteItem {
                id: format!("project:{}", project.slug()),
                group: Group::Projects,
                label: project.title().to_string(),
                hint: None,
                shortcut: Some(project.shortcut()),
                command,
            });
        }
        for (idx, project) in config.external_projects.iter().enumerate() {
            let command = Command::OpenExternal {
                url: project.url.clone(),
            };
            let key = project.key.map(|k| k.to_ascii_lowercase());
            if let Some(key) = key {
                bindings.push((key, command.clone()));
            }
            items.push(PaletteItem {
                id: format!("external:{idx}"),
                group: Group::Projects,
                label: project.title.clone(),
                hint: Some("External".to_string()),
                shortcut: key,
                command,
            });
        }

        for (idx, note) in fieldnotes.iter().take(PALETTE_FIELDNOTES).enumerate() {
            let shortcut = (idx < DIGIT_FIELDNOTES)
                .then(|| char::from_digit(idx as u32 + 1, 10))
                .flatten();
            items.push(PaletteItem {
                id: format!("fieldnote:{}", note.slug),
                group: Group::RecentFieldnotes,
                label: note.title.clone(),
                hint: Some(note.date.clone()),
                shortcut,
                command: Command::SelectFieldnote {
                    target: FieldnoteTarget::Position(idx),
                },
            });
        }

        let connect = [
            ("email", "Send Email", EMAIL_KEY, Command::SendEmail),
            (
                "github",
                "GitHub",
                GITHUB_KEY,
                Command::OpenExternal {
                    url: config.links.github.clone(),
                },
            ),
            (
                "twitter",
                "Twitter",
                TWITTER_KEY,
                Command::OpenExternal {
                    url: config.links.twitter.clone(),
                },
            ),
            (
                "linkedin",
                "LinkedIn",
                LINKEDIN_KEY,
                Command::OpenExternal {
                    url: config.links.linkedin.clone(),
                },
            ),
        ];
        for (id, label, key, command) in connect {
            bindings.push((key, command.clone()));
            items.push(PaletteItem {
                id: format!("connect:{id}"),
                group: Group::Connect,
                label: label.to_string(),
                hint: None,
                shortcut: Some(key),
                command,
            });
        }

        bindings.push((THEME_KEY, Command::ToggleTheme));
        items.push(PaletteItem {
            id: "settings:theme".to_string(),
            group: Group::Settings,
            label: "Toggle Theme".to_string(),
            hint: Some(config.themes.order.join(" → ")),
            shortcut: Some(THEME_KEY),
            command: Command::ToggleTheme,
        });

        Self {
            items,
            bindings,
            fieldnotes,
            email: config.site.email.clone(),
            themes: config.themes.clone(),
        }
    }

    pub fn items(&self) -> &[PaletteItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&PaletteItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The command bound to a chord letter.
    pub fn binding(&self, key: char) -> Option<&Command> {
        let key = key.to_ascii_lowercase();
        self.bindings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, command)| command)
    }

    /// Interpret a key press.
    pub fn handle_key(&self, event: &KeyEvent, focus: Focus, open: bool) -> KeyOutcome {
        let mods = event.modifiers;
        if open && event.key == "Escape" {
            return KeyOutcome::TogglePalette;
        }
        let Some(c) = event.char() else {
            return KeyOutcome::Ignored;
        };

        if (mods.ctrl || mods.meta) && !mods.alt && c == TOGGLE_KEY {
            return KeyOutcome::TogglePalette;
        }
        if focus == Focus::TextEntry {
            return KeyOutcome::Ignored;
        }

        let chord = mods.alt && !mods.ctrl && !mods.meta;
        let bare = open && mods.none();
        if !chord && !bare {
            return KeyOutcome::Ignored;
        }

        if bare && let Some(digit) = c.to_digit(10) {
            let idx = digit as usize;
            if (1..=DIGIT_FIELDNOTES).contains(&idx) && idx <= self.listed_fieldnotes() {
                return KeyOutcome::Run(Command::SelectFieldnote {
                    target: FieldnoteTarget::Position(idx - 1),
                });
            }
            return KeyOutcome::Ignored;
        }

        match self.binding(c) {
            Some(command) => KeyOutcome::Run(command.clone()),
            None => KeyOutcome::Ignored,
        }
    }

    /// Rank palette items against a free-text query.
    ///
    /// Matching is a case-insensitive subsequence test over each item's label
    /// and group title. An empty query lists everything in palette order.
    pub fn search(&self, query: &str) -> SearchResults {
        let needle = query.trim();
        let exact = self
            .fieldnotes
            .iter()
            .find(|note| !needle.is_empty() && note.title.eq_ignore_ascii_case(needle))
            .map(|note| Command::SelectFieldnote {
                target: FieldnoteTarget::Slug(note.slug.clone()),
            });

        let mut scored: Vec<(u32, &PaletteItem)> = self
            .items
            .iter()
            .filter_map(|item| {
                if needle.is_empty() {
                    return Some((0, item));
                }
                let on_label = fuzzy_score(needle, &item.label);
                let on_group = fuzzy_score(needle, item.group.title()).map(|s| s / 2);
                on_label.max(on_group).map(|score| (score, item))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut items: Vec<PaletteItem> = scored.into_iter().map(|(_, item)| item.clone()).collect();

        // An exact title hit beyond the listed notes still gets a row.
        if let Some(Command::SelectFieldnote {
            target: FieldnoteTarget::Slug(slug),
        }) = &exact
        {
            let listed = items
                .iter()
                .position(|item| item.id == format!("fieldnote:{slug}"));
            match listed {
                Some(pos) => {
                    let mut row = items.remove(pos);
                    row.command = exact.clone().unwrap_or(row.command);
                    items.insert(0, row);
                }
                None => {
                    if let Some(note) = self.fieldnotes.iter().find(|n| &n.slug == slug) {
                        items.insert(
                            0,
                            PaletteItem {
                                id: format!("fieldnote:{}", note.slug),
                                group: Group::RecentFieldnotes,
                                label: note.title.clone(),
                                hint: Some(note.date.clone()),
                                shortcut: None,
                                command: Command::SelectFieldnote {
                                    target: FieldnoteTarget::Slug(note.slug.clone()),
                                },
                            },
                        );
                    }
                }
            }
        }

        SearchResults {
            query: query.to_string(),
            empty: items.is_empty(),
            items,
            exact,
        }
    }

    /// Carry out a command against a page's navigation state.
    pub fn apply(
        &self,
        command: &Command,
        state: &mut NavigationState,
        current_theme: &str,
    ) -> Dispatch {
        let effect = match command {
            Command::Navigate { section } => {
                state.select_section(*section);
                Effect::Navigate {
                    href: state.to_path(),
                }
            }
            Command::SelectProject { project } => {
                state.select_project_detail(*project);
                Effect::Navigate {
                    href: state.to_path(),
                }
            }
            Command::SelectFieldnote { target } => {
                let slug = match target {
                    FieldnoteTarget::Position(idx) => self
                        .fieldnotes
                        .iter()
                        .take(PALETTE_FIELDNOTES)
                        .nth(*idx)
                        .map(|note| note.slug.as_str()),
                    FieldnoteTarget::Slug(slug) => {
                        Some(slug.as_str()).filter(|s| is_safe_slug(s))
                    }
                };
                match slug {
                    Some(slug) => {
                        state.select_fieldnote(slug);
                        Effect::Navigate {
                            href: state.to_path(),
                        }
                    }
                    None => Effect::None,
                }
            }
            Command::OpenExternal { url } => Effect::Open { url: url.clone() },
            Command::ToggleTheme => Effect::Theme {
                name: self.themes.next_theme(current_theme).to_string(),
            },
            Command::SendEmail => Effect::Mailto {
                href: format!("mailto:{}", self.email),
            },
        };
        Dispatch {
            effect,
            close_palette: true,
        }
    }

    /// Feed a key press through [`Palette::handle_key`] and [`Palette::apply`].
    pub fn dispatch_key(
        &self,
        event: &KeyEvent,
        focus: Focus,
        open: bool,
        state: &mut NavigationState,
        current_theme: &str,
    ) -> Dispatch {
        match self.handle_key(event, focus, open) {
            KeyOutcome::TogglePalette => Dispatch {
                effect: Effect::Toggle,
                close_palette: false,
            },
            KeyOutcome::Run(command) => self.apply(&command, state, current_theme),
            KeyOutcome::Ignored => Dispatch::idle(),
        }
    }

    fn listed_fieldnotes(&self) -> usize {
        self.fieldnotes.len().min(PALETTE_FIELDNOTES)
    }
}

/// Score `needle` as a case-insensitive subsequence of `haystack`.
///
/// Consecutive runs, word starts and a match at position zero score higher.
/// `None` when some character of the needle is missing.
pub fn fuzzy_score(needle: &str, haystack: &str) -> Option<u32> {
    let hay: Vec<char> = haystack.to_lowercase().chars().collect();
    let mut score = 0u32;
    let mut pos = 0usize;
    let mut prev: Option<usize> = None;

    for c in needle.to_lowercase().chars().filter(|c| !c.is_whitespace()) {
        let found = (pos..hay.len()).find(|&i| hay[i] == c)?;
        score += 1;
        if prev.is_some_and(|p| p + 1 == found) {
            score += 5;
        }
        if found == 0 {
            score += 8;
        } else if !hay[found - 1].is_alphanumeric() {
            score += 4;
        }
        prev = Some(found);
        pos = found + 1;
    }
    // Shorter haystacks win ties.
    Some(score * 100 / (hay.len() as u32 + 10).max(1) + score * 10)
}
