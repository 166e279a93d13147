//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` placed in the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! owner = "shayaan azeem"
//! email = "shayaan.azeem@uwaterloo.ca"
//! tagline = ""
//!
//! [links]
//! github = "https://github.com/shayaanazeem1"
//! twitter = "https://twitter.com/shayaan_azeem"
//! linkedin = "https://linkedin.com/in/shayaan-azeem"
//!
//! [[external_projects]]
//! title = "VibeType"
//! url = "https://www.gptfixtsfor.me/"
//! key = "v"                 # optional Alt+<key> chord
//!
//! [themes]
//! order = ["light", "dark", "matcha"]
//!
//! [themes.colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#2563eb"
//! link_hover = "#1e40af"
//!
//! [uploads]
//! allowed_content_types = ["image/jpeg", "image/png", ...]
//! max_client_upload_bytes = 104857600   # 100 MB, direct-to-storage uploads
//! max_server_upload_bytes = 10485760    # 10 MB, in-request image uploads
//! add_random_suffix = true
//! token_ttl_secs = 3600
//!
//! [storage]
//! api_url = "https://blob.vercel-storage.com"
//! token_env = "BLOB_READ_WRITE_TOKEN"
//! secret_env = "FOLIO_UPLOAD_SECRET"
//!
//! [server]
//! bind = "127.0.0.1:3000"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::commands::RESERVED_KEYS;

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
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Owner identity used in titles, the footer and the send-email command.
    pub site: SiteIdentity,
    /// Social profile links.
    pub links: LinksConfig,
    /// Projects that live elsewhere; shown in the palette as external links.
    pub external_projects: Vec<ExternalProject>,
    /// Theme order and colors.
    pub themes: ThemesConfig,
    /// Upload validation limits.
    pub uploads: UploadsConfig,
    /// Blob storage provider settings.
    pub storage: StorageConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteIdentity::default(),
            links: LinksConfig::default(),
            external_projects: default_external_projects(),
            themes: ThemesConfig::default(),
            uploads: UploadsConfig::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.themes.order.is_empty() {
            return Err(ConfigError::Validation(
                "themes.order must not be empty".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for name in &self.themes.order {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "themes.order lists '{name}' more than once"
                )));
            }
        }
        if self.uploads.allowed_content_types.is_empty() {
            return Err(ConfigError::Validation(
                "uploads.allowed_content_types must not be empty".into(),
            ));
        }
        if self.uploads.max_client_upload_bytes == 0 || self.uploads.max_server_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "upload ceilings must be non-zero".into(),
            ));
        }
        if self.uploads.max_server_upload_bytes > self.uploads.max_client_upload_bytes {
            return Err(ConfigError::Validation(
                "uploads.max_server_upload_bytes must not exceed max_client_upload_bytes".into(),
            ));
        }
        let mut keys = BTreeSet::new();
        for project in &self.external_projects {
            let Some(key) = project.key else { continue };
            if !key.is_ascii_alphabetic() {
                return Err(ConfigError::Validation(format!(
                    "external project '{}' key must be a letter",
                    project.title
                )));
            }
            let key = key.to_ascii_lowercase();
            if RESERVED_KEYS.contains(&key) || !keys.insert(key) {
                return Err(ConfigError::Validation(format!(
                    "external project '{}' key '{key}' is already bound",
                    project.title
                )));
            }
        }
        Ok(())
    }
}

/// Who the site belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    /// Name shown in the about header and appended to page titles.
    pub owner: String,
    /// Address used by the footer and the send-email command.
    pub email: String,
    /// One-line description under the name. Empty hides it.
    pub tagline: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            owner: "shayaan azeem".to_string(),
            email: "shayaan.azeem@uwaterloo.ca".to_string(),
            tagline: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub github: String,
    pub twitter: String,
    pub linkedin: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            github: "https://github.com/shayaanazeem1".to_string(),
            twitter: "https://twitter.com/shayaan_azeem".to_string(),
            linkedin: "https://linkedin.com/in/shayaan-azeem".to_string(),
        }
    }
}

/// A project hosted somewhere else, opened in a new tab from the palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExternalProject {
    pub title: String,
    pub url: String,
    /// Optional `Alt+<key>` chord.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<char>,
}

fn default_external_projects() -> Vec<ExternalProject> {
    vec![
        ExternalProject {
            title: "VibeType".to_string(),
            url: "https://www.gptfixtsfor.me/".to_string(),
            key: None,
        },
        ExternalProject {
            title: "Shoppy Wrapped".to_string(),
            url: "https://github.com/ultratrikx/shoppy-wrapped/pulls".to_string(),
            key: None,
        },
    ]
}

/// Theme cycle order and the color scheme of each theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemesConfig {
    /// Toggle order. The first entry is the default theme.
    pub order: Vec<String>,
    /// Color scheme per theme name. Themes without an entry fall back to light colors.
    pub colors: BTreeMap<String, ColorScheme>,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        let mut colors = BTreeMap::new();
        colors.insert("light".to_string(), ColorScheme::default_light());
        colors.insert("dark".to_string(), ColorScheme::default_dark());
        colors.insert("matcha".to_string(), ColorScheme::default_matcha());
        Self {
            order: vec!["light".to_string(), "dark".to_string(), "matcha".to_string()],
            colors,
        }
    }
}

impl ThemesConfig {
    /// The theme a first-time visitor sees.
    pub fn default_theme(&self) -> &str {
        self.order.first().map(String::as_str).unwrap_or("light")
    }

    /// The theme after `current` in the toggle cycle.
    ///
    /// Unknown names restart the cycle at the first theme.
    pub fn next_theme(&self, current: &str) -> &str {
        match self.order.iter().position(|t| t == current) {
            Some(idx) => &self.order[(idx + 1) % self.order.len()],
            None => self.default_theme(),
        }
    }

    /// Normalize a client-supplied theme name, falling back to the default.
    pub fn resolve<'a>(&'a self, requested: Option<&str>) -> &'a str {
        requested
            .and_then(|name| self.order.iter().find(|t| *t == name))
            .map(String::as_str)
            .unwrap_or_else(|| self.default_theme())
    }
}

/// Individual color scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text color (sidebar, dates, footer).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#2563eb".to_string(),
            link_hover: "#1e40af".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#93c5fd".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }

    pub fn default_matcha() -> Self {
        Self {
            background: "#f1f5e9".to_string(),
            text: "#1f2a1c".to_string(),
            text_muted: "#5f6f52".to_string(),
            border: "#cbd5b8".to_string(),
            link: "#3f6212".to_string(),
            link_hover: "#1a2e05".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Upload validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsConfig {
    /// Content types a client token may be issued for.
    pub allowed_content_types: Vec<String>,
    /// Ceiling for direct-to-storage uploads authorized by a client token.
    pub max_client_upload_bytes: u64,
    /// Ceiling for uploads proxied through this server in a single request.
    pub max_server_upload_bytes: u64,
    /// Ask the provider to append a random suffix to stored pathnames.
    pub add_random_suffix: bool,
    /// Lifetime of an issued client token.
    pub token_ttl_secs: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            allowed_content_types: [
                "image/jpeg",
                "image/png",
                "image/webp",
                "image/gif",
                "application/pdf",
                "text/plain",
                "text/markdown",
                "application/json",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_client_upload_bytes: 100 * 1024 * 1024,
            max_server_upload_bytes: 10 * 1024 * 1024,
            add_random_suffix: true,
            token_ttl_secs: 60 * 60,
        }
    }
}

/// Blob storage provider settings. Secrets are read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Base URL of the provider's blob API.
    pub api_url: String,
    /// Environment variable holding the provider read/write token.
    pub token_env: String,
    /// Environment variable holding the client-token signing secret.
    /// When unset, the provider token doubles as the secret.
    pub secret_env: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_url: "https://blob.vercel-storage.com".to_string(),
            token_env: "BLOB_READ_WRITE_TOKEN".to_string(),
            secret_env: "FOLIO_UPLOAD_SECRET".to_string(),
        }
    }
}

impl StorageConfig {
    /// Read the provider token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }

    /// Read the signing secret, falling back to the provider token.
    pub fn signing_secret(&self) -> Option<String> {
        std::env::var(&self.secret_env)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.token())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
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
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Identity
# ---------------------------------------------------------------------------
[site]
owner = "shayaan azeem"
# Used by the footer and the "Send Email" palette command.
email = "shayaan.azeem@uwaterloo.ca"
# One line under the name on the about page. Empty hides it.
tagline = ""

[links]
github = "https://github.com/shayaanazeem1"
twitter = "https://twitter.com/shayaan_azeem"
linkedin = "https://linkedin.com/in/shayaan-azeem"

# Projects hosted elsewhere. `key` binds an optional Alt+<key> chord.
[[external_projects]]
title = "VibeType"
url = "https://www.gptfixtsfor.me/"

[[external_projects]]
title = "Shoppy Wrapped"
url = "https://github.com/ultratrikx/shoppy-wrapped/pulls"

# ---------------------------------------------------------------------------
# Themes - the toggle cycles through `order`; the first is the default
# ---------------------------------------------------------------------------
[themes]
order = ["light", "dark", "matcha"]

[themes.colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"
border = "#e0e0e0"
link = "#2563eb"
link_hover = "#1e40af"

[themes.colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#93c5fd"
link_hover = "#ffffff"

[themes.colors.matcha]
background = "#f1f5e9"
text = "#1f2a1c"
text_muted = "#5f6f52"
border = "#cbd5b8"
link = "#3f6212"
link_hover = "#1a2e05"

# ---------------------------------------------------------------------------
# Uploads
# ---------------------------------------------------------------------------
[uploads]
allowed_content_types = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "application/pdf",
    "text/plain",
    "text/markdown",
    "application/json",
]
# Direct-to-storage uploads (100 MB).
max_client_upload_bytes = 104857600
# Uploads proxied through the server in one request (10 MB).
max_server_upload_bytes = 10485760
add_random_suffix = true
token_ttl_secs = 3600

# ---------------------------------------------------------------------------
# Storage provider - secrets come from the environment, never this file
# ---------------------------------------------------------------------------
[storage]
api_url = "https://blob.vercel-storage.com"
token_env = "BLOB_READ_WRITE_TOKEN"
secret_env = "FOLIO_UPLOAD_SECRET"

[server]
bind = "127.0.0.1:3000"
"##
}

/// Generate CSS custom properties for every configured theme.
///
/// The default theme also applies to `:root` so pages render before any
/// `data-theme` attribute is set.
pub fn generate_theme_css(themes: &ThemesConfig) -> String {
    let fallback = ColorScheme::default_light();
    let mut blocks = Vec::new();
    for (idx, name) in themes.order.iter().enumerate() {
        let scheme = themes.colors.get(name).unwrap_or(&fallback);
        let selector = if idx == 0 {
            format!(":root, [data-theme=\"{name}\"]")
        } else {
            format!("[data-theme=\"{name}\"]")
        };
        blocks.push(format!(
            r#"{selector} {{
    --color-bg: {bg};
    --color-text: {text};
    --color-text-muted: {muted};
    --color-border: {border};
    --color-link: {link};
    --color-link-hover: {hover};
}}"#,
            bg = scheme.background,
            text = scheme.text,
            muted = scheme.text_muted,
            border = scheme.border,
            link = scheme.link,
            hover = scheme.link_hover,
        ));
    }
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_three_themes() {
        let config = SiteConfig::default();
        assert_eq!(config.themes.order, vec!["light", "dark", "matcha"]);
        assert_eq!(config.themes.default_theme(), "light");
    }

    #[test]
    fn default_upload_ceilings() {
        let config = SiteConfig::default();
        assert_eq!(config.uploads.max_client_upload_bytes, 100 * 1024 * 1024);
        assert_eq!(config.uploads.max_server_upload_bytes, 10 * 1024 * 1024);
        assert!(
            config
                .uploads
                .allowed_content_types
                .contains(&"application/pdf".to_string())
        );
    }

    #[test]
    fn next_theme_cycles_and_wraps() {
        let themes = ThemesConfig::default();
        assert_eq!(themes.next_theme("light"), "dark");
        assert_eq!(themes.next_theme("dark"), "matcha");
        assert_eq!(themes.next_theme("matcha"), "light");
    }

    #[test]
    fn next_theme_unknown_restarts_cycle() {
        let themes = ThemesConfig::default();
        assert_eq!(themes.next_theme("solarized"), "light");
    }

    #[test]
    fn resolve_theme_rejects_unknown_names() {
        let themes = ThemesConfig::default();
        assert_eq!(themes.resolve(Some("dark")), "dark");
        assert_eq!(themes.resolve(Some("<script>")), "light");
        assert_eq!(themes.resolve(None), "light");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[site]
owner = "Ada"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site.owner, "Ada");
        // Defaults preserved
        assert_eq!(config.site.email, "shayaan.azeem@uwaterloo.ca");
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.themes.order.len(), 3);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[themes]
order = ["dark", "light"]

[uploads]
max_server_upload_bytes = 1024
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.themes.order, vec!["dark", "light"]);
        assert_eq!(config.uploads.max_server_upload_bytes, 1024);
        // Colors for the stock themes survive the merge
        assert!(config.themes.colors.contains_key("matcha"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[uploads]
max_size = 90
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_theme_order() {
        let mut config = SiteConfig::default();
        config.themes.order.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_duplicate_theme() {
        let mut config = SiteConfig::default();
        config.themes.order.push("light".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn validate_small_ceiling_above_large() {
        let mut config = SiteConfig::default();
        config.uploads.max_server_upload_bytes = config.uploads.max_client_upload_bytes + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_ceiling() {
        let mut config = SiteConfig::default();
        config.uploads.max_server_upload_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_external_project_key_collides_with_builtin_chord() {
        let mut config = SiteConfig::default();
        config.external_projects[0].key = Some('A');
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("already bound"));
    }

    #[test]
    fn validate_external_project_keys_unique() {
        let mut config = SiteConfig::default();
        config.external_projects[0].key = Some('v');
        config.external_projects[1].key = Some('V');
        assert!(config.validate().is_err());

        config.external_projects[1].key = Some('s');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_external_project_key_must_be_letter() {
        let mut config = SiteConfig::default();
        config.external_projects[0].key = Some('1');
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[themes]
order = []
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[uploads]
token_ttl_secs = 3600
add_random_suffix = true
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[uploads]
add_random_suffix = false
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let uploads = merged.get("uploads").unwrap();
        assert_eq!(uploads.get("add_random_suffix").unwrap().as_bool(), Some(false));
        assert_eq!(uploads.get("token_ttl_secs").unwrap().as_integer(), Some(3600));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"order = ["a", "b", "c"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"order = ["z"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("order").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.themes.order, defaults.themes.order);
        assert_eq!(
            config.uploads.allowed_content_types,
            defaults.uploads.allowed_content_types
        );
        assert_eq!(config.external_projects, defaults.external_projects);
        assert_eq!(config.storage.api_url, defaults.storage.api_url);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn theme_css_has_block_per_theme() {
        let css = generate_theme_css(&ThemesConfig::default());
        assert!(css.contains(r#":root, [data-theme="light"]"#));
        assert!(css.contains(r#"[data-theme="dark"]"#));
        assert!(css.contains(r#"[data-theme="matcha"]"#));
        assert!(css.contains("--color-bg: #0a0a0a"));
    }

    #[test]
    fn theme_css_falls_back_to_light_colors() {
        let themes = ThemesConfig {
            order: vec!["paper".to_string()],
            colors: BTreeMap::new(),
        };
        let css = generate_theme_css(&themes);
        assert!(css.contains("--color-bg: #ffffff"));
    }
}
