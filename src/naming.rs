//! Centralized filename and path conventions.
//!
//! Content files are `<slug>.md` or `<slug>.mdx`. The filename stem is the
//! default slug; front matter may declare a different one. Banner images are
//! written in front matter either as site paths (`/fieldnotes/x.png`), as
//! absolute URLs, or as bare filenames that live next to the content type's
//! public directory.
//!
//! - `my-first-note.mdx` → slug `my-first-note`
//! - `banner: cover.png` in `fieldnotes/` → `/fieldnotes/cover.png`
//! - `banner: https://cdn.example/x.png` → unchanged

/// Extensions recognized as content documents, in lookup priority order.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Strip a content extension from a filename, returning the slug-bearing stem.
///
/// Returns `None` for files that are not markdown/MDX or for hidden files.
pub fn content_stem(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || !CONTENT_EXTENSIONS.contains(&ext) {
        return None;
    }
    Some(stem)
}

/// Prefix bare banner filenames with the public path of their content type.
///
/// Site-absolute paths and `http(s)` URLs pass through untouched.
pub fn normalize_banner(banner: &str, public_dir: &str) -> String {
    if banner.starts_with('/') || banner.starts_with("http") {
        banner.to_string()
    } else {
        format!("/{}/{}", public_dir.trim_matches('/'), banner)
    }
}

/// Whether a slug is safe to use as a single URL path segment.
///
/// Slugs arrive from URLs and front matter; anything that could escape a
/// directory or split a path is refused before it reaches a lookup.
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_of_markdown_file() {
        assert_eq!(content_stem("hello-world.md"), Some("hello-world"));
    }

    #[test]
    fn stem_of_mdx_file() {
        assert_eq!(content_stem("other.mdx"), Some("other"));
    }

    #[test]
    fn stem_keeps_inner_dots() {
        assert_eq!(content_stem("v1.2-notes.md"), Some("v1.2-notes"));
    }

    #[test]
    fn non_content_files_rejected() {
        assert_eq!(content_stem("cover.png"), None);
        assert_eq!(content_stem("README"), None);
        assert_eq!(content_stem("notes.markdown"), None);
    }

    #[test]
    fn hidden_and_extension_only_files_rejected() {
        assert_eq!(content_stem(".draft.md"), None);
        assert_eq!(content_stem(".md"), None);
    }

    #[test]
    fn banner_bare_filename_is_prefixed() {
        assert_eq!(normalize_banner("cover.png", "fieldnotes"), "/fieldnotes/cover.png");
    }

    #[test]
    fn banner_prefix_slashes_are_trimmed() {
        assert_eq!(normalize_banner("a.jpg", "/writings/"), "/writings/a.jpg");
    }

    #[test]
    fn banner_absolute_path_untouched() {
        assert_eq!(normalize_banner("/img/a.png", "fieldnotes"), "/img/a.png");
    }

    #[test]
    fn banner_url_untouched() {
        assert_eq!(
            normalize_banner("https://cdn.example/a.png", "fieldnotes"),
            "https://cdn.example/a.png"
        );
    }

    #[test]
    fn safe_slugs() {
        assert!(is_safe_slug("my-note"));
        assert!(is_safe_slug("v1.2"));
        assert!(!is_safe_slug(""));
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug("a/b"));
        assert!(!is_safe_slug("a\\b"));
    }
}
