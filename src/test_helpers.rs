//! Shared test utilities.
//!
//! Fixture setup for filesystem tests, in-memory content for render tests,
//! and lookup helpers that panic with a useful message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let library = Library::new(FsSource::new(tmp.path()));
//! let notes = library.list_items(ContentType::Fieldnotes);
//! assert_sorted_newest_first(&notes);
//! let note = find_item(&notes, "first-light");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{ContentItem, MemorySource};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// A small site held in memory: every single page, three fieldnotes (one a
/// draft), one writing and one project.
pub fn sample_source() -> MemorySource {
    MemorySource::new()
        .with(
            "about.md",
            "---\ntitle: About\n---\nI build things and write fieldnotes.\n",
        )
        .with(
            "experience.md",
            "---\ntitle: Experience\n---\n- Engineering intern\n",
        )
        .with(
            "philosophy.mdx",
            "---\ntitle: My Philosophy\n---\nMake it work, then make it clear.\n",
        )
        .with(
            "content-worth-consuming.md",
            "---\ntitle: Content Worth Consuming\n---\n\
             - [The Bear](https://example.com/bear) – *tv show*\n\
             - [Thinking in Systems](https://example.com/systems) – *book*\n",
        )
        .with(
            "fieldnotes/first-light.md",
            "---\ntitle: First Light\ndate: 2024-05-01\nsummary: Morning notes\n---\nSunrise.\n",
        )
        .with(
            "fieldnotes/older.md",
            "---\ntitle: Older Note\ndate: 2023-02-10\n---\nEarlier.\n",
        )
        .with(
            "fieldnotes/wip.md",
            "---\ntitle: Work in Progress\nslug: work-in-progress\ndate: 2024-06-01\ndraft: true\n---\nNot yet.\n",
        )
        .with(
            "writings/on-tools.md",
            "---\ntitle: On Tools\ndate: 2024-01-15\n---\nTools shape thought.\n",
        )
        .with(
            "projects/tensorforest.md",
            "---\ntitle: TensorForest\nsummary: Random forests on tensors\n---\nDetails.\n",
        )
}

// =========================================================================
// Item builders
// =========================================================================

/// A published item with the given slug, title and date and empty body.
pub fn content_item(slug: &str, title: &str, date: &str) -> ContentItem {
    ContentItem {
        slug: slug.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        summary: String::new(),
        banner: None,
        tags: Vec::new(),
        draft: false,
        content: String::new(),
    }
}

/// `n` fieldnotes newest first: `note-0` ("Note 0") is the most recent.
pub fn fieldnotes(n: usize) -> Vec<ContentItem> {
    (0..n)
        .map(|i| {
            let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 31)
                .unwrap()
                .checked_sub_days(chrono::Days::new(i as u64))
                .unwrap();
            content_item(
                &format!("note-{i}"),
                &format!("Note {i}"),
                &date.format("%Y-%m-%d").to_string(),
            )
        })
        .collect()
}

// =========================================================================
// Lookups and assertions
// =========================================================================

/// Find an item by slug. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], slug: &str) -> &'a ContentItem {
    items.iter().find(|i| i.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
        panic!("item '{slug}' not found. Available: {slugs:?}")
    })
}

/// Assert every adjacent pair is ordered newest first.
pub fn assert_sorted_newest_first(items: &[ContentItem]) {
    for pair in items.windows(2) {
        assert!(
            pair[0].parsed_date() >= pair[1].parsed_date(),
            "'{}' ({}) sorted before '{}' ({})",
            pair[0].slug,
            pair[0].date,
            pair[1].slug,
            pair[1].date
        );
    }
}
