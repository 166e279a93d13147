//! CLI output formatting.
//!
//! Output is a content inventory first: every entry leads with its position
//! and title, with slugs, dates and URLs as indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//!     About
//!     Experience
//!     My Philosophy (missing)
//!     Content Worth Consuming (5 recommendations)
//!
//! Fieldnotes (2)
//! 001 First Light
//!     Slug: first-light
//!     Date: 2024-05-01
//!     Notes from an early morning
//!
//! Projects
//!     TensorForest
//!     Apocalypse Hacks (no details file)
//! ```
//!
//! ## Build
//!
//! ```text
//! / → index.html
//! /projects/tensorforest → projects/tensorforest/index.html
//!
//! Generated 12 pages, copied 3 public files
//! ```
//!
//! ## Files
//!
//! ```text
//! 001 fieldnotes/cover-a1b2c3d4.png (12.4 KB)
//!     https://store.example/fieldnotes/cover-a1b2c3d4.png
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::content::{ContentItem, SinglePage};
use crate::generate::{BuildSummary, SiteData, parse_recommendations};
use crate::uploads::{UploadSlot, UploadedObject};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

// ============================================================================
// check
// ============================================================================

fn single_page_line(page: SinglePage, item: Option<&ContentItem>) -> String {
    let title = page.default_title();
    match item {
        None => format!("{}{} (missing)", indent(1), title),
        Some(item) if page == SinglePage::ContentWorthConsuming => {
            let count = parse_recommendations(&item.content).len();
            format!("{}{} ({} recommendations)", indent(1), title, count)
        }
        Some(_) => format!("{}{}", indent(1), title),
    }
}

fn item_section(lines: &mut Vec<String>, heading: &str, items: &[ContentItem]) {
    lines.push(format!("{} ({})", heading, items.len()));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.title));
        lines.push(format!("{}Slug: {}", indent(1), item.slug));
        lines.push(format!("{}Date: {}", indent(1), item.date));
        let summary = truncate_desc(item.summary.trim(), 60);
        if !summary.is_empty() {
            lines.push(format!("{}{}", indent(1), summary));
        }
    }
}

/// Inventory of everything the content root provides.
pub fn format_check_output(data: &SiteData) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    lines.push(single_page_line(SinglePage::About, data.about.as_ref()));
    lines.push(single_page_line(SinglePage::Experience, data.experience.as_ref()));
    lines.push(single_page_line(SinglePage::Philosophy, data.philosophy.as_ref()));
    lines.push(single_page_line(
        SinglePage::ContentWorthConsuming,
        data.content_worth_consuming.as_ref(),
    ));

    lines.push(String::new());
    item_section(&mut lines, "Fieldnotes", &data.fieldnotes);
    lines.push(String::new());
    item_section(&mut lines, "Writings", &data.writings);

    lines.push(String::new());
    lines.push("Projects".to_string());
    for (detail, item) in &data.projects {
        match item {
            Some(item) => lines.push(format!("{}{}", indent(1), item.title)),
            None => lines.push(format!("{}{} (no details file)", indent(1), detail.title())),
        }
    }
    lines
}

pub fn print_check_output(data: &SiteData) {
    for line in format_check_output(data) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Site path to the file written for it, relative to the output directory.
fn page_file(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .pages
        .iter()
        .map(|path| format!("{} → {}", path, page_file(path)))
        .collect();
    lines.push("404 → 404.html".to_string());
    lines.push(String::new());
    lines.push(format!(
        "Generated {} pages, copied {} public files",
        summary.pages.len(),
        summary.assets
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// files
// ============================================================================

pub fn format_files_list(objects: &[UploadedObject]) -> Vec<String> {
    if objects.is_empty() {
        return vec!["No files".to_string()];
    }
    let mut lines = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            object.pathname,
            format_size(object.size)
        ));
        lines.push(format!("{}{}", indent(1), object.url));
    }
    let total: u64 = objects.iter().map(|o| o.size).sum();
    lines.push(String::new());
    lines.push(format!("{} files, {}", objects.len(), format_size(total)));
    lines
}

pub fn print_files_list(objects: &[UploadedObject]) {
    for line in format_files_list(objects) {
        println!("{}", line);
    }
}

/// One line per settled upload plus a tally.
pub fn format_upload_results(slots: &[UploadSlot]) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut uploaded, mut failed) = (0, 0);
    for slot in slots {
        match slot {
            UploadSlot::Succeeded(object) => {
                uploaded += 1;
                lines.push(format!("uploaded {} → {}", object.pathname, object.url));
            }
            UploadSlot::Failed { file_name, message } => {
                failed += 1;
                lines.push(format!("FAILED {}: {}", file_name, message));
            }
            UploadSlot::Pending { file_name } => lines.push(format!("pending {}", file_name)),
            UploadSlot::Idle => {}
        }
    }
    lines.push(String::new());
    lines.push(format!("{} uploaded, {} failed", uploaded, failed));
    lines
}

pub fn print_upload_results(slots: &[UploadSlot]) {
    for line in format_upload_results(slots) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::ProjectDetail;
    use crate::test_helpers::{content_item, fieldnotes};
    use std::path::PathBuf;

    fn object(pathname: &str, size: u64) -> UploadedObject {
        UploadedObject {
            pathname: pathname.to_string(),
            url: format!("https://store.example/{pathname}"),
            size,
            uploaded_at: "2024-05-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn truncate_desc_short_and_long() {
        assert_eq!(truncate_desc("short", 10), "short");
        assert_eq!(truncate_desc("0123456789abc", 10), "0123456789...");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("héllo wörld", 4), "héll...");
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn check_output_marks_missing_pages() {
        let mut about = content_item("about", "About", "2024-01-01");
        about.content = "hi".to_string();
        let data = SiteData {
            about: Some(about),
            fieldnotes: fieldnotes(2),
            projects: vec![(ProjectDetail::TensorForest, None)],
            ..Default::default()
        };
        let lines = format_check_output(&data);
        assert_eq!(lines[1], "    About");
        assert_eq!(lines[2], "    Experience (missing)");
        assert!(lines.contains(&"Fieldnotes (2)".to_string()));
        assert!(lines.contains(&"001 Note 0".to_string()));
        assert!(lines.contains(&"    Slug: note-1".to_string()));
        assert!(lines.contains(&"Writings (0)".to_string()));
        assert!(lines.contains(&"    TensorForest (no details file)".to_string()));
    }

    #[test]
    fn check_output_counts_recommendations() {
        let mut page = content_item("content-worth-consuming", "Content", "2024-01-01");
        page.content = "- [a](https://a) – *book*\n- [b](https://b) – *blog*\n".to_string();
        let data = SiteData {
            content_worth_consuming: Some(page),
            ..Default::default()
        };
        let lines = format_check_output(&data);
        assert_eq!(lines[4], "    Content Worth Consuming (2 recommendations)");
    }

    #[test]
    fn build_output_maps_paths_to_files() {
        let summary = BuildSummary {
            output_dir: PathBuf::from("dist"),
            pages: vec!["/".to_string(), "/fieldnotes/first-light".to_string()],
            assets: 3,
        };
        let lines = format_build_output(&summary);
        assert_eq!(lines[0], "/ → index.html");
        assert_eq!(lines[1], "/fieldnotes/first-light → fieldnotes/first-light/index.html");
        assert_eq!(lines.last().unwrap(), "Generated 2 pages, copied 3 public files");
    }

    #[test]
    fn files_list_empty() {
        assert_eq!(format_files_list(&[]), vec!["No files"]);
    }

    #[test]
    fn files_list_entries() {
        let lines = format_files_list(&[object("a.png", 2048), object("b.pdf", 100)]);
        assert_eq!(lines[0], "001 a.png (2.0 KB)");
        assert_eq!(lines[1], "    https://store.example/a.png");
        assert_eq!(lines[2], "002 b.pdf (100 B)");
        assert_eq!(lines.last().unwrap(), "2 files, 2.1 KB");
    }

    #[test]
    fn upload_results_tally_failures() {
        let slots = vec![
            UploadSlot::Succeeded(object("a.png", 1)),
            UploadSlot::Failed {
                file_name: "b.exe".to_string(),
                message: "File type application/octet-stream is not allowed".to_string(),
            },
        ];
        let lines = format_upload_results(&slots);
        assert_eq!(lines[0], "uploaded a.png → https://store.example/a.png");
        assert!(lines[1].starts_with("FAILED b.exe: "));
        assert_eq!(lines.last().unwrap(), "1 uploaded, 1 failed");
    }
}
