//! CLI output formatting.
//!
//! Output is **information-centric**: every entry leads with its positional
//! index and title, with slug, date and other details on indented context
//! lines underneath.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Portfolio (3 entries)
//! 001 Portfolio Site
//!     Slug: portfolio-site
//!     Date: 2023-04-02
//!     Tags: rust, web
//! 002 Backend Billing
//!     Slug: backend-billing
//! ```
//!
//! ## Search
//!
//! ```text
//! Search Portfolio "port" (2 of 4)
//! 001 Portfolio Site
//!     Slug: portfolio-site
//! 003 Portal Widgets
//!     Slug: portal-widgets
//! ```
//!
//! Matches keep their position in the full list, so the index tells where
//! the entry sits when the filter is cleared.
//!
//! ## Gallery
//!
//! ```text
//! open:0  open   1/3  Rust Fundamentals  [scroll locked]
//! next    open   2/3  Distributed Systems  [scroll locked]
//! close   closed 2/3
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::content::{Category, ContentItem};
use crate::gallery::{GalleryCommand, GalleryNavigator, ScrollLock};
use crate::search::SearchView;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Header line plus indented context lines for one entry.
fn item_lines(position: usize, item: &ContentItem) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", format_index(position), item.title),
        format!("    Slug: {}", item.slug),
    ];
    if let Some(date) = &item.date {
        lines.push(format!("    Date: {}", date));
    }
    if !item.tags.is_empty() {
        lines.push(format!("    Tags: {}", item.tags.join(", ")));
    }
    if let Some(summary) = &item.summary {
        lines.push(format!("    {}", truncate(summary.trim(), 60)));
    }
    lines
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Format a whole collection.
pub fn format_listing(category: Category, items: &[ContentItem]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({})",
        category.label(),
        plural(items.len(), "entry", "entries")
    )];
    for (i, item) in items.iter().enumerate() {
        lines.extend(item_lines(i + 1, item));
    }
    lines
}

pub fn print_listing(category: Category, items: &[ContentItem]) {
    for line in format_listing(category, items) {
        println!("{}", line);
    }
}

/// Format the outcome of a search.
///
/// `source` is the full collection, used to recover each match's position.
pub fn format_search(
    category: Category,
    query: &str,
    source: &[ContentItem],
    view: &SearchView<'_, ContentItem>,
) -> Vec<String> {
    match view {
        SearchView::Unfiltered(items) => {
            let mut lines = vec!["No active filter".to_string()];
            lines.extend(format_listing(category, items));
            lines
        }
        SearchView::Pending => vec![format!("Search {} {:?}: searching...", category.label(), query)],
        SearchView::NoMatches => vec![format!(
            "Search {} {:?}: no results",
            category.label(),
            query
        )],
        SearchView::Matches(found) => {
            let mut lines = vec![format!(
                "Search {} {:?} ({} of {})",
                category.label(),
                query,
                found.len(),
                source.len()
            )];
            for item in found {
                let position = source
                    .iter()
                    .position(|s| s.slug == item.slug)
                    .map(|p| p + 1)
                    .unwrap_or(0);
                lines.extend(item_lines(position, item));
            }
            lines
        }
    }
}

pub fn print_search(
    category: Category,
    query: &str,
    source: &[ContentItem],
    view: &SearchView<'_, ContentItem>,
) {
    for line in format_search(category, query, source, view) {
        println!("{}", line);
    }
}

/// Format the navigator state after a command.
pub fn format_gallery_step(
    command: GalleryCommand,
    nav: &GalleryNavigator,
    items: &[ContentItem],
    lock: &ScrollLock,
) -> String {
    let position = format!("{}/{}", nav.current_index() + 1, nav.image_count());
    let command = format!("{:<7}", command.to_string());
    match nav.current(items) {
        Some(item) => {
            let lock_marker = if lock.is_locked() {
                "  [scroll locked]"
            } else {
                ""
            };
            format!("{command} open   {position}  {}{lock_marker}", item.title)
        }
        None => format!("{command} closed {position}"),
    }
}

pub fn print_gallery_step(
    command: GalleryCommand,
    nav: &GalleryNavigator,
    items: &[ContentItem],
    lock: &ScrollLock,
) {
    println!("{}", format_gallery_step(command, nav, items, lock));
}

/// Format the `check` summary: one line per category.
pub fn format_check(counts: &[(Category, usize)]) -> Vec<String> {
    counts
        .iter()
        .map(|(category, n)| format!("{}: {}", category.label(), plural(*n, "entry", "entries")))
        .collect()
}

pub fn print_check(counts: &[(Category, usize)]) {
    for line in format_check(counts) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{MatchPolicy, SearchEngine};
    use crate::test_helpers::*;
    use std::rc::Rc;

    #[test]
    fn listing_shows_index_title_and_context() {
        let mut a = ContentItem::new("Portfolio Site", "portfolio-site");
        a.date = chrono::NaiveDate::from_ymd_opt(2023, 4, 2);
        a.tags = vec!["rust".to_string(), "web".to_string()];
        let b = ContentItem::new("Backend Billing", "backend-billing");

        let lines = format_listing(Category::Portfolio, &[a, b]);
        assert_eq!(
            lines,
            vec![
                "Portfolio (2 entries)",
                "001 Portfolio Site",
                "    Slug: portfolio-site",
                "    Date: 2023-04-02",
                "    Tags: rust, web",
                "002 Backend Billing",
                "    Slug: backend-billing",
            ]
        );
    }

    #[test]
    fn listing_singular_entry() {
        let lines = format_listing(Category::Certificate, &items(&["Rust"]));
        assert_eq!(lines[0], "Certificate (1 entry)");
    }

    #[test]
    fn search_matches_keep_source_position() {
        let source = items(&["Portfolio A", "Backend B", "Portal C"]);
        let mut engine = SearchEngine::new(source.clone(), MatchPolicy::title_only(), usize::MAX);
        engine.set_query("port");
        let lines = format_search(Category::Portfolio, "port", &source, &engine.view());
        assert_eq!(lines[0], "Search Portfolio \"port\" (2 of 3)");
        assert!(lines.contains(&"001 Portfolio A".to_string()));
        assert!(lines.contains(&"003 Portal C".to_string()));
    }

    #[test]
    fn search_without_results() {
        let lines = format_search(Category::Portfolio, "zzz", &[], &SearchView::NoMatches);
        assert_eq!(lines, vec!["Search Portfolio \"zzz\": no results"]);
    }

    #[test]
    fn search_unfiltered_lists_everything() {
        let source = items(&["A", "B"]);
        let lines = format_search(Category::Portfolio, "", &source, &SearchView::Unfiltered(&source));
        assert_eq!(lines[0], "No active filter");
        assert_eq!(lines[1], "Portfolio (2 entries)");
    }

    #[test]
    fn gallery_step_open_and_closed() {
        let source = items(&["Rust", "Systems", "Web"]);
        let lock = ScrollLock::new();
        let mut nav = GalleryNavigator::new(source.len(), Rc::clone(&lock)).unwrap();

        nav.open(0);
        assert_eq!(
            format_gallery_step(GalleryCommand::Open(0), &nav, &source, &lock),
            "open:0  open   1/3  Rust  [scroll locked]"
        );

        nav.close();
        assert_eq!(
            format_gallery_step(GalleryCommand::Close, &nav, &source, &lock),
            "close   closed 1/3"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 3), "ééé...");
        assert_eq!(truncate("short", 60), "short");
    }

    #[test]
    fn check_summary() {
        let lines = format_check(&[(Category::Portfolio, 4), (Category::Certificate, 1)]);
        assert_eq!(lines, vec!["Portfolio: 4 entries", "Certificate: 1 entry"]);
    }
}
