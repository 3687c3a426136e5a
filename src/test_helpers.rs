//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, quick item builders and lookup helpers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let source = FsContentSource::new(tmp.path());
//! let portfolio = source.fetch(Category::Portfolio).unwrap();
//!
//! let site = find_item(&portfolio, "portfolio-site");
//! assert_eq!(site.date, NaiveDate::from_ymd_opt(2023, 4, 2));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{Category, ContentItem};

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

/// Write one entry file under `<root>/<category>/`.
pub fn write_entry(root: &Path, category: Category, filename: &str, content: &str) {
    let dir = root.join(category.dir_name());
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(filename), content).unwrap();
}

// =========================================================================
// Builders
// =========================================================================

/// Items with the given titles; slugs are the lowercased, dashed titles.
pub fn items(titles: &[&str]) -> Vec<ContentItem> {
    titles
        .iter()
        .map(|t| ContentItem::new(*t, t.to_lowercase().replace(' ', "-")))
        .collect()
}

pub fn dated(title: &str, date: Option<&str>) -> ContentItem {
    let mut item = ContentItem::new(title, title.to_lowercase());
    item.date = date.map(|d| d.parse().unwrap());
    item
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

pub fn titles(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

/// Find an item by slug. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], slug: &str) -> &'a ContentItem {
    items.iter().find(|i| i.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = items.iter().map(|i| i.slug.as_str()).collect();
        panic!("item '{slug}' not found. Available: {slugs:?}")
    })
}
