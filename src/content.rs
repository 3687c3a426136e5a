//! Content records and the sources that supply them.
//!
//! A [`ContentSource`] hands out the ordered records of one [`Category`]. The
//! production implementation, [`FsContentSource`], reads a directory per
//! category; [`StaticSource`] serves in-memory collections.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml                  # Site configuration (optional)
//! ├── portfolio/
//! │   ├── 010-folio.md             # One entry per markdown file
//! │   └── 020-chat-relay.md
//! └── certificate/
//!     ├── 001-rust-fundamentals.md # NNN- prefix orders certificates
//!     └── 002-distributed-systems.md
//! ```
//!
//! ## Entry Files
//!
//! Each file starts with a TOML front matter block fenced by `+++` lines,
//! followed by an optional markdown body:
//!
//! ```text
//! +++
//! title = "Folio"
//! slug = "folio"
//! summary = "Portfolio site with incremental search"
//! date = 2023-04-02
//! tags = ["rust", "web"]
//! image = "/img/folio.avif"
//! link = "https://example.com/folio"
//! +++
//!
//! Longer write-up in markdown.
//! ```
//!
//! `date` must be a bare TOML local date. Datetimes, offsets and times are
//! rejected so that ordering never depends on a time zone.
//!
//! Every key is optional. A missing `title` falls back to the filename with
//! its number prefix stripped and dashes turned into spaces; a missing `slug`
//! falls back to the stripped filename. A file without front matter is all body.
//!
//! ## Ordering
//!
//! - **Portfolio**: newest `date` first; undated entries last, in filename order
//! - **Certificate**: by `NNN-` prefix; unnumbered files last, in filename order
//!
//! Slugs must be unique within a category.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Front matter is never closed with +++ in {0}")]
    UnterminatedFrontMatter(PathBuf),
    #[error("Invalid date '{value}' in {path}: expected a YYYY-MM-DD date")]
    InvalidDate { path: PathBuf, value: String },
    #[error("No title in front matter or filename: {0}")]
    MissingTitle(PathBuf),
    #[error("Duplicate slug '{slug}' in {category}")]
    DuplicateSlug { slug: String, category: Category },
    #[error("No content directory for {category}: {path}")]
    CategoryDirMissing { category: Category, path: PathBuf },
    #[error("No {0} collection in this source")]
    CategoryMissing(Category),
    #[error("Unknown content category: {0}")]
    UnknownCategory(String),
}

/// A named content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Portfolio,
    Certificate,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Portfolio, Category::Certificate];

    /// Directory name under the content root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Portfolio => "portfolio",
            Category::Certificate => "certificate",
        }
    }

    /// Human label used in headings.
    pub fn label(self) -> &'static str {
        match self {
            Category::Portfolio => "Portfolio",
            Category::Certificate => "Certificate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.dir_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContentError::UnknownCategory(s.to_string()))
    }
}

/// A single portfolio or certificate record.
///
/// `slug` is the identity within a collection and the stable rendering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Calendar date, used for newest-first ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Raw markdown following the front matter.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl ContentItem {
    /// Minimal record with just a title and slug.
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            summary: None,
            date: None,
            tags: Vec::new(),
            image: None,
            link: None,
            body: String::new(),
        }
    }

    /// Stable key for rendered lists.
    pub fn key(&self) -> &str {
        &self.slug
    }
}

/// Supplies the ordered records of a category.
///
/// Implementations resolve the whole collection up front; failures are
/// returned, never papered over with a partial list.
pub trait ContentSource {
    fn fetch(&self, category: Category) -> Result<Vec<ContentItem>, ContentError>;
}

// =============================================================================
// Filesystem source
// =============================================================================

/// Reads `<root>/<category>/*.md` entry files.
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for FsContentSource {
    fn fetch(&self, category: Category) -> Result<Vec<ContentItem>, ContentError> {
        let dir = self.root.join(category.dir_name());
        if !dir.is_dir() {
            return Err(ContentError::CategoryDirMissing {
                category,
                path: dir,
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if is_entry_file(entry.path()) {
                entries.push(read_entry(entry.path())?);
            }
        }

        let items = match category {
            Category::Portfolio => {
                let mut items: Vec<ContentItem> = entries.into_iter().map(|(_, i)| i).collect();
                newest_first(&mut items);
                items
            }
            Category::Certificate => {
                entries.sort_by_key(|(order, _)| order.unwrap_or(u32::MAX));
                entries.into_iter().map(|(_, i)| i).collect()
            }
        };
        ensure_unique_slugs(category, &items)?;

        tracing::debug!(%category, count = items.len(), dir = %dir.display(), "fetched content");
        Ok(items)
    }
}

fn is_entry_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    !hidden
        && path.is_file()
        && path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false)
}

/// Front matter keys. Everything is optional; see the module docs for fallbacks.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FrontMatter {
    title: Option<String>,
    slug: Option<String>,
    summary: Option<String>,
    date: Option<toml::value::Datetime>,
    tags: Vec<String>,
    image: Option<String>,
    link: Option<String>,
}

/// Parse one entry file, returning its `NNN-` order (if any) and the record.
fn read_entry(path: &Path) -> Result<(Option<u32>, ContentItem), ContentError> {
    let content = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let (order, name) = split_order_prefix(&stem);

    let (front, body) = split_front_matter(&content)
        .ok_or_else(|| ContentError::UnterminatedFrontMatter(path.to_path_buf()))?;
    let meta: FrontMatter = match front {
        Some(raw) => toml::from_str(raw).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?,
        None => FrontMatter::default(),
    };

    let title = meta
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| (!name.is_empty()).then(|| name.replace('-', " ")))
        .ok_or_else(|| ContentError::MissingTitle(path.to_path_buf()))?;
    let slug = meta
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(if name.is_empty() { &title } else { name }));

    Ok((
        order,
        ContentItem {
            title,
            slug,
            summary: meta.summary,
            date: meta.date.map(|d| entry_date(path, d)).transpose()?,
            tags: meta.tags,
            image: meta.image,
            link: meta.link,
            body: body.trim().to_string(),
        },
    ))
}

/// Accept only a bare local date such as `2023-04-02`.
fn entry_date(path: &Path, value: toml::value::Datetime) -> Result<NaiveDate, ContentError> {
    let invalid = || ContentError::InvalidDate {
        path: path.to_path_buf(),
        value: value.to_string(),
    };
    match (value.date, value.time, value.offset) {
        (Some(date), None, None) => {
            NaiveDate::from_ymd_opt(date.year.into(), date.month.into(), date.day.into())
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Split `+++`-fenced front matter from the body.
///
/// Returns `None` when an opening fence is never closed.
fn split_front_matter(content: &str) -> Option<(Option<&str>, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = content
        .strip_prefix("+++\n")
        .or_else(|| content.strip_prefix("+++\r\n"))
    else {
        return Some((None, content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "+++" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((Some(front), body));
        }
        offset += line.len();
    }
    None
}

/// Split an `NNN-name` stem into its number and name.
///
/// - `"010-folio"` → `(Some(10), "folio")`
/// - `"007"` → `(Some(7), "")`
/// - `"draft-notes"` → `(None, "draft-notes")`
fn split_order_prefix(stem: &str) -> (Option<u32>, &str) {
    if let Some((prefix, rest)) = stem.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return (Some(num), rest);
    }
    match stem.parse::<u32>() {
        Ok(num) => (Some(num), ""),
        Err(_) => (None, stem),
    }
}

/// Lowercase, with runs of non-alphanumerics collapsed to single dashes.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Sort newest first by date; undated entries go last. Stable.
pub fn newest_first(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.date.cmp(&a.date));
}

fn ensure_unique_slugs(category: Category, items: &[ContentItem]) -> Result<(), ContentError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.slug.as_str()) {
            return Err(ContentError::DuplicateSlug {
                slug: item.slug.clone(),
                category,
            });
        }
    }
    Ok(())
}

// =============================================================================
// In-memory source
// =============================================================================

/// Serves collections held in memory, in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    collections: HashMap<Category, Vec<ContentItem>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Category, items: Vec<ContentItem>) -> Self {
        self.collections.insert(category, items);
        self
    }
}

impl ContentSource for StaticSource {
    fn fetch(&self, category: Category) -> Result<Vec<ContentItem>, ContentError> {
        let items = self
            .collections
            .get(&category)
            .ok_or(ContentError::CategoryMissing(category))?;
        ensure_unique_slugs(category, items)?;
        Ok(items.clone())
    }
}
