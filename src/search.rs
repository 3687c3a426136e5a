//! Incremental search over a content collection.
//!
//! [`SearchEngine`] owns the current query and the filtered view of a fixed
//! collection. Every [`set_query`](SearchEngine::set_query) issues a filter
//! pass tagged with a sequence number:
//!
//! - small collections (below the defer threshold) and the empty query are
//!   filtered inline and applied immediately;
//! - larger collections are filtered on the rayon pool and the result comes
//!   back over a channel. Until the pass for the latest sequence number
//!   arrives, the engine reports [`is_pending`](SearchEngine::is_pending).
//!
//! Results carrying an older sequence number are discarded when they arrive,
//! so a newer query always supersedes an outstanding one without needing to
//! cancel it.
//!
//! ## Matching
//!
//! Case-insensitive substring match. Both sides are folded with
//! [`str::to_lowercase`] (full Unicode lowercase mapping, no normalization),
//! so `"ÉCOLE"` matches `"école"` but a decomposed `"e\u{301}"` does not match
//! a precomposed `"é"`. The title is always matched; other fields are opt-in
//! through [`MatchPolicy`]. Whitespace is not trimmed. Results keep the source
//! order.
//!
//! ## Observable states
//!
//! [`SearchEngine::view`] folds the state into a [`SearchView`]:
//!
//! | query | pending | matches | view |
//! |-------|---------|---------|------|
//! | empty | –       | –       | `Unfiltered` (full list) |
//! | set   | yes     | –       | `Pending` |
//! | set   | no      | 0       | `NoMatches` |
//! | set   | no      | > 0     | `Matches` |

use crate::config::SearchConfig;
use crate::content::ContentItem;
use rayon::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// A field an item can be matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Summary,
    Tags,
}

impl FromStr for MatchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(MatchField::Title),
            "summary" => Ok(MatchField::Summary),
            "tags" => Ok(MatchField::Tags),
            other => Err(format!("unknown search field '{other}'")),
        }
    }
}

/// Anything the engine can filter.
pub trait Searchable {
    fn title(&self) -> &str;

    /// Text of a field, one entry per value. Title is handled separately.
    fn field_values(&self, _field: MatchField) -> Vec<&str> {
        Vec::new()
    }
}

impl Searchable for ContentItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn field_values(&self, field: MatchField) -> Vec<&str> {
        match field {
            MatchField::Title => vec![self.title.as_str()],
            MatchField::Summary => self.summary.as_deref().into_iter().collect(),
            MatchField::Tags => self.tags.iter().map(String::as_str).collect(),
        }
    }
}

impl Searchable for String {
    fn title(&self) -> &str {
        self
    }
}

/// Which fields besides the title a query is matched against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPolicy {
    extra: Vec<MatchField>,
}

impl MatchPolicy {
    pub fn title_only() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: MatchField) -> Self {
        if field != MatchField::Title && !self.extra.contains(&field) {
            self.extra.push(field);
        }
        self
    }

    /// Build from validated config. Unknown names are skipped.
    pub fn from_config(config: &SearchConfig) -> Self {
        config
            .fields
            .iter()
            .filter_map(|name| name.parse::<MatchField>().ok())
            .fold(Self::title_only(), Self::with)
    }

    pub fn fields(&self) -> impl Iterator<Item = MatchField> + '_ {
        std::iter::once(MatchField::Title).chain(self.extra.iter().copied())
    }
}

fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// A case-folded query ready to test items.
#[derive(Debug, Clone)]
pub struct Matcher<'p> {
    needle: String,
    policy: &'p MatchPolicy,
}

impl<'p> Matcher<'p> {
    pub fn new(query: &str, policy: &'p MatchPolicy) -> Self {
        Self {
            needle: fold_case(query),
            policy,
        }
    }

    pub fn is_match<T: Searchable>(&self, item: &T) -> bool {
        if fold_case(item.title()).contains(&self.needle) {
            return true;
        }
        self.policy.extra.iter().any(|&field| {
            item.field_values(field)
                .into_iter()
                .any(|value| fold_case(value).contains(&self.needle))
        })
    }
}

/// Indices of the items matching `query`, in source order.
///
/// Pure: the same inputs always give the same output, and the empty query
/// matches everything.
pub fn filter_indices<T: Searchable>(items: &[T], query: &str, policy: &MatchPolicy) -> Vec<usize> {
    let matcher = Matcher::new(query, policy);
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matcher.is_match(*item))
        .map(|(idx, _)| idx)
        .collect()
}

/// Parallel variant of [`filter_indices`]; rayon's `collect` keeps the
/// source order.
fn par_filter_indices<T: Searchable + Sync>(
    items: &[T],
    query: &str,
    policy: &MatchPolicy,
) -> Vec<usize> {
    let matcher = Matcher::new(query, policy);
    items
        .par_iter()
        .enumerate()
        .filter(|(_, item)| matcher.is_match(*item))
        .map(|(idx, _)| idx)
        .collect()
}

/// The items matching `query`, in source order.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str, policy: &MatchPolicy) -> Vec<&'a T> {
    filter_indices(items, query, policy)
        .into_iter()
        .map(|idx| &items[idx])
        .collect()
}

/// What a caller should show for the current query.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchView<'a, T> {
    /// Query is empty: show the whole collection.
    Unfiltered(&'a [T]),
    /// A filter pass for the current query is still running.
    Pending,
    /// Filter active, nothing matched.
    NoMatches,
    /// Filter active, these items matched.
    Matches(Vec<&'a T>),
}

/// Result of one filter pass, tagged with the sequence number that issued it.
#[derive(Debug)]
struct FilterPass {
    seq: u64,
    indices: Vec<usize>,
}

/// Query state and filtered view over a fixed collection.
#[derive(Debug)]
pub struct SearchEngine<T> {
    items: Arc<[T]>,
    policy: Arc<MatchPolicy>,
    defer_threshold: usize,
    query: String,
    /// Sequence number of the most recently issued pass.
    issued: u64,
    /// Sequence number of the pass `matches` came from.
    applied: u64,
    matches: Vec<usize>,
    tx: Sender<FilterPass>,
    rx: Receiver<FilterPass>,
}

impl<T> SearchEngine<T>
where
    T: Searchable + Send + Sync + 'static,
{
    /// Engine over `items` with the empty query applied.
    pub fn new(items: impl Into<Arc<[T]>>, policy: MatchPolicy, defer_threshold: usize) -> Self {
        let items = items.into();
        let (tx, rx) = mpsc::channel();
        Self {
            matches: (0..items.len()).collect(),
            items,
            policy: Arc::new(policy),
            defer_threshold: defer_threshold.max(1),
            query: String::new(),
            issued: 0,
            applied: 0,
            tx,
            rx,
        }
    }

    /// Engine configured from the `[search]` config table.
    pub fn from_config(items: impl Into<Arc<[T]>>, config: &SearchConfig) -> Self {
        Self::new(items, MatchPolicy::from_config(config), config.defer_threshold)
    }

    /// Replace the query and issue a filter pass for it.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.issued += 1;
        let seq = self.issued;

        if self.query.is_empty() {
            self.matches = (0..self.items.len()).collect();
            self.applied = seq;
            tracing::debug!(seq, "filter cleared");
        } else if self.items.len() < self.defer_threshold {
            self.matches = filter_indices(&self.items, &self.query, &self.policy);
            self.applied = seq;
            tracing::debug!(seq, query = %self.query, matches = self.matches.len(), "filter applied inline");
        } else {
            let items = Arc::clone(&self.items);
            let policy = Arc::clone(&self.policy);
            let query = self.query.clone();
            let tx = self.tx.clone();
            tracing::debug!(seq, query = %self.query, items = items.len(), "filter deferred");
            rayon::spawn(move || {
                let indices = par_filter_indices(&items, &query, &policy);
                // A send error means the engine is gone and nobody wants the result.
                let _ = tx.send(FilterPass { seq, indices });
            });
        }
    }

    /// Apply any finished passes without blocking. Returns true if the
    /// visible result changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(pass) = self.rx.try_recv() {
            changed |= self.apply(pass);
        }
        changed
    }

    /// Block until the pass for the current query has been applied.
    pub fn wait(&mut self) {
        while self.is_pending() {
            match self.rx.recv() {
                Ok(pass) => {
                    self.apply(pass);
                }
                Err(_) => break,
            }
        }
    }

    fn apply(&mut self, pass: FilterPass) -> bool {
        if pass.seq != self.issued || pass.seq <= self.applied {
            tracing::debug!(seq = pass.seq, latest = self.issued, "stale filter pass discarded");
            return false;
        }
        self.applied = pass.seq;
        self.matches = pass.indices;
        tracing::debug!(seq = self.applied, matches = self.matches.len(), "filter applied");
        true
    }
}

impl<T> SearchEngine<T> {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True while the latest issued pass has not been applied.
    pub fn is_pending(&self) -> bool {
        self.applied != self.issued
    }

    /// Items from the most recently applied pass, in source order.
    ///
    /// While a pass is pending this still reflects the previous query.
    pub fn filtered_result(&self) -> Vec<&T> {
        self.matches.iter().map(|&idx| &self.items[idx]).collect()
    }

    pub fn view(&self) -> SearchView<'_, T> {
        if self.query.is_empty() {
            SearchView::Unfiltered(&self.items[..])
        } else if self.is_pending() {
            SearchView::Pending
        } else if self.matches.is_empty() {
            SearchView::NoMatches
        } else {
            SearchView::Matches(self.filtered_result())
        }
    }
}
