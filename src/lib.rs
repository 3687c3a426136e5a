//! # Folio
//!
//! The content core of a personal portfolio site: a portfolio listing with an
//! incremental search box, and a certificate gallery with a lightbox viewer.
//!
//! # Architecture
//!
//! ```text
//! ContentSource ──▶ SearchEngine ──▶ view (search section)
//!       │
//!       └────────▶ view (thumbnails) ──click──▶ GalleryNavigator ──▶ view (lightbox)
//! ```
//!
//! Content is fetched once per load and never mutated. The search engine and
//! the gallery navigator hold the only mutable state, both driven by discrete
//! user events. Rendering is stateless.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | `ContentItem`, categories, filesystem and in-memory sources |
//! | [`search`] | Incremental filtering with deferred, last-write-wins passes |
//! | [`gallery`] | Lightbox state machine with wraparound and a shared scroll lock |
//! | [`view`] | Maud fragments for search results, thumbnails and the lightbox |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | stderr tracing subscriber |
//!
//! # Design Decisions
//!
//! ## Sequence Numbers Instead of Cancellation
//!
//! Deferred filter passes run on rayon and cannot be interrupted. Each pass
//! carries the sequence number of the query that issued it; the engine only
//! applies a result whose number is the latest issued. A burst of keystrokes
//! therefore costs some wasted work but never shows stale results.
//!
//! ## Scroll Lock Tied to Transitions
//!
//! The lock is taken on Closed→Open and given back on Open→Closed, not per
//! `open()` call. Re-targeting an already open lightbox cannot stack locks,
//! and a single close always frees the page.
//!
//! ## Missing Content Is an Error
//!
//! A category directory that does not exist, an unreadable file or a
//! duplicate slug fails the fetch. An empty list only ever means an empty
//! directory.

pub mod config;
pub mod content;
pub mod gallery;
pub mod logging;
pub mod output;
pub mod search;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
