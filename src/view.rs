//! HTML fragments for search results and the certificate lightbox.
//!
//! These renderers are stateless: they take a [`SearchView`] or a
//! [`GalleryNavigator`] and return [Maud](https://maud.lambda.xyz/) markup.
//! Interpolation is auto-escaped; only markdown summaries go in pre-escaped,
//! after pulldown-cmark has rendered them.
//!
//! ## Search section
//!
//! ```text
//! query empty, list non-empty  → <section> "Personal {label}" + every card
//! query empty, list empty      → nothing
//! query set, pending           → <section> "Search {label}" + spinner
//! query set, no matches        → <section> "Search {label}" + empty result
//! query set, matches           → <section> "Search {label}" + matching cards
//! ```
//!
//! ## Lightbox
//!
//! Rendered only while the navigator is open. The previous and next images
//! are emitted as preload links so stepping through the gallery is instant.
//! [`document_class`] gives the `<html>` class that freezes page scrolling
//! while the scroll lock is held.
//!
//! ## Pages
//!
//! [`render_category_page`] builds the whole page for a category. A search
//! query only applies to the portfolio page and an open lightbox only to the
//! certificate page; asking for either on the other page is an error.

use crate::config::SearchConfig;
use crate::content::{Category, ContentItem};
use crate::gallery::{GalleryCommand, GalleryError, GalleryNavigator, ScrollLock};
use crate::search::{SearchEngine, SearchView};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("--{option} does not apply to the {category} page")]
    NotApplicable {
        option: &'static str,
        category: Category,
    },
    #[error("Cannot open the lightbox: {0}")]
    Gallery(#[from] GalleryError),
}

/// Class put on `<html>` while background scrolling is suppressed.
pub const SCROLL_LOCK_CLASS: &str = "overflow-hidden";

/// `<html>` class for the current scroll-lock state.
pub fn document_class(lock: &ScrollLock) -> Option<&'static str> {
    lock.is_locked().then_some(SCROLL_LOCK_CLASS)
}

/// Renders the base HTML document structure.
pub fn base_document(title: &str, html_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class=[html_class] {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(markdown));
    out
}

/// Renders a single content card.
pub fn render_card(item: &ContentItem) -> Markup {
    html! {
        article.card data-key=(item.key()) {
            @if let Some(image) = &item.image {
                img src=(image) alt=(item.title) loading="lazy";
            }
            h3 {
                @if let Some(link) = &item.link {
                    a href=(link) target="_blank" rel="noopener" { (item.title) }
                } @else {
                    (item.title)
                }
            }
            @if let Some(date) = item.date {
                time datetime=(date.to_string()) { (date.format("%B %Y").to_string()) }
            }
            @if let Some(summary) = &item.summary {
                div.card-summary { (PreEscaped(markdown_to_html(summary))) }
            }
            @if !item.tags.is_empty() {
                ul.tags {
                    @for tag in &item.tags {
                        li { (tag) }
                    }
                }
            }
            @if !item.body.is_empty() {
                details.card-details {
                    summary { "Details" }
                    (PreEscaped(markdown_to_html(&item.body)))
                }
            }
        }
    }
}

fn card_grid<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Markup {
    html! {
        div.card-grid {
            @for item in items {
                (render_card(item))
            }
        }
    }
}

/// Renders the list-or-results section for a search box.
pub fn render_search_section(label: &str, view: &SearchView<'_, ContentItem>) -> Markup {
    html! {
        @match view {
            SearchView::Unfiltered(items) => {
                @if !items.is_empty() {
                    section.listing {
                        h2 { "Personal " (label) }
                        (card_grid(items.iter()))
                    }
                }
            }
            SearchView::Pending => {
                section.search-results {
                    h2 { "Search " (label) }
                    div.spinner role="status" aria-busy="true" { "Loading…" }
                }
            }
            SearchView::NoMatches => {
                section.search-results {
                    h2 { "Search " (label) }
                    p.empty-result { "No results found" }
                }
            }
            SearchView::Matches(found) => {
                section.search-results {
                    h2 { "Search " (label) }
                    (card_grid(found.iter().copied()))
                }
            }
        }
    }
}

/// Renders the search input bound to the current query.
pub fn render_search_box(query: &str) -> Markup {
    html! {
        input.searchbar type="search" name="q" value=(query) placeholder="Search..." aria-label="Search";
    }
}

/// Renders the clickable certificate thumbnails.
///
/// Each figure carries its list index, the value handed to
/// [`GalleryNavigator::open`] on click.
pub fn render_certificate_grid(items: &[ContentItem]) -> Markup {
    html! {
        section.certificate-grid {
            @for (idx, item) in items.iter().enumerate() {
                figure data-key=(item.key()) data-index=(idx) {
                    @if let Some(image) = &item.image {
                        img src=(image) alt={ (item.title) " certificate" } title={ (item.title) " certificate" } loading="lazy";
                    }
                    figcaption { (item.title) }
                }
            }
        }
    }
}

/// Renders the lightbox overlay, or nothing while the navigator is closed.
pub fn render_lightbox(nav: &GalleryNavigator, items: &[ContentItem]) -> Markup {
    let Some(current) = nav.current(items) else {
        return html! {};
    };
    let (prev, next) = nav.neighbors();
    let position = format!("{} / {}", nav.current_index() + 1, nav.image_count());

    html! {
        div.lightbox role="dialog" aria-modal="true" aria-label=(current.title) {
            @for neighbor in [items.get(prev), items.get(next)].into_iter().flatten() {
                @if let Some(src) = &neighbor.image {
                    link rel="preload" as="image" href=(src);
                }
            }
            figure.lightbox-image {
                @if let Some(src) = &current.image {
                    img src=(src) alt={ (current.title) " certificate" };
                }
                figcaption {
                    span.lightbox-title { (current.title) }
                    span.lightbox-position { (position) }
                }
            }
            button.lightbox-prev type="button" data-action="prev" data-index=(prev) { "‹" }
            button.lightbox-next type="button" data-action="next" data-index=(next) { "›" }
            button.lightbox-close type="button" data-action="close" { "×" }
        }
    }
}

/// Full portfolio page: search box plus the search section.
pub fn render_portfolio_page(label: &str, query: &str, view: &SearchView<'_, ContentItem>) -> Markup {
    let content = html! {
        main.portfolio-page {
            h1 { (label) }
            (render_search_box(query))
            (render_search_section(label, view))
        }
    };
    base_document(label, None, content)
}

/// Full certificate page: thumbnail grid plus the lightbox when open.
pub fn render_certificate_page(
    label: &str,
    items: &[ContentItem],
    nav: Option<&GalleryNavigator>,
    lock: &ScrollLock,
) -> Markup {
    let content = html! {
        main.certificate-page {
            h1 { (label) }
            (render_certificate_grid(items))
            @if let Some(nav) = nav {
                (render_lightbox(nav, items))
            }
        }
    };
    base_document(label, document_class(lock), content)
}

/// Full page for `category`.
///
/// The portfolio page is filtered by `query`; the certificate page opens its
/// lightbox at `open`.
pub fn render_category_page(
    category: Category,
    items: Vec<ContentItem>,
    search: &SearchConfig,
    query: Option<&str>,
    open: Option<usize>,
) -> Result<Markup, RenderError> {
    match category {
        Category::Portfolio => {
            if open.is_some() {
                return Err(RenderError::NotApplicable {
                    option: "open",
                    category,
                });
            }
            let mut engine = SearchEngine::from_config(items, search);
            engine.set_query(query.unwrap_or_default());
            engine.wait();
            Ok(render_portfolio_page(
                category.label(),
                engine.query(),
                &engine.view(),
            ))
        }
        Category::Certificate => {
            if query.is_some() {
                return Err(RenderError::NotApplicable {
                    option: "query",
                    category,
                });
            }
            let lock = ScrollLock::new();
            let nav = match open {
                Some(index) => {
                    let mut nav = GalleryNavigator::new(items.len(), Rc::clone(&lock))?;
                    GalleryCommand::Open(index).apply(&mut nav)?;
                    Some(nav)
                }
                None => None,
            };
            Ok(render_certificate_page(
                category.label(),
                &items,
                nav.as_ref(),
                &lock,
            ))
        }
    }
}
