//! End-to-end checks over the fixture content: fetch, search, navigate, render.

use folio::config;
use folio::content::{Category, ContentSource, FsContentSource};
use folio::gallery::{GalleryCommand, GalleryNavigator, ScrollLock};
use folio::search::SearchEngine;
use folio::view;
use std::path::PathBuf;
use std::rc::Rc;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

#[test]
fn fixture_config_is_valid() {
    let config = config::load_config(&fixture_root()).unwrap();
    assert_eq!(config.search.fields, vec!["title", "summary", "tags"]);
    assert_eq!(config.search.defer_threshold, 64);
}

#[test]
fn portfolio_search_uses_configured_fields() {
    let root = fixture_root();
    let config = config::load_config(&root).unwrap();
    let items = FsContentSource::new(&root).fetch(Category::Portfolio).unwrap();

    let mut engine = SearchEngine::from_config(items, &config.search);
    engine.set_query("POSTGRES");
    engine.wait();
    let found: Vec<&str> = engine
        .filtered_result()
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(found, vec!["Backend Billing"]);

    engine.set_query("port");
    engine.wait();
    let found: Vec<&str> = engine
        .filtered_result()
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(found, vec!["Portfolio Site", "Portal Widgets"]);
}

#[test]
fn portfolio_page_shows_results_or_empty_message() {
    let root = fixture_root();
    let config = config::load_config(&root).unwrap();
    let items = FsContentSource::new(&root).fetch(Category::Portfolio).unwrap();
    let mut engine = SearchEngine::from_config(items, &config.search);

    engine.set_query("widgets");
    let html = view::render_portfolio_page("Portfolio", engine.query(), &engine.view()).into_string();
    assert!(html.contains("Search Portfolio"));
    assert!(html.contains("data-key=\"portal-widgets\""));
    assert!(!html.contains("Backend Billing"));

    engine.set_query("nothing like this");
    let html = view::render_portfolio_page("Portfolio", engine.query(), &engine.view()).into_string();
    assert!(html.contains("No results found"));
}

#[test]
fn rendered_portfolio_page_includes_entry_bodies() {
    let root = fixture_root();
    let config = config::load_config(&root).unwrap();
    let items = FsContentSource::new(&root).fetch(Category::Portfolio).unwrap();

    let html = view::render_category_page(Category::Portfolio, items, &config.search, None, None)
        .unwrap()
        .into_string();
    assert!(html.contains("Personal Portfolio"));
    assert!(html.contains("Built as a static site."));
    assert!(html.contains("<strong>idempotent</strong>"));
}

#[test]
fn certificate_page_locks_scroll_while_lightbox_open() {
    let root = fixture_root();
    let items = FsContentSource::new(&root).fetch(Category::Certificate).unwrap();
    let lock = ScrollLock::new();
    let mut nav = GalleryNavigator::new(items.len(), Rc::clone(&lock)).unwrap();

    for command in ["open:2", "next"] {
        command.parse::<GalleryCommand>().unwrap().apply(&mut nav).unwrap();
    }
    assert_eq!(nav.current(&items).unwrap().title, "Rust Fundamentals");

    let html = view::render_certificate_page("Certificate", &items, Some(&nav), &lock).into_string();
    assert!(html.contains(view::SCROLL_LOCK_CLASS));
    assert!(html.contains("1 / 3"));

    nav.close();
    let html = view::render_certificate_page("Certificate", &items, Some(&nav), &lock).into_string();
    assert!(!html.contains(view::SCROLL_LOCK_CLASS));
    assert!(!html.contains("lightbox-image"));
}
