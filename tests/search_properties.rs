//! Property-based tests for incremental search.
//!
//! Tests validate:
//! 1. Filtered results are an order-preserving subsequence of the source
//! 2. The empty query shows everything; a non-matching query shows nothing
//! 3. Filtering is idempotent
//! 4. Deferred passes produce the same result as inline filtering
//! 5. Only the latest query's pass is ever applied

use folio::content::ContentItem;
use folio::search::{MatchField, MatchPolicy, SearchEngine, SearchView, filter, filter_indices};
use proptest::prelude::*;

fn titled(titles: &[String]) -> Vec<ContentItem> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| ContentItem::new(t.clone(), format!("item-{i}")))
        .collect()
}

fn titles_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-cA-C ]{0,8}", 0..40)
}

fn query_strategy() -> impl Strategy<Value = String> {
    "[a-cA-C]{1,3}"
}

// ===== Property 1: Order-Preserving Subsequence =====

proptest! {
    #[test]
    fn filtered_indices_strictly_increase(titles in titles_strategy(), query in query_strategy()) {
        let items = titled(&titles);
        let indices = filter_indices(&items, &query, &MatchPolicy::title_only());
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(indices.iter().all(|&i| i < items.len()));
    }

    #[test]
    fn every_match_contains_query_case_insensitively(
        titles in titles_strategy(),
        query in query_strategy(),
    ) {
        let items = titled(&titles);
        let needle = query.to_lowercase();
        for item in filter(&items, &query, &MatchPolicy::title_only()) {
            prop_assert!(item.title.to_lowercase().contains(&needle));
        }
        let excluded = items
            .iter()
            .filter(|i| !i.title.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(
            filter(&items, &query, &MatchPolicy::title_only()).len() + excluded,
            items.len()
        );
    }
}

// ===== Property 2: Empty vs No-Match =====

proptest! {
    #[test]
    fn empty_query_is_unfiltered(titles in titles_strategy()) {
        let items = titled(&titles);
        let mut engine = SearchEngine::new(items.clone(), MatchPolicy::title_only(), usize::MAX);
        engine.set_query("");
        prop_assert_eq!(engine.view(), SearchView::Unfiltered(&items[..]));
        prop_assert_eq!(engine.filtered_result().len(), items.len());
    }

    #[test]
    fn query_outside_alphabet_matches_nothing(titles in titles_strategy()) {
        let items = titled(&titles);
        let mut engine = SearchEngine::new(items, MatchPolicy::title_only(), usize::MAX);
        engine.set_query("zz");
        prop_assert_eq!(engine.view(), SearchView::NoMatches);
        prop_assert!(engine.filtered_result().is_empty());
    }
}

// ===== Property 3: Idempotence =====

proptest! {
    #[test]
    fn filtering_twice_changes_nothing(titles in titles_strategy(), query in query_strategy()) {
        let items = titled(&titles);
        let policy = MatchPolicy::title_only();
        let once: Vec<ContentItem> = filter(&items, &query, &policy).into_iter().cloned().collect();
        let twice: Vec<ContentItem> = filter(&once, &query, &policy).into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
    }
}

// ===== Property 4: Deferred Equals Inline =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deferred_pass_matches_inline(titles in titles_strategy(), query in query_strategy()) {
        let items = titled(&titles);

        let mut inline = SearchEngine::new(items.clone(), MatchPolicy::title_only(), usize::MAX);
        inline.set_query(query.as_str());

        let mut deferred = SearchEngine::new(items, MatchPolicy::title_only(), 1);
        deferred.set_query(query.as_str());
        deferred.wait();

        prop_assert!(!deferred.is_pending());
        prop_assert_eq!(inline.filtered_result(), deferred.filtered_result());
    }

    #[test]
    fn burst_of_queries_settles_on_the_last(
        titles in prop::collection::vec("[a-cA-C ]{0,8}", 1..40),
        queries in prop::collection::vec(query_strategy(), 1..6),
    ) {
        let items = titled(&titles);
        let mut engine = SearchEngine::new(items.clone(), MatchPolicy::title_only(), 1);
        for q in &queries {
            engine.set_query(q.as_str());
        }
        engine.wait();

        let last = queries.last().unwrap();
        let expected = filter(&items, last, &MatchPolicy::title_only());
        prop_assert_eq!(engine.query(), last.as_str());
        prop_assert_eq!(engine.filtered_result(), expected);
    }
}

// ===== Scenarios =====

#[test]
fn port_query_keeps_source_order() {
    let items = titled(&[
        "Portfolio A".to_string(),
        "Backend B".to_string(),
        "Portal C".to_string(),
    ]);
    let mut engine = SearchEngine::new(items, MatchPolicy::title_only(), usize::MAX);
    engine.set_query("port");

    let found: Vec<&str> = engine
        .filtered_result()
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(found, vec!["Portfolio A", "Portal C"]);
}

#[test]
fn summary_field_is_opt_in() {
    let mut item = ContentItem::new("Backend", "backend");
    item.summary = Some("Payment portal".to_string());
    let items = vec![item];

    assert!(filter(&items, "portal", &MatchPolicy::title_only()).is_empty());
    let policy = MatchPolicy::title_only().with(MatchField::Summary);
    assert_eq!(filter(&items, "portal", &policy).len(), 1);
}

#[test]
fn clearing_query_while_deferred_pass_runs_shows_everything() {
    let items = titled(&(0..200).map(|i| format!("entry {i}")).collect::<Vec<_>>());
    let mut engine = SearchEngine::new(items.clone(), MatchPolicy::title_only(), 1);

    engine.set_query("entry 1");
    engine.set_query("");
    assert!(!engine.is_pending());
    assert_eq!(engine.view(), SearchView::Unfiltered(&items[..]));

    // The late pass for "entry 1" must not override the cleared filter.
    std::thread::sleep(std::time::Duration::from_millis(50));
    engine.poll();
    assert_eq!(engine.filtered_result().len(), items.len());
}
