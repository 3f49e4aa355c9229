//! End-to-end walks through the snapshot paginator.

use std::sync::Arc;
use std::time::Duration;

use folio_core::{CursorCodec, ElementKey, PaginationConfig};
use folio_pagination::{Page, PageRequest, SnapshotPaginator};
use folio_storage::{InMemorySnapshotStore, LmdbSnapshotStore, SnapshotStore};
use folio_test_utils::assertions::{
    assert_invalid_cursor, assert_no_duplicates, assert_shape_mismatch, assert_source_error,
};
use folio_test_utils::fixtures::{alphabet, forged_token, pairs_config};
use folio_test_utils::generators::arb_distinct_keys;
use folio_test_utils::{InMemoryCollection, OffsetCursor, Record};
use proptest::prelude::*;

fn paginator(config: PaginationConfig) -> (SnapshotPaginator, Arc<InMemorySnapshotStore>) {
    let store = Arc::new(InMemorySnapshotStore::new());
    (SnapshotPaginator::new(store.clone(), config), store)
}

fn follow(token: &Option<String>) -> PageRequest {
    PageRequest::first().with_cursor(token.clone().expect("cursor should be present"))
}

async fn walk_forward(
    paginator: &SnapshotPaginator,
    source: &InMemoryCollection,
    first: PageRequest,
) -> Vec<Page<String>> {
    let mut pages = vec![paginator.paginate(&first, source).await.unwrap()];
    while let Some(next) = pages.last().and_then(|p| p.next.clone()) {
        let request = PageRequest::first().with_cursor(next);
        pages.push(paginator.paginate(&request, source).await.unwrap());
    }
    pages
}

#[tokio::test]
async fn test_five_elements_page_size_two() {
    let (paginator, _store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();
    assert_eq!(page1.results, vec!["a", "b"]);
    assert!(page1.previous.is_none());

    let page2 = paginator.paginate(&follow(&page1.next), &items).await.unwrap();
    assert_eq!(page2.results, vec!["c", "d"]);

    let page3 = paginator.paginate(&follow(&page2.next), &items).await.unwrap();
    assert_eq!(page3.results, vec!["e"]);
    assert!(page3.next.is_none());

    let back2 = paginator.paginate(&follow(&page3.previous), &items).await.unwrap();
    assert_eq!(back2.results, vec!["c", "d"]);
    let back1 = paginator.paginate(&follow(&back2.previous), &items).await.unwrap();
    assert_eq!(back1.results, vec!["a", "b"]);
    assert!(back1.previous.is_none());
}

#[tokio::test]
async fn test_walk_stable_under_reorder_and_insert() {
    let (paginator, store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();

    // Live order changes completely between page 1 and page 3.
    items.reverse();
    items.insert(0, Record::new("new", "new"));
    items.push(Record::new("tail", "tail"));

    let page2 = paginator.paginate(&follow(&page1.next), &items).await.unwrap();
    let page3 = paginator.paginate(&follow(&page2.next), &items).await.unwrap();
    assert_eq!(page2.results, vec!["c", "d"]);
    assert_eq!(page3.results, vec!["e"]);
    assert!(page3.next.is_none());

    let back2 = paginator.paginate(&follow(&page3.previous), &items).await.unwrap();
    let back1 = paginator.paginate(&follow(&back2.previous), &items).await.unwrap();
    assert_eq!(back2.results, vec!["c", "d"]);
    assert_eq!(back1.results, vec!["a", "b"]);

    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_deleted_elements_are_omitted() {
    let (paginator, _store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();
    items.remove(&ElementKey::from("c"));

    let page2 = paginator.paginate(&follow(&page1.next), &items).await.unwrap();
    assert_eq!(page2.results, vec!["d"]);
    assert!(page2.next.is_some(), "short page must still link onward");

    let page3 = paginator.paginate(&follow(&page2.next), &items).await.unwrap();
    assert_eq!(page3.results, vec!["e"]);
}

#[tokio::test]
async fn test_cursor_key_deleted_from_live_data_still_resolves_page() {
    let (paginator, _store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();
    // "c" is the key page 2's cursor points at; the snapshot still has it.
    items.remove(&ElementKey::from("c"));
    items.remove(&ElementKey::from("d"));

    let page2 = paginator.paginate(&follow(&page1.next), &items).await.unwrap();
    assert!(page2.results.is_empty());
    assert!(page2.previous.is_some());

    let page3 = paginator.paginate(&follow(&page2.next), &items).await.unwrap();
    assert_eq!(page3.results, vec!["e"]);
}

#[tokio::test]
async fn test_repeated_key_walk_ends() {
    let (paginator, store) = paginator(pairs_config());
    let items = InMemoryCollection::from_names(&["a", "b", "a", "c", "b"]);

    let pages = walk_forward(&paginator, &items, PageRequest::first()).await;

    let walked: Vec<String> = pages.iter().flat_map(|p| p.results.clone()).collect();
    assert_eq!(walked, vec!["a", "b", "c"]);
    assert_eq!(pages.len(), 2);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_collection() {
    let (paginator, _store) = paginator(pairs_config());
    let items = InMemoryCollection::default();

    let page = paginator.paginate(&PageRequest::first(), &items).await.unwrap();

    assert!(page.results.is_empty());
    assert!(page.next.is_none());
    assert!(page.previous.is_none());
}

#[tokio::test]
async fn test_page_size_clamped_to_max() {
    let (paginator, _store) = paginator(PaginationConfig::new(2, 3));
    let items = InMemoryCollection::numbered(7);

    let request = PageRequest::first().with_page_size(100);
    let pages = walk_forward(&paginator, &items, request).await;

    let sizes: Vec<usize> = pages.iter().map(|p| p.results.len()).collect();
    assert_eq!(sizes, vec![3, 3, 1]);
}

#[tokio::test]
async fn test_expired_snapshot_rebaselines_from_start() {
    let (paginator, store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();
    let page2 = paginator.paginate(&follow(&page1.next), &items).await.unwrap();

    store.clear().unwrap();
    items.reverse();

    let restarted = paginator.paginate(&follow(&page2.next), &items).await.unwrap();
    assert_eq!(restarted.results, vec!["e", "d"]);
    assert!(restarted.previous.is_none());
    assert_eq!(store.count().await.unwrap(), 1);

    // The new walk keeps the old page size and continues normally.
    let next = paginator.paginate(&follow(&restarted.next), &items).await.unwrap();
    assert_eq!(next.results, vec!["c", "b"]);
}

#[tokio::test]
async fn test_rebaseline_after_ttl_sweep() {
    let (paginator, store) = paginator(pairs_config());
    let items = alphabet();

    let page1 = paginator.paginate(&PageRequest::first(), &items).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let deleted = store
        .delete_older_than(Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let page = paginator.paginate(&follow(&page1.next), &items).await.unwrap();
    assert_eq!(page.results, vec!["a", "b"]);
}

#[tokio::test]
async fn test_rejects_offset_cursor() {
    let (paginator, _store) = paginator(pairs_config());
    let token = CursorCodec::encode(&OffsetCursor::new(2, 2).into());

    let result = paginator
        .paginate(&PageRequest::first().with_cursor(token), &alphabet())
        .await;
    assert_shape_mismatch(&result);
}

#[tokio::test]
async fn test_rejects_forged_cursor() {
    let (paginator, store) = paginator(pairs_config());

    let result = paginator
        .paginate(&PageRequest::first().with_cursor(forged_token()), &alphabet())
        .await;

    assert_invalid_cursor(&result);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_source_failure_propagates() {
    let (paginator, store) = paginator(pairs_config());
    let items = alphabet();
    items.set_unavailable(true);

    let result = paginator.paginate(&PageRequest::first(), &items).await;

    assert_source_error(&result);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_one_resolve_per_page() {
    let (paginator, _store) = paginator(pairs_config());
    let items = alphabet();

    let pages = walk_forward(&paginator, &items, PageRequest::first()).await;

    assert_eq!(pages.len(), 3);
    assert_eq!(items.resolve_calls(), 3);
}

#[tokio::test]
async fn test_links_carry_request_params() {
    let (paginator, _store) = paginator(pairs_config());

    let page = paginator
        .paginate(&PageRequest::first(), &alphabet())
        .await
        .unwrap()
        .into_links("https://api.test/items?q=cats");

    let next = page.next.expect("next link");
    assert!(next.starts_with("https://api.test/items?q=cats&cursor="));

    let query = next.split_once('?').map(|(_, q)| q).unwrap();
    let request = PageRequest::from_query(query);
    let second = paginator.paginate(&request, &alphabet()).await;
    assert_eq!(second.unwrap().results, vec!["c", "d"]);
}

#[tokio::test]
async fn test_walk_over_lmdb_store() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(LmdbSnapshotStore::new(temp_dir.path(), 10).unwrap());
    let paginator = SnapshotPaginator::new(store.clone(), pairs_config());
    let items = alphabet();

    let pages = walk_forward(&paginator, &items, PageRequest::first()).await;

    let all: Vec<String> = pages.into_iter().flat_map(|p| p.results).collect();
    assert_eq!(all, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(store.count().await.unwrap(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any reordering after the first page leaves the walk untouched.
    #[test]
    fn prop_walk_reproduces_snapshot_order(
        keys in arb_distinct_keys(40),
        page_size in 1usize..8,
        reorder_seed in any::<u64>(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let items = InMemoryCollection::new(
                keys.iter().map(|k| Record::new(k.clone(), k.to_string())).collect(),
            );
            let expected = items.names();
            let (paginator, _store) = paginator(PaginationConfig::new(page_size, 50));

            let mut pages = vec![paginator.paginate(&PageRequest::first(), &items).await.unwrap()];
            items.sort_by(|a, b| {
                let ha = a.name.len() as u64 ^ reorder_seed;
                let hb = b.name.len() as u64 ^ reorder_seed;
                ha.cmp(&hb).then_with(|| b.key.cmp(&a.key))
            });
            while let Some(next) = pages.last().and_then(|p| p.next.clone()) {
                let request = PageRequest::first().with_cursor(next);
                pages.push(paginator.paginate(&request, &items).await.unwrap());
            }

            let walked: Vec<String> = pages.iter().flat_map(|p| p.results.clone()).collect();
            assert_no_duplicates(&walked);
            assert_eq!(walked, expected);
            for page in &pages[..pages.len() - 1] {
                assert_eq!(page.results.len(), page_size);
            }
        });
    }
}
