#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{ids, member, FlakyStore, Member, MemberFilter, MemberSort};
use moredata_core::errors::MoreDataError;
use moredata_core::logging_facility::test_capture::init_test_capture;
use moredata_core::store::MemoryStore;
use moredata_core::{ChangeEvent, EntityId, LiveResultSet, LiveState};
use moredata_core_types::schema::{EVENT_END, EVENT_END_ERROR};
use std::sync::mpsc::TryRecvError;

fn ann_and_bob() -> MemoryStore<Member> {
    MemoryStore::with_records(vec![member("1", "Ann", 20), member("2", "Bob", 40)])
}

#[test]
fn test_end_to_end_insert_after_start() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), Some(MemberFilter::MinimumAge(30)), None);

    let initial = live.start().unwrap();
    assert_eq!(ids(live.snapshot()), vec!["2"]);
    assert_eq!(initial.insertions().count(), 1);

    store.insert(member("3", "Cid", 50)).unwrap();
    let batch = live.process_changes().unwrap().expect("a batch");

    assert_eq!(
        batch.events(),
        &[ChangeEvent::Inserted {
            index: 1,
            item: member("3", "Cid", 50)
        }]
    );
    assert_eq!(ids(live.snapshot()), vec!["2", "3"]);
}

#[test]
fn test_sort_key_change_moves_the_changed_record() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), None, Some(MemberSort::Oldest));
    live.start().unwrap();
    assert_eq!(ids(live.snapshot()), vec!["2", "1"]);

    store.upsert(member("1", "Ann", 50)).unwrap();
    let batch = live.process_changes().unwrap().expect("a batch");

    assert_eq!(
        batch.events(),
        &[ChangeEvent::Moved {
            from: 1,
            to: 0,
            item: member("1", "Ann", 50)
        }]
    );
    assert_eq!(ids(live.snapshot()), vec!["1", "2"]);
}

#[test]
fn test_change_keeping_order_is_update_in_place() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), None, Some(MemberSort::Oldest));
    live.start().unwrap();

    store.upsert(member("1", "Ann", 30)).unwrap();
    let batch = live.process_changes().unwrap().expect("a batch");

    assert_eq!(
        batch.events(),
        &[ChangeEvent::Updated {
            index: 1,
            item: member("1", "Ann", 30)
        }]
    );
}

#[test]
fn test_subscribers_receive_batches() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), None, None);
    let rx = live.subscribe();

    live.start().unwrap();
    let initial = rx.try_recv().unwrap();
    assert_eq!(initial.len(), 2);

    store.remove(&EntityId::from("1")).unwrap();
    live.process_changes().unwrap();
    let removal = rx.try_recv().unwrap();
    assert_eq!(removal.removals().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_writes_outside_the_filter_publish_nothing() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), Some(MemberFilter::MinimumAge(30)), None);
    live.start().unwrap();
    let rx = live.subscribe();

    store.insert(member("3", "Dot", 10)).unwrap();
    let batch = live.process_changes().unwrap().expect("re-queried");
    assert!(batch.is_empty());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_process_changes_coalesces_notifications() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), None, None);
    live.start().unwrap();

    store.insert(member("3", "Cid", 50)).unwrap();
    store.insert(member("4", "Dee", 60)).unwrap();
    let batch = live.process_changes().unwrap().expect("a batch");
    assert_eq!(batch.insertions().count(), 2);
    assert!(live.process_changes().unwrap().is_none());
}

#[test]
fn test_same_filter_twice_yields_empty_batch() {
    let mut live = LiveResultSet::new(ann_and_bob(), None, None);
    live.start().unwrap();

    let first = live.set_filter(Some(MemberFilter::MinimumAge(30))).unwrap();
    assert_eq!(first.removals().count(), 1);
    let second = live.set_filter(Some(MemberFilter::MinimumAge(30))).unwrap();
    assert!(second.is_empty());
}

#[test]
fn test_set_sort_reorders_snapshot() {
    let mut live = LiveResultSet::new(ann_and_bob(), None, None);
    live.start().unwrap();
    let batch = live.set_sort(Some(MemberSort::Oldest)).unwrap();
    assert_eq!(batch.moves().count(), 1);
    assert_eq!(ids(live.snapshot()), vec!["2", "1"]);
    assert_eq!(live.sort(), Some(&MemberSort::Oldest));
}

#[test]
fn test_start_twice_is_already_active() {
    let mut live = LiveResultSet::new(ann_and_bob(), None, None);
    live.start().unwrap();
    assert_eq!(live.start().unwrap_err(), MoreDataError::AlreadyActive);
    assert_eq!(live.state(), LiveState::Active);
}

#[test]
fn test_disposed_result_set_is_inert() {
    let store = ann_and_bob();
    let mut live = LiveResultSet::new(store.clone(), None, None);
    live.start().unwrap();
    live.dispose();
    live.dispose();

    assert_eq!(live.state(), LiveState::Disposed);
    assert_eq!(live.start().unwrap_err(), MoreDataError::Disposed);
    assert!(live
        .set_filter(Some(MemberFilter::IsActive))
        .unwrap()
        .is_empty());
    assert_eq!(live.filter(), None);

    store.insert(member("3", "Cid", 50)).unwrap();
    assert!(live.process_changes().unwrap().is_none());
    assert_eq!(live.len(), 2);

    let rx = live.subscribe();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn test_dispose_closes_existing_subscriptions() {
    let mut live = LiveResultSet::new(ann_and_bob(), None, None);
    let rx = live.subscribe();
    live.start().unwrap();
    live.dispose();
    assert_eq!(rx.try_iter().count(), 1);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn test_query_error_disposes_and_keeps_last_snapshot() {
    let store = FlakyStore::new(ann_and_bob());
    let mut live = LiveResultSet::new(store.clone(), None, None);
    live.start().unwrap();

    store.fail_next_fetches(true);
    let err = live
        .set_filter(Some(MemberFilter::MinimumAge(30)))
        .unwrap_err();
    assert!(err.is_query_error());
    assert_eq!(live.state(), LiveState::Disposed);
    assert_eq!(ids(live.snapshot()), vec!["1", "2"]);

    store.fail_next_fetches(false);
    assert_eq!(live.start().unwrap_err(), MoreDataError::Disposed);
}

#[test]
fn test_failed_start_disposes() {
    let store = FlakyStore::new(ann_and_bob());
    store.fail_next_fetches(true);
    let mut live = LiveResultSet::new(store, None, None);
    assert!(live.start().is_err());
    assert_eq!(live.state(), LiveState::Disposed);
    assert!(live.is_empty());
}

#[test]
fn test_unsortable_sort_is_query_error() {
    let mut live = LiveResultSet::new(ann_and_bob(), None, Some(MemberSort::Tags));
    let err = live.start().unwrap_err();
    assert!(matches!(err, MoreDataError::UnsortableField { .. }));
    assert_eq!(live.state(), LiveState::Disposed);
}

#[test]
fn test_operations_are_logged() {
    let capture = init_test_capture();
    let mut live = LiveResultSet::new(ann_and_bob(), None, None);
    let id = live.id().to_string();
    live.start().unwrap();
    live.set_filter(Some(MemberFilter::MinimumAge(30))).unwrap();

    let events = capture.for_result_set(&id);
    let count = |op: &str, event: &str| events.iter().filter(|e| e.is(op, event)).count();
    assert_eq!(count("live_start", EVENT_END), 1);
    assert_eq!(count("live_set_filter", EVENT_END), 1);

    let end = events
        .iter()
        .find(|e| e.is("live_set_filter", EVENT_END))
        .unwrap();
    assert_eq!(end.field("batch_len"), Some("1"));
    assert_eq!(end.field("snapshot_len"), Some("1"));
}

#[test]
fn test_query_errors_are_logged_with_code() {
    let capture = init_test_capture();
    let store = FlakyStore::new(ann_and_bob());
    store.fail_next_fetches(true);
    let mut live = LiveResultSet::new(store, None, None);
    let id = live.id().to_string();
    assert!(live.start().is_err());

    let error = capture
        .for_result_set(&id)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .unwrap();
    assert_eq!(error.op.as_deref(), Some("live_start"));
    assert_eq!(error.field("err_code"), Some("ERR_QUERY_FAILED"));
}
