#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{member, Member};
use moredata_core::diff::{compute_changes, ChangeEvent};
use proptest::prelude::*;

fn people(ids: &[&str]) -> Vec<Member> {
    ids.iter().map(|id| member(id, &id.to_uppercase(), 30)).collect()
}

#[test]
fn test_remove_head_append_tail() {
    let prev = people(&["a", "b", "c"]);
    let next = people(&["b", "c", "d"]);
    let batch = compute_changes(&prev, &next);
    assert_eq!(
        batch.events(),
        &[
            ChangeEvent::Removed {
                index: 0,
                item: prev[0].clone()
            },
            ChangeEvent::Inserted {
                index: 2,
                item: next[2].clone()
            },
        ]
    );
}

#[test]
fn test_identical_snapshots_yield_empty_batch() {
    let prev = people(&["a", "b"]);
    assert!(compute_changes(&prev, &prev.clone()).is_empty());
    assert!(compute_changes::<Member>(&[], &[]).is_empty());
}

#[test]
fn test_content_change_in_place_is_update() {
    let prev = people(&["a", "b"]);
    let mut next = prev.clone();
    next[1].age = 31;
    let batch = compute_changes(&prev, &next);
    assert_eq!(
        batch.events(),
        &[ChangeEvent::Updated {
            index: 1,
            item: next[1].clone()
        }]
    );
}

#[test]
fn test_swap_is_single_move() {
    let prev = people(&["a", "b", "c"]);
    let next = people(&["c", "a", "b"]);
    let batch = compute_changes(&prev, &next);
    let moves: Vec<_> = batch.moves().map(|(f, t, m)| (f, t, m.id.to_string())).collect();
    assert_eq!(moves, vec![(2, 0, "c".to_string())]);
    assert_eq!(batch.len(), 1);
}

#[test]
fn test_moved_record_carries_new_contents() {
    let prev = people(&["a", "b"]);
    let mut next = people(&["b", "a"]);
    next[1].name = "Renamed".into();
    let batch = compute_changes(&prev, &next);
    assert_eq!(batch.apply(&prev), next);
    assert_eq!(batch.updates().count() + batch.moves().count(), batch.len());
}

#[test]
fn test_reordered_changed_record_moves_and_unchanged_neighbour_stays() {
    // Sorted by age descending: c's age jumps past a and b
    let prev = vec![member("a", "A", 40), member("b", "B", 30), member("c", "C", 20)];
    let next = vec![member("c", "C", 50), member("a", "A", 40), member("b", "B", 30)];
    let batch = compute_changes(&prev, &next);
    assert_eq!(
        batch.events(),
        &[ChangeEvent::Moved {
            from: 2,
            to: 0,
            item: next[0].clone()
        }]
    );

    // Two-record swap: the changed record moves even though either could
    let prev = vec![member("b", "B", 40), member("a", "A", 20)];
    let next = vec![member("a", "A", 50), member("b", "B", 40)];
    let batch = compute_changes(&prev, &next);
    let moved: Vec<_> = batch.moves().map(|(f, t, m)| (f, t, m.id.to_string())).collect();
    assert_eq!(moved, vec![(1, 0, "a".to_string())]);
    assert_eq!(batch.updates().count(), 0);
    assert_eq!(batch.apply(&prev), next);
}

#[test]
fn test_initial_batch_is_all_insertions() {
    let next = people(&["a", "b", "c"]);
    let batch = compute_changes(&[], &next);
    let indices: Vec<usize> = batch.insertions().map(|(i, _)| i).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

/// Length of the longest strictly increasing subsequence, quadratic
fn longest_run(values: &[usize]) -> usize {
    let mut best = vec![1; values.len()];
    for i in 0..values.len() {
        for j in 0..i {
            if values[j] < values[i] {
                best[i] = best[i].max(best[j] + 1);
            }
        }
    }
    best.into_iter().max().unwrap_or(0)
}

fn arb_snapshot() -> impl Strategy<Value = Vec<Member>> {
    // Unique ids drawn from a small pool so snapshots overlap heavily
    prop::sample::subsequence((0..12).collect::<Vec<u32>>(), 0..12)
        .prop_shuffle()
        .prop_flat_map(|ids| {
            let len = ids.len();
            (Just(ids), prop::collection::vec(0i64..3, len))
        })
        .prop_map(|(ids, ages)| {
            ids.into_iter()
                .zip(ages)
                .map(|(id, age)| member(&id.to_string(), "M", age))
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_apply_reconstructs_next(prev in arb_snapshot(), next in arb_snapshot()) {
        let batch = compute_changes(&prev, &next);
        prop_assert_eq!(batch.apply(&prev), next);
    }

    #[test]
    fn prop_unchanged_records_move_only_when_unavoidable(prev in arb_snapshot(), next in arb_snapshot()) {
        let batch = compute_changes(&prev, &next);
        let unchanged_moves = batch
            .moves()
            .filter(|(from, _, item)| &prev[*from] == *item)
            .count();

        // New positions of unchanged survivors, in previous order
        let targets: Vec<usize> = prev
            .iter()
            .filter_map(|p| next.iter().position(|n| n == p))
            .collect();
        prop_assert_eq!(unchanged_moves, targets.len() - longest_run(&targets));
    }

    #[test]
    fn prop_self_diff_is_empty(snapshot in arb_snapshot()) {
        prop_assert!(compute_changes(&snapshot, &snapshot).is_empty());
    }
}
