//! Change computation.
//!
//! The core entry point is [`compute_changes`], which accepts two ordered
//! snapshots and produces a [`ChangeBatch`].

use moredata_core_types::EntityId;
use std::collections::HashMap;

use crate::diff::model::{ChangeBatch, ChangeEvent};
use crate::model::Record;

/// Compute the change batch that turns `previous` into `next`
///
/// Records are matched by id; ids are expected to be unique within each
/// snapshot. Among records present in both, the ones left in place form the
/// heaviest order-preserving subsequence, where every unchanged record
/// outweighs all changed ones together. A changed record therefore stays in
/// place (`Updated`) only when keeping it displaces no unchanged record;
/// a record whose change reordered it is `Moved` and carries its new contents.
pub fn compute_changes<E>(previous: &[E], next: &[E]) -> ChangeBatch<E>
where
    E: Record + PartialEq,
{
    let prev_index = index_by_id(previous);
    let next_index = index_by_id(next);

    let mut events = Vec::new();

    // 1. Removals, ascending previous index
    for (i, item) in previous.iter().enumerate() {
        if !next_index.contains_key(&item.entity_id()) {
            events.push(ChangeEvent::Removed {
                index: i,
                item: item.clone(),
            });
        }
    }

    // 2. Insertions, ascending new index
    for (j, item) in next.iter().enumerate() {
        if !prev_index.contains_key(&item.entity_id()) {
            events.push(ChangeEvent::Inserted {
                index: j,
                item: item.clone(),
            });
        }
    }

    // 3. Survivors as (previous index, new index) in previous order
    let survivors: Vec<(usize, usize)> = previous
        .iter()
        .enumerate()
        .filter_map(|(i, item)| next_index.get(&item.entity_id()).map(|&j| (i, j)))
        .collect();
    let unchanged_weight = survivors.len() as u64 + 1;
    let weighted: Vec<(usize, u64)> = survivors
        .iter()
        .map(|&(i, j)| {
            let weight = if previous[i] == next[j] {
                unchanged_weight
            } else {
                1
            };
            (j, weight)
        })
        .collect();
    let mut stable = vec![false; survivors.len()];
    for k in heaviest_increasing_subsequence(&weighted, next.len()) {
        stable[k] = true;
    }

    // 4. Moves, then in-place updates
    let mut updates = Vec::new();
    for (k, &(i, j)) in survivors.iter().enumerate() {
        if !stable[k] {
            events.push(ChangeEvent::Moved {
                from: i,
                to: j,
                item: next[j].clone(),
            });
        } else if previous[i] != next[j] {
            updates.push(ChangeEvent::Updated {
                index: i,
                item: next[j].clone(),
            });
        }
    }
    events.extend(updates);

    ChangeBatch::new(events)
}

fn index_by_id<E: Record>(records: &[E]) -> HashMap<EntityId, usize> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.entity_id(), i))
        .collect()
}

/// Positions in `seq` forming a strictly increasing subsequence of values
/// with the greatest total weight
///
/// `seq` holds `(value, weight)` pairs with distinct values below `bound`.
/// A Fenwick tree over values keeps the best chain ending below each value,
/// O(n log bound).
fn heaviest_increasing_subsequence(seq: &[(usize, u64)], bound: usize) -> Vec<usize> {
    // tree[v] = best (total weight, ending position) among chains ending in its range
    let mut tree: Vec<Option<(u64, usize)>> = vec![None; bound + 1];
    let mut predecessor: Vec<Option<usize>> = vec![None; seq.len()];
    let mut best: Option<(u64, usize)> = None;

    let better = |a: Option<(u64, usize)>, b: Option<(u64, usize)>| match (a, b) {
        (Some(x), Some(y)) if y.0 > x.0 => Some(y),
        (None, b) => b,
        (a, _) => a,
    };

    for (pos, &(value, weight)) in seq.iter().enumerate() {
        // Best chain over values strictly below `value`
        let mut prefix = None;
        let mut i = value;
        while i > 0 {
            prefix = better(prefix, tree[i]);
            i -= i & i.wrapping_neg();
        }

        predecessor[pos] = prefix.map(|(_, p)| p);
        let entry = Some((prefix.map_or(0, |(w, _)| w) + weight, pos));
        best = better(best, entry);

        let mut i = value + 1;
        while i <= bound {
            tree[i] = better(tree[i], entry);
            i += i & i.wrapping_neg();
        }
    }

    let mut out = Vec::new();
    let mut cursor = best.map(|(_, pos)| pos);
    while let Some(pos) = cursor {
        out.push(pos);
        cursor = predecessor[pos];
    }
    out.reverse();
    out
}
