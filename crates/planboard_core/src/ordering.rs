//! Position planning for task reorder.
//!
//! # Responsibility
//! - Turn a client-submitted order snapshot into the full final order of a
//!   list, without touching storage.
//!
//! # Invariants
//! - The result is a permutation of the current members: nothing is added,
//!   nothing is lost.
//! - Requested ids keep the requested order; ids that are not members are
//!   skipped; a repeated id counts once, at its first occurrence.
//! - Members missing from the request follow, in their previous order.

use std::collections::HashSet;
use std::hash::Hash;

/// Final order computed for one reorder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOrder<T> {
    /// Every current member, in its new read order.
    pub order: Vec<T>,
    /// How many leading entries of `order` came from the request.
    pub supplied: usize,
    /// Requested ids skipped as unknown or repeated.
    pub ignored: usize,
}

impl<T> PlannedOrder<T> {
    /// Members that were missing from the request and were carried over.
    pub fn carried_over(&self) -> usize {
        self.order.len() - self.supplied
    }
}

/// Computes the final order of `current` after applying `requested`.
///
/// `current` must be the members in their present read order.
pub fn plan_order<T>(current: &[T], requested: &[T]) -> PlannedOrder<T>
where
    T: Copy + Eq + Hash,
{
    let members: HashSet<T> = current.iter().copied().collect();
    let mut placed = HashSet::with_capacity(current.len());
    let mut order = Vec::with_capacity(current.len());
    let mut ignored = 0;

    for id in requested {
        if members.contains(id) && placed.insert(*id) {
            order.push(*id);
        } else {
            ignored += 1;
        }
    }
    let supplied = order.len();

    order.extend(current.iter().copied().filter(|id| !placed.contains(id)));

    PlannedOrder {
        order,
        supplied,
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::plan_order;

    #[test]
    fn full_snapshot_replaces_order() {
        let plan = plan_order(&['a', 'b', 'c'], &['c', 'b', 'a']);
        assert_eq!(plan.order, vec!['c', 'b', 'a']);
        assert_eq!(plan.supplied, 3);
        assert_eq!(plan.ignored, 0);
        assert_eq!(plan.carried_over(), 0);
    }

    #[test]
    fn omitted_members_follow_in_previous_order() {
        let plan = plan_order(&['a', 'b', 'c', 'd'], &['c', 'a']);
        assert_eq!(plan.order, vec!['c', 'a', 'b', 'd']);
        assert_eq!(plan.carried_over(), 2);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let with_ghost = plan_order(&['a', 'b', 'c'], &['a', 'x', 'b']);
        let without = plan_order(&['a', 'b', 'c'], &['a', 'b']);
        assert_eq!(with_ghost.order, without.order);
        assert_eq!(with_ghost.ignored, 1);
    }

    #[test]
    fn repeated_id_keeps_first_occurrence() {
        let plan = plan_order(&['a', 'b', 'c'], &['b', 'a', 'b']);
        assert_eq!(plan.order, vec!['b', 'a', 'c']);
        assert_eq!(plan.ignored, 1);
    }

    #[test]
    fn empty_request_keeps_current_order() {
        let plan = plan_order(&['a', 'b'], &[]);
        assert_eq!(plan.order, vec!['a', 'b']);
        assert_eq!(plan.supplied, 0);
    }

    #[test]
    fn empty_list_ignores_everything() {
        let plan = plan_order::<char>(&[], &['a']);
        assert!(plan.order.is_empty());
        assert_eq!(plan.ignored, 1);
    }
}
