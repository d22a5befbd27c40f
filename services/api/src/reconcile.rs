//! Assignment reconciliation
//!
//! Computes the set difference between the currently assigned ids and a
//! desired id set. Applying the result twice with the same desired set is
//! a no-op the second time.

use std::collections::HashSet;
use uuid::Uuid;

/// Additions and removals needed to turn `current` into `desired`
#[derive(Debug, PartialEq, Eq)]
pub struct Reconciliation {
    pub to_add: Vec<Uuid>,
    pub to_remove: Vec<Uuid>,
}

/// Diff the current assignment set against the desired one.
///
/// Duplicates in either input collapse; ordering of the output follows the
/// input ordering so inserts stay deterministic.
pub fn diff(current: &[Uuid], desired: &[Uuid]) -> Reconciliation {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let desired_set: HashSet<Uuid> = desired.iter().copied().collect();

    let mut seen = HashSet::new();
    let to_add = desired
        .iter()
        .copied()
        .filter(|id| !current_set.contains(id) && seen.insert(*id))
        .collect();

    let mut seen = HashSet::new();
    let to_remove = current
        .iter()
        .copied()
        .filter(|id| !desired_set.contains(id) && seen.insert(*id))
        .collect();

    Reconciliation { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn identical_sets_produce_no_changes() {
        let current = ids(3);
        let result = diff(&current, &current);
        assert!(result.to_add.is_empty());
        assert!(result.to_remove.is_empty());
    }

    #[test]
    fn disjoint_sets_swap_everything() {
        let current = ids(2);
        let desired = ids(3);
        let result = diff(&current, &desired);
        assert_eq!(result.to_add, desired);
        assert_eq!(result.to_remove, current);
    }

    #[test]
    fn overlapping_sets_keep_the_intersection() {
        let [s1, s2, s3] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        // assigned to [s1, s2], re-assigning to [s2, s3]
        let result = diff(&[s1, s2], &[s2, s3]);
        assert_eq!(result.to_add, vec![s3]);
        assert_eq!(result.to_remove, vec![s1]);
    }

    #[test]
    fn empty_desired_removes_all() {
        let current = ids(4);
        let result = diff(&current, &[]);
        assert!(result.to_add.is_empty());
        assert_eq!(result.to_remove.len(), 4);
    }

    #[test]
    fn duplicates_in_desired_collapse() {
        let id = Uuid::new_v4();
        let result = diff(&[], &[id, id, id]);
        assert_eq!(result.to_add, vec![id]);
    }

    #[test]
    fn reapplying_the_diff_is_idempotent() {
        let current = ids(2);
        let desired = ids(2);

        let first = diff(&current, &desired);
        // simulate applying the diff, then diff again
        let applied: Vec<Uuid> = desired.clone();
        let second = diff(&applied, &desired);

        assert_eq!(first.to_add.len(), 2);
        assert!(second.to_add.is_empty());
        assert!(second.to_remove.is_empty());
    }
}
