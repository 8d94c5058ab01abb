//! Link-set reconciliation.

use rustc_hash::FxHashSet;

use crate::domain::offerings::records::OfferingUuid;

/// Links written by a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkChanges {
    pub inserted: Vec<OfferingUuid>,
    pub deleted: Vec<OfferingUuid>,
}

impl LinkChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty()
    }
}

/// Compute the writes that turn `existing` into exactly `target`.
///
/// Repeated ids in `target` collapse. Links already present are left alone,
/// so planning against the result of a previous plan yields no writes.
#[must_use]
pub fn plan_reconciliation(existing: &[OfferingUuid], target: &[OfferingUuid]) -> LinkChanges {
    let mut pending: FxHashSet<OfferingUuid> = target.iter().copied().collect();

    let deleted = existing
        .iter()
        .copied()
        .filter(|offering| !pending.remove(offering))
        .collect();

    let inserted = target
        .iter()
        .copied()
        .filter(|offering| pending.remove(offering))
        .collect();

    LinkChanges { inserted, deleted }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_only_what_differs() {
        let chess = OfferingUuid::new();
        let tennis = OfferingUuid::new();
        let football = OfferingUuid::new();

        let changes = plan_reconciliation(&[chess, tennis], &[football, chess]);

        assert_eq!(changes.inserted, vec![football]);
        assert_eq!(changes.deleted, vec![tennis]);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let chess = OfferingUuid::new();
        let tennis = OfferingUuid::new();

        let target = [chess, tennis];
        let first = plan_reconciliation(&[], &target);

        assert_eq!(first.inserted, vec![chess, tennis]);

        let second = plan_reconciliation(&first.inserted, &target);

        assert!(second.is_empty());
    }

    #[test]
    fn empty_target_removes_everything() {
        let chess = OfferingUuid::new();
        let tennis = OfferingUuid::new();

        let changes = plan_reconciliation(&[chess, tennis], &[]);

        assert!(changes.inserted.is_empty());
        assert_eq!(changes.deleted, vec![chess, tennis]);
    }

    #[test]
    fn duplicate_targets_collapse() {
        let chess = OfferingUuid::new();

        let changes = plan_reconciliation(&[], &[chess, chess, chess]);

        assert_eq!(changes.inserted, vec![chess]);
        assert!(changes.deleted.is_empty());

        let changes = plan_reconciliation(&[chess], &[chess, chess]);

        assert!(changes.is_empty());
    }
}
