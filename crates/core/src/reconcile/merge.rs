//! Combining and reducing per-item selections.
//!
//! Both operations are count-based: they never look at a slot's `checked`
//! flag, and both renumber touched selections so indices stay `0..len`.

use super::selection::ItemSelections;

/// Merge two selection sets.
///
/// Items on one side only are carried over unchanged. Items on both sides
/// get `a`'s slots followed by `b`'s, renumbered. Per item, the unit count of
/// the result is the sum of both sides.
#[must_use]
pub fn combine(a: &ItemSelections, b: &ItemSelections) -> ItemSelections {
    let mut combined = a.clone();

    for entry in b {
        match combined.get_mut(entry.item_id) {
            Some(existing) => {
                existing.selection.extend_from_slice(&entry.selection);
                existing.renumber();
            }
            None => combined.insert(entry.clone()),
        }
    }

    combined
}

/// Subtract `to_remove` from `base` by count.
///
/// For each item in both, drops the first `min(len(to_remove), len(base))`
/// slots of `base` by position and renumbers what is left. Items only in
/// `base` are unchanged. Items only in `to_remove` are carried into the
/// result as they are, so a refunded or allocated item the base no longer
/// tracks is still visible.
#[must_use]
pub fn reduce(base: &ItemSelections, to_remove: &ItemSelections) -> ItemSelections {
    let mut reduced: ItemSelections = base
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if let Some(removal) = to_remove.get(entry.item_id) {
                let n = removal.len().min(entry.len());
                entry.selection = entry.selection.split_off(n);
                entry.renumber();
            }
            entry
        })
        .collect();

    for entry in to_remove {
        if !base.contains(entry.item_id) {
            reduced.insert(entry.clone());
        }
    }

    reduced
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reconcile::selection::ItemSelection;
    use crate::types::{LineItem, LineItemId, ProductId};

    fn entry(id: i64, count: usize, checked: bool) -> ItemSelection {
        ItemSelection::new(
            LineItemId::new(id),
            LineItem::new(LineItemId::new(id), ProductId::new(id), 10),
            count,
            checked,
        )
    }

    fn set(entries: Vec<ItemSelection>) -> ItemSelections {
        entries.into_iter().collect()
    }

    fn indices(selections: &ItemSelections, id: i64) -> Vec<usize> {
        selections
            .get(LineItemId::new(id))
            .unwrap()
            .selection
            .iter()
            .map(|slot| slot.index)
            .collect()
    }

    #[test]
    fn test_combine_disjoint_carries_both() {
        let combined = combine(&set(vec![entry(1, 2, true)]), &set(vec![entry(2, 3, true)]));
        assert_eq!(combined.count(LineItemId::new(1)), 2);
        assert_eq!(combined.count(LineItemId::new(2)), 3);
    }

    #[test]
    fn test_combine_overlap_concatenates_and_renumbers() {
        let combined = combine(
            &set(vec![entry(1, 2, false)]),
            &set(vec![entry(1, 3, true)]),
        );

        let merged = combined.get(LineItemId::new(1)).unwrap();
        assert_eq!(merged.len(), 5);
        assert_eq!(indices(&combined, 1), vec![0, 1, 2, 3, 4]);
        let flags: Vec<bool> = merged.selection.iter().map(|slot| slot.checked).collect();
        assert_eq!(flags, vec![false, false, true, true, true]);
    }

    #[test]
    fn test_combine_with_empty() {
        let a = set(vec![entry(1, 2, true)]);
        assert_eq!(combine(&a, &ItemSelections::new()), a);
        assert_eq!(combine(&ItemSelections::new(), &a), a);
    }

    #[test]
    fn test_reduce_removes_from_front_and_renumbers() {
        let mut base_entry = entry(1, 4, false);
        base_entry.set_checked(3, true);
        let reduced = reduce(&set(vec![base_entry]), &set(vec![entry(1, 2, true)]));

        let remaining = reduced.get(LineItemId::new(1)).unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(indices(&reduced, 1), vec![0, 1]);
        // The checked slot was at position 3 and survives at position 1.
        assert!(remaining.selection.get(1).unwrap().checked);
    }

    #[test]
    fn test_reduce_ignores_checked_flag() {
        let reduced = reduce(&set(vec![entry(1, 3, true)]), &set(vec![entry(1, 1, false)]));
        assert_eq!(reduced.count(LineItemId::new(1)), 2);
    }

    #[test]
    fn test_reduce_clamps_at_zero() {
        let reduced = reduce(&set(vec![entry(1, 2, false)]), &set(vec![entry(1, 5, true)]));
        let remaining = reduced.get(LineItemId::new(1)).unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_reduce_leaves_untouched_items() {
        let reduced = reduce(
            &set(vec![entry(1, 2, false), entry(2, 3, false)]),
            &set(vec![entry(1, 1, true)]),
        );
        assert_eq!(reduced.count(LineItemId::new(2)), 3);
    }

    #[test]
    fn test_reduce_carries_items_only_in_removal() {
        let reduced = reduce(&set(vec![entry(1, 2, false)]), &set(vec![entry(9, 2, true)]));

        assert_eq!(reduced.count(LineItemId::new(1)), 2);
        assert_eq!(reduced.count(LineItemId::new(9)), 2);
        assert_eq!(reduced.len(), 2);
    }

    #[test]
    fn test_reduce_self_cancels() {
        let x = set(vec![entry(1, 2, false), entry(2, 5, true)]);
        let reduced = reduce(&x, &x);
        assert!(reduced.iter().all(ItemSelection::is_empty));
        assert_eq!(reduced.len(), 2);
    }
}
