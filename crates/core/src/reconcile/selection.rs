//! Per-unit selection data model.
//!
//! An [`ItemSelection`] is one line item's quantity broken into discrete
//! [`UnitSlot`]s. [`ItemSelections`] is an insertion-ordered map from line
//! item id to its selection; every reconciliation step takes and returns
//! one.

use serde::{Deserialize, Serialize};

use crate::types::{AllocatedItem, LineItem, LineItemId};

/// One countable unit of a line item's quantity.
///
/// `checked` means "selected for this fulfillment" while editing, and simply
/// "present" when a selection stands for refunded or allocated units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitSlot {
    /// Position within the owning selection, always `0..len`.
    pub index: usize,
    /// Whether the unit is selected.
    pub checked: bool,
}

/// The unit slots of one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    /// Line item ID the slots belong to.
    pub item_id: LineItemId,
    /// Line item payload, or a placeholder for a stale reference.
    pub item: LineItem,
    /// Unit slots, indexed contiguously from zero.
    pub selection: Vec<UnitSlot>,
}

impl ItemSelection {
    /// Create a selection of `count` slots, all with the same `checked` flag.
    #[must_use]
    pub fn new(item_id: LineItemId, item: LineItem, count: usize, checked: bool) -> Self {
        Self {
            item_id,
            item,
            selection: (0..count).map(|index| UnitSlot { index, checked }).collect(),
        }
    }

    /// Number of units this selection represents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    /// Returns true if no units remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Number of checked units.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.selection.iter().filter(|slot| slot.checked).count()
    }

    /// Set one unit's `checked` flag. Returns false if `index` is out of range.
    pub fn set_checked(&mut self, index: usize, checked: bool) -> bool {
        self.selection.get_mut(index).is_some_and(|slot| {
            slot.checked = checked;
            true
        })
    }

    /// Flip one unit's `checked` flag. Returns the new value, or `None` if
    /// `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.selection.get_mut(index).map(|slot| {
            slot.checked = !slot.checked;
            slot.checked
        })
    }

    /// Check every unit.
    pub fn check_all(&mut self) {
        self.selection.iter_mut().for_each(|slot| slot.checked = true);
    }

    /// Uncheck every unit.
    pub fn uncheck_all(&mut self) {
        self.selection.iter_mut().for_each(|slot| slot.checked = false);
    }

    /// Reassign indices to `0..len` in current order.
    pub(crate) fn renumber(&mut self) {
        for (index, slot) in self.selection.iter_mut().enumerate() {
            slot.index = index;
        }
    }
}

/// Selected vs. total units for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    /// Line item ID.
    pub item_id: LineItemId,
    /// Checked units.
    pub selected: usize,
    /// All units.
    pub total: usize,
}

/// Selected vs. total units across a set of selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSummary {
    /// Checked units across all items.
    pub selected_units: usize,
    /// All units across all items.
    pub total_units: usize,
    /// Per-item breakdown, in selection order.
    pub items: Vec<ItemSummary>,
}

impl SelectionSummary {
    /// Returns true if at least one unit is selected.
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.selected_units > 0
    }
}

/// Insertion-ordered map from line item id to its unit slots.
///
/// Serializes as a plain list of [`ItemSelection`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemSelections(Vec<ItemSelection>);

impl ItemSelections {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up an item's selection.
    #[must_use]
    pub fn get(&self, item_id: LineItemId) -> Option<&ItemSelection> {
        self.0.iter().find(|entry| entry.item_id == item_id)
    }

    /// Look up an item's selection mutably.
    pub fn get_mut(&mut self, item_id: LineItemId) -> Option<&mut ItemSelection> {
        self.0.iter_mut().find(|entry| entry.item_id == item_id)
    }

    /// Returns true if the item is present (even with zero units).
    #[must_use]
    pub fn contains(&self, item_id: LineItemId) -> bool {
        self.get(item_id).is_some()
    }

    /// Insert a selection, replacing any existing entry for the same item in
    /// place. New items are appended.
    pub fn insert(&mut self, entry: ItemSelection) {
        match self.get_mut(entry.item_id) {
            Some(existing) => *existing = entry,
            None => self.0.push(entry),
        }
    }

    /// Keep only the selections matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&ItemSelection) -> bool) {
        self.0.retain(f);
    }

    /// Number of units for an item, zero if absent.
    #[must_use]
    pub fn count(&self, item_id: LineItemId) -> usize {
        self.get(item_id).map_or(0, ItemSelection::len)
    }

    /// Units across all items.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.0.iter().map(ItemSelection::len).sum()
    }

    /// Checked units across all items.
    #[must_use]
    pub fn checked_units(&self) -> usize {
        self.0.iter().map(ItemSelection::checked_count).sum()
    }

    /// Iterate selections in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemSelection> {
        self.0.iter()
    }

    /// Iterate selections mutably in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ItemSelection> {
        self.0.iter_mut()
    }

    /// Consume into the underlying list.
    #[must_use]
    pub fn into_vec(self) -> Vec<ItemSelection> {
        self.0
    }

    /// The allocation a caller persists for these selections: one entry per
    /// item with at least one checked unit.
    #[must_use]
    pub fn to_allocation(&self) -> Vec<AllocatedItem> {
        self.0
            .iter()
            .filter_map(|entry| {
                let checked = entry.checked_count();
                (checked > 0).then(|| {
                    AllocatedItem::new(entry.item_id, i64::try_from(checked).unwrap_or(i64::MAX))
                })
            })
            .collect()
    }

    /// Selected vs. total unit counts.
    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        let items: Vec<ItemSummary> = self
            .0
            .iter()
            .map(|entry| ItemSummary {
                item_id: entry.item_id,
                selected: entry.checked_count(),
                total: entry.len(),
            })
            .collect();

        SelectionSummary {
            selected_units: items.iter().map(|item| item.selected).sum(),
            total_units: items.iter().map(|item| item.total).sum(),
            items,
        }
    }
}

impl FromIterator<ItemSelection> for ItemSelections {
    /// Later entries for an item already seen replace the earlier one.
    fn from_iter<I: IntoIterator<Item = ItemSelection>>(iter: I) -> Self {
        let mut selections = Self::new();
        for entry in iter {
            selections.insert(entry);
        }
        selections
    }
}

impl IntoIterator for ItemSelections {
    type Item = ItemSelection;
    type IntoIter = std::vec::IntoIter<ItemSelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemSelections {
    type Item = &'a ItemSelection;
    type IntoIter = std::slice::Iter<'a, ItemSelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
