//! Unit expansion: quantities into unit slots.

use crate::types::{LineItem, LineItemId, OrderSnapshot};

use super::selection::{ItemSelection, ItemSelections};

/// Expand every line item of an order into unchecked unit slots.
///
/// Each unit is one slot in memory, so line item quantities are expected to
/// be order-sized.
#[must_use]
pub fn expand_order(order: &OrderSnapshot) -> ItemSelections {
    order
        .line_items
        .iter()
        .map(|item| ItemSelection::new(item.id, item.clone(), item.unit_count(), false))
        .collect()
}

/// Expand `qty` allocated (or refunded) units of one item into checked slots.
///
/// `item_id` may reference a line item that is no longer on the order. The
/// slot count is still honoured and the payload becomes
/// [`LineItem::placeholder`].
#[must_use]
pub fn expand_allocation(order: &OrderSnapshot, item_id: LineItemId, qty: usize) -> ItemSelection {
    let item = order
        .line_item(item_id)
        .cloned()
        .unwrap_or_else(|| LineItem::placeholder(item_id));

    ItemSelection::new(item_id, item, qty, true)
}
