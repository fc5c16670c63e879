//! Availability resolution.
//!
//! The order is expanded into units, refunded units are subtracted, then
//! units already allocated to fulfillments are subtracted. Whatever is left
//! is free for a new fulfillment. Every call starts from scratch; nothing is
//! cached between calls.

use crate::types::{FulfillmentId, FulfillmentRecord, OrderSnapshot, RefundRecord};

use super::expand::{expand_allocation, expand_order};
use super::matcher::matched_line_item;
use super::merge::{combine, reduce};
use super::selection::{ItemSelection, ItemSelections};

/// Units one refund removes from the order, keyed by the order line item
/// each refund line item matches.
///
/// A matched refund line is capped at the line item's ordered quantity. An
/// unmatched one keeps its own id and full quantity.
#[must_use]
pub fn refund_units(order: &OrderSnapshot, refund: &RefundRecord) -> ItemSelections {
    refund
        .refunded_line_items
        .iter()
        .map(|refund_item| {
            let units = refund_item.unit_count();
            if let Some(line_item) = matched_line_item(order, refund_item) {
                return expand_allocation(order, line_item.id, units.min(line_item.unit_count()));
            }
            tracing::warn!(
                order_id = %order.id,
                refund_id = %refund.id,
                refund_line_item_id = %refund_item.id,
                product_id = %refund_item.product_id,
                units,
                "Refunded product not found on order"
            );
            expand_allocation(order, refund_item.id, units)
        })
        .fold(ItemSelections::new(), accumulate)
}

/// Units one fulfillment has claimed.
///
/// Allocations against an order line item are capped at its ordered
/// quantity. Allocations against a line item no longer on the order keep
/// their full quantity.
#[must_use]
pub fn allocation_units(order: &OrderSnapshot, fulfillment: &FulfillmentRecord) -> ItemSelections {
    fulfillment
        .allocated_items
        .iter()
        .map(|allocated| {
            let units = allocated.unit_count();
            if let Some(line_item) = order.line_item(allocated.item_id) {
                return expand_allocation(order, line_item.id, units.min(line_item.unit_count()));
            }
            tracing::warn!(
                order_id = %order.id,
                fulfillment_id = %fulfillment.id,
                item_id = %allocated.item_id,
                units,
                "Allocation references a line item not on the order"
            );
            expand_allocation(order, allocated.item_id, units)
        })
        .fold(ItemSelections::new(), accumulate)
}

/// Units of `order` not removed by any refund and not claimed by any
/// fulfillment.
///
/// Items with nothing left are omitted. Over-claimed items saturate at zero
/// and are omitted the same way; nothing is reported about the excess.
/// Allocations or refunds that reference no order line item are kept as
/// their own (checked) entries.
#[must_use]
pub fn resolve_availability(
    order: &OrderSnapshot,
    fulfillments: &[FulfillmentRecord],
    refunds: &[RefundRecord],
) -> ItemSelections {
    let mut available = expand_order(order);

    if !refunds.is_empty() {
        let refunded = refunds
            .iter()
            .map(|refund| refund_units(order, refund))
            .fold(ItemSelections::new(), |acc, units| combine(&acc, &units));
        tracing::debug!(
            order_id = %order.id,
            refunds = refunds.len(),
            refunded_units = refunded.total_units(),
            "Subtracting refunded units"
        );
        available = reduce(&available, &refunded);
    }

    if !fulfillments.is_empty() {
        let allocated = fulfillments
            .iter()
            .map(|fulfillment| allocation_units(order, fulfillment))
            .fold(ItemSelections::new(), |acc, units| combine(&acc, &units));
        tracing::debug!(
            order_id = %order.id,
            fulfillments = fulfillments.len(),
            allocated_units = allocated.total_units(),
            "Subtracting allocated units"
        );
        available = reduce(&available, &allocated);
    }

    available.retain(|entry| !entry.is_empty());

    tracing::debug!(
        order_id = %order.id,
        items = available.len(),
        available_units = available.total_units(),
        "Resolved availability"
    );

    available
}

/// Units to show while editing an existing fulfillment.
///
/// Availability is resolved as if the edited fulfillment did not exist.
/// The fulfillment's own units come first, checked, followed by the
/// unchecked units of order line items still free. Stale allocations held
/// by other fulfillments and unmatched refunds are not shown. Returns `None`
/// if `fulfillment_id` is not in `fulfillments`.
#[must_use]
pub fn resolve_for_edit(
    order: &OrderSnapshot,
    fulfillments: &[FulfillmentRecord],
    refunds: &[RefundRecord],
    fulfillment_id: FulfillmentId,
) -> Option<ItemSelections> {
    let editing = fulfillments.iter().find(|f| f.id == fulfillment_id)?;
    let others: Vec<FulfillmentRecord> = fulfillments
        .iter()
        .filter(|f| f.id != fulfillment_id)
        .cloned()
        .collect();

    let available = resolve_availability(order, &others, refunds);
    let claimed = allocation_units(order, editing);

    // Units the edited fulfillment already holds are in `available` too;
    // take them out so they are not offered twice.
    let mut remaining = reduce(&available, &claimed);
    remaining.retain(|entry| {
        available.contains(entry.item_id) && order.line_item(entry.item_id).is_some()
    });

    let mut selections = combine(&claimed, &remaining);
    selections.retain(|entry| !entry.is_empty());

    tracing::debug!(
        order_id = %order.id,
        fulfillment_id = %fulfillment_id,
        claimed_units = claimed.total_units(),
        total_units = selections.total_units(),
        "Resolved edit view"
    );

    Some(selections)
}

fn accumulate(acc: ItemSelections, entry: ItemSelection) -> ItemSelections {
    combine(&acc, &std::iter::once(entry).collect::<ItemSelections>())
}
