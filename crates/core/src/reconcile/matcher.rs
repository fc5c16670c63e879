//! Refund line item matching.
//!
//! Refund line items carry their own ids, so the only way back to the order
//! is the product. When an order lists the same product on more than one
//! line, the first line always wins.

use crate::types::{LineItem, LineItemId, OrderSnapshot, RefundLineItem};

/// The order line item a refund line item refunds, if its product is on the
/// order.
#[must_use]
pub fn matched_line_item<'a>(
    order: &'a OrderSnapshot,
    refund_item: &RefundLineItem,
) -> Option<&'a LineItem> {
    order.line_item_for_product(refund_item.product_id)
}

/// Resolve a refund line item to the order line item it refunds.
///
/// Falls back to the refund line item's own id when no order line item has
/// the same product. That id never matches a real order item, so the units
/// surface as an orphaned entry instead of disappearing.
#[must_use]
pub fn match_refund_item(order: &OrderSnapshot, refund_item: &RefundLineItem) -> LineItemId {
    matched_line_item(order, refund_item).map_or(refund_item.id, |item| item.id)
}
