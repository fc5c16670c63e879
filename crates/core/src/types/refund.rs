//! Refund record types.

use serde::{Deserialize, Serialize};

use super::id::{LineItemId, ProductId, RefundId};

/// A line item in a refund.
///
/// The refund's line item ids are not order line item ids; the product id
/// is the only link back to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefundLineItem {
    /// Refund line item ID.
    pub id: LineItemId,
    /// Product ID of the refunded item.
    pub product_id: ProductId,
    /// Quantity refunded. Upstream may report this negated.
    pub quantity: i64,
}

impl RefundLineItem {
    /// Create a refund line item.
    #[must_use]
    pub const fn new(id: LineItemId, product_id: ProductId, quantity: i64) -> Self {
        Self {
            id,
            product_id,
            quantity,
        }
    }

    /// Units removed from the order, regardless of sign convention.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        usize::try_from(self.quantity.unsigned_abs()).unwrap_or(usize::MAX)
    }
}

/// A refund on an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRecord {
    /// Refund ID.
    pub id: RefundId,
    /// Line items included in this refund.
    #[serde(default, alias = "line_items")]
    pub refunded_line_items: Vec<RefundLineItem>,
}

impl RefundRecord {
    /// Create a refund record.
    #[must_use]
    pub const fn new(id: RefundId, refunded_line_items: Vec<RefundLineItem>) -> Self {
        Self {
            id,
            refunded_line_items,
        }
    }
}
