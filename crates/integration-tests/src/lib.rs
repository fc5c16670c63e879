//! Integration tests for Tally.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tally-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `availability_scenarios` - End-to-end resolver scenarios
//! - `selection_properties` - Property tests for combine/reduce/resolve
//! - `fulfillment_session` - Editing session lifecycle
//!
//! This library holds the fixture builders those tests share.

use tally_core::{
    AllocatedItem, FulfillmentId, FulfillmentRecord, LineItem, LineItemId, OrderId,
    OrderSnapshot, ProductId, RefundId, RefundLineItem, RefundRecord,
};

/// Build an order from `(line_item_id, product_id, quantity)` triples.
#[must_use]
pub fn order(items: &[(i64, i64, i64)]) -> OrderSnapshot {
    OrderSnapshot::new(
        OrderId::new(1001),
        items
            .iter()
            .map(|&(id, product_id, quantity)| {
                LineItem::new(LineItemId::new(id), ProductId::new(product_id), quantity)
                    .with_title(format!("Product {product_id}"))
            })
            .collect(),
    )
}

/// Build a draft fulfillment from `(line_item_id, qty)` pairs.
#[must_use]
pub fn fulfillment(id: i64, items: &[(i64, i64)]) -> FulfillmentRecord {
    FulfillmentRecord::new(
        FulfillmentId::new(id),
        items
            .iter()
            .map(|&(item_id, qty)| AllocatedItem::new(LineItemId::new(item_id), qty))
            .collect(),
    )
}

/// Build a refund from `(refund_line_item_id, product_id, quantity)` triples.
#[must_use]
pub fn refund(id: i64, items: &[(i64, i64, i64)]) -> RefundRecord {
    RefundRecord::new(
        RefundId::new(id),
        items
            .iter()
            .map(|&(line_id, product_id, quantity)| {
                RefundLineItem::new(LineItemId::new(line_id), ProductId::new(product_id), quantity)
            })
            .collect(),
    )
}

/// Shorthand for a line item id.
#[must_use]
pub const fn item(id: i64) -> LineItemId {
    LineItemId::new(id)
}
