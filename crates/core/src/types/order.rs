//! Order snapshot types.

use serde::{Deserialize, Serialize};

use super::id::{LineItemId, OrderId, ProductId};

/// A line item in an order.
///
/// Only `id`, `product_id` and `quantity` take part in reconciliation. The
/// display fields ride along so that callers rendering a selection do not
/// need a second lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Line item ID.
    pub id: LineItemId,
    /// Product ID.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: i64,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Variant title.
    #[serde(default)]
    pub variant_title: Option<String>,
    /// SKU.
    #[serde(default)]
    pub sku: Option<String>,
}

impl LineItem {
    /// Create a line item with empty display fields.
    #[must_use]
    pub fn new(id: LineItemId, product_id: ProductId, quantity: i64) -> Self {
        Self {
            id,
            product_id,
            quantity,
            ..Self::default()
        }
    }

    /// Set the product title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Placeholder payload for an id that no longer resolves to a line item
    /// on the order.
    #[must_use]
    pub fn placeholder(id: LineItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Returns true if this is a [`placeholder`](Self::placeholder) payload.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder(self.id)
    }

    /// Ordered quantity as a unit count. Negative quantities count as zero.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        usize::try_from(self.quantity).unwrap_or(0)
    }
}

/// An order's line items as read at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Order ID.
    pub id: OrderId,
    /// Line items in order.
    pub line_items: Vec<LineItem>,
}

impl OrderSnapshot {
    /// Create a snapshot from an order id and its line items.
    #[must_use]
    pub const fn new(id: OrderId, line_items: Vec<LineItem>) -> Self {
        Self { id, line_items }
    }

    /// Look up a line item by id.
    #[must_use]
    pub fn line_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == id)
    }

    /// First line item for a product.
    ///
    /// An order holding the same product on two lines only ever resolves to
    /// the first of them.
    #[must_use]
    pub fn line_item_for_product(&self, product_id: ProductId) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id == product_id)
    }

    /// Total ordered units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> usize {
        self.line_items.iter().map(LineItem::unit_count).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order() -> OrderSnapshot {
        OrderSnapshot::new(
            OrderId::new(1),
            vec![
                LineItem::new(LineItemId::new(10), ProductId::new(100), 2),
                LineItem::new(LineItemId::new(11), ProductId::new(101), 3),
                LineItem::new(LineItemId::new(12), ProductId::new(100), 1),
            ],
        )
    }

    #[test]
    fn test_line_item_lookup() {
        let order = order();
        assert_eq!(order.line_item(LineItemId::new(11)).unwrap().quantity, 3);
        assert!(order.line_item(LineItemId::new(99)).is_none());
    }

    #[test]
    fn test_line_item_for_product_first_match_wins() {
        let order = order();
        let item = order.line_item_for_product(ProductId::new(100)).unwrap();
        assert_eq!(item.id, LineItemId::new(10));
    }

    #[test]
    fn test_total_quantity() {
        assert_eq!(order().total_quantity(), 6);
    }

    #[test]
    fn test_negative_quantity_counts_as_zero() {
        let item = LineItem::new(LineItemId::new(1), ProductId::new(1), -4);
        assert_eq!(item.unit_count(), 0);
    }

    #[test]
    fn test_placeholder() {
        let placeholder = LineItem::placeholder(LineItemId::new(77));
        assert_eq!(placeholder.id, LineItemId::new(77));
        assert_eq!(placeholder.quantity, 0);
        assert!(placeholder.is_placeholder());
        assert!(!order().line_items.first().unwrap().is_placeholder());
    }

    #[test]
    fn test_deserialize_without_display_fields() {
        let json = r#"{"id": 5, "product_id": 50, "quantity": 2}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, LineItem::new(LineItemId::new(5), ProductId::new(50), 2));
    }
}
