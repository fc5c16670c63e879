//! Fulfillment record types and the metafield read contract.
//!
//! Fulfillments are persisted by an external store. The only part of a
//! record that reconciliation reads is its allocation: a well-known
//! metafield whose value is a list of `{ item_id, qty }` entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{FulfillmentId, LineItemId};
use super::status::FulfillmentStatus;

/// Default metafield key holding a fulfillment's allocated items.
pub const DEFAULT_ALLOCATION_KEY: &str = "fulfillment_items";

/// Errors that can occur when reading a fulfillment's allocation metafield.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    /// The metafield value is not a list of allocated items.
    #[error("fulfillment {fulfillment_id}: metafield '{key}' is malformed: {source}")]
    Malformed {
        /// Fulfillment carrying the bad value.
        fulfillment_id: FulfillmentId,
        /// Metafield key that was read.
        key: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The allocation metafield appears more than once.
    #[error("fulfillment {fulfillment_id}: metafield '{key}' appears {count} times")]
    Duplicate {
        /// Fulfillment carrying the duplicate entries.
        fulfillment_id: FulfillmentId,
        /// Metafield key that was read.
        key: String,
        /// Number of entries found.
        count: usize,
    },
}

/// Units of one line item allocated to a fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocatedItem {
    /// Order line item ID.
    pub item_id: LineItemId,
    /// Number of units allocated.
    pub qty: i64,
}

impl AllocatedItem {
    /// Create an allocation entry.
    #[must_use]
    pub const fn new(item_id: LineItemId, qty: i64) -> Self {
        Self { item_id, qty }
    }

    /// Allocated quantity as a unit count. Negative quantities count as zero.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        usize::try_from(self.qty).unwrap_or(0)
    }
}

/// A key/value metafield attached to a fulfillment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    /// Metafield key.
    pub key: String,
    /// Metafield value. Either structured JSON or a JSON-encoded string.
    pub value: Value,
}

/// A fulfillment as supplied by the external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentPayload {
    /// Fulfillment ID.
    pub id: FulfillmentId,
    /// Fulfillment status.
    #[serde(default)]
    pub status: FulfillmentStatus,
    /// Whether the fulfillment has been marked fulfilled (vs. saved as draft).
    #[serde(default)]
    pub is_fulfilled: bool,
    /// Whether the record is locked against further edits.
    #[serde(default)]
    pub is_locked: bool,
    /// Metafields attached to the fulfillment.
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

/// A fulfillment with its allocation decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentRecord {
    /// Fulfillment ID.
    pub id: FulfillmentId,
    /// Fulfillment status.
    #[serde(default)]
    pub status: FulfillmentStatus,
    /// Whether the fulfillment has been marked fulfilled (vs. saved as draft).
    #[serde(default)]
    pub is_fulfilled: bool,
    /// Whether the record is locked against further edits.
    #[serde(default)]
    pub is_locked: bool,
    /// Units allocated to this fulfillment, per line item.
    #[serde(default)]
    pub allocated_items: Vec<AllocatedItem>,
}

impl FulfillmentRecord {
    /// Create an unlocked draft record with the given allocation.
    #[must_use]
    pub fn new(id: FulfillmentId, allocated_items: Vec<AllocatedItem>) -> Self {
        Self {
            id,
            allocated_items,
            ..Self::default()
        }
    }

    /// Decode a record from a store payload, reading the allocation from the
    /// metafield named `key`.
    ///
    /// A payload without that metafield has allocated nothing yet.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Malformed`] if the metafield value is not a
    /// list of `{ item_id, qty }` entries (directly or JSON-encoded in a
    /// string), and [`MetadataError::Duplicate`] if the key appears more than
    /// once.
    pub fn from_payload(payload: FulfillmentPayload, key: &str) -> Result<Self, MetadataError> {
        let mut entries = payload.metafields.into_iter().filter(|m| m.key == key);

        let allocated_items = match (entries.next(), entries.count()) {
            (None, _) => {
                tracing::debug!(
                    fulfillment_id = %payload.id,
                    key,
                    "Fulfillment has no allocation metafield"
                );
                Vec::new()
            }
            (Some(entry), 0) => decode_allocation(entry.value).map_err(|source| {
                MetadataError::Malformed {
                    fulfillment_id: payload.id,
                    key: key.to_string(),
                    source,
                }
            })?,
            (Some(_), rest) => {
                return Err(MetadataError::Duplicate {
                    fulfillment_id: payload.id,
                    key: key.to_string(),
                    count: rest + 1,
                });
            }
        };

        Ok(Self {
            id: payload.id,
            status: payload.status,
            is_fulfilled: payload.is_fulfilled,
            is_locked: payload.is_locked,
            allocated_items,
        })
    }

    /// Total units allocated across all line items.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.allocated_items.iter().map(AllocatedItem::unit_count).sum()
    }
}

/// Metafield values are stored as JSON strings by the Admin API but may
/// already be structured when a snapshot was written by hand.
fn decode_allocation(value: Value) -> Result<Vec<AllocatedItem>, serde_json::Error> {
    match value {
        Value::String(raw) => serde_json::from_str(&raw),
        other => serde_json::from_value(other),
    }
}
