//! Core types for Tally.
//!
//! This module provides type-safe wrappers for orders, fulfillments and
//! refunds as read from the external store.

pub mod fulfillment;
pub mod id;
pub mod order;
pub mod refund;
pub mod status;

pub use fulfillment::{
    AllocatedItem, DEFAULT_ALLOCATION_KEY, FulfillmentPayload, FulfillmentRecord, Metafield,
    MetadataError,
};
pub use id::*;
pub use order::{LineItem, OrderSnapshot};
pub use refund::{RefundLineItem, RefundRecord};
pub use status::FulfillmentStatus;
