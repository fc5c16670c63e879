//! Tally Core - Unit-level fulfillment reconciliation.
//!
//! This crate answers one question for the admin tooling: which units of an
//! order are still free to put into a new (or edited) fulfillment, given the
//! fulfillments already recorded and the refunds already issued.
//!
//! # Architecture
//!
//! Like the rest of the shared crates, core contains only types and pure
//! functions - no I/O, no database access, no HTTP clients. Fulfillment and
//! refund records are read from snapshots supplied by the caller, and
//! availability is recomputed from scratch whenever any of them change.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, order snapshots, fulfillment and refund records
//! - [`reconcile`] - Unit expansion, refund matching, combine/reduce and the
//!   availability resolver
//! - [`session`] - Editing session state machine for a single fulfillment
//!
//! # Example
//!
//! ```
//! use tally_core::{LineItem, LineItemId, OrderId, OrderSnapshot, ProductId, resolve_availability};
//!
//! let order = OrderSnapshot::new(
//!     OrderId::new(1),
//!     vec![LineItem::new(LineItemId::new(10), ProductId::new(100), 3)],
//! );
//!
//! let available = resolve_availability(&order, &[], &[]);
//! assert_eq!(available.count(LineItemId::new(10)), 3);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod session;
pub mod types;

pub use reconcile::*;
pub use session::{FulfillmentSession, SaveKind, SaveRequest, SessionError, SessionState};
pub use types::*;
