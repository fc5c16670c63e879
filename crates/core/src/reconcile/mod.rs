//! Quantity reconciliation between an order, its fulfillments and its
//! refunds, at the granularity of individual units.
//!
//! All functions here are pure: same inputs, same outputs, no I/O.

pub mod availability;
pub mod expand;
pub mod matcher;
pub mod merge;
pub mod selection;

pub use availability::{allocation_units, refund_units, resolve_availability, resolve_for_edit};
pub use expand::{expand_allocation, expand_order};
pub use matcher::{match_refund_item, matched_line_item};
pub use merge::{combine, reduce};
pub use selection::{ItemSelection, ItemSelections, ItemSummary, SelectionSummary, UnitSlot};
