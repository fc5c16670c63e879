//! Status enums for fulfillment records.

use serde::{Deserialize, Serialize};

/// Fulfillment record status.
///
/// Maps to Shopify's fulfillment status values. The reconciliation engine
/// does not branch on status; every record in the input list counts as
/// allocated. Unrecognised values deserialize to [`Self::Unknown`] so a new
/// upstream status never breaks loading a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Open,
    Success,
    Cancelled,
    Error,
    Failure,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Open => write!(f, "open"),
            Self::Success => write!(f, "success"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Error => write!(f, "error"),
            Self::Failure => write!(f, "failure"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
