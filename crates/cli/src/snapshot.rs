//! Snapshot documents read from disk.
//!
//! A snapshot captures everything reconciliation needs about one order at a
//! point in time:
//!
//! ```yaml
//! order:
//!   id: 1001
//!   line_items:
//!     - { id: 10, product_id: 100, quantity: 3, title: "Blue Mug" }
//! fulfillments:
//!   - id: 900
//!     is_fulfilled: true
//!     metafields:
//!       - key: fulfillment_items
//!         value: '[{"item_id": 10, "qty": 1}]'
//! refunds:
//!   - id: 70
//!     refunded_line_items:
//!       - { id: 500, product_id: 100, quantity: -1 }
//! ```

use std::path::Path;

use serde::Deserialize;
use tally_core::{
    FulfillmentPayload, FulfillmentRecord, MetadataError, OrderSnapshot, RefundRecord,
};

use crate::error::CliError;

/// On-disk encoding of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick a format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnsupportedFormat`] for anything other than
    /// `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Snapshot as written on disk, fulfillments still carrying raw metafields.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotDocument {
    /// Order and its line items.
    pub order: OrderSnapshot,
    /// Fulfillments as supplied by the store.
    #[serde(default)]
    pub fulfillments: Vec<FulfillmentPayload>,
    /// Refunds on the order.
    #[serde(default)]
    pub refunds: Vec<RefundRecord>,
}

impl SnapshotDocument {
    /// Decode each fulfillment's allocation from the `metadata_key` metafield.
    ///
    /// # Errors
    ///
    /// Returns the first [`MetadataError`] encountered.
    pub fn decode(self, metadata_key: &str) -> Result<Snapshot, MetadataError> {
        let fulfillments = self
            .fulfillments
            .into_iter()
            .map(|payload| FulfillmentRecord::from_payload(payload, metadata_key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot {
            order: self.order,
            fulfillments,
            refunds: self.refunds,
        })
    }
}

/// Reconciliation inputs for one order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub order: OrderSnapshot,
    pub fulfillments: Vec<FulfillmentRecord>,
    pub refunds: Vec<RefundRecord>,
}

/// Parse snapshot text in the given format.
///
/// # Errors
///
/// Returns a parse error for invalid JSON/YAML and a metadata error for an
/// undecodable allocation metafield.
pub fn parse(
    content: &str,
    format: SnapshotFormat,
    metadata_key: &str,
) -> Result<Snapshot, CliError> {
    let document: SnapshotDocument = match format {
        SnapshotFormat::Json => serde_json::from_str(content)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
    };

    Ok(document.decode(metadata_key)?)
}

/// Read and parse a snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or does not parse.
pub async fn load(path: &Path, metadata_key: &str) -> Result<Snapshot, CliError> {
    let format = SnapshotFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let snapshot = parse(&content, format, metadata_key)?;

    tracing::info!(
        path = %path.display(),
        order_id = %snapshot.order.id,
        line_items = snapshot.order.line_items.len(),
        fulfillments = snapshot.fulfillments.len(),
        refunds = snapshot.refunds.len(),
        "Loaded snapshot"
    );

    Ok(snapshot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use tally_core::{DEFAULT_ALLOCATION_KEY, LineItemId};

    use super::*;

    const YAML: &str = r#"
order:
  id: 1001
  line_items:
    - { id: 10, product_id: 100, quantity: 3, title: "Blue Mug" }
fulfillments:
  - id: 900
    is_fulfilled: true
    metafields:
      - key: fulfillment_items
        value: '[{"item_id": 10, "qty": 1}]'
refunds:
  - id: 70
    refunded_line_items:
      - { id: 500, product_id: 100, quantity: -1 }
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SnapshotFormat::from_path(&PathBuf::from("order.json")).unwrap(),
            SnapshotFormat::Json
        );
        assert_eq!(
            SnapshotFormat::from_path(&PathBuf::from("order.YML")).unwrap(),
            SnapshotFormat::Yaml
        );
        assert!(matches!(
            SnapshotFormat::from_path(&PathBuf::from("order.toml")),
            Err(CliError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_yaml() {
        let snapshot = parse(YAML, SnapshotFormat::Yaml, DEFAULT_ALLOCATION_KEY).unwrap();
        assert_eq!(snapshot.order.line_items.len(), 1);
        assert_eq!(snapshot.fulfillments.first().unwrap().total_units(), 1);
        assert_eq!(snapshot.refunds.len(), 1);
    }

    #[test]
    fn test_parse_json_without_optional_lists() {
        let json = r#"{"order": {"id": 1, "line_items": [{"id": 10, "product_id": 100, "quantity": 2}]}}"#;
        let snapshot = parse(json, SnapshotFormat::Json, DEFAULT_ALLOCATION_KEY).unwrap();
        assert!(snapshot.fulfillments.is_empty());
        assert!(snapshot.refunds.is_empty());
        assert_eq!(
            snapshot.order.line_item(LineItemId::new(10)).unwrap().quantity,
            2
        );
    }

    #[test]
    fn test_parse_bad_metafield() {
        let json = r#"{
            "order": {"id": 1, "line_items": []},
            "fulfillments": [{"id": 9, "metafields": [{"key": "fulfillment_items", "value": "not json"}]}]
        }"#;
        assert!(matches!(
            parse(json, SnapshotFormat::Json, DEFAULT_ALLOCATION_KEY),
            Err(CliError::Metadata(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse("{", SnapshotFormat::Json, DEFAULT_ALLOCATION_KEY),
            Err(CliError::Json(_))
        ));
    }
}
