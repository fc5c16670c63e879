//! Show the units of an existing fulfillment as they appear when editing it.
//!
//! # Usage
//!
//! ```bash
//! tally edit order-1001.yaml --fulfillment 900
//! ```

use std::path::Path;

use tally_core::{FulfillmentId, FulfillmentSession, SessionState};

use super::{OutputFormat, write_selections};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::snapshot;

/// Open a fulfillment from a snapshot file and print its edit view.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the fulfillment is not
/// in it, or output fails.
pub async fn run(
    path: &Path,
    fulfillment_id: FulfillmentId,
    format: OutputFormat,
    config: &CliConfig,
) -> Result<(), CliError> {
    let snapshot = snapshot::load(path, &config.metadata_key).await?;

    let session = FulfillmentSession::open(
        &snapshot.order,
        &snapshot.fulfillments,
        &snapshot.refunds,
        fulfillment_id,
    )?;

    if session.state() == SessionState::Locked {
        tracing::warn!(fulfillment_id = %fulfillment_id, "Fulfillment is locked, showing read-only view");
    }

    tracing::info!(
        fulfillment_id = %fulfillment_id,
        state = %session.state(),
        selected = session.summary().selected_units,
        "Opened fulfillment"
    );

    write_selections(&mut std::io::stdout().lock(), session.selections(), format)
}
