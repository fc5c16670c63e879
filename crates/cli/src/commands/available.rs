//! Show units still free for a new fulfillment.
//!
//! # Usage
//!
//! ```bash
//! tally available order-1001.yaml
//! tally available order-1001.json --format json
//! ```

use std::path::Path;

use tally_core::resolve_availability;

use super::{OutputFormat, write_selections};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::snapshot;

/// Resolve and print availability for a snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or output fails.
pub async fn run(path: &Path, format: OutputFormat, config: &CliConfig) -> Result<(), CliError> {
    let snapshot = snapshot::load(path, &config.metadata_key).await?;

    let available = resolve_availability(
        &snapshot.order,
        &snapshot.fulfillments,
        &snapshot.refunds,
    );

    tracing::info!(
        order_id = %snapshot.order.id,
        items = available.len(),
        units = available.total_units(),
        "Resolved availability"
    );

    write_selections(&mut std::io::stdout().lock(), &available, format)
}
