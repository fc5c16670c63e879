//! Count selected vs. total units.
//!
//! Without `--fulfillment` the summary covers a brand-new fulfillment (all
//! available units, none selected). With it, the summary covers that
//! fulfillment's edit view.

use std::path::Path;

use tally_core::{FulfillmentId, FulfillmentSession};

use super::{OutputFormat, write_summary};
use crate::config::CliConfig;
use crate::error::CliError;
use crate::snapshot;

/// Print a selection summary for a snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the fulfillment is not
/// in it, or output fails.
pub async fn run(
    path: &Path,
    fulfillment_id: Option<FulfillmentId>,
    format: OutputFormat,
    config: &CliConfig,
) -> Result<(), CliError> {
    let snapshot = snapshot::load(path, &config.metadata_key).await?;

    let session = match fulfillment_id {
        Some(id) => FulfillmentSession::open(
            &snapshot.order,
            &snapshot.fulfillments,
            &snapshot.refunds,
            id,
        )?,
        None => FulfillmentSession::start(
            &snapshot.order,
            &snapshot.fulfillments,
            &snapshot.refunds,
        ),
    };

    write_summary(&mut std::io::stdout().lock(), &session.summary(), format)
}
