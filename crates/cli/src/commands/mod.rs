//! Command implementations and shared output rendering.

pub mod available;
pub mod edit;
pub mod summary;

use std::io::Write;

use clap::ValueEnum;
use tally_core::{ItemSelections, SelectionSummary};

use crate::error::CliError;

/// How command output is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for people.
    #[default]
    Table,
    /// Pretty-printed JSON for scripts.
    Json,
}

/// Write selections in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_selections(
    out: &mut impl Write,
    selections: &ItemSelections,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, selections)
                .map_err(|e| CliError::Output(e.into()))?;
            writeln!(out).map_err(CliError::Output)
        }
        OutputFormat::Table => write_selection_table(out, selections).map_err(CliError::Output),
    }
}

/// Write a selection summary in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_summary(
    out: &mut impl Write,
    summary: &SelectionSummary,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)
                .map_err(|e| CliError::Output(e.into()))?;
            writeln!(out).map_err(CliError::Output)
        }
        OutputFormat::Table => write_summary_table(out, summary).map_err(CliError::Output),
    }
}

fn write_selection_table(out: &mut impl Write, selections: &ItemSelections) -> std::io::Result<()> {
    if selections.is_empty() {
        return writeln!(out, "Nothing left to fulfil.");
    }

    writeln!(
        out,
        "{:<12} {:<12} {:<32} {:>6} {:>9}",
        "ITEM", "PRODUCT", "TITLE", "UNITS", "SELECTED"
    )?;
    for entry in selections {
        let title = if entry.item.is_placeholder() {
            "(not on order)"
        } else {
            entry.item.title.as_str()
        };
        writeln!(
            out,
            "{:<12} {:<12} {:<32} {:>6} {:>9}",
            entry.item_id.as_i64(),
            entry.item.product_id.as_i64(),
            title,
            entry.len(),
            entry.checked_count()
        )?;
    }
    writeln!(
        out,
        "{} unit(s) across {} item(s)",
        selections.total_units(),
        selections.len()
    )
}

fn write_summary_table(out: &mut impl Write, summary: &SelectionSummary) -> std::io::Result<()> {
    writeln!(out, "{:<12} {:>9} {:>6}", "ITEM", "SELECTED", "TOTAL")?;
    for item in &summary.items {
        writeln!(
            out,
            "{:<12} {:>9} {:>6}",
            item.item_id.as_i64(),
            item.selected,
            item.total
        )?;
    }
    writeln!(
        out,
        "{} of {} unit(s) selected",
        summary.selected_units, summary.total_units
    )
}
