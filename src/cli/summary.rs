//! Summary (dashboard) command

use std::path::Path;

use crate::cli::export::open_output;
use crate::error::LedgerResult;
use crate::reports::SummaryReport;
use crate::storage::Storage;

/// Print the group summary, or write it as CSV when a path is given
pub fn handle_summary_command(storage: &Storage, csv: Option<&Path>) -> LedgerResult<()> {
    let report = SummaryReport::generate(storage)?;

    match csv {
        Some(output) => {
            let mut writer = open_output(output)?;
            report.export_csv(&mut writer)?;
        }
        None => print!("{}", report.format_terminal()),
    }

    Ok(())
}
