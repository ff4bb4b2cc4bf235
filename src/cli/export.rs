//! CLI commands for data export
//!
//! Every command writes to the given path, or to stdout when the path is `-`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{LedgerError, LedgerResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Format for a full export
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON (can be imported again)
    Json,
    /// YAML (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export users and expenses
    All {
        /// Output file path, or - for stdout
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export expenses to CSV
    Expenses {
        /// Output file path, or - for stdout
        output: PathBuf,
    },

    /// Export pairwise debts to CSV
    Balances {
        /// Output file path, or - for stdout
        output: PathBuf,
    },
}

pub(crate) fn open_output(output: &Path) -> LedgerResult<Box<dyn Write>> {
    if output == Path::new("-") {
        return Ok(Box::new(io::stdout().lock()));
    }

    let file = File::create(output).map_err(|e| {
        LedgerError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn report_written(output: &Path, what: &str) {
    if output != Path::new("-") {
        println!("{} exported to: {}", what, output.display());
    }
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LedgerResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = open_output(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            writer
                .flush()
                .map_err(|e| LedgerError::Export(e.to_string()))?;
            report_written(&output, "Full ledger");
        }

        ExportCommands::Expenses { output } => {
            let mut writer = open_output(&output)?;
            csv::export_expenses_csv(storage, &mut writer)?;
            report_written(&output, "Expenses");
        }

        ExportCommands::Balances { output } => {
            let mut writer = open_output(&output)?;
            csv::export_balances_csv(storage, &mut writer)?;
            report_written(&output, "Balances");
        }
    }

    Ok(())
}
