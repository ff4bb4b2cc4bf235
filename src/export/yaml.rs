//! YAML Export functionality
//!
//! Same content as the JSON export, in a format that is easier to read by eye.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# shareledger export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))
}

/// Read back a YAML export
pub fn import_from_yaml(yaml_str: &str) -> LedgerResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LedgerError::Import(e.to_string()))?;

    export.validate().map_err(LedgerError::Import)?;

    Ok(export)
}
