//! Export module for shareledger
//!
//! - CSV: expenses and pairwise debts (spreadsheet-compatible)
//! - JSON: full machine-readable dump, accepted by `import`
//! - YAML: the same dump for reading by eye

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_balances_csv, export_expenses_csv};
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
