//! User settings for shareledger
//!
//! Display preferences, the active user, and the balance computation options.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::ledger::BalanceOptions;
use crate::models::UserId;

/// Persisted settings (`config.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// The user the dashboard and "you" views are computed for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_user: Option<UserId>,

    /// Options handed to the balance engine
    #[serde(default)]
    pub balance: BalanceOptions,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            active_user: None,
            balance: BalanceOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::UnknownUserPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert!(settings.active_user.is_none());
        assert!(!settings.balance.include_income);
        assert_eq!(settings.balance.unknown_users, UnknownUserPolicy::Ignore);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.active_user = Some(UserId::from_raw("user2"));
        settings.balance.include_income = true;
        settings.balance.unknown_users = UnknownUserPolicy::Reject;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.active_user, Some(UserId::from_raw("user2")));
        assert!(loaded.balance.include_income);
        assert_eq!(loaded.balance.unknown_users, UnknownUserPolicy::Reject);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"currency_symbol":"€"}"#).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.schema_version, 1);
        assert_eq!(loaded.date_format, "%Y-%m-%d");
        assert_eq!(loaded.balance, BalanceOptions::default());
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(LedgerError::Config(_))
        ));
    }
}
