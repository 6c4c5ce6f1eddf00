use std::fs;
use std::path::{Path, PathBuf};

use dempl_engine::{FillLayout, TrialBalanceLayout};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

pub const DEFAULT_OUTPUT_FILE: &str = "Dem_PL_Modelo_preenchido.xlsx";

/// Contents of `settings.toml`. Every table and key is optional; missing
/// values take the model-workbook defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub trial_balance: TrialBalanceSettings,
    pub layout: FillLayout,
    pub output: OutputSettings,
}

/// `[trial_balance]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrialBalanceSettings {
    /// Sheet name, or position when all digits. First sheet when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub account_column: String,
    pub balance_column: String,
    pub identifier_header: String,
    pub identifier_fallback_column: String,
}

impl Default for TrialBalanceSettings {
    fn default() -> Self {
        let columns = TrialBalanceLayout::default();
        Self {
            sheet: None,
            account_column: columns.account_column,
            balance_column: columns.balance_column,
            identifier_header: columns.identifier_header,
            identifier_fallback_column: columns.identifier_fallback_column,
        }
    }
}

impl TrialBalanceSettings {
    pub fn columns(&self) -> TrialBalanceLayout {
        TrialBalanceLayout {
            account_column: self.account_column.clone(),
            balance_column: self.balance_column.clone(),
            identifier_header: self.identifier_header.clone(),
            identifier_fallback_column: self.identifier_fallback_column.clone(),
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Output file used when `-o` is not given.
    pub file_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { file_name: DEFAULT_OUTPUT_FILE.to_string() }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dempl")
            .join("settings.toml")
    }

    /// Parse and validate TOML text.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse { path: None, message: e.to_string() })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from an explicit path (which must exist) or from the default
    /// location (defaults when absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => {
                let path = Self::config_path();
                if path.is_file() {
                    Self::load_file(&path)
                } else {
                    log::debug!("no settings at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse { path: Some(path.to_path_buf()), message },
            other => other,
        })?;
        log::info!("settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout
            .validate()
            .map_err(|e| ConfigError::Validation(format!("[layout] {e}")))?;
        self.trial_balance
            .columns()
            .validate()
            .map_err(|e| ConfigError::Validation(format!("[trial_balance] {e}")))?;
        if self.output.file_name.trim().is_empty() {
            return Err(ConfigError::Validation("[output] file_name is empty".to_string()));
        }
        Ok(())
    }
}
