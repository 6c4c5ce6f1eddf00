// Configuration loading

pub mod error;
pub mod run;
pub mod settings;

pub use error::ConfigError;
pub use run::RunConfig;
pub use settings::{OutputSettings, Settings, TrialBalanceSettings};
