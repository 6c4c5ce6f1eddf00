use std::path::PathBuf;

use crate::Settings;

/// Everything one `fill` run needs. Built once by the CLI, never mutated
/// afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub trial_balance: PathBuf,
    pub template: PathBuf,
    /// Daily position export (`NCotas`, `VlCotas`).
    pub position: Option<PathBuf>,
    /// Quotaholder movement export (`NCATOT_Tot`, `NCRTOT_Tot`).
    pub movement: Option<PathBuf>,
    pub output: PathBuf,
    /// Where to write the JSON fill report, if anywhere.
    pub report: Option<PathBuf>,
    /// Trial-balance sheet selector text; overrides the settings file.
    pub sheet: Option<String>,
    pub settings: Settings,
}

impl RunConfig {
    /// Required inputs plus settings; output defaults to the configured file
    /// name in the working directory.
    pub fn new(trial_balance: PathBuf, template: PathBuf, settings: Settings) -> Self {
        Self {
            trial_balance,
            template,
            position: None,
            movement: None,
            output: PathBuf::from(&settings.output.file_name),
            report: None,
            sheet: None,
            settings,
        }
    }

    /// Command-line selector first, then the settings file.
    pub fn sheet_selector(&self) -> Option<&str> {
        self.sheet
            .as_deref()
            .or(self.settings.trial_balance.sheet.as_deref())
    }
}
