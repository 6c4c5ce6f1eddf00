//! One `fill` run: load inputs, fill the template, save, report.
//!
//! Required inputs are all loaded before the template is touched, so a
//! missing file never produces a half-written output.

use std::path::{Path, PathBuf};

use dempl_config::RunConfig;
use dempl_engine::identifier::find_in_trial_balance;
use dempl_engine::tail::{
    TailSource, TailTable, APPLICATIONS_COLUMN, QUOTA_COUNT_COLUMN, QUOTA_VALUE_COLUMN, REDEMPTIONS_COLUMN,
};
use dempl_engine::{fill, AccountIndex, FillReport, Identifier, ScalarFacts, TrialBalance};
use dempl_io::delimited::load_tail_table;
use dempl_io::{persist, trial_balance, SheetSelector, TemplateWorkbook};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::CliError;

pub struct RunOutcome {
    /// Path actually written (the fallback when the primary was locked).
    pub written: PathBuf,
    pub identifier: Option<Identifier>,
    pub report: FillReport,
}

#[derive(Serialize)]
struct ReportFile<'a> {
    output: String,
    trial_balance: String,
    template: String,
    cnpj: Option<&'a Identifier>,
    #[serde(flatten)]
    report: &'a FillReport,
}

pub fn run(config: &RunConfig) -> Result<RunOutcome, CliError> {
    let settings = &config.settings;
    let columns = settings.trial_balance.columns();
    let selector = config.sheet_selector().map(SheetSelector::from).unwrap_or_default();

    let tb = trial_balance::read(&config.trial_balance, &selector)?;
    let mut doc = TemplateWorkbook::open(&config.template)?;

    let index = load_index(&tb, config)?;
    let identifier = find_in_trial_balance(&tb, &columns.identifier_header, columns.identifier_fallback_col()?);

    let position = load_optional(config.position.as_deref(), TailSource::DAILY_POSITION);
    let movement = load_optional(config.movement.as_deref(), TailSource::MOVEMENT);
    let facts = ScalarFacts {
        identifier: identifier.clone(),
        quota_count: last_value(position.as_ref(), QUOTA_COUNT_COLUMN),
        quota_value: settings
            .layout
            .quota_value_cell
            .and_then(|_| last_value(position.as_ref(), QUOTA_VALUE_COLUMN)),
        applications: last_value(movement.as_ref(), APPLICATIONS_COLUMN),
        redemptions: last_value(movement.as_ref(), REDEMPTIONS_COLUMN),
    };

    let report = fill(&mut doc, &index, &facts, &settings.layout)?;
    let written = persist(&doc, &config.output)?;
    drop(doc);

    if let Some(path) = &config.report {
        write_report(path, &written, config, identifier.as_ref(), &report)?;
    }

    Ok(RunOutcome { written, identifier, report })
}

pub fn load_index(tb: &TrialBalance, config: &RunConfig) -> Result<AccountIndex, CliError> {
    let columns = config.settings.trial_balance.columns();
    let index = AccountIndex::build(tb, columns.account_col()?, columns.balance_col()?);
    if index.is_empty() {
        log::warn!(
            "no account codes found in column {} of {}",
            columns.account_column,
            config.trial_balance.display()
        );
    }
    Ok(index)
}

/// Optional exports never abort the run: problems are logged and the facts
/// they feed are left out.
fn load_optional(path: Option<&Path>, source: TailSource) -> Option<TailTable> {
    let path = path?;
    match load_tail_table(path, source) {
        Ok(table) => Some(table),
        Err(e) => {
            log::warn!("{e}; {} facts skipped", source.name);
            None
        }
    }
}

fn last_value(table: Option<&TailTable>, column: &str) -> Option<Decimal> {
    let table = table?;
    match table.last_value(column) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            log::warn!("{}: column {column} has no numeric value, skipped", table.source().name);
            None
        }
        Err(e) => {
            log::warn!("{e}, skipped");
            None
        }
    }
}

fn write_report(
    path: &Path,
    written: &Path,
    config: &RunConfig,
    identifier: Option<&Identifier>,
    report: &FillReport,
) -> Result<(), CliError> {
    let file = ReportFile {
        output: written.display().to_string(),
        trial_balance: config.trial_balance.display().to_string(),
        template: config.template.display().to_string(),
        cnpj: identifier,
        report,
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| CliError::io(e.to_string()))?;
    std::fs::write(path, json + "\n")
        .map_err(|e| CliError::io(format!("cannot write report {}: {e}", path.display())))
}
