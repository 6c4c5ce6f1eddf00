//! `dempl accounts`: show the account index the fill would use.

use std::path::PathBuf;

use clap::Args;
use dempl_config::{RunConfig, Settings};
use dempl_io::{trial_balance, SheetSelector};

use crate::pipeline::load_index;
use crate::CliError;

#[derive(Args)]
pub struct AccountsArgs {
    /// Trial balance workbook (xlsx, xls, ods)
    #[arg(long, short = 't')]
    pub trial_balance: PathBuf,

    /// Trial-balance sheet, by name or 0-based position
    #[arg(long)]
    pub sheet: Option<String>,

    /// Settings file [default: <config dir>/dempl/settings.toml]
    #[arg(long, env = "DEMPL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print a JSON object instead of `code;balance` lines
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_accounts(args: AccountsArgs) -> Result<(), CliError> {
    let settings = Settings::load(args.config.as_deref())?;

    let mut run = RunConfig::new(args.trial_balance, PathBuf::new(), settings);
    run.sheet = args.sheet;

    let selector = run.sheet_selector().map(SheetSelector::from).unwrap_or_default();
    let tb = trial_balance::read(&run.trial_balance, &selector)?;
    let index = load_index(&tb, &run)?;

    if args.json {
        let json = serde_json::to_string_pretty(&index).map_err(|e| CliError::io(e.to_string()))?;
        println!("{json}");
    } else {
        for (code, balance) in index.iter() {
            println!("{code};{balance}");
        }
    }
    Ok(())
}
