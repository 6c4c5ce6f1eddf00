//! `dempl fill`: run the pipeline and print what was written.

use std::path::PathBuf;

use clap::Args;
use dempl_config::{RunConfig, Settings};

use crate::pipeline;
use crate::CliError;

#[derive(Args)]
pub struct FillArgs {
    /// Trial balance workbook (xlsx, xls, ods)
    #[arg(long, short = 't')]
    pub trial_balance: PathBuf,

    /// Statement template workbook (xlsx)
    #[arg(long)]
    pub template: PathBuf,

    /// Quotaholder movement export (semicolon-delimited)
    #[arg(long)]
    pub movement: Option<PathBuf>,

    /// Daily position export (semicolon-delimited)
    #[arg(long)]
    pub position: Option<PathBuf>,

    /// Output workbook [default: from settings, Dem_PL_Modelo_preenchido.xlsx]
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Trial-balance sheet, by name or 0-based position
    #[arg(long)]
    pub sheet: Option<String>,

    /// Settings file [default: <config dir>/dempl/settings.toml]
    #[arg(long, env = "DEMPL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write a JSON report of every change
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn cmd_fill(args: FillArgs) -> Result<(), CliError> {
    let settings = Settings::load(args.config.as_deref())?;

    let mut run = RunConfig::new(args.trial_balance, args.template, settings);
    run.position = args.position;
    run.movement = args.movement;
    run.report = args.report;
    run.sheet = args.sheet;
    if let Some(output) = args.output {
        run.output = output;
    }

    if run.output == run.template {
        return Err(CliError::args(format!(
            "output {} would overwrite the template",
            run.output.display()
        ))
        .with_hint("pass a different path with -o"));
    }

    let outcome = pipeline::run(&run)?;

    println!("written: {}", outcome.written.display());
    match &outcome.identifier {
        Some(id) => println!("cnpj:    {id}"),
        None => println!("cnpj:    not found"),
    }
    println!("{}", outcome.report.summary());
    Ok(())
}
