// dempl - fill a Dem-PL statement template from a trial balance

mod accounts;
mod exit_codes;
mod fill;
mod pipeline;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use dempl_config::ConfigError;
use dempl_engine::{FillError, LayoutError};
use dempl_io::{IoError, PersistError};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "dempl")]
#[command(about = "Fill a Dem-PL statement template from a trial balance")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve account expressions in the template and save a filled copy
    #[command(after_help = "\
Examples:
  dempl fill --trial-balance balancete.xlsx --template Dem_PL_Modelo.xlsx
  dempl fill -t balancete.xlsx --template modelo.xlsx --position carteira.csv \\
      --movement movimentacao.csv -o saida.xlsx --report saida.json")]
    Fill(fill::FillArgs),

    /// Print the account index built from a trial balance
    #[command(after_help = "\
Examples:
  dempl accounts --trial-balance balancete.xlsx
  dempl accounts -t balancete.xlsx --sheet Balancete --json")]
    Accounts(accounts::AccountsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Fill(args) => fill::cmd_fill(args),
        Commands::Accounts(args) => accounts::cmd_accounts(args),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let code = exit_codes::config_exit_code(&err);
        let hint = match &err {
            ConfigError::Read { .. } => Some("check the path given to --config (or DEMPL_CONFIG)"),
            ConfigError::Parse { .. } => Some("cells are A1 references like \"J34\"; unknown keys are rejected"),
            ConfigError::Validation(_) => None,
        };
        Self { code, message: err.to_string(), hint: hint.map(str::to_string) }
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        Self { code: exit_codes::layout_exit_code(&err), message: err.to_string(), hint: None }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = exit_codes::io_exit_code(&err);
        let hint = match &err {
            IoError::MissingInputFile { .. } => Some("nothing was written; check the input paths".to_string()),
            IoError::Sheet { .. } => Some("pick the sheet with --sheet <name|index>".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<PersistError> for CliError {
    fn from(err: PersistError) -> Self {
        let hint = match &err {
            PersistError::Locked { .. } => Some("close the workbook in Excel or choose another path with -o".to_string()),
            PersistError::Write { .. } => None,
        };
        Self { code: exit_codes::persist_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<FillError> for CliError {
    fn from(err: FillError) -> Self {
        Self { code: exit_codes::fill_exit_code(&err), message: err.to_string(), hint: None }
    }
}
