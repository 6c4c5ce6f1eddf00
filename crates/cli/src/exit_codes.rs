//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (template write failed mid-fill)       |
//! | 2    | Usage error (bad arguments, invalid settings file)   |
//! | 3    | Required input file missing                          |
//! | 4    | Output could not be saved (fallback included)        |
//! | 5    | Input file present but unreadable                    |

use dempl_config::ConfigError;
use dempl_engine::{FillError, LayoutError};
use dempl_io::{IoError, PersistError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, settings that fail to parse or validate.
pub const EXIT_USAGE: u8 = 2;

/// Trial balance or template path does not exist. Nothing was written.
pub const EXIT_MISSING_INPUT: u8 = 3;

/// Primary output locked and the timestamped fallback failed, or any other
/// write failure.
pub const EXIT_PERSIST: u8 = 4;

/// Input exists but cannot be opened or parsed (corrupt xlsx, unknown sheet).
pub const EXIT_INPUT_FORMAT: u8 = 5;

pub fn config_exit_code(_err: &ConfigError) -> u8 {
    EXIT_USAGE
}

pub fn layout_exit_code(_err: &LayoutError) -> u8 {
    EXIT_USAGE
}

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::MissingInputFile { .. } => EXIT_MISSING_INPUT,
        IoError::Open { .. } | IoError::Sheet { .. } | IoError::Tail { .. } => EXIT_INPUT_FORMAT,
    }
}

pub fn persist_exit_code(_err: &PersistError) -> u8 {
    EXIT_PERSIST
}

pub fn fill_exit_code(err: &FillError) -> u8 {
    match err {
        FillError::EmptyTemplate => EXIT_INPUT_FORMAT,
        FillError::Write { .. } => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_MISSING_INPUT, EXIT_PERSIST, EXIT_INPUT_FORMAT];
        let mut sorted = codes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn missing_input_is_three() {
        let err = IoError::MissingInputFile { role: "template", path: "x.xlsx".into() };
        assert_eq!(io_exit_code(&err), 3);
    }
}
