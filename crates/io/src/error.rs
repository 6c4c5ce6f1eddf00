use std::fmt;
use std::path::PathBuf;

use dempl_engine::TailError;

#[derive(Debug)]
pub enum IoError {
    /// A required input path does not exist.
    MissingInputFile { role: &'static str, path: PathBuf },
    /// The file exists but could not be opened or parsed.
    Open { path: PathBuf, message: String },
    /// The requested worksheet is absent or unreadable.
    Sheet { path: PathBuf, message: String },
    /// A footer-headed export could not be split into header and rows.
    Tail { path: PathBuf, error: TailError },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInputFile { role, path } => {
                write!(f, "{role} not found: {}", path.display())
            }
            Self::Open { path, message } => write!(f, "cannot open {}: {message}", path.display()),
            Self::Sheet { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Tail { path, error } => write!(f, "{}: {error}", path.display()),
        }
    }
}

impl std::error::Error for IoError {}

#[derive(Debug)]
pub enum PersistError {
    /// Primary path was locked and the timestamped fallback failed too.
    Locked { primary: PathBuf, fallback: PathBuf, message: String },
    /// Any other write failure.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked { primary, fallback, message } => write!(
                f,
                "{} is locked and fallback {} failed: {message}",
                primary.display(),
                fallback.display()
            ),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for PersistError {}
