use std::fmt;

/// Errors that abort a fill pass.
#[derive(Debug)]
pub enum FillError {
    /// The template has no worksheets, so there is no first sheet for summaries.
    EmptyTemplate,
    /// A summary cell could not be written.
    Write { cell: String, message: String },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTemplate => write!(f, "template contains no sheets"),
            Self::Write { cell, message } => write!(f, "cannot write {cell}: {message}"),
        }
    }
}

impl std::error::Error for FillError {}

/// Errors from the footer-headed delimited sources (daily position, movement).
#[derive(Debug, Clone, PartialEq)]
pub enum TailError {
    /// Fewer than two non-blank lines: no header plus data.
    TooFewLines { source: String, lines: usize },
    /// The header line does not name the requested column.
    MissingColumn { source: String, column: String },
    /// The header line could not be split into fields.
    Csv { source: String, message: String },
}

impl fmt::Display for TailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLines { source, lines } => {
                write!(f, "{source}: expected a header and data, found {lines} non-blank line(s)")
            }
            Self::MissingColumn { source, column } => {
                write!(f, "{source}: missing column '{column}'")
            }
            Self::Csv { source, message } => write!(f, "{source}: {message}"),
        }
    }
}

impl std::error::Error for TailError {}

/// Layout validation error (bad column letter, bad cell reference, duplicate cell).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutError(pub String);

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layout error: {}", self.0)
    }
}

impl std::error::Error for LayoutError {}
