// File I/O: trial balance, template workbook, delimited exports, saving

pub mod delimited;
pub mod error;
pub mod persist;
pub mod template;
pub mod trial_balance;

pub use error::{IoError, PersistError};
pub use persist::{persist, Persist};
pub use template::TemplateWorkbook;
pub use trial_balance::SheetSelector;

use std::path::Path;

/// Fail early with `MissingInputFile` before any parser sees the path.
pub(crate) fn require_file(role: &'static str, path: &Path) -> Result<(), IoError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IoError::MissingInputFile { role, path: path.to_path_buf() })
    }
}
