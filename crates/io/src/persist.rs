//! Saving with a timestamped fallback when the target is locked.
//!
//! The usual cause is the previous output still open in Excel. Instead of
//! failing the whole run, the workbook lands next to it as
//! `<stem>_<YYYYMMDD_HHMMSS><ext>`.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::PersistError;

/// Something that can write itself to a path.
pub trait Persist {
    fn save(&self, path: &Path) -> io::Result<()>;
}

// Windows sharing and lock violations.
const ERROR_SHARING_VIOLATION: i32 = 32;
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Whether a write failure means "in use" rather than "cannot write here".
pub fn is_locked(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
        || matches!(err.raw_os_error(), Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION))
}

/// `out/Dem_PL.xlsx` at 2024-03-05 14:07:09 → `out/Dem_PL_20240305_140709.xlsx`.
pub fn fallback_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let stamp = now.format("%Y%m%d_%H%M%S");
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{stamp}"),
    };
    path.with_file_name(name)
}

/// Save to `path`, or once to a timestamped sibling if `path` is locked.
/// Returns the path actually written.
pub fn persist<P: Persist + ?Sized>(doc: &P, path: &Path) -> Result<PathBuf, PersistError> {
    persist_at(doc, path, Local::now().naive_local())
}

pub fn persist_at<P: Persist + ?Sized>(doc: &P, path: &Path, now: NaiveDateTime) -> Result<PathBuf, PersistError> {
    match doc.save(path) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) if is_locked(&e) => {
            let fallback = fallback_path(path, now);
            log::warn!(
                "{} is locked ({e}), saving to {} instead",
                path.display(),
                fallback.display()
            );
            doc.save(&fallback).map_err(|e| PersistError::Locked {
                primary: path.to_path_buf(),
                fallback: fallback.clone(),
                message: e.to_string(),
            })?;
            Ok(fallback)
        }
        Err(e) => Err(PersistError::Write { path: path.to_path_buf(), message: e.to_string() }),
    }
}
