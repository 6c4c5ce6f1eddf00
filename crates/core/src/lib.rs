//! `dempl-core`: shared cell model.
//!
//! Values read from any spreadsheet source are normalized into [`CellValue`]
//! before the engine looks at them, and every fixed coordinate is a [`CellRef`].

pub mod cell;
pub mod cell_ref;

pub use cell::CellValue;
pub use cell_ref::{col_from_letters, col_to_letters, CellRef, CellRefError};
