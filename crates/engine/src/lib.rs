//! `dempl-engine`: balance resolution and template fill.
//!
//! Pure engine crate: receives a pre-loaded trial balance and a template behind
//! the [`TemplateDocument`] trait, mutates the template in place and returns a
//! [`FillReport`]. No file or process I/O happens here.

pub mod blocks;
pub mod config;
pub mod document;
pub mod error;
pub mod fill;
pub mod identifier;
pub mod index;
pub mod model;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod rounding;
pub mod tail;

pub use blocks::{BlockAggregator, Section, SectionTotals};
pub use config::{FillLayout, SectionScope, TrialBalanceLayout};
pub use document::TemplateDocument;
pub use error::{FillError, LayoutError, TailError};
pub use fill::{fill, ScalarFacts};
pub use identifier::Identifier;
pub use index::AccountIndex;
pub use model::TrialBalance;
pub use report::FillReport;
