//! Case-folder review core.
//!
//! Walks a folder tree through a [`FolderStore`], picks at most one spreadsheet per
//! eligible folder, and classifies the access decision recorded in it. The result is a
//! flat [`ResultMap`] from folder key to [`Classification`].
//!
//! Storage backends, spreadsheet decoding and diagnostics are all injected:
//! - [`FolderStore`] lists folders/files and fetches file bytes
//! - [`TableReader`] turns file bytes into a [`Table`]
//! - [`Diagnostics`] receives informational and error messages

mod classify;
mod diagnostics;
mod filter;
mod model;
pub mod path;
pub mod store;
mod traverse;

pub use classify::SpreadsheetClassifier;
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use filter::{NameFilter, CASE_NUMBER_PATTERN};
pub use model::{
    CellValue, Classification, DecisionRule, FolderKey, ResultMap, Table, TableReader,
    DEFAULT_AFFIRMATIVE, DEFAULT_DECISION_COLUMN, DEFAULT_NEGATIVE,
};
pub use store::{FolderStore, MemoryFolderStore, StoreError};
pub use traverse::{ClassifyError, FolderClassifier, DEFAULT_SPREADSHEET_EXTENSION};
