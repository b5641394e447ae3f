use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Header of the column holding the access decision.
pub const DEFAULT_DECISION_COLUMN: &str = "Gives der aktindsigt?";
/// Token meaning "access is granted" for a row.
pub const DEFAULT_AFFIRMATIVE: &str = "Ja";
/// Token meaning "access is refused" for a row.
pub const DEFAULT_NEGATIVE: &str = "Nej";

/// Folder key -> classification, built by a single traversal.
pub type ResultMap = BTreeMap<String, Classification>;

/// Outcome of inspecting one folder's spreadsheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Every row is affirmative.
    FullGrant,
    /// Every row is negative.
    Rejected,
    /// Mixed, blank, or unrecognised values.
    PartialGrant,
    /// The decision column is not present in the sheet.
    ColumnMissing,
    /// The spreadsheet could not be fetched or decoded.
    ProcessingError,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::FullGrant,
        Classification::Rejected,
        Classification::PartialGrant,
        Classification::ColumnMissing,
        Classification::ProcessingError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::FullGrant => "full_grant",
            Classification::Rejected => "rejected",
            Classification::PartialGrant => "partial_grant",
            Classification::ColumnMissing => "column_missing",
            Classification::ProcessingError => "processing_error",
        }
    }

    /// Returns true for outcomes that signal a problem with the folder's spreadsheet
    /// rather than a decision.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Classification::ColumnMissing | Classification::ProcessingError
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::FullGrant => "full access granted",
            Classification::Rejected => "access refused",
            Classification::PartialGrant => "partial access granted",
            Classification::ColumnMissing => "decision column missing",
            Classification::ProcessingError => "error processing spreadsheet",
        };
        f.write_str(label)
    }
}

/// A decoded spreadsheet cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    String(String),
    Boolean(bool),
    /// Spreadsheet error value such as `#N/A`, kept as its display text.
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

/// One worksheet as a header row plus data rows.
///
/// Rows may be shorter than `headers`; missing trailing cells read as [`CellValue::Empty`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first column whose whitespace-trimmed header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows.iter().map(move |row| row.get(index).unwrap_or(EMPTY))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Decodes raw file bytes into a [`Table`].
pub trait TableReader {
    type Error: std::error::Error;

    fn read_table(&self, bytes: &[u8]) -> Result<Table, Self::Error>;
}

impl<T: TableReader + ?Sized> TableReader for &T {
    type Error = T::Error;

    fn read_table(&self, bytes: &[u8]) -> Result<Table, Self::Error> {
        (**self).read_table(bytes)
    }
}

/// Which column decides, and which tokens mean yes/no.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRule {
    pub column: String,
    pub affirmative: String,
    pub negative: String,
}

impl Default for DecisionRule {
    fn default() -> Self {
        Self {
            column: DEFAULT_DECISION_COLUMN.to_string(),
            affirmative: DEFAULT_AFFIRMATIVE.to_string(),
            negative: DEFAULT_NEGATIVE.to_string(),
        }
    }
}

/// How a folder is identified in the [`ResultMap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderKey {
    /// Full '/'-delimited folder path. Unique per folder.
    #[default]
    Path,
    /// Bare folder name. Folders sharing a name in different branches collide and the
    /// later one in traversal order wins.
    Name,
}

impl FolderKey {
    pub fn key_for(self, folder_path: &str) -> String {
        match self {
            FolderKey::Path => folder_path.to_string(),
            FolderKey::Name => crate::path::simple_name(folder_path).to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FolderKey::Path => "path",
            FolderKey::Name => "name",
        }
    }
}
