#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use docreview_core::{
    CellValue, Diagnostics, FolderStore, MemoryFolderStore, StoreError, Table, TableReader,
    DEFAULT_DECISION_COLUMN,
};

#[derive(Debug, thiserror::Error)]
#[error("unreadable workbook")]
pub struct Unreadable;

/// Test reader: first line is the header row, `|`-separated; one row per following line.
/// Content starting with `!` fails to decode.
pub struct PipeTableReader;

impl TableReader for PipeTableReader {
    type Error = Unreadable;

    fn read_table(&self, bytes: &[u8]) -> Result<Table, Unreadable> {
        let text = std::str::from_utf8(bytes).map_err(|_| Unreadable)?;
        if text.starts_with('!') {
            return Err(Unreadable);
        }
        let mut lines = text.lines();
        let headers = lines
            .next()
            .map(|h| h.split('|').map(str::to_string).collect())
            .unwrap_or_default();
        let rows = lines
            .map(|line| {
                line.split('|')
                    .map(|cell| {
                        if cell.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::from(cell)
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(Table::new(headers, rows))
    }
}

/// Sheet bytes with the default decision column holding `values`.
pub fn decisions(values: &[&str]) -> Vec<u8> {
    let mut out = String::from(DEFAULT_DECISION_COLUMN);
    for v in values {
        out.push('\n');
        out.push_str(v);
    }
    out.into_bytes()
}

pub fn unreadable() -> Vec<u8> {
    b"!not a workbook".to_vec()
}

/// Wraps a [`MemoryFolderStore`], records listing calls and injects failures.
pub struct ScriptedStore<'a> {
    pub inner: &'a MemoryFolderStore,
    pub fail_listing: Vec<String>,
    pub fail_fetch: Vec<String>,
    pub listed_subfolders: RefCell<Vec<String>>,
    pub listed_files: RefCell<Vec<String>>,
    pub fetched: RefCell<Vec<String>>,
}

impl<'a> ScriptedStore<'a> {
    pub fn new(inner: &'a MemoryFolderStore) -> Self {
        Self {
            inner,
            fail_listing: Vec::new(),
            fail_fetch: Vec::new(),
            listed_subfolders: RefCell::new(Vec::new()),
            listed_files: RefCell::new(Vec::new()),
            fetched: RefCell::new(Vec::new()),
        }
    }

    fn check_listing(&self, path: &str) -> Result<(), StoreError> {
        if self.fail_listing.iter().any(|p| p == path) {
            return Err(StoreError::remote(path, "503 service unavailable"));
        }
        Ok(())
    }
}

impl FolderStore for ScriptedStore<'_> {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.listed_subfolders.borrow_mut().push(path.to_string());
        self.check_listing(path)?;
        self.inner.list_subfolders(path)
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.listed_files.borrow_mut().push(path.to_string());
        self.check_listing(path)?;
        self.inner.list_files(path)
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.fetched.borrow_mut().push(path.to_string());
        if self.fail_fetch.iter().any(|p| p == path) {
            return Err(StoreError::remote(path, "connection reset"));
        }
        self.inner.fetch_file(path)
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
