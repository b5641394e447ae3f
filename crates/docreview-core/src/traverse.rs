use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::classify::SpreadsheetClassifier;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::filter::NameFilter;
use crate::model::{Classification, DecisionRule, FolderKey, ResultMap, TableReader};
use crate::path::{join_path, normalize_path, simple_name};
use crate::store::{FolderStore, StoreError};

pub const DEFAULT_SPREADSHEET_EXTENSION: &str = ".xlsx";

/// Failures that abort a whole traversal. Per-spreadsheet problems are recorded in the
/// result map instead.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("root folder not found: {0}")]
    NotFound(String),
    #[error("failed to list folder `{path}`")]
    Remote {
        path: String,
        #[source]
        source: StoreError,
    },
}

/// Walks a folder tree and classifies the first spreadsheet of every eligible folder.
pub struct FolderClassifier<S, R> {
    store: S,
    sheets: SpreadsheetClassifier<R>,
    key: FolderKey,
    extension: String,
    diagnostics: Arc<dyn Diagnostics + Send + Sync>,
}

impl<S: FolderStore, R: TableReader> FolderClassifier<S, R> {
    pub fn new(store: S, reader: R) -> Self {
        Self {
            store,
            sheets: SpreadsheetClassifier::new(reader),
            key: FolderKey::default(),
            extension: DEFAULT_SPREADSHEET_EXTENSION.to_string(),
            diagnostics: Arc::new(LogDiagnostics),
        }
    }

    pub fn with_rule(mut self, rule: DecisionRule) -> Self {
        self.sheets = self.sheets.with_rule(rule);
        self
    }

    pub fn with_key(mut self, key: FolderKey) -> Self {
        self.key = key;
        self
    }

    /// File name suffix identifying a spreadsheet (exact, case-sensitive).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics + Send + Sync>) -> Self {
        self.sheets = self.sheets.with_diagnostics(diagnostics.clone());
        self.diagnostics = diagnostics;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify every folder under (and including) `root`.
    ///
    /// Folders are processed parent-before-children, siblings in the order the store lists
    /// them. `name_filter` only decides which folders get their spreadsheet inspected; every
    /// folder is descended into regardless.
    pub fn classify_tree(
        &self,
        root: &str,
        name_filter: Option<&NameFilter>,
    ) -> Result<ResultMap, ClassifyError> {
        let root = normalize_path(root);
        self.diagnostics
            .info(&format!("classifying folders under {root}"));

        let mut results = ResultMap::new();
        let mut visited = HashSet::new();
        // Work list instead of recursion so deep trees cannot exhaust the call stack.
        let mut pending = vec![root.clone()];

        while let Some(folder) = pending.pop() {
            if !visited.insert(folder.clone()) {
                continue;
            }

            let subfolders = self
                .store
                .list_subfolders(&folder)
                .map_err(|err| listing_error(&root, &folder, err))?;

            let eligible = name_filter.map_or(true, |f| f.matches(simple_name(&folder)));
            if eligible {
                let files = self
                    .store
                    .list_files(&folder)
                    .map_err(|err| listing_error(&root, &folder, err))?;
                if let Some(classification) = self.classify_folder(&folder, &files) {
                    self.record(&mut results, &folder, classification);
                }
            }

            for name in subfolders.iter().rev() {
                pending.push(join_path(&folder, name));
            }
        }

        self.diagnostics.info(&format!(
            "classified {} folder(s) out of {} visited under {root}",
            results.len(),
            visited.len()
        ));
        Ok(results)
    }

    /// Only the first spreadsheet in listing order is considered; later ones are ignored.
    fn classify_folder(&self, folder: &str, files: &[String]) -> Option<Classification> {
        let file = files.iter().find(|name| name.ends_with(&self.extension))?;
        let file_path = join_path(folder, file);

        let classification = match self.store.fetch_file(&file_path) {
            Ok(bytes) => self.sheets.classify_bytes(&file_path, &bytes),
            Err(err) => {
                self.diagnostics
                    .error(&format!("error fetching spreadsheet {file_path}: {err}"));
                Classification::ProcessingError
            }
        };
        Some(classification)
    }

    fn record(&self, results: &mut ResultMap, folder: &str, classification: Classification) {
        let key = self.key.key_for(folder);
        if let Some(previous) = results.insert(key.clone(), classification) {
            self.diagnostics.info(&format!(
                "folder key `{key}` seen again at {folder}; replacing {} with {}",
                previous.as_str(),
                classification.as_str()
            ));
        }
    }
}

fn listing_error(root: &str, folder: &str, err: StoreError) -> ClassifyError {
    match err {
        StoreError::NotFound(_) if folder == root => ClassifyError::NotFound(root.to_string()),
        err => ClassifyError::Remote {
            path: folder.to_string(),
            source: err,
        },
    }
}
