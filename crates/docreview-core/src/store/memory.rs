use std::collections::BTreeMap;

use super::{FolderStore, StoreError};
use crate::path::{join_path, normalize_path, simple_name};

#[derive(Clone, Debug, Default)]
struct MemoryFolder {
    subfolders: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
}

/// In-memory [`FolderStore`].
///
/// Children are listed in insertion order. Adding a folder or file creates any missing
/// ancestors.
#[derive(Clone, Debug, Default)]
pub struct MemoryFolderStore {
    folders: BTreeMap<String, MemoryFolder>,
}

impl MemoryFolderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, path: &str) -> &mut Self {
        self.ensure_folder(&normalize_path(path));
        self
    }

    /// Add (or replace) a file. `path` is the full file path.
    pub fn add_file(&mut self, path: &str, bytes: impl Into<Vec<u8>>) -> &mut Self {
        let path = normalize_path(path);
        let Some(parent) = parent_of(&path) else {
            return self;
        };
        let name = simple_name(&path).to_string();
        let folder = self.ensure_folder(&parent);

        let bytes = bytes.into();
        match folder.files.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = bytes,
            None => folder.files.push((name, bytes)),
        }
        self
    }

    pub fn contains_folder(&self, path: &str) -> bool {
        self.folders.contains_key(&normalize_path(path))
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    fn ensure_folder(&mut self, path: &str) -> &mut MemoryFolder {
        if !self.folders.contains_key(path) {
            if let Some(parent) = parent_of(path) {
                self.ensure_folder(&parent)
                    .subfolders
                    .push(simple_name(path).to_string());
            }
        }
        self.folders.entry(path.to_string()).or_default()
    }

    fn folder(&self, path: &str) -> Result<&MemoryFolder, StoreError> {
        let path = normalize_path(path);
        self.folders
            .get(&path)
            .ok_or(StoreError::NotFound(path))
    }
}

fn parent_of(path: &str) -> Option<String> {
    match path.rsplit_once('/') {
        Some(("", name)) if !name.is_empty() => Some("/".to_string()),
        Some((parent, name)) if !name.is_empty() => Some(parent.to_string()),
        _ => None,
    }
}

impl FolderStore for MemoryFolderStore {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.folder(path)?.subfolders.clone())
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .folder(path)?
            .files
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let path = normalize_path(path);
        let not_found = || StoreError::NotFound(path.clone());
        let parent = parent_of(&path).ok_or_else(not_found)?;
        let name = simple_name(&path);
        let folder = self.folders.get(&parent).ok_or_else(not_found)?;
        folder
            .files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(not_found)
    }
}
