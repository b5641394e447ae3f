//! Folder storage seam.

mod memory;

pub use memory::MemoryFolderStore;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store request for `{path}` failed: {source}")]
    Remote {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn remote(path: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StoreError::Remote {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Hierarchical folder storage addressed by '/'-delimited paths.
///
/// Listing calls return simple names (not full paths) in the store's own order.
pub trait FolderStore {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError>;
    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError>;
    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError>;
}

impl<T: FolderStore + ?Sized> FolderStore for &T {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_subfolders(path)
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_files(path)
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        (**self).fetch_file(path)
    }
}

impl<T: FolderStore + ?Sized> FolderStore for Box<T> {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_subfolders(path)
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_files(path)
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        (**self).fetch_file(path)
    }
}
