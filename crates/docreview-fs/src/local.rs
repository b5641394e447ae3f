use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use docreview_core::{FolderStore, StoreError};

/// [`FolderStore`] over a directory tree on disk.
///
/// Store paths are '/'-delimited and resolved beneath `base`; a leading '/' is optional.
/// Listings are sorted by name and never follow symlinks, so a linked directory can't
/// introduce a cycle.
#[derive(Clone, Debug)]
pub struct LocalFolderStore {
    base: PathBuf,
}

impl LocalFolderStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let mut resolved = self.base.clone();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                segment if is_plain_name(segment) => resolved.push(segment),
                _ => return Err(StoreError::NotFound(path.to_string())),
            }
        }
        Ok(resolved)
    }

    fn list(&self, path: &str, want_dirs: bool) -> Result<Vec<String>, StoreError> {
        let dir = self.resolve(path)?;
        let meta = fs::metadata(&dir).map_err(|err| io_error(path, err))?;
        if !meta.is_dir() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|err| io_error(path, err))? {
            let entry = entry.map_err(|err| io_error(path, err))?;
            let file_type = entry.file_type().map_err(|err| io_error(path, err))?;
            let wanted = if want_dirs {
                file_type.is_dir()
            } else {
                file_type.is_file()
            };
            if !wanted {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!(
                    "skipping non-UTF-8 entry {:?} in {}",
                    raw,
                    dir.display()
                ),
            }
        }

        names.sort();
        Ok(names)
    }
}

/// A single path component that cannot climb out of, or replace, the base directory.
/// `\` and `:` are refused on every platform.
fn is_plain_name(segment: &str) -> bool {
    if segment.contains(['\\', ':']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn io_error(path: &str, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(path.to_string())
    } else {
        StoreError::remote(path, err)
    }
}

impl FolderStore for LocalFolderStore {
    fn list_subfolders(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.list(path, true)
    }

    fn list_files(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.list(path, false)
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let file = self.resolve(path)?;
        fs::read(&file).map_err(|err| io_error(path, err))
    }
}
