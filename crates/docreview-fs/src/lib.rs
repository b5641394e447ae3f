//! Local filesystem support for docreview.
//!
//! - [`LocalFolderStore`]: a [`docreview_core::FolderStore`] over a directory on disk
//! - [`atomic_write_bytes`]: report output that never leaves a half-written file behind

mod atomic;
mod local;

pub use atomic::atomic_write_bytes;
pub use local::LocalFolderStore;
