//! SharePoint document library access for docreview.
//!
//! [`SharePointFolderStore`] implements [`docreview_core::FolderStore`] on top of the
//! SharePoint REST API. Authentication is the caller's business: the store is handed a
//! bearer token through [`SharePointConfig`] and never performs a login handshake itself.

mod config;
mod rest;
mod store;

pub use config::{SharePointConfig, SharePointError};
pub use store::SharePointFolderStore;
