#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

pub mod config;
pub mod edit;
pub mod error;
pub mod exchange;
pub mod models;
pub mod notebook;
pub mod schema;
pub mod search;
pub mod store;
pub mod sync;
pub mod util;
pub mod virtual_folder;

// Re-export commonly used types
pub use config::NotebookConfig;
pub use edit::{sanitize_and_apply, NoteInput};
pub use error::{Error, Result};
pub use models::{BodyFormat, Note};
pub use notebook::{Notebook, StoreKind};
pub use search::{search, SearchResult};
pub use store::{SaveKind, Store};
pub use sync::{merge_stores, ImportMode, MergeReport};
pub use virtual_folder::VirtualFolders;
