//! Locations a notebook reads and writes.
//!
//! Passed explicitly to [`crate::Notebook::open`]; nothing in the core
//! looks paths up on its own.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::schema::{FILE_EXCHANGE_DAT, FILE_EXCHANGE_ZIP, FILE_NOTES_DAT, FILE_NOTES_TRASH_DAT};
use crate::util::current_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookConfig {
    /// Primary store, trash and the transient exchange snapshot
    pub db_dir: PathBuf,
    pub backup_dir: PathBuf,
    /// Where export writes and import reads the exchange package
    pub exchange_dir: PathBuf,
    /// Back up both stores every time the notebook is opened
    #[serde(default)]
    pub backup_on_open: bool,
}

impl NotebookConfig {
    /// Config with backups in `<db_dir>/backup` and exchange in `<db_dir>/exchange`
    pub fn in_dir(db_dir: impl Into<PathBuf>) -> Self {
        let db_dir = db_dir.into();
        NotebookConfig {
            backup_dir: db_dir.join("backup"),
            exchange_dir: db_dir.join("exchange"),
            backup_on_open: false,
            db_dir,
        }
    }

    pub fn notes_path(&self) -> PathBuf {
        self.db_dir.join(FILE_NOTES_DAT)
    }

    pub fn trash_path(&self) -> PathBuf {
        self.db_dir.join(FILE_NOTES_TRASH_DAT)
    }

    /// Uncompressed snapshot written on export and extracted on import
    pub fn exchange_snapshot_path(&self) -> PathBuf {
        self.db_dir.join(FILE_EXCHANGE_DAT)
    }

    pub fn exchange_package_path(&self) -> PathBuf {
        self.exchange_dir.join(FILE_EXCHANGE_ZIP)
    }

    /// `backup_<timestamp>[_<suffix>]_<file_name>` inside the backup dir
    pub fn backup_path(&self, suffix: Option<&str>, file_name: &str) -> PathBuf {
        backup_path_at(&self.backup_dir, &current_timestamp(), suffix, file_name)
    }

    /// Creates every configured directory that doesn't exist yet
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.db_dir, &self.backup_dir, &self.exchange_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

fn backup_path_at(dir: &Path, timestamp: &str, suffix: Option<&str>, file_name: &str) -> PathBuf {
    let mut stamp = timestamp.replace(':', "-").replace(' ', "_");
    if let Some(suffix) = suffix {
        stamp.push('_');
        stamp.push_str(suffix);
    }
    dir.join(format!("backup_{}_{}", stamp, file_name))
}
