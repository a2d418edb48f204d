#![allow(clippy::unwrap_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wool_core::{Note, Notebook, NotebookConfig, StoreKind};

use crate::profile::Profile;

/// Isolated XDG dirs plus a profile of its own
pub struct TestDb {
    temp_dir: TempDir,
    pub db_dir: PathBuf,
    pub profile_name: String,
}

impl TestDb {
    pub fn new() -> Self {
        Self::build(None, vec![])
    }

    /// Replica whose exchange package lives in `exchange_dir`
    pub fn with_exchange_dir(exchange_dir: &Path) -> Self {
        Self::build(Some(exchange_dir), vec![])
    }

    pub fn with_default_tags(tags: &[&str]) -> Self {
        Self::build(None, tags.iter().map(|t| t.to_string()).collect())
    }

    fn build(exchange_dir: Option<&Path>, default_tags: Vec<String>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let profile_name = format!("test_{}", uuid::Uuid::new_v4().simple());

        // "wool" is appended to the XDG base dirs by the CLI
        let profile_config_dir = temp_dir.path().join("config").join("wool").join("profiles");
        std::fs::create_dir_all(&profile_config_dir).unwrap();

        let db_dir = temp_dir.path().join("db");
        let profile = Profile {
            db_dir: Some(db_dir.to_str().unwrap().to_string()),
            backup_dir: None,
            exchange_dir: exchange_dir.map(|d| d.to_str().unwrap().to_string()),
            default_tags,
        };
        profile
            .save(&profile_config_dir.join(format!("{}.toml", profile_name)))
            .unwrap();

        Self {
            temp_dir,
            db_dir,
            profile_name,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("wool").unwrap();

        cmd.env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"));
        cmd.env("XDG_DATA_HOME", self.temp_dir.path().join("data"));
        cmd.env("WOOL_PROFILE", &self.profile_name);
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Adds a plaintext note through the CLI and returns its id
    pub fn add(&self, name: &str, folder: &str, tags: &str, body: &str) -> String {
        let mut args = vec!["note", "add", "--name", name, "--folder", folder];
        if !tags.is_empty() {
            args.extend(["--tag", tags]);
        }
        args.extend(["--format", "plaintext", body]);

        self.cmd().args(&args).assert().success();
        self.notes()
            .into_iter()
            .find(|n| n.name == name)
            .map(|n| n.id)
            .unwrap()
    }

    /// Primary store, most recently changed first
    pub fn notes(&self) -> Vec<Note> {
        self.read(StoreKind::Notes)
    }

    pub fn trash(&self) -> Vec<Note> {
        self.read(StoreKind::Trash)
    }

    pub fn backup_count(&self) -> usize {
        std::fs::read_dir(self.db_dir.join("backup"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    fn read(&self, kind: StoreKind) -> Vec<Note> {
        let notebook = Notebook::open(NotebookConfig::in_dir(&self.db_dir)).unwrap();
        notebook
            .notes_sorted(kind)
            .into_iter()
            .cloned()
            .collect()
    }
}
