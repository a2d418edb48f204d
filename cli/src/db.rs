use std::collections::BTreeSet;

use anyhow::{Context, Result};
use wool_core::{ImportMode, MergeReport, Note, NoteInput, Notebook, StoreKind, VirtualFolders};

use crate::app_config::AppConfig;

/// Notebook of the selected profile, with id prefix lookup
pub struct LocalDb {
    notebook: Notebook,
}

impl LocalDb {
    /// Open or create the notebook in the profile's directories
    pub fn open(config: &AppConfig) -> Result<Self> {
        let notebook = Notebook::open(config.notebook_config())
            .with_context(|| format!("Failed to open notebook at {:?}", config.db_dir))?;

        Ok(Self { notebook })
    }

    /// Full id for an exact id or a unique id prefix (case-insensitive)
    pub fn resolve_id(&self, kind: StoreKind, prefix: &str) -> Result<String> {
        let store = self.notebook.store(kind);
        if store.contains(prefix) {
            return Ok(prefix.to_string());
        }

        let upper = prefix.to_uppercase();
        let mut matches = store.ids().filter(|id| id.starts_with(&upper));
        match (matches.next(), matches.next()) {
            (Some(id), None) if !prefix.is_empty() => Ok(id.to_string()),
            (Some(_), Some(_)) => anyhow::bail!("Ambiguous note id: {}", prefix),
            _ => anyhow::bail!("Note not found: {}", prefix),
        }
    }

    pub fn resolve_ids(&self, kind: StoreKind, prefixes: &[String]) -> Result<Vec<String>> {
        prefixes
            .iter()
            .map(|p| self.resolve_id(kind, p))
            .collect()
    }

    pub fn get(&self, kind: StoreKind, id: &str) -> Result<&Note> {
        self.notebook
            .get(kind, id)
            .with_context(|| format!("Failed to read note {}", id))
    }

    pub fn create_note(&mut self, input: &NoteInput) -> Result<String> {
        self.notebook
            .create_note(input)
            .context("Failed to create note")
    }

    pub fn update_note(&mut self, id: &str, input: &NoteInput) -> Result<()> {
        self.notebook
            .update_note(id, input)
            .context("Failed to update note")
    }

    pub fn delete_notes(&mut self, ids: &[String]) -> Result<()> {
        self.notebook
            .delete_notes(ids)
            .context("Failed to move notes to trash")
    }

    pub fn add_tag(&mut self, ids: &[String], tag: &str) -> Result<()> {
        self.notebook.add_tag(ids, tag).context("Failed to add tag")
    }

    pub fn remove_tag(&mut self, ids: &[String], tag: &str) -> Result<()> {
        self.notebook
            .remove_tag(ids, tag)
            .context("Failed to remove tag")
    }

    pub fn move_to_folder(&mut self, ids: &[String], folder: &str) -> Result<()> {
        self.notebook
            .move_to_folder(ids, folder)
            .context("Failed to move notes")
    }

    pub fn dismiss_reminder(&mut self, ids: &[String]) -> Result<()> {
        self.notebook
            .dismiss_reminder(ids)
            .context("Failed to dismiss reminders")
    }

    /// Notes most recently changed first, optionally narrowed to a folder and tag
    pub fn list_notes(
        &self,
        kind: StoreKind,
        folder: Option<&str>,
        tag: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<&Note>> {
        let store = self.notebook.store(kind);
        let mut ids: Vec<String> = match folder {
            Some(folder) => store.filter_folder(folder),
            None => store.ids().map(str::to_string).collect(),
        };
        if let Some(tag) = tag {
            let tagged: BTreeSet<String> = store.filter_tag(tag).into_iter().collect();
            ids.retain(|id| tagged.contains(id));
        }

        let sorted = store
            .sort_ids_descending_lamport(ids)
            .context("Failed to sort notes")?;
        Ok(self.notes(kind, &sorted, limit))
    }

    /// Query results in result order, plus the terms to highlight
    pub fn search(
        &self,
        kind: StoreKind,
        query: &str,
        limit: Option<usize>,
    ) -> (Vec<&Note>, Vec<String>) {
        let result = self.notebook.search(kind, query);
        (self.notes(kind, &result.ids, limit), result.highlights)
    }

    pub fn folders(&self) -> Vec<String> {
        self.notebook.folders()
    }

    pub fn tags(&self) -> Vec<String> {
        self.notebook.tags()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.notebook.contexts()
    }

    pub fn virtual_folders(&mut self) -> Result<VirtualFolders> {
        self.notebook
            .virtual_folders()
            .context("Failed to read virtual folders")
    }

    /// Notes of a virtual folder, `None` if it isn't defined
    pub fn virtual_folder(&mut self, name: &str) -> Result<Option<(Vec<&Note>, Vec<String>)>> {
        let result = self
            .notebook
            .virtual_folder(name)
            .context("Failed to read virtual folders")?;

        Ok(result.map(|r| (self.notes(StoreKind::Notes, &r.ids, None), r.highlights)))
    }

    pub fn export(&mut self) -> Result<()> {
        self.notebook.export().context("Failed to export")
    }

    pub fn import(&mut self, mode: ImportMode) -> Result<Option<MergeReport>> {
        self.notebook.import(mode).context("Failed to import")
    }

    pub fn exchange_package_path(&self) -> std::path::PathBuf {
        self.notebook.config().exchange_package_path()
    }

    fn notes(&self, kind: StoreKind, ids: &[String], limit: Option<usize>) -> Vec<&Note> {
        let store = self.notebook.store(kind);
        ids.iter()
            .filter_map(|id| store.get(id))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}
