use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::NotebookConfig;
use crate::edit::{sanitize_and_apply, NoteInput};
use crate::error::{Error, Result};
use crate::models::Note;
use crate::search::{search, SearchResult};
use crate::store::Store;
use crate::sync::{self, ImportMode, MergeReport};
use crate::util::current_timestamp;
use crate::virtual_folder::VirtualFolders;

/// Which of the notebook's two stores an operation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Notes,
    Trash,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Notes => write!(f, "notes"),
            StoreKind::Trash => write!(f, "trash"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "notes" => Ok(StoreKind::Notes),
            "trash" => Ok(StoreKind::Trash),
            other => Err(Error::InvalidInput(format!("Unknown store: {}", other))),
        }
    }
}

/// Primary and trash stores plus the locations they live in.
///
/// Every mutating operation saves the affected stores before returning.
#[derive(Debug)]
pub struct Notebook {
    config: NotebookConfig,
    store: Store,
    trash: Store,
}

impl Notebook {
    /// Opens the notebook described by `config`, creating its directories.
    ///
    /// Store files that don't exist yet are treated as empty stores.
    pub fn open(config: NotebookConfig) -> Result<Self> {
        config.ensure_dirs()?;

        let mut store = Store::new(config.notes_path());
        let mut trash = Store::new(config.trash_path());
        if config.notes_path().is_file() {
            store.load()?;
        }
        if config.trash_path().is_file() {
            trash.load()?;
        }

        let mut notebook = Notebook {
            config,
            store,
            trash,
        };
        if notebook.config.backup_on_open {
            notebook.backup(None)?;
        }
        info!(
            notes = notebook.store.len(),
            trash = notebook.trash.len(),
            "Opened notebook"
        );
        Ok(notebook)
    }

    pub fn config(&self) -> &NotebookConfig {
        &self.config
    }

    pub fn store(&self, kind: StoreKind) -> &Store {
        match kind {
            StoreKind::Notes => &self.store,
            StoreKind::Trash => &self.trash,
        }
    }

    pub fn get(&self, kind: StoreKind, id: &str) -> Result<&Note> {
        self.store(kind)
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Notes of a store, most recently changed first
    pub fn notes_sorted(&self, kind: StoreKind) -> Vec<&Note> {
        let store = self.store(kind);
        store
            .sorted_ids_descending_lamport()
            .iter()
            .filter_map(|id| store.get(id))
            .collect()
    }

    /// Creates a note from user input and saves it, returning the new id
    pub fn create_note(&mut self, input: &NoteInput) -> Result<String> {
        let mut note = Note::new();
        sanitize_and_apply(&mut note, input);
        let id = self.store.add(note);
        self.store.save(None)?;
        debug!(id, "Created note");
        Ok(id)
    }

    /// Replaces a note's fields with user input and saves it
    pub fn update_note(&mut self, id: &str, input: &NoteInput) -> Result<()> {
        let note = self
            .store
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        sanitize_and_apply(note, input);
        note.changed_date = current_timestamp();
        self.store.touch(id)?;
        self.store.save(None)?;
        debug!(id, "Updated note");
        Ok(())
    }

    /// Moves notes to the trash. Fails without changes if any id is unknown.
    /// Repeated ids are moved once.
    pub fn delete_notes<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        let mut seen = BTreeSet::new();
        let ids: Vec<&str> = ids
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| seen.insert(*id))
            .collect();
        self.check_ids(&ids)?;
        for id in &ids {
            let note = self.store.remove(id)?;
            self.trash.add(note);
        }
        self.store.save(None)?;
        self.trash.save(None)?;
        info!(count = ids.len(), "Moved notes to trash");
        Ok(())
    }

    pub fn add_tag<S: AsRef<str>>(&mut self, ids: &[S], tag: &str) -> Result<()> {
        self.edit_each(ids, |note| {
            note.tags.insert(tag.to_string());
            true
        })
    }

    /// Removes a tag; notes that don't carry it keep their version
    pub fn remove_tag<S: AsRef<str>>(&mut self, ids: &[S], tag: &str) -> Result<()> {
        self.edit_each(ids, |note| note.tags.remove(tag))
    }

    pub fn move_to_folder<S: AsRef<str>>(&mut self, ids: &[S], folder: &str) -> Result<()> {
        self.edit_each(ids, |note| {
            note.folder = folder.to_string();
            true
        })
    }

    /// Marks the due-date reminder as seen
    pub fn dismiss_reminder<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        self.edit_each(ids, |note| {
            note.due_date_reminder_dismissed = true;
            true
        })
    }

    /// Applies `edit` to each note, touching those it reports as changed
    fn edit_each<S, F>(&mut self, ids: &[S], mut edit: F) -> Result<()>
    where
        S: AsRef<str>,
        F: FnMut(&mut Note) -> bool,
    {
        self.check_ids(ids)?;
        for id in ids {
            let id = id.as_ref();
            let changed = self.store.get_mut(id).is_some_and(&mut edit);
            if changed {
                self.store.touch(id)?;
            }
        }
        self.store.save(None)?;
        Ok(())
    }

    fn check_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<()> {
        match ids.iter().find(|id| !self.store.contains(id.as_ref())) {
            Some(missing) => Err(Error::NotFound(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }

    pub fn search(&self, kind: StoreKind, query: &str) -> SearchResult {
        search(self.store(kind), query)
    }

    pub fn folders(&self) -> Vec<String> {
        self.store.folder_list()
    }

    pub fn tags(&self) -> Vec<String> {
        self.store.tag_list()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.store.context_list()
    }

    /// Reads the virtual folders, saving the store if a default
    /// configuration note had to be created
    pub fn virtual_folders(&mut self) -> Result<VirtualFolders> {
        let before = self.store.len();
        let folders = VirtualFolders::read_from_store(&mut self.store);
        if self.store.len() != before {
            self.store.save(None)?;
        }
        Ok(folders)
    }

    /// Evaluates a virtual folder; `None` if it isn't defined
    pub fn virtual_folder(&mut self, name: &str) -> Result<Option<SearchResult>> {
        let folders = self.virtual_folders()?;
        Ok(folders.evaluate(name, &self.store))
    }

    /// Writes both stores to the backup dir
    pub fn backup(&mut self, suffix: Option<&str>) -> Result<()> {
        sync::backup_stores(&mut self.store, &mut self.trash, &self.config, suffix)
    }

    /// Imports the exchange package and saves the result.
    ///
    /// Returns the merge report, or `None` in replace mode.
    pub fn import(&mut self, mode: ImportMode) -> Result<Option<MergeReport>> {
        let report = sync::import(&mut self.store, &mut self.trash, &self.config, mode)?;
        self.save()?;
        Ok(report)
    }

    pub fn export(&mut self) -> Result<()> {
        sync::export(&mut self.store, &mut self.trash, &self.config)
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(None)?;
        self.trash.save(None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::BodyFormat;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Notebook {
        Notebook::open(NotebookConfig::in_dir(dir.path())).unwrap()
    }

    fn input(name: &str, folder: &str, tags: &str) -> NoteInput {
        NoteInput {
            name: name.to_string(),
            folder: folder.to_string(),
            tags: tags.to_string(),
            body: "body".to_string(),
            format: "plaintext".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_empty_dir() {
        let dir = TempDir::new().unwrap();
        let notebook = open(&dir);
        assert!(notebook.store(StoreKind::Notes).is_empty());
        assert!(dir.path().join("backup").is_dir());
        assert!(dir.path().join("exchange").is_dir());
    }

    #[test]
    fn test_backup_on_open() {
        let dir = TempDir::new().unwrap();
        let mut config = NotebookConfig::in_dir(dir.path());
        config.backup_on_open = true;
        Notebook::open(config).unwrap();
        assert_eq!(std::fs::read_dir(dir.path().join("backup")).unwrap().count(), 2);
    }

    #[test]
    fn test_create_and_reopen() {
        let dir = TempDir::new().unwrap();
        let id = {
            let mut notebook = open(&dir);
            notebook.create_note(&input("A", "inbox", "x")).unwrap()
        };

        let notebook = open(&dir);
        let note = notebook.get(StoreKind::Notes, &id).unwrap();
        assert_eq!(note.name, "A");
        assert_eq!(note.body_format, BodyFormat::Plain);
    }

    #[test]
    fn test_update_touches_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("A", "inbox", "")).unwrap();
        let b = notebook.create_note(&input("B", "inbox", "")).unwrap();

        let mut edit = NoteInput::from_note(notebook.get(StoreKind::Notes, &a).unwrap());
        edit.body = "changed".to_string();
        notebook.update_note(&a, &edit).unwrap();

        let order: Vec<&str> = notebook
            .notes_sorted(StoreKind::Notes)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(order, vec![a.as_str(), b.as_str()]);

        let reopened = open(&dir);
        assert_eq!(reopened.get(StoreKind::Notes, &a).unwrap().body, "changed");
    }

    #[test]
    fn test_update_unknown_id() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let err = notebook.update_note("missing", &input("A", "", "")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_moves_to_trash() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("A", "inbox", "")).unwrap();
        let b = notebook.create_note(&input("B", "inbox", "")).unwrap();

        assert!(notebook.delete_notes(&[a.as_str(), "missing"]).is_err());
        assert!(notebook.store(StoreKind::Notes).contains(&a));

        notebook.delete_notes(&[a.clone()]).unwrap();
        assert!(!notebook.store(StoreKind::Notes).contains(&a));
        assert!(notebook.store(StoreKind::Notes).contains(&b));

        let reopened = open(&dir);
        assert_eq!(reopened.get(StoreKind::Trash, &a).unwrap().name, "A");
        assert_eq!(reopened.search(StoreKind::Trash, "folder:inbox").ids, vec![a]);
    }

    #[test]
    fn test_delete_with_repeated_id() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("A", "inbox", "")).unwrap();
        let b = notebook.create_note(&input("B", "inbox", "")).unwrap();

        notebook.delete_notes(&[a.clone(), b.clone(), a.clone()]).unwrap();
        assert!(notebook.store(StoreKind::Notes).is_empty());
        assert_eq!(notebook.store(StoreKind::Trash).len(), 2);

        let reopened = open(&dir);
        assert!(reopened.get(StoreKind::Trash, &a).is_ok());
        assert!(reopened.get(StoreKind::Trash, &b).is_ok());
    }

    #[test]
    fn test_tag_and_folder_operations() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("A", "inbox", "x")).unwrap();
        let b = notebook.create_note(&input("B", "work", "")).unwrap();
        let ids = [a.clone(), b.clone()];

        notebook.add_tag(&ids, "y").unwrap();
        assert_eq!(notebook.tags(), vec!["x", "y"]);

        let b_version = notebook.get(StoreKind::Notes, &b).unwrap().lamport_timestamp;
        notebook.remove_tag(&ids, "x").unwrap();
        assert_eq!(
            notebook.get(StoreKind::Notes, &b).unwrap().lamport_timestamp,
            b_version
        );
        assert_eq!(notebook.tags(), vec!["y"]);

        notebook.move_to_folder(&ids, "archive").unwrap();
        assert_eq!(notebook.folders(), vec!["archive"]);

        notebook.dismiss_reminder(&[a.as_str()]).unwrap();
        assert!(notebook.get(StoreKind::Notes, &a).unwrap().due_date_reminder_dismissed);
    }

    #[test]
    fn test_folder_tag_and_fulltext_filters() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("A", "inbox", "x")).unwrap();
        notebook.create_note(&input("B", "work", "")).unwrap();

        let store = notebook.store(StoreKind::Notes);
        assert_eq!(store.filter_folder("inbox"), vec![a.clone()]);
        assert_eq!(store.filter_tag("x"), vec![a]);
        // fulltext covers name, body, id and dates but not the folder
        assert!(store.filter_search("inbox").is_empty());
    }

    #[test]
    fn test_virtual_folders_persist_default_note() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let folders = notebook.virtual_folders().unwrap();
        assert_eq!(folders.len(), 1);

        let reopened = open(&dir);
        assert_eq!(reopened.store(StoreKind::Notes).len(), 1);
    }

    #[test]
    fn test_virtual_folder_evaluation() {
        let dir = TempDir::new().unwrap();
        let mut notebook = open(&dir);
        let a = notebook.create_note(&input("Quarterly report", "work", "")).unwrap();
        notebook.create_note(&input("Holiday", "work", "")).unwrap();

        let result = notebook.virtual_folder("Work reports").unwrap().unwrap();
        assert_eq!(result.ids, vec![a]);
        assert!(notebook.virtual_folder("Nope").unwrap().is_none());
    }

    #[test]
    fn test_store_kind_parse() {
        assert_eq!("trash".parse::<StoreKind>().unwrap(), StoreKind::Trash);
        assert!("other".parse::<StoreKind>().is_err());
    }
}
