//! Virtual folders: named search queries kept in a configuration note.
//!
//! The note named [`CONFIG_NOTE_NAME`] is read line by line; lines of the form
//! `virtualfolder====<name>====<query>` define one folder each. Other lines
//! are ignored, so the note can carry free text.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::models::Note;
use crate::search::{search, SearchResult};
use crate::store::Store;

pub const CONFIG_NOTE_NAME: &str = "_wool_config";
pub const VIRTUAL_FOLDER_KEY: &str = "virtualfolder";
pub const SEPARATOR: &str = "====";

pub const DEFAULT_CONFIG_BODY: &str = "
**wool configuration**

Lines this note doesn't recognise are ignored.

**Virtual folders**
A virtual folder is a saved search, evaluated whenever the folder is opened.
Define one per line as `virtualfolder`, the folder name and the query,
separated by `====` and with nothing before `virtualfolder`. Example:

virtualfolder====Work reports====(folder:(work)) and (\"report\")

**Search queries**
fulltext: folder: tag: select what the following search string is matched
against. Plain text is a fulltext search over name, body, id and dates.
( ) \" ' enclose a search string or a nested query.
and, or join exactly two enclosed queries: ((a) and (b)) or (c)
Control words are lower case; matching is case-insensitive.

";

/// Name to query, in name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFolders {
    folders: BTreeMap<String, String>,
}

impl VirtualFolders {
    /// Reads the configuration note from `store`.
    ///
    /// With several notes of that name the one with the lowest version wins.
    /// If there is none, a default configuration note is added to the store.
    pub fn read_from_store(store: &mut Store) -> Self {
        let config_body = store
            .sorted_ids_descending_lamport()
            .iter()
            .rev()
            .filter_map(|id| store.get(id))
            .find(|note| note.name == CONFIG_NOTE_NAME)
            .map(|note| note.body.clone());

        let body = match config_body {
            Some(body) => body,
            None => {
                let mut note = Note::new();
                note.name = CONFIG_NOTE_NAME.to_string();
                note.body = DEFAULT_CONFIG_BODY.to_string();
                let id = store.add(note);
                info!(id, "Created default configuration note");
                DEFAULT_CONFIG_BODY.to_string()
            }
        };
        Self::parse(&body)
    }

    pub fn parse(body: &str) -> Self {
        let mut folders = BTreeMap::new();
        for line in body.split('\n') {
            let mut parts = line.splitn(3, SEPARATOR);
            if let (Some(VIRTUAL_FOLDER_KEY), Some(name), Some(query)) =
                (parts.next(), parts.next(), parts.next())
            {
                folders.insert(name.to_string(), query.to_string());
            }
        }
        debug!(count = folders.len(), "Parsed virtual folders");
        VirtualFolders { folders }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.folders.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.folders.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Runs the folder's query; `None` if no such folder
    pub fn evaluate(&self, name: &str, store: &Store) -> Option<SearchResult> {
        self.get(name).map(|query| search(store, query))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_lines() {
        let folders = VirtualFolders::parse(
            "intro text\n\
             virtualfolder====Todo====tag:todo\n\
             virtualfolder====Eq====\"a====b\"\n\
             virtualfolder====broken\n\
             other====x====y\n\
             \u{20}virtualfolder====Indented====z",
        );

        assert_eq!(
            folders.iter().collect::<Vec<_>>(),
            vec![("Eq", "\"a====b\""), ("Todo", "tag:todo")]
        );
    }

    #[test]
    fn test_default_note_created_once() {
        let mut store = Store::in_memory();
        let folders = VirtualFolders::read_from_store(&mut store);

        assert_eq!(store.len(), 1);
        assert_eq!(folders.len(), 1);
        assert!(folders.get("Work reports").is_some());

        VirtualFolders::read_from_store(&mut store);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lowest_version_config_wins() {
        let mut store = Store::in_memory();
        for body in ["virtualfolder====Old====x", "virtualfolder====New====y"] {
            let mut note = Note::new();
            note.name = CONFIG_NOTE_NAME.to_string();
            note.body = body.to_string();
            store.add(note);
        }

        let folders = VirtualFolders::read_from_store(&mut store);
        assert_eq!(folders.iter().collect::<Vec<_>>(), vec![("Old", "x")]);
    }

    #[test]
    fn test_evaluate() {
        let mut store = Store::in_memory();
        let mut note = Note::new();
        note.name = "groceries".to_string();
        note.tags.insert("todo".to_string());
        let id = store.add(note);

        let folders = VirtualFolders::parse("virtualfolder====Todo====tag:todo");
        assert_eq!(folders.evaluate("Todo", &store).unwrap().ids, vec![id]);
        assert!(folders.evaluate("Missing", &store).is_none());
    }
}
