use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::Note;
use crate::schema::*;

/// Saves touching fewer notes than this go to the diff file
pub const DIFF_SAVE_MAX_TOUCHED: usize = 5;

#[allow(clippy::expect_used)]
static CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid context regex"));

/// What a call to [`Store::save`] actually wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    /// Only touched notes, written to `<path>.diffnew`
    Diff,
    /// Every note written to the primary file, diff file emptied
    Full,
    /// Every note written to an alternate path
    Alternate,
}

/// Keyed collection of notes with a Lamport clock and differential saving
#[derive(Debug, Clone)]
pub struct Store {
    path: Option<PathBuf>,
    notes: BTreeMap<String, Note>,
    lamport_clock: i64,
    /// Clock value at the last export, -1 if never exported
    pub export_lamport_clock: i64,
    /// Remote clock accepted at the last import, -1 if never imported
    pub last_import_lamport_clock: i64,
    touched: BTreeSet<String>,
    touched_cleared_since_last_save: bool,
}

impl Store {
    /// Store backed by a primary file. Nothing is read until [`Store::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_path(Some(path.into()))
    }

    /// Store with no primary file; it can only be saved to alternate paths
    pub fn in_memory() -> Self {
        Self::with_path(None)
    }

    fn with_path(path: Option<PathBuf>) -> Self {
        Store {
            path,
            notes: BTreeMap::new(),
            lamport_clock: 1,
            export_lamport_clock: -1,
            last_import_lamport_clock: -1,
            touched: BTreeSet::new(),
            touched_cleared_since_last_save: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Path of the differential file next to the primary file
    pub fn diff_path(&self) -> Option<PathBuf> {
        self.path.as_ref().map(|p| {
            let mut os = p.clone().into_os_string();
            os.push(DIFF_EXTENSION);
            PathBuf::from(os)
        })
    }

    pub fn lamport_clock(&self) -> i64 {
        self.lamport_clock
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    /// Mutable access to a note. Callers are expected to [`Store::touch`] it.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.get_mut(id)
    }

    /// Notes in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.notes.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    /// Ids edited since the last full save
    pub fn touched_ids(&self) -> &BTreeSet<String> {
        &self.touched
    }

    /// Adds a note under a new store-unique version and returns its id.
    ///
    /// Empty name and folder get their defaults. Forces the next primary
    /// save to be a full rewrite.
    pub fn add(&mut self, mut note: Note) -> String {
        note.apply_defaults();
        self.lamport_clock = 1 + self.lamport_clock.max(note.lamport_timestamp);
        note.lamport_timestamp = self.lamport_clock;
        let id = note.id.clone();
        self.notes.insert(id.clone(), note);
        self.touched.clear();
        self.touched_cleared_since_last_save = true;
        id
    }

    /// Inserts an already versioned note (loaded from disk or imported)
    /// without assigning it a new version.
    pub fn add_deserialized(&mut self, mut note: Note) {
        note.apply_defaults();
        self.lamport_clock = self.lamport_clock.max(note.lamport_timestamp);
        self.notes.insert(note.id.clone(), note);
        self.touched.clear();
    }

    /// Gives the note a fresh version and records it for the next diff save
    pub fn touch(&mut self, id: &str) -> Result<()> {
        let note = self
            .notes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.lamport_clock = 1 + self.lamport_clock.max(note.lamport_timestamp);
        note.lamport_timestamp = self.lamport_clock;
        self.touched.insert(id.to_string());
        Ok(())
    }

    /// Removes a note without touching it; advances the store clock by one
    pub fn remove(&mut self, id: &str) -> Result<Note> {
        let note = self
            .notes
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.lamport_clock += 1;
        self.touched.clear();
        self.touched_cleared_since_last_save = true;
        Ok(note)
    }

    /// Raises the store clock to an external clock value
    pub fn update_lamport_clock(&mut self, external: i64) {
        self.lamport_clock = self.lamport_clock.max(external);
    }

    /// Drops every note. Clocks are kept so versions stay monotonic.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.touched.clear();
        self.touched_cleared_since_last_save = true;
    }

    /// Makes the next primary save a full rewrite, for changes that are
    /// not tracked per note (e.g. stamping export versions).
    pub fn require_full_save(&mut self) {
        self.touched.clear();
        self.touched_cleared_since_last_save = true;
    }

    /// Sorts ids by note version, highest first.
    ///
    /// The sort is stable, so equal versions keep their input order. Fails
    /// with [`Error::NotFound`] on the first id the store doesn't know.
    pub fn sort_ids_descending_lamport<I, S>(&self, ids: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut versioned = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                self.notes
                    .get(id)
                    .map(|note| (id.to_string(), note.lamport_timestamp))
                    .ok_or_else(|| Error::NotFound(id.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        versioned.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(versioned.into_iter().map(|(id, _)| id).collect())
    }

    /// All ids by version, highest first; equal versions in ascending id order
    pub fn sorted_ids_descending_lamport(&self) -> Vec<String> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by(|a, b| b.lamport_timestamp.cmp(&a.lamport_timestamp));
        notes.into_iter().map(|n| n.id.clone()).collect()
    }

    pub fn folder_list(&self) -> Vec<String> {
        self.notes
            .values()
            .filter(|n| !n.folder.is_empty())
            .map(|n| n.folder.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn tag_list(&self) -> Vec<String> {
        self.notes
            .values()
            .flat_map(|n| n.tags.iter())
            .filter(|t| !t.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Lowercased `@word` context markers found in note bodies.
    ///
    /// Email-like sequences are skipped: the `@` must not follow a word
    /// character and the word must not continue as `word.word`.
    pub fn context_list(&self) -> Vec<String> {
        let mut contexts = BTreeSet::new();
        for note in self.notes.values() {
            let body = note.body.as_str();
            for m in CONTEXT_RE.find_iter(body) {
                let preceded_by_word = body[..m.start()]
                    .chars()
                    .next_back()
                    .is_some_and(is_word_char);
                let mut after = body[m.end()..].chars();
                let email_like =
                    after.next() == Some('.') && after.next().is_some_and(is_word_char);
                if !preceded_by_word && !email_like {
                    contexts.insert(m.as_str().to_lowercase());
                }
            }
        }
        contexts.into_iter().collect()
    }

    /// Ids in `folder` (case-insensitive), highest version first
    pub fn filter_folder(&self, folder: &str) -> Vec<String> {
        let folder = folder.to_lowercase();
        self.filter_sorted(|note| note.folder.to_lowercase() == folder)
    }

    /// Ids carrying `tag` (case-insensitive), highest version first
    pub fn filter_tag(&self, tag: &str) -> Vec<String> {
        let tag = tag.to_lowercase();
        self.filter_sorted(|note| note.tags.iter().any(|t| t.to_lowercase() == tag))
    }

    /// Ids whose name, body, id, due, created or changed date contain the
    /// text (case-insensitive), highest version first
    pub fn filter_search(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        self.filter_sorted(|note| {
            [
                &note.name,
                &note.body,
                &note.id,
                &note.due_date,
                &note.created_date,
                &note.changed_date,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&text))
        })
    }

    fn filter_sorted(&self, predicate: impl Fn(&Note) -> bool) -> Vec<String> {
        self.sorted_ids_descending_lamport()
            .into_iter()
            .filter(|id| self.notes.get(id).is_some_and(&predicate))
            .collect()
    }

    /// Header plus every note block, in id order
    pub fn serialize(&self) -> String {
        self.serialize_notes(self.notes.values())
    }

    fn serialize_notes<'a>(&self, notes: impl Iterator<Item = &'a Note>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} {}\n",
            EXPORT_LAMPORT_CLOCK, self.export_lamport_clock
        ));
        out.push_str(&format!(
            "{} {}\n",
            LAST_IMPORT_LAMPORT_CLOCK, self.last_import_lamport_clock
        ));
        for note in notes {
            out.push_str(&note.serialize());
            out.push_str("\n\n");
        }
        out
    }

    /// Writes the store to disk.
    ///
    /// With `alt_path` the full store goes there and the diff mechanism is
    /// left alone. Otherwise, when 1 to 4 notes were touched and nothing was
    /// added or removed since the last full save, only those notes are
    /// written to the diff file. Anything else rewrites the primary file and
    /// empties the diff file.
    pub fn save(&mut self, alt_path: Option<&Path>) -> Result<SaveKind> {
        // edits through get_mut can blank a name or folder after add
        self.notes.values_mut().for_each(Note::apply_defaults);

        if let Some(alt_path) = alt_path {
            std::fs::write(alt_path, self.serialize())?;
            debug!(path = %alt_path.display(), notes = self.len(), "Saved store to alternate path");
            return Ok(SaveKind::Alternate);
        }

        let path = self.path.clone().ok_or(Error::MissingPath)?;
        let diff_path = self.diff_path().ok_or(Error::MissingPath)?;

        let small_change = !self.touched_cleared_since_last_save
            && !self.touched.is_empty()
            && self.touched.len() < DIFF_SAVE_MAX_TOUCHED;

        if small_change {
            let touched = self.touched.iter().filter_map(|id| self.notes.get(id));
            std::fs::write(&diff_path, self.serialize_notes(touched))?;
            debug!(path = %diff_path.display(), touched = self.touched.len(), "Saved diff");
            return Ok(SaveKind::Diff);
        }

        self.touched.clear();
        self.touched_cleared_since_last_save = false;
        std::fs::write(&path, self.serialize())?;
        std::fs::write(&diff_path, "")?;
        debug!(path = %path.display(), notes = self.len(), "Saved full store");
        Ok(SaveKind::Full)
    }

    /// Reads the primary file, then replays the diff file if one exists.
    ///
    /// Loaded notes are added to whatever the store already holds. Ids from
    /// the diff file become the touched set so further small edits keep
    /// going to the diff file.
    pub fn load(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(Error::MissingPath)?;
        self.load_main(&path)?;

        if let Some(diff_path) = self.diff_path().filter(|p| p.is_file()) {
            let text = std::fs::read_to_string(&diff_path)?;
            let ids = self.read_records(&text);
            self.touched.extend(ids);
            self.touched_cleared_since_last_save = false;
            info!(path = %diff_path.display(), touched = self.touched.len(), "Applied diff file");
        }
        Ok(())
    }

    /// Reads a full store file from an alternate path; diff files are ignored
    pub fn load_from(&mut self, path: &Path) -> Result<()> {
        self.load_main(path)
    }

    fn load_main(&mut self, path: &Path) -> Result<()> {
        self.touched.clear();
        self.touched_cleared_since_last_save = true;
        let text = std::fs::read_to_string(path)?;
        let ids = self.read_records(&text);
        info!(path = %path.display(), notes = ids.len(), "Loaded store");
        Ok(())
    }

    /// Applies header lines and note blocks from `text`, returning the ids
    /// of the notes read.
    fn read_records(&mut self, text: &str) -> Vec<String> {
        let mut ids_read = Vec::new();
        let mut block: Vec<&str> = Vec::new();
        let mut inside_note = false;
        let mut note_id: Option<&str> = None;
        let mut body_delimiter: Option<&str> = None;
        let mut body_seen = false;

        for line in text.lines() {
            let mut words = line.split(' ');
            let key = words.next().unwrap_or_default();
            let word = words.next();

            if !inside_note {
                match key {
                    EXPORT_LAMPORT_CLOCK => {
                        if let Some(clock) = parse_clock(key, word) {
                            self.export_lamport_clock = clock;
                        }
                    }
                    LAST_IMPORT_LAMPORT_CLOCK => {
                        if let Some(clock) = parse_clock(key, word) {
                            self.last_import_lamport_clock = clock;
                        }
                    }
                    _ => {}
                }
                if line != TASK_BEGIN {
                    continue;
                }
                inside_note = true;
                block.clear();
                note_id = None;
                body_delimiter = None;
                body_seen = false;
            }

            block.push(line);

            if let Some(delimiter) = body_delimiter {
                if key == TASK_BODY_END && word == Some(delimiter) {
                    body_delimiter = None;
                    body_seen = true;
                }
                continue;
            }

            match (key, note_id) {
                (TASK_ID, None) => note_id = word.filter(|w| !w.is_empty()),
                (TASK_BODY_BEGIN, _) if !body_seen => body_delimiter = Some(word.unwrap_or("")),
                (TASK_END, Some(id)) if word == Some(id) => {
                    inside_note = false;
                    match Note::parse_record(&block.join("\n")) {
                        Some(note) => {
                            ids_read.push(note.id.clone());
                            self.add_deserialized(note);
                        }
                        None => warn!(id, "Skipping malformed note record"),
                    }
                }
                _ => {}
            }
        }

        if inside_note {
            warn!(id = note_id.unwrap_or(""), "Skipping unterminated note record");
        }
        ids_read
    }
}

fn parse_clock(key: &str, word: Option<&str>) -> Option<i64> {
    let parsed = word.and_then(|w| w.parse().ok());
    if parsed.is_none() {
        warn!(key, value = word.unwrap_or(""), "Ignoring malformed clock header");
    }
    parsed
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
