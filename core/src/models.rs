use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::*;
use crate::util::{create_id, current_timestamp, sanitize_single_line};

/// Minimum length of a public share token that is considered safe to use
pub const MIN_PUBLIC_SHARE_AUTH_LEN: usize = 5;

/// How the note body is meant to be rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyFormat {
    #[default]
    Markup,
    Plain,
}

impl BodyFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            BodyFormat::Markup => "MARKUP",
            BodyFormat::Plain => "PLAIN",
        }
    }
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MARKUP" => Ok(BodyFormat::Markup),
            "PLAIN" => Ok(BodyFormat::Plain),
            other => Err(format!("unknown body format '{}'", other)),
        }
    }
}

/// A single note with all metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Random 64-char hex token, immutable after creation
    pub id: String,
    pub name: String,
    pub folder: String,
    /// Case preserved; callers compare case-insensitively
    pub tags: BTreeSet<String>,
    pub body: String,
    pub body_format: BodyFormat,
    /// `YYYY-MM-DD HH:MM:SS`
    pub created_date: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub changed_date: String,
    /// `YYYY-MM-DD HH:MM:SS` or empty when the note has no due date
    pub due_date: String,
    pub due_date_reminder_dismissed: bool,
    pub public_share_auth: String,
    /// Version of this note; assigned by the owning store
    pub lamport_timestamp: i64,
    /// Version at the last export, -1 if never exported
    pub export_lamport_timestamp: i64,
    /// Frames the body in the serialized form
    #[serde(skip)]
    pub body_delimiter: String,
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

impl Note {
    /// Creates an empty note with fresh tokens. The version stays at 1 until
    /// a store adds the note.
    pub fn new() -> Self {
        let now = current_timestamp();
        Note {
            id: create_id(),
            name: String::new(),
            folder: String::new(),
            tags: BTreeSet::new(),
            body: String::new(),
            body_format: BodyFormat::Markup,
            created_date: now.clone(),
            changed_date: now,
            due_date: String::new(),
            due_date_reminder_dismissed: false,
            public_share_auth: create_id(),
            lamport_timestamp: 1,
            export_lamport_timestamp: -1,
            body_delimiter: create_id(),
        }
    }

    /// Whether the share token is long enough to be honoured
    pub fn has_valid_public_share_auth(&self) -> bool {
        self.public_share_auth.chars().count() >= MIN_PUBLIC_SHARE_AUTH_LEN
    }

    /// Fills an empty name or folder with its default
    pub fn apply_defaults(&mut self) {
        if self.name.is_empty() {
            self.name = DEFAULT_NOTE_NAME.to_string();
        }
        if self.folder.is_empty() {
            self.folder = DEFAULT_FOLDER.to_string();
        }
    }

    /// Copy of this note under a fresh id with `suffix` appended to the name
    pub fn renamed_copy(&self, suffix: &str) -> Note {
        let mut copy = self.clone();
        copy.id = create_id();
        copy.name.push_str(suffix);
        copy
    }

    /// Renders the note as a `TASK-BEGIN` ... `TASK-END <id>` block.
    ///
    /// Empty name and folder are written as their defaults. Tags are sorted
    /// and comma-joined so the output stays diff-stable.
    pub fn serialize(&self) -> String {
        let s = sanitize_single_line;
        let name = if self.name.is_empty() {
            DEFAULT_NOTE_NAME
        } else {
            &self.name
        };
        let folder = if self.folder.is_empty() {
            DEFAULT_FOLDER
        } else {
            &self.folder
        };
        let tags = self
            .tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let dismissed = if self.due_date_reminder_dismissed {
            "True"
        } else {
            "False"
        };

        let lines = [
            String::new(),
            TASK_BEGIN.to_string(),
            format!("{} {}", TASK_ID, s(&self.id)),
            format!("{} {}", TASK_NAME, s(name)),
            format!("{} {}", TASK_FOLDER, s(folder)),
            format!("{} {}", TASK_LAMPORT_TIMESTAMP, self.lamport_timestamp),
            format!(
                "{} {}",
                TASK_EXPORT_LAMPORT_TIMESTAMP, self.export_lamport_timestamp
            ),
            format!("{} {}", TASK_CREATED_DATE, s(&self.created_date)),
            format!("{} {}", TASK_CHANGED_DATE, s(&self.changed_date)),
            format!("{} {}", TASK_DUE_DATE, s(&self.due_date)),
            format!("{} {}", TASK_DUE_DATE_REMINDER_DISMISSED, dismissed),
            format!("{} {}", TASK_BODY_FORMAT, self.body_format),
            format!("{} {}", TASK_PUBLIC_SHARE_AUTH, s(&self.public_share_auth)),
            format!("{} {}", TASK_TAGS, s(&tags)),
            format!("{} {}", TASK_BODY_BEGIN, s(&self.body_delimiter)),
            self.body.clone(),
            format!("{} {}", TASK_BODY_END, s(&self.body_delimiter)),
            format!("{} {}", TASK_END, s(&self.id)),
            String::new(),
        ];
        lines.join("\n")
    }

    /// Reads a serialized block into `self` as a transaction.
    ///
    /// Returns `true` when the block was complete and `self` now holds its
    /// contents. On `false` `self` is untouched.
    pub fn deserialize(&mut self, input: &str) -> bool {
        match Note::parse_record(input) {
            Some(parsed) => {
                *self = parsed;
                true
            }
            None => false,
        }
    }

    /// Parses a serialized block into a new note.
    ///
    /// The id, the name and a closed body are required. Every field is read
    /// from its first occurrence only; fields that are missing keep the
    /// values of a freshly created note.
    pub fn parse_record(input: &str) -> Option<Note> {
        let mut tmp = Note::new();
        let mut seen = SeenFields::default();
        let mut inside_body = false;
        let mut body_lines: Vec<&str> = Vec::new();

        for line in input.lines() {
            let mut words = line.split(' ');
            let key = words.next().unwrap_or_default();
            let first_word = words.next();

            if inside_body {
                if key == TASK_BODY_END && first_word == Some(tmp.body_delimiter.as_str()) {
                    inside_body = false;
                    tmp.body = body_lines.join("\n");
                    seen.body = true;
                } else {
                    body_lines.push(line);
                }
                continue;
            }

            let rest = line.split_once(' ').map(|(_, rest)| rest).unwrap_or("");
            let word = first_word.unwrap_or("");

            match key {
                TASK_ID if !seen.id && !word.is_empty() => {
                    tmp.id = word.to_string();
                    seen.id = true;
                }
                TASK_NAME if !seen.name => {
                    tmp.name = rest.to_string();
                    seen.name = true;
                }
                TASK_FOLDER if !seen.folder => {
                    tmp.folder = rest.to_string();
                    seen.folder = true;
                }
                TASK_LAMPORT_TIMESTAMP if !seen.lamport => {
                    tmp.lamport_timestamp = word.parse().ok()?;
                    seen.lamport = true;
                }
                TASK_EXPORT_LAMPORT_TIMESTAMP if !seen.export_lamport => {
                    tmp.export_lamport_timestamp = word.parse().ok()?;
                    seen.export_lamport = true;
                }
                TASK_CREATED_DATE if !seen.created => {
                    tmp.created_date = rest.to_string();
                    seen.created = true;
                }
                TASK_CHANGED_DATE if !seen.changed => {
                    tmp.changed_date = rest.to_string();
                    seen.changed = true;
                }
                TASK_DUE_DATE if !seen.due => {
                    tmp.due_date = rest.to_string();
                    seen.due = true;
                }
                TASK_DUE_DATE_REMINDER_DISMISSED if !seen.due_dismissed => {
                    tmp.due_date_reminder_dismissed = word == "True";
                    seen.due_dismissed = true;
                }
                TASK_BODY_FORMAT if !seen.body_format => {
                    if let Ok(format) = word.parse() {
                        tmp.body_format = format;
                    }
                    seen.body_format = true;
                }
                TASK_PUBLIC_SHARE_AUTH if !seen.public_share_auth => {
                    tmp.public_share_auth = word.to_string();
                    seen.public_share_auth = true;
                }
                TASK_TAGS if !seen.tags => {
                    tmp.tags = rest
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string)
                        .collect();
                    seen.tags = true;
                }
                TASK_BODY_BEGIN if !seen.body => {
                    tmp.body_delimiter = word.to_string();
                    body_lines.clear();
                    inside_body = true;
                }
                _ => {}
            }
        }

        if seen.id && seen.name && !inside_body && seen.body {
            Some(tmp)
        } else {
            None
        }
    }
}

#[derive(Default)]
struct SeenFields {
    id: bool,
    name: bool,
    folder: bool,
    lamport: bool,
    export_lamport: bool,
    created: bool,
    changed: bool,
    due: bool,
    due_dismissed: bool,
    body_format: bool,
    public_share_auth: bool,
    tags: bool,
    body: bool,
}
