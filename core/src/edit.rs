//! Applying user-supplied field values to a note.

use serde::{Deserialize, Serialize};

use crate::models::{BodyFormat, Note, MIN_PUBLIC_SHARE_AUTH_LEN};
use crate::util::{create_id, sanitize_single_line};

const BULLET_STYLES: [&str; 6] = ["*", "**", "***", "****", "+", "-"];
const MARKUP_PADDING_LINES: usize = 4;

/// Raw field values as a user typed them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub name: String,
    pub folder: String,
    /// Comma separated
    pub tags: String,
    pub body: String,
    pub due_date: String,
    pub public_share_auth: String,
    /// `markup` or `plaintext`; anything else keeps the current format
    pub format: String,
}

impl NoteInput {
    /// Input that reproduces the note's current values
    pub fn from_note(note: &Note) -> Self {
        NoteInput {
            name: note.name.clone(),
            folder: note.folder.clone(),
            tags: note.tags.iter().cloned().collect::<Vec<_>>().join(", "),
            body: note.body.clone(),
            due_date: note.due_date.clone(),
            public_share_auth: note.public_share_auth.clone(),
            format: match note.body_format {
                BodyFormat::Markup => "markup".to_string(),
                BodyFormat::Plain => "plaintext".to_string(),
            },
        }
    }
}

/// Writes sanitized `input` into `note`. The note's version is not changed.
pub fn sanitize_and_apply(note: &mut Note, input: &NoteInput) {
    let tags = input.tags.strip_suffix(", ").unwrap_or(&input.tags);

    note.name = sanitize_single_line(&input.name);
    note.folder = sanitize_single_line(&input.folder);
    note.tags = tags
        .split(',')
        .map(sanitize_single_line)
        .filter(|t| !t.is_empty())
        .collect();

    let due_date = sanitize_single_line(&input.due_date);
    if due_date != note.due_date {
        note.due_date_reminder_dismissed = false;
    }
    note.due_date = due_date;

    note.public_share_auth = sanitize_single_line(&input.public_share_auth);
    if note.public_share_auth.chars().count() < MIN_PUBLIC_SHARE_AUTH_LEN {
        note.public_share_auth = create_id();
    }

    match input.format.as_str() {
        "markup" => note.body_format = BodyFormat::Markup,
        "plaintext" => note.body_format = BodyFormat::Plain,
        _ => {}
    }

    note.body = match note.body_format {
        BodyFormat::Markup => fix_markup_bullet_lists(&input.body),
        BodyFormat::Plain => input.body.replace('\r', ""),
    };
}

/// Continues the last bullet style on the following non-empty lines and
/// pads the body with empty lines at both ends.
pub fn fix_markup_bullet_lists(text: &str) -> String {
    let text = text.replace('\r', "");
    let mut styled: Vec<String> = Vec::new();
    let mut style: Option<&str> = None;

    for line in text.split('\n') {
        if line.is_empty() {
            style = None;
            styled.push(String::new());
            continue;
        }
        let mut parts = line.split(' ');
        let first = parts.next().unwrap_or_default();
        if parts.next().is_some() && BULLET_STYLES.contains(&first) {
            style = Some(first);
            styled.push(line.to_string());
        } else if let Some(style) = style {
            styled.push(format!("{} {}", style, line));
        } else {
            styled.push(line.to_string());
        }
    }

    let mut padded: Vec<String> = Vec::with_capacity(styled.len() + 2 * MARKUP_PADDING_LINES);
    let mut leading = 0;
    let mut trailing = 0;
    let mut at_start = true;
    for line in styled {
        if at_start {
            if line.is_empty() {
                leading += 1;
            } else {
                padded.extend(
                    std::iter::repeat(String::new())
                        .take(MARKUP_PADDING_LINES.saturating_sub(leading)),
                );
                at_start = false;
            }
        } else if line.is_empty() {
            trailing += 1;
        } else {
            trailing = 0;
        }
        padded.push(line);
    }
    padded.extend(
        std::iter::repeat(String::new()).take(MARKUP_PADDING_LINES.saturating_sub(trailing)),
    );
    padded.join("\n")
}
