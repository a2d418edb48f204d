//! Keywords and file names of the line-oriented store format.
//!
//! A store file is an optional header followed by note blocks:
//!
//! ```text
//! EXPORT-LAMPORT-CLOCK 12
//! LAST-IMPORT-LAMPORT-CLOCK 9
//!
//! TASK-BEGIN
//! TASK-ID 3F2A...
//! TASK-NAME Groceries
//! ...
//! TASK-BODY-BEGIN 91C0...
//! milk
//! TASK-BODY-END 91C0...
//! TASK-END 3F2A...
//! ```

pub const EXPORT_LAMPORT_CLOCK: &str = "EXPORT-LAMPORT-CLOCK";
pub const LAST_IMPORT_LAMPORT_CLOCK: &str = "LAST-IMPORT-LAMPORT-CLOCK";

pub const TASK_BEGIN: &str = "TASK-BEGIN";
pub const TASK_END: &str = "TASK-END";
pub const TASK_ID: &str = "TASK-ID";
pub const TASK_NAME: &str = "TASK-NAME";
pub const TASK_FOLDER: &str = "TASK-FOLDER";
pub const TASK_LAMPORT_TIMESTAMP: &str = "TASK-LAMPORT-TIMESTAMP";
pub const TASK_EXPORT_LAMPORT_TIMESTAMP: &str = "TASK-EXPORT-LAMPORT-TIMESTAMP";
pub const TASK_CREATED_DATE: &str = "TASK-CREATED-DATE";
pub const TASK_CHANGED_DATE: &str = "TASK-CHANGED-DATE";
pub const TASK_DUE_DATE: &str = "TASK-DUE-DATE";
pub const TASK_DUE_DATE_REMINDER_DISMISSED: &str = "TASK-DUE-DATE-REMINDER-DISMISSED";
pub const TASK_BODY_FORMAT: &str = "TASK-BODY-FORMAT";
pub const TASK_PUBLIC_SHARE_AUTH: &str = "TASK-PUBLIC-SHARE-AUTH";
pub const TASK_TAGS: &str = "TASK-TAGS";
pub const TASK_BODY_BEGIN: &str = "TASK-BODY-BEGIN";
pub const TASK_BODY_END: &str = "TASK-BODY-END";

/// Substituted when a note is saved with an empty folder
pub const DEFAULT_FOLDER: &str = "inbox";
/// Substituted when a note is saved with an empty name
pub const DEFAULT_NOTE_NAME: &str = "Unnamed";

/// Appended to the primary path to get the differential file
pub const DIFF_EXTENSION: &str = ".diffnew";

pub const FILE_NOTES_DAT: &str = "notes.dat";
pub const FILE_NOTES_TRASH_DAT: &str = "notes_trash.dat";
/// Full snapshot written on export and read back on import
pub const FILE_EXCHANGE_DAT: &str = "exchange.dat";
/// Compressed package holding `FILE_EXCHANGE_DAT`
pub const FILE_EXCHANGE_ZIP: &str = "exchange.zip";
