use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::utils::due_date::DueDate;

#[derive(Parser, Debug)]
#[command(
    name = "wool",
    version,
    about,
    long_about = "Note database with file-based sync between replicas"
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args, Serialize)]
pub struct ConfigArgs {
    /// Profile name
    #[arg(long, short, env = "WOOL_PROFILE")]
    pub profile: Option<String>,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum Command {
    /// Prints out current configuration
    Config,
    /// Profile subcommands
    Profile {
        #[clap(subcommand)]
        command: Option<ProfileCommand>,
    },
    /// Notes subcommands
    #[clap(subcommand)]
    Note(NoteCommand),
    /// Trashed notes subcommands
    #[clap(subcommand)]
    Trash(TrashCommand),
    /// Lists folders in use
    Folders(ListArgs),
    /// Lists tags in use
    Tags(ListArgs),
    /// Lists @contexts found in note bodies
    Contexts(ListArgs),
    /// Virtual folder subcommands
    #[clap(subcommand)]
    Vfolder(VfolderCommand),
    /// Writes the exchange package for other replicas
    Export,
    /// Reads the exchange package written by another replica
    Import(ImportArgs),
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum ProfileCommand {
    /// Switches to a profile, creating it if needed
    Use { name: String },
    /// Lists profiles
    List,
    /// Shows the current profile
    Current,
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum NoteCommand {
    /// Creates a new note.
    Add(NoteAddArgs),
    /// Shows one note.
    Show(NoteShowArgs),
    /// Edits a note.
    Edit(NoteEditArgs),
    /// Lists notes, most recently changed first.
    List(NoteListArgs),
    /// Searches notes with a query.
    Search(NoteSearchArgs),
    /// Moves notes to the trash.
    Delete(NoteIdsArgs),
    /// Adds a tag to notes.
    TagAdd(NoteTagArgs),
    /// Removes a tag from notes.
    TagDel(NoteTagArgs),
    /// Moves notes to a folder.
    Move(NoteMoveArgs),
    /// Dismisses due-date reminders.
    Dismiss(NoteIdsArgs),
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum TrashCommand {
    /// Lists trashed notes.
    List(NoteListArgs),
    /// Searches trashed notes with a query.
    Search(NoteSearchArgs),
}

#[derive(Debug, Subcommand, Serialize, PartialEq)]
pub enum VfolderCommand {
    /// Lists virtual folders and their queries.
    List(ListArgs),
    /// Shows the notes in a virtual folder.
    Show(VfolderShowArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Plain,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Serialize, Deserialize, Default)]
pub enum BodyFormatArg {
    #[default]
    Markup,
    Plaintext,
}

impl BodyFormatArg {
    pub fn as_input(self) -> &'static str {
        match self {
            BodyFormatArg::Markup => "markup",
            BodyFormatArg::Plaintext => "plaintext",
        }
    }
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteAddArgs {
    /// Note name
    #[arg(long, short)]
    pub name: Option<String>,
    /// Folder to put the note in
    #[arg(long, short)]
    pub folder: Option<String>,
    /// Tags (can be specified multiple times or comma-separated)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub tag: Vec<String>,
    /// Due date (e.g., "today", "tomorrow", "next week", "2024-03-16")
    #[arg(long, short, value_parser = parse_due_date)]
    pub due: Option<DueDate>,
    /// Body format
    #[arg(long, value_enum, default_value_t = BodyFormatArg::Markup)]
    pub format: BodyFormatArg,
    /// Open in external editor for the body
    #[arg(long, short, default_value_t = false)]
    pub interactive: bool,
    /// Note body
    #[arg(trailing_var_arg = true)]
    pub content: Vec<String>,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteEditArgs {
    /// Note ID or unique ID prefix
    #[arg(value_name = "ID")]
    pub id: String,
    /// New name
    #[arg(long, short)]
    pub name: Option<String>,
    /// New folder
    #[arg(long, short)]
    pub folder: Option<String>,
    /// Replace tags (comma-separated)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub tag: Option<Vec<String>>,
    /// New due date, "none" clears it
    #[arg(long, short, value_parser = parse_due_date)]
    pub due: Option<DueDate>,
    /// New body format
    #[arg(long, value_enum)]
    pub format: Option<BodyFormatArg>,
    /// Replace the body
    #[arg(long, short)]
    pub body: Option<String>,
    /// Open the body in an external editor
    #[arg(long, short, default_value_t = false)]
    pub interactive: bool,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteShowArgs {
    /// Note ID or unique ID prefix
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, clap::Args, PartialEq, Serialize, Deserialize, Default)]
#[command(about = "List notes")]
pub struct NoteListArgs {
    /// Only notes in this folder
    #[arg(long, short)]
    pub folder: Option<String>,

    /// Only notes with this tag
    #[arg(long, short)]
    pub tag: Option<String>,

    /// Maximum number of results to return
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, clap::Args, PartialEq, Serialize, Deserialize, Default)]
#[command(about = "Search notes")]
pub struct NoteSearchArgs {
    /// Search query, e.g. `(folder:work) and ("report")`
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,

    /// Maximum number of results to return
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteIdsArgs {
    /// Note IDs or unique ID prefixes
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteTagArgs {
    /// Tag to add or remove
    pub tag: String,
    /// Note IDs or unique ID prefixes
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct NoteMoveArgs {
    /// Target folder
    pub folder: String,
    /// Note IDs or unique ID prefixes
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct ListArgs {
    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct VfolderShowArgs {
    /// Virtual folder name
    pub name: String,

    /// Output format (pretty, plain, or json)
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

#[derive(Debug, Args, Serialize, PartialEq)]
pub struct ImportArgs {
    /// Discard local notes and take the imported snapshot as is
    #[arg(long, default_value_t = false)]
    pub replace: bool,
}

pub fn parse_due_date(s: &str) -> anyhow::Result<DueDate> {
    s.parse()
}
