use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use wool_core::{Note, VirtualFolders};

use crate::args::OutputFormat;

/// Characters of the id shown in pretty output; enough to pass back as a prefix
pub const SHORT_ID_LEN: usize = 8;

pub struct NoteFormatter {
    output: OutputFormat,
    stdout: StandardStream,
}

impl NoteFormatter {
    pub fn new(output: OutputFormat) -> Self {
        let choice = if std::io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        NoteFormatter {
            output,
            stdout: StandardStream::stdout(choice),
        }
    }

    /// One entry per note; `highlights` are marked in the body preview
    pub fn print_notes(&mut self, notes: &[&Note], highlights: &[String]) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Json => {
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(notes)?)?;
            }
            OutputFormat::Plain => {
                for note in notes {
                    writeln!(self.stdout, "{}\t{}\t{}", note.id, note.folder, note.name)?;
                }
            }
            OutputFormat::Pretty => {
                if notes.is_empty() {
                    writeln!(self.stdout, "No notes found")?;
                }
                for note in notes {
                    self.write_header(note)?;
                    if let Some(line) = note.body.lines().map(str::trim).find(|l| !l.is_empty()) {
                        write!(self.stdout, "    ")?;
                        self.write_highlighted(line, highlights)?;
                        writeln!(self.stdout)?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn print_note(&mut self, note: &Note) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Json => {
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(note)?)?;
            }
            OutputFormat::Plain => {
                write!(self.stdout, "{}", note.serialize())?;
            }
            OutputFormat::Pretty => {
                self.write_header(note)?;
                self.write_field("id", &note.id)?;
                self.write_field("created", &note.created_date)?;
                self.write_field("changed", &note.changed_date)?;
                self.write_field("format", note.body_format.as_str())?;
                self.write_field("version", &note.lamport_timestamp.to_string())?;
                writeln!(self.stdout)?;
                writeln!(self.stdout, "{}", note.body.trim_matches('\n'))?;
            }
        }
        Ok(())
    }

    /// Folder, tag or context names
    pub fn print_names(&mut self, names: &[String]) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Json => {
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(names)?)?;
            }
            OutputFormat::Plain | OutputFormat::Pretty => {
                for name in names {
                    writeln!(self.stdout, "{}", name)?;
                }
            }
        }
        Ok(())
    }

    pub fn print_virtual_folders(&mut self, folders: &VirtualFolders) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Json => {
                let map: BTreeMap<&str, &str> = folders.iter().collect();
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&map)?)?;
            }
            OutputFormat::Plain => {
                for (name, query) in folders.iter() {
                    writeln!(self.stdout, "{}\t{}", name, query)?;
                }
            }
            OutputFormat::Pretty => {
                for (name, query) in folders.iter() {
                    self.stdout.set_color(ColorSpec::new().set_bold(true))?;
                    write!(self.stdout, "{}", name)?;
                    self.stdout.reset()?;
                    writeln!(self.stdout, "  {}", query)?;
                }
            }
        }
        Ok(())
    }

    fn write_header(&mut self, note: &Note) -> std::io::Result<()> {
        let short_id: String = note.id.chars().take(SHORT_ID_LEN).collect();
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(self.stdout, "{}", short_id)?;
        self.stdout.reset()?;

        self.stdout.set_color(ColorSpec::new().set_bold(true))?;
        write!(self.stdout, "  {}", note.name)?;
        self.stdout.reset()?;

        self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(self.stdout, "  [{}]", note.folder)?;
        self.stdout.reset()?;

        if !note.tags.is_empty() {
            self.stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            for tag in &note.tags {
                write!(self.stdout, " #{}", tag)?;
            }
            self.stdout.reset()?;
        }

        if !note.due_date.is_empty() {
            let color = if note.due_date_reminder_dismissed {
                Color::White
            } else {
                Color::Red
            };
            self.stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
            write!(self.stdout, "  due {}", note.due_date)?;
            self.stdout.reset()?;
        }
        writeln!(self.stdout)
    }

    fn write_field(&mut self, label: &str, value: &str) -> std::io::Result<()> {
        self.stdout
            .set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(self.stdout, "{:>8}: ", label)?;
        self.stdout.reset()?;
        writeln!(self.stdout, "{}", value)
    }

    fn write_highlighted(&mut self, line: &str, highlights: &[String]) -> std::io::Result<()> {
        let mut rest = line;
        while let Some((start, len)) = find_first(rest, highlights) {
            write!(self.stdout, "{}", &rest[..start])?;
            self.stdout.set_color(
                ColorSpec::new()
                    .set_fg(Some(Color::Magenta))
                    .set_bold(true),
            )?;
            write!(self.stdout, "{}", &rest[start..start + len])?;
            self.stdout.reset()?;
            rest = &rest[start + len..];
        }
        write!(self.stdout, "{}", rest)
    }
}

/// Byte position and length of the earliest term in `text`, case-insensitive
/// the same way search matching is
fn find_first(text: &str, terms: &[String]) -> Option<(usize, usize)> {
    // lowercasing can change byte lengths, so each lowered byte remembers
    // the span of the original char it came from
    let mut lowered = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(text.len());
    for (start, c) in text.char_indices() {
        let end = start + c.len_utf8();
        for l in c.to_lowercase() {
            lowered.push(l);
            spans.extend(std::iter::repeat((start, end)).take(l.len_utf8()));
        }
    }

    terms
        .iter()
        .filter(|t| !t.is_empty())
        .filter_map(|t| {
            let term = t.to_lowercase();
            let from = lowered.find(&term)?;
            let (start, _) = spans.get(from)?;
            let (_, end) = spans.get(from + term.len() - 1)?;
            Some((*start, end - start))
        })
        .min()
}
