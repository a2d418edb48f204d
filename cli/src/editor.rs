use std::io::{self, Read, Write};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use wool_core::NoteInput;

use crate::utils::due_date::DueDate;

pub const DELIMITER: &str = "+++";

/// Note fields as TOML above a `+++` line, the body below it
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EditorTemplate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Empty or anything `--due` accepts
    #[serde(default)]
    pub due: String,
    /// `markup` or `plaintext`
    #[serde(default)]
    pub format: String,
    #[serde(skip)]
    pub body: String,
}

impl EditorTemplate {
    pub fn from_input(input: &NoteInput) -> Self {
        EditorTemplate {
            name: input.name.clone(),
            folder: input.folder.clone(),
            tags: input
                .tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            due: input.due_date.clone(),
            format: input.format.clone(),
            body: input.body.trim_matches('\n').to_string(),
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let header = toml::to_string(self).context("Failed to render note template")?;
        Ok(format!("{}{}\n{}", header, DELIMITER, self.body))
    }

    /// Writes the template's fields into `input`, keeping its share token
    pub fn apply_to(self, input: &mut NoteInput) -> anyhow::Result<()> {
        let due: DueDate = self.due.parse()?;
        input.name = self.name;
        input.folder = self.folder;
        input.tags = self.tags.join(",");
        input.due_date = due.to_timestamp();
        input.format = self.format;
        input.body = self.body;
        Ok(())
    }
}

pub struct Editor {
    template: String,
}

impl Editor {
    pub fn new(template: &str) -> Self {
        Editor {
            template: template.to_string(),
        }
    }

    /// Error message as TOML comments above the rejected content
    fn format_error_header(error: &anyhow::Error, content: &str) -> String {
        let error_lines = format!("{}", error)
            .lines()
            .map(|line| format!("# {}", line))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "# ===== PARSING ERROR =====\n{}\n# ===== Fix the issue below and save again =====\n\n{}",
            error_lines, content
        )
    }

    fn read_from_file(&self, tempfile: tempfile::NamedTempFile) -> anyhow::Result<String> {
        let editor = std::env::var("VISUAL")
            .unwrap_or_else(|_| std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string()));

        let status = std::process::Command::new(editor)
            .arg(tempfile.path())
            .status()
            .context("Failed to open editor")?;

        if !status.success() {
            anyhow::bail!("Editor returned non-zero exit code");
        }

        let mut content = String::new();
        std::fs::File::open(tempfile.path())
            .context("Failed to open temporary file")?
            .read_to_string(&mut content)
            .context("Failed to read temporary file")?;

        Ok(content)
    }

    fn edit(&self, content: &str) -> anyhow::Result<String> {
        let mut tempfile =
            tempfile::NamedTempFile::new().context("Failed to create temporary file")?;
        tempfile
            .write_all(content.as_bytes())
            .context("Failed to write initial content")?;

        self.read_from_file(tempfile)
    }

    /// Opens the editor until the result parses or the user gives up
    pub fn open(&self) -> anyhow::Result<EditorTemplate> {
        let mut current_content = self.template.clone();

        loop {
            let edited_content = self.edit(&current_content)?;

            match edited_content.parse_template() {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    println!("Error parsing note: {}\n", e);
                    println!("Your changes have been preserved in the editor.");
                    println!("Do you want to:");
                    println!("  [R]etry (re-open editor with your changes)");
                    println!("  [A]bort (discard changes)");
                    print!("Choice (R/a): ");
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    match input.trim().to_lowercase().as_str() {
                        "a" => anyhow::bail!("User aborted edit"),
                        _ => {
                            current_content = Self::format_error_header(&e, &edited_content);
                        }
                    }
                }
            }
        }
    }
}

pub trait ParseTemplate {
    fn parse_template(&self) -> anyhow::Result<EditorTemplate>;
}

impl ParseTemplate for String {
    fn parse_template(&self) -> anyhow::Result<EditorTemplate> {
        let lines: Vec<&str> = self.lines().collect();

        // The first line that is only the delimiter; later ones belong to the body
        let (toml_lines, body_lines) = match lines.iter().position(|l| l.trim() == DELIMITER) {
            Some(pos) => (&lines[..pos], &lines[pos + 1..]),
            None => (lines.as_slice(), &[] as &[&str]),
        };

        let mut parsed = toml::from_str::<EditorTemplate>(&toml_lines.join("\n"))?;
        parsed
            .due
            .parse::<DueDate>()
            .with_context(|| format!("Invalid due date '{}'", parsed.due))?;
        if !matches!(parsed.format.as_str(), "" | "markup" | "plaintext") {
            anyhow::bail!("Unknown format '{}', use markup or plaintext", parsed.format);
        }
        parsed.body = body_lines.join("\n");

        Ok(parsed)
    }
}
