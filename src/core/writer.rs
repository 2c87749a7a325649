//! Serializers that turn a [`Document`] into bytes on disk.

use crate::core::error::RenderError;
use crate::core::proposal::{Block, Document};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::debug;

const TEXT_WIDTH: usize = 72;
const HTML_TEMPLATE: &str = include_str!("../../templates/proposal.html.hbs");

/// Renders a document into a concrete file format.
pub trait DocumentWriter {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &Document) -> Result<String, RenderError>;
}

pub struct TextWriter;

impl DocumentWriter for TextWriter {
    fn extension(&self) -> &'static str {
        OutputFormat::Text.extension()
    }

    fn render(&self, document: &Document) -> Result<String, RenderError> {
        let mut out = format!("{:^TEXT_WIDTH$}\n", document.title);
        if let Some(date) = document.date {
            out.push_str(&format!(
                "{:^TEXT_WIDTH$}\n",
                format!("Proposal Date: {date}")
            ));
        }

        for block in &document.blocks {
            match block {
                Block::Field { label, value } => out.push_str(&format!("{label}: {value}\n")),
                Block::Spacer => out.push('\n'),
                Block::Heading { text } => out.push_str(&format!("{text}\n")),
                Block::Bullet { text } => out.push_str(&format!("- {text}\n")),
            }
        }
        Ok(out)
    }
}

pub struct HtmlWriter {
    registry: Handlebars<'static>,
}

impl HtmlWriter {
    pub fn new() -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_template_string("proposal", HTML_TEMPLATE)?;
        Ok(Self { registry })
    }
}

impl DocumentWriter for HtmlWriter {
    fn extension(&self) -> &'static str {
        OutputFormat::Html.extension()
    }

    fn render(&self, document: &Document) -> Result<String, RenderError> {
        Ok(self.registry.render("proposal", document)?)
    }
}

pub struct JsonWriter;

impl DocumentWriter for JsonWriter {
    fn extension(&self) -> &'static str {
        OutputFormat::Json.extension()
    }

    fn render(&self, document: &Document) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(document)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }

    pub fn writer(&self) -> Result<Box<dyn DocumentWriter>, RenderError> {
        Ok(match self {
            OutputFormat::Text => Box::new(TextWriter),
            OutputFormat::Html => Box::new(HtmlWriter::new()?),
            OutputFormat::Json => Box::new(JsonWriter),
        })
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Renders `document` and writes it to `path`.
///
/// The bytes go to a temporary file next to `path` which is then renamed
/// into place, so an existing proposal is only ever replaced whole.
pub fn save_document(
    document: &Document,
    writer: &dyn DocumentWriter,
    path: &Path,
) -> Result<PathBuf, RenderError> {
    let rendered = writer.render(document)?;

    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            parent
        }
        None => Path::new("."),
    };

    let io_err = |source: std::io::Error| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut staged = NamedTempFile::new_in(parent).map_err(io_err)?;
    staged.write_all(rendered.as_bytes()).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;

    debug!(
        "Wrote {} bytes of {} to {}",
        rendered.len(),
        writer.extension(),
        path.display()
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn document() -> Document {
        Document {
            title: "PROPOSAL DOCUMENT".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            blocks: vec![
                Block::Spacer,
                Block::Field {
                    label: "Client Name".to_string(),
                    value: "Smith & <Sons>".to_string(),
                },
                Block::Field {
                    label: "Email".to_string(),
                    value: String::new(),
                },
                Block::Field {
                    label: "Total Cost".to_string(),
                    value: "$43,300.00".to_string(),
                },
                Block::Spacer,
                Block::Heading {
                    text: "Additional Services Requested:".to_string(),
                },
                Block::Bullet {
                    text: "Additional Site Visits & Meetings".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_text_writer_layout() {
        let text = TextWriter.render(&document()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "PROPOSAL DOCUMENT");
        assert_eq!(lines[1].trim(), "Proposal Date: 2024-03-01");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Client Name: Smith & <Sons>");
        assert_eq!(lines[4], "Email: ");
        assert_eq!(lines[5], "Total Cost: $43,300.00");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Additional Services Requested:");
        assert_eq!(lines[8], "- Additional Site Visits & Meetings");
    }

    #[test]
    fn test_html_writer_escapes_values() {
        let html = HtmlWriter::new().unwrap().render(&document()).unwrap();

        assert!(html.contains("<h1>PROPOSAL DOCUMENT</h1>"));
        assert!(html.contains("Proposal Date: 2024-03-01"));
        assert!(html.contains("<strong>Client Name:</strong> Smith &amp; &lt;Sons&gt;"));
        assert!(html.contains("<strong>Total Cost:</strong> $43,300.00"));
        assert!(html.contains("- Additional Site Visits &amp; Meetings"));

        let name = html.find("Client Name").unwrap();
        let total = html.find("Total Cost").unwrap();
        assert!(name < total);
    }

    #[test]
    fn test_json_writer_round_trips_structure() {
        let json = JsonWriter.render(&document()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "PROPOSAL DOCUMENT");
        assert_eq!(value["date"], "2024-03-01");
        assert_eq!(value["blocks"][1]["kind"], "field");
        assert_eq!(value["blocks"][1]["label"], "Client Name");
        assert_eq!(value["blocks"][6]["kind"], "bullet");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("pdf".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.writer().unwrap().extension(), "json");
    }

    #[test]
    fn test_save_document_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out").join("nadi_proposal.txt");

        let saved = save_document(&document(), &TextWriter, &path).unwrap();
        assert_eq!(saved, path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Total Cost: $43,300.00"));
    }

    #[test]
    fn test_save_document_reports_unwritable_path() {
        let dir = tempfile::TempDir::new().unwrap();
        // A directory cannot be overwritten with a file.
        let path = dir.path().to_path_buf();

        let err = save_document(&document(), &TextWriter, &path).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
        assert!(path.is_dir());
    }

    #[test]
    fn test_save_document_replaces_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nadi_proposal.txt");
        fs::write(&path, "old proposal").unwrap();

        save_document(&document(), &TextWriter, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old proposal"));
        assert!(content.contains("Total Cost: $43,300.00"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_overwrite_keeps_existing_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nadi_proposal.txt");
        fs::create_dir(&path).unwrap();
        let kept = path.join("previous.txt");
        fs::write(&kept, "previous proposal").unwrap();

        let err = save_document(&document(), &TextWriter, &path).unwrap_err();
        match err {
            RenderError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(fs::read_to_string(&kept).unwrap(), "previous proposal");
        // The staged temp file is cleaned up on failure.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_render_failure_leaves_existing_file_alone() {
        struct Failing;

        impl DocumentWriter for Failing {
            fn extension(&self) -> &'static str {
                "txt"
            }

            fn render(&self, _document: &Document) -> Result<String, RenderError> {
                Err(RenderError::Io {
                    path: PathBuf::from("template"),
                    source: std::io::Error::other("boom"),
                })
            }
        }

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nadi_proposal.txt");
        fs::write(&path, "previous proposal").unwrap();

        assert!(save_document(&document(), &Failing, &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous proposal");
    }
}
