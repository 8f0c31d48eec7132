//! Parser layer for reading host documents

mod entities;
mod html;
mod json;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{Config, InputFormat};
use crate::error::ExportError;
use crate::model::Document;

pub use self::entities::decode_entities;
pub use self::html::HtmlParser;
pub use self::json::JsonParser;

/// Trait for parsing host documents into tables
pub trait Parser: Send + Sync {
    /// Parse document text
    fn parse_str(&self, source: &str) -> Result<Document, ExportError>;

    /// Format handled by this parser
    fn format(&self) -> InputFormat;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;

    /// Read and parse a file. Invalid UTF-8 is replaced rather than rejected.
    fn parse_path(&self, path: &Path) -> Result<Document, ExportError> {
        let bytes = std::fs::read(path)?;
        self.parse_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Factory for choosing a parser by format or file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(HtmlParser), Box::new(JsonParser)],
        }
    }

    /// Get the parser for a format
    pub fn for_format(&self, format: InputFormat) -> &dyn Parser {
        self.parsers
            .iter()
            .find(|p| p.format() == format)
            .map(|p| p.as_ref())
            .unwrap_or(&HtmlParser)
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if let Some(parser) = self.parsers.iter().find(|p| p.supports_extension(&ext)) {
            return Ok(parser.as_ref());
        }

        match detect_format(path) {
            Some(format) => Ok(self.for_format(format)),
            None => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load the document named by the config, from a file or stdin
    pub fn load(&self, config: &Config) -> Result<Document> {
        if config.reads_stdin() {
            let mut source = Vec::new();
            std::io::stdin()
                .read_to_end(&mut source)
                .context("Failed to read document from stdin")?;
            let source = String::from_utf8_lossy(&source);
            let format = config
                .input_format
                .or_else(|| sniff_format(&source))
                .unwrap_or(InputFormat::Html);
            return self
                .for_format(format)
                .parse_str(&source)
                .with_context(|| format!("Failed to parse {} from stdin", format.name()));
        }

        let path = &config.input;
        let parser = match config.input_format {
            Some(format) => self.for_format(format),
            None => self.get_parser(path)?,
        };
        tracing::debug!(path = %path.display(), format = parser.format().name(), "loading document");
        parser
            .parse_path(path)
            .with_context(|| format!("Failed to load document: {}", path.display()))
    }
}

/// Detect the format from file content (for files without a known extension)
pub fn detect_format(path: &Path) -> Option<InputFormat> {
    use std::fs::File;

    let mut buffer = [0u8; 512];
    let bytes_read = File::open(path).ok()?.read(&mut buffer).ok()?;
    sniff_format(&String::from_utf8_lossy(&buffer[..bytes_read]))
}

fn sniff_format(source: &str) -> Option<InputFormat> {
    let trimmed = source.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    match trimmed.chars().next()? {
        '{' => Some(InputFormat::Json),
        '<' => Some(InputFormat::Html),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_get_parser_by_extension() {
        let factory = ParserFactory::new();
        let parser = factory.get_parser(Path::new("lookup.HTML")).unwrap();
        assert_eq!(parser.format(), InputFormat::Html);
        let parser = factory.get_parser(Path::new("dump.json")).unwrap();
        assert_eq!(parser.format(), InputFormat::Json);
    }

    #[test]
    fn test_get_parser_sniffs_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  {{\"t\": []}}").unwrap();
        let factory = ParserFactory::new();
        let parser = factory.get_parser(file.path()).unwrap();
        assert_eq!(parser.format(), InputFormat::Json);
    }

    #[test]
    fn test_unsupported_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Name,Score").unwrap();
        let factory = ParserFactory::new();
        assert!(matches!(
            factory.get_parser(file.path()),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format("\u{feff}<!DOCTYPE html>"), Some(InputFormat::Html));
        assert_eq!(sniff_format("\n{}"), Some(InputFormat::Json));
        assert_eq!(sniff_format(""), None);
    }

    #[test]
    fn test_load_with_forced_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, r#"<table id="t"><tr><td>1</td></tr></table>"#).unwrap();

        let config = Config::new(path, "t").with_input_format(InputFormat::Html);
        let doc = ParserFactory::new().load(&config).unwrap();
        assert!(doc.table("t").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config::new("does/not/exist.html".into(), "t");
        let err = ParserFactory::new().load(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load document"));
    }
}
