//! Configuration handling for gscores-export

use std::path::PathBuf;

use crate::export::DEFAULT_FILENAME;

/// Host document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Html,
    Json,
}

impl InputFormat {
    pub fn name(self) -> &'static str {
        match self {
            InputFormat::Html => "HTML",
            InputFormat::Json => "JSON",
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" | "xhtml" => Ok(InputFormat::Html),
            "json" => Ok(InputFormat::Json),
            _ => Err(format!("Unknown input format: {}", s)),
        }
    }
}

/// How cell values are wrapped in the CSV output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Quotes around every field, content copied as-is. Embedded `"` is not
    /// escaped, so such cells do not survive a strict CSV reader.
    #[default]
    Verbatim,
    /// Quotes around every field with embedded `"` doubled (RFC 4180)
    Escaped,
}

impl std::str::FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbatim" => Ok(QuoteStyle::Verbatim),
            "escaped" | "rfc4180" => Ok(QuoteStyle::Escaped),
            _ => Err(format!("Unknown quote style: {}", s)),
        }
    }
}

/// Format of the outcome report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Configuration for one export run
#[derive(Debug, Clone)]
pub struct Config {
    /// Host document to read (`-` for stdin)
    pub input: PathBuf,
    /// Forced input format; detected from the extension when unset
    pub input_format: Option<InputFormat>,
    /// Id of the table to export
    pub table_id: String,
    /// Suggested download name
    pub filename: String,
    /// Directory receiving the file
    pub output_dir: PathBuf,
    /// Write the CSV to stdout instead of a file
    pub to_stdout: bool,
    /// Replace an existing file instead of picking a free name
    pub overwrite: bool,
    /// Field quoting
    pub quote_style: QuoteStyle,
    /// Treat a missing table as a failure
    pub strict: bool,
    /// Outcome report format
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            input_format: None,
            table_id: String::new(),
            filename: DEFAULT_FILENAME.to_string(),
            output_dir: PathBuf::from("."),
            to_stdout: false,
            overwrite: false,
            quote_style: QuoteStyle::default(),
            strict: false,
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config for a document and table id
    pub fn new(input: PathBuf, table_id: impl Into<String>) -> Self {
        Self {
            input,
            table_id: table_id.into(),
            ..Default::default()
        }
    }

    /// Force the input format
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Set the suggested download name
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Send the CSV to stdout
    pub fn with_stdout(mut self, to_stdout: bool) -> Self {
        self.to_stdout = to_stdout;
        self
    }

    /// Allow replacing existing files
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the quote style
    pub fn with_quote_style(mut self, style: QuoteStyle) -> Self {
        self.quote_style = style;
        self
    }

    /// Fail on a missing table
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Whether the document is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
