//! gscores-export - Export G-Scores tables to CSV

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};

use gscores_export::config::{Config, InputFormat, QuoteStyle, ReportFormat};
use gscores_export::download::{DirectorySink, DownloadSink, StdoutSink};
use gscores_export::export::{ExportOutcome, TableExporter, DEFAULT_FILENAME};
use gscores_export::parser::ParserFactory;
use gscores_export::report::render_to_stderr;
use gscores_export::{logging, ExportError};

const EXIT_NOT_FOUND: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInputFormat {
    Html,
    Json,
}

impl From<CliInputFormat> for InputFormat {
    fn from(f: CliInputFormat) -> Self {
        match f {
            CliInputFormat::Html => InputFormat::Html,
            CliInputFormat::Json => InputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliQuoteStyle {
    Verbatim,
    Escaped,
}

impl From<CliQuoteStyle> for QuoteStyle {
    fn from(s: CliQuoteStyle) -> Self {
        match s {
            CliQuoteStyle::Verbatim => QuoteStyle::Verbatim,
            CliQuoteStyle::Escaped => QuoteStyle::Escaped,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Terminal,
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Terminal => ReportFormat::Terminal,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

/// Export a table from a rendered G-Scores page to CSV
#[derive(Parser, Debug)]
#[command(name = "gscores-export")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Rendered page (.html) or JSON table dump (.json); `-` reads stdin
    input: PathBuf,

    /// Id of the table to export
    #[arg(short, long = "table")]
    table_id: String,

    /// Suggested file name for the download
    #[arg(short, long, default_value = DEFAULT_FILENAME)]
    filename: String,

    /// Directory to save the file in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write the CSV to stdout instead of saving a file
    #[arg(long, conflicts_with = "output_dir")]
    stdout: bool,

    /// Replace an existing file instead of saving as "name (1).csv"
    #[arg(long)]
    overwrite: bool,

    /// Input format (detected from the extension or content by default)
    #[arg(long, value_enum)]
    input_format: Option<CliInputFormat>,

    /// Field quoting: verbatim keeps embedded quotes as-is
    #[arg(long, value_enum, default_value = "verbatim")]
    quote_style: CliQuoteStyle,

    /// Fail with exit code 1 when the table does not exist
    #[arg(long)]
    strict: bool,

    /// Print an outcome report to stderr
    #[arg(long, value_enum)]
    report: Option<CliReportFormat>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.downcast_ref::<ExportError>().is_some_and(ExportError::is_not_found) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_NOT_FOUND)
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<ExportOutcome> {
    let report = cli.report;

    let mut config = Config::new(cli.input, cli.table_id)
        .with_filename(cli.filename)
        .with_output_dir(cli.output_dir)
        .with_stdout(cli.stdout)
        .with_overwrite(cli.overwrite)
        .with_quote_style(cli.quote_style.into())
        .with_strict(cli.strict);
    if let Some(format) = cli.input_format {
        config = config.with_input_format(format.into());
    }
    if let Some(format) = report {
        config = config.with_report_format(format.into());
    }

    let document = ParserFactory::new().load(&config)?;

    let mut sink: Box<dyn DownloadSink> = if config.to_stdout {
        Box::new(StdoutSink::new())
    } else {
        Box::new(DirectorySink::new(&config.output_dir).with_overwrite(config.overwrite))
    };

    let exporter = TableExporter::new().with_quote_style(config.quote_style);
    let outcome = exporter.export(&document, &config.table_id, &config.filename, &mut sink)?;

    if report.is_some() {
        render_to_stderr(&outcome, config.report_format)?;
    }

    if config.strict && !outcome.is_exported() {
        return Err(ExportError::not_found(&config.table_id).into());
    }

    Ok(outcome)
}
