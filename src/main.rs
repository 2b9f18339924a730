//! tabsniff CLI - delimited text format sniffer and converter

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabsniff::{
    Configuration, DetectionReport, Document, Sniffer, encoding_display_name, encoding_for_label,
};
use tracing_subscriber::EnvFilter;

/// Delimited text format sniffer.
///
/// Detects encoding, separator, quote and escape characters and header
/// presence, and optionally re-writes files under a different format.
#[derive(Parser, Debug)]
#[command(name = "tabsniff")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) to sniff
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Force specific separator (single character)
    #[arg(short = 'd', long)]
    separator: Option<char>,

    /// Force specific quote character (single character)
    #[arg(short = 'q', long)]
    quote: Option<char>,

    /// Force specific encoding label (e.g. utf-8, windows-1252)
    #[arg(short = 'e', long)]
    encoding: Option<String>,

    /// Score candidates on a single thread
    #[arg(long)]
    sequential: bool,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Print the first N parsed rows
    #[arg(short = 'p', long, value_name = "N")]
    preview: Option<usize>,

    /// List every candidate configuration with its score
    #[arg(long)]
    scores: bool,

    /// Re-write each file under the target format instead of describing it
    #[arg(short = 'c', long)]
    convert: bool,

    /// Target separator for --convert
    #[arg(long, requires = "convert")]
    to_separator: Option<char>,

    /// Target quote character for --convert
    #[arg(long, requires = "convert")]
    to_quote: Option<char>,

    /// Target escape character for --convert
    #[arg(long, requires = "convert")]
    to_escape: Option<char>,

    /// Target encoding label for --convert
    #[arg(long, requires = "convert")]
    to_encoding: Option<String>,

    /// Write converted output here instead of stdout (single input only)
    #[arg(short = 'o', long, requires = "convert")]
    output: Option<PathBuf>,

    /// Log detection stages to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport<'a> {
    file: String,
    configuration: &'a Configuration,
    rows: usize,
    columns: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a [Vec<String>]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<Vec<ScoreEntry<'a>>>,
}

#[derive(Serialize)]
struct ScoreEntry<'a> {
    index: usize,
    score: i64,
    configuration: &'a Configuration,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() && args.files.len() > 1 {
        eprintln!("--output accepts a single input file");
        return ExitCode::FAILURE;
    }

    let sniffer = match build_sniffer(&args) {
        Ok(sniffer) => sniffer,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut exit_code = ExitCode::SUCCESS;

    for file in &args.files {
        let result = if args.convert {
            convert_file(file, &sniffer, &args)
        } else {
            sniff_file(file, &sniffer, &args)
        };
        if let Err(e) = result {
            eprintln!("Error processing {}: {}", file.display(), e);
            exit_code = ExitCode::FAILURE;
        }
    }

    exit_code
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tabsniff=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_sniffer(args: &Args) -> tabsniff::Result<Sniffer> {
    let mut sniffer = Sniffer::new();
    sniffer.parallel(!args.sequential);

    if let Some(separator) = args.separator {
        sniffer.separator(separator);
    }
    if let Some(quote) = args.quote {
        sniffer.quote(quote);
    }
    if let Some(label) = &args.encoding {
        sniffer.encoding(encoding_for_label(label)?);
    }

    Ok(sniffer)
}

fn sniff_file(path: &Path, sniffer: &Sniffer, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let report = sniffer.detect_report(&data);
    let document = Document::parse(&data, report.configuration.clone());

    match args.format {
        OutputFormat::Text => print_text_output(path, &document, &report, args),
        OutputFormat::Json => print_json_output(path, &document, &report, args)?,
    }

    Ok(())
}

fn convert_file(path: &Path, sniffer: &Sniffer, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let mut document = Document::from_bytes_with(&data, sniffer);

    let mut target = document.configuration().clone();
    if let Some(separator) = args.to_separator {
        target = target.with_separator(separator);
    }
    if let Some(quote) = args.to_quote {
        target = target.with_quote(quote);
    }
    if let Some(escape) = args.to_escape {
        target = target.with_escape(escape);
    }
    if let Some(label) = &args.to_encoding {
        target = target.with_encoding(encoding_for_label(label)?);
    }
    target.validate()?;
    document.set_configuration(target);

    match &args.output {
        Some(output) => document.save(output)?,
        None => {
            let bytes = document.to_bytes()?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn print_text_output(path: &Path, document: &Document, report: &DetectionReport, args: &Args) {
    let config = document.configuration();
    println!("File: {}", path.display());
    println!("  Encoding: {}", encoding_display_name(config.encoding));
    println!("  Separator: {:?}", config.separator_char());
    println!("  Quote: {:?}", config.quote_char());
    println!("  Escape: {:?}", config.escape_char());
    println!("  Decimal mark: {:?}", config.decimal_mark_char());
    println!("  Has header: {}", config.first_row_as_header);
    println!("  Rows: {}", document.table().row_count());
    println!("  Columns: {}", document.table().max_column_count());

    if let Some(n) = args.preview {
        println!("  Preview:");
        for (i, row) in document.table().rows().iter().take(n).enumerate() {
            println!("    {}: {:?}", i + 1, row);
        }
    }

    if args.scores {
        println!("  Candidates:");
        for candidate in &report.candidates {
            let marker = if report.best == Some(candidate.index) { "*" } else { " " };
            println!(
                "   {marker}{:>4} {:>6}  {}",
                candidate.index, candidate.score, candidate.configuration
            );
        }
    }

    println!();
}

fn print_json_output(
    path: &Path,
    document: &Document,
    report: &DetectionReport,
    args: &Args,
) -> Result<(), serde_json::Error> {
    let rows = document.table().rows();
    let file_report = FileReport {
        file: path.display().to_string(),
        configuration: document.configuration(),
        rows: document.table().row_count(),
        columns: document.table().max_column_count(),
        preview: args.preview.map(|n| &rows[..n.min(rows.len())]),
        scores: args.scores.then(|| {
            report
                .candidates
                .iter()
                .map(|c| ScoreEntry {
                    index: c.index,
                    score: c.score,
                    configuration: &c.configuration,
                })
                .collect()
        }),
    };

    println!("{}", serde_json::to_string(&file_report)?);
    Ok(())
}
