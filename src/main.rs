//! Markdown PDF Forge - Markdown editing session with live preview and PDF export
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization, and the export run.

mod config;
mod editor;
mod error;
mod export;
mod file_handler;
mod markdown;
mod message;
mod pdf;
mod state;

use anyhow::Context;
use config::{Config, ThemePreference};
use error::{AppError, AppResult};
use export::{DirectorySink, ExportOutcome, ExportReport};
use message::LogNotifier;
use state::EditorSession;
use std::path::{Path, PathBuf};

/// Application name for logging
const APP_NAME: &str = "markdown-pdf-forge";

/// Parsed command line
#[derive(Debug, Default)]
struct Flags {
    /// Markdown file to load into the session
    input: Option<PathBuf>,

    /// Directory receiving the PDF
    output_dir: Option<PathBuf>,

    /// Where to write the HTML preview
    preview: Option<PathBuf>,

    /// Preview theme override
    theme: Option<ThemePreference>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    log::info!("Starting Markdown PDF Forge");

    let flags = parse_args();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Failed to load configuration, using defaults: {}", e);
        Config::default()
    });

    let mut session = EditorSession::from_config(&config);
    if flags.theme.is_some_and(|theme| theme != session.theme()) {
        session.toggle_theme();
    }

    if let Some(path) = &flags.input {
        if let Err(e) = load_into_session(&mut session, path).await {
            if let AppError::FileIO(file_err) = &e {
                eprintln!("{}", file_err.user_message());
            }
            return Err(e).with_context(|| format!("Could not open {}", path.display()));
        }
    }

    if let Some(path) = &flags.preview {
        tokio::fs::write(path, session.preview_html())
            .await
            .with_context(|| format!("Could not write preview to {}", path.display()))?;
        log::info!("Wrote preview to {}", path.display());
    }

    let output_dir = flags
        .output_dir
        .or(config.export.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    if session.is_exporting() {
        anyhow::bail!("An export is already in progress");
    }

    log::info!("Exporting \"{}\" to {}", session.title(), output_dir.display());
    match export_session(&session, output_dir).await? {
        Some(report) => {
            log::debug!(
                "{} page(s), {} bytes",
                report.page_count,
                report.size_bytes
            );
            println!("{}", report.path.display());
            Ok(())
        }
        None => anyhow::bail!("An export is already in progress"),
    }
}

/// Export the session into `output_dir`; `None` if another export was running
async fn export_session(
    session: &EditorSession,
    output_dir: PathBuf,
) -> AppResult<Option<ExportReport>> {
    let mut sink = DirectorySink::new(output_dir);
    match session.export(&mut sink, &mut LogNotifier).await {
        ExportOutcome::Delivered(report) => Ok(Some(report)),
        ExportOutcome::Failed(err) => Err(err.into()),
        ExportOutcome::Busy => Ok(None),
    }
}

/// Replace the session buffer with a file's contents
async fn load_into_session(session: &mut EditorSession, path: &Path) -> AppResult<()> {
    let result = file_handler::read_file(path).await?;
    if result.lossy {
        log::warn!(
            "{} is not valid UTF-8, invalid bytes were replaced",
            path.display()
        );
    }
    session.set_text(&result.content);
    log::debug!(
        "Loaded {} ({} bytes, {:?}) as buffer version {}",
        path.display(),
        result.size_bytes,
        result.encoding,
        session.version()
    );
    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    // Set default log level if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,markdown_pdf_forge=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments
fn parse_args() -> Flags {
    let args: Vec<String> = std::env::args().collect();
    let mut flags = Flags::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-o" | "--output-dir" => {
                flags.output_dir = Some(PathBuf::from(option_value(&args, i, "--output-dir")));
                i += 1;
            }
            "-p" | "--preview" => {
                flags.preview = Some(PathBuf::from(option_value(&args, i, "--preview")));
                i += 1;
            }
            "-t" | "--theme" => {
                let name = option_value(&args, i, "--theme");
                match ThemePreference::parse(name) {
                    Some(theme) => flags.theme = Some(theme),
                    None => {
                        eprintln!("Error: unknown theme '{}', expected light or dark", name);
                        std::process::exit(1);
                    }
                }
                i += 1;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
            _ => {
                if flags.input.is_some() {
                    eprintln!("Error: only one input file is supported");
                    std::process::exit(1);
                }
                flags.input = Some(PathBuf::from(&args[i]));
            }
        }
        i += 1;
    }

    flags
}

/// Value following the option at `i`, exiting if it is missing
fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: {} requires an argument", name);
            std::process::exit(1);
        }
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"Markdown PDF Forge - Export markdown to PDF

USAGE:
    markdown-pdf-forge [OPTIONS] [FILE]

OPTIONS:
    -h, --help              Show this help message
    -v, --version           Show version information
    -o, --output-dir DIR    Directory for the generated PDF
    -p, --preview FILE      Also write the HTML preview to FILE
    -t, --theme THEME       Preview theme: light or dark

EXAMPLES:
    markdown-pdf-forge                      Export the built-in sample document
    markdown-pdf-forge README.md            Export a specific file
    markdown-pdf-forge -o ~/Documents notes.md
    markdown-pdf-forge -p preview.html -t dark notes.md

The PDF is named after the document's first level-1 heading with a UTC
timestamp, for example hello-world-2024-03-09T07-05-42.pdf.
"#
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}
