use anyhow::{Context, Error};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use dental_soap::{generate_soap_note, load_transcript, Classifier, KeywordConfig, UnmatchedPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Parser)]
#[command(
    name = "dental-soap",
    version,
    about = "Generate a dentist SOAP note from a meeting transcript"
)]
struct Cli {
    /// Path to the transcript text file (`Speaker: text` per line)
    transcript_path: PathBuf,
    /// Override the detected patient name
    #[arg(long)]
    patient: Option<String>,
    /// Output format for the note
    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
    /// What to do with utterances no rule matches
    #[arg(long, value_enum, default_value = "subjective")]
    unmatched: UnmatchedPolicy,
    /// JSON file with extra keywords per section
    #[arg(long)]
    keywords: Option<PathBuf>,
    /// Log classification decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let extra = match &cli.keywords {
        Some(path) => KeywordConfig::load(path)
            .with_context(|| format!("loading keywords from {}", path.display()))?,
        None => KeywordConfig::default(),
    };
    let classifier = Classifier::new(&extra, cli.unmatched);

    let transcript = load_transcript(&cli.transcript_path)?;
    let note = generate_soap_note(&transcript, &classifier, cli.patient.as_deref())
        .with_context(|| format!("processing {}", cli.transcript_path.display()))?;

    match cli.format {
        OutputFormat::Markdown => println!("{}", note.to_markdown()),
        OutputFormat::Json => println!("{}", note.to_json()?),
    }

    Ok(())
}
