use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

use vendas::cleanup::clean_report_text;
use vendas::config::ExtractorConfig;
use vendas::importers::load_report_text;
use vendas::report::{Extraction, ReportExtractor};

pub mod formatters;

#[derive(Parser)]
#[command(name = "vendas")]
#[command(version, about = "Extract per-customer sales records from Venda X Cliente reports")]
#[command(
    long_about = "Rebuilds customer sales rows (dates, amounts, returns, profit) from the text of Venda X Cliente PDF reports, coping with page breaks, repeated headers and rows split over several lines."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file (defaults to the per-user config)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log every line decision to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract sales records from one or more report PDFs or text files
    Extract {
        /// Paths to the PDFs or extracted text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Strip pagination and header lines before extracting
        #[arg(long)]
        clean: bool,

        /// Show at most this many rows per document
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Remove pagination, banners and header lines from report text
    Clean {
        /// Path to the PDF or extracted text
        file: PathBuf,

        /// Write the cleaned text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how each line of a report is classified
    Inspect {
        /// Path to the PDF or extracted text
        file: PathBuf,

        /// Include blank lines in the trace
        #[arg(short, long)]
        all: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = ExtractorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            files,
            clean,
            limit,
        } => handle_extract(&files, clean, limit, &config, cli.json),
        Commands::Clean { file, output } => handle_clean(&file, output.as_deref(), cli.json),
        Commands::Inspect { file, all } => handle_inspect(&file, all, &config, cli.json),
    }
}

fn handle_extract(
    files: &[PathBuf],
    clean: bool,
    limit: Option<usize>,
    config: &ExtractorConfig,
    json_output: bool,
) -> Result<()> {
    let extractor = ReportExtractor::new(config.clone());
    let mut documents: Vec<(&Path, Extraction)> = Vec::with_capacity(files.len());
    let mut failed = 0;

    for file in files {
        match extract_document(file, clean, &extractor) {
            Ok(extraction) => documents.push((file.as_path(), extraction)),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {:#}", "✗".red().bold(), file.display(), e);
            }
        }
    }

    if json_output {
        println!("{}", formatters::format_documents_json(&documents));
    } else {
        let batch = files.len() > 1;
        for (file, extraction) in &documents {
            print_document(file, extraction, limit, batch);
        }
    }

    if failed > 0 {
        bail!("{} of {} documents could not be processed", failed, files.len());
    }

    Ok(())
}

fn extract_document(file: &Path, clean: bool, extractor: &ReportExtractor) -> Result<Extraction> {
    info!("Extracting sales records from: {:?}", file);

    let mut text = load_report_text(file)?;
    if clean {
        text = clean_report_text(&text).text;
    }

    Ok(extractor.run(&text))
}

fn print_document(file: &Path, extraction: &Extraction, limit: Option<usize>, batch: bool) {
    if batch {
        println!("\n{}", file.display().to_string().bold());
    }

    if extraction.is_empty() {
        println!(
            "\n{} Nenhum dado encontrado em {}",
            "⚠".yellow().bold(),
            file.display()
        );
        return;
    }

    println!("\n{}\n", formatters::format_summary(extraction));
    println!(
        "{}",
        formatters::format_records_table(&extraction.records, limit)
    );
}

fn handle_clean(file: &Path, output: Option<&Path>, json_output: bool) -> Result<()> {
    let text = load_report_text(file)?;
    let cleaned = clean_report_text(&text);

    if let Some(path) = output {
        fs::write(path, &cleaned.text)
            .with_context(|| format!("Failed to write cleaned text to {}", path.display()))?;
    }

    if json_output {
        let json = serde_json::to_string_pretty(&cleaned)
            .context("Failed to serialize cleaned text")?;
        println!("{}", json);
    } else if output.is_some() {
        if cleaned.changed {
            println!(
                "{} Removed {} lines",
                "✓".green().bold(),
                cleaned.removed
            );
        } else {
            println!("{} Nothing to remove", "ℹ".blue().bold());
        }
    } else {
        println!("{}", cleaned.text);
    }

    Ok(())
}

fn handle_inspect(
    file: &Path,
    show_all: bool,
    config: &ExtractorConfig,
    json_output: bool,
) -> Result<()> {
    let text = load_report_text(file)?;
    let extraction = ReportExtractor::new(config.clone())
        .with_trace(true)
        .run(&text);

    if json_output {
        let json = serde_json::to_string_pretty(&extraction)
            .context("Failed to serialize extraction trace")?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", formatters::format_trace(&extraction, show_all));
    println!("\n{}", formatters::format_summary(&extraction));

    Ok(())
}
