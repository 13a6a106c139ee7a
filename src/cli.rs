//! Command-line interface: argument parsing and orchestration of scan → paginate → render.
//!
//! All pagination and rendering logic lives in the library modules; this module only wires
//! configuration, the scanner and the generator together and prints user-facing summaries.

use crate::config::Config;
use crate::filter::ExclusionFilter;
use crate::generate::{generate, statistics, GenerationReport, Statistics};
use crate::load_config::load_config_or_default;
use crate::paginator::Paginator;
use crate::scan::{ScanOutcome, Scanner};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI for copyright-pages: paginate a source tree into print-ready PDF documents.
#[derive(Parser)]
#[clap(
    name = "copyright-pages",
    version,
    about = "Paginate source code into print-ready PDF documents for copyright submission"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and write the full (and, for large trees, shortened) PDF documents
    Generate {
        #[clap(flatten)]
        source: SourceArgs,
        /// Directory the documents are written to (overrides the config file)
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Print the generation report as JSON
        #[clap(long)]
        json: bool,
    },
    /// Scan a directory and print pagination statistics without rendering anything
    Stats {
        #[clap(flatten)]
        source: SourceArgs,
        /// Print the statistics as JSON
        #[clap(long)]
        json: bool,
    },
    /// Print the effective file exclusion rules
    Excludes {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Additional file name to exclude (repeatable)
        #[clap(long = "exclude")]
        exclude: Vec<String>,
        /// Additional substring pattern to exclude (repeatable)
        #[clap(long = "exclude-pattern")]
        exclude_pattern: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root directory of the source tree
    pub directory: PathBuf,
    /// Path to the YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Additional file name to exclude (repeatable)
    #[clap(long = "exclude")]
    pub exclude: Vec<String>,
    /// Additional substring pattern to exclude (repeatable)
    #[clap(long = "exclude-pattern")]
    pub exclude_pattern: Vec<String>,
}

/// Extracted CLI logic entrypoint for integration tests and main()
pub fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            source,
            output_dir,
            json,
        } => {
            let mut config = load_config_or_default(source.config.as_deref())?;
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            let outcome = scan(&config, &source)?;
            tracing::info!(command = "generate", files = outcome.files.len(), "Generating documents");
            let report = generate(&config, &outcome.files).map_err(|e| {
                tracing::error!(command = "generate", error = %e, "Generation failed");
                anyhow::Error::msg(e)
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Stats { source, json } => {
            let config = load_config_or_default(source.config.as_deref())?;
            let outcome = scan(&config, &source)?;
            if outcome.files.is_empty() {
                anyhow::bail!("no matching source files found in {}", source.directory.display());
            }
            let paginator = Paginator::new(config.pagination)?;
            let stats = statistics(&paginator, &outcome.files);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_statistics(&stats, &outcome);
            }
            Ok(())
        }
        Commands::Excludes {
            config,
            exclude,
            exclude_pattern,
        } => {
            let config = load_config_or_default(config.as_deref())?;
            let filter = build_filter(&config, &exclude, &exclude_pattern);
            println!(
                "Exclusion rules ({} files, {} patterns):",
                filter.exact_count(),
                filter.pattern_count()
            );
            for rule in filter.describe() {
                println!("  - {rule}");
            }
            Ok(())
        }
    }
}

fn build_filter(config: &Config, exclude: &[String], patterns: &[String]) -> ExclusionFilter {
    let mut filter = ExclusionFilter::from_config(&config.scan);
    for name in exclude {
        tracing::info!(file = %name, "Added to exclude list");
        filter.add_file(name);
    }
    for pattern in patterns {
        tracing::info!(pattern = %pattern, "Added exclude pattern");
        filter.add_pattern(pattern);
    }
    filter
}

fn scan(config: &Config, source: &SourceArgs) -> Result<ScanOutcome> {
    let filter = build_filter(config, &source.exclude, &source.exclude_pattern);
    let scanner = Scanner::new(config.scan.clone());
    scanner
        .scan(&source.directory, |name| filter.is_excluded(name))
        .with_context(|| format!("Error scanning directory {}", source.directory.display()))
}

fn print_statistics(stats: &Statistics, outcome: &ScanOutcome) {
    println!("Statistics:");
    println!(
        "  Files: {} ({} excluded, {} empty skipped, {} unreadable)",
        stats.files,
        outcome.excluded.len(),
        outcome.skipped_empty.len(),
        outcome.unreadable.len()
    );
    println!("  Accounted lines: {}", stats.total_lines);
    println!(
        "  Estimated pages: {} ({} lines/page)",
        stats.estimated_pages, stats.lines_per_page
    );
    println!("  Full document pages: {}", stats.full_document_pages);
    for file in &stats.per_file {
        println!("    {} ({} lines, {}p)", file.name, file.lines, file.page_span);
    }
}

fn print_report(report: &GenerationReport) {
    let stats = &report.statistics;
    println!(
        "Paginated {} files, {} lines, ~{} pages ({} lines/page)",
        stats.files, stats.total_lines, stats.estimated_pages, stats.lines_per_page
    );
    if let Some(sections) = &report.sections {
        println!("Shortened sections:");
        println!("  First: lines 1-{}", sections.first_end);
        println!(
            "  Middle: lines {}-{}",
            sections.middle_start + 1,
            sections.middle_end
        );
        println!(
            "  Last: lines {}-{}",
            sections.last_start + 1,
            sections.total_lines
        );
    }
    for doc in &report.documents {
        println!("Created {} document: {} ({} pages)", doc.kind, doc.path.display(), doc.pages);
    }
}
