//! Command-line interface components.

use crate::config::ProcessorConfig;
use crate::constants::{DEFAULT_FILE_PATTERN, DEFAULT_OUTPUT_FILE, DEFAULT_OWNER_TAG, LOG_TARGET};
use crate::discovery::ExportSelector;
use crate::models::{Category, EmissionOrder, ProcessingStats};
use crate::processor::ExportProcessor;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "health-influx")]
#[command(about = "Convert HealthManager Pro weight and blood-pressure exports to InfluxDB line protocol")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Export file to convert (optional - the newest export in the input directory is used otherwise)
    #[arg(value_name = "EXPORT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Directory searched for exports (defaults to the download folder)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// File name pattern of exports inside the input directory
    #[arg(long, default_value = DEFAULT_FILE_PATTERN)]
    pub pattern: String,

    /// Line protocol output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Owner tag prefixed to every point
    #[arg(long, default_value = DEFAULT_OWNER_TAG)]
    pub owner: String,

    /// Which category is written first
    #[arg(long, value_enum, default_value_t = EmissionOrder::WeightFirst)]
    pub order: EmissionOrder,

    /// Convert only these categories (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<Category>,

    /// Append to the output file instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Delete processed exports after a successful run
    #[arg(long)]
    pub delete_processed: bool,

    /// Parse and report without writing output or deleting files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log warnings and errors, no summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Build the run configuration from the arguments
    pub fn to_config(&self) -> ProcessorConfig {
        let mut config = ProcessorConfig::default()
            .with_owner_tag(self.owner.clone())
            .with_emission_order(self.order)
            .with_file_pattern(self.pattern.clone())
            .with_output_path(self.output.clone());

        if let Some(dir) = &self.input_dir {
            config = config.with_input_dir(dir.clone());
        }
        if let Some(file) = &self.input_file {
            config = config.with_input_file(file.clone());
        }
        if !self.only.is_empty() {
            config = config.with_categories(self.only.clone());
        }
        if self.append {
            config = config.with_append();
        }
        if self.delete_processed {
            config = config.with_delete_processed();
        }
        if self.dry_run {
            config = config.with_dry_run();
        }
        config
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Select the export, convert it and optionally remove processed exports
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let config = args.to_config();
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let selector = ExportSelector::new(&config.input_dir, &config.file_pattern)?;
    let input = match &config.input_file {
        Some(file) => file.clone(),
        None => selector.select_latest().with_context(|| {
            format!(
                "Could not select an export in {}",
                config.input_dir.display()
            )
        })?,
    };

    let processor = ExportProcessor::new(config.clone());
    let mut stats = processor
        .process_file(&input, &config.output_path)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if config.delete_processed && !config.dry_run {
        stats.files_removed = remove_processed(&config, &selector, &input)?;
    }

    Ok(stats)
}

/// An explicit export is removed on its own; otherwise every matching export goes
fn remove_processed(
    config: &ProcessorConfig,
    selector: &ExportSelector,
    input: &Path,
) -> Result<usize> {
    if config.input_file.is_some() {
        std::fs::remove_file(input)
            .with_context(|| format!("Failed to remove {}", input.display()))?;
        info!("Removed {}", input.display());
        return Ok(1);
    }

    let removed = selector
        .cleanup()
        .context("Failed to remove processed exports")?;
    Ok(removed.len())
}

/// Print a colored run summary to stdout
pub fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    if let Some(input) = &stats.input_path {
        println!("  {} {}", "Export:".bright_cyan(), input.display());
    }
    match &stats.output_path {
        Some(output) => println!("  {} {}", "Output:".bright_cyan(), output.display()),
        None => println!("  {} {}", "Output:".bright_cyan(), "dry run".bright_black()),
    }

    for (category, category_stats) in &stats.categories {
        if !category_stats.section_found {
            println!(
                "  {} {}",
                format!("{}:", category).bright_cyan(),
                "no section found".bright_black()
            );
            continue;
        }
        println!(
            "  {} {} points from {} records ({:.1}%)",
            format!("{}:", category).bright_cyan(),
            category_stats.points_written.to_string().bright_white().bold(),
            category_stats.records_parsed,
            category_stats.success_rate()
        );
        if category_stats.records_skipped() > 0 {
            println!(
                "    {} {}",
                "Skipped:".bright_red(),
                category_stats.records_skipped().to_string().bright_red().bold()
            );
            for skipped in &category_stats.skipped {
                println!(
                    "      line {}: '{} {}' {}",
                    skipped.line,
                    skipped.date,
                    skipped.time,
                    skipped.reason.bright_black()
                );
            }
        }
    }

    if stats.files_removed > 0 {
        println!(
            "  {} {}",
            "Exports removed:".bright_cyan(),
            stats.files_removed.to_string().bright_white()
        );
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
}
