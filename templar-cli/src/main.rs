//! # templar
//!
//! Runs the compiled-in templates against a generation target.
//!
//! ## Usage
//!
//! ```bash
//! # Generate from the bundled template tree into the current project
//! templar templar-cli/src/templates .
//!
//! # Preview what would change
//! templar templar-cli/src/templates . --dry-run
//!
//! # Fail (exit code 2) when generated sources are out of date
//! templar templar-cli/src/templates . --check
//!
//! # Only run the value templates, with debug logging
//! templar templar-cli/src/templates . --include 'bean/**' -vv
//! ```

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use templar::{Generator, RunSummary};
use templar_cli::{
    config::{require_dirs, CliArgs, ConfigManager},
    error::{CliError, CliResult},
    init_logging, registry,
};

#[derive(Parser)]
#[command(name = "templar")]
#[command(author, version, about = "Generate Java sources from compiled-in templates", long_about = None)]
struct Cli {
    /// Template tree to discover template units in
    templates: PathBuf,

    /// Project root receiving generated sources
    target: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads (0 = available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Preview changes without writing files
    #[arg(long)]
    dry_run: bool,

    /// Fail if any generated file is missing or out of date
    #[arg(long)]
    check: bool,

    /// Move unchanged files' modification time past this instant
    /// (milliseconds since the Unix epoch)
    #[arg(long, value_name = "MILLIS")]
    touch_after: Option<u64>,

    /// Only run templates whose relative path matches this glob
    #[arg(long, value_name = "GLOB")]
    include: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    require_dirs(&cli.templates, &cli.target)?;

    let args = CliArgs {
        workers: cli.workers,
        include: cli.include.clone(),
        dry_run: cli.dry_run || cli.check,
        touch_after: cli.touch_after,
    };

    let config = ConfigManager::load(cli.config.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);
    let options = ConfigManager::options(&config, &args)?;
    let renderer = config.renderer()?;
    let dry_run = options.dry_run;

    let generator = Generator::new(registry())
        .with_options(options)
        .with_renderer(renderer);
    let summary = generator.run(&cli.templates, &cli.target)?;

    print_summary(&summary, dry_run);

    if cli.check && summary.written() > 0 {
        for file in summary.files.iter().filter(|f| f.outcome.wrote_content()) {
            println!("  {} {}", file.outcome.label().yellow(), file.path.display());
        }
        return Err(CliError::OutOfDate {
            count: summary.written(),
        });
    }

    Ok(())
}

/// Print the final one-line summary plus any discovery warnings.
fn print_summary(summary: &RunSummary, dry_run: bool) {
    for warning in &summary.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }

    let counts = format!(
        "{} new, {} updated, {} unchanged, {} touched",
        summary.created(),
        summary.updated(),
        summary.unchanged(),
        summary.touched()
    );

    if dry_run {
        println!(
            "{} {} profile(s): {}",
            "[dry-run]".yellow(),
            summary.profiles,
            counts
        );
    } else {
        println!(
            "{} {} profile(s): {}",
            "✓".green(),
            summary.profiles.to_string().green(),
            counts
        );
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
