//! # schemagen
//!
//! Generates one TypeScript declaration file per storage module.
//!
//! ## Usage
//!
//! ```bash
//! # Regenerate with configuration defaults
//! schemagen
//!
//! # Explicit directories
//! schemagen generate --modules ./src/storage/modules --output ./src/types/generated
//!
//! # Watch mode for development
//! schemagen generate --watch
//!
//! # Preview without writing
//! schemagen generate --dry-run
//!
//! # Fail with exit code 2 when generated files are stale
//! schemagen check
//!
//! # Initialize configuration
//! schemagen init
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use schemagen::AutoPkType;
use schemagen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    pipeline::Pipeline,
    watcher::ModuleWatcher,
    writer::WriteResult,
};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(author, version, about = "Generate TypeScript declarations from storage module schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show debug logs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate declaration files for every module
    Generate {
        /// Directory containing the module manifests
        #[arg(short, long)]
        modules: Option<PathBuf>,

        /// Output directory for generated TypeScript files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Primary key typing
        #[arg(long, value_enum)]
        auto_pk_type: Option<PkTyping>,

        /// Watch module manifests and regenerate on change
        #[arg(short, long)]
        watch: bool,

        /// Preview output without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that generated files are up-to-date
    Check {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new schemagen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PkTyping {
    Generic,
    Number,
    String,
}

impl From<PkTyping> for AutoPkType {
    fn from(value: PkTyping) -> Self {
        match value {
            PkTyping::Generic => AutoPkType::Generic,
            PkTyping::Number => AutoPkType::Number,
            PkTyping::String => AutoPkType::String,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SCHEMAGEN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => run_generate(&ConfigManager::load(None)?, false, cli.quiet),

        Some(Commands::Generate {
            modules,
            output,
            auto_pk_type,
            watch,
            dry_run,
            config,
        }) => {
            let config = ConfigManager::load(config.as_deref())?;
            let config = ConfigManager::merge_cli_args(
                config,
                &CliArgs {
                    modules,
                    output,
                    auto_pk_type: auto_pk_type.map(AutoPkType::from),
                },
            );

            if watch {
                run_watch_mode(&config, dry_run, cli.quiet)
            } else {
                run_generate(&config, dry_run, cli.quiet)
            }
        }

        Some(Commands::Check { config }) => cmd_check(config),

        Some(Commands::Init { output, force }) => cmd_init(output, force),
    }
}

/// Run one regeneration pass.
fn run_generate(config: &Config, dry_run: bool, quiet: bool) -> Result<(), CliError> {
    if !quiet {
        println!(
            "{} {}",
            "Generating types from".cyan(),
            config.modules.dir.display()
        );
    }

    let summary = Pipeline::new(config.clone()).run(dry_run)?;

    if quiet {
        return Ok(());
    }

    for skipped in &summary.skipped {
        println!(
            "{} skipped {}: {}",
            "Warning:".yellow(),
            skipped.display_name,
            skipped.reason
        );
    }

    if summary.created_output_dir {
        println!(
            "  Created output directory {}",
            config.output.dir.display()
        );
    }

    for result in &summary.written {
        match result {
            WriteResult::Written { path, bytes } => {
                println!("{} Written {} bytes to {}", "✓".green(), bytes, path.display());
            }
            WriteResult::DryRun { content, path } => {
                println!("{} Would write to {}:", "[dry-run]".yellow(), path.display());
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    println!(
        "  Generated {} module file(s)",
        summary.written.len().to_string().green()
    );

    Ok(())
}

/// Regenerate, then rerun a full pass for every manifest change.
fn run_watch_mode(config: &Config, dry_run: bool, quiet: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", config.modules.dir.display());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(config, dry_run, quiet) {
        print_error(&e);
    }

    let watcher = ModuleWatcher::new(&config.modules.dir, &config.modules.suffix);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Module changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(config, dry_run, quiet) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(config_path: Option<PathBuf>) -> Result<(), CliError> {
    println!("{}", "Checking generated types...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let report = Pipeline::new(config).check()?;

    if report.is_up_to_date() {
        println!(
            "{} {} file(s) up-to-date",
            "✓".green(),
            report.checked
        );
        return Ok(());
    }

    println!("{} Generated types are out of date", "✗".red());
    for path in &report.stale {
        println!("  {}", path.display());
    }
    println!("  Run 'schemagen generate' to update");

    Err(CliError::Validation(format!(
        "{} of {} generated file(s) out of date",
        report.stale.len(),
        report.checked
    )))
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
