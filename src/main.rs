use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tokscan::commands::{config_cmd::ConfigOptions, scan::ScanOptions};
use tokscan::commands::{execute_config, execute_scan};
use tokscan::error::AppError;
use tokscan::model::{Category, Priority};
use tokscan::path::resolve_roots;
use tokscan::report::OutputFormat;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => {
            let categories = resolve_categories(&args.categories, args.all)?;
            let fail_on_violations = args.fail_on_violations;
            let options = ScanOptions {
                categories,
                roots: resolve_roots(&args.paths),
                format: args.format,
                out: args.out,
                min_severity: args.min_severity,
                verbose: args.verbose,
            };
            let outcome = execute_scan(options)?;
            if fail_on_violations && outcome.total_violations > 0 {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Config(args) => {
            let options = ConfigOptions {
                show_path: args.path,
                edit: args.edit,
                add_exclude: args.add_exclude,
                add_allow: args.add_allow,
            };
            execute_config(options)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Parser)]
#[command(
    name = "tokscan",
    version,
    about = "Find hardcoded style values that bypass the design token system."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan files for design-token violations and report them.
    Scan(ScanArgs),
    /// Manage tokscan configuration (excludes, allow-list, thresholds).
    Config(ConfigArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Restrict the scan to specific categories (e.g. color, spacing, typography,
    /// transition, border, touch-target).
    #[arg(short = 'c', long = "category", value_name = "CATEGORY", action = ArgAction::Append, conflicts_with = "all")]
    categories: Vec<String>,

    /// Scan all categories (default when no category is provided).
    #[arg(long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Report format.
    #[arg(long = "format", value_name = "FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Write the report to a file instead of standard output.
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    out: Option<PathBuf>,

    /// Exit with status 2 when any violation is reported.
    #[arg(long = "fail-on-violations", action = ArgAction::SetTrue)]
    fail_on_violations: bool,

    /// Only report files at or above this priority bucket.
    #[arg(long = "min-severity", value_name = "SEVERITY")]
    min_severity: Option<Priority>,

    /// Show every violation, not just per-file totals.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Root directories to scan (defaults to the current directory).
    #[arg(value_name = "PATH", num_args = 0..)]
    paths: Vec<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Append a glob to the exclude list.
    #[arg(long = "add-exclude", value_name = "GLOB")]
    add_exclude: Option<String>,

    /// Append a glob to the allow-list (files exempt from all rules).
    #[arg(long = "add-allow", value_name = "GLOB")]
    add_allow: Option<String>,
}

/// Category names are resolved here rather than by clap so an unknown name
/// is a configuration error (exit 1), not a usage error.
fn resolve_categories(names: &[String], all: bool) -> Result<Vec<Category>, AppError> {
    if all || names.is_empty() {
        return Ok(Category::ALL.to_vec());
    }

    let mut categories = Vec::new();
    for name in names {
        let category =
            Category::from_name(name).ok_or_else(|| AppError::InvalidCategory(name.clone()))?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}
