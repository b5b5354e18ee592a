use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, Priority};
use crate::report::{OutputFormat, render_json, render_text, write_report};
use crate::scanner::Scanner;

pub struct ScanOptions {
    pub categories: Vec<Category>,
    pub roots: Vec<PathBuf>,
    pub format: OutputFormat,
    pub out: Option<PathBuf>,
    pub min_severity: Option<Priority>,
    pub verbose: bool,
}

/// What the caller needs to decide the exit status.
pub struct ScanOutcome {
    pub total_violations: usize,
}

pub fn execute_scan(options: ScanOptions) -> Result<ScanOutcome, AppError> {
    let config = Config::load()?;
    let scanner = Scanner::new(config)?;
    let mut report = scanner.scan(&options.categories, &options.roots, options.verbose)?;

    if let Some(min) = options.min_severity {
        report.filter_min_priority(min);
    }

    let rendered = match options.format {
        OutputFormat::Text => render_text(&report, options.verbose),
        OutputFormat::Json => render_json(&report)?,
    };
    write_report(&rendered, options.out.as_deref())?;

    Ok(ScanOutcome { total_violations: report.total_violations() })
}
