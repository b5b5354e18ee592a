use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::model::{FileReport, ScanReport};
use crate::path::display_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown format '{other}'")),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    files_scanned: usize,
    files_with_issues: usize,
    total_violations: usize,
    categories: BTreeMap<&'static str, usize>,
    files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    violations: usize,
    priority: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    incomplete: Vec<&'static str>,
    issues: Vec<JsonIssue<'a>>,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    line: usize,
    category: &'static str,
    text: &'a str,
    suggestion: Option<&'a str>,
}

pub fn render_json(report: &ScanReport) -> Result<String, AppError> {
    let files = report
        .files
        .iter()
        .map(|file| JsonFile {
            path: file.path.display().to_string(),
            violations: file.count(),
            priority: file.priority().as_str(),
            incomplete: file.incomplete.iter().map(|c| c.as_str()).collect(),
            issues: file
                .violations
                .iter()
                .map(|v| JsonIssue {
                    line: v.line,
                    category: v.category.as_str(),
                    text: &v.text,
                    suggestion: v.suggestion.as_deref(),
                })
                .collect(),
        })
        .collect();

    let json = JsonReport {
        files_scanned: report.files_scanned,
        files_with_issues: report.files_with_issues(),
        total_violations: report.total_violations(),
        categories: report
            .category_totals()
            .into_iter()
            .map(|(category, count)| (category.as_str(), count))
            .collect(),
        files,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn render_text(report: &ScanReport, verbose: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Scan results:");
    let _ = writeln!(out, "  Files scanned:     {}", report.files_scanned);
    let _ = writeln!(out, "  Files with issues: {}", report.files_with_issues());
    let _ = writeln!(out, "  Total violations:  {}", report.total_violations());

    let totals = report.category_totals();
    if !totals.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "By category:");
        for (category, count) in &totals {
            let _ = writeln!(out, "- {:<16} {:>5}", category.display_name(), count);
        }
    }

    if !report.files.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Files by violation count:");
        for file in &report.files {
            render_file(&mut out, file, verbose);
        }
    }

    out
}

fn render_file(out: &mut String, file: &FileReport, verbose: bool) {
    let _ = writeln!(
        out,
        "- [{:<6}] {:<50} {} violation(s)",
        file.priority(),
        display_path(&file.path),
        file.count()
    );
    if !file.incomplete.is_empty() {
        let categories: Vec<&str> = file.incomplete.iter().map(|c| c.as_str()).collect();
        let _ = writeln!(out, "    incomplete: {}", categories.join(", "));
    }
    if verbose {
        for violation in &file.violations {
            let _ = write!(
                out,
                "    {}:{} {} '{}'",
                violation.line, violation.column, violation.category, violation.text
            );
            if let Some(suggestion) = &violation.suggestion {
                let _ = write!(out, " -> {suggestion}");
            }
            let _ = writeln!(out);
        }
    }
}

/// Emit the rendered report to stdout or a file. Writing the file fails
/// only after the scan has completed, so a caller can rerun with a
/// different destination without rescanning anything of value.
pub fn write_report(rendered: &str, out: Option<&Path>) -> Result<(), AppError> {
    match out {
        Some(path) => fs::write(path, rendered).map_err(|err| {
            AppError::ReportWrite(format!("{}: {}", path.display(), err))
        }),
        None => {
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
