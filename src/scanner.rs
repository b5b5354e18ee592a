use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, FileReport, ScanReport, ScanTarget};
use crate::path::matches_globs;
use crate::rules::{PatternRule, build_rules};

pub struct Scanner {
    exclude: Option<globset::GlobSet>,
    allow: Option<globset::GlobSet>,
    rules: Vec<Box<dyn PatternRule>>,
}

impl Scanner {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let exclude = config.compile_excludes()?;
        let allow = config.compile_allowlist()?;
        let rules = build_rules(&config)?;
        Ok(Self { exclude, allow, rules })
    }

    /// Scan every file under the given roots for the selected categories.
    /// A missing root is a configuration error; everything past that point
    /// recovers per file and the scan runs to completion.
    pub fn scan(
        &self,
        categories: &[Category],
        roots: &[PathBuf],
        verbose: bool,
    ) -> Result<ScanReport, AppError> {
        for root in roots {
            if !root.exists() {
                return Err(AppError::config(format!(
                    "root directory '{}' does not exist",
                    root.display()
                )));
            }
        }

        let files = self.enumerate(roots, verbose);

        // Per-file matching is independent; the sorted input list plus an
        // order-preserving collect keeps the merge deterministic.
        let file_reports: Vec<Option<FileReport>> = files
            .par_iter()
            .map(|path| self.scan_file(path, categories, verbose))
            .collect();

        let mut report = ScanReport::new();
        for file_report in file_reports.into_iter().flatten() {
            report.add_file(file_report);
        }
        report.sort();
        Ok(report)
    }

    /// Order-stable enumeration of scannable files under the roots.
    fn enumerate(&self, roots: &[PathBuf], verbose: bool) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for root in roots {
            let mut walker = WalkDir::new(root).into_iter();
            while let Some(entry) = walker.next() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        if verbose {
                            eprintln!("Skipping {:?}: {}", err.path(), err);
                        }
                        continue;
                    }
                };

                let path = entry.path();
                if matches_globs(path, self.exclude.as_ref()) {
                    if entry.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                    continue;
                }

                if entry.file_type().is_file() && FileKind::from_path(path).is_some() {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        files
    }

    /// Returns `None` when the file could not be read (warned and skipped).
    fn scan_file(&self, path: &Path, categories: &[Category], verbose: bool) -> Option<FileReport> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                if verbose {
                    eprintln!("Skipping {}: {}", path.display(), err);
                }
                return None;
            }
        };

        let mut file_report = FileReport::new(path.to_path_buf());

        // Allow-listed files (token definitions, fixtures) are counted as
        // scanned but never produce violations.
        if matches_globs(path, self.allow.as_ref()) {
            return Some(file_report);
        }

        let kind = FileKind::from_path(path)?;
        let target = ScanTarget { path: path.to_path_buf(), kind, text };

        for rule in &self.rules {
            if !categories.contains(&rule.category()) {
                continue;
            }
            match rule.check(&target) {
                Ok(violations) => file_report.violations.extend(violations),
                Err(err) => {
                    if verbose {
                        eprintln!(
                            "Incomplete {} results for {}: {}",
                            rule.category(),
                            path.display(),
                            err
                        );
                    }
                    file_report.incomplete.push(rule.category());
                }
            }
        }

        file_report
            .violations
            .sort_by(|a, b| (a.line, a.column, a.category).cmp(&(b.line, b.column, b.category)));

        Some(file_report)
    }
}
