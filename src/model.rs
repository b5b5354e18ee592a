use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Color,
    Spacing,
    Typography,
    Transition,
    Border,
    TouchTarget,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Color,
        Category::Spacing,
        Category::Typography,
        Category::Transition,
        Category::Border,
        Category::TouchTarget,
    ];

    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "color" | "hardcoded-color" => Some(Category::Color),
            "spacing" | "hardcoded-spacing" => Some(Category::Spacing),
            "typography" | "hardcoded-typography" => Some(Category::Typography),
            "transition" | "non-standard-transition-duration" => Some(Category::Transition),
            "border" | "low-border-opacity" => Some(Category::Border),
            "touch-target" | "sub-minimum-touch-target" => Some(Category::TouchTarget),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Color => "hardcoded-color",
            Category::Spacing => "hardcoded-spacing",
            Category::Typography => "hardcoded-typography",
            Category::Transition => "non-standard-transition-duration",
            Category::Border => "low-border-opacity",
            Category::TouchTarget => "sub-minimum-touch-target",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Color => "Colors",
            Category::Spacing => "Spacing",
            Category::Typography => "Typography",
            Category::Transition => "Transitions",
            Category::Border => "Border opacity",
            Category::TouchTarget => "Touch targets",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s).ok_or_else(|| format!("Unknown category '{s}'"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Stylesheet,
    Markup,
}

impl FileKind {
    /// Detect the file kind from its extension. Returns `None` for files
    /// the scanner does not look at.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "css" | "scss" | "sass" | "less" => Some(FileKind::Stylesheet),
            "html" | "htm" | "jsx" | "tsx" | "vue" | "svelte" | "astro" => Some(FileKind::Markup),
            _ => None,
        }
    }
}

/// A file queued for matching: path, detected kind, and raw text.
#[derive(Debug)]
pub struct ScanTarget {
    pub path: PathBuf,
    pub kind: FileKind,
    pub text: String,
}

/// One match instance produced by a pattern rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub line: usize,
    pub column: usize,
    pub category: Category,
    pub text: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Bucket a file by violation count: more than 10 is high, 5 through 10
    /// is medium, fewer than 5 is low.
    pub fn from_count(count: usize) -> Self {
        if count > 10 {
            Priority::High
        } else if count >= 5 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }

    pub fn at_least(&self, min: Priority) -> bool {
        self.rank() >= min.rank()
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::from_name(s).ok_or_else(|| format!("Unknown severity '{s}'"))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-file scan outcome. Only files with at least one violation or an
/// incomplete category make it into the report.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
    /// Categories whose evaluation failed for this file.
    pub incomplete: Vec<Category>,
}

impl FileReport {
    pub fn new(path: PathBuf) -> Self {
        Self { path, violations: Vec::new(), incomplete: Vec::new() }
    }

    pub fn count(&self) -> usize {
        self.violations.len()
    }

    pub fn priority(&self) -> Priority {
        Priority::from_count(self.count())
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.incomplete.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, report: FileReport) {
        self.files_scanned += 1;
        if !report.is_clean() {
            self.files.push(report);
        }
    }

    pub fn files_with_issues(&self) -> usize {
        self.files.iter().filter(|f| f.count() > 0).count()
    }

    pub fn total_violations(&self) -> usize {
        self.files.iter().map(FileReport::count).sum()
    }

    pub fn category_totals(&self) -> BTreeMap<Category, usize> {
        let mut totals = BTreeMap::new();
        for file in &self.files {
            for violation in &file.violations {
                *totals.entry(violation.category).or_insert(0) += 1;
            }
        }
        totals
    }

    /// Order files by descending violation count, then ascending path for a
    /// stable result given equal counts.
    pub fn sort(&mut self) {
        self.files.sort_by(|a, b| b.count().cmp(&a.count()).then_with(|| a.path.cmp(&b.path)));
    }

    /// Drop files whose priority bucket falls below `min`.
    pub fn filter_min_priority(&mut self, min: Priority) {
        self.files.retain(|file| file.priority().at_least(min));
    }
}
