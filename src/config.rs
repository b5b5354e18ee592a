use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dirs_next as dirs;
use globset::{Glob, GlobSet};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A named palette entry used for nearest-color suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorToken {
    pub name: String,
    pub hex: String,
}

impl ColorToken {
    pub fn new(name: &str, hex: &str) -> Self {
        Self { name: name.to_string(), hex: hex.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Glob patterns for paths that are never scanned.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Glob patterns for files that are scanned but exempt from all rules
    /// (token definition sources, rule fixtures).
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    /// Spacing suggestions snap to multiples of this many pixels.
    #[serde(default = "default_spacing_grid")]
    pub spacing_grid_px: u32,

    /// Transition/animation durations that do not need a token.
    #[serde(default = "default_durations")]
    pub approved_durations_ms: Vec<u32>,

    /// Border colors with an alpha below this are flagged.
    #[serde(default = "default_min_border_alpha")]
    pub min_border_alpha: f64,

    /// Interactive elements must reach this many pixels in each dimension.
    #[serde(default = "default_min_touch_target")]
    pub min_touch_target_px: u32,

    /// The color token palette suggestions are drawn from.
    #[serde(default = "default_tokens")]
    pub tokens: Vec<ColorToken>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            allow: default_allow(),
            spacing_grid_px: default_spacing_grid(),
            approved_durations_ms: default_durations(),
            min_border_alpha: default_min_border_alpha(),
            min_touch_target_px: default_min_touch_target(),
            tokens: default_tokens(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let path = config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        let path = config_file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path)?;
        let contents = toml::to_string_pretty(self)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    pub fn append_exclude(&mut self, value: String) {
        if !self.exclude.iter().any(|existing| existing == &value) {
            self.exclude.push(value);
        }
    }

    pub fn append_allow(&mut self, value: String) {
        if !self.allow.iter().any(|existing| existing == &value) {
            self.allow.push(value);
        }
    }

    pub fn compile_excludes(&self) -> Result<Option<GlobSet>, AppError> {
        compile_globs(&self.exclude)
    }

    pub fn compile_allowlist(&self) -> Result<Option<GlobSet>, AppError> {
        compile_globs(&self.allow)
    }
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>, AppError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let expanded = expand_home(pattern)?;
        builder.add(Glob::new(&expanded)?);
    }

    Ok(Some(builder.build()?))
}

pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| {
            AppError::config("Unable to determine configuration directory for this platform")
        })?;
    Ok(config_root.join("tokscan").join("config.toml"))
}

pub fn ensure_config_file() -> Result<PathBuf, AppError> {
    let path = config_file_path()?;
    if !path.exists() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let default = Config::default();
        let contents = toml::to_string_pretty(&default)?;
        fs::write(&path, contents)?;
    }
    Ok(path)
}

fn expand_home(value: &str) -> Result<String, AppError> {
    if !value.starts_with('~') {
        return Ok(value.to_string());
    }
    let home_dir = dirs::home_dir().ok_or_else(|| {
        AppError::config("Unable to expand '~' because the home directory is unknown")
    })?;
    if value == "~" {
        Ok(home_dir.display().to_string())
    } else if let Some(stripped) = value.strip_prefix("~/") {
        Ok(home_dir.join(stripped).display().to_string())
    } else {
        Ok(value.to_string())
    }
}

fn default_exclude() -> Vec<String> {
    [
        "**/node_modules/**",
        "**/dist/**",
        "**/build/**",
        "**/.next/**",
        "**/coverage/**",
        "**/target/**",
        "**/.git/**",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_allow() -> Vec<String> {
    ["**/tokens.css", "**/tokens.scss", "**/design-tokens.css"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_spacing_grid() -> u32 {
    4
}

fn default_durations() -> Vec<u32> {
    vec![150, 200, 300, 500]
}

fn default_min_border_alpha() -> f64 {
    0.12
}

fn default_min_touch_target() -> u32 {
    44
}

fn default_tokens() -> Vec<ColorToken> {
    vec![
        ColorToken::new("background-primary", "#09090b"),
        ColorToken::new("background-secondary", "#18181b"),
        ColorToken::new("surface", "#27272a"),
        ColorToken::new("border", "#3f3f46"),
        ColorToken::new("text-primary", "#fafafa"),
        ColorToken::new("text-secondary", "#a1a1aa"),
        ColorToken::new("text-muted", "#71717a"),
        ColorToken::new("accent", "#8b5cf6"),
        ColorToken::new("success", "#22c55e"),
        ColorToken::new("warning", "#f59e0b"),
        ColorToken::new("danger", "#ef4444"),
        ColorToken::new("info", "#3b82f6"),
    ]
}
