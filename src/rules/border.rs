use regex::Regex;

use super::color::parse_color;
use super::{
    Declaration, PatternRule, declarations, dedupe_spans, style_attributes, style_declarations,
};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

pub struct BorderOpacityRule {
    min_alpha: f64,
    literal_re: Regex,
}

impl BorderOpacityRule {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if !(0.0..=1.0).contains(&config.min_border_alpha) {
            return Err(AppError::config(format!(
                "min_border_alpha must be between 0 and 1, got {}",
                config.min_border_alpha
            )));
        }
        Ok(Self {
            min_alpha: config.min_border_alpha,
            literal_re: Regex::new(
                r"(?i)#[0-9a-f]{8}\b|#[0-9a-f]{4}\b|\b(?:rgba|hsla|rgb|hsl)\(\s*[^)]*\)",
            )?,
        })
    }

    fn check_declaration(&self, decl: &Declaration, violations: &mut Vec<Violation>) {
        if !is_border_color_property(&decl.property) {
            return;
        }
        for m in self.literal_re.find_iter(&decl.value) {
            let Some(color) = parse_color(m.as_str()) else { continue };
            let Some(alpha) = color.alpha else { continue };
            if f64::from(alpha) >= self.min_alpha {
                continue;
            }
            violations.push(Violation {
                line: decl.line,
                column: decl.column + m.start(),
                category: Category::Border,
                text: format!("{}: {}", decl.property, m.as_str()),
                suggestion: Some("var(--border-subtle)".to_string()),
            });
        }
    }
}

impl PatternRule for BorderOpacityRule {
    fn category(&self) -> Category {
        Category::Border
    }

    fn check(&self, target: &ScanTarget) -> Result<Vec<Violation>, AppError> {
        let mut violations = Vec::new();

        match target.kind {
            FileKind::Stylesheet => {
                for decl in declarations(&target.text)? {
                    self.check_declaration(&decl, &mut violations);
                }
            }
            FileKind::Markup => {
                for attr in style_attributes(&target.text) {
                    for decl in style_declarations(&attr)? {
                        self.check_declaration(&decl, &mut violations);
                    }
                }
            }
        }

        dedupe_spans(&mut violations);
        Ok(violations)
    }
}

/// Properties whose color value the border-opacity rule owns.
pub(crate) fn is_border_color_property(property: &str) -> bool {
    matches!(
        property,
        "border"
            | "border-color"
            | "border-top"
            | "border-right"
            | "border-bottom"
            | "border-left"
            | "border-top-color"
            | "border-right-color"
            | "border-bottom-color"
            | "border-left-color"
            | "outline"
            | "outline-color"
    )
}
