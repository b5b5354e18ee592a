use regex::Regex;

use super::{
    AttrSpan, Declaration, PatternRule, class_attributes, declarations, dedupe_spans,
    style_attributes, style_declarations,
};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

pub struct HardcodedSpacingRule {
    grid_px: f32,
    length_re: Regex,
    utility_re: Regex,
}

impl HardcodedSpacingRule {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            grid_px: config.spacing_grid_px as f32,
            length_re: Regex::new(r"\b(\d+(?:\.\d+)?)(px|rem)\b")?,
            utility_re: Regex::new(
                r"\b(?:p|m|gap|space|inset|top|right|bottom|left)(?:[trblxyse])?-\[(\d+(?:\.\d+)?)(px|rem)\]",
            )?,
        })
    }

    /// Nearest token on the spacing grid, e.g. 24px on a 4px grid is
    /// `var(--spacing-6)`.
    fn nearest_token(&self, px: f32) -> String {
        let step = (px / self.grid_px).round().max(1.0) as u32;
        format!("var(--spacing-{step})")
    }

    fn check_declaration(&self, decl: &Declaration, violations: &mut Vec<Violation>) {
        if !is_spacing_property(&decl.property) {
            return;
        }
        for caps in self.length_re.captures_iter(&decl.value) {
            let (Some(number), Some(unit)) = (caps.get(1), caps.get(2)) else { continue };
            let Ok(value) = number.as_str().parse::<f32>() else { continue };
            if value == 0.0 {
                continue;
            }
            let Some(whole) = caps.get(0) else { continue };
            let px = to_px(value, unit.as_str());
            violations.push(Violation {
                line: decl.line,
                // Offset into the declaration keeps repeated literals
                // (`padding: 8px 8px`) distinct.
                column: decl.column + whole.start(),
                category: Category::Spacing,
                text: format!("{}: {}", decl.property, whole.as_str()),
                suggestion: Some(self.nearest_token(px)),
            });
        }
    }

    fn check_classes(&self, attr: &AttrSpan, violations: &mut Vec<Violation>) {
        for caps in self.utility_re.captures_iter(&attr.value) {
            let (Some(number), Some(unit)) = (caps.get(1), caps.get(2)) else { continue };
            let Ok(value) = number.as_str().parse::<f32>() else { continue };
            if value == 0.0 {
                continue;
            }
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let px = to_px(value, unit.as_str());
            violations.push(Violation {
                line: attr.line,
                column: attr.column + number.start(),
                category: Category::Spacing,
                text: whole.to_string(),
                suggestion: Some(self.nearest_token(px)),
            });
        }
    }
}

impl PatternRule for HardcodedSpacingRule {
    fn category(&self) -> Category {
        Category::Spacing
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
                for attr in class_attributes(&target.text) {
                    self.check_classes(&attr, &mut violations);
                }
            }
        }

        dedupe_spans(&mut violations);
        Ok(violations)
    }
}

fn is_spacing_property(property: &str) -> bool {
    matches!(
        property,
        "margin"
            | "margin-top"
            | "margin-right"
            | "margin-bottom"
            | "margin-left"
            | "margin-block"
            | "margin-inline"
            | "padding"
            | "padding-top"
            | "padding-right"
            | "padding-bottom"
            | "padding-left"
            | "padding-block"
            | "padding-inline"
            | "gap"
            | "row-gap"
            | "column-gap"
            | "inset"
            | "top"
            | "right"
            | "bottom"
            | "left"
    )
}

fn to_px(value: f32, unit: &str) -> f32 {
    match unit {
        "rem" => value * 16.0,
        _ => value,
    }
}
