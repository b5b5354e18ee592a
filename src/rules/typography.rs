use regex::Regex;

use super::{
    AttrSpan, Declaration, PatternRule, class_attributes, declarations, dedupe_spans,
    style_attributes, style_declarations,
};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

const TEXT_SCALE: &[(f32, &str)] = &[
    (12.0, "xs"),
    (14.0, "sm"),
    (16.0, "base"),
    (18.0, "lg"),
    (20.0, "xl"),
    (24.0, "2xl"),
    (30.0, "3xl"),
    (36.0, "4xl"),
];

const WEIGHT_SCALE: &[(u32, &str)] = &[
    (400, "normal"),
    (500, "medium"),
    (600, "semibold"),
    (700, "bold"),
];

pub struct HardcodedTypographyRule {
    size_re: Regex,
    weight_re: Regex,
    size_utility_re: Regex,
    weight_utility_re: Regex,
}

impl HardcodedTypographyRule {
    pub fn new(_config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            size_re: Regex::new(r"\b(\d+(?:\.\d+)?)(px|rem)\b")?,
            weight_re: Regex::new(r"\b([1-9]00)\b|\b(bold|lighter|bolder)\b")?,
            size_utility_re: Regex::new(r"\btext-\[(\d+(?:\.\d+)?)(px|rem)\]")?,
            weight_utility_re: Regex::new(r"\bfont-\[([1-9]00)\]")?,
        })
    }

    /// Inspect one declaration; returns the offending fragment and its
    /// suggestion when the declaration hardcodes typography.
    fn inspect(&self, decl: &Declaration) -> Option<(String, Option<String>)> {
        if decl.value.contains("var(") {
            return None;
        }
        match decl.property.as_str() {
            "font-size" | "line-height" => {
                let caps = self.size_re.captures(&decl.value)?;
                let value: f32 = caps.get(1)?.as_str().parse().ok()?;
                let px = to_px(value, caps.get(2)?.as_str());
                Some((
                    format!("{}: {}", decl.property, decl.value),
                    Some(nearest_size_token(px)),
                ))
            }
            "font-weight" => {
                let m = self.weight_re.find(&decl.value)?;
                let weight = parse_weight(m.as_str())?;
                Some((
                    format!("{}: {}", decl.property, decl.value),
                    Some(nearest_weight_token(weight)),
                ))
            }
            "font" => {
                // Shorthand: pick out whichever of size/weight is present.
                let size = self.size_re.captures(&decl.value).and_then(|caps| {
                    let value: f32 = caps.get(1)?.as_str().parse().ok()?;
                    Some(nearest_size_token(to_px(value, caps.get(2)?.as_str())))
                });
                let weight = self
                    .weight_re
                    .find(&decl.value)
                    .and_then(|m| parse_weight(m.as_str()))
                    .map(nearest_weight_token);
                if size.is_none() && weight.is_none() {
                    return None;
                }
                let suggestion = [size, weight].into_iter().flatten().collect::<Vec<_>>();
                Some((format!("font: {}", decl.value), Some(suggestion.join(", "))))
            }
            _ => None,
        }
    }

    /// Combined font declarations in one rule block report as a single
    /// violation, anchored at the first of them.
    fn check_declarations(&self, decls: &[Declaration], violations: &mut Vec<Violation>) {
        let mut current: Option<(usize, Violation, Vec<String>)> = None;

        for decl in decls {
            let Some((text, suggestion)) = self.inspect(decl) else { continue };

            match &mut current {
                Some((block, violation, suggestions)) if *block == decl.block => {
                    violation.text.push_str("; ");
                    violation.text.push_str(&text);
                    suggestions.extend(suggestion);
                }
                _ => {
                    if let Some((_, violation, suggestions)) = current.take() {
                        violations.push(seal(violation, suggestions));
                    }
                    current = Some((
                        decl.block,
                        Violation {
                            line: decl.line,
                            column: decl.column,
                            category: Category::Typography,
                            text,
                            suggestion: None,
                        },
                        suggestion.into_iter().collect(),
                    ));
                }
            }
        }

        if let Some((_, violation, suggestions)) = current.take() {
            violations.push(seal(violation, suggestions));
        }
    }

    fn check_classes(&self, attr: &AttrSpan, violations: &mut Vec<Violation>) {
        for caps in self.size_utility_re.captures_iter(&attr.value) {
            let (Some(number), Some(unit)) = (caps.get(1), caps.get(2)) else { continue };
            let Ok(value) = number.as_str().parse::<f32>() else { continue };
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            violations.push(Violation {
                line: attr.line,
                column: attr.column + number.start(),
                category: Category::Typography,
                text: whole.to_string(),
                suggestion: Some(nearest_size_token(to_px(value, unit.as_str()))),
            });
        }
        for caps in self.weight_utility_re.captures_iter(&attr.value) {
            let Some(weight) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            violations.push(Violation {
                line: attr.line,
                column: attr.column,
                category: Category::Typography,
                text: whole.to_string(),
                suggestion: Some(nearest_weight_token(weight)),
            });
        }
    }
}

impl PatternRule for HardcodedTypographyRule {
    fn category(&self) -> Category {
        Category::Typography
    }

    fn check(&self, target: &ScanTarget) -> Result<Vec<Violation>, AppError> {
        let mut violations = Vec::new();

        match target.kind {
            FileKind::Stylesheet => {
                let decls = declarations(&target.text)?;
                self.check_declarations(&decls, &mut violations);
            }
            FileKind::Markup => {
                for attr in style_attributes(&target.text) {
                    let decls = style_declarations(&attr)?;
                    self.check_declarations(&decls, &mut violations);
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

fn seal(mut violation: Violation, suggestions: Vec<String>) -> Violation {
    if !suggestions.is_empty() {
        violation.suggestion = Some(suggestions.join(", "));
    }
    violation
}

/// Keyword weights map onto the numeric scale; anything else must be a
/// three-digit weight.
fn parse_weight(text: &str) -> Option<u32> {
    match text {
        "bold" | "bolder" => Some(700),
        "lighter" => Some(300),
        digits => digits.parse().ok(),
    }
}

fn to_px(value: f32, unit: &str) -> f32 {
    match unit {
        "rem" => value * 16.0,
        _ => value,
    }
}

fn nearest_size_token(px: f32) -> String {
    let (_, name) = TEXT_SCALE
        .iter()
        .min_by(|(a, _), (b, _)| {
            (a - px).abs().partial_cmp(&(b - px).abs()).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(&(16.0, "base"));
    format!("var(--text-{name})")
}

fn nearest_weight_token(weight: u32) -> String {
    let (_, name) = WEIGHT_SCALE
        .iter()
        .min_by_key(|(w, _)| w.abs_diff(weight))
        .unwrap_or(&(400, "normal"));
    format!("var(--font-{name})")
}
