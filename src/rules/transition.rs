use regex::Regex;

use super::{
    Declaration, PatternRule, declarations, dedupe_spans, style_attributes, style_declarations,
};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

pub struct TransitionDurationRule {
    approved_ms: Vec<u32>,
    duration_re: Regex,
}

impl TransitionDurationRule {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        if config.approved_durations_ms.is_empty() {
            return Err(AppError::config("approved_durations_ms must not be empty"));
        }
        Ok(Self {
            approved_ms: config.approved_durations_ms.clone(),
            duration_re: Regex::new(r"\b(\d+(?:\.\d+)?)(ms|s)\b")?,
        })
    }

    fn nearest_token(&self, ms: u32) -> Option<String> {
        self.approved_ms
            .iter()
            .min_by_key(|approved| approved.abs_diff(ms))
            .map(|approved| format!("var(--duration-{approved})"))
    }

    fn check_declaration(&self, decl: &Declaration, violations: &mut Vec<Violation>) {
        if !is_timing_property(&decl.property) {
            return;
        }
        for caps in self.duration_re.captures_iter(&decl.value) {
            let (Some(number), Some(unit)) = (caps.get(1), caps.get(2)) else { continue };
            let Ok(value) = number.as_str().parse::<f32>() else { continue };
            let ms = match unit.as_str() {
                "s" => (value * 1000.0).round() as u32,
                _ => value.round() as u32,
            };
            if ms == 0 || self.approved_ms.contains(&ms) {
                continue;
            }
            let Some(whole) = caps.get(0) else { continue };
            violations.push(Violation {
                line: decl.line,
                column: decl.column + whole.start(),
                category: Category::Transition,
                text: format!("{}: {}", decl.property, whole.as_str()),
                suggestion: self.nearest_token(ms),
            });
        }
    }
}

impl PatternRule for TransitionDurationRule {
    fn category(&self) -> Category {
        Category::Transition
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

fn is_timing_property(property: &str) -> bool {
    matches!(
        property,
        "transition"
            | "transition-duration"
            | "transition-delay"
            | "animation"
            | "animation-duration"
            | "animation-delay"
    )
}
