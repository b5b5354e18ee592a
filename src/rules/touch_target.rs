use regex::Regex;

use super::{PatternRule, dedupe_spans, line_col};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

pub struct TouchTargetRule {
    min_px: u32,
    element_re: Regex,
    role_re: Regex,
    class_re: Regex,
    style_re: Regex,
    step_re: Regex,
    arbitrary_re: Regex,
    style_size_re: Regex,
}

impl TouchTargetRule {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            min_px: config.min_touch_target_px,
            element_re: Regex::new(r"(?i)<(button|a|input|select|textarea)\b([^>]*)>")?,
            role_re: Regex::new(r#"(?i)<(\w+)\b([^>]*\brole\s*=\s*["']button["'][^>]*)>"#)?,
            class_re: Regex::new(r#"(?i)\b(?:class|className)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?,
            style_re: Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?,
            step_re: Regex::new(r"\b(?:min-)?(?:h|size)-(\d+)\b")?,
            arbitrary_re: Regex::new(r"\b(?:min-)?(?:h|size)-\[(\d+(?:\.\d+)?)px\]")?,
            style_size_re: Regex::new(
                r"(?i)\b(?:min-)?height\s*:\s*(\d+(?:\.\d+)?)px",
            )?,
        })
    }

    /// Whether the element's attributes carry any sizing signal that reaches
    /// the minimum target size.
    fn has_sufficient_size(&self, attrs: &str) -> bool {
        let classes = self
            .class_re
            .captures(attrs)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        if classes.split_whitespace().any(|c| c == "tap-target") {
            return true;
        }
        // Utility steps are 4px each.
        for caps in self.step_re.captures_iter(&classes) {
            if let Some(step) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok())
                && step * 4 >= self.min_px
            {
                return true;
            }
        }
        for caps in self.arbitrary_re.captures_iter(&classes) {
            if let Some(px) = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok())
                && px >= self.min_px as f32
            {
                return true;
            }
        }

        if let Some(style) = self
            .style_re
            .captures(attrs)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        {
            for caps in self.style_size_re.captures_iter(style.as_str()) {
                if let Some(px) = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok())
                    && px >= self.min_px as f32
                {
                    return true;
                }
            }
        }

        false
    }
}

impl PatternRule for TouchTargetRule {
    fn category(&self) -> Category {
        Category::TouchTarget
    }

    fn check(&self, target: &ScanTarget) -> Result<Vec<Violation>, AppError> {
        if target.kind != FileKind::Markup {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();
        // Elements that are interactive by tag name, plus anything carrying
        // role="button". A tag matched by both dedupes to one report.
        for re in [&self.element_re, &self.role_re] {
            for caps in re.captures_iter(&target.text) {
                let (Some(whole), Some(attrs)) = (caps.get(0), caps.get(2)) else { continue };
                if is_non_interactive_input(whole.as_str()) {
                    continue;
                }
                if self.has_sufficient_size(attrs.as_str()) {
                    continue;
                }
                let (line, column) = line_col(&target.text, whole.start());
                violations.push(Violation {
                    line,
                    column,
                    category: Category::TouchTarget,
                    text: truncate(whole.as_str()),
                    suggestion: Some("tap-target".to_string()),
                });
            }
        }

        dedupe_spans(&mut violations);
        Ok(violations)
    }
}

fn is_non_interactive_input(tag: &str) -> bool {
    let lower = tag.to_ascii_lowercase();
    lower.contains("type=\"hidden\"") || lower.contains("type='hidden'")
}

fn truncate(tag: &str) -> String {
    const MAX: usize = 80;
    let flat: String = tag.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= MAX {
        flat
    } else {
        let cut = flat
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(MAX);
        format!("{}…", &flat[..cut])
    }
}
