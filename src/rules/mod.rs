use std::sync::OnceLock;

use regex::Regex;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, ScanTarget, Violation};

pub mod border;
pub mod color;
pub mod spacing;
pub mod touch_target;
pub mod transition;
pub mod typography;

pub use border::BorderOpacityRule;
pub use color::HardcodedColorRule;
pub use spacing::HardcodedSpacingRule;
pub use touch_target::TouchTargetRule;
pub use transition::TransitionDurationRule;
pub use typography::HardcodedTypographyRule;

/// Trait that all pattern rules must implement. Rules are pure: given the
/// same target text they always produce the same violations and never touch
/// the filesystem.
pub trait PatternRule: Send + Sync {
    /// The category this rule reports under.
    fn category(&self) -> Category;

    /// Produce every violation of this rule's category found in the target.
    fn check(&self, target: &ScanTarget) -> Result<Vec<Violation>, AppError>;
}

/// Build the full rule registry from configuration.
pub fn build_rules(config: &Config) -> Result<Vec<Box<dyn PatternRule>>, AppError> {
    Ok(vec![
        Box::new(HardcodedColorRule::new(config)?),
        Box::new(HardcodedSpacingRule::new(config)?),
        Box::new(HardcodedTypographyRule::new(config)?),
        Box::new(TransitionDurationRule::new(config)?),
        Box::new(BorderOpacityRule::new(config)?),
        Box::new(TouchTargetRule::new(config)?),
    ])
}

/// A declaration longer than this aborts the rule for that file; it is
/// almost certainly minified or generated output a line-oriented report
/// cannot say anything useful about.
pub(crate) const MAX_DECLARATION_LEN: usize = 64 * 1024;

/// One logical `property: value` declaration, possibly spanning several
/// physical lines in the source.
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub line: usize,
    pub column: usize,
    /// Identifies the enclosing `{ }` block, so rules can group related
    /// declarations (0 for top-level text such as style attributes).
    pub block: usize,
    pub property: String,
    pub value: String,
}

/// Split CSS-like text into logical declarations. Whitespace runs collapse
/// to a single space so a declaration spanning several lines is matched as
/// one unit; comments, selectors, at-rule preludes, and custom property
/// definitions (`--name: value`, which are token definitions) are skipped.
pub(crate) fn declarations(text: &str) -> Result<Vec<Declaration>, AppError> {
    let mut out = Vec::new();
    let mut buffer = String::new();
    let mut start: Option<(usize, usize)> = None;

    let mut line = 1usize;
    let mut col = 0usize;
    let mut block_stack: Vec<usize> = Vec::new();
    let mut next_block = 0usize;

    let mut chars = text.chars().peekable();
    let mut in_string: Option<char> = None;

    while let Some(ch) = chars.next() {
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }

        if let Some(quote) = in_string {
            buffer.push(ch);
            if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                col += 1;
                // Block comment: consume to the matching terminator.
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        col = 0;
                    } else {
                        col += 1;
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '/' if chars.peek() == Some(&'/') && !buffer.ends_with(':') => {
                // SCSS line comment. The `:` guard keeps `url(http://...)`
                // intact.
                chars.next();
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        col = 0;
                        break;
                    }
                    col += 1;
                }
            }
            '"' | '\'' => {
                record_start(&mut start, &buffer, line, col);
                in_string = Some(ch);
                buffer.push(ch);
            }
            '{' => {
                next_block += 1;
                block_stack.push(next_block);
                buffer.clear();
                start = None;
            }
            '}' | ';' => {
                finalize(&mut out, &mut buffer, &mut start, &block_stack);
                if ch == '}' {
                    block_stack.pop();
                }
            }
            c if c.is_whitespace() => {
                if !buffer.is_empty() && !buffer.ends_with(' ') {
                    buffer.push(' ');
                }
            }
            c => {
                record_start(&mut start, &buffer, line, col);
                buffer.push(c);
            }
        }

        if buffer.len() > MAX_DECLARATION_LEN {
            let at = start.map(|(l, _)| l).unwrap_or(line);
            return Err(AppError::pattern(format!(
                "declaration starting at line {at} exceeds {MAX_DECLARATION_LEN} bytes"
            )));
        }
    }

    // Trailing declaration with no terminator (inline style fragments).
    finalize(&mut out, &mut buffer, &mut start, &block_stack);

    Ok(out)
}

fn record_start(start: &mut Option<(usize, usize)>, buffer: &str, line: usize, col: usize) {
    if start.is_none() && buffer.trim().is_empty() {
        *start = Some((line, col));
    }
}

fn finalize(
    out: &mut Vec<Declaration>,
    buffer: &mut String,
    start: &mut Option<(usize, usize)>,
    block_stack: &[usize],
) {
    let text = buffer.trim();
    if let Some((line, column)) = *start
        && let Some((property, value)) = text.split_once(':')
    {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        let is_ident = !property.is_empty()
            && property.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if is_ident && !property.starts_with("--") && !value.is_empty() {
            out.push(Declaration {
                line,
                column,
                block: block_stack.last().copied().unwrap_or(0),
                property,
                value,
            });
        }
    }
    buffer.clear();
    *start = None;
}

/// A `class` or `style` attribute occurrence in markup.
#[derive(Debug, Clone)]
pub(crate) struct AttrSpan {
    pub line: usize,
    pub column: usize,
    pub value: String,
}

pub(crate) fn class_attributes(text: &str) -> Vec<AttrSpan> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:class|className)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid pattern")
    });
    attribute_spans(text, re)
}

pub(crate) fn style_attributes(text: &str) -> Vec<AttrSpan> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid pattern")
    });
    attribute_spans(text, re)
}

fn attribute_spans(text: &str, re: &Regex) -> Vec<AttrSpan> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(2))?;
            let (line, column) = line_col(text, m.start());
            Some(AttrSpan { line, column, value: m.as_str().to_string() })
        })
        .collect()
}

/// Re-run the declaration splitter over an inline `style` attribute,
/// anchoring every resulting declaration at the attribute's position.
pub(crate) fn style_declarations(attr: &AttrSpan) -> Result<Vec<Declaration>, AppError> {
    let mut decls = declarations(&attr.value)?;
    for decl in &mut decls {
        decl.line = attr.line;
        decl.column = attr.column;
        decl.block = 0;
    }
    Ok(decls)
}

/// 1-based line and column for a byte offset.
pub(crate) fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let prefix = &text[..offset];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let col = offset - prefix.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
    (line, col)
}

/// Collapse duplicate reports on the same span; a value is reported once
/// per category no matter how many sub-patterns matched it.
pub(crate) fn dedupe_spans(violations: &mut Vec<Violation>) {
    violations.sort_by(|a, b| {
        (a.line, a.column, &a.text).cmp(&(b.line, b.column, &b.text))
    });
    violations.dedup_by(|a, b| a.line == b.line && a.column == b.column && a.text == b.text);
}
