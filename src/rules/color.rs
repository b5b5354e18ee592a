use regex::Regex;

use super::{
    AttrSpan, PatternRule, class_attributes, declarations, dedupe_spans, style_attributes,
    style_declarations,
};
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Category, FileKind, ScanTarget, Violation};

/// A parsed color literal. Alpha is `None` when the literal carries no
/// alpha channel at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Option<f32>,
}

pub struct HardcodedColorRule {
    palette: Vec<(String, Rgba)>,
    min_border_alpha: f64,
    literal_re: Regex,
    arbitrary_re: Regex,
    named_re: Regex,
}

impl HardcodedColorRule {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut palette = Vec::with_capacity(config.tokens.len());
        for token in &config.tokens {
            let rgba = parse_color(&token.hex).ok_or_else(|| {
                AppError::config(format!(
                    "token '{}' has unparseable color '{}'",
                    token.name, token.hex
                ))
            })?;
            palette.push((token.name.clone(), rgba));
        }

        Ok(Self {
            palette,
            min_border_alpha: config.min_border_alpha,
            literal_re: Regex::new(
                r"(?i)#[0-9a-f]{3,8}\b|\b(?:rgb|rgba|hsl|hsla)\(\s*[^)]*\)",
            )?,
            arbitrary_re: Regex::new(
                r"(?i)\b(?:bg|text|border|ring|divide|from|via|to|fill|stroke)-\[(#[0-9a-f]{3,8}|rgba?\([^\]]+\))\]",
            )?,
            named_re: Regex::new(
                r"\b(?:bg|text|border|ring|divide|from|via|to)-((?:slate|gray|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose)-(?:50|[1-9]00|950)|white|black)\b",
            )?,
        })
    }

    fn nearest_token(&self, color: Rgba) -> Option<String> {
        self.palette
            .iter()
            .min_by_key(|(_, candidate)| distance(color, *candidate))
            .map(|(name, _)| format!("var(--color-{name})"))
    }

    /// Color literals in a declaration value: offset, text, suggestion.
    fn check_value(&self, decl_property: &str, value: &str) -> Vec<(usize, String, Option<String>)> {
        let mut found = Vec::new();
        for m in self.literal_re.find_iter(value) {
            let Some(color) = parse_color(m.as_str()) else { continue };
            // Low-alpha border colors belong to the border-opacity rule.
            if super::border::is_border_color_property(decl_property)
                && let Some(alpha) = color.alpha
                && f64::from(alpha) < self.min_border_alpha
            {
                continue;
            }
            found.push((m.start(), m.as_str().to_string(), self.nearest_token(color)));
        }
        found
    }

    fn check_classes(&self, attr: &AttrSpan, violations: &mut Vec<Violation>) {
        for caps in self.arbitrary_re.captures_iter(&attr.value) {
            let Some(inner) = caps.get(1) else { continue };
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let suggestion = parse_color(inner.as_str()).and_then(|c| self.nearest_token(c));
            violations.push(Violation {
                line: attr.line,
                column: attr.column + inner.start(),
                category: Category::Color,
                text: whole.to_string(),
                suggestion,
            });
        }
        for caps in self.named_re.captures_iter(&attr.value) {
            let Some(shade) = caps.get(1) else { continue };
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let suggestion = shade_hex(shade.as_str())
                .and_then(parse_color)
                .and_then(|c| self.nearest_token(c));
            violations.push(Violation {
                line: attr.line,
                column: attr.column + shade.start(),
                category: Category::Color,
                text: whole.to_string(),
                suggestion,
            });
        }
    }
}

impl PatternRule for HardcodedColorRule {
    fn category(&self) -> Category {
        Category::Color
    }

    fn check(&self, target: &ScanTarget) -> Result<Vec<Violation>, AppError> {
        let mut violations = Vec::new();

        match target.kind {
            FileKind::Stylesheet => {
                for decl in declarations(&target.text)? {
                    for (offset, text, suggestion) in self.check_value(&decl.property, &decl.value)
                    {
                        violations.push(Violation {
                            line: decl.line,
                            column: decl.column + offset,
                            category: Category::Color,
                            text,
                            suggestion,
                        });
                    }
                }
            }
            FileKind::Markup => {
                for attr in style_attributes(&target.text) {
                    for decl in style_declarations(&attr)? {
                        for (offset, text, suggestion) in
                            self.check_value(&decl.property, &decl.value)
                        {
                            violations.push(Violation {
                                line: decl.line,
                                column: decl.column + offset,
                                category: Category::Color,
                                text,
                                suggestion,
                            });
                        }
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

fn distance(a: Rgba, b: Rgba) -> u32 {
    let dr = i32::from(a.r) - i32::from(b.r);
    let dg = i32::from(a.g) - i32::from(b.g);
    let db = i32::from(a.b) - i32::from(b.b);
    (dr * dr + dg * dg + db * db) as u32
}

/// Parse a hex, `rgb()`/`rgba()`, or `hsl()`/`hsla()` literal.
pub(crate) fn parse_color(text: &str) -> Option<Rgba> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = text.to_ascii_lowercase();
    let open = lower.find('(')?;
    let close = lower.rfind(')')?;
    let name = &lower[..open];
    let args: Vec<&str> = lower[open + 1..close]
        .split([',', '/', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    match name {
        "rgb" | "rgba" => {
            if args.len() < 3 {
                return None;
            }
            let r = parse_channel(args[0])?;
            let g = parse_channel(args[1])?;
            let b = parse_channel(args[2])?;
            let alpha = args.get(3).and_then(|a| parse_alpha(a));
            Some(Rgba { r, g, b, alpha })
        }
        "hsl" | "hsla" => {
            if args.len() < 3 {
                return None;
            }
            let h: f32 = args[0].trim_end_matches("deg").parse().ok()?;
            let s: f32 = args[1].strip_suffix('%')?.parse().ok()?;
            let l: f32 = args[2].strip_suffix('%')?.parse().ok()?;
            let alpha = args.get(3).and_then(|a| parse_alpha(a));
            let (r, g, b) = hsl_to_rgb(h, s / 100.0, l / 100.0);
            Some(Rgba { r, g, b, alpha })
        }
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let expand = |c: u8| -> u8 { c << 4 | c };
    let digit = |c: char| c.to_digit(16).map(|d| d as u8);

    let chars: Vec<u8> = hex.chars().map(digit).collect::<Option<_>>()?;
    match chars.len() {
        3 | 4 => {
            let r = expand(chars[0]);
            let g = expand(chars[1]);
            let b = expand(chars[2]);
            let alpha = chars.get(3).map(|&a| f32::from(expand(a)) / 255.0);
            Some(Rgba { r, g, b, alpha })
        }
        6 | 8 => {
            let byte = |i: usize| chars[i] << 4 | chars[i + 1];
            let alpha = if chars.len() == 8 { Some(f32::from(byte(6)) / 255.0) } else { None };
            Some(Rgba { r: byte(0), g: byte(2), b: byte(4), alpha })
        }
        _ => None,
    }
}

fn parse_channel(value: &str) -> Option<u8> {
    if let Some(pct) = value.strip_suffix('%') {
        let pct: f32 = pct.parse().ok()?;
        Some((pct / 100.0 * 255.0).round().clamp(0.0, 255.0) as u8)
    } else {
        let n: f32 = value.parse().ok()?;
        Some(n.round().clamp(0.0, 255.0) as u8)
    }
}

fn parse_alpha(value: &str) -> Option<f32> {
    if let Some(pct) = value.strip_suffix('%') {
        let pct: f32 = pct.parse().ok()?;
        Some((pct / 100.0).clamp(0.0, 1.0))
    } else {
        let a: f32 = value.parse().ok()?;
        Some(a.clamp(0.0, 1.0))
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// Hex values for the palette shades that show up in utility classes. An
/// unknown shade still violates; it just gets no suggestion.
fn shade_hex(shade: &str) -> Option<&'static str> {
    let hex = match shade {
        "white" => "#ffffff",
        "black" => "#000000",
        "zinc-50" => "#fafafa",
        "zinc-100" => "#f4f4f5",
        "zinc-200" => "#e4e4e7",
        "zinc-300" => "#d4d4d8",
        "zinc-400" => "#a1a1aa",
        "zinc-500" => "#71717a",
        "zinc-600" => "#52525b",
        "zinc-700" => "#3f3f46",
        "zinc-800" => "#27272a",
        "zinc-900" => "#18181b",
        "zinc-950" => "#09090b",
        "red-500" => "#ef4444",
        "green-500" => "#22c55e",
        "emerald-500" => "#10b981",
        "blue-500" => "#3b82f6",
        "sky-500" => "#0ea5e9",
        "amber-500" => "#f59e0b",
        "yellow-500" => "#eab308",
        "violet-500" => "#8b5cf6",
        "purple-500" => "#a855f7",
        _ => return None,
    };
    Some(hex)
}
