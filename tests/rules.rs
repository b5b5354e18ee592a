use std::path::PathBuf;

use tokscan::config::Config;
use tokscan::model::{
    Category, FileKind, FileReport, Priority, ScanReport, ScanTarget, Violation,
};
use tokscan::rules::{
    BorderOpacityRule, HardcodedColorRule, HardcodedSpacingRule, HardcodedTypographyRule,
    PatternRule, TouchTargetRule, TransitionDurationRule,
};
use tokscan::scanner::Scanner;

fn stylesheet(text: &str) -> ScanTarget {
    ScanTarget { path: PathBuf::from("fixture.css"), kind: FileKind::Stylesheet, text: text.into() }
}

fn markup(text: &str) -> ScanTarget {
    ScanTarget { path: PathBuf::from("fixture.tsx"), kind: FileKind::Markup, text: text.into() }
}

#[test]
fn priority_buckets_at_boundaries() {
    assert_eq!(Priority::from_count(4), Priority::Low);
    assert_eq!(Priority::from_count(5), Priority::Medium);
    assert_eq!(Priority::from_count(10), Priority::Medium);
    assert_eq!(Priority::from_count(11), Priority::High);
}

#[test]
fn spacing_suggestions_snap_to_the_grid() {
    let rule = HardcodedSpacingRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(".a { padding: 13px; }\n.b { margin: 1.5rem; }\n"))
        .unwrap();

    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].suggestion.as_deref(), Some("var(--spacing-3)"));
    assert_eq!(violations[1].suggestion.as_deref(), Some("var(--spacing-6)"));
}

#[test]
fn zero_lengths_are_not_violations() {
    let rule = HardcodedSpacingRule::new(&Config::default()).unwrap();
    let violations = rule.check(&stylesheet(".a { margin: 0px; }\n")).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn color_suggestion_is_the_nearest_palette_token() {
    let rule = HardcodedColorRule::new(&Config::default()).unwrap();

    let violations = rule.check(&stylesheet(".a { background: #0a0a0c; }\n")).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].suggestion.as_deref(), Some("var(--color-background-primary)"));
}

#[test]
fn rgb_and_hsl_literals_are_flagged() {
    let rule = HardcodedColorRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(
            ".a { color: rgb(250, 250, 250); }\n.b { color: hsl(0, 0%, 98%); }\n",
        ))
        .unwrap();

    assert_eq!(violations.len(), 2);
    for violation in &violations {
        assert_eq!(violation.suggestion.as_deref(), Some("var(--color-text-primary)"));
    }
}

#[test]
fn multi_line_declarations_are_matched_as_one_unit() {
    let rule = TransitionDurationRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(
            ".card {\n  transition:\n    opacity 250ms,\n    transform 400ms;\n}\n",
        ))
        .unwrap();

    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].suggestion.as_deref(), Some("var(--duration-200)"));
    assert_eq!(violations[1].suggestion.as_deref(), Some("var(--duration-300)"));
}

#[test]
fn approved_durations_are_not_flagged() {
    let rule = TransitionDurationRule::new(&Config::default()).unwrap();
    let violations = rule
        .check(&stylesheet(".a { transition: opacity 200ms ease; animation-duration: 0.3s; }\n"))
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn combined_font_declarations_report_once_per_block() {
    let rule = HardcodedTypographyRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(
            ".title {\n  font-size: 24px;\n  font-weight: 700;\n}\n.body {\n  font-size: 14px;\n}\n",
        ))
        .unwrap();

    assert_eq!(violations.len(), 2);
    let title = &violations[0];
    assert!(title.text.contains("font-size: 24px"));
    assert!(title.text.contains("font-weight: 700"));
    assert_eq!(title.suggestion.as_deref(), Some("var(--text-2xl), var(--font-bold)"));
    assert_eq!(violations[1].suggestion.as_deref(), Some("var(--text-sm)"));
}

#[test]
fn tokenized_font_declarations_are_ignored() {
    let rule = HardcodedTypographyRule::new(&Config::default()).unwrap();
    let violations = rule
        .check(&stylesheet(".a { font-size: var(--text-lg); font-weight: var(--font-bold); }\n"))
        .unwrap();
    assert!(violations.is_empty());
}

#[test]
fn arbitrary_utility_classes_are_flagged_in_markup() {
    let config = Config::default();
    let color = HardcodedColorRule::new(&config).unwrap();
    let spacing = HardcodedSpacingRule::new(&config).unwrap();

    let target = markup("<div className=\"bg-[#09090b] p-[13px]\">hi</div>\n");

    let color_hits = color.check(&target).unwrap();
    assert_eq!(color_hits.len(), 1);
    assert_eq!(color_hits[0].suggestion.as_deref(), Some("var(--color-background-primary)"));

    let spacing_hits = spacing.check(&target).unwrap();
    assert_eq!(spacing_hits.len(), 1);
    assert_eq!(spacing_hits[0].suggestion.as_deref(), Some("var(--spacing-3)"));
}

#[test]
fn named_palette_utilities_are_flagged_in_markup() {
    let rule = HardcodedColorRule::new(&Config::default()).unwrap();

    let violations = rule.check(&markup("<div class=\"bg-zinc-950\">hi</div>\n")).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].suggestion.as_deref(), Some("var(--color-background-primary)"));
}

#[test]
fn sized_interactive_elements_pass_the_touch_target_rule() {
    let rule = TouchTargetRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&markup(
            "<button className=\"h-11 px-4\">Ok</button>\n<button className=\"btn\">No</button>\n",
        ))
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, Category::TouchTarget);
    assert!(violations[0].text.contains("btn"));
    assert_eq!(violations[0].suggestion.as_deref(), Some("tap-target"));
}

#[test]
fn role_button_elements_need_a_touch_target_too() {
    let rule = TouchTargetRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&markup("<div role=\"button\" className=\"chip\">Tag</div>\n"))
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].category, Category::TouchTarget);
    assert!(violations[0].text.contains("chip"));
    assert_eq!(violations[0].suggestion.as_deref(), Some("tap-target"));
}

#[test]
fn sized_role_buttons_pass_and_tags_are_not_double_counted() {
    let rule = TouchTargetRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&markup(
            "<div role=\"button\" className=\"h-11\">Ok</div>\n<button role=\"button\" class=\"btn\">No</button>\n",
        ))
        .unwrap();

    // The second tag matches both as <button> and via its role; it still
    // reports exactly once.
    assert_eq!(violations.len(), 1);
    assert!(violations[0].text.contains("btn"));
}

#[test]
fn repeated_literals_in_one_declaration_each_count() {
    let rule = HardcodedSpacingRule::new(&Config::default()).unwrap();

    let violations = rule.check(&stylesheet(".a { padding: 8px 8px; }\n")).unwrap();

    assert_eq!(violations.len(), 2);
    assert_ne!(violations[0].column, violations[1].column);
    for violation in &violations {
        assert_eq!(violation.suggestion.as_deref(), Some("var(--spacing-2)"));
    }
}

#[test]
fn font_shorthand_keeps_keyword_weights() {
    let rule = HardcodedTypographyRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(".a { font: bold 24px sans-serif; }\n"))
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].suggestion.as_deref(),
        Some("var(--text-2xl), var(--font-bold)")
    );
}

#[test]
fn low_alpha_border_belongs_to_the_border_rule_only() {
    let config = Config::default();
    let color = HardcodedColorRule::new(&config).unwrap();
    let target = stylesheet(".a { border-color: rgba(255, 255, 255, 0.05); }\n");

    // The color rule leaves the low-alpha literal to the border rule, so the
    // declaration is not double counted across categories.
    assert!(color.check(&target).unwrap().is_empty());
}

#[test]
fn low_alpha_hex_borders_are_flagged() {
    let rule = BorderOpacityRule::new(&Config::default()).unwrap();

    let violations = rule
        .check(&stylesheet(
            ".a { border: 1px solid #ffffff0d; }\n.b { border-color: rgba(0, 0, 0, 0.5); }\n",
        ))
        .unwrap();

    // 0x0d / 255 is below the 0.12 minimum; the 0.5 alpha is compliant.
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].line, 1);
    assert_eq!(violations[0].suggestion.as_deref(), Some("var(--border-subtle)"));
}

#[test]
fn pathological_declarations_are_a_pattern_error() {
    let rule = HardcodedColorRule::new(&Config::default()).unwrap();
    let giant = format!(".a {{ background: {}; }}", "x".repeat(70 * 1024));

    assert!(rule.check(&stylesheet(&giant)).is_err());
}

#[test]
fn report_orders_files_by_count_then_path() {
    let violation = |category| Violation {
        line: 1,
        column: 1,
        category,
        text: "#fff".into(),
        suggestion: None,
    };

    let mut a = FileReport::new(PathBuf::from("b.css"));
    a.violations = vec![violation(Category::Color); 2];
    let mut b = FileReport::new(PathBuf::from("a.css"));
    b.violations = vec![violation(Category::Color); 2];
    let mut c = FileReport::new(PathBuf::from("c.css"));
    c.violations = vec![violation(Category::Color); 5];

    let mut report = ScanReport::new();
    report.add_file(a);
    report.add_file(b);
    report.add_file(c);
    report.sort();

    let paths: Vec<_> = report.files.iter().map(|f| f.path.display().to_string()).collect();
    assert_eq!(paths, vec!["c.css", "a.css", "b.css"]);
    assert_eq!(report.files_scanned, 3);
}

#[test]
fn scanner_skips_allow_listed_files_but_counts_them() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("styles");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("tokens.css"), "body { color: #ff0000; }\n").unwrap();
    std::fs::write(root.join("app.css"), ".a { color: #ff0000; }\n").unwrap();

    let scanner = Scanner::new(Config::default()).unwrap();
    let report = scanner.scan(&Category::ALL, &[root], false).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.files_with_issues(), 1);
    assert_eq!(report.total_violations(), 1);
    assert!(report.files[0].path.ends_with("app.css"));
}

#[test]
fn scanner_rejects_missing_roots() {
    let scanner = Scanner::new(Config::default()).unwrap();
    let result = scanner.scan(&Category::ALL, &[PathBuf::from("/no/such/dir")], false);
    assert!(result.is_err());
}
