use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

fn command() -> Command {
    Command::cargo_bin("tokscan").expect("binary exists")
}

const CARD_FIXTURE: &str = "\
.card {
  background: #09090b;
  padding: 24px;
  font-size: 24px;
  font-weight: 700;
  transition: all 250ms;
}
";

fn scan_json(temp: &assert_fs::TempDir) -> Value {
    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--format")
        .arg("json")
        .arg(temp.child("project").path());

    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("valid json report")
}

#[test]
fn card_fixture_reports_four_violations_low_priority() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();

    let report = scan_json(&temp);

    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["filesWithIssues"], 1);
    assert_eq!(report["totalViolations"], 4);
    assert_eq!(report["categories"]["hardcoded-color"], 1);
    assert_eq!(report["categories"]["hardcoded-spacing"], 1);
    assert_eq!(report["categories"]["hardcoded-typography"], 1);
    assert_eq!(report["categories"]["non-standard-transition-duration"], 1);
    assert_eq!(report["files"][0]["priority"], "low");

    let issues = report["files"][0]["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 4);
    let color = issues.iter().find(|i| i["category"] == "hardcoded-color").unwrap();
    assert_eq!(color["suggestion"], "var(--color-background-primary)");
    let spacing = issues.iter().find(|i| i["category"] == "hardcoded-spacing").unwrap();
    assert_eq!(spacing["suggestion"], "var(--spacing-6)");
}

#[test]
fn clean_fixture_reports_zero_violations() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/clean.css")
        .write_str(
            ".card {\n  background: var(--color-background-primary);\n  padding: var(--spacing-6);\n  transition: all var(--duration-200);\n}\n",
        )
        .unwrap();

    let report = scan_json(&temp);

    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["filesWithIssues"], 0);
    assert_eq!(report["totalViolations"], 0);
}

#[test]
fn token_definition_file_is_exempt() {
    let temp = assert_fs::TempDir::new().unwrap();
    // Raw values everywhere, but the allow-list covers tokens.css.
    temp.child("project/tokens.css")
        .write_str("body { color: #ff0000; padding: 13px; transition: all 250ms; }\n")
        .unwrap();

    let report = scan_json(&temp);

    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["totalViolations"], 0);
}

#[test]
fn fail_on_violations_exits_with_status_two() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--fail-on-violations")
        .arg(temp.child("project").path());

    cmd.assert().code(2).stdout(predicate::str::contains("Total violations:  4"));
}

#[test]
fn min_severity_high_filters_low_priority_files_and_gate() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--fail-on-violations")
        .arg("--min-severity")
        .arg("high")
        .arg(temp.child("project").path());

    // The only file is low priority, so nothing remains to gate on.
    cmd.assert().success().stdout(predicate::str::contains("Total violations:  0"));
}

#[test]
fn missing_root_is_a_configuration_error() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg(temp.child("does-not-exist").path());

    cmd.assert().code(1).stderr(predicate::str::contains("does not exist"));
}

#[test]
fn unknown_category_is_a_configuration_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project").create_dir_all().unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--category")
        .arg("nonsense")
        .arg(temp.child("project").path());

    cmd.assert().code(1).stderr(predicate::str::contains("Unknown category 'nonsense'"));
}

#[test]
fn category_filter_restricts_the_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--category")
        .arg("color")
        .arg("--format")
        .arg("json")
        .arg(temp.child("project").path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["totalViolations"], 1);
    assert_eq!(report["categories"]["hardcoded-color"], 1);
    assert!(report["categories"].get("hardcoded-spacing").is_none());
}

#[test]
fn one_seeded_violation_per_category() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/styles.css")
        .write_str(
            ".a { color: #123456; }\n\
             .b { margin: 13px; }\n\
             .c { font-size: 17px; }\n\
             .d { transition: opacity 275ms; }\n\
             .e { border-color: rgba(255, 255, 255, 0.05); }\n",
        )
        .unwrap();
    temp.child("project/button.tsx")
        .write_str("export const Go = () => <button className=\"btn\">Go</button>;\n")
        .unwrap();

    let report = scan_json(&temp);

    assert_eq!(report["totalViolations"], 6);
    for category in [
        "hardcoded-color",
        "hardcoded-spacing",
        "hardcoded-typography",
        "non-standard-transition-duration",
        "low-border-opacity",
        "sub-minimum-touch-target",
    ] {
        assert_eq!(report["categories"][category], 1, "category {category}");
    }
}

#[test]
fn scan_is_idempotent_over_an_unchanged_tree() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();
    temp.child("project/other.css").write_str(".x { margin: 7px; }\n").unwrap();

    let run = || {
        let mut cmd = command();
        cmd.env("HOME", temp.path())
            .env("XDG_CONFIG_HOME", temp.child("config").path())
            .arg("scan")
            .arg("--format")
            .arg("json")
            .arg(temp.child("project").path());
        cmd.assert().success().get_output().stdout.clone()
    };

    assert_eq!(run(), run());
}

#[test]
fn report_can_be_written_to_a_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();
    let out = temp.child("report.json");

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--format")
        .arg("json")
        .arg("--out")
        .arg(out.path())
        .arg(temp.child("project").path());

    cmd.assert().success();

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(report["totalViolations"], 4);
}

#[test]
fn seeded_tree_aggregates_exact_totals() {
    let temp = assert_fs::TempDir::new().unwrap();
    let project = temp.child("project");
    project.create_dir_all().unwrap();

    let mut expected_total = 0usize;
    let mut expected_files_with_issues = 0usize;

    for i in 0..48 {
        if i % 4 == 0 {
            project
                .child(format!("clean-{i:03}.css"))
                .write_str(".x { color: var(--color-text-primary); }\n")
                .unwrap();
            continue;
        }

        let seeded = (i % 3) + 1;
        let mut body = String::new();
        for j in 0..seeded {
            body.push_str(&format!(".v{j} {{ color: #1234{:02x}; }}\n", (i * 7 + j) % 256));
        }
        project.child(format!("dirty-{i:03}.css")).write_str(&body).unwrap();
        expected_total += seeded;
        expected_files_with_issues += 1;
    }

    let report = scan_json(&temp);

    assert_eq!(report["filesScanned"], 48);
    assert_eq!(report["filesWithIssues"], expected_files_with_issues);
    assert_eq!(report["totalViolations"], expected_total);
}

#[test]
fn excluded_directories_are_not_scanned() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("project/card.css").write_str(CARD_FIXTURE).unwrap();
    temp.child("project/node_modules/vendor.css").write_str(CARD_FIXTURE).unwrap();

    let report = scan_json(&temp);

    assert_eq!(report["filesScanned"], 1);
    assert_eq!(report["totalViolations"], 4);
}

#[test]
fn version_flag_works() {
    let mut cmd = command();
    cmd.arg("--version");

    cmd.assert().success();
}
