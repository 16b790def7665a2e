use std::process::Command;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/world.json");

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "encumbrance-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_settings_writes_output() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-settings", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Registered settings"));
    assert!(content.contains("maximumThresholdImperial"));
}

#[test]
fn cli_json_report_covers_both_paths() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let output = Command::new(exe)
        .args(["--world", FIXTURE, "--report", "json", "--units", "metric"])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    let rows = report["rows"].as_array().expect("rows");
    let hero_update = rows
        .iter()
        .find(|row| row["path"] == "update" && row["actor_id"] == "hero")
        .expect("hero update row");
    assert_eq!(hero_update["value"], "13.0");
    assert_eq!(
        hero_update["statuses"],
        serde_json::json!(["heavilyEncumbered", "encumbered"])
    );
    assert_eq!(report["thresholds"]["units"], "metric");
    assert_eq!(report["thresholds"]["encumbered"], 2.27);
}

#[test]
fn cli_markdown_report_with_overrides() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let output_path = temp_path("markdown");
    let status = Command::new(exe)
        .args([
            "--world",
            FIXTURE,
            "--report",
            "markdown",
            "--path",
            "update",
            "--count-unequipped",
            "true",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Encumbrance Report"));
    assert!(content.contains("| update | Goliath | 125.0 |"));
    assert!(!content.contains("| derived |"));
}

#[test]
fn cli_console_report_shows_reload_notice() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let output = Command::new(exe)
        .args([
            "--world",
            FIXTURE,
            "--changed-setting",
            "custom-variant-encumbrance.encumberedThresholdImperial",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Encumbrance Summary"));
    assert!(stdout.contains("require a reload"));
}

#[test]
fn cli_rejects_missing_world_file() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let missing = temp_path("missing-world");
    let output = Command::new(exe)
        .arg("--world")
        .arg(&missing)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn cli_rejects_negative_threshold_override() {
    let exe = env!("CARGO_BIN_EXE_encumbrance-report");
    let output = Command::new(exe)
        .args(["--world", FIXTURE, "--report", "json", "--encumbered=-2"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid encumbrance settings"));
}
