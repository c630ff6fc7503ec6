use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Minimal valid TOML config matching the built-in defaults
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[controller]
kp = 1.0
ki = 0.1
imax = 10.0
istartup = 0.0
ilimit = 100.0
acting = "reverse"

[[presets]]
name = "Lab Oven"
kp = 3.0
ki = 0.4
ilimit = 80.0
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn write_log(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

const TEMPLATE_LOG: &str = "Time,Feedback,Setpoint
8/10/2025 14:20,22.0,24.0
8/10/2025 14:21,22.1,24.0
8/10/2025 14:22,22.3,24.0
";

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["step", "--fb", "22", "--sp", "24"], 0, "output=47.9967", "stdout")]
#[case(&["step", "--fb", "22", "--sp", "24", "--acting", "direct"], 0, "output=52.0033", "stdout")]
#[case(&["step", "--fb", "22", "--sp", "24", "--ki", "0", "--istartup", "5"], 0, "i=5.0000 output=53.0000", "stdout")]
#[case(&["step", "--fb", "22", "--sp", "24", "--ticks", "3"], 0, "tick=3", "stdout")]
#[case(&["step", "--fb", "22"], 2, "required", "stderr")]
#[case(&["step", "--fb", "22", "--sp", "24", "--ilimit", "-1"], 3, "ilimit must be >= 0", "stderr")]
#[case(&["step", "--fb", "22", "--sp", "24", "--integral", "NaN"], 3, "integral must be finite", "stderr")]
#[case(&["step", "--fb", "22", "--sp", "24", "--integral", "3"], 0, "i=2.9967", "stdout")]
#[case(&["step", "--fb", "22", "--sp", "24", "--preset", "nope"], 4, "pitune presets", "stderr")]
#[case(&["presets"], 0, "Duct Static Pressure", "stdout")]
#[case(&["presets"], 0, "Lab Oven", "stdout")]
#[case(&["template"], 0, "Time,Feedback,Setpoint", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("pitune").unwrap();

    // Always include a valid config to avoid relying on default path
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn suggest_reports_gains_for_template_log() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let log = write_log(&dir, "log.csv", TEMPLATE_LOG);

    Command::cargo_bin("pitune")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("suggest")
        .arg("--log")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Samples: 3"))
        .stdout(predicate::str::contains("Suggested Kp: 1\n"))
        .stdout(predicate::str::contains("Suggested Ki: 0.1\n"))
        .stdout(predicate::str::contains("Moderate error"));
}

#[rstest]
fn suggest_writes_replay_csv() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let log = write_log(&dir, "log.csv", TEMPLATE_LOG);
    let replay = dir.path().join("replay.csv");

    Command::cargo_bin("pitune")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("suggest")
        .arg("--log")
        .arg(&log)
        .arg("--replay-out")
        .arg(&replay)
        .assert()
        .success();

    let text = fs::read_to_string(&replay).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Time,Feedback,Setpoint,Simulated,ControllerOutput");
    assert_eq!(lines.len(), 4);
    // First simulated value starts at the first logged feedback
    assert!(lines[1].starts_with("2025-08-10 14:20:00,22,24,22,"), "{}", lines[1]);
}

#[rstest]
#[case("Time,Feedback\n8/10/2025 14:20,22.0\n8/10/2025 14:21,22.1\n", "missing columns")]
#[case("Time,Feedback,Setpoint\n8/10/2025 14:20,22.0,24.0\n", "Not enough data")]
#[case("Time,Feedback,Setpoint\nyesterday,22.0,24.0\n8/10/2025 14:21,22.1,24.0\n", "timestamp")]
#[case("Time,Feedback,Setpoint\n8/10/2025 14:20,warm,24.0\n8/10/2025 14:21,22.1,24.0\n", "not a number")]
fn suggest_rejects_bad_logs(#[case] body: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let log = write_log(&dir, "bad.csv", body);

    Command::cargo_bin("pitune")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("suggest")
        .arg("--log")
        .arg(&log)
        .assert()
        .code(3)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn session_carries_integral_across_lines() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = assert_cmd::Command::cargo_bin("pitune")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("session")
        .write_stdin("# warm-up\n22 24\n22 24\nreset\n22,24\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4, "{text}");
    assert!(lines[0].contains("i=-0.0033"), "{}", lines[0]);
    assert!(lines[1].contains("i=-0.0067"), "{}", lines[1]);
    assert_eq!(lines[2], "reset integral=0.0000");
    assert!(lines[3].starts_with("tick=1 "), "{}", lines[3]);
}

#[rstest]
fn session_rejects_bad_setting_with_exit_3() {
    assert_cmd::Command::cargo_bin("pitune")
        .unwrap()
        .arg("session")
        .write_stdin("set ilimit -5\n22 24\n")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("line 1:"))
        .stdout(predicate::str::contains("tick=1"));
}

#[rstest]
#[case("[controller]\nkp = \"fast\"\n", "Invalid configuration")]
#[case("[controller]\nimax = -1.0\n", "controller.imax must be >= 0")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
fn bad_config_exits_4(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, toml).unwrap();

    Command::cargo_bin("pitune")
        .unwrap()
        .arg("--config")
        .arg(&path)
        .arg("presets")
        .assert()
        .code(4)
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn template_writes_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("starter.csv");

    Command::cargo_bin("pitune")
        .unwrap()
        .arg("template")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Time,Feedback,Setpoint\n"));
    assert_eq!(text.lines().count(), 4);
}
