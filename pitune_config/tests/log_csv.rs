use std::fs::File;
use std::io::Write;

use pitune_config::{LogFormat, load_log_csv, log_template_csv, read_log_csv};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn reads_template_rows() {
    let csv = log_template_csv().unwrap();
    let rows = read_log_csv(csv.as_bytes(), &LogFormat::default()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].line, 2);
    assert_eq!(rows[0].feedback, 22.0);
    assert_eq!(rows[2].feedback, 22.3);
    assert_eq!(rows[1].setpoint, 24.0);
    assert_eq!(rows[1].time.to_string(), "2025-08-10 14:21:00");
}

#[rstest]
fn column_order_and_extra_columns_do_not_matter() {
    let data = "Setpoint, Note ,Feedback,Time\n24.0,warmup,22.0,8/10/2025 14:20\n24.0,,22.5,8/10/2025 14:21\n";
    let rows = read_log_csv(data.as_bytes(), &LogFormat::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].feedback, 22.5);
    assert_eq!(rows[1].setpoint, 24.0);
}

#[rstest]
#[case("Time,Feedback\n8/10/2025 14:20,22.0\n", "Setpoint")]
#[case("time,feedback,setpoint\n8/10/2025 14:20,22.0,24.0\n", "Time, Feedback, Setpoint")]
fn missing_columns_are_named(#[case] data: &str, #[case] needle: &str) {
    let err = read_log_csv(data.as_bytes(), &LogFormat::default()).expect_err("should fail");
    let msg = format!("{err}");
    assert!(msg.contains("missing required columns"), "got: {msg}");
    assert!(msg.contains(needle), "got: {msg}");
}

#[rstest]
#[case("Time,Feedback,Setpoint\nnot a time,22.0,24.0\n", "unparseable timestamp")]
#[case("Time,Feedback,Setpoint\n8/10/2025 14:20,warm,24.0\n", "Feedback 'warm' is not a number")]
#[case("Time,Feedback,Setpoint\n8/10/2025 14:20,22.0,24.0\n8/10/2025 14:21,22.1,\n", "invalid CSV row 3")]
fn bad_rows_report_their_line(#[case] data: &str, #[case] needle: &str) {
    let err = read_log_csv(data.as_bytes(), &LogFormat::default()).expect_err("should fail");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[rstest]
fn custom_time_format_is_used() {
    let fmt = LogFormat {
        time_formats: vec!["%d.%m.%Y %H:%M".to_string()],
    };
    let data = "Time,Feedback,Setpoint\n10.08.2025 14:20,22.0,24.0\n";
    let rows = read_log_csv(data.as_bytes(), &fmt).unwrap();
    assert_eq!(rows[0].time.to_string(), "2025-08-10 14:20:00");
}

#[rstest]
fn loads_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "Time,Feedback,Setpoint").unwrap();
    writeln!(f, "2025-08-10 14:20:00,22.0,24.0").unwrap();
    writeln!(f, "2025-08-10 14:20:01,22.1,24.0").unwrap();
    drop(f);

    let rows = load_log_csv(&path, &LogFormat::default()).unwrap();
    assert_eq!(rows.len(), 2);
}

#[rstest]
fn missing_file_errors() {
    let dir = tempdir().unwrap();
    let err = load_log_csv(&dir.path().join("nope.csv"), &LogFormat::default())
        .expect_err("should fail to open");
    assert!(format!("{err}").contains("open log CSV"));
}
