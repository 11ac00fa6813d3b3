//! Basic CLI E2E tests.
//!
//! Tests run the built binary with HOME pointed at a scratch directory so
//! the settings file never touches the real one.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_runmate"))
        .args(args)
        .env("HOME", home.path())
        .env("RUNMATE_ENV", "dev")
        .env_remove("RUNMATE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("Failed to parse JSON line"))
        .collect()
}

#[test]
fn test_simulate_prints_phase_sequence() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        &home,
        &[
            "simulate", "--warm-up", "0", "--high", "100", "--low", "80", "--intervals", "2",
            "--tick-ms", "1000",
        ],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let events = json_lines(&stdout);
    let kinds: Vec<(&str, Option<&str>)> = events
        .iter()
        .map(|e| (e["type"].as_str().unwrap(), e["phase"].as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("workout_started", Some("high_intensity")),
            ("phase_started", Some("low_intensity")),
            ("phase_started", Some("high_intensity")),
            ("phase_started", Some("low_intensity")),
            ("workout_completed", None),
        ]
    );
    assert_eq!(events[0]["total_ms"], 360_000);
    assert_eq!(events[2]["interval"], 2);
}

#[test]
fn test_simulate_status_feed_ends_complete() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(
        &home,
        &[
            "simulate", "--warm-up", "5", "--high", "10", "--low", "10", "--intervals", "1",
            "--tick-ms", "500", "--status",
        ],
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let statuses: Vec<serde_json::Value> = json_lines(&stdout)
        .into_iter()
        .filter(|v| v.get("type").is_none())
        .collect();
    assert!(!statuses.is_empty());
    let last = statuses.last().unwrap();
    assert_eq!(last["is_complete"], true);
    assert_eq!(last["is_cancelled"], false);
    assert_eq!(last["progress"], 1.0);
}

#[test]
fn test_simulate_rejects_zero_duration() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["simulate", "--high", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid duration"), "stderr: {stderr}");
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&home, &["config", "set", "workout.intervals", "4"]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    assert!(stdout.contains("ok"));

    let (stdout, _, code) = run_cli(&home, &["config", "get", "workout.intervals"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&home, &["config", "set", "workout.tempo", "4"]);
    assert_ne!(code, 0);
}

#[test]
fn test_plan_json_uses_settings() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&home, &["plan", "--json"]);
    assert_eq!(code, 0, "plan failed: {stderr}");

    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan["warm_up_ms"], 30_000);
    assert_eq!(plan["intervals"], 10);
    assert_eq!(plan["total_ms"], 30_000 + 10 * 180_000);
    assert_eq!(plan["run_minutes"], 30);
}

#[test]
fn test_run_pause_resume_cancel_with_status_file() {
    use std::io::Write;
    use std::process::Stdio;

    let home = TempDir::new().unwrap();
    let status_path = home.path().join("status.json");
    let mut child = Command::new(env!("CARGO_BIN_EXE_runmate"))
        .args([
            "run", "--warm-up", "0", "--high", "100", "--low", "80", "--intervals", "2",
            "--speed", "100", "--no-countdown", "--json", "--status-file",
        ])
        .arg(&status_path)
        .env("HOME", home.path())
        .env("RUNMATE_ENV", "dev")
        .env_remove("RUNMATE_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn run");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"p\nr\nq\ny\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "run failed: {stderr}");
    assert!(stderr.contains("Cancel the run? (y/n)"), "stderr: {stderr}");

    let events = json_lines(&String::from_utf8_lossy(&output.stdout));
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .filter(|kind| *kind != "phase_started")
        .collect();
    assert_eq!(
        kinds,
        vec![
            "workout_started",
            "workout_paused",
            "workout_resumed",
            "workout_paused",
            "workout_cancelled",
        ]
    );

    // Timestamps run at --speed, so the end estimate is total_ms of workout
    // time after the start.
    let started = &events[0];
    let at: chrono::DateTime<chrono::Utc> = started["at"].as_str().unwrap().parse().unwrap();
    let end: chrono::DateTime<chrono::Utc> =
        started["end_time_estimate"].as_str().unwrap().parse().unwrap();
    assert_eq!((end - at).num_milliseconds(), 360_000);

    let status: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&status_path).unwrap()).unwrap();
    assert_eq!(status["is_cancelled"], true);
    assert_eq!(status["is_complete"], false);
    assert_eq!(status["end_time_estimate"], serde_json::Value::Null);
}

#[test]
fn test_simulate_rejects_corrupt_settings() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("runmate-dev");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[workout\nintervals = ").unwrap();

    for cmd in ["simulate", "plan"] {
        let (stdout, stderr, code) = run_cli(&home, &[cmd]);
        assert_ne!(code, 0, "{cmd} accepted a corrupt settings file");
        assert!(stdout.is_empty(), "{cmd} stdout: {stdout}");
        assert!(
            stderr.contains("Failed to load configuration"),
            "{cmd} stderr: {stderr}"
        );
    }
}
