use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// Fast config: 1 kHz ticks, no throttling delays, no calibration pulses.
const FAST: &str = r#"
[mapping]
min_dist = 30.0
max_dist = 180.0

[control]
step_size = 2
post_action_delay_ms = 0

[calibration]
target = "none"
initial_volume = 0
pulse_pause_ms = 0

[runner]
frame_rate_hz = 1000

[actuator]
kind = "simulated"
initial_volume = 0
"#;

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

// Ten frames with the fingers fully apart (distance 180).
fn write_open_trace(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("trace.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "x1,y1,x2,y2").unwrap();
    for _ in 0..10 {
        writeln!(f, "100,100,280,100").unwrap();
    }
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "ok", "stdout")]
#[case(&["run", "--max-ticks", "5"], 0, "stopped (tick_limit)", "stdout")]
#[case(&["run", "--max-ticks", "many"], 2, "invalid value", "stderr")]
#[case(&["dose"], 2, "unrecognized subcommand", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();

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
fn trace_replay_runs_to_the_end() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST);
    let trace = write_open_trace(&dir);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--trace")
        .arg(&trace)
        .arg("run")
        .arg("--no-calibrate");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "stopped (source_exhausted): volume 20 % after 10 ticks",
        ))
        .stdout(predicate::str::contains("simulated host: volume 20 %"));
}

#[rstest]
fn stats_and_bar_go_to_stderr() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST);
    let trace = write_open_trace(&dir);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--trace")
        .arg(&trace)
        .arg("run")
        .arg("--bar")
        .arg("--stats");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("--- Slider Stats ---"))
        .stderr(predicate::str::contains("Pulses up/down: 10 / 0"))
        .stderr(predicate::str::contains("[####----------------]  20 %"));
}

#[rstest]
fn calibrate_reports_pulses_and_volume() {
    let dir = tempdir().unwrap();
    let toml = FAST.replace("target = \"none\"", "target = \"force_max\"");
    let cfg = write_config(&dir, &toml);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("calibrate");

    cmd.assert().success().stdout(predicate::str::contains(
        "calibrated: 55 pulses, believed volume 100 %",
    ));
}

#[rstest]
#[case("step_size = 2", "step_size = 0", "control.step_size")]
#[case("max_dist = 180.0", "max_dist = 30.0", "mapping.min_dist must differ")]
#[case("frame_rate_hz = 1000", "frame_rate_hz = 0", "runner.frame_rate_hz")]
fn invalid_config_exits_with_5(#[case] from: &str, #[case] to: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &FAST.replace(from, to));

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");

    cmd.assert()
        .code(5)
        .stderr(predicate::str::contains("Configuration is invalid"))
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn missing_mapping_section_is_a_config_error() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[control]\nstep_size = 2\n");

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");

    cmd.assert()
        .code(5)
        .stderr(predicate::str::contains("not valid TOML for this program"));
}

#[rstest]
fn cli_reports_bad_trace_header() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST);

    let bad_csv = dir.path().join("trace.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "ax,ay,bx,by").unwrap();
    writeln!(f, "0,0,10,10").unwrap();

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--trace")
        .arg(&bad_csv)
        .arg("self-check");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn frame_failure_exits_with_3() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, FAST);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.env("SLIDER_TEST_GRAB_FAIL_AT", "3")
        .arg("--config")
        .arg(&cfg)
        .arg("run");

    cmd.assert().code(3).stderr(predicate::str::contains(
        "What happened: Could not acquire a frame",
    ));
}

#[cfg(unix)]
#[rstest]
fn failing_volume_command_exits_with_4() {
    let dir = tempdir().unwrap();
    let toml = FAST.replace(
        "kind = \"simulated\"",
        "kind = \"command\"\nup_cmd = [\"false\"]\ndown_cmd = [\"false\"]",
    );
    let cfg = write_config(&dir, &toml);
    let trace = write_open_trace(&dir);

    let mut cmd = Command::cargo_bin("slider_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("--trace")
        .arg(&trace)
        .arg("run");

    cmd.assert()
        .code(4)
        .stderr(predicate::str::contains("Sending a volume key failed"));
}
