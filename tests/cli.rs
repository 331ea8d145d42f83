use std::fs;
use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use assert_cmd::Command;
use tempfile::tempdir;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn trachoma() -> Command {
    Command::cargo_bin("trachoma").unwrap()
}

fn read_matrix(path: &Path) -> Vec<Vec<f64>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
        .collect()
}

#[test]
fn exports_agent_states_for_each_village() {
    let temp_dir = tempdir().unwrap();
    trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let states = fs::read_to_string(temp_dir.path().join("587_agent_states.csv")).unwrap();
    assert_eq!(
        states,
        "5870101001,True,True,?\n\
         5870101002,False,?,False\n\
         5870102001,False,True,?\n\
         5870103001,?,False,True\n"
    );

    let states = fs::read_to_string(temp_dir.path().join("12_agent_states.csv")).unwrap();
    assert_eq!(states, "0120201001,False,False\n0120201002,True,?\n");
}

#[test]
fn config_limits_agents_and_sets_rates() {
    let temp_dir = tempdir().unwrap();
    let output = trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--config")
        .arg(data_path("config.json"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .args(["--village", "587", "--write-matrices"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).into_owned();
    assert_eq!(stdout.lines().count(), 3);

    let states = fs::read_to_string(temp_dir.path().join("587_agent_states.csv")).unwrap();
    assert_eq!(
        states,
        "5870101001,True,True,?\n5870101002,False,?,False\n5870102001,False,True,?\n"
    );
    assert!(!temp_dir.path().join("12_agent_states.csv").exists());

    let recovery = read_matrix(&temp_dir.path().join("vid_587_recovery_matrix.csv"));
    assert_eq!(
        recovery,
        vec![
            vec![0.2, 0.0, 0.0],
            vec![0.0, 0.2, 0.0],
            vec![0.0, 0.0, 0.2],
        ]
    );

    // Carrier 0 has TI and ocular discharge and shares a household with agent 1.
    let infection = read_matrix(&temp_dir.path().join("vid_587_infection_matrix.csv"));
    let expected = [
        [0.0, 0.2, 0.1],
        [3.0, 0.0, 0.1],
        [1.5, 0.1, 0.0],
    ];
    for (row, expected_row) in infection.iter().zip(expected) {
        for (value, expected_value) in row.iter().zip(expected_row) {
            assert_relative_eq!(*value, expected_value, max_relative = 1e-12);
        }
    }
}

#[test]
fn initial_state_is_reproducible() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    for dir in [&first, &second] {
        trachoma()
            .arg("--input")
            .arg(data_path("trachomadata.csv"))
            .arg("--output-dir")
            .arg(dir.path())
            .args(["--village", "587", "--initial-infected", "0.5"])
            .args(["--random-seed", "8"])
            .assert()
            .success();
    }

    let a = fs::read_to_string(first.path().join("vid_587_initial_state.csv")).unwrap();
    let b = fs::read_to_string(second.path().join("vid_587_initial_state.csv")).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lines().filter(|line| line.ends_with(",1")).count(), 2);
}

#[test]
fn unknown_village_fails() {
    let temp_dir = tempdir().unwrap();
    let output = trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .args(["--village", "99"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).into_owned();
    assert!(stderr.contains("village 99 not present in data"), "{stderr}");
}

#[test]
fn missing_input_fails() {
    let temp_dir = tempdir().unwrap();
    trachoma()
        .arg("--input")
        .arg(temp_dir.path().join("missing.csv"))
        .assert()
        .failure();
}

#[test]
fn log_level_writes_to_stderr() {
    let temp_dir = tempdir().unwrap();
    let output = trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .args(["--log-level", "info"])
        .assert()
        .success();

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).into_owned();
    assert!(stderr.contains("Loaded 11 rows into 2 villages"), "{stderr}");
}

#[test]
fn log_level_error_hides_info_messages() {
    let temp_dir = tempdir().unwrap();
    let output = trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .args(["--log-level", "error"])
        .assert()
        .success();

    let stderr = String::from_utf8_lossy(&output.get_output().stderr).into_owned();
    assert!(!stderr.contains("INFO"), "{stderr}");
}

#[test]
fn log_level_off_is_silent() {
    let temp_dir = tempdir().unwrap();
    let output = trachoma()
        .arg("--input")
        .arg(data_path("trachomadata.csv"))
        .arg("--output-dir")
        .arg(temp_dir.path())
        .args(["--log-level", "off"])
        .assert()
        .success();

    assert!(output.get_output().stderr.is_empty());
}
