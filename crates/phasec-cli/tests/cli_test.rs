//! Integration tests for the `phasec` binary.
//!
//! Each test runs the compiled binary against a temporary workspace, with
//! `XDG_CONFIG_HOME` pointed at an empty directory so no user config leaks in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use phasec_test_utils::base_spec_json;

fn phasec(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("phasec").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("PHASEC_DIR")
        .env_remove("PHASEC_PROVIDER")
        .env_remove("PHASEC_MODEL")
        .env("RUST_LOG", "warn");
    cmd
}

fn write_spec(dir: &Path, spec: &serde_json::Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("spec.json"), spec.to_string()).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// -----------------------------------------------------------------------
// compile
// -----------------------------------------------------------------------

#[test]
fn compile_writes_plan_skeleton() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    write_spec(&ws, &base_spec_json(7));

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compilation successful."))
        .stdout(predicate::str::contains("\"phases\""));

    let plan = read_json(&ws.join("plan.json"));
    let phases = plan["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 7);
    for (i, phase) in phases.iter().enumerate() {
        assert_eq!(phase["id"], i as u64 + 1);
        assert_eq!(phase["title"], format!("Phase {}", i + 1));
        assert_eq!(phase["deliverable"], "TBD");
        assert_eq!(phase["commit_condition"], "TBD");
        assert_eq!(phase["tasks"], serde_json::json!([]));
    }
}

#[test]
fn compile_honors_dir_env_var() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("from-env");
    write_spec(&ws, &base_spec_json(6));

    phasec(tmp.path())
        .env("PHASEC_DIR", &ws)
        .arg("compile")
        .assert()
        .success();

    assert!(ws.join("plan.json").exists());
}

#[test]
fn compile_accepts_spec_path_argument() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let elsewhere = tmp.path().join("specs");
    write_spec(&elsewhere, &base_spec_json(12));

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .arg(elsewhere.join("spec.json"))
        .assert()
        .success();

    let plan = read_json(&ws.join("plan.json"));
    assert_eq!(plan["phases"].as_array().unwrap().len(), 12);
}

#[test]
fn compile_rejects_invalid_spec() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let mut spec = base_spec_json(7);
    spec["name"] = serde_json::json!("x".repeat(51));
    write_spec(&ws, &spec);

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Spec validation failed"))
        .stderr(predicate::str::contains("name"));

    assert!(!ws.join("plan.json").exists());
}

#[test]
fn compile_rejects_unknown_enum_value() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let mut spec = base_spec_json(7);
    spec["architecture"] = serde_json::json!("monolith");
    write_spec(&ws, &spec);

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Spec validation failed"))
        .stderr(predicate::str::contains("architecture"));
}

#[test]
fn compile_missing_spec_fails() {
    let tmp = TempDir::new().unwrap();

    phasec(tmp.path())
        .arg("--dir")
        .arg(tmp.path().join("nowhere"))
        .arg("compile")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

// -----------------------------------------------------------------------
// init
// -----------------------------------------------------------------------

#[test]
fn init_writes_spec_from_answers() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let answers = [
        "TestProject",
        "A description",
        "",
        "",
        "",
        "3",
        "15",
        "9",
        "done item",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n")
        + "\n";

    let assert = phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("init")
        .write_stdin(answers)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(stdout.matches("Phases must be between 6 and 12.").count(), 2);
    assert!(stdout.contains("Project spec:"));

    let spec = read_json(&ws.join("spec.json"));
    assert_eq!(spec["name"], "TestProject");
    assert_eq!(spec["phase_count"], 9);
    assert_eq!(spec["main_user"], "Just Myself");
    assert_eq!(spec["language"], "python");
    assert_eq!(spec["done"], serde_json::json!(["done item"]));
    assert_eq!(spec["architecture"], "other");
    assert_eq!(spec["scaling_strategy"], "none");
    assert_eq!(spec["phase_duration"], "half-day");
    assert_eq!(spec["starting_point"], "nothing");
}

#[test]
fn init_then_compile() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    let answers = "Ledger\nFinance tracker\n\n\n\n6\nshipped\n\n\n\n\n\n\n\n\n\n";

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("init")
        .write_stdin(answers)
        .assert()
        .success();

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .assert()
        .success();

    let plan = read_json(&ws.join("plan.json"));
    assert_eq!(plan["phases"].as_array().unwrap().len(), 6);
}

// -----------------------------------------------------------------------
// fill
// -----------------------------------------------------------------------

#[test]
fn fill_without_api_key_fails_before_touching_plan() {
    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    write_spec(&ws, &base_spec_json(6));

    phasec(tmp.path())
        .arg("--dir")
        .arg(&ws)
        .arg("compile")
        .assert()
        .success();
    let before = std::fs::read_to_string(ws.join("plan.json")).unwrap();

    phasec(tmp.path())
        .env_remove("OPENAI_API_KEY")
        .arg("--dir")
        .arg(&ws)
        .args(["fill", "--provider", "openai"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    let after = std::fs::read_to_string(ws.join("plan.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn fill_rejects_unknown_provider() {
    let tmp = TempDir::new().unwrap();

    phasec(tmp.path())
        .args(["fill", "--provider", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gemini"));
}

// -----------------------------------------------------------------------
// config
// -----------------------------------------------------------------------

#[test]
fn config_init_then_show() {
    let tmp = TempDir::new().unwrap();

    phasec(tmp.path())
        .args(["config", "init", "--provider", "openai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config written to"));

    let written = tmp.path().join("config").join("phasec").join("config.toml");
    assert!(written.exists());

    phasec(tmp.path())
        .args(["config", "init"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    phasec(tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("generator.provider = openai"))
        .stdout(predicate::str::contains("generator.model = gpt-4o-mini"))
        .stdout(predicate::str::contains("workspace.dir = phasecompiler"));
}

#[test]
fn config_show_applies_flag_over_env() {
    let tmp = TempDir::new().unwrap();

    phasec(tmp.path())
        .env("PHASEC_DIR", "from-env")
        .args(["--dir", "from-flag", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not found)"))
        .stdout(predicate::str::contains("workspace.dir = from-flag"));
}
