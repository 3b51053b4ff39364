use assert_cmd::Command;
use git_autoupdate::test_utils::UpdateFixture;
use predicates::prelude::*;
use std::path::PathBuf;

/// Run the binary against the fixture installation with a settings file
/// pointing at the fixture upstream.
fn autoupdate(fixture: &UpdateFixture) -> Command {
    let settings = settings_file(fixture, "enabled = true\n");
    let mut cmd = Command::cargo_bin("git-autoupdate").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--install-path")
        .arg(fixture.install_path())
        .arg("--config")
        .arg(settings);
    cmd
}

fn settings_file(fixture: &UpdateFixture, extra: &str) -> PathBuf {
    let path = fixture.root().join("settings.toml");
    let url = fixture.config().upstream_url;
    std::fs::write(&path, format!("upstream_url = \"{url}\"\n{extra}")).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("git-autoupdate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("pull"));
}

#[test]
fn test_cli_info_json() {
    let fixture = UpdateFixture::new().unwrap();
    let head = fixture.install.rev_parse_head().unwrap();

    let output = autoupdate(&fixture).args(["info", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["currentVersion"], head.as_str());
    assert_eq!(json["result"]["currentBranch"], "main");
}

#[test]
fn test_cli_check_json_reports_update() {
    let fixture = UpdateFixture::new().unwrap();
    let tip = fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    let output = autoupdate(&fixture).args(["check", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["result"]["updateAvailable"], true);
    assert_eq!(json["result"]["remoteVersion"], tip.as_str());
    assert!(json["result"].get("error").is_none());
}

#[test]
fn test_cli_check_human_output() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    autoupdate(&fixture)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Update available"));
}

#[test]
fn test_cli_pull_applies_update() {
    let fixture = UpdateFixture::new().unwrap();
    let tip = fixture.publish("CHANGELOG.md", "v2\n", "Release v2").unwrap();

    autoupdate(&fixture)
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated from"));
    assert_eq!(fixture.install.rev_parse_head().unwrap(), tip);

    autoupdate(&fixture)
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date"));
}

#[test]
fn test_cli_pull_dirty_tree_fails_with_envelope() {
    let fixture = UpdateFixture::new().unwrap();
    fixture.install.write_file("README.md", "# local edit\n").unwrap();

    let output = autoupdate(&fixture).args(["pull", "--json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["errorKind"], "LocalChangesPresent");
    assert_eq!(json["status"], 409);
    assert!(json.get("result").is_none());
}

#[test]
fn test_cli_invalid_url_is_rejected() {
    let fixture = UpdateFixture::new().unwrap();
    let settings = fixture.root().join("bad.toml");
    std::fs::write(&settings, "upstream_url = \"https://evil.com/x; rm -rf /\"\n").unwrap();

    let output = Command::cargo_bin("git-autoupdate")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--install-path")
        .arg(fixture.install_path())
        .arg("--config")
        .arg(&settings)
        .args(["check", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["errorKind"], "InvalidUrl");
    assert_eq!(json["status"], 400);
}

#[test]
fn test_cli_not_a_repository() {
    let fixture = UpdateFixture::new().unwrap();
    let settings = settings_file(&fixture, "");
    let plain = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("git-autoupdate")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--install-path")
        .arg(plain.path())
        .arg("--config")
        .arg(settings)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn test_cli_config_set_and_show() {
    let temp = tempfile::TempDir::new().unwrap();
    let settings = temp.path().join("config.toml");

    Command::cargo_bin("git-autoupdate")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&settings)
        .args(["config", "set", "--interval", "90", "--enabled", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clamped to 60"));

    Command::cargo_bin("git-autoupdate")
        .unwrap()
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&settings)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("60 min"))
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_cli_config_path() {
    let temp = tempfile::TempDir::new().unwrap();
    let settings = temp.path().join("custom.toml");

    Command::cargo_bin("git-autoupdate")
        .unwrap()
        .arg("--config")
        .arg(&settings)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
