use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn wrong_root_element_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("gitpolicy")?
        .arg("--policy")
        .arg(fixture("wrong_root.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse policy at"))
        .stderr(predicate::str::contains(
            "Invalid root element! Provided name: WrongElementName expected: WTMPGitConfig",
        ));

    Ok(())
}

#[test]
fn missing_policy_file_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;

    Command::cargo_bin("gitpolicy")?
        .arg("--policy")
        .arg(dir.path().join("absent.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read policy at"));

    Ok(())
}

#[test]
fn unavailable_git_fails_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let global_config = dir.path().join("gitconfig");

    Command::cargo_bin("gitpolicy")?
        .arg("--policy")
        .arg(fixture("policy.xml"))
        .arg("--git")
        .arg(dir.path().join("no-such-git"))
        .env("GIT_CONFIG_GLOBAL", &global_config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Git CLI tools unavailable"));

    assert!(!global_config.exists());
    Ok(())
}

#[test]
fn pretty_without_json_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("gitpolicy")?
        .args(["--policy", "policy.xml", "--pretty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--json"));

    Ok(())
}
