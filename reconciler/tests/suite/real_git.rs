use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs the binary against an isolated global config and returns its JSON report.
fn reconcile(home: &Path, global_config: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let output = Command::cargo_bin("gitpolicy")?
        .arg("--policy")
        .arg(fixture("policy.xml"))
        .arg("--json")
        .env("HOME", home)
        .env("GIT_CONFIG_GLOBAL", global_config)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("RUST_LOG", "warn")
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn get(global_config: &Path, key: &str) -> Result<String, Box<dyn std::error::Error>> {
    let output = std::process::Command::new("git")
        .arg("config")
        .arg("--file")
        .arg(global_config)
        .arg("--get")
        .arg(key)
        .output()?;
    Ok(String::from_utf8(output.stdout)?.trim_end().to_string())
}

#[test]
fn configures_fresh_global_config_once() -> Result<(), Box<dyn std::error::Error>> {
    if !git_available() {
        eprintln!("git not found on PATH, skipping");
        return Ok(());
    }
    let home = TempDir::new()?;
    let global_config = home.path().join("gitconfig");

    let first = reconcile(home.path(), &global_config)?;

    assert_eq!(
        first,
        json!({
            "bootstrapped": true,
            "sslBackendSkipped": false,
            "applied": [
                "wtmp.ignoreSChannel",
                "http.sslBackend",
                "credential.https://www.example.com.gitLabDevClientId",
                "credential.https://www.example.com.gitLabDevClientSecret",
                "credential.https://www.example.com.provider",
                "credential.https://www.example.com.gitLabAuthModes",
            ],
            "failed": [],
            "skippedHosts": [],
        })
    );
    assert_eq!(get(&global_config, "http.sslBackend")?, "schannel");
    assert_eq!(get(&global_config, "wtmp.ignoreSChannel")?, "false");
    assert_eq!(
        get(
            &global_config,
            "credential.https://www.example.com.gitLabDevClientSecret"
        )?,
        "TestApplicationSecret"
    );

    let second = reconcile(home.path(), &global_config)?;

    assert_eq!(
        second,
        json!({
            "bootstrapped": false,
            "sslBackendSkipped": false,
            "applied": [],
            "failed": [],
            "skippedHosts": [],
        })
    );
    Ok(())
}

#[test]
fn respects_operator_opt_outs() -> Result<(), Box<dyn std::error::Error>> {
    if !git_available() {
        eprintln!("git not found on PATH, skipping");
        return Ok(());
    }
    let home = TempDir::new()?;
    let global_config = home.path().join("gitconfig");
    std::fs::write(
        &global_config,
        "[http]\n\tsslBackend = openssl\n[wtmp]\n\tignoreSChannel = true\n[wtmp \"https://www.example.com\"]\n\tignore = true\n",
    )?;

    let report = reconcile(home.path(), &global_config)?;

    assert_eq!(
        report,
        json!({
            "bootstrapped": false,
            "sslBackendSkipped": true,
            "applied": [],
            "failed": [],
            "skippedHosts": ["https://www.example.com"],
        })
    );
    assert_eq!(get(&global_config, "http.sslBackend")?, "openssl");
    Ok(())
}
