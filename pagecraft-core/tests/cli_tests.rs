use std::path::PathBuf;
use std::process::Command;

fn get_fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(relative)
}

fn pagecraft() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pagecraft"));
    for var in [
        "PAGECRAFT_API_URL",
        "PAGECRAFT_PAGES_DIR",
        "PAGECRAFT_SOCIAL_URL",
        "PAGECRAFT_CACHE_TTL_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("PAGECRAFT_LOG", "off");
    cmd
}

#[test]
fn test_render_page_document() {
    let output = pagecraft()
        .arg("render")
        .arg(get_fixture_path("pages/about.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>About us</title>"));
    assert!(html.contains("We build tools."));
}

#[test]
fn test_render_fragment_with_title_override() {
    let output = pagecraft()
        .arg("render")
        .arg(get_fixture_path("trees/plain.json"))
        .arg("--fragment")
        .output()
        .unwrap();
    assert!(output.status.success());
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Maintenance tonight"));

    let output = pagecraft()
        .arg("render")
        .arg(get_fixture_path("trees/plain.json"))
        .args(["--title", "Status"])
        .output()
        .unwrap();
    let html = String::from_utf8(output.stdout).unwrap();
    assert!(html.contains("<title>Status</title>"));
}

#[test]
fn test_check_reports_valid_and_cyclic_files() {
    let output = pagecraft()
        .arg("check")
        .arg(get_fixture_path("pages/welcome.json"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("✓"));

    let output = pagecraft()
        .arg("check")
        .arg(get_fixture_path("pages/welcome.json"))
        .arg(get_fixture_path("trees/cyclic.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("✗"));
    assert!(stderr.contains("ancestor"));
}

#[test]
fn test_check_missing_file_fails() {
    let output = pagecraft()
        .arg("check")
        .arg(get_fixture_path("trees/does-not-exist.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_fetch_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pagecraft.yaml");
    std::fs::write(
        &config,
        format!(
            "store:\n  kind: directory\n  directory: {}\n",
            get_fixture_path("pages").display()
        ),
    )
    .unwrap();

    let output = pagecraft()
        .args(["fetch", "--slug", "welcome", "--workspace", "ws-demo", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Welcome aboard"));

    let output = pagecraft()
        .args(["fetch", "--page-id", "missing", "--workspace", "ws-demo", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_fetch_unreachable_api_is_unavailable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let output = pagecraft()
        .args(["fetch", "--page-id", "p1", "--workspace", "w1"])
        .env("PAGECRAFT_API_URL", format!("http://127.0.0.1:{}", port))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
