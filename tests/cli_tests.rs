use serde_json::Value;
use std::fs;
use std::process::{Command, Output};

fn waymark(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waymark"))
        .args(args)
        .env_remove("WAYMARK_ROUTES")
        .env_remove("WAYMARK_STRICT_METHODS")
        .env_remove("RUST_LOG")
        .output()
        .expect("run waymark")
}

#[test]
fn test_cli_match_default_table() {
    let output = waymark(&["match", "GET", "/users/42"]);
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["route"], "module-item");
    assert_eq!(body["params"]["module"], "users");
    assert_eq!(body["params"]["action"], "view");
    assert_eq!(body["params"]["format"], "html");
}

#[test]
fn test_cli_match_not_found_fails() {
    let output = waymark(&["match", "GET", "/a/b/c/d"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no route matched GET /a/b/c/d"));
}

#[test]
fn test_cli_url() {
    let output = waymark(&["url", "module-action-item", "module=users", "action=edit", "item=7"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "/users/edit/7");

    let missing = waymark(&["url", "module-item", "module=users"]);
    assert!(!missing.status.success());
}

#[test]
fn test_cli_routes_from_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("routes.toml");
    fs::write(
        &table,
        "[[routes]]\nname = \"about\"\npath = \"/about\"\n\n[[routes]]\nname = \"page\"\npath = \"/<:slug>\"\n",
    )
    .unwrap();

    let output = waymark(&["routes", "--table", table.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let names: Vec<_> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(names, ["about", "page"]);
}

#[test]
fn test_cli_strict_methods() {
    let output = Command::new(env!("CARGO_BIN_EXE_waymark"))
        .args(["match", "PATCH", "/users/42"])
        .env_remove("WAYMARK_ROUTES")
        .env("WAYMARK_STRICT_METHODS", "true")
        .output()
        .expect("run waymark");
    assert!(!output.status.success());

    let lenient = waymark(&["match", "PATCH", "/users/42"]);
    assert!(lenient.status.success());
}
