use http::Method;
use std::fs;
use tempfile::TempDir;
use waymark::{RouteTable, Router};

const YAML: &str = r#"
routes:
  - name: article
    path: /articles/<#id>(.<:format>)
    defaults: { module: articles, action: show, format: html }
    methods:
      PUT: { action: update }
  - name: home
    path: /
    defaults: { module: Home, action: index }
"#;

const TOML: &str = r#"
[[routes]]
name = "article"
path = "/articles/<#id>(.<:format>)"

[routes.defaults]
module = "articles"
action = "show"
format = "html"

[routes.methods.PUT]
action = "update"

[[routes]]
name = "home"
path = "/"
defaults = { module = "Home", action = "index" }
"#;

const JSON: &str = r#"{
  "routes": [
    {
      "name": "article",
      "path": "/articles/<#id>(.<:format>)",
      "defaults": { "module": "articles", "action": "show", "format": "html" },
      "methods": { "PUT": { "action": "update" } }
    },
    { "name": "home", "path": "/", "defaults": { "module": "Home", "action": "index" } }
  ]
}"#;

fn write(dir: &TempDir, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, content).unwrap();
    path
}

fn check_router(router: &Router) {
    let names: Vec<_> = router.routes().map(|r| r.name()).collect();
    assert_eq!(names, ["article", "home"]);

    let get = router.match_request(&Method::GET, "/articles/5.json").unwrap();
    assert_eq!(get.get("id"), Some("5"));
    assert_eq!(get.get("format"), Some("json"));
    assert_eq!(get.action(), Some("show"));

    let put = router.match_request(&Method::PUT, "/articles/5").unwrap();
    assert_eq!(put.action(), Some("update"));
    assert_eq!(put.get("format"), Some("html"));
}

#[test]
fn test_load_all_formats_agree() {
    let dir = TempDir::new().unwrap();
    let yaml = RouteTable::load(write(&dir, "routes.yaml", YAML)).unwrap();
    let yml = RouteTable::load(write(&dir, "routes.yml", YAML)).unwrap();
    let toml = RouteTable::load(write(&dir, "routes.toml", TOML)).unwrap();
    let json = RouteTable::load(write(&dir, "routes.json", JSON)).unwrap();

    assert_eq!(yaml, yml);
    assert_eq!(yaml, toml);
    assert_eq!(yaml, json);

    check_router(&Router::from_table(&yaml).unwrap());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = RouteTable::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn test_load_malformed_table() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "routes.yaml", "routes: [ { name: only-a-name } ]");
    assert!(RouteTable::load(path).is_err());
}

#[test]
fn test_invalid_template_in_table() {
    let table = RouteTable::from_json_str(
        r#"{ "routes": [ { "name": "bad", "path": "/x(/<:a>/<:b>)" } ] }"#,
    )
    .unwrap();
    assert!(Router::from_table(&table).is_err());
}

#[test]
fn test_default_table_serialises_to_yaml_and_back() {
    let table = RouteTable::default_table();
    let yaml = serde_yaml::to_string(&table).unwrap();
    assert_eq!(RouteTable::from_yaml_str(&yaml).unwrap(), table);
}
