//! Repository scanning tests
//!
//! Run the scanner over the bundled sample service and over throwaway trees.

use orphanscan::config::Config;
use orphanscan::parser::{Framework, HttpMethod};
use orphanscan::scan::RepositoryScanner;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the path to the sample service fixture
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_service")
}

fn config_excluding(dirs: &[&str]) -> Config {
    Config {
        exclude: dirs.iter().map(|d| d.to_string()).collect(),
        ..Config::default()
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap()
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// Sample service
// ============================================================================

#[test]
fn test_sample_service_endpoints() {
    let root = fixture_path();
    let result = RepositoryScanner::new(&config_excluding(&["node_modules"])).scan(&root);

    assert_eq!(result.files_scanned, 4);
    assert_eq!(result.files_skipped, 0);

    let endpoints: Vec<_> = result
        .endpoints
        .iter()
        .map(|e| (relative(&e.file, &root), e.method, e.route.as_str()))
        .collect();

    assert_eq!(
        endpoints,
        vec![
            ("api/OrderController.java".to_string(), HttpMethod::Get, "/orders/{id}"),
            ("api/app.py".to_string(), HttpMethod::Get, "/health"),
            ("api/app.py".to_string(), HttpMethod::Post, "/orders"),
            ("src/routes/users.js".to_string(), HttpMethod::Get, "/users"),
            ("src/routes/users.js".to_string(), HttpMethod::Get, "/users/:id"),
            ("src/routes/users.js".to_string(), HttpMethod::Delete, "/users/:id"),
            ("src/routes/users.js".to_string(), HttpMethod::Post, "/users"),
        ]
    );

    let inline = result.endpoints.last().unwrap();
    assert_eq!(inline.handler_name, None);
    assert_eq!(inline.framework_hint, Framework::Express);
    assert_eq!(result.endpoints[0].framework_hint, Framework::Spring);
    assert_eq!(result.endpoints[1].framework_hint, Framework::Flask);
}

#[test]
fn test_sample_service_functions() {
    let root = fixture_path();
    let result = RepositoryScanner::new(&config_excluding(&["node_modules"])).scan(&root);

    let functions: Vec<_> = result
        .functions
        .iter()
        .map(|f| (f.function_name.as_str(), f.is_exported, f.references.len()))
        .collect();

    assert_eq!(
        functions,
        vec![
            ("formatName", true, 0),
            ("padLeft", false, 0),
            ("unusedHelper", false, 0),
            ("shout", true, 0),
            ("listUsers", false, 1),
            ("getUser", false, 1),
        ]
    );
}

#[test]
fn test_excluded_directories_are_skipped() {
    let root = fixture_path();

    let with_vendor = RepositoryScanner::new(&Config::default()).scan(&root);
    let without_vendor = RepositoryScanner::new(&config_excluding(&["node_modules"])).scan(&root);

    assert_eq!(with_vendor.files_scanned, without_vendor.files_scanned + 1);
    assert!(with_vendor.endpoints.iter().any(|e| e.route == "/vendored"));
    assert!(!without_vendor.endpoints.iter().any(|e| e.route == "/vendored"));
}

#[test]
fn test_hidden_directories_and_non_source_files_are_skipped() {
    let result = RepositoryScanner::new(&Config::default()).scan(&fixture_path());

    assert!(!result.endpoints.iter().any(|e| e.route == "/cached"));
    assert!(!result.endpoints.iter().any(|e| e.route == "/documented"));
}

// ============================================================================
// Throwaway trees
// ============================================================================

#[test]
fn test_unreadable_file_does_not_abort_scan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("good.js"), "app.get('/ok', okHandler);\n").unwrap();
    fs::write(dir.path().join("binary.js"), [0xff, 0xfe, 0x00, 0x9f, 0x92]).unwrap();

    let result = RepositoryScanner::new(&Config::default()).scan(dir.path());

    assert_eq!(result.files_scanned, 1);
    assert_eq!(result.files_skipped, 1);
    assert_eq!(result.endpoints.len(), 1);
    assert_eq!(result.endpoints[0].route, "/ok");
}

#[test]
fn test_nested_excluded_name_is_skipped_at_any_depth() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("packages/web/dist")).unwrap();
    fs::write(dir.path().join("packages/web/dist/bundle.js"), "function bundled() {}\n").unwrap();
    fs::write(dir.path().join("packages/web/index.js"), "function entry() {}\n").unwrap();

    let result = RepositoryScanner::new(&config_excluding(&["dist"])).scan(dir.path());

    let names: Vec<_> = result.functions.iter().map(|f| f.function_name.as_str()).collect();
    assert_eq!(names, vec!["entry"]);
}

#[test]
fn test_gitignore_is_opt_in() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("generated")).unwrap();
    fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
    fs::write(dir.path().join("generated/client.ts"), "function generatedClient() {}\n").unwrap();
    fs::write(dir.path().join("main.ts"), "function main() {}\n").unwrap();

    let default = RepositoryScanner::new(&Config::default()).scan(dir.path());
    assert_eq!(default.functions.len(), 2);

    let config = Config {
        respect_gitignore: true,
        ..Config::default()
    };
    let ignoring = RepositoryScanner::new(&config).scan(dir.path());
    assert_eq!(ignoring.functions.len(), 1);
    assert_eq!(ignoring.functions[0].function_name, "main");
}

#[test]
fn test_empty_tree() {
    let dir = tempfile::tempdir().unwrap();
    let result = RepositoryScanner::new(&Config::default()).scan(dir.path());

    assert_eq!(result.files_scanned, 0);
    assert!(result.endpoints.is_empty());
    assert!(result.functions.is_empty());
}
