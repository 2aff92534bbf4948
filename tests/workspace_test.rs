use std::fs;
use std::path::Path;

use tanuki::config::Workspaces;
use tanuki::workspace::discover_packages;
use tanuki::Error;
use tempfile::TempDir;

fn package(root: &Path, relative: &str) {
    let dir = root.join(relative);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), "{}").unwrap();
}

#[test]
fn test_disabled() {
    let temp_dir = TempDir::new().unwrap();
    package(temp_dir.path(), "packages/core");

    assert!(discover_packages(temp_dir.path(), &Workspaces::Enabled(false)).unwrap().is_empty());
}

#[test]
fn test_explicit_patterns() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    package(root, "packages/core");
    package(root, "packages/cli");
    package(root, "packages/core/node_modules/dep");
    package(root, "tools/lint");
    fs::create_dir_all(root.join("packages/empty")).unwrap();

    let workspaces = Workspaces::Packages(vec!["./packages/*".to_string(), "tools/lint/".to_string()]);
    let packages = discover_packages(root, &workspaces).unwrap();

    assert_eq!(
        packages,
        vec![root.join("packages/cli"), root.join("packages/core"), root.join("tools/lint")]
    );
}

#[test]
fn test_manifest_workspaces() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    package(root, "packages/core");
    package(root, "apps/web");
    fs::write(root.join("package.json"), r#"{"workspaces": {"packages": ["packages/*"]}}"#).unwrap();

    let packages = discover_packages(root, &Workspaces::Enabled(true)).unwrap();
    assert_eq!(packages, vec![root.join("packages/core")]);
}

#[test]
fn test_manifest_without_workspaces() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("package.json"), r#"{"name": "demo"}"#).unwrap();

    assert!(matches!(
        discover_packages(temp_dir.path(), &Workspaces::Enabled(true)),
        Err(Error::ConfigValidationError { .. })
    ));
}

#[test]
fn test_invalid_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let workspaces = Workspaces::Packages(vec!["packages/[".to_string()]);

    assert!(matches!(
        discover_packages(temp_dir.path(), &workspaces),
        Err(Error::ConfigValidationError { .. })
    ));
}
