//! Package discovery for typedoc workspace mode.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::Workspaces;
use crate::constants::MANIFEST_FILE;
use crate::error::{Error, Result};

const MAX_DEPTH: usize = 8;

/// Returns the package directories covered by `workspaces`, sorted by path.
///
/// # Arguments
/// * `root` - Project root
/// * `workspaces` - Typedoc workspace setting
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Directories below `root` that hold a `package.json` and
///   match one of the workspace patterns. Empty when workspace mode is off.
///
/// # Errors
/// * `Error::ConfigValidationError` if workspace mode is on but the root manifest
///   declares no workspaces, or a pattern is not a valid glob
pub fn discover_packages<P: AsRef<Path>>(root: P, workspaces: &Workspaces) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let patterns = match workspaces {
        Workspaces::Enabled(false) => return Ok(Vec::new()),
        Workspaces::Enabled(true) => manifest_workspaces(root)?,
        Workspaces::Packages(patterns) => patterns.clone(),
    };

    let globs = build_globset(root, &patterns)?;
    let mut packages = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(MAX_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_type().is_dir() && !is_skipped(entry));

    for entry in walker {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let relative = relative_key(root, entry.path());
        if globs.is_match(&relative) {
            if entry.path().join(MANIFEST_FILE).is_file() {
                debug!("Found workspace package '{relative}'");
                packages.push(entry.into_path());
            } else {
                debug!("Skipping '{relative}': no {MANIFEST_FILE}");
            }
        }
    }

    Ok(packages)
}

/// Reads `workspaces` from the root `package.json`, either as a list or as
/// `{ "packages": [...] }`.
fn manifest_workspaces(root: &Path) -> Result<Vec<String>> {
    let manifest_path = root.join(MANIFEST_FILE);
    let invalid = |reason: &str| Error::ConfigValidationError {
        path: manifest_path.clone(),
        reason: reason.to_string(),
    };

    let content = fs::read_to_string(&manifest_path)
        .map_err(|_| invalid("typedoc workspace mode needs a package.json with `workspaces`"))?;
    let manifest: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| invalid(&format!("invalid JSON: {e}")))?;

    let declared = match manifest.get("workspaces") {
        Some(serde_json::Value::Array(list)) => Some(list),
        Some(serde_json::Value::Object(object)) => object.get("packages").and_then(|p| p.as_array()),
        _ => None,
    }
    .ok_or_else(|| invalid("typedoc workspace mode is enabled but no `workspaces` are declared"))?;

    Ok(declared.iter().filter_map(|p| p.as_str()).map(str::to_string).collect())
}

fn build_globset(root: &Path, patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim().trim_start_matches("./").trim_end_matches('/');
        if pattern.is_empty() {
            continue;
        }
        let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(|e| {
            Error::ConfigValidationError {
                path: root.to_path_buf(),
                reason: format!("invalid workspace pattern '{pattern}': {e}"),
            }
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| Error::ConfigValidationError {
        path: root.to_path_buf(),
        reason: format!("invalid workspace patterns: {e}"),
    })
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name == "node_modules" || name.starts_with('.'))
            .unwrap_or(false)
}

/// Relative path with `/` separators, as workspace globs are written.
fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
