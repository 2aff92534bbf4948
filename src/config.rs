//! Configuration handling for tanuki projects.
//! This module discovers the project configuration (a dedicated `tanuki.*` file or the
//! `tanuki` field of `package.json`), validates it and resolves build options against it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILES, DEFAULT_ENTRY, DEFAULT_LINT_EXTENSIONS, DEFAULT_OUT_DIR, DEFAULT_TSCONFIG,
    MANIFEST_FILE, MANIFEST_KEY,
};
use crate::error::{Error, Result};

/// Top-level project settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project name (required)
    pub name: String,

    #[serde(default)]
    pub build: BuildArtifactsConfig,

    #[serde(default)]
    pub eslint: ESLintConfig,

    /// Path to `tsconfig.json`, relative to the project root, i.e. for monorepos.
    #[serde(default)]
    pub tsconfig: Option<PathBuf>,

    #[serde(default)]
    pub typedoc: TypedocConfig,

    /// Directory the configuration was discovered in.
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

impl Config {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Returns `tsconfig` or the conventional `tsconfig.json`.
    pub fn tsconfig_path(&self) -> PathBuf {
        self.tsconfig.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_TSCONFIG))
    }
}

/// Build artifact settings.
///
/// Every field is optional: the same type describes the config file section and the
/// per-invocation overrides passed to [`crate::Tanuki::build`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildArtifactsConfig {
    /// Also emit an ES module (`.mjs`) artifact. Library mode only.
    pub esm: Option<bool>,
    /// Minify the bundled artifacts. Library mode only.
    pub minify: Option<bool>,
    /// Emit typedoc JSON to `$ROOT/docs.json`. Library mode only.
    pub provide_docs: Option<bool>,
    pub uploader: Option<Uploader>,
    pub mode: Option<BuildMode>,
    /// Bundler entry point, relative to the project root.
    pub entry: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

/// Per-invocation build overrides.
pub type BuildOptions = BuildArtifactsConfig;

impl BuildArtifactsConfig {
    /// Merges `self` over `base`; fields set on `self` win.
    pub fn merge_over(&self, base: &BuildArtifactsConfig) -> BuildArtifactsConfig {
        BuildArtifactsConfig {
            esm: self.esm.or(base.esm),
            minify: self.minify.or(base.minify),
            provide_docs: self.provide_docs.or(base.provide_docs),
            uploader: self.uploader.or(base.uploader),
            mode: self.mode.or(base.mode),
            entry: self.entry.clone().or_else(|| base.entry.clone()),
            out_dir: self.out_dir.clone().or_else(|| base.out_dir.clone()),
        }
    }

    /// Fills defaults and applies the mode rules.
    ///
    /// In [`BuildMode::Application`] the library-only flags (`esm`, `minify`,
    /// `provideDocs`) are always off, whatever was requested.
    pub fn resolve(&self) -> EffectiveBuild {
        let mode = self.mode.unwrap_or_default();
        let library = mode == BuildMode::Library;

        if !library && (self.esm == Some(true) || self.minify == Some(true) || self.provide_docs == Some(true)) {
            warn!("esm, minify and docs are ignored in application mode.");
        }

        EffectiveBuild {
            mode,
            esm: library && self.esm.unwrap_or(false),
            minify: library && self.minify.unwrap_or(false),
            provide_docs: library && self.provide_docs.unwrap_or(false),
            uploader: self.uploader.unwrap_or_default(),
            entry: self.entry.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_ENTRY)),
            out_dir: self.out_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        }
    }
}

/// Fully resolved settings for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveBuild {
    pub mode: BuildMode,
    pub esm: bool,
    pub minify: bool,
    pub provide_docs: bool,
    pub uploader: Uploader,
    pub entry: PathBuf,
    pub out_dir: PathBuf,
}

impl EffectiveBuild {
    /// Whether the fast bundler is used instead of the compiler's own emit.
    pub fn uses_bundler(&self) -> bool {
        self.mode == BuildMode::Library && (self.esm || self.minify)
    }
}

/// Build mode for the `build` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum BuildMode {
    /// Documentation and dual-format output; bundled with esbuild.
    Library,
    /// Plain `tsc` emit; docs, esm and minify are disabled.
    #[default]
    Application,
}

impl BuildMode {
    /// Resolves a caller-supplied mode.
    /// `"lib"` and `"library"` are [`BuildMode::Library`]; anything else, or nothing,
    /// is [`BuildMode::Application`].
    pub fn resolve(value: Option<&str>) -> BuildMode {
        match value.map(str::parse::<BuildMode>) {
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                debug!("{e} Falling back to application mode.");
                BuildMode::Application
            }
            None => BuildMode::Application,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Library => "library",
            BuildMode::Application => "app",
        }
    }
}

impl FromStr for BuildMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lib" | "library" => Ok(BuildMode::Library),
            "app" | "application" => Ok(BuildMode::Application),
            other => Err(Error::InvalidBuildModeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for BuildMode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where built artifacts are meant to be uploaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uploader {
    #[default]
    Fs,
    S3,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ESLintConfig {
    /// Pass `--fix` to eslint
    #[serde(default = "default_fix")]
    pub fix: bool,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_fix() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    DEFAULT_LINT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl Default for ESLintConfig {
    fn default() -> Self {
        Self { fix: default_fix(), extensions: default_extensions() }
    }
}

impl ESLintConfig {
    /// Extensions in the dotted form eslint's `--ext` expects.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim())
            .filter(|ext| !ext.is_empty())
            .map(|ext| if ext.starts_with('.') { ext.to_string() } else { format!(".{ext}") })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedocConfig {
    #[serde(default)]
    pub workspaces: Workspaces,

    /// Load options from `typedoc.json` / `typedoc.js`.
    #[serde(default)]
    pub find_typedoc_file: bool,
}

/// Typedoc workspace mode: off, on (packages taken from `package.json#workspaces`),
/// or an explicit list of package paths or globs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    Enabled(bool),
    Packages(Vec<String>),
}

impl Default for Workspaces {
    fn default() -> Self {
        Workspaces::Enabled(false)
    }
}

impl Workspaces {
    pub fn is_enabled(&self) -> bool {
        match self {
            Workspaces::Enabled(enabled) => *enabled,
            Workspaces::Packages(_) => true,
        }
    }
}

/// Finds the configuration starting from the current directory.
///
/// # Errors
/// * `Error::ConfigNotFoundError` if no configuration source exists up to the root
/// * `Error::ConfigValidationError` if the configuration found is invalid
pub fn find_config() -> Result<Config> {
    let cwd = std::env::current_dir()?;
    find_config_from(cwd)
}

/// Finds the configuration in `start` or the closest ancestor that has one.
///
/// In each directory `tanuki.json`, `tanuki.yml` and `tanuki.yaml` are tried first,
/// then the `tanuki` field of `package.json`. A manifest without that field does not
/// stop the search.
pub fn find_config_from<P: AsRef<Path>>(start: P) -> Result<Config> {
    let start = start.as_ref().canonicalize()?;

    for dir in start.ancestors() {
        for file in CONFIG_FILES {
            let config_path = dir.join(file);
            if config_path.is_file() {
                return load_config_file(&config_path);
            }
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            if let Some(config) = load_manifest_config(&manifest_path)? {
                return Ok(config);
            }
            debug!("No '{}' field in {}", MANIFEST_KEY, manifest_path.display());
        }
    }

    let mut tried: Vec<String> = CONFIG_FILES.iter().map(|f| f.to_string()).collect();
    tried.push(format!("{MANIFEST_FILE}#{MANIFEST_KEY}"));
    Err(Error::ConfigNotFoundError { searched_from: start, tried: tried.join(", ") })
}

/// Loads a dedicated configuration file. JSON is tried first, then YAML.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigValidationError` if it cannot be parsed or is invalid
pub fn load_config_file<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from {}", config_path.display());

    let content = fs::read_to_string(config_path)?;
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(&content).map_err(|e| Error::ConfigValidationError {
            path: config_path.to_path_buf(),
            reason: format!("invalid configuration format: {e}"),
        })?,
    };

    parse_config(value, config_path)
}

/// Reads the `tanuki` field of a `package.json`. A missing `name` in that field is
/// taken from the manifest itself.
fn load_manifest_config(manifest_path: &Path) -> Result<Option<Config>> {
    let content = fs::read_to_string(manifest_path)?;
    let mut manifest: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| Error::ConfigValidationError {
            path: manifest_path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?;

    let package_name = manifest.get("name").cloned();
    let Some(mut value) = manifest.get_mut(MANIFEST_KEY).map(serde_json::Value::take) else {
        return Ok(None);
    };

    if let (Some(object), Some(name)) = (value.as_object_mut(), package_name) {
        object.entry("name").or_insert(name);
    }

    debug!("Loading configuration from {}#{}", manifest_path.display(), MANIFEST_KEY);
    parse_config(value, manifest_path).map(Some)
}

/// Validates a raw configuration document and deserializes it.
///
/// The directory holding `source` becomes the absolute project root.
///
/// # Errors
/// * `Error::ConfigValidationError` if `value` is not an object, `name` is missing or
///   empty, or any field has the wrong type
/// * `Error::IoError` if the directory of `source` cannot be resolved
pub fn parse_config(value: serde_json::Value, source: &Path) -> Result<Config> {
    let invalid = |reason: String| Error::ConfigValidationError { path: source.to_path_buf(), reason };

    let object = value.as_object().ok_or_else(|| invalid("expected an object".to_string()))?;
    match object.get("name") {
        Some(serde_json::Value::String(name)) if !name.trim().is_empty() => {}
        Some(_) => return Err(invalid("`name` must be a non-empty string".to_string())),
        None => return Err(invalid("missing required field `name`".to_string())),
    }

    let mut config: Config = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
    // Tools run from the root, so it must not depend on the caller's cwd.
    let parent = match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    config.root = Some(parent.canonicalize()?);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_resolve() {
        assert_eq!(BuildMode::resolve(Some("lib")), BuildMode::Library);
        assert_eq!(BuildMode::resolve(Some("library")), BuildMode::Library);
        assert_eq!(BuildMode::resolve(Some("app")), BuildMode::Application);
        assert_eq!(BuildMode::resolve(Some("Library")), BuildMode::Application);
        assert_eq!(BuildMode::resolve(Some("")), BuildMode::Application);
        assert_eq!(BuildMode::resolve(None), BuildMode::Application);
    }

    #[test]
    fn test_build_mode_parse_is_strict() {
        assert_eq!("application".parse::<BuildMode>().unwrap(), BuildMode::Application);
        match "bundle".parse::<BuildMode>() {
            Err(Error::InvalidBuildModeError(value)) => assert_eq!(value, "bundle"),
            other => panic!("Expected InvalidBuildModeError, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_over_prefers_explicit_fields() {
        let base = BuildArtifactsConfig {
            esm: Some(true),
            minify: Some(true),
            mode: Some(BuildMode::Library),
            ..Default::default()
        };
        let options = BuildOptions { minify: Some(false), ..Default::default() };

        let merged = options.merge_over(&base);
        assert_eq!(merged.esm, Some(true));
        assert_eq!(merged.minify, Some(false));
        assert_eq!(merged.mode, Some(BuildMode::Library));
        assert_eq!(merged.provide_docs, None);
    }

    #[test]
    fn test_application_mode_clears_library_flags() {
        let effective = BuildArtifactsConfig {
            esm: Some(true),
            minify: Some(true),
            provide_docs: Some(true),
            mode: Some(BuildMode::Application),
            ..Default::default()
        }
        .resolve();

        assert!(!effective.esm);
        assert!(!effective.minify);
        assert!(!effective.provide_docs);
        assert!(!effective.uses_bundler());
    }

    #[test]
    fn test_library_defaults() {
        let effective =
            BuildArtifactsConfig { mode: Some(BuildMode::Library), ..Default::default() }.resolve();

        assert_eq!(effective.uploader, Uploader::Fs);
        assert_eq!(effective.entry, PathBuf::from("src/index.ts"));
        assert_eq!(effective.out_dir, PathBuf::from("dist"));
        assert!(!effective.uses_bundler());
    }

    #[test]
    fn test_relative_source_gives_absolute_root() {
        let config = parse_config(serde_json::json!({"name": "demo"}), Path::new("tanuki.json")).unwrap();
        let root = config.root.unwrap();

        assert!(root.is_absolute());
        assert_eq!(root, std::env::current_dir().unwrap().canonicalize().unwrap());
    }

    #[test]
    fn test_normalized_extensions() {
        let eslint = ESLintConfig::default();
        assert!(eslint.fix);
        assert_eq!(eslint.normalized_extensions(), vec![".d.ts", ".ts", ".js", ".jsx", ".tsx"]);
    }
}
