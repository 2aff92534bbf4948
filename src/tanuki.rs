//! The tanuki entry point.
//! [`Tanuki`] holds the resolved configuration and runs the build, lint and docs
//! operations against the external tools.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{BuildOptions, Config, EffectiveBuild};
use crate::constants::{DEFAULT_ENTRY, DEFAULT_TSCONFIG, DOCS_OUTPUT, TYPEDOC_FILES};
use crate::error::{Error, Result};
use crate::eslint;
use crate::tools::{Invocation, ProcessRunner, Tool, ToolFailure, ToolOutput, ToolRunner};
use crate::workspace::discover_packages;

/// Entry point holding the project configuration for the lifetime of a run.
///
/// Construct one per run and pass it by reference to whatever needs it.
pub struct Tanuki<R: ToolRunner = ProcessRunner> {
    config: Config,
    root: PathBuf,
    runner: R,
}

impl Tanuki<ProcessRunner> {
    /// Creates a new instance that spawns the project's tools as child processes.
    pub fn new(config: Config) -> Self {
        let root = project_root(&config);
        let runner = ProcessRunner::new(&root);
        Self { config, root, runner }
    }
}

impl<R: ToolRunner> Tanuki<R> {
    /// Creates a new instance that invokes tools through `runner`.
    pub fn with_runner(config: Config, runner: R) -> Self {
        let root = project_root(&config);
        Self { config, root, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Directory the tools are run from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the project artifacts.
    ///
    /// # Arguments
    /// * `options` - Overrides merged over the configured `build` section
    ///
    /// # Returns
    /// * `Result<EffectiveBuild>` - The settings the build ran with
    ///
    /// # Flow
    /// 1. Merges `options` over the configuration and resolves the mode
    /// 2. Bundles with esbuild (library mode with esm or minify) or emits with tsc
    /// 3. Generates `docs.json` when docs were requested in library mode
    ///
    /// # Errors
    /// * `Error::BuildFailureError` if esbuild or tsc fails
    /// * `Error::DocsGenerationError` if the docs step fails
    pub fn build(&self, options: &BuildOptions) -> Result<EffectiveBuild> {
        let build = options.merge_over(&self.config.build).resolve();
        info!("Building '{}' in {} mode.", self.config.name, build.mode);

        if build.uses_bundler() {
            self.bundle(&build)?;
        } else {
            self.compile()?;
        }

        if build.provide_docs {
            self.docs()?;
        }

        debug!("Artifacts written to '{}' (uploader: {:?}).", build.out_dir.display(), build.uploader);
        Ok(build)
    }

    /// Runs eslint over `files` (the whole project when empty).
    ///
    /// # Errors
    /// * `Error::LintFailureError` with the remaining violations, or with none and the
    ///   tool output when eslint itself failed
    pub fn lint<S: AsRef<str>>(&self, files: &[S]) -> Result<()> {
        let settings = &self.config.eslint;
        let mut invocation = Invocation::new(Tool::Eslint, &self.root).args(["--format", "json"]);

        let extensions = settings.normalized_extensions();
        if !extensions.is_empty() {
            invocation = invocation.arg("--ext").arg(extensions.join(","));
        }
        if settings.fix {
            invocation = invocation.arg("--fix");
        }
        invocation = if files.is_empty() {
            invocation.arg(".")
        } else {
            invocation.args(files.iter().map(|f| f.as_ref().to_string()))
        };

        info!("Linting '{}'.", self.config.name);
        let output = self.spawn(&invocation).map_err(|failure| Error::LintFailureError {
            violations: Vec::new(),
            output: failure.to_string(),
        })?;

        // 0: clean, 1: violations remain, anything else: eslint could not run
        if !matches!(output.code, Some(0) | Some(1)) {
            return Err(Error::LintFailureError {
                violations: Vec::new(),
                output: ToolFailure::from_output(Tool::Eslint, &output).to_string(),
            });
        }

        let violations = eslint::parse_report(&output.stdout).map_err(|e| Error::LintFailureError {
            violations: Vec::new(),
            output: format!("unreadable eslint report: {e}\n{}", output.combined()),
        })?;

        if violations.is_empty() {
            info!("No lint violations.");
            Ok(())
        } else {
            Err(Error::LintFailureError { violations, output: output.stderr })
        }
    }

    /// Generates the typedoc JSON at `$ROOT/docs.json`.
    ///
    /// In workspace mode typedoc runs once per package and the root `docs.json` is an
    /// array of the package documents.
    ///
    /// # Errors
    /// * `Error::DocsGenerationError` if typedoc fails or writes unreadable output
    /// * `Error::ConfigValidationError` if workspace mode finds no packages
    pub fn docs(&self) -> Result<()> {
        let settings = &self.config.typedoc;
        let docs_path = self.root.join(DOCS_OUTPUT);

        if !settings.workspaces.is_enabled() {
            let invocation = self.typedoc_invocation(&self.root, self.config.tsconfig_path());
            self.run(&invocation).map_err(Error::DocsGenerationError)?;
            info!("Documentation written to '{}'.", docs_path.display());
            return Ok(());
        }

        let packages = discover_packages(&self.root, &settings.workspaces)?;
        if packages.is_empty() {
            return Err(Error::ConfigValidationError {
                path: self.root.clone(),
                reason: "typedoc workspace mode found no packages".to_string(),
            });
        }

        let mut documents = Vec::with_capacity(packages.len());
        for package in &packages {
            let invocation = self.typedoc_invocation(package, PathBuf::from(DEFAULT_TSCONFIG));
            self.run(&invocation).map_err(Error::DocsGenerationError)?;
            documents.push(read_docs(&package.join(DOCS_OUTPUT))?);
        }

        let content = serde_json::to_string_pretty(&serde_json::Value::Array(documents))
            .map_err(std::io::Error::from)?;
        fs::write(&docs_path, content)?;
        info!("Documentation for {} package(s) written to '{}'.", packages.len(), docs_path.display());
        Ok(())
    }

    fn bundle(&self, build: &EffectiveBuild) -> Result<()> {
        let mut formats = vec![("cjs", "index.js")];
        if build.esm {
            formats.push(("esm", "index.mjs"));
        }

        for (format, file) in formats {
            let mut invocation = Invocation::new(Tool::Esbuild, &self.root)
                .arg(build.entry.display().to_string())
                .args(["--bundle", "--platform=node", "--packages=external"])
                .arg(format!("--format={format}"))
                .arg(format!("--outfile={}", build.out_dir.join(file).display()));
            if build.minify {
                invocation = invocation.arg("--minify");
            }
            self.run(&invocation).map_err(Error::BuildFailureError)?;
        }
        Ok(())
    }

    fn compile(&self) -> Result<()> {
        let invocation = Invocation::new(Tool::Tsc, &self.root)
            .arg("-p")
            .arg(self.config.tsconfig_path().display().to_string());
        self.run(&invocation).map_err(Error::BuildFailureError)?;
        Ok(())
    }

    fn typedoc_invocation(&self, dir: &Path, tsconfig: PathBuf) -> Invocation {
        let mut invocation = Invocation::new(Tool::Typedoc, dir);

        let options_file = if self.config.typedoc.find_typedoc_file {
            let found = TYPEDOC_FILES.iter().find(|file| dir.join(file).is_file());
            if found.is_none() {
                warn!("No typedoc options file in '{}', using the entry point.", dir.display());
            }
            found
        } else {
            None
        };

        invocation = match options_file {
            Some(file) => invocation.arg("--options").arg(*file),
            None => {
                let entry =
                    self.config.build.entry.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_ENTRY));
                invocation
                    .arg("--entryPoints")
                    .arg(entry.display().to_string())
                    .arg("--tsconfig")
                    .arg(tsconfig.display().to_string())
            }
        };

        invocation.arg("--json").arg(DOCS_OUTPUT)
    }

    /// Runs a tool and fails unless it exits successfully.
    fn run(&self, invocation: &Invocation) -> std::result::Result<ToolOutput, ToolFailure> {
        let output = self.spawn(invocation)?;
        if !output.success() {
            return Err(ToolFailure::from_output(invocation.tool, &output));
        }
        let combined = output.combined();
        if !combined.is_empty() {
            debug!("{combined}");
        }
        Ok(output)
    }

    fn spawn(&self, invocation: &Invocation) -> std::result::Result<ToolOutput, ToolFailure> {
        info!("Running {invocation}");
        self.runner.run(invocation).map_err(|e| ToolFailure::from_io(invocation.tool, &e))
    }
}

fn project_root(config: &Config) -> PathBuf {
    config.root.clone().unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

fn read_docs(path: &Path) -> Result<serde_json::Value> {
    let unreadable = |reason: String| {
        Error::DocsGenerationError(ToolFailure {
            tool: Tool::Typedoc,
            code: Some(0),
            output: format!("unreadable output '{}': {reason}", path.display()),
        })
    };

    let content = fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
}
