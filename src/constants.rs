//! Common constants used throughout tanuki.

/// Dedicated configuration file names, in lookup order.
pub const CONFIG_FILES: [&str; 3] = ["tanuki.json", "tanuki.yml", "tanuki.yaml"];

/// Project manifest that may carry a `tanuki` object.
pub const MANIFEST_FILE: &str = "package.json";

/// Field of the manifest holding the configuration.
pub const MANIFEST_KEY: &str = "tanuki";

/// Documentation output, relative to the project (or package) root.
pub const DOCS_OUTPUT: &str = "docs.json";

pub const DEFAULT_TSCONFIG: &str = "tsconfig.json";
pub const DEFAULT_ENTRY: &str = "src/index.ts";
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Extensions handed to eslint when the config does not list any.
pub const DEFAULT_LINT_EXTENSIONS: [&str; 5] = [".d.ts", "ts", "js", "jsx", "tsx"];

/// Typedoc option files picked up when `findTypedocFile` is enabled.
pub const TYPEDOC_FILES: [&str; 2] = ["typedoc.json", "typedoc.js"];
