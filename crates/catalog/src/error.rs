//! Error types for catalog operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading workspace catalogs or scanning manifests.
///
/// None of these escape [`CatalogResolver`](crate::CatalogResolver)'s lookup methods;
/// the resolver logs them and degrades to "no version available".
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No `pnpm-workspace.yaml` at the workspace root.
    #[error("Workspace configuration not found at path: {path}")]
    #[diagnostic(
        code(catalog_lens::workspace_not_found),
        help("Ensure the root directory contains a pnpm-workspace.yaml file")
    )]
    WorkspaceNotFound {
        /// The workspace root that was searched.
        path: PathBuf,
    },

    /// The configuration decoded, but not into a document we can read catalogs from.
    #[error("Invalid workspace configuration at {path}: {message}")]
    #[diagnostic(
        code(catalog_lens::invalid_config),
        help("pnpm-workspace.yaml must be a YAML mapping at the top level")
    )]
    InvalidWorkspaceConfig {
        /// Path to the invalid configuration file.
        path: PathBuf,
        /// Description of what is invalid.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(catalog_lens::io_error),
        help("Check that the referenced paths exist and that you have permission to read them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(catalog_lens::yaml_error),
        help("Ensure pnpm-workspace.yaml has valid YAML syntax")
    )]
    Yaml {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },

    /// JSON parsing error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(catalog_lens::json_error),
        help("Ensure the package manifest is valid JSON")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Yaml { source, path: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}
