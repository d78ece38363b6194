//! CLI error types rendered through miette.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a CLI invocation with a non-zero exit code.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No version pinned for '{package}' via '{reference}'")]
    #[diagnostic(
        code(catalog_lens::cli::unresolved),
        help("Check the package name and that the catalog is declared in pnpm-workspace.yaml")
    )]
    Unresolved { package: String, reference: String },

    #[error("'{reference}' is not a catalog reference")]
    #[diagnostic(
        code(catalog_lens::cli::invalid_reference),
        help("Use 'catalog:' for the default catalog or 'catalog:<name>' for a named one")
    )]
    InvalidReference { reference: String },

    #[error("No pnpm-workspace.yaml found in {}", root.display())]
    #[diagnostic(
        code(catalog_lens::cli::not_a_workspace),
        help("Pass --root or set CATALOG_LENS_ROOT to the workspace root")
    )]
    NotAWorkspace { root: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] catalog_lens::Error),

    #[error("Failed to write output")]
    #[diagnostic(code(catalog_lens::cli::write))]
    Write(#[from] std::io::Error),

    #[error("Failed to serialize output")]
    #[diagnostic(code(catalog_lens::cli::output))]
    Output(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message() {
        let error = CliError::Unresolved {
            package: "react".into(),
            reference: "catalog:react19".into(),
        };
        assert_eq!(
            error.to_string(),
            "No version pinned for 'react' via 'catalog:react19'"
        );
        assert!(error.help().is_some());
    }

    #[test]
    fn test_catalog_error_is_transparent() {
        let error = CliError::from(catalog_lens::Error::WorkspaceNotFound {
            path: PathBuf::from("/nowhere"),
        });
        assert!(error.to_string().contains("/nowhere"));
        assert_eq!(
            error.code().map(|c| c.to_string()),
            Some("catalog_lens::workspace_not_found".to_string())
        );
    }
}
