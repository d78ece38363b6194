//! Resolution of pnpm workspace catalog references.
//!
//! pnpm lets a workspace pin dependency versions once, in `pnpm-workspace.yaml`,
//! and have package manifests refer to them by reference token instead of by
//! version:
//!
//! ```yaml
//! # pnpm-workspace.yaml
//! catalog:
//!   react: ^18.3.1
//! catalogs:
//!   react17:
//!     react: ^17.0.2
//! ```
//!
//! ```json
//! { "dependencies": { "react": "catalog:", "react-dom": "catalog:react17" } }
//! ```
//!
//! This crate turns `(package, reference)` pairs back into the pinned versions.
//!
//! # Architecture
//!
//! - [`ConfigLoader`] locates and decodes the workspace configuration into a
//!   [`WorkspaceCatalogModel`]. [`PnpmWorkspaceLoader`] reads it from disk.
//! - [`CatalogResolver`] owns a cached model for one workspace root, loads it
//!   on first use and drops it on [`CatalogResolver::refresh`].
//! - [`CatalogReference`] is the parsed form of a reference token.
//! - [`scan_manifest`] finds the reference tokens inside a `package.json`.
//!
//! # Error behavior
//!
//! Lookups never fail. A missing `pnpm-workspace.yaml`, an unreadable one, or
//! one with malformed YAML all behave like a workspace without catalogs; the
//! cause is logged through `tracing`. Only the explicit parsing helpers
//! ([`parse_catalogs`], [`scan_manifest`], [`read_manifest`]) return [`Error`].
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_lens::CatalogResolver;
//!
//! let resolver = CatalogResolver::new("/path/to/workspace");
//! assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^18.3.1"));
//! assert_eq!(resolver.resolve("react", "catalog:react17").as_deref(), Some("^17.0.2"));
//! assert_eq!(resolver.resolve("react", "^18.0.0"), None);
//!
//! // After pnpm-workspace.yaml changes on disk:
//! resolver.refresh();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod reference;
pub mod resolver;

pub use error::{Error, Result};
pub use loader::{ConfigLoader, PnpmWorkspaceLoader, WORKSPACE_FILE_NAME, WorkspaceFile, parse_catalogs};
pub use manifest::{ManifestReference, ResolvedReference, read_manifest, scan_manifest};
pub use model::{CatalogTable, NamedCatalogs, WorkspaceCatalogModel};
pub use reference::{CATALOG_PREFIX, CatalogReference, InvalidReference, is_valid_catalog_reference};
pub use resolver::{CacheStatus, CatalogResolver};
