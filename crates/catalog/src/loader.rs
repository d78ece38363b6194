//! Locating and decoding `pnpm-workspace.yaml`.
//!
//! Only two top-level keys are read:
//!
//! ```yaml
//! catalog:
//!   react: ^18.3.1
//!
//! catalogs:
//!   react17:
//!     react: ^17.0.2
//! ```
//!
//! Everything else in the document (`packages`, `onlyBuiltDependencies`, ...)
//! is ignored. A `catalog` or `catalogs` value of the wrong shape makes that
//! section absent rather than failing the whole parse.

use crate::error::{Error, Result};
use crate::model::{CatalogTable, NamedCatalogs, WorkspaceCatalogModel};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// The conventional name of the workspace configuration file.
pub const WORKSPACE_FILE_NAME: &str = "pnpm-workspace.yaml";

const DEFAULT_CATALOG_KEY: &str = "catalog";
const NAMED_CATALOGS_KEY: &str = "catalogs";

/// Handle to a located workspace configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkspaceFile {
    path: PathBuf,
}

impl WorkspaceFile {
    /// Wraps a path without checking it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True while a regular file still exists at the handle's path.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.path.is_file()
    }
}

/// Source of workspace catalogs.
///
/// [`CatalogResolver`](crate::CatalogResolver) calls `locate` and then `parse`
/// on its first lookup and after every refresh.
pub trait ConfigLoader: Send + Sync {
    /// Finds the configuration file directly under `root`.
    fn locate(&self, root: &Path) -> Option<WorkspaceFile>;

    /// Reads and decodes a located configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a YAML mapping.
    fn parse(&self, file: &WorkspaceFile) -> Result<WorkspaceCatalogModel>;
}

/// Loads catalogs from `pnpm-workspace.yaml` on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct PnpmWorkspaceLoader;

impl ConfigLoader for PnpmWorkspaceLoader {
    fn locate(&self, root: &Path) -> Option<WorkspaceFile> {
        let path = root.join(WORKSPACE_FILE_NAME);
        if !path.is_file() {
            tracing::trace!(path = %path.display(), "No workspace file");
            return None;
        }

        // Existence alone is not enough: an unreadable file is treated as missing.
        if let Err(err) = fs::File::open(&path) {
            tracing::debug!(path = %path.display(), error = %err, "Workspace file is not readable");
            return None;
        }

        Some(WorkspaceFile::new(path))
    }

    fn parse(&self, file: &WorkspaceFile) -> Result<WorkspaceCatalogModel> {
        let path = file.path();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            source,
            path: Some(path.to_path_buf()),
            operation: "reading pnpm-workspace.yaml".to_string(),
        })?;

        let model = decode(&content, Some(path))?;
        tracing::debug!(
            path = %path.display(),
            default_entries = model.default_catalog().map_or(0, |c| c.len()),
            named_catalogs = model.named_catalogs().map_or(0, |c| c.len()),
            "Parsed pnpm-workspace.yaml"
        );
        Ok(model)
    }
}

/// Decodes catalog sections from `pnpm-workspace.yaml` text.
///
/// An empty document yields an empty model.
///
/// # Errors
///
/// Returns [`Error::Yaml`] for malformed YAML and
/// [`Error::InvalidWorkspaceConfig`] when the top level is not a mapping.
pub fn parse_catalogs(content: &str) -> Result<WorkspaceCatalogModel> {
    decode(content, None)
}

fn decode(content: &str, path: Option<&Path>) -> Result<WorkspaceCatalogModel> {
    let document: Value = serde_yaml::from_str(content).map_err(|source| Error::Yaml {
        source,
        path: path.map(Path::to_path_buf),
    })?;

    let root = match document {
        Value::Null => return Ok(WorkspaceCatalogModel::empty()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(Error::InvalidWorkspaceConfig {
                path: path.map_or_else(|| PathBuf::from(WORKSPACE_FILE_NAME), Path::to_path_buf),
                message: format!("expected a mapping at the top level, found {}", kind(&other)),
            });
        }
    };

    let default_catalog = root.get(DEFAULT_CATALOG_KEY).and_then(catalog_table);
    let named_catalogs = root.get(NAMED_CATALOGS_KEY).and_then(named_catalogs);

    Ok(WorkspaceCatalogModel::new(default_catalog, named_catalogs))
}

fn catalog_table(value: &Value) -> Option<CatalogTable> {
    let Value::Mapping(mapping) = untag(value) else {
        tracing::debug!(found = kind(value), "Catalog is not a mapping, ignoring it");
        return None;
    };
    Some(table_entries(mapping))
}

fn named_catalogs(value: &Value) -> Option<NamedCatalogs> {
    let Value::Mapping(mapping) = untag(value) else {
        tracing::debug!(found = kind(value), "Named catalogs are not a mapping, ignoring them");
        return None;
    };

    let mut catalogs = NamedCatalogs::new();
    for (name, table) in mapping {
        let Some(name) = scalar_to_string(name) else {
            continue;
        };
        match catalog_table(table) {
            Some(table) => {
                catalogs.insert(name, table);
            }
            None => tracing::debug!(catalog = %name, "Skipping named catalog with unexpected shape"),
        }
    }
    Some(catalogs)
}

fn table_entries(mapping: &Mapping) -> CatalogTable {
    mapping
        .iter()
        .filter_map(|(key, value)| Some((scalar_to_string(key)?, scalar_to_string(value)?)))
        .collect()
}

/// Coerces a YAML scalar to a string. Nulls and collections have no string form here.
fn scalar_to_string(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
