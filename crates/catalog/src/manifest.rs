//! Extracting catalog references from `package.json` manifests.
//!
//! Every string property whose value is a catalog reference is reported, with
//! the property key taken as the package name. This covers the usual
//! `dependencies`/`devDependencies`/`peerDependencies` sections as well as
//! nested ones like `pnpm.overrides`.

use crate::error::{Error, Result};
use crate::reference::is_valid_catalog_reference;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A catalog reference found in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestReference {
    /// Dotted path of the object holding the property, empty at the top level.
    pub section: String,
    /// The property key, i.e. the package name.
    pub package: String,
    /// The reference token, e.g. `catalog:react17`.
    pub reference: String,
}

/// A manifest reference paired with the version it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReference {
    /// Where the reference was found.
    #[serde(flatten)]
    pub reference: ManifestReference,
    /// The pinned version, or `None` when nothing resolves.
    pub version: Option<String>,
}

/// Scans manifest text for catalog references, in document order.
///
/// # Errors
///
/// Returns [`Error::Json`] if the text is not valid JSON.
pub fn scan_manifest(content: &str) -> Result<Vec<ManifestReference>> {
    let document: Value = serde_json::from_str(content)?;
    Ok(collect(&document))
}

/// Reads a manifest from disk and scans it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestReference>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        source,
        path: Some(path.to_path_buf()),
        operation: "reading package manifest".to_string(),
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|source| Error::Json {
        source,
        path: Some(path.to_path_buf()),
    })?;
    Ok(collect(&document))
}

fn collect(document: &Value) -> Vec<ManifestReference> {
    let mut found = Vec::new();
    walk(document, "", &mut found);
    found
}

fn walk(value: &Value, section: &str, found: &mut Vec<ManifestReference>) {
    match value {
        Value::Object(map) => walk_object(map, section, found),
        Value::Array(items) => {
            for item in items {
                walk(item, section, found);
            }
        }
        _ => {}
    }
}

fn walk_object(map: &Map<String, Value>, section: &str, found: &mut Vec<ManifestReference>) {
    for (key, value) in map {
        match value {
            Value::String(token) if is_valid_catalog_reference(token) => {
                found.push(ManifestReference {
                    section: section.to_string(),
                    package: key.clone(),
                    reference: token.clone(),
                });
            }
            Value::Object(_) | Value::Array(_) => {
                let nested = if section.is_empty() {
                    key.clone()
                } else {
                    format!("{section}.{key}")
                };
                walk(value, &nested, found);
            }
            _ => {}
        }
    }
}
