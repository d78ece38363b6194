//! In-memory catalog model parsed from `pnpm-workspace.yaml`.

use crate::reference::CatalogReference;
use serde::Serialize;
use std::collections::BTreeMap;

/// Package name to version constraint. Versions are passed through untouched.
pub type CatalogTable = BTreeMap<String, String>;

/// Catalog name to its table.
pub type NamedCatalogs = BTreeMap<String, CatalogTable>;

/// A parsed snapshot of a workspace's catalogs.
///
/// The model is never mutated after construction. A refresh builds a new
/// model and replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCatalogModel {
    default_catalog: Option<CatalogTable>,
    named_catalogs: Option<NamedCatalogs>,
}

impl WorkspaceCatalogModel {
    /// Creates a model from its two catalog sections.
    #[must_use]
    pub fn new(default_catalog: Option<CatalogTable>, named_catalogs: Option<NamedCatalogs>) -> Self {
        Self {
            default_catalog,
            named_catalogs,
        }
    }

    /// A model with no catalogs at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True if neither a default catalog nor named catalogs are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default_catalog.is_none() && self.named_catalogs.is_none()
    }

    /// The default catalog (the `catalog` key).
    #[must_use]
    pub fn default_catalog(&self) -> Option<&CatalogTable> {
        self.default_catalog.as_ref()
    }

    /// All named catalogs (the `catalogs` key).
    #[must_use]
    pub fn named_catalogs(&self) -> Option<&NamedCatalogs> {
        self.named_catalogs.as_ref()
    }

    /// A single named catalog.
    #[must_use]
    pub fn named_catalog(&self, name: &str) -> Option<&CatalogTable> {
        self.named_catalogs.as_ref()?.get(name)
    }

    /// Names of the named catalogs, in sorted order.
    pub fn catalog_names(&self) -> impl Iterator<Item = &str> {
        self.named_catalogs
            .iter()
            .flat_map(|catalogs| catalogs.keys().map(String::as_str))
    }

    /// The table a reference selects, if it selects one that exists.
    #[must_use]
    pub fn select(&self, reference: &CatalogReference) -> Option<&CatalogTable> {
        match reference {
            CatalogReference::Default => self.default_catalog(),
            CatalogReference::Named(name) => self.named_catalog(name),
            CatalogReference::Unselected(_) => None,
        }
    }

    /// Looks up `package` in the catalog selected by `reference`.
    ///
    /// A named reference never falls back to the default catalog.
    #[must_use]
    pub fn lookup(&self, reference: &CatalogReference, package: &str) -> Option<&str> {
        self.select(reference)?.get(package).map(String::as_str)
    }
}
