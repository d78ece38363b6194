//! Cached catalog resolution for a single workspace.
//!
//! [`CatalogResolver`] owns the parsed catalogs of one workspace root. The
//! configuration is loaded lazily by the first call that needs it and kept
//! until [`CatalogResolver::refresh`] is called, typically by whatever watches
//! the filesystem or reacts to the host application regaining focus.
//!
//! Cache transitions happen under a single write lock and always swap in a
//! fully built [`WorkspaceCatalogModel`], so concurrent readers see either the
//! old or the new model, never a mix.

use crate::error::Error;
use crate::loader::{ConfigLoader, PnpmWorkspaceLoader, WorkspaceFile};
use crate::manifest::{ResolvedReference, scan_manifest};
use crate::model::{CatalogTable, NamedCatalogs, WorkspaceCatalogModel};
use crate::reference::CatalogReference;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Observable state of the resolver's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Nothing has been loaded since construction or the last refresh.
    Unloaded,
    /// The workspace file was parsed successfully.
    Loaded,
    /// Loading failed or no workspace file exists; lookups see empty catalogs.
    LoadFailed,
}

#[derive(Debug, Default)]
enum CatalogState {
    #[default]
    Unloaded,
    Loaded(Arc<WorkspaceCatalogModel>),
    LoadFailed(Arc<WorkspaceCatalogModel>),
}

#[derive(Debug, Default)]
struct CachedState {
    file: Option<WorkspaceFile>,
    catalogs: CatalogState,
}

impl CachedState {
    fn model(&self) -> Option<Arc<WorkspaceCatalogModel>> {
        match &self.catalogs {
            CatalogState::Unloaded => None,
            CatalogState::Loaded(model) | CatalogState::LoadFailed(model) => {
                Some(Arc::clone(model))
            }
        }
    }

    /// A cached handle whose file has disappeared poisons the whole state.
    fn is_stale(&self) -> bool {
        self.file.as_ref().is_some_and(|file| !file.is_valid())
    }
}

/// Resolves catalog references against one workspace's `pnpm-workspace.yaml`.
///
/// None of the lookup methods fail: a missing or unreadable configuration
/// behaves like a workspace without catalogs.
///
/// ```no_run
/// use catalog_lens::CatalogResolver;
///
/// let resolver = CatalogResolver::new("/path/to/workspace");
/// if let Some(version) = resolver.resolve("react", "catalog:react18") {
///     println!("react -> {version}");
/// }
/// ```
#[derive(Debug)]
pub struct CatalogResolver<L = PnpmWorkspaceLoader> {
    root: PathBuf,
    loader: L,
    state: RwLock<CachedState>,
}

impl CatalogResolver<PnpmWorkspaceLoader> {
    /// Creates a resolver for the workspace rooted at `root`. Nothing is read yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_loader(root, PnpmWorkspaceLoader)
    }
}

impl<L: ConfigLoader> CatalogResolver<L> {
    /// Creates a resolver that reads catalogs through a custom loader.
    pub fn with_loader(root: impl Into<PathBuf>, loader: L) -> Self {
        Self {
            root: root.into(),
            loader,
            state: RwLock::new(CachedState::default()),
        }
    }

    /// The workspace root this resolver serves.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True if the workspace root holds a `pnpm-workspace.yaml`.
    ///
    /// Only the located file handle is cached; catalogs are not loaded.
    #[must_use]
    pub fn has_workspace(&self) -> bool {
        self.workspace_file().is_some()
    }

    /// The located workspace file, locating it again if the cached handle went stale.
    #[must_use]
    pub fn workspace_file(&self) -> Option<WorkspaceFile> {
        {
            let state = self.state.read();
            if let Some(file) = &state.file
                && file.is_valid()
            {
                return Some(file.clone());
            }
        }

        let mut state = self.state.write();
        if state.is_stale() {
            tracing::debug!(root = %self.root.display(), "Workspace file disappeared, dropping cache");
            *state = CachedState::default();
        }
        if state.file.is_none() {
            state.file = self.loader.locate(&self.root);
        }
        state.file.clone()
    }

    /// Resolves `package` through `reference` to its pinned version.
    ///
    /// Returns `None` when the reference is not a catalog reference, selects no
    /// catalog, names a catalog that does not exist, or when the selected
    /// catalog does not list the package. A named reference never falls back
    /// to the default catalog.
    #[must_use]
    pub fn resolve(&self, package: &str, reference: &str) -> Option<String> {
        let reference = CatalogReference::parse(reference)?;
        let model = self.snapshot();
        let version = model.lookup(&reference, package).map(str::to_string);
        tracing::trace!(
            package,
            reference = %reference,
            version = version.as_deref().unwrap_or("<none>"),
            "Resolved catalog reference"
        );
        version
    }

    /// Resolves every catalog reference found in a `package.json` text.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is not valid JSON. Unresolvable
    /// references are reported with `version: None`, not as errors.
    pub fn resolve_manifest(&self, manifest: &str) -> crate::Result<Vec<ResolvedReference>> {
        let references = scan_manifest(manifest)?;
        Ok(references
            .into_iter()
            .map(|reference| {
                let version = self.resolve(&reference.package, &reference.reference);
                ResolvedReference { reference, version }
            })
            .collect())
    }

    /// The default catalog, loading the configuration if needed.
    #[must_use]
    pub fn default_catalog(&self) -> Option<CatalogTable> {
        self.snapshot().default_catalog().cloned()
    }

    /// All named catalogs, loading the configuration if needed.
    #[must_use]
    pub fn named_catalogs(&self) -> Option<NamedCatalogs> {
        self.snapshot().named_catalogs().cloned()
    }

    /// The current catalog model, loading it if the cache is empty.
    ///
    /// The returned snapshot stays valid and unchanged across later refreshes.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WorkspaceCatalogModel> {
        {
            let state = self.state.read();
            if !state.is_stale()
                && let Some(model) = state.model()
            {
                return model;
            }
        }

        let mut state = self.state.write();
        if state.is_stale() {
            tracing::debug!(root = %self.root.display(), "Workspace file disappeared, dropping cache");
            *state = CachedState::default();
        }
        // Another caller may have loaded while we waited for the write lock.
        if let Some(model) = state.model() {
            return model;
        }

        let next = self.load();
        let model = next.model().unwrap_or_default();
        *state = next;
        model
    }

    /// Forgets the located file and any parsed catalogs.
    ///
    /// The next lookup reads the configuration from disk again. Safe to call at
    /// any time, including before anything was loaded.
    pub fn refresh(&self) {
        *self.state.write() = CachedState::default();
        tracing::debug!(root = %self.root.display(), "Catalog cache cleared");
    }

    /// Refreshes only if the root is a pnpm workspace. Returns whether it did.
    ///
    /// Suited to "application activated" style triggers that fire for every
    /// project, pnpm or not.
    pub fn refresh_if_present(&self) -> bool {
        if !self.has_workspace() {
            return false;
        }
        self.refresh();
        tracing::info!(root = %self.root.display(), "Refreshed pnpm workspace catalogs");
        true
    }

    /// Current cache state.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        match self.state.read().catalogs {
            CatalogState::Unloaded => CacheStatus::Unloaded,
            CatalogState::Loaded(_) => CacheStatus::Loaded,
            CatalogState::LoadFailed(_) => CacheStatus::LoadFailed,
        }
    }

    /// Builds a complete replacement state. Errors are logged and end up as empty catalogs.
    fn load(&self) -> CachedState {
        let Some(file) = self.loader.locate(&self.root) else {
            let err = Error::WorkspaceNotFound {
                path: self.root.clone(),
            };
            tracing::debug!(error = %err, "No catalogs to load");
            return CachedState {
                file: None,
                catalogs: CatalogState::LoadFailed(Arc::new(WorkspaceCatalogModel::empty())),
            };
        };

        let catalogs = match self.loader.parse(&file) {
            Ok(model) => CatalogState::Loaded(Arc::new(model)),
            Err(err) => {
                tracing::warn!(
                    path = %file.path().display(),
                    error = %err,
                    "Failed to load pnpm workspace catalogs, treating them as empty"
                );
                CatalogState::LoadFailed(Arc::new(WorkspaceCatalogModel::empty()))
            }
        };

        CachedState {
            file: Some(file),
            catalogs,
        }
    }
}
