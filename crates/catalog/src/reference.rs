//! Catalog reference tokens.
//!
//! A package manifest pins a dependency to a catalog by writing a reference
//! token where the version would normally go:
//!
//! ```json
//! {
//!   "dependencies": {
//!     "react": "catalog:",
//!     "react-dom": "catalog:react17"
//!   }
//! }
//! ```
//!
//! `catalog:` selects the default catalog, `catalog:<name>` selects a named
//! catalog. The bare keyword `catalog` is accepted as a reference but selects
//! nothing.

use std::fmt;
use std::str::FromStr;

/// The keyword every catalog reference starts with.
pub const CATALOG_KEYWORD: &str = "catalog";

/// The shorthand token selecting the default catalog.
pub const CATALOG_PREFIX: &str = "catalog:";

/// Returns true if `token` is syntactically a catalog reference.
///
/// The token must start with `catalog` and either be exactly `catalog` or
/// contain a colon. `catalogs` and `catalogfoo` are rejected; `catalogs:x`
/// is accepted, although it selects no catalog.
///
/// ```
/// use catalog_lens::is_valid_catalog_reference;
///
/// assert!(is_valid_catalog_reference("catalog"));
/// assert!(is_valid_catalog_reference("catalog:"));
/// assert!(is_valid_catalog_reference("catalog:react17"));
/// assert!(!is_valid_catalog_reference("catalogs"));
/// assert!(!is_valid_catalog_reference("^18.3.1"));
/// ```
#[must_use]
pub fn is_valid_catalog_reference(token: &str) -> bool {
    if !token.starts_with(CATALOG_KEYWORD) {
        return false;
    }
    if token == CATALOG_KEYWORD {
        return true;
    }
    if !token.contains(':') {
        return false;
    }
    token == CATALOG_PREFIX || token.len() > CATALOG_PREFIX.len()
}

/// A parsed catalog reference and the catalog it selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogReference {
    /// `catalog:` - the default catalog.
    Default,
    /// `catalog:<name>` - a named catalog.
    Named(String),
    /// A valid reference that selects no catalog, such as the bare `catalog`.
    ///
    /// Holds the original token so it can be rendered back unchanged.
    Unselected(String),
}

impl CatalogReference {
    /// Parses a reference token, returning `None` if it is not a catalog reference.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if !is_valid_catalog_reference(token) {
            return None;
        }
        if token == CATALOG_PREFIX {
            return Some(Self::Default);
        }
        match token.strip_prefix(CATALOG_PREFIX) {
            Some(name) if !name.is_empty() => Some(Self::Named(name.to_string())),
            _ => Some(Self::Unselected(token.to_string())),
        }
    }

    /// Name of the selected named catalog, if any.
    #[must_use]
    pub fn catalog_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Default | Self::Unselected(_) => None,
        }
    }

    /// Whether this reference selects any catalog at all.
    #[must_use]
    pub fn selects_catalog(&self) -> bool {
        !matches!(self, Self::Unselected(_))
    }
}

impl fmt::Display for CatalogReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(CATALOG_PREFIX),
            Self::Named(name) => write!(f, "{CATALOG_PREFIX}{name}"),
            Self::Unselected(token) => f.write_str(token),
        }
    }
}

/// Error returned when parsing a string that is not a catalog reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a catalog reference")]
pub struct InvalidReference(
    /// The rejected token.
    pub String,
);

impl FromStr for CatalogReference {
    type Err = InvalidReference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidReference(s.to_string()))
    }
}
