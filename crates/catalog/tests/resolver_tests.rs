//! End-to-end resolution against real `pnpm-workspace.yaml` files on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use catalog_lens::{CacheStatus, CatalogResolver, WORKSPACE_FILE_NAME};
use proptest::prelude::*;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const WORKSPACE_YAML: &str = r"
packages:
  - packages/*

catalog:
  react: ^18.3.1
  redux: ^5.0.1

catalogs:
  react17:
    react: ^17.0.2
    react-dom: ^17.0.2

  react18:
    react: ^18.2.0
    react-dom: ^18.2.0
";

fn workspace(yaml: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(WORKSPACE_FILE_NAME), yaml).unwrap();
    temp_dir
}

#[test]
fn test_resolves_default_and_named_catalogs() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());

    assert!(resolver.has_workspace());
    assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^18.3.1"));
    assert_eq!(resolver.resolve("redux", "catalog:").as_deref(), Some("^5.0.1"));
    assert_eq!(
        resolver.resolve("react", "catalog:react17").as_deref(),
        Some("^17.0.2")
    );
    assert_eq!(
        resolver.resolve("react-dom", "catalog:react17").as_deref(),
        Some("^17.0.2")
    );
    assert_eq!(
        resolver.resolve("react", "catalog:react18").as_deref(),
        Some("^18.2.0")
    );
    assert_eq!(
        resolver.resolve("react-dom", "catalog:react18").as_deref(),
        Some("^18.2.0")
    );
}

#[test]
fn test_unknown_package_or_catalog_is_absent() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());

    assert_eq!(resolver.resolve("nonexistent", "catalog:"), None);
    assert_eq!(resolver.resolve("react", "catalog:nonexistent"), None);
    // Named catalogs never fall back to the default one.
    assert_eq!(resolver.resolve("redux", "catalog:react17"), None);
}

#[test]
fn test_invalid_and_unselected_tokens_are_absent() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());

    for token in ["catalogX", "", "foo", "catalogs", "^18.3.1", "catalog", "catalogs:react17"] {
        assert_eq!(resolver.resolve("react", token), None, "token {token:?}");
    }
}

#[test]
fn test_catalog_getters() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());

    let default = resolver.default_catalog().unwrap();
    assert_eq!(default.len(), 2);
    assert_eq!(default["redux"], "^5.0.1");

    let named = resolver.named_catalogs().unwrap();
    assert_eq!(named.keys().collect::<Vec<_>>(), ["react17", "react18"]);
    assert_eq!(named["react18"].len(), 2);
    assert_eq!(resolver.status(), CacheStatus::Loaded);
}

#[test]
fn test_missing_configuration_file() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = CatalogResolver::new(temp_dir.path());

    assert!(!resolver.has_workspace());
    assert!(resolver.workspace_file().is_none());
    assert_eq!(resolver.resolve("react", "catalog:"), None);
    assert!(resolver.default_catalog().is_none());
    assert!(resolver.named_catalogs().is_none());
}

#[test]
fn test_malformed_configuration_degrades_to_empty() {
    let temp_dir = workspace("catalog:\n  react: [unclosed\n");
    let resolver = CatalogResolver::new(temp_dir.path());

    assert!(resolver.has_workspace());
    assert_eq!(resolver.resolve("react", "catalog:"), None);
    assert_eq!(resolver.status(), CacheStatus::LoadFailed);
}

#[test]
fn test_changes_visible_only_after_refresh() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());
    assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^18.3.1"));

    fs::write(
        temp_dir.path().join(WORKSPACE_FILE_NAME),
        "catalog:\n  react: ^19.0.0\n",
    )
    .unwrap();
    assert_eq!(
        resolver.resolve("react", "catalog:").as_deref(),
        Some("^18.3.1"),
        "cached model is kept until refresh"
    );

    resolver.refresh();
    assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^19.0.0"));
    assert_eq!(resolver.resolve("react", "catalog:react17"), None);
}

#[test]
fn test_refresh_picks_up_newly_created_file() {
    let temp_dir = TempDir::new().unwrap();
    let resolver = CatalogResolver::new(temp_dir.path());
    assert_eq!(resolver.resolve("react", "catalog:"), None);

    fs::write(temp_dir.path().join(WORKSPACE_FILE_NAME), WORKSPACE_YAML).unwrap();
    assert_eq!(resolver.resolve("react", "catalog:"), None, "no retries");

    resolver.refresh();
    assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^18.3.1"));
}

#[test]
fn test_deleted_file_invalidates_cache() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());
    assert_eq!(resolver.resolve("react", "catalog:").as_deref(), Some("^18.3.1"));

    fs::remove_file(temp_dir.path().join(WORKSPACE_FILE_NAME)).unwrap();

    assert_eq!(resolver.resolve("react", "catalog:"), None);
    assert!(!resolver.has_workspace());
    assert_eq!(resolver.status(), CacheStatus::LoadFailed);
}

#[test]
fn test_refresh_if_present_only_for_pnpm_workspaces() {
    let pnpm = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(pnpm.path());
    let _ = resolver.snapshot();
    assert!(resolver.refresh_if_present());
    assert_eq!(resolver.status(), CacheStatus::Unloaded);

    let plain = TempDir::new().unwrap();
    assert!(!CatalogResolver::new(plain.path()).refresh_if_present());
}

#[test]
fn test_resolve_manifest() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = CatalogResolver::new(temp_dir.path());
    let manifest = r#"{
        "name": "@example/app",
        "dependencies": {
            "react": "catalog:",
            "redux": "catalog:",
            "react-dom": "catalog:react17",
            "left-pad": "catalog:missing"
        }
    }"#;

    let resolved = resolver.resolve_manifest(manifest).unwrap();
    let pairs: Vec<_> = resolved
        .iter()
        .map(|r| (r.reference.package.as_str(), r.version.as_deref()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("react", Some("^18.3.1")),
            ("redux", Some("^5.0.1")),
            ("react-dom", Some("^17.0.2")),
            ("left-pad", None),
        ]
    );
}

#[test]
fn test_concurrent_reads_racing_refresh() {
    let temp_dir = workspace(WORKSPACE_YAML);
    let resolver = Arc::new(CatalogResolver::new(temp_dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for _ in 0..200 {
                    if i % 4 == 0 {
                        resolver.refresh();
                    }
                    let model = resolver.snapshot();
                    // Either a complete model or nothing, never half of one.
                    let default = model.default_catalog().expect("default catalog");
                    let named = model.named_catalogs().expect("named catalogs");
                    assert_eq!(default.len(), 2);
                    assert_eq!(named.len(), 2);
                    assert_eq!(
                        resolver.resolve("react", "catalog:react18").as_deref(),
                        Some("^18.2.0")
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_resolve_is_stable_between_refreshes(
        package in "[a-z][a-z0-9-]{0,12}",
        token in prop_oneof![
            Just("catalog:".to_string()),
            Just("catalog".to_string()),
            "catalog:[a-z0-9]{1,8}",
            ".*",
        ],
    ) {
        let temp_dir = workspace(WORKSPACE_YAML);
        let resolver = CatalogResolver::new(temp_dir.path());
        let first = resolver.resolve(&package, &token);
        let second = resolver.resolve(&package, &token);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_named_lookup_matches_table(
        package in prop_oneof![Just("react"), Just("react-dom"), Just("redux")],
        catalog in prop_oneof![Just("react17"), Just("react18"), Just("react19")],
    ) {
        let temp_dir = workspace(WORKSPACE_YAML);
        let resolver = CatalogResolver::new(temp_dir.path());
        let expected = resolver
            .named_catalogs()
            .and_then(|named| named.get(catalog).and_then(|t| t.get(package)).cloned());
        prop_assert_eq!(resolver.resolve(package, &format!("catalog:{catalog}")), expected);
    }
}
