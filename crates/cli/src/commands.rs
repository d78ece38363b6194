//! Subcommand implementations.
//!
//! Each command writes its result to the supplied writer; `main` hands in stdout.

use crate::cli::Commands;
use crate::errors::CliError;
use catalog_lens::{
    CatalogResolver, CatalogTable, ResolvedReference, WorkspaceCatalogModel, read_manifest,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output options shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Serialize)]
struct Resolution<'a> {
    package: &'a str,
    reference: &'a str,
    version: &'a str,
}

pub fn execute(
    command: &Commands,
    resolver: &CatalogResolver,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Commands::Resolve { package, reference } => {
            resolve(resolver, package, reference, options, out)
        }
        Commands::Catalogs => catalogs(resolver, options, out),
        Commands::Scan { manifest } => scan(resolver, manifest, options, out),
        Commands::Check => check(resolver, options, out),
    }
}

fn require_workspace(resolver: &CatalogResolver) -> Result<(), CliError> {
    if resolver.has_workspace() {
        Ok(())
    } else {
        Err(CliError::NotAWorkspace {
            root: resolver.root().to_path_buf(),
        })
    }
}

fn resolve(
    resolver: &CatalogResolver,
    package: &str,
    reference: &str,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if !catalog_lens::is_valid_catalog_reference(reference) {
        return Err(CliError::InvalidReference {
            reference: reference.to_string(),
        });
    }
    require_workspace(resolver)?;

    let Some(version) = resolver.resolve(package, reference) else {
        return Err(CliError::Unresolved {
            package: package.to_string(),
            reference: reference.to_string(),
        });
    };

    if options.json {
        let resolution = Resolution {
            package,
            reference,
            version: &version,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?;
    } else {
        writeln!(out, "{version}")?;
    }
    Ok(())
}

fn catalogs(
    resolver: &CatalogResolver,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    require_workspace(resolver)?;
    let model = resolver.snapshot();

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(model.as_ref())?)?;
        return Ok(());
    }

    write_catalogs(&model, out)
}

fn write_catalogs(model: &WorkspaceCatalogModel, out: &mut impl Write) -> Result<(), CliError> {
    if model.is_empty() {
        writeln!(out, "No catalogs defined")?;
        return Ok(());
    }

    if let Some(table) = model.default_catalog() {
        write_table(out, catalog_lens::CATALOG_PREFIX, table)?;
    }
    for name in model.catalog_names() {
        if let Some(table) = model.named_catalog(name) {
            write_table(out, &format!("{}{name}", catalog_lens::CATALOG_PREFIX), table)?;
        }
    }
    Ok(())
}

fn write_table(out: &mut impl Write, heading: &str, table: &CatalogTable) -> Result<(), CliError> {
    writeln!(out, "{heading}")?;
    let width = table.keys().map(String::len).max().unwrap_or(0);
    for (package, version) in table {
        writeln!(out, "  {package:<width$}  {version}")?;
    }
    Ok(())
}

fn scan(
    resolver: &CatalogResolver,
    manifest: &Path,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    require_workspace(resolver)?;

    let resolved: Vec<ResolvedReference> = read_manifest(manifest)?
        .into_iter()
        .map(|reference| {
            let version = resolver.resolve(&reference.package, &reference.reference);
            ResolvedReference { reference, version }
        })
        .collect();
    tracing::debug!(manifest = %manifest.display(), references = resolved.len(), "Scanned manifest");

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&resolved)?)?;
        return Ok(());
    }

    for entry in &resolved {
        let location = if entry.reference.section.is_empty() {
            entry.reference.package.clone()
        } else {
            format!("{}.{}", entry.reference.section, entry.reference.package)
        };
        // Unresolved references show the same placeholder an editor fold would.
        let version = entry.version.as_deref().unwrap_or("...");
        writeln!(out, "{location}\t{}\t\"{version}\"", entry.reference.reference)?;
    }
    Ok(())
}

fn check(
    resolver: &CatalogResolver,
    options: OutputOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(file) = resolver.workspace_file() else {
        return Err(CliError::NotAWorkspace {
            root: resolver.root().to_path_buf(),
        });
    };

    if options.json {
        let body = serde_json::json!({ "workspace": file.path().display().to_string() });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        writeln!(out, "{}", file.path().display())?;
    }
    Ok(())
}
