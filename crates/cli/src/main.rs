//! `catalog-lens` command-line entry point.

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::commands::OutputOptions;
use crate::tracing::{Level, TracingConfig};
use catalog_lens::CatalogResolver;

fn main() -> miette::Result<()> {
    let cli = cli::parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: Level::from(cli.level),
        ..Default::default()
    })?;

    ::tracing::debug!(root = %cli.root.display(), command = ?cli.command, "Running command");

    let resolver = CatalogResolver::new(&cli.root);
    let options = OutputOptions { json: cli.json };
    let mut stdout = std::io::stdout().lock();
    commands::execute(&cli.command, &resolver, options, &mut stdout)?;
    Ok(())
}
