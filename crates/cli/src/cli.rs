use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-lens")]
#[command(about = "Resolve pnpm catalog references to the versions pinned in pnpm-workspace.yaml")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        short = 'r',
        global = true,
        env = "CATALOG_LENS_ROOT",
        default_value = ".",
        help = "Workspace root containing pnpm-workspace.yaml"
    )]
    pub root: PathBuf,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Print command output as JSON")]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Resolve a catalog reference for a package")]
    Resolve {
        #[arg(help = "Package name, e.g. react")]
        package: String,
        #[arg(help = "Catalog reference, e.g. catalog: or catalog:react18")]
        reference: String,
    },
    #[command(about = "List the default and named catalogs")]
    Catalogs,
    #[command(about = "Show every catalog reference in a package.json and what it resolves to")]
    Scan {
        #[arg(help = "Path to the package.json to scan", default_value = "package.json")]
        manifest: PathBuf,
    },
    #[command(about = "Check whether the root is a pnpm workspace")]
    Check,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["catalog-lens", "catalogs"]).unwrap();

        assert_eq!(cli.level, LogLevel::Warn);
        assert_eq!(cli.log_format, TracingFormat::Compact);
        assert!(!cli.json);
        assert_eq!(cli.command, Commands::Catalogs);
    }

    #[test]
    fn test_cli_resolve_arguments() {
        let cli =
            Cli::try_parse_from(["catalog-lens", "resolve", "react", "catalog:react18"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Resolve {
                package: "react".to_string(),
                reference: "catalog:react18".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalog-lens",
            "check",
            "--root",
            "/workspace",
            "-l",
            "debug",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/workspace"));
        assert_eq!(cli.level, LogLevel::Debug);
        assert!(cli.json);
    }

    #[test]
    fn test_cli_scan_default_manifest() {
        let cli = Cli::try_parse_from(["catalog-lens", "scan"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Scan {
                manifest: PathBuf::from("package.json")
            }
        );
    }

    #[test]
    fn test_cli_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["catalog-lens", "--log-format", "xml", "check"]).is_err());
    }

    #[test]
    fn test_cli_resolve_requires_reference() {
        assert!(Cli::try_parse_from(["catalog-lens", "resolve", "react"]).is_err());
    }
}
