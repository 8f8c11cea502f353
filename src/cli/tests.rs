//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_generate_command_defaults() {
    let cli = Cli::try_parse_from(["routegen", "generate", "--manifest", "services.yaml"]).unwrap();

    match cli.command {
        Commands::Generate {
            manifest,
            config,
            out,
            module,
            snake_middleware,
            dry_run,
            ..
        } => {
            assert_eq!(manifest.to_string_lossy(), "services.yaml");
            assert!(config.is_none());
            assert_eq!(out.to_string_lossy(), ".");
            assert!(module.is_none());
            assert!(!snake_middleware);
            assert!(!dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_command_with_flags() {
    let cli = Cli::try_parse_from([
        "routegen",
        "generate",
        "-m",
        "services.json",
        "--out",
        "project",
        "--module",
        "example.com/demo",
        "--sort-router",
        "false",
        "--snake-middleware",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            out,
            module,
            sort_router,
            snake_middleware,
            dry_run,
            ..
        } => {
            assert_eq!(out.to_string_lossy(), "project");
            assert_eq!(module.as_deref(), Some("example.com/demo"));
            assert_eq!(sort_router, Some(false));
            assert!(snake_middleware);
            assert!(dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_inspect_command_parses() {
    let cli = Cli::try_parse_from(["routegen", "-v", "inspect", "--manifest", "services.yaml"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Inspect { .. }));
}

#[test]
fn test_manifest_is_required() {
    assert!(Cli::try_parse_from(["routegen", "generate"]).is_err());
}
