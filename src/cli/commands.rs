use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::load_manifest;
use crate::config::GeneratorConfig;
use crate::generator::{build_service_tree, persist, GenerationOutput, Generator, OsFileSystem, TemplateSet};
use crate::logging::{init_logging, LogConfig};
use crate::naming::RunContext;

/// Command-line interface for routegen
///
/// Generates Hertz router code from a service manifest and merges it into
/// an existing project.
#[derive(Parser, Debug)]
#[command(name = "routegen")]
#[command(about = "Route-tree generator for Hertz services", long_about = None, version)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate routers and merge them into the project
    Generate {
        /// Service manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Generator config file (default: <out>/routegen.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Project root to generate into
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Go module import path
        #[arg(long)]
        module: Option<String>,

        /// Keep sibling routes in deterministic order
        #[arg(long)]
        sort_router: Option<bool>,

        /// Use snake_case middleware hook names
        #[arg(long, default_value_t = false)]
        snake_middleware: bool,

        /// Show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the named route tree of every service
    Inspect {
        /// Service manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Generator config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep sibling routes in deterministic order
        #[arg(long)]
        sort_router: Option<bool>,

        /// Use snake_case middleware hook names
        #[arg(long, default_value_t = false)]
        snake_middleware: bool,
    },
}

/// Parse arguments, initialize logging and run the selected command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.log_level = "debug".to_string();
    }
    init_logging(&log_config)?;
    execute(&cli)
}

/// Run an already parsed command.
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate {
            manifest,
            config,
            out,
            module,
            sort_router,
            snake_middleware,
            dry_run,
        } => {
            let mut settings = load_config(config.as_deref(), out)?;
            if let Some(module) = module {
                settings.module = module.clone();
            }
            apply_flags(&mut settings, *sort_router, *snake_middleware);

            let manifest = load_manifest(manifest)?;
            let templates = TemplateSet::with_overrides(settings.template_dir.as_deref(), &settings.disabled_templates)
                .context("Failed to load templates")?;
            let fs = OsFileSystem::new(out);
            let output = Generator::new(&settings, &templates, &fs)
                .generate(&manifest.services)
                .context("Generation aborted, no files were written")?;

            print_summary(&output, *dry_run);
            if !*dry_run {
                persist(&output, out).with_context(|| format!("Failed to write files under {}", out.display()))?;
                info!(files = output.files.len(), warnings = output.warnings.len(), "Generation complete");
            }
            Ok(())
        }
        Commands::Inspect {
            manifest,
            config,
            sort_router,
            snake_middleware,
        } => {
            let mut settings = load_config(config.as_deref(), Path::new("."))?;
            apply_flags(&mut settings, *sort_router, *snake_middleware);
            let manifest = load_manifest(manifest)?;

            let mut run = RunContext::new();
            for service in &manifest.services {
                let tree = build_service_tree(&settings, service, &mut run)
                    .with_context(|| format!("Failed to build routes for service '{}'", service.name))?;
                println!("service {} (package {})", service.name, service.package);
                print!("{}", tree.render_outline());
                for route in tree.routes() {
                    println!("  {:<7} {:<40} {}", route.verb.as_str(), route.path, route.handler);
                }
                println!();
            }
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>, out: &Path) -> Result<GeneratorConfig> {
    let config = match explicit {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::discover(out)?,
    };
    Ok(config.apply_env())
}

fn apply_flags(config: &mut GeneratorConfig, sort_router: Option<bool>, snake_middleware: bool) {
    if let Some(sort) = sort_router {
        config.sort_router = sort;
    }
    if snake_middleware {
        config.snake_style_middleware = true;
    }
}

fn print_summary(output: &GenerationOutput, dry_run: bool) {
    let verb = if dry_run { "would write" } else { "writing" };
    for file in &output.files {
        let status = if file.is_new_file { "new" } else { "update" };
        println!("{verb} [{status}] {}", file.path.display());
    }
    for warning in &output.warnings {
        warn!("{warning}");
    }
    if output.files.is_empty() {
        println!("nothing to do");
    }
}
