//! # CLI Module
//!
//! Command-line front end for the generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Build the route tree of every service in a manifest and merge the
//! generated files into a project:
//!
//! ```bash
//! routegen generate --manifest services.yaml --out . --module example.com/demo
//! ```
//!
//! Options:
//! - `--manifest <FILE>` - Service manifest, YAML or JSON (required)
//! - `--config <FILE>` - Generator config (default: `<out>/routegen.toml` when present)
//! - `--out <DIR>` - Project root (default: `.`)
//! - `--module <PATH>` - Go module import path
//! - `--sort-router <BOOL>` - Deterministic sibling order (default: `true`)
//! - `--snake-middleware` - snake_case middleware hook names
//! - `--dry-run` - List planned files without writing
//!
//! A fatal error exits non-zero and writes nothing. A router that is
//! already registered is reported as a warning.
//!
//! ### `inspect`
//!
//! Print the named route tree and route table of every service:
//!
//! ```bash
//! routegen inspect --manifest services.yaml
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
