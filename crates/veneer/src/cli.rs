//! The clap command surface.
//!
//! Three commands: `build` compiles brands (optionally in watch mode),
//! `diff` runs the parity checker over two sheets, `list` prints the
//! discovered brands. Each command's `run` returns whether the run
//! passed; `main` turns that into the exit code.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;

use veneer_tokens::{compare_sheets, discover_brands};

use crate::build::{self, BuildOptions, Selection};
use crate::config::Config;
use crate::watch::{self, WatchOptions};

#[derive(Debug, Parser)]
#[command(
    name = "veneer",
    version,
    about = "Compile design-token manifests into brand-scoped CSS variable sheets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build one brand, or every discovered brand.
    Build(BuildCommand),
    /// Compare two generated sheets variable-by-variable.
    Diff(DiffCommand),
    /// List the brands under the themes directory.
    List(ListCommand),
}

impl Cli {
    /// Runs the selected command. `Ok(false)` means the command ran but
    /// the run failed (a brand did not build, parity did not hold).
    pub fn run(self) -> Result<bool> {
        match self.command {
            Commands::Build(command) => command.run(),
            Commands::Diff(command) => command.run(),
            Commands::List(command) => command.run(),
        }
    }
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Brand to build; builds every discovered brand when omitted.
    pub brand: Option<String>,

    /// Rebuild whenever a source manifest or the config file changes.
    #[arg(long)]
    pub watch: bool,

    /// Use the polling watcher (for filesystems without native events).
    #[arg(long, requires = "watch")]
    pub poll: bool,

    /// Directory holding the theme manifests.
    #[arg(long, value_name = "DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Directory the sheets are written to.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Scope the rule to `:root` instead of `[data-theme="<brand>"]`,
    /// for bundling a single brand standalone.
    #[arg(long, requires = "brand")]
    pub root: bool,

    /// Also write the flattened name/value map as `<brand>.tokens.json`.
    #[arg(long)]
    pub dump_json: bool,

    /// Config file path (default: `veneer.toml` when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl BuildCommand {
    pub fn run(&self) -> Result<bool> {
        let config = Config::load(self.config.as_deref())?;
        let options = BuildOptions {
            themes_dir: self
                .themes_dir
                .clone()
                .unwrap_or(config.build.themes_dir),
            out_dir: self.out_dir.clone().unwrap_or(config.build.out_dir),
            root_scope: self.root,
            dump_json: self.dump_json,
        };
        let selection = match &self.brand {
            Some(brand) => Selection::Brands(vec![brand.clone()]),
            None => Selection::All,
        };

        if self.watch {
            let watch_options = WatchOptions {
                debounce: Duration::from_millis(config.watch.debounce_ms),
                poll: self.poll,
                config_path: self.config.clone().or_else(|| {
                    let default = PathBuf::from(crate::config::DEFAULT_CONFIG_FILE);
                    default.is_file().then_some(default)
                }),
            };
            watch::run(&options, &selection, &watch_options)?;
            Ok(true)
        } else {
            let outcome = build::run(&options, &selection)?;
            Ok(outcome.success())
        }
    }
}

#[derive(Debug, Args)]
pub struct DiffCommand {
    /// The sheet whose variables must all be covered.
    pub baseline: PathBuf,
    /// The sheet being checked against the baseline.
    pub candidate: PathBuf,
}

impl DiffCommand {
    pub fn run(&self) -> Result<bool> {
        let baseline = fs::read_to_string(&self.baseline)
            .with_context(|| format!("failed to read {}", self.baseline.display()))?;
        let candidate = fs::read_to_string(&self.candidate)
            .with_context(|| format!("failed to read {}", self.candidate.display()))?;

        let report = compare_sheets(&baseline, &candidate);
        print!("{}", report);

        if report.passed() {
            eprintln!("{}", style("parity ok").green().bold());
            Ok(true)
        } else {
            eprintln!("{}", style("parity check failed").red().bold());
            Ok(false)
        }
    }
}

#[derive(Debug, Args)]
pub struct ListCommand {
    /// Directory holding the theme manifests.
    #[arg(long, value_name = "DIR")]
    pub themes_dir: Option<PathBuf>,

    /// Config file path (default: `veneer.toml` when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ListCommand {
    pub fn run(&self) -> Result<bool> {
        let config = Config::load(self.config.as_deref())?;
        let themes_dir = self
            .themes_dir
            .clone()
            .unwrap_or(config.build.themes_dir);

        let brands = discover_brands(&themes_dir)?;
        if brands.is_empty() {
            eprintln!("no brands under {}", themes_dir.display());
            return Ok(true);
        }
        for brand in brands {
            println!("{}", brand.id);
        }
        Ok(true)
    }
}
