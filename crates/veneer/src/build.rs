//! Build orchestration: one brand or all of them.
//!
//! A run is a list of independent per-brand units. One brand failing
//! (missing manifest, bad JSON, a family reference cycle) never stops its
//! siblings; the failure is reported and the overall outcome marks the
//! run as failed. Warnings print as they come up and never affect the
//! exit status.
//!
//! Output lands via the atomic writer in `veneer-tokens`, so a failed
//! brand leaves either its previous good sheet or no file at all.

use std::path::PathBuf;

use console::style;

use veneer_tokens::{
    compile, discover_brands, load_brand, write_sheet, write_token_dump, CompileError, Scope,
};

/// Where sources live, where sheets go, and how they are scoped.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub themes_dir: PathBuf,
    pub out_dir: PathBuf,
    /// Emit `:root { ... }` instead of the `data-theme` selector.
    pub root_scope: bool,
    /// Also write `<brand>.tokens.json` next to each sheet.
    pub dump_json: bool,
}

/// Which brands a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every brand discovered under the themes directory.
    All,
    /// An explicit brand list (a single `veneer build <brand>`, or the
    /// affected subset during a watch rebuild).
    Brands(Vec<String>),
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Brands whose sheets were written.
    pub built: Vec<String>,
    /// Brands that failed, with the rendered error.
    pub failed: Vec<(String, String)>,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Builds the selected brands.
///
/// Per-brand failures are captured in the outcome, not returned as
/// errors; `Err` here means the run could not start at all (themes
/// directory unreadable, or nothing to build).
pub fn run(options: &BuildOptions, selection: &Selection) -> anyhow::Result<BuildOutcome> {
    let targets: Vec<String> = match selection {
        Selection::All => {
            let brands = discover_brands(&options.themes_dir)?;
            if brands.is_empty() {
                return Err(CompileError::NoBrands {
                    dir: options.themes_dir.clone(),
                }
                .into());
            }
            brands.into_iter().map(|brand| brand.id).collect()
        }
        Selection::Brands(brands) => brands.clone(),
    };

    let mut outcome = BuildOutcome::default();
    for brand in targets {
        match build_brand(options, &brand) {
            Ok(()) => outcome.built.push(brand),
            Err(err) => {
                eprintln!(
                    "{} brand '{}': {}",
                    style("error:").red().bold(),
                    brand,
                    err
                );
                outcome.failed.push((brand, err.to_string()));
            }
        }
    }

    if !outcome.failed.is_empty() {
        eprintln!(
            "{} {} of {} brands failed",
            style("error:").red().bold(),
            outcome.failed.len(),
            outcome.built.len() + outcome.failed.len()
        );
    }

    Ok(outcome)
}

/// Compiles one brand and writes its outputs.
fn build_brand(options: &BuildOptions, brand: &str) -> veneer_tokens::Result<()> {
    let manifest = load_brand(&options.themes_dir, brand)?;
    let scope = if options.root_scope {
        Scope::Root
    } else {
        Scope::DataTheme(brand.to_string())
    };
    let theme = compile(&manifest, brand, scope)?;

    for warning in &theme.warnings {
        eprintln!("{} {}: {}", style("warning:").yellow().bold(), brand, warning);
    }

    let sheet_path = options.out_dir.join(format!("{}.css", brand));
    write_sheet(&sheet_path, &theme.css)?;
    if options.dump_json {
        let dump_path = options.out_dir.join(format!("{}.tokens.json", brand));
        write_token_dump(&dump_path, &theme.variables)?;
    }

    eprintln!(
        "wrote {} ({} variables)",
        sheet_path.display(),
        theme.variables.len()
    );
    Ok(())
}
