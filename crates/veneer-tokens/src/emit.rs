//! Stylesheet assembly and output writing.
//!
//! The emitter turns an ordered list of labeled sections into one CSS rule
//! block per brand and writes it atomically. Formatting is fixed so that
//! rebuilding unchanged sources produces byte-identical files:
//!
//! ```text
//! /* Theme: Default */
//! /* Generated from theme.manifest.json */
//!
//! [data-theme="default"] {
//!   /* Palette */
//!   --color-brand-primary: #00529C;
//!   --color-brand-primary-rgb: 0, 82, 156;
//!
//!   /* Spacing */
//!   --space-0: 0;
//! }
//! ```
//!
//! Sections with no entries are omitted entirely. Writes go through a
//! temporary file in the destination directory followed by a rename, so a
//! failed build never leaves a half-written sheet; the previous good
//! output survives instead.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{CompileError, Result};

/// Selector scope for a generated rule.
///
/// Brands normally scope under a `data-theme` attribute so several sheets
/// can coexist on one page; a single brand bundled standalone may scope to
/// `:root` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `[data-theme="<brand>"]`
    DataTheme(String),
    /// `:root`
    Root,
}

impl Scope {
    /// The CSS selector text for this scope.
    pub fn selector(&self) -> String {
        match self {
            Scope::DataTheme(brand) => format!("[data-theme=\"{}\"]", brand),
            Scope::Root => ":root".to_string(),
        }
    }
}

/// One labeled group of variable declarations, emitted in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub label: &'static str,
    pub entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(label: &'static str) -> Section {
        Section {
            label,
            entries: Vec::new(),
        }
    }

    /// Appends one `name: value` declaration.
    pub fn push(&mut self, name: String, value: impl Into<String>) {
        self.entries.push((name, value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders the complete sheet text for one brand.
pub fn render_sheet(display_name: &str, scope: &Scope, sections: &[Section]) -> String {
    let mut css = String::new();
    css.push_str(&format!("/* Theme: {} */\n", display_name));
    css.push_str("/* Generated from theme.manifest.json */\n");
    css.push('\n');
    css.push_str(&format!("{} {{\n", scope.selector()));

    let mut first = true;
    for section in sections.iter().filter(|s| !s.is_empty()) {
        if !first {
            css.push('\n');
        }
        first = false;
        css.push_str(&format!("  /* {} */\n", section.label));
        for (name, value) in &section.entries {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
    }

    css.push_str("}\n");
    css
}

/// Writes sheet text to its output path, atomically.
///
/// Parent directories are created as needed. The text lands in a `.tmp`
/// sibling first and is renamed into place, so readers only ever observe
/// a complete file.
///
/// # Errors
///
/// [`CompileError::Io`] with the path that failed.
pub fn write_sheet(path: &Path, css: &str) -> Result<()> {
    write_atomic(path, css.as_bytes())
}

/// Writes the flattened `name: value` dump as pretty-printed JSON, keys
/// sorted, atomically.
pub fn write_token_dump(path: &Path, variables: &BTreeMap<String, String>) -> Result<()> {
    let mut json = serde_json::to_string_pretty(variables).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
    })?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let io_err = |source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
