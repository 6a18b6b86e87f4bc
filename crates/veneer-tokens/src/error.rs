//! Error and warning types for theme compilation.
//!
//! Fatal conditions (a brand that cannot be built at all) are [`CompileError`]
//! values. Everything else the compiler can recover from is a [`Warning`]:
//! warnings are collected into the build output and reported, but never stop
//! CSS generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a single brand's build.
///
/// When building all brands, a failing brand is skipped and its siblings
/// still build; the overall run is reported as failed at the end.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The themes directory has no subdirectory for the requested brand,
    /// or the brand directory has no manifest file.
    #[error("brand '{brand}' not found: missing {}", path.display())]
    BrandNotFound { brand: String, path: PathBuf },

    /// The themes directory contains no brand manifests at all.
    #[error("no brands found under {}", dir.display())]
    NoBrands { dir: PathBuf },

    /// Reading a manifest or writing an output file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest file is not valid JSON or does not match the token schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Font-family references form a loop and can never resolve.
    #[error("cycle in font family references: {}", chain.join(" -> "))]
    FamilyCycle { chain: Vec<String> },
}

/// Result type for compilation operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Non-fatal diagnostics collected during a build.
///
/// A warning never blocks output; the sheet is still written and the
/// warning is surfaced alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A typography scale references a font family that is not declared.
    /// The reference name is emitted as a literal value.
    UnresolvedFamily { scale: String, reference: String },

    /// A token path did not match any known category; its variable name
    /// was produced by the hyphen-joined default rule.
    UnrecognizedPath { path: String },

    /// A variant definition points at a token that does not exist in the
    /// merged token set.
    DanglingVariantRef {
        variant: String,
        field: &'static str,
        reference: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnresolvedFamily { scale, reference } => {
                write!(
                    f,
                    "scale '{}' references undeclared font family '{}'; emitting it literally",
                    scale, reference
                )
            }
            Warning::UnrecognizedPath { path } => {
                write!(f, "unrecognized token path '{}'; using default naming", path)
            }
            Warning::DanglingVariantRef {
                variant,
                field,
                reference,
            } => {
                write!(
                    f,
                    "variant '{}' {} references '{}', which is not in the token set",
                    variant, field, reference
                )
            }
        }
    }
}
