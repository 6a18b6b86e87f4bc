//! Veneer Tokens - design-token manifests compiled to brand stylesheets.
//!
//! This crate turns JSON theme manifests into the CSS custom-property
//! sheets the component library consumes. It provides:
//!
//! - A typed manifest model with global-plus-brand overlay merging
//! - A closed naming grammar mapping token paths to `--variable` names
//! - Derived values: `-rgb` triplets, font-family references, spacing and
//!   container aliases
//! - Deterministic emission: same manifest in, byte-identical sheet out
//! - A parity checker for migrating hand-written sheets to generated ones
//!
//! # Quick Start
//!
//! ```rust
//! use veneer_tokens::{compile, Manifest, Scope};
//!
//! let manifest = Manifest::from_json(r##"{
//!     "name": "Default",
//!     "color": { "brand": { "primary": "#00529C" } },
//!     "font": {
//!         "family": { "heading": "Inter, sans-serif" },
//!         "scale": { "h1": { "family": "heading", "size": "2.5rem" } }
//!     },
//!     "size": { "spacing": ["0", "4px", "8px"] }
//! }"##).unwrap();
//!
//! let theme = compile(&manifest, "default", Scope::DataTheme("default".into())).unwrap();
//!
//! assert!(theme.css.starts_with("/* Theme: Default */"));
//! assert_eq!(theme.variables["--color-brand-primary-rgb"], "0, 82, 156");
//! assert_eq!(theme.variables["--type-h1-family"], "var(--font-heading)");
//! assert_eq!(theme.variables["--space-2"], "8px");
//! assert!(theme.warnings.is_empty());
//! ```
//!
//! # Pipeline
//!
//! ```text
//! themes/global.manifest.json ──┐
//!                               ├─ merge ─ resolve names ─ transform ─ emit
//! themes/<brand>/theme.manifest.json ─┘
//! ```
//!
//! [`load_brand`] merges the optional global manifest under a brand's
//! manifest, [`compile`] walks the merged model through the naming grammar
//! ([`TokenPath`]) and value transforms, and the emitter renders the fixed
//! section layout. [`write_sheet`] lands output atomically so a dev server
//! watching the file never reads a half-written sheet.
//!
//! # Failure Model
//!
//! Compilation fails only on genuinely unresolvable input (a font-family
//! reference cycle, unreadable or malformed manifest files). Everything
//! else degrades: unknown manifest sections still emit variables under a
//! default naming scheme, dangling references emit literals, and each
//! degradation surfaces as a [`Warning`] for the caller to print.

mod compile;
mod emit;
mod error;
mod manifest;
mod parity;
mod resolve;
mod token;
mod transform;
mod validate;

// Re-export public API
pub use compile::{compile, CompiledTheme, SCALE_ORDER};
pub use emit::{render_sheet, write_sheet, write_token_dump, Scope, Section};
pub use error::{CompileError, Result, Warning};
pub use manifest::{
    discover_brands, load_brand, Brand, ColorSection, FontSection, GridSection, GridSystem,
    Manifest, ScaleSpec, ShadowSection, SizeSection, VariantSpec, BRAND_MANIFEST, GLOBAL_MANIFEST,
};
pub use parity::{compare, compare_sheets, extract_variables, ParityReport, ValueDiff};
pub use resolve::{PaletteRole, ScaleProperty, TokenPath};
pub use token::{BackgroundValue, Scalar};
pub use transform::{hex_to_rgb, rgb_triplet, FamilyResolver};
pub use validate::check_variants;
