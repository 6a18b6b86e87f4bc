//! Manifest loading, merging, and brand discovery.
//!
//! # Layout
//!
//! A themes directory holds one optional shared manifest plus one
//! subdirectory per brand:
//!
//! ```text
//! themes/
//!   global.manifest.json          shared token set (spacing, fonts, grid, ...)
//!   default/theme.manifest.json   brand token set (palette, overrides)
//!   holiday/theme.manifest.json
//! ```
//!
//! A brand build merges the brand manifest over the global one: brand
//! entries win key-by-key inside each category, and the brand's spacing
//! list (when present) replaces the global list wholesale. Discovery is
//! simply "every subdirectory containing a brand manifest", sorted by
//! name.
//!
//! Top-level sections the schema does not know are kept as raw JSON in
//! [`Manifest::extra`]; the compiler flattens them through default naming
//! instead of rejecting the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CompileError, Result};
use crate::resolve::PaletteRole;
use crate::token::{BackgroundValue, Scalar};

/// File name of a brand manifest inside its brand directory.
pub const BRAND_MANIFEST: &str = "theme.manifest.json";

/// File name of the shared manifest at the themes directory root.
pub const GLOBAL_MANIFEST: &str = "global.manifest.json";

/// A parsed token manifest (brand, global, or the merge of both).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    /// Display name for the generated sheet header.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: ColorSection,
    #[serde(default)]
    pub font: FontSection,
    #[serde(default)]
    pub size: SizeSection,
    #[serde(default)]
    pub shadow: ShadowSection,
    #[serde(default)]
    pub grid: Option<GridSection>,
    /// Optional theming metadata checked advisorily against the token set.
    #[serde(default)]
    pub variants: BTreeMap<String, VariantSpec>,
    /// Unmodeled sections, compiled through default naming.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The `color` section: brand palette, backgrounds, text colors, and the
/// single-value roles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColorSection {
    #[serde(default)]
    pub brand: BTreeMap<String, String>,
    #[serde(default)]
    pub background: BTreeMap<String, BackgroundValue>,
    #[serde(default)]
    pub text: BTreeMap<String, String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default, rename = "focus-ring")]
    pub focus_ring: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub danger: Option<String>,
}

impl ColorSection {
    /// The value for a single-value palette role, if authored.
    pub fn role(&self, role: PaletteRole) -> Option<&str> {
        let value = match role {
            PaletteRole::Border => &self.border,
            PaletteRole::FocusRing => &self.focus_ring,
            PaletteRole::Success => &self.success,
            PaletteRole::Warning => &self.warning,
            PaletteRole::Danger => &self.danger,
        };
        value.as_deref()
    }
}

/// The `font` section: named families and typography scales.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FontSection {
    #[serde(default)]
    pub family: BTreeMap<String, String>,
    #[serde(default)]
    pub scale: BTreeMap<String, ScaleSpec>,
}

/// One typography scale entry. All properties are optional; absent
/// properties are simply not emitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSpec {
    /// Family reference (a logical family name) or a literal font stack.
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub weight: Option<Scalar>,
    #[serde(default)]
    pub size: Option<Scalar>,
    #[serde(default)]
    pub line_height: Option<Scalar>,
    #[serde(default)]
    pub letter_spacing: Option<Scalar>,
}

/// The `size` section: the spacing ramp and radii.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SizeSection {
    /// Spacing steps, indexed from zero in authored order.
    #[serde(default)]
    pub spacing: Vec<Scalar>,
    #[serde(default)]
    pub radius: BTreeMap<String, Scalar>,
}

/// The `shadow` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShadowSection {
    #[serde(default)]
    pub base: BTreeMap<String, String>,
}

/// The `grid` section wrapper.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GridSection {
    #[serde(default)]
    pub system: GridSystem,
}

/// Grid system values: column count, gutter, and container widths.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GridSystem {
    #[serde(default)]
    pub columns: Option<Scalar>,
    #[serde(default)]
    pub gutter: Option<Scalar>,
    #[serde(default)]
    pub container: BTreeMap<String, Scalar>,
}

/// Optional metadata describing a named visual variant in terms of token
/// references. Validated against the merged token set; never emitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VariantSpec {
    /// A palette reference: `brand.<key>`, `background.<key>`,
    /// `text.<key>`, or a bare single-value role name.
    #[serde(default)]
    pub color: Option<String>,
    /// A spacing step index.
    #[serde(default)]
    pub spacing: Option<usize>,
    /// A radius key.
    #[serde(default)]
    pub radius: Option<String>,
    /// A shadow key.
    #[serde(default)]
    pub shadow: Option<String>,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Manifest> {
        serde_json::from_str(json)
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// [`CompileError::Io`] when the file cannot be read,
    /// [`CompileError::Parse`] when it is not a valid manifest.
    pub fn from_file(path: &Path) -> Result<Manifest> {
        let json = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Manifest::from_json(&json).map_err(|source| CompileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merges `overlay` over `self`, returning the combined manifest.
    ///
    /// Map-shaped categories merge key-by-key with overlay entries
    /// winning; scalar fields take the overlay value when present. The
    /// spacing list is replaced wholesale when the overlay authors one,
    /// since splicing a length-sensitive ramp index-by-index would change
    /// its meaning.
    pub fn merge(&self, overlay: &Manifest) -> Manifest {
        let mut merged = self.clone();

        if overlay.name.is_some() {
            merged.name = overlay.name.clone();
        }

        merged
            .color
            .brand
            .extend(overlay.color.brand.iter().map(clone_pair));
        merged
            .color
            .background
            .extend(overlay.color.background.iter().map(clone_pair));
        merged
            .color
            .text
            .extend(overlay.color.text.iter().map(clone_pair));
        for role in PaletteRole::ALL {
            if let Some(value) = overlay.color.role(role) {
                let slot = match role {
                    PaletteRole::Border => &mut merged.color.border,
                    PaletteRole::FocusRing => &mut merged.color.focus_ring,
                    PaletteRole::Success => &mut merged.color.success,
                    PaletteRole::Warning => &mut merged.color.warning,
                    PaletteRole::Danger => &mut merged.color.danger,
                };
                *slot = Some(value.to_string());
            }
        }

        merged
            .font
            .family
            .extend(overlay.font.family.iter().map(clone_pair));
        merged
            .font
            .scale
            .extend(overlay.font.scale.iter().map(clone_pair));

        if !overlay.size.spacing.is_empty() {
            merged.size.spacing = overlay.size.spacing.clone();
        }
        merged
            .size
            .radius
            .extend(overlay.size.radius.iter().map(clone_pair));

        merged
            .shadow
            .base
            .extend(overlay.shadow.base.iter().map(clone_pair));

        merged.grid = match (&self.grid, &overlay.grid) {
            (Some(base), Some(over)) => {
                let mut system = base.system.clone();
                if over.system.columns.is_some() {
                    system.columns = over.system.columns.clone();
                }
                if over.system.gutter.is_some() {
                    system.gutter = over.system.gutter.clone();
                }
                system
                    .container
                    .extend(over.system.container.iter().map(clone_pair));
                Some(GridSection { system })
            }
            (None, Some(over)) => Some(over.clone()),
            (base, None) => base.clone(),
        };

        merged
            .variants
            .extend(overlay.variants.iter().map(clone_pair));
        merged.extra.extend(overlay.extra.iter().map(clone_pair));

        merged
    }

    /// The sheet header name: the manifest's `name`, or the brand id.
    pub fn display_name<'a>(&'a self, brand_id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(brand_id)
    }
}

fn clone_pair<K: Clone, V: Clone>((key, value): (&K, &V)) -> (K, V) {
    (key.clone(), value.clone())
}

/// A discovered brand: its identifier (the directory name) and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: String,
    pub dir: PathBuf,
}

impl Brand {
    /// Path of this brand's manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(BRAND_MANIFEST)
    }
}

/// Enumerates the brands under a themes directory, sorted by id.
///
/// A brand is any subdirectory containing a `theme.manifest.json`. An
/// empty result is not an error here; callers building "all brands"
/// decide whether that is fatal.
///
/// # Errors
///
/// [`CompileError::Io`] when the directory cannot be read.
pub fn discover_brands(themes_dir: &Path) -> Result<Vec<Brand>> {
    let entries = fs::read_dir(themes_dir).map_err(|source| CompileError::Io {
        path: themes_dir.to_path_buf(),
        source,
    })?;

    let mut brands = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CompileError::Io {
            path: themes_dir.to_path_buf(),
            source,
        })?;
        let dir = entry.path();
        if !dir.is_dir() || !dir.join(BRAND_MANIFEST).is_file() {
            continue;
        }
        let id = entry.file_name().to_string_lossy().into_owned();
        brands.push(Brand { id, dir });
    }
    brands.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(brands)
}

/// Loads the merged token set for one brand: the shared global manifest
/// (when present) with the brand manifest merged over it.
///
/// # Errors
///
/// [`CompileError::BrandNotFound`] when the brand has no manifest;
/// [`CompileError::Io`] / [`CompileError::Parse`] for unreadable or
/// invalid files.
pub fn load_brand(themes_dir: &Path, brand_id: &str) -> Result<Manifest> {
    let brand_path = themes_dir.join(brand_id).join(BRAND_MANIFEST);
    if !brand_path.is_file() {
        return Err(CompileError::BrandNotFound {
            brand: brand_id.to_string(),
            path: brand_path,
        });
    }

    let global_path = themes_dir.join(GLOBAL_MANIFEST);
    let global = if global_path.is_file() {
        Manifest::from_file(&global_path)?
    } else {
        Manifest::default()
    };

    let brand = Manifest::from_file(&brand_path)?;
    Ok(global.merge(&brand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, relative: &str, json: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, json).unwrap();
    }

    // =============================================================================
    // Parsing
    // =============================================================================

    #[test]
    fn test_parse_full_manifest() {
        let json = r##"{
            "name": "Default",
            "color": {
                "brand": { "primary": "#00529C" },
                "background": {
                    "page": "#FFFFFF",
                    "hero": { "fill": "linear-gradient(180deg, #00529C, #003B73)", "fallback": "#00529C" }
                },
                "text": { "body": "#1A1A1A" },
                "border": "#D8D8D8",
                "focus-ring": "#0B6EFD"
            },
            "font": {
                "family": { "heading": "Inter, sans-serif", "body": "Georgia, serif" },
                "scale": {
                    "h1": { "family": "heading", "weight": 700, "size": "2.5rem", "lineHeight": 1.2, "letterSpacing": "-0.01em" }
                }
            },
            "size": {
                "spacing": ["0", "4px", "8px"],
                "radius": { "sm": "2px" }
            },
            "shadow": { "base": { "card": "0 2px 4px rgba(0, 0, 0, 0.2)" } },
            "grid": { "system": { "columns": 12, "gutter": "24px", "container": { "md": "960px" } } }
        }"##;
        let manifest = Manifest::from_json(json).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("Default"));
        assert_eq!(manifest.color.brand["primary"], "#00529C");
        assert_eq!(manifest.color.background["hero"].fallback(), "#00529C");
        assert_eq!(manifest.color.role(PaletteRole::FocusRing), Some("#0B6EFD"));
        let h1 = &manifest.font.scale["h1"];
        assert_eq!(h1.family.as_deref(), Some("heading"));
        assert_eq!(h1.line_height.as_ref().unwrap().to_string(), "1.2");
        assert_eq!(manifest.size.spacing.len(), 3);
        assert_eq!(
            manifest.grid.as_ref().unwrap().system.columns.as_ref().unwrap().to_string(),
            "12"
        );
        assert!(manifest.extra.is_empty());
    }

    #[test]
    fn test_unknown_sections_are_retained() {
        let json = r##"{ "motion": { "duration": { "fast": "150ms" } } }"##;
        let manifest = Manifest::from_json(json).unwrap();
        assert!(manifest.extra.contains_key("motion"));
    }

    #[test]
    fn test_empty_manifest_parses() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    // =============================================================================
    // Merging
    // =============================================================================

    #[test]
    fn test_merge_brand_keys_win() {
        let global = Manifest::from_json(
            r##"{ "color": { "brand": { "primary": "#00529C", "secondary": "#5A5A5A" } } }"##,
        )
        .unwrap();
        let brand = Manifest::from_json(r##"{ "color": { "brand": { "primary": "#B3261E" } } }"##).unwrap();

        let merged = global.merge(&brand);
        assert_eq!(merged.color.brand["primary"], "#B3261E");
        assert_eq!(merged.color.brand["secondary"], "#5A5A5A");
    }

    #[test]
    fn test_merge_spacing_replaced_wholesale() {
        let global =
            Manifest::from_json(r##"{ "size": { "spacing": ["0", "4px", "8px", "12px"] } }"##).unwrap();
        let brand = Manifest::from_json(r##"{ "size": { "spacing": ["0", "6px"] } }"##).unwrap();

        let merged = global.merge(&brand);
        assert_eq!(merged.size.spacing.len(), 2);
        assert_eq!(merged.size.spacing[1].to_string(), "6px");
    }

    #[test]
    fn test_merge_keeps_global_spacing_when_brand_has_none() {
        let global = Manifest::from_json(r##"{ "size": { "spacing": ["0", "4px"] } }"##).unwrap();
        let brand = Manifest::from_json("{}").unwrap();
        assert_eq!(global.merge(&brand).size.spacing.len(), 2);
    }

    #[test]
    fn test_merge_grid_per_field() {
        let global = Manifest::from_json(
            r##"{ "grid": { "system": { "columns": 12, "gutter": "24px", "container": { "md": "960px" } } } }"##,
        )
        .unwrap();
        let brand = Manifest::from_json(
            r##"{ "grid": { "system": { "gutter": "16px", "container": { "lg": "1140px" } } } }"##,
        )
        .unwrap();

        let merged = global.merge(&brand);
        let system = &merged.grid.unwrap().system;
        assert_eq!(system.columns.as_ref().unwrap().to_string(), "12");
        assert_eq!(system.gutter.as_ref().unwrap().to_string(), "16px");
        assert_eq!(system.container.len(), 2);
    }

    #[test]
    fn test_merge_name_prefers_overlay() {
        let global = Manifest::from_json(r##"{ "name": "Global" }"##).unwrap();
        let brand = Manifest::from_json(r##"{ "name": "Holiday" }"##).unwrap();
        assert_eq!(global.merge(&brand).name.as_deref(), Some("Holiday"));
        assert_eq!(global.merge(&Manifest::default()).name.as_deref(), Some("Global"));
    }

    // =============================================================================
    // Discovery and loading
    // =============================================================================

    #[test]
    fn test_discover_brands_sorted() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "zeta/theme.manifest.json", "{}");
        write_manifest(dir.path(), "alpha/theme.manifest.json", "{}");
        write_manifest(dir.path(), "global.manifest.json", "{}");
        fs::create_dir(dir.path().join("not-a-brand")).unwrap();

        let brands = discover_brands(dir.path()).unwrap();
        let ids: Vec<&str> = brands.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(brands[0].manifest_path(), dir.path().join("alpha/theme.manifest.json"));
    }

    #[test]
    fn test_load_brand_merges_global() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "global.manifest.json",
            r##"{ "font": { "family": { "heading": "Inter, sans-serif" } } }"##,
        );
        write_manifest(
            dir.path(),
            "default/theme.manifest.json",
            r##"{ "name": "Default", "color": { "brand": { "primary": "#00529C" } } }"##,
        );

        let manifest = load_brand(dir.path(), "default").unwrap();
        assert_eq!(manifest.display_name("default"), "Default");
        assert_eq!(manifest.font.family["heading"], "Inter, sans-serif");
        assert_eq!(manifest.color.brand["primary"], "#00529C");
    }

    #[test]
    fn test_load_brand_without_global() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "default/theme.manifest.json", "{}");
        assert!(load_brand(dir.path(), "default").is_ok());
    }

    #[test]
    fn test_load_missing_brand() {
        let dir = TempDir::new().unwrap();
        let err = load_brand(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, CompileError::BrandNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "broken/theme.manifest.json", "{ not json");
        let err = load_brand(dir.path(), "broken").unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let manifest = Manifest::default();
        assert_eq!(manifest.display_name("default"), "default");
    }
}
