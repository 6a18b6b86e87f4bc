//! The per-brand compilation pipeline.
//!
//! `compile` walks one merged manifest and produces the finished artifact
//! for a brand: the sheet text, the flat `name: value` map behind it, and
//! every warning raised along the way. All naming goes through
//! [`TokenPath`], all value derivation through [`crate::transform`], and
//! the section layout is fixed:
//!
//! 1. Palette (brand, background, text, single-value roles)
//! 2. Typography Families (plus the conditional weight aliases)
//! 3. Typography Scales (canonical scale order)
//! 4. Spacing (plus the eight-step shim)
//! 5. Radii
//! 6. Shadows
//! 7. Grid (plus container aliases)
//! 8. Other (unmodeled sections, default-named)
//!
//! Everything iterates ordered maps or fixed order tables, so compiling
//! the same manifest twice yields byte-identical output.

use std::collections::BTreeMap;

use crate::emit::{self, Scope, Section};
use crate::error::{Result, Warning};
use crate::manifest::{FontSection, Manifest};
use crate::resolve::{self, PaletteRole, ScaleProperty, TokenPath};
use crate::transform::{self, FamilyResolver};
use crate::validate;

/// Canonical emission order for typography scales. Scales not listed here
/// are emitted afterwards, sorted by name.
pub const SCALE_ORDER: [&str; 11] = [
    "display",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "body-large",
    "body-small",
    "label",
    "small",
];

/// Scale whose heading-family resolution switches on `--font-medium`.
const MEDIUM_WEIGHT_SCALE: &str = "h3";

/// Scale whose heading-family resolution switches on `--font-bold`.
const BOLD_WEIGHT_SCALE: &str = "label";

/// Number of authored spacing steps that triggers the synthesized ninth
/// step, and the value it gets.
const SPACING_SHIM_STEPS: usize = 8;
const SPACING_SHIM_VALUE: &str = "64px";

/// A fully compiled brand theme.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTheme {
    /// Brand identifier (directory name, `data-theme` value).
    pub brand: String,
    /// Header display name.
    pub display_name: String,
    /// Complete sheet text.
    pub css: String,
    /// Flat variable map in name order, as written to the JSON dump.
    pub variables: BTreeMap<String, String>,
    /// Non-fatal diagnostics raised during compilation.
    pub warnings: Vec<Warning>,
}

/// Compiles one brand's merged manifest into its stylesheet.
///
/// # Errors
///
/// Only genuinely unresolvable manifests fail, currently just
/// [`crate::CompileError::FamilyCycle`]. Everything else degrades to a
/// [`Warning`] on the result.
///
/// # Example
///
/// ```
/// use veneer_tokens::{compile, Manifest, Scope};
///
/// let manifest = Manifest::from_json(
///     r##"{ "color": { "brand": { "primary": "#00529C" } } }"##,
/// ).unwrap();
/// let theme = compile(&manifest, "default", Scope::DataTheme("default".into())).unwrap();
///
/// assert!(theme.css.contains("--color-brand-primary: #00529C;"));
/// assert!(theme.css.contains("--color-brand-primary-rgb: 0, 82, 156;"));
/// ```
pub fn compile(manifest: &Manifest, brand_id: &str, scope: Scope) -> Result<CompiledTheme> {
    let mut warnings = Vec::new();
    let resolver = FamilyResolver::new(&manifest.font.family);

    let mut sections = vec![palette_section(manifest)];
    sections.push(families_section(&manifest.font, &resolver)?);
    sections.push(scales_section(&manifest.font, &resolver, &mut warnings));
    sections.push(spacing_section(manifest));
    sections.push(radii_section(manifest));
    sections.push(shadows_section(manifest));
    sections.push(grid_section(manifest));
    sections.push(other_section(manifest, &mut warnings));

    warnings.extend(validate::check_variants(manifest));

    let display_name = manifest.display_name(brand_id).to_string();
    let css = emit::render_sheet(&display_name, &scope, &sections);

    let mut variables = BTreeMap::new();
    for section in &sections {
        for (name, value) in &section.entries {
            variables.insert(name.clone(), value.clone());
        }
    }

    Ok(CompiledTheme {
        brand: brand_id.to_string(),
        display_name,
        css,
        variables,
        warnings,
    })
}

/// Pushes `name: value` and, when the value is a hex color, the derived
/// `-rgb` sibling right behind it.
fn push_color(section: &mut Section, name: String, value: &str) {
    if let Some(triplet) = transform::rgb_triplet(value) {
        section.push(name.clone(), value);
        section.push(format!("{}-rgb", name), triplet);
    } else {
        section.push(name, value);
    }
}

fn palette_section(manifest: &Manifest) -> Section {
    let mut section = Section::new("Palette");
    let color = &manifest.color;

    for (key, value) in &color.brand {
        push_color(&mut section, TokenPath::BrandColor(key.clone()).css_name(), value);
    }

    for (key, value) in &color.background {
        let name = TokenPath::BackgroundColor(key.clone()).css_name();
        section.push(name.clone(), value.fill());
        section.push(format!("{}-fallback", name), value.fallback());
        // RGB always derives from the guaranteed-plain side.
        if let Some(triplet) = transform::rgb_triplet(value.fallback()) {
            section.push(format!("{}-rgb", name), triplet);
        }
    }

    for (key, value) in &color.text {
        push_color(&mut section, TokenPath::TextColor(key.clone()).css_name(), value);
    }

    for role in PaletteRole::ALL {
        if let Some(value) = color.role(role) {
            push_color(&mut section, TokenPath::PaletteColor(role).css_name(), value);
        }
    }

    section
}

fn families_section(font: &FontSection, resolver: &FamilyResolver<'_>) -> Result<Section> {
    let mut section = Section::new("Typography Families");

    let mut keys: Vec<&str> = Vec::new();
    for known in ["heading", "body"] {
        if font.family.contains_key(known) {
            keys.push(known);
        }
    }
    keys.extend(
        font.family
            .keys()
            .map(String::as_str)
            .filter(|key| *key != "heading" && *key != "body"),
    );

    for key in keys {
        let value = resolver.family_value(key)?;
        section.push(TokenPath::FontFamily(key.to_string()).css_name(), value);
    }

    // Legacy weight aliases, emitted only when the designated scales
    // actually resolve their family to the heading stack.
    for (alias, scale) in [("--font-medium", MEDIUM_WEIGHT_SCALE), ("--font-bold", BOLD_WEIGHT_SCALE)] {
        let family = font.scale.get(scale).and_then(|spec| spec.family.as_deref());
        if let Some(family) = family {
            if resolver.terminal_key(family).as_deref() == Some("heading") {
                section.push(alias.to_string(), "var(--font-heading)");
            }
        }
    }

    Ok(section)
}

fn scales_section(
    font: &FontSection,
    resolver: &FamilyResolver<'_>,
    warnings: &mut Vec<Warning>,
) -> Section {
    let mut section = Section::new("Typography Scales");

    let mut order: Vec<&str> = SCALE_ORDER
        .iter()
        .copied()
        .filter(|name| font.scale.contains_key(*name))
        .collect();
    order.extend(
        font.scale
            .keys()
            .map(String::as_str)
            .filter(|name| !SCALE_ORDER.contains(name)),
    );

    for scale in order {
        let spec = &font.scale[scale];
        for property in ScaleProperty::EMIT_ORDER {
            let value = match property {
                ScaleProperty::Family => spec.family.as_ref().map(|family| {
                    let (value, warning) = resolver.scale_family(scale, family);
                    if let Some(warning) = warning {
                        warnings.push(warning);
                    }
                    value
                }),
                ScaleProperty::Weight => spec.weight.as_ref().map(ToString::to_string),
                ScaleProperty::Size => spec.size.as_ref().map(ToString::to_string),
                ScaleProperty::LineHeight => spec.line_height.as_ref().map(ToString::to_string),
                ScaleProperty::LetterSpacing => spec.letter_spacing.as_ref().map(ToString::to_string),
            };
            if let Some(value) = value {
                let path = TokenPath::Scale {
                    scale: scale.to_string(),
                    property,
                };
                section.push(path.css_name(), value);
            }
        }
    }

    section
}

fn spacing_section(manifest: &Manifest) -> Section {
    let mut section = Section::new("Spacing");
    for (index, value) in manifest.size.spacing.iter().enumerate() {
        section.push(TokenPath::Spacing(index).css_name(), value.to_string());
    }
    // Historical component CSS expects a ninth step; synthesize it only
    // for the exact eight-step ramp.
    if manifest.size.spacing.len() == SPACING_SHIM_STEPS {
        section.push(
            TokenPath::Spacing(SPACING_SHIM_STEPS).css_name(),
            SPACING_SHIM_VALUE,
        );
    }
    section
}

fn radii_section(manifest: &Manifest) -> Section {
    let mut section = Section::new("Radii");
    for (key, value) in &manifest.size.radius {
        section.push(TokenPath::Radius(key.clone()).css_name(), value.to_string());
    }
    section
}

fn shadows_section(manifest: &Manifest) -> Section {
    let mut section = Section::new("Shadows");
    for (key, value) in &manifest.shadow.base {
        section.push(TokenPath::Shadow(key.clone()).css_name(), value);
    }
    section
}

fn grid_section(manifest: &Manifest) -> Section {
    let mut section = Section::new("Grid");
    let system = match &manifest.grid {
        Some(grid) => &grid.system,
        None => return section,
    };

    if let Some(columns) = &system.columns {
        section.push(TokenPath::GridColumns.css_name(), columns.to_string());
    }
    if let Some(gutter) = &system.gutter {
        section.push(TokenPath::GridGutter.css_name(), gutter.to_string());
    }
    for (key, value) in &system.container {
        let path = TokenPath::GridContainer(key.clone());
        section.push(path.css_name(), value.to_string());
        if let Some(alias) = path.alias_name() {
            section.push(alias, value.to_string());
        }
    }

    section
}

fn other_section(manifest: &Manifest, warnings: &mut Vec<Warning>) -> Section {
    let mut section = Section::new("Other");

    for (key, value) in &manifest.extra {
        let mut leaves = Vec::new();
        resolve::flatten_json(&[key.clone()], value, &mut leaves);
        for (segments, text) in leaves {
            let parts: Vec<&str> = segments.iter().map(String::as_str).collect();
            let path = TokenPath::parse(&parts);
            if path.is_unrecognized() {
                warnings.push(Warning::UnrecognizedPath {
                    path: segments.join("."),
                });
            }
            section.push(path.css_name(), text);
        }
    }

    section
}
