//! Token path resolution: hierarchical manifest paths to flat CSS
//! custom-property names.
//!
//! # Design
//!
//! Every token the compiler emits is named by one fixed grammar, so the
//! component layer can rely on variable names never drifting between
//! builds or brands. Category dispatch is a closed enum ([`TokenPath`])
//! rather than string probing, which keeps the mapping exhaustive: adding
//! a category without a naming rule is a compile error here, not a silent
//! fallthrough at runtime.
//!
//! ## Naming grammar
//!
//! | path shape | variable name |
//! |------------|---------------|
//! | `color.brand.<key>` | `--color-brand-<key>` |
//! | `color.background.<key>` | `--color-bg-<key>` |
//! | `color.text.<key>` | `--color-text-<key>` |
//! | `color.<role>` (border, focus-ring, success, warning, danger) | `--color-<role>` |
//! | `font.family.<key>` | `--font-<key>` |
//! | `font.scale.<scale>.<property>` | `--type-<scale>-<mapped property>` |
//! | `size.spacing.<index>` | `--space-<index>` |
//! | `size.radius.<key>` | `--radius-<key>` |
//! | `shadow.base.<key>` | `--shadow-<key>` |
//! | `grid.system.columns` / `.gutter` | `--grid-columns` / `--grid-gutter` |
//! | `grid.system.container.<key>` | `--grid-container-<key>` plus alias `--container-<key>` |
//!
//! Paths that match none of these shapes resolve through the hyphen-joined
//! default (`--a-b-c` for path `a.b.c`). That escape hatch means a manifest
//! with a token category this compiler has never heard of still builds; the
//! entry is named mechanically and reported as a warning by the caller.
//!
//! Resolution is a pure, total function: it never fails and never touches
//! token values.

use std::fmt;

/// The five single-value palette roles that live directly under `color.*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaletteRole {
    Border,
    FocusRing,
    Success,
    Warning,
    Danger,
}

impl PaletteRole {
    /// All roles, in emission order.
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Border,
        PaletteRole::FocusRing,
        PaletteRole::Success,
        PaletteRole::Warning,
        PaletteRole::Danger,
    ];

    /// The manifest key and CSS name segment for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteRole::Border => "border",
            PaletteRole::FocusRing => "focus-ring",
            PaletteRole::Success => "success",
            PaletteRole::Warning => "warning",
            PaletteRole::Danger => "danger",
        }
    }

    /// Parses a manifest key into a role.
    pub fn parse(key: &str) -> Option<PaletteRole> {
        match key {
            "border" => Some(PaletteRole::Border),
            "focus-ring" => Some(PaletteRole::FocusRing),
            "success" => Some(PaletteRole::Success),
            "warning" => Some(PaletteRole::Warning),
            "danger" => Some(PaletteRole::Danger),
            _ => None,
        }
    }
}

impl fmt::Display for PaletteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typography scale leaf property.
///
/// Manifest keys use the camelCase spelling; the CSS suffix follows the
/// established variable names (`lineHeight` becomes `line`,
/// `letterSpacing` becomes `spacing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleProperty {
    Family,
    Weight,
    Size,
    LineHeight,
    LetterSpacing,
}

impl ScaleProperty {
    /// Emission order within one scale.
    pub const EMIT_ORDER: [ScaleProperty; 5] = [
        ScaleProperty::Family,
        ScaleProperty::Weight,
        ScaleProperty::Size,
        ScaleProperty::LineHeight,
        ScaleProperty::LetterSpacing,
    ];

    /// The key used in manifest JSON.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            ScaleProperty::Family => "family",
            ScaleProperty::Weight => "weight",
            ScaleProperty::Size => "size",
            ScaleProperty::LineHeight => "lineHeight",
            ScaleProperty::LetterSpacing => "letterSpacing",
        }
    }

    /// The suffix used in the emitted variable name.
    pub fn css_suffix(&self) -> &'static str {
        match self {
            ScaleProperty::Family => "family",
            ScaleProperty::Weight => "weight",
            ScaleProperty::Size => "size",
            ScaleProperty::LineHeight => "line",
            ScaleProperty::LetterSpacing => "spacing",
        }
    }

    /// Parses a manifest property key.
    pub fn parse(key: &str) -> Option<ScaleProperty> {
        match key {
            "family" => Some(ScaleProperty::Family),
            "weight" => Some(ScaleProperty::Weight),
            "size" => Some(ScaleProperty::Size),
            "lineHeight" => Some(ScaleProperty::LineHeight),
            "letterSpacing" => Some(ScaleProperty::LetterSpacing),
            _ => None,
        }
    }
}

/// A token's position in the category hierarchy.
///
/// [`TokenPath::parse`] classifies a raw dotted path; [`TokenPath::css_name`]
/// renders the flat variable name. Paths that fit no known category land in
/// [`TokenPath::Other`], which names itself by joining the segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPath {
    /// `color.brand.<key>`
    BrandColor(String),
    /// `color.background.<key>`
    BackgroundColor(String),
    /// `color.text.<key>`
    TextColor(String),
    /// `color.<role>` for the single-value roles.
    PaletteColor(PaletteRole),
    /// `font.family.<key>`
    FontFamily(String),
    /// `font.scale.<scale>.<property>`
    Scale {
        scale: String,
        property: ScaleProperty,
    },
    /// `size.spacing.<index>`
    Spacing(usize),
    /// `size.radius.<key>`
    Radius(String),
    /// `shadow.base.<key>`
    Shadow(String),
    /// `grid.system.columns`
    GridColumns,
    /// `grid.system.gutter`
    GridGutter,
    /// `grid.system.container.<key>`
    GridContainer(String),
    /// Anything else; named by the hyphen-joined default.
    Other(Vec<String>),
}

impl TokenPath {
    /// Classifies a path given as raw segments.
    ///
    /// Total: every input produces a variant, unknown shapes become
    /// [`TokenPath::Other`].
    pub fn parse(segments: &[&str]) -> TokenPath {
        match segments {
            ["color", "brand", key] => TokenPath::BrandColor((*key).to_string()),
            ["color", "background", key] => TokenPath::BackgroundColor((*key).to_string()),
            ["color", "text", key] => TokenPath::TextColor((*key).to_string()),
            ["color", role] => match PaletteRole::parse(role) {
                Some(role) => TokenPath::PaletteColor(role),
                None => TokenPath::other(segments),
            },
            ["font", "family", key] => TokenPath::FontFamily((*key).to_string()),
            ["font", "scale", scale, property] => match ScaleProperty::parse(property) {
                Some(property) => TokenPath::Scale {
                    scale: (*scale).to_string(),
                    property,
                },
                None => TokenPath::other(segments),
            },
            ["size", "spacing", index] => match index.parse::<usize>() {
                Ok(index) => TokenPath::Spacing(index),
                Err(_) => TokenPath::other(segments),
            },
            ["size", "radius", key] => TokenPath::Radius((*key).to_string()),
            ["shadow", "base", key] => TokenPath::Shadow((*key).to_string()),
            ["grid", "system", "columns"] => TokenPath::GridColumns,
            ["grid", "system", "gutter"] => TokenPath::GridGutter,
            ["grid", "system", "container", key] => TokenPath::GridContainer((*key).to_string()),
            _ => TokenPath::other(segments),
        }
    }

    fn other(segments: &[&str]) -> TokenPath {
        TokenPath::Other(segments.iter().map(|s| (*s).to_string()).collect())
    }

    /// Renders the flat CSS custom-property name for this path.
    pub fn css_name(&self) -> String {
        match self {
            TokenPath::BrandColor(key) => format!("--color-brand-{}", key),
            TokenPath::BackgroundColor(key) => format!("--color-bg-{}", key),
            TokenPath::TextColor(key) => format!("--color-text-{}", key),
            TokenPath::PaletteColor(role) => format!("--color-{}", role),
            TokenPath::FontFamily(key) => format!("--font-{}", key),
            TokenPath::Scale { scale, property } => {
                format!("--type-{}-{}", scale, property.css_suffix())
            }
            TokenPath::Spacing(index) => format!("--space-{}", index),
            TokenPath::Radius(key) => format!("--radius-{}", key),
            TokenPath::Shadow(key) => format!("--shadow-{}", key),
            TokenPath::GridColumns => "--grid-columns".to_string(),
            TokenPath::GridGutter => "--grid-gutter".to_string(),
            TokenPath::GridContainer(key) => format!("--grid-container-{}", key),
            TokenPath::Other(segments) => format!("--{}", segments.join("-")),
        }
    }

    /// A second name emitted for the same value, where the grammar defines
    /// one. Only grid containers carry an alias (`--container-<key>`, kept
    /// for component CSS written against the shorter name).
    pub fn alias_name(&self) -> Option<String> {
        match self {
            TokenPath::GridContainer(key) => Some(format!("--container-{}", key)),
            _ => None,
        }
    }

    /// Whether this path fell through to default naming.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, TokenPath::Other(_))
    }

    /// The dotted source form, used in diagnostics.
    pub fn dotted(&self) -> String {
        match self {
            TokenPath::BrandColor(key) => format!("color.brand.{}", key),
            TokenPath::BackgroundColor(key) => format!("color.background.{}", key),
            TokenPath::TextColor(key) => format!("color.text.{}", key),
            TokenPath::PaletteColor(role) => format!("color.{}", role),
            TokenPath::FontFamily(key) => format!("font.family.{}", key),
            TokenPath::Scale { scale, property } => {
                format!("font.scale.{}.{}", scale, property.manifest_key())
            }
            TokenPath::Spacing(index) => format!("size.spacing.{}", index),
            TokenPath::Radius(key) => format!("size.radius.{}", key),
            TokenPath::Shadow(key) => format!("shadow.base.{}", key),
            TokenPath::GridColumns => "grid.system.columns".to_string(),
            TokenPath::GridGutter => "grid.system.gutter".to_string(),
            TokenPath::GridContainer(key) => format!("grid.system.container.{}", key),
            TokenPath::Other(segments) => segments.join("."),
        }
    }
}

/// Flattens an arbitrary JSON value into `(path segments, value text)`
/// leaves, depth-first with object keys sorted.
///
/// This is the graceful-degradation path for manifest sections the schema
/// does not model: each leaf is later named through [`TokenPath::parse`],
/// which sends unknown shapes to the default joiner. JSON nulls produce no
/// leaf.
pub fn flatten_json(prefix: &[String], value: &serde_json::Value, out: &mut Vec<(Vec<String>, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                let mut path = prefix.to_vec();
                path.push(key.clone());
                flatten_json(&path, &map[key], out);
            }
        }
        serde_json::Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let mut path = prefix.to_vec();
                path.push(index.to_string());
                flatten_json(&path, item, out);
            }
        }
        serde_json::Value::String(text) => out.push((prefix.to_vec(), text.clone())),
        serde_json::Value::Number(number) => out.push((prefix.to_vec(), number.to_string())),
        serde_json::Value::Bool(flag) => out.push((prefix.to_vec(), flag.to_string())),
        serde_json::Value::Null => {}
    }
}
