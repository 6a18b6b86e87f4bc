//! Advisory validation of variant metadata.
//!
//! Manifests may carry a `variants` section describing named visual
//! variants in terms of token references (a color role, a spacing step, a
//! radius or shadow key). These never become CSS; they exist for tooling
//! and docs. Validation cross-checks each reference against the merged
//! token set and collects a warning per dangling reference. Output is
//! still generated; this layer is loud but never blocking.

use crate::error::Warning;
use crate::manifest::Manifest;
use crate::resolve::PaletteRole;

/// Checks every variant reference in `manifest` against its own token
/// set. Returns one warning per reference that does not resolve.
pub fn check_variants(manifest: &Manifest) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for (name, spec) in &manifest.variants {
        if let Some(color) = &spec.color {
            if !color_ref_exists(manifest, color) {
                warnings.push(Warning::DanglingVariantRef {
                    variant: name.clone(),
                    field: "color",
                    reference: color.clone(),
                });
            }
        }
        if let Some(index) = spec.spacing {
            if index >= effective_spacing_steps(manifest) {
                warnings.push(Warning::DanglingVariantRef {
                    variant: name.clone(),
                    field: "spacing",
                    reference: index.to_string(),
                });
            }
        }
        if let Some(radius) = &spec.radius {
            if !manifest.size.radius.contains_key(radius) {
                warnings.push(Warning::DanglingVariantRef {
                    variant: name.clone(),
                    field: "radius",
                    reference: radius.clone(),
                });
            }
        }
        if let Some(shadow) = &spec.shadow {
            if !manifest.shadow.base.contains_key(shadow) {
                warnings.push(Warning::DanglingVariantRef {
                    variant: name.clone(),
                    field: "shadow",
                    reference: shadow.clone(),
                });
            }
        }
    }

    warnings
}

/// Resolves a variant color reference: `brand.<key>`, `background.<key>`,
/// `text.<key>`, or a bare single-value role name.
fn color_ref_exists(manifest: &Manifest, reference: &str) -> bool {
    if let Some(role) = PaletteRole::parse(reference) {
        return manifest.color.role(role).is_some();
    }
    match reference.split_once('.') {
        Some(("brand", key)) => manifest.color.brand.contains_key(key),
        Some(("background", key)) => manifest.color.background.contains_key(key),
        Some(("text", key)) => manifest.color.text.contains_key(key),
        _ => false,
    }
}

/// Spacing steps addressable by variants, including the synthesized
/// ninth step when the ramp has exactly eight entries.
fn effective_spacing_steps(manifest: &Manifest) -> usize {
    let steps = manifest.size.spacing.len();
    if steps == 8 {
        9
    } else {
        steps
    }
}
