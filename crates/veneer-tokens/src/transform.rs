//! Value-level derivations applied before emission.
//!
//! Three independent operations live here:
//!
//! - hex color detection and the derived decimal `R, G, B` triplet that
//!   backs every `<name>-rgb` variable,
//! - font-family reference resolution, turning logical family names into
//!   `var(--font-<key>)` expressions (with cycle checking across family
//!   chains),
//! - background fill/fallback handling is value-shape only and lives on
//!   [`crate::BackgroundValue`]; the emitter decides which side feeds which
//!   variable.
//!
//! All functions are pure; anything unparseable degrades (no `-rgb`
//! sibling, literal emission) instead of failing the build.

use std::collections::BTreeMap;

use crate::error::{CompileError, Result, Warning};

/// Parses a strict `#RRGGBB` hex color, leading `#` optional, case
/// insensitive. Anything else (shorthand hex, gradients, `var(...)`
/// expressions, keywords, an already-derived triplet) returns `None`.
pub fn hex_to_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// The decimal triplet text for a hex color, e.g. `#00529C` to
/// `"0, 82, 156"`. `None` for non-hex values.
pub fn rgb_triplet(value: &str) -> Option<String> {
    hex_to_rgb(value).map(|(r, g, b)| format!("{}, {}, {}", r, g, b))
}

/// Resolves font-family references against the set of declared families.
///
/// A scale's `family` property (and a family value that names another
/// family) is a symbolic reference, not a font stack: `"heading"` means
/// "whatever `--font-heading` is", so it resolves to a `var()` expression
/// and brands can swap stacks without touching every scale.
pub struct FamilyResolver<'a> {
    families: &'a BTreeMap<String, String>,
}

/// Reference names that are recognized even when no such family is
/// declared; resolving one of these without a declaration is a warning,
/// not a literal font stack.
const KNOWN_REFERENCE_NAMES: [&str; 2] = ["heading", "body"];

impl<'a> FamilyResolver<'a> {
    pub fn new(families: &'a BTreeMap<String, String>) -> Self {
        FamilyResolver { families }
    }

    /// The emission value for the `--font-<key>` variable itself.
    ///
    /// A family whose value names another declared family is an alias and
    /// emits `var(--font-<target>)`; the chain behind it must terminate.
    ///
    /// # Errors
    ///
    /// [`CompileError::FamilyCycle`] when the alias chain starting at
    /// `key` loops.
    pub fn family_value(&self, key: &str) -> Result<String> {
        let value = match self.families.get(key) {
            Some(value) => value,
            None => return Ok(String::new()),
        };
        if self.families.contains_key(value.as_str()) {
            self.check_chain(key)?;
            Ok(format!("var(--font-{})", value))
        } else {
            Ok(value.clone())
        }
    }

    /// The emission value for a typography scale's `family` property.
    ///
    /// Declared family names resolve to `var(--font-<key>)`. The known
    /// logical names degrade to a literal plus a warning when undeclared;
    /// any other string is already a literal font stack.
    pub fn scale_family(&self, scale: &str, value: &str) -> (String, Option<Warning>) {
        if self.families.contains_key(value) {
            (format!("var(--font-{})", value), None)
        } else if KNOWN_REFERENCE_NAMES.contains(&value) {
            let warning = Warning::UnresolvedFamily {
                scale: scale.to_string(),
                reference: value.to_string(),
            };
            (value.to_string(), Some(warning))
        } else {
            (value.to_string(), None)
        }
    }

    /// Follows a reference value to the family key its chain terminates
    /// at. `None` when the value is not a reference at all, or when the
    /// chain loops (the cycle itself is reported by [`Self::family_value`]).
    pub fn terminal_key(&self, value: &str) -> Option<String> {
        if !self.families.contains_key(value) {
            return None;
        }
        let mut visited: Vec<&str> = Vec::new();
        let mut current = value;
        while let Some(next) = self.families.get(current) {
            if visited.contains(&current) {
                return None;
            }
            visited.push(current);
            if self.families.contains_key(next.as_str()) {
                current = next;
            } else {
                return Some(current.to_string());
            }
        }
        None
    }

    fn check_chain(&self, start: &str) -> Result<()> {
        let mut chain = vec![start.to_string()];
        let mut current = start;
        loop {
            let next = match self.families.get(current) {
                Some(next) => next,
                None => return Ok(()),
            };
            if !self.families.contains_key(next.as_str()) {
                return Ok(());
            }
            if chain.iter().any(|seen| seen == next) {
                chain.push(next.clone());
                return Err(CompileError::FamilyCycle { chain });
            }
            chain.push(next.clone());
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // =============================================================================
    // Hex parsing
    // =============================================================================

    #[test]
    fn test_hex_to_rgb_brand_blue() {
        assert_eq!(hex_to_rgb("#00529C"), Some((0, 82, 156)));
        assert_eq!(rgb_triplet("#00529C").as_deref(), Some("0, 82, 156"));
    }

    #[test]
    fn test_hex_to_rgb_white() {
        assert_eq!(rgb_triplet("#FFFFFF").as_deref(), Some("255, 255, 255"));
    }

    #[test]
    fn test_hex_without_hash_prefix() {
        assert_eq!(hex_to_rgb("00529c"), Some((0, 82, 156)));
    }

    #[test]
    fn test_hex_lowercase() {
        assert_eq!(rgb_triplet("#ff8000").as_deref(), Some("255, 128, 0"));
    }

    #[test]
    fn test_shorthand_hex_rejected() {
        assert_eq!(hex_to_rgb("#FFF"), None);
    }

    #[test]
    fn test_gradient_is_not_hex() {
        assert_eq!(rgb_triplet("linear-gradient(180deg, #00529C, #003B73)"), None);
    }

    #[test]
    fn test_var_expression_is_not_hex() {
        assert_eq!(rgb_triplet("var(--color-brand-primary)"), None);
    }

    #[test]
    fn test_derived_triplet_is_not_hex() {
        // Re-derivation is a no-op: a triplet never parses as hex again.
        assert_eq!(rgb_triplet("0, 82, 156"), None);
    }

    #[test]
    fn test_non_ascii_value_is_not_hex() {
        assert_eq!(hex_to_rgb("ééé"), None);
    }

    // =============================================================================
    // Family resolution
    // =============================================================================

    #[test]
    fn test_declared_family_resolves_to_var() {
        let families = families(&[("heading", "Inter, sans-serif")]);
        let resolver = FamilyResolver::new(&families);
        let (value, warning) = resolver.scale_family("h1", "heading");
        assert_eq!(value, "var(--font-heading)");
        assert!(warning.is_none());
    }

    #[test]
    fn test_undeclared_known_name_warns_and_degrades() {
        let families = families(&[("body", "Georgia, serif")]);
        let resolver = FamilyResolver::new(&families);
        let (value, warning) = resolver.scale_family("h1", "heading");
        assert_eq!(value, "heading");
        assert_eq!(
            warning,
            Some(Warning::UnresolvedFamily {
                scale: "h1".to_string(),
                reference: "heading".to_string(),
            })
        );
    }

    #[test]
    fn test_literal_font_stack_passes_through() {
        let families = families(&[("heading", "Inter, sans-serif")]);
        let resolver = FamilyResolver::new(&families);
        let (value, warning) = resolver.scale_family("small", "Courier New, monospace");
        assert_eq!(value, "Courier New, monospace");
        assert!(warning.is_none());
    }

    #[test]
    fn test_family_alias_emits_var() {
        let families = families(&[("heading", "Inter, sans-serif"), ("display", "heading")]);
        let resolver = FamilyResolver::new(&families);
        assert_eq!(resolver.family_value("display").unwrap(), "var(--font-heading)");
        assert_eq!(resolver.family_value("heading").unwrap(), "Inter, sans-serif");
    }

    #[test]
    fn test_family_cycle_is_an_error() {
        let families = families(&[("heading", "display"), ("display", "heading")]);
        let resolver = FamilyResolver::new(&families);
        let err = resolver.family_value("heading").unwrap_err();
        match err {
            CompileError::FamilyCycle { chain } => {
                assert_eq!(chain, vec!["heading", "display", "heading"]);
            }
            other => panic!("expected FamilyCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_referential_family_is_a_cycle() {
        let families = families(&[("heading", "heading")]);
        let resolver = FamilyResolver::new(&families);
        assert!(matches!(
            resolver.family_value("heading"),
            Err(CompileError::FamilyCycle { .. })
        ));
    }

    #[test]
    fn test_terminal_key_follows_chains() {
        let families = families(&[
            ("heading", "Inter, sans-serif"),
            ("display", "heading"),
            ("body", "Georgia, serif"),
        ]);
        let resolver = FamilyResolver::new(&families);
        assert_eq!(resolver.terminal_key("heading").as_deref(), Some("heading"));
        assert_eq!(resolver.terminal_key("display").as_deref(), Some("heading"));
        assert_eq!(resolver.terminal_key("body").as_deref(), Some("body"));
        assert_eq!(resolver.terminal_key("Inter, sans-serif"), None);
    }

    #[test]
    fn test_terminal_key_on_cycle_is_none() {
        let families = families(&[("a", "b"), ("b", "a")]);
        let resolver = FamilyResolver::new(&families);
        assert_eq!(resolver.terminal_key("a"), None);
    }
}
