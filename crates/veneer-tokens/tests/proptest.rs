//! Property-based tests for the token compiler using proptest.

use proptest::prelude::*;

use veneer_tokens::{compare, compare_sheets, compile, hex_to_rgb, rgb_triplet, Manifest, Scope, TokenPath};

// ============================================================================
// Strategies
// ============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

fn segments_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 0..6)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Every RGB triple formats to a hex color that parses back to itself.
    #[test]
    fn hex_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let hex = format!("#{:02X}{:02X}{:02X}", r, g, b);
        prop_assert_eq!(hex_to_rgb(&hex), Some((r, g, b)));
        prop_assert_eq!(hex_to_rgb(&hex.to_lowercase()), Some((r, g, b)));
    }

    /// A derived triplet is never itself hex: re-derivation is a no-op.
    #[test]
    fn derived_triplet_never_rederives(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let triplet = rgb_triplet(&format!("{:02x}{:02x}{:02x}", r, g, b)).unwrap();
        prop_assert_eq!(rgb_triplet(&triplet), None);
    }

    /// Wrong-length hex strings never parse.
    #[test]
    fn wrong_length_hex_rejected(digits in "[0-9a-fA-F]{0,12}") {
        prop_assume!(digits.len() != 6);
        prop_assert_eq!(hex_to_rgb(&format!("#{}", digits)), None);
    }

    /// Name resolution is total: any path produces a `--` name without
    /// panicking, and parsing the same path twice gives the same name.
    #[test]
    fn resolver_is_total_and_deterministic(segments in segments_strategy()) {
        let parts: Vec<&str> = segments.iter().map(String::as_str).collect();
        let name = TokenPath::parse(&parts).css_name();
        prop_assert!(name.starts_with("--"));
        prop_assert_eq!(TokenPath::parse(&parts).css_name(), name);
    }

    /// Known categories never fall through to default naming.
    #[test]
    fn known_categories_are_recognized(key in key_strategy()) {
        for parts in [
            vec!["color", "brand", key.as_str()],
            vec!["color", "background", key.as_str()],
            vec!["color", "text", key.as_str()],
            vec!["font", "family", key.as_str()],
            vec!["size", "radius", key.as_str()],
            vec!["shadow", "base", key.as_str()],
            vec!["grid", "system", "container", key.as_str()],
        ] {
            prop_assert!(!TokenPath::parse(&parts).is_unrecognized());
        }
    }

    /// Compiling a palette of arbitrary hex colors always yields the
    /// color variable, its `-rgb` sibling, and a sheet at parity with
    /// itself.
    #[test]
    fn compiled_palette_self_parity(
        colors in prop::collection::btree_map(key_strategy(), (any::<u8>(), any::<u8>(), any::<u8>()), 1..8),
    ) {
        let brand: serde_json::Map<String, serde_json::Value> = colors
            .iter()
            .map(|(key, (r, g, b))| {
                (key.clone(), serde_json::Value::String(format!("#{:02X}{:02X}{:02X}", r, g, b)))
            })
            .collect();
        let manifest_json = serde_json::json!({ "color": { "brand": brand } }).to_string();
        let manifest = Manifest::from_json(&manifest_json).unwrap();
        let theme = compile(&manifest, "default", Scope::Root).unwrap();

        for (key, (r, g, b)) in &colors {
            let name = format!("--color-brand-{}", key);
            prop_assert_eq!(&theme.variables[&name], &format!("#{:02X}{:02X}{:02X}", r, g, b));
            prop_assert_eq!(
                &theme.variables[&format!("{}-rgb", name)],
                &format!("{}, {}, {}", r, g, b)
            );
        }

        let report = compare_sheets(&theme.css, &theme.css);
        prop_assert!(report.passed());
        prop_assert_eq!(report.matched, theme.variables.len());
    }

    /// Parity is asymmetric in the right direction: a candidate superset
    /// passes, but the reversed comparison reports the missing names.
    #[test]
    fn superset_parity_is_one_way(
        base in prop::collection::btree_map("--[a-z]{1,8}", "[a-z0-9]{1,8}", 1..6),
        extra_name in "--x-[a-z]{1,8}",
        extra_value in "[a-z0-9]{1,8}",
    ) {
        let mut superset = base.clone();
        superset.insert(extra_name, extra_value);

        let forward = compare(&base, &superset);
        prop_assert!(forward.passed());
        prop_assert_eq!(forward.extra.len(), 1);

        let reverse = compare(&superset, &base);
        prop_assert!(!reverse.passed());
        prop_assert_eq!(reverse.missing.len(), 1);
    }
}
