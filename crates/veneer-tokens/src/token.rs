//! Raw token value types.
//!
//! Manifests author values either as bare scalars (strings or numbers) or,
//! for background colors, as a structured fill/fallback pair. Both shapes
//! are modeled explicitly here so the rest of the pipeline never inspects
//! JSON values directly.

use std::fmt;

use serde::Deserialize;

/// A scalar manifest value: a JSON string or a JSON number.
///
/// Token values like spacing steps, font weights, and grid column counts
/// are commonly authored as numbers (`"weight": 700`), while lengths and
/// font stacks are strings. Both render to CSS text through [`fmt::Display`];
/// numbers keep their canonical JSON representation, so rebuilds are
/// byte-stable.
///
/// # Example
///
/// ```
/// use veneer_tokens::Scalar;
///
/// let weight: Scalar = serde_json::from_str("700").unwrap();
/// assert_eq!(weight.to_string(), "700");
///
/// let size: Scalar = serde_json::from_str("\"2.5rem\"").unwrap();
/// assert_eq!(size.to_string(), "2.5rem");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A JSON number (integer or float).
    Number(serde_json::Number),
    /// A JSON string, emitted verbatim.
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(serde_json::Number::from(value))
    }
}

/// A background-color token value.
///
/// Backgrounds are the one category where a single token can carry two
/// values: a primary `fill` that may be a gradient or another value that
/// is unusable in contexts like `border-color`, and a `fallback` that is
/// guaranteed to be a plain color. A bare string stands for both.
///
/// Emission always produces both the fill variable and the `-fallback`
/// variable, whichever shape was authored; RGB derivation reads only the
/// fallback side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BackgroundValue {
    /// Structured form: `{ "fill": ..., "fallback": ... }`.
    FillWithFallback { fill: String, fallback: String },
    /// A single plain value serving as both fill and fallback.
    Plain(String),
}

impl BackgroundValue {
    /// The value for the primary background variable.
    pub fn fill(&self) -> &str {
        match self {
            BackgroundValue::FillWithFallback { fill, .. } => fill,
            BackgroundValue::Plain(value) => value,
        }
    }

    /// The guaranteed-plain value for the `-fallback` variable.
    pub fn fallback(&self) -> &str {
        match self {
            BackgroundValue::FillWithFallback { fallback, .. } => fallback,
            BackgroundValue::Plain(value) => value,
        }
    }
}

impl From<&str> for BackgroundValue {
    fn from(value: &str) -> Self {
        BackgroundValue::Plain(value.to_string())
    }
}
