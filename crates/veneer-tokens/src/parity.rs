//! Stylesheet parity checking.
//!
//! # Design
//!
//! Migrating a brand from a hand-maintained sheet to a generated one is
//! only safe when every variable the old sheet declared comes out of the
//! compiler with the same value. This module extracts the custom
//! properties from two sheets and reports the difference.
//!
//! Extraction is built on `cssparser` (the same tokenizer used by
//! Firefox), so comments, strings, and escapes are handled correctly, but
//! the comparison itself is an exact string match on the raw declared
//! value. `16px` and `1rem` are different even when they render the same,
//! and that is the point: a parity run certifies textual equivalence, not
//! visual equivalence.
//!
//! Rules that fail to parse are skipped, as are declarations that are not
//! custom properties. When a sheet declares the same variable twice the
//! later declaration wins, matching how the cascade would read it.

use std::collections::BTreeMap;
use std::fmt;

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

/// Pulls every `--name: value` declaration out of a stylesheet.
///
/// Values are the raw source text between the colon and the semicolon,
/// trimmed. Variables from all rule blocks land in one map.
pub fn extract_variables(css: &str) -> BTreeMap<String, String> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let mut extractor = VariableExtractor {
        variables: BTreeMap::new(),
    };

    for _ in cssparser::StyleSheetParser::new(&mut parser, &mut extractor) {}

    extractor.variables
}

/// Compares two variable maps, baseline against candidate.
pub fn compare(
    baseline: &BTreeMap<String, String>,
    candidate: &BTreeMap<String, String>,
) -> ParityReport {
    let mut missing = Vec::new();
    let mut different = Vec::new();
    let mut extra = Vec::new();
    let mut matched = 0;

    for (name, expected) in baseline {
        match candidate.get(name) {
            None => missing.push((name.clone(), expected.clone())),
            Some(actual) if actual != expected => different.push(ValueDiff {
                name: name.clone(),
                baseline: expected.clone(),
                candidate: actual.clone(),
            }),
            Some(_) => matched += 1,
        }
    }

    for (name, value) in candidate {
        if !baseline.contains_key(name) {
            extra.push((name.clone(), value.clone()));
        }
    }

    ParityReport {
        matched,
        missing,
        different,
        extra,
    }
}

/// Extracts variables from both sheets and compares them.
pub fn compare_sheets(baseline_css: &str, candidate_css: &str) -> ParityReport {
    compare(
        &extract_variables(baseline_css),
        &extract_variables(candidate_css),
    )
}

/// One variable declared in both sheets with diverging values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDiff {
    pub name: String,
    pub baseline: String,
    pub candidate: String,
}

/// Outcome of a baseline/candidate comparison.
///
/// Buckets are sorted by variable name. `missing` and `different` fail
/// the check; `extra` is advisory, since a candidate is allowed to grow
/// variables the baseline never declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityReport {
    /// Count of variables with identical values in both sheets.
    pub matched: usize,
    /// Declared in the baseline, absent from the candidate.
    pub missing: Vec<(String, String)>,
    /// Declared in both, values differ.
    pub different: Vec<ValueDiff>,
    /// Declared in the candidate, absent from the baseline.
    pub extra: Vec<(String, String)>,
}

impl ParityReport {
    /// True when the candidate covers the baseline exactly. Extra
    /// variables do not affect the verdict.
    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.different.is_empty()
    }
}

impl fmt::Display for ParityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} matched, {} missing, {} different, {} extra",
            self.matched,
            self.missing.len(),
            self.different.len(),
            self.extra.len()
        )?;

        if !self.missing.is_empty() {
            writeln!(f)?;
            writeln!(f, "missing (in baseline, not in candidate):")?;
            for (name, value) in &self.missing {
                writeln!(f, "  {}: {}", name, value)?;
            }
        }

        if !self.different.is_empty() {
            writeln!(f)?;
            writeln!(f, "different:")?;
            for diff in &self.different {
                writeln!(
                    f,
                    "  {}: baseline {} / candidate {}",
                    diff.name, diff.baseline, diff.candidate
                )?;
            }
        }

        if !self.extra.is_empty() {
            writeln!(f)?;
            writeln!(f, "extra (in candidate, not in baseline):")?;
            for (name, value) in &self.extra {
                writeln!(f, "  {}: {}", name, value)?;
            }
        }

        Ok(())
    }
}

struct VariableExtractor {
    variables: BTreeMap<String, String>,
}

impl<'i> QualifiedRuleParser<'i> for VariableExtractor {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // Any selector is fine. Consume it and keep the rule.
        while input.next().is_ok() {}
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut decl_parser = VariableDeclarationParser;
        for (name, value) in RuleBodyParser::new(input, &mut decl_parser).flatten() {
            self.variables.insert(name, value);
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for VariableExtractor {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

struct VariableDeclarationParser;

impl<'i> DeclarationParser<'i> for VariableDeclarationParser {
    type Declaration = (String, String);
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        if !name.starts_with("--") {
            return Err(input.new_custom_error::<(), ()>(()));
        }

        // Capture the raw source text of the value rather than
        // reassembling it from tokens, so the comparison sees exactly
        // what the author wrote.
        let start = input.position();
        while input.next_including_whitespace().is_ok() {}
        let value = input.slice_from(start).trim().to_string();

        Ok((name.as_ref().to_string(), value))
    }
}

impl<'i> AtRuleParser<'i> for VariableDeclarationParser {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for VariableDeclarationParser {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for VariableDeclarationParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
