//! Term-list compilation and pattern expansion.
//!
//! A term group has two interchangeable representations: a compact
//! alternation pattern used for single-pass containment tests, and the
//! enumerated set of literal terms used for per-term match counting. This
//! module converts between the two.
//!
//! Expansion walks the `regex-syntax` HIR and enumerates every concrete
//! string a finite pattern matches. The engine only ever compiles patterns
//! from finite term lists, so an unbounded pattern indicates a defect in the
//! pattern files rather than bad user input.

use std::collections::BTreeSet;

use regex_syntax::Parser;
use regex_syntax::hir::{Class, Hir, HirKind};

use crate::error::{Result, SearchError};

/// Hard cap on the number of strings a single pattern may expand to.
/// Exceeding it is treated the same as an unbounded pattern.
const MAX_EXPANSION: usize = 10_000;

/// Build an alternation pattern covering exactly the given terms.
///
/// Terms are deduplicated and sorted so equal input sets always produce the
/// same pattern text. When `escape_literal_dots` is set, dots in terms are
/// escaped to match literal periods (the policy used for diagnosis codes);
/// otherwise dots are left as regex wildcards.
pub fn compile_terms(terms: &[String], escape_literal_dots: bool) -> String {
    let processed: BTreeSet<String> = terms
        .iter()
        .map(|term| {
            if escape_literal_dots {
                term.replace('.', r"\.")
            } else {
                term.clone()
            }
        })
        .collect();
    processed.into_iter().collect::<Vec<_>>().join("|")
}

/// Escape a literal term so it can stand alone as a pattern.
pub fn literal_pattern(term: &str) -> String {
    regex_syntax::escape(term)
}

/// Enumerate every concrete string matched by a finite pattern.
///
/// Fails with [`SearchError::PatternExpansion`] if the pattern is unbounded
/// (unbounded repetition, look-around) or expands past [`MAX_EXPANSION`]
/// strings.
pub fn expand_pattern(pattern: &str) -> Result<BTreeSet<String>> {
    let hir = Parser::new().parse(pattern).map_err(|error| {
        SearchError::PatternExpansion(format!("invalid pattern `{pattern}`: {error}"))
    })?;
    let strings = expand_hir(&hir)?;
    Ok(strings.into_iter().collect())
}

fn expand_hir(hir: &Hir) -> Result<Vec<String>> {
    match hir.kind() {
        HirKind::Empty => Ok(vec![String::new()]),
        HirKind::Literal(literal) => {
            let text = std::str::from_utf8(&literal.0).map_err(|_| {
                SearchError::PatternExpansion("pattern contains a non-UTF-8 literal".into())
            })?;
            Ok(vec![text.to_string()])
        }
        HirKind::Class(class) => expand_class(class),
        HirKind::Capture(capture) => expand_hir(&capture.sub),
        HirKind::Concat(parts) => {
            let mut acc = vec![String::new()];
            for part in parts {
                acc = cross_concat(&acc, &expand_hir(part)?)?;
            }
            Ok(acc)
        }
        HirKind::Alternation(branches) => {
            let mut acc = Vec::new();
            for branch in branches {
                acc.extend(expand_hir(branch)?);
            }
            check_size(acc)
        }
        HirKind::Repetition(repetition) => {
            let Some(max) = repetition.max else {
                return Err(SearchError::PatternExpansion(
                    "unbounded repetition cannot be enumerated".into(),
                ));
            };
            let sub = expand_hir(&repetition.sub)?;
            let mut acc = Vec::new();
            for count in repetition.min..=max {
                let mut combos = vec![String::new()];
                for _ in 0..count {
                    combos = cross_concat(&combos, &sub)?;
                }
                acc.extend(combos);
                acc = check_size(acc)?;
            }
            Ok(acc)
        }
        HirKind::Look(_) => Err(SearchError::PatternExpansion(
            "look-around assertions cannot be enumerated".into(),
        )),
    }
}

fn expand_class(class: &Class) -> Result<Vec<String>> {
    let mut out = Vec::new();
    match class {
        Class::Unicode(unicode) => {
            for range in unicode.iter() {
                for codepoint in (range.start() as u32)..=(range.end() as u32) {
                    if let Some(c) = char::from_u32(codepoint) {
                        out.push(c.to_string());
                    }
                    if out.len() > MAX_EXPANSION {
                        return Err(expansion_overflow());
                    }
                }
            }
        }
        Class::Bytes(bytes) => {
            for range in bytes.iter() {
                for byte in range.start()..=range.end() {
                    out.push((byte as char).to_string());
                    if out.len() > MAX_EXPANSION {
                        return Err(expansion_overflow());
                    }
                }
            }
        }
    }
    Ok(out)
}

fn cross_concat(prefixes: &[String], suffixes: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(prefixes.len().saturating_mul(suffixes.len()));
    for prefix in prefixes {
        for suffix in suffixes {
            out.push(format!("{prefix}{suffix}"));
            if out.len() > MAX_EXPANSION {
                return Err(expansion_overflow());
            }
        }
    }
    Ok(out)
}

fn check_size(strings: Vec<String>) -> Result<Vec<String>> {
    if strings.len() > MAX_EXPANSION {
        return Err(expansion_overflow());
    }
    Ok(strings)
}

fn expansion_overflow() -> SearchError {
    SearchError::PatternExpansion(format!(
        "pattern expands to more than {MAX_EXPANSION} strings"
    ))
}
