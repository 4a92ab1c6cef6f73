//! Criterion variants and compiled term groups.
//!
//! A [`TermSet`] carries a term group in both of its representations (compact
//! pattern and expanded vocabulary), computed once at construction. Criteria
//! are immutable after compilation; the execution engine only reads them.

use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::terms::{compile_terms, expand_pattern};

/// A group of literal terms with its compiled alternation pattern and the
/// expanded per-term vocabulary.
#[derive(Debug, Clone)]
pub struct TermSet {
    terms: Vec<String>,
    pattern: String,
    expanded: BTreeSet<String>,
}

impl TermSet {
    /// Compile a term list, caching both representations.
    ///
    /// Round-trip invariant: `expanded` equals the input terms after the
    /// dot-escaping policy has been applied.
    pub fn compile(terms: Vec<String>, escape_literal_dots: bool) -> Result<Self> {
        if terms.is_empty() {
            return Err(SearchError::Configuration(
                "term list must not be empty".into(),
            ));
        }
        if terms.iter().any(|term| term.trim().is_empty()) {
            return Err(SearchError::Configuration(
                "term list must not contain empty terms".into(),
            ));
        }
        let pattern = compile_terms(&terms, escape_literal_dots);
        let expanded = expand_pattern(&pattern)?;
        Ok(Self {
            terms,
            pattern,
            expanded,
        })
    }

    /// The raw terms as loaded from configuration.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The compact alternation pattern, without match flags.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Every concrete string the pattern matches.
    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }
}

/// Inclusion with an optional exclusion list.
#[derive(Debug, Clone)]
pub struct SimpleCriterion {
    pub inclusion: TermSet,
    pub exclusion: Option<TermSet>,
}

/// Inclusion gated by two independent exclusion lists.
#[derive(Debug, Clone)]
pub struct DoubleNegativeCriterion {
    pub inclusion: TermSet,
    pub exclusion1: TermSet,
    pub exclusion2: TermSet,
}

/// Two inclusions that must both hit, gated by one exclusion list.
#[derive(Debug, Clone)]
pub struct DoublePositiveCriterion {
    pub inclusion1: TermSet,
    pub inclusion2: TermSet,
    pub exclusion: TermSet,
}

/// Three inclusions evaluated first-match-wins with age gates: the first
/// matches unconditionally, the second requires age < 46, the third
/// age < 55.
#[derive(Debug, Clone)]
pub struct TriplePositiveCriterion {
    pub inclusion1: TermSet,
    pub inclusion2: TermSet,
    pub inclusion3: TermSet,
}

/// Two inclusion/exclusion pairs evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct TwoPartCriterion {
    pub inclusion1: TermSet,
    pub exclusion1: TermSet,
    pub inclusion2: TermSet,
    pub exclusion2: TermSet,
}

/// One sub-criterion of the nested multi-branch variant: an inclusion list
/// with up to three optional exclusion lists.
///
/// The branch is satisfied by a clean inclusion hit (inclusion matched,
/// exclusion1 absent) or, when both secondary exclusions are configured, by
/// the simultaneous absence of exclusion2 and exclusion3. A branch flagged
/// `bypass_list_c` skips the final listC confirmation check when it fired.
#[derive(Debug, Clone)]
pub struct NestedBranch {
    pub name: String,
    pub inclusion: TermSet,
    pub exclusion1: Option<TermSet>,
    pub exclusion2: Option<TermSet>,
    pub exclusion3: Option<TermSet>,
    pub bypass_list_c: bool,
}

/// The nested multi-branch variant: listA gate, a set of named branches
/// (listB), and a listC confirmation check.
#[derive(Debug, Clone)]
pub struct NestedMultiBranchCriterion {
    pub list_a: TermSet,
    pub branches: Vec<NestedBranch>,
    pub list_c: TermSet,
}

/// A single boolean test over a record, polymorphic over the rule variants.
///
/// The execution engine dispatches on this enum exhaustively; adding a new
/// variant requires touching the engine's aggregator and nothing else.
#[derive(Debug, Clone)]
pub enum Criterion {
    Simple(SimpleCriterion),
    DoubleNegative(DoubleNegativeCriterion),
    DoublePositive(DoublePositiveCriterion),
    TriplePositive(TriplePositiveCriterion),
    TwoPart(TwoPartCriterion),
    NestedMultiBranch(NestedMultiBranchCriterion),
}

impl Criterion {
    /// Every term group the criterion reads, used to assemble the combined
    /// vocabulary for the traced strategy.
    pub fn term_sets(&self) -> Vec<&TermSet> {
        match self {
            Criterion::Simple(c) => {
                let mut sets = vec![&c.inclusion];
                sets.extend(c.exclusion.as_ref());
                sets
            }
            Criterion::DoubleNegative(c) => vec![&c.inclusion, &c.exclusion1, &c.exclusion2],
            Criterion::DoublePositive(c) => vec![&c.inclusion1, &c.inclusion2, &c.exclusion],
            Criterion::TriplePositive(c) => vec![&c.inclusion1, &c.inclusion2, &c.inclusion3],
            Criterion::TwoPart(c) => {
                vec![&c.inclusion1, &c.exclusion1, &c.inclusion2, &c.exclusion2]
            }
            Criterion::NestedMultiBranch(c) => {
                let mut sets = vec![&c.list_a, &c.list_c];
                for branch in &c.branches {
                    sets.push(&branch.inclusion);
                    sets.extend(branch.exclusion1.as_ref());
                    sets.extend(branch.exclusion2.as_ref());
                    sets.extend(branch.exclusion3.as_ref());
                }
                sets
            }
        }
    }

    /// Whether evaluating this criterion requires the age gates.
    pub fn needs_age(&self) -> bool {
        matches!(self, Criterion::TriplePositive(_))
    }
}
