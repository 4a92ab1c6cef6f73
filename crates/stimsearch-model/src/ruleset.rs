//! Compiled rule sets.
//!
//! Pattern files are compiled once into these immutable structures. Every
//! term group's pattern and expanded vocabulary is computed here, at
//! construction time, so evaluation never recompiles anything.

use std::collections::BTreeSet;

use crate::config::{BettanoPatternConfig, BranchConfig, CdcPatternConfig, CriterionConfig};
use crate::criteria::{
    Criterion, DoubleNegativeCriterion, DoublePositiveCriterion, NestedBranch,
    NestedMultiBranchCriterion, SimpleCriterion, TermSet, TriplePositiveCriterion,
    TwoPartCriterion,
};
use crate::error::{Result, SearchError};

/// Dots in configured terms always match literal periods.
const ESCAPE_DOTS: bool = true;

/// An ordered, dependent stage of criteria. Level N is only evaluated for
/// rows that satisfied level N-1.
#[derive(Debug, Clone)]
pub struct Level {
    pub index: usize,
    pub criteria: Vec<Criterion>,
}

/// The three-level Bettano rule set.
#[derive(Debug, Clone)]
pub struct BettanoRuleSet {
    levels: Vec<Level>,
}

impl BettanoRuleSet {
    pub fn compile(config: &BettanoPatternConfig) -> Result<Self> {
        if config.levels.is_empty() {
            return Err(SearchError::Configuration(
                "rule set must define at least one level".into(),
            ));
        }
        let mut levels = Vec::with_capacity(config.levels.len());
        for (offset, criteria_configs) in config.levels.iter().enumerate() {
            let index = offset + 1;
            if criteria_configs.is_empty() {
                return Err(SearchError::Configuration(format!(
                    "level {index} must define at least one criterion"
                )));
            }
            let mut criteria = Vec::with_capacity(criteria_configs.len());
            for criterion_config in criteria_configs {
                let criterion = compile_criterion(criterion_config)?;
                if index == 1 && criterion.needs_age() {
                    return Err(SearchError::Configuration(
                        "age-gated criteria are only valid in levels evaluated with an age column"
                            .into(),
                    ));
                }
                criteria.push(criterion);
            }
            levels.push(Level { index, criteria });
        }
        Ok(Self { levels })
    }

    /// Number of levels the rule set defines.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// The first `depth` levels, in dependency order.
    pub fn levels(&self, depth: usize) -> &[Level] {
        &self.levels[..depth.min(self.levels.len())]
    }

    /// The expanded vocabulary of every criterion in the first `depth`
    /// levels. The traced strategy materializes one count column per entry.
    pub fn combined_terms(&self, depth: usize) -> BTreeSet<String> {
        let mut terms = BTreeSet::new();
        for level in self.levels(depth) {
            for criterion in &level.criteria {
                for set in criterion.term_sets() {
                    terms.extend(set.expanded().iter().cloned());
                }
            }
        }
        terms
    }
}

/// The single-level CDC rule set with its bespoke combination rule:
/// `signal = codes OR (inclusion1 AND inclusion2 AND NOT exclusion AND
/// NOT crack_exclude AND NOT rum_coke)`.
#[derive(Debug, Clone)]
pub struct CdcRuleSet {
    codes: TermSet,
    inclusion1: TermSet,
    inclusion2: TermSet,
    exclusion: TermSet,
    crack: TermSet,
    crack_pairs: TermSet,
    rum: TermSet,
    coke: TermSet,
}

impl CdcRuleSet {
    pub fn compile(config: &CdcPatternConfig) -> Result<Self> {
        // Codes match with and without their dots, per the CDC definition.
        let mut code_variants = Vec::with_capacity(config.codes.len() * 2);
        for code in &config.codes {
            code_variants.push(code.clone());
            if code.contains('.') {
                code_variants.push(code.replace('.', ""));
            }
        }
        Ok(Self {
            codes: TermSet::compile(code_variants, ESCAPE_DOTS)?,
            inclusion1: TermSet::compile(config.inclusion1.clone(), ESCAPE_DOTS)?,
            inclusion2: TermSet::compile(config.inclusion2.clone(), ESCAPE_DOTS)?,
            exclusion: TermSet::compile(config.exclusion.clone(), ESCAPE_DOTS)?,
            crack: TermSet::compile(vec![config.crack.clone()], ESCAPE_DOTS)?,
            crack_pairs: TermSet::compile(config.crack_pairs.clone(), ESCAPE_DOTS)?,
            rum: TermSet::compile(vec![config.rum.clone()], ESCAPE_DOTS)?,
            coke: TermSet::compile(vec![config.coke.clone()], ESCAPE_DOTS)?,
        })
    }

    pub fn codes(&self) -> &TermSet {
        &self.codes
    }

    pub fn inclusion1(&self) -> &TermSet {
        &self.inclusion1
    }

    pub fn inclusion2(&self) -> &TermSet {
        &self.inclusion2
    }

    pub fn exclusion(&self) -> &TermSet {
        &self.exclusion
    }

    pub fn crack(&self) -> &TermSet {
        &self.crack
    }

    pub fn crack_pairs(&self) -> &TermSet {
        &self.crack_pairs
    }

    pub fn rum(&self) -> &TermSet {
        &self.rum
    }

    pub fn coke(&self) -> &TermSet {
        &self.coke
    }

    /// The expanded vocabulary across every term group.
    pub fn all_terms(&self) -> BTreeSet<String> {
        let mut terms = BTreeSet::new();
        for set in [
            &self.codes,
            &self.inclusion1,
            &self.inclusion2,
            &self.exclusion,
            &self.crack,
            &self.crack_pairs,
            &self.rum,
            &self.coke,
        ] {
            terms.extend(set.expanded().iter().cloned());
        }
        terms
    }
}

fn compile_criterion(config: &CriterionConfig) -> Result<Criterion> {
    let criterion = match config {
        CriterionConfig::Simple {
            inclusion,
            exclusion,
        } => Criterion::Simple(SimpleCriterion {
            inclusion: TermSet::compile(inclusion.clone(), ESCAPE_DOTS)?,
            exclusion: compile_optional(exclusion.as_deref())?,
        }),
        CriterionConfig::DoubleNegative {
            inclusion,
            exclusion1,
            exclusion2,
        } => Criterion::DoubleNegative(DoubleNegativeCriterion {
            inclusion: TermSet::compile(inclusion.clone(), ESCAPE_DOTS)?,
            exclusion1: TermSet::compile(exclusion1.clone(), ESCAPE_DOTS)?,
            exclusion2: TermSet::compile(exclusion2.clone(), ESCAPE_DOTS)?,
        }),
        CriterionConfig::DoublePositive {
            inclusion1,
            inclusion2,
            exclusion,
        } => Criterion::DoublePositive(DoublePositiveCriterion {
            inclusion1: TermSet::compile(inclusion1.clone(), ESCAPE_DOTS)?,
            inclusion2: TermSet::compile(inclusion2.clone(), ESCAPE_DOTS)?,
            exclusion: TermSet::compile(exclusion.clone(), ESCAPE_DOTS)?,
        }),
        CriterionConfig::TriplePositive {
            inclusion1,
            inclusion2,
            inclusion3,
        } => Criterion::TriplePositive(TriplePositiveCriterion {
            inclusion1: TermSet::compile(inclusion1.clone(), ESCAPE_DOTS)?,
            inclusion2: TermSet::compile(inclusion2.clone(), ESCAPE_DOTS)?,
            inclusion3: TermSet::compile(inclusion3.clone(), ESCAPE_DOTS)?,
        }),
        CriterionConfig::TwoPart {
            inclusion1,
            exclusion1,
            inclusion2,
            exclusion2,
        } => Criterion::TwoPart(TwoPartCriterion {
            inclusion1: TermSet::compile(inclusion1.clone(), ESCAPE_DOTS)?,
            exclusion1: TermSet::compile(exclusion1.clone(), ESCAPE_DOTS)?,
            inclusion2: TermSet::compile(inclusion2.clone(), ESCAPE_DOTS)?,
            exclusion2: TermSet::compile(exclusion2.clone(), ESCAPE_DOTS)?,
        }),
        CriterionConfig::NestedMultiBranch {
            list_a,
            branches,
            list_c,
        } => {
            if branches.is_empty() {
                return Err(SearchError::Configuration(
                    "nested multi-branch criterion must define at least one branch".into(),
                ));
            }
            let compiled_branches = branches.iter().map(compile_branch).collect::<Result<_>>()?;
            Criterion::NestedMultiBranch(NestedMultiBranchCriterion {
                list_a: TermSet::compile(list_a.clone(), ESCAPE_DOTS)?,
                branches: compiled_branches,
                list_c: TermSet::compile(list_c.clone(), ESCAPE_DOTS)?,
            })
        }
    };
    Ok(criterion)
}

fn compile_branch(config: &BranchConfig) -> Result<NestedBranch> {
    if config.name.trim().is_empty() {
        return Err(SearchError::Configuration(
            "nested branch name must not be empty".into(),
        ));
    }
    Ok(NestedBranch {
        name: config.name.clone(),
        inclusion: TermSet::compile(config.inclusion.clone(), ESCAPE_DOTS)?,
        exclusion1: compile_optional(config.exclusion1.as_deref())?,
        exclusion2: compile_optional(config.exclusion2.as_deref())?,
        exclusion3: compile_optional(config.exclusion3.as_deref())?,
        bypass_list_c: config.bypass_list_c,
    })
}

fn compile_optional(terms: Option<&[String]>) -> Result<Option<TermSet>> {
    terms
        .map(|list| TermSet::compile(list.to_vec(), ESCAPE_DOTS))
        .transpose()
}
