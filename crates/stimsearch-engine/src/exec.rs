//! Column expression builders for the two execution strategies.
//!
//! The untraced strategy tests one combined case-insensitive pattern per
//! term group directly against the text column. The traced strategy assumes
//! one match-count column per expanded term already exists (named by the
//! term itself) and folds group booleans from those counts. Both must agree
//! on every boolean outcome; null text contributes `false` everywhere.

use polars::prelude::*;
use stimsearch_model::criteria::{
    DoubleNegativeCriterion, DoublePositiveCriterion, NestedBranch, SimpleCriterion, TermSet,
    TriplePositiveCriterion, TwoPartCriterion,
};
use stimsearch_model::terms::literal_pattern;

/// Row identifier threaded through filtered sub-plans for the level rejoin.
pub(crate) const ROW_INDEX: &str = "__row_idx";

/// Age gate columns, derived once per call when `depth > 1`.
pub(crate) const AGE_GT14: &str = "age_gt14";
pub(crate) const AGE_LT46: &str = "age_lt46";
pub(crate) const AGE_LT55: &str = "age_lt55";

/// Strategy selected per evaluation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// One combined containment test per term group; the fast path.
    Untraced,
    /// One count column per expanded term, group booleans derived from the
    /// counts. Roughly 5x slower and materially heavier on memory.
    Traced,
}

/// Boolean OR over expressions; `false` for an empty set.
pub(crate) fn any_of<I: IntoIterator<Item = Expr>>(exprs: I) -> Expr {
    exprs.into_iter().reduce(Expr::or).unwrap_or_else(|| lit(false))
}

/// Whether any term of the group occurs in the record, under the strategy.
pub(crate) fn group_match_expr(strategy: Strategy, text_column: &str, set: &TermSet) -> Expr {
    match strategy {
        Strategy::Untraced => col(text_column)
            .str()
            .contains(lit(format!("(?i){}", set.pattern())), false)
            .fill_null(lit(false)),
        Strategy::Traced => any_of(
            set.expanded()
                .iter()
                .map(|term| col(term.as_str()).gt(lit(0))),
        ),
    }
}

/// One case-insensitive match-count column per expanded term.
pub(crate) fn term_count_exprs<'a, I>(text_column: &str, terms: I) -> Vec<Expr>
where
    I: IntoIterator<Item = &'a String>,
{
    terms
        .into_iter()
        .map(|term| {
            col(text_column)
                .str()
                .count_matches(lit(format!("(?i){}", literal_pattern(term))), false)
                .fill_null(lit(0))
                .alias(term.as_str())
        })
        .collect()
}

/// The three age-derived boolean gates.
pub(crate) fn age_gate_exprs(age_column: &str) -> Vec<Expr> {
    vec![
        col(age_column).gt(lit(14)).fill_null(lit(false)).alias(AGE_GT14),
        col(age_column).lt(lit(46)).fill_null(lit(false)).alias(AGE_LT46),
        col(age_column).lt(lit(55)).fill_null(lit(false)).alias(AGE_LT55),
    ]
}

/// inclusion AND (no exclusion configured OR no exclusion matched).
pub(crate) fn simple_expr(
    criterion: &SimpleCriterion,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    let inclusion = group_match_expr(strategy, text_column, &criterion.inclusion);
    match &criterion.exclusion {
        None => inclusion,
        Some(exclusion) => inclusion.and(group_match_expr(strategy, text_column, exclusion).not()),
    }
}

pub(crate) fn double_negative_expr(
    criterion: &DoubleNegativeCriterion,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    group_match_expr(strategy, text_column, &criterion.inclusion)
        .and(group_match_expr(strategy, text_column, &criterion.exclusion1).not())
        .and(group_match_expr(strategy, text_column, &criterion.exclusion2).not())
}

pub(crate) fn double_positive_expr(
    criterion: &DoublePositiveCriterion,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    group_match_expr(strategy, text_column, &criterion.inclusion1)
        .and(group_match_expr(strategy, text_column, &criterion.inclusion2))
        .and(group_match_expr(strategy, text_column, &criterion.exclusion).not())
}

/// First-match-wins: inclusion1 unconditional, inclusion2 under age < 46,
/// inclusion3 under age < 55.
pub(crate) fn triple_positive_expr(
    criterion: &TriplePositiveCriterion,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    when(group_match_expr(strategy, text_column, &criterion.inclusion1))
        .then(lit(true))
        .when(group_match_expr(strategy, text_column, &criterion.inclusion2).and(col(AGE_LT46)))
        .then(lit(true))
        .when(group_match_expr(strategy, text_column, &criterion.inclusion3).and(col(AGE_LT55)))
        .then(lit(true))
        .otherwise(lit(false))
}

pub(crate) fn two_part_expr(
    criterion: &TwoPartCriterion,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    let first = group_match_expr(strategy, text_column, &criterion.inclusion1)
        .and(group_match_expr(strategy, text_column, &criterion.exclusion1).not());
    let second = group_match_expr(strategy, text_column, &criterion.inclusion2)
        .and(group_match_expr(strategy, text_column, &criterion.exclusion2).not());
    when(first)
        .then(lit(true))
        .when(second)
        .then(lit(true))
        .otherwise(lit(false))
}

/// One nested branch: a clean inclusion hit, or (when both secondary
/// exclusions are configured) the simultaneous absence of both.
pub(crate) fn nested_branch_expr(
    branch: &NestedBranch,
    strategy: Strategy,
    text_column: &str,
) -> Expr {
    let inclusion = group_match_expr(strategy, text_column, &branch.inclusion);
    let mut expr = match &branch.exclusion1 {
        None => inclusion,
        Some(exclusion) => inclusion.and(group_match_expr(strategy, text_column, exclusion).not()),
    };
    if let (Some(exclusion2), Some(exclusion3)) = (&branch.exclusion2, &branch.exclusion3) {
        expr = expr.or(group_match_expr(strategy, text_column, exclusion2)
            .not()
            .and(group_match_expr(strategy, text_column, exclusion3).not()));
    }
    expr
}
