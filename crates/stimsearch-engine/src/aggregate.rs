//! Per-level boolean aggregation.
//!
//! Each criterion becomes one boolean column named `level{N}_crit{i}`; the
//! nested multi-branch criterion additionally materializes its listA/listB/
//! listC and per-branch columns. A level's own boolean is the OR across its
//! criteria, AND-ed with the `age > 14` gate for levels past the first.
//!
//! This module owns the exhaustive dispatch over [`Criterion`]; adding a new
//! variant means adding an arm here and an expression builder in
//! [`crate::exec`].

use polars::prelude::*;
use stimsearch_model::criteria::{Criterion, NestedMultiBranchCriterion};
use stimsearch_model::ruleset::Level;

use crate::exec::{self, Strategy};

/// Name of a level's public boolean column.
pub(crate) fn level_column(index: usize) -> String {
    format!("level{index}")
}

fn criterion_column(level_index: usize, ordinal: usize) -> String {
    format!("level{level_index}_crit{ordinal}")
}

/// Add the criterion and level columns for one level to the plan.
///
/// Returns the extended plan and every column name added, in order; the
/// level's own boolean is last.
pub(crate) fn aggregate_level(
    lf: LazyFrame,
    level: &Level,
    strategy: Strategy,
    text_column: &str,
) -> (LazyFrame, Vec<String>) {
    let mut lf = lf;
    let mut added = Vec::new();
    let mut criterion_columns = Vec::with_capacity(level.criteria.len());

    for (offset, criterion) in level.criteria.iter().enumerate() {
        let name = criterion_column(level.index, offset + 1);
        lf = match criterion {
            Criterion::Simple(c) => {
                lf.with_column(exec::simple_expr(c, strategy, text_column).alias(name.as_str()))
            }
            Criterion::DoubleNegative(c) => lf.with_column(
                exec::double_negative_expr(c, strategy, text_column).alias(name.as_str()),
            ),
            Criterion::DoublePositive(c) => lf.with_column(
                exec::double_positive_expr(c, strategy, text_column).alias(name.as_str()),
            ),
            Criterion::TriplePositive(c) => lf.with_column(
                exec::triple_positive_expr(c, strategy, text_column).alias(name.as_str()),
            ),
            Criterion::TwoPart(c) => {
                lf.with_column(exec::two_part_expr(c, strategy, text_column).alias(name.as_str()))
            }
            Criterion::NestedMultiBranch(c) => {
                nested_columns(lf, c, &name, strategy, text_column, &mut added)
            }
        };
        criterion_columns.push(name.clone());
        added.push(name);
    }

    let mut level_expr = exec::any_of(criterion_columns.iter().map(|name| col(name.as_str())));
    if level.index > 1 {
        level_expr = level_expr.and(col(exec::AGE_GT14));
    }
    let level_name = level_column(level.index);
    lf = lf.with_column(level_expr.alias(level_name.as_str()));
    added.push(level_name);

    (lf, added)
}

/// Materialize the nested multi-branch intermediate columns and the final
/// criterion boolean.
///
/// Minimum requirement is a listA hit plus at least one satisfied branch;
/// the listC confirmation is then skipped when a bypass-flagged branch
/// fired, and otherwise must be absent.
fn nested_columns(
    lf: LazyFrame,
    criterion: &NestedMultiBranchCriterion,
    name: &str,
    strategy: Strategy,
    text_column: &str,
    added: &mut Vec<String>,
) -> LazyFrame {
    let lista_column = format!("{name}_lista");
    let listb_column = format!("{name}_listb");
    let listc_column = format!("{name}_listc");

    let mut exprs = vec![
        exec::group_match_expr(strategy, text_column, &criterion.list_a)
            .alias(lista_column.as_str()),
        exec::group_match_expr(strategy, text_column, &criterion.list_c)
            .alias(listc_column.as_str()),
    ];
    let mut branch_columns = Vec::with_capacity(criterion.branches.len());
    let mut bypass_columns = Vec::new();
    for branch in &criterion.branches {
        let branch_column = format!("{name}_{}", branch.name);
        exprs.push(
            exec::nested_branch_expr(branch, strategy, text_column).alias(branch_column.as_str()),
        );
        if branch.bypass_list_c {
            bypass_columns.push(branch_column.clone());
        }
        branch_columns.push(branch_column);
    }

    let lf = lf.with_columns(exprs).with_column(
        exec::any_of(branch_columns.iter().map(|name| col(name.as_str())))
            .alias(listb_column.as_str()),
    );

    let bypass = exec::any_of(bypass_columns.iter().map(|name| col(name.as_str())));
    let resolved = when(col(lista_column.as_str()).and(col(listb_column.as_str())))
        .then(
            when(bypass)
                .then(lit(true))
                .when(col(listc_column.as_str()).not())
                .then(lit(true))
                .otherwise(lit(false)),
        )
        .otherwise(lit(false));

    added.push(lista_column);
    added.push(listc_column);
    added.extend(branch_columns);
    added.push(listb_column);

    lf.with_column(resolved.alias(name))
}
