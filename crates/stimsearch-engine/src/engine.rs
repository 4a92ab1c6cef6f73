//! Public evaluation operations.
//!
//! A [`SearchEngine`] owns the two compiled rule sets and exposes one
//! operation per rule set. Both return a lazy plan: the original columns
//! plus the rule set's boolean output column(s) in untraced mode, or the
//! full intermediate column set in traced mode. Row count and row order are
//! preserved either way.

use std::path::Path;

use polars::prelude::*;
use stimsearch_model::config::{BettanoPatternConfig, CdcPatternConfig};
use stimsearch_model::criteria::TermSet;
use stimsearch_model::ruleset::{BettanoRuleSet, CdcRuleSet};
use stimsearch_model::SearchError;
use tracing::warn;

use crate::aggregate::{aggregate_level, level_column};
use crate::error::Result;
use crate::exec::{self, Strategy};
use crate::options::{BettanoOptions, CdcOptions};
use crate::table::TableSource;

/// File names the engine expects inside a pattern directory.
pub const CDC_PATTERN_FILE: &str = "cdc_patterns.json";
pub const BETTANO_PATTERN_FILE: &str = "bettano_patterns.json";

const TRACING_ADVISORY: &str = "tracing materializes one match-count column per term; \
     expect roughly 5x the untraced runtime and substantially more memory";

/// The criteria-evaluation engine, holding both compiled rule sets.
///
/// Construction is the only point that touches configuration; afterwards the
/// engine is read-only and can be shared across concurrent evaluation calls.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    cdc: CdcRuleSet,
    bettano: BettanoRuleSet,
}

impl SearchEngine {
    pub fn new(cdc: CdcRuleSet, bettano: BettanoRuleSet) -> Self {
        Self { cdc, bettano }
    }

    /// Load and compile both pattern files from a directory.
    pub fn from_pattern_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let cdc_config = CdcPatternConfig::from_path(dir.join(CDC_PATTERN_FILE))?;
        let bettano_config = BettanoPatternConfig::from_path(dir.join(BETTANO_PATTERN_FILE))?;
        Ok(Self::new(
            CdcRuleSet::compile(&cdc_config)?,
            BettanoRuleSet::compile(&bettano_config)?,
        ))
    }

    pub fn cdc(&self) -> &CdcRuleSet {
        &self.cdc
    }

    pub fn bettano(&self) -> &BettanoRuleSet {
        &self.bettano
    }

    /// Evaluate the CDC rule set, adding a boolean `signal` column.
    pub fn evaluate_cdc(
        &self,
        table: impl Into<TableSource>,
        options: &CdcOptions,
    ) -> Result<LazyFrame> {
        let mut lf = table.into().into_lazy();
        let schema = lf.collect_schema()?;
        ensure_column(&schema, &options.text_column)?;
        let original: Vec<String> = schema.iter_names().map(|name| name.to_string()).collect();

        let strategy = strategy_for(options.tracing);
        let text = options.text_column.as_str();

        if strategy == Strategy::Traced {
            let terms = self.cdc.all_terms();
            lf = lf.with_columns(exec::term_count_exprs(text, &terms));
        }

        let groups: [(&str, &TermSet); 8] = [
            ("codes", self.cdc.codes()),
            ("inclusion1", self.cdc.inclusion1()),
            ("inclusion2", self.cdc.inclusion2()),
            ("exclusion", self.cdc.exclusion()),
            ("crack", self.cdc.crack()),
            ("crack_pairs", self.cdc.crack_pairs()),
            ("rum", self.cdc.rum()),
            ("coke", self.cdc.coke()),
        ];
        let group_exprs: Vec<Expr> = groups
            .iter()
            .map(|(name, set)| exec::group_match_expr(strategy, text, set).alias(*name))
            .collect();
        lf = lf.with_columns(group_exprs).with_columns(vec![
            col("crack").and(col("crack_pairs")).alias("crack_exclude"),
            col("rum").and(col("coke")).alias("rum_coke"),
        ]);

        let signal = when(col("codes"))
            .then(lit(true))
            .when(
                col("inclusion1")
                    .and(col("inclusion2"))
                    .and(col("exclusion").not())
                    .and(col("crack_exclude").not())
                    .and(col("rum_coke").not()),
            )
            .then(lit(true))
            .otherwise(lit(false))
            .alias("signal");
        lf = lf.with_column(signal);

        if strategy == Strategy::Untraced {
            let mut selection: Vec<Expr> = original.iter().map(|name| col(name.as_str())).collect();
            selection.push(col("signal"));
            lf = lf.select(selection);
        }
        Ok(lf)
    }

    /// Evaluate the Bettano rule set, adding `level1..level{depth}` columns.
    ///
    /// Level N (N > 1) is only evaluated for rows that satisfied level N-1;
    /// results are stitched back onto the full table through a row-index
    /// left join, so excluded rows report `false`.
    pub fn evaluate_bettano(
        &self,
        table: impl Into<TableSource>,
        options: &BettanoOptions,
    ) -> Result<LazyFrame> {
        let mut lf = table.into().into_lazy();
        let schema = lf.collect_schema()?;
        let depth = options.depth;
        if depth == 0 || depth > self.bettano.depth() {
            return Err(SearchError::Configuration(format!(
                "depth must be between 1 and {}, got {depth}",
                self.bettano.depth()
            ))
            .into());
        }
        ensure_column(&schema, &options.text_column)?;
        let age_column = if depth > 1 {
            let Some(age) = options.age_column.as_deref() else {
                return Err(SearchError::Configuration(
                    "an age column is required when depth > 1".into(),
                )
                .into());
            };
            ensure_column(&schema, age)?;
            Some(age)
        } else {
            if options.age_column.is_some() {
                warn!("age column is not used when depth == 1; ignoring it");
            }
            None
        };

        let strategy = strategy_for(options.tracing);
        let text = options.text_column.as_str();
        let original: Vec<String> = schema.iter_names().map(|name| name.to_string()).collect();

        if let Some(age) = age_column {
            lf = lf
                .with_row_index(exec::ROW_INDEX, None)
                .with_columns(exec::age_gate_exprs(age));
        }
        if strategy == Strategy::Traced {
            let terms = self.bettano.combined_terms(depth);
            lf = lf.with_columns(exec::term_count_exprs(text, &terms));
        }

        let levels = self.bettano.levels(depth);
        let mut out = if depth == 1 {
            let (frame, _) = aggregate_level(lf, &levels[0], strategy, text);
            frame
        } else {
            let mut joined = lf.clone();
            let mut parent = lf;
            for level in levels {
                if level.index > 1 {
                    parent = parent.filter(col(level_column(level.index - 1).as_str()));
                }
                let (frame, added) = aggregate_level(parent, level, strategy, text);
                parent = frame.clone();
                let mut selection = vec![col(exec::ROW_INDEX)];
                selection.extend(added.iter().map(|name| col(name.as_str())));
                joined = joined.left_join(
                    frame.select(selection),
                    col(exec::ROW_INDEX),
                    col(exec::ROW_INDEX),
                );
            }
            joined.sort([exec::ROW_INDEX], SortMultipleOptions::default())
        };

        match strategy {
            Strategy::Untraced => {
                let mut selection: Vec<Expr> =
                    original.iter().map(|name| col(name.as_str())).collect();
                for index in 1..=depth {
                    selection.push(col(level_column(index).as_str()).fill_null(lit(false)));
                }
                out = out.select(selection);
            }
            Strategy::Traced => {
                // Rows dropped by level chaining report false on the public
                // level columns; intermediate columns keep their nulls.
                let filled: Vec<Expr> = (1..=depth)
                    .map(|index| col(level_column(index).as_str()).fill_null(lit(false)))
                    .collect();
                out = out.with_columns(filled);
            }
        }
        Ok(out)
    }
}

fn strategy_for(tracing: bool) -> Strategy {
    if tracing {
        warn!("{TRACING_ADVISORY}");
        Strategy::Traced
    } else {
        Strategy::Untraced
    }
}

fn ensure_column(schema: &Schema, name: &str) -> Result<()> {
    if schema.get(name).is_none() {
        return Err(
            SearchError::Configuration(format!("column `{name}` not found in table")).into(),
        );
    }
    Ok(())
}
