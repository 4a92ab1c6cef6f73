//! Tests for the Bettano rule set evaluation.

mod common;

use common::{bool_column, engine, frame, id_column};
use polars::prelude::*;
use stimsearch_engine::{BettanoOptions, EngineError};
use stimsearch_model::SearchError;

fn options(depth: usize) -> BettanoOptions {
    BettanoOptions::new("text")
        .with_age_column("age")
        .with_depth(depth)
}

#[test]
fn depth_one_adds_exactly_level1() {
    let df = frame(&[("coke use daily", 30), ("no findings", 40)]);
    let result = engine()
        .evaluate_bettano(df.clone(), &BettanoOptions::new("text").with_depth(1))
        .unwrap()
        .collect()
        .unwrap();

    assert_eq!(result.height(), df.height());
    assert_eq!(result.width(), df.width() + 1);
    assert_eq!(bool_column(&result, "level1"), vec![true, false]);
}

#[test]
fn depth_three_adds_exactly_three_level_columns() {
    let df = frame(&[
        ("coke binge with relapse", 40),
        ("coke binge", 40),
        ("nothing relevant", 40),
    ]);
    let result = engine()
        .evaluate_bettano(df.clone(), &options(3))
        .unwrap()
        .collect()
        .unwrap();

    assert_eq!(result.height(), df.height());
    assert_eq!(result.width(), df.width() + 3);
    assert_eq!(id_column(&result), vec![0, 1, 2]);
    assert_eq!(bool_column(&result, "level1"), vec![true, true, false]);
    assert_eq!(bool_column(&result, "level2"), vec![true, true, false]);
    assert_eq!(bool_column(&result, "level3"), vec![true, false, false]);
}

#[test]
fn levels_chain_through_their_predecessors() {
    // Level 2 terms without any level 1 term: never evaluated, reported false.
    let df = frame(&[("binge noted, no drug named", 30)]);
    let result = engine()
        .evaluate_bettano(df, &options(2))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(bool_column(&result, "level1"), vec![false]);
    assert_eq!(bool_column(&result, "level2"), vec![false]);
}

#[test]
fn levels_past_one_require_age_over_fourteen() {
    let df = frame(&[("coke binge", 12), ("coke binge", 15)]);
    let result = engine()
        .evaluate_bettano(df, &options(2))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(bool_column(&result, "level1"), vec![true, true]);
    assert_eq!(bool_column(&result, "level2"), vec![false, true]);
}

#[test]
fn triple_positive_age_gates() {
    // inclusion1 = cardiac arrest (no gate), inclusion2 = relapse (< 46),
    // inclusion3 = craving (< 55).
    let df = frame(&[
        ("coke binge relapse", 40),
        ("coke binge relapse", 50),
        ("coke binge craving", 50),
        ("coke binge craving", 60),
        ("coke binge cardiac arrest", 60),
        ("coke binge", 40),
    ]);
    let result = engine()
        .evaluate_bettano(df, &options(3))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(
        bool_column(&result, "level3"),
        vec![true, false, true, false, true, false]
    );
}

#[test]
fn two_part_criterion_is_first_match_wins() {
    let df = frame(&[
        ("coke binge chest pain", 30),
        ("coke binge, no chest pain, palpitation", 30),
        ("coke binge, no chest pain, denies palpitation", 30),
    ]);
    let result = engine()
        .evaluate_bettano(df, &options(3))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(bool_column(&result, "level3"), vec![true, true, false]);
}

#[test]
fn nested_branch_bypasses_confirmation_list() {
    let df = frame(&[
        ("coke iv use, snort", 30),
        ("coke iv use, snort, prescribed", 30),
        ("coke iv use as prescribed", 30),
        ("coke iv use", 30),
    ]);
    let result = engine()
        .evaluate_bettano(df, &options(2))
        .unwrap()
        .collect()
        .unwrap();
    // The snort branch skips the listC check entirely; other branches fail
    // when a listC term is present.
    assert_eq!(
        bool_column(&result, "level2"),
        vec![true, true, false, true]
    );
}

#[test]
fn traced_and_untraced_strategies_agree() {
    let df = frame(&[
        ("coke binge relapse", 40),
        ("coke binge craving", 50),
        ("coke iv use, snort, prescribed", 30),
        ("crack found, track marks", 25),
        ("crack found, track marks near railroad", 25),
        ("coke positive urine", 33),
        ("coke false positive urine", 33),
        ("binge without level one terms", 30),
        ("cocaine overdose", 12),
        ("nothing at all", 45),
    ]);

    let untraced = engine()
        .evaluate_bettano(df.clone(), &options(3))
        .unwrap()
        .collect()
        .unwrap();
    let traced = engine()
        .evaluate_bettano(df.clone(), &options(3).with_tracing(true))
        .unwrap()
        .collect()
        .unwrap();

    assert_eq!(traced.height(), untraced.height());
    assert!(traced.width() > untraced.width());
    assert_eq!(id_column(&traced), id_column(&untraced));
    for level in ["level1", "level2", "level3"] {
        assert_eq!(
            bool_column(&traced, level),
            bool_column(&untraced, level),
            "strategies disagree on {level}"
        );
    }
}

#[test]
fn traced_exposes_per_term_and_per_criterion_columns() {
    let df = frame(&[("coke iv use, snort", 30)]);
    let traced = engine()
        .evaluate_bettano(df, &options(2).with_tracing(true))
        .unwrap()
        .collect()
        .unwrap();
    // Term-count diagnostics.
    assert!(traced.column("snort").is_ok());
    assert!(traced.column("track marks").is_ok());
    // Per-criterion and nested branch columns.
    assert!(traced.column("level1_crit1").is_ok());
    assert!(traced.column("level2_crit4_snort").is_ok());
    assert!(traced.column("level2_crit4_listb").is_ok());
}

#[test]
fn level_monotonicity_holds() {
    let df = frame(&[
        ("coke binge relapse", 40),
        ("coke binge", 40),
        ("coke", 40),
        ("overdose relapse craving", 40),
        ("nothing", 40),
    ]);
    let result = engine()
        .evaluate_bettano(df, &options(3))
        .unwrap()
        .collect()
        .unwrap();
    let level1 = bool_column(&result, "level1");
    let level2 = bool_column(&result, "level2");
    let level3 = bool_column(&result, "level3");
    for row in 0..result.height() {
        if level3[row] {
            assert!(level2[row], "level3 true without level2 at row {row}");
        }
        if level2[row] {
            assert!(level1[row], "level2 true without level1 at row {row}");
        }
    }
}

#[test]
fn null_text_matches_nothing() {
    let df = DataFrame::new(vec![
        Series::new("text".into(), vec![Some("coke binge"), None]).into(),
        Series::new("age".into(), vec![30i64, 30]).into(),
    ])
    .unwrap();
    let result = engine()
        .evaluate_bettano(df, &options(2))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(bool_column(&result, "level1"), vec![true, false]);
    assert_eq!(bool_column(&result, "level2"), vec![true, false]);
}

#[test]
fn depth_past_one_requires_an_age_column() {
    let df = frame(&[("coke", 30)]);
    let error = engine()
        .evaluate_bettano(df, &BettanoOptions::new("text").with_depth(2))
        .err()
        .unwrap();
    assert!(matches!(
        error,
        EngineError::Model(SearchError::Configuration(_))
    ));
}

#[test]
fn invalid_depths_are_rejected() {
    let df = frame(&[("coke", 30)]);
    for depth in [0usize, 4] {
        let error = engine()
            .evaluate_bettano(df.clone(), &options(depth))
            .err()
            .unwrap();
        assert!(matches!(
            error,
            EngineError::Model(SearchError::Configuration(_))
        ));
    }
}

#[test]
fn age_column_is_ignored_at_depth_one() {
    // Advisory only: evaluation proceeds without the age gates.
    let df = frame(&[("coke", 30)]);
    let result = engine()
        .evaluate_bettano(df.clone(), &options(1))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(result.width(), df.width() + 1);
    assert_eq!(bool_column(&result, "level1"), vec![true]);
}

#[test]
fn accepts_lazy_input() {
    let df = frame(&[("coke binge", 30)]);
    let result = engine()
        .evaluate_bettano(df.lazy(), &options(2))
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(bool_column(&result, "level2"), vec![true]);
}
