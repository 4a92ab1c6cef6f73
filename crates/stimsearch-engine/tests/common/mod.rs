//! Shared fixtures for engine tests.

use polars::prelude::*;
use stimsearch_engine::SearchEngine;
use stimsearch_model::config::{BettanoPatternConfig, CdcPatternConfig};
use stimsearch_model::ruleset::{BettanoRuleSet, CdcRuleSet};

const CDC_PATTERNS: &str = r#"{
    "codes": ["t40.5", "970.81"],
    "inclusion1": ["cocaine", "coke"],
    "inclusion2": ["abuse", "overdose"],
    "exclusion": ["decoke"],
    "crack": "crack",
    "crack_pairs": ["pipe", "rock"],
    "rum": "rum",
    "coke": "coke"
}"#;

const BETTANO_PATTERNS: &str = r#"{"levels": [
    [
        {"type": "simple", "inclusion": ["cocaine", "coke"], "exclusion": ["decoke"]},
        {"type": "simple", "inclusion": ["crack"], "exclusion": ["cracked rib"]}
    ],
    [
        {"type": "simple", "inclusion": ["binge"], "exclusion": ["binge watch"]},
        {"type": "double_negative", "inclusion": ["track marks"], "exclusion1": ["tracking"], "exclusion2": ["railroad"]},
        {"type": "double_positive", "inclusion1": ["positive"], "inclusion2": ["urine"], "exclusion": ["false positive"]},
        {"type": "nested_multi_branch", "list_a": ["iv"], "list_c": ["prescribed"], "branches": [
            {"name": "snort", "inclusion": ["snort"], "bypass_list_c": true},
            {"name": "inject", "inclusion": ["inject"], "exclusion1": ["injection site"], "exclusion2": ["insulin"], "exclusion3": ["depot"]},
            {"name": "crush", "inclusion": ["crush"], "exclusion1": ["crush injury"]}
        ]}
    ],
    [
        {"type": "simple", "inclusion": ["overdose"]},
        {"type": "two_part", "inclusion1": ["chest pain"], "exclusion1": ["no chest pain"], "inclusion2": ["palpitation"], "exclusion2": ["denies palpitation"]},
        {"type": "triple_positive", "inclusion1": ["cardiac arrest"], "inclusion2": ["relapse"], "inclusion3": ["craving"]}
    ]
]}"#;

pub fn engine() -> SearchEngine {
    let cdc = CdcRuleSet::compile(&CdcPatternConfig::from_json(CDC_PATTERNS).unwrap()).unwrap();
    let bettano =
        BettanoRuleSet::compile(&BettanoPatternConfig::from_json(BETTANO_PATTERNS).unwrap())
            .unwrap();
    SearchEngine::new(cdc, bettano)
}

/// A small record table with an id, free text, and an age column.
pub fn frame(rows: &[(&str, i64)]) -> DataFrame {
    let ids: Vec<i64> = (0..rows.len() as i64).collect();
    let texts: Vec<&str> = rows.iter().map(|(text, _)| *text).collect();
    let ages: Vec<i64> = rows.iter().map(|(_, age)| *age).collect();
    DataFrame::new(vec![
        Series::new("id".into(), ids).into(),
        Series::new("text".into(), texts).into(),
        Series::new("age".into(), ages).into(),
    ])
    .unwrap()
}

pub fn bool_column(df: &DataFrame, name: &str) -> Vec<bool> {
    df.column(name)
        .unwrap()
        .bool()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap_or(false))
        .collect()
}

pub fn id_column(df: &DataFrame) -> Vec<i64> {
    df.column("id")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|value| value.unwrap())
        .collect()
}
