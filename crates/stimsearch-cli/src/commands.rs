//! Subcommand implementations.

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use polars::prelude::*;
use stimsearch_engine::{BettanoOptions, CdcOptions, SearchEngine};
use tracing::info;

use crate::cli::{BettanoArgs, CdcArgs};

pub fn run_cdc(args: &CdcArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.patterns)?;
    let records = scan_csv(&args.input)?;
    let options = CdcOptions::new(args.text_col.as_str()).with_tracing(args.tracing);

    let mut result = engine
        .evaluate_cdc(records, &options)?
        .collect()
        .context("CDC evaluation failed")?;

    let flagged = count_true(&result, "signal")?;
    info!(rows = result.height(), flagged, "CDC evaluation finished");
    emit(&mut result, args.output.as_deref())
}

pub fn run_bettano(args: &BettanoArgs) -> anyhow::Result<()> {
    let engine = load_engine(&args.patterns)?;
    let records = scan_csv(&args.input)?;
    let mut options = BettanoOptions::new(args.text_col.as_str())
        .with_depth(args.depth)
        .with_tracing(args.tracing);
    if let Some(age_col) = &args.age_col {
        options = options.with_age_column(age_col.as_str());
    }

    let mut result = engine
        .evaluate_bettano(records, &options)?
        .collect()
        .context("Bettano evaluation failed")?;

    for index in 1..=args.depth {
        let column = format!("level{index}");
        let flagged = count_true(&result, &column)?;
        info!(rows = result.height(), %column, flagged, "level finished");
    }
    emit(&mut result, args.output.as_deref())
}

fn load_engine(patterns: &Path) -> anyhow::Result<SearchEngine> {
    SearchEngine::from_pattern_dir(patterns)
        .with_context(|| format!("failed to load pattern files from {}", patterns.display()))
}

fn scan_csv(path: &Path) -> anyhow::Result<LazyFrame> {
    if !path.exists() {
        anyhow::bail!("CSV file not found: {}", path.display());
    }
    let path_str = path.to_string_lossy();
    LazyCsvReader::new(PlPath::new(&path_str))
        .with_has_header(true)
        .finish()
        .with_context(|| format!("failed to scan CSV: {}", path.display()))
}

fn count_true(df: &DataFrame, column: &str) -> anyhow::Result<usize> {
    let count = df
        .column(column)?
        .bool()?
        .sum()
        .unwrap_or(0);
    Ok(count as usize)
}

fn emit(df: &mut DataFrame, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            CsvWriter::new(file)
                .include_header(true)
                .finish(df)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{df}"),
    }
    Ok(())
}
