//! Lazy columnar execution engine for the criteria rule sets.
//!
//! The engine turns compiled rule sets ([`stimsearch_model`]) into Polars
//! lazy query plans over a tabular dataset:
//!
//! - **table**: conversion boundary accepting eager or lazy frames
//! - **exec**: per-criterion column expressions under the two strategies
//!   (untraced combined-pattern containment, traced per-term counting)
//! - **aggregate**: per-level boolean combination, nested multi-branch
//!   resolution, and the filter-then-rejoin level chaining
//! - **engine**: the public `evaluate_cdc` / `evaluate_bettano` operations
//!
//! Everything composes lazily; nothing executes until the caller collects
//! the returned [`polars::prelude::LazyFrame`].

mod aggregate;
mod exec;

pub mod engine;
pub mod error;
pub mod options;
pub mod table;

pub use engine::SearchEngine;
pub use error::{EngineError, Result};
pub use options::{BettanoOptions, CdcOptions};
pub use table::TableSource;
