//! Data model for the stimulant-mention search engine.
//!
//! This crate provides the building blocks that the execution engine
//! evaluates against free-text records:
//!
//! - **terms**: compilation of literal term lists into alternation patterns
//!   and expansion of finite patterns back into term sets
//! - **criteria**: the criterion variants (simple, double-negative,
//!   double-positive, triple-positive, two-part, nested multi-branch) with
//!   pre-compiled term groups
//! - **config**: serde definitions of the external pattern files
//! - **ruleset**: compiled, immutable rule sets (CDC and Bettano)
//!
//! Rule sets are compiled once from configuration and are read-only for the
//! lifetime of the process; they can be shared freely across evaluation calls.

pub mod config;
pub mod criteria;
pub mod error;
pub mod ruleset;
pub mod terms;

pub use config::{BettanoPatternConfig, BranchConfig, CdcPatternConfig, CriterionConfig};
pub use criteria::{
    Criterion, DoubleNegativeCriterion, DoublePositiveCriterion, NestedBranch,
    NestedMultiBranchCriterion, SimpleCriterion, TermSet, TriplePositiveCriterion,
    TwoPartCriterion,
};
pub use error::{Result, SearchError};
pub use ruleset::{BettanoRuleSet, CdcRuleSet, Level};
