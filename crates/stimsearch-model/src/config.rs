//! Serde definitions of the external pattern files.
//!
//! Two files feed the engine: one defining the single-level CDC rule and one
//! defining the three-level Bettano rule. Only the structure is specified
//! here; compilation into immutable rule sets happens in [`crate::ruleset`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Raw CDC pattern file contents.
///
/// `crack`, `rum` and `coke` are single pivot terms; the crack/crack-pairs
/// and rum/coke combinations form the bespoke CDC exclusions.
#[derive(Debug, Clone, Deserialize)]
pub struct CdcPatternConfig {
    pub codes: Vec<String>,
    pub inclusion1: Vec<String>,
    pub inclusion2: Vec<String>,
    pub exclusion: Vec<String>,
    pub crack: String,
    pub crack_pairs: Vec<String>,
    pub rum: String,
    pub coke: String,
}

impl CdcPatternConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// One criterion definition, tagged by variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CriterionConfig {
    Simple {
        inclusion: Vec<String>,
        #[serde(default)]
        exclusion: Option<Vec<String>>,
    },
    DoubleNegative {
        inclusion: Vec<String>,
        exclusion1: Vec<String>,
        exclusion2: Vec<String>,
    },
    DoublePositive {
        inclusion1: Vec<String>,
        inclusion2: Vec<String>,
        exclusion: Vec<String>,
    },
    TriplePositive {
        inclusion1: Vec<String>,
        inclusion2: Vec<String>,
        inclusion3: Vec<String>,
    },
    TwoPart {
        inclusion1: Vec<String>,
        exclusion1: Vec<String>,
        inclusion2: Vec<String>,
        exclusion2: Vec<String>,
    },
    NestedMultiBranch {
        list_a: Vec<String>,
        branches: Vec<BranchConfig>,
        list_c: Vec<String>,
    },
}

/// One named branch of the nested multi-branch criterion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchConfig {
    pub name: String,
    pub inclusion: Vec<String>,
    #[serde(default)]
    pub exclusion1: Option<Vec<String>>,
    #[serde(default)]
    pub exclusion2: Option<Vec<String>>,
    #[serde(default)]
    pub exclusion3: Option<Vec<String>>,
    #[serde(default)]
    pub bypass_list_c: bool,
}

/// Raw Bettano pattern file contents: ordered levels, each an ordered list
/// of criteria. Level order is dependency order.
#[derive(Debug, Clone, Deserialize)]
pub struct BettanoPatternConfig {
    pub levels: Vec<Vec<CriterionConfig>>,
}

impl BettanoPatternConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
