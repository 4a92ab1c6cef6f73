//! Conversion boundary for caller-supplied tables.
//!
//! The engine accepts either a materialized [`DataFrame`] or an existing
//! [`LazyFrame`] plan; everything downstream works on the lazy form.

use polars::prelude::{DataFrame, IntoLazy, LazyFrame};

/// A tabular dataset in either eager or lazy form.
pub enum TableSource {
    Eager(DataFrame),
    Lazy(LazyFrame),
}

impl TableSource {
    pub fn into_lazy(self) -> LazyFrame {
        match self {
            TableSource::Eager(df) => df.lazy(),
            TableSource::Lazy(lf) => lf,
        }
    }
}

impl From<DataFrame> for TableSource {
    fn from(df: DataFrame) -> Self {
        TableSource::Eager(df)
    }
}

impl From<LazyFrame> for TableSource {
    fn from(lf: LazyFrame) -> Self {
        TableSource::Lazy(lf)
    }
}
