//! Core types for the EDA statistics library
//!
//! This module defines the tabular input model consumed by every helper
//! (frequency tables, outlier trimming, hypothesis tests, plots) and the
//! outcome type the test wrappers emit. The library is stateless - it never
//! owns or persists the caller's data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for statistics operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur while analysing a table
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column {0} is not numeric")]
    NotNumeric(String),

    #[error("Column {0} is not categorical")]
    NotCategorical(String),

    #[error("Not enough observations: {test} requires at least {required}, got {actual}")]
    TooFewObservations {
        test: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Wrong number of groups: {test} expects {expected}, got {actual}")]
    GroupCount {
        test: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("Paired samples must have equal length: {left} vs {right}")]
    UnequalLength { left: usize, right: usize },

    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    #[error("Numerical error: {0}")]
    Numeric(String),
}

/// A single column of a table
///
/// Numeric columns use NaN for missing values; categorical columns use
/// `None`. Every consumer omits missing values, matching scipy's
/// `nan_policy="omit"` convention.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Floating-point observations (NaN = missing)
    Numeric(Vec<f64>),
    /// String-labelled observations (None = missing)
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Number of rows, including missing entries
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// True if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if this is a numeric column
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// Tabular input: rows = observations, named columns = variables
///
/// Columns preserve insertion order, so "run a test across all numeric
/// columns" visits them the way the caller laid the table out.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: append a numeric column
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), Column::Numeric(values)));
        self
    }

    /// Builder method: append a categorical column
    pub fn with_categorical(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Self {
        self.columns.push((name.into(), Column::Categorical(values)));
        self
    }

    /// Append a column in place
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) {
        self.columns.push((name.into(), column));
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| StatsError::ColumnNotFound(name.to_string()))
    }

    /// Numeric column with missing values retained (NaN in place)
    ///
    /// Needed by paired tests, which must drop incomplete pairs row-wise
    /// rather than per column.
    pub fn numeric_raw(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(StatsError::NotNumeric(name.to_string())),
        }
    }

    /// Numeric column with missing (NaN) values omitted
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self
            .numeric_raw(name)?
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect())
    }

    /// Categorical column with missing values omitted
    pub fn categorical(&self, name: &str) -> Result<Vec<&str>> {
        match self.column(name)? {
            Column::Categorical(v) => {
                Ok(v.iter().filter_map(|o| o.as_deref()).collect())
            }
            Column::Numeric(_) => Err(StatsError::NotCategorical(name.to_string())),
        }
    }

    /// Project the table onto a subset of its columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let mut out = Table::new();
        for name in names {
            out.push_column(*name, self.column(name)?.clone());
        }
        Ok(out)
    }

    /// All numeric columns as (name, NaN-omitted values) pairs
    ///
    /// This is the grouping the test wrappers consume: each numeric column
    /// is one sample.
    pub fn numeric_columns(&self) -> Vec<(&str, Vec<f64>)> {
        self.columns
            .iter()
            .filter_map(|(name, col)| match col {
                Column::Numeric(v) => Some((
                    name.as_str(),
                    v.iter().copied().filter(|x| !x.is_nan()).collect(),
                )),
                Column::Categorical(_) => None,
            })
            .collect()
    }
}

/// Direction of the alternative hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// Means/locations differ in either direction
    #[default]
    TwoSided,
    /// First sample is shifted below the second
    Less,
    /// First sample is shifted above the second
    Greater,
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alternative::TwoSided => write!(f, "two-sided"),
            Alternative::Less => write!(f, "less"),
            Alternative::Greater => write!(f, "greater"),
        }
    }
}

/// Verdict of a hypothesis test against a significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// p-value <= alpha
    Reject,
    /// p-value > alpha
    FailToReject,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Reject => write!(f, "Rejects the null hypothesis."),
            Verdict::FailToReject => write!(f, "Does not reject the null hypothesis."),
        }
    }
}

/// Outcome of a hypothesis test: the statistic and its p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test statistic (t, F, W, U, H, chi-square... depending on the test)
    pub statistic: f64,
    /// Two-sided or directional p-value, per the requested alternative
    pub p_value: f64,
}

impl TestOutcome {
    /// Compare the p-value against a significance level
    ///
    /// Strictly-greater comparison: `p > alpha` fails to reject, anything
    /// else rejects.
    pub fn verdict(&self, alpha: f64) -> Verdict {
        if self.p_value > alpha {
            Verdict::FailToReject
        } else {
            Verdict::Reject
        }
    }
}
