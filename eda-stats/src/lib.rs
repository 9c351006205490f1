//! EDA Statistics Library
//!
//! A stateless, reusable library of exploratory-data-analysis helpers:
//! frequency-distribution tables, IQR outlier trimming, classical
//! hypothesis tests with textual verdicts, and composite figures.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on analysis:
//! - Consumes a caller-supplied [`Table`] (named columns of numeric or
//!   categorical observations); missing values are always omitted
//! - Computes frequency tables and IQR fences
//! - Runs the classical tests and returns statistic + p-value outcomes
//! - Renders fixed-format text reports and plotly figures
//!
//! The library does NOT:
//! - Load files or parse CSV
//! - Print to the console
//! - Own or persist the caller's data
//!
//! All higher-level functionality is in the application layer (eda-cli).
//!
//! # Example Usage
//!
//! ```
//! use eda_stats::{AnalysisConfig, Table};
//! use eda_stats::report::ttest_ind_report;
//!
//! let table = Table::new()
//!     .with_numeric("control", vec![4.8, 5.1, 5.3, 4.9, 5.0, 5.2])
//!     .with_numeric("treated", vec![7.9, 8.2, 8.1, 7.8, 8.0, 8.3]);
//!
//! let config = AnalysisConfig::new().with_alpha(0.05);
//! let report = ttest_ind_report(&table, &config).unwrap();
//! assert!(report.contains("Rejects the null hypothesis."));
//! ```

// Public modules
pub mod config;
pub mod frequency;
pub mod infer;
pub mod outliers;
pub mod plot;
pub mod report;
pub mod summary;
pub mod types;

// Re-export main types for convenience
pub use config::{AnalysisConfig, LeveneCenter};
pub use frequency::{FrequencyRow, FrequencyTable};
pub use outliers::{iqr_fences, trim_outliers, Fences};
pub use types::{
    Alternative, Column, Result, StatsError, Table, TestOutcome, Verdict,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
