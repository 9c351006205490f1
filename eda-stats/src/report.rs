//! Text reports for the hypothesis tests
//!
//! Renders fixed-format console blocks: a title, an underline, the
//! statistic, and a verdict sentence chosen by comparing the p-value
//! against the configured significance level. Renderers return a `String`
//! so they can be unit tested; printing is the caller's job.
//!
//! Every report treats each numeric column of the table as one sample.

use crate::config::AnalysisConfig;
use crate::infer;
use crate::types::{Result, StatsError, Table, TestOutcome, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// The single-outcome tests a table can be run through
///
/// Shapiro-Wilk is not listed here because it produces one outcome per
/// column; see [`shapiro_outcomes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    Levene,
    TtestInd,
    TtestRel,
    Anova,
    MannWhitney,
    Wilcoxon,
    Kruskal,
    Friedman,
}

/// Run one test over the table's numeric columns and return the raw outcome
pub fn test_outcome(
    table: &Table,
    config: &AnalysisConfig,
    kind: TestKind,
) -> Result<TestOutcome> {
    match kind {
        TestKind::Levene => {
            let samples = samples(table, "Levene's test")?;
            let groups: Vec<&[f64]> =
                samples.iter().map(|(_, s)| s.as_slice()).collect();
            infer::levene(&groups, config.levene_center)
        }
        TestKind::TtestInd => {
            let (a, b) = pair(table, "independent t-test")?;
            infer::ttest_ind(&a, &b, config.equal_variances, config.alternative)
        }
        TestKind::TtestRel => {
            let (a, b) = raw_pair(table, "paired t-test")?;
            infer::ttest_rel(a, b, config.alternative)
        }
        TestKind::Anova => {
            let samples = samples(table, "one-way ANOVA")?;
            let groups: Vec<&[f64]> =
                samples.iter().map(|(_, s)| s.as_slice()).collect();
            infer::f_oneway(&groups)
        }
        TestKind::MannWhitney => {
            let (a, b) = pair(table, "Mann-Whitney U")?;
            infer::mann_whitney(&a, &b, config.alternative)
        }
        TestKind::Wilcoxon => {
            let (a, b) = raw_pair(table, "Wilcoxon signed-rank")?;
            infer::wilcoxon(a, b, config.alternative)
        }
        TestKind::Kruskal => {
            let samples = samples(table, "Kruskal-Wallis")?;
            let groups: Vec<&[f64]> =
                samples.iter().map(|(_, s)| s.as_slice()).collect();
            infer::kruskal(&groups)
        }
        TestKind::Friedman => {
            let names: Vec<&str> = table
                .column_names()
                .filter(|n| table.numeric_raw(n).is_ok())
                .collect();
            let groups: Vec<&[f64]> = names
                .iter()
                .map(|n| table.numeric_raw(n))
                .collect::<Result<_>>()?;
            infer::friedman(&groups)
        }
    }
}

/// Shapiro-Wilk outcome for every numeric column
pub fn shapiro_outcomes(table: &Table) -> Result<Vec<(String, TestOutcome)>> {
    table
        .numeric_columns()
        .into_iter()
        .map(|(name, sample)| Ok((name.to_string(), infer::shapiro(&sample)?)))
        .collect()
}

fn header(title: &str) -> String {
    format!("{title}\n_______________\n\n")
}

fn verdict_block(
    title: &str,
    stat_label: &str,
    outcome: &TestOutcome,
    alpha: f64,
) -> String {
    let mut out = header(title);
    let _ = writeln!(out, "{stat_label} = {:.3}", outcome.statistic);
    let _ = writeln!(
        out,
        "{} (PVALUE = {:.3})",
        outcome.verdict(alpha),
        outcome.p_value
    );
    out
}

/// The table's numeric columns as named samples
fn samples<'t>(table: &'t Table, test: &'static str) -> Result<Vec<(&'t str, Vec<f64>)>> {
    let samples = table.numeric_columns();
    if samples.len() < 2 {
        return Err(StatsError::GroupCount {
            test,
            expected: "at least 2",
            actual: samples.len(),
        });
    }
    Ok(samples)
}

/// Exactly two numeric columns, with missing values kept in place so the
/// paired tests can drop incomplete pairs row-wise
fn raw_pair<'t>(table: &'t Table, test: &'static str) -> Result<(&'t [f64], &'t [f64])> {
    let names: Vec<&str> = table
        .column_names()
        .filter(|n| table.numeric_raw(n).is_ok())
        .collect();
    if names.len() != 2 {
        return Err(StatsError::GroupCount {
            test,
            expected: "exactly 2",
            actual: names.len(),
        });
    }
    Ok((table.numeric_raw(names[0])?, table.numeric_raw(names[1])?))
}

fn pair(table: &Table, test: &'static str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut samples = samples(table, test)?;
    if samples.len() != 2 {
        return Err(StatsError::GroupCount {
            test,
            expected: "exactly 2",
            actual: samples.len(),
        });
    }
    let (_, b) = samples.pop().expect("two samples");
    let (_, a) = samples.pop().expect("two samples");
    Ok((a, b))
}

/// Shapiro-Wilk report: one verdict line per numeric column
pub fn shapiro_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let mut out = header("Shapiro-Wilk test");
    for (name, outcome) in shapiro_outcomes(table)? {
        let _ = writeln!(out, "W = {:.3}", outcome.statistic);
        let sentence = match outcome.verdict(config.alpha) {
            Verdict::FailToReject => format!("{name} looks normally distributed."),
            Verdict::Reject => format!("{name} does not look normally distributed."),
        };
        let _ = writeln!(out, "{sentence} (PVALUE = {:.3})", outcome.p_value);
    }
    Ok(out)
}

/// Levene variance-homogeneity report across all numeric columns
pub fn levene_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::Levene)?;

    let mut out = header("Levene test");
    let _ = writeln!(out, "W = {:.3}", outcome.statistic);
    let sentence = match outcome.verdict(config.alpha) {
        Verdict::FailToReject => "Variances are homogeneous.",
        Verdict::Reject => "At least one variance differs.",
    };
    let _ = writeln!(out, "{sentence} (PVALUE = {:.3})", outcome.p_value);
    Ok(out)
}

/// Combined normality diagnostics: Shapiro-Wilk followed by Levene
pub fn normality_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let mut out = shapiro_report(table, config)?;
    out.push('\n');
    out.push_str(&levene_report(table, config)?);
    Ok(out)
}

/// Independent two-sample t-test report
pub fn ttest_ind_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::TtestInd)?;
    Ok(verdict_block(
        "Independent t-test",
        "t",
        &outcome,
        config.alpha,
    ))
}

/// Paired t-test report
pub fn ttest_rel_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::TtestRel)?;
    Ok(verdict_block("Paired t-test", "t", &outcome, config.alpha))
}

/// One-way ANOVA report across all numeric columns
pub fn anova_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::Anova)?;
    Ok(verdict_block("One-way ANOVA", "F", &outcome, config.alpha))
}

/// Mann-Whitney U report
pub fn mann_whitney_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::MannWhitney)?;
    Ok(verdict_block(
        "Mann-Whitney test",
        "U",
        &outcome,
        config.alpha,
    ))
}

/// Wilcoxon signed-rank report
pub fn wilcoxon_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::Wilcoxon)?;
    Ok(verdict_block("Wilcoxon test", "T", &outcome, config.alpha))
}

/// Kruskal-Wallis report across all numeric columns
pub fn kruskal_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::Kruskal)?;
    Ok(verdict_block("Kruskal test", "H", &outcome, config.alpha))
}

/// Friedman report across all numeric columns
pub fn friedman_report(table: &Table, config: &AnalysisConfig) -> Result<String> {
    let outcome = test_outcome(table, config, TestKind::Friedman)?;
    Ok(verdict_block(
        "Friedman test",
        "chi-square",
        &outcome,
        config.alpha,
    ))
}
