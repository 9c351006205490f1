//! Parametric tests: t-tests, one-way ANOVA, Levene's variance test

use super::{f_p_value, omit_nan, require_len, t_p_value};
use crate::config::LeveneCenter;
use crate::summary::{mean, median, trimboth, variance};
use crate::types::{Alternative, Result, StatsError, TestOutcome};

/// Independent two-sample t-test
///
/// `equal_var = true` pools the variances (classic Student); `false` uses
/// Welch's statistic with Welch-Satterthwaite degrees of freedom.
pub fn ttest_ind(
    a: &[f64],
    b: &[f64],
    equal_var: bool,
    alternative: Alternative,
) -> Result<TestOutcome> {
    let a = omit_nan(a);
    let b = omit_nan(b);
    require_len("independent t-test", 2, a.len())?;
    require_len("independent t-test", 2, b.len())?;

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(&a), mean(&b));
    let (v1, v2) = (variance(&a), variance(&b));

    let (t_stat, df) = if equal_var {
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / (n1 + n2 - 2.0);
        let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
        ((m1 - m2) / se, n1 + n2 - 2.0)
    } else {
        let se = (v1 / n1 + v2 / n2).sqrt();
        let t = (m1 - m2) / se;
        // Welch-Satterthwaite degrees of freedom
        let num = (v1 / n1 + v2 / n2).powi(2);
        let denom = (v1 / n1).powi(2) / (n1 - 1.0) + (v2 / n2).powi(2) / (n2 - 1.0);
        (t, num / denom)
    };

    if !t_stat.is_finite() {
        return Err(StatsError::DegenerateSample(
            "t statistic is not finite (zero variance in both samples?)".to_string(),
        ));
    }

    Ok(TestOutcome {
        statistic: t_stat,
        p_value: t_p_value(t_stat, df, alternative)?,
    })
}

/// Paired t-test: one-sample t-test on the pairwise differences
///
/// Pairs where either side is missing are dropped before differencing.
pub fn ttest_rel(a: &[f64], b: &[f64], alternative: Alternative) -> Result<TestOutcome> {
    if a.len() != b.len() {
        return Err(StatsError::UnequalLength {
            left: a.len(),
            right: b.len(),
        });
    }

    let diffs: Vec<f64> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| x - y)
        .collect();
    require_len("paired t-test", 2, diffs.len())?;

    let n = diffs.len() as f64;
    let m = mean(&diffs);
    let s = variance(&diffs).sqrt();
    if s == 0.0 {
        return Err(StatsError::DegenerateSample(
            "all pairwise differences are identical".to_string(),
        ));
    }

    let t_stat = m / (s / n.sqrt());
    let df = n - 1.0;

    Ok(TestOutcome {
        statistic: t_stat,
        p_value: t_p_value(t_stat, df, alternative)?,
    })
}

/// One-way analysis of variance
///
/// F = between-group mean square / within-group mean square, with
/// (k - 1, N - k) degrees of freedom.
pub fn f_oneway(groups: &[&[f64]]) -> Result<TestOutcome> {
    if groups.len() < 2 {
        return Err(StatsError::GroupCount {
            test: "one-way ANOVA",
            expected: "at least 2",
            actual: groups.len(),
        });
    }

    let groups: Vec<Vec<f64>> = groups.iter().map(|g| omit_nan(g)).collect();
    for group in &groups {
        require_len("one-way ANOVA", 2, group.len())?;
    }

    let k = groups.len() as f64;
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let n_f = n_total as f64;

    let grand_mean =
        groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_f;

    let ss_between: f64 = groups
        .iter()
        .map(|g| g.len() as f64 * (mean(g) - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .map(|g| {
            let m = mean(g);
            g.iter().map(|x| (x - m).powi(2)).sum::<f64>()
        })
        .sum();

    if ss_within == 0.0 {
        return Err(StatsError::DegenerateSample(
            "zero within-group variance".to_string(),
        ));
    }

    let df_between = k - 1.0;
    let df_within = n_f - k;
    let f_stat = (ss_between / df_between) / (ss_within / df_within);

    Ok(TestOutcome {
        statistic: f_stat,
        p_value: f_p_value(f_stat, df_between, df_within)?,
    })
}

/// Levene's test for variance homogeneity
///
/// Transforms each observation into its absolute deviation from the group
/// center and runs a one-way ANOVA on the deviations. The median and
/// trimmed centers are the Brown-Forsythe variants; the trimmed center
/// first drops 5% of each group's observations from both tails (scipy's
/// `trimboth` treatment) and centers the survivors on their mean.
pub fn levene(groups: &[&[f64]], center: LeveneCenter) -> Result<TestOutcome> {
    if groups.len() < 2 {
        return Err(StatsError::GroupCount {
            test: "Levene's test",
            expected: "at least 2",
            actual: groups.len(),
        });
    }

    let groups: Vec<Vec<f64>> = groups.iter().map(|g| omit_nan(g)).collect();
    for group in &groups {
        require_len("Levene's test", 2, group.len())?;
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let (values, c) = match center {
                LeveneCenter::Mean => (g.clone(), mean(g)),
                LeveneCenter::Median => (g.clone(), median(g)),
                LeveneCenter::Trimmed => {
                    let kept = trimboth(g, 0.05);
                    let c = mean(&kept);
                    (kept, c)
                }
            };
            values.iter().map(|x| (x - c).abs()).collect()
        })
        .collect();

    let refs: Vec<&[f64]> = deviations.iter().map(|d| d.as_slice()).collect();
    f_oneway(&refs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // Two clearly separated samples
    const LOW: [f64; 8] = [4.8, 5.1, 5.3, 4.9, 5.0, 5.2, 4.7, 5.1];
    const HIGH: [f64; 8] = [7.9, 8.2, 8.1, 7.8, 8.0, 8.3, 7.7, 8.1];

    #[test]
    fn test_ttest_ind_detects_shift() {
        let outcome = ttest_ind(&LOW, &HIGH, true, Alternative::TwoSided).unwrap();
        assert!(outcome.statistic < 0.0);
        assert!(outcome.p_value < 0.001);
    }

    #[test]
    fn test_ttest_ind_null_case() {
        let a = [5.0, 5.1, 4.9, 5.2, 4.8, 5.0];
        let b = [5.1, 4.9, 5.0, 5.1, 4.9, 5.0];
        let outcome = ttest_ind(&a, &b, true, Alternative::TwoSided).unwrap();
        assert!(outcome.p_value > 0.5);
    }

    #[test]
    fn test_ttest_ind_welch_close_to_student_for_equal_vars() {
        let student = ttest_ind(&LOW, &HIGH, true, Alternative::TwoSided).unwrap();
        let welch = ttest_ind(&LOW, &HIGH, false, Alternative::TwoSided).unwrap();
        assert_abs_diff_eq!(student.statistic, welch.statistic, epsilon = 1e-9);
    }

    #[test]
    fn test_ttest_ind_directional() {
        let less = ttest_ind(&LOW, &HIGH, true, Alternative::Less).unwrap();
        let greater = ttest_ind(&LOW, &HIGH, true, Alternative::Greater).unwrap();
        assert!(less.p_value < 0.001);
        assert!(greater.p_value > 0.99);
    }

    #[test]
    fn test_ttest_rel_paired_shift() {
        let before: [f64; 8] = [12.0, 11.5, 13.0, 12.2, 11.8, 12.5, 12.9, 11.6];
        let after: Vec<f64> = before.iter().map(|x| x + 1.0 + 0.1 * x.sin()).collect();
        let outcome = ttest_rel(&before, &after, Alternative::TwoSided).unwrap();
        assert!(outcome.statistic < 0.0);
        assert!(outcome.p_value < 0.001);
    }

    #[test]
    fn test_ttest_rel_drops_incomplete_pairs() {
        let a = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let b = [1.1, 2.0, 3.2, 3.9, 5.1];
        // Works: NaN pair dropped, 4 pairs remain
        assert!(ttest_rel(&a, &b, Alternative::TwoSided).is_ok());
    }

    #[test]
    fn test_ttest_rel_length_mismatch() {
        assert!(matches!(
            ttest_rel(&[1.0, 2.0], &[1.0], Alternative::TwoSided),
            Err(StatsError::UnequalLength { .. })
        ));
    }

    #[test]
    fn test_f_oneway_separated_groups() {
        let c: Vec<f64> = LOW.iter().map(|x| x + 10.0).collect();
        let outcome = f_oneway(&[&LOW, &HIGH, &c]).unwrap();
        assert!(outcome.statistic > 100.0);
        assert!(outcome.p_value < 1e-6);
    }

    #[test]
    fn test_f_oneway_identical_distributions() {
        let a = [5.0, 6.0, 4.0, 5.5, 4.5, 5.0];
        let b = [5.1, 5.9, 4.1, 5.4, 4.6, 5.2];
        let outcome = f_oneway(&[&a, &b]).unwrap();
        assert!(outcome.p_value > 0.5);
    }

    #[test]
    fn test_f_oneway_needs_two_groups() {
        assert!(matches!(
            f_oneway(&[&LOW[..]]),
            Err(StatsError::GroupCount { .. })
        ));
    }

    #[test]
    fn test_levene_homogeneous() {
        let outcome = levene(&[&LOW, &HIGH], LeveneCenter::Mean).unwrap();
        assert!(outcome.p_value > 0.05);
    }

    #[test]
    fn test_levene_detects_spread_difference() {
        let tight = [5.0, 5.1, 4.9, 5.0, 5.1, 4.9, 5.0, 5.1, 4.9, 5.0];
        let wide = [1.0, 9.0, 2.0, 8.0, 0.5, 9.5, 1.5, 8.5, 0.0, 10.0];
        let outcome = levene(&[&tight, &wide], LeveneCenter::Median).unwrap();
        assert!(outcome.p_value < 0.01);
    }

    #[test]
    fn test_levene_median_center_matches_reference() {
        // scipy.stats.levene docstring example (machining measurements)
        let a = [8.88, 9.12, 9.04, 8.98, 9.00, 9.08, 9.01, 8.85, 9.06, 8.99];
        let b = [8.88, 8.95, 9.29, 9.44, 9.15, 9.58, 8.36, 9.18, 8.67, 9.05];
        let c = [8.95, 9.12, 8.95, 8.85, 9.03, 8.84, 9.07, 8.98, 8.86, 8.98];

        let outcome = levene(&[&a, &b, &c], LeveneCenter::Median).unwrap();
        assert_abs_diff_eq!(outcome.statistic, 7.584952754501659, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.p_value, 0.002431505967249681, epsilon = 1e-6);
    }

    #[test]
    fn test_levene_trimmed_center_trims_the_samples() {
        // 20 observations per group, so the 5% trim drops one value from
        // each tail before the deviations are computed
        let mut wide: Vec<f64> = (1..=18).map(|v| v as f64).collect();
        wide.insert(0, -40.0);
        wide.push(60.0);
        let tight: Vec<f64> = (1..=20).map(|v| v as f64 * 0.1 + 5.0).collect();

        let trimmed = levene(&[&wide, &tight], LeveneCenter::Trimmed).unwrap();

        // Trimming by hand and running the mean-center test must agree
        let wide_cut: Vec<f64> = (1..=18).map(|v| v as f64).collect();
        let tight_cut: Vec<f64> = (2..=19).map(|v| v as f64 * 0.1 + 5.0).collect();
        let manual = levene(&[&wide_cut, &tight_cut], LeveneCenter::Mean).unwrap();

        assert_abs_diff_eq!(trimmed.statistic, manual.statistic, epsilon = 1e-9);
        assert_abs_diff_eq!(trimmed.p_value, manual.p_value, epsilon = 1e-9);
    }
}
