//! Non-parametric tests: Mann-Whitney U, Wilcoxon signed-rank,
//! Kruskal-Wallis, Friedman
//!
//! All four use large-sample approximations (normal or chi-square) with the
//! standard tie corrections; exact small-sample enumeration is out of scope.

use super::{chi2_p_value, omit_nan, require_len, z_p_value};
use crate::summary::ranks_with_ties;
use crate::types::{Alternative, Result, StatsError, TestOutcome};

/// Mann-Whitney U test for two independent samples
///
/// Returns the U statistic of the first sample. The p-value comes from the
/// normal approximation with tie correction and a 0.5 continuity
/// correction.
pub fn mann_whitney(a: &[f64], b: &[f64], alternative: Alternative) -> Result<TestOutcome> {
    let a = omit_nan(a);
    let b = omit_nan(b);
    require_len("Mann-Whitney U", 1, a.len())?;
    require_len("Mann-Whitney U", 1, b.len())?;

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let n = n1 + n2;

    let mut combined = a.clone();
    combined.extend_from_slice(&b);
    let (ranks, ties) = ranks_with_ties(&combined);

    let r1: f64 = ranks[..a.len()].iter().sum();
    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;

    let mean_u = n1 * n2 / 2.0;
    let tie_term: f64 = ties.iter().map(|&t| (t * t * t - t) as f64).sum();
    let var_u = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if var_u <= 0.0 {
        return Err(StatsError::DegenerateSample(
            "all observations are tied".to_string(),
        ));
    }

    // Continuity correction pulls the statistic toward the mean
    let numerator = match alternative {
        Alternative::TwoSided => {
            let d = u1 - mean_u;
            d - 0.5 * d.signum()
        }
        Alternative::Greater => u1 - mean_u - 0.5,
        Alternative::Less => u1 - mean_u + 0.5,
    };
    let z = numerator / var_u.sqrt();

    Ok(TestOutcome {
        statistic: u1,
        p_value: z_p_value(z, alternative)?,
    })
}

/// Wilcoxon signed-rank test for two paired samples
///
/// Zero differences are discarded (Wilcoxon's original treatment, the scipy
/// default). For the two-sided alternative the statistic is
/// min(T+, T-); for directional alternatives it is T+.
pub fn wilcoxon(a: &[f64], b: &[f64], alternative: Alternative) -> Result<TestOutcome> {
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
        .filter(|d| *d != 0.0)
        .collect();
    require_len("Wilcoxon signed-rank", 1, diffs.len())?;

    let n = diffs.len() as f64;
    let abs_diffs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, ties) = ranks_with_ties(&abs_diffs);

    let t_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let t_minus = n * (n + 1.0) / 2.0 - t_plus;

    let mean_t = n * (n + 1.0) / 4.0;
    let tie_term: f64 = ties.iter().map(|&t| (t * t * t - t) as f64).sum();
    let var_t = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_term / 48.0;
    if var_t <= 0.0 {
        return Err(StatsError::DegenerateSample(
            "all absolute differences are tied".to_string(),
        ));
    }

    let z = (t_plus - mean_t) / var_t.sqrt();
    let statistic = match alternative {
        Alternative::TwoSided => t_plus.min(t_minus),
        _ => t_plus,
    };

    Ok(TestOutcome {
        statistic,
        p_value: z_p_value(z, alternative)?,
    })
}

/// Kruskal-Wallis H test for two or more independent samples
pub fn kruskal(groups: &[&[f64]]) -> Result<TestOutcome> {
    if groups.len() < 2 {
        return Err(StatsError::GroupCount {
            test: "Kruskal-Wallis",
            expected: "at least 2",
            actual: groups.len(),
        });
    }

    let groups: Vec<Vec<f64>> = groups.iter().map(|g| omit_nan(g)).collect();
    for group in &groups {
        require_len("Kruskal-Wallis", 1, group.len())?;
    }

    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let n = n_total as f64;

    let combined: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let (ranks, ties) = ranks_with_ties(&combined);

    let mut h = 0.0;
    let mut offset = 0;
    for group in &groups {
        let r_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        h += r_sum * r_sum / group.len() as f64;
        offset += group.len();
    }
    let mut h = 12.0 / (n * (n + 1.0)) * h - 3.0 * (n + 1.0);

    // Tie correction
    let tie_term: f64 = ties.iter().map(|&t| (t * t * t - t) as f64).sum();
    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return Err(StatsError::DegenerateSample(
            "all observations are tied".to_string(),
        ));
    }
    h /= correction;

    let df = (groups.len() - 1) as f64;

    Ok(TestOutcome {
        statistic: h,
        p_value: chi2_p_value(h, df)?,
    })
}

/// Friedman chi-square test for three or more paired samples
///
/// Samples are the treatment columns; rows are the repeated-measures
/// blocks. Rows with a missing value in any column are dropped.
pub fn friedman(groups: &[&[f64]]) -> Result<TestOutcome> {
    let k = groups.len();
    if k < 3 {
        return Err(StatsError::GroupCount {
            test: "Friedman",
            expected: "at least 3",
            actual: k,
        });
    }
    let n_rows = groups[0].len();
    for group in groups {
        if group.len() != n_rows {
            return Err(StatsError::UnequalLength {
                left: n_rows,
                right: group.len(),
            });
        }
    }

    // Keep only complete rows
    let complete: Vec<usize> = (0..n_rows)
        .filter(|&row| groups.iter().all(|g| !g[row].is_nan()))
        .collect();
    require_len("Friedman", 2, complete.len())?;
    let n = complete.len() as f64;
    let k_f = k as f64;

    // Rank each block across the treatments
    let mut rank_sums = vec![0.0; k];
    let mut tie_term = 0.0;
    for &row in &complete {
        let block: Vec<f64> = groups.iter().map(|g| g[row]).collect();
        let (ranks, ties) = ranks_with_ties(&block);
        for (j, r) in ranks.iter().enumerate() {
            rank_sums[j] += r;
        }
        tie_term += ties.iter().map(|&t| (t * t * t - t) as f64).sum::<f64>();
    }

    let sum_r2: f64 = rank_sums.iter().map(|r| r * r).sum();
    let mut chi2 = 12.0 / (n * k_f * (k_f + 1.0)) * sum_r2 - 3.0 * n * (k_f + 1.0);

    // Tie correction
    let correction = 1.0 - tie_term / (n * k_f * (k_f * k_f - 1.0));
    if correction <= 0.0 {
        return Err(StatsError::DegenerateSample(
            "every block is fully tied".to_string(),
        ));
    }
    chi2 /= correction;

    let df = k_f - 1.0;

    Ok(TestOutcome {
        statistic: chi2,
        p_value: chi2_p_value(chi2, df)?,
    })
}
