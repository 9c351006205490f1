//! Hypothesis test wrappers
//!
//! Thin, stateless implementations of the classical tests, matching
//! scipy's semantics. Each function consumes plain `f64`
//! samples (NaN entries are omitted on entry), computes the textbook
//! statistic, and delegates the p-value to the matching statrs
//! distribution. Results come back as [`TestOutcome`]; the printed verdict
//! lives in the `report` module.
//!
//! # Implemented Tests
//!
//! Parametric:
//! - Independent two-sample t-test (pooled Student or Welch)
//! - Paired t-test
//! - One-way ANOVA
//! - Levene / Brown-Forsythe variance homogeneity
//!
//! Normality:
//! - Shapiro-Wilk (AS R94, Royston 1995 approximation)
//!
//! Non-parametric:
//! - Mann-Whitney U (normal approximation, tie + continuity correction)
//! - Wilcoxon signed-rank (zeros discarded, tie correction)
//! - Kruskal-Wallis (tie correction, chi-square approximation)
//! - Friedman chi-square

mod nonparametric;
mod normality;
mod parametric;

pub use nonparametric::{friedman, kruskal, mann_whitney, wilcoxon};
pub use normality::shapiro;
pub use parametric::{f_oneway, levene, ttest_ind, ttest_rel};

use crate::types::{Alternative, Result, StatsError};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

/// Drop NaN entries from a sample
pub(crate) fn omit_nan(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| !v.is_nan()).collect()
}

pub(crate) fn require_len(test: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(StatsError::TooFewObservations {
            test,
            required,
            actual,
        });
    }
    Ok(())
}

fn numeric_err<E: std::fmt::Debug>(context: &str) -> impl FnOnce(E) -> StatsError + '_ {
    move |e| StatsError::Numeric(format!("{context}: {e:?}"))
}

/// p-value of a t statistic for the requested alternative
pub(crate) fn t_p_value(t: f64, df: f64, alternative: Alternative) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(numeric_err("t distribution"))?;
    Ok(match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(t.abs()),
        Alternative::Greater => dist.sf(t),
        Alternative::Less => dist.cdf(t),
    })
}

/// Upper-tail p-value of an F statistic
pub(crate) fn f_p_value(f: f64, df_num: f64, df_den: f64) -> Result<f64> {
    let dist =
        FisherSnedecor::new(df_num, df_den).map_err(numeric_err("F distribution"))?;
    Ok(dist.sf(f))
}

/// Upper-tail p-value of a chi-square statistic
pub(crate) fn chi2_p_value(chi2: f64, df: f64) -> Result<f64> {
    let dist = ChiSquared::new(df).map_err(numeric_err("chi-square distribution"))?;
    Ok(dist.sf(chi2))
}

/// p-value of a standard-normal z statistic for the requested alternative
pub(crate) fn z_p_value(z: f64, alternative: Alternative) -> Result<f64> {
    let dist = Normal::new(0.0, 1.0).map_err(numeric_err("normal distribution"))?;
    Ok(match alternative {
        Alternative::TwoSided => (2.0 * dist.sf(z.abs())).min(1.0),
        Alternative::Greater => dist.sf(z),
        Alternative::Less => dist.cdf(z),
    })
}

/// Upper-tail p-value of a standard-normal z statistic
pub(crate) fn normal_sf(z: f64) -> Result<f64> {
    let dist = Normal::new(0.0, 1.0).map_err(numeric_err("normal distribution"))?;
    Ok(dist.sf(z))
}

/// Standard-normal quantile function
pub(crate) fn normal_ppf(p: f64) -> Result<f64> {
    let dist = Normal::new(0.0, 1.0).map_err(numeric_err("normal distribution"))?;
    Ok(dist.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_t_p_value_alternatives() {
        // t = 0 sits at the center of the distribution
        assert_abs_diff_eq!(
            t_p_value(0.0, 10.0, Alternative::TwoSided).unwrap(),
            1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            t_p_value(0.0, 10.0, Alternative::Greater).unwrap(),
            0.5,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            t_p_value(0.0, 10.0, Alternative::Less).unwrap(),
            0.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_directional_p_values_sum_to_one() {
        let greater = t_p_value(1.7, 8.0, Alternative::Greater).unwrap();
        let less = t_p_value(1.7, 8.0, Alternative::Less).unwrap();
        assert_abs_diff_eq!(greater + less, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normal_ppf_round_trip() {
        let z = normal_ppf(0.975).unwrap();
        assert_abs_diff_eq!(z, 1.959964, epsilon = 1e-4);
        assert_abs_diff_eq!(normal_sf(z).unwrap(), 0.025, epsilon = 1e-6);
    }

    #[test]
    fn test_chi2_p_value_decreases_with_statistic() {
        let small = chi2_p_value(1.0, 3.0).unwrap();
        let large = chi2_p_value(20.0, 3.0).unwrap();
        assert!(small > large);
        assert!(large < 0.001);
    }
}
