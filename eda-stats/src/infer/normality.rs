//! Shapiro-Wilk normality test
//!
//! Implements the AS R94 algorithm with Royston's 1995 polynomial
//! approximations for the weights and the p-value transform. Valid for
//! 3 <= n <= 5000; above that the approximation degrades and a warning is
//! logged, matching the behavior of the reference implementations.

use super::{normal_ppf, normal_sf, require_len};
use crate::summary::mean;
use crate::types::{Result, StatsError, TestOutcome};

// Royston 1995 coefficients (highest degree first)
const C1: [f64; 6] = [-2.706056, 4.434685, -2.071190, -0.147981, 0.221157, 0.0];
const C2: [f64; 6] = [-3.582633, 5.682633, -1.752461, -0.293762, 0.042981, 0.0];
const SMALL_N_MEAN: [f64; 4] = [-0.0006714, 0.025054, -0.39978, 0.5440];
const SMALL_N_STD: [f64; 4] = [-0.0020322, 0.062767, -0.77857, 1.3822];
const LARGE_N_MEAN: [f64; 4] = [0.0038915, -0.083751, -0.31082, -1.5861];
const LARGE_N_STD: [f64; 3] = [0.0030302, -0.082676, -0.4803];

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, c| acc * x + c)
}

/// Shapiro-Wilk test of the null hypothesis that a sample comes from a
/// normal distribution
///
/// Returns the W statistic and its p-value. NaN entries are omitted.
pub fn shapiro(data: &[f64]) -> Result<TestOutcome> {
    let mut x: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = x.len();
    require_len("Shapiro-Wilk", 3, n)?;
    if n > 5000 {
        log::warn!("Shapiro-Wilk p-value may be inaccurate for n = {n} > 5000");
    }

    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] == 0.0 {
        return Err(StatsError::DegenerateSample(
            "all observations are equal".to_string(),
        ));
    }

    // Expected normal order statistics (Blom approximation)
    let n_f = n as f64;
    let mut m = Vec::with_capacity(n);
    for i in 1..=n {
        m.push(normal_ppf((i as f64 - 0.375) / (n_f + 0.25))?);
    }
    let ssm: f64 = m.iter().map(|v| v * v).sum();

    // Shapiro-Wilk weights
    let mut a = vec![0.0; n];
    if n == 3 {
        a[0] = std::f64::consts::FRAC_1_SQRT_2;
        a[2] = -a[0];
    } else {
        let u = 1.0 / n_f.sqrt();
        let rsqrt_ssm = 1.0 / ssm.sqrt();

        let mut c1 = C1;
        c1[5] = m[n - 1] * rsqrt_ssm;
        let a_n = polyval(&c1, u);

        let (phi, a_n1) = if n > 5 {
            let mut c2 = C2;
            c2[5] = m[n - 2] * rsqrt_ssm;
            let a_n1 = polyval(&c2, u);
            let phi = (ssm - 2.0 * m[n - 1] * m[n - 1] - 2.0 * m[n - 2] * m[n - 2])
                / (1.0 - 2.0 * a_n * a_n - 2.0 * a_n1 * a_n1);
            (phi, Some(a_n1))
        } else {
            let phi =
                (ssm - 2.0 * m[n - 1] * m[n - 1]) / (1.0 - 2.0 * a_n * a_n);
            (phi, None)
        };

        let rsqrt_phi = 1.0 / phi.sqrt();
        let inner = if a_n1.is_some() { 2 } else { 1 };
        for i in inner..n - inner {
            a[i] = m[i] * rsqrt_phi;
        }
        a[n - 1] = a_n;
        a[0] = -a_n;
        if let Some(a_n1) = a_n1 {
            a[n - 2] = a_n1;
            a[1] = -a_n1;
        }
    }

    let xbar = mean(&x);
    let numerator: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum();
    let denominator: f64 = x.iter().map(|xi| (xi - xbar).powi(2)).sum();
    let w = (numerator * numerator / denominator).min(1.0);

    // Royston's p-value transform
    let p_value = if n == 3 {
        let p = 6.0 / std::f64::consts::PI
            * ((w.sqrt()).asin() - (0.75f64.sqrt()).asin());
        p.clamp(0.0, 1.0)
    } else if n <= 11 {
        let gamma = -2.273 + 0.459 * n_f;
        let transformed = -(gamma - (1.0 - w).ln()).ln();
        let mu = polyval(&SMALL_N_MEAN, n_f);
        let sigma = polyval(&SMALL_N_STD, n_f).exp();
        normal_sf((transformed - mu) / sigma)?
    } else {
        let log_n = n_f.ln();
        let transformed = (1.0 - w).ln();
        let mu = polyval(&LARGE_N_MEAN, log_n);
        let sigma = polyval(&LARGE_N_STD, log_n).exp();
        normal_sf((transformed - mu) / sigma)?
    };

    Ok(TestOutcome {
        statistic: w,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_shapiro_matches_reference_values() {
        // Reference W and p from scipy.stats.shapiro on this fixed sample
        let data = [
            0.11, 7.87, 4.61, 10.14, 7.95, 3.14, 0.46, 4.43, 0.21, 4.75, 0.71,
            1.52, 3.24, 0.93, 0.42, 4.97, 9.53, 4.55, 0.47, 6.66,
        ];
        let outcome = shapiro(&data).unwrap();
        assert_abs_diff_eq!(outcome.statistic, 0.90047299861506007, epsilon = 1e-3);
        assert_abs_diff_eq!(outcome.p_value, 0.042089745513930914, epsilon = 2e-3);
    }

    #[test]
    fn test_shapiro_symmetric_sample_passes() {
        let data = [
            -0.1, 0.3, -0.5, 1.2, 0.8, -1.1, 0.2, -0.3, 0.5, -0.8, 1.0, -0.2, 0.1,
            0.6, -0.6,
        ];
        let outcome = shapiro(&data).unwrap();
        assert!(outcome.statistic > 0.9);
        assert!(outcome.statistic <= 1.0);
        assert!(outcome.p_value > 0.05);
    }

    #[test]
    fn test_shapiro_rejects_heavy_skew() {
        let data = [
            0.1, 0.2, 0.2, 0.3, 0.3, 0.4, 0.5, 0.6, 0.8, 1.0, 1.3, 1.7, 2.3, 3.1,
            4.5, 6.7, 10.0, 16.0, 27.0, 45.0,
        ];
        let outcome = shapiro(&data).unwrap();
        assert!(outcome.p_value < 0.01);
    }

    #[test]
    fn test_shapiro_small_samples() {
        // n = 3 uses the exact arcsin transform
        let outcome = shapiro(&[1.0, 2.0, 3.5]).unwrap();
        assert!(outcome.statistic > 0.0 && outcome.statistic <= 1.0);
        assert!(outcome.p_value >= 0.0 && outcome.p_value <= 1.0);

        // n = 5 exercises the single-coefficient branch
        let outcome = shapiro(&[1.0, 2.0, 3.0, 4.0, 5.5]).unwrap();
        assert!(outcome.p_value > 0.05);
    }

    #[test]
    fn test_shapiro_too_few_observations() {
        assert!(matches!(
            shapiro(&[1.0, 2.0]),
            Err(StatsError::TooFewObservations { .. })
        ));
    }

    #[test]
    fn test_shapiro_constant_sample() {
        assert!(matches!(
            shapiro(&[2.0, 2.0, 2.0, 2.0]),
            Err(StatsError::DegenerateSample(_))
        ));
    }

    #[test]
    fn test_shapiro_omits_nan() {
        let data = [1.0, f64::NAN, 2.0, 2.5, 3.0, 4.0, 2.2, 1.8];
        assert!(shapiro(&data).is_ok());
    }
}
