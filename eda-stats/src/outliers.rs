//! Outlier trimming via the IQR rule
//!
//! A value is kept when it falls inside the closed interval
//! [q1 - w*IQR, q3 + w*IQR], where w is the whisker width (1.5 by default,
//! the boxplot convention; 3.0 marks only "severe" outliers).

use crate::summary::{quantile_sorted, sorted};

/// Lower and upper IQR fences for a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub lower: f64,
    pub upper: f64,
}

/// Compute the IQR fences of a sample (NaN entries ignored)
pub fn iqr_fences(data: &[f64], whisker_width: f64) -> Fences {
    let clean: Vec<f64> = data.iter().copied().filter(|v| !v.is_nan()).collect();
    let sorted = sorted(&clean);
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    Fences {
        lower: q1 - whisker_width * iqr,
        upper: q3 + whisker_width * iqr,
    }
}

/// Retain the values inside the IQR fences
///
/// NaN entries are dropped first; the returned vector preserves the input
/// order of the surviving values.
pub fn trim_outliers(data: &[f64], whisker_width: f64) -> Vec<f64> {
    let fences = iqr_fences(data, whisker_width);
    data.iter()
        .copied()
        .filter(|v| !v.is_nan() && *v >= fences.lower && *v <= fences.upper)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fences() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // q1 = 1.75, q3 = 3.25, iqr = 1.5
        let fences = iqr_fences(&data, 1.5);
        assert_abs_diff_eq!(fences.lower, 1.75 - 2.25);
        assert_abs_diff_eq!(fences.upper, 3.25 + 2.25);
    }

    #[test]
    fn test_trim_removes_extremes() {
        let mut data: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        data.push(1000.0);
        let kept = trim_outliers(&data, 1.5);
        assert_eq!(kept.len(), 20);
        assert!(!kept.contains(&1000.0));
    }

    #[test]
    fn test_trim_keeps_everything_when_clean() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(trim_outliers(&data, 1.5), data.to_vec());
    }

    #[test]
    fn test_wider_whiskers_keep_more() {
        let mut data: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        data.push(20.0);
        // q1 = 3.5, q3 = 8.5: 1.5 fences end at 16, 3.0 fences at 23.5
        assert!(!trim_outliers(&data, 1.5).contains(&20.0));
        assert!(trim_outliers(&data, 3.0).contains(&20.0));
    }

    #[test]
    fn test_nan_dropped() {
        let data = [1.0, f64::NAN, 2.0, 3.0];
        let kept = trim_outliers(&data, 1.5);
        assert_eq!(kept, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_preserves_order() {
        let data = [3.0, 1.0, 100.0, 2.0];
        let kept = trim_outliers(&data, 1.5);
        assert_eq!(kept, vec![3.0, 1.0, 2.0]);
    }
}
