//! Descriptive statistics helpers
//!
//! Small building blocks shared by the frequency, outlier, test, and plot
//! modules: mean, sample variance, median, quantiles with linear
//! interpolation, mode, trimmed mean, and midrank assignment for tied
//! observations. Inputs are expected to be NaN-free; the `Table` accessors
//! omit missing values before anything reaches this module.

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (ddof = 1). Returns NaN for fewer than 2 observations.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

/// Sample standard deviation (ddof = 1)
pub fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Sort a copy of the data ascending (NaN sorts last)
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Quantile of pre-sorted data with linear interpolation between closest
/// ranks (the pandas/numpy default). `q` is clamped to [0, 1].
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Quantile of unsorted data
pub fn quantile(data: &[f64], q: f64) -> f64 {
    quantile_sorted(&sorted(data), q)
}

/// Median
pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}

/// Mode: the most frequent exact value; ties resolve to the smallest value
/// (pandas `mode()[0]` semantics). Returns NaN for an empty slice.
pub fn mode(data: &[f64]) -> f64 {
    let sorted = sorted(data);
    if sorted.is_empty() {
        return f64::NAN;
    }

    let mut best = sorted[0];
    let mut best_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_count {
            best_count = j - i;
            best = sorted[i];
        }
        i = j;
    }
    best
}

/// Symmetrically drop `proportion` of the sorted observations from each
/// tail (count rounded down, scipy `trimboth` convention). Returns the
/// surviving values in ascending order.
pub fn trimboth(data: &[f64], proportion: f64) -> Vec<f64> {
    let sorted = sorted(data);
    let cut = (sorted.len() as f64 * proportion).floor() as usize;
    if sorted.len() <= 2 * cut {
        return Vec::new();
    }
    sorted[cut..sorted.len() - cut].to_vec()
}

/// Mean after symmetrically trimming `proportion` of observations from each
/// tail
pub fn trimmed_mean(data: &[f64], proportion: f64) -> f64 {
    mean(&trimboth(data, proportion))
}

/// Midranks (1-based) with ties sharing their average rank, plus the size
/// of every tie group (needed by the rank tests' tie corrections).
pub fn ranks_with_ties(data: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut tie_sizes = Vec::new();

    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && data[order[j]] == data[order[i]] {
            j += 1;
        }
        // Ranks i+1..=j averaged over the tie group
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        if j - i > 1 {
            tie_sizes.push(j - i);
        }
        i = j;
    }

    (ranks, tie_sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&data), 5.0);
        assert_abs_diff_eq!(variance(&data), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_interpolation() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // pandas: quantile(0.25) of [1,2,3,4] = 1.75
        assert_abs_diff_eq!(quantile(&data, 0.25), 1.75);
        assert_abs_diff_eq!(quantile(&data, 0.5), 2.5);
        assert_abs_diff_eq!(quantile(&data, 0.75), 3.25);
        assert_abs_diff_eq!(quantile(&data, 0.0), 1.0);
        assert_abs_diff_eq!(quantile(&data, 1.0), 4.0);
    }

    #[test]
    fn test_median_odd_even() {
        assert_abs_diff_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_abs_diff_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_mode_prefers_smallest_on_tie() {
        assert_abs_diff_eq!(mode(&[1.0, 2.0, 2.0, 3.0]), 2.0);
        assert_abs_diff_eq!(mode(&[3.0, 3.0, 1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_trimmed_mean() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        // 10% trim drops one value from each tail
        assert_abs_diff_eq!(trimmed_mean(&data, 0.1), 5.5);
    }

    #[test]
    fn test_ranks_with_ties() {
        let (ranks, ties) = ranks_with_ties(&[10.0, 20.0, 20.0, 30.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(ties, vec![2]);

        let (ranks, ties) = ranks_with_ties(&[5.0, 1.0, 3.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert!(ties.is_empty());
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        // total_cmp puts NaN at the end, so callers that forget to omit
        // missing values get an ordinary result instead of a panic
        assert_abs_diff_eq!(mode(&[2.0, 2.0, f64::NAN]), 2.0);
        let m = median(&[1.0, f64::NAN, 3.0]);
        assert!(m.is_finite());
        let (ranks, _) = ranks_with_ties(&[1.0, f64::NAN, 3.0]);
        assert_eq!(ranks.len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mean(&[]).is_nan());
        assert!(median(&[]).is_nan());
        assert!(mode(&[]).is_nan());
        assert!(quantile(&[], 0.5).is_nan());
    }
}
