//! Analysis configuration types
//!
//! This module defines the knobs shared by the report and plot helpers:
//! significance level, Levene center, t-test variance assumption,
//! alternative direction, whisker width, histogram bins.

use crate::types::Alternative;
use serde::{Deserialize, Serialize};

/// How Levene's test centers each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeveneCenter {
    /// Classic Levene (deviations from the group mean)
    #[default]
    Mean,
    /// Brown-Forsythe variant (deviations from the group median)
    Median,
    /// Deviations from the 5% trimmed mean
    Trimmed,
}

/// Configuration for report and plot helpers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance level the verdict compares p-values against
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Center used by Levene's test
    #[serde(default)]
    pub levene_center: LeveneCenter,

    /// Whether the independent t-test assumes equal variances
    /// (false = Welch)
    #[serde(default = "default_true")]
    pub equal_variances: bool,

    /// Alternative hypothesis direction for two-sample tests
    #[serde(default)]
    pub alternative: Alternative,

    /// Whisker width multiplier for the IQR outlier fences
    #[serde(default = "default_whisker_width")]
    pub whisker_width: f64,

    /// Histogram bin count (None = let the renderer choose)
    #[serde(default)]
    pub bins: Option<usize>,
}

fn default_alpha() -> f64 {
    0.05
}

fn default_true() -> bool {
    true
}

fn default_whisker_width() -> f64 {
    1.5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            levene_center: LeveneCenter::default(),
            equal_variances: true,
            alternative: Alternative::default(),
            whisker_width: default_whisker_width(),
            bins: None,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the significance level
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder method: set the Levene center
    pub fn with_levene_center(mut self, center: LeveneCenter) -> Self {
        self.levene_center = center;
        self
    }

    /// Builder method: assume equal variances (false = Welch t-test)
    pub fn with_equal_variances(mut self, equal: bool) -> Self {
        self.equal_variances = equal;
        self
    }

    /// Builder method: set the alternative hypothesis direction
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Builder method: set the IQR whisker width
    pub fn with_whisker_width(mut self, width: f64) -> Self {
        self.whisker_width = width;
        self
    }

    /// Builder method: fix the histogram bin count
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = Some(bins);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = AnalysisConfig::new()
            .with_alpha(0.01)
            .with_levene_center(LeveneCenter::Median)
            .with_equal_variances(false)
            .with_alternative(Alternative::Greater)
            .with_whisker_width(3.0)
            .with_bins(20);

        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.levene_center, LeveneCenter::Median);
        assert!(!config.equal_variances);
        assert_eq!(config.alternative, Alternative::Greater);
        assert_eq!(config.whisker_width, 3.0);
        assert_eq!(config.bins, Some(20));
    }

    #[test]
    fn test_config_defaults() {
        let config = AnalysisConfig::default();

        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.levene_center, LeveneCenter::Mean);
        assert!(config.equal_variances);
        assert_eq!(config.alternative, Alternative::TwoSided);
        assert_eq!(config.whisker_width, 1.5);
        assert_eq!(config.bins, None);
    }
}
