//! Configuration loading and parsing
//!
//! An optional TOML file supplies the input location and analysis
//! defaults; command-line options override it field by field.

use anyhow::{Context, Result};
use eda_stats::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from analysis.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// CSV file with the observations
    pub file: Option<PathBuf>,
    /// Restrict the analysis to these columns (in order)
    #[serde(default)]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Emit machine-readable JSON instead of text
    #[serde(default)]
    pub json: bool,
    /// Write reports to this file instead of stdout
    pub report_file: Option<PathBuf>,
}

/// Load and parse an analysis.toml configuration file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {:?}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eda_stats::LeveneCenter;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
            [input]
            file = "survey.csv"
            columns = ["before", "after"]

            [analysis]
            alpha = 0.01
            levene_center = "median"
            equal_variances = false
            alternative = "greater"

            [output]
            json = true
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.input.file.as_deref(), Some(Path::new("survey.csv")));
        assert_eq!(config.input.columns, vec!["before", "after"]);
        assert_eq!(config.analysis.alpha, 0.01);
        assert_eq!(config.analysis.levene_center, LeveneCenter::Median);
        assert!(!config.analysis.equal_variances);
        assert!(config.output.json);
        assert!(config.output.report_file.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.analysis.alpha, 0.05);
        assert!(config.analysis.equal_variances);
        assert!(!config.output.json);
    }
}
