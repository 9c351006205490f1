//! Frequency distribution tables
//!
//! Builds the classic four-column frequency table for a categorical
//! variable: frequency, relative frequency, cumulative frequency, and
//! cumulative relative frequency, with rows ordered by category label.
//! The source is either raw observations (one row per observation) or a
//! column that already holds per-category counts.

use crate::types::{Column, Result, StatsError, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    /// Category label
    pub category: String,
    /// Observation count
    pub frequency: u64,
    /// frequency / total
    pub relative: f64,
    /// Running sum of frequencies
    pub cumulative: u64,
    /// Running sum of relative frequencies
    pub cumulative_relative: f64,
}

/// Frequency distribution of a categorical variable
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrequencyTable {
    rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    /// Build from raw categorical observations
    ///
    /// Counts each distinct label, sorted by label. Missing entries are
    /// skipped. An empty column yields an empty table.
    pub fn from_categorical(table: &Table, column: &str) -> Result<Self> {
        let values = table.categorical(column)?;

        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }

        Ok(Self::from_count_pairs(
            counts.into_iter().map(|(k, v)| (k.to_string(), v)),
        ))
    }

    /// Build from a column that already holds per-category counts
    ///
    /// Each row of the column is one category; the row label is taken from a
    /// parallel categorical `labels` column when given, otherwise the row
    /// index. Counts must be non-negative integers.
    pub fn from_counts(table: &Table, column: &str, labels: Option<&str>) -> Result<Self> {
        let counts = match table.column(column)? {
            Column::Numeric(v) => v,
            Column::Categorical(_) => {
                return Err(StatsError::NotNumeric(column.to_string()))
            }
        };

        // Raw label vector: row i of the counts pairs with row i of the
        // labels, missing entries included
        let label_values = match labels {
            Some(name) => match table.column(name)? {
                Column::Categorical(v) => Some((name, v)),
                Column::Numeric(_) => {
                    return Err(StatsError::NotCategorical(name.to_string()))
                }
            },
            None => None,
        };

        let mut pairs = Vec::with_capacity(counts.len());
        for (i, &count) in counts.iter().enumerate() {
            if count.is_nan() {
                continue;
            }
            if count < 0.0 || count.fract() != 0.0 {
                return Err(StatsError::DegenerateSample(format!(
                    "count column {column} holds a non-count value: {count}"
                )));
            }
            let category = match &label_values {
                Some((name, v)) => v
                    .get(i)
                    .and_then(|label| label.clone())
                    .ok_or_else(|| {
                        StatsError::DegenerateSample(format!(
                            "label column {name} has no entry for row {i}"
                        ))
                    })?,
                None => i.to_string(),
            };
            pairs.push((category, count as u64));
        }

        Ok(Self::from_count_pairs(pairs))
    }

    fn from_count_pairs(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        let counts: Vec<(String, u64)> = counts.into_iter().collect();
        let total: u64 = counts.iter().map(|(_, c)| c).sum();

        let mut rows = Vec::with_capacity(counts.len());
        let mut cumulative = 0u64;
        let mut cumulative_relative = 0.0;
        for (category, frequency) in counts {
            let relative = if total == 0 {
                0.0
            } else {
                frequency as f64 / total as f64
            };
            cumulative += frequency;
            cumulative_relative += relative;
            rows.push(FrequencyRow {
                category,
                frequency,
                relative,
                cumulative,
                cumulative_relative,
            });
        }

        Self { rows }
    }

    /// Rows in category order
    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    /// Total number of observations
    pub fn total(&self) -> u64 {
        self.rows.last().map(|r| r.cumulative).unwrap_or(0)
    }

    /// True if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.category.len())
            .chain(std::iter::once("category".len()))
            .max()
            .unwrap_or(8);

        writeln!(
            f,
            "{:label_width$}  {:>9}  {:>8}  {:>10}  {:>12}",
            "category", "frequency", "relative", "cumulative", "cum_relative",
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:label_width$}  {:>9}  {:>8.3}  {:>10}  {:>12.3}",
                row.category, row.frequency, row.relative, row.cumulative, row.cumulative_relative,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_table() -> Table {
        let labels = ["b", "a", "b", "c", "a", "b"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect();
        Table::new().with_categorical("grade", labels)
    }

    #[test]
    fn test_from_categorical_sorted_by_label() {
        let freq = FrequencyTable::from_categorical(&sample_table(), "grade").unwrap();
        let rows = freq.rows();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "a");
        assert_eq!(rows[0].frequency, 2);
        assert_eq!(rows[1].category, "b");
        assert_eq!(rows[1].frequency, 3);
        assert_eq!(rows[2].category, "c");
        assert_eq!(rows[2].frequency, 1);

        assert_abs_diff_eq!(rows[1].relative, 0.5);
        assert_eq!(rows[1].cumulative, 5);
        assert_abs_diff_eq!(rows[2].cumulative_relative, 1.0, epsilon = 1e-12);
        assert_eq!(freq.total(), 6);
    }

    #[test]
    fn test_missing_entries_skipped() {
        let table = Table::new().with_categorical(
            "grade",
            vec![Some("a".into()), None, Some("a".into())],
        );
        let freq = FrequencyTable::from_categorical(&table, "grade").unwrap();
        assert_eq!(freq.total(), 2);
    }

    #[test]
    fn test_empty_column() {
        let table = Table::new().with_categorical("grade", vec![]);
        let freq = FrequencyTable::from_categorical(&table, "grade").unwrap();
        assert!(freq.is_empty());
        assert_eq!(freq.total(), 0);
    }

    #[test]
    fn test_from_counts() {
        let table = Table::new()
            .with_categorical(
                "grade",
                vec![Some("a".into()), Some("b".into()), Some("c".into())],
            )
            .with_numeric("n", vec![2.0, 3.0, 5.0]);

        let freq = FrequencyTable::from_counts(&table, "n", Some("grade")).unwrap();
        let rows = freq.rows();

        assert_eq!(rows[0].frequency, 2);
        assert_abs_diff_eq!(rows[0].relative, 0.2);
        assert_eq!(rows[2].cumulative, 10);
        assert_abs_diff_eq!(rows[2].cumulative_relative, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_counts_labels_stay_aligned_across_missing_count() {
        // Row 1 has a missing count; row 2's label must still be "c"
        let table = Table::new()
            .with_categorical(
                "grade",
                vec![Some("a".into()), Some("b".into()), Some("c".into())],
            )
            .with_numeric("n", vec![2.0, f64::NAN, 5.0]);

        let freq = FrequencyTable::from_counts(&table, "n", Some("grade")).unwrap();
        let rows = freq.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "a");
        assert_eq!(rows[1].category, "c");
        assert_eq!(rows[1].frequency, 5);
    }

    #[test]
    fn test_from_counts_missing_label_is_an_error() {
        let table = Table::new()
            .with_categorical("grade", vec![Some("a".into()), None, Some("c".into())])
            .with_numeric("n", vec![1.0, 2.0, 3.0]);

        assert!(matches!(
            FrequencyTable::from_counts(&table, "n", Some("grade")),
            Err(StatsError::DegenerateSample(_))
        ));
    }

    #[test]
    fn test_from_counts_rejects_non_counts() {
        let table = Table::new().with_numeric("n", vec![1.5, 2.0]);
        assert!(matches!(
            FrequencyTable::from_counts(&table, "n", None),
            Err(StatsError::DegenerateSample(_))
        ));
    }

    #[test]
    fn test_display_renders_header_and_rows() {
        let freq = FrequencyTable::from_categorical(&sample_table(), "grade").unwrap();
        let text = freq.to_string();
        assert!(text.contains("category"));
        assert!(text.contains("cum_relative"));
        assert_eq!(text.lines().count(), 4);
    }
}
