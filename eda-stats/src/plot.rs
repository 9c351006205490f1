//! Figure builders
//!
//! Arranges plotly primitives into two fixed layouts: a
//! boxplot-over-histogram composite for one numeric variable, and a
//! grid of percentage-stacked bars breaking categorical variables down by a
//! target variable. Builders return a [`plotly::Plot`]; callers show it or
//! write it to an HTML file.

use crate::config::AnalysisConfig;
use crate::summary::{mean, median, mode};
use crate::types::{Column, Result, StatsError, Table};
use plotly::box_plot::{BoxMean, BoxPlot};
use plotly::common::color::NamedColor;
use plotly::common::Title;
use plotly::layout::{BarMode, GridPattern, LayoutGrid, Shape, ShapeLine, ShapeType};
use plotly::{Bar, Histogram, Layout, Plot};
use std::collections::BTreeMap;
use std::path::Path;

// Reference-line colors follow the matplotlib C1/C2/C3 cycle
const MEAN_COLOR: NamedColor = NamedColor::Orange;
const MEDIAN_COLOR: NamedColor = NamedColor::Green;
const MODE_COLOR: NamedColor = NamedColor::Red;

fn reference_vline(x: f64, axis: &str, color: NamedColor) -> Shape {
    Shape::new()
        .shape_type(ShapeType::Line)
        .x_ref(axis)
        .y_ref("paper")
        .x0(x)
        .x1(x)
        .y0(0.0)
        .y1(1.0)
        .line(ShapeLine::new().color(color).width(1.5))
}

/// Boxplot + histogram composite for one numeric column
///
/// Top row: boxplot with mean marker. Bottom row: histogram with vertical
/// reference lines at the mean, median, and mode.
pub fn distribution_figure(
    table: &Table,
    column: &str,
    config: &AnalysisConfig,
) -> Result<Plot> {
    let values = table.numeric(column)?;
    if values.is_empty() {
        return Err(StatsError::DegenerateSample(format!(
            "column {column} has no observations"
        )));
    }

    let mut plot = Plot::new();

    let box_trace = BoxPlot::new(values.clone())
        .name(column)
        .box_mean(BoxMean::True);
    plot.add_trace(box_trace);

    let mut histogram = Histogram::new(values.clone())
        .name(column)
        .x_axis("x2")
        .y_axis("y2");
    if let Some(bins) = config.bins {
        histogram = histogram.n_bins_x(bins);
    }
    plot.add_trace(histogram);

    let layout = Layout::new()
        .title(Title::with_text(format!("Distribution of {column}")))
        .grid(
            LayoutGrid::new()
                .rows(2)
                .columns(1)
                .pattern(GridPattern::Independent),
        )
        .shapes(vec![
            reference_vline(mean(&values), "x2", MEAN_COLOR),
            reference_vline(median(&values), "x2", MEDIAN_COLOR),
            reference_vline(mode(&values), "x2", MODE_COLOR),
        ]);
    plot.set_layout(layout);

    log::debug!(
        "distribution figure for {column}: {} observations",
        values.len()
    );
    Ok(plot)
}

/// Rows where both the category and the target are present, as
/// (category, target) label pairs
fn paired_labels<'t>(
    table: &'t Table,
    column: &str,
    target: &str,
) -> Result<Vec<(&'t str, &'t str)>> {
    let raw = |name: &str| -> Result<&Vec<Option<String>>> {
        match table.column(name)? {
            Column::Categorical(v) => Ok(v),
            Column::Numeric(_) => Err(StatsError::NotCategorical(name.to_string())),
        }
    };
    let categories = raw(column)?;
    let targets = raw(target)?;

    Ok(categories
        .iter()
        .zip(targets)
        .filter_map(|(c, t)| match (c, t) {
            (Some(c), Some(t)) => Some((c.as_str(), t.as_str())),
            _ => None,
        })
        .collect())
}

/// Grid of percentage-stacked bar subplots: one per categorical column,
/// each split by the target variable
///
/// Every bar is normalized to 100% within its category; segment labels
/// show the percentage with one decimal. All subplots share one legend
/// (drawn from the first subplot's traces).
pub fn categorical_breakdown_figure(
    table: &Table,
    columns: &[&str],
    target: &str,
    rows: usize,
    cols: usize,
) -> Result<Plot> {
    if columns.is_empty() {
        return Err(StatsError::GroupCount {
            test: "categorical breakdown",
            expected: "at least 1",
            actual: 0,
        });
    }
    if rows * cols < columns.len() {
        return Err(StatsError::Numeric(format!(
            "grid {rows}x{cols} cannot hold {} subplots",
            columns.len()
        )));
    }

    // Target levels define the stack segments and their colors
    let mut levels: Vec<&str> = table.categorical(target)?;
    levels.sort_unstable();
    levels.dedup();
    if levels.is_empty() {
        return Err(StatsError::DegenerateSample(format!(
            "target column {target} has no observations"
        )));
    }

    let mut plot = Plot::new();

    for (subplot, column) in columns.iter().enumerate() {
        let pairs = paired_labels(table, column, target)?;

        // category -> (target level -> count)
        let mut counts: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        for (category, level) in pairs {
            *counts
                .entry(category)
                .or_default()
                .entry(level)
                .or_insert(0) += 1;
        }

        let categories: Vec<String> =
            counts.keys().map(|c| c.to_string()).collect();
        let totals: Vec<u64> = counts.values().map(|by| by.values().sum()).collect();

        let x_axis = if subplot == 0 {
            "x".to_string()
        } else {
            format!("x{}", subplot + 1)
        };
        let y_axis = if subplot == 0 {
            "y".to_string()
        } else {
            format!("y{}", subplot + 1)
        };

        for level in &levels {
            let percents: Vec<f64> = counts
                .values()
                .zip(&totals)
                .map(|(by, total)| {
                    let count = by.get(level).copied().unwrap_or(0);
                    100.0 * count as f64 / *total as f64
                })
                .collect();
            let labels: Vec<String> =
                percents.iter().map(|p| format!("{p:.1}%")).collect();

            let bar = Bar::new(categories.clone(), percents)
                .name(level)
                .text_array(labels)
                .x_axis(&x_axis)
                .y_axis(&y_axis)
                .show_legend(subplot == 0);
            plot.add_trace(bar);
        }
    }

    let layout = Layout::new()
        .title(Title::with_text(format!("{target} by categorical variable")))
        .bar_mode(BarMode::Stack)
        .grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(cols)
                .pattern(GridPattern::Independent),
        );
    plot.set_layout(layout);

    Ok(plot)
}

/// Write a figure to a standalone HTML file
pub fn write_html(plot: &Plot, path: &Path) {
    plot.write_html(path);
    log::info!("Figure written to {:?}", path);
}
