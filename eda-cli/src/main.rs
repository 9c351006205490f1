//! EDA Toolkit CLI Application
//!
//! This is the command-line interface for the EDA statistics library.
//! It uses the eda-stats library and adds:
//! - CSV loading with numeric/categorical column inference
//! - TOML configuration with command-line overrides
//! - Frequency tables, outlier trimming and hypothesis tests as subcommands
//! - Plot generation (HTML)
//! - Report generation (TXT)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eda_stats::report::{self, TestKind};
use eda_stats::{plot, Alternative, AnalysisConfig, FrequencyTable, LeveneCenter, Table};
use std::fs;
use std::path::PathBuf;

mod config;
mod loader;

use config::AppConfig;

/// EDA Toolkit - Frequency tables, outlier trimming and hypothesis tests
#[derive(Parser, Debug)]
#[command(name = "eda-cli")]
#[command(about = "Exploratory data analysis from the command line", long_about = None)]
#[command(version)]
struct Args {
    /// CSV file with the observations (header row required)
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Path to configuration file (analysis.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Restrict the analysis to these columns, in order (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    columns: Vec<String>,

    /// Significance level the verdicts compare p-values against
    #[arg(long, value_name = "ALPHA")]
    alpha: Option<f64>,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Frequency-distribution table of a categorical column
    Freq {
        /// Column to tabulate
        column: String,

        /// Treat the column as pre-aggregated counts instead of raw answers
        #[arg(long)]
        counts: bool,

        /// Label column to pair with the counts (requires --counts)
        #[arg(long, value_name = "NAME")]
        labels: Option<String>,
    },

    /// IQR fences and outlier trimming for a numeric column
    Outliers {
        /// Column to trim
        column: String,

        /// Whisker width multiplier for the fences
        #[arg(long, value_name = "WIDTH")]
        whiskers: Option<f64>,
    },

    /// Run a hypothesis test over the table's numeric columns
    Test {
        /// Which test to run
        #[arg(value_enum)]
        kind: TestArg,

        /// Use Welch's t-test (drop the equal-variances assumption)
        #[arg(long)]
        welch: bool,

        /// Center used by Levene's test
        #[arg(long, value_enum, value_name = "CENTER")]
        center: Option<CenterArg>,

        /// Alternative hypothesis direction
        #[arg(long, value_enum, value_name = "DIRECTION")]
        alternative: Option<AltArg>,
    },

    /// Boxplot + histogram composite for a numeric column (HTML)
    PlotDist {
        /// Column to plot
        column: String,

        /// Histogram bin count
        #[arg(long, value_name = "COUNT")]
        bins: Option<usize>,

        /// Output HTML file
        #[arg(short, long, value_name = "FILE", default_value = "distribution.html")]
        output: PathBuf,
    },

    /// Stacked percentage histograms of columns against a target (HTML)
    PlotBreakdown {
        /// Columns to break down (comma-separated)
        #[arg(long, value_name = "NAMES", value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Target column whose categories form the stacks
        #[arg(long, value_name = "NAME")]
        target: String,

        /// Subplot grid rows
        #[arg(long, default_value_t = 1)]
        rows: usize,

        /// Subplot grid columns
        #[arg(long, default_value_t = 1)]
        cols: usize,

        /// Output HTML file
        #[arg(short, long, value_name = "FILE", default_value = "breakdown.html")]
        output: PathBuf,
    },

    /// Normality diagnostics report: Shapiro-Wilk then Levene
    Report {
        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Hypothesis tests selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TestArg {
    Shapiro,
    Levene,
    TtestInd,
    TtestRel,
    Anova,
    MannWhitney,
    Wilcoxon,
    Kruskal,
    Friedman,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CenterArg {
    Mean,
    Median,
    Trimmed,
}

impl From<CenterArg> for LeveneCenter {
    fn from(value: CenterArg) -> Self {
        match value {
            CenterArg::Mean => LeveneCenter::Mean,
            CenterArg::Median => LeveneCenter::Median,
            CenterArg::Trimmed => LeveneCenter::Trimmed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AltArg {
    TwoSided,
    Less,
    Greater,
}

impl From<AltArg> for Alternative {
    fn from(value: AltArg) -> Self {
        match value {
            AltArg::TwoSided => Alternative::TwoSided,
            AltArg::Less => Alternative::Less,
            AltArg::Greater => Alternative::Greater,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("EDA Toolkit CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using statistics library v{}", eda_stats::VERSION);

    // Load the optional configuration file, then apply CLI overrides
    let app = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    let mut analysis = app.analysis.clone();
    if let Some(alpha) = args.alpha {
        analysis = analysis.with_alpha(alpha);
    }

    let json = args.json || app.output.json;
    let table = load_table(&args, &app)?;

    match &args.command {
        Command::Freq {
            column,
            counts,
            labels,
        } => run_freq(&table, column, *counts, labels.as_deref(), json),

        Command::Outliers { column, whiskers } => {
            let width = whiskers.unwrap_or(analysis.whisker_width);
            run_outliers(&table, column, width, json)
        }

        Command::Test {
            kind,
            welch,
            center,
            alternative,
        } => {
            if *welch {
                analysis = analysis.with_equal_variances(false);
            }
            if let Some(center) = center {
                analysis = analysis.with_levene_center((*center).into());
            }
            if let Some(alternative) = alternative {
                analysis = analysis.with_alternative((*alternative).into());
            }
            run_test(&table, &analysis, *kind, json)
        }

        Command::PlotDist {
            column,
            bins,
            output,
        } => {
            if let Some(bins) = bins {
                analysis = analysis.with_bins(*bins);
            }
            let figure = plot::distribution_figure(&table, column, &analysis)?;
            plot::write_html(&figure, output);
            println!("Figure written to {:?}", output);
            Ok(())
        }

        Command::PlotBreakdown {
            columns,
            target,
            rows,
            cols,
            output,
        } => {
            let names: Vec<&str> = columns.iter().map(String::as_str).collect();
            let figure =
                plot::categorical_breakdown_figure(&table, &names, target, *rows, *cols)?;
            plot::write_html(&figure, output);
            println!("Figure written to {:?}", output);
            Ok(())
        }

        Command::Report { output } => {
            let text = report::normality_report(&table, &analysis)?;
            let destination = output.clone().or_else(|| app.output.report_file.clone());
            write_report(&text, destination.as_deref())
        }
    }
}

/// Load the CSV named on the command line (or in the config file) and
/// project it onto the requested columns
fn load_table(args: &Args, app: &AppConfig) -> Result<Table> {
    let path = match args.data.clone().or_else(|| app.input.file.clone()) {
        Some(path) => path,
        None => bail!("no input CSV given (use --data or input.file in the config)"),
    };
    let table = loader::load_csv(&path)?;

    let columns = if args.columns.is_empty() {
        &app.input.columns
    } else {
        &args.columns
    };
    if columns.is_empty() {
        return Ok(table);
    }
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    Ok(table.select(&names)?)
}

fn run_freq(
    table: &Table,
    column: &str,
    counts: bool,
    labels: Option<&str>,
    json: bool,
) -> Result<()> {
    let freq = if counts {
        FrequencyTable::from_counts(table, column, labels)?
    } else {
        FrequencyTable::from_categorical(table, column)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(freq.rows())?);
    } else {
        print!("{freq}");
    }
    Ok(())
}

fn run_outliers(table: &Table, column: &str, width: f64, json: bool) -> Result<()> {
    let values = table.numeric_raw(column)?;
    let observed = values.iter().filter(|v| !v.is_nan()).count();
    let fences = eda_stats::iqr_fences(values, width);
    let kept = eda_stats::trim_outliers(values, width);
    let removed = observed - kept.len();

    if json {
        let payload = serde_json::json!({
            "column": column,
            "whisker_width": width,
            "lower": fences.lower,
            "upper": fences.upper,
            "removed": removed,
            "values": kept,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "Fences for {column} (whisker width {width}): [{:.3}, {:.3}]",
            fences.lower, fences.upper
        );
        println!("Kept {} of {observed} observations ({removed} removed)", kept.len());
    }
    Ok(())
}

fn run_test(table: &Table, analysis: &AnalysisConfig, kind: TestArg, json: bool) -> Result<()> {
    // Shapiro-Wilk produces one outcome per column, so it is handled apart
    if kind == TestArg::Shapiro {
        if json {
            let outcomes: Vec<_> = report::shapiro_outcomes(table)?
                .into_iter()
                .map(|(column, outcome)| {
                    serde_json::json!({
                        "column": column,
                        "statistic": outcome.statistic,
                        "p_value": outcome.p_value,
                        "verdict": outcome.verdict(analysis.alpha),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        } else {
            print!("{}", report::shapiro_report(table, analysis)?);
        }
        return Ok(());
    }

    let (name, test) = match kind {
        TestArg::Levene => ("levene", TestKind::Levene),
        TestArg::TtestInd => ("ttest-ind", TestKind::TtestInd),
        TestArg::TtestRel => ("ttest-rel", TestKind::TtestRel),
        TestArg::Anova => ("anova", TestKind::Anova),
        TestArg::MannWhitney => ("mann-whitney", TestKind::MannWhitney),
        TestArg::Wilcoxon => ("wilcoxon", TestKind::Wilcoxon),
        TestArg::Kruskal => ("kruskal", TestKind::Kruskal),
        TestArg::Friedman => ("friedman", TestKind::Friedman),
        TestArg::Shapiro => unreachable!("handled above"),
    };

    if json {
        let outcome = report::test_outcome(table, analysis, test)?;
        let payload = serde_json::json!({
            "test": name,
            "statistic": outcome.statistic,
            "p_value": outcome.p_value,
            "alpha": analysis.alpha,
            "verdict": outcome.verdict(analysis.alpha),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let text = match test {
        TestKind::Levene => report::levene_report(table, analysis)?,
        TestKind::TtestInd => report::ttest_ind_report(table, analysis)?,
        TestKind::TtestRel => report::ttest_rel_report(table, analysis)?,
        TestKind::Anova => report::anova_report(table, analysis)?,
        TestKind::MannWhitney => report::mann_whitney_report(table, analysis)?,
        TestKind::Wilcoxon => report::wilcoxon_report(table, analysis)?,
        TestKind::Kruskal => report::kruskal_report(table, analysis)?,
        TestKind::Friedman => report::friedman_report(table, analysis)?,
    };
    print!("{text}");
    Ok(())
}

/// Print the report, or write it to a file with a generation timestamp
fn write_report(text: &str, destination: Option<&std::path::Path>) -> Result<()> {
    match destination {
        Some(path) => {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let contents = format!("EDA report - generated {stamp}\n\n{text}");
            fs::write(path, contents)
                .with_context(|| format!("failed to write report to {:?}", path))?;
            println!("Report written to {:?}", path);
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
