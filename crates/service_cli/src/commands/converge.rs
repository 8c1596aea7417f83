//! Converge command implementation
//!
//! Prices the option over a sequence of step counts and reports the
//! absolute error against the Black-Scholes reference at each one.

use std::io::Write;

use pricer_models::analytical::BlackScholes;
use pricer_models::convergence::{ConvergenceAnalyzer, StepRange, DEFAULT_LADDER_STRIDE};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{OutputFormat, Settings};
use crate::output::{render_convergence_table, write_csv, write_json};
use crate::Result;

/// How the step sequence was requested on the command line
#[derive(Debug, Clone, Default)]
pub struct StepSelection {
    /// Explicit step counts; wins over every other field
    pub steps_list: Option<Vec<usize>>,
    pub start: Option<usize>,
    pub stride: Option<usize>,
    pub max: Option<usize>,
    /// Evaluate lattices on the rayon pool
    pub parallel: bool,
}

impl StepSelection {
    /// Resolves the step sequence.
    ///
    /// With nothing given, this is the ladder 10, 20, ... covering `default_max`.
    pub fn resolve(&self, default_max: usize) -> Result<StepRange> {
        if let Some(list) = &self.steps_list {
            return Ok(StepRange::new(list.clone())?);
        }
        match (self.start, self.stride, self.max) {
            (None, None, None) => Ok(StepRange::ladder(default_max)?),
            (start, stride, max) => {
                let stride = stride.unwrap_or(DEFAULT_LADDER_STRIDE);
                let start = start.unwrap_or(stride);
                Ok(StepRange::arithmetic(start, stride, max.unwrap_or(default_max))?)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ConvergenceRow {
    steps: usize,
    price: f64,
    reference_price: f64,
    abs_error: f64,
}

/// Run the converge command
pub fn run<W: Write>(settings: &Settings, selection: &StepSelection, mut out: W) -> Result<()> {
    let range = selection.resolve(settings.steps)?;
    let reference = BlackScholes::reference_price(&settings.params);
    info!(
        points = range.len(),
        max_steps = range.max_steps(),
        parallel = selection.parallel,
        "Starting convergence study"
    );
    debug!(reference, "Black-Scholes reference");

    let analyzer = ConvergenceAnalyzer::new(settings.params, range, reference)?;
    let series = if selection.parallel {
        analyzer.analyze_parallel()?
    } else {
        analyzer.analyze()?
    };

    match settings.output.format {
        OutputFormat::Csv => {
            let rows = series.iter().map(|p| ConvergenceRow {
                steps: p.steps,
                price: p.price,
                reference_price: series.reference_price(),
                abs_error: p.abs_error,
            });
            write_csv(out, rows)?;
        }
        OutputFormat::Json => write_json(out, &series)?,
        OutputFormat::Table => {
            writeln!(
                out,
                "Black-Scholes reference: {:.*}",
                settings.output.precision, reference
            )?;
            write!(
                out,
                "{}",
                render_convergence_table(&series, settings.output.precision)
            )?;
            out.flush()?;
        }
    }

    if let Some(best) = series.best() {
        info!(
            steps = best.steps,
            abs_error = best.abs_error,
            "Convergence study complete"
        );
    }
    Ok(())
}
