//! Output rendering
//!
//! Tables for the terminal via `tabled`, CSV through `csv::Writer::serialize` and JSON
//! through `serde_json`. Every renderer writes into any `io::Write` so the
//! commands can target stdout or a file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use pricer_models::convergence::ConvergenceSeries;
use pricer_models::lattice::TriangularGrid;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::{Alignment, Style};

use crate::Result;

/// Writes finished output to `path`, or stdout when no path is given.
///
/// Commands render into memory first, so the file is only created once
/// the whole result exists.
pub fn emit(path: Option<&Path>, rendered: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, rendered)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Writes one CSV record per item, header taken from the first item's field names.
pub fn write_csv<W, T, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Draws a boxed table with a header row.
///
/// Cells are right-aligned so numeric columns line up on the decimal point.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    let mut table = builder.build();
    table.with(Style::sharp()).with(Alignment::right());
    format!("{table}\n")
}

/// Lays a lattice out with one column per time step and one row per
/// number of down-moves, so the top row follows the all-up path.
///
/// Cells beyond the triangle are left blank.
pub fn render_lattice_table(grid: &TriangularGrid, precision: usize) -> String {
    let steps = grid.steps();
    let mut headers = vec!["downs".to_string()];
    headers.extend((0..=steps).map(|step| step.to_string()));

    let rows: Vec<Vec<String>> = (0..=steps)
        .map(|downs| {
            let mut row = vec![downs.to_string()];
            row.extend((0..=steps).map(|step| {
                if downs > step {
                    return String::new();
                }
                grid.get(step, step - downs)
                    .map(|value| format!("{:.*}", precision, value))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// Step count, lattice price and absolute error per row.
pub fn render_convergence_table(series: &ConvergenceSeries, precision: usize) -> String {
    let headers = vec![
        "steps".to_string(),
        "price".to_string(),
        "abs_error".to_string(),
    ];
    let rows: Vec<Vec<String>> = series
        .iter()
        .map(|point| {
            vec![
                point.steps.to_string(),
                format!("{:.*}", precision, point.price),
                format!("{:.*e}", precision, point.abs_error),
            ]
        })
        .collect();

    render_table(&headers, &rows)
}

/// Aligned `label: value` lines.
pub fn render_key_values(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| format!("{:<width$}  {}\n", key, value, width = width))
        .collect()
}
