//! Tree command implementation
//!
//! Exports the stock price lattice, the option value lattice, or both.

use std::io::Write;

use clap::ValueEnum;
use pricer_models::lattice::{build_lattice, price_european, LatticeConfig, TriangularGrid};
use serde::Serialize;
use tracing::info;

use crate::config::{OutputFormat, Settings};
use crate::output::{render_lattice_table, write_csv, write_json};
use crate::Result;

/// Which lattice(s) to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeSelection {
    /// Underlying prices only
    Prices,
    /// Option values only
    Values,
    /// Both lattices
    #[default]
    Both,
}

impl TreeSelection {
    fn includes_prices(self) -> bool {
        matches!(self, TreeSelection::Prices | TreeSelection::Both)
    }

    fn includes_values(self) -> bool {
        matches!(self, TreeSelection::Values | TreeSelection::Both)
    }
}

/// CSV record: one lattice node
#[derive(Debug, Serialize)]
struct TreeRow {
    lattice: &'static str,
    step: usize,
    node: usize,
    value: f64,
}

#[derive(Debug, Serialize)]
struct TreeReport {
    config: LatticeConfig,
    root_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    prices: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Vec<f64>>>,
}

fn grid_rows(grid: &TriangularGrid) -> Vec<Vec<f64>> {
    grid.rows().map(<[f64]>::to_vec).collect()
}

fn csv_rows<'a>(
    name: &'static str,
    grid: &'a TriangularGrid,
) -> impl Iterator<Item = TreeRow> + 'a {
    grid.nodes().map(move |n| TreeRow {
        lattice: name,
        step: n.step,
        node: n.node,
        value: n.value,
    })
}

/// Run the tree command
pub fn run<W: Write>(settings: &Settings, selection: TreeSelection, mut out: W) -> Result<()> {
    info!(steps = settings.steps, ?selection, "Building lattices");

    let (config, prices) = build_lattice(&settings.params, settings.steps)?;
    let valuation = price_european(&settings.params, &config, &prices)?;
    let values = valuation.values();
    let precision = settings.output.precision;

    let price_grid = selection.includes_prices().then_some(prices.grid());
    let value_grid = selection.includes_values().then_some(values.grid());

    match settings.output.format {
        OutputFormat::Csv => {
            let rows = price_grid
                .into_iter()
                .flat_map(|grid| csv_rows("price", grid))
                .chain(value_grid.into_iter().flat_map(|grid| csv_rows("value", grid)));
            write_csv(out, rows)?;
        }
        OutputFormat::Json => {
            let report = TreeReport {
                config,
                root_price: valuation.root_price(),
                prices: price_grid.map(grid_rows),
                values: value_grid.map(grid_rows),
            };
            write_json(out, &report)?;
        }
        OutputFormat::Table => {
            if let Some(grid) = price_grid {
                writeln!(out, "Stock price lattice")?;
                write!(out, "{}", render_lattice_table(grid, precision))?;
            }
            if let Some(grid) = value_grid {
                if price_grid.is_some() {
                    writeln!(out)?;
                }
                writeln!(out, "Option value lattice ({})", settings.params.option_type())?;
                write!(out, "{}", render_lattice_table(grid, precision))?;
            }
            out.flush()?;
        }
    }

    info!(root_price = valuation.root_price(), "Lattice export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfig, OutputSection};

    fn settings(format: OutputFormat, steps: usize) -> Settings {
        let mut config = CliConfig::default();
        config.market.steps = steps;
        config.output = OutputSection {
            format,
            precision: 4,
        };
        config.settings().unwrap()
    }

    fn run_to_string(settings: &Settings, selection: TreeSelection) -> String {
        let mut buffer = Vec::new();
        run(settings, selection, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_csv_both_lattices() {
        let text = run_to_string(&settings(OutputFormat::Csv, 2), TreeSelection::Both);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "lattice,step,node,value");
        // Six nodes per lattice plus the header
        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("price,0,0,36"));
        assert!(lines[7].starts_with("value,0,0,"));
    }

    #[test]
    fn test_csv_values_only() {
        let text = run_to_string(&settings(OutputFormat::Csv, 3), TreeSelection::Values);
        assert_eq!(text.lines().count(), 11);
        assert!(text.lines().skip(1).all(|line| line.starts_with("value,")));
    }

    #[test]
    fn test_json_rows_are_triangular() {
        let text = run_to_string(&settings(OutputFormat::Json, 3), TreeSelection::Prices);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        let rows = value["prices"].as_array().unwrap();
        assert_eq!(rows.len(), 4);
        for (step, row) in rows.iter().enumerate() {
            assert_eq!(row.as_array().unwrap().len(), step + 1);
        }
        assert!(value.get("values").is_none());
        assert_eq!(value["config"]["steps"], 3);
    }

    #[test]
    fn test_table_has_both_headings() {
        let text = run_to_string(&settings(OutputFormat::Table, 2), TreeSelection::Both);
        assert!(text.contains("Stock price lattice"));
        assert!(text.contains("Option value lattice (put)"));
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut config = CliConfig::default();
        config.market.steps = 0;
        let settings = config.settings().unwrap();
        let mut buffer = Vec::new();
        assert!(run(&settings, TreeSelection::Both, &mut buffer).is_err());
        assert!(buffer.is_empty());
    }
}
