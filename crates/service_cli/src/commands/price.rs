//! Price command implementation
//!
//! Prices one option on an N-step CRR lattice and compares it with the
//! Black-Scholes closed form.

use std::io::Write;

use pricer_core::market_data::MarketParameters;
use pricer_models::analytical::BlackScholes;
use pricer_models::lattice::{build_lattice, price_european, LatticeConfig, LatticeDiagnostics};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{OutputFormat, Settings};
use crate::output::{render_key_values, write_csv, write_json};
use crate::Result;

/// Result of the price command
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    pub params: MarketParameters,
    pub lattice: LatticeConfig,
    pub crr_price: f64,
    pub black_scholes_price: f64,
    pub abs_error: f64,
    pub diagnostics: LatticeDiagnostics,
}

/// Flat single-record form for CSV output
#[derive(Debug, Serialize)]
struct PriceRow {
    option_type: &'static str,
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    expiry: f64,
    steps: usize,
    crr_price: f64,
    black_scholes_price: f64,
    abs_error: f64,
    delta: f64,
    gamma: Option<f64>,
    theta: Option<f64>,
}

impl From<&PriceReport> for PriceRow {
    fn from(report: &PriceReport) -> Self {
        let p = &report.params;
        Self {
            option_type: p.option_type().as_str(),
            spot: p.spot(),
            strike: p.strike(),
            rate: p.rate(),
            volatility: p.volatility(),
            expiry: p.expiry(),
            steps: report.lattice.steps(),
            crr_price: report.crr_price,
            black_scholes_price: report.black_scholes_price,
            abs_error: report.abs_error,
            delta: report.diagnostics.delta,
            gamma: report.diagnostics.gamma,
            theta: report.diagnostics.theta,
        }
    }
}

/// Builds the lattice, values it and attaches the closed-form reference.
pub fn compute(params: &MarketParameters, steps: usize) -> Result<PriceReport> {
    let (lattice, prices) = build_lattice(params, steps)?;
    debug!(
        up = lattice.up(),
        down = lattice.down(),
        probability = lattice.probability(),
        "lattice built"
    );

    let valuation = price_european(params, &lattice, &prices)?;
    let black_scholes_price = BlackScholes::reference_price(params);
    let crr_price = valuation.root_price();

    Ok(PriceReport {
        params: *params,
        lattice,
        crr_price,
        black_scholes_price,
        abs_error: (crr_price - black_scholes_price).abs(),
        diagnostics: *valuation.diagnostics(),
    })
}

/// Writes the report in the requested format.
pub fn render<W: Write>(
    report: &PriceReport,
    format: OutputFormat,
    precision: usize,
    mut out: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, [PriceRow::from(report)]),
        OutputFormat::Table => {
            let fmt = |value: f64| format!("{:.*}", precision, value);
            let fmt_opt =
                |value: Option<f64>| value.map(fmt).unwrap_or_else(|| "n/a".to_string());
            let p = &report.params;
            let pairs = [
                ("Option", p.option_type().to_string()),
                ("Spot", fmt(p.spot())),
                ("Strike", fmt(p.strike())),
                ("Rate", fmt(p.rate())),
                ("Volatility", fmt(p.volatility())),
                ("Expiry", fmt(p.expiry())),
                ("Steps", report.lattice.steps().to_string()),
                ("Up factor", fmt(report.lattice.up())),
                ("Down factor", fmt(report.lattice.down())),
                ("Probability", fmt(report.lattice.probability())),
                ("CRR price", fmt(report.crr_price)),
                ("Black-Scholes", fmt(report.black_scholes_price)),
                ("Abs error", format!("{:.*e}", precision, report.abs_error)),
                ("Delta", fmt(report.diagnostics.delta)),
                ("Gamma", fmt_opt(report.diagnostics.gamma)),
                ("Theta", fmt_opt(report.diagnostics.theta)),
            ];
            out.write_all(render_key_values(&pairs).as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Run the price command
pub fn run<W: Write>(settings: &Settings, out: W) -> Result<()> {
    info!(
        option_type = %settings.params.option_type(),
        steps = settings.steps,
        "Starting pricing"
    );

    let report = compute(&settings.params, settings.steps)?;
    render(&report, settings.output.format, settings.output.precision, out)?;

    info!(
        crr_price = report.crr_price,
        abs_error = report.abs_error,
        "Pricing complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::OptionType;

    fn defaults() -> MarketParameters {
        MarketParameters::new(36.0, 40.0, 0.06, 0.2, 1.0, OptionType::Put).unwrap()
    }

    #[test]
    fn test_compute_default_put() {
        let report = compute(&defaults(), 10).unwrap();
        assert_eq!(report.lattice.steps(), 10);
        assert_relative_eq!(report.black_scholes_price, 3.844, epsilon = 1e-3);
        assert!(report.abs_error < 0.1);
        assert!(report.diagnostics.delta < 0.0);
    }

    #[test]
    fn test_compute_zero_steps_fails() {
        assert!(compute(&defaults(), 0).is_err());
    }

    #[test]
    fn test_render_csv_single_record() {
        let report = compute(&defaults(), 1).unwrap();
        let mut buffer = Vec::new();
        render(&report, OutputFormat::Csv, 4, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("option_type,spot,strike"));
        // One step leaves gamma and theta undefined
        assert!(lines[1].starts_with("put,36.0,40.0"));
        assert!(lines[1].ends_with(",,"));
    }

    #[test]
    fn test_render_table_lists_prices() {
        let report = compute(&defaults(), 10).unwrap();
        let mut buffer = Vec::new();
        render(&report, OutputFormat::Table, 4, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("CRR price"));
        assert!(text.contains("Black-Scholes"));
        assert!(text.contains("put"));
    }

    #[test]
    fn test_render_json_fields() {
        let report = compute(&defaults(), 10).unwrap();
        let mut buffer = Vec::new();
        render(&report, OutputFormat::Json, 4, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["lattice"]["steps"], 10);
        assert_eq!(value["params"]["option_type"], "put");
        assert!(value["crr_price"].is_f64());
    }
}
