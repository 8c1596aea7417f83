//! Check command implementation
//!
//! Resolves the configuration and builds the lattice parameters without
//! pricing, so bad inputs surface before a long run.

use std::io::Write;

use pricer_models::lattice::LatticeConfig;
use tracing::info;

use crate::config::{CliConfig, Settings};
use crate::output::render_key_values;
use crate::Result;

/// Run the check command
pub fn run<W: Write>(config: &CliConfig, settings: &Settings, mut out: W) -> Result<()> {
    info!("Checking configuration");

    let lattice = LatticeConfig::new(&settings.params, settings.steps)?;
    let precision = settings.output.precision;
    let fmt = |value: f64| format!("{:.*}", precision, value);

    let pairs = [
        ("crr", env!("CARGO_PKG_VERSION").to_string()),
        ("threads", rayon::current_num_threads().to_string()),
        ("option_type", config.market.option_type.to_string()),
        ("spot", fmt(config.market.spot)),
        ("strike", fmt(config.market.strike)),
        ("rate", fmt(config.market.rate)),
        ("volatility", fmt(config.market.volatility)),
        ("expiry", fmt(config.market.expiry)),
        ("steps", config.market.steps.to_string()),
        ("format", config.output.format.to_string()),
        ("precision", precision.to_string()),
        ("dt", fmt(lattice.dt())),
        ("up", fmt(lattice.up())),
        ("down", fmt(lattice.down())),
        ("probability", fmt(lattice.probability())),
        ("discount", fmt(lattice.discount())),
    ];
    out.write_all(render_key_values(&pairs).as_bytes())?;
    writeln!(out, "ok")?;
    out.flush()?;

    info!("Configuration valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use pricer_core::types::{ModelViolation, PricingError};

    #[test]
    fn test_defaults_pass() {
        let config = CliConfig::default();
        let settings = config.settings().unwrap();
        let mut buffer = Vec::new();
        run(&config, &settings, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("probability"));
        assert!(text.ends_with("ok\n"));
    }

    #[test]
    fn test_arbitrage_violation_reported() {
        // |r|·√Δt far above σ pushes p outside (0, 1)
        let mut config = CliConfig::default();
        config.market.rate = 5.0;
        config.market.volatility = 0.01;
        let settings = config.settings().unwrap();
        let mut buffer = Vec::new();

        let err = run(&config, &settings, &mut buffer).unwrap_err();
        assert!(matches!(
            err,
            CliError::Pricing(PricingError::InvalidModel(
                ModelViolation::ArbitrageViolation { .. }
            ))
        ));
        assert!(buffer.is_empty());
    }
}
