//! CLI configuration management
//!
//! Resolves market inputs and output settings from, lowest to highest priority:
//! 1. Built-in defaults (S0=36, K=40, T=1, r=6%, σ=20%, 10 steps, put)
//! 2. TOML config file
//! 3. `CRR_*` environment variables
//! 4. Command-line flags

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_core::market_data::MarketParameters;
use pricer_core::types::{OptionType, PricingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "crr.toml";

/// Upper bound on printed decimal places.
pub const MAX_PRECISION: usize = 12;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable {name}: cannot parse {value:?}")]
    EnvError { name: &'static str, value: String },

    #[error("Invalid output format: {0}. Must be one of: table, csv, json")]
    InvalidFormat(String),

    #[error("Invalid precision: {0}. Must be at most {MAX_PRECISION}")]
    InvalidPrecision(usize),
}

/// Output formats supported by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// `[market]` table: option inputs and lattice size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub volatility: f64,
    pub expiry: f64,
    pub option_type: OptionType,
    pub steps: usize,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            spot: 36.0,
            strike: 40.0,
            rate: 0.06,
            volatility: 0.2,
            expiry: 1.0,
            option_type: OptionType::Put,
            steps: 10,
        }
    }
}

/// `[output]` table: rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub format: OutputFormat,
    pub precision: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            precision: 4,
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub market: MarketSection,
    pub output: OutputSection,
}

/// Values given on the command line; `None` leaves the lower layers in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_file: Option<PathBuf>,
    pub spot: Option<f64>,
    pub strike: Option<f64>,
    pub rate: Option<f64>,
    pub volatility: Option<f64>,
    pub expiry: Option<f64>,
    pub option_type: Option<OptionType>,
    pub steps: Option<usize>,
    pub format: Option<OutputFormat>,
    pub precision: Option<usize>,
}

/// Validated inputs handed to the commands
#[derive(Debug, Clone)]
pub struct Settings {
    pub params: MarketParameters,
    pub steps: usize,
    pub output: OutputSection,
}

fn parse_env<T, F>(lookup: &F, name: &'static str, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(name) {
        *slot = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvError { name, value })?;
    }
    Ok(())
}

impl CliConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Override values from `CRR_*` environment variables
    ///
    /// `lookup` is `std::env::var(..).ok()` in production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let market = &mut self.market;
        parse_env(&lookup, "CRR_SPOT", &mut market.spot)?;
        parse_env(&lookup, "CRR_STRIKE", &mut market.strike)?;
        parse_env(&lookup, "CRR_RATE", &mut market.rate)?;
        parse_env(&lookup, "CRR_VOLATILITY", &mut market.volatility)?;
        parse_env(&lookup, "CRR_EXPIRY", &mut market.expiry)?;
        parse_env(&lookup, "CRR_OPTION_TYPE", &mut market.option_type)?;
        parse_env(&lookup, "CRR_STEPS", &mut market.steps)?;
        parse_env(&lookup, "CRR_FORMAT", &mut self.output.format)?;
        parse_env(&lookup, "CRR_PRECISION", &mut self.output.precision)?;
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        let market = &mut self.market;
        market.spot = cli.spot.unwrap_or(market.spot);
        market.strike = cli.strike.unwrap_or(market.strike);
        market.rate = cli.rate.unwrap_or(market.rate);
        market.volatility = cli.volatility.unwrap_or(market.volatility);
        market.expiry = cli.expiry.unwrap_or(market.expiry);
        market.option_type = cli.option_type.unwrap_or(market.option_type);
        market.steps = cli.steps.unwrap_or(market.steps);
        self.output.format = cli.format.unwrap_or(self.output.format);
        self.output.precision = cli.precision.unwrap_or(self.output.precision);
    }

    /// Validate the output settings
    ///
    /// Market inputs are validated by [`MarketParameters::new`] in [`Self::settings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidPrecision(self.output.precision));
        }
        Ok(())
    }

    /// Build validated market parameters
    pub fn market_parameters(&self) -> Result<MarketParameters, PricingError> {
        let m = &self.market;
        MarketParameters::new(m.spot, m.strike, m.rate, m.volatility, m.expiry, m.option_type)
    }

    /// Resolve into the inputs the commands consume
    pub fn settings(&self) -> Result<Settings, PricingError> {
        Ok(Settings {
            params: self.market_parameters()?,
            steps: self.market.steps,
            output: self.output.clone(),
        })
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (`--config`, or `crr.toml` when present)
/// 4. Default values
pub fn build_config<F>(cli: &CliOverrides, env: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            CliConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => CliConfig::default(),
    };

    config.apply_env(env)?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}
