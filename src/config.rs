use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::generator::{GeneratorParams, TrendBounds};
use crate::model::instrument::Selection;
use crate::session::SessionConfig;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub market: MarketConfig,
    pub generator: GeneratorConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub instrument: String,
    pub interval: String,
    pub history_len: usize,
    pub tick_ms: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            instrument: "ETH".to_string(),
            interval: "5m".to_string(),
            history_len: 500,
            tick_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub trend_len_min: u32,
    pub trend_len_max: u32,
    pub strength_min: f64,
    pub strength_max: f64,
    pub wick_jitter: f64,
    pub price_floor: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let params = GeneratorParams::default();
        Self {
            trend_len_min: params.trend.len_min,
            trend_len_max: params.trend.len_max,
            strength_min: params.trend.strength_min,
            strength_max: params.trend.strength_max,
            wick_jitter: params.wick_jitter,
            price_floor: params.price_floor,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub loading_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            loading_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MarketConfig {
    /// Configured starting selection; unsupported labels fall back to defaults.
    pub fn selection(&self) -> Selection {
        Selection::parse_or_default(&self.instrument, &self.interval)
    }
}

impl Config {
    pub fn generator_params(&self) -> GeneratorParams {
        let g = &self.generator;
        GeneratorParams {
            trend: TrendBounds {
                len_min: g.trend_len_min,
                len_max: g.trend_len_max,
                strength_min: g.strength_min,
                strength_max: g.strength_max,
            },
            wick_jitter: g.wick_jitter,
            price_floor: g.price_floor,
            history_len: self.market.history_len,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            params: self.generator_params(),
            tick_ms: self.market.tick_ms,
            seed: self.generator.seed,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.market.tick_ms == 0 {
            bail!("market.tick_ms must be > 0");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        self.generator_params()
            .validate()
            .context("generator settings are invalid")?;
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    /// `SANDBOX_MARKET_CONFIG` (from the environment or `.env`), else the bundled default path.
    pub fn resolve_path() -> PathBuf {
        dotenvy::dotenv().ok();
        std::env::var("SANDBOX_MARKET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::warn!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid config in {}", config_path.display()))
    }
}
