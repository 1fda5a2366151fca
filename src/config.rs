//! Analytics settings.
//!
//! Defaults reproduce the standard dashboard. A JSON file passed with
//! `--config` may override any subset of fields.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Divisor for the "Avg. Clinics" and "Avg. Operations" columns. The
/// averages are per-period figures over a fixed reporting cycle, not means
/// over the number of rows.
pub const DEFAULT_PERIOD_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub period_divisor: f64,
    /// Width in characters of the longest terminal chart bar.
    pub chart_width: usize,
    /// Rows shown per table in the terminal dashboard; 0 shows all.
    pub preview_rows: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            period_divisor: DEFAULT_PERIOD_DIVISOR,
            chart_width: 40,
            preview_rows: 0,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: AnalyticsConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: origin.clone(),
            source,
        })?;
        let config = Self::from_json(&text, &origin)?;
        info!(path = %origin, divisor = config.period_divisor, "loaded analytics config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.period_divisor.is_finite() && self.period_divisor > 0.0) {
            return Err(ConfigError::Invalid {
                field: "period_divisor".to_string(),
                message: format!("must be a positive number, got {}", self.period_divisor),
            });
        }
        if self.chart_width == 0 {
            return Err(ConfigError::Invalid {
                field: "chart_width".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
