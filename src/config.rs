use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_STEP_SIZE: f64 = 0.05;
pub const DEFAULT_ESTIMATE_STEP: f64 = 0.02;
pub const DEFAULT_TIME_PADDING: f64 = 0.1;
pub const DEFAULT_VALUE_PADDING: f64 = 0.1;

/// Fixed numeric settings of a controller.
///
/// `step_size` is frozen once a controller is built: playback speed only
/// changes how often ticks are requested, never the integration step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Integration step of the real run, seconds.
    pub step_size: f64,
    /// Finer step used by the range pre-pass, seconds.
    pub estimate_step: f64,
    /// Fraction of the longest duration added past the end of the time axis.
    pub time_padding: f64,
    /// Fraction of the value span added on both sides of the value axes.
    pub value_padding: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            estimate_step: DEFAULT_ESTIMATE_STEP,
            time_padding: DEFAULT_TIME_PADDING,
            value_padding: DEFAULT_VALUE_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite value > 0, got {value}")]
    NonPositiveStep { name: &'static str, value: f64 },
    #[error("{name} must be a finite value >= 0, got {value}")]
    NegativePadding { name: &'static str, value: f64 },
}

impl EngineConfig {
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("stepSize", self.step_size), ("estimateStep", self.estimate_step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveStep { name, value });
            }
        }
        for (name, value) in [("timePadding", self.time_padding), ("valuePadding", self.value_padding)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativePadding { name, value });
            }
        }
        Ok(())
    }
}
