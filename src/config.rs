//! Runtime settings.
//!
//! Settings come from an optional TOML file, overridden by `DEFORMWATCH_*`
//! environment variables (e.g. `DEFORMWATCH_ROLLING=7d`). Command-line flags
//! override both.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::baseline::{AlarmBasis, RollingBaseline};
use crate::error::Result;
use crate::manager::EvaluationSettings;

/// Default settings file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "deformwatch";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rolling baseline policy: `"off"`, a period like `"30d"`, or `"5obs"`.
    pub rolling: String,
    pub alarm_basis: AlarmBasis,
    /// Filter directive for log output (`"info"`, `"deformwatch=debug"`, ...).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rolling: RollingBaseline::default().to_string(),
            alarm_basis: AlarmBasis::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or `deformwatch.toml` if present) and the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("DEFORMWATCH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse the evaluation knobs.
    pub fn evaluation(&self) -> Result<EvaluationSettings> {
        Ok(EvaluationSettings {
            rolling: self.rolling.parse()?,
            alarm_basis: self.alarm_basis,
        })
    }
}
